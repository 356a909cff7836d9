//! Mantle material property providers
//!
//! Thermal conductivity, density and heat capacity can each be a constant
//! value or a closed-form function of temperature. The variant is chosen once
//! at configuration time and held fixed for the whole run; every variant is a
//! pure evaluator with no internal state.
//!
//! The temperature-dependent expressions are fits to experimental data and
//! mineral physics theory for an olivine-dominated mantle, following
//! Murphy Quinlan et al. (2021), <https://doi.org/10.1029/2020JE006726>.
//!
//! # Design
//!
//! Each property is a tagged enum rather than a trait object: the set of
//! variants is closed (constant or the published olivine fit), the evaluators
//! are trivially `Copy`, and the solver's inner loop calls them at every node
//! and every step, so we want direct dispatch.
//!
//! # Example
//!
//! ```rust
//! use pallas_rs::physics::{Conductivity, Density, HeatCapacity, MantleProperties};
//!
//! // Constant olivine-like mantle
//! let mantle = MantleProperties::constant(3.0, 3341.0, 819.0);
//! let kappa = mantle.diffusivity(1600.0, 200_000.0);
//! assert!(kappa > 0.0);
//!
//! // Fully temperature-dependent mantle
//! let mantle = MantleProperties::new(
//!     Conductivity::Variable,
//!     Density::Variable,
//!     HeatCapacity::Variable,
//! );
//! assert!(mantle.conductivity.at(1800.0, 200_000.0) < 3.0);
//! ```

// =================================================================================================
// Default constant values (olivine-like mantle)
// =================================================================================================

/// Default constant mantle conductivity \[W/(m K)\]
pub const DEFAULT_CONDUCTIVITY: f64 = 3.0;

/// Default constant mantle density \[kg/m³\]
pub const DEFAULT_DENSITY: f64 = 3341.0;

/// Default constant mantle heat capacity \[J/(kg K)\]
pub const DEFAULT_HEAT_CAPACITY: f64 = 819.0;

/// Reference temperature for the thermal-expansion correction \[K\]
const REFERENCE_TEMPERATURE: f64 = 300.0;

// =================================================================================================
// Conductivity
// =================================================================================================

/// Mantle thermal conductivity k(T, r) \[W/(m K)\]
///
/// The variable form is a fit for olivine valid over the temperature range a
/// planetesimal mantle reaches (surface temperature up to the core melting
/// point). The radius argument is accepted for interface uniformity — the
/// published fit has no explicit pressure/position dependence at
/// planetesimal scales.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Conductivity {
    /// Temperature-independent conductivity
    Constant(f64),

    /// Temperature-dependent olivine fit
    Variable,
}

impl Conductivity {
    /// Evaluate conductivity at a temperature and radius
    pub fn at(&self, temperature: f64, _radius: f64) -> f64 {
        match self {
            Conductivity::Constant(k) => *k,
            Conductivity::Variable => {
                80.4205952575632
                    * (1.3193574749943 * temperature.powf(-0.5)
                        + 0.977581998039333
                        - 28361.7649315602 / temperature.powi(2)
                        - 6.05745211527538e-5 / temperature.powi(3))
                    * temperature.recip().sqrt()
            }
        }
    }

    /// Derivative of conductivity with respect to temperature, dk/dT
    ///
    /// Zero for the constant variant. The variable form is the analytic
    /// derivative of the fit above; the solver uses it for the non-linear
    /// term of the discretisation.
    pub fn gradient(&self, temperature: f64) -> f64 {
        match self {
            Conductivity::Constant(_) => 0.0,
            Conductivity::Variable => {
                80.4205952575632
                    * (-0.659678737497148 * temperature.powf(-1.5)
                        + 56723.5298631204 / temperature.powi(3)
                        + 0.000181723563458261 / temperature.powi(4))
                    * temperature.recip().sqrt()
                    - 40.2102976287816
                        * (1.3193574749943 * temperature.powf(-0.5)
                            + 0.977581998039333
                            - 28361.7649315602 / temperature.powi(2)
                            - 6.05745211527538e-5 / temperature.powi(3))
                        * temperature.recip().sqrt()
                        / temperature
            }
        }
    }
}

impl Default for Conductivity {
    fn default() -> Self {
        Conductivity::Constant(DEFAULT_CONDUCTIVITY)
    }
}

// =================================================================================================
// Density
// =================================================================================================

/// Mantle density ρ(T) \[kg/m³\]
///
/// The variable form applies a temperature-dependent volumetric expansion
/// coefficient α(T) to the reference olivine density.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Density {
    /// Temperature-independent density
    Constant(f64),

    /// Density corrected for thermal expansion
    Variable,
}

impl Density {
    /// Evaluate density at a temperature
    pub fn at(&self, temperature: f64) -> f64 {
        match self {
            Density::Constant(rho) => *rho,
            Density::Variable => {
                let alpha =
                    3.304e-5 + 0.742e-8 * temperature - 0.538 * temperature.powi(-2);
                DEFAULT_DENSITY
                    - alpha * DEFAULT_DENSITY * (temperature - REFERENCE_TEMPERATURE)
            }
        }
    }
}

impl Default for Density {
    fn default() -> Self {
        Density::Constant(DEFAULT_DENSITY)
    }
}

// =================================================================================================
// Heat capacity
// =================================================================================================

/// Mantle specific heat capacity c_p(T) \[J/(kg K)\]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeatCapacity {
    /// Temperature-independent heat capacity
    Constant(f64),

    /// Temperature-dependent olivine fit
    Variable,
}

impl HeatCapacity {
    /// Evaluate heat capacity at a temperature
    pub fn at(&self, temperature: f64) -> f64 {
        match self {
            HeatCapacity::Constant(cp) => *cp,
            HeatCapacity::Variable => {
                995.1 + 1343.0 * temperature.powf(-0.5)
                    - 2.887e7 * temperature.powi(-2)
                    - 6.166e-2 * temperature.powi(-3)
            }
        }
    }
}

impl Default for HeatCapacity {
    fn default() -> Self {
        HeatCapacity::Constant(DEFAULT_HEAT_CAPACITY)
    }
}

// =================================================================================================
// Bundled mantle properties
// =================================================================================================

/// The three mantle material properties used by the solver
///
/// Bundles conductivity, density and heat capacity, and derives the thermal
/// diffusivity κ = k / (ρ c_p) the stability bound depends on. The solver
/// re-evaluates these at the local temperature on every step; nothing here
/// is cached.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MantleProperties {
    /// Thermal conductivity provider
    pub conductivity: Conductivity,

    /// Density provider
    pub density: Density,

    /// Heat capacity provider
    pub heat_capacity: HeatCapacity,
}

impl MantleProperties {
    /// Bundle arbitrary property variants
    pub fn new(
        conductivity: Conductivity,
        density: Density,
        heat_capacity: HeatCapacity,
    ) -> Self {
        Self {
            conductivity,
            density,
            heat_capacity,
        }
    }

    /// Constant properties from explicit values
    ///
    /// # Example
    ///
    /// ```rust
    /// use pallas_rs::physics::MantleProperties;
    ///
    /// let mantle = MantleProperties::constant(3.0, 3341.0, 819.0);
    /// let kappa = mantle.diffusivity(295.0, 0.0);
    /// assert!((kappa - 1.0963794262207911e-6).abs() < 1e-18);
    /// ```
    pub fn constant(conductivity: f64, density: f64, heat_capacity: f64) -> Self {
        Self {
            conductivity: Conductivity::Constant(conductivity),
            density: Density::Constant(density),
            heat_capacity: HeatCapacity::Constant(heat_capacity),
        }
    }

    /// Thermal diffusivity κ = k / (ρ c_p) at a temperature and radius
    pub fn diffusivity(&self, temperature: f64, radius: f64) -> f64 {
        self.conductivity.at(temperature, radius)
            / (self.density.at(temperature) * self.heat_capacity.at(temperature))
    }

    /// Largest diffusivity over a temperature range
    ///
    /// Scans the range in 1 K increments (endpoints included). Used once at
    /// setup to impose the most restrictive von Neumann stability condition;
    /// not called during integration.
    pub fn max_diffusivity(&self, temp_min: f64, temp_max: f64) -> f64 {
        let (lo, hi) = if temp_min <= temp_max {
            (temp_min, temp_max)
        } else {
            (temp_max, temp_min)
        };

        let mut kappa_max = f64::NEG_INFINITY;
        let mut temperature = lo;
        while temperature < hi {
            kappa_max = kappa_max.max(self.diffusivity(temperature, 0.0));
            temperature += 1.0;
        }
        kappa_max.max(self.diffusivity(hi, 0.0))
    }

    /// Largest conductivity over a temperature range
    ///
    /// Same 1 K scan as [`max_diffusivity`](Self::max_diffusivity). Used once
    /// at setup to bound the explicit core-coupling gain, which depends on
    /// the conductivity alone rather than the diffusivity.
    pub fn max_conductivity(&self, temp_min: f64, temp_max: f64) -> f64 {
        let (lo, hi) = if temp_min <= temp_max {
            (temp_min, temp_max)
        } else {
            (temp_max, temp_min)
        };

        let mut k_max = f64::NEG_INFINITY;
        let mut temperature = lo;
        while temperature < hi {
            k_max = k_max.max(self.conductivity.at(temperature, 0.0));
            temperature += 1.0;
        }
        k_max.max(self.conductivity.at(hi, 0.0))
    }

    /// Verify the properties are finite over the reachable temperature range
    ///
    /// A property evaluating to NaN, infinity or a non-positive value
    /// anywhere between the surface temperature and the hottest initial
    /// temperature is a configuration error: the run would silently corrupt
    /// the temperature field. Checked once at setup.
    pub fn check_finite(&self, temp_min: f64, temp_max: f64) -> Result<(), String> {
        let (lo, hi) = if temp_min <= temp_max {
            (temp_min, temp_max)
        } else {
            (temp_max, temp_min)
        };

        let mut temperature = lo;
        loop {
            let k = self.conductivity.at(temperature, 0.0);
            let rho = self.density.at(temperature);
            let cp = self.heat_capacity.at(temperature);
            let dkdt = self.conductivity.gradient(temperature);

            if !(k.is_finite() && rho.is_finite() && cp.is_finite() && dkdt.is_finite()) {
                return Err(format!(
                    "Mantle properties evaluate to a non-finite value at {} K \
                     (k = {}, rho = {}, cp = {}, dk/dT = {})",
                    temperature, k, rho, cp, dkdt
                ));
            }
            if k <= 0.0 || rho <= 0.0 || cp <= 0.0 {
                return Err(format!(
                    "Mantle properties evaluate to a non-positive value at {} K \
                     (k = {}, rho = {}, cp = {})",
                    temperature, k, rho, cp
                ));
            }

            if temperature >= hi {
                return Ok(());
            }
            temperature = (temperature + 1.0).min(hi);
        }
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_constant_defaults() {
        let mantle = MantleProperties::default();
        assert_eq!(mantle.density.at(295.0), 3341.0);
        assert_eq!(mantle.heat_capacity.at(295.0), 819.0);
        assert_eq!(mantle.conductivity.at(295.0, 0.0), 3.0);
        assert_relative_eq!(
            mantle.diffusivity(295.0, 0.0),
            1.0963794262207911e-6,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_constant_custom_values() {
        let mantle = MantleProperties::constant(100.0, 500.0, 900.0);
        assert_eq!(mantle.conductivity.at(1600.0, 0.0), 100.0);
        assert_relative_eq!(
            mantle.diffusivity(1600.0, 0.0),
            0.00022222222222222223,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_constant_ignores_temperature() {
        let k = Conductivity::Constant(3.0);
        assert_eq!(k.at(250.0, 0.0), k.at(1600.0, 125_000.0));
        assert_eq!(k.gradient(1600.0), 0.0);
    }

    #[test]
    fn test_variable_conductivity() {
        // Oracle values from the olivine fit itself
        let k = Conductivity::Variable;
        assert_relative_eq!(k.at(350.0, 0.1), 3.510201158262625, max_relative = 1e-10);
        assert_relative_eq!(k.at(1800.0, 0.1), 1.8953911889912938, max_relative = 1e-10);
        assert_relative_eq!(
            k.at(161.96, 0.1),
            0.00015313048512481455,
            max_relative = 1e-8
        );
    }

    #[test]
    fn test_variable_conductivity_gradient() {
        let k = Conductivity::Variable;
        assert_relative_eq!(
            k.gradient(350.0),
            0.00023947115323349165,
            max_relative = 1e-8
        );
        assert_relative_eq!(
            k.gradient(1800.0),
            -0.0005244351242307716,
            max_relative = 1e-8
        );
        assert_relative_eq!(k.gradient(161.96), 0.0823500186171907, max_relative = 1e-8);
    }

    #[test]
    fn test_variable_gradient_matches_finite_difference() {
        let k = Conductivity::Variable;
        for &t in &[300.0, 500.0, 900.0, 1400.0, 1800.0] {
            let h = 1e-3;
            let numeric = (k.at(t + h, 0.0) - k.at(t - h, 0.0)) / (2.0 * h);
            assert_relative_eq!(k.gradient(t), numeric, max_relative = 1e-5);
        }
    }

    #[test]
    fn test_variable_density() {
        let rho = Density::Variable;
        assert_relative_eq!(rho.at(350.0), 3335.7804954765306, max_relative = 1e-10);
        assert_relative_eq!(rho.at(1800.0), 3109.3186024814813, max_relative = 1e-10);
        assert_relative_eq!(rho.at(161.96), 3347.3329416632596, max_relative = 1e-10);
        assert_relative_eq!(rho.at(REFERENCE_TEMPERATURE), 3341.0, max_relative = 1e-12);
    }

    #[test]
    fn test_variable_heat_capacity() {
        let cp = HeatCapacity::Variable;
        assert_relative_eq!(cp.at(350.0), 831.212900188484, max_relative = 1e-10);
        assert_relative_eq!(cp.at(1800.0), 1017.8443197439468, max_relative = 1e-10);
        assert_relative_eq!(cp.at(161.96), 0.024666741910952507, max_relative = 1e-8);
    }

    #[test]
    fn test_max_diffusivity_bounds_range() {
        let mantle = MantleProperties::new(
            Conductivity::Variable,
            Density::Variable,
            HeatCapacity::Variable,
        );
        let kappa_max = mantle.max_diffusivity(250.0, 1800.0);
        for &t in &[250.0, 600.0, 1000.0, 1400.0, 1800.0] {
            assert!(mantle.diffusivity(t, 0.0) <= kappa_max + 1e-18);
        }
    }

    #[test]
    fn test_max_conductivity_bounds_range() {
        let mantle = MantleProperties::new(
            Conductivity::Variable,
            Density::Variable,
            HeatCapacity::Variable,
        );
        let k_max = mantle.max_conductivity(250.0, 1800.0);
        for &t in &[250.0, 600.0, 1000.0, 1400.0, 1800.0] {
            assert!(mantle.conductivity.at(t, 0.0) <= k_max + 1e-12);
        }

        let constant = MantleProperties::constant(3.0, 3341.0, 819.0);
        assert_eq!(constant.max_conductivity(250.0, 1800.0), 3.0);
    }

    #[test]
    fn test_check_finite_accepts_simulation_range() {
        let mantle = MantleProperties::new(
            Conductivity::Variable,
            Density::Variable,
            HeatCapacity::Variable,
        );
        assert!(mantle.check_finite(250.0, 1800.0).is_ok());
    }

    #[test]
    fn test_check_finite_rejects_nonpositive() {
        let mantle = MantleProperties::constant(-1.0, 3341.0, 819.0);
        let result = mantle.check_finite(250.0, 1800.0);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("non-positive"));
    }

    #[test]
    fn test_check_finite_rejects_nan() {
        let mantle = MantleProperties::constant(f64::NAN, 3341.0, 819.0);
        let result = mantle.check_finite(250.0, 1800.0);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("non-finite"));
    }
}
