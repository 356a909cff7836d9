//! Simulation parameters
//!
//! One flat, serialisable struct drives a whole run: geometry, discretisation,
//! initial and boundary temperatures, core thermodynamics and the
//! constant-vs-variable choice for each mantle property. `Default` reproduces
//! the reference configuration (a 250 km planetesimal with a 50 % core and a
//! thin regolith), so a default parameter file is also a runnable example.
//!
//! Validation is split in two:
//! - [`SimulationParameters::validate`] checks geometry and discretisation
//!   (pure bookkeeping, no physics),
//! - the solver separately checks the von Neumann stability bound and
//!   property finiteness, which need the material properties.
//!
//! # Example
//!
//! ```rust
//! use pallas_rs::params::SimulationParameters;
//!
//! let mut params = SimulationParameters::default();
//! params.run_id = "small_body".to_string();
//! params.r_planet = 100_000.0;
//! params.validate().unwrap();
//! assert_eq!(params.r_core(), 50_000.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::physics::{Conductivity, Density, HeatCapacity, MantleProperties};

/// Seconds per million years
pub const MYR_IN_SECONDS: f64 = 3.1556926e13;

// =================================================================================================
// Parameter set
// =================================================================================================

/// Complete configuration for one simulation run
///
/// All lengths in metres, times in seconds unless the field says otherwise,
/// temperatures in kelvin, densities in kg/m³, heat capacities and latent
/// heat in J/(kg K) and J/kg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// Label used in output file names and metadata
    pub run_id: String,

    /// Timestep dt \[s\]
    pub timestep: f64,

    /// Planet radius \[m\]
    pub r_planet: f64,

    /// Core radius as a fraction of the planet radius, in \[0, 1)
    pub core_size_factor: f64,

    /// Regolith thickness as a fraction of the planet radius, in \[0, 1)
    pub reg_fraction: f64,

    /// Total simulated time \[Myr\]
    pub max_time: f64,

    /// Eutectic core melting temperature \[K\]
    pub temp_core_melting: f64,

    /// Constant mantle heat capacity \[J/(kg K)\] (used when
    /// `heat_cap_constant` is true)
    pub mantle_heat_cap_value: f64,

    /// Constant mantle density \[kg/m³\] (used when `density_constant` is true)
    pub mantle_density_value: f64,

    /// Constant mantle conductivity \[W/(m K)\] (used when `cond_constant`
    /// is true)
    pub mantle_cond_value: f64,

    /// Core heat capacity \[J/(kg K)\]
    pub core_cp: f64,

    /// Core density \[kg/m³\]
    pub core_density: f64,

    /// Initial mantle temperature \[K\]
    pub temp_init: f64,

    /// Fixed surface temperature \[K\]
    pub temp_surface: f64,

    /// Initial core temperature \[K\]
    pub core_temp_init: f64,

    /// Specific latent heat of core solidification \[J/kg\]
    pub core_latent_heat: f64,

    /// Constant regolith thermal diffusivity \[m²/s\]
    pub kappa_reg: f64,

    /// Radial node spacing dr \[m\]
    pub dr: f64,

    /// Use a constant mantle conductivity instead of the olivine fit
    pub cond_constant: bool,

    /// Use a constant mantle density instead of the thermal-expansion form
    pub density_constant: bool,

    /// Use a constant mantle heat capacity instead of the olivine fit
    pub heat_cap_constant: bool,

    /// Stop this long after the core finishes freezing \[Myr\], instead of
    /// running to `max_time`
    #[serde(default)]
    pub post_freeze_time: Option<f64>,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            run_id: "default".to_string(),
            timestep: 1.0e11,
            r_planet: 250_000.0,
            core_size_factor: 0.5,
            reg_fraction: 0.032,
            max_time: 400.0,
            temp_core_melting: 1200.0,
            mantle_heat_cap_value: 819.0,
            mantle_density_value: 3341.0,
            mantle_cond_value: 3.0,
            core_cp: 850.0,
            core_density: 7800.0,
            temp_init: 1600.0,
            temp_surface: 250.0,
            core_temp_init: 1600.0,
            core_latent_heat: 270_000.0,
            kappa_reg: 5.0e-8,
            dr: 1000.0,
            cond_constant: true,
            density_constant: true,
            heat_cap_constant: true,
            post_freeze_time: None,
        }
    }
}

impl SimulationParameters {
    /// Core radius \[m\]
    pub fn r_core(&self) -> f64 {
        self.r_planet * self.core_size_factor
    }

    /// Regolith thickness \[m\]
    pub fn regolith_thickness(&self) -> f64 {
        self.r_planet * self.reg_fraction
    }

    /// Total simulated time \[s\]
    pub fn max_time_seconds(&self) -> f64 {
        self.max_time * MYR_IN_SECONDS
    }

    /// Number of mantle nodes, core radius inclusive to planet radius
    /// exclusive at spacing `dr`
    pub fn n_mantle_nodes(&self) -> usize {
        (((self.r_planet - self.r_core()) / self.dr).ceil()) as usize
    }

    /// Number of timesteps, including the initial condition
    pub fn n_timesteps(&self) -> usize {
        (self.max_time_seconds() / self.timestep).floor() as usize + 1
    }

    /// Assemble the mantle property providers this configuration selects
    pub fn mantle_properties(&self) -> MantleProperties {
        MantleProperties::new(
            if self.cond_constant {
                Conductivity::Constant(self.mantle_cond_value)
            } else {
                Conductivity::Variable
            },
            if self.density_constant {
                Density::Constant(self.mantle_density_value)
            } else {
                Density::Variable
            },
            if self.heat_cap_constant {
                HeatCapacity::Constant(self.mantle_heat_cap_value)
            } else {
                HeatCapacity::Variable
            },
        )
    }

    /// Check geometry and discretisation
    ///
    /// # Errors
    ///
    /// Returns a message describing the first violated constraint: every
    /// numeric field must be finite, lengths and times positive, the core
    /// and regolith fractions inside \[0, 1), and the mantle at least three
    /// nodes thick so the interior stencil exists.
    pub fn validate(&self) -> Result<(), String> {
        let numeric = [
            ("timestep", self.timestep),
            ("r_planet", self.r_planet),
            ("core_size_factor", self.core_size_factor),
            ("reg_fraction", self.reg_fraction),
            ("max_time", self.max_time),
            ("temp_core_melting", self.temp_core_melting),
            ("mantle_heat_cap_value", self.mantle_heat_cap_value),
            ("mantle_density_value", self.mantle_density_value),
            ("mantle_cond_value", self.mantle_cond_value),
            ("core_cp", self.core_cp),
            ("core_density", self.core_density),
            ("temp_init", self.temp_init),
            ("temp_surface", self.temp_surface),
            ("core_temp_init", self.core_temp_init),
            ("core_latent_heat", self.core_latent_heat),
            ("kappa_reg", self.kappa_reg),
            ("dr", self.dr),
        ];
        for (name, value) in numeric {
            if !value.is_finite() {
                return Err(format!("Parameter {} must be finite; got {}", name, value));
            }
        }

        if self.timestep <= 0.0 {
            return Err(format!("timestep must be positive; got {}", self.timestep));
        }
        if self.r_planet <= 0.0 {
            return Err(format!("r_planet must be positive; got {}", self.r_planet));
        }
        if self.dr <= 0.0 {
            return Err(format!("dr must be positive; got {}", self.dr));
        }
        if self.max_time <= 0.0 {
            return Err(format!("max_time must be positive; got {}", self.max_time));
        }
        if !(0.0..1.0).contains(&self.core_size_factor) {
            return Err(format!(
                "core_size_factor must lie in [0, 1); got {}",
                self.core_size_factor
            ));
        }
        if !(0.0..1.0).contains(&self.reg_fraction) {
            return Err(format!(
                "reg_fraction must lie in [0, 1); got {}",
                self.reg_fraction
            ));
        }
        if self.kappa_reg <= 0.0 {
            return Err(format!("kappa_reg must be positive; got {}", self.kappa_reg));
        }
        if let Some(extra) = self.post_freeze_time {
            if !extra.is_finite() || extra < 0.0 {
                return Err(format!(
                    "post_freeze_time must be finite and non-negative; got {}",
                    extra
                ));
            }
        }
        if self.n_mantle_nodes() < 3 {
            return Err(format!(
                "Mantle is only {} node(s) thick at dr = {} m; at least 3 are \
                 needed for the interior stencil",
                self.n_mantle_nodes(),
                self.dr
            ));
        }
        Ok(())
    }
}

// =================================================================================================
// Tests
// =================================================================================================
