//! Isothermal eutectic core model
//!
//! The core is treated as a single isothermal lump of eutectic Fe-FeS: while
//! molten at the melting point its temperature is pinned and every joule
//! extracted across the core-mantle boundary draws down a finite latent-heat
//! budget; once that budget is exactly depleted the whole core is solid and
//! further extraction cools it sensibly. The phase progression is an explicit
//! state machine so the freezing milestones are observable rather than
//! inferred from temperature wiggles.
//!
//! # Design
//!
//! Heat flow is signed from the core's point of view: positive power means
//! heat leaving the core across the CMB. The solver computes that flux from
//! the innermost mantle nodes and hands it over once per step; supplying a
//! negative or non-finite power is a caller contract violation and is
//! rejected before any state changes.
//!
//! Latent depletion is exact. The step that exhausts the budget banks only
//! the remaining joules as latent heat; any surplus in that same step is
//! spent on sensible cooling, so the cumulative latent heat never exceeds
//! mass × specific latent heat and the temperature never dips while any
//! latent budget remains.
//!
//! # Example
//!
//! ```rust
//! use pallas_rs::physics::{CorePhase, IsothermalEutecticCore};
//!
//! let mut core = IsothermalEutecticCore::new(
//!     1600.0,    // initial temperature [K]
//!     1200.0,    // eutectic melting temperature [K]
//!     125_000.0, // outer radius [m]
//!     0.0,       // inner radius [m]
//!     7800.0,    // density [kg/m^3]
//!     850.0,     // heat capacity [J/(kg K)]
//!     270_000.0, // specific latent heat [J/kg]
//! ).unwrap();
//!
//! assert_eq!(core.phase(), CorePhase::Molten);
//! core.extract_heat(1.0e12, 1.0e11).unwrap();
//! assert!(core.frozen_fraction() >= 0.0);
//! ```

use std::f64::consts::PI;

use nalgebra::{DMatrix, DVector};

// =================================================================================================
// Phase state machine
// =================================================================================================

/// Freezing state of the lumped core
///
/// Transitions are one-way: `Molten` → `FullyFrozen` when the latent-heat
/// budget is exactly depleted, then `FullyFrozen` → `FrozenCooling` on the
/// first sensible-cooling extraction afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorePhase {
    /// Latent budget not yet depleted; temperature pinned at the melt point
    /// (or cooling toward it if initialised superheated)
    Molten,

    /// Budget depleted this instant, no post-freeze cooling applied yet
    FullyFrozen,

    /// Solid core cooling sensibly below the melt point
    FrozenCooling,
}

// =================================================================================================
// Core model
// =================================================================================================

/// Lumped isothermal eutectic core with latent-heat bookkeeping
///
/// Construct once per run, couple to the solver through
/// [`extract_heat`](Self::extract_heat) and
/// [`boundary_temperature`](Self::boundary_temperature), and read the
/// per-step history back after the run.
#[derive(Debug, Clone)]
pub struct IsothermalEutecticCore {
    temperature: f64,
    melting_temperature: f64,
    outer_radius: f64,
    mass: f64,
    heat_capacity: f64,
    max_latent: f64,
    latent: f64,
    phase: CorePhase,
    temperature_history: Vec<f64>,
    latent_history: Vec<f64>,
    freeze_step: Option<usize>,
}

impl IsothermalEutecticCore {
    /// Create a core from its geometry and material properties
    ///
    /// The latent-heat budget is mass × `specific_latent_heat`, with
    /// mass = density × (4/3)π(r_outer³ − r_inner³). A zero-radius core
    /// (the coreless conductive-sphere configuration) is valid and starts
    /// fully frozen with nothing to extract.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for non-finite inputs, negative or
    /// inverted radii, or non-positive density, heat capacity or latent heat.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        initial_temperature: f64,
        melting_temperature: f64,
        outer_radius: f64,
        inner_radius: f64,
        density: f64,
        heat_capacity: f64,
        specific_latent_heat: f64,
    ) -> Result<Self, String> {
        let inputs = [
            initial_temperature,
            melting_temperature,
            outer_radius,
            inner_radius,
            density,
            heat_capacity,
            specific_latent_heat,
        ];
        if inputs.iter().any(|v| !v.is_finite()) {
            return Err("Core parameters must all be finite".to_string());
        }
        if inner_radius < 0.0 || outer_radius < inner_radius {
            return Err(format!(
                "Core radii must satisfy 0 <= inner <= outer (got inner = {}, outer = {})",
                inner_radius, outer_radius
            ));
        }
        if density <= 0.0 || heat_capacity <= 0.0 || specific_latent_heat <= 0.0 {
            return Err(
                "Core density, heat capacity and latent heat must be positive".to_string(),
            );
        }

        let volume = 4.0 / 3.0 * PI * (outer_radius.powi(3) - inner_radius.powi(3));
        let mass = density * volume;
        let max_latent = mass * specific_latent_heat;

        // A massless core has no latent budget and nothing to cool.
        let phase = if mass > 0.0 {
            CorePhase::Molten
        } else {
            CorePhase::FrozenCooling
        };

        Ok(Self {
            temperature: initial_temperature,
            melting_temperature,
            outer_radius,
            mass,
            heat_capacity,
            max_latent,
            latent: 0.0,
            phase,
            temperature_history: Vec::new(),
            latent_history: Vec::new(),
            freeze_step: None,
        })
    }

    /// Pre-charge the latent accounting, as if part of the core had already
    /// frozen before the run starts
    pub fn with_initial_latent(mut self, latent: f64) -> Result<Self, String> {
        if !latent.is_finite() || latent < 0.0 {
            return Err("Initial latent heat must be finite and non-negative".to_string());
        }
        if latent > self.max_latent {
            return Err(format!(
                "Initial latent heat {} J exceeds the budget {} J",
                latent, self.max_latent
            ));
        }
        self.latent = latent;
        Ok(self)
    }

    // ---------------------------------------------------------------------------------------------
    // Heat extraction
    // ---------------------------------------------------------------------------------------------

    /// Extract heat across the CMB at a given power over one timestep
    ///
    /// Positive power is heat leaving the core. Negative or non-finite power
    /// (or timestep) is rejected with no state change.
    pub fn extract_heat(&mut self, power: f64, dt: f64) -> Result<(), String> {
        if !power.is_finite() || power < 0.0 {
            return Err(format!(
                "CMB power must be finite and non-negative (heat leaving the core); got {}",
                power
            ));
        }
        if !dt.is_finite() || dt <= 0.0 {
            return Err(format!("Timestep must be finite and positive; got {}", dt));
        }
        self.extract_energy(power * dt)
    }

    /// Extract a fixed amount of energy from the core
    ///
    /// Energy-domain equivalent of [`extract_heat`](Self::extract_heat):
    /// superheat is shed sensibly down to the melt point, then the latent
    /// budget absorbs heat with the temperature pinned, and once the budget
    /// is exactly depleted the remainder cools the solid core.
    pub fn extract_energy(&mut self, energy: f64) -> Result<(), String> {
        if !energy.is_finite() || energy < 0.0 {
            return Err(format!(
                "Extracted energy must be finite and non-negative; got {}",
                energy
            ));
        }
        if self.mass == 0.0 {
            if energy > 0.0 {
                return Err("Cannot extract energy from a zero-mass core".to_string());
            }
            return Ok(());
        }

        let mut remaining = energy;

        // Shed superheat first: sensible cooling down to the melt point.
        if self.phase == CorePhase::Molten && self.temperature > self.melting_temperature {
            let to_melt =
                self.mass * self.heat_capacity * (self.temperature - self.melting_temperature);
            if remaining <= to_melt {
                self.temperature -= remaining / (self.mass * self.heat_capacity);
                return Ok(());
            }
            self.temperature = self.melting_temperature;
            remaining -= to_melt;
        }

        // Latent stage: temperature pinned, budget drawn down exactly.
        if self.phase == CorePhase::Molten {
            let budget = self.max_latent - self.latent;
            if remaining < budget {
                self.latent += remaining;
                return Ok(());
            }
            self.latent = self.max_latent;
            self.phase = CorePhase::FullyFrozen;
            self.freeze_step = Some(self.temperature_history.len() + 1);
            remaining -= budget;
            if remaining == 0.0 {
                return Ok(());
            }
        }

        // Sensible cooling of the solid core.
        self.temperature -= remaining / (self.mass * self.heat_capacity);
        self.phase = CorePhase::FrozenCooling;
        Ok(())
    }

    /// Append the current temperature and cumulative latent heat to the
    /// per-step history. The solver calls this exactly once per step, after
    /// the step's extraction.
    pub fn record_state(&mut self) {
        self.temperature_history.push(self.temperature);
        self.latent_history.push(self.latent);
    }

    // ---------------------------------------------------------------------------------------------
    // Observers
    // ---------------------------------------------------------------------------------------------

    /// Current core temperature \[K\]
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Temperature imposed on the mantle side of the CMB \[K\]
    pub fn boundary_temperature(&self) -> f64 {
        self.temperature
    }

    /// Eutectic melting temperature \[K\]
    pub fn melting_temperature(&self) -> f64 {
        self.melting_temperature
    }

    /// Outer (CMB) radius \[m\]
    pub fn outer_radius(&self) -> f64 {
        self.outer_radius
    }

    /// Core mass \[kg\]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Current freezing phase
    pub fn phase(&self) -> CorePhase {
        self.phase
    }

    /// Cumulative latent heat extracted so far \[J\]
    pub fn latent_heat_extracted(&self) -> f64 {
        self.latent
    }

    /// Total latent-heat budget, mass × specific latent heat \[J\]
    pub fn max_latent_heat(&self) -> f64 {
        self.max_latent
    }

    /// Fraction of the latent budget spent, in \[0, 1\]
    ///
    /// Non-decreasing over a run; a zero-mass core reports 1.
    pub fn frozen_fraction(&self) -> f64 {
        if self.max_latent == 0.0 {
            1.0
        } else {
            self.latent / self.max_latent
        }
    }

    /// Step index (1-based, matching the solver's time columns) at which the
    /// latent budget was depleted, if it has been
    pub fn freeze_step(&self) -> Option<usize> {
        self.freeze_step
    }

    /// Cumulative latent heat per recorded step \[J\]
    pub fn latent_history(&self) -> &[f64] {
        &self.latent_history
    }

    /// Recorded core temperature per step, as a vector
    pub fn temperature_array_1d(&self) -> DVector<f64> {
        DVector::from_column_slice(&self.temperature_history)
    }

    /// Recorded core temperature broadcast over radial bins, (bins × steps)
    ///
    /// The core is isothermal, so every row repeats the same history; the
    /// 2-D shape exists so core and mantle fields stack in depth-time plots.
    pub fn temperature_array_2d(&self, n_radial_bins: usize) -> DMatrix<f64> {
        DMatrix::from_fn(n_radial_bins, self.temperature_history.len(), |_, step| {
            self.temperature_history[step]
        })
    }
}

// =================================================================================================
// Tests
// =================================================================================================
