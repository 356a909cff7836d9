//! pallas-rs: Planetesimal Thermal Evolution Framework
//!
//! A framework for simulating the conductive cooling of small planetary
//! bodies with isothermal, eutectic-freezing metallic cores. Built with
//! Rust for performance and safety.
//!
//! # Architecture
//!
//! pallas-rs is built on two core principles:
//!
//! 1. **Separation of Physics and Numerics**
//!    - Physical components define material behaviour and heat budgets
//!      (temperature-dependent mantle properties, the core energy balance)
//!    - The solver provides the method (explicit finite differences in
//!      spherical geometry) and the time loop
//!
//! 2. **Reproducibility**
//!    - A run is fully described by one [`params::SimulationParameters`]
//!      value, serializable to JSON
//!    - Results carry their provenance as metadata
//!
//! # Quick Start
//!
//! ```rust
//! use pallas_rs::params::SimulationParameters;
//! use pallas_rs::solver::run;
//!
//! # fn main() -> Result<(), String> {
//! // 1. Describe the body (a small, quick test body here)
//! let mut params = SimulationParameters::default();
//! params.r_planet = 10_000.0; // 10 km radius
//! params.dr = 500.0;
//! params.timestep = 1.0e10;
//! params.max_time = 0.01; // Myr
//! params.reg_fraction = 0.0;
//!
//! // 2. Run the simulation
//! let result = run(&params)?;
//!
//! // 3. Access results
//! println!("Simulation completed!");
//! println!("Time columns: {}", result.len());
//! println!("Mantle nodes: {}", result.n_nodes());
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`physics`]: Material properties and the core energy balance
//! - [`solver`]: Grids, boundaries, and the finite-difference engine
//! - [`analysis`]: Cooling rates, metallographic proxies, core freezing
//! - [`params`]: Run parameters and validation
//! - [`output`]: Result visualization and export
//! - [`sweep`]: Multi-run parameter sweeps

// Core modules
pub mod physics;

pub mod analysis;
pub mod output;
pub mod params;
pub mod solver;
pub mod sweep;

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //!
    //! use pallas_rs::prelude::*;
    //! ```
    pub use crate::analysis::{cooling_rate, core_freezing, depth_and_timing, CoreFreezing,
                              MatchOutcome};
    pub use crate::params::{SimulationParameters,
                            MYR_IN_SECONDS};
    pub use crate::physics::{Conductivity,
                             CorePhase,
                             Density,
                             HeatCapacity,
                             IsothermalEutecticCore,
                             MantleProperties};
    pub use crate::solver::{run,
                            FtcsSolver,
                            SimulationResult};
}
