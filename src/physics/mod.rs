//! Physical model layer
//!
//! Everything with units lives here: the mantle material property providers
//! (constant or temperature-dependent conductivity, density and heat
//! capacity) and the lumped isothermal eutectic core with its freezing state
//! machine.
//!
//! # Architecture
//!
//! The physics is **separate from the numerical solver**:
//! - this module provides the **material behaviour** (property evaluation,
//!   core energy balance),
//! - [`crate::solver`] provides the **method** that advances it in time.
//!
//! The solver consumes the physics through plain method calls
//! ([`MantleProperties::diffusivity`], [`IsothermalEutecticCore::extract_heat`]);
//! no discretisation detail leaks back into the physics.

pub mod core;
pub mod properties;

pub use self::core::{CorePhase, IsothermalEutecticCore};
pub use self::properties::{
    Conductivity, Density, HeatCapacity, MantleProperties, DEFAULT_CONDUCTIVITY,
    DEFAULT_DENSITY, DEFAULT_HEAT_CAPACITY,
};
