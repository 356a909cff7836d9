//! Numerical layer
//!
//! This module turns the physics in [`crate::physics`] into a time-marched
//! solution: discretisation grids, boundary conditions, the explicit FTCS
//! conduction engine and the numerical guard rails around it.
//!
//! # Core Concepts
//!
//! The layer separates concerns the same way throughout:
//!
//! 1. **Grids** (`grid`) — WHERE to solve: radial node layout (with the
//!    regolith mask) and the uniform time axis.
//! 2. **Boundaries** (`boundary`) — how the domain is closed: fixed surface
//!    temperature, and either core coupling or a zero-flux centre.
//! 3. **Engine** (`engine`) — the method itself: the FTCS update, the CMB
//!    power hand-off to the core, and the [`SimulationResult`] it produces.
//!
//! The physics never sees a grid index and the engine never evaluates a
//! material law directly; everything crosses through the property and core
//! interfaces.
//!
//! # Stability
//!
//! FTCS is conditionally stable. The von Neumann bound
//! `kappa * dt / dr^2 <= 1/2` is enforced once at setup against the largest
//! diffusivity the run can reach ([`check_stability`]); a violating
//! configuration is rejected before the first step rather than detected
//! mid-run by watching the field blow up. As a second line of defence the
//! engine still validates every computed column for NaN/Inf.
//!
//! # Error Handling
//!
//! All solver paths return `Result<T, String>`:
//!
//! - configuration errors (geometry, stability, the core-coupling gain,
//!   non-finite properties) surface before any stepping,
//! - runtime errors (NaN/Inf temperatures, core contract violations) abort
//!   the run with the offending step in the message.

// =================================================================================================
// Module Declarations
// =================================================================================================

pub mod boundary;
pub mod engine;
pub mod grid;

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use boundary::{CmbBoundary, SurfaceBoundary};
pub use engine::{run, FtcsSolver, SimulationResult};
pub use grid::{RadialGrid, TimeGrid};

// =================================================================================================
// Helper Functions
// =================================================================================================

use nalgebra::DMatrix;

/// Thermal diffusivity from its constituent properties, κ = k / (ρ c_p)
///
/// # Example
///
/// ```rust
/// use pallas_rs::solver::calculate_diffusivity;
///
/// let kappa = calculate_diffusivity(3.0, 819.0, 3341.0);
/// assert!((kappa - 1.0963794262207911e-6).abs() < 1e-18);
/// ```
pub fn calculate_diffusivity(conductivity: f64, heat_capacity: f64, density: f64) -> f64 {
    conductivity / (density * heat_capacity)
}

/// Check the von Neumann stability bound for the FTCS scheme
///
/// The criterion `kappa * dt / dr^2` must not exceed 1/2 for the largest
/// diffusivity reachable during the run. Called once at setup; a violation
/// is a configuration error, not a runtime one.
///
/// # Errors
///
/// Returns a message with the criterion value and the largest stable
/// timestep, so the fix is obvious from the error alone.
pub fn check_stability(kappa: f64, dt: f64, dr: f64) -> Result<(), String> {
    let criterion = kappa * dt / (dr * dr);
    if !criterion.is_finite() {
        return Err(format!(
            "Stability criterion is not finite (kappa = {}, dt = {}, dr = {})",
            kappa, dt, dr
        ));
    }
    if criterion > 0.5 {
        return Err(format!(
            "Timestep {} s violates the FTCS stability bound: \
             kappa dt / dr^2 = {:.4} > 0.5. Largest stable timestep at \
             dr = {} m is {:.4e} s.",
            dt,
            criterion,
            dr,
            0.5 * dr * dr / kappa
        ));
    }
    Ok(())
}

/// Check the explicit core-coupling gain for a Dirichlet-coupled core
///
/// Each step the core absorbs the conductive CMB power for a full timestep,
/// which changes its temperature by
///
/// ```text
/// gain * (T_base - T[1]),   gain = 3 k dt / (dr rho_core cp_core r_core)
/// ```
///
/// once it cools sensibly. A gain above 1 overshoots: the core lands below
/// the mantle node it is clamped against, the next step's CMB power comes
/// out negative and the core model rejects it. Called once at setup with the
/// largest reachable conductivity; like [`check_stability`], a violation is
/// a configuration error, not a runtime one.
pub fn check_core_coupling(
    conductivity_max: f64,
    dt: f64,
    dr: f64,
    core_density: f64,
    core_cp: f64,
    core_radius: f64,
) -> Result<(), String> {
    let gain = 3.0 * conductivity_max * dt / (dr * core_density * core_cp * core_radius);
    if !gain.is_finite() {
        return Err(format!(
            "Core coupling gain is not finite (k = {}, dt = {}, dr = {}, \
             rho_core = {}, cp_core = {}, r_core = {})",
            conductivity_max, dt, dr, core_density, core_cp, core_radius
        ));
    }
    if gain > 1.0 {
        return Err(format!(
            "Timestep {} s overshoots the explicit core coupling: \
             3 k dt / (dr rho_core cp_core r_core) = {:.4} > 1. The core is \
             too small for this timestep; the largest stable timestep for a \
             {} m core at dr = {} m is {:.4e} s.",
            dt,
            gain,
            core_radius,
            dr,
            dr * core_density * core_cp * core_radius / (3.0 * conductivity_max)
        ));
    }
    Ok(())
}

/// Validate one time column of the temperature field for numerical issues
///
/// NaN can arise from 0/0 or Inf − Inf, Inf from overflow; either means the
/// integration has already gone wrong and continuing would only smear the
/// damage through the rest of the matrix.
pub(crate) fn validate_temperatures(
    temperatures: &DMatrix<f64>,
    step: usize,
) -> Result<(), String> {
    for j in 0..temperatures.nrows() {
        let t = temperatures[(j, step)];
        if t.is_nan() {
            return Err(format!(
                "NaN temperature at node {} step {}. This indicates numerical \
                 instability; try reducing the timestep.",
                j, step
            ));
        }
        if t.is_infinite() {
            return Err(format!(
                "Infinite temperature at node {} step {}. This indicates \
                 numerical overflow; try reducing the timestep.",
                j, step
            ));
        }
    }
    Ok(())
}

// =================================================================================================
// Tests
// =================================================================================================
