//! Boundary conditions
//!
//! Two boundaries close the radial domain: the planet's surface, held at a
//! fixed temperature for the whole run, and the inner edge, which is either
//! the core-mantle boundary (clamped to the core's temperature, with the
//! conductive flux handed to the core model) or the planet's centre
//! (zero-flux) when there is no core.
//!
//! Both conditions write directly into the current time column of the
//! temperature matrix, after the interior stencil update for that step.

use nalgebra::DMatrix;

// =================================================================================================
// Surface
// =================================================================================================

/// Dirichlet surface condition: the outermost node is pinned to the surface
/// temperature at every step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceBoundary {
    /// Fixed surface temperature \[K\]
    pub temperature: f64,
}

impl SurfaceBoundary {
    pub fn new(temperature: f64) -> Self {
        Self { temperature }
    }

    /// Pin the surface node in time column `step`
    pub fn apply(&self, temperatures: &mut DMatrix<f64>, step: usize) {
        let surface = temperatures.nrows() - 1;
        temperatures[(surface, step)] = self.temperature;
    }
}

// =================================================================================================
// Inner edge
// =================================================================================================

/// Condition at the innermost mantle node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmbBoundary {
    /// Clamp the innermost node to the core's boundary temperature. While
    /// the core sits at the eutectic this pins the node at the melt point;
    /// once the core cools sensibly the node tracks it down.
    Dirichlet,

    /// Zero-flux at the planet's centre, for the coreless configuration.
    /// Three-point one-sided stencil: T\[0\] = (4 T\[1\] − T\[2\]) / 3.
    NeumannZeroFlux,
}

impl CmbBoundary {
    /// Close the inner edge in time column `step`
    ///
    /// `core_temperature` is only read by the Dirichlet variant.
    pub fn apply(&self, temperatures: &mut DMatrix<f64>, step: usize, core_temperature: f64) {
        match self {
            CmbBoundary::Dirichlet => {
                temperatures[(0, step)] = core_temperature;
            }
            CmbBoundary::NeumannZeroFlux => {
                temperatures[(0, step)] =
                    (4.0 * temperatures[(1, step)] - temperatures[(2, step)]) / 3.0;
            }
        }
    }
}

// =================================================================================================
// Tests
// =================================================================================================
