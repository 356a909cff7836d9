//! Spatial and temporal discretisation
//!
//! The mantle is discretised on a uniform radial grid running from the
//! core-mantle boundary (or the planet's centre, when there is no core) up
//! to the surface, and time on a uniform step grid. Both are immutable once
//! built; the solver only reads them.

use nalgebra::DVector;

use crate::params::SimulationParameters;

// =================================================================================================
// Radial grid
// =================================================================================================

/// Uniform radial node layout for the mantle
///
/// Nodes sit at `r_inner + j * dr` for `j` in `0..len`, stopping below the
/// outer radius; index 0 is the innermost node (CMB or centre), the last
/// index is the surface node. Each node carries a regolith flag: nodes
/// within the regolith thickness of the outer radius diffuse with the
/// constant regolith diffusivity instead of the mantle properties.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGrid {
    radii: DVector<f64>,
    dr: f64,
    r_outer: f64,
    regolith: Vec<bool>,
}

impl RadialGrid {
    /// Build a grid from explicit geometry
    ///
    /// # Errors
    ///
    /// Rejects non-finite or non-positive spacing, inverted radii and grids
    /// with fewer than three nodes (the interior stencil needs both
    /// neighbours).
    pub fn new(
        r_inner: f64,
        r_outer: f64,
        dr: f64,
        regolith_thickness: f64,
    ) -> Result<Self, String> {
        if !(r_inner.is_finite() && r_outer.is_finite() && dr.is_finite()) {
            return Err("Grid radii and spacing must be finite".to_string());
        }
        if dr <= 0.0 {
            return Err(format!("Grid spacing must be positive; got {}", dr));
        }
        if r_inner < 0.0 || r_outer <= r_inner {
            return Err(format!(
                "Grid radii must satisfy 0 <= inner < outer (got inner = {}, outer = {})",
                r_inner, r_outer
            ));
        }
        if !regolith_thickness.is_finite() || regolith_thickness < 0.0 {
            return Err(format!(
                "Regolith thickness must be finite and non-negative; got {}",
                regolith_thickness
            ));
        }

        let n = ((r_outer - r_inner) / dr).ceil() as usize;
        if n < 3 {
            return Err(format!(
                "Grid has only {} node(s); at least 3 are needed",
                n
            ));
        }

        let radii = DVector::from_fn(n, |j, _| r_inner + j as f64 * dr);
        let regolith = radii
            .iter()
            .map(|&r| r_outer - r < regolith_thickness)
            .collect();

        Ok(Self {
            radii,
            dr,
            r_outer,
            regolith,
        })
    }

    /// Build the mantle grid a parameter set describes
    pub fn from_params(params: &SimulationParameters) -> Result<Self, String> {
        Self::new(
            params.r_core(),
            params.r_planet,
            params.dr,
            params.regolith_thickness(),
        )
    }

    /// Node radii, innermost first \[m\]
    pub fn radii(&self) -> &DVector<f64> {
        &self.radii
    }

    /// Node spacing \[m\]
    pub fn dr(&self) -> f64 {
        self.dr
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.radii.len()
    }

    /// True when the grid has no nodes (never, by construction)
    pub fn is_empty(&self) -> bool {
        self.radii.is_empty()
    }

    /// Index of the surface node
    pub fn surface_index(&self) -> usize {
        self.radii.len() - 1
    }

    /// Radius of the innermost node \[m\]
    pub fn inner_radius(&self) -> f64 {
        self.radii[0]
    }

    /// Outer (planet) radius the grid was built against \[m\]
    pub fn outer_radius(&self) -> f64 {
        self.r_outer
    }

    /// Whether node `j` lies inside the regolith layer
    pub fn is_regolith(&self, j: usize) -> bool {
        self.regolith[j]
    }

    /// Depth of node `j` below the planet's surface \[m\]
    pub fn depth(&self, j: usize) -> f64 {
        self.r_outer - self.radii[j]
    }

    /// Number of radial bins the core occupies at this spacing
    ///
    /// Used to shape the core temperature sheet so core and mantle stack in
    /// depth-time plots.
    pub fn n_core_bins(&self) -> usize {
        (self.radii[0] / self.dr).floor() as usize
    }
}

// =================================================================================================
// Time grid
// =================================================================================================

/// Uniform timestep layout
///
/// Step `i` sits at `i * dt`; index 0 is the initial condition. Times are
/// computed directly from the index rather than accumulated, so long runs
/// do not drift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeGrid {
    dt: f64,
    n_steps: usize,
}

impl TimeGrid {
    /// Build a grid covering `total_time` seconds at step `dt`
    pub fn new(total_time: f64, dt: f64) -> Result<Self, String> {
        if !(total_time.is_finite() && dt.is_finite()) {
            return Err("Total time and timestep must be finite".to_string());
        }
        if dt <= 0.0 {
            return Err(format!("Timestep must be positive; got {}", dt));
        }
        if total_time < dt {
            return Err(format!(
                "Total time {} s is shorter than one timestep {} s",
                total_time, dt
            ));
        }
        Ok(Self {
            dt,
            n_steps: (total_time / dt).floor() as usize + 1,
        })
    }

    /// Build the time grid a parameter set describes
    pub fn from_params(params: &SimulationParameters) -> Result<Self, String> {
        Self::new(params.max_time_seconds(), params.timestep)
    }

    /// Timestep \[s\]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Number of time points, initial condition included
    pub fn len(&self) -> usize {
        self.n_steps
    }

    /// True when the grid has no points (never, by construction)
    pub fn is_empty(&self) -> bool {
        self.n_steps == 0
    }

    /// Time at step `i` \[s\]
    pub fn time_at(&self, i: usize) -> f64 {
        i as f64 * self.dt
    }

    /// All time points as a vector \[s\]
    pub fn times(&self) -> DVector<f64> {
        DVector::from_fn(self.n_steps, |i, _| self.time_at(i))
    }
}

// =================================================================================================
// Tests
// =================================================================================================
