//! FTCS spherical conduction engine
//!
//! # Mathematical Background
//!
//! The mantle obeys the radial heat conduction equation with
//! temperature-dependent material properties:
//!
//! ```text
//! rho(T) cp(T) dT/dt = 1/r^2 d/dr ( r^2 k(T) dT/dr )
//! ```
//!
//! The engine advances it with the forward-time central-space (FTCS)
//! explicit scheme. Expanding the divergence gives three stencil terms per
//! interior node and step:
//!
//! ```text
//! A = dt/(rho cp) * dk/dT * (T[j+1] - T[j-1])^2 / (4 dr^2)   non-linear
//! B = dt/(rho cp) * k / (r_j dr) * (T[j+1] - T[j-1])          spherical
//! C = dt/(rho cp) * k / dr^2 * (T[j+1] - 2 T[j] + T[j-1])     diffusion
//! ```
//!
//! with k, rho, cp and dk/dT re-evaluated at the node's current temperature
//! on every step — property values are never cached across steps. Regolith
//! nodes instead diffuse with a constant regolith diffusivity and carry no
//! non-linear term.
//!
//! # Stability
//!
//! The scheme is conditionally stable: the von Neumann bound
//!
//! ```text
//! kappa_max * dt / dr^2 <= 1/2
//! ```
//!
//! must hold for the largest diffusivity reachable anywhere in the run. It
//! is checked once at setup and a violation is a configuration error; no
//! stepping happens after a failed check.
//!
//! # Core coupling
//!
//! Each step, after the boundary conditions close the column, the engine
//! evaluates the conductive power crossing the CMB from the innermost two
//! nodes and hands it to the core model, which does its own latent-heat
//! bookkeeping. The innermost mantle node is clamped to the core's boundary
//! temperature, so once the core starts cooling sensibly the mantle base
//! tracks it down.
//!
//! This coupling is itself an explicit update and carries its own bound: if
//! one step of CMB power would drop the core below the mantle node it is
//! clamped against (a core too small for the timestep), the configuration is
//! rejected at setup alongside the von Neumann check.

use std::collections::HashMap;
use std::f64::consts::PI;

use chrono::Utc;
use nalgebra::{DMatrix, DVector};
use ndarray::Array2;

use crate::params::{SimulationParameters, MYR_IN_SECONDS};
use crate::physics::{IsothermalEutecticCore, MantleProperties};
use crate::solver::boundary::{CmbBoundary, SurfaceBoundary};
use crate::solver::grid::{RadialGrid, TimeGrid};
use crate::solver::{check_core_coupling, check_stability, validate_temperatures};

// =================================================================================================
// Simulation result
// =================================================================================================

/// Complete output of one run
///
/// Owns the full space × time temperature matrices at native resolution (no
/// subsampling), the matching time axis, the core's latent-heat history and
/// a free-form metadata map for diagnostics and reproducibility. Read-only
/// by convention once the solver returns it.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    /// Time at each column \[s\]
    pub times: DVector<f64>,

    /// Radius of each mantle node, innermost first \[m\]
    pub radii: DVector<f64>,

    /// Mantle temperature, (radial node × time) \[K\], innermost node first
    pub mantle_temperatures: DMatrix<f64>,

    /// Core temperature broadcast over radial bins, (bin × time) \[K\]
    pub core_temperatures: DMatrix<f64>,

    /// Cumulative latent heat extracted from the core at each column \[J\]
    pub latent_history: Vec<f64>,

    /// Time at which the core's latent budget was depleted, if it was \[s\]
    pub time_fully_frozen: Option<f64>,

    /// Timestep the run used \[s\]
    pub dt: f64,

    /// Diagnostics: solver name, grid shape, run label, timestamps
    pub metadata: HashMap<String, String>,
}

impl SimulationResult {
    /// Number of time points, initial condition included
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// True when the result holds no time points
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Number of mantle nodes
    pub fn n_nodes(&self) -> usize {
        self.mantle_temperatures.nrows()
    }

    /// Attach a metadata entry
    pub fn add_metadata(&mut self, key: &str, value: &str) {
        self.metadata.insert(key.to_string(), value.to_string());
    }

    /// Mantle temperature matrix as an `ndarray` array, for the output layer
    pub fn mantle_temperature_array(&self) -> Array2<f64> {
        matrix_to_array(&self.mantle_temperatures)
    }

    /// Core and mantle temperatures stacked by radius (core bins below the
    /// mantle nodes), for depth-time plots spanning the whole body
    pub fn full_temperature_array(&self) -> Array2<f64> {
        let core_rows = self.core_temperatures.nrows();
        let mantle_rows = self.mantle_temperatures.nrows();
        Array2::from_shape_fn((core_rows + mantle_rows, self.len()), |(r, c)| {
            if r < core_rows {
                self.core_temperatures[(r, c)]
            } else {
                self.mantle_temperatures[(r - core_rows, c)]
            }
        })
    }
}

fn matrix_to_array(m: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((m.nrows(), m.ncols()), |(r, c)| m[(r, c)])
}

// =================================================================================================
// Solver
// =================================================================================================

/// Explicit FTCS solver for spherical mantle conduction coupled to an
/// isothermal core
///
/// The solver itself is stateless configuration (which boundary conditions
/// close the domain); all evolving state lives in the temperature matrix
/// and the core model passed to [`solve`](Self::solve).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FtcsSolver {
    surface: SurfaceBoundary,
    cmb: CmbBoundary,
}

impl FtcsSolver {
    /// Build a solver with explicit boundary conditions
    pub fn new(surface: SurfaceBoundary, cmb: CmbBoundary) -> Self {
        Self { surface, cmb }
    }

    /// Build the solver a parameter set implies: Dirichlet CMB coupling when
    /// there is a core, zero-flux at the centre otherwise
    pub fn from_params(params: &SimulationParameters) -> Self {
        let cmb = if params.core_size_factor > 0.0 {
            CmbBoundary::Dirichlet
        } else {
            CmbBoundary::NeumannZeroFlux
        };
        Self::new(SurfaceBoundary::new(params.temp_surface), cmb)
    }

    /// Human-readable scheme name, used in metadata
    pub fn name(&self) -> &'static str {
        "FTCS spherical conduction"
    }

    /// Run the simulation to completion
    ///
    /// Validates the configuration (geometry, stability bound, property
    /// finiteness over the reachable temperature range) before the first
    /// step. The core model is driven in place; pass a fresh core per run.
    ///
    /// # Errors
    ///
    /// Configuration errors surface before any stepping. During stepping,
    /// a NaN/Inf temperature or a contract violation in the core coupling
    /// aborts the run with a message naming the step.
    pub fn solve(
        &self,
        params: &SimulationParameters,
        properties: &MantleProperties,
        core: &mut IsothermalEutecticCore,
    ) -> Result<SimulationResult, String> {
        params.validate()?;
        let grid = RadialGrid::from_params(params)?;
        let time = TimeGrid::from_params(params)?;

        // Setup checks: the run must be finite and stable everywhere it can
        // reach before a single step is taken.
        let t_cold = params
            .temp_surface
            .min(params.temp_init)
            .min(params.core_temp_init);
        let t_hot = params
            .temp_surface
            .max(params.temp_init)
            .max(params.core_temp_init);
        properties.check_finite(t_cold, t_hot)?;
        let kappa_max = properties
            .max_diffusivity(t_cold, t_hot)
            .max(params.kappa_reg);
        check_stability(kappa_max, time.dt(), grid.dr())?;
        if self.cmb == CmbBoundary::Dirichlet {
            let k_max = properties.max_conductivity(t_cold, t_hot);
            check_core_coupling(
                k_max,
                time.dt(),
                grid.dr(),
                params.core_density,
                params.core_cp,
                core.outer_radius(),
            )?;
        }

        let n_r = grid.len();
        let n_t = time.len();
        let dt = time.dt();
        let dr = grid.dr();
        let dr2 = dr * dr;
        let cmb_area = 4.0 * PI * core.outer_radius().powi(2);

        let core_temp_initial = core.temperature();
        let latent_initial = core.latent_heat_extracted();

        let mut temperatures = DMatrix::from_element(n_r, n_t, params.temp_init);
        self.surface.apply(&mut temperatures, 0);
        self.cmb.apply(&mut temperatures, 0, core_temp_initial);

        let mut last_step = n_t - 1;
        for i in 1..n_t {
            for j in 1..n_r - 1 {
                let t_here = temperatures[(j, i - 1)];
                let t_above = temperatures[(j + 1, i - 1)];
                let t_below = temperatures[(j - 1, i - 1)];
                let radius = grid.radii()[j];

                temperatures[(j, i)] = if grid.is_regolith(j) {
                    // Constant regolith diffusivity, no non-linear term
                    let b = params.kappa_reg * dt / (radius * dr) * (t_above - t_below);
                    let c =
                        params.kappa_reg * dt / dr2 * (t_above - 2.0 * t_here + t_below);
                    t_here + b + c
                } else {
                    let k = properties.conductivity.at(t_here, radius);
                    let dkdt = properties.conductivity.gradient(t_here);
                    let scale = dt
                        / (properties.density.at(t_here)
                            * properties.heat_capacity.at(t_here));

                    let a = scale * dkdt * (t_above - t_below).powi(2) / (4.0 * dr2);
                    let b = scale * k / (radius * dr) * (t_above - t_below);
                    let c = scale * k / dr2 * (t_above - 2.0 * t_here + t_below);
                    t_here + a + b + c
                };
            }

            self.surface.apply(&mut temperatures, i);
            self.cmb
                .apply(&mut temperatures, i, core.boundary_temperature());
            validate_temperatures(&temperatures, i)?;

            // Hand the conductive CMB power to the core; positive power is
            // heat leaving the core.
            if self.cmb == CmbBoundary::Dirichlet {
                let t_base = temperatures[(0, i)];
                let k_base = properties.conductivity.at(t_base, grid.inner_radius());
                let power = cmb_area * k_base * (t_base - temperatures[(1, i)]) / dr;
                core.extract_heat(power, dt)
                    .map_err(|e| format!("Step {}: {}", i, e))?;
            }
            core.record_state();

            if let (Some(extra), Some(freeze_step)) =
                (params.post_freeze_time, core.freeze_step())
            {
                if time.time_at(i) >= time.time_at(freeze_step) + extra * MYR_IN_SECONDS {
                    last_step = i;
                    break;
                }
            }
        }

        // Assemble the result, truncating if the run stopped early.
        let n_cols = last_step + 1;
        if n_cols < n_t {
            temperatures = temperatures.columns(0, n_cols).into_owned();
        }
        let times = DVector::from_fn(n_cols, |i, _| time.time_at(i));

        let core_history = core.temperature_array_1d();
        let core_temperatures =
            DMatrix::from_fn(grid.n_core_bins(), n_cols, |_, i| {
                if i == 0 {
                    core_temp_initial
                } else {
                    core_history[i - 1]
                }
            });

        let mut latent_history = Vec::with_capacity(n_cols);
        latent_history.push(latent_initial);
        latent_history.extend_from_slice(&core.latent_history()[..n_cols - 1]);

        let time_fully_frozen = core
            .freeze_step()
            .filter(|&s| s <= last_step)
            .map(|s| time.time_at(s));

        let mut result = SimulationResult {
            times,
            radii: grid.radii().clone(),
            mantle_temperatures: temperatures,
            core_temperatures,
            latent_history,
            time_fully_frozen,
            dt,
            metadata: HashMap::new(),
        };
        result.add_metadata("solver", self.name());
        result.add_metadata("run_id", &params.run_id);
        result.add_metadata("mantle nodes", &n_r.to_string());
        result.add_metadata("time steps", &n_cols.to_string());
        result.add_metadata("dt", &dt.to_string());
        result.add_metadata("dr", &dr.to_string());
        result.add_metadata("total time", &time.time_at(last_step).to_string());
        result.add_metadata("created", &Utc::now().to_rfc3339());
        Ok(result)
    }
}

// =================================================================================================
// Convenience entry point
// =================================================================================================

/// Run a full simulation from a parameter set alone
///
/// Assembles the property providers, core model and solver the parameters
/// describe and runs to completion. Equivalent to wiring the pieces by hand;
/// exists so parameter sweeps and examples stay one call long.
///
/// # Example
///
/// ```rust,no_run
/// use pallas_rs::params::SimulationParameters;
/// use pallas_rs::solver::run;
///
/// let params = SimulationParameters::default();
/// let result = run(&params).unwrap();
/// println!("{} time points", result.len());
/// ```
pub fn run(params: &SimulationParameters) -> Result<SimulationResult, String> {
    params.validate()?;
    let properties = params.mantle_properties();
    let mut core = IsothermalEutecticCore::new(
        params.core_temp_init,
        params.temp_core_melting,
        params.r_core(),
        0.0,
        params.core_density,
        params.core_cp,
        params.core_latent_heat,
    )?;
    FtcsSolver::from_params(params).solve(params, &properties, &mut core)
}

// =================================================================================================
// Tests
// =================================================================================================
