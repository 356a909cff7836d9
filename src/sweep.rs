//! Parameter sweeps
//!
//! Planetesimal studies rarely run one model: they scan radius, accretion
//! temperature or regolith thickness across tens of parameter sets and
//! compare the outcomes. This module runs such a sweep, one full simulation
//! per parameter set.
//!
//! # Design
//!
//! A sweep is embarrassingly parallel at run granularity: each simulation
//! owns its grid, its core, and its result matrix, and no state is shared
//! between runs. With the `parallel` feature enabled the runs are spread
//! over rayon's thread pool; otherwise they execute sequentially with
//! identical output ordering.
//!
//! Individual failures do not abort the sweep. Each slot in the returned
//! vector holds that run's own `Result`, in the same order as the input,
//! so a bad parameter set in the middle of a scan costs one slot and a log
//! line, not the whole batch.
//!
//! # Example
//!
//! ```rust,ignore
//! use pallas_rs::params::SimulationParameters;
//! use pallas_rs::sweep::run_sweep;
//!
//! let sets: Vec<SimulationParameters> = (1..=5)
//!     .map(|i| {
//!         let mut p = SimulationParameters::default();
//!         p.run_id = format!("r{}", i * 100);
//!         p.r_planet = i as f64 * 100_000.0;
//!         p
//!     })
//!     .collect();
//!
//! for outcome in run_sweep(&sets) {
//!     match outcome {
//!         Ok(result) => println!("{} columns", result.len()),
//!         Err(e) => eprintln!("run failed: {e}"),
//!     }
//! }
//! ```

use crate::params::SimulationParameters;
use crate::solver::{run, SimulationResult};

/// Run one full simulation per parameter set
///
/// Results come back in input order. A failed run occupies its slot with
/// the error instead of aborting the rest of the sweep.
pub fn run_sweep(
    parameter_sets: &[SimulationParameters],
) -> Vec<Result<SimulationResult, String>> {
    let run_one = |params: &SimulationParameters| -> Result<SimulationResult, String> {
        run(params).map_err(|e| {
            log::warn!("run '{}' failed: {e}", params.run_id);
            format!("run '{}' failed: {}", params.run_id, e)
        })
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        parameter_sets.par_iter().map(run_one).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        parameter_sets.iter().map(run_one).collect()
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn small_params(run_id: &str, r_planet: f64) -> SimulationParameters {
        let mut params = SimulationParameters::default();
        params.run_id = run_id.to_string();
        params.r_planet = r_planet;
        params.dr = 500.0;
        params.timestep = 1.0e10;
        params.max_time = 0.01;
        params.reg_fraction = 0.0;
        params
    }

    #[test]
    fn test_empty_sweep() {
        assert!(run_sweep(&[]).is_empty());
    }

    #[test]
    fn test_sweep_preserves_order_and_isolates_failures() {
        let mut bad = small_params("bad", 10_000.0);
        bad.timestep = -1.0; // fails validation, not the sweep

        let sets = vec![
            small_params("a", 10_000.0),
            bad,
            small_params("b", 12_000.0),
        ];
        let outcomes = run_sweep(&sets);

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].is_ok());
        assert!(outcomes[2].is_ok());

        let err = outcomes[1].as_ref().unwrap_err();
        assert!(err.contains("bad"), "error names the run: {err}");

        // Ordering: each ok slot matches its parameter set's geometry
        let a = outcomes[0].as_ref().unwrap();
        let b = outcomes[2].as_ref().unwrap();
        assert!(b.n_nodes() > a.n_nodes());
    }
}
