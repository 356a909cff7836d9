//! JSON parameter and result files
//!
//! A run is reproducible from a single JSON parameter file; this module
//! writes a runnable default file, loads (and validates) parameter files,
//! and saves a post-run summary that pairs the exact parameters used with
//! the headline results, so a results directory is self-describing.
//!
//! Large arrays do not belong in JSON; the temperature matrices go through
//! [`crate::output::export`] instead.

use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::analysis::CoreFreezing;
use crate::params::SimulationParameters;
use crate::solver::SimulationResult;

/// Write a runnable default parameter file
///
/// The file round-trips through [`load_params_from_file`] unchanged.
pub fn make_default_param_file<P: AsRef<Path>>(path: P) -> Result<(), Box<dyn Error>> {
    let params = SimulationParameters::default();
    fs::write(path, serde_json::to_string_pretty(&params)?)?;
    Ok(())
}

/// Load and validate a parameter file
///
/// # Errors
///
/// I/O failures, malformed JSON, and parameter sets that fail
/// [`SimulationParameters::validate`] are all reported; an invalid file
/// never produces a parameter set.
pub fn load_params_from_file<P: AsRef<Path>>(
    path: P,
) -> Result<SimulationParameters, Box<dyn Error>> {
    let contents = fs::read_to_string(path)?;
    let params: SimulationParameters = serde_json::from_str(&contents)?;
    params.validate()?;
    Ok(params)
}

#[derive(Serialize)]
struct RunResults {
    time_points: usize,
    final_time: f64,
    freeze_onset: Option<f64>,
    time_fully_frozen: Option<f64>,
    final_core_temperature: Option<f64>,
    final_surface_temperature: f64,
}

#[derive(Serialize)]
struct RunRecord<'a> {
    parameters: &'a SimulationParameters,
    results: RunResults,
}

/// Save a post-run summary: the parameters used plus the headline results
pub fn save_params_and_results<P: AsRef<Path>>(
    path: P,
    params: &SimulationParameters,
    result: &SimulationResult,
    freezing: &CoreFreezing,
) -> Result<(), Box<dyn Error>> {
    if result.is_empty() {
        return Err("Cannot summarise an empty result".into());
    }
    let last = result.len() - 1;
    let record = RunRecord {
        parameters: params,
        results: RunResults {
            time_points: result.len(),
            final_time: result.times[last],
            freeze_onset: freezing.onset,
            time_fully_frozen: freezing.completion,
            final_core_temperature: (result.core_temperatures.nrows() > 0)
                .then(|| result.core_temperatures[(0, last)]),
            final_surface_temperature: result.mantle_temperatures
                [(result.n_nodes() - 1, last)],
        },
    };
    fs::write(path, serde_json::to_string_pretty(&record)?)?;
    Ok(())
}

// =================================================================================================
// Tests
// =================================================================================================
