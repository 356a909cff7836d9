//! Common utilities for integration tests

use pallas_rs::params::SimulationParameters;

/// A 10 km body with a 5 km core: small enough to freeze its core within a
/// few Myr of model time and a few thousand solver steps.
pub fn small_body_params(run_id: &str) -> SimulationParameters {
    let mut params = SimulationParameters::default();
    params.run_id = run_id.to_string();
    params.r_planet = 10_000.0;
    params.dr = 500.0;
    params.timestep = 1.0e10;
    params.max_time = 3.0;
    params.reg_fraction = 0.0;
    params
}

/// A coreless, constant-property body: conduction through it has a closed
/// series solution to compare against.
pub fn coreless_constant_params(run_id: &str, r_planet: f64) -> SimulationParameters {
    let mut params = SimulationParameters::default();
    params.run_id = run_id.to_string();
    params.r_planet = r_planet;
    params.core_size_factor = 0.0;
    params.reg_fraction = 0.0;
    params.cond_constant = true;
    params.density_constant = true;
    params.heat_cap_constant = true;
    params
}
