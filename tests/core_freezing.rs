//! End-to-end core solidification behaviour
//!
//! Runs a small body long enough for its eutectic core to shed its
//! superheat, freeze completely and start cooling sensibly, then checks the
//! energy bookkeeping and the recorded timings against each other.

use std::f64::consts::PI;

use pallas_rs::analysis::core_freezing;
use pallas_rs::solver::run;

mod common;
use common::small_body_params;

#[test]
fn test_small_body_core_freezes_completely() {
    let params = small_body_params("freeze");
    let result = run(&params).unwrap();

    let frozen_at = result
        .time_fully_frozen
        .expect("a 10 km body must freeze its core within 3 Myr");
    assert!(frozen_at > 0.0);
    assert!(frozen_at <= result.times[result.len() - 1]);

    // The latent ledger never runs backwards and ends exactly on the budget
    let budget = params.core_density
        * (4.0 / 3.0)
        * PI
        * params.r_core().powi(3)
        * params.core_latent_heat;
    for pair in result.latent_history.windows(2) {
        assert!(pair[1] >= pair[0], "latent heat extracted decreased");
        assert!(pair[1] <= budget * (1.0 + 1.0e-12));
    }
    let final_latent = *result.latent_history.last().unwrap();
    assert!(
        (final_latent - budget).abs() < budget * 1.0e-9,
        "latent total {} J differs from budget {} J",
        final_latent,
        budget
    );
}

#[test]
fn test_core_pinned_at_melt_point_while_freezing() {
    let params = small_body_params("pinned");
    let result = run(&params).unwrap();
    let freezing = core_freezing(
        &result.core_temperatures,
        &result.times,
        result.time_fully_frozen,
        params.temp_core_melting,
    );
    let onset = freezing.onset.expect("onset recorded");
    let completion = freezing.completion.expect("completion recorded");
    assert!(onset <= completion);

    for i in 0..result.len() {
        let t = result.times[i];
        let core_temp = result.core_temperatures[(0, i)];
        if t < onset {
            // Shedding superheat
            assert!(core_temp >= params.temp_core_melting);
        } else if t > onset && t < completion {
            // Latent phase: isothermal at the melt point
            assert_eq!(core_temp, params.temp_core_melting);
        } else if t > completion {
            assert!(core_temp <= params.temp_core_melting);
        }
    }

    // Sensible cooling after depletion is strictly downhill
    let after: Vec<f64> = (0..result.len())
        .filter(|&i| result.times[i] > completion)
        .map(|i| result.core_temperatures[(0, i)])
        .collect();
    assert!(after.len() > 2, "run should extend past full freezing");
    for pair in after.windows(2) {
        assert!(pair[1] <= pair[0]);
    }
}

#[test]
fn test_timings_are_consistent_across_the_api() {
    let params = small_body_params("consistency");
    let result = run(&params).unwrap();
    let freezing = core_freezing(
        &result.core_temperatures,
        &result.times,
        result.time_fully_frozen,
        params.temp_core_melting,
    );
    assert_eq!(freezing.completion, result.time_fully_frozen);

    // The surface boundary held throughout
    let surface = result.n_nodes() - 1;
    for i in 0..result.len() {
        assert_eq!(result.mantle_temperatures[(surface, i)], params.temp_surface);
    }
}

#[test]
fn test_post_freeze_time_stops_the_run_early() {
    let mut params = small_body_params("early_stop");
    params.post_freeze_time = Some(0.1);
    let result = run(&params).unwrap();

    assert!(
        result.len() < params.n_timesteps(),
        "run should stop before the full schedule"
    );
    let frozen_at = result.time_fully_frozen.expect("core froze before the stop");
    let stop = result.times[result.len() - 1];
    let window = 0.1 * pallas_rs::params::MYR_IN_SECONDS;
    assert!(stop >= frozen_at + window);
    assert!(stop < frozen_at + window + params.timestep);

    // Truncation kept every series the same length
    assert_eq!(result.mantle_temperatures.ncols(), result.len());
    assert_eq!(result.core_temperatures.ncols(), result.len());
    assert_eq!(result.latent_history.len(), result.len());
}
