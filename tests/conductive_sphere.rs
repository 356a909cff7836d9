//! Accuracy tests against the conduction equation's closed-form solution
//!
//! A coreless sphere with constant properties, uniform initial temperature
//! and a fixed surface temperature has the classic series solution
//!
//! ```text
//! T(r,t) = Ts + (Ti - Ts) * (2R/(pi r)) * sum_n [(-1)^(n+1)/n] sin(n pi r/R) exp(-n^2 pi^2 Fo)
//! ```
//!
//! with Fo = kappa t / R^2. These tests run the solver on exactly that
//! configuration and compare node temperatures against the series.

use std::f64::consts::PI;

use pallas_rs::solver::run;

mod common;
use common::coreless_constant_params;

/// Series solution for a uniformly hot sphere with a fixed surface
/// temperature; `radius` is the radius of the pinned surface node.
fn analytic_temperature(
    r: f64,
    t: f64,
    radius: f64,
    kappa: f64,
    t_init: f64,
    t_surface: f64,
) -> f64 {
    let fourier = kappa * t / (radius * radius);
    let mut sum = 0.0;
    for n in 1..=200 {
        let nf = n as f64;
        let sign = if n % 2 == 0 { -1.0 } else { 1.0 };
        let decay = (-nf * nf * PI * PI * fourier).exp();
        // (R/(n pi r)) sin(n pi r/R) -> 1 as r -> 0
        let spatial = if r.abs() < 1.0e-9 {
            1.0
        } else {
            radius / (nf * PI * r) * (nf * PI * r / radius).sin()
        };
        sum += 2.0 * sign * spatial * decay;
    }
    t_surface + (t_init - t_surface) * sum
}

fn max_error_vs_analytic(r_planet: f64, dr: f64) -> f64 {
    let mut params = coreless_constant_params("analytic", r_planet);
    params.dr = dr;
    params.timestep = 2.0e11;
    params.max_time = 50.0;
    params.temp_init = 1000.0;
    let result = run(&params).unwrap();

    let kappa = params.mantle_cond_value
        / (params.mantle_density_value * params.mantle_heat_cap_value);
    // The surface node is the radius the analytic problem sees
    let surface = result.n_nodes() - 1;
    let radius = result.radii[surface];

    let mut worst = 0.0_f64;
    for &column in &[result.len() / 8, result.len() / 2, result.len() - 1] {
        let t = result.times[column];
        for j in 0..surface {
            let analytic = analytic_temperature(
                result.radii[j],
                t,
                radius,
                kappa,
                params.temp_init,
                params.temp_surface,
            );
            worst = worst.max((result.mantle_temperatures[(j, column)] - analytic).abs());
        }
    }
    worst
}

#[test]
fn test_sphere_matches_series_solution() {
    // 1000 K body, 50 km radius, 50 Myr: compare early, mid-run and at the
    // end, every node
    let worst = max_error_vs_analytic(50_000.0, 1000.0);
    println!("worst error vs series solution: {worst:.2} K");
    assert!(worst < 30.0, "worst error {} K vs series solution", worst);
}

#[test]
fn test_refining_the_grid_does_not_worsen_accuracy() {
    let coarse = max_error_vs_analytic(50_000.0, 2000.0);
    let fine = max_error_vs_analytic(50_000.0, 1000.0);
    println!("coarse error {coarse:.2} K, fine error {fine:.2} K");
    assert!(coarse < 60.0);
    assert!(fine <= coarse + 2.0);
}

#[test]
fn test_profile_stays_monotonic_while_cooling() {
    let mut params = coreless_constant_params("monotone", 50_000.0);
    params.timestep = 2.0e11;
    params.max_time = 20.0;
    let result = run(&params).unwrap();

    let last = result.len() - 1;
    for j in 0..result.n_nodes() - 1 {
        let inner = result.mantle_temperatures[(j, last)];
        let outer = result.mantle_temperatures[(j + 1, last)];
        assert!(
            inner >= outer - 1.0e-9,
            "node {} ({} K) cooler than node {} ({} K)",
            j,
            inner,
            j + 1,
            outer
        );
    }
}
