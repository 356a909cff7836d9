//! Integration coverage for the temperature-dependent property path and the
//! regolith blanket
//!
//! The engine has three stencil flavours: constant properties (no non-linear
//! term in practice), the full olivine fits (non-zero dk/dT), and regolith
//! nodes (constant regolith diffusivity, no non-linear term). The analytic
//! suites all run the first; these tests run the other two on a real body
//! and check the fields stay physical.

use pallas_rs::params::SimulationParameters;
use pallas_rs::solver::run;

/// A 50 km body whose regolith is thick enough to cover several nodes
fn blanketed_params(run_id: &str) -> SimulationParameters {
    let mut params = SimulationParameters::default();
    params.run_id = run_id.to_string();
    params.r_planet = 50_000.0;
    params.dr = 1000.0;
    params.reg_fraction = 0.08; // 4 km of regolith: nodes at 47, 48, 49 km
    params
}

#[test]
fn test_variable_properties_with_regolith_stay_physical() {
    let mut params = blanketed_params("variable");
    params.cond_constant = false;
    params.density_constant = false;
    params.heat_cap_constant = false;
    params.timestep = 2.0e10;
    params.max_time = 5.0;
    let result = run(&params).unwrap();

    // Every temperature finite and between the surface and the hot start
    for i in 0..result.len() {
        for j in 0..result.n_nodes() {
            let t = result.mantle_temperatures[(j, i)];
            assert!(t.is_finite(), "non-finite T at node {} column {}", j, i);
            assert!(
                (249.0..=1601.0).contains(&t),
                "T = {} K at node {} column {} outside physical bounds",
                t,
                j,
                i
            );
        }
    }

    // The profile through the regolith and the node beneath it decreases
    // outward: the blanket conducts interior heat towards the cold surface
    let last = result.len() - 1;
    let below_regolith = 21; // r = 46 km
    for j in below_regolith..result.n_nodes() - 1 {
        assert!(
            result.mantle_temperatures[(j, last)]
                >= result.mantle_temperatures[(j + 1, last)] - 1.0e-9,
            "profile inverted between nodes {} and {}",
            j,
            j + 1
        );
    }

    // The olivine fits actually changed the answer versus the constant run
    let mut constant = blanketed_params("constant_control");
    constant.timestep = 2.0e10;
    constant.max_time = 5.0;
    let control = run(&constant).unwrap();
    let mid = result.n_nodes() / 2;
    let difference = (result.mantle_temperatures[(mid, last)]
        - control.mantle_temperatures[(mid, last)])
        .abs();
    assert!(
        difference > 1.0e-3,
        "variable and constant properties gave the same field ({} K apart)",
        difference
    );
}

#[test]
fn test_regolith_blanket_slows_interior_cooling() {
    let mut insulated = blanketed_params("insulated");
    insulated.max_time = 30.0;

    let mut bare = blanketed_params("bare");
    bare.max_time = 30.0;
    bare.reg_fraction = 0.0;

    let with_regolith = run(&insulated).unwrap();
    let without = run(&bare).unwrap();
    assert_eq!(with_regolith.len(), without.len());

    // Node just beneath the regolith (4 km depth): a cold wave reaches it
    // quickly through bare rock, slowly through the low-diffusivity blanket
    let node = 21; // r = 46 km
    let last = with_regolith.len() - 1;
    let insulated_temp = with_regolith.mantle_temperatures[(node, last)];
    let bare_temp = without.mantle_temperatures[(node, last)];
    assert!(
        insulated_temp > bare_temp + 100.0,
        "regolith did not insulate: {} K with versus {} K without",
        insulated_temp,
        bare_temp
    );
}
