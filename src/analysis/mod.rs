//! Meteorite cooling-rate analysis
//!
//! Turns raw time-temperature histories into the quantities meteoriticists
//! actually measure: cooling rates through the mantle, cloudy-zone particle
//! diameters, tetrataenite rim widths, core solidification timing and the
//! best-fit depth and time of genesis for an observed cooling rate.
//!
//! The empirical size-rate relations follow Yang et al. (2010), as compiled
//! in Murphy Quinlan et al. (2021), <https://doi.org/10.1029/2020JE006726>.
//!
//! Everything here is a pure function of the stored arrays: recomputing any
//! quantity from the same result yields bit-identical output, and nothing
//! mutates the simulation result.

use nalgebra::{DMatrix, DVector};

use crate::params::MYR_IN_SECONDS;
use crate::solver::grid::RadialGrid;

// =================================================================================================
// Empirical constants (Yang et al., 2010)
// =================================================================================================

/// Cloudy-zone relation coefficient \[K/Myr · nm^2.9\]
pub const CLOUDY_ZONE_COEFF: f64 = 7.62e6;

/// Cloudy-zone relation exponent
pub const CLOUDY_ZONE_EXPONENT: f64 = 2.9;

/// Tetrataenite relation coefficient \[K/Myr · nm^2.3\]
pub const TETRA_COEFF: f64 = 1.454e7;

/// Tetrataenite relation exponent
pub const TETRA_EXPONENT: f64 = 2.3;

// =================================================================================================
// Cooling rates
// =================================================================================================

/// Per-node, per-time cooling rate dT/dt \[K/s\]
///
/// Second-order central differences along the time axis, first-order
/// one-sided at both ends. Negative while cooling. Pure: two calls on the
/// same matrix return bit-identical results.
pub fn cooling_rate(temperatures: &DMatrix<f64>, dt: f64) -> DMatrix<f64> {
    let n = temperatures.ncols();
    if n < 2 {
        return DMatrix::zeros(temperatures.nrows(), n);
    }
    DMatrix::from_fn(temperatures.nrows(), n, |j, i| {
        if i == 0 {
            (temperatures[(j, 1)] - temperatures[(j, 0)]) / dt
        } else if i == n - 1 {
            (temperatures[(j, n - 1)] - temperatures[(j, n - 2)]) / dt
        } else {
            (temperatures[(j, i + 1)] - temperatures[(j, i - 1)]) / (2.0 * dt)
        }
    })
}

/// Convert a cooling rate from K/Myr to K/s
pub fn cooling_rate_to_seconds(rate_per_myr: f64) -> f64 {
    rate_per_myr / MYR_IN_SECONDS
}

// =================================================================================================
// Size-rate transforms
// =================================================================================================

/// Cooling rate from a cloudy-zone particle diameter in nm \[K/Myr\]
pub fn cooling_rate_cloudyzone_diameter(diameter_nm: f64) -> f64 {
    CLOUDY_ZONE_COEFF / diameter_nm.powf(CLOUDY_ZONE_EXPONENT)
}

/// Cloudy-zone particle diameter in nm from a cooling rate in K/Myr
pub fn cloudyzone_diameter(rate_per_myr: f64) -> f64 {
    (CLOUDY_ZONE_COEFF / rate_per_myr).powf(1.0 / CLOUDY_ZONE_EXPONENT)
}

/// Cooling rate from a tetrataenite rim width in nm \[K/Myr\]
pub fn cooling_rate_tetra_width(width_nm: f64) -> f64 {
    TETRA_COEFF / width_nm.powf(TETRA_EXPONENT)
}

/// Tetrataenite rim width in nm from a cooling rate in K/Myr
pub fn tetrataenite_width(rate_per_myr: f64) -> f64 {
    (TETRA_COEFF / rate_per_myr).powf(1.0 / TETRA_EXPONENT)
}

// =================================================================================================
// Core solidification timing
// =================================================================================================

/// When the core started and finished solidifying
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoreFreezing {
    /// First time the core temperature reached the melt point \[s\]
    pub onset: Option<f64>,

    /// Time the latent-heat budget was depleted \[s\]
    pub completion: Option<f64>,
}

/// Locate the core's solidification window in a run
///
/// Onset is the first time column where the core temperature has dropped to
/// the melt point; completion is the budget-depletion time the core model
/// records. Either can be absent when the run ends too early.
pub fn core_freezing(
    core_temperatures: &DMatrix<f64>,
    times: &DVector<f64>,
    time_fully_frozen: Option<f64>,
    temp_core_melting: f64,
) -> CoreFreezing {
    let onset = if core_temperatures.nrows() == 0 {
        None
    } else {
        (0..core_temperatures.ncols().min(times.len()))
            .find(|&i| core_temperatures[(0, i)] <= temp_core_melting)
            .map(|i| times[i])
    };
    CoreFreezing {
        onset,
        completion: time_fully_frozen,
    }
}

// =================================================================================================
// Depth-and-timing match
// =================================================================================================

/// When a matched sample cooled relative to core solidification
///
/// A sample cooling through tetrataenite formation before the core starts
/// freezing cannot have recorded a core dynamo; one cooling during
/// solidification can.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreezeTiming {
    /// Matched before the core began solidifying
    BeforeSolidification,

    /// Matched while the core was solidifying
    DuringSolidification,

    /// Matched after the core had fully solidified
    AfterSolidification,

    /// The run never constrained the solidification window
    Unconstrained,
}

/// A successful depth-and-timing match
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthTimeMatch {
    /// Radius of the matched node \[m\]
    pub radius: f64,

    /// Depth of the matched node below the surface \[m\]
    pub depth: f64,

    /// Matched time, interpolated between samples where possible \[s\]
    pub time: f64,

    /// The modelled cooling rate at the matched sample \[K/Myr\]
    pub modelled_rate: f64,

    /// Timing relative to core solidification
    pub timing: FreezeTiming,
}

/// Outcome of a depth-and-timing query
///
/// Out-of-range and no-match are ordinary outcomes, not errors: a measured
/// rate the modelled body cannot produce is a scientific result in itself
/// and must never be silently replaced by the nearest implausible sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchOutcome {
    /// A sample within tolerance was found
    Match(DepthTimeMatch),

    /// The target lies outside the modelled rate range entirely
    OutOfRange {
        target: f64,
        min_modelled: f64,
        max_modelled: f64,
    },

    /// The target is inside the modelled range but no sample comes within
    /// tolerance of it
    NoMatch { target: f64, closest: f64 },
}

/// Find where and when the modelled body cooled at an observed rate
///
/// Scans every (node, time) sample of the cooling-rate matrix for the
/// cooling magnitude closest to `target_rate` (K/Myr, positive). Where the
/// target falls between the best sample and a time neighbour, the reported
/// time is linearly interpolated rather than snapped to the grid. Heating
/// samples never match.
///
/// # Errors
///
/// Returns a message for a non-positive or non-finite target or tolerance,
/// mismatched array shapes, or a rate matrix with no cooling samples at all.
pub fn depth_and_timing(
    target_rate: f64,
    cooling_rates: &DMatrix<f64>,
    grid: &RadialGrid,
    times: &DVector<f64>,
    freezing: &CoreFreezing,
    tolerance: f64,
) -> Result<MatchOutcome, String> {
    if !target_rate.is_finite() || target_rate <= 0.0 {
        return Err(format!(
            "Target cooling rate must be finite and positive; got {}",
            target_rate
        ));
    }
    if !tolerance.is_finite() || tolerance <= 0.0 {
        return Err(format!(
            "Match tolerance must be finite and positive; got {}",
            tolerance
        ));
    }
    if cooling_rates.nrows() != grid.len() || cooling_rates.ncols() != times.len() {
        return Err(format!(
            "Cooling-rate matrix is {}x{} but the grid has {} nodes and {} times",
            cooling_rates.nrows(),
            cooling_rates.ncols(),
            grid.len(),
            times.len()
        ));
    }

    // Cooling magnitude in K/Myr at one sample; None for heating samples.
    let magnitude = |j: usize, i: usize| -> Option<f64> {
        let rate = -cooling_rates[(j, i)] * MYR_IN_SECONDS;
        (rate.is_finite() && rate > 0.0).then_some(rate)
    };

    let mut min_modelled = f64::INFINITY;
    let mut max_modelled = f64::NEG_INFINITY;
    let mut best: Option<(usize, usize, f64)> = None;

    for j in 0..cooling_rates.nrows() {
        for i in 0..cooling_rates.ncols() {
            let Some(rate) = magnitude(j, i) else {
                continue;
            };
            min_modelled = min_modelled.min(rate);
            max_modelled = max_modelled.max(rate);
            let better = match best {
                None => true,
                Some((_, _, r)) => (rate - target_rate).abs() < (r - target_rate).abs(),
            };
            if better {
                best = Some((j, i, rate));
            }
        }
    }

    let Some((j, i, rate)) = best else {
        return Err("Cooling-rate matrix contains no cooling samples".to_string());
    };

    if target_rate < min_modelled || target_rate > max_modelled {
        return Ok(MatchOutcome::OutOfRange {
            target: target_rate,
            min_modelled,
            max_modelled,
        });
    }
    if (rate - target_rate).abs() > tolerance {
        return Ok(MatchOutcome::NoMatch {
            target: target_rate,
            closest: rate,
        });
    }

    // Interpolate in time when a neighbouring sample brackets the target.
    let mut time = times[i];
    for neighbour in [i.wrapping_sub(1), i + 1] {
        if neighbour >= cooling_rates.ncols() {
            continue;
        }
        let Some(other) = magnitude(j, neighbour) else {
            continue;
        };
        let lo = rate.min(other);
        let hi = rate.max(other);
        if lo <= target_rate && target_rate <= hi && hi > lo {
            let fraction = (target_rate - rate) / (other - rate);
            time = times[i] + fraction * (times[neighbour] - times[i]);
            break;
        }
    }

    let timing = match (freezing.onset, freezing.completion) {
        (None, _) => FreezeTiming::Unconstrained,
        (Some(onset), _) if time < onset => FreezeTiming::BeforeSolidification,
        (Some(_), Some(completion)) if time > completion => {
            FreezeTiming::AfterSolidification
        }
        _ => FreezeTiming::DuringSolidification,
    };

    Ok(MatchOutcome::Match(DepthTimeMatch {
        radius: grid.radii()[j],
        depth: grid.depth(j),
        time,
        modelled_rate: rate,
        timing,
    }))
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cloudy_zone_oracles() {
        assert_relative_eq!(
            cooling_rate_cloudyzone_diameter(147.0),
            3.9512517443065804,
            max_relative = 1e-10
        );
        assert_relative_eq!(
            cooling_rate_cloudyzone_diameter(158.0),
            3.2051578229316235,
            max_relative = 1e-10
        );
    }

    #[test]
    fn test_tetrataenite_oracle() {
        assert_relative_eq!(
            cooling_rate_tetra_width(100.0),
            365.22828714149324,
            max_relative = 1e-10
        );
    }

    #[test]
    fn test_rate_to_seconds_oracles() {
        assert_relative_eq!(
            cooling_rate_to_seconds(3.95),
            1.2517062023088055e-13,
            max_relative = 1e-10
        );
        assert_relative_eq!(
            cooling_rate_to_seconds(3.21),
            1.0172093441547507e-13,
            max_relative = 1e-10
        );
    }

    #[test]
    fn test_size_rate_transforms_invert() {
        for &size in &[50.0, 100.0, 147.0, 500.0] {
            assert_relative_eq!(
                cloudyzone_diameter(cooling_rate_cloudyzone_diameter(size)),
                size,
                max_relative = 1e-12
            );
            assert_relative_eq!(
                tetrataenite_width(cooling_rate_tetra_width(size)),
                size,
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn test_cooling_rate_exact_on_linear_ramp() {
        // T(j, i) = 1000 - j - 2 * i * dt, so dT/dt = -2 everywhere,
        // one-sided ends included
        let dt = 10.0;
        let t = DMatrix::from_fn(4, 6, |j, i| 1000.0 - j as f64 - 2.0 * i as f64 * dt);
        let rates = cooling_rate(&t, dt);
        for j in 0..4 {
            for i in 0..6 {
                assert_relative_eq!(rates[(j, i)], -2.0, max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn test_cooling_rate_idempotent() {
        let t = DMatrix::from_fn(5, 9, |j, i| {
            1600.0 * (-(i as f64) * 0.05).exp() + 10.0 * (j as f64)
        });
        let first = cooling_rate(&t, 1.0e11);
        let second = cooling_rate(&t, 1.0e11);
        assert_eq!(first, second);
    }

    #[test]
    fn test_core_freezing_onset() {
        let times = DVector::from_fn(6, |i, _| i as f64 * 1.0e11);
        let core = DMatrix::from_fn(3, 6, |_, i| 1600.0 - 100.0 * i as f64);
        // 1600, 1500, 1400, 1300, 1200, 1100 -> hits 1200 at column 4
        let freezing = core_freezing(&core, &times, Some(5.0e11), 1200.0);
        assert_eq!(freezing.onset, Some(4.0e11));
        assert_eq!(freezing.completion, Some(5.0e11));

        let never = DMatrix::from_element(3, 6, 1600.0);
        let freezing = core_freezing(&never, &times, None, 1200.0);
        assert_eq!(freezing.onset, None);
    }

    fn synthetic_rates() -> (DMatrix<f64>, RadialGrid, DVector<f64>) {
        let grid = RadialGrid::new(0.0, 50_000.0, 1000.0, 0.0).unwrap();
        let dt = 1.0e12;
        let times = DVector::from_fn(11, |i, _| i as f64 * dt);
        // Uniform slow cooling with one faster sample planted at (20, 5)
        let mut rates = DMatrix::from_element(grid.len(), 11, -1.0e-13);
        rates[(20, 5)] = -2.0e-13;
        (rates, grid, times)
    }

    #[test]
    fn test_match_returns_planted_sample() {
        let (rates, grid, times) = synthetic_rates();
        let target = 2.0e-13 * MYR_IN_SECONDS;
        let freezing = CoreFreezing {
            onset: Some(3.0e12),
            completion: Some(8.0e12),
        };
        let outcome =
            depth_and_timing(target, &rates, &grid, &times, &freezing, 0.1).unwrap();
        match outcome {
            MatchOutcome::Match(m) => {
                assert_eq!(m.radius, 20_000.0);
                assert_eq!(m.depth, 30_000.0);
                assert_relative_eq!(m.time, 5.0e12, max_relative = 1e-12);
                assert_relative_eq!(m.modelled_rate, target, max_relative = 1e-12);
                assert_eq!(m.timing, FreezeTiming::DuringSolidification);
            }
            other => panic!("expected a match, got {:?}", other),
        }
    }

    #[test]
    fn test_match_interpolates_between_samples() {
        let grid = RadialGrid::new(0.0, 5000.0, 1000.0, 0.0).unwrap();
        let dt = 1.0e12;
        let times = DVector::from_fn(4, |i, _| i as f64 * dt);
        // Node 2 cools at 2, 4, 6, 8 K/Myr across the four columns
        let mut rates = DMatrix::from_element(grid.len(), 4, -1.0e-16);
        for i in 0..4 {
            rates[(2, i)] = -(2.0 + 2.0 * i as f64) / MYR_IN_SECONDS;
        }
        let freezing = CoreFreezing {
            onset: None,
            completion: None,
        };
        // Target 5 K/Myr sits halfway between columns 1 (4) and 2 (6)
        let outcome =
            depth_and_timing(5.0, &rates, &grid, &times, &freezing, 1.5).unwrap();
        match outcome {
            MatchOutcome::Match(m) => {
                assert_relative_eq!(m.time, 1.5e12, max_relative = 1e-12);
                assert_eq!(m.timing, FreezeTiming::Unconstrained);
            }
            other => panic!("expected a match, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_targets() {
        let (rates, grid, times) = synthetic_rates();
        let freezing = CoreFreezing {
            onset: None,
            completion: None,
        };
        let fast =
            depth_and_timing(1.0e4, &rates, &grid, &times, &freezing, 1.0).unwrap();
        assert!(matches!(fast, MatchOutcome::OutOfRange { .. }));

        let slow =
            depth_and_timing(1.0e-3, &rates, &grid, &times, &freezing, 1.0).unwrap();
        assert!(matches!(slow, MatchOutcome::OutOfRange { .. }));
    }

    #[test]
    fn test_no_match_within_tolerance() {
        let (rates, grid, times) = synthetic_rates();
        let freezing = CoreFreezing {
            onset: None,
            completion: None,
        };
        // Between the two modelled magnitudes (~3.16 and ~6.31 K/Myr) but
        // further than the tolerance from both
        let outcome =
            depth_and_timing(4.7, &rates, &grid, &times, &freezing, 0.5).unwrap();
        match outcome {
            MatchOutcome::NoMatch { target, closest } => {
                assert_eq!(target, 4.7);
                assert!(closest > 0.0);
            }
            other => panic!("expected no match, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_degenerate_queries() {
        let (rates, grid, times) = synthetic_rates();
        let freezing = CoreFreezing {
            onset: None,
            completion: None,
        };
        assert!(depth_and_timing(-1.0, &rates, &grid, &times, &freezing, 1.0).is_err());
        assert!(depth_and_timing(1.0, &rates, &grid, &times, &freezing, 0.0).is_err());

        let heating = DMatrix::from_element(grid.len(), times.len(), 1.0e-13);
        assert!(depth_and_timing(1.0, &heating, &grid, &times, &freezing, 1.0).is_err());
    }
}
