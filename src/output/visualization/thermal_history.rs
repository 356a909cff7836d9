//! Depth-time heatmaps and node history plots
//!
//! The classic way to read a planetesimal run is a depth-time pseudocolour
//! plot: radius on the vertical axis, time on the horizontal, colour for
//! temperature (or cooling-rate magnitude). This module renders those with
//! plotters, plus a plain line plot for a single node's history.
//!
//! Heatmaps are drawn as one filled rectangle per (node, time) cell. Long
//! runs have far more time columns than horizontal pixels, so columns are
//! uniformly subsampled to [`PlotConfig::max_time_samples`] before drawing;
//! the underlying result is never modified.

use std::error::Error;

use nalgebra::{DMatrix, DVector};
use ndarray::Array2;
use plotters::prelude::*;

use crate::output::visualization::config::{PlotConfig, NO_TITLE};
use crate::params::MYR_IN_SECONDS;
use crate::solver::SimulationResult;

// =================================================================================================
// Colour mapping
// =================================================================================================

/// Diverging blue-white-red colour map over \[0, 1\]
fn thermal_color(fraction: f64) -> RGBColor {
    let f = fraction.clamp(0.0, 1.0);
    let lerp = |a: f64, b: f64, t: f64| (a + (b - a) * t).round() as u8;
    if f < 0.5 {
        let t = f * 2.0;
        RGBColor(lerp(59.0, 255.0, t), lerp(76.0, 255.0, t), lerp(192.0, 255.0, t))
    } else {
        let t = (f - 0.5) * 2.0;
        RGBColor(lerp(255.0, 180.0, t), lerp(255.0, 4.0, t), lerp(255.0, 38.0, t))
    }
}

// =================================================================================================
// Heatmaps
// =================================================================================================

/// Plot the full-body temperature history as a depth-time heatmap
///
/// Core bins and mantle nodes are stacked by radius, so the plot spans the
/// whole body from the centre to the surface.
///
/// # Errors
///
/// Empty results, degenerate geometry and backend/file failures are all
/// reported.
pub fn plot_temperature_history(
    result: &SimulationResult,
    output_path: &str,
    configuration: Option<&PlotConfig>,
) -> Result<(), Box<dyn Error>> {
    if result.is_empty() || result.n_nodes() < 2 {
        return Err("Cannot plot an empty result".into());
    }
    let default_config = PlotConfig::temperature_history(NO_TITLE);
    let config = configuration.unwrap_or(&default_config);

    let field = result.full_temperature_array();
    let dr = result.radii[1] - result.radii[0];
    draw_heatmap(&field, &result.times, dr, output_path, config)
}

/// Plot cooling-rate magnitudes as a depth-time heatmap
///
/// Takes the cooling-rate matrix from [`crate::analysis::cooling_rate`] and
/// renders log10 of the cooling magnitude in K/Myr; heating samples render
/// at the floor of the scale.
pub fn plot_cooling_rate_history(
    result: &SimulationResult,
    cooling_rates: &DMatrix<f64>,
    output_path: &str,
    configuration: Option<&PlotConfig>,
) -> Result<(), Box<dyn Error>> {
    if result.is_empty() || result.n_nodes() < 2 {
        return Err("Cannot plot an empty result".into());
    }
    if cooling_rates.nrows() != result.n_nodes() || cooling_rates.ncols() != result.len() {
        return Err(format!(
            "Cooling-rate matrix is {}x{} but the result is {}x{}",
            cooling_rates.nrows(),
            cooling_rates.ncols(),
            result.n_nodes(),
            result.len()
        )
        .into());
    }
    let default_config = PlotConfig::cooling_rate_history(NO_TITLE);
    let config = configuration.unwrap_or(&default_config);

    // log10 of the cooling magnitude in K/Myr, floored well below anything
    // a real run produces
    let floor = 1.0e-6_f64;
    let field = Array2::from_shape_fn(
        (cooling_rates.nrows(), cooling_rates.ncols()),
        |(j, i)| {
            let magnitude = (-cooling_rates[(j, i)] * MYR_IN_SECONDS).max(floor);
            magnitude.log10()
        },
    );
    let dr = result.radii[1] - result.radii[0];
    draw_heatmap(&field, &result.times, dr, output_path, config)
}

fn draw_heatmap(
    field: &Array2<f64>,
    times: &DVector<f64>,
    dr: f64,
    output_path: &str,
    config: &PlotConfig,
) -> Result<(), Box<dyn Error>> {
    let (n_rows, n_cols) = field.dim();
    if n_rows == 0 || n_cols < 2 {
        return Err("Heatmap needs at least one row and two time columns".into());
    }

    // Uniform column subsample, endpoints always kept
    let n_drawn = config.max_time_samples.max(2).min(n_cols);
    let columns: Vec<usize> = (0..n_drawn)
        .map(|k| k * (n_cols - 1) / (n_drawn - 1))
        .collect();

    let (v_min, v_max) = match config.value_range {
        Some(range) => range,
        None => {
            let mut lo = f64::INFINITY;
            let mut hi = f64::NEG_INFINITY;
            for &v in field.iter().filter(|v| v.is_finite()) {
                lo = lo.min(v);
                hi = hi.max(v);
            }
            if !(lo.is_finite() && hi.is_finite()) {
                return Err("Heatmap data contains no finite values".into());
            }
            (lo, hi)
        }
    };
    let span = (v_max - v_min).max(f64::MIN_POSITIVE);

    let max_time_myr = times[n_cols - 1] / MYR_IN_SECONDS;
    let r_max_km = n_rows as f64 * dr / 1000.0;

    let root =
        BitMapBackend::new(output_path, (config.width, config.height)).into_drawing_area();
    root.fill(&config.background)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&config.title, ("sans-serif", 40.0).into_font())
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..max_time_myr, 0.0..r_max_km)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(&config.xlabel)
        .y_desc(&config.ylabel)
        .draw()?;

    for w in columns.windows(2) {
        let (i, i_next) = (w[0], w[1]);
        let t0 = times[i] / MYR_IN_SECONDS;
        let t1 = times[i_next] / MYR_IN_SECONDS;
        for j in 0..n_rows {
            let y0 = j as f64 * dr / 1000.0;
            let y1 = y0 + dr / 1000.0;
            let color = thermal_color((field[[j, i]] - v_min) / span);
            chart.draw_series(std::iter::once(Rectangle::new(
                [(t0, y0), (t1, y1)],
                color.filled(),
            )))?;
        }
    }

    root.present()?;
    Ok(())
}

// =================================================================================================
// Node history
// =================================================================================================

/// Plot one mantle node's temperature history as a line
pub fn plot_node_history(
    result: &SimulationResult,
    node: usize,
    output_path: &str,
    configuration: Option<&PlotConfig>,
) -> Result<(), Box<dyn Error>> {
    if result.is_empty() {
        return Err("Cannot plot an empty result".into());
    }
    if node >= result.n_nodes() {
        return Err(format!(
            "Node {} out of range: grid has {} nodes",
            node,
            result.n_nodes()
        )
        .into());
    }
    let default_config = PlotConfig::node_history(NO_TITLE);
    let config = configuration.unwrap_or(&default_config);

    let times_myr: Vec<f64> = result.times.iter().map(|t| t / MYR_IN_SECONDS).collect();
    let temps: Vec<f64> = (0..result.len())
        .map(|i| result.mantle_temperatures[(node, i)])
        .collect();

    let max_time = times_myr.last().copied().unwrap_or(1.0);
    let t_max = temps.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let t_min = temps.iter().cloned().fold(f64::INFINITY, f64::min);
    let t_span = (t_max - t_min).max(1.0);

    let root =
        BitMapBackend::new(output_path, (config.width, config.height)).into_drawing_area();
    root.fill(&config.background)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&config.title, ("sans-serif", 40.0).into_font())
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(
            0.0..max_time,
            (t_min - 0.1 * t_span)..(t_max + 0.1 * t_span),
        )?;

    let mut mesh = chart.configure_mesh();
    mesh.x_desc(&config.xlabel).y_desc(&config.ylabel);
    if config.show_grid {
        mesh.draw()?;
    } else {
        mesh.disable_mesh().draw()?;
    }

    chart.draw_series(LineSeries::new(
        times_myr.iter().zip(temps.iter()).map(|(t, v)| (*t, *v)),
        config.line_color.stroke_width(config.line_width),
    ))?;

    root.present()?;
    Ok(())
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thermal_color_endpoints() {
        assert_eq!(thermal_color(0.0), RGBColor(59, 76, 192));
        assert_eq!(thermal_color(0.5), RGBColor(255, 255, 255));
        assert_eq!(thermal_color(1.0), RGBColor(180, 4, 38));
        // Out-of-range input clamps instead of wrapping
        assert_eq!(thermal_color(-2.0), thermal_color(0.0));
        assert_eq!(thermal_color(7.0), thermal_color(1.0));
    }

    #[test]
    fn test_heatmap_rejects_degenerate_input() {
        let field = Array2::<f64>::zeros((0, 5));
        let times = DVector::from_vec(vec![0.0; 5]);
        let config = PlotConfig::temperature_history(NO_TITLE);
        assert!(draw_heatmap(&field, &times, 1000.0, "/tmp/x.png", &config).is_err());

        let field = Array2::<f64>::from_elem((3, 2), f64::NAN);
        let times = DVector::from_vec(vec![0.0, 1.0]);
        assert!(draw_heatmap(&field, &times, 1000.0, "/tmp/x.png", &config).is_err());
    }
}
