//! Output module for simulation results
//!
//! This module provides tools to output simulation results in various formats:
//! - **Visualization**: PNG depth-time heatmaps and line plots using plotters
//! - **Export**: CSV data export for external analysis
//! - **Parameter files**: JSON parameter and run-summary files
//!
//! # Architecture
//!
//! ```text
//! output/
//! ├── mod.rs              ← This file
//! ├── params_io.rs        ← JSON parameter/summary files
//! ├── visualization/      ← Plots and graphics
//! │   ├── mod.rs
//! │   ├── config.rs
//! │   └── thermal_history.rs
//! └── export/             ← Data export
//!     ├── mod.rs
//!     └── csv.rs
//! ```
//!
//! # Quick Start
//!
//! ## Visualization
//!
//! ```rust,ignore
//! use pallas_rs::output::visualization::plot_temperature_history;
//!
//! // Generate PNG heatmap
//! plot_temperature_history(&result, "history.png", None)?;
//! ```
//!
//! ## CSV Export
//!
//! ```rust,ignore
//! use pallas_rs::output::export::{CsvExporter, Exporter};
//!
//! // Export the full temperature matrix
//! CsvExporter::default().export_temperatures(&result, None, "temps.csv")?;
//! ```
//!
//! # Design Philosophy
//!
//! The output module separates concerns:
//! - **Visualization**: For human interpretation (plots, graphs)
//! - **Export**: For programmatic analysis (CSV)
//! - **Parameter files**: For reproducibility (JSON in, JSON summary out)
//!
//! All three consume a [`crate::solver::SimulationResult`] without mutating it.

pub mod export;
pub mod params_io;
pub mod visualization;

// Re-export commonly used items for convenience
pub use visualization::{
    plot_cooling_rate_history,
    plot_node_history,
    plot_temperature_history,
    PlotConfig,
    NO_TITLE,
};

pub use export::{
    export_profile_csv,
    export_time_series_csv,
    CsvConfig,
    CsvExporter,
    Exporter,
};

pub use params_io::{load_params_from_file, make_default_param_file, save_params_and_results};
