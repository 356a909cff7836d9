//! Visualization module for planetesimal simulation results
//!
//! This module provides tools to visualize simulation results using the `plotters` library.
//!
//! # Organization
//!
//! - **config**: Shared plot configuration (`PlotConfig`)
//! - **thermal_history**: Depth-time heatmaps and single-node time series
//!
//! # Quick Start
//!
//! ## Depth-Time Heatmap (Whole Body vs Time)
//!
//! ```rust,ignore
//! use pallas_rs::output::visualization::{plot_temperature_history, PlotConfig};
//!
//! let result = pallas_rs::solver::run(&params)?;
//!
//! // Plot with default config
//! plot_temperature_history(&result, "history.png", None)?;
//!
//! // Or with custom config
//! let mut config = PlotConfig::temperature_history("250 km body");
//! config.width = 1920;
//! plot_temperature_history(&result, "history_hd.png", Some(&config))?;
//! ```
//!
//! ## Single Node (Temperature vs Time)
//!
//! ```rust,ignore
//! use pallas_rs::output::visualization::plot_node_history;
//!
//! // Node 0 is the core-mantle boundary
//! plot_node_history(&result, 0, "cmb.png", None)?;
//! ```
//!
//! # When to Use Which Function
//!
//! | Use Case | Function |
//! |----------|----------|
//! | Temperature over the whole body | `plot_temperature_history` |
//! | Cooling-rate magnitudes | `plot_cooling_rate_history` |
//! | One node's cooling curve | `plot_node_history` |

pub mod config;
pub mod thermal_history;

pub use config::{IntoOptionalTitle, PlotConfig, NO_TITLE};

pub use thermal_history::{
    plot_cooling_rate_history, plot_node_history, plot_temperature_history,
};
