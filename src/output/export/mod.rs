//! Export module for simulation results.
//!
//! # Architecture
//!
//! This module defines the [`Exporter`] trait that abstracts the export
//! format. Each format is an independent implementation in its own
//! sub-module; adding a new format means adding a file, without modifying
//! existing code.
//!
//! # Available formats
//!
//! | Format  | Module          |
//! |---------|-----------------|
//! | CSV     | [`csv`]         |
//! | JSON    | [`crate::output::params_io`] (parameter/result files) |
//!
//! # Usage example
//!
//! ```rust,ignore
//! use pallas_rs::output::export::{CsvExporter, Exporter};
//!
//! let exporter = CsvExporter::default();
//!
//! // Full export (all time steps)
//! exporter.export_temperatures(&result, None, "temps.csv")?;
//!
//! // Downsampled to 500 time columns
//! exporter.export_temperatures(&result, Some(500), "temps_light.csv")?;
//!
//! // One node's history
//! exporter.export_node_history(&result, 0, None, "cmb_node.csv")?;
//! ```

pub mod csv;

// Re-export the most commonly used types at the module level so users can
// write `use pallas_rs::output::export::{CsvExporter, CsvConfig, CsvError}`
// instead of the full sub-module path.
pub use csv::{
    export_profile_csv, export_time_series_csv, CsvConfig, CsvError, CsvExporter,
    CsvMetadata,
};

use crate::solver::SimulationResult;

/// Abstraction trait for all export formats.
///
/// # Associated type `Error`
///
/// Each format manages its own errors via the associated type. This avoids
/// systematic boxing and lets the caller react precisely to the error kind.
///
/// # Parameter `n_points`
///
/// - `None`: exports all time steps (default behaviour)
/// - `Some(n)`: uniformly downsamples to `n` time columns, always keeping
///   the **first and last** columns (the initial condition and the final
///   state must survive any downsampling)
pub trait Exporter {
    /// Error type specific to this export format.
    type Error: std::error::Error;

    /// Export the full mantle temperature matrix, one row per radial node.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be created, the result holds no
    /// data, or the matrix contains non-finite values.
    fn export_temperatures(
        &self,
        result: &SimulationResult,
        n_points: Option<usize>,
        path: &str,
    ) -> Result<(), Self::Error>;

    /// Export one node's temperature history as a two-column time series.
    ///
    /// # Errors
    ///
    /// Returns an error if `node` is outside the grid, the path cannot be
    /// created, or the history contains non-finite values.
    fn export_node_history(
        &self,
        result: &SimulationResult,
        node: usize,
        n_points: Option<usize>,
        path: &str,
    ) -> Result<(), Self::Error>;
}
