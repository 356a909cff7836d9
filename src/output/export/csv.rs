//! CSV export for simulation results
//!
//! Writes time series, radial profiles and full depth-time temperature
//! matrices to CSV, readable by Excel, pandas, MATLAB and most analysis
//! tools.
//!
//! # Features
//!
//! - **Simple interface**: free functions over `&[f64]` slices, plus a
//!   [`CsvExporter`] for whole results
//! - **Metadata support**: optional `#`-comment headers with run parameters
//! - **Customizable**: delimiter, precision, decimal separator
//! - **Validation**: checks for NaN, empty data, mismatched lengths
//!
//! # Quick Examples
//!
//! ## Minimal time-series export
//!
//! ```rust,ignore
//! use pallas_rs::output::export::export_time_series_csv;
//!
//! let times = vec![0.0, 1.0e11, 2.0e11];
//! let temps = vec![1600.0, 1598.2, 1596.5];
//!
//! export_time_series_csv(&times, &temps, "core_temps.csv", None)?;
//! ```
//!
//! **Output** (`core_temps.csv`):
//! ```csv
//! Time (s),Temperature (K)
//! 0.000000,1600.000000
//! 100000000000.000000,1598.200000
//! 200000000000.000000,1596.500000
//! ```
//!
//! ## With metadata
//!
//! ```rust,ignore
//! use pallas_rs::output::export::{export_time_series_csv, CsvConfig, CsvMetadata};
//!
//! let config = CsvConfig::default()
//!     .with_metadata(CsvMetadata::from_result(&result));
//! export_time_series_csv(&times, &temps, "core_temps.csv", Some(&config))?;
//! ```
//!
//! **Output** (`core_temps.csv`):
//! ```csv
//! # Planetesimal Thermal Evolution Data
//! # Generated: 2026-08-29T15:30:00Z
//! # Run: example_default
//! # Solver: FTCS spherical conduction
//! # ...
//! #
//! Time (s),Temperature (K)
//! ...
//! ```

use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};

use crate::output::export::Exporter;
use crate::solver::SimulationResult;

// =============================================================================
// Configuration Structures
// =============================================================================

/// Configuration for CSV export
///
/// # Example
///
/// ```rust,ignore
/// let config = CsvConfig {
///     delimiter: ';',        // European CSV
///     precision: 10,         // High precision
///     ..Default::default()
/// };
/// ```
#[derive(Clone)]
pub struct CsvConfig {
    /// Column delimiter (default: ',')
    pub delimiter: char,

    /// Decimal separator (default: '.')
    pub decimal_separator: char,

    /// Number of decimal places for floating-point values (default: 6)
    pub precision: usize,

    /// Include metadata header comments (default: false)
    pub include_metadata: bool,

    /// Metadata to include in the header
    pub metadata: Option<CsvMetadata>,

    /// Header for time columns (default: "Time (s)")
    pub time_header: String,

    /// Header for temperature columns (default: "Temperature (K)")
    pub temperature_header: String,

    /// Header for radius columns (default: "Radius (m)")
    pub radius_header: String,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            decimal_separator: '.',
            precision: 6,
            include_metadata: false,
            metadata: None,
            time_header: "Time (s)".to_string(),
            temperature_header: "Temperature (K)".to_string(),
            radius_header: "Radius (m)".to_string(),
        }
    }
}

impl CsvConfig {
    /// European CSV format (semicolon delimiter, comma for decimal)
    pub fn european() -> Self {
        Self {
            delimiter: ';',
            decimal_separator: ',',
            ..Default::default()
        }
    }

    /// High precision output (12 decimal places)
    pub fn high_precision() -> Self {
        Self {
            precision: 12,
            ..Default::default()
        }
    }

    /// Builder pattern: set delimiter
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Builder pattern: set precision
    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Builder pattern: attach metadata and enable the header
    pub fn with_metadata(mut self, metadata: CsvMetadata) -> Self {
        self.include_metadata = true;
        self.metadata = Some(metadata);
        self
    }
}

/// Metadata for CSV header comments
///
/// All fields are optional; only non-None fields appear in the header.
#[derive(Clone, Default)]
pub struct CsvMetadata {
    /// Run identifier
    pub run_id: Option<String>,

    /// Solver name (e.g. "FTCS spherical conduction")
    pub solver_name: Option<String>,

    /// Total simulated time (seconds)
    pub total_time: Option<f64>,

    /// Number of time steps
    pub time_steps: Option<usize>,

    /// Radial node spacing (m)
    pub dr: Option<f64>,

    /// Timestep (s)
    pub dt: Option<f64>,

    /// Additional custom parameters
    pub custom: Vec<(String, String)>,
}

impl CsvMetadata {
    /// Build metadata from a finished simulation result
    pub fn from_result(result: &SimulationResult) -> Self {
        Self {
            run_id: result.metadata.get("run_id").cloned(),
            solver_name: result.metadata.get("solver").cloned(),
            total_time: result.times.iter().last().copied(),
            time_steps: Some(result.len()),
            dr: result.metadata.get("dr").and_then(|v| v.parse().ok()),
            dt: Some(result.dt),
            custom: Vec::new(),
        }
    }

    /// Add a custom key/value header line
    pub fn add_custom(&mut self, key: String, value: String) {
        self.custom.push((key, value));
    }
}

// =============================================================================
// Error type
// =============================================================================

/// Errors the [`CsvExporter`] can produce
#[derive(Debug)]
pub enum CsvError {
    /// Underlying file I/O failure
    Io(std::io::Error),

    /// The result holds no data to export
    EmptyData,

    /// Requested node index outside the grid
    NodeOutOfRange { node: usize, nodes: usize },

    /// NaN or Inf in the data being exported
    NonFinite { what: &'static str },
}

impl fmt::Display for CsvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CsvError::Io(e) => write!(f, "CSV I/O error: {}", e),
            CsvError::EmptyData => write!(f, "Empty data: nothing to export"),
            CsvError::NodeOutOfRange { node, nodes } => {
                write!(f, "Node {} out of range: grid has {} nodes", node, nodes)
            }
            CsvError::NonFinite { what } => {
                write!(f, "Invalid data: NaN or Inf detected in {}", what)
            }
        }
    }
}

impl Error for CsvError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CsvError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CsvError {
    fn from(e: std::io::Error) -> Self {
        CsvError::Io(e)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Write metadata header comments
fn write_metadata_header<W: Write>(
    out: &mut W,
    metadata: &CsvMetadata,
) -> std::io::Result<()> {
    writeln!(out, "# Planetesimal Thermal Evolution Data")?;
    writeln!(out, "# Generated: {}", chrono::Utc::now().to_rfc3339())?;

    if let Some(run_id) = &metadata.run_id {
        writeln!(out, "# Run: {}", run_id)?;
    }
    if let Some(solver) = &metadata.solver_name {
        writeln!(out, "# Solver: {}", solver)?;
    }
    if let Some(total_time) = metadata.total_time {
        writeln!(out, "# Total Time: {} s", total_time)?;
    }
    if let Some(time_steps) = metadata.time_steps {
        writeln!(out, "# Time Steps: {}", time_steps)?;
    }
    if let Some(dr) = metadata.dr {
        writeln!(out, "# dr: {} m", dr)?;
    }
    if let Some(dt) = metadata.dt {
        writeln!(out, "# dt: {} s", dt)?;
    }
    for (key, value) in &metadata.custom {
        writeln!(out, "# {}: {}", key, value)?;
    }
    writeln!(out, "#")?;
    Ok(())
}

/// Format a number with configured precision and decimal separator
fn format_number(value: f64, config: &CsvConfig) -> String {
    let formatted = format!("{:.prec$}", value, prec = config.precision);
    if config.decimal_separator != '.' {
        formatted.replace('.', &config.decimal_separator.to_string())
    } else {
        formatted
    }
}

/// Uniformly chosen column indices, first and last always included
fn downsample_indices(len: usize, n_points: Option<usize>) -> Vec<usize> {
    match n_points {
        Some(n) if n >= 2 && n < len => {
            let mut indices: Vec<usize> = (0..n)
                .map(|k| k * (len - 1) / (n - 1))
                .collect();
            indices.dedup();
            indices
        }
        _ => (0..len).collect(),
    }
}

// =============================================================================
// Export Functions
// =============================================================================

/// Export a single time series (e.g. one node's temperature history) to CSV
///
/// # Errors
///
/// - empty data
/// - mismatched lengths
/// - NaN or Inf values
/// - file creation errors
pub fn export_time_series_csv(
    times: &[f64],
    values: &[f64],
    output_path: &str,
    configuration: Option<&CsvConfig>,
) -> Result<(), Box<dyn Error>> {
    // ============================= Validation =============================

    if times.is_empty() || values.is_empty() {
        return Err("Empty data: time and value series must not be empty".into());
    }
    if times.len() != values.len() {
        return Err(format!(
            "Data length mismatch: {} times versus {} values",
            times.len(),
            values.len()
        )
        .into());
    }
    if times.iter().any(|t| !t.is_finite()) {
        return Err("Invalid data: NaN or Inf detected in time series".into());
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err("Invalid data: NaN or Inf detected in value series".into());
    }

    // ============================== Writing ==============================

    let default_config = CsvConfig::default();
    let config = configuration.unwrap_or(&default_config);

    let mut out = BufWriter::new(File::create(output_path)?);
    if config.include_metadata {
        if let Some(metadata) = &config.metadata {
            write_metadata_header(&mut out, metadata)?;
        }
    }
    writeln!(
        out,
        "{}{}{}",
        config.time_header, config.delimiter, config.temperature_header
    )?;
    for (t, v) in times.iter().zip(values) {
        writeln!(
            out,
            "{}{}{}",
            format_number(*t, config),
            config.delimiter,
            format_number(*v, config)
        )?;
    }
    out.flush()?;
    Ok(())
}

/// Export a radial profile (temperature versus radius at one time) to CSV
///
/// # Errors
///
/// Same conditions as [`export_time_series_csv`].
pub fn export_profile_csv(
    radii: &[f64],
    values: &[f64],
    output_path: &str,
    configuration: Option<&CsvConfig>,
) -> Result<(), Box<dyn Error>> {
    if radii.is_empty() || values.is_empty() {
        return Err("Empty data: radius and value series must not be empty".into());
    }
    if radii.len() != values.len() {
        return Err(format!(
            "Data length mismatch: {} radii versus {} values",
            radii.len(),
            values.len()
        )
        .into());
    }
    if radii.iter().any(|r| !r.is_finite()) || values.iter().any(|v| !v.is_finite()) {
        return Err("Invalid data: NaN or Inf detected in profile".into());
    }

    let default_config = CsvConfig::default();
    let config = configuration.unwrap_or(&default_config);

    let mut out = BufWriter::new(File::create(output_path)?);
    if config.include_metadata {
        if let Some(metadata) = &config.metadata {
            write_metadata_header(&mut out, metadata)?;
        }
    }
    writeln!(
        out,
        "{}{}{}",
        config.radius_header, config.delimiter, config.temperature_header
    )?;
    for (r, v) in radii.iter().zip(values) {
        writeln!(
            out,
            "{}{}{}",
            format_number(*r, config),
            config.delimiter,
            format_number(*v, config)
        )?;
    }
    out.flush()?;
    Ok(())
}

// =============================================================================
// Exporter implementation
// =============================================================================

/// CSV implementation of the [`Exporter`] trait
///
/// Owns a [`CsvConfig`]; construct with `CsvExporter::default()` for plain
/// comma-separated output or wrap a custom config with [`CsvExporter::new`].
#[derive(Clone, Default)]
pub struct CsvExporter {
    /// Formatting configuration
    pub config: CsvConfig,
}

impl CsvExporter {
    pub fn new(config: CsvConfig) -> Self {
        Self { config }
    }
}

impl Exporter for CsvExporter {
    type Error = CsvError;

    fn export_temperatures(
        &self,
        result: &SimulationResult,
        n_points: Option<usize>,
        path: &str,
    ) -> Result<(), CsvError> {
        if result.is_empty() || result.n_nodes() == 0 {
            return Err(CsvError::EmptyData);
        }
        if result.mantle_temperatures.iter().any(|t| !t.is_finite()) {
            return Err(CsvError::NonFinite {
                what: "mantle temperatures",
            });
        }

        let columns = downsample_indices(result.len(), n_points);
        let mut out = BufWriter::new(File::create(path)?);
        if self.config.include_metadata {
            if let Some(metadata) = &self.config.metadata {
                write_metadata_header(&mut out, metadata)?;
            }
        }

        // Header: radius column, then one column per exported time
        write!(out, "{}", self.config.radius_header)?;
        for &i in &columns {
            write!(
                out,
                "{}t={}s",
                self.config.delimiter,
                format_number(result.times[i], &self.config)
            )?;
        }
        writeln!(out)?;

        for j in 0..result.n_nodes() {
            write!(out, "{}", format_number(result.radii[j], &self.config))?;
            for &i in &columns {
                write!(
                    out,
                    "{}{}",
                    self.config.delimiter,
                    format_number(result.mantle_temperatures[(j, i)], &self.config)
                )?;
            }
            writeln!(out)?;
        }
        out.flush()?;
        Ok(())
    }

    fn export_node_history(
        &self,
        result: &SimulationResult,
        node: usize,
        n_points: Option<usize>,
        path: &str,
    ) -> Result<(), CsvError> {
        if result.is_empty() {
            return Err(CsvError::EmptyData);
        }
        if node >= result.n_nodes() {
            return Err(CsvError::NodeOutOfRange {
                node,
                nodes: result.n_nodes(),
            });
        }

        let columns = downsample_indices(result.len(), n_points);
        let mut out = BufWriter::new(File::create(path)?);
        if self.config.include_metadata {
            if let Some(metadata) = &self.config.metadata {
                write_metadata_header(&mut out, metadata)?;
            }
        }
        writeln!(
            out,
            "{}{}{}",
            self.config.time_header, self.config.delimiter, self.config.temperature_header
        )?;
        for &i in &columns {
            let t = result.mantle_temperatures[(node, i)];
            if !t.is_finite() {
                return Err(CsvError::NonFinite {
                    what: "node history",
                });
            }
            writeln!(
                out,
                "{}{}{}",
                format_number(result.times[i], &self.config),
                self.config.delimiter,
                format_number(t, &self.config)
            )?;
        }
        out.flush()?;
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
