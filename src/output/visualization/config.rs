//! Plot configuration shared across visualization modules
//!
//! This module defines the common configuration structure used by the
//! depth-time heatmaps and the single-node history plots.

use plotters::prelude::*;

/// Configuration for customizing plots
///
/// # Example
///
/// ```rust,ignore
/// use pallas_rs::output::visualization::PlotConfig;
///
/// let mut config = PlotConfig::temperature_history("Default 250 km body");
/// config.width = 1920;  // Full HD
/// config.height = 1080;
/// ```
#[derive(Clone)]
pub struct PlotConfig {
    /// Image width in pixels (default: 1024)
    pub width: u32,

    /// Image height in pixels (default: 768)
    pub height: u32,

    /// Plot title (default: "Plot")
    pub title: String,

    /// X-axis label (default: auto-set by plot type)
    pub xlabel: String,

    /// Y-axis label (default: auto-set by plot type)
    pub ylabel: String,

    /// Line color for history plots (default: RED)
    pub line_color: RGBColor,

    /// Background color (default: WHITE)
    pub background: RGBColor,

    /// Line width in pixels (default: 2)
    pub line_width: u32,

    /// Show grid lines (default: true)
    pub show_grid: bool,

    /// Maximum number of time columns drawn in a heatmap; longer runs are
    /// uniformly subsampled to keep file sizes sane (default: 400)
    pub max_time_samples: usize,

    /// Fixed colour range for heatmaps; None auto-scales to the data
    pub value_range: Option<(f64, f64)>,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            title: "Plot".to_string(),
            xlabel: String::new(),
            ylabel: String::new(),
            line_color: RED,
            background: WHITE,
            line_width: 2,
            show_grid: true,
            max_time_samples: 400,
            value_range: None,
        }
    }
}

/// Helper trait to accept both `String` and `None` for optional titles
pub trait IntoOptionalTitle {
    fn into_optional_title(self) -> Option<String>;
}

impl IntoOptionalTitle for &str {
    fn into_optional_title(self) -> Option<String> {
        Some(self.to_string())
    }
}

impl IntoOptionalTitle for String {
    fn into_optional_title(self) -> Option<String> {
        Some(self)
    }
}

impl<T: IntoOptionalTitle> IntoOptionalTitle for Option<T> {
    fn into_optional_title(self) -> Option<String> {
        self.and_then(|t| t.into_optional_title())
    }
}

/// Constant for no title (the plot type's default title will be used)
pub const NO_TITLE: Option<&str> = None;

impl PlotConfig {
    /// Config for depth-time temperature heatmaps
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// // With custom title (no Some() needed!)
    /// let config = PlotConfig::temperature_history("250 km body");
    ///
    /// // With default title
    /// let config = PlotConfig::temperature_history(NO_TITLE);
    /// ```
    pub fn temperature_history(title: impl IntoOptionalTitle) -> Self {
        let mut config = Self::default();
        config.xlabel = "Time (Myr)".to_string();
        config.ylabel = "Radius (km)".to_string();
        config.title = title
            .into_optional_title()
            .unwrap_or_else(|| "Temperature History".to_string());
        config
    }

    /// Config for depth-time cooling-rate heatmaps
    pub fn cooling_rate_history(title: impl IntoOptionalTitle) -> Self {
        let mut config = Self::default();
        config.xlabel = "Time (Myr)".to_string();
        config.ylabel = "Radius (km)".to_string();
        config.title = title
            .into_optional_title()
            .unwrap_or_else(|| "Cooling Rate History".to_string());
        config
    }

    /// Config for single-node temperature time series
    pub fn node_history(title: impl IntoOptionalTitle) -> Self {
        let mut config = Self::default();
        config.xlabel = "Time (Myr)".to_string();
        config.ylabel = "Temperature (K)".to_string();
        config.title = title
            .into_optional_title()
            .unwrap_or_else(|| "Node Temperature History".to_string());
        config
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plot_config_default() {
        let config = PlotConfig::default();
        assert_eq!(config.width, 1024);
        assert_eq!(config.height, 768);
        assert!(config.show_grid);
        assert_eq!(config.max_time_samples, 400);
    }

    #[test]
    fn test_temperature_history_default_title() {
        let config = PlotConfig::temperature_history(NO_TITLE);
        assert_eq!(config.xlabel, "Time (Myr)");
        assert_eq!(config.title, "Temperature History");
    }

    #[test]
    fn test_temperature_history_with_str() {
        let config = PlotConfig::temperature_history("250 km body");
        assert_eq!(config.title, "250 km body");
    }

    #[test]
    fn test_node_history_with_string() {
        let title = format!("Node at {} km", 30);
        let config = PlotConfig::node_history(title);
        assert_eq!(config.title, "Node at 30 km");
        assert_eq!(config.ylabel, "Temperature (K)");
    }
}
