//! Plot configuration shared across visualization modules

use plotters::prelude::*;

/// Configuration for customizing plots
///
/// # Example
///
/// ```rust,ignore
/// use pulpsim::output::visualization::PlotConfig;
/// use plotters::prelude::*;
///
/// let mut config = PlotConfig::history("Cook 12");
/// config.line_color = BLUE;
/// config.width = 1920;
/// config.height = 1080;
/// ```
#[derive(Debug, Clone)]
pub struct PlotConfig {
    /// Image width in pixels (default: 1024)
    pub width: u32,

    /// Image height in pixels (default: 768)
    pub height: u32,

    pub title: String,

    pub xlabel: String,

    pub ylabel: String,

    /// Line color for single-series panels (default: RED)
    pub line_color: RGBColor,

    /// Optional colors for multi-series panels
    ///
    /// If None, uses default palette: [RED, BLUE, GREEN, MAGENTA, CYAN, ...]
    pub series_colors: Option<Vec<RGBColor>>,

    pub background: RGBColor,

    /// Line width in pixels (default: 2)
    pub line_width: u32,

    pub show_grid: bool,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            title: "Plot".to_string(),
            xlabel: "Time (s)".to_string(),
            ylabel: String::new(),
            line_color: RED,
            series_colors: None,
            background: WHITE,
            line_width: 2,
            show_grid: true,
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

/// No custom title: the plot type's default is used
pub const NO_TITLE: Option<&str> = None;

impl PlotConfig {
    /// Concentration maps over time and position, one panel per component
    ///
    /// ```rust
    /// use pulpsim::output::visualization::{PlotConfig, NO_TITLE};
    ///
    /// assert_eq!(PlotConfig::cook(NO_TITLE).title, "Kraft cook");
    /// assert_eq!(PlotConfig::cook("Birch, 170 °C").title, "Birch, 170 °C");
    /// ```
    pub fn cook(title: impl IntoOptionalTitle) -> Self {
        Self {
            width: 1024,
            height: 1200,
            title: title.into_optional_title().unwrap_or_else(|| "Kraft cook".to_string()),
            ylabel: "z".to_string(),
            ..Self::default()
        }
    }

    /// Temperature and kappa number over time
    pub fn history(title: impl IntoOptionalTitle) -> Self {
        Self {
            title: title.into_optional_title().unwrap_or_else(|| "Cook history".to_string()),
            ..Self::default()
        }
    }

    pub fn series_colors(colors: Vec<RGBColor>) -> Self {
        Self {
            series_colors: Some(colors),
            ..Self::default()
        }
    }

    /// Color of series `index`, custom colors first, then the default palette
    pub(crate) fn series_color(&self, index: usize) -> RGBColor {
        if let Some(colors) = &self.series_colors
            && index < colors.len()
        {
            return colors[index];
        }

        const PALETTE: [RGBColor; 8] = [
            RED,
            BLUE,
            GREEN,
            MAGENTA,
            CYAN,
            BLACK,
            RGBColor(255, 165, 0),
            RGBColor(128, 0, 128),
        ];
        PALETTE[index % PALETTE.len()]
    }
}

// =================================================================================================
// Tests
// =================================================================================================
