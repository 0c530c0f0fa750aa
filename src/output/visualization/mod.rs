//! Plots of cook reports, rendered with `plotters`
//!
//! - **config**: Shared plot configuration (`PlotConfig`)
//! - **profiles**: Concentration maps over time and position, plus total moles
//! - **history**: Temperature and kappa number over time
//!
//! Every function picks the backend from the file extension: `.svg` renders
//! an SVG, anything else a bitmap.
//!
//! ```rust,ignore
//! use pulpsim::output::visualization::{plot_cook, plot_history, PlotConfig};
//!
//! plot_cook(&report, "cook.png", None)?;
//! plot_history(&report, "history.svg", Some(&PlotConfig::history("Birch")))?;
//! ```

pub mod config;
pub mod history;
pub mod profiles;

pub use config::{PlotConfig, NO_TITLE};
pub use history::plot_history;
pub use profiles::plot_cook;
