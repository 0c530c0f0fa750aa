//! Output of simulation results
//!
//! ```text
//! output/
//! ├── report.rs           ← CookReport: concentrations, totals, mass balance
//! ├── export/             ← Data export (CSV)
//! └── visualization/      ← PNG/SVG plots
//! ```
//!
//! Export and plots both consume a [`CookReport`], built once from the solver
//! result:
//!
//! ```rust,ignore
//! use pulpsim::output::{plot_cook, CookReport, CsvExporter, Exporter};
//!
//! let report = CookReport::from_result(&cook, &result, 1e-9)?;
//! CsvExporter::default().export(&report, None, "cook.csv")?;
//! plot_cook(&report, "cook.png", None)?;
//! ```

pub mod export;
pub mod report;
pub mod visualization;

pub use export::{CsvConfig, CsvError, CsvExporter, CsvMetadata, Exporter};
pub use report::{CookReport, MassBalance};
pub use visualization::{plot_cook, plot_history, PlotConfig};
