//! Export of cook reports
//!
//! The [`Exporter`] trait abstracts the file format; each format lives in its
//! own sub-module. Adding a format means adding a file.
//!
//! | Format | Module  |
//! |--------|---------|
//! | CSV    | [`csv`] |
//!
//! # Usage example
//!
//! ```rust,ignore
//! use pulpsim::output::export::{CsvExporter, Exporter};
//!
//! let exporter = CsvExporter::default();
//!
//! // Every output time
//! exporter.export(&report, None, "cook.csv")?;
//!
//! // Downsampled to 20 rows
//! exporter.export(&report, Some(20), "cook_light.csv")?;
//! ```

pub mod csv;

pub use csv::{CsvConfig, CsvError, CsvExporter, CsvMetadata};

use std::path::Path;

use crate::output::report::CookReport;

/// Abstraction over export formats
///
/// # Parameter `n_points`
///
/// - `None`: every output time
/// - `Some(n)`: `n` rows spread uniformly over the report, always including
///   the first and the last output time
pub trait Exporter {
    /// Error type specific to this export format.
    type Error: std::error::Error;

    /// Write `report` to `path`
    ///
    /// # Errors
    ///
    /// An empty report, non-finite values, or an unwritable path.
    fn export(
        &self,
        report: &CookReport,
        n_points: Option<usize>,
        path: impl AsRef<Path>,
    ) -> Result<(), Self::Error>;
}

/// Row indices kept when downsampling `len` rows to `n_points`
pub(crate) fn sample_indices(len: usize, n_points: Option<usize>) -> Vec<usize> {
    match n_points {
        Some(n) if n < len && len > 1 => {
            let n = n.max(2);
            let last = (len - 1) as f64;
            let mut indices: Vec<usize> = (0..n)
                .map(|k| (k as f64 * last / (n - 1) as f64).round() as usize)
                .collect();
            indices.dedup();
            indices
        }
        _ => (0..len).collect(),
    }
}
