//! CSV export of cook reports
//!
//! One row per output time, with the columns:
//!
//! ```text
//! time,temperature,kappa,total_moles,liquor_<component>...,wood_<component>...
//! ```
//!
//! `wood_<component>` is the mean concentration over all wood compartments.
//! `kappa` is left empty when the component set has no lignin/carbohydrate.
//!
//! # Example
//!
//! ```rust,ignore
//! use pulpsim::output::export::{CsvConfig, CsvExporter, CsvMetadata, Exporter};
//!
//! let exporter = CsvExporter::new(
//!     CsvConfig::default().with_metadata(CsvMetadata::from_result("Kraft cook", &result)),
//! );
//! exporter.export(&report, None, "cook.csv")?;
//! ```
//!
//! **Output** (`cook.csv`):
//! ```text
//! # Kraft pulping simulation
//! # Model: Kraft cook
//! # Solver: Dormand-Prince 5(4)
//! #
//! time,temperature,kappa,total_moles,liquor_Lignin,...
//! 0.000000,300.000000,255.000000,2.200000,0.000000,...
//! ```

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::output::export::{sample_indices, Exporter};
use crate::output::report::CookReport;
use crate::solver::SimulationResult;

// =================================================================================================
// Errors
// =================================================================================================

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("nothing to export: the report is empty")]
    EmptyReport,

    #[error("delimiter {0:?} is not a single ASCII character")]
    InvalidDelimiter(char),

    #[error("non-finite value in column '{column}' at row {row}")]
    NonFinite { column: String, row: usize },
}

// =================================================================================================
// Configuration
// =================================================================================================

/// Formatting options for CSV export
#[derive(Debug, Clone)]
pub struct CsvConfig {
    /// Column delimiter (default: ',')
    pub delimiter: char,

    /// Decimal separator (default: '.')
    pub decimal_separator: char,

    /// Decimal places (default: 6)
    pub precision: usize,

    pub include_metadata: bool,

    pub metadata: Option<CsvMetadata>,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            decimal_separator: '.',
            precision: 6,
            include_metadata: false,
            metadata: None,
        }
    }
}

impl CsvConfig {
    /// Semicolon-delimited, comma as decimal separator
    pub fn european() -> Self {
        Self {
            delimiter: ';',
            decimal_separator: ',',
            ..Default::default()
        }
    }

    pub fn high_precision() -> Self {
        Self {
            precision: 12,
            ..Default::default()
        }
    }

    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_metadata(mut self, metadata: CsvMetadata) -> Self {
        self.include_metadata = true;
        self.metadata = Some(metadata);
        self
    }

    fn format(&self, value: f64) -> String {
        let formatted = format!("{:.prec$}", value, prec = self.precision);
        if self.decimal_separator != '.' {
            formatted.replace('.', &self.decimal_separator.to_string())
        } else {
            formatted
        }
    }
}

/// Header comments written above the table
#[derive(Debug, Clone, Default)]
pub struct CsvMetadata {
    pub model_name: Option<String>,
    pub solver_name: Option<String>,
    pub custom: Vec<(String, String)>,
}

impl CsvMetadata {
    /// Model name plus every metadata entry the solver recorded
    pub fn from_result(model: &str, result: &SimulationResult) -> Self {
        let mut custom: Vec<(String, String)> = result
            .metadata
            .iter()
            .filter(|(key, _)| key.as_str() != "solver")
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        custom.sort();

        Self {
            model_name: Some(model.to_string()),
            solver_name: result.metadata("solver").map(str::to_string),
            custom,
        }
    }

    pub fn add_custom(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.custom.push((key.into(), value.into()));
    }

    fn write_header<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "# Kraft pulping simulation")?;
        if let Some(model) = &self.model_name {
            writeln!(out, "# Model: {model}")?;
        }
        if let Some(solver) = &self.solver_name {
            writeln!(out, "# Solver: {solver}")?;
        }
        for (key, value) in &self.custom {
            writeln!(out, "# {key}: {value}")?;
        }
        writeln!(out, "#")
    }
}

// =================================================================================================
// Exporter
// =================================================================================================

#[derive(Debug, Clone, Default)]
pub struct CsvExporter {
    pub config: CsvConfig,
}

impl CsvExporter {
    pub fn new(config: CsvConfig) -> Self {
        Self { config }
    }

    fn header(report: &CookReport) -> Vec<String> {
        let mut header: Vec<String> = ["time", "temperature", "kappa", "total_moles"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        header.extend(report.component_names.iter().map(|c| format!("liquor_{c}")));
        header.extend(report.component_names.iter().map(|c| format!("wood_{c}")));
        header
    }

    /// Raw values of row `k`, `None` for an empty cell
    fn row_values(report: &CookReport, k: usize) -> Vec<Option<f64>> {
        let mut row = vec![
            Some(report.time_points[k]),
            Some(report.temperature[k]),
            report.kappa[k],
            Some(report.total_moles[k]),
        ];
        row.extend(report.liquor_concentrations[k].iter().map(|c| Some(*c)));
        row.extend(report.mean_wood_concentration(k).iter().map(|c| Some(*c)));
        row
    }
}

impl Exporter for CsvExporter {
    type Error = CsvError;

    fn export(
        &self,
        report: &CookReport,
        n_points: Option<usize>,
        path: impl AsRef<Path>,
    ) -> Result<(), CsvError> {
        let path = path.as_ref();

        // ====== Validation ======

        if report.is_empty() {
            return Err(CsvError::EmptyReport);
        }
        if !self.config.delimiter.is_ascii() {
            return Err(CsvError::InvalidDelimiter(self.config.delimiter));
        }

        let header = Self::header(report);
        let rows = sample_indices(report.len(), n_points);

        for &k in &rows {
            for (value, column) in Self::row_values(report, k).iter().zip(&header) {
                if let Some(v) = value
                    && !v.is_finite()
                {
                    return Err(CsvError::NonFinite { column: column.clone(), row: k });
                }
            }
        }

        // ====== Write ======

        let io_error = |source| CsvError::Io { path: path.to_path_buf(), source };

        let mut file = File::create(path).map_err(io_error)?;
        if self.config.include_metadata
            && let Some(metadata) = &self.config.metadata
        {
            metadata.write_header(&mut file).map_err(io_error)?;
        }

        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.config.delimiter as u8)
            .from_writer(file);

        let n_rows = rows.len();
        writer.write_record(&header)?;
        for k in rows {
            let record: Vec<String> = Self::row_values(report, k)
                .into_iter()
                .map(|value| value.map(|v| self.config.format(v)).unwrap_or_default())
                .collect();
            writer.write_record(&record)?;
        }
        writer.flush().map_err(io_error)?;

        log::debug!("Exported {} rows to {}", n_rows, path.display());
        Ok(())
    }
}

// =================================================================================================
// Tests
// =================================================================================================
