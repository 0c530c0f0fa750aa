//! Named parameter table read from CSV
//!
//! # File layout
//!
//! ```text
//! name,value,units,description
//! Ncompartments,10,-,Number of wood compartments
//! Tmax,443,K,Maximum cooking temperature
//! ```
//!
//! Only `name` and `value` are interpreted; `units` and `description` are
//! kept for the reader of the file.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::config::ConfigError;

#[derive(Debug, Deserialize)]
struct ParameterRow {
    name: String,
    value: String,
    #[serde(default)]
    #[allow(dead_code)]
    units: String,
    #[serde(default)]
    #[allow(dead_code)]
    description: String,
}

/// Parameter values keyed by name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterTable {
    values: BTreeMap<String, f64>,
}

impl ParameterTable {
    /// Read a parameter file from disk
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be opened, otherwise any error
    /// of [`from_reader`](Self::from_reader).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(file, path)
    }

    /// Read a parameter table from any CSV source
    ///
    /// # Errors
    ///
    /// Malformed CSV, a value that is not a number, or a name defined twice.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ConfigError> {
        Self::parse(reader, Path::new("<input>"))
    }

    fn parse<R: Read>(reader: R, origin: &Path) -> Result<Self, ConfigError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .comment(Some(b'#'))
            .from_reader(reader);

        let mut values = BTreeMap::new();
        for row in reader.deserialize::<ParameterRow>() {
            let row = row.map_err(|source| ConfigError::Csv {
                path: PathBuf::from(origin),
                source,
            })?;

            let value: f64 = row
                .value
                .parse()
                .map_err(|_| ConfigError::invalid(&row.name, &row.value, "not a number"))?;

            if values.insert(row.name.clone(), value).is_some() {
                return Err(ConfigError::DuplicateParameter { name: row.name });
            }
        }

        log::debug!("Loaded {} parameters from {}", values.len(), origin.display());
        Ok(Self { values })
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Required value
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingParameter`] naming the key.
    pub fn get(&self, name: &str) -> Result<f64, ConfigError> {
        self.values
            .get(name)
            .copied()
            .ok_or_else(|| ConfigError::MissingParameter { name: name.to_string() })
    }

    /// Optional value with a default
    pub fn get_or(&self, name: &str, default: f64) -> f64 {
        self.values.get(name).copied().unwrap_or(default)
    }

    /// Optional 0/1 switch with a default
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] for anything other than 0 or 1.
    pub fn get_flag(&self, name: &str, default: bool) -> Result<bool, ConfigError> {
        match self.values.get(name) {
            None => Ok(default),
            Some(v) if *v == 0.0 => Ok(false),
            Some(v) if *v == 1.0 => Ok(true),
            Some(v) => Err(ConfigError::invalid(name, v, "expected 0 or 1")),
        }
    }
}

impl FromIterator<(String, f64)> for ParameterTable {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self { values: iter.into_iter().collect() }
    }
}

// =================================================================================================
// Tests
// =================================================================================================
