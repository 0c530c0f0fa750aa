//! Parameter loading
//!
//! A cook is described by a CSV table of named values (see [`table`]). The
//! table is validated once into [`CookParameters`], which then builds the
//! model and the solver configuration:
//!
//! ```rust,ignore
//! use pulpsim::config::CookParameters;
//!
//! let parameters = CookParameters::from_path("data/parameters.csv")?;
//! let cook = parameters.build_model()?;
//! let config = parameters.adaptive_configuration();
//! ```
//!
//! Failures are reported as [`ConfigError`] before any integration starts.

pub mod error;
pub mod parameters;
pub mod table;

pub use error::ConfigError;
pub use parameters::CookParameters;
pub use table::ParameterTable;
