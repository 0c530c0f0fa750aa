//! Typed cook parameters
//!
//! [`CookParameters`] is built once from a [`ParameterTable`], validated, and
//! then only read. It assembles every part of a [`KraftCook`] as well as the
//! solver configuration of a run.

use std::path::Path;

use nalgebra::{DMatrix, DVector};

use crate::config::{ConfigError, ParameterTable};
use crate::models::{
    CookGeometry, KineticsVariant, KraftCook, KraftKinetics, PhaseLimits, TemperatureSchedule,
    TransportProperties,
};
use crate::physics::{CompartmentState, ComponentSet};
use crate::solver::SolverConfiguration;

const DEFAULT_T_END: f64 = 100.0;
const DEFAULT_OUTPUT_POINTS: f64 = 50.0;
/// Largest accepted compartment or output-point count
const MAX_COUNT: f64 = u32::MAX as f64;
const DEFAULT_ALKALI_DIFFUSIVITY: f64 = 0.02;
const DEFAULT_ALKALI_MASS_TRANSFER: f64 = 0.1;
const DEFAULT_MASS_BALANCE_TOLERANCE: f64 = 1e-9;
const DEFAULT_RTOL: f64 = 1e-8;
const DEFAULT_ATOL: f64 = 1e-10;

/// Everything needed to run one cook
#[derive(Debug, Clone, PartialEq)]
pub struct CookParameters {
    pub n_compartments: usize,
    /// \[m³\]
    pub liquor_volume: f64,
    /// \[m³\]
    pub wood_volume: f64,
    /// Contact area \[m²\]
    pub area: f64,
    /// Dry wood mass \[kg\]
    pub wood_mass: f64,
    pub density: f64,
    pub porinf: f64,

    /// Lignin fraction at and above which the bulk regime applies
    pub phase_limit_1: f64,
    /// Lignin fraction at and above which the transition regime applies
    pub phase_limit_2: f64,

    /// \[K\]
    pub initial_temperature: f64,
    /// \[K\]
    pub max_temperature: f64,
    /// Ramp duration \[min\]
    pub ramp_minutes: f64,

    pub variant: KineticsVariant,

    /// Moles per wood compartment
    pub initial_lignin: f64,
    /// Moles per wood compartment
    pub initial_carbohydrate: f64,
    /// Moles in the liquor
    pub initial_alkali: f64,
    /// Moles in the liquor
    pub initial_sulfur: f64,

    /// Cook duration \[s\]
    pub t_end: f64,
    pub output_points: usize,

    pub alkali_diffusivity: f64,
    pub alkali_mass_transfer: f64,
    pub sulfur_diffusivity: f64,
    pub sulfur_mass_transfer: f64,

    /// Multiply the alkali consumption rate by density / porinf
    pub scale_alkali_consumption: bool,
    /// Multiply reaction terms by the wood compartment volume
    pub scale_reaction_by_volume: bool,

    pub mass_balance_tolerance: f64,
    pub rtol: f64,
    pub atol: f64,
}

impl CookParameters {
    /// Load and validate a parameter file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_table(&ParameterTable::from_path(path)?)
    }

    /// Validate a parameter table
    ///
    /// # Errors
    ///
    /// The first missing key, out-of-range value or ambiguous model selection,
    /// checked before any model is built.
    pub fn from_table(table: &ParameterTable) -> Result<Self, ConfigError> {
        let variant = select_variant(
            table.get("Andersson_model")?,
            table.get("Gustafsson_model")?,
        )?;

        let parameters = Self {
            n_compartments: count(table, "Ncompartments", None)?,
            liquor_volume: positive(table, "liquor_volume")?,
            wood_volume: positive(table, "wood_volume")?,
            area: positive(table, "A")?,
            wood_mass: positive(table, "wood_mass")?,
            density: positive(table, "density")?,
            porinf: positive(table, "porinf")?,
            phase_limit_1: finite("phase_limit_1", table.get("phase_limit_1")?)?,
            phase_limit_2: finite("phase_limit_2", table.get("phase_limit_2")?)?,
            initial_temperature: positive(table, "Ti")?,
            max_temperature: positive(table, "Tmax")?,
            ramp_minutes: positive(table, "toTmax")?,
            variant,
            initial_lignin: non_negative(table, "initial_lignin", None)?,
            initial_carbohydrate: non_negative(table, "initial_carbohydrate", None)?,
            initial_alkali: non_negative(table, "initial_alkali", None)?,
            initial_sulfur: non_negative(table, "initial_sulfur", None)?,
            t_end: positive_or(table, "t_end", DEFAULT_T_END)?,
            output_points: count(table, "output_points", Some(DEFAULT_OUTPUT_POINTS))?,
            alkali_diffusivity: non_negative(table, "alkali_diffusivity", Some(DEFAULT_ALKALI_DIFFUSIVITY))?,
            alkali_mass_transfer: non_negative(table, "alkali_mass_transfer", Some(DEFAULT_ALKALI_MASS_TRANSFER))?,
            sulfur_diffusivity: non_negative(table, "sulfur_diffusivity", Some(0.0))?,
            sulfur_mass_transfer: non_negative(table, "sulfur_mass_transfer", Some(0.0))?,
            scale_alkali_consumption: table.get_flag("scale_alkali_consumption", true)?,
            scale_reaction_by_volume: table.get_flag("scale_reaction_by_volume", true)?,
            mass_balance_tolerance: non_negative(table, "mass_balance_tolerance", Some(DEFAULT_MASS_BALANCE_TOLERANCE))?,
            rtol: positive_or(table, "rtol", DEFAULT_RTOL)?,
            atol: positive_or(table, "atol", DEFAULT_ATOL)?,
        };

        if parameters.phase_limit_1 <= parameters.phase_limit_2 {
            return Err(ConfigError::invalid(
                "phase_limit_1",
                parameters.phase_limit_1,
                format!("must exceed phase_limit_2 ({})", parameters.phase_limit_2),
            ));
        }
        if parameters.max_temperature < parameters.initial_temperature {
            return Err(ConfigError::invalid(
                "Tmax",
                parameters.max_temperature,
                format!("must not be below Ti ({})", parameters.initial_temperature),
            ));
        }
        if parameters.output_points < 2 {
            return Err(ConfigError::invalid(
                "output_points",
                parameters.output_points,
                "at least 2 output times are required",
            ));
        }

        log::debug!(
            "Cook parameters: {} compartments, {} kinetics, {} s",
            parameters.n_compartments,
            parameters.variant.name(),
            parameters.t_end
        );

        Ok(parameters)
    }

    // =============================================================================================
    // Model parts
    // =============================================================================================

    pub fn geometry(&self) -> CookGeometry {
        CookGeometry {
            n_compartments: self.n_compartments,
            liquor_volume: self.liquor_volume,
            wood_volume: self.wood_volume,
            wood_mass: self.wood_mass,
        }
    }

    /// Ramp from `Ti` to `Tmax` over `toTmax` minutes, then hold
    pub fn schedule(&self) -> TemperatureSchedule {
        TemperatureSchedule::ramp_hold(
            self.initial_temperature,
            self.max_temperature,
            self.ramp_minutes * 60.0,
        )
    }

    pub fn transport_properties(&self) -> Result<TransportProperties, ConfigError> {
        TransportProperties::new(
            DVector::from_vec(vec![0.0, 0.0, self.alkali_diffusivity, self.sulfur_diffusivity]),
            DVector::from_vec(vec![0.0, 0.0, self.alkali_mass_transfer, self.sulfur_mass_transfer]),
            self.area,
        )
        .map_err(|reason| ConfigError::invalid("A", self.area, reason))
    }

    /// Alkali consumption scale `ρ`
    pub fn alkali_consumption_scale(&self) -> f64 {
        if self.scale_alkali_consumption {
            self.density / self.porinf
        } else {
            1.0
        }
    }

    pub fn kinetics(&self) -> Result<KraftKinetics, ConfigError> {
        let limits = PhaseLimits::new(self.phase_limit_1, self.phase_limit_2)
            .map_err(|reason| ConfigError::invalid("phase_limit_1", self.phase_limit_1, reason))?;

        Ok(KraftKinetics::new(self.variant, limits)
            .with_alkali_consumption_scale(self.alkali_consumption_scale()))
    }

    /// Lignin and carbohydrate in every wood compartment, alkali and sulfur in the liquor
    pub fn initial_state(&self) -> CompartmentState {
        let liquor = DVector::from_vec(vec![0.0, 0.0, self.initial_alkali, self.initial_sulfur]);

        let mut wood = DMatrix::zeros(4, self.n_compartments);
        wood.row_mut(0).fill(self.initial_lignin);
        wood.row_mut(1).fill(self.initial_carbohydrate);

        CompartmentState { liquor, wood }
    }

    /// Assemble the kraft cook
    ///
    /// # Errors
    ///
    /// A field that no longer satisfies the model, reported under its
    /// parameter file key.
    pub fn build_model(&self) -> Result<KraftCook, ConfigError> {
        self.check_model_parts()?;

        let cook = KraftCook::new(
            ComponentSet::kraft(),
            self.geometry(),
            self.schedule(),
            self.transport_properties()?,
            Box::new(self.kinetics()?),
            self.initial_state(),
        )
        .map_err(|reason| ConfigError::invalid("Ncompartments", self.n_compartments, reason))?;

        Ok(cook.with_reaction_volume_scaling(self.scale_reaction_by_volume))
    }

    /// Fields are public, so re-check what the cook model relies on
    fn check_model_parts(&self) -> Result<(), ConfigError> {
        if self.n_compartments == 0 {
            return Err(ConfigError::invalid(
                "Ncompartments",
                self.n_compartments,
                "at least one wood compartment is required",
            ));
        }
        for (name, value) in [
            ("liquor_volume", self.liquor_volume),
            ("wood_volume", self.wood_volume),
            ("wood_mass", self.wood_mass),
            ("Ti", self.initial_temperature),
            ("toTmax", self.ramp_minutes),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::invalid(name, value, "must be positive"));
            }
        }
        if !self.max_temperature.is_finite() || self.max_temperature < self.initial_temperature {
            return Err(ConfigError::invalid(
                "Tmax",
                self.max_temperature,
                format!("must not be below Ti ({})", self.initial_temperature),
            ));
        }
        for (name, value) in [
            ("initial_lignin", self.initial_lignin),
            ("initial_carbohydrate", self.initial_carbohydrate),
            ("initial_alkali", self.initial_alkali),
            ("initial_sulfur", self.initial_sulfur),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(name, value, "must be non-negative"));
            }
        }
        Ok(())
    }

    // =============================================================================================
    // Run configuration
    // =============================================================================================

    /// `output_points` evenly spaced times on \[0, t_end\]
    pub fn output_times(&self) -> Vec<f64> {
        let last = (self.output_points - 1) as f64;
        (0..self.output_points)
            .map(|k| self.t_end * k as f64 / last)
            .collect()
    }

    /// Adaptive run reporting at [`output_times`](Self::output_times)
    pub fn adaptive_configuration(&self) -> SolverConfiguration {
        SolverConfiguration::adaptive(self.output_times(), self.rtol, self.atol)
    }

    /// Fixed-step run over \[0, t_end\]
    pub fn fixed_step_configuration(&self, time_steps: usize) -> SolverConfiguration {
        SolverConfiguration::time_evolution(self.t_end, time_steps)
    }
}

// =================================================================================================
// Field readers
// =================================================================================================

fn select_variant(andersson: f64, gustafsson: f64) -> Result<KineticsVariant, ConfigError> {
    match (andersson == 1.0, gustafsson == 1.0) {
        (true, false) if gustafsson == 0.0 => Ok(KineticsVariant::Andersson),
        (false, true) if andersson == 0.0 => Ok(KineticsVariant::Gustafsson),
        _ => Err(ConfigError::ModelSelection { andersson, gustafsson }),
    }
}

fn finite(name: &str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::invalid(name, value, "must be finite"))
    }
}

fn positive(table: &ParameterTable, name: &str) -> Result<f64, ConfigError> {
    let value = finite(name, table.get(name)?)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::invalid(name, value, "must be positive"))
    }
}

fn positive_or(table: &ParameterTable, name: &str, default: f64) -> Result<f64, ConfigError> {
    let value = finite(name, table.get_or(name, default))?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::invalid(name, value, "must be positive"))
    }
}

fn non_negative(table: &ParameterTable, name: &str, default: Option<f64>) -> Result<f64, ConfigError> {
    let value = match default {
        Some(default) => table.get_or(name, default),
        None => table.get(name)?,
    };
    let value = finite(name, value)?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::invalid(name, value, "must not be negative"))
    }
}

/// Whole number >= 1
fn count(table: &ParameterTable, name: &str, default: Option<f64>) -> Result<usize, ConfigError> {
    let value = match default {
        Some(default) => table.get_or(name, default),
        None => table.get(name)?,
    };
    if !value.is_finite() || value < 1.0 || value.fract() != 0.0 {
        return Err(ConfigError::invalid(name, value, "must be a whole number of at least 1"));
    }
    if value > MAX_COUNT {
        return Err(ConfigError::invalid(name, value, format!("must not exceed {MAX_COUNT}")));
    }
    Ok(value as usize)
}

// =================================================================================================
// Tests
// =================================================================================================
