//! Numerical solver traits and types
//!
//! # Design Philosophy
//!
//! - Central enum `SolverType` defines the kind of numerical solution
//! - `SolverConfiguration` carries a `SolverType` and validates it
//! - `SimulationResult` carries the trajectory, the diagnostic log and
//!   free-form metadata
//!
//! # Stability Guarantee
//!
//! - `Solver` trait: stable interface, new methods get default implementations
//! - `SolverType` enum: EXTENSIBLE (new variants can be added)

use std::collections::HashMap;

use nalgebra::DVector;

use crate::physics::DiagnosticLog;
use crate::solver::Scenario;

// =================================================================================================
// Solver Type
// =================================================================================================

/// Type of numerical solution method
///
/// Each variant carries the data specific to that solution type.
///
/// # Examples
///
/// ```rust
/// use pulpsim::solver::SolverType;
///
/// // Fixed-step time evolution
/// let fixed = SolverType::TimeEvolution { total_time: 100.0, time_steps: 1000 };
/// assert!(fixed.validate().is_ok());
///
/// // Adaptive integration reporting at given times
/// let adaptive = SolverType::Adaptive {
///     output_times: vec![0.0, 50.0, 100.0],
///     rtol: 1e-8,
///     atol: 1e-10,
/// };
/// assert!(adaptive.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum SolverType {
    /// Fixed-step time evolution from the scenario's initial time
    ///
    /// Used by: Euler, Runge-Kutta 4
    ///
    /// # Parameters
    /// - `total_time`: Simulated duration (seconds)
    /// - `time_steps`: Number of equal steps
    TimeEvolution {
        total_time: f64,
        time_steps: usize,
    },

    /// Adaptive-step integration with one output per requested time
    ///
    /// Used by: Dormand-Prince
    ///
    /// # Parameters
    /// - `output_times`: Strictly increasing, the first one is the initial time
    /// - `rtol`, `atol`: Relative and absolute error tolerances
    Adaptive {
        output_times: Vec<f64>,
        rtol: f64,
        atol: f64,
    },
}

impl SolverType {
    /// Get name identifier
    pub fn name(&self) -> &str {
        match self {
            SolverType::TimeEvolution { .. } => "TimeEvolution",
            SolverType::Adaptive { .. } => "Adaptive",
        }
    }

    /// Validate that parameters are numerically meaningful
    pub fn validate(&self) -> Result<(), String> {
        match self {
            SolverType::TimeEvolution { total_time, time_steps } => {
                if !total_time.is_finite() || *total_time <= 0.0 {
                    return Err("Total time must be positive".to_string());
                }
                if *time_steps == 0 {
                    return Err("TimeSteps must be greater than 0".to_string());
                }
                Ok(())
            }
            SolverType::Adaptive { output_times, rtol, atol } => {
                if output_times.len() < 2 {
                    return Err("At least two output times are required".to_string());
                }
                if output_times.iter().any(|t| !t.is_finite()) {
                    return Err("Output times must be finite".to_string());
                }
                if let Some(pair) = output_times.windows(2).find(|w| w[1] <= w[0]) {
                    return Err(format!(
                        "Output times must be strictly increasing, got {} then {}",
                        pair[0], pair[1]
                    ));
                }
                if !(rtol.is_finite() && *rtol > 0.0) {
                    return Err(format!("Relative tolerance must be positive, got {rtol}"));
                }
                if !(atol.is_finite() && *atol > 0.0) {
                    return Err(format!("Absolute tolerance must be positive, got {atol}"));
                }
                Ok(())
            }
        }
    }
}

// =================================================================================================
// Solver configuration
// =================================================================================================

/// Configuration for numerical solver
///
/// # Examples
///
/// ```rust
/// use pulpsim::solver::SolverConfiguration;
///
/// let fixed = SolverConfiguration::time_evolution(100.0, 1000);
/// let adaptive = SolverConfiguration::adaptive(vec![0.0, 50.0, 100.0], 1e-8, 1e-10);
///
/// assert!(fixed.validate().is_ok());
/// assert!(adaptive.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SolverConfiguration {
    /// Type of solver and its parameters
    pub solver_type: SolverType,
}

impl SolverConfiguration {
    /// Create a new configuration with a given solver type
    pub fn new(solver_type: SolverType) -> Self {
        Self { solver_type }
    }

    /// Create a fixed-step time evolution configuration
    pub fn time_evolution(total_time: f64, time_steps: usize) -> Self {
        Self::new(SolverType::TimeEvolution { total_time, time_steps })
    }

    /// Create an adaptive configuration
    pub fn adaptive(output_times: Vec<f64>, rtol: f64, atol: f64) -> Self {
        Self::new(SolverType::Adaptive { output_times, rtol, atol })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        self.solver_type.validate()
    }
}

// =================================================================================================
// Simulation result
// =================================================================================================

/// Trajectory produced by a solver
///
/// `time_points[k]` is the time of `state_trajectory[k]`; `final_state` is the
/// last entry of the trajectory. The result is owned by the caller and never
/// modified by the solver after it is returned.
#[derive(Clone, Debug)]
pub struct SimulationResult {
    /// Output times, increasing
    pub time_points: Vec<f64>,

    /// Flat states, one per output time
    pub state_trajectory: Vec<DVector<f64>>,

    /// State at the last output time
    pub final_state: DVector<f64>,

    /// Diagnostics recorded on accepted states
    pub diagnostics: DiagnosticLog,

    /// Solver-specific information (name, step counts, tolerances...)
    pub metadata: HashMap<String, String>,
}

impl SimulationResult {
    pub fn new(
        time_points: Vec<f64>,
        state_trajectory: Vec<DVector<f64>>,
        final_state: DVector<f64>,
    ) -> Self {
        Self {
            time_points,
            state_trajectory,
            final_state,
            diagnostics: DiagnosticLog::new(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: DiagnosticLog) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Add a metadata entry, replacing any previous value
    pub fn add_metadata(&mut self, key: &str, value: &str) {
        self.metadata.insert(key.to_string(), value.to_string());
    }

    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// Number of stored states
    pub fn len(&self) -> usize {
        self.state_trajectory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state_trajectory.is_empty()
    }
}

// =================================================================================================
// Solver trait
// =================================================================================================

/// Numerical method applied to a [`Scenario`]
///
/// # Contract
///
/// - validates the configuration and the scenario before integrating
/// - calls [`PhysicalModel::observe`](crate::physics::PhysicalModel::observe)
///   on the initial state and on every stored state, never on trial stages
/// - returns `Err` with a diagnostic message on NaN/Inf or integrator failure
pub trait Solver {
    fn solve(
        &self,
        scenario: &Scenario,
        config: &SolverConfiguration,
    ) -> Result<SimulationResult, String>;

    fn name(&self) -> &str;
}

// =================================================================================================
// Tests
// =================================================================================================
