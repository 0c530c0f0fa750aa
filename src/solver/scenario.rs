//! Simulation scenario definition
//!
//! A scenario combines a physical model with its initial condition.

use nalgebra::DVector;

use crate::physics::PhysicalModel;

/// Simulation scenario
///
/// Defines a specific case to simulate:
/// - Physical model (equations)
/// - Initial state and time
///
/// # Design
///
/// The same scenario can be solved with different numerical methods.
/// This is the "WHAT to solve" (not "HOW to solve").
///
/// # Examples
///
/// ```rust,ignore
/// let scenario = Scenario::new(Box::new(cook));
///
/// let adaptive = Dopri5Solver::new().solve(&scenario, &adaptive_config)?;
/// let fixed = RK4Solver::new().solve(&scenario, &fixed_config)?;
/// ```
pub struct Scenario {
    /// Physical model (equations)
    pub model: Box<dyn PhysicalModel>,

    /// Flat state at `initial_time`
    pub initial_state: DVector<f64>,

    /// Time of the initial state \[s\]
    pub initial_time: f64,
}

impl Scenario {
    /// Scenario starting from the model's own initial state at t = 0
    pub fn new(model: Box<dyn PhysicalModel>) -> Self {
        let initial_state = model.setup_initial_state();
        Self {
            model,
            initial_state,
            initial_time: 0.0,
        }
    }

    /// Scenario starting from an explicit state and time
    pub fn with_initial_condition(
        model: Box<dyn PhysicalModel>,
        initial_state: DVector<f64>,
        initial_time: f64,
    ) -> Self {
        Self { model, initial_state, initial_time }
    }

    /// Verify that the initial condition fits the model
    pub fn validate(&self) -> Result<(), String> {
        if self.initial_state.len() != self.model.dimension() {
            return Err(format!(
                "Initial state has {} entries but model '{}' expects {}",
                self.initial_state.len(),
                self.model.name(),
                self.model.dimension()
            ));
        }
        if !self.initial_time.is_finite() {
            return Err(format!("Initial time must be finite, got {}", self.initial_time));
        }
        crate::solver::validate_state(&self.initial_state, 0)
    }

    /// Get model name
    pub fn get_model_name(&self) -> &str {
        self.model.name()
    }

    /// Length of the flat state
    pub fn ndim(&self) -> usize {
        self.model.dimension()
    }
}

impl std::fmt::Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.get_model_name())
            .field("dimension", &self.ndim())
            .field("initial time", &self.initial_time)
            .finish()
    }
}

// ================================================================================================
// Tests
// ================================================================================================
