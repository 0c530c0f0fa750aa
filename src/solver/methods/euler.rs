//! Forward Euler numerical solver
//!
//! # Mathematical Background
//!
//! For the system `dy/dt = f(t, y)` the scheme advances the solution from
//! `t_n` to `t_{n+1} = t_n + dt` with:
//!
//! ```text
//! y_{n+1} = y_n + dt * f(t_n, y_n)
//! ```
//!
//! # Characteristics
//!
//! - **Order**: First-order accurate (global error ~ O(dt))
//! - **Stability**: Conditionally stable
//! - **Complexity**: 1 function evaluation per step
//!
//! # When to Use
//!
//! Quick exploratory cooks and reference runs in tests. For production cooks
//! use [`Dopri5Solver`](crate::solver::Dopri5Solver).
//!
//! # Example
//!
//! ```rust,ignore
//! use pulpsim::solver::{EulerSolver, Solver, SolverConfiguration};
//!
//! let config = SolverConfiguration::time_evolution(100.0, 10_000);
//! let result = EulerSolver::new().solve(&scenario, &config)?;
//! ```

use crate::physics::DiagnosticLog;
use crate::solver::{validate_state, Scenario, SimulationResult, Solver, SolverConfiguration, SolverType};

// =================================================================================================
// Forward Euler Solver
// =================================================================================================

/// Forward Euler time-stepping solver
///
/// # Algorithm
///
/// 1. Start with the scenario's initial state `y_0` at `t_0`
/// 2. For each step n = 0, 1, ..., N-1:
///    - `k = f(t_n, y_n)`
///    - `y_{n+1} = y_n + dt * k`
///    - store and observe `y_{n+1}`
/// 3. Return the complete trajectory
///
/// Every step is accepted, so every stored state is passed to
/// [`PhysicalModel::observe`](crate::physics::PhysicalModel::observe).
#[derive(Debug, Clone, Copy, Default)]
pub struct EulerSolver;

impl EulerSolver {
    /// Create a new Forward Euler solver
    ///
    /// ```rust
    /// use pulpsim::solver::{EulerSolver, Solver};
    ///
    /// assert_eq!(EulerSolver::new().name(), "Forward Euler");
    /// ```
    pub fn new() -> Self {
        Self
    }
}

impl Solver for EulerSolver {
    fn solve(&self, scenario: &Scenario, config: &SolverConfiguration) -> Result<SimulationResult, String> {

        // ====== Step 1: Validation ======

        config.validate()?;
        scenario.validate()?;

        let (total_time, time_steps) = match &config.solver_type {
            SolverType::TimeEvolution { total_time, time_steps } => (*total_time, *time_steps),
            other => {
                return Err(format!(
                    "EulerSolver only supports TimeEvolution configuration, got {}",
                    other.name()
                ));
            }
        };

        // ====== Step 2: Setup ======

        let dt = total_time / (time_steps as f64);
        let t0 = scenario.initial_time;
        let model = scenario.model.as_ref();

        let mut state = scenario.initial_state.clone();
        let mut diagnostics = DiagnosticLog::new();

        let mut time_points = Vec::with_capacity(time_steps + 1);
        let mut state_trajectory = Vec::with_capacity(time_steps + 1);

        time_points.push(t0);
        state_trajectory.push(state.clone());
        model.observe(t0, &state, &mut diagnostics);

        // ====== Step 3: Time Integration ======

        for step in 0..time_steps {
            let t = t0 + dt * step as f64;

            let slope = model.compute_physics(t, &state);
            state += slope * dt;

            validate_state(&state, step + 1)?;

            // time from the index, not accumulated, so the last point is t0 + total_time
            let t_next = t0 + (step as f64 + 1.0) * dt;
            model.observe(t_next, &state, &mut diagnostics);

            time_points.push(t_next);
            state_trajectory.push(state.clone());
        }

        // ====== Step 4: Build Result ======

        let mut result = SimulationResult::new(time_points, state_trajectory, state)
            .with_diagnostics(diagnostics);

        result.add_metadata("solver", self.name());
        result.add_metadata("time steps", &time_steps.to_string());
        result.add_metadata("dt", &dt.to_string());
        result.add_metadata("total time", &total_time.to_string());
        result.add_metadata("function evaluations", &time_steps.to_string());

        Ok(result)
    }

    fn name(&self) -> &'static str {
        "Forward Euler"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
