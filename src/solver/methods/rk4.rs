//! Runge-Kutta 4 (RK4) numerical solver
//!
//! # Mathematical Background
//!
//! The classical fourth-order scheme uses a weighted average of four slope
//! estimates:
//!
//! ```text
//! k₁ = f(tₙ,        yₙ)
//! k₂ = f(tₙ + dt/2, yₙ + dt/2 * k₁)
//! k₃ = f(tₙ + dt/2, yₙ + dt/2 * k₂)
//! k₄ = f(tₙ + dt,   yₙ + dt * k₃)
//!
//! yₙ₊₁ = yₙ + dt/6 * (k₁ + 2k₂ + 2k₃ + k₄)
//! ```
//!
//! # Characteristics
//!
//! - **Order**: Fourth-order accurate (global error ~ O(dt⁴))
//! - **Complexity**: 4 function evaluations per step
//! - **Step size**: fixed, no error control
//!
//! The intermediate states at which `k₂`, `k₃`, `k₄` are evaluated are trial
//! states: they are never stored nor observed.
//!
//! # Comparison with Euler
//!
//! | Method | Order | Evals/Step | Error  |
//! |--------|-------|------------|--------|
//! | Euler  | 1     | 1          | O(dt)  |
//! | RK4    | 4     | 4          | O(dt⁴) |

use crate::physics::DiagnosticLog;
use crate::solver::{validate_state, Scenario, SimulationResult, Solver, SolverConfiguration, SolverType};

// =================================================================================================
// RK4 Solver
// =================================================================================================

/// Classical fourth-order Runge-Kutta solver
///
/// # Example
///
/// ```rust
/// use nalgebra::DVector;
/// use pulpsim::physics::PhysicalModel;
/// use pulpsim::solver::{RK4Solver, Scenario, Solver, SolverConfiguration};
///
/// struct Growth;
///
/// impl PhysicalModel for Growth {
///     fn dimension(&self) -> usize { 1 }
///     fn compute_physics(&self, _t: f64, y: &DVector<f64>) -> DVector<f64> { y.clone() }
///     fn setup_initial_state(&self) -> DVector<f64> { DVector::from_element(1, 1.0) }
///     fn name(&self) -> &str { "Growth" }
/// }
///
/// let scenario = Scenario::new(Box::new(Growth));
/// let result = RK4Solver::new()
///     .solve(&scenario, &SolverConfiguration::time_evolution(1.0, 100))
///     .unwrap();
///
/// assert!((result.final_state[0] - std::f64::consts::E).abs() < 1e-8);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RK4Solver;

impl RK4Solver {
    pub fn new() -> Self {
        Self
    }
}

impl Solver for RK4Solver {
    fn solve(
        &self,
        scenario: &Scenario,
        config: &SolverConfiguration,
    ) -> Result<SimulationResult, String> {

        // ====== Step 1: Validation ======

        config.validate()?;
        scenario.validate()?;

        let (total_time, time_steps) = match &config.solver_type {
            SolverType::TimeEvolution { total_time, time_steps } => (*total_time, *time_steps),
            other => {
                return Err(format!(
                    "RK4Solver only supports TimeEvolution configuration, got {}",
                    other.name()
                ));
            }
        };

        // ====== Step 2: Setup ======

        let dt = total_time / (time_steps as f64);
        let half = dt / 2.0;
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
            let t = t0 + (step as f64) * dt;

            // ====== RK4 Stages ======

            let k1 = model.compute_physics(t, &state);
            let k2 = model.compute_physics(t + half, &(&state + &k1 * half));
            let k3 = model.compute_physics(t + half, &(&state + &k2 * half));
            let k4 = model.compute_physics(t + dt, &(&state + &k3 * dt));

            // ====== RK4 Update ======

            state += (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0);

            validate_state(&state, step + 1)?;

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
        result.add_metadata("function evaluations", &(4 * time_steps).to_string());

        Ok(result)
    }

    fn name(&self) -> &'static str {
        "Runge-Kutta 4"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
