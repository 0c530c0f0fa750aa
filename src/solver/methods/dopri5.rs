//! Adaptive Dormand-Prince 5(4) solver
//!
//! # Mathematical Background
//!
//! Explicit embedded Runge-Kutta pair of orders 5 and 4. Each step produces
//! two solutions; their difference estimates the local error, which drives
//! the step size so that
//!
//! ```text
//! |err_i| <= atol + rtol * max(|y_i|, |y_i_new|)
//! ```
//!
//! Steps failing the test are rejected and retried with a smaller step. The
//! stepping itself is delegated to the `ode_solvers` crate.
//!
//! # Output
//!
//! The integrator runs segment by segment between consecutive requested output
//! times, so every output time is hit exactly. Diagnostics are recorded once
//! per output time, never on trial or rejected steps.
//!
//! # Example
//!
//! ```rust,ignore
//! use pulpsim::solver::{Dopri5Solver, Solver, SolverConfiguration};
//!
//! let times: Vec<f64> = (0..=50).map(|k| k as f64 * 2.0).collect();
//! let config = SolverConfiguration::adaptive(times, 1e-8, 1e-10);
//! let result = Dopri5Solver::new().solve(&scenario, &config)?;
//! ```

use nalgebra::DVector;
use ode_solvers::dopri5::Dopri5;
use ode_solvers::System;

use crate::physics::{DiagnosticLog, PhysicalModel};
use crate::solver::{validate_state, Scenario, SimulationResult, Solver, SolverConfiguration, SolverType};

// =================================================================================================
// Bridge to ode_solvers
// =================================================================================================

/// Presents a [`PhysicalModel`] as an `ode_solvers` system
struct ModelSystem<'a> {
    model: &'a dyn PhysicalModel,
}

impl System<f64, DVector<f64>> for ModelSystem<'_> {
    fn system(&self, t: f64, y: &DVector<f64>, dy: &mut DVector<f64>) {
        *dy = self.model.compute_physics(t, y);
    }
}

// =================================================================================================
// Dormand-Prince Solver
// =================================================================================================

/// Adaptive Dormand-Prince solver
///
/// Requires an [`Adaptive`](SolverType::Adaptive) configuration whose first
/// output time equals the scenario's initial time.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dopri5Solver;

impl Dopri5Solver {
    pub fn new() -> Self {
        Self
    }
}

impl Solver for Dopri5Solver {
    fn solve(
        &self,
        scenario: &Scenario,
        config: &SolverConfiguration,
    ) -> Result<SimulationResult, String> {

        // ====== Step 1: Validation ======

        config.validate()?;
        scenario.validate()?;

        let (output_times, rtol, atol) = match &config.solver_type {
            SolverType::Adaptive { output_times, rtol, atol } => (output_times, *rtol, *atol),
            other => {
                return Err(format!(
                    "Dopri5Solver only supports Adaptive configuration, got {}",
                    other.name()
                ));
            }
        };

        if output_times[0] != scenario.initial_time {
            return Err(format!(
                "First output time ({}) must equal the scenario's initial time ({})",
                output_times[0], scenario.initial_time
            ));
        }

        // ====== Step 2: Setup ======

        let model = scenario.model.as_ref();
        let mut state = scenario.initial_state.clone();
        let mut diagnostics = DiagnosticLog::new();

        let mut state_trajectory = Vec::with_capacity(output_times.len());
        state_trajectory.push(state.clone());
        model.observe(output_times[0], &state, &mut diagnostics);

        let mut evaluations = 0usize;
        let mut accepted = 0usize;
        let mut rejected = 0usize;

        // ====== Step 3: Segment-by-segment integration ======

        for (segment, window) in output_times.windows(2).enumerate() {
            let (t_start, t_end) = (window[0], window[1]);

            // dx = 0: the stepper keeps every accepted step, the last one lands on t_end
            let mut stepper = Dopri5::new(
                ModelSystem { model },
                t_start,
                t_end,
                0.0,
                state.clone(),
                rtol,
                atol,
            );

            let stats = stepper.integrate().map_err(|e| {
                format!("Dormand-Prince integration failed on [{t_start}, {t_end}]: {e}")
            })?;

            evaluations += stats.num_eval as usize;
            accepted += stats.accepted_steps as usize;
            rejected += stats.rejected_steps as usize;

            state = stepper
                .y_out()
                .last()
                .cloned()
                .ok_or_else(|| format!("Dormand-Prince produced no output on [{t_start}, {t_end}]"))?;

            validate_state(&state, segment + 1)?;

            model.observe(t_end, &state, &mut diagnostics);
            state_trajectory.push(state.clone());
        }

        log::info!(
            "Dormand-Prince: {} evaluations, {} accepted steps, {} rejected steps over {} segments",
            evaluations,
            accepted,
            rejected,
            output_times.len() - 1
        );

        // ====== Step 4: Build Result ======

        let mut result = SimulationResult::new(output_times.clone(), state_trajectory, state)
            .with_diagnostics(diagnostics);

        result.add_metadata("solver", self.name());
        result.add_metadata("rtol", &rtol.to_string());
        result.add_metadata("atol", &atol.to_string());
        result.add_metadata("function evaluations", &evaluations.to_string());
        result.add_metadata("accepted steps", &accepted.to_string());
        result.add_metadata("rejected steps", &rejected.to_string());

        Ok(result)
    }

    fn name(&self) -> &'static str {
        "Dormand-Prince 5(4)"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
