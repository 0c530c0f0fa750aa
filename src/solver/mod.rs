//! Numerical solvers
//!
//! A numerical solver applies a numerical method to the equations provided
//! by a physical model within a specific scenario.
//!
//! # Core Concepts
//!
//! ## The Architecture (WHAT vs HOW)
//!
//! 1. **Scenario** (`Scenario`) - WHAT to solve
//!    - Physical model (equations)
//!    - Initial state and time
//!
//! 2. **Configuration** (`SolverConfiguration`) - HOW to solve
//!    - Fixed steps (`TimeEvolution`) or adaptive steps (`Adaptive`)
//!    - Step counts, output times, tolerances
//!
//! 3. **Solver** (`Solver` trait) - The numerical method
//!    - Applies the numerical scheme
//!    - Records diagnostics on accepted states
//!    - Independent of physics
//!
//! # Module Organization
//!
//! - **`traits`**: `Solver`, `SolverType`, `SolverConfiguration`, `SimulationResult`
//! - **`scenario`**: `Scenario`, model + initial condition
//! - **Solver implementations**:
//!   - `EulerSolver`: Forward Euler, fixed step
//!   - `RK4Solver`: classical Runge-Kutta, fixed step
//!   - `Dopri5Solver`: Dormand-Prince 5(4), adaptive step
//!
//! # Quick Start Example
//!
//! ```rust
//! use nalgebra::DVector;
//! use pulpsim::physics::PhysicalModel;
//! use pulpsim::solver::{Dopri5Solver, Scenario, Solver, SolverConfiguration};
//!
//! struct Decay;
//!
//! impl PhysicalModel for Decay {
//!     fn dimension(&self) -> usize { 1 }
//!     fn compute_physics(&self, _t: f64, y: &DVector<f64>) -> DVector<f64> { -0.01 * y }
//!     fn setup_initial_state(&self) -> DVector<f64> { DVector::from_element(1, 1.0) }
//!     fn name(&self) -> &str { "Decay" }
//! }
//!
//! // 1. WHAT to solve
//! let scenario = Scenario::new(Box::new(Decay));
//!
//! // 2. HOW to solve
//! let config = SolverConfiguration::adaptive(vec![0.0, 50.0, 100.0], 1e-10, 1e-12);
//!
//! // 3. Solve
//! let result = Dopri5Solver::new().solve(&scenario, &config).unwrap();
//! assert!((result.final_state[0] - (-1.0_f64).exp()).abs() < 1e-8);
//! ```
//!
//! # Error Handling
//!
//! All solver methods return `Result<T, String>`. Common errors:
//! - Invalid configuration (non-positive time, zero steps, unordered output times)
//! - Invalid scenario (initial state does not match the model)
//! - Numerical instability (NaN/Inf in a state)
//! - Integrator failure (step size collapse, too many steps)

// =================================================================================================
// Module Declarations
// =================================================================================================
mod traits;
mod scenario;
mod methods;

// =================================================================================================
// Parallel Execution Threshold
// =================================================================================================
//
// Models decide per evaluation whether a columnwise computation is large
// enough to be spread over the Rayon pool. The threshold is an AtomicUsize so
// benchmarks and tests can move it at runtime. Relaxed ordering: it is a hint,
// not a synchronisation point.
// =================================================================================================

use std::sync::atomic::{AtomicUsize, Ordering};

/// Default number of matrix entries above which models go parallel.
const DEFAULT_PARALLEL_THRESHOLD: usize = 999;

static PARALLEL_THRESHOLD: AtomicUsize = AtomicUsize::new(DEFAULT_PARALLEL_THRESHOLD);

/// Current parallel-execution threshold.
///
/// Models evaluate sequentially when their work matrix has at most this many
/// entries. Above it they use Rayon, only when the crate is compiled with the
/// `parallel` feature.
///
/// # Example
///
/// ```rust
/// use pulpsim::solver::parallel_threshold;
///
/// assert!(parallel_threshold() > 0);
/// ```
pub fn parallel_threshold() -> usize {
    PARALLEL_THRESHOLD.load(Ordering::Relaxed)
}

/// Set the parallel-execution threshold.
///
/// # Panics
///
/// Panics when `threshold == 0`.
///
/// # Example
///
/// ```rust
/// use pulpsim::solver::{parallel_threshold, set_parallel_threshold};
///
/// let previous = parallel_threshold();
/// set_parallel_threshold(4096);
/// assert_eq!(parallel_threshold(), 4096);
/// set_parallel_threshold(previous);
/// ```
pub fn set_parallel_threshold(threshold: usize) {
    assert!(threshold > 0, "parallel threshold must be at least 1");
    PARALLEL_THRESHOLD.store(threshold, Ordering::Relaxed);
}

/// Test-only guard: sets the threshold, restores the previous one on drop.
#[cfg(test)]
pub(crate) struct ThresholdGuard {
    previous: usize,
}

#[cfg(test)]
impl ThresholdGuard {
    pub(crate) fn save(new_value: usize) -> Self {
        let previous = parallel_threshold();
        set_parallel_threshold(new_value);
        Self { previous }
    }
}

#[cfg(test)]
impl Drop for ThresholdGuard {
    fn drop(&mut self) {
        PARALLEL_THRESHOLD.store(self.previous, Ordering::Relaxed);
    }
}

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use traits::{
    SimulationResult,
    Solver,
    SolverConfiguration,
    SolverType,
};

pub use scenario::Scenario;

pub use methods::{Dopri5Solver, EulerSolver, RK4Solver};

// =================================================================================================
// Helper Functions
// =================================================================================================

use nalgebra::DVector;

/// Validate a flat state for numerical issues
///
/// # Arguments
///
/// * `state` - Flat state to validate
/// * `step` - Step or output index (for error reporting)
///
/// # Returns
///
/// `Ok(())` if every entry is finite, `Err(msg)` naming the first bad entry otherwise
pub(crate) fn validate_state(state: &DVector<f64>, step: usize) -> Result<(), String> {
    if let Some(index) = state.iter().position(|x| x.is_nan()) {
        return Err(format!(
            "NaN detected in state entry {} at step {}. This indicates numerical instability. \
             Try reducing the time step or tightening tolerances.",
            index, step
        ));
    }

    if let Some(index) = state.iter().position(|x| x.is_infinite()) {
        return Err(format!(
            "Infinity detected in state entry {} at step {}. This indicates numerical overflow. \
             Try reducing the time step or check the model for division by zero.",
            index, step
        ));
    }

    Ok(())
}

// =================================================================================================
// Tests
// =================================================================================================
