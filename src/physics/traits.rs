//! Physical model trait
//!
//! This module defines the single seam between physics and numerics:
//! a model evaluates `dx/dt = f(x, t)` on a flat state vector, a solver
//! integrates it.

use nalgebra::DVector;

use crate::physics::DiagnosticLog;

// =================================================================================================
// Physical Model Trait
// =================================================================================================

/// Trait for physical models
///
/// # Responsibility
/// Computes the right-hand side of a system of ordinary differential equations
/// at a given time and state. Does NOT integrate it (that's the Solver's job).
///
/// The model provides the "physics" (equations), the Solver provides
/// the "numerics" (method to solve them).
///
/// # Flat state
///
/// States are flat vectors of length [`dimension`](Self::dimension). Models
/// that have structure (compartments, components) own the mapping between the
/// flat vector and that structure; see [`crate::physics::state`].
///
/// # Purity
///
/// `compute_physics` must be a pure function of `(t, state)` and the model's
/// immutable parameters. Adaptive solvers call it several times per step, at
/// trial states that may be rejected.
pub trait PhysicalModel: Send + Sync {

    /// Length of the flat state vector
    ///
    /// Used by the solver to validate initial states
    fn dimension(&self) -> usize;

    /// Computes the time derivative at a given state
    ///
    /// # Arguments
    /// * `t` - Elapsed time \[s\]
    /// * `state` - Current flat state of the system
    ///
    /// # Returns
    /// `dx/dt`, same length as `state`
    ///
    /// # Note
    /// This method encapsulates ALL the physics:
    /// - Kinetics and reactions
    /// - Spatial derivatives (finite differences)
    /// - Boundary conditions
    fn compute_physics(&self, t: f64, state: &DVector<f64>) -> DVector<f64>;

    /// Creates the initial flat state for this physical model
    fn setup_initial_state(&self) -> DVector<f64>;

    /// Records diagnostics for an accepted state
    ///
    /// Solvers call this once per accepted (output) state, in increasing time
    /// order, never on trial stages. Default: records nothing.
    fn observe(&self, _t: f64, _state: &DVector<f64>, _log: &mut DiagnosticLog) {}

    /// Name of the model (used to display and logging)
    fn name(&self) -> &str;

    /// Description of the model (option)
    fn description(&self) -> Option<&str> {
        None
    }
}

// =================================================================================================
// Tests
// =================================================================================================
