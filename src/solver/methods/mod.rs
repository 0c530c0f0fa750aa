//! Numerical methods for solving differential equations
//!
//! This module contains concrete implementations of the [`Solver`](crate::solver::Solver) trait.
//!
//! # Available Methods
//!
//! ## Fixed-step explicit methods
//!
//! - **[`EulerSolver`]**: Forward Euler
//!   - Order: First-order O(dt)
//!   - Cost: 1 function evaluation per step
//!   - Use: Reference runs, quick exploration
//!
//! - **[`RK4Solver`]**: Classical fourth-order Runge-Kutta
//!   - Order: Fourth-order O(dt⁴)
//!   - Cost: 4 function evaluations per step
//!   - Use: Reproducible fixed-step runs, benchmarks
//!
//! ## Adaptive methods
//!
//! - **[`Dopri5Solver`]**: Dormand-Prince 5(4) with error control
//!   - Cost: 6 function evaluations per accepted step (FSAL)
//!   - Use: **Production cooks**, output at arbitrary requested times
//!
//! # Design Philosophy
//!
//! Each solver is:
//! - **Stateless**: Can be reused for multiple simulations
//! - **Observer-aware**: Calls `PhysicalModel::observe` on stored states only

mod dopri5;
mod euler;
mod rk4;

// Re-exports for convenience
pub use dopri5::Dopri5Solver;
pub use euler::EulerSolver;
pub use rk4::RK4Solver;
