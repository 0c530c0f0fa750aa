//! Physical models
//!
//! This module provides the trait every simulated system implements, and the
//! state representation shared by the kraft cook models.
//!
//! # Core Concepts
//!
//! - **Physical Model**: computes `dx/dt` at a given time and flat state
//! - **Component**: type-safe identifier of a tracked chemical species
//! - **Compartment State**: liquor vector + wood matrix, and its flat encoding
//! - **Diagnostic Log**: caller-owned histories filled from accepted states
//!
//! # Architecture
//!
//! Physical models are **separate from numerical solvers**:
//! - The model provides the **equations** (physics)
//! - The solver provides the **method** to solve them (numerics)
//!
//! # Example
//!
//! ```rust
//! use nalgebra::DVector;
//! use pulpsim::physics::PhysicalModel;
//!
//! struct Decay;
//!
//! impl PhysicalModel for Decay {
//!     fn dimension(&self) -> usize { 1 }
//!     fn compute_physics(&self, _t: f64, state: &DVector<f64>) -> DVector<f64> {
//!         -0.1 * state
//!     }
//!     fn setup_initial_state(&self) -> DVector<f64> { DVector::from_element(1, 1.0) }
//!     fn name(&self) -> &str { "Decay" }
//! }
//!
//! let model = Decay;
//! let rate = model.compute_physics(0.0, &model.setup_initial_state());
//! assert_eq!(rate[0], -0.1);
//! ```

// module declaration
pub mod component;
pub mod diagnostics;
pub mod state;
pub mod traits;

// re-export commonly used types for convenience
pub use component::{Component, ComponentSet};
pub use diagnostics::DiagnosticLog;
pub use state::CompartmentState;
pub use traits::PhysicalModel;
