//! pulpsim: Kraft Pulping Simulation
//!
//! Method-of-lines model of a kraft cook: one liquor compartment exchanging
//! cooking chemicals with a one-dimensional chain of wood compartments, in
//! which lignin and carbohydrates are degraded by temperature-dependent
//! three-regime kinetics.
//!
//! # Architecture
//!
//! pulpsim keeps physics and numerics apart:
//!
//! 1. **Physical models define equations**: [`models::KraftCook`] implements
//!    [`physics::PhysicalModel`], a pure right-hand side `dn/dt = f(t, n)`
//!    over a flat state vector.
//! 2. **Solvers provide methods**: fixed-step Euler and RK4, and an adaptive
//!    Dormand-Prince integrator, all behind [`solver::Solver`].
//!
//! Parameters are loaded and validated once ([`config`]); results are turned
//! into physical quantities, exported and plotted by [`output`].
//!
//! # Quick Start
//!
//! ```rust
//! use nalgebra::{DMatrix, DVector};
//! use pulpsim::prelude::*;
//!
//! # fn main() -> Result<(), String> {
//! // 1. Assemble a cook with 5 wood compartments
//! let geometry = CookGeometry { n_compartments: 5, liquor_volume: 1.0, wood_volume: 1.0, wood_mass: 1.0 };
//! let mut wood = DMatrix::zeros(4, 5);
//! wood.row_mut(0).fill(0.01);
//! wood.row_mut(1).fill(0.01);
//!
//! let cook = KraftCook::new(
//!     ComponentSet::kraft(),
//!     geometry,
//!     TemperatureSchedule::ramp_hold(300.0, 443.0, 60.0),
//!     TransportProperties::kraft_default(1.0)?,
//!     Box::new(KraftKinetics::new(KineticsVariant::Gustafsson, PhaseLimits::new(0.005, 0.0025)?)),
//!     CompartmentState::new(DVector::from_vec(vec![0.0, 0.0, 1.0, 1.0]), wood)?,
//! )?;
//!
//! // 2. Solve with output every 10 s
//! let times: Vec<f64> = (0..=10).map(|k| 10.0 * k as f64).collect();
//! let scenario = Scenario::new(Box::new(cook));
//! let result = Dopri5Solver::new().solve(&scenario, &SolverConfiguration::adaptive(times, 1e-8, 1e-10))?;
//!
//! // 3. Read the diagnostics
//! assert_eq!(result.len(), 11);
//! assert_eq!(result.diagnostics.kappa_history().len(), 11);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`physics`]: Model trait, components, state layout, diagnostics
//! - [`models`]: Temperature schedule, kinetics, transport, kraft cook
//! - [`solver`]: Numerical solvers
//! - [`config`]: Parameter files
//! - [`output`]: Post-processing, CSV export, plots

pub mod config;
pub mod models;
pub mod output;
pub mod physics;
pub mod solver;

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //! use pulpsim::prelude::*;
    //! ```
    pub use crate::config::{ConfigError, CookParameters};
    pub use crate::models::{
        CookGeometry, KineticsVariant, KraftCook, KraftKinetics, PhaseLimits, ReactionKinetics,
        TemperatureSchedule, TransportProperties,
    };
    pub use crate::physics::{CompartmentState, Component, ComponentSet, DiagnosticLog, PhysicalModel};
    pub use crate::solver::{
        Dopri5Solver, EulerSolver, RK4Solver, Scenario, SimulationResult, Solver,
        SolverConfiguration, SolverType,
    };
}
