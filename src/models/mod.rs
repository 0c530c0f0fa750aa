//! Physical models of a kraft cook
//!
//! [`KraftCook`] implements the [`PhysicalModel`](crate::physics::PhysicalModel)
//! trait. It composes three independent building blocks, each usable and
//! testable on its own:
//!
//! ## [`TemperatureSchedule`]
//!
//! Bath temperature as a function of elapsed time (ramp-then-hold in a
//! standard cook).
//!
//! ## [`ReactionKinetics`]
//!
//! Rate law evaluated independently in every wood compartment.
//! [`KraftKinetics`] selects one of three regimes (bulk, transition, residual)
//! from the local lignin mass fraction.
//!
//! ## [`TransportModel`]
//!
//! Liquor ↔ wood mass transfer and Fick diffusion through the wood, with a
//! no-flux symmetry plane behind the last compartment.

// =================================================================================================
// Module Declarations
// =================================================================================================

pub mod kinetics;
pub mod kraft;
pub mod temperature;
pub mod transport;

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use kinetics::{
    kappa_number, KineticsVariant, KraftKinetics, LocalConditions, PhaseLimits, RateConstants,
    ReactionKinetics, Regime,
};
pub use kraft::{CookGeometry, DerivativeTerms, KraftCook};
pub use temperature::TemperatureSchedule;
pub use transport::{DiffusionProfile, TemperatureDependence, TransportModel, TransportProperties};
