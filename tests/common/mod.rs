//! Common utilities for integration tests

#![allow(dead_code)]

pub mod mock_kinetics;
pub mod mock_models;
pub mod test_helpers;

pub use mock_kinetics::{FirstOrderDecay, NoReaction};
pub use mock_models::ExponentialDecay;
pub use test_helpers::{
    assert_vectors_close, reference_table, relative_error, single_species_cook, uniform_times,
};
