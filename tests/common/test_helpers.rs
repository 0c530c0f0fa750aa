//! Helper functions for integration tests

use nalgebra::{DMatrix, DVector};
use pulpsim::config::ParameterTable;
use pulpsim::models::{
    CookGeometry, KraftCook, ReactionKinetics, TemperatureSchedule, TransportProperties,
};
use pulpsim::physics::{CompartmentState, Component, ComponentSet};

/// Compute relative error: |actual - expected| / |expected|
pub fn relative_error(actual: f64, expected: f64) -> f64 {
    if expected.abs() < 1e-10 {
        (actual - expected).abs()
    } else {
        (actual - expected).abs() / expected.abs()
    }
}

/// Assert that two vectors agree entry by entry within `tolerance`
pub fn assert_vectors_close(actual: &DVector<f64>, expected: &DVector<f64>, tolerance: f64, message: &str) {
    assert_eq!(actual.len(), expected.len(), "{}: Dimension mismatch", message);
    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        let diff = (a - e).abs();
        assert!(
            diff <= tolerance,
            "{}: Element {} differs by {} (tolerance {})",
            message, i, diff, tolerance
        );
    }
}

/// `n + 1` evenly spaced times on [0, end]
pub fn uniform_times(end: f64, n: usize) -> Vec<f64> {
    (0..=n).map(|k| end * k as f64 / n as f64).collect()
}

/// Cook with a single species `A`, fixed temperature and no transport
///
/// Every wood compartment starts at concentration `c0`, the liquor is empty.
pub fn single_species_cook(
    n_compartments: usize,
    kinetics: Box<dyn ReactionKinetics>,
    transport: TransportProperties,
    c0: f64,
) -> KraftCook {
    let geometry = CookGeometry {
        n_compartments,
        liquor_volume: 1.0,
        wood_volume: 1.0,
        wood_mass: 1.0,
    };
    let moles = c0 * geometry.compartment_volume();
    let components = ComponentSet::new(vec![Component::Custom("A")], vec![1.0]).unwrap();
    let initial = CompartmentState::new(
        DVector::zeros(1),
        DMatrix::from_element(1, n_compartments, moles),
    )
    .unwrap();

    KraftCook::new(
        components,
        geometry,
        TemperatureSchedule::constant(400.0),
        transport,
        kinetics,
        initial,
    )
    .unwrap()
}

/// Complete, valid parameter table (Gustafsson kinetics)
pub fn reference_table() -> ParameterTable {
    [
        ("Ncompartments", 10.0),
        ("liquor_volume", 4.0),
        ("wood_volume", 1.0),
        ("A", 0.1),
        ("wood_mass", 0.4),
        ("density", 1.0),
        ("porinf", 0.6),
        ("phase_limit_1", 0.225),
        ("phase_limit_2", 0.022),
        ("Ti", 353.0),
        ("Tmax", 443.0),
        ("toTmax", 90.0),
        ("Andersson_model", 0.0),
        ("Gustafsson_model", 1.0),
        ("initial_lignin", 0.01),
        ("initial_carbohydrate", 0.01),
        ("initial_alkali", 1.0),
        ("initial_sulfur", 1.0),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_string(), value))
    .collect()
}
