//! End-to-end cook scenarios: model, solvers and post-processing together

use approx::assert_relative_eq;
use nalgebra::DVector;

use pulpsim::config::CookParameters;
use pulpsim::models::TransportProperties;
use pulpsim::output::CookReport;
use pulpsim::physics::PhysicalModel;
use pulpsim::solver::{Dopri5Solver, RK4Solver, Scenario, Solver, SolverConfiguration};

mod common;
use common::{reference_table, single_species_cook, uniform_times, FirstOrderDecay, NoReaction};

// =================================================================================================
// Analytical decay in a single compartment
// =================================================================================================

#[test]
fn test_first_order_decay_matches_exponential_dopri5() {
    let kinetics = FirstOrderDecay::new(1, 0.01);
    let expected = kinetics.analytical_solution(100.0, 1.0);

    let cook = single_species_cook(1, Box::new(kinetics), TransportProperties::immobile(1, 1.0).unwrap(), 1.0);
    let scenario = Scenario::new(Box::new(cook));
    let config = SolverConfiguration::adaptive(uniform_times(100.0, 20), 1e-10, 1e-12);
    let result = Dopri5Solver::new().solve(&scenario, &config).unwrap();

    // flat layout: [liquor, wood_0]
    assert_relative_eq!(result.final_state[1], expected, max_relative = 1e-7);
    assert_relative_eq!(result.final_state[1], 0.36787944117144233, epsilon = 1e-7);
    assert_eq!(result.final_state[0], 0.0);

    for (t, state) in result.time_points.iter().zip(&result.state_trajectory) {
        assert_relative_eq!(state[1], (-0.01 * t).exp(), max_relative = 1e-7);
    }
}

#[test]
fn test_first_order_decay_matches_exponential_rk4() {
    let cook = single_species_cook(
        1,
        Box::new(FirstOrderDecay::new(1, 0.01)),
        TransportProperties::immobile(1, 1.0).unwrap(),
        1.0,
    );
    let scenario = Scenario::new(Box::new(cook));
    let result = RK4Solver::new()
        .solve(&scenario, &SolverConfiguration::time_evolution(100.0, 200))
        .unwrap();

    assert_relative_eq!(result.final_state[1], (-1.0_f64).exp(), max_relative = 1e-9);
}

#[test]
fn test_decay_without_volume_scaling_uses_concentration_rate() {
    // compartment volume 0.5: dn/dt = -k C = -k n / 0.5
    let cook = single_species_cook(
        2,
        Box::new(FirstOrderDecay::new(1, 0.01)),
        TransportProperties::immobile(1, 1.0).unwrap(),
        1.0,
    )
    .with_reaction_volume_scaling(false);

    let scenario = Scenario::new(Box::new(cook));
    let config = SolverConfiguration::adaptive(uniform_times(50.0, 5), 1e-10, 1e-12);
    let result = Dopri5Solver::new().solve(&scenario, &config).unwrap();

    assert_relative_eq!(result.final_state[1], 0.5 * (-1.0_f64).exp(), max_relative = 1e-7);
}

// =================================================================================================
// Conservation and boundary flux
// =================================================================================================

#[test]
fn test_pure_transport_conserves_total_moles() {
    let transport = TransportProperties::new(
        DVector::from_element(1, 0.05),
        DVector::from_element(1, 0.2),
        1.0,
    )
    .unwrap();
    let cook = single_species_cook(4, Box::new(NoReaction::new(1)), transport, 1.0);

    // liquor starts empty, wood holds 1 mol in total
    let initial = cook.setup_initial_state();
    let rate = cook.compute_physics(0.0, &initial);
    assert!(rate.sum().abs() < 1e-15);
    assert_relative_eq!(rate[0], 0.2, epsilon = 1e-15);

    let scenario = Scenario::new(Box::new(cook));
    let config = SolverConfiguration::adaptive(uniform_times(20.0, 10), 1e-9, 1e-12);
    let result = Dopri5Solver::new().solve(&scenario, &config).unwrap();

    for state in &result.state_trajectory {
        assert_relative_eq!(state.sum(), 1.0, epsilon = 1e-12);
    }
}

#[test]
fn test_no_diffusive_flux_leaves_last_compartment() {
    let parameters = {
        let mut table = reference_table();
        table.insert("Ncompartments", 3.0);
        CookParameters::from_table(&table).unwrap()
    };
    let cook = parameters.build_model().unwrap();

    let mut state = cook.setup_initial_state();
    // alkali gradient through the wood
    for j in 0..3 {
        state[2 * 4 + 1 + j] = 0.3 * (j + 1) as f64;
    }

    for t in [0.0, 50.0, 5400.0] {
        let terms = cook.derivative_terms(t, &state);
        for i in 0..4 {
            assert_eq!(terms.diffusion.outgoing[(i, 2)], 0.0);
        }
        assert!(terms.diffusion.outgoing[(2, 0)].abs() > 0.0);
    }
}

#[test]
fn test_transport_terms_are_conservative_along_a_cook() {
    let parameters = CookParameters::from_table(&reference_table()).unwrap();
    let scenario = Scenario::new(Box::new(parameters.build_model().unwrap()));
    let result = Dopri5Solver::new()
        .solve(&scenario, &parameters.adaptive_configuration())
        .unwrap();

    let cook = parameters.build_model().unwrap();
    for (t, state) in result.time_points.iter().zip(&result.state_trajectory) {
        let terms = cook.derivative_terms(*t, state);
        let scale = terms.transport_scale().max(f64::MIN_POSITIVE);
        assert!(terms.transport_total().abs() / scale < 1e-12, "t = {t}");
    }
}

// =================================================================================================
// Full cook from parameters
// =================================================================================================

#[test]
fn test_reference_cook() {
    let parameters = CookParameters::from_table(&reference_table()).unwrap();
    let scenario = Scenario::new(Box::new(parameters.build_model().unwrap()));
    let result = Dopri5Solver::new()
        .solve(&scenario, &parameters.adaptive_configuration())
        .unwrap();

    assert_eq!(result.len(), 50);
    assert_eq!(result.time_points, parameters.output_times());

    let cook = parameters.build_model().unwrap();
    let report = CookReport::from_result(&cook, &result, parameters.mass_balance_tolerance).unwrap();

    // alkali moves from the liquor into the wood
    let alkali_liquor = report.liquor_history(2);
    assert!(alkali_liquor.last().unwrap() < &alkali_liquor[0]);
    assert!(report.wood_concentrations.last().unwrap()[(2, 0)] > 0.0);

    // lignin is consumed, so kappa falls
    let kappa: Vec<f64> = report.kappa.iter().map(|k| k.unwrap()).collect();
    assert_relative_eq!(kappa[0], 255.0, epsilon = 1e-9);
    assert!(kappa.last().unwrap() < &kappa[0]);

    // temperature follows the ramp: 353 K + 90 K over 5400 s
    assert_relative_eq!(report.final_temperature().unwrap(), 353.0 + 90.0 * 100.0 / 5400.0, epsilon = 1e-9);

    assert!(report.mass_balance.is_satisfied());
    assert!(report.max_drift() > 0.0);

    // every state stays finite and non-negative up to integration noise
    for state in &result.state_trajectory {
        assert!(state.iter().all(|x| x.is_finite() && *x > -1e-9));
    }
}

#[test]
fn test_diagnostics_match_report() {
    let parameters = CookParameters::from_table(&reference_table()).unwrap();
    let scenario = Scenario::new(Box::new(parameters.build_model().unwrap()));
    let result = Dopri5Solver::new()
        .solve(&scenario, &parameters.adaptive_configuration())
        .unwrap();

    let cook = parameters.build_model().unwrap();
    let report = CookReport::from_result(&cook, &result, 1e-9).unwrap();

    let temperature = result.diagnostics.temperature_history();
    let kappa = result.diagnostics.kappa_history();
    assert_eq!(temperature.len(), report.len());
    assert_eq!(kappa.len(), report.len());

    for k in 0..report.len() {
        assert_eq!(temperature[k], (report.time_points[k], report.temperature[k]));
        assert_eq!(kappa[k].1, report.kappa[k].unwrap());
    }
}

#[test]
fn test_andersson_and_gustafsson_differ() {
    let final_kappa = |andersson: f64| {
        let mut table = reference_table();
        table.insert("Andersson_model", andersson);
        table.insert("Gustafsson_model", 1.0 - andersson);
        let parameters = CookParameters::from_table(&table).unwrap();
        let scenario = Scenario::new(Box::new(parameters.build_model().unwrap()));
        let result = Dopri5Solver::new()
            .solve(&scenario, &parameters.adaptive_configuration())
            .unwrap();
        result.diagnostics.kappa_history().last().unwrap().1
    };

    let andersson = final_kappa(1.0);
    let gustafsson = final_kappa(0.0);
    assert!(andersson < 255.0);
    assert!(gustafsson < 255.0);
    assert!((andersson - gustafsson).abs() > 1e-6);
}
