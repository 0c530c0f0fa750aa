//! Post-processing of a cook trajectory
//!
//! [`CookReport`] turns the flat states returned by a solver into physical
//! quantities: concentrations, total moles, temperature and kappa number at
//! every output time. It also re-evaluates the right-hand side at each stored
//! state to check that transport conserves moles ([`MassBalance`]).

use nalgebra::{DMatrix, DVector};

use crate::models::KraftCook;
use crate::physics::PhysicalModel;
use crate::solver::SimulationResult;

// =================================================================================================
// Mass balance
// =================================================================================================

/// Conservation check of the transport terms
///
/// At each stored state the transport part of the derivative (liquor
/// transfer plus intra-wood diffusion) is summed over every compartment. The
/// sum is compared to `tolerance` relative to the largest transport term, or
/// absolutely when all transport terms vanish.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassBalance {
    pub tolerance: f64,

    /// Largest residual found, relative where a scale exists
    pub max_residual: f64,

    /// Output time of the largest residual
    pub worst_time: f64,

    /// Number of output states beyond tolerance
    pub violations: usize,
}

impl MassBalance {
    pub fn is_satisfied(&self) -> bool {
        self.violations == 0
    }

    fn check(cook: &KraftCook, result: &SimulationResult, tolerance: f64) -> Self {
        let mut balance = Self {
            tolerance,
            max_residual: 0.0,
            worst_time: result.time_points.first().copied().unwrap_or(0.0),
            violations: 0,
        };

        for (t, state) in result.time_points.iter().zip(&result.state_trajectory) {
            let terms = cook.derivative_terms(*t, state);
            let scale = terms.transport_scale();
            let residual = if scale > 0.0 {
                terms.transport_total().abs() / scale
            } else {
                terms.transport_total().abs()
            };

            if residual > tolerance {
                balance.violations += 1;
            }
            if residual > balance.max_residual {
                balance.max_residual = residual;
                balance.worst_time = *t;
            }
        }

        if !balance.is_satisfied() {
            log::warn!(
                "Mass balance violated at {} output times: largest residual {:.3e} at t = {} (tolerance {:.1e})",
                balance.violations,
                balance.max_residual,
                balance.worst_time,
                tolerance
            );
        }

        balance
    }
}

// =================================================================================================
// Cook report
// =================================================================================================

/// Physical view of a cook trajectory, one entry per output time
#[derive(Debug, Clone)]
pub struct CookReport {
    pub component_names: Vec<String>,

    pub time_points: Vec<f64>,

    /// Liquor concentration of every component \[mol/m³\]
    pub liquor_concentrations: Vec<DVector<f64>>,

    /// Wood concentrations, `[n_components × n_compartments]` \[mol/m³\]
    pub wood_concentrations: Vec<DMatrix<f64>>,

    /// Moles summed over liquor and wood
    pub total_moles: Vec<f64>,

    /// `total_moles[k] - total_moles[0]`
    pub moles_drift: Vec<f64>,

    /// Bath temperature \[K\]
    pub temperature: Vec<f64>,

    /// `None` when the components carry no lignin or carbohydrate
    pub kappa: Vec<Option<f64>>,

    pub mass_balance: MassBalance,
}

impl CookReport {
    /// Build the report of a solved cook
    ///
    /// # Errors
    ///
    /// An empty result, or states whose length does not match the model.
    pub fn from_result(
        cook: &KraftCook,
        result: &SimulationResult,
        tolerance: f64,
    ) -> Result<Self, String> {
        if result.is_empty() {
            return Err("Cannot report on an empty simulation result".to_string());
        }
        if let Some((k, state)) = result
            .state_trajectory
            .iter()
            .enumerate()
            .find(|(_, s)| s.len() != cook.dimension())
        {
            return Err(format!(
                "State {} has {} entries, the cook model expects {}",
                k,
                state.len(),
                cook.dimension()
            ));
        }

        let n = result.len();
        let mut liquor_concentrations = Vec::with_capacity(n);
        let mut wood_concentrations = Vec::with_capacity(n);
        let mut total_moles = Vec::with_capacity(n);
        let mut kappa = Vec::with_capacity(n);

        for state in &result.state_trajectory {
            let (liquor, wood) = cook.concentrations(state);
            liquor_concentrations.push(liquor);
            wood_concentrations.push(wood);
            total_moles.push(state.sum());
            kappa.push(cook.kappa(state));
        }

        let initial_total = total_moles[0];
        let moles_drift = total_moles.iter().map(|m| m - initial_total).collect();
        let temperature = cook.schedule().evaluate_series(&result.time_points);

        Ok(Self {
            component_names: cook.components().names().into_iter().map(String::from).collect(),
            time_points: result.time_points.clone(),
            liquor_concentrations,
            wood_concentrations,
            total_moles,
            moles_drift,
            temperature,
            kappa,
            mass_balance: MassBalance::check(cook, result, tolerance),
        })
    }

    pub fn len(&self) -> usize {
        self.time_points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_points.is_empty()
    }

    pub fn n_components(&self) -> usize {
        self.component_names.len()
    }

    pub fn n_compartments(&self) -> usize {
        self.wood_concentrations.first().map_or(0, |w| w.ncols())
    }

    /// Mean wood concentration of every component at output `k`
    pub fn mean_wood_concentration(&self, k: usize) -> DVector<f64> {
        let wood = &self.wood_concentrations[k];
        DVector::from_fn(wood.nrows(), |i, _| wood.row(i).mean())
    }

    /// Liquor concentration history of one component
    pub fn liquor_history(&self, component: usize) -> Vec<f64> {
        self.liquor_concentrations.iter().map(|c| c[component]).collect()
    }

    /// Wood concentrations of one component, `[n_compartments × n_outputs]`
    pub fn wood_field(&self, component: usize) -> DMatrix<f64> {
        DMatrix::from_fn(self.n_compartments(), self.len(), |j, k| {
            self.wood_concentrations[k][(component, j)]
        })
    }

    pub fn final_kappa(&self) -> Option<f64> {
        self.kappa.last().copied().flatten()
    }

    pub fn final_temperature(&self) -> Option<f64> {
        self.temperature.last().copied()
    }

    /// Largest absolute drift of the total moles
    pub fn max_drift(&self) -> f64 {
        self.moles_drift.iter().fold(0.0_f64, |acc, d| acc.max(d.abs()))
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CookGeometry, KineticsVariant, KraftKinetics, PhaseLimits, TemperatureSchedule,
        TransportProperties,
    };
    use crate::physics::{CompartmentState, ComponentSet};
    use crate::solver::{RK4Solver, Scenario, Solver, SolverConfiguration};
    use approx::assert_relative_eq;

    fn cook(n: usize) -> KraftCook {
        let geometry = CookGeometry {
            n_compartments: n,
            liquor_volume: 1.0,
            wood_volume: 1.0,
            wood_mass: 1.0,
        };
        let kinetics =
            KraftKinetics::new(KineticsVariant::Andersson, PhaseLimits::new(0.005, 0.0025).unwrap());
        let mut wood = DMatrix::zeros(4, n);
        wood.row_mut(0).fill(0.01);
        wood.row_mut(1).fill(0.01);

        KraftCook::new(
            ComponentSet::kraft(),
            geometry,
            TemperatureSchedule::ramp_hold(300.0, 443.0, 60.0),
            TransportProperties::kraft_default(1.0).unwrap(),
            Box::new(kinetics),
            CompartmentState::new(DVector::from_vec(vec![0.0, 0.0, 1.0, 1.0]), wood).unwrap(),
        )
        .unwrap()
    }

    /// Solve a fresh cook, return another copy of the model for post-processing
    fn solve(n: usize) -> (KraftCook, SimulationResult) {
        let scenario = Scenario::new(Box::new(cook(n)));
        let result = RK4Solver::new()
            .solve(&scenario, &SolverConfiguration::time_evolution(10.0, 100))
            .unwrap();
        (cook(n), result)
    }

    #[test]
    fn test_report_shapes() {
        let (cook, result) = solve(3);
        let report = CookReport::from_result(&cook, &result, 1e-9).unwrap();

        assert_eq!(report.len(), 101);
        assert_eq!(report.n_components(), 4);
        assert_eq!(report.n_compartments(), 3);
        assert_eq!(report.component_names[0], "Lignin");
        assert_eq!(report.wood_field(2).shape(), (3, 101));
        assert_eq!(report.liquor_history(2).len(), 101);
    }

    #[test]
    fn test_initial_values() {
        let (cook, result) = solve(2);
        let report = CookReport::from_result(&cook, &result, 1e-9).unwrap();

        // wood compartments hold 0.5 m³ each
        assert_relative_eq!(report.wood_concentrations[0][(0, 0)], 0.02);
        assert_eq!(report.liquor_concentrations[0][2], 1.0);
        assert_relative_eq!(report.total_moles[0], 2.04, epsilon = 1e-12);
        assert_eq!(report.moles_drift[0], 0.0);
        assert_eq!(report.temperature[0], 300.0);
        assert_relative_eq!(report.kappa[0].unwrap(), 255.0, epsilon = 1e-9);
    }

    #[test]
    fn test_reactions_consume_moles_and_temperature_follows_schedule() {
        let (cook, result) = solve(2);
        let report = CookReport::from_result(&cook, &result, 1e-9).unwrap();

        assert!(report.total_moles.last().unwrap() < &report.total_moles[0]);
        assert!(report.max_drift() > 0.0);
        assert_relative_eq!(report.final_temperature().unwrap(), 300.0 + 143.0 / 6.0, epsilon = 1e-9);
        assert!(report.final_kappa().is_some());
    }

    #[test]
    fn test_transport_is_conservative() {
        let (cook, result) = solve(4);
        let report = CookReport::from_result(&cook, &result, 1e-9).unwrap();

        assert!(report.mass_balance.is_satisfied(), "{:?}", report.mass_balance);
        assert!(report.mass_balance.max_residual < 1e-9);
    }

    #[test]
    fn test_mean_wood_concentration() {
        let (cook, result) = solve(3);
        let report = CookReport::from_result(&cook, &result, 1e-9).unwrap();

        let mean = report.mean_wood_concentration(0);
        assert_relative_eq!(mean[1], 0.03, epsilon = 1e-12);
    }

    #[test]
    fn test_mismatched_model_is_rejected() {
        let (_, result) = solve(3);
        let err = CookReport::from_result(&cook(2), &result, 1e-9).unwrap_err();
        assert!(err.contains("expects 12"));
    }
}
