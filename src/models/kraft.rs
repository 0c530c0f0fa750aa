//! Kraft cook: liquor compartment coupled to a 1-D chain of wood compartments
//!
//! # Model
//!
//! State: moles of every component in the liquor and in each wood compartment,
//! flattened by [`crate::physics::state`]. For a concentration field
//! `c = n / V` the right-hand side is:
//!
//! ```text
//! d n_liquor / dt = −J
//! d n_wood   / dt = R · ν − d_out + d_in + J · e_0
//! ```
//!
//! - `J = K ⊙ A ⊙ (c_liquor − c_wood[:, 0])` (liquor ↔ wood transfer)
//! - `d_out`, `d_in` Fick fluxes from [`TransportModel`], none out of the last compartment
//! - `R = S · r(c, w, T)` evaluated columnwise by a [`ReactionKinetics`]
//! - `ν` the wood compartment volume (or 1 when volume scaling is off)
//!
//! Transport only moves moles between compartments, so summing the derivative
//! over the whole flat vector leaves the net reaction term.
//!
//! # Diagnostics
//!
//! Temperature and kappa number are recorded by [`PhysicalModel::observe`],
//! never from `compute_physics`.

use nalgebra::{DMatrix, DVector};

use crate::models::kinetics::{kappa_number, LocalConditions, ReactionKinetics};
use crate::models::temperature::TemperatureSchedule;
use crate::models::transport::{DiffusionProfile, TransportModel, TransportProperties};
use crate::physics::{state, CompartmentState, Component, ComponentSet, DiagnosticLog, PhysicalModel};

// =================================================================================================
// Geometry
// =================================================================================================

/// Volumes and masses of a cook
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CookGeometry {
    /// Number of wood compartments along z ∈ \[0, 1\]
    pub n_compartments: usize,

    /// Liquor volume \[m³\]
    pub liquor_volume: f64,

    /// Total wood volume \[m³\], split evenly between compartments
    pub wood_volume: f64,

    /// Total dry wood mass \[kg\], split evenly between compartments
    pub wood_mass: f64,
}

impl CookGeometry {
    pub fn validate(&self) -> Result<(), String> {
        if self.n_compartments == 0 {
            return Err("At least one wood compartment is required".to_string());
        }
        for (name, value) in [
            ("liquor volume", self.liquor_volume),
            ("wood volume", self.wood_volume),
            ("wood mass", self.wood_mass),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("The {name} must be positive, got {value}"));
            }
        }
        Ok(())
    }

    pub fn compartment_volume(&self) -> f64 {
        self.wood_volume / self.n_compartments as f64
    }

    pub fn compartment_mass(&self) -> f64 {
        self.wood_mass / self.n_compartments as f64
    }

    pub fn dz(&self) -> f64 {
        1.0 / self.n_compartments as f64
    }

    /// Centre of each wood compartment on z ∈ \[0, 1\]
    pub fn compartment_centres(&self) -> Vec<f64> {
        let dz = self.dz();
        (0..self.n_compartments).map(|j| (j as f64 + 0.5) * dz).collect()
    }
}

// =================================================================================================
// Derivative terms
// =================================================================================================

/// Right-hand side split by physical origin, all in mol/s
#[derive(Debug, Clone)]
pub struct DerivativeTerms {
    /// Bath temperature at which the terms were evaluated \[K\]
    pub temperature: f64,

    /// Reaction contribution to each wood compartment
    pub reaction: DMatrix<f64>,

    /// Fick diffusion inside the wood
    pub diffusion: DiffusionProfile,

    /// Flux from the liquor into wood compartment 0
    pub transfer: DVector<f64>,
}

impl DerivativeTerms {
    pub fn liquor(&self) -> DVector<f64> {
        -&self.transfer
    }

    /// Diffusion plus liquor transfer, per wood compartment
    pub fn wood_transport(&self) -> DMatrix<f64> {
        let mut transport = self.diffusion.net.clone();
        for (i, flux) in self.transfer.iter().enumerate() {
            transport[(i, 0)] += flux;
        }
        transport
    }

    pub fn wood(&self) -> DMatrix<f64> {
        &self.reaction + self.wood_transport()
    }

    /// Sum of every transport term over liquor and wood (zero up to rounding)
    pub fn transport_total(&self) -> f64 {
        self.liquor().sum() + self.wood_transport().sum()
    }

    /// Largest transport term magnitude, the scale for [`transport_total`](Self::transport_total)
    pub fn transport_scale(&self) -> f64 {
        self.transfer
            .iter()
            .chain(self.diffusion.outgoing.iter())
            .fold(0.0_f64, |acc, x| acc.max(x.abs()))
    }

    /// Flat derivative in integrator layout
    pub fn encode(&self) -> DVector<f64> {
        state::encode(&self.liquor(), &self.wood())
    }
}

// =================================================================================================
// Cook model
// =================================================================================================

/// Method-of-lines model of a kraft cook
///
/// # Example
///
/// ```rust
/// use nalgebra::{DMatrix, DVector};
/// use pulpsim::models::{
///     CookGeometry, KineticsVariant, KraftCook, KraftKinetics, PhaseLimits,
///     TemperatureSchedule, TransportProperties,
/// };
/// use pulpsim::physics::{CompartmentState, ComponentSet, PhysicalModel};
///
/// let geometry = CookGeometry { n_compartments: 3, liquor_volume: 1.0, wood_volume: 1.0, wood_mass: 1.0 };
/// let kinetics = KraftKinetics::new(KineticsVariant::Gustafsson, PhaseLimits::new(0.2, 0.05).unwrap());
/// let initial = CompartmentState::new(
///     DVector::from_vec(vec![0.0, 0.0, 1.0, 1.0]),
///     DMatrix::from_fn(4, 3, |i, _| if i < 2 { 0.01 } else { 0.0 }),
/// ).unwrap();
///
/// let cook = KraftCook::new(
///     ComponentSet::kraft(),
///     geometry,
///     TemperatureSchedule::ramp_hold(353.0, 443.0, 5400.0),
///     TransportProperties::kraft_default(1.0).unwrap(),
///     Box::new(kinetics),
///     initial,
/// ).unwrap();
///
/// assert_eq!(cook.dimension(), 16);
/// let rate = cook.compute_physics(0.0, &cook.setup_initial_state());
/// assert!(rate[2 * 4] < 0.0); // alkali leaves the liquor
/// ```
pub struct KraftCook {
    components: ComponentSet,
    geometry: CookGeometry,
    schedule: TemperatureSchedule,
    transport: TransportModel,
    kinetics: Box<dyn ReactionKinetics>,
    initial: CompartmentState,
    scale_reaction_by_volume: bool,
}

impl KraftCook {
    /// Assemble a cook model
    ///
    /// Reactions are scaled by the wood compartment volume; see
    /// [`with_reaction_volume_scaling`](Self::with_reaction_volume_scaling).
    ///
    /// # Errors
    ///
    /// Invalid geometry or schedule, any disagreement on the number of
    /// components or compartments between the parts, or a component set whose
    /// order differs from the one the kinetics declares.
    pub fn new(
        components: ComponentSet,
        geometry: CookGeometry,
        schedule: TemperatureSchedule,
        transport: TransportProperties,
        kinetics: Box<dyn ReactionKinetics>,
        initial: CompartmentState,
    ) -> Result<Self, String> {
        geometry.validate()?;
        schedule.validate()?;

        let n_components = components.len();
        if kinetics.n_components() != n_components {
            return Err(format!(
                "Kinetics '{}' expects {} components, component set has {}",
                kinetics.name(),
                kinetics.n_components(),
                n_components
            ));
        }
        if let Some(expected) = kinetics.components()
            && expected != components.components()
        {
            return Err(format!(
                "Kinetics '{}' expects components in order {:?}, component set is {:?}",
                kinetics.name(),
                expected,
                components.components()
            ));
        }
        if transport.n_components() != n_components {
            return Err(format!(
                "Transport properties cover {} components, component set has {}",
                transport.n_components(),
                n_components
            ));
        }
        if initial.n_components() != n_components
            || initial.n_compartments() != geometry.n_compartments
        {
            return Err(format!(
                "Initial state is {} × {}, expected {} components × {} compartments",
                initial.n_components(),
                initial.n_compartments(),
                n_components,
                geometry.n_compartments
            ));
        }

        let transport = TransportModel::new(transport, geometry.n_compartments)?;

        Ok(Self {
            components,
            geometry,
            schedule,
            transport,
            kinetics,
            initial,
            scale_reaction_by_volume: true,
        })
    }

    /// Multiply reaction terms by the wood compartment volume (default: on)
    pub fn with_reaction_volume_scaling(mut self, enabled: bool) -> Self {
        self.scale_reaction_by_volume = enabled;
        self
    }

    // ====== Accessors ======

    pub fn components(&self) -> &ComponentSet {
        &self.components
    }

    pub fn geometry(&self) -> &CookGeometry {
        &self.geometry
    }

    pub fn schedule(&self) -> &TemperatureSchedule {
        &self.schedule
    }

    pub fn transport(&self) -> &TransportModel {
        &self.transport
    }

    pub fn kinetics(&self) -> &dyn ReactionKinetics {
        self.kinetics.as_ref()
    }

    pub fn initial_state(&self) -> &CompartmentState {
        &self.initial
    }

    pub fn scales_reaction_by_volume(&self) -> bool {
        self.scale_reaction_by_volume
    }

    pub fn temperature(&self, t: f64) -> f64 {
        self.schedule.evaluate(t)
    }

    // ====== Unit conversions ======

    /// Split a flat state into liquor and wood moles
    pub fn decode(&self, flat: &DVector<f64>) -> (DVector<f64>, DMatrix<f64>) {
        state::decode(flat, self.components.len(), self.geometry.n_compartments)
    }

    /// Liquor and wood concentrations \[mol/m³\] of a flat state
    pub fn concentrations(&self, flat: &DVector<f64>) -> (DVector<f64>, DMatrix<f64>) {
        let (liquor, wood) = self.decode(flat);
        (
            liquor / self.geometry.liquor_volume,
            wood / self.geometry.compartment_volume(),
        )
    }

    /// Mass fraction of each component in each wood compartment
    pub fn mass_fractions(&self, wood: &DMatrix<f64>) -> DMatrix<f64> {
        let masses = self.components.molar_masses();
        let compartment_mass = self.geometry.compartment_mass();
        DMatrix::from_fn(wood.nrows(), wood.ncols(), |i, j| {
            wood[(i, j)] * masses[i] / compartment_mass
        })
    }

    /// Mass fraction of each component over the whole wood
    pub fn wood_mass_fractions(&self, wood: &DMatrix<f64>) -> DVector<f64> {
        let masses = self.components.molar_masses();
        DVector::from_fn(wood.nrows(), |i, _| {
            wood.row(i).sum() * masses[i] / self.geometry.wood_mass
        })
    }

    /// Kappa number of a flat state
    ///
    /// `None` when the component set tracks no lignin or no carbohydrate.
    pub fn kappa(&self, flat: &DVector<f64>) -> Option<f64> {
        let lignin = self.components.index_of(Component::Lignin)?;
        let carbohydrate = self.components.index_of(Component::Carbohydrate)?;

        let (_, wood) = self.decode(flat);
        let fractions = self.wood_mass_fractions(&wood);
        Some(kappa_number(fractions[lignin], fractions[carbohydrate]))
    }

    // ====== Right-hand side ======

    /// Evaluate every contribution to `dn/dt` at `(t, flat)`
    pub fn derivative_terms(&self, t: f64, flat: &DVector<f64>) -> DerivativeTerms {
        let (_, wood_moles) = self.decode(flat);
        let (c_liquor, c_wood) = self.concentrations(flat);

        let temperature = self.schedule.evaluate(t);
        let transfer = self.transport.liquor_transfer(&c_liquor, &c_wood);
        let diffusion = self.transport.diffusion(&c_wood, temperature);

        let fractions = self.mass_fractions(&wood_moles);
        let reaction = self.reaction_terms(&c_wood, &fractions, temperature);

        DerivativeTerms {
            temperature,
            reaction,
            diffusion,
            transfer,
        }
    }

    /// Reaction contribution, one independent kinetics evaluation per compartment
    fn reaction_terms(
        &self,
        c_wood: &DMatrix<f64>,
        fractions: &DMatrix<f64>,
        temperature: f64,
    ) -> DMatrix<f64> {
        let scale = if self.scale_reaction_by_volume {
            self.geometry.compartment_volume()
        } else {
            1.0
        };

        let column = |j: usize| -> DVector<f64> {
            let concentrations: Vec<f64> = c_wood.column(j).iter().copied().collect();
            let mass_fractions: Vec<f64> = fractions.column(j).iter().copied().collect();
            let rates = self.kinetics.rates(&LocalConditions {
                concentrations: &concentrations,
                mass_fractions: &mass_fractions,
                temperature,
            });
            self.kinetics.stoichiometry() * rates * scale
        };

        let parallel = c_wood.len() > crate::solver::parallel_threshold();
        let columns = map_columns(c_wood.ncols(), parallel, column);

        DMatrix::from_columns(&columns)
    }
}

#[cfg(feature = "parallel")]
fn map_columns<F>(n: usize, parallel: bool, f: F) -> Vec<DVector<f64>>
where
    F: Fn(usize) -> DVector<f64> + Send + Sync,
{
    use rayon::prelude::*;

    if parallel {
        (0..n).into_par_iter().map(f).collect()
    } else {
        (0..n).map(f).collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn map_columns<F>(n: usize, _parallel: bool, f: F) -> Vec<DVector<f64>>
where
    F: Fn(usize) -> DVector<f64>,
{
    (0..n).map(f).collect()
}

impl PhysicalModel for KraftCook {
    fn dimension(&self) -> usize {
        self.components.len() * (self.geometry.n_compartments + 1)
    }

    fn compute_physics(&self, t: f64, state: &DVector<f64>) -> DVector<f64> {
        self.derivative_terms(t, state).encode()
    }

    fn setup_initial_state(&self) -> DVector<f64> {
        self.initial.encode()
    }

    fn observe(&self, t: f64, state: &DVector<f64>, log: &mut DiagnosticLog) {
        log.record_temperature(t, self.schedule.evaluate(t));
        if let Some(kappa) = self.kappa(state) {
            log.record_kappa(t, kappa);
        }
    }

    fn name(&self) -> &str {
        "Kraft cook"
    }

    fn description(&self) -> Option<&str> {
        Some(
            "Liquor compartment exchanging alkali with a 1-D chain of wood \
             compartments, with three-regime delignification kinetics.",
        )
    }
}

impl std::fmt::Debug for KraftCook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KraftCook")
            .field("components", &self.components.names())
            .field("geometry", &self.geometry)
            .field("schedule", &self.schedule)
            .field("kinetics", &self.kinetics.name())
            .field("scale_reaction_by_volume", &self.scale_reaction_by_volume)
            .finish()
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::kinetics::{KineticsVariant, KraftKinetics, PhaseLimits};
    use approx::assert_relative_eq;

    struct Inert {
        stoichiometry: DMatrix<f64>,
    }

    impl ReactionKinetics for Inert {
        fn stoichiometry(&self) -> &DMatrix<f64> {
            &self.stoichiometry
        }

        fn rates(&self, _local: &LocalConditions<'_>) -> DVector<f64> {
            DVector::zeros(self.stoichiometry.ncols())
        }

        fn name(&self) -> &str {
            "Inert"
        }
    }

    fn geometry(n: usize) -> CookGeometry {
        CookGeometry { n_compartments: n, liquor_volume: 2.0, wood_volume: 0.5, wood_mass: 0.2 }
    }

    fn uneven_state(n: usize) -> CompartmentState {
        CompartmentState::new(
            DVector::from_vec(vec![0.0, 0.0, 1.0, 0.7]),
            DMatrix::from_fn(4, n, |i, j| 0.01 * (i + 1) as f64 + 0.003 * (j * j) as f64),
        ).unwrap()
    }

    fn kraft_cook(n: usize) -> KraftCook {
        KraftCook::new(
            ComponentSet::kraft(),
            geometry(n),
            TemperatureSchedule::ramp_hold(353.15, 443.15, 5400.0),
            TransportProperties::kraft_default(1.0).unwrap(),
            Box::new(KraftKinetics::new(KineticsVariant::Gustafsson, PhaseLimits::new(0.2, 0.05).unwrap())),
            uneven_state(n),
        ).unwrap()
    }

    fn inert_cook(n: usize, transport: TransportProperties) -> KraftCook {
        KraftCook::new(
            ComponentSet::kraft(),
            geometry(n),
            TemperatureSchedule::constant(400.0),
            transport,
            Box::new(Inert { stoichiometry: DMatrix::zeros(4, 1) }),
            uneven_state(n),
        ).unwrap()
    }

    #[test]
    fn test_dimension_and_initial_state() {
        let cook = kraft_cook(5);
        assert_eq!(cook.dimension(), 24);
        assert_eq!(cook.setup_initial_state(), uneven_state(5).encode());
    }

    #[test]
    fn test_new_rejects_mismatched_initial_state() {
        let result = KraftCook::new(
            ComponentSet::kraft(),
            geometry(3),
            TemperatureSchedule::constant(400.0),
            TransportProperties::kraft_default(1.0).unwrap(),
            Box::new(Inert { stoichiometry: DMatrix::zeros(4, 1) }),
            uneven_state(2),
        );
        assert!(result.unwrap_err().contains("Initial state"));
    }

    #[test]
    fn test_new_rejects_kinetics_component_mismatch() {
        let result = KraftCook::new(
            ComponentSet::kraft(),
            geometry(2),
            TemperatureSchedule::constant(400.0),
            TransportProperties::kraft_default(1.0).unwrap(),
            Box::new(Inert { stoichiometry: DMatrix::zeros(3, 1) }),
            uneven_state(2),
        );
        assert!(result.unwrap_err().contains("Inert"));
    }

    #[test]
    fn test_new_rejects_reordered_components() {
        let reordered = ComponentSet::new(
            vec![Component::Alkali, Component::Lignin, Component::Carbohydrate, Component::Sulfur],
            vec![1.0; 4],
        ).unwrap();
        let result = KraftCook::new(
            reordered,
            geometry(2),
            TemperatureSchedule::constant(400.0),
            TransportProperties::kraft_default(1.0).unwrap(),
            Box::new(KraftKinetics::new(KineticsVariant::Gustafsson, PhaseLimits::new(0.2, 0.05).unwrap())),
            uneven_state(2),
        );
        assert!(result.unwrap_err().contains("order"));
    }

    #[test]
    fn test_new_accepts_index_based_kinetics_with_any_order() {
        let reordered = ComponentSet::new(
            vec![Component::Alkali, Component::Lignin, Component::Carbohydrate, Component::Sulfur],
            vec![1.0; 4],
        ).unwrap();
        let result = KraftCook::new(
            reordered,
            geometry(2),
            TemperatureSchedule::constant(400.0),
            TransportProperties::kraft_default(1.0).unwrap(),
            Box::new(Inert { stoichiometry: DMatrix::zeros(4, 1) }),
            uneven_state(2),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_concentrations() {
        let cook = kraft_cook(4);
        let (c_liquor, c_wood) = cook.concentrations(&cook.setup_initial_state());

        assert_relative_eq!(c_liquor[2], 0.5);
        assert_relative_eq!(c_wood[(0, 0)], 0.01 / 0.125);
    }

    #[test]
    fn test_zero_coefficients_give_zero_transport() {
        let cook = inert_cook(4, TransportProperties::immobile(4, 1.0).unwrap());
        let terms = cook.derivative_terms(10.0, &cook.setup_initial_state());

        assert!(terms.wood_transport().iter().all(|&x| x == 0.0));
        assert!(terms.liquor().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_pure_transport_conserves_moles() {
        let transport = TransportProperties::new(
            DVector::from_vec(vec![0.0, 0.01, 0.02, 0.05]),
            DVector::from_vec(vec![0.0, 0.2, 0.1, 0.3]),
            1.5,
        ).unwrap();
        let cook = inert_cook(6, transport);
        let derivative = cook.compute_physics(0.0, &cook.setup_initial_state());

        assert!(derivative.iter().any(|&x| x != 0.0));
        assert_relative_eq!(derivative.sum(), 0.0, epsilon = 1e-14);
    }

    #[test]
    fn test_no_flux_out_of_last_compartment() {
        let cook = kraft_cook(3);
        for t in [0.0, 100.0, 6000.0] {
            let terms = cook.derivative_terms(t, &cook.setup_initial_state());
            assert!(terms.diffusion.outgoing.column(2).iter().all(|&x| x == 0.0));
        }
    }

    #[test]
    fn test_derivative_sum_equals_reaction_total() {
        let cook = kraft_cook(4);
        let state = cook.setup_initial_state();
        let terms = cook.derivative_terms(600.0, &state);
        let derivative = cook.compute_physics(600.0, &state);

        assert_relative_eq!(derivative.sum(), terms.reaction.sum(), epsilon = 1e-14);
    }

    #[test]
    fn test_reaction_volume_scaling() {
        let state = kraft_cook(2).setup_initial_state();
        let scaled = kraft_cook(2).derivative_terms(0.0, &state);
        let unscaled = kraft_cook(2)
            .with_reaction_volume_scaling(false)
            .derivative_terms(0.0, &state);

        let volume = geometry(2).compartment_volume();
        assert_relative_eq!(scaled.reaction, unscaled.reaction * volume, epsilon = 1e-18);
    }

    #[test]
    fn test_observe_records_temperature_and_kappa() {
        let cook = kraft_cook(3);
        let state = cook.setup_initial_state();
        let mut log = DiagnosticLog::new();

        cook.observe(0.0, &state, &mut log);
        cook.observe(5400.0, &state, &mut log);

        assert_eq!(log.temperature_history(), &[(0.0, 353.15), (5400.0, 443.15)]);
        assert_eq!(log.kappa_history().len(), 2);
    }

    #[test]
    fn test_compute_physics_leaves_no_trace() {
        let cook = kraft_cook(3);
        let state = cook.setup_initial_state();
        let first = cook.compute_physics(42.0, &state);
        let second = cook.compute_physics(42.0, &state);
        assert_eq!(first, second);
    }

    #[test]
    fn test_kappa_of_initial_state() {
        let cook = kraft_cook(1);
        // lignin 0.01 and carbohydrate 0.02 moles, unit molar masses
        assert_relative_eq!(cook.kappa(&cook.setup_initial_state()).unwrap(), 500.0 / 3.0 + 5.0);
    }

    #[test]
    fn test_column_mapping_paths_agree() {
        let f = |j: usize| DVector::from_fn(3, |i, _| (i * 10 + j) as f64 / 3.0);
        let sequential = map_columns(16, false, f);
        let parallel = map_columns(16, true, f);

        assert_eq!(sequential, parallel);
        assert_eq!(parallel[5][1], 15.0 / 3.0);
    }
}
