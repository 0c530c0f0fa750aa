//! Rate laws with known behaviour, plugged into the kraft cook model

use nalgebra::{DMatrix, DVector};
use pulpsim::models::{LocalConditions, ReactionKinetics};

// =================================================================================================
// First-order decay: r = k * C
// =================================================================================================

/// One channel consuming component 0 at `r = k * C_0`
///
/// With volume scaling, the moles in a compartment follow `dn/dt = -k n`,
/// so `C(t) = C(0) exp(-k t)`.
pub struct FirstOrderDecay {
    pub rate_constant: f64,
    stoichiometry: DMatrix<f64>,
}

impl FirstOrderDecay {
    pub fn new(n_components: usize, rate_constant: f64) -> Self {
        let mut stoichiometry = DMatrix::zeros(n_components, 1);
        stoichiometry[(0, 0)] = -1.0;
        Self { rate_constant, stoichiometry }
    }

    pub fn analytical_solution(&self, t: f64, c0: f64) -> f64 {
        c0 * (-self.rate_constant * t).exp()
    }
}

impl ReactionKinetics for FirstOrderDecay {
    fn stoichiometry(&self) -> &DMatrix<f64> {
        &self.stoichiometry
    }

    fn rates(&self, local: &LocalConditions<'_>) -> DVector<f64> {
        DVector::from_element(1, self.rate_constant * local.concentrations[0].max(0.0))
    }

    fn name(&self) -> &str {
        "First-order decay"
    }
}

// =================================================================================================
// No reaction
// =================================================================================================

/// Zero rates: only transport acts
pub struct NoReaction {
    stoichiometry: DMatrix<f64>,
}

impl NoReaction {
    pub fn new(n_components: usize) -> Self {
        Self { stoichiometry: DMatrix::zeros(n_components, 1) }
    }
}

impl ReactionKinetics for NoReaction {
    fn stoichiometry(&self) -> &DMatrix<f64> {
        &self.stoichiometry
    }

    fn rates(&self, _local: &LocalConditions<'_>) -> DVector<f64> {
        DVector::zeros(1)
    }

    fn name(&self) -> &str {
        "No reaction"
    }
}
