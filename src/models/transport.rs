//! Mass transport between liquor and wood, and through the wood
//!
//! # Topology
//!
//! ```text
//!                                         symmetry plane
//!          transfer        d[0]        d[1]        ||
//! liquor ──────────> [0] ───────> [1] ───────> [2] ||  d[N-1] = 0
//!                    z=0                           z=1
//! ```
//!
//! - **Liquor ↔ wood**: `K ⊙ A ⊙ (c_liquor − c_wood[:, 0])`, the only coupling
//!   between the lumped liquor and the wood chain
//! - **Through the wood**: Fick's law `d = −A · D(T) · ∂c/∂z` between adjacent
//!   compartments, with no flux out of the last one
//!
//! All fluxes are in mol/s, positive towards increasing z.

use nalgebra::{DMatrix, DVector};

// =================================================================================================
// Temperature dependence
// =================================================================================================

/// How diffusivities scale with temperature
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TemperatureDependence {
    /// Diffusivity independent of temperature
    Constant,

    /// `D(T) = D_ref · exp(−Ea · (1/T − 1/T_ref))`
    ///
    /// # Parameters
    ///
    /// - `activation_temperature` : Ea/R \[K\]
    /// - `reference_temperature` : T_ref at which `D = D_ref` \[K\]
    Arrhenius {
        activation_temperature: f64,
        reference_temperature: f64,
    },
}

impl TemperatureDependence {
    /// Multiplicative factor applied to the reference diffusivity
    pub fn factor(&self, temperature: f64) -> f64 {
        match self {
            Self::Constant => 1.0,
            Self::Arrhenius { activation_temperature, reference_temperature } => {
                (-activation_temperature * (1.0 / temperature - 1.0 / reference_temperature)).exp()
            }
        }
    }
}

// =================================================================================================
// Transport properties
// =================================================================================================

/// Per-component transport coefficients
///
/// Immobile species (lignin, carbohydrate) carry zero coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportProperties {
    diffusivity: DVector<f64>,
    mass_transfer: DVector<f64>,
    area: f64,
    temperature_dependence: TemperatureDependence,
}

impl TransportProperties {
    /// # Arguments
    ///
    /// * `diffusivity` - Reference diffusivity per component \[m²/s\]
    /// * `mass_transfer` - Liquor/wood mass-transfer coefficient per component
    /// * `area` - Contact area between compartments \[m²\]
    ///
    /// # Errors
    ///
    /// Length mismatch, negative or non-finite coefficients, non-positive area.
    pub fn new(
        diffusivity: DVector<f64>,
        mass_transfer: DVector<f64>,
        area: f64,
    ) -> Result<Self, String> {
        if diffusivity.len() != mass_transfer.len() {
            return Err(format!(
                "Diffusivity has {} entries but mass transfer has {}",
                diffusivity.len(),
                mass_transfer.len()
            ));
        }
        if diffusivity.iter().chain(mass_transfer.iter()).any(|x| !x.is_finite() || *x < 0.0) {
            return Err("Transport coefficients must be finite and non-negative".to_string());
        }
        if !area.is_finite() || area <= 0.0 {
            return Err(format!("Contact area must be positive, got {area}"));
        }

        Ok(Self {
            diffusivity,
            mass_transfer,
            area,
            temperature_dependence: TemperatureDependence::Constant,
        })
    }

    /// Kraft defaults: only alkali is mobile (D = 0.02, K = 0.1)
    pub fn kraft_default(area: f64) -> Result<Self, String> {
        Self::new(
            DVector::from_vec(vec![0.0, 0.0, 0.02, 0.0]),
            DVector::from_vec(vec![0.0, 0.0, 0.1, 0.0]),
            area,
        )
    }

    /// All coefficients zero: no transport at all
    pub fn immobile(n_components: usize, area: f64) -> Result<Self, String> {
        Self::new(DVector::zeros(n_components), DVector::zeros(n_components), area)
    }

    pub fn with_temperature_dependence(mut self, dependence: TemperatureDependence) -> Self {
        self.temperature_dependence = dependence;
        self
    }

    pub fn n_components(&self) -> usize {
        self.diffusivity.len()
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    /// Diffusivity per component at `temperature` \[K\]
    pub fn diffusivity_at(&self, temperature: f64) -> DVector<f64> {
        match self.temperature_dependence {
            TemperatureDependence::Constant => self.diffusivity.clone(),
            dependence => &self.diffusivity * dependence.factor(temperature),
        }
    }

    pub fn mass_transfer(&self) -> &DVector<f64> {
        &self.mass_transfer
    }
}

// =================================================================================================
// Spatial gradient
// =================================================================================================

/// Gradient along the compartment axis only
///
/// Centered differences in the interior, one-sided at both ends. A single
/// compartment has zero gradient. Rows (components) never mix.
///
/// ```rust
/// use nalgebra::DMatrix;
/// use pulpsim::models::transport::spatial_gradient;
///
/// let c = DMatrix::from_row_slice(1, 3, &[0.0, 1.0, 4.0]);
/// let g = spatial_gradient(&c, 0.5);
/// assert_eq!(g.row(0).iter().copied().collect::<Vec<_>>(), vec![2.0, 4.0, 6.0]);
/// ```
pub fn spatial_gradient(field: &DMatrix<f64>, dz: f64) -> DMatrix<f64> {
    let n = field.ncols();
    if n < 2 {
        return DMatrix::zeros(field.nrows(), n);
    }

    DMatrix::from_fn(field.nrows(), n, |i, j| {
        if j == 0 {
            (field[(i, 1)] - field[(i, 0)]) / dz
        } else if j == n - 1 {
            (field[(i, n - 1)] - field[(i, n - 2)]) / dz
        } else {
            (field[(i, j + 1)] - field[(i, j - 1)]) / (2.0 * dz)
        }
    })
}

// =================================================================================================
// Transport model
// =================================================================================================

/// Diffusive fluxes inside the wood
#[derive(Debug, Clone, PartialEq)]
pub struct DiffusionProfile {
    /// Flux leaving each compartment towards the next one \[mol/s\]
    ///
    /// The last column is always zero.
    pub outgoing: DMatrix<f64>,

    /// Net accumulation per compartment: incoming − outgoing \[mol/s\]
    pub net: DMatrix<f64>,
}

/// Transport over a 1-D chain of wood compartments
#[derive(Debug, Clone)]
pub struct TransportModel {
    properties: TransportProperties,
    n_compartments: usize,
    dz: f64,
}

impl TransportModel {
    pub fn new(properties: TransportProperties, n_compartments: usize) -> Result<Self, String> {
        if n_compartments == 0 {
            return Err("At least one wood compartment is required".to_string());
        }
        Ok(Self {
            properties,
            n_compartments,
            dz: 1.0 / n_compartments as f64,
        })
    }

    pub fn properties(&self) -> &TransportProperties {
        &self.properties
    }

    pub fn n_compartments(&self) -> usize {
        self.n_compartments
    }

    /// Compartment width on z ∈ \[0, 1\]
    pub fn dz(&self) -> f64 {
        self.dz
    }

    /// Flux from the liquor into wood compartment 0, per component \[mol/s\]
    pub fn liquor_transfer(&self, c_liquor: &DVector<f64>, c_wood: &DMatrix<f64>) -> DVector<f64> {
        let gap = c_liquor - c_wood.column(0);
        self.properties.mass_transfer.component_mul(&gap) * self.properties.area
    }

    /// Fick diffusion between adjacent wood compartments at `temperature`
    pub fn diffusion(&self, c_wood: &DMatrix<f64>, temperature: f64) -> DiffusionProfile {
        let n = c_wood.ncols();
        let diffusivity = self.properties.diffusivity_at(temperature);
        let gradient = spatial_gradient(c_wood, self.dz);

        let mut outgoing = DMatrix::from_fn(c_wood.nrows(), n, |i, j| {
            -self.properties.area * diffusivity[i] * gradient[(i, j)]
        });
        outgoing.column_mut(n - 1).fill(0.0);

        // shift right by one compartment; column 0 receives nothing from the wood
        let net = DMatrix::from_fn(c_wood.nrows(), n, |i, j| {
            let incoming = if j == 0 { 0.0 } else { outgoing[(i, j - 1)] };
            incoming - outgoing[(i, j)]
        });

        DiffusionProfile { outgoing, net }
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn model(n: usize) -> TransportModel {
        TransportModel::new(TransportProperties::kraft_default(1.0).unwrap(), n).unwrap()
    }

    fn profile(n: usize) -> DMatrix<f64> {
        DMatrix::from_fn(4, n, |i, j| 1.0 + i as f64 + (j * j) as f64 * 0.3)
    }

    // ====== Gradient ======

    #[test]
    fn test_gradient_single_compartment_is_zero() {
        let g = spatial_gradient(&DMatrix::from_element(4, 1, 3.0), 1.0);
        assert_eq!(g, DMatrix::zeros(4, 1));
    }

    #[test]
    fn test_gradient_rows_are_independent() {
        let mut field = DMatrix::zeros(2, 4);
        field.row_mut(1).copy_from_slice(&[1.0, 2.0, 3.0, 4.0]);
        let g = spatial_gradient(&field, 0.25);

        assert!(g.row(0).iter().all(|&x| x == 0.0));
        assert!(g.row(1).iter().all(|&x| (x - 4.0).abs() < 1e-12));
    }

    // ====== Liquor transfer ======

    #[test]
    fn test_transfer_only_for_mobile_species() {
        let model = model(3);
        let c_liquor = DVector::from_vec(vec![5.0, 5.0, 2.0, 5.0]);
        let c_wood = DMatrix::from_element(4, 3, 0.5);

        let transfer = model.liquor_transfer(&c_liquor, &c_wood);
        assert_eq!(transfer[0], 0.0);
        assert_eq!(transfer[1], 0.0);
        assert_relative_eq!(transfer[2], 0.1 * 1.5);
        assert_eq!(transfer[3], 0.0);
    }

    // ====== Diffusion ======

    #[test]
    fn test_no_flux_out_of_last_compartment() {
        let model = model(3);
        let diffusion = model.diffusion(&profile(3), 400.0);

        assert!(diffusion.outgoing.column(2).iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_diffusion_conserves_mass() {
        let model = model(5);
        let diffusion = model.diffusion(&profile(5), 400.0);

        for i in 0..4 {
            assert_relative_eq!(diffusion.net.row(i).sum(), 0.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_no_wraparound_into_first_compartment() {
        let model = model(3);
        let diffusion = model.diffusion(&profile(3), 400.0);

        for i in 0..4 {
            assert_eq!(diffusion.net[(i, 0)], -diffusion.outgoing[(i, 0)]);
        }
    }

    #[test]
    fn test_flux_runs_down_the_gradient() {
        let model = model(3);
        let mut c = DMatrix::zeros(4, 3);
        c.row_mut(2).copy_from_slice(&[3.0, 2.0, 1.0]);

        let diffusion = model.diffusion(&c, 400.0);
        assert!(diffusion.outgoing[(2, 0)] > 0.0);
        assert!(diffusion.net[(2, 2)] > 0.0);
    }

    #[test]
    fn test_immobile_properties_give_zero_transport() {
        let model = TransportModel::new(TransportProperties::immobile(4, 2.0).unwrap(), 4).unwrap();
        let diffusion = model.diffusion(&profile(4), 400.0);
        let transfer = model.liquor_transfer(&DVector::from_element(4, 9.0), &profile(4));

        assert!(diffusion.net.iter().all(|&x| x == 0.0));
        assert!(transfer.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_arrhenius_diffusivity() {
        let props = TransportProperties::kraft_default(1.0)
            .unwrap()
            .with_temperature_dependence(TemperatureDependence::Arrhenius {
                activation_temperature: 2000.0,
                reference_temperature: 400.0,
            });

        assert_relative_eq!(props.diffusivity_at(400.0)[2], 0.02);
        assert!(props.diffusivity_at(450.0)[2] > 0.02);
        assert_eq!(props.diffusivity_at(450.0)[0], 0.0);
    }

    #[test]
    fn test_properties_validation() {
        assert!(TransportProperties::new(DVector::zeros(3), DVector::zeros(4), 1.0).is_err());
        assert!(TransportProperties::new(DVector::from_element(2, -1.0), DVector::zeros(2), 1.0).is_err());
        assert!(TransportProperties::kraft_default(0.0).is_err());
        assert!(TransportModel::new(TransportProperties::kraft_default(1.0).unwrap(), 0).is_err());
    }
}
