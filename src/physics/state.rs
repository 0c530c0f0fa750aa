//! State codec: physical compartment layout <-> flat integrator vector
//!
//! # Layout
//!
//! The physical state is one liquor vector plus one wood matrix:
//!
//! ```text
//!                liquor   wood 0   wood 1   …   wood N-1
//! component 0  [  l_0  |  w_00  |  w_01  | … | w_0,N-1 ]
//! component 1  [  l_1  |  w_10  |  w_11  | … | w_1,N-1 ]
//!     ⋮
//! ```
//!
//! The integrator sees this `n_components × (N + 1)` rectangle flattened
//! row by row, so each component keeps a contiguous block starting with its
//! liquor entry:
//!
//! ```text
//! flat[i * (N + 1) + 0]     = liquor[i]
//! flat[i * (N + 1) + 1 + j] = wood[(i, j)]
//! ```
//!
//! [`encode`] and [`decode`] are exact inverses: they only move values.

use nalgebra::{DMatrix, DVector};

// =================================================================================================
// Free functions (hot path)
// =================================================================================================

/// Flattens a liquor vector and a wood matrix into the integrator layout
///
/// # Panics
///
/// Panics if `liquor.len() != wood.nrows()`.
///
/// # Example
/// ```
/// use nalgebra::{DMatrix, DVector};
/// use pulpsim::physics::state::encode;
///
/// let liquor = DVector::from_vec(vec![1.0, 2.0]);
/// let wood = DMatrix::from_row_slice(2, 2, &[10.0, 11.0, 20.0, 21.0]);
///
/// let flat = encode(&liquor, &wood);
/// assert_eq!(flat.as_slice(), &[1.0, 10.0, 11.0, 2.0, 20.0, 21.0]);
/// ```
pub fn encode(liquor: &DVector<f64>, wood: &DMatrix<f64>) -> DVector<f64> {
    assert_eq!(
        liquor.len(),
        wood.nrows(),
        "Liquor and wood must track the same number of components"
    );

    let stride = wood.ncols() + 1;

    DVector::from_fn(liquor.len() * stride, |k, _| {
        let (component, column) = (k / stride, k % stride);
        if column == 0 {
            liquor[component]
        } else {
            wood[(component, column - 1)]
        }
    })
}

/// Splits a flat integrator vector into liquor vector and wood matrix
///
/// # Panics
///
/// Panics if `flat.len() != n_components * (n_compartments + 1)`.
pub fn decode(
    flat: &DVector<f64>,
    n_components: usize,
    n_compartments: usize,
) -> (DVector<f64>, DMatrix<f64>) {
    let stride = n_compartments + 1;
    assert_eq!(
        flat.len(),
        n_components * stride,
        "Flat state of length {} does not match {} components × {} compartments",
        flat.len(),
        n_components,
        stride
    );

    let liquor = DVector::from_fn(n_components, |i, _| flat[i * stride]);
    let wood = DMatrix::from_fn(n_components, n_compartments, |i, j| flat[i * stride + 1 + j]);

    (liquor, wood)
}

// =================================================================================================
// Compartment state (owned, validated)
// =================================================================================================

/// Amounts (moles) of every component in every compartment
///
/// # Example
/// ```
/// use nalgebra::{DMatrix, DVector};
/// use pulpsim::physics::CompartmentState;
///
/// let state = CompartmentState::new(
///     DVector::from_vec(vec![0.0, 1.0]),
///     DMatrix::from_element(2, 3, 0.5),
/// ).unwrap();
///
/// let flat = state.encode();
/// let back = CompartmentState::decode(&flat, 2, 3).unwrap();
/// assert_eq!(back, state);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CompartmentState {
    /// Liquor amounts, one entry per component
    pub liquor: DVector<f64>,

    /// Wood amounts, `[n_components × n_compartments]`
    pub wood: DMatrix<f64>,
}

impl CompartmentState {
    /// Creates a state after checking that both blocks agree on the component count
    pub fn new(liquor: DVector<f64>, wood: DMatrix<f64>) -> Result<Self, String> {
        if liquor.len() != wood.nrows() {
            return Err(format!(
                "Liquor tracks {} components but wood tracks {}",
                liquor.len(),
                wood.nrows()
            ));
        }
        if wood.ncols() == 0 {
            return Err("At least one wood compartment is required".to_string());
        }
        Ok(Self { liquor, wood })
    }

    /// All-zero state
    pub fn zeros(n_components: usize, n_compartments: usize) -> Self {
        Self {
            liquor: DVector::zeros(n_components),
            wood: DMatrix::zeros(n_components, n_compartments),
        }
    }

    pub fn n_components(&self) -> usize {
        self.liquor.len()
    }

    pub fn n_compartments(&self) -> usize {
        self.wood.ncols()
    }

    /// Flat integrator vector, see [`encode`]
    pub fn encode(&self) -> DVector<f64> {
        encode(&self.liquor, &self.wood)
    }

    /// Rebuilds a state from a flat vector, rejecting mismatched lengths
    pub fn decode(
        flat: &DVector<f64>,
        n_components: usize,
        n_compartments: usize,
    ) -> Result<Self, String> {
        if n_compartments == 0 {
            return Err("At least one wood compartment is required".to_string());
        }
        let expected = n_components * (n_compartments + 1);
        if flat.len() != expected {
            return Err(format!(
                "Flat state has {} entries, expected {} ({} components × {} compartments)",
                flat.len(),
                expected,
                n_components,
                n_compartments + 1
            ));
        }
        let (liquor, wood) = decode(flat, n_components, n_compartments);
        Ok(Self { liquor, wood })
    }

    /// Total amount over all components and compartments
    pub fn total_moles(&self) -> f64 {
        self.liquor.sum() + self.wood.sum()
    }
}

// =================================================================================================
// Tests
// =================================================================================================
