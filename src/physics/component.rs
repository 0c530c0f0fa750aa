//! Chemical components tracked in every compartment
//!
//! The order of a [`ComponentSet`] is significant: it is the row order of every
//! liquor vector, wood matrix and stoichiometric matrix in the crate.

use std::collections::HashSet;
use std::fmt;

use nalgebra::DVector;

// =================================================================================================
// Component (type-safe identifier)
// =================================================================================================

/// Known chemical components of a kraft cook
///
/// # Extension
///
/// Models that track other species (test fixtures, reduced models) use
/// `Custom` with a static name rather than strings, which keeps the identifier
/// `Copy` and hashable.
///
/// # Example
/// ```
/// use pulpsim::physics::Component;
///
/// assert_eq!(Component::Alkali.name(), "Alkali");
/// assert_eq!(Component::Custom("Xylan").to_string(), "Xylan");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    /// Residual lignin bound in the wood matrix
    Lignin,

    /// Carbohydrates (cellulose and hemicelluloses)
    Carbohydrate,

    /// Effective alkali (hydroxide), mobile between liquor and wood
    Alkali,

    /// Hydrosulfide, mobile between liquor and wood
    Sulfur,

    /// Custom component (for use extension)
    Custom(&'static str),
}

impl Component {
    /// Display name
    pub fn name(&self) -> &str {
        match self {
            Component::Lignin => "Lignin",
            Component::Carbohydrate => "Carbohydrate",
            Component::Alkali => "Alkali",
            Component::Sulfur => "Sulfur",
            Component::Custom(name) => name,
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =================================================================================================
// Component set
// =================================================================================================

/// Ordered list of components with their molar masses
///
/// # Example
/// ```
/// use pulpsim::physics::{Component, ComponentSet};
///
/// let kraft = ComponentSet::kraft();
/// assert_eq!(kraft.len(), 4);
/// assert_eq!(kraft.index_of(Component::Alkali), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentSet {
    components: Vec<Component>,
    molar_masses: DVector<f64>,
}

impl ComponentSet {
    /// Creates a component set
    ///
    /// # Errors
    ///
    /// - empty component list
    /// - `molar_masses` length differs from `components`
    /// - duplicate component
    /// - non-positive or non-finite molar mass
    pub fn new(components: Vec<Component>, molar_masses: Vec<f64>) -> Result<Self, String> {
        if components.is_empty() {
            return Err("A component set needs at least one component".to_string());
        }

        if components.len() != molar_masses.len() {
            return Err(format!(
                "Got {} components but {} molar masses",
                components.len(),
                molar_masses.len()
            ));
        }

        let mut seen = HashSet::new();
        for component in &components {
            if !seen.insert(*component) {
                return Err(format!("Duplicate component '{component}' in component set"));
            }
        }

        for (component, &mass) in components.iter().zip(&molar_masses) {
            if !(mass.is_finite() && mass > 0.0) {
                return Err(format!(
                    "Molar mass of '{component}' must be strictly positive, got {mass}"
                ));
            }
        }

        Ok(Self {
            components,
            molar_masses: DVector::from_vec(molar_masses),
        })
    }

    /// Kraft cook components in canonical order: lignin, carbohydrate, alkali, sulfur
    ///
    /// Molar masses are unity, i.e. amounts are tracked in mass-equivalent units.
    pub fn kraft() -> Self {
        Self {
            components: vec![
                Component::Lignin,
                Component::Carbohydrate,
                Component::Alkali,
                Component::Sulfur,
            ],
            molar_masses: DVector::from_element(4, 1.0),
        }
    }

    /// Number of components
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Always false for a constructed set
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn molar_masses(&self) -> &DVector<f64> {
        &self.molar_masses
    }

    /// Row index of a component
    pub fn index_of(&self, component: Component) -> Option<usize> {
        self.components.iter().position(|c| *c == component)
    }

    /// Component names in row order (plot legends, CSV headers)
    pub fn names(&self) -> Vec<&str> {
        self.components.iter().map(|c| c.name()).collect()
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kraft_order() {
        let set = ComponentSet::kraft();
        assert_eq!(set.names(), vec!["Lignin", "Carbohydrate", "Alkali", "Sulfur"]);
        assert_eq!(set.index_of(Component::Lignin), Some(0));
        assert_eq!(set.index_of(Component::Sulfur), Some(3));
        assert_eq!(set.index_of(Component::Custom("Xylan")), None);
    }

    #[test]
    fn test_rejects_duplicates() {
        let err = ComponentSet::new(
            vec![Component::Alkali, Component::Alkali],
            vec![1.0, 1.0],
        ).unwrap_err();
        assert!(err.contains("Duplicate") && err.contains("Alkali"));
    }

    #[test]
    fn test_rejects_length_mismatch() {
        assert!(ComponentSet::new(vec![Component::Lignin], vec![1.0, 2.0]).is_err());
    }

    #[test]
    fn test_rejects_non_positive_mass() {
        let err = ComponentSet::new(vec![Component::Custom("A")], vec![0.0]).unwrap_err();
        assert!(err.contains("'A'"));
    }

    #[test]
    fn test_rejects_empty() {
        assert!(ComponentSet::new(vec![], vec![]).is_err());
    }
}
