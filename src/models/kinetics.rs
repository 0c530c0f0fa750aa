//! Reaction kinetics evaluated inside one wood compartment
//!
//! # Kraft delignification
//!
//! Three reaction channels act on the four kraft components:
//!
//! | channel | consumes     | rate                                  |
//! |---------|--------------|---------------------------------------|
//! | r1      | lignin       | regime dependent (see [`Regime`])     |
//! | r2      | carbohydrate | regime dependent                      |
//! | r3      | alkali       | `(kr3·r1 + kr4·r2)·ρ`                 |
//!
//! The regime is picked from the compartment's lignin mass fraction against
//! two thresholds, then one pure rate law per regime is evaluated.
//!
//! # Extension
//!
//! [`ReactionKinetics`] is the seam the cook model evaluates columnwise. Any
//! rate law with a fixed stoichiometric matrix can be plugged in.

use nalgebra::{DMatrix, DVector};

use crate::physics::Component;

/// Alkali consumption per unit of delignification, all regimes
const KR3: f64 = -4.78e-3;

/// Alkali consumption per unit of carbohydrate dissolution, all regimes
const KR4: f64 = 1.81e-2;

// =================================================================================================
// Kinetics trait
// =================================================================================================

/// Local state handed to a rate law: one wood compartment at one instant
#[derive(Debug, Clone, Copy)]
pub struct LocalConditions<'a> {
    /// Concentrations in component order \[mol/m³\]
    pub concentrations: &'a [f64],

    /// Mass fractions of the compartment's dry wood, component order
    pub mass_fractions: &'a [f64],

    /// Bath temperature \[K\]
    pub temperature: f64,
}

/// Rate law applied independently to every wood compartment
///
/// # Contract
///
/// - `rates` returns one entry per column of [`stoichiometry`](Self::stoichiometry)
/// - `rates` is pure and never panics on negative concentrations
///   (clamp before fractional powers)
pub trait ReactionKinetics: Send + Sync {
    /// Stoichiometric matrix `[n_components × n_reactions]`
    ///
    /// Negative entries are consumed species, positive entries produced ones.
    fn stoichiometry(&self) -> &DMatrix<f64>;

    fn n_components(&self) -> usize {
        self.stoichiometry().nrows()
    }

    fn n_reactions(&self) -> usize {
        self.stoichiometry().ncols()
    }

    /// Component order the stoichiometry rows are written in
    ///
    /// `None` means the rate law is index based only and accepts any set of
    /// the right size.
    fn components(&self) -> Option<&[Component]> {
        None
    }

    /// Reaction rates, one per channel \[mol/(m³·s)\]
    fn rates(&self, local: &LocalConditions<'_>) -> DVector<f64>;

    /// Name of the rate law (display and logging)
    fn name(&self) -> &str;
}

// =================================================================================================
// Regime selection
// =================================================================================================

/// Lignin mass-fraction thresholds separating the three regimes
///
/// Invariant: `upper > lower`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseLimits {
    upper: f64,
    lower: f64,
}

impl PhaseLimits {
    /// # Errors
    ///
    /// Non-finite limits, or `upper <= lower`.
    pub fn new(upper: f64, lower: f64) -> Result<Self, String> {
        if !upper.is_finite() || !lower.is_finite() {
            return Err(format!("Phase limits must be finite, got {upper} and {lower}"));
        }
        if upper <= lower {
            return Err(format!(
                "Upper phase limit ({upper}) must exceed lower phase limit ({lower})"
            ));
        }
        Ok(Self { upper, lower })
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }
}

/// Kinetic regime of a kraft cook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Regime {
    /// `lignin_fraction >= upper`
    Bulk,

    /// `lower <= lignin_fraction < upper`
    Transition,

    /// `lignin_fraction < lower`
    Residual,
}

impl Regime {
    /// Select the regime for a lignin mass fraction
    ///
    /// Boundaries belong to the higher regime: exactly `upper` is bulk,
    /// exactly `lower` is transition.
    ///
    /// ```rust
    /// use pulpsim::models::{PhaseLimits, Regime};
    ///
    /// let limits = PhaseLimits::new(0.2, 0.05).unwrap();
    /// assert_eq!(Regime::select(0.2, &limits), Regime::Bulk);
    /// assert_eq!(Regime::select(0.05, &limits), Regime::Transition);
    /// assert_eq!(Regime::select(0.01, &limits), Regime::Residual);
    /// ```
    pub fn select(lignin_fraction: f64, limits: &PhaseLimits) -> Self {
        if lignin_fraction >= limits.upper {
            Regime::Bulk
        } else if lignin_fraction >= limits.lower {
            Regime::Transition
        } else {
            Regime::Residual
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Regime::Bulk => "bulk",
            Regime::Transition => "transition",
            Regime::Residual => "residual",
        }
    }
}

// =================================================================================================
// Coefficient sets
// =================================================================================================

/// Supported parameterizations of the kraft rate constants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KineticsVariant {
    /// Constant coefficients: primary 0.01, secondary 0.02
    Andersson,

    /// Arrhenius coefficients fitted per regime
    Gustafsson,
}

/// Rate constants of one regime at one temperature
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateConstants {
    /// Primary delignification constant (`kr1`, or `kr11` in transition)
    pub primary: f64,

    /// Sulfide-assisted delignification constant (`kr12`), transition only
    pub sulfide: f64,

    /// Carbohydrate-to-lignin rate ratio (`kr2`)
    pub secondary: f64,
}

impl KineticsVariant {
    pub fn name(&self) -> &'static str {
        match self {
            KineticsVariant::Andersson => "Andersson",
            KineticsVariant::Gustafsson => "Gustafsson",
        }
    }

    /// Rate constants for a regime at temperature `t` \[K\]
    pub fn rate_constants(&self, regime: Regime, t: f64) -> RateConstants {
        match self {
            KineticsVariant::Andersson => RateConstants {
                primary: 0.01,
                sulfide: 0.01,
                secondary: 0.02,
            },
            KineticsVariant::Gustafsson => match regime {
                Regime::Bulk => RateConstants {
                    primary: 36.2 * t.sqrt() * (-4807.69 / t).exp(),
                    sulfide: 0.0,
                    secondary: 2.53,
                },
                Regime::Transition => RateConstants {
                    primary: arrhenius(35.19, 17200.0, t),
                    sulfide: arrhenius(29.23, 14400.0, t),
                    secondary: 0.47,
                },
                Regime::Residual => RateConstants {
                    primary: arrhenius(19.64, 10804.0, t),
                    sulfide: 0.0,
                    secondary: 2.19,
                },
            },
        }
    }
}

/// `exp(a - b / T)`
fn arrhenius(a: f64, b: f64, t: f64) -> f64 {
    (a - b / t).exp()
}

// =================================================================================================
// Kraft kinetics
// =================================================================================================

/// Three-regime kraft delignification kinetics
///
/// Expects components in kraft order: lignin, carbohydrate, alkali, sulfur.
///
/// # Example
///
/// ```rust
/// use pulpsim::models::{KineticsVariant, KraftKinetics, LocalConditions, PhaseLimits, ReactionKinetics};
///
/// let kinetics = KraftKinetics::new(
///     KineticsVariant::Andersson,
///     PhaseLimits::new(0.2, 0.05).unwrap(),
/// );
///
/// let rates = kinetics.rates(&LocalConditions {
///     concentrations: &[1.0, 1.0, 1.0, 1.0],
///     mass_fractions: &[0.3, 0.6, 0.0, 0.0],
///     temperature: 400.0,
/// });
/// assert_eq!(rates.len(), 3);
/// assert_eq!(rates[0], 0.01); // bulk: r1 = kr1 · L
/// ```
#[derive(Debug, Clone)]
pub struct KraftKinetics {
    variant: KineticsVariant,
    limits: PhaseLimits,
    alkali_consumption_scale: f64,
    stoichiometry: DMatrix<f64>,
}

const LIGNIN: usize = 0;
const CARBOHYDRATE: usize = 1;
const ALKALI: usize = 2;
const SULFUR: usize = 3;

/// Row order the indices above refer to
const KRAFT_ORDER: [Component; 4] = [
    Component::Lignin,
    Component::Carbohydrate,
    Component::Alkali,
    Component::Sulfur,
];

impl KraftKinetics {
    /// Kraft kinetics with unscaled alkali consumption (`ρ = 1`)
    pub fn new(variant: KineticsVariant, limits: PhaseLimits) -> Self {
        let mut stoichiometry = DMatrix::zeros(4, 3);
        stoichiometry[(LIGNIN, 0)] = -1.0;
        stoichiometry[(CARBOHYDRATE, 1)] = -1.0;
        stoichiometry[(ALKALI, 2)] = -1.0;

        Self {
            variant,
            limits,
            alkali_consumption_scale: 1.0,
            stoichiometry,
        }
    }

    /// Scale the alkali consumption rate by `ρ` (typically density / porinf)
    pub fn with_alkali_consumption_scale(mut self, scale: f64) -> Self {
        self.alkali_consumption_scale = scale;
        self
    }

    pub fn variant(&self) -> KineticsVariant {
        self.variant
    }

    pub fn limits(&self) -> &PhaseLimits {
        &self.limits
    }

    pub fn alkali_consumption_scale(&self) -> f64 {
        self.alkali_consumption_scale
    }

    /// Regime a compartment with the given mass fractions is in
    pub fn regime(&self, mass_fractions: &[f64]) -> Regime {
        Regime::select(mass_fractions[LIGNIN], &self.limits)
    }
}

impl ReactionKinetics for KraftKinetics {
    fn stoichiometry(&self) -> &DMatrix<f64> {
        &self.stoichiometry
    }

    fn components(&self) -> Option<&[Component]> {
        Some(&KRAFT_ORDER[..])
    }

    fn rates(&self, local: &LocalConditions<'_>) -> DVector<f64> {
        let c = local.concentrations;
        if c[LIGNIN] < 0.0 || c[ALKALI] < 0.0 || c[SULFUR] < 0.0 {
            log::debug!(
                "Clamping negative concentrations (L={}, A={}, S={}) to zero",
                c[LIGNIN], c[ALKALI], c[SULFUR]
            );
        }
        let lignin = c[LIGNIN].max(0.0);
        let alkali = c[ALKALI].max(0.0);
        let sulfur = c[SULFUR].max(0.0);

        let regime = self.regime(local.mass_fractions);
        let k = self.variant.rate_constants(regime, local.temperature);

        let (r1, r2) = match regime {
            Regime::Bulk => bulk_rates(&k, lignin, alkali),
            Regime::Transition => transition_rates(&k, lignin, alkali, sulfur),
            Regime::Residual => residual_rates(&k, lignin, alkali),
        };
        let r3 = (KR3 * r1 + KR4 * r2) * self.alkali_consumption_scale;

        DVector::from_vec(vec![r1, r2, r3])
    }

    fn name(&self) -> &str {
        match self.variant {
            KineticsVariant::Andersson => "Kraft kinetics (Andersson)",
            KineticsVariant::Gustafsson => "Kraft kinetics (Gustafsson)",
        }
    }
}

fn bulk_rates(k: &RateConstants, lignin: f64, alkali: f64) -> (f64, f64) {
    let r1 = k.primary * lignin;
    let r2 = k.primary * k.secondary * lignin * alkali.powf(0.11);
    (r1, r2)
}

fn transition_rates(k: &RateConstants, lignin: f64, alkali: f64, sulfur: f64) -> (f64, f64) {
    let r1 = k.primary * alkali * lignin + k.sulfide * lignin * alkali.sqrt() * sulfur.powf(0.4);
    (r1, k.secondary * r1)
}

fn residual_rates(k: &RateConstants, lignin: f64, alkali: f64) -> (f64, f64) {
    let r1 = k.primary * alkali.powf(0.7) * lignin;
    (r1, k.secondary * r1)
}

// =================================================================================================
// Kappa number
// =================================================================================================

/// Kappa number from lignin and carbohydrate mass fractions
///
/// `500 · (100L / (100L + 100C)) + 5`. With no organic matter left
/// (`L + C <= 0`) the lignin ratio is taken as zero.
///
/// ```rust
/// use pulpsim::models::kappa_number;
///
/// assert_eq!(kappa_number(0.5, 0.5), 255.0);
/// assert_eq!(kappa_number(0.0, 0.0), 5.0);
/// ```
pub fn kappa_number(lignin: f64, carbohydrate: f64) -> f64 {
    let organic = 100.0 * lignin + 100.0 * carbohydrate;
    let ratio = if organic > 0.0 { 100.0 * lignin / organic } else { 0.0 };
    500.0 * ratio + 5.0
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn limits() -> PhaseLimits {
        PhaseLimits::new(0.2, 0.05).unwrap()
    }

    fn local<'a>(c: &'a [f64], f: &'a [f64], t: f64) -> LocalConditions<'a> {
        LocalConditions { concentrations: c, mass_fractions: f, temperature: t }
    }

    // ====== Regime selection ======

    #[test]
    fn test_regime_boundaries() {
        let limits = limits();
        let below = |x: f64| x - f64::EPSILON;

        assert_eq!(Regime::select(0.2, &limits), Regime::Bulk);
        assert_eq!(Regime::select(below(0.2), &limits), Regime::Transition);
        assert_eq!(Regime::select(0.05, &limits), Regime::Transition);
        assert_eq!(Regime::select(below(0.05), &limits), Regime::Residual);
    }

    #[test]
    fn test_phase_limits_validation() {
        assert!(PhaseLimits::new(0.1, 0.1).is_err());
        assert!(PhaseLimits::new(0.05, 0.1).is_err());
        assert!(PhaseLimits::new(f64::NAN, 0.1).is_err());
    }

    // ====== Coefficients ======

    #[test]
    fn test_andersson_constants_ignore_temperature() {
        for regime in [Regime::Bulk, Regime::Transition, Regime::Residual] {
            let k = KineticsVariant::Andersson.rate_constants(regime, 350.0);
            assert_eq!(k.primary, 0.01);
            assert_eq!(k.secondary, 0.02);
        }
    }

    #[test]
    fn test_gustafsson_bulk_constant() {
        let t = 400.0;
        let k = KineticsVariant::Gustafsson.rate_constants(Regime::Bulk, t);
        assert_relative_eq!(k.primary, 36.2 * 20.0 * (-4807.69_f64 / 400.0).exp(), max_relative = 1e-14);
        assert_eq!(k.secondary, 2.53);
    }

    #[test]
    fn test_gustafsson_transition_constants() {
        let k = KineticsVariant::Gustafsson.rate_constants(Regime::Transition, 440.0);
        assert_relative_eq!(k.primary, (35.19 - 17200.0 / 440.0_f64).exp(), max_relative = 1e-14);
        assert_relative_eq!(k.sulfide, (29.23 - 14400.0 / 440.0_f64).exp(), max_relative = 1e-14);
        assert_eq!(k.secondary, 0.47);
    }

    // ====== Rate laws ======

    #[test]
    fn test_bulk_rates() {
        let kinetics = KraftKinetics::new(KineticsVariant::Andersson, limits());
        let r = kinetics.rates(&local(&[2.0, 1.0, 3.0, 1.0], &[0.5, 0.5, 0.0, 0.0], 400.0));

        assert_relative_eq!(r[0], 0.02);
        assert_relative_eq!(r[1], 0.01 * 0.02 * 2.0 * 3.0_f64.powf(0.11));
        assert_relative_eq!(r[2], KR3 * r[0] + KR4 * r[1]);
    }

    #[test]
    fn test_transition_rates() {
        let kinetics = KraftKinetics::new(KineticsVariant::Andersson, limits());
        let r = kinetics.rates(&local(&[2.0, 1.0, 4.0, 1.0], &[0.1, 0.5, 0.0, 0.0], 400.0));

        let r1 = 0.01 * 4.0 * 2.0 + 0.01 * 2.0 * 2.0 * 1.0;
        assert_relative_eq!(r[0], r1);
        assert_relative_eq!(r[1], 0.02 * r1);
    }

    #[test]
    fn test_residual_rates() {
        let kinetics = KraftKinetics::new(KineticsVariant::Andersson, limits());
        let r = kinetics.rates(&local(&[1.0, 1.0, 2.0, 0.0], &[0.01, 0.5, 0.0, 0.0], 400.0));

        assert_relative_eq!(r[0], 0.01 * 2.0_f64.powf(0.7));
        assert_relative_eq!(r[1], 0.02 * r[0]);
    }

    #[test]
    fn test_alkali_consumption_scale() {
        let c = [1.0, 1.0, 1.0, 1.0];
        let f = [0.5, 0.5, 0.0, 0.0];
        let plain = KraftKinetics::new(KineticsVariant::Gustafsson, limits());
        let scaled = plain.clone().with_alkali_consumption_scale(2.5);

        let a = plain.rates(&local(&c, &f, 420.0));
        let b = scaled.rates(&local(&c, &f, 420.0));

        assert_eq!(a[0], b[0]);
        assert_eq!(a[1], b[1]);
        assert_relative_eq!(b[2], 2.5 * a[2]);
    }

    #[test]
    fn test_negative_concentrations_are_clamped() {
        let kinetics = KraftKinetics::new(KineticsVariant::Gustafsson, limits());

        for fractions in [[0.5, 0.5, 0.0, 0.0], [0.1, 0.5, 0.0, 0.0], [0.01, 0.5, 0.0, 0.0]] {
            let negative = kinetics.rates(&local(&[1.0, 1.0, -0.3, -0.1], &fractions, 430.0));
            let zero = kinetics.rates(&local(&[1.0, 1.0, 0.0, 0.0], &fractions, 430.0));

            assert!(negative.iter().all(|r| r.is_finite()));
            assert_eq!(negative, zero);
        }
    }

    #[test]
    fn test_stoichiometry_shape() {
        let kinetics = KraftKinetics::new(KineticsVariant::Andersson, limits());
        let s = kinetics.stoichiometry();

        assert_eq!(kinetics.n_components(), 4);
        assert_eq!(kinetics.n_reactions(), 3);
        assert_eq!(s[(0, 0)], -1.0);
        assert_eq!(s[(1, 1)], -1.0);
        assert_eq!(s[(2, 2)], -1.0);
        assert_eq!(s.iter().filter(|&&x| x != 0.0).count(), 3);
    }

    #[test]
    fn test_component_order_matches_kraft_set() {
        let kinetics = KraftKinetics::new(KineticsVariant::Gustafsson, limits());
        let kraft = crate::physics::ComponentSet::kraft();

        assert_eq!(kinetics.components(), Some(kraft.components()));
        assert_eq!(kraft.index_of(Component::Alkali), Some(ALKALI));
        assert_eq!(kraft.index_of(Component::Sulfur), Some(SULFUR));
    }

    // ====== Kappa ======

    #[test]
    fn test_kappa_number() {
        assert_relative_eq!(kappa_number(0.25, 0.75), 130.0);
        assert_eq!(kappa_number(0.0, 1.0), 5.0);
        assert_eq!(kappa_number(0.0, 0.0), 5.0);
    }
}
