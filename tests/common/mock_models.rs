//! Mock physical models with analytical solutions

use nalgebra::DVector;
use pulpsim::physics::PhysicalModel;

/// Exponential decay model: dy/dt = -k*y
///
/// Analytical solution: y(t) = y₀ * exp(-k*t)
pub struct ExponentialDecay {
    pub points: usize,
    pub decay_rate: f64,
}

impl ExponentialDecay {
    pub fn new(points: usize, decay_rate: f64) -> Self {
        Self { points, decay_rate }
    }

    pub fn analytical_solution(&self, t: f64, y0: f64) -> f64 {
        y0 * (-self.decay_rate * t).exp()
    }
}

impl PhysicalModel for ExponentialDecay {
    fn dimension(&self) -> usize {
        self.points
    }

    fn compute_physics(&self, _t: f64, state: &DVector<f64>) -> DVector<f64> {
        -self.decay_rate * state
    }

    fn setup_initial_state(&self) -> DVector<f64> {
        DVector::from_element(self.points, 1.0)
    }

    fn name(&self) -> &str {
        "Exponential Decay"
    }
}
