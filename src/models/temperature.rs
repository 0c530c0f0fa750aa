//! Bath temperature schedules for a cook
//!
//! Defines how the cooking liquor temperature varies with elapsed TIME.
//! Every variant is continuous and non-decreasing, so the kinetics never see a
//! temperature jump between two integrator stages.
//!
//! # Example
//!
//! ```rust
//! use pulpsim::models::TemperatureSchedule;
//!
//! // Heat from 353 K to 443 K in 90 minutes, then hold
//! let schedule = TemperatureSchedule::ramp_hold(353.0, 443.0, 90.0 * 60.0);
//!
//! assert_eq!(schedule.evaluate(0.0), 353.0);
//! assert_eq!(schedule.evaluate(45.0 * 60.0), 398.0);
//! assert_eq!(schedule.evaluate(120.0 * 60.0), 443.0);
//! ```

use std::sync::Arc;

/// Temperature profile of the cooking liquor
///
/// # Types
///
/// - **Constant**: isothermal cook
/// - **LinearRamp**: base temperature plus a constant slope, never held
/// - **RampHold**: linear heating up to a maximum, then held
/// - **Custom**: user-defined profile
pub enum TemperatureSchedule {
    /// Fixed temperature \[K\]
    Constant {
        temperature: f64,
    },

    /// `T(t) = initial + slope · t`
    ///
    /// # Parameters
    ///
    /// - `initial` : Temperature at t = 0 \[K\]
    /// - `slope` : Heating rate \[K/s\], non-negative
    LinearRamp {
        initial: f64,
        slope: f64,
    },

    /// Linear ramp then hold
    ///
    /// ```text
    /// T(t) = Ti + (Tmax - Ti) / d · t    for t < d
    /// T(t) = Tmax                        for t >= d
    /// ```
    ///
    /// # Parameters
    ///
    /// - `initial` : Ti \[K\]
    /// - `maximum` : Tmax \[K\], at least `initial`
    /// - `ramp_duration` : d \[s\], strictly positive
    RampHold {
        initial: f64,
        maximum: f64,
        ramp_duration: f64,
    },

    /// Custom temperature profile from user function
    ///
    /// The function is trusted to be continuous and non-decreasing.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pulpsim::models::TemperatureSchedule;
    /// let schedule = TemperatureSchedule::custom(|t| 350.0 + 10.0 * (1.0 - (-t / 600.0).exp()));
    /// assert_eq!(schedule.evaluate(0.0), 350.0);
    /// ```
    Custom(Arc<dyn Fn(f64) -> f64 + Send + Sync>),
}

// ==================== Manual Clone Implementation ====================

impl Clone for TemperatureSchedule {
    fn clone(&self) -> Self {
        match self {
            Self::Constant { temperature } => Self::Constant {
                temperature: *temperature,
            },
            Self::LinearRamp { initial, slope } => Self::LinearRamp {
                initial: *initial,
                slope: *slope,
            },
            Self::RampHold { initial, maximum, ramp_duration } => Self::RampHold {
                initial: *initial,
                maximum: *maximum,
                ramp_duration: *ramp_duration,
            },
            Self::Custom(f) => Self::Custom(Arc::clone(f)),
        }
    }
}

// ==================== Manual Debug Implementation ====================

impl std::fmt::Debug for TemperatureSchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Constant { temperature } => f
                .debug_struct("Constant")
                .field("temperature", temperature)
                .finish(),
            Self::LinearRamp { initial, slope } => f
                .debug_struct("LinearRamp")
                .field("initial", initial)
                .field("slope", slope)
                .finish(),
            Self::RampHold { initial, maximum, ramp_duration } => f
                .debug_struct("RampHold")
                .field("initial", initial)
                .field("maximum", maximum)
                .field("ramp_duration", ramp_duration)
                .finish(),
            Self::Custom(_) => f
                .debug_struct("Custom")
                .field("function", &"<user-defined>")
                .finish(),
        }
    }
}

// ==================== Implementation ====================

impl TemperatureSchedule {
    /// Create an isothermal schedule
    pub fn constant(temperature: f64) -> Self {
        Self::Constant { temperature }
    }

    /// Create an unbounded linear ramp
    pub fn linear_ramp(initial: f64, slope: f64) -> Self {
        Self::LinearRamp { initial, slope }
    }

    /// Create a ramp-then-hold schedule
    ///
    /// # Arguments
    ///
    /// * `initial` - Starting temperature \[K\]
    /// * `maximum` - Hold temperature \[K\]
    /// * `ramp_duration` - Heating time \[s\]
    pub fn ramp_hold(initial: f64, maximum: f64, ramp_duration: f64) -> Self {
        Self::RampHold { initial, maximum, ramp_duration }
    }

    /// Create a custom schedule
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Check that the schedule is finite and non-decreasing
    ///
    /// Custom schedules are not inspected.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::Constant { temperature } => {
                if !temperature.is_finite() || *temperature <= 0.0 {
                    return Err(format!("Temperature must be positive, got {temperature} K"));
                }
                Ok(())
            }
            Self::LinearRamp { initial, slope } => {
                if !initial.is_finite() || *initial <= 0.0 {
                    return Err(format!("Initial temperature must be positive, got {initial} K"));
                }
                if !slope.is_finite() || *slope < 0.0 {
                    return Err(format!("Heating slope must be non-negative, got {slope} K/s"));
                }
                Ok(())
            }
            Self::RampHold { initial, maximum, ramp_duration } => {
                if !initial.is_finite() || *initial <= 0.0 {
                    return Err(format!("Initial temperature must be positive, got {initial} K"));
                }
                if !maximum.is_finite() || maximum < initial {
                    return Err(format!(
                        "Maximum temperature ({maximum} K) must be at least the initial temperature ({initial} K)"
                    ));
                }
                if !ramp_duration.is_finite() || *ramp_duration <= 0.0 {
                    return Err(format!("Ramp duration must be positive, got {ramp_duration} s"));
                }
                Ok(())
            }
            Self::Custom(_) => Ok(()),
        }
    }

    /// Evaluate the bath temperature at a given time
    ///
    /// Negative times are treated as t = 0.
    ///
    /// # Returns
    ///
    /// Temperature \[K\]
    pub fn evaluate(&self, t: f64) -> f64 {
        let t = t.max(0.0);
        match self {
            Self::Constant { temperature } => *temperature,

            Self::LinearRamp { initial, slope } => initial + slope * t,

            Self::RampHold { initial, maximum, ramp_duration } => {
                if t < *ramp_duration {
                    initial + (maximum - initial) / ramp_duration * t
                } else {
                    *maximum
                }
            }

            Self::Custom(f) => f(t),
        }
    }

    /// Evaluate at multiple time points
    pub fn evaluate_series(&self, times: &[f64]) -> Vec<f64> {
        times.iter().map(|&t| self.evaluate(t)).collect()
    }
}

// =================================================================================================
// Tests
// =================================================================================================
