//! Diagnostic histories recorded alongside a simulation
//!
//! The log is owned by the caller (it travels inside
//! [`SimulationResult`](crate::solver::SimulationResult)) and is only written
//! through [`PhysicalModel::observe`](crate::physics::PhysicalModel::observe),
//! which solvers call on accepted states. Trial stages of a Runge-Kutta step
//! and rejected adaptive steps never reach it.

/// Time-stamped temperature and kappa-number histories
///
/// Append-only and time-ordered: a record older than the last one of the same
/// series is dropped.
///
/// # Example
/// ```
/// use pulpsim::physics::DiagnosticLog;
///
/// let mut log = DiagnosticLog::new();
/// log.record_temperature(0.0, 353.15);
/// log.record_temperature(60.0, 358.15);
/// log.record_temperature(30.0, 999.0); // out of order, ignored
///
/// assert_eq!(log.temperature_history().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiagnosticLog {
    temperature: Vec<(f64, f64)>,
    kappa: Vec<(f64, f64)>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a bath temperature sample \[K\]
    pub fn record_temperature(&mut self, time: f64, temperature: f64) {
        push_ordered(&mut self.temperature, time, temperature, "temperature");
    }

    /// Appends a kappa-number sample
    pub fn record_kappa(&mut self, time: f64, kappa: f64) {
        push_ordered(&mut self.kappa, time, kappa, "kappa");
    }

    /// `(time, temperature)` pairs in recording order
    pub fn temperature_history(&self) -> &[(f64, f64)] {
        &self.temperature
    }

    /// `(time, kappa)` pairs in recording order
    pub fn kappa_history(&self) -> &[(f64, f64)] {
        &self.kappa
    }

    pub fn is_empty(&self) -> bool {
        self.temperature.is_empty() && self.kappa.is_empty()
    }
}

fn push_ordered(series: &mut Vec<(f64, f64)>, time: f64, value: f64, label: &str) {
    if let Some(&(last, _)) = series.last()
        && time < last
    {
        log::warn!("Dropping {label} sample at t={time}: history already reached t={last}");
        return;
    }
    series.push((time, value));
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_log() {
        let log = DiagnosticLog::new();
        assert!(log.is_empty());
        assert!(log.kappa_history().is_empty());
    }

    #[test]
    fn test_series_are_independent() {
        let mut log = DiagnosticLog::new();
        log.record_kappa(10.0, 90.0);
        log.record_temperature(0.0, 300.0);

        assert_eq!(log.kappa_history(), &[(10.0, 90.0)]);
        assert_eq!(log.temperature_history(), &[(0.0, 300.0)]);
    }

    #[test]
    fn test_equal_times_are_kept() {
        let mut log = DiagnosticLog::new();
        log.record_kappa(1.0, 50.0);
        log.record_kappa(1.0, 49.0);
        assert_eq!(log.kappa_history().len(), 2);
    }

    #[test]
    fn test_out_of_order_is_dropped() {
        let mut log = DiagnosticLog::new();
        log.record_kappa(5.0, 50.0);
        log.record_kappa(4.0, 60.0);
        assert_eq!(log.kappa_history(), &[(5.0, 50.0)]);
    }
}
