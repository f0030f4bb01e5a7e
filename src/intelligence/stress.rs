// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Per-activity training stress estimation

use crate::config::EngineConfig;
use crate::constants::physiology;

/// Converts duration and average heart rate into unitless training stress
///
/// `stress = duration_minutes * IF²` where `IF = avg_hr / max_hr`, or the
/// fallback factor when heart rate is unknown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StressEstimator {
    max_heart_rate: f64,
    fallback_intensity_factor: f64,
}

impl Default for StressEstimator {
    fn default() -> Self {
        Self::new(physiology::DEFAULT_MAX_HEART_RATE)
    }
}

impl StressEstimator {
    /// Estimator with the default fallback intensity factor
    pub const fn new(max_heart_rate: f64) -> Self {
        Self {
            max_heart_rate,
            fallback_intensity_factor: physiology::FALLBACK_INTENSITY_FACTOR,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            max_heart_rate: config.max_heart_rate,
            fallback_intensity_factor: config.fallback_intensity_factor,
        }
    }

    pub fn max_heart_rate(&self) -> f64 {
        self.max_heart_rate
    }

    /// Intensity factor used for the estimate
    pub fn intensity_factor(&self, avg_heart_rate: Option<f64>) -> f64 {
        match avg_heart_rate {
            Some(hr) if hr.is_finite() && hr > 0.0 => hr / self.max_heart_rate,
            _ => self.fallback_intensity_factor,
        }
    }

    /// Training stress for one activity; zero for a missing or zero duration
    pub fn estimate(&self, duration_minutes: f64, avg_heart_rate: Option<f64>) -> f64 {
        if !(duration_minutes.is_finite() && duration_minutes > 0.0) {
            return 0.0;
        }
        let intensity = self.intensity_factor(avg_heart_rate);
        duration_minutes * intensity * intensity
    }
}
