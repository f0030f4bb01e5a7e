// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Engine parameters: athlete physiology, window lengths and classification thresholds

use crate::constants::{load, metrics, physiology, plan};
use crate::errors::EngineError;
use serde::{Deserialize, Serialize};

/// Every tunable the engine reads
///
/// Missing TOML keys fall back to the defaults in [`crate::constants`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub horizon_days: usize,
    pub max_heart_rate: f64,
    /// Functional threshold power in watts, if known
    pub threshold_power: Option<f64>,
    pub fallback_intensity_factor: f64,
    pub degenerate_intensity_factor: f64,
    pub max_intensity_factor: f64,
    pub min_moving_seconds: u64,
    pub windows: LoadWindows,
    pub charge_recovery: ChargeRecoveryThresholds,
    pub anaerobic: AnaerobicConfig,
    pub plan: PlanConfig,
}

/// Trailing window lengths in days
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadWindows {
    pub chronic_days: usize,
    pub acute_days: usize,
    pub trend_days: usize,
    pub volume_lookback_days: usize,
}

/// Day classification for the charge/recovery ratio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChargeRecoveryThresholds {
    /// Stress strictly above this makes a charge day
    pub charge_above: f64,
    /// Stress strictly below this makes a recovery day
    pub recovery_below: f64,
    pub windows: Vec<usize>,
}

/// Heart-rate zone sampling for the anaerobic share
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnaerobicConfig {
    pub activity_limit: usize,
    pub zone4_fraction: f64,
    pub zone5_fraction: f64,
}

/// Plan generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    pub strategy: PlanStrategy,
    pub fatigue_window_days: usize,
    /// Cap on generated weeks; `None` plans every week up to the goal
    pub max_weeks: Option<usize>,
    pub ctl_gain_per_week: f64,
}

/// How weekly sessions are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStrategy {
    /// Development, specific and taper phases by distance to the goal
    #[default]
    Periodized,
    /// The goal focus template every week
    FocusTemplates,
}

impl PlanStrategy {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Periodized => "periodized",
            Self::FocusTemplates => "focus_templates",
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            horizon_days: load::DEFAULT_HORIZON_DAYS,
            max_heart_rate: physiology::DEFAULT_MAX_HEART_RATE,
            threshold_power: None,
            fallback_intensity_factor: physiology::FALLBACK_INTENSITY_FACTOR,
            degenerate_intensity_factor: physiology::DEGENERATE_INTENSITY_FACTOR,
            max_intensity_factor: physiology::MAX_INTENSITY_FACTOR,
            min_moving_seconds: physiology::MIN_MOVING_SECONDS,
            windows: LoadWindows::default(),
            charge_recovery: ChargeRecoveryThresholds::default(),
            anaerobic: AnaerobicConfig::default(),
            plan: PlanConfig::default(),
        }
    }
}

impl Default for LoadWindows {
    fn default() -> Self {
        Self {
            chronic_days: load::CHRONIC_WINDOW_DAYS,
            acute_days: load::ACUTE_WINDOW_DAYS,
            trend_days: load::TREND_WINDOW_DAYS,
            volume_lookback_days: metrics::VOLUME_LOOKBACK_DAYS,
        }
    }
}

impl Default for ChargeRecoveryThresholds {
    fn default() -> Self {
        Self {
            charge_above: metrics::CHARGE_DAY_THRESHOLD,
            recovery_below: metrics::RECOVERY_DAY_THRESHOLD,
            windows: metrics::CHARGE_RECOVERY_WINDOWS.to_vec(),
        }
    }
}

impl Default for AnaerobicConfig {
    fn default() -> Self {
        Self {
            activity_limit: metrics::ANAEROBIC_ACTIVITY_LIMIT,
            zone4_fraction: physiology::ZONE4_FRACTION,
            zone5_fraction: physiology::ZONE5_FRACTION,
        }
    }
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            strategy: PlanStrategy::default(),
            fatigue_window_days: plan::FATIGUE_WINDOW_DAYS,
            max_weeks: None,
            ctl_gain_per_week: plan::CTL_GAIN_PER_WEEK,
        }
    }
}

impl EngineConfig {
    /// Reject settings the engine cannot compute with
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.horizon_days < 1 {
            return Err(EngineError::invalid_config("horizon_days must be at least 1"));
        }
        if !(self.max_heart_rate.is_finite() && self.max_heart_rate > 0.0) {
            return Err(EngineError::invalid_config(format!(
                "max_heart_rate must be positive, got {}",
                self.max_heart_rate
            )));
        }
        if let Some(ftp) = self.threshold_power {
            if !(ftp.is_finite() && ftp > 0.0) {
                return Err(EngineError::invalid_config(format!(
                    "threshold_power must be positive, got {ftp}"
                )));
            }
        }
        if self.max_intensity_factor <= 0.0 {
            return Err(EngineError::invalid_config("max_intensity_factor must be positive"));
        }

        let windows = [
            ("windows.chronic_days", self.windows.chronic_days),
            ("windows.acute_days", self.windows.acute_days),
            ("windows.trend_days", self.windows.trend_days),
            ("windows.volume_lookback_days", self.windows.volume_lookback_days),
            ("plan.fatigue_window_days", self.plan.fatigue_window_days),
        ];
        for (name, days) in windows {
            if days < 1 {
                return Err(EngineError::invalid_config(format!("{name} must be at least 1")));
            }
        }
        if self.charge_recovery.windows.iter().any(|&d| d < 1) {
            return Err(EngineError::invalid_config(
                "charge_recovery.windows entries must be at least 1",
            ));
        }

        let zones = &self.anaerobic;
        if !(zones.zone4_fraction > 0.0 && zones.zone4_fraction <= zones.zone5_fraction) {
            return Err(EngineError::invalid_config(
                "anaerobic zone fractions must satisfy 0 < zone4 <= zone5",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.horizon_days, 180);
        assert_eq!(config.windows.chronic_days, 42);
        assert_eq!(config.windows.acute_days, 7);
        assert_eq!(config.charge_recovery.windows, vec![7, 14]);
        assert_eq!(config.plan.strategy, PlanStrategy::Periodized);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
max_heart_rate = 185.0
threshold_power = 250.0

[plan]
strategy = "focus_templates"
"#,
        )
        .unwrap();

        assert_eq!(config.max_heart_rate, 185.0);
        assert_eq!(config.threshold_power, Some(250.0));
        assert_eq!(config.plan.strategy, PlanStrategy::FocusTemplates);
        assert_eq!(config.plan.fatigue_window_days, 7);
        assert_eq!(config.horizon_days, 180);
    }

    #[test]
    fn test_validate_rejects_zero_horizon() {
        let config = EngineConfig {
            horizon_days: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(EngineError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_heart_rate() {
        let config = EngineConfig {
            max_heart_rate: 0.0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());

        let config = EngineConfig {
            threshold_power: Some(-10.0),
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
