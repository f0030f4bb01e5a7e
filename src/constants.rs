// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Constants Module
//!
//! Default values for the training load engine and environment-based overrides.
//! Every value here is only a default: the engine reads its settings from an
//! [`EngineConfig`](crate::config::EngineConfig) passed at construction.

/// Training load model defaults
pub mod load {
    /// Days of history in the dense timeline
    pub const DEFAULT_HORIZON_DAYS: usize = 180;

    /// Chronic load (fitness) trailing window
    pub const CHRONIC_WINDOW_DAYS: usize = 42;

    /// Acute load (fatigue) trailing window
    pub const ACUTE_WINDOW_DAYS: usize = 7;

    /// Window used to measure the chronic load trend
    pub const TREND_WINDOW_DAYS: usize = 14;
}

/// Physiological defaults
pub mod physiology {
    /// Maximum heart rate used when the athlete has not configured one
    pub const DEFAULT_MAX_HEART_RATE: f64 = 190.0;

    /// Intensity factor assumed for an activity without heart rate
    pub const FALLBACK_INTENSITY_FACTOR: f64 = 0.7;

    /// Intensity factor used when the estimated one is degenerate
    pub const DEGENERATE_INTENSITY_FACTOR: f64 = 0.65;

    /// Upper bound on any intensity factor
    pub const MAX_INTENSITY_FACTOR: f64 = 2.5;

    /// Activities shorter than this are ignored by the intensity summary
    pub const MIN_MOVING_SECONDS: u64 = 30;

    /// Zone 4 starts at this fraction of max heart rate
    pub const ZONE4_FRACTION: f64 = 0.8;

    /// Zone 5 starts at this fraction of max heart rate
    pub const ZONE5_FRACTION: f64 = 0.9;
}

/// Secondary metric defaults
pub mod metrics {
    /// Lookback for the weekly volume average
    pub const VOLUME_LOOKBACK_DAYS: usize = 28;

    /// A day above this stress counts as a charge day
    pub const CHARGE_DAY_THRESHOLD: f64 = 50.0;

    /// A day below this stress counts as a recovery day
    pub const RECOVERY_DAY_THRESHOLD: f64 = 20.0;

    /// Windows for the charge/recovery ratio
    pub const CHARGE_RECOVERY_WINDOWS: [usize; 2] = [7, 14];

    /// Most recent activities sampled for anaerobic share
    pub const ANAEROBIC_ACTIVITY_LIMIT: usize = 3;
}

/// Plan generation defaults
pub mod plan {
    /// Window of recent stress balance averaged for the fatigue label
    pub const FATIGUE_WINDOW_DAYS: usize = 7;

    /// Chronic load gain targeted per plan week
    pub const CTL_GAIN_PER_WEEK: f64 = 2.0;
}

/// Environment-based configuration
pub mod env_config {
    use std::env;

    /// Max heart rate override from `TRAIL_COACH_MAX_HR`
    pub fn max_heart_rate() -> Option<f64> {
        env::var("TRAIL_COACH_MAX_HR").ok()?.parse().ok()
    }

    /// Horizon override from `TRAIL_COACH_HORIZON_DAYS`
    pub fn horizon_days() -> Option<usize> {
        env::var("TRAIL_COACH_HORIZON_DAYS").ok()?.parse().ok()
    }

    /// Threshold power override from `TRAIL_COACH_THRESHOLD_POWER`
    pub fn threshold_power() -> Option<f64> {
        env::var("TRAIL_COACH_THRESHOLD_POWER").ok()?.parse().ok()
    }

    /// Service name used in structured logs
    pub fn service_name() -> String {
        env::var("SERVICE_NAME").unwrap_or_else(|_| "trail-coach".to_string())
    }
}

/// Service version from Cargo.toml
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");
