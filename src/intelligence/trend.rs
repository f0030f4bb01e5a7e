// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Freshness and fitness trend from the tail of the timeline

use super::timeline::Timeline;
use crate::constants::load;
use crate::errors::EngineError;
use serde::{Deserialize, Serialize};

/// Freshness from the latest stress balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FreshnessState {
    /// tsb > 10
    VeryFresh,
    /// 5 < tsb <= 10
    Optimal,
    /// -5 < tsb <= 5
    InLoad,
    /// -10 < tsb <= -5
    ModerateFatigue,
    /// tsb <= -10
    OvertrainingRisk,
}

impl FreshnessState {
    pub fn from_tsb(tsb: f64) -> Self {
        match tsb {
            t if t > 10.0 => Self::VeryFresh,
            t if t > 5.0 => Self::Optimal,
            t if t > -5.0 => Self::InLoad,
            t if t > -10.0 => Self::ModerateFatigue,
            _ => Self::OvertrainingRisk,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::VeryFresh => "very fresh",
            Self::Optimal => "optimal",
            Self::InLoad => "in-load",
            Self::ModerateFatigue => "moderate fatigue",
            Self::OvertrainingRisk => "overtraining risk",
        }
    }

    fn status_line(&self) -> &'static str {
        match self {
            Self::VeryFresh => "Very fresh (TSB > +10)",
            Self::Optimal => "In the optimal zone (TSB between +5 and +10)",
            Self::InLoad => "Under full load (TSB between -5 and +5)",
            Self::ModerateFatigue => "Moderate fatigue (TSB between -10 and -5)",
            Self::OvertrainingRisk => "Overtraining risk (TSB < -10)",
        }
    }

    fn suggestion_line(&self) -> &'static str {
        match self {
            Self::VeryFresh => "Increase intensity or schedule a race.",
            Self::Optimal => "Ready to perform.",
            Self::InLoad => "Keep the current rhythm without overdoing it.",
            Self::ModerateFatigue => "Watch how you feel and consider a light or rest day.",
            Self::OvertrainingRisk => "Schedule at least 1 to 2 recovery days.",
        }
    }
}

/// Direction of chronic load over the trend window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadTrend {
    /// delta > 5
    StrongRise,
    /// 1 < delta <= 5
    SlightRise,
    /// -1 < delta <= 1
    Stable,
    /// delta <= -1
    Declining,
}

impl LoadTrend {
    pub fn from_delta(ctl_delta: f64) -> Self {
        match ctl_delta {
            d if d > 5.0 => Self::StrongRise,
            d if d > 1.0 => Self::SlightRise,
            d if d > -1.0 => Self::Stable,
            _ => Self::Declining,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::StrongRise => "strong rise",
            Self::SlightRise => "slight rise",
            Self::Stable => "stable",
            Self::Declining => "declining",
        }
    }
}

/// Combined freshness and trend readout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAssessment {
    pub freshness: FreshnessState,
    pub trend: LoadTrend,
    pub latest_tsb: f64,
    pub latest_ctl: f64,
    pub ctl_delta: f64,
    pub status_lines: Vec<String>,
    pub suggestion_lines: Vec<String>,
    pub recovery_advised: bool,
}

/// Reads the latest stress balance and the chronic load change over a trailing window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendClassifier {
    trend_days: usize,
}

impl Default for TrendClassifier {
    fn default() -> Self {
        Self::new(load::TREND_WINDOW_DAYS)
    }
}

impl TrendClassifier {
    pub const fn new(trend_days: usize) -> Self {
        Self { trend_days }
    }

    /// Classify the timeline tail
    ///
    /// `ctl_delta` is the last chronic load minus the first one of the trailing window.
    pub fn classify(&self, timeline: &Timeline) -> Result<TrendAssessment, EngineError> {
        let required = self.trend_days.max(1);
        if timeline.len() < required {
            return Err(EngineError::InsufficientHistory {
                required,
                actual: timeline.len(),
            });
        }

        let window = timeline.tail(required);
        let (first, last) = match (window.first(), window.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return Err(EngineError::InsufficientHistory {
                    required,
                    actual: 0,
                })
            }
        };

        let ctl_delta = last.ctl - first.ctl;
        let freshness = FreshnessState::from_tsb(last.tsb);
        let trend = LoadTrend::from_delta(ctl_delta);

        let mut status_lines = vec![freshness.status_line().to_string()];
        let mut suggestion_lines = vec![freshness.suggestion_line().to_string()];
        let recovery_advised = freshness == FreshnessState::OvertrainingRisk;

        let days = required;
        status_lines.push(match trend {
            LoadTrend::StrongRise => {
                format!("CTL rising strongly (+{ctl_delta:.1} over {days} days)")
            }
            LoadTrend::SlightRise => {
                format!("CTL rising slightly (+{ctl_delta:.1} over {days} days)")
            }
            LoadTrend::Stable => format!("CTL stable (~{:.1})", last.ctl),
            LoadTrend::Declining => format!("CTL declining ({ctl_delta:.1} over {days} days)"),
        });
        if trend == LoadTrend::Declining {
            suggestion_lines.push("Careful not to ease off too much.".to_string());
        }

        Ok(TrendAssessment {
            freshness,
            trend,
            latest_tsb: last.tsb,
            latest_ctl: last.ctl,
            ctl_delta,
            status_lines,
            suggestion_lines,
            recovery_advised,
        })
    }
}
