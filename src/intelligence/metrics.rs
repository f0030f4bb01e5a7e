// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Secondary training metrics
//!
//! Weekly volume, intensity, charge/recovery balance and anaerobic share,
//! folded into a [`MetricsSummary`] alongside the latest load values.

use super::anaerobic::{AnaerobicAnalyzer, AnaerobicShare};
use super::intensity::{IntensityCalculator, IntensityLevel, IntensitySummary};
use super::round_to;
use super::timeline::Timeline;
use crate::config::{ChargeRecoveryThresholds, EngineConfig};
use crate::models::{ActivityRecord, RecentStreams};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Average kilometers per week over the lookback ending at `reference_date`
///
/// The lookback covers `lookback_days` calendar days including the reference date.
pub fn weekly_volume(
    activities: &[ActivityRecord],
    reference_date: NaiveDate,
    lookback_days: usize,
) -> f64 {
    if lookback_days == 0 {
        return 0.0;
    }
    let start = reference_date
        .checked_sub_days(Days::new(lookback_days as u64 - 1))
        .unwrap_or(NaiveDate::MIN);

    let total_km: f64 = activities
        .iter()
        .filter(|a| (start..=reference_date).contains(&a.calendar_date()))
        .map(ActivityRecord::distance_km)
        .sum();

    let weeks = lookback_days as f64 / 7.0;
    round_to(total_km / weeks, 1)
}

/// Charge and recovery day counts over one trailing window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeRecoverySample {
    pub window_days: usize,
    pub charge_days: usize,
    pub recovery_days: usize,
    /// `charge / recovery`, or `charge` when no recovery day occurred; two decimals
    pub ratio: f64,
}

pub fn charge_recovery(
    timeline: &Timeline,
    window_days: usize,
    thresholds: &ChargeRecoveryThresholds,
) -> ChargeRecoverySample {
    let window = timeline.tail(window_days);
    let charge_days = window
        .iter()
        .filter(|p| p.tss > thresholds.charge_above)
        .count();
    let recovery_days = window
        .iter()
        .filter(|p| p.tss < thresholds.recovery_below)
        .count();

    let ratio = if recovery_days == 0 {
        charge_days as f64
    } else {
        charge_days as f64 / recovery_days as f64
    };

    ChargeRecoverySample {
        window_days,
        charge_days,
        recovery_days,
        ratio: round_to(ratio, 2),
    }
}

/// Every secondary metric of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondaryMetrics {
    pub weekly_volume_km: f64,
    pub intensity: IntensitySummary,
    pub charge_recovery: Vec<ChargeRecoverySample>,
    pub anaerobic: AnaerobicShare,
}

/// Headline numbers of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub ctl: f64,
    pub atl: f64,
    pub tsb: f64,
    pub trailing_7_day_stress: f64,
    pub trailing_14_day_stress: f64,
    pub weekly_volume_km: f64,
    pub average_intensity: Option<f64>,
    pub intensity_level: Option<IntensityLevel>,
    pub zone45_percent: Option<f64>,
    pub charge_recovery: Vec<ChargeRecoverySample>,
    /// Mean stress balance over the fatigue window, used for plan labels
    pub recent_average_tsb: Option<f64>,
}

impl MetricsSummary {
    pub fn from_parts(
        timeline: &Timeline,
        secondary: &SecondaryMetrics,
        fatigue_window_days: usize,
    ) -> Self {
        let (ctl, atl, tsb) = timeline
            .latest()
            .map_or((0.0, 0.0, 0.0), |p| (p.ctl, p.atl, p.tsb));

        Self {
            ctl,
            atl,
            tsb,
            trailing_7_day_stress: round_to(timeline.stress_sum(7), 1),
            trailing_14_day_stress: round_to(timeline.stress_sum(14), 1),
            weekly_volume_km: secondary.weekly_volume_km,
            average_intensity: secondary.intensity.average_if,
            intensity_level: secondary.intensity.level,
            zone45_percent: secondary.anaerobic.average_percent,
            charge_recovery: secondary.charge_recovery.clone(),
            recent_average_tsb: timeline
                .average_tsb(fatigue_window_days)
                .map(|t| round_to(t, 1)),
        }
    }
}

/// Computes [`SecondaryMetrics`] from activities, the timeline and recent streams
#[derive(Debug, Clone)]
pub struct SecondaryMetricsEngine {
    volume_lookback_days: usize,
    charge_recovery: ChargeRecoveryThresholds,
    intensity: IntensityCalculator,
    anaerobic: AnaerobicAnalyzer,
}

impl SecondaryMetricsEngine {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            volume_lookback_days: config.windows.volume_lookback_days,
            charge_recovery: config.charge_recovery.clone(),
            intensity: IntensityCalculator::from_config(config),
            anaerobic: AnaerobicAnalyzer::from_config(config),
        }
    }

    /// Activities and streams dated after `reference_date` are ignored
    pub fn compute(
        &self,
        activities: &[ActivityRecord],
        timeline: &Timeline,
        streams: &RecentStreams,
        reference_date: NaiveDate,
    ) -> SecondaryMetrics {
        let (in_range, after): (Vec<ActivityRecord>, Vec<ActivityRecord>) = activities
            .iter()
            .cloned()
            .partition(|a| a.calendar_date() <= reference_date);
        let excluded: HashSet<&str> = after.iter().map(|a| a.id.as_str()).collect();
        let streams: RecentStreams = streams
            .iter()
            .filter(|s| !excluded.contains(s.activity_id.as_str()))
            .cloned()
            .collect();

        let weekly_volume_km = weekly_volume(&in_range, reference_date, self.volume_lookback_days);
        let intensity = self.intensity.summarize(&in_range);
        let charge_recovery = self
            .charge_recovery
            .windows
            .iter()
            .map(|&days| charge_recovery(timeline, days, &self.charge_recovery))
            .collect();
        let anaerobic = self.anaerobic.analyze(&streams);

        debug!(
            weekly_volume_km,
            excluded_after_reference = excluded.len(),
            intensity_samples = intensity.samples.len(),
            anaerobic_samples = anaerobic.samples.len(),
            "Secondary metrics computed"
        );

        SecondaryMetrics {
            weekly_volume_km,
            intensity,
            charge_recovery,
            anaerobic,
        }
    }
}
