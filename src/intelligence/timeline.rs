// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Dense daily load timeline with chronic load, acute load and stress balance
//!
//! Rolling values use trailing windows clamped at the start of the timeline:
//! early entries average over fewer days rather than padding with zeros.

use super::daily_load::StressByDate;
use super::round_to;
use crate::config::EngineConfig;
use crate::constants::load;
use crate::errors::EngineError;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// One calendar day of the timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLoadPoint {
    pub date: NaiveDate,
    /// Total stress of the day, full precision
    pub tss: f64,
    /// Chronic load, one decimal
    pub ctl: f64,
    /// Acute load, one decimal
    pub atl: f64,
    /// Stress balance, one decimal
    ///
    /// Taken from the already rounded `ctl` and `atl`, so `tsb == ctl - atl` holds
    /// exactly as printed. Rounding the full-precision difference instead can move
    /// the value by 0.1 near a freshness threshold.
    pub tsb: f64,
}

/// Contiguous, oldest-first sequence of daily load points
///
/// Always holds exactly the horizon it was built with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timeline {
    points: Vec<DailyLoadPoint>,
}

impl Timeline {
    pub fn points(&self) -> &[DailyLoadPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Most recent day
    pub fn latest(&self) -> Option<&DailyLoadPoint> {
        self.points.last()
    }

    /// The last `days` entries, or the whole timeline when shorter
    pub fn tail(&self, days: usize) -> &[DailyLoadPoint] {
        let start = self.points.len().saturating_sub(days);
        &self.points[start..]
    }

    /// Sum of daily stress over the last `days` entries
    pub fn stress_sum(&self, days: usize) -> f64 {
        self.tail(days).iter().map(|p| p.tss).sum()
    }

    /// Mean stress balance over the last `days` entries
    pub fn average_tsb(&self, days: usize) -> Option<f64> {
        let tail = self.tail(days);
        if tail.is_empty() {
            return None;
        }
        Some(tail.iter().map(|p| p.tsb).sum::<f64>() / tail.len() as f64)
    }

    /// Last day covered by the timeline
    pub fn reference_date(&self) -> Option<NaiveDate> {
        self.latest().map(|p| p.date)
    }
}

/// Expands sparse per-day stress into a [`Timeline`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineBuilder {
    horizon_days: usize,
    chronic_days: usize,
    acute_days: usize,
}

impl Default for TimelineBuilder {
    fn default() -> Self {
        Self::new(load::DEFAULT_HORIZON_DAYS)
    }
}

impl TimelineBuilder {
    /// Builder with the standard 42/7 day windows
    pub const fn new(horizon_days: usize) -> Self {
        Self {
            horizon_days,
            chronic_days: load::CHRONIC_WINDOW_DAYS,
            acute_days: load::ACUTE_WINDOW_DAYS,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            horizon_days: config.horizon_days,
            chronic_days: config.windows.chronic_days,
            acute_days: config.windows.acute_days,
        }
    }

    /// Build the timeline ending at `reference_date` inclusive
    pub fn build(
        &self,
        stress_by_date: &StressByDate,
        reference_date: NaiveDate,
    ) -> Result<Timeline, EngineError> {
        if self.horizon_days < 1 {
            return Err(EngineError::invalid_config("horizon_days must be at least 1"));
        }
        if self.chronic_days < 1 || self.acute_days < 1 {
            return Err(EngineError::invalid_config("load windows must be at least 1 day"));
        }

        let start = reference_date
            .checked_sub_days(Days::new(self.horizon_days as u64 - 1))
            .ok_or_else(|| {
                EngineError::invalid_config(format!(
                    "reference date {reference_date} leaves no room for a {} day horizon",
                    self.horizon_days
                ))
            })?;

        let daily: Vec<(NaiveDate, f64)> = start
            .iter_days()
            .take(self.horizon_days)
            .map(|date| (date, stress_by_date.get(&date).copied().unwrap_or(0.0)))
            .collect();

        let mut prefix = Vec::with_capacity(daily.len() + 1);
        prefix.push(0.0);
        for (_, tss) in &daily {
            let running = prefix[prefix.len() - 1] + tss;
            prefix.push(running);
        }

        let trailing_mean = |i: usize, window: usize| {
            let lo = (i + 1).saturating_sub(window);
            (prefix[i + 1] - prefix[lo]) / (i + 1 - lo) as f64
        };

        let points = daily
            .iter()
            .enumerate()
            .map(|(i, &(date, tss))| {
                let ctl = round_to(trailing_mean(i, self.chronic_days), 1);
                let atl = round_to(trailing_mean(i, self.acute_days), 1);
                DailyLoadPoint {
                    date,
                    tss,
                    ctl,
                    atl,
                    tsb: round_to(ctl - atl, 1),
                }
            })
            .collect();

        Ok(Timeline { points })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_length_matches_horizon() {
        let reference = date(2024, 6, 30);
        for horizon in [1, 7, 42, 180, 365] {
            let timeline = TimelineBuilder::new(horizon)
                .build(&StressByDate::new(), reference)
                .unwrap();
            assert_eq!(timeline.len(), horizon);
            assert_eq!(timeline.reference_date(), Some(reference));
        }

        let mut dense = StressByDate::new();
        for offset in 0..400 {
            dense.insert(reference - Days::new(offset), 10.0);
        }
        let timeline = TimelineBuilder::new(30).build(&dense, reference).unwrap();
        assert_eq!(timeline.len(), 30);
    }

    #[test]
    fn test_dates_contiguous_oldest_first() {
        let timeline = TimelineBuilder::new(60)
            .build(&StressByDate::new(), date(2024, 3, 1))
            .unwrap();
        for pair in timeline.points().windows(2) {
            assert_eq!(pair[0].date.succ_opt(), Some(pair[1].date));
        }
        assert_eq!(timeline.points()[0].date, date(2024, 1, 2));
    }

    #[test]
    fn test_window_boundaries() {
        let reference = date(2024, 4, 30);
        let builder = TimelineBuilder::new(60);
        let start = reference - Days::new(59);

        // tss = i + 1 on day i, so a trailing mean has a closed form
        let stress: StressByDate = (0..60u64)
            .map(|i| (start + Days::new(i), (i + 1) as f64))
            .collect();
        let timeline = builder.build(&stress, reference).unwrap();
        let points = timeline.points();

        // i = 0: one-day window
        assert_eq!(points[0].ctl, 1.0);
        assert_eq!(points[0].atl, 1.0);
        // i = 41: full 42-day window = mean(1..=42)
        assert_eq!(points[41].ctl, 21.5);
        // i = 42: window slides to 2..=43
        assert_eq!(points[42].ctl, 22.5);
        // i = 6: full 7-day acute window = mean(1..=7)
        assert_eq!(points[6].atl, 4.0);
        // i = 10: acute window 5..=11
        assert_eq!(points[10].atl, 8.0);
        // i = 3: partial chronic window = mean(1..=4)
        assert_eq!(points[3].ctl, 2.5);
    }

    #[test]
    fn test_tsb_is_ctl_minus_atl() {
        let reference = date(2024, 9, 1);
        let stress: StressByDate = [(0u64, 87.3), (3, 12.9), (4, 140.1), (20, 33.3), (41, 61.7)]
            .into_iter()
            .map(|(offset, tss)| (reference - Days::new(offset), tss))
            .collect();

        let timeline = TimelineBuilder::new(90).build(&stress, reference).unwrap();
        for point in timeline.points() {
            assert!((point.tsb - (point.ctl - point.atl)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_tsb_uses_rounded_loads() {
        let reference = date(2024, 9, 8);
        let stress: StressByDate = [(reference - Days::new(7), 0.7), (reference, 0.42)]
            .into_iter()
            .collect();

        // ctl 0.14 and atl 0.06 at full precision, difference 0.08
        let timeline = TimelineBuilder::new(8).build(&stress, reference).unwrap();
        let latest = timeline.latest().unwrap();
        assert_eq!((latest.ctl, latest.atl), (0.1, 0.1));
        assert_eq!(latest.tsb, 0.0);
    }

    #[test]
    fn test_single_populated_day_at_start() {
        let stress: StressByDate = [(date(2024, 1, 1), 80.0)].into_iter().collect();
        let timeline = TimelineBuilder::new(10)
            .build(&stress, date(2024, 1, 10))
            .unwrap();

        let points = timeline.points();
        assert_eq!(points.len(), 10);
        assert_eq!(points[0].date, date(2024, 1, 1));
        assert_eq!(points.iter().filter(|p| p.tss == 0.0).count(), 9);
        assert_eq!(points[0].tsb, 0.0);
        assert_eq!(points[9].ctl, 8.0);
        assert_eq!(points[9].atl, 0.0);
    }

    #[test]
    fn test_populated_day_before_horizon_excluded() {
        let stress: StressByDate = [(date(2024, 1, 1), 80.0)].into_iter().collect();
        let timeline = TimelineBuilder::new(10)
            .build(&stress, date(2024, 1, 11))
            .unwrap();

        let first = &timeline.points()[0];
        assert_eq!(first.date, date(2024, 1, 2));
        assert_eq!((first.tss, first.ctl, first.atl, first.tsb), (0.0, 0.0, 0.0, 0.0));
        assert!(timeline.points().iter().all(|p| p.tss == 0.0));
    }

    #[test]
    fn test_zero_horizon_rejected() {
        let result = TimelineBuilder::new(0).build(&StressByDate::new(), date(2024, 1, 1));
        assert!(matches!(result, Err(EngineError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_unrepresentable_reference_rejected() {
        let result = TimelineBuilder::new(10).build(&StressByDate::new(), NaiveDate::MIN);
        assert!(matches!(result, Err(EngineError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_tail_helpers() {
        let reference = date(2024, 5, 20);
        let stress: StressByDate = (0..20u64)
            .map(|offset| (reference - Days::new(offset), 10.0))
            .collect();
        let timeline = TimelineBuilder::new(30).build(&stress, reference).unwrap();

        assert_eq!(timeline.tail(7).len(), 7);
        assert_eq!(timeline.tail(100).len(), 30);
        assert!((timeline.stress_sum(7) - 70.0).abs() < 1e-9);
        assert!((timeline.stress_sum(14) - 140.0).abs() < 1e-9);
        assert!(timeline.average_tsb(7).is_some());
    }
}
