// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Intensity factor per activity and its duration-weighted aggregate

use super::round_to;
use super::stress::StressEstimator;
use crate::config::EngineConfig;
use crate::models::{ActivityRecord, SportType};
use serde::{Deserialize, Serialize};

/// Signal an intensity factor was derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntensitySource {
    /// Average power over threshold power
    Power,
    /// Average heart rate over max heart rate
    HeartRate,
    /// Back-solved from the stress estimate
    Estimated,
}

/// Qualitative level of the aggregate intensity factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntensityLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl IntensityLevel {
    pub fn from_factor(intensity_factor: f64) -> Self {
        match intensity_factor {
            f if f >= 0.9 => Self::VeryHigh,
            f if f >= 0.75 => Self::High,
            f if f >= 0.6 => Self::Moderate,
            _ => Self::Low,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::VeryHigh => "very high",
        }
    }
}

/// Intensity of one qualifying activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntensitySample {
    pub activity_id: String,
    pub name: String,
    pub sport_type: SportType,
    /// Moving duration in hours, two decimals
    pub duration_hours: f64,
    /// Three decimals, clamped to `[0, max_intensity_factor]`
    pub intensity_factor: f64,
    /// Intensity factor as a percentage, one decimal
    pub percent_of_threshold: f64,
    pub source: IntensitySource,
}

/// Duration-weighted intensity over all qualifying activities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntensitySummary {
    /// `None` when no activity qualified
    pub average_if: Option<f64>,
    pub average_percent: Option<f64>,
    pub level: Option<IntensityLevel>,
    pub total_hours: f64,
    pub samples: Vec<IntensitySample>,
}

/// Derives intensity factors with a power, heart rate, estimate priority
#[derive(Debug, Clone, PartialEq)]
pub struct IntensityCalculator {
    max_heart_rate: f64,
    threshold_power: Option<f64>,
    estimator: StressEstimator,
    degenerate_intensity_factor: f64,
    max_intensity_factor: f64,
    min_moving_seconds: u64,
}

impl IntensityCalculator {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            max_heart_rate: config.max_heart_rate,
            threshold_power: config.threshold_power,
            estimator: StressEstimator::from_config(config),
            degenerate_intensity_factor: config.degenerate_intensity_factor,
            max_intensity_factor: config.max_intensity_factor,
            min_moving_seconds: config.min_moving_seconds,
        }
    }

    /// Intensity factor and its source, unclamped
    fn raw_factor(&self, activity: &ActivityRecord, moving_seconds: u64) -> (f64, IntensitySource) {
        let power = activity.average_power.filter(|p| p.is_finite() && *p > 0.0);
        if let (Some(watts), Some(ftp)) = (power, self.threshold_power) {
            if ftp > 0.0 {
                return (watts / ftp, IntensitySource::Power);
            }
        }

        if let Some(hr) = activity.average_heart_rate.filter(|hr| hr.is_finite() && *hr > 0.0) {
            return (hr / self.max_heart_rate, IntensitySource::HeartRate);
        }

        let duration_minutes = moving_seconds as f64 / 60.0;
        let stress = self.estimator.estimate(duration_minutes, None);
        let squared = if duration_minutes > 0.0 {
            stress / duration_minutes
        } else {
            0.0
        };
        let factor = if squared.is_finite() && squared > 0.0 {
            squared.sqrt()
        } else {
            self.degenerate_intensity_factor
        };
        (factor, IntensitySource::Estimated)
    }

    /// Clamped factor, moving hours and source; `None` when too short to count
    fn measure(&self, activity: &ActivityRecord) -> Option<(f64, f64, IntensitySource)> {
        let moving_seconds = activity.effective_moving_seconds();
        if moving_seconds == 0 || moving_seconds < self.min_moving_seconds {
            return None;
        }

        let (raw, source) = self.raw_factor(activity, moving_seconds);
        let factor = raw.max(0.0).min(self.max_intensity_factor);
        Some((factor, moving_seconds as f64 / 3600.0, source))
    }

    /// Intensity of one activity; `None` when it is too short to count
    pub fn sample(&self, activity: &ActivityRecord) -> Option<IntensitySample> {
        let (factor, hours, source) = self.measure(activity)?;

        Some(IntensitySample {
            activity_id: activity.id.clone(),
            name: activity.name.clone(),
            sport_type: activity.sport_type.clone(),
            duration_hours: round_to(hours, 2),
            intensity_factor: round_to(factor, 3),
            percent_of_threshold: round_to(factor * 100.0, 1),
            source,
        })
    }

    /// Duration-weighted mean intensity factor
    pub fn summarize(&self, activities: &[ActivityRecord]) -> IntensitySummary {
        let mut weighted_sum = 0.0;
        let mut weight_sum = 0.0;
        let mut samples = Vec::new();

        for activity in activities {
            let Some((factor, hours, _)) = self.measure(activity) else {
                continue;
            };
            weighted_sum += factor * hours;
            weight_sum += hours;
            if let Some(sample) = self.sample(activity) {
                samples.push(sample);
            }
        }

        let average = (weight_sum > 0.0).then(|| weighted_sum / weight_sum);

        IntensitySummary {
            average_if: average.map(|f| round_to(f, 3)),
            average_percent: average.map(|f| round_to(f * 100.0, 1)),
            level: average.map(IntensityLevel::from_factor),
            total_hours: round_to(weight_sum, 2),
            samples,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::local_timestamp;

    fn activity(id: &str, seconds: u64) -> ActivityRecord {
        ActivityRecord {
            id: id.to_string(),
            name: format!("Session {id}"),
            sport_type: SportType::Ride,
            start_date_local: local_timestamp::parse("2024-03-03T10:00:00").unwrap(),
            duration_seconds: seconds,
            moving_time_seconds: None,
            distance_meters: None,
            elevation_gain: None,
            average_heart_rate: None,
            average_power: None,
            suffer_score: None,
        }
    }

    fn calculator(threshold_power: Option<f64>) -> IntensityCalculator {
        IntensityCalculator::from_config(&EngineConfig {
            max_heart_rate: 200.0,
            threshold_power,
            ..EngineConfig::default()
        })
    }

    #[test]
    fn test_power_takes_priority() {
        let mut ride = activity("1", 3600);
        ride.average_power = Some(200.0);
        ride.average_heart_rate = Some(150.0);

        let sample = calculator(Some(250.0)).sample(&ride).unwrap();
        assert_eq!(sample.source, IntensitySource::Power);
        assert_eq!(sample.intensity_factor, 0.8);
        assert_eq!(sample.percent_of_threshold, 80.0);

        let sample = calculator(None).sample(&ride).unwrap();
        assert_eq!(sample.source, IntensitySource::HeartRate);
        assert_eq!(sample.intensity_factor, 0.75);
    }

    #[test]
    fn test_estimated_fallback() {
        let sample = calculator(None).sample(&activity("1", 1800)).unwrap();
        assert_eq!(sample.source, IntensitySource::Estimated);
        assert_eq!(sample.intensity_factor, 0.7);
    }

    #[test]
    fn test_clamped_to_bounds() {
        let mut sprint = activity("1", 600);
        sprint.average_heart_rate = Some(900.0);
        let sample = calculator(None).sample(&sprint).unwrap();
        assert_eq!(sample.intensity_factor, 2.5);

        let mut surge = activity("2", 600);
        surge.average_power = Some(5000.0);
        let sample = calculator(Some(100.0)).sample(&surge).unwrap();
        assert_eq!(sample.intensity_factor, 2.5);
    }

    #[test]
    fn test_short_activities_excluded() {
        let calc = calculator(None);
        assert!(calc.sample(&activity("1", 29)).is_none());
        assert!(calc.sample(&activity("2", 0)).is_none());
        assert!(calc.sample(&activity("3", 30)).is_some());

        let mut moving_short = activity("4", 3600);
        moving_short.moving_time_seconds = Some(10);
        assert!(calc.sample(&moving_short).is_none());
    }

    #[test]
    fn test_duration_weighted_average() {
        let mut easy = activity("easy", 3 * 3600);
        easy.average_heart_rate = Some(120.0); // 0.6
        let mut hard = activity("hard", 3600);
        hard.average_heart_rate = Some(180.0); // 0.9

        let summary = calculator(None).summarize(&[easy, hard, activity("blip", 5)]);

        assert_eq!(summary.samples.len(), 2);
        assert_eq!(summary.average_if, Some(0.675));
        assert_eq!(summary.average_percent, Some(67.5));
        assert_eq!(summary.level, Some(IntensityLevel::Moderate));
        assert_eq!(summary.total_hours, 4.0);
    }

    #[test]
    fn test_no_qualifying_activity_is_absent() {
        let summary = calculator(None).summarize(&[activity("blip", 10)]);
        assert!(summary.average_if.is_none());
        assert!(summary.level.is_none());
        assert!(summary.samples.is_empty());
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(IntensityLevel::from_factor(0.9), IntensityLevel::VeryHigh);
        assert_eq!(IntensityLevel::from_factor(0.75), IntensityLevel::High);
        assert_eq!(IntensityLevel::from_factor(0.6), IntensityLevel::Moderate);
        assert_eq!(IntensityLevel::from_factor(0.59), IntensityLevel::Low);
    }
}
