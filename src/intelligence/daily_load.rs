// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Sparse per-day stress buckets

use super::stress::StressEstimator;
use crate::models::ActivityRecord;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Total stress per calendar day; days without activity are absent
pub type StressByDate = BTreeMap<NaiveDate, f64>;

/// Sum each activity's estimated stress into its calendar day
pub fn aggregate(activities: &[ActivityRecord], estimator: &StressEstimator) -> StressByDate {
    let mut by_date = StressByDate::new();

    for activity in activities {
        let stress = estimator.estimate(activity.duration_minutes(), activity.average_heart_rate);
        *by_date.entry(activity.calendar_date()).or_insert(0.0) += stress;
    }

    by_date
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SportType;

    fn activity(id: &str, timestamp: &str, minutes: u64, hr: Option<f64>) -> ActivityRecord {
        ActivityRecord {
            id: id.to_string(),
            name: format!("Activity {id}"),
            sport_type: SportType::Ride,
            start_date_local: crate::models::local_timestamp::parse(timestamp).unwrap(),
            duration_seconds: minutes * 60,
            moving_time_seconds: None,
            distance_meters: None,
            elevation_gain: None,
            average_heart_rate: hr,
            average_power: None,
            suffer_score: None,
        }
    }

    #[test]
    fn test_same_day_accumulates() {
        let estimator = StressEstimator::new(200.0);
        let activities = vec![
            activity("1", "2024-02-10T07:00:00", 60, Some(150.0)),
            activity("2", "2024-02-10T18:30:00", 30, None),
            activity("3", "2024-02-12T09:00:00", 45, Some(100.0)),
        ];

        let map = aggregate(&activities, &estimator);

        assert_eq!(map.len(), 2);
        let feb10 = map[&NaiveDate::from_ymd_opt(2024, 2, 10).unwrap()];
        assert!((feb10 - (33.75 + 30.0 * 0.49)).abs() < 1e-9);
        let feb12 = map[&NaiveDate::from_ymd_opt(2024, 2, 12).unwrap()];
        assert!((feb12 - 11.25).abs() < 1e-9);
        assert!(!map.contains_key(&NaiveDate::from_ymd_opt(2024, 2, 11).unwrap()));
    }

    #[test]
    fn test_zero_duration_day_kept_at_zero() {
        let estimator = StressEstimator::default();
        let map = aggregate(&[activity("1", "2024-02-10", 0, Some(150.0))], &estimator);
        assert_eq!(map.values().copied().collect::<Vec<_>>(), vec![0.0]);
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate(&[], &StressEstimator::default()).is_empty());
    }
}
