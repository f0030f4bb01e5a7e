// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Share of time spent in heart-rate zones 4 and 5

use super::round_to;
use crate::config::EngineConfig;
use crate::models::{HeartRateStream, RecentStreams};
use serde::{Deserialize, Serialize};

/// High-intensity share of one activity, percentages with one decimal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnaerobicSample {
    pub activity_id: String,
    pub activity_name: String,
    pub zone4_percent: f64,
    pub zone5_percent: f64,
    /// Zone 4 and zone 5 combined
    pub percent: f64,
    pub sample_count: usize,
}

/// Per-activity shares and their plain mean
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnaerobicShare {
    pub samples: Vec<AnaerobicSample>,
    /// `None` when no activity had usable samples
    pub average_percent: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnaerobicAnalyzer {
    activity_limit: usize,
    zone4_floor: f64,
    zone5_floor: f64,
}

impl AnaerobicAnalyzer {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            activity_limit: config.anaerobic.activity_limit,
            zone4_floor: config.max_heart_rate * config.anaerobic.zone4_fraction,
            zone5_floor: config.max_heart_rate * config.anaerobic.zone5_fraction,
        }
    }

    /// Zone share of a single stream; `None` when it holds no finite sample
    pub fn sample(&self, stream: &HeartRateStream) -> Option<AnaerobicSample> {
        let readings: Vec<f64> = stream
            .samples
            .iter()
            .copied()
            .filter(|bpm| bpm.is_finite())
            .collect();
        if readings.is_empty() {
            return None;
        }

        let zone5 = readings.iter().filter(|&&bpm| bpm >= self.zone5_floor).count();
        let zone4 = readings
            .iter()
            .filter(|&&bpm| bpm >= self.zone4_floor && bpm < self.zone5_floor)
            .count();
        let total = readings.len() as f64;

        Some(AnaerobicSample {
            activity_id: stream.activity_id.clone(),
            activity_name: stream.activity_name.clone(),
            zone4_percent: round_to(zone4 as f64 / total * 100.0, 1),
            zone5_percent: round_to(zone5 as f64 / total * 100.0, 1),
            percent: round_to((zone4 + zone5) as f64 / total * 100.0, 1),
            sample_count: readings.len(),
        })
    }

    /// Analyze up to the activity limit of the given streams, in order
    pub fn analyze(&self, streams: &RecentStreams) -> AnaerobicShare {
        let samples: Vec<AnaerobicSample> = streams
            .iter()
            .filter_map(|stream| self.sample(stream))
            .take(self.activity_limit)
            .collect();

        let average_percent = (!samples.is_empty()).then(|| {
            let sum: f64 = samples.iter().map(|s| s.percent).sum();
            round_to(sum / samples.len() as f64, 1)
        });

        AnaerobicShare {
            samples,
            average_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(id: &str, samples: Vec<f64>) -> HeartRateStream {
        HeartRateStream {
            activity_id: id.to_string(),
            activity_name: format!("Ride {id}"),
            samples,
        }
    }

    fn analyzer() -> AnaerobicAnalyzer {
        AnaerobicAnalyzer::from_config(&EngineConfig {
            max_heart_rate: 200.0,
            ..EngineConfig::default()
        })
    }

    #[test]
    fn test_zone_split() {
        // floors: zone 4 at 160, zone 5 at 180
        let sample = analyzer()
            .sample(&stream("1", vec![120.0, 159.9, 160.0, 170.0, 180.0, 195.0, 140.0, 150.0]))
            .unwrap();

        assert_eq!(sample.zone4_percent, 25.0);
        assert_eq!(sample.zone5_percent, 25.0);
        assert_eq!(sample.percent, 50.0);
        assert_eq!(sample.sample_count, 8);
    }

    #[test]
    fn test_no_streams_is_absent() {
        let share = analyzer().analyze(&RecentStreams::new());
        assert!(share.samples.is_empty());
        assert_eq!(share.average_percent, None);

        let empty_only: RecentStreams = vec![stream("1", vec![])].into_iter().collect();
        assert_eq!(analyzer().analyze(&empty_only).average_percent, None);
    }

    #[test]
    fn test_average_of_three_most_recent() {
        let streams: RecentStreams = vec![
            stream("newest", vec![190.0, 100.0]),
            stream("gap", vec![]),
            stream("middle", vec![100.0, 100.0, 100.0, 100.0]),
            stream("older", vec![170.0, 170.0, 170.0, 100.0]),
            stream("oldest", vec![200.0; 10]),
        ]
        .into_iter()
        .collect();

        let share = analyzer().analyze(&streams);

        let ids: Vec<&str> = share.samples.iter().map(|s| s.activity_id.as_str()).collect();
        assert_eq!(ids, vec!["newest", "middle", "older"]);
        // (50 + 0 + 75) / 3
        assert_eq!(share.average_percent, Some(41.7));
    }
}
