// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::logging::AppLogger;
use crate::models::{ActivityRecord, HeartRateStream, RecentStreams};
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;

pub mod local;

pub use local::{JsonStreamSource, LocalCache};

/// Supplies per-sample heart rate for an activity
#[async_trait]
pub trait HeartRateStreamSource: Send + Sync {
    /// `Ok(None)` when the activity has no heart-rate stream
    async fn heart_rate_stream(&self, activity_id: &str) -> Result<Option<Vec<f64>>>;

    fn source_name(&self) -> &'static str;
}

/// Streams held in memory, keyed by activity id
#[derive(Debug, Clone, Default)]
pub struct InMemoryStreamSource {
    streams: HashMap<String, Vec<f64>>,
}

impl InMemoryStreamSource {
    pub fn new(streams: HashMap<String, Vec<f64>>) -> Self {
        Self { streams }
    }
}

#[async_trait]
impl HeartRateStreamSource for InMemoryStreamSource {
    async fn heart_rate_stream(&self, activity_id: &str) -> Result<Option<Vec<f64>>> {
        Ok(self.streams.get(activity_id).cloned())
    }

    fn source_name(&self) -> &'static str {
        "memory"
    }
}

/// Fetch heart-rate streams for the most recent activities, newest first
///
/// Only activities on or before `reference_date` are considered. Fetches run
/// one at a time and stop once `limit` non-empty streams are held.
/// A failed fetch is logged and treated as no data.
pub async fn collect_recent_streams(
    source: &dyn HeartRateStreamSource,
    activities: &[ActivityRecord],
    reference_date: NaiveDate,
    limit: usize,
) -> RecentStreams {
    let mut ordered: Vec<&ActivityRecord> = activities
        .iter()
        .filter(|a| a.calendar_date() <= reference_date)
        .collect();
    ordered.sort_by(|a, b| b.start_date_local.cmp(&a.start_date_local));

    let mut streams = RecentStreams::new();
    for activity in ordered {
        if streams.len() >= limit {
            break;
        }

        match source.heart_rate_stream(&activity.id).await {
            Ok(Some(samples)) if !samples.is_empty() => {
                let count = Some(samples.len());
                AppLogger::log_stream_fetch(source.source_name(), &activity.id, count);
                streams.push(HeartRateStream {
                    activity_id: activity.id.clone(),
                    activity_name: activity.name.clone(),
                    samples,
                });
            }
            Ok(_) => AppLogger::log_stream_fetch(source.source_name(), &activity.id, None),
            Err(e) => {
                let reason = format!("{e:#}");
                AppLogger::log_stream_failure(source.source_name(), &activity.id, &reason);
            }
        }
    }

    streams
}
