// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Local JSON cache of activities, goal and heart-rate streams

use async_trait::async_trait;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use crate::config::DataPaths;
use crate::models::{ActivityRecord, Goal};
use super::HeartRateStreamSource;

/// Reads the engine inputs from the cache directory
#[derive(Debug, Clone)]
pub struct LocalCache {
    activities: PathBuf,
    goal: PathBuf,
}

impl LocalCache {
    pub fn new(paths: &DataPaths) -> Self {
        Self {
            activities: paths.activities.clone(),
            goal: paths.goal.clone(),
        }
    }

    pub fn load_activities(&self) -> Result<Vec<ActivityRecord>> {
        let content = fs::read_to_string(&self.activities).with_context(|| {
            format!("Failed to read activities file: {}", self.activities.display())
        })?;
        let activities: Vec<ActivityRecord> = serde_json::from_str(&content).with_context(|| {
            format!("Failed to parse activities file: {}", self.activities.display())
        })?;

        info!("Loaded {} activities from {}", activities.len(), self.activities.display());
        Ok(activities)
    }

    /// The goal, or `None` when no goal file exists
    pub fn load_goal(&self) -> Result<Option<Goal>> {
        if !self.goal.exists() {
            debug!("No goal file at {}", self.goal.display());
            return Ok(None);
        }

        let content = fs::read_to_string(&self.goal)
            .with_context(|| format!("Failed to read goal file: {}", self.goal.display()))?;
        let goal = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse goal file: {}", self.goal.display()))?;
        Ok(Some(goal))
    }
}

/// Bare sample arrays or the provider stream object shape
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredStream {
    Samples(Vec<f64>),
    Provider { heartrate: StreamData },
}

#[derive(Debug, Deserialize)]
struct StreamData {
    data: Vec<f64>,
}

impl From<StoredStream> for Vec<f64> {
    fn from(stream: StoredStream) -> Self {
        match stream {
            StoredStream::Samples(samples) => samples,
            StoredStream::Provider { heartrate } => heartrate.data,
        }
    }
}

/// Heart-rate streams from a JSON object keyed by activity id
#[derive(Debug, Clone, Default)]
pub struct JsonStreamSource {
    streams: HashMap<String, Vec<f64>>,
}

impl JsonStreamSource {
    /// Load streams from `path`; a missing file yields an empty source
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No stream file at {}", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read stream file: {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse stream file: {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let stored: HashMap<String, StoredStream> = serde_json::from_str(content)?;
        let streams = stored
            .into_iter()
            .map(|(id, stream)| (id, Vec::from(stream)))
            .collect();
        Ok(Self { streams })
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }
}

#[async_trait]
impl HeartRateStreamSource for JsonStreamSource {
    async fn heart_rate_stream(&self, activity_id: &str) -> Result<Option<Vec<f64>>> {
        Ok(self.streams.get(activity_id).cloned())
    }

    fn source_name(&self) -> &'static str {
        "json_cache"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_both_stream_shapes() {
        let source = JsonStreamSource::from_json(
            r#"{"1": [150, 151.5], "2": {"heartrate": {"data": [170, 172]}}}"#,
        )
        .unwrap();

        assert_eq!(source.len(), 2);
        assert_eq!(source.heart_rate_stream("1").await.unwrap(), Some(vec![150.0, 151.5]));
        assert_eq!(source.heart_rate_stream("2").await.unwrap(), Some(vec![170.0, 172.0]));
        assert_eq!(source.heart_rate_stream("3").await.unwrap(), None);
    }

    #[test]
    fn test_missing_files() {
        let dir = TempDir::new().unwrap();
        let paths = DataPaths {
            activities: dir.path().join("activities.json"),
            goal: dir.path().join("goal.json"),
            streams: dir.path().join("streams.json"),
        };
        let cache = LocalCache::new(&paths);

        assert!(cache.load_goal().unwrap().is_none());
        let err = cache.load_activities().unwrap_err();
        assert!(format!("{err:#}").contains("Failed to read activities file"));
        assert!(JsonStreamSource::from_file(&paths.streams).unwrap().is_empty());
    }

    #[test]
    fn test_load_provider_shaped_activities() {
        let dir = TempDir::new().unwrap();
        let activities_path = dir.path().join("activities.json");
        fs::write(
            &activities_path,
            r#"[{"id": "42", "name": "Morning Ride", "type": "MountainBikeRide",
                 "start_date_local": "2024-05-02T07:30:00Z", "elapsed_time": 5400,
                 "moving_time": 5000, "distance": 32000.0, "total_elevation_gain": 800.0,
                 "average_heartrate": 142.0}]"#,
        )
        .unwrap();
        let goal_path = dir.path().join("goal.json");
        fs::write(
            &goal_path,
            r#"{"title": "Mountain marathon", "date": "2024-09-14",
                "focus": "endurance", "type": "foot"}"#,
        )
        .unwrap();

        let cache = LocalCache::new(&DataPaths {
            activities: activities_path,
            goal: goal_path,
            streams: dir.path().join("streams.json"),
        });

        let activities = cache.load_activities().unwrap();
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].duration_seconds, 5400);
        assert_eq!(activities[0].average_heart_rate, Some(142.0));

        let goal = cache.load_goal().unwrap().unwrap();
        assert_eq!(goal.title, "Mountain marathon");
        assert_eq!(goal.discipline, crate::models::DisciplineType::Foot);
    }
}
