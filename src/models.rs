// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Data Models
//!
//! Input records handed to the training load engine by the fetch layer.
//!
//! ## Core Models
//!
//! - [`ActivityRecord`]: A single normalized workout
//! - [`SportType`]: Provider activity type
//! - [`Discipline`]: Sport family filter applied before analysis
//! - [`Goal`]: Target event driving the week plan
//! - [`HeartRateStream`] / [`RecentStreams`]: Per-sample heart rate for recent activities

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single workout as normalized by the fetch layer
///
/// # Examples
///
/// ```rust
/// use trail_coach::models::{ActivityRecord, SportType};
/// use chrono::NaiveDate;
///
/// let activity = ActivityRecord {
///     id: "12345".to_string(),
///     name: "Morning Run".to_string(),
///     sport_type: SportType::Run,
///     start_date_local: NaiveDate::from_ymd_opt(2024, 3, 1)
///         .unwrap()
///         .and_hms_opt(7, 30, 0)
///         .unwrap(),
///     duration_seconds: 3600,
///     moving_time_seconds: Some(3500),
///     distance_meters: Some(10_000.0),
///     elevation_gain: Some(120.0),
///     average_heart_rate: Some(150.0),
///     average_power: None,
///     suffer_score: Some(72.0),
/// };
/// assert_eq!(activity.calendar_date(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Provider-specific identifier
    pub id: String,
    /// Human-readable title
    #[serde(default)]
    pub name: String,
    /// Activity type as reported by the provider
    #[serde(rename = "type", alias = "sport_type")]
    pub sport_type: SportType,
    /// Local start timestamp, kept exactly as the source encodes it
    #[serde(with = "local_timestamp", alias = "date")]
    pub start_date_local: NaiveDateTime,
    /// Elapsed duration in seconds
    #[serde(alias = "elapsed_time")]
    pub duration_seconds: u64,
    /// Moving duration in seconds
    #[serde(default, alias = "moving_time")]
    pub moving_time_seconds: Option<u64>,
    /// Distance in meters
    #[serde(default, alias = "distance")]
    pub distance_meters: Option<f64>,
    /// Elevation gain in meters
    #[serde(default, alias = "total_elevation_gain")]
    pub elevation_gain: Option<f64>,
    /// Average heart rate (bpm)
    #[serde(default, alias = "average_heartrate")]
    pub average_heart_rate: Option<f64>,
    /// Average power (watts)
    #[serde(default, alias = "average_watts")]
    pub average_power: Option<f64>,
    /// Provider relative effort score
    #[serde(default)]
    pub suffer_score: Option<f64>,
}

impl ActivityRecord {
    /// Calendar day of the activity (time of day truncated)
    pub fn calendar_date(&self) -> NaiveDate {
        self.start_date_local.date()
    }

    /// Elapsed duration in minutes
    pub fn duration_minutes(&self) -> f64 {
        self.duration_seconds as f64 / 60.0
    }

    /// Moving time, falling back to elapsed duration
    pub fn effective_moving_seconds(&self) -> u64 {
        self.moving_time_seconds.unwrap_or(self.duration_seconds)
    }

    /// Distance in kilometers, zero when unknown
    pub fn distance_km(&self) -> f64 {
        self.distance_meters.unwrap_or(0.0) / 1000.0
    }
}

/// Activity types the engine distinguishes
///
/// Provider names map onto the known variants; anything else is kept verbatim
/// in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SportType {
    Ride,
    EBikeRide,
    MountainBikeRide,
    GravelRide,
    VirtualRide,
    Run,
    TrailRun,
    VirtualRun,
    Hike,
    Walk,
    Swim,
    Workout,
    /// Any provider type not mapped above
    Other(String),
}

impl SportType {
    /// Map a provider activity type string
    pub fn from_provider_string(provider_sport: &str) -> Self {
        match provider_sport {
            "Ride" => Self::Ride,
            "EBikeRide" => Self::EBikeRide,
            "MountainBikeRide" => Self::MountainBikeRide,
            "GravelRide" => Self::GravelRide,
            "VirtualRide" => Self::VirtualRide,
            "Run" => Self::Run,
            "TrailRun" => Self::TrailRun,
            "VirtualRun" => Self::VirtualRun,
            "Hike" => Self::Hike,
            "Walk" => Self::Walk,
            "Swim" => Self::Swim,
            "Workout" => Self::Workout,
            other => Self::Other(other.to_string()),
        }
    }

    /// Provider spelling of this type
    pub fn provider_name(&self) -> &str {
        match self {
            Self::Ride => "Ride",
            Self::EBikeRide => "EBikeRide",
            Self::MountainBikeRide => "MountainBikeRide",
            Self::GravelRide => "GravelRide",
            Self::VirtualRide => "VirtualRide",
            Self::Run => "Run",
            Self::TrailRun => "TrailRun",
            Self::VirtualRun => "VirtualRun",
            Self::Hike => "Hike",
            Self::Walk => "Walk",
            Self::Swim => "Swim",
            Self::Workout => "Workout",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for SportType {
    fn from(value: String) -> Self {
        Self::from_provider_string(&value)
    }
}

impl From<SportType> for String {
    fn from(value: SportType) -> Self {
        value.provider_name().to_string()
    }
}

impl fmt::Display for SportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.provider_name())
    }
}

/// Sport family selected for analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Discipline {
    /// Cycling activities
    Bike,
    /// Running and hiking activities
    Foot,
    /// No filtering
    #[default]
    All,
}

impl Discipline {
    /// Whether an activity type belongs to this discipline
    pub fn includes(&self, sport_type: &SportType) -> bool {
        match self {
            Self::All => true,
            Self::Bike => matches!(
                sport_type,
                SportType::Ride
                    | SportType::EBikeRide
                    | SportType::MountainBikeRide
                    | SportType::GravelRide
                    | SportType::VirtualRide
            ),
            Self::Foot => matches!(
                sport_type,
                SportType::Run | SportType::TrailRun | SportType::Hike
            ),
        }
    }

    /// Keep only the activities of this discipline
    pub fn filter(&self, activities: &[ActivityRecord]) -> Vec<ActivityRecord> {
        activities
            .iter()
            .filter(|a| self.includes(&a.sport_type))
            .cloned()
            .collect()
    }
}

impl FromStr for Discipline {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bike" => Ok(Self::Bike),
            "foot" => Ok(Self::Foot),
            "all" => Ok(Self::All),
            other => Err(format!("Unknown discipline: {other}. Expected bike, foot or all")),
        }
    }
}

/// Training emphasis requested for a goal
///
/// Unknown tags read as [`GoalFocus::Mixed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalFocus {
    Technique,
    #[serde(alias = "explosif")]
    Explosive,
    #[serde(alias = "endurant")]
    Endurance,
    #[serde(alias = "résistance")]
    Resistance,
    #[default]
    #[serde(alias = "polyvalent", other)]
    Mixed,
}

/// Discipline the goal event is contested in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisciplineType {
    /// Trail running
    Foot,
    /// Mountain biking
    #[default]
    Bike,
}

impl DisciplineType {
    /// Session type label shown in the plan
    pub fn session_label(&self) -> &'static str {
        match self {
            Self::Foot => "Trail",
            Self::Bike => "MTB",
        }
    }
}

/// A target event the plan builds toward
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub title: String,
    #[serde(alias = "date")]
    pub target_date: NaiveDate,
    #[serde(default)]
    pub focus: GoalFocus,
    #[serde(default, rename = "type", alias = "discipline")]
    pub discipline: DisciplineType,
}

/// Heart-rate samples recorded during one activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartRateStream {
    pub activity_id: String,
    pub activity_name: String,
    /// Beats per minute, in recording order
    pub samples: Vec<f64>,
}

/// Heart-rate streams of the most recent activities, most recent first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentStreams {
    streams: Vec<HeartRateStream>,
}

impl RecentStreams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stream older than every stream already held
    pub fn push(&mut self, stream: HeartRateStream) {
        self.streams.push(stream);
    }

    pub fn iter(&self) -> impl Iterator<Item = &HeartRateStream> {
        self.streams.iter()
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }
}

impl FromIterator<HeartRateStream> for RecentStreams {
    fn from_iter<I: IntoIterator<Item = HeartRateStream>>(iter: I) -> Self {
        Self {
            streams: iter.into_iter().collect(),
        }
    }
}

/// Serde adapter for local timestamps
///
/// Accepts RFC 3339 (offset ignored, the wall-clock time is kept),
/// `YYYY-MM-DDTHH:MM:SS` and bare `YYYY-MM-DD`.
pub mod local_timestamp {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    /// Parse a timestamp string in any accepted shape
    pub fn parse(value: &str) -> Option<NaiveDateTime> {
        if let Ok(with_offset) = DateTime::parse_from_rfc3339(value) {
            return Some(with_offset.naive_local());
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, FORMAT) {
            return Some(naive);
        }
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    }

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}")))
    }
}
