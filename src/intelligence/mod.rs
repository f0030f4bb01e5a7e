// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Intelligence Module
//!
//! Training load analytics over a normalized activity history.
//!
//! Data flows strictly forward, each stage producing a new value:
//! - Stress estimation per activity
//! - Daily aggregation into sparse per-day stress
//! - Dense timeline with chronic load, acute load and stress balance
//! - Trend classification and secondary metrics
//! - Week plan toward an optional goal

use crate::config::EngineConfig;
use crate::errors::EngineError;
use crate::logging::AppLogger;
use crate::models::{ActivityRecord, Goal, RecentStreams};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

pub mod anaerobic;
pub mod daily_load;
pub mod intensity;
pub mod metrics;
pub mod plan;
pub mod stress;
pub mod timeline;
pub mod trend;

pub use anaerobic::{AnaerobicAnalyzer, AnaerobicSample, AnaerobicShare};
pub use daily_load::StressByDate;
pub use intensity::{
    IntensityCalculator, IntensityLevel, IntensitySample, IntensitySource, IntensitySummary,
};
pub use metrics::{ChargeRecoverySample, MetricsSummary, SecondaryMetrics, SecondaryMetricsEngine};
pub use plan::{FatigueLabel, PlanGenerator, PlanPhase, SessionPlan, WeekPlan};
pub use stress::StressEstimator;
pub use timeline::{DailyLoadPoint, Timeline, TimelineBuilder};
pub use trend::{FreshnessState, LoadTrend, TrendAssessment, TrendClassifier};

/// Round to a fixed number of decimals, normalizing `-0.0` to `0.0`
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Everything one engine run produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineReport {
    pub reference_date: NaiveDate,
    pub timeline: Timeline,
    pub assessment: TrendAssessment,
    pub summary: MetricsSummary,
    pub secondary: SecondaryMetrics,
    /// Present when a goal was supplied
    pub plan: Option<Vec<WeekPlan>>,
}

/// Runs every analysis stage with one validated configuration
#[derive(Debug, Clone)]
pub struct TrainingLoadEngine {
    config: EngineConfig,
    estimator: StressEstimator,
    timeline_builder: TimelineBuilder,
    classifier: TrendClassifier,
    metrics: SecondaryMetricsEngine,
    planner: PlanGenerator,
}

impl TrainingLoadEngine {
    /// # Errors
    ///
    /// [`EngineError::InvalidConfiguration`] when the configuration fails validation.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;

        Ok(Self {
            estimator: StressEstimator::from_config(&config),
            timeline_builder: TimelineBuilder::from_config(&config),
            classifier: TrendClassifier::new(config.windows.trend_days),
            metrics: SecondaryMetricsEngine::from_config(&config),
            planner: PlanGenerator::from_config(&config),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyze the history up to and including `reference_date`
    ///
    /// Hard errors abort the run and are returned unchanged; missing signals
    /// only leave the corresponding metric empty.
    pub fn analyze(
        &self,
        activities: &[ActivityRecord],
        streams: &RecentStreams,
        goal: Option<&Goal>,
        reference_date: NaiveDate,
    ) -> Result<EngineReport, EngineError> {
        let started = Instant::now();
        let stress_by_date = daily_load::aggregate(activities, &self.estimator);
        AppLogger::log_pipeline_stage(
            "aggregate",
            stress_by_date.len(),
            started.elapsed().as_micros(),
        );

        let started = Instant::now();
        let timeline = self.timeline_builder.build(&stress_by_date, reference_date)?;
        AppLogger::log_pipeline_stage("timeline", timeline.len(), started.elapsed().as_micros());

        let assessment = self.classifier.classify(&timeline)?;

        let started = Instant::now();
        let secondary = self
            .metrics
            .compute(activities, &timeline, streams, reference_date);
        AppLogger::log_pipeline_stage(
            "secondary_metrics",
            secondary.intensity.samples.len(),
            started.elapsed().as_micros(),
        );
        if secondary.intensity.average_if.is_none() {
            AppLogger::log_missing_signal(
                "average_intensity",
                "moving_time",
                "no activity long enough to score",
            );
        }
        if secondary.anaerobic.average_percent.is_none() {
            AppLogger::log_missing_signal(
                "zone45_percent",
                "heart_rate_stream",
                "no recent activity with heart-rate samples",
            );
        }

        let summary =
            MetricsSummary::from_parts(&timeline, &secondary, self.config.plan.fatigue_window_days);

        let plan = match goal {
            Some(goal) => {
                let weeks = self.planner.generate(&summary, goal, reference_date)?;
                let strategy = self.planner.strategy().label();
                AppLogger::log_plan_generated(&goal.title, weeks.len(), strategy);
                Some(weeks)
            }
            None => None,
        };

        info!(
            reference_date = %reference_date,
            activities = activities.len(),
            ctl = summary.ctl,
            atl = summary.atl,
            tsb = summary.tsb,
            freshness = assessment.freshness.label(),
            "Training load analysis complete"
        );

        Ok(EngineReport {
            reference_date,
            timeline,
            assessment,
            summary,
            secondary,
            plan,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.25, 1), 1.3);
        assert_eq!(round_to(0.666_666, 2), 0.67);
        assert_eq!(round_to(-0.04, 1), 0.0);
        assert!(round_to(-0.04, 1).is_sign_positive());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig {
            horizon_days: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            TrainingLoadEngine::new(config),
            Err(EngineError::InvalidConfiguration(_))
        ));
    }
}
