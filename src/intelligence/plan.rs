// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Week-by-week session plan toward a goal event

use super::metrics::MetricsSummary;
use crate::config::{EngineConfig, PlanStrategy};
use crate::errors::EngineError;
use crate::models::{DisciplineType, Goal, GoalFocus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Macro-cycle phase of a planned week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanPhase {
    /// More than two weeks remain after this one
    Development,
    /// One or two weeks remain
    Specific,
    /// Final week before the goal
    Taper,
}

impl PlanPhase {
    /// Phase for a week followed by `weeks_after` more planned weeks
    pub fn for_weeks_after(weeks_after: usize) -> Self {
        match weeks_after {
            0 => Self::Taper,
            1 | 2 => Self::Specific,
            _ => Self::Development,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Specific => "specific",
            Self::Taper => "taper",
        }
    }
}

/// Form label from the recent average stress balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FatigueLabel {
    HeavyFatigue,
    LightFatigue,
    GoodForm,
}

impl FatigueLabel {
    pub fn from_average_tsb(average_tsb: f64) -> Self {
        if average_tsb < -10.0 {
            Self::HeavyFatigue
        } else if average_tsb < 0.0 {
            Self::LightFatigue
        } else {
            Self::GoodForm
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::HeavyFatigue => "heavy fatigue",
            Self::LightFatigue => "light fatigue",
            Self::GoodForm => "good form",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPlan {
    #[serde(rename = "type")]
    pub session_type: String,
    pub label: String,
    pub duration_label: String,
    pub intensity_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekPlan {
    /// 1-based
    pub week_index: usize,
    pub fatigue_label: FatigueLabel,
    /// Set by the periodized strategy only
    pub phase: Option<PlanPhase>,
    /// Estimated chronic load to reach by the end of the week
    pub target_ctl: f64,
    pub sessions: Vec<SessionPlan>,
}

/// Session template: label, duration, intensity
type Template = (&'static str, &'static str, &'static str);

const DEVELOPMENT: &[Template] = &[
    ("Base endurance", "60-90 min", "low"),
    ("Threshold / tempo", "40 min", "high"),
    ("Intervals", "6 x 3 min", "very high"),
    ("Long session", "90-120 min", "moderate"),
];

const SPECIFIC: &[Template] = &[
    ("Endurance", "60 min", "low"),
    ("Goal-specific work", "45-60 min", "high"),
    ("Long session with intensity", "90-100 min", "moderate"),
];

const TAPER: &[Template] = &[
    ("Light endurance", "45 min", "low"),
    ("Sharpening effort", "3 x 3 min", "high"),
];

fn focus_templates(focus: GoalFocus) -> &'static [Template] {
    match focus {
        GoalFocus::Technique => &[
            ("Technical descents in the woods", "1h30", "high"),
            ("Tight-corner handling", "1h", "moderate"),
        ],
        GoalFocus::Explosive => &[
            ("Hill surges (30s / 30s)", "1h", "very high"),
            ("Climb sprint plus descent", "1h30", "high"),
        ],
        GoalFocus::Resistance => &[
            ("Long false-flat climb", "2h", "moderate"),
            ("Timed long descent", "1h30", "high"),
        ],
        GoalFocus::Endurance => &[
            ("Long outing with elevation", "3h", "moderate"),
            ("Active recovery hike", "1h", "low"),
        ],
        GoalFocus::Mixed => &[
            ("Mixed climbing and descending", "2h", "moderate"),
            ("Surges and technique", "1h30", "high"),
        ],
    }
}

fn sessions_from(templates: &[Template], discipline: DisciplineType) -> Vec<SessionPlan> {
    templates
        .iter()
        .map(|&(label, duration, intensity)| SessionPlan {
            session_type: discipline.session_label().to_string(),
            label: label.to_string(),
            duration_label: duration.to_string(),
            intensity_label: intensity.to_string(),
        })
        .collect()
}

/// Builds the week plan from the run's metrics and a goal
#[derive(Debug, Clone, PartialEq)]
pub struct PlanGenerator {
    strategy: PlanStrategy,
    max_weeks: Option<usize>,
    ctl_gain_per_week: f64,
}

impl PlanGenerator {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            strategy: config.plan.strategy,
            max_weeks: config.plan.max_weeks,
            ctl_gain_per_week: config.plan.ctl_gain_per_week,
        }
    }

    pub fn strategy(&self) -> PlanStrategy {
        self.strategy
    }

    /// One [`WeekPlan`] per whole week between `reference_date` and the goal
    ///
    /// # Errors
    ///
    /// [`EngineError::GoalInPast`] when the goal is not after `reference_date`.
    pub fn generate(
        &self,
        summary: &MetricsSummary,
        goal: &Goal,
        reference_date: NaiveDate,
    ) -> Result<Vec<WeekPlan>, EngineError> {
        if goal.target_date <= reference_date {
            return Err(EngineError::GoalInPast {
                target_date: goal.target_date,
                reference_date,
            });
        }

        let whole_weeks = usize::try_from((goal.target_date - reference_date).num_days() / 7)
            .map_err(|_| EngineError::invalid_config("goal date out of range"))?;
        let weeks = self
            .max_weeks
            .map_or(whole_weeks, |cap| whole_weeks.min(cap));

        let fatigue_label =
            FatigueLabel::from_average_tsb(summary.recent_average_tsb.unwrap_or(0.0));

        let plan = (1..=weeks)
            .map(|week_index| {
                let (phase, templates) = match self.strategy {
                    PlanStrategy::Periodized => {
                        let phase = PlanPhase::for_weeks_after(whole_weeks - week_index);
                        let templates = match phase {
                            PlanPhase::Development => DEVELOPMENT,
                            PlanPhase::Specific => SPECIFIC,
                            PlanPhase::Taper => TAPER,
                        };
                        (Some(phase), templates)
                    }
                    PlanStrategy::FocusTemplates => (None, focus_templates(goal.focus)),
                };

                WeekPlan {
                    week_index,
                    fatigue_label,
                    phase,
                    target_ctl: (summary.ctl + week_index as f64 * self.ctl_gain_per_week)
                        .round(),
                    sessions: sessions_from(templates, goal.discipline),
                }
            })
            .collect();

        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlanConfig;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 1).unwrap()
    }

    fn goal_in(days: i64, focus: GoalFocus) -> Goal {
        Goal {
            title: "Autumn enduro".to_string(),
            target_date: reference() + chrono::Duration::days(days),
            focus,
            discipline: DisciplineType::Bike,
        }
    }

    fn summary(ctl: f64, recent_average_tsb: Option<f64>) -> MetricsSummary {
        MetricsSummary {
            ctl,
            atl: 0.0,
            tsb: 0.0,
            trailing_7_day_stress: 0.0,
            trailing_14_day_stress: 0.0,
            weekly_volume_km: 0.0,
            average_intensity: None,
            intensity_level: None,
            zone45_percent: None,
            charge_recovery: Vec::new(),
            recent_average_tsb,
        }
    }

    fn generator(strategy: PlanStrategy, max_weeks: Option<usize>) -> PlanGenerator {
        PlanGenerator::from_config(&EngineConfig {
            plan: PlanConfig {
                strategy,
                max_weeks,
                ..PlanConfig::default()
            },
            ..EngineConfig::default()
        })
    }

    #[test]
    fn test_three_weeks_out() {
        let plan = PlanGenerator::from_config(&EngineConfig::default())
            .generate(&summary(0.0, None), &goal_in(21, GoalFocus::Mixed), reference())
            .unwrap();

        assert_eq!(plan.len(), 3);
        assert!(plan.iter().all(|w| !w.sessions.is_empty()));
        let phases: Vec<_> = plan.iter().map(|w| w.phase).collect();
        assert_eq!(
            phases,
            vec![
                Some(PlanPhase::Specific),
                Some(PlanPhase::Specific),
                Some(PlanPhase::Taper)
            ]
        );
        assert_eq!(plan[2].sessions.len(), 2);
        assert_eq!(plan[0].sessions[0].session_type, "MTB");
    }

    #[test]
    fn test_development_phase_far_out() {
        let plan = generator(PlanStrategy::Periodized, None)
            .generate(&summary(30.0, Some(-3.0)), &goal_in(44, GoalFocus::Endurance), reference())
            .unwrap();

        assert_eq!(plan.len(), 6);
        assert_eq!(plan[0].phase, Some(PlanPhase::Development));
        assert_eq!(plan[0].sessions.len(), 4);
        assert_eq!(plan[2].phase, Some(PlanPhase::Development));
        assert_eq!(plan[3].phase, Some(PlanPhase::Specific));
        assert_eq!(plan[5].phase, Some(PlanPhase::Taper));
        assert_eq!(plan[0].target_ctl, 32.0);
        assert_eq!(plan[5].target_ctl, 42.0);
        assert!(plan.iter().all(|w| w.fatigue_label == FatigueLabel::LightFatigue));
    }

    #[test]
    fn test_goal_not_in_future() {
        let generator = generator(PlanStrategy::Periodized, None);
        for days in [0, -1, -30] {
            let goal = goal_in(days, GoalFocus::Mixed);
            let result = generator.generate(&summary(0.0, None), &goal, reference());
            assert!(matches!(result, Err(EngineError::GoalInPast { .. })));
        }
    }

    #[test]
    fn test_less_than_a_week_is_empty() {
        let plan = generator(PlanStrategy::Periodized, None)
            .generate(&summary(0.0, None), &goal_in(6, GoalFocus::Mixed), reference())
            .unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn test_focus_templates_with_cap() {
        let goal = Goal {
            discipline: DisciplineType::Foot,
            ..goal_in(70, GoalFocus::Explosive)
        };
        let plan = generator(PlanStrategy::FocusTemplates, Some(4))
            .generate(&summary(20.0, Some(-12.0)), &goal, reference())
            .unwrap();

        assert_eq!(plan.len(), 4);
        for week in &plan {
            assert_eq!(week.phase, None);
            assert_eq!(week.fatigue_label, FatigueLabel::HeavyFatigue);
            assert_eq!(week.sessions.len(), 2);
            assert_eq!(week.sessions[0].session_type, "Trail");
            assert_eq!(week.sessions[0].intensity_label, "very high");
        }
    }

    #[test]
    fn test_fatigue_bands() {
        assert_eq!(FatigueLabel::from_average_tsb(-10.1), FatigueLabel::HeavyFatigue);
        assert_eq!(FatigueLabel::from_average_tsb(-10.0), FatigueLabel::LightFatigue);
        assert_eq!(FatigueLabel::from_average_tsb(-0.1), FatigueLabel::LightFatigue);
        assert_eq!(FatigueLabel::from_average_tsb(0.0), FatigueLabel::GoodForm);
    }
}
