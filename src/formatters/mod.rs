// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Report Formatters
//!
//! Presentation of an [`EngineReport`]. Nothing here computes metrics.

use crate::intelligence::EngineReport;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("Unknown output format: {other}. Expected text or json")),
        }
    }
}

/// Render the report; `rows` limits the printed timeline tail in text output
pub fn render_report(report: &EngineReport, rows: usize, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(report).context("Failed to serialize report")
        }
        OutputFormat::Text => render_text(report, rows).context("Failed to render report"),
    }
}

fn optional(value: Option<f64>, suffix: &str) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.1}{suffix}"))
}

fn render_text(report: &EngineReport, rows: usize) -> Result<String, std::fmt::Error> {
    let mut out = String::new();

    writeln!(out, "Training load up to {}", report.reference_date)?;
    writeln!(out)?;
    writeln!(out, "{:<12} {:>8} {:>8} {:>8} {:>8}", "date", "tss", "ctl", "atl", "tsb")?;
    for point in report.timeline.tail(rows) {
        writeln!(
            out,
            "{:<12} {:>8.1} {:>8.1} {:>8.1} {:>8.1}",
            point.date.to_string(),
            point.tss,
            point.ctl,
            point.atl,
            point.tsb
        )?;
    }

    let assessment = &report.assessment;
    writeln!(out)?;
    writeln!(out, "Status")?;
    for line in &assessment.status_lines {
        writeln!(out, "  - {line}")?;
    }
    writeln!(out, "Suggestions")?;
    for line in &assessment.suggestion_lines {
        writeln!(out, "  - {line}")?;
    }
    if assessment.recovery_advised {
        writeln!(out, "Recovery advised: plan rest before the next hard block.")?;
    }

    let summary = &report.summary;
    writeln!(out)?;
    writeln!(out, "Metrics")?;
    writeln!(out, "  CTL {:.1} | ATL {:.1} | TSB {:.1}", summary.ctl, summary.atl, summary.tsb)?;
    writeln!(
        out,
        "  Stress last 7 days: {:.1} | last 14 days: {:.1}",
        summary.trailing_7_day_stress, summary.trailing_14_day_stress
    )?;
    writeln!(out, "  Weekly volume: {:.1} km", summary.weekly_volume_km)?;
    let level = summary.intensity_level.map_or("n/a", |l| l.label());
    writeln!(
        out,
        "  Average intensity: {} ({level})",
        summary
            .average_intensity
            .map_or_else(|| "n/a".to_string(), |v| format!("{v:.3}"))
    )?;
    writeln!(out, "  Zone 4-5 share: {}", optional(summary.zone45_percent, "%"))?;
    for sample in &summary.charge_recovery {
        writeln!(
            out,
            "  Charge/recovery {}d: {} charge, {} recovery, ratio {:.2}",
            sample.window_days, sample.charge_days, sample.recovery_days, sample.ratio
        )?;
    }

    if !report.secondary.anaerobic.samples.is_empty() {
        writeln!(out)?;
        writeln!(out, "Recent heart-rate zones")?;
        for sample in &report.secondary.anaerobic.samples {
            writeln!(
                out,
                "  {}: zone 4 {:.1}%, zone 5 {:.1}%, total {:.1}%",
                sample.activity_name, sample.zone4_percent, sample.zone5_percent, sample.percent
            )?;
        }
    }

    if let Some(plan) = &report.plan {
        writeln!(out)?;
        if plan.is_empty() {
            writeln!(out, "Goal is less than a week away: no structured plan.")?;
        }
        for week in plan {
            let phase = week.phase.map(|p| format!(" [{}]", p.label())).unwrap_or_default();
            writeln!(
                out,
                "Week {}{phase} - {} - target CTL {:.0}",
                week.week_index,
                week.fatigue_label.label(),
                week.target_ctl
            )?;
            for (i, session) in week.sessions.iter().enumerate() {
                writeln!(
                    out,
                    "  {}. [{}] {} ({}, intensity: {})",
                    i + 1,
                    session.session_type,
                    session.label,
                    session.duration_label,
                    session.intensity_label
                )?;
            }
        }
    }

    Ok(out)
}
