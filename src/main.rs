// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use trail_coach::config::Config;
use trail_coach::formatters::{render_report, OutputFormat};
use trail_coach::intelligence::TrainingLoadEngine;
use trail_coach::logging;
use trail_coach::models::Discipline;
use trail_coach::providers::{collect_recent_streams, JsonStreamSource, LocalCache};

#[derive(Parser, Debug)]
#[command(author, version, about = "Training load analytics and week plans", long_about = None)]
struct Args {
    #[arg(short, long)]
    config: Option<String>,

    /// Activities JSON file
    #[arg(long)]
    activities: Option<PathBuf>,

    /// Goal JSON file
    #[arg(long)]
    goal: Option<PathBuf>,

    /// Heart-rate streams JSON file
    #[arg(long)]
    streams: Option<PathBuf>,

    /// bike, foot or all
    #[arg(long, default_value = "all")]
    sport: Discipline,

    /// Last day analyzed (YYYY-MM-DD), defaults to today
    #[arg(long)]
    reference_date: Option<NaiveDate>,

    /// Timeline rows printed in text output
    #[arg(short, long, default_value = "10")]
    days: usize,

    /// text or json
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_from_env()?;

    let mut config = Config::load(args.config)?;
    if let Some(path) = args.activities {
        config.data.activities = path;
    }
    if let Some(path) = args.goal {
        config.data.goal = path;
    }
    if let Some(path) = args.streams {
        config.data.streams = path;
    }

    let reference_date = args
        .reference_date
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let cache = LocalCache::new(&config.data);
    let activities = args.sport.filter(&cache.load_activities()?);
    let goal = cache.load_goal()?;
    info!(
        "Analyzing {} activities ({:?}) up to {}",
        activities.len(),
        args.sport,
        reference_date
    );

    let source = JsonStreamSource::from_file(&config.data.streams)?;
    let limit = config.engine.anaerobic.activity_limit;
    let streams = collect_recent_streams(&source, &activities, reference_date, limit).await;

    let engine = TrainingLoadEngine::new(config.engine)?;
    let report = engine
        .analyze(&activities, &streams, goal.as_ref(), reference_date)
        .context("Training load analysis failed")?;

    println!("{}", render_report(&report, args.days, args.format)?);

    Ok(())
}
