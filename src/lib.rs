// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Trail Coach
//!
//! A training load analytics engine for endurance athletes. It turns a sparse,
//! irregular workout history into a dense daily load timeline with rolling
//! fitness and fatigue indicators, derives secondary metrics, and builds a
//! week-by-week plan toward a goal event.
//!
//! ## Features
//!
//! - **Stress estimation**: Heart-rate based training stress with documented fallbacks
//! - **Load timeline**: Chronic load (42 days), acute load (7 days) and their balance
//! - **Trend advice**: Freshness and fitness trend readouts
//! - **Secondary metrics**: Weekly volume, intensity, charge/recovery and zone 4-5 share
//! - **Week plans**: Periodized or focus-driven sessions up to the goal date
//!
//! ## Architecture
//!
//! - **Models**: Activity, goal and heart-rate stream records
//! - **Intelligence**: The synchronous analysis pipeline
//! - **Providers**: Async heart-rate stream sources and the local JSON cache
//! - **Formatters**: Text and JSON rendering of a report
//! - **Config**: Engine parameters and data paths
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use trail_coach::config::Config;
//! use trail_coach::intelligence::TrainingLoadEngine;
//! use trail_coach::providers::{collect_recent_streams, JsonStreamSource, LocalCache};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load(None)?;
//!     let cache = LocalCache::new(&config.data);
//!     let activities = cache.load_activities()?;
//!     let goal = cache.load_goal()?;
//!
//!     let today = chrono::Local::now().date_naive();
//!     let source = JsonStreamSource::from_file(&config.data.streams)?;
//!     let streams = collect_recent_streams(&source, &activities, today, 3).await;
//!
//!     let engine = TrainingLoadEngine::new(config.engine)?;
//!     let report = engine.analyze(&activities, &streams, goal.as_ref(), today)?;
//!     println!("CTL {:.1}", report.summary.ctl);
//!
//!     Ok(())
//! }
//! ```

/// Heart-rate stream sources and the local data cache
pub mod providers;

/// Common data models for training data
pub mod models;

/// Configuration management and persistence
pub mod config;

/// Application constants and default values
pub mod constants;

/// Engine error types
pub mod errors;

/// Training load analytics pipeline
pub mod intelligence;

/// Report rendering
pub mod formatters;

/// Production logging and structured output
pub mod logging;
