// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Hard errors raised by the training load engine
//!
//! Missing signals (no heart rate, no power, no stream) are never errors: they
//! surface as `None` fields on the computed values instead.

use chrono::NaiveDate;

/// Errors that abort an engine run
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Insufficient history: {required} days required, {actual} available")]
    InsufficientHistory { required: usize, actual: usize },

    #[error("Goal date {target_date} is not after reference date {reference_date}")]
    GoalInPast {
        target_date: NaiveDate,
        reference_date: NaiveDate,
    },
}

impl EngineError {
    /// Shorthand for an `InvalidConfiguration` error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }
}
