//! Check-and-score pipeline for grading programming assignment submissions.
//!
//! An [`AssignmentConfig`] lists the checks to run. [`grade`] executes them in order over a
//! [`GradingLedger`] and returns it for rendering with [`GradingLedger::summarize`].

mod checks;
mod config;
mod contributors;
mod error;
pub mod fingerprint;
pub mod gtest;
mod ledger;
mod pipeline;
mod runner;
mod score;
mod submission;

pub use checks::Grader;
pub use config::{AssignmentConfig, CheckDescriptor, CommandLine};
pub use contributors::ContributorsPolicy;
pub use error::{HarnessError, HarnessResult};
pub use ledger::{
    Assignment, CheckResult, CheckStatus, GradingLedger, GradingReport, SKIPPED_DETAIL,
};
pub use pipeline::{RunOptions, grade};
pub use runner::{CommandOutcome, CommandRunner, Termination};
pub use score::Score;
pub use submission::Submission;

use serde::Deserialize;
use serde::Serialize;

#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum LoggingMode {
    Silent,
    #[default]
    Normal,
    Verbose,
}

impl LoggingMode {
    /// Default `log` filter for this mode.
    pub fn filter(&self) -> &'static str {
        match self {
            LoggingMode::Silent => "error",
            LoggingMode::Normal => "info",
            LoggingMode::Verbose => "debug",
        }
    }
}
