use crate::{
    LoggingMode,
    contributors::ContributorsPolicy,
    error::{HarnessError, HarnessResult},
    ledger::Assignment,
};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, time::Duration};

mod check_descriptor;

pub use check_descriptor::{CheckDescriptor, CommandLine};

const DEFAULT_TIMEOUT_SECS: u64 = 300;

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
struct AssignmentConfigUnchecked {
    assignment: Assignment,
    #[serde(default)]
    logging_mode: LoggingMode,
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
    #[serde(default)]
    contributors: ContributorsPolicy,
    checks: Vec<CheckDescriptor>,
}

/// Everything that is specific to one assignment: its point total, the contributor
/// conventions and the ordered checks.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(try_from = "AssignmentConfigUnchecked")]
pub struct AssignmentConfig {
    pub assignment: Assignment,
    pub logging_mode: LoggingMode,
    /// Per command. `0` disables the limit.
    pub timeout_secs: u64,
    pub contributors: ContributorsPolicy,
    pub checks: Vec<CheckDescriptor>,
}

impl AssignmentConfig {
    pub fn build(
        assignment: Assignment,
        logging_mode: LoggingMode,
        timeout_secs: u64,
        contributors: ContributorsPolicy,
        checks: Vec<CheckDescriptor>,
    ) -> Result<Self, &'static str> {
        if checks.is_empty() {
            return Err("at least one check is expected");
        }

        let mut points: u64 = 0;
        let mut test_binary_ran = false;
        for check in &checks {
            check.validate()?;
            points += u64::from(check.points());
            match check {
                CheckDescriptor::GtestRun { .. } => test_binary_ran = true,
                CheckDescriptor::GtestSuite { .. } if !test_binary_ran => {
                    return Err("gtest_suite must come after a gtest_run");
                }
                _ => {}
            }
        }
        if points > u64::from(assignment.total_points) {
            return Err("the checks are worth more than the assignment's total points");
        }

        Ok(Self {
            assignment,
            logging_mode,
            timeout_secs,
            contributors,
            checks,
        })
    }

    pub fn from_json(json: &str) -> HarnessResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> HarnessResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| HarnessError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// Sum of the points of every check.
    pub fn checked_points(&self) -> u32 {
        self.checks.iter().map(CheckDescriptor::points).sum()
    }
}

impl TryFrom<AssignmentConfigUnchecked> for AssignmentConfig {
    type Error = &'static str;

    fn try_from(value: AssignmentConfigUnchecked) -> Result<Self, Self::Error> {
        let AssignmentConfigUnchecked {
            assignment,
            logging_mode,
            timeout_secs,
            contributors,
            checks,
        } = value;

        AssignmentConfig::build(assignment, logging_mode, timeout_secs, contributors, checks)
    }
}
