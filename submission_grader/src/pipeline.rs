use crate::{
    checks::Grader,
    config::{AssignmentConfig, CheckDescriptor},
    contributors::ContributorsPolicy,
    error::HarnessResult,
    ledger::GradingLedger,
    runner::CommandRunner,
    submission::Submission,
};
use log::info;
use std::{path::Path, time::Duration};

/// Knobs that a caller may override on top of the assignment configuration.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct RunOptions {
    /// `Some(None)` disables the timeout, `None` keeps the configured one.
    pub timeout: Option<Option<Duration>>,
}

impl Grader<'_> {
    /// Dispatches one descriptor to the matching check.
    pub fn execute(
        &mut self,
        check: &CheckDescriptor,
        contributors: &ContributorsPolicy,
    ) -> HarnessResult<()> {
        match check {
            CheckDescriptor::MissingContributors { points } => {
                self.reject_if_missing_contributors(contributors, *points)
            }
            CheckDescriptor::StarterContributors { points } => {
                self.reject_if_starter_contributors(contributors, *points)
            }
            CheckDescriptor::FilesExist { paths, points } => {
                self.reject_unless_files_exist(paths.as_slice(), *points)
            }
            CheckDescriptor::FileUnchanged {
                path,
                digest,
                points,
            } => self.reject_if_file_unchanged(path, digest, *points),
            CheckDescriptor::FileChanged {
                path,
                digest,
                points,
            } => self.reject_if_file_changed(path, digest, *points),
            CheckDescriptor::CommandSucceeds { command, points } => {
                // validated on load, an invalid line here only comes from a hand-built
                // descriptor
                let argv = command.argv().unwrap_or_default();
                return self.reject_unless_command_succeeds(&argv, *points);
            }
            CheckDescriptor::StringRemoved {
                label,
                points,
                needle,
                files,
            } => self.string_removed_test(label, *points, needle, files.as_slice()),
            CheckDescriptor::GtestRun { binary } => return self.gtest_run(binary),
            CheckDescriptor::GtestSuite { suite, points } => {
                self.gtest_suite_test(suite, *points)
            }
        }
        Ok(())
    }

    /// Runs every descriptor in order. Stops only on a harness fault.
    pub fn execute_all(
        &mut self,
        checks: &[CheckDescriptor],
        contributors: &ContributorsPolicy,
    ) -> HarnessResult<()> {
        for check in checks {
            self.execute(check, contributors)?;
        }
        Ok(())
    }
}

/// Grades the submission at `submission_root` against `config`.
///
/// Returns the finished ledger, or the harness fault that aborted the run.
pub fn grade(
    config: &AssignmentConfig,
    submission_root: impl AsRef<Path>,
    options: RunOptions,
) -> HarnessResult<GradingLedger> {
    let submission = Submission::open(submission_root)?;
    let timeout = options.timeout.unwrap_or_else(|| config.timeout());
    info!(
        "📝 Grading assignment {} in '{}'",
        config.assignment.id,
        submission.root().display()
    );

    let runner = CommandRunner::new(submission.root()).with_timeout(timeout);
    let mut grader = Grader::new(&submission, runner, GradingLedger::new(config.assignment));
    grader.execute_all(&config.checks, &config.contributors)?;

    let ledger = grader.into_ledger();
    info!("🏁 Finished with {}/{}", ledger.earned(), ledger.possible());
    Ok(ledger)
}
