//! The grading primitives.
//!
//! Every check follows the same shape: when the ledger is already rejected it records a
//! skip and returns without touching the filesystem or spawning anything; otherwise it
//! does its work and records exactly one result. Rejecting checks call
//! [`GradingLedger::reject`] on failure.
//!
//! Submission faults (missing files, paths escaping the root, failing commands) are
//! absorbed into the ledger. Only harness faults are returned as errors.

use crate::contributors::ContributorsPolicy;
use crate::error::{HarnessError, HarnessResult};
use crate::gtest::{self, SuiteCounts};
use crate::ledger::{CheckResult, CheckStatus, GradingLedger};
use crate::runner::{CommandOutcome, CommandRunner, Termination};
use crate::score::Score;
use crate::submission::Submission;
use log::{debug, warn};

/// Output of the most recent `gtest_run`. `outcome` is `None` when the binary could not
/// be run at all.
#[derive(Debug, PartialEq, Eq, Clone)]
struct TestRun {
    binary: String,
    outcome: Option<CommandOutcome>,
}

#[derive(Debug)]
pub struct Grader<'a> {
    submission: &'a Submission,
    runner: CommandRunner,
    ledger: GradingLedger,
    last_test_run: Option<TestRun>,
}

impl<'a> Grader<'a> {
    /// The runner is expected to work inside the submission root.
    pub fn new(submission: &'a Submission, runner: CommandRunner, ledger: GradingLedger) -> Self {
        Self {
            submission,
            runner,
            ledger,
            last_test_run: None,
        }
    }

    pub fn ledger(&self) -> &GradingLedger {
        &self.ledger
    }

    pub fn into_ledger(self) -> GradingLedger {
        self.ledger
    }

    /// Records a skip when a rejection already happened. Returns whether the caller should
    /// stop.
    fn skip_if_rejected(&mut self, label: &str, points: u32) -> bool {
        if self.ledger.is_rejected() {
            self.ledger.record_skipped(label, points);
            return true;
        }
        false
    }

    fn pass(&mut self, label: &str, points: u32, detail: impl Into<String>) {
        self.ledger.push(CheckResult::new(label, Score::full(points), detail));
    }

    fn fail(&mut self, label: &str, points: u32, detail: impl Into<String>) {
        self.ledger.push(
            CheckResult::new(label, Score::zero(points), detail).with_status(CheckStatus::Failed),
        );
    }

    fn fail_and_reject(&mut self, result: CheckResult) {
        let label = result.label.clone();
        self.ledger.push(result.with_status(CheckStatus::Failed));
        self.ledger.reject(label);
    }

    fn read_entries(
        &mut self,
        label: &str,
        points: u32,
        policy: &ContributorsPolicy,
    ) -> Option<Vec<String>> {
        let content = match self.submission.read_to_string(&policy.file) {
            Ok(content) => content,
            Err(err) => {
                debug!("error while reading contributors: {err:?}");
                self.fail_and_reject(CheckResult::new(label, Score::zero(points), err.to_string()));
                return None;
            }
        };
        match policy.entries(&content) {
            Some(entries) => Some(entries),
            None => {
                self.fail_and_reject(CheckResult::new(
                    label,
                    Score::zero(points),
                    format!("{} has no \"{}\" section", policy.file, policy.heading),
                ));
                None
            }
        }
    }

    pub fn reject_if_missing_contributors(&mut self, policy: &ContributorsPolicy, points: u32) {
        let label = "contributors listed";
        if self.skip_if_rejected(label, points) {
            return;
        }
        let Some(entries) = self.read_entries(label, points, policy) else {
            return;
        };
        if entries.is_empty() {
            self.fail_and_reject(CheckResult::new(
                label,
                Score::zero(points),
                format!("no contributors listed under \"{}\"", policy.heading),
            ));
            return;
        }
        self.pass(label, points, format!("{} listed", entries.join(", ")));
    }

    pub fn reject_if_starter_contributors(&mut self, policy: &ContributorsPolicy, points: u32) {
        let label = "contributors edited";
        if self.skip_if_rejected(label, points) {
            return;
        }
        let Some(entries) = self.read_entries(label, points, policy) else {
            return;
        };
        if let Some(starter) = policy.starter_entry(&entries) {
            let detail = format!("{} still lists the starter entry \"{starter}\"", policy.file);
            self.fail_and_reject(CheckResult::new(label, Score::zero(points), detail));
            return;
        }
        self.pass(label, points, "no starter entries");
    }

    pub fn reject_unless_files_exist<S: AsRef<str>>(&mut self, paths: &[S], points: u32) {
        let label = "files exist";
        if self.skip_if_rejected(label, points) {
            return;
        }
        let missing: Vec<&str> = paths
            .iter()
            .map(|p| p.as_ref())
            .filter(|p| !self.submission.is_file(p))
            .collect();
        if missing.is_empty() {
            self.pass(label, points, "all present");
            return;
        }
        let detail = format!("missing {}", missing.join(", "));
        self.fail_and_reject(CheckResult::new(label, Score::zero(points), detail));
    }

    /// Rejects when `path` still has the starter code's digest.
    pub fn reject_if_file_unchanged(&mut self, path: &str, original_digest: &str, points: u32) {
        let label = format!("{path} modified");
        if self.skip_if_rejected(&label, points) {
            return;
        }
        match self.submission.fingerprint(path) {
            Ok(digest) if digest.eq_ignore_ascii_case(original_digest) => {
                let detail = format!("{path} is identical to the starter code");
                self.fail_and_reject(CheckResult::new(&label, Score::zero(points), detail));
            }
            Ok(_) => self.pass(&label, points, "changed from the starter code"),
            Err(err) => self.reject_unreadable(&label, points, err),
        }
    }

    /// Rejects when `path` no longer has the distributed digest.
    pub fn reject_if_file_changed(&mut self, path: &str, expected_digest: &str, points: u32) {
        let label = format!("{path} unmodified");
        if self.skip_if_rejected(&label, points) {
            return;
        }
        match self.submission.fingerprint(path) {
            Ok(digest) if digest.eq_ignore_ascii_case(expected_digest) => {
                self.pass(&label, points, "matches the distributed version")
            }
            Ok(digest) => {
                let detail = format!("{path} was modified (sha256 {digest})");
                self.fail_and_reject(CheckResult::new(&label, Score::zero(points), detail));
            }
            Err(err) => self.reject_unreadable(&label, points, err),
        }
    }

    fn reject_unreadable(&mut self, label: &str, points: u32, err: HarnessError) {
        debug!("error while fingerprinting: {err:?}");
        self.fail_and_reject(CheckResult::new(label, Score::zero(points), err.to_string()));
    }

    /// Runs `argv` in the submission root and rejects unless it exits with 0.
    ///
    /// A command that cannot be launched at all is a harness fault and is returned.
    pub fn reject_unless_command_succeeds<S: AsRef<str>>(
        &mut self,
        argv: &[S],
        points: u32,
    ) -> HarnessResult<()> {
        let argv: Vec<&str> = argv.iter().map(|a| a.as_ref()).collect();
        let command_line = argv.join(" ");
        let label = format!("command succeeds: {command_line}");
        if self.skip_if_rejected(&label, points) {
            return Ok(());
        }
        let outcome = self.runner.run(&argv)?;
        if outcome.success() {
            self.pass(&label, points, "exit code 0");
            return Ok(());
        }
        let detail = match outcome.termination {
            Termination::TimedOut => match self.runner.timeout() {
                Some(limit) => format!("timed out after {limit:?}"),
                None => "timed out".to_string(),
            },
            termination => termination.to_string(),
        };
        self.fail_and_reject(
            CheckResult::new(&label, Score::zero(points), detail)
                .with_diagnostics(outcome.combined_output),
        );
        Ok(())
    }

    /// Full points when `needle` occurs in none of `files`. Never rejects.
    pub fn string_removed_test<S: AsRef<str>>(
        &mut self,
        label: &str,
        points: u32,
        needle: &str,
        files: &[S],
    ) {
        if self.skip_if_rejected(label, points) {
            return;
        }
        let mut remaining = vec![];
        let mut unreadable = vec![];
        for file in files {
            let file: &str = file.as_ref();
            match self.submission.read_to_string(file) {
                Ok(content) => {
                    let count = content.matches(needle).count();
                    if count > 0 {
                        remaining.push(format!("{file}: {count}"));
                    }
                }
                Err(err) => {
                    debug!("error while reading '{file}': {err:?}");
                    unreadable.push(file);
                }
            }
        }

        if remaining.is_empty() && unreadable.is_empty() {
            self.pass(label, points, format!("no \"{needle}\" remaining"));
            return;
        }
        let mut problems = vec![];
        if !remaining.is_empty() {
            problems.push(format!(
                "occurrences of \"{needle}\" remain ({})",
                remaining.join(", ")
            ));
        }
        if !unreadable.is_empty() {
            problems.push(format!("cannot read {}", unreadable.join(", ")));
        }
        self.fail(label, points, problems.join("; "));
    }

    /// Runs the test binary and keeps its output for the following suite checks.
    ///
    /// A missing or unlaunchable binary is the submission's fault: it is recorded and its
    /// suites score zero.
    pub fn gtest_run(&mut self, binary: &str) -> HarnessResult<()> {
        let label = format!("run {binary}");
        if self.skip_if_rejected(&label, 0) {
            return Ok(());
        }
        self.last_test_run = Some(TestRun {
            binary: binary.to_string(),
            outcome: None,
        });

        let path = match self.submission.resolve(binary) {
            Ok(path) if self.submission.is_executable(binary) => path,
            Ok(_) => {
                self.fail(&label, 0, format!("{binary} is missing or not executable"));
                return Ok(());
            }
            Err(err) => {
                self.fail(&label, 0, err.to_string());
                return Ok(());
            }
        };

        let outcome = match self.runner.run(&[path.as_os_str()]) {
            Ok(outcome) => outcome,
            Err(err @ HarnessError::Launch { .. }) => {
                warn!("❌ Unable to launch the test binary");
                self.fail(&label, 0, err.to_string());
                return Ok(());
            }
            Err(err) => return Err(err),
        };
        self.ledger.record(&label, 0, 0, outcome.termination.to_string());
        self.last_test_run = Some(TestRun {
            binary: binary.to_string(),
            outcome: Some(outcome),
        });
        Ok(())
    }

    /// Awards `floor(points * passed / total)` for `suite` from the last test run.
    pub fn gtest_suite_test(&mut self, suite: &str, points: u32) {
        if self.skip_if_rejected(suite, points) {
            return;
        }
        let output = match &self.last_test_run {
            Some(TestRun {
                outcome: Some(outcome),
                ..
            }) => outcome.combined_output.as_str(),
            Some(TestRun { binary, .. }) => {
                debug!("'{binary}' produced no output");
                ""
            }
            None => {
                warn!("suite '{suite}' scored before any test run");
                ""
            }
        };

        let SuiteCounts { passed, total } = gtest::extract_suite_counts(output, suite);
        let detail = if gtest::suite_ran(output, suite) {
            format!("{passed} of {total} tests passed")
        } else {
            "suite did not run".to_string()
        };
        self.ledger.push(CheckResult::new(
            suite,
            Score::proportional(points, passed, total),
            detail,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::sha256_hex;
    use crate::ledger::{Assignment, SKIPPED_DETAIL};
    use std::{fs, path::Path};
    use tempfile::{TempDir, tempdir};

    const STARTER_HEADER: &str = "// TODO: implement max_subarray_exh\n";

    fn submission_with(files: &[(&str, &str)]) -> (TempDir, Submission) {
        let dir = tempdir().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        let submission = Submission::open(dir.path()).unwrap();
        (dir, submission)
    }

    fn grader(submission: &Submission) -> Grader<'_> {
        Grader::new(
            submission,
            CommandRunner::new(submission.root()),
            GradingLedger::new(Assignment::new(9, 18)),
        )
    }

    #[cfg(unix)]
    fn write_script(dir: &Path, name: &str, body: &str) {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_mode(perms.mode() | 0o111);
        fs::set_permissions(&path, perms).unwrap();
    }

    mod rejection_tests {
        use super::*;

        #[test_log::test]
        fn should_reject_missing_file_and_skip_the_rest() {
            let (_dir, submission) = submission_with(&[]);
            let mut grader = grader(&submission);
            grader.reject_unless_files_exist(&["a.h"], 0);
            grader.string_removed_test("TODO comments removed", 3, "TODO", &["a.h"]);

            let ledger = grader.into_ledger();
            assert!(ledger.is_rejected());
            assert_eq!(ledger.earned(), 0);
            assert!(ledger.summarize().starts_with("files exist: 0/0 — missing a.h\n"));
            let skipped = &ledger.results()[1];
            assert_eq!(skipped.status, CheckStatus::Skipped);
            assert_eq!(skipped.detail, SKIPPED_DETAIL);
            assert_eq!(skipped.points_possible, 3);
        }

        #[test]
        fn should_list_every_missing_file() {
            let (_dir, submission) = submission_with(&[("a.h", "")]);
            let mut grader = grader(&submission);
            grader.reject_unless_files_exist(&["a.h", "b.h", "c.cpp"], 2);
            assert_eq!(grader.ledger().results()[0].detail, "missing b.h, c.cpp");
            assert_eq!(grader.ledger().possible(), 2);
        }

        #[test]
        fn should_reject_directory_in_place_of_file() {
            let (dir, submission) = submission_with(&[("a_test.cpp", "")]);
            fs::create_dir(dir.path().join("a.h")).unwrap();
            let mut grader = grader(&submission);
            grader.reject_unless_files_exist(&["a.h", "a_test.cpp"], 0);
            assert!(grader.ledger().is_rejected());
            assert_eq!(grader.ledger().results()[0].detail, "missing a.h");
        }

        #[test]
        fn should_pass_when_files_exist() {
            let (_dir, submission) = submission_with(&[("a.h", ""), ("a_test.cpp", "")]);
            let mut grader = grader(&submission);
            grader.reject_unless_files_exist(&["a.h", "a_test.cpp"], 1);
            assert!(!grader.ledger().is_rejected());
            assert_eq!(grader.ledger().earned(), 1);
        }

        #[test]
        fn should_not_run_commands_after_rejection() {
            let (dir, submission) = submission_with(&[]);
            let mut grader = grader(&submission);
            grader.reject_unless_files_exist(&["a.h"], 0);
            grader
                .reject_unless_command_succeeds(&["touch", "ran.txt"], 0)
                .unwrap();
            grader.gtest_run("a_test").unwrap();

            assert!(!dir.path().join("ran.txt").exists());
            let statuses: Vec<_> = grader.ledger().results().iter().map(|r| r.status).collect();
            assert_eq!(
                statuses,
                [CheckStatus::Failed, CheckStatus::Skipped, CheckStatus::Skipped]
            );
        }
    }

    mod digest_tests {
        use super::*;

        #[test]
        fn should_reject_unchanged_starter_file() {
            let (_dir, submission) = submission_with(&[("poly_exp.hpp", STARTER_HEADER)]);
            let mut grader = grader(&submission);
            let starter = sha256_hex(STARTER_HEADER.as_bytes());
            grader.reject_if_file_unchanged("poly_exp.hpp", &starter, 0);
            assert!(grader.ledger().is_rejected());
        }

        #[test]
        fn should_accept_one_byte_change_to_starter_file() {
            let edited = STARTER_HEADER.replace("TODO", "TODo");
            let (_dir, submission) = submission_with(&[("poly_exp.hpp", edited.as_str())]);
            let mut grader = grader(&submission);
            let starter = sha256_hex(STARTER_HEADER.as_bytes());
            grader.reject_if_file_unchanged("poly_exp.hpp", &starter, 0);
            assert!(!grader.ledger().is_rejected());
        }

        #[test]
        fn should_accept_untouched_test_file() {
            let content = "TEST(SmallCases, Empty) {}\n";
            let (_dir, submission) = submission_with(&[("poly_exp_test.cpp", content)]);
            let mut grader = grader(&submission);
            grader.reject_if_file_changed(
                "poly_exp_test.cpp",
                &sha256_hex(content.as_bytes()).to_uppercase(),
                0,
            );
            assert!(!grader.ledger().is_rejected());
        }

        #[test]
        fn should_reject_edited_test_file() {
            let content = "TEST(SmallCases, Empty) {}\n";
            let (_dir, submission) =
                submission_with(&[("poly_exp_test.cpp", "TEST(SmallCases, Empty) {}\n\n")]);
            let mut grader = grader(&submission);
            grader.reject_if_file_changed("poly_exp_test.cpp", &sha256_hex(content.as_bytes()), 0);
            assert!(grader.ledger().is_rejected());
            let detail = &grader.ledger().results()[0].detail;
            assert!(detail.starts_with("poly_exp_test.cpp was modified"));
        }

        #[test]
        fn should_reject_missing_file_in_both_directions() {
            let (_dir, submission) = submission_with(&[]);
            let digest = sha256_hex(b"");

            let mut first = grader(&submission);
            first.reject_if_file_unchanged("poly_exp.hpp", &digest, 0);
            assert!(first.ledger().is_rejected());

            let mut second = grader(&submission);
            second.reject_if_file_changed("poly_exp_test.cpp", &digest, 0);
            assert!(second.ledger().is_rejected());
        }

        #[test]
        fn should_reject_escaping_path() {
            let (_dir, submission) = submission_with(&[]);
            let mut grader = grader(&submission);
            grader.reject_if_file_changed("../poly_exp_test.cpp", &sha256_hex(b""), 0);
            assert!(grader.ledger().is_rejected());
            assert!(grader.ledger().results()[0].detail.contains("escapes"));
        }
    }

    mod contributors_tests {
        use super::*;

        #[test]
        fn should_reject_empty_contributor_list() {
            let (_dir, submission) = submission_with(&[("README.md", "Group members:\n\n")]);
            let mut grader = grader(&submission);
            grader.reject_if_missing_contributors(&ContributorsPolicy::default(), 0);
            assert!(grader.ledger().is_rejected());
        }

        #[test]
        fn should_reject_missing_readme() {
            let (_dir, submission) = submission_with(&[]);
            let mut grader = grader(&submission);
            grader.reject_if_missing_contributors(&ContributorsPolicy::default(), 0);
            assert!(grader.ledger().is_rejected());
        }

        #[test]
        fn should_reject_starter_contributor() {
            let readme = "Group members:\nAda Lovelace adalovelace@csu.fullerton.edu\n";
            let (_dir, submission) = submission_with(&[("README.md", readme)]);
            let mut grader = grader(&submission);
            let policy = ContributorsPolicy::default();
            grader.reject_if_missing_contributors(&policy, 0);
            assert!(!grader.ledger().is_rejected());
            grader.reject_if_starter_contributors(&policy, 0);
            assert!(grader.ledger().is_rejected());
        }

        #[test]
        fn should_accept_real_contributors() {
            let readme = "Group members:\nGrace Hopper ghopper@csu.fullerton.edu\n";
            let (_dir, submission) = submission_with(&[("README.md", readme)]);
            let mut grader = grader(&submission);
            let policy = ContributorsPolicy::default();
            grader.reject_if_missing_contributors(&policy, 0);
            grader.reject_if_starter_contributors(&policy, 0);
            assert!(!grader.ledger().is_rejected());
            assert_eq!(grader.ledger().results().len(), 2);
        }
    }

    mod command_tests {
        use super::*;

        #[test_log::test]
        fn should_reject_failing_build_with_output() {
            let (_dir, submission) = submission_with(&[]);
            let mut grader = grader(&submission);
            grader
                .reject_unless_command_succeeds(
                    &["sh", "-c", "echo 'poly_exp.hpp:3: error'; exit 2"],
                    0,
                )
                .unwrap();

            let ledger = grader.ledger();
            assert!(ledger.is_rejected());
            let result = &ledger.results()[0];
            assert_eq!(
                result.label,
                "command succeeds: sh -c echo 'poly_exp.hpp:3: error'; exit 2"
            );
            assert_eq!(result.detail, "exit code 2");
            assert_eq!(result.diagnostics.as_deref(), Some("poly_exp.hpp:3: error\n"));
        }

        #[test]
        fn should_pass_successful_build_inside_submission() {
            let (dir, submission) = submission_with(&[]);
            let mut grader = grader(&submission);
            grader
                .reject_unless_command_succeeds(&["touch", "built.o"], 0)
                .unwrap();
            assert!(!grader.ledger().is_rejected());
            assert!(dir.path().join("built.o").exists());
        }

        #[test]
        fn should_propagate_launch_failure() {
            let (_dir, submission) = submission_with(&[]);
            let mut grader = grader(&submission);
            let err = grader
                .reject_unless_command_succeeds(&["____invalid_command"], 0)
                .unwrap_err();
            assert!(matches!(err, HarnessError::Launch { .. }));
        }
    }

    mod string_removed_tests {
        use super::*;

        #[test]
        fn should_award_nothing_while_needle_remains() {
            let content = "// TODO a\n// TODO b\n// TODO c\n";
            let (_dir, submission) = submission_with(&[("poly_exp.hpp", content)]);
            let mut grader = grader(&submission);
            grader.string_removed_test("TODO comments removed", 3, "TODO", &["poly_exp.hpp"]);

            let ledger = grader.ledger();
            assert_eq!(ledger.earned(), 0);
            assert_eq!(ledger.possible(), 3);
            assert!(!ledger.is_rejected());
            assert_eq!(
                ledger.results()[0].detail,
                "occurrences of \"TODO\" remain (poly_exp.hpp: 3)"
            );
        }

        #[test]
        fn should_award_full_points_when_removed() {
            let (_dir, submission) =
                submission_with(&[("poly_exp.hpp", "int x;\n"), ("other.hpp", "int y;\n")]);
            let mut grader = grader(&submission);
            let files = ["poly_exp.hpp", "other.hpp"];
            grader.string_removed_test("TODO comments removed", 3, "TODO", &files);
            assert_eq!(grader.ledger().earned(), 3);
        }

        #[test]
        fn should_award_nothing_for_unreadable_file() {
            let (_dir, submission) = submission_with(&[]);
            let mut grader = grader(&submission);
            grader.string_removed_test("TODO comments removed", 3, "TODO", &["poly_exp.hpp"]);
            assert_eq!(grader.ledger().earned(), 0);
            assert_eq!(grader.ledger().results()[0].detail, "cannot read poly_exp.hpp");
        }

        #[test]
        fn should_add_up_independent_checks() {
            let (_dir, submission) = submission_with(&[("a.hpp", "done\n"), ("b.hpp", "TODO\n")]);
            let mut grader = grader(&submission);
            grader.string_removed_test("a clean", 2, "TODO", &["a.hpp"]);
            grader.string_removed_test("b clean", 5, "TODO", &["b.hpp"]);
            grader.string_removed_test("a has no FIXME", 4, "FIXME", &["a.hpp"]);

            let ledger = grader.ledger();
            let sum: u32 = ledger.results().iter().map(|r| r.points_earned).sum();
            assert_eq!(ledger.earned(), sum);
            assert_eq!(ledger.earned(), 6);
        }
    }

    #[cfg(unix)]
    mod gtest_tests {
        use super::*;

        const GTEST_OUTPUT: &str = "\
[----------] 3 tests from SmallCases
[ RUN      ] SmallCases.A
[       OK ] SmallCases.A (0 ms)
[ RUN      ] SmallCases.B
[  FAILED  ] SmallCases.B (0 ms)
[ RUN      ] SmallCases.C
[       OK ] SmallCases.C (0 ms)
";

        #[test_log::test]
        fn should_score_suites_from_last_run() {
            let (dir, submission) = submission_with(&[]);
            write_script(
                dir.path(),
                "poly_exp_test",
                &format!("cat <<'EOF'\n{GTEST_OUTPUT}EOF\nexit 1\n"),
            );
            let mut grader = grader(&submission);
            grader.gtest_run("poly_exp_test").unwrap();
            grader.gtest_suite_test("SmallCases", 3);
            grader.gtest_suite_test("LargeCases", 3);

            let ledger = grader.ledger();
            let results = ledger.results();
            assert_eq!(results[0].label, "run poly_exp_test");
            assert_eq!(results[0].detail, "exit code 1");
            assert_eq!(results[1].points_earned, 2);
            assert_eq!(results[1].detail, "2 of 3 tests passed");
            assert_eq!(results[2].points_earned, 0);
            assert_eq!(results[2].detail, "suite did not run");
            assert_eq!(ledger.earned(), 2);
            assert_eq!(ledger.possible(), 6);
        }

        #[test]
        fn should_score_zero_when_binary_is_missing() {
            let (_dir, submission) = submission_with(&[]);
            let mut grader = grader(&submission);
            grader.gtest_run("poly_exp_test").unwrap();
            grader.gtest_suite_test("SmallCases", 3);

            let ledger = grader.ledger();
            assert!(!ledger.is_rejected());
            assert_eq!(ledger.results()[0].detail, "poly_exp_test is missing or not executable");
            assert_eq!(ledger.results()[1].points_earned, 0);
        }

        #[test]
        fn should_score_zero_without_any_run() {
            let (_dir, submission) = submission_with(&[]);
            let mut grader = grader(&submission);
            grader.gtest_suite_test("SmallCases", 3);
            assert_eq!(grader.ledger().results()[0].score(), Score::zero(3));
        }

        #[test]
        fn should_use_the_most_recent_run() {
            let (dir, submission) = submission_with(&[]);
            write_script(dir.path(), "first", "echo 'SmallCases: 3 of 3 passed'\n");
            write_script(dir.path(), "second", "echo 'SmallCases: 1 of 3 passed'\n");
            let mut grader = grader(&submission);
            grader.gtest_run("first").unwrap();
            grader.gtest_run("second").unwrap();
            grader.gtest_suite_test("SmallCases", 3);
            assert_eq!(grader.ledger().results()[2].points_earned, 1);
        }
    }
}
