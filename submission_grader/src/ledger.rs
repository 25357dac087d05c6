//! The scoring state of one grading run and its rendering into the final report.

use crate::score::Score;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Detail attached to every check that did not run because of an earlier rejection.
pub const SKIPPED_DETAIL: &str = "skipped — prior rejection";

/// Captured output kept on a result is cut to this many trailing lines.
const DIAGNOSTIC_TAIL_LINES: usize = 40;

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
#[serde(deny_unknown_fields)]
pub struct Assignment {
    pub id: u32,
    pub total_points: u32,
}

impl Assignment {
    pub fn new(id: u32, total_points: u32) -> Self {
        Self { id, total_points }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Passed,
    Failed,
    Skipped,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct CheckResult {
    pub label: String,
    pub points_possible: u32,
    pub points_earned: u32,
    pub detail: String,
    pub status: CheckStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<String>,
}

impl CheckResult {
    pub fn new(label: impl Into<String>, score: Score, detail: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            points_possible: score.possible,
            points_earned: score.earned,
            detail: detail.into(),
            status: if score.is_full() {
                CheckStatus::Passed
            } else {
                CheckStatus::Failed
            },
            diagnostics: None,
        }
    }

    pub fn with_status(mut self, status: CheckStatus) -> Self {
        self.status = status;
        self
    }

    /// Attaches the tail of some captured output. It ends up in the JSON report and the
    /// logs, never in the text summary.
    pub fn with_diagnostics(mut self, diagnostics: impl AsRef<str>) -> Self {
        let diagnostics = diagnostics.as_ref();
        if diagnostics.trim().is_empty() {
            return self;
        }
        let lines: Vec<&str> = diagnostics.lines().collect();
        let omitted = lines.len().saturating_sub(DIAGNOSTIC_TAIL_LINES);
        let mut tail = String::new();
        if omitted > 0 {
            let _ = writeln!(tail, "... {omitted} earlier lines omitted");
        }
        for line in &lines[omitted..] {
            let _ = writeln!(tail, "{line}");
        }
        self.diagnostics = Some(tail);
        self
    }

    pub fn score(&self) -> Score {
        Score::new(self.points_earned, self.points_possible)
    }

    /// Writes the result as exactly one report line.
    fn render(&self, out: &mut String) {
        let _ = writeln!(
            out,
            "{}: {}/{} — {}",
            single_line(&self.label),
            self.points_earned,
            self.points_possible,
            single_line(&self.detail)
        );
    }
}

/// Labels and details may carry submission text; control characters would break the
/// line structure of the report.
fn single_line(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

#[derive(Debug, PartialEq, Eq, Clone)]
enum LedgerState {
    Active,
    Rejected { by: String },
}

/// Machine-readable form of a finished run.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct GradingReport {
    pub assignment: Assignment,
    pub results: Vec<CheckResult>,
    pub earned: u32,
    pub possible: u32,
    pub rejected_by: Option<String>,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct GradingLedger {
    assignment: Assignment,
    score: Score,
    state: LedgerState,
    results: Vec<CheckResult>,
}

impl GradingLedger {
    pub fn new(assignment: Assignment) -> Self {
        Self {
            assignment,
            score: Score::default(),
            state: LedgerState::Active,
            results: vec![],
        }
    }

    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    pub fn earned(&self) -> u32 {
        self.score.earned
    }

    pub fn possible(&self) -> u32 {
        self.score.possible
    }

    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self.state, LedgerState::Rejected { .. })
    }

    /// Appends a result for a check that ran.
    pub fn record(
        &mut self,
        label: impl Into<String>,
        points_possible: u32,
        points_earned: u32,
        detail: impl Into<String>,
    ) {
        self.push(CheckResult::new(
            label,
            Score::new(points_earned, points_possible),
            detail,
        ));
    }

    /// Appends a zero-point result for a check that did not run because of a rejection.
    pub fn record_skipped(&mut self, label: impl Into<String>, points_possible: u32) {
        self.push(
            CheckResult::new(label, Score::zero(points_possible), SKIPPED_DETAIL)
                .with_status(CheckStatus::Skipped),
        );
    }

    /// Appends `result`, enforcing `earned <= possible` and that nothing is earned after a
    /// rejection.
    pub fn push(&mut self, mut result: CheckResult) {
        debug_assert!(
            result.points_earned <= result.points_possible,
            "check '{}' earned {} of {} points",
            result.label,
            result.points_earned,
            result.points_possible
        );
        if result.points_earned > result.points_possible {
            error!(
                "check '{}' earned {} of {} points, clamping",
                result.label, result.points_earned, result.points_possible
            );
            result.points_earned = result.points_possible;
        }
        if self.is_rejected() && result.points_earned > 0 {
            error!(
                "check '{}' tried to earn points after a rejection",
                result.label
            );
            result.points_earned = 0;
        }

        self.score += result.score();
        if self.score.possible > self.assignment.total_points {
            warn!(
                "possible points ({}) exceed the assignment total ({})",
                self.score.possible, self.assignment.total_points
            );
        }
        if let Some(diagnostics) = &result.diagnostics {
            debug!("captured output of '{}':\n{diagnostics}", result.label);
        }
        info!(
            "{} {}: {}/{}",
            match result.status {
                CheckStatus::Passed => "✅",
                CheckStatus::Failed => "❌",
                CheckStatus::Skipped => "⏭️ ",
            },
            result.label,
            result.points_earned,
            result.points_possible
        );
        self.results.push(result);
    }

    /// Forecloses point-earning for the rest of the run. The first rejection is kept.
    pub fn reject(&mut self, by: impl Into<String>) {
        if self.is_rejected() {
            return;
        }
        let by = by.into();
        warn!("⛔ Submission rejected by '{by}'");
        self.state = LedgerState::Rejected { by };
    }

    /// One line per recorded result, then the `TOTAL` line.
    pub fn summarize(&self) -> String {
        let mut out = String::new();
        for result in &self.results {
            result.render(&mut out);
        }
        let _ = writeln!(out, "TOTAL: {}/{}", self.score.earned, self.score.possible);
        out
    }

    pub fn to_report(&self) -> GradingReport {
        GradingReport {
            assignment: self.assignment,
            results: self.results.clone(),
            earned: self.score.earned,
            possible: self.score.possible,
            rejected_by: match &self.state {
                LedgerState::Active => None,
                LedgerState::Rejected { by } => Some(by.clone()),
            },
        }
    }
}
