//! Extraction of per-suite results from GoogleTest text output.
//!
//! The parser never fails. Lines it does not recognize are ignored, and a suite that
//! does not appear in the output is reported as `0 of 0`.

use regex::Regex;
use std::{collections::BTreeSet, sync::LazyLock};

static CASE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\[\s*(RUN|OK|FAILED)\s*\]\s+([A-Za-z0-9_/]+)\.(\S+)").unwrap()
});
static SUITE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\[-+\]\s+(\d+)\s+tests?\s+from\s+([A-Za-z0-9_/]+)\s*$").unwrap()
});
static SUMMARY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z0-9_/]+)\s*:\s*(\d+)\s+of\s+(\d+)\s+passed").unwrap()
});

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct SuiteCounts {
    pub passed: u32,
    pub total: u32,
}

#[derive(Default)]
struct SuiteScan {
    seen: bool,
    declared: u32,
    cases: BTreeSet<String>,
    ok: BTreeSet<String>,
    failed: BTreeSet<String>,
    summary: Option<SuiteCounts>,
}

fn scan(output: &str, suite: &str) -> SuiteScan {
    let mut scan = SuiteScan::default();
    for line in output.lines() {
        if let Some(caps) = CASE_LINE.captures(line) {
            if &caps[2] != suite {
                continue;
            }
            scan.seen = true;
            let case = caps[3].to_string();
            match &caps[1] {
                "OK" => {
                    scan.ok.insert(case.clone());
                }
                "FAILED" => {
                    scan.failed.insert(case.clone());
                }
                _ => {}
            }
            scan.cases.insert(case);
        } else if let Some(caps) = SUITE_HEADER.captures(line) {
            if &caps[2] == suite {
                scan.seen = true;
                // Overflowing counts are garbage; keep whatever was declared before.
                if let Ok(n) = caps[1].parse::<u32>() {
                    scan.declared = scan.declared.max(n);
                }
            }
        } else if let Some(caps) = SUMMARY_LINE.captures(line) {
            if &caps[1] == suite {
                if let (Ok(passed), Ok(total)) = (caps[2].parse(), caps[3].parse()) {
                    scan.seen = true;
                    scan.summary = Some(SuiteCounts { passed, total });
                }
            }
        }
    }
    scan
}

/// Whether `suite` left any trace in `output`.
pub fn suite_ran(output: &str, suite: &str) -> bool {
    scan(output, suite).seen
}

/// Passed and total case counts of `suite`.
///
/// The total is the larger of the declared case count and the number of distinct cases
/// seen, so cases that never ran because the binary crashed still count as failures.
pub fn extract_suite_counts(output: &str, suite: &str) -> SuiteCounts {
    let scan = scan(output, suite);
    let observed_total = u32::try_from(scan.cases.len()).unwrap_or(u32::MAX);
    let observed_passed =
        u32::try_from(scan.ok.difference(&scan.failed).count()).unwrap_or(u32::MAX);

    let mut counts = SuiteCounts {
        passed: observed_passed,
        total: observed_total.max(scan.declared),
    };
    if observed_total == 0 && scan.declared == 0 {
        if let Some(summary) = scan.summary {
            counts = summary;
        }
    }
    counts.passed = counts.passed.min(counts.total);
    counts
}
