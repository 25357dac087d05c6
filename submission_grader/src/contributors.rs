use serde::{Deserialize, Serialize};

/// Where the submission lists its contributors and which entries come from the starter
/// code.
///
/// # Example
/// With the default policy, a `README.md` containing
///
/// ```text
/// Group members:
///
/// Grace Hopper ghopper@csu.fullerton.edu
/// ```
///
/// lists one contributor, while the untouched starter entry
/// `Ada Lovelace adalovelace@csu.fullerton.edu` marks a submission that was never started.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(deny_unknown_fields, default)]
pub struct ContributorsPolicy {
    pub file: String,
    pub heading: String,
    pub starter_entries: Vec<String>,
}

impl Default for ContributorsPolicy {
    fn default() -> Self {
        Self {
            file: "README.md".to_string(),
            heading: "Group members:".to_string(),
            starter_entries: vec!["Ada Lovelace adalovelace@csu.fullerton.edu".to_string()],
        }
    }
}

impl ContributorsPolicy {
    /// Entries listed under the heading, or `None` when the heading is absent.
    ///
    /// The list starts after the heading line, skips leading blank lines, and ends at the
    /// first blank line or markdown heading after an entry. Bullet markers are stripped.
    pub fn entries(&self, content: &str) -> Option<Vec<String>> {
        let heading = normalize(&self.heading);
        let mut lines = content.lines();
        lines.by_ref().find(|l| normalize(l) == heading)?;

        let mut entries = vec![];
        for line in lines {
            let trimmed = line.trim();
            if trimmed.starts_with('#') {
                break;
            }
            if trimmed.is_empty() {
                if entries.is_empty() {
                    continue;
                }
                break;
            }
            let entry = trimmed.trim_start_matches(['-', '*', '+']).trim();
            if !entry.is_empty() {
                entries.push(entry.to_string());
            }
        }
        Some(entries)
    }

    /// The first entry that is still a starter placeholder.
    pub fn starter_entry<'a>(&self, entries: &'a [String]) -> Option<&'a String> {
        let starters: Vec<String> = self.starter_entries.iter().map(|s| normalize(s)).collect();
        entries
            .iter()
            .find(|e| starters.contains(&normalize(e)))
    }
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
