//! Description and commit-message collectors
//!
//! Both sources share the same section grammar: bullet lines under a
//! `## MERGE REQUIREMENTS:` heading, scanned until the next `##` heading.
//! The scan is a small in-section/out-of-section state machine rather than
//! one big regex, so the stop-at-next-heading rule stays explicit.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{RequirementKind, RequirementRecord, RequirementSource};

const SECTION_HEADING: &str = "## MERGE REQUIREMENTS:";

static DATE_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\*\s*after:\s*(.+?)\s*$").expect("static regex must compile"));

static DEPENDENCY_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\*\s*merged:\s*(.+?)\s*$").expect("static regex must compile")
});

/// Scan a PR description body for requirement lines.
pub fn collect_from_description(body: Option<&str>) -> Vec<RequirementRecord> {
    body.map_or_else(Vec::new, |text| {
        scan_section(text, RequirementSource::Description)
    })
}

/// Scan all commit messages of a PR for requirement lines.
pub fn collect_from_commits(messages: &[String]) -> Vec<RequirementRecord> {
    messages
        .iter()
        .flat_map(|message| scan_section(message, RequirementSource::Commit))
        .collect()
}

/// Line-oriented section scanner shared by both text sources.
fn scan_section(text: &str, source: RequirementSource) -> Vec<RequirementRecord> {
    let mut records = Vec::new();
    let mut in_section = false;

    for line in text.lines() {
        if !in_section {
            if line.trim_start().starts_with(SECTION_HEADING) {
                in_section = true;
            }
            continue;
        }

        // Next heading ends the requirements section.
        if line.starts_with("##") {
            break;
        }

        if let Some(caps) = DATE_LINE_RE.captures(line) {
            records.push(RequirementRecord::new(
                RequirementKind::Date,
                source,
                caps[1].to_string(),
            ));
            continue;
        }

        if let Some(caps) = DEPENDENCY_LINE_RE.captures(line) {
            records.push(RequirementRecord::new(
                RequirementKind::Dependency,
                source,
                caps[1].to_string(),
            ));
        }
    }

    records
}
