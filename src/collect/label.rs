//! Label collector
//!
//! Labels declare requirements directly in their name: `after: <date>` or
//! `merged: <url>`. They are the highest-trust source since only
//! maintainers can apply them.

use crate::types::{RequirementKind, RequirementRecord, RequirementSource};

const DATE_PREFIX: &str = "after:";
const DEPENDENCY_PREFIX: &str = "merged:";

/// Scan label names for requirement declarations.
pub fn collect_from_labels(labels: &[String]) -> Vec<RequirementRecord> {
    let mut records = Vec::new();

    for label in labels {
        let name = label.trim();

        if let Some(value) = name.strip_prefix(DATE_PREFIX) {
            records.push(RequirementRecord::new(
                RequirementKind::Date,
                RequirementSource::Label,
                value.trim().to_string(),
            ));
        }

        if let Some(value) = name.strip_prefix(DEPENDENCY_PREFIX) {
            records.push(RequirementRecord::new(
                RequirementKind::Dependency,
                RequirementSource::Label,
                value.trim().to_string(),
            ));
        }
    }

    records
}
