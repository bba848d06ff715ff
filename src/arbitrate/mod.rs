//! Requirement arbitration
//!
//! Collapses the raw requirement records gathered from every source into the
//! minimal set the gate actually evaluates: at most one date requirement and
//! a deduplicated, order-preserving list of dependency requirements.

use std::collections::HashMap;

use tracing::debug;

use crate::types::{RequirementKind, RequirementRecord};

/// The arbitrated decision set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArbitratedSet {
    /// The single surviving date requirement, if any
    pub date: Option<RequirementRecord>,
    /// Dependency requirements, deduplicated by value, first-seen order
    pub dependencies: Vec<RequirementRecord>,
}

impl ArbitratedSet {
    /// Total requirement count in the set
    pub const fn len(&self) -> usize {
        self.dependencies.len() + if self.date.is_some() { 1 } else { 0 }
    }

    /// Whether the set holds no requirements at all
    pub const fn is_empty(&self) -> bool {
        self.date.is_none() && self.dependencies.is_empty()
    }
}

/// Arbitrate raw records into a decision set. Pure and deterministic.
///
/// Dates fold left keeping a record only when its priority is strictly
/// greater than the current survivor's, so the first record seen wins ties.
/// Dependencies dedupe by value under the same strict-greater rule, and the
/// output preserves the order in which values were first seen.
pub fn arbitrate(records: Vec<RequirementRecord>) -> ArbitratedSet {
    let mut date: Option<RequirementRecord> = None;
    // value -> index into `dependencies`
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut dependencies: Vec<RequirementRecord> = Vec::new();

    for record in records {
        match record.kind {
            RequirementKind::Date => {
                let replace = date
                    .as_ref()
                    .is_none_or(|best| record.priority() > best.priority());
                if replace {
                    date = Some(record);
                }
            }
            RequirementKind::Dependency => match seen.get(&record.value) {
                Some(&index) => {
                    if record.priority() > dependencies[index].priority() {
                        dependencies[index] = record;
                    }
                }
                None => {
                    seen.insert(record.value.clone(), dependencies.len());
                    dependencies.push(record);
                }
            },
        }
    }

    debug!(
        has_date = date.is_some(),
        dependency_count = dependencies.len(),
        "arbitrated requirements"
    );

    ArbitratedSet { date, dependencies }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RequirementKind, RequirementSource};

    fn record(kind: RequirementKind, source: RequirementSource, value: &str) -> RequirementRecord {
        RequirementRecord::new(kind, source, value.to_string())
    }

    #[test]
    fn test_empty_input() {
        let set = arbitrate(Vec::new());
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn test_single_date_survives() {
        let set = arbitrate(vec![record(
            RequirementKind::Date,
            RequirementSource::Commit,
            "2025-01-01",
        )]);
        assert_eq!(set.date.unwrap().value, "2025-01-01");
    }

    #[test]
    fn test_highest_priority_date_wins() {
        let set = arbitrate(vec![
            record(RequirementKind::Date, RequirementSource::Commit, "2025-01-01"),
            record(RequirementKind::Date, RequirementSource::Label, "2025-02-02"),
            record(
                RequirementKind::Date,
                RequirementSource::Description,
                "2025-03-03",
            ),
        ]);
        let survivor = set.date.unwrap();
        assert_eq!(survivor.source, RequirementSource::Label);
        assert_eq!(survivor.value, "2025-02-02");
    }

    #[test]
    fn test_date_tie_breaks_to_first_seen() {
        // Equal top priority: the fold never replaces on equality, so the
        // first record encountered must survive.
        let set = arbitrate(vec![
            record(RequirementKind::Date, RequirementSource::Label, "2025-01-01"),
            record(RequirementKind::Date, RequirementSource::Label, "2025-02-02"),
        ]);
        assert_eq!(set.date.unwrap().value, "2025-01-01");
    }

    #[test]
    fn test_dependency_dedupe_keeps_highest_priority() {
        let url = "https://github.com/owner/repo/pull/1";
        let set = arbitrate(vec![
            record(RequirementKind::Dependency, RequirementSource::Commit, url),
            record(RequirementKind::Dependency, RequirementSource::Label, url),
        ]);
        assert_eq!(set.dependencies.len(), 1);
        assert_eq!(set.dependencies[0].source, RequirementSource::Label);
    }

    #[test]
    fn test_dependency_dedupe_ignores_lower_priority_duplicate() {
        let url = "https://github.com/owner/repo/pull/1";
        let set = arbitrate(vec![
            record(RequirementKind::Dependency, RequirementSource::Label, url),
            record(RequirementKind::Dependency, RequirementSource::Commit, url),
        ]);
        assert_eq!(set.dependencies.len(), 1);
        assert_eq!(set.dependencies[0].source, RequirementSource::Label);
    }

    #[test]
    fn test_dependencies_preserve_first_seen_order() {
        let a = "https://github.com/owner/repo/pull/1";
        let b = "https://github.com/owner/repo/pull/2";
        let c = "https://github.com/owner/repo/pull/3";
        let set = arbitrate(vec![
            record(RequirementKind::Dependency, RequirementSource::Commit, a),
            record(RequirementKind::Dependency, RequirementSource::Commit, b),
            // Duplicate of `a` at higher priority: upgrades in place, does
            // not move to the back.
            record(RequirementKind::Dependency, RequirementSource::Label, a),
            record(RequirementKind::Dependency, RequirementSource::Commit, c),
        ]);
        let values: Vec<&str> = set.dependencies.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(values, vec![a, b, c]);
        assert_eq!(set.dependencies[0].source, RequirementSource::Label);
    }

    #[test]
    fn test_output_never_larger_than_input() {
        let url = "https://github.com/owner/repo/pull/1";
        let records = vec![
            record(RequirementKind::Date, RequirementSource::Commit, "2025-01-01"),
            record(RequirementKind::Date, RequirementSource::Label, "2025-01-02"),
            record(RequirementKind::Dependency, RequirementSource::Commit, url),
            record(RequirementKind::Dependency, RequirementSource::Label, url),
        ];
        let input_len = records.len();
        let set = arbitrate(records);
        assert!(set.len() <= input_len);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_mixed_kinds_partition_cleanly() {
        let url = "https://github.com/owner/repo/pull/9";
        let set = arbitrate(vec![
            record(RequirementKind::Dependency, RequirementSource::Description, url),
            record(RequirementKind::Date, RequirementSource::Commit, "2025-06-01"),
        ]);
        assert_eq!(set.date.unwrap().value, "2025-06-01");
        assert_eq!(set.dependencies.len(), 1);
        assert_eq!(set.dependencies[0].value, url);
    }
}
