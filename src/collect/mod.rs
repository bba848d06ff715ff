//! Requirement collectors
//!
//! Pure text scanners that turn the three declaration surfaces of a PR into
//! [`RequirementRecord`]s: labels, the description body, and commit
//! messages. Collectors never fail; a source that yields nothing produces no
//! records and the gate judges what remains.

mod label;
mod message;

pub use label::collect_from_labels;
pub use message::{collect_from_commits, collect_from_description};

use crate::client::PullRequestContext;
use crate::types::RequirementRecord;

/// Collect requirements from every source of a PR, in trust order
/// (labels, then description, then commits).
pub fn collect_all(context: &PullRequestContext) -> Vec<RequirementRecord> {
    let mut records = collect_from_labels(&context.labels);
    records.extend(collect_from_description(context.body.as_deref()));
    records.extend(collect_from_commits(&context.commit_messages));
    records
}
