//! merge-gate: gate PR merges behind declared release dates and
//! prerequisite PRs
//!
//! Requirements are declared on the pull request itself, in three places
//! with different trust levels: labels (`after: <date>`,
//! `merged: <url>`), bullet lines under a `## MERGE REQUIREMENTS:` heading
//! in the description, and the same grammar in commit messages.
//!
//! The pipeline is one-way: collectors produce raw
//! [`types::RequirementRecord`]s, [`arbitrate::arbitrate`] collapses them
//! into a minimal decision set, and [`gate::evaluate`] resolves that set
//! against the clock and the remote platform into a
//! [`types::Verdict`].

pub mod arbitrate;
pub mod client;
pub mod collect;
pub mod error;
pub mod gate;
pub mod temporal;
pub mod types;
