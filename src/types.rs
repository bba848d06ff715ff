//! Core types for merge-gate

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// What kind of precondition a requirement declares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequirementKind {
    /// Do not merge before a given date
    Date,
    /// Do not merge before another PR is merged
    Dependency,
}

/// Where a requirement was declared
///
/// Sources form trust tiers: labels are curated by maintainers, descriptions
/// by the PR author, commit messages by anyone who pushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequirementSource {
    /// Found in a commit message
    Commit,
    /// Found in the PR description
    Description,
    /// Found in a PR label
    Label,
}

impl RequirementSource {
    /// Priority of this source. Higher wins during arbitration.
    pub const fn priority(self) -> u8 {
        match self {
            Self::Commit => 1,
            Self::Description => 2,
            Self::Label => 3,
        }
    }
}

impl std::fmt::Display for RequirementSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Commit => write!(f, "commit"),
            Self::Description => write!(f, "description"),
            Self::Label => write!(f, "label"),
        }
    }
}

/// A single declared merge requirement, as produced by a collector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementRecord {
    /// Requirement kind (date or dependency)
    pub kind: RequirementKind,
    /// Which source declared it
    pub source: RequirementSource,
    /// Raw declared value (date expression or PR URL)
    pub value: String,
}

impl RequirementRecord {
    /// Create a new record
    pub const fn new(kind: RequirementKind, source: RequirementSource, value: String) -> Self {
        Self {
            kind,
            source,
            value,
        }
    }

    /// Priority derived from the source (Commit=1, Description=2, Label=3)
    pub const fn priority(&self) -> u8 {
        self.source.priority()
    }
}

/// PR state as reported by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrState {
    /// PR is open
    Open,
    /// PR was closed (merged or not)
    Closed,
}

impl std::fmt::Display for PrState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Status of a dependency pull request, as fetched from the platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestStatus {
    /// PR number
    pub number: u64,
    /// Current state of the PR
    pub state: PrState,
    /// Whether the PR was merged
    pub merged: bool,
    /// Whether the PR is a draft
    pub draft: bool,
    /// Whether the PR can be merged (None while the platform is computing)
    pub mergeable: Option<bool>,
}

/// A parsed reference to a pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Pull request number
    pub number: u64,
}

impl PullRequestRef {
    /// Parse a dependency reference of the form
    /// `https://github.com/<owner>/<repo>/pull/<number>`.
    ///
    /// The host must be exactly `github.com` and the path must have exactly
    /// the owner/repo/pull/number shape. Anything else is rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = || Error::InvalidUrl(raw.to_string());

        let parsed = url::Url::parse(raw).map_err(|_| invalid())?;
        if parsed.scheme() != "https" {
            return Err(invalid());
        }
        if parsed.host_str() != Some("github.com") {
            return Err(invalid());
        }

        let segments: Vec<&str> = parsed
            .path_segments()
            .map(Iterator::collect)
            .unwrap_or_default();
        let [owner, repo, keyword, number] = segments.as_slice() else {
            return Err(invalid());
        };
        if *keyword != "pull" || owner.is_empty() || repo.is_empty() {
            return Err(invalid());
        }

        let number: u64 = number.parse().map_err(|_| invalid())?;

        Ok(Self {
            owner: (*owner).to_string(),
            repo: (*repo).to_string(),
            number,
        })
    }
}

impl std::fmt::Display for PullRequestRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

/// Outcome of a merge-gate evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verdict {
    /// Human-readable reasons the PR cannot merge yet, in deterministic order
    pub reasons: Vec<String>,
}

impl Verdict {
    /// Whether the PR may merge. True iff no reasons accumulated.
    pub fn can_merge(&self) -> bool {
        self.reasons.is_empty()
    }

    /// Append a blocking reason
    pub fn block(&mut self, reason: String) {
        self.reasons.push(reason);
    }
}
