//! Shared test fixtures

pub mod mock_provider;

use merge_gate::types::{PrState, PullRequestStatus};

/// A merged PR status
pub fn merged_status(number: u64) -> PullRequestStatus {
    PullRequestStatus {
        number,
        state: PrState::Closed,
        merged: true,
        draft: false,
        mergeable: None,
    }
}

/// An open, non-draft PR status
pub fn open_status(number: u64) -> PullRequestStatus {
    PullRequestStatus {
        number,
        state: PrState::Open,
        merged: false,
        draft: false,
        mergeable: Some(true),
    }
}

/// A closed-without-merge PR status
pub fn closed_status(number: u64) -> PullRequestStatus {
    PullRequestStatus {
        number,
        state: PrState::Closed,
        merged: false,
        draft: false,
        mergeable: None,
    }
}

/// A draft PR status
pub fn draft_status(number: u64) -> PullRequestStatus {
    PullRequestStatus {
        number,
        state: PrState::Open,
        merged: false,
        draft: true,
        mergeable: Some(true),
    }
}
