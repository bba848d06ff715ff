//! Mock pull request provider for testing
//!
//! Scripted responses keyed by `owner/repo#number`, with call tracking and
//! error injection for failure-path tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use merge_gate::client::PullRequestProvider;
use merge_gate::error::{Error, Result};
use merge_gate::types::PullRequestStatus;

/// Injectable failure modes
#[derive(Debug, Clone)]
pub enum MockFailure {
    /// Respond as if the PR does not exist
    NotFound,
    /// Respond as if the quota is exhausted
    RateLimited,
    /// Respond with a generic API failure
    Api(String),
}

/// Scripted provider keyed by `owner/repo#number`
#[derive(Default)]
pub struct MockProvider {
    responses: Mutex<HashMap<String, PullRequestStatus>>,
    failures: Mutex<HashMap<String, MockFailure>>,
    fetch_calls: Mutex<Vec<String>>,
}

impl MockProvider {
    /// Create an empty mock; every lookup answers `NotFound`
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a successful status response for a PR
    pub fn respond(&self, owner: &str, repo: &str, number: u64, status: PullRequestStatus) {
        self.responses
            .lock()
            .unwrap()
            .insert(key(owner, repo, number), status);
    }

    /// Script a failure for a PR
    pub fn fail(&self, owner: &str, repo: &str, number: u64, failure: MockFailure) {
        self.failures
            .lock()
            .unwrap()
            .insert(key(owner, repo, number), failure);
    }

    /// Keys fetched so far, in call order
    pub fn fetch_calls(&self) -> Vec<String> {
        self.fetch_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PullRequestProvider for MockProvider {
    async fn fetch_status(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<PullRequestStatus> {
        let key = key(owner, repo, number);
        self.fetch_calls.lock().unwrap().push(key.clone());

        if let Some(failure) = self.failures.lock().unwrap().get(&key) {
            return Err(match failure {
                MockFailure::NotFound => Error::NotFound {
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                    number,
                },
                MockFailure::RateLimited => Error::RateLimited {
                    reset_at: Utc.timestamp_opt(1_900_000_000, 0).unwrap(),
                    remaining: 0,
                },
                MockFailure::Api(msg) => Error::GitHubApi(msg.clone()),
            });
        }

        self.responses
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .ok_or_else(|| Error::NotFound {
                owner: owner.to_string(),
                repo: repo.to_string(),
                number,
            })
    }
}

fn key(owner: &str, repo: &str, number: u64) -> String {
    format!("{owner}/{repo}#{number}")
}
