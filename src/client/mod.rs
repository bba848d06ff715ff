//! Resilient GitHub client
//!
//! Fetches dependency PR status through the REST API with an in-process TTL
//! cache, rate-limit detection, and bounded exponential-backoff retry.
//!
//! The client talks raw REST via `reqwest` because the rate-limit protocol
//! needs the `x-ratelimit-remaining` / `x-ratelimit-reset` response headers,
//! which typed API wrappers do not expose.

mod cache;

pub use cache::TtlCache;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::{Client, Response, StatusCode, header};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::types::{PrState, PullRequestStatus};

/// Total attempts per fetch, including the first.
const MAX_ATTEMPTS: u32 = 3;
/// Base backoff delay.
const BASE_DELAY: Duration = Duration::from_millis(1000);
/// Backoff ceiling.
const MAX_DELAY: Duration = Duration::from_millis(10_000);

/// TTL for merged PRs: effectively immutable.
const TTL_MERGED: Duration = Duration::from_secs(5 * 60);
/// TTL for closed-unmerged PRs: near-immutable, may be reopened.
const TTL_CLOSED: Duration = Duration::from_secs(60);
/// TTL for open PRs: these change frequently.
const TTL_OPEN: Duration = Duration::from_secs(30);

/// Quota floor: at or below this, surface `RateLimited` instead of the result.
const RATE_LIMIT_FLOOR: u32 = 1;

/// Source of dependency PR status
///
/// The evaluator only needs this one lookup, so the seam is a single-method
/// trait. Tests substitute a scripted implementation.
#[async_trait]
pub trait PullRequestProvider: Send + Sync {
    /// Fetch the status of `owner/repo#number`.
    async fn fetch_status(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<PullRequestStatus>;
}

#[derive(Deserialize)]
struct PullResponse {
    number: u64,
    state: PrState,
    #[serde(default)]
    merged: bool,
    #[serde(default)]
    draft: bool,
    mergeable: Option<bool>,
}

#[derive(Deserialize)]
struct LabelResponse {
    name: String,
}

#[derive(Deserialize)]
struct CommitEntry {
    commit: CommitDetail,
}

#[derive(Deserialize)]
struct CommitDetail {
    message: String,
}

/// Raw inputs for the requirement collectors, fetched in one round
#[derive(Debug, Clone, Default)]
pub struct PullRequestContext {
    /// Label names on the PR
    pub labels: Vec<String>,
    /// PR description body
    pub body: Option<String>,
    /// Full commit messages in the PR
    pub commit_messages: Vec<String>,
}

/// GitHub REST client with caching and retry
pub struct GitHubClient {
    http: Client,
    token: Option<String>,
    api_base: String,
    cache: TtlCache<PullRequestStatus>,
    ttl_override: Option<Duration>,
}

impl GitHubClient {
    /// Create a new client.
    ///
    /// Without a token the client still works against public repositories,
    /// at the much lower unauthenticated quota.
    pub fn new(token: Option<&str>) -> Result<Self> {
        let http = Client::builder()
            .user_agent("merge-gate")
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            token: token.map(ToString::to_string),
            api_base: "https://api.github.com".to_string(),
            cache: TtlCache::new(TTL_OPEN),
            ttl_override: None,
        })
    }

    /// Override the API base URL (for tests against a local server).
    #[must_use]
    pub fn with_api_base(mut self, base: &str) -> Self {
        self.api_base = base.trim_end_matches('/').to_string();
        self
    }

    /// Override the state-derived cache TTL (for tests exercising expiry).
    #[must_use]
    pub const fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.ttl_override = Some(ttl);
        self
    }

    /// Drop expired cache entries.
    pub fn sweep_cache(&self) {
        self.cache.sweep();
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let mut request = self
            .http
            .get(url)
            .header(header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");
        if let Some(ref token) = self.token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        request
    }

    /// One remote attempt. Terminal outcomes (404, 403, quota floor) come
    /// back as non-transient errors; everything else is retryable.
    async fn fetch_once(&self, owner: &str, repo: &str, number: u64) -> Result<PullRequestStatus> {
        let url = format!("{}/repos/{owner}/{repo}/pulls/{number}", self.api_base);
        let response = self.get(&url).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(Error::NotFound {
                owner: owner.to_string(),
                repo: repo.to_string(),
                number,
            }),
            StatusCode::FORBIDDEN => {
                let reset_at = rate_limit_reset(&response);
                Err(Error::RateLimited {
                    reset_at,
                    remaining: 0,
                })
            }
            status if !status.is_success() => Err(Error::GitHubApi(format!(
                "unexpected status {status} fetching {owner}/{repo}#{number}"
            ))),
            _ => {
                let remaining = rate_limit_remaining(&response);
                let reset_at = rate_limit_reset(&response);

                let pull: PullResponse = response
                    .json()
                    .await
                    .map_err(|e| Error::GitHubApi(format!("Failed to parse PR response: {e}")))?;

                let status = PullRequestStatus {
                    number: pull.number,
                    state: pull.state,
                    merged: pull.merged,
                    draft: pull.draft,
                    mergeable: pull.mergeable,
                };

                // Cache before reporting quota exhaustion so a concurrent
                // caller does not re-trigger the call.
                let ttl = self.ttl_override.unwrap_or_else(|| ttl_for(&status));
                let key = cache_key(owner, repo, number);
                self.cache.set_with_ttl(&key, status.clone(), ttl);

                if remaining.is_some_and(|r| r <= RATE_LIMIT_FLOOR) {
                    let remaining = remaining.unwrap_or(0);
                    warn!(remaining, %reset_at, "rate limit nearly exhausted");
                    return Err(Error::RateLimited {
                        reset_at,
                        remaining,
                    });
                }

                Ok(status)
            }
        }
    }
}

#[async_trait]
impl PullRequestProvider for GitHubClient {
    async fn fetch_status(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<PullRequestStatus> {
        let key = cache_key(owner, repo, number);
        if let Some(cached) = self.cache.get(&key) {
            debug!(%key, "cache hit");
            return Ok(cached);
        }

        let mut attempt = 0;
        loop {
            match self.fetch_once(owner, repo, number).await {
                Ok(status) => {
                    debug!(%key, state = %status.state, "fetched PR status");
                    return Ok(status);
                }
                Err(e) if e.is_transient() => {
                    attempt += 1;
                    if attempt >= MAX_ATTEMPTS {
                        return Err(e);
                    }
                    let delay = backoff_delay(attempt);
                    warn!(%key, attempt, delay_ms = delay.as_millis() as u64, error = %e, "retrying after transient error");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl GitHubClient {
    /// Fetch the raw collector inputs for a PR: labels, description body,
    /// and commit messages.
    ///
    /// Single attempt per endpoint, and a source that cannot be read
    /// contributes nothing instead of failing the run; the gate then judges
    /// whatever was collected.
    pub async fn pull_request_context(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> PullRequestContext {
        let base = &self.api_base;

        let pull_url = format!("{base}/repos/{owner}/{repo}/pulls/{number}");
        let labels_url = format!("{base}/repos/{owner}/{repo}/issues/{number}/labels");
        let commits_url = format!("{base}/repos/{owner}/{repo}/pulls/{number}/commits");

        #[derive(Default, Deserialize)]
        struct PullBody {
            body: Option<String>,
        }

        let pull: PullBody = self.source_or_empty(&pull_url).await;
        let labels: Vec<LabelResponse> = self.source_or_empty(&labels_url).await;
        let commits: Vec<CommitEntry> = self.source_or_empty(&commits_url).await;

        PullRequestContext {
            labels: labels.into_iter().map(|l| l.name).collect(),
            body: pull.body,
            commit_messages: commits.into_iter().map(|c| c.commit.message).collect(),
        }
    }

    async fn source_or_empty<T: serde::de::DeserializeOwned + Default>(&self, url: &str) -> T {
        match self.fetch_json(url).await {
            Ok(value) => value,
            Err(e) => {
                warn!(%url, error = %e, "requirement source unreadable, treating as empty");
                T::default()
            }
        }
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::GitHubApi(format!("not found: {url}")));
        }
        if !response.status().is_success() {
            return Err(Error::GitHubApi(format!(
                "unexpected status {} fetching {url}",
                response.status()
            )));
        }
        response
            .json()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to parse response from {url}: {e}")))
    }
}

fn cache_key(owner: &str, repo: &str, number: u64) -> String {
    format!("{owner}/{repo}#{number}")
}

/// TTL by state: merged > closed-unmerged > open, longest to shortest.
const fn ttl_for(status: &PullRequestStatus) -> Duration {
    if status.merged {
        TTL_MERGED
    } else if matches!(status.state, PrState::Closed) {
        TTL_CLOSED
    } else {
        TTL_OPEN
    }
}

/// Delay before retry `attempt` (1-based): 2s, 4s, 8s, capped at 10s.
fn backoff_delay(attempt: u32) -> Duration {
    let exp = BASE_DELAY.saturating_mul(2u32.saturating_pow(attempt));
    exp.min(MAX_DELAY)
}

fn rate_limit_remaining(response: &Response) -> Option<u32> {
    response
        .headers()
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

fn rate_limit_reset(response: &Response) -> DateTime<Utc> {
    response
        .headers()
        .get("x-ratelimit-reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<i64>().ok())
        .and_then(|epoch| Utc.timestamp_opt(epoch, 0).single())
        .unwrap_or_else(Utc::now)
}
