//! Check command - evaluate the merge gate for one pull request

use chrono::{DateTime, Utc};
use merge_gate::arbitrate::arbitrate;
use merge_gate::client::GitHubClient;
use merge_gate::collect::collect_all;
use merge_gate::error::Result;
use merge_gate::gate::evaluate;
use merge_gate::temporal::parse_instant;
use merge_gate::types::Verdict;
use tracing::{debug, info};

/// Options for the check command
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Pull request number
    pub pr: u64,
    /// API token, if any
    pub token: Option<String>,
    /// Reference instant override (defaults to now)
    pub reference: Option<String>,
}

/// Run the check command: collect, arbitrate, evaluate.
pub async fn run_check(options: &CheckOptions) -> Result<Verdict> {
    let reference = reference_instant(options.reference.as_deref())?;
    let client = GitHubClient::new(options.token.as_deref())?;

    info!(
        owner = %options.owner,
        repo = %options.repo,
        pr = options.pr,
        %reference,
        "checking merge gate"
    );

    let context = client
        .pull_request_context(&options.owner, &options.repo, options.pr)
        .await;

    let records = collect_all(&context);
    debug!(count = records.len(), "collected requirement records");

    let set = arbitrate(records);
    if set.is_empty() {
        info!("no merge requirements declared");
        return Ok(Verdict::default());
    }

    if let Some(ref date) = set.date {
        info!(value = %date.value, source = %date.source, "release date requirement");
    }
    for dependency in &set.dependencies {
        info!(value = %dependency.value, source = %dependency.source, "dependency requirement");
    }

    evaluate(&set, reference, &client).await
}

fn reference_instant(override_value: Option<&str>) -> Result<DateTime<Utc>> {
    override_value.map_or_else(
        || Ok(Utc::now()),
        |value| parse_instant(value).map(|parsed| parsed.instant),
    )
}
