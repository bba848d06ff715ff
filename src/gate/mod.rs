//! Merge-gate evaluation
//!
//! Takes the arbitrated requirement set and produces the final verdict.
//! Per-requirement failures (bad date, bad URL, closed/draft/missing
//! dependency) become reasons on the verdict; infrastructure failures
//! (exhausted retries, rate limiting) propagate as errors so the host can
//! distinguish "cannot merge yet" from "could not evaluate".

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::arbitrate::ArbitratedSet;
use crate::client::PullRequestProvider;
use crate::error::{Error, Result};
use crate::temporal::{parse_instant, truncate_to_day, truncate_to_minute};
use crate::types::{PrState, PullRequestRef, RequirementRecord, Verdict};

/// Evaluate an arbitrated requirement set against a reference instant.
///
/// Reasons are emitted in a fixed order regardless of how the underlying
/// lookups complete: the date reason first (if any), then dependency reasons
/// in the arbitrated set's order. Dependency checks are independent; one
/// failure never short-circuits the rest.
pub async fn evaluate(
    set: &ArbitratedSet,
    reference: DateTime<Utc>,
    provider: &dyn PullRequestProvider,
) -> Result<Verdict> {
    let mut verdict = Verdict::default();

    if let Some(ref date) = set.date {
        check_date(date, reference, &mut verdict);
    }

    for dependency in &set.dependencies {
        check_dependency(dependency, provider, &mut verdict).await?;
    }

    debug!(
        can_merge = verdict.can_merge(),
        reasons = verdict.reasons.len(),
        "evaluated merge gate"
    );
    Ok(verdict)
}

/// Check the date requirement. Parse failures surface the parser's message
/// verbatim; a target strictly after the reference blocks with the remaining
/// day count.
fn check_date(record: &RequirementRecord, reference: DateTime<Utc>, verdict: &mut Verdict) {
    let parsed = match parse_instant(&record.value) {
        Ok(parsed) => parsed,
        Err(e) => {
            verdict.block(e.to_string());
            return;
        }
    };

    // Date-only expressions compare at day boundaries, timed ones at minute
    // granularity.
    let reference = if parsed.has_time {
        truncate_to_minute(reference)
    } else {
        truncate_to_day(reference)
    };

    if parsed.instant > reference {
        let days = days_remaining(parsed.instant, reference);
        verdict.block(format!(
            "Cannot merge before {} ({days} days remaining)",
            record.value
        ));
    }
}

/// Check one dependency requirement.
///
/// Recoverable outcomes (malformed URL, not found, closed-unmerged, draft)
/// land in the verdict; rate limiting and transport failures propagate.
async fn check_dependency(
    record: &RequirementRecord,
    provider: &dyn PullRequestProvider,
    verdict: &mut Verdict,
) -> Result<()> {
    let reference = match PullRequestRef::parse(&record.value) {
        Ok(reference) => reference,
        Err(e @ Error::InvalidUrl(_)) => {
            verdict.block(e.to_string());
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let status = match provider
        .fetch_status(&reference.owner, &reference.repo, reference.number)
        .await
    {
        Ok(status) => status,
        Err(e @ Error::NotFound { .. }) => {
            verdict.block(e.to_string());
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    if status.state == PrState::Closed && !status.merged {
        verdict.block(format!(
            "PR {} is closed without being merged",
            record.value
        ));
    } else if status.draft {
        verdict.block(format!("PR {} is in draft state", record.value));
    }

    Ok(())
}

/// Whole days until the target, rounded up.
fn days_remaining(target: DateTime<Utc>, reference: DateTime<Utc>) -> i64 {
    let seconds = (target - reference).num_seconds();
    seconds.div_euclid(86_400) + i64::from(seconds.rem_euclid(86_400) != 0)
}
