// Poller - the driver-side half of element resolution
//
// Calls the resolver repeatedly until it gives the same kind of answer twice,
// at least the dwell time apart, or until the deadline passes. Transient
// states (an element mid-animation, a list still rendering) therefore never
// leak into a test as a false pass.

use crate::chain::Chain;
use crate::error::{Error, Result};
use crate::executor::{RemoteExecutor, ResolveRequest};
use crate::options::{FinderConfig, ResolveOptions};
use crate::outcome::{ResolutionOutcome, Resolved};
use std::time::Duration;
use tokio::time::Instant;

/// Attempt times beyond this count are elided in timeout messages
const MAX_LISTED_ATTEMPTS: usize = 6;

/// Polls `executor` until `chain` resolves stably or `timeout` elapses.
///
/// An outcome is accepted once a successful outcome is observed at least
/// `config.dwell` after the first success of the current streak. Any failure
/// (from the resolver or from the execution boundary) ends the streak.
///
/// The deadline is checked after every attempt; an attempt that completes
/// after the deadline is discarded even if it would have been accepted.
///
/// # Errors
///
/// - [`Error::FindTimeout`] when no stable outcome was seen in time. The
///   message carries the last failure reason.
/// - [`Error::UnexpectedOutcome`] as soon as the resolver answers with an
///   element to a want-zero or scroll request, or confirms absence when an
///   element was wanted, or the executor reports an undecodable answer.
pub async fn poll_until_stable<E>(
    executor: &E,
    chain: &Chain,
    timeout: Duration,
    description: &str,
    options: &ResolveOptions,
    config: &FinderConfig,
) -> Result<Resolved<E::Handle>>
where
    E: RemoteExecutor + ?Sized,
{
    let request = ResolveRequest::new(chain, options.clone());
    let unstable = unstable_reason(options, config.dwell);
    let start = Instant::now();
    let deadline = start + timeout;

    let mut failure = "Failure reason unknown".to_string();
    let mut ok_since: Option<Instant> = None;
    let mut attempt_times: Vec<u128> = Vec::new();

    loop {
        let result = executor.execute(&request).await;
        let returned_at = Instant::now();
        attempt_times.push(returned_at.duration_since(start).as_millis());

        let accepted = match result {
            Ok(ResolutionOutcome::Failed(reason)) => {
                ok_since = None;
                failure = reason;
                None
            }
            Ok(outcome) => {
                let resolved = expected_resolution(outcome, options)?;
                match ok_since {
                    Some(since) if returned_at.duration_since(since) >= config.dwell => {
                        Some(resolved)
                    }
                    Some(_) => None,
                    None => {
                        ok_since = Some(returned_at);
                        failure = unstable.clone();
                        None
                    }
                }
            }
            Err(e @ Error::UnexpectedOutcome(_)) => return Err(e),
            Err(e) => {
                ok_since = None;
                failure = e.to_string();
                None
            }
        };

        tracing::debug!(
            attempt = attempt_times.len(),
            accepted = accepted.is_some(),
            "Resolving {}",
            description
        );

        if returned_at >= deadline {
            let attempt_times = format_attempt_times(&attempt_times);
            tracing::warn!("Failed to find {}: {}", description, failure);
            tracing::warn!(
                "Resolution tried {} times at: [{}]",
                attempt_times.0,
                attempt_times.1
            );
            return Err(Error::FindTimeout {
                description: description.to_string(),
                reason: failure,
                attempts: attempt_times.0,
                attempt_times: attempt_times.1,
            });
        }
        if let Some(resolved) = accepted {
            return Ok(resolved);
        }

        tokio::time::sleep(config.poll_interval).await;
    }
}

fn unstable_reason(options: &ResolveOptions, dwell: Duration) -> String {
    if options.want_zero {
        format!(
            "Element was unseen, but must be unseen for at least {}s",
            dwell.as_secs_f64()
        )
    } else {
        format!(
            "Element found, but must remain visible for at least {}s",
            dwell.as_secs_f64()
        )
    }
}

// A success outcome of the kind the request asked for.
fn expected_resolution<H>(outcome: ResolutionOutcome<H>, options: &ResolveOptions) -> Result<Resolved<H>> {
    match (outcome, options.expects_confirmation()) {
        (ResolutionOutcome::Found(handle), false) => Ok(Resolved::Element(handle)),
        (ResolutionOutcome::ConfirmedAbsent, true) => Ok(Resolved::Confirmed),
        (ResolutionOutcome::Found(_), true) => Err(Error::UnexpectedOutcome(
            "an element was returned for a want-zero or scroll request".to_string(),
        )),
        (ResolutionOutcome::ConfirmedAbsent, false) => Err(Error::UnexpectedOutcome(
            "absence was confirmed but an element was requested".to_string(),
        )),
        (ResolutionOutcome::Failed(reason), _) => Err(Error::UnexpectedOutcome(format!(
            "failure treated as success: {}",
            reason
        ))),
    }
}

/// `(count, "t0, t1, t2, ..., tn-2, tn-1, tn")`
fn format_attempt_times(times: &[u128]) -> (usize, String) {
    let listed: Vec<String> = if times.len() > MAX_LISTED_ATTEMPTS {
        let half = MAX_LISTED_ATTEMPTS / 2;
        times[..half]
            .iter()
            .map(u128::to_string)
            .chain(std::iter::once("...".to_string()))
            .chain(times[times.len() - half..].iter().map(u128::to_string))
            .collect()
    } else {
        times.iter().map(u128::to_string).collect()
    };
    (times.len(), listed.join(", "))
}
