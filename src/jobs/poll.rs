use std::future::Future;

use tokio::time::sleep;

use crate::errors::{ApiError, Result};

use super::{JobHandle, JobStatus, PollConfig};

/// Drives a submitted job to a terminal state: sleep the configured
/// interval, query status, classify, repeat. One parameterized loop
/// serves every tool; the differences live in the status closure and
/// the `PollConfig`.
///
/// Terminal outcomes:
/// - `Ok(())` when the upstream reports readiness,
/// - `Upstream` when it reports failure or an unrecognized status,
/// - `TimedOut` after exactly `max_attempts` checks with no terminal
///   answer. The attempt cap must stay tighter than the hosting
///   platform's invocation timeout.
///
/// `on_progress` receives a monotone estimate that approaches but never
/// reaches 100 until readiness. UX signal only, never a control input.
pub async fn poll_until_ready<F, Fut>(
    handle: &mut JobHandle,
    config: PollConfig,
    mut check_status: F,
    mut on_progress: impl FnMut(f64),
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<JobStatus>>,
{
    let mut progress = 10.0;

    while handle.attempts_made < config.max_attempts {
        sleep(config.interval).await;

        let status = check_status().await?;
        handle.attempts_made += 1;

        progress += (90.0 - progress) / 10.0;
        on_progress(progress);

        match status {
            JobStatus::Pending => continue,
            JobStatus::Ready => {
                on_progress(100.0);
                return Ok(());
            }
            JobStatus::Failed(reason) => {
                return Err(ApiError::Upstream(format!("job failed: {}", reason)));
            }
            JobStatus::Unknown(raw) => {
                return Err(ApiError::Upstream(format!(
                    "unrecognized job status: {}",
                    raw
                )));
            }
        }
    }

    Err(ApiError::TimedOut)
}
