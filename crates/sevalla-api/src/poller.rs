//! Operation polling for asynchronously provisioned resources
//!
//! Some create calls (sites) answer with an operation id instead of the new
//! resource. This module waits for that operation to reach a terminal state
//! and hands back the id of the resource it produced, with optional progress
//! callbacks for UI updates.

use crate::cancel::CancelToken;
use crate::client::SevallaClient;
use crate::error::{Result, SevallaError};
use crate::services::operations::OperationStatus;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Default time between status checks
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Default overall deadline
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(600);

/// Polling cadence and deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_POLL_TIMEOUT,
        }
    }
}

/// Progress events emitted while waiting
#[derive(Debug, Clone, PartialEq)]
pub enum PollEvent {
    /// Waiting has begun
    Started { operation_id: String },
    /// A status check returned a non-terminal or terminal status
    Polling {
        operation_id: String,
        status: OperationStatus,
        progress: u32,
        elapsed: Duration,
    },
    /// The operation completed and produced a resource
    Completed {
        operation_id: String,
        resource_id: String,
    },
    /// The operation failed, timed out or could not be checked
    Failed { operation_id: String, error: String },
}

/// Callback type for progress updates
///
/// The CLI uses this to report status lines; the provider passes `None`.
pub type ProgressCallback = Box<dyn Fn(PollEvent) + Send + Sync>;

/// Wait for an operation to finish and return the id of the resource it
/// produced.
///
/// The first status check happens one `interval` after the call. The wait ends
/// when the operation completes or fails, when `config.timeout` elapses, or
/// when `cancel` fires. Each of those exits is final; no status check is
/// issued afterwards.
///
/// # Example
///
/// ```rust,ignore
/// use sevalla_api::{CancelToken, PollConfig, wait_for_operation};
///
/// let accepted = client.sites().create(&request, &cancel).await?;
/// let site_id = wait_for_operation(
///     &client,
///     &accepted.operation_id,
///     &PollConfig::default(),
///     &cancel,
///     Some(Box::new(|event| println!("{:?}", event))),
/// )
/// .await?;
/// let site = client.sites().get(&site_id, &cancel).await?;
/// ```
pub async fn wait_for_operation(
    client: &SevallaClient,
    operation_id: &str,
    config: &PollConfig,
    cancel: &CancelToken,
    on_progress: Option<ProgressCallback>,
) -> Result<String> {
    let operations = client.operations();
    let start = Instant::now();
    let deadline = start + config.timeout;
    let period = config.interval.max(Duration::from_millis(1));
    let mut ticker = tokio::time::interval_at(start + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    emit(
        &on_progress,
        PollEvent::Started {
            operation_id: operation_id.to_string(),
        },
    );
    debug!(operation_id, ?config, "Waiting for operation");

    let timed_out = || SevallaError::OperationTimeout {
        operation_id: operation_id.to_string(),
        timeout: config.timeout,
    };

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(SevallaError::Cancelled),
            _ = tokio::time::sleep_until(deadline) => {
                return Err(fail(&on_progress, operation_id, timed_out()));
            }
            _ = ticker.tick() => {}
        }

        let lookup = tokio::select! {
            biased;
            _ = tokio::time::sleep_until(deadline) => {
                return Err(fail(&on_progress, operation_id, timed_out()));
            }
            lookup = operations.get_status(operation_id, cancel) => lookup,
        };

        let operation = match lookup {
            Ok(operation) => operation,
            Err(SevallaError::Cancelled) => return Err(SevallaError::Cancelled),
            Err(e) => {
                let error = SevallaError::OperationStatus {
                    operation_id: operation_id.to_string(),
                    source: Box::new(e),
                };
                return Err(fail(&on_progress, operation_id, error));
            }
        };

        let status = operation.state();
        emit(
            &on_progress,
            PollEvent::Polling {
                operation_id: operation_id.to_string(),
                status,
                progress: operation.progress,
                elapsed: start.elapsed(),
            },
        );
        debug!(operation_id, %status, progress = operation.progress, "Operation status");

        match status {
            OperationStatus::Completed => {
                let Some(resource_id) = operation.produced_resource_id() else {
                    let error = SevallaError::MissingResourceId(operation_id.to_string());
                    return Err(fail(&on_progress, operation_id, error));
                };
                info!(operation_id, resource_id = %resource_id, "Operation completed");
                emit(
                    &on_progress,
                    PollEvent::Completed {
                        operation_id: operation_id.to_string(),
                        resource_id: resource_id.clone(),
                    },
                );
                return Ok(resource_id);
            }
            OperationStatus::Failed => {
                let error = SevallaError::OperationFailed {
                    operation_id: operation_id.to_string(),
                    message: operation.error.filter(|e| !e.is_empty()),
                };
                return Err(fail(&on_progress, operation_id, error));
            }
            OperationStatus::Pending | OperationStatus::Running => {}
        }
    }
}

/// Report a terminal failure and hand the error back
fn fail(
    on_progress: &Option<ProgressCallback>,
    operation_id: &str,
    error: SevallaError,
) -> SevallaError {
    warn!(operation_id, error = %error, "Operation did not complete");
    emit(
        on_progress,
        PollEvent::Failed {
            operation_id: operation_id.to_string(),
            error: error.to_string(),
        },
    );
    error
}

/// Helper to emit progress events
fn emit(callback: &Option<ProgressCallback>, event: PollEvent) {
    if let Some(cb) = callback {
        cb(event);
    }
}
