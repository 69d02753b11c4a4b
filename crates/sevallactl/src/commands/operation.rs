use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::json;
use sevalla_api::{PollConfig, PollEvent, ProgressCallback, wait_for_operation};

use super::CommandContext;
use crate::cli::OperationCommands;

pub async fn handle_operation_command(
    ctx: &CommandContext,
    command: &OperationCommands,
) -> Result<()> {
    match command {
        OperationCommands::Wait {
            id,
            interval,
            timeout,
        } => wait(ctx, id, *interval, *timeout).await,
    }
}

async fn wait(
    ctx: &CommandContext,
    operation_id: &str,
    interval: Option<u64>,
    timeout: Option<u64>,
) -> Result<()> {
    let defaults = &ctx.provider.data().poll;
    let config = PollConfig {
        interval: interval.map(Duration::from_secs).unwrap_or(defaults.interval),
        timeout: timeout.map(Duration::from_secs).unwrap_or(defaults.timeout),
    };

    let resource_id = wait_for_operation(
        ctx.provider.client(),
        operation_id,
        &config,
        &ctx.cancel,
        Some(progress_reporter()),
    )
    .await
    .with_context(|| format!("Waiting for operation {} failed", operation_id))?;

    ctx.print(json!({
        "operation_id": operation_id,
        "resource_id": resource_id,
    }))
}

/// Status lines on stderr so stdout stays machine-readable
fn progress_reporter() -> ProgressCallback {
    Box::new(|event| match event {
        PollEvent::Started { operation_id } => {
            eprintln!("Waiting for operation {}", operation_id);
        }
        PollEvent::Polling {
            status,
            progress,
            elapsed,
            ..
        } => {
            eprintln!("  {} {}% ({}s)", status, progress, elapsed.as_secs());
        }
        PollEvent::Completed { resource_id, .. } => {
            eprintln!("Completed: {}", resource_id);
        }
        PollEvent::Failed { error, .. } => {
            eprintln!("Failed: {}", error);
        }
    })
}
