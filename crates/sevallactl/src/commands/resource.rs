use anyhow::{Context, Result, anyhow};
use serde_json::{Value, json};
use tracing::{debug, info};

use super::{CommandContext, merge_object, parse_data};
use crate::cli::ResourceCommands;

pub async fn handle_resource_command(ctx: &CommandContext, command: &ResourceCommands) -> Result<()> {
    match command {
        ResourceCommands::Create { type_name, data } => create(ctx, type_name, data).await,
        ResourceCommands::Read { type_name, id } => read(ctx, type_name, id).await,
        ResourceCommands::Update {
            type_name,
            id,
            data,
        } => update(ctx, type_name, id, data).await,
        ResourceCommands::Delete { type_name, id } => delete(ctx, type_name, id).await,
        ResourceCommands::Import { type_name, id } => import(ctx, type_name, id).await,
    }
}

async fn create(ctx: &CommandContext, type_name: &str, data: &str) -> Result<()> {
    let resource = ctx.provider.resource(type_name)?;
    let plan = parse_data(data)?;

    debug!(type_name, "Creating resource");
    let state = resource
        .create(plan, &ctx.cancel)
        .await
        .with_context(|| format!("Failed to create {}", type_name))?;

    ctx.print(state)
}

async fn read(ctx: &CommandContext, type_name: &str, id: &str) -> Result<()> {
    let state = current_state(ctx, type_name, id).await?;
    ctx.print(state)
}

async fn update(ctx: &CommandContext, type_name: &str, id: &str, data: &str) -> Result<()> {
    let resource = ctx.provider.resource(type_name)?;
    let changes = parse_data(data)?;

    let prior = current_state(ctx, type_name, id).await?;
    let plan = merge_object(prior.clone(), changes);

    debug!(type_name, id, "Updating resource");
    let state = resource
        .update(plan, prior, &ctx.cancel)
        .await
        .with_context(|| format!("Failed to update {} {}", type_name, id))?;

    ctx.print(state)
}

async fn delete(ctx: &CommandContext, type_name: &str, id: &str) -> Result<()> {
    let resource = ctx.provider.resource(type_name)?;
    let state = resource.import_state(id)?;

    resource
        .delete(state, &ctx.cancel)
        .await
        .with_context(|| format!("Failed to delete {} {}", type_name, id))?;

    info!(type_name, id, "Deleted");
    ctx.print(json!({"id": id, "deleted": true}))
}

async fn import(ctx: &CommandContext, type_name: &str, id: &str) -> Result<()> {
    let state = current_state(ctx, type_name, id).await?;
    info!(type_name, id, "Imported");
    ctx.print(state)
}

/// Build state from the id alone and refresh it
async fn current_state(ctx: &CommandContext, type_name: &str, id: &str) -> Result<Value> {
    let resource = ctx.provider.resource(type_name)?;
    let state = resource.import_state(id)?;

    resource
        .read(state, &ctx.cancel)
        .await
        .with_context(|| format!("Failed to read {} {}", type_name, id))?
        .ok_or_else(|| anyhow!("{} '{}' does not exist", type_name, id))
}
