//! Command handlers

pub mod lookup;
pub mod operation;
pub mod resource;

use anyhow::{Context, Result};
use serde_json::{Value, json};
use sevalla_api::CancelToken;
use sevalla_provider::ConfiguredProvider;

use crate::output::{OutputFormat, print_output};

/// What every handler needs for one invocation
pub struct CommandContext {
    pub provider: ConfiguredProvider,
    pub output: OutputFormat,
    pub cancel: CancelToken,
}

impl CommandContext {
    pub fn print<T: serde::Serialize>(&self, data: T) -> Result<()> {
        print_output(data, self.output)
    }
}

pub fn handle_types(ctx: &CommandContext) -> Result<()> {
    ctx.print(json!({
        "resources": ctx.provider.resource_types(),
        "lookups": ctx.provider.data_source_types(),
    }))
}

/// Parse a `--data` argument: inline JSON, or `@path` to a JSON file
pub fn parse_data(data: &str) -> Result<Value> {
    let value: Value = if let Some(file_path) = data.strip_prefix('@') {
        let content = std::fs::read_to_string(file_path)
            .with_context(|| format!("Failed to read file: {}", file_path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON from file: {}", file_path))?
    } else {
        serde_json::from_str(data).context("Failed to parse JSON from data parameter")?
    };

    anyhow::ensure!(value.is_object(), "Data must be a JSON object");
    Ok(value)
}

/// Overlay the top-level keys of `changes` on `base`
pub fn merge_object(mut base: Value, changes: Value) -> Value {
    match (base.as_object_mut(), changes) {
        (Some(target), Value::Object(changes)) => {
            target.extend(changes);
            base
        }
        (_, changes) => changes,
    }
}
