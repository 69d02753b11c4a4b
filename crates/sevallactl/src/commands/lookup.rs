use anyhow::{Context, Result};
use tracing::debug;

use super::{CommandContext, parse_data};

pub async fn handle_lookup(ctx: &CommandContext, type_name: &str, data: &str) -> Result<()> {
    let data_source = ctx.provider.data_source(type_name)?;
    let query = parse_data(data)?;

    debug!(type_name, "Running lookup");
    let result = data_source
        .read(query, &ctx.cancel)
        .await
        .with_context(|| format!("Lookup {} failed", type_name))?;

    ctx.print(result)
}
