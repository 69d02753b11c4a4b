use anyhow::{Context, Result};
use clap::Parser;
use sevalla_api::CancelHandle;
use sevalla_provider::{Config, ProviderConfig, SevallaProvider};
use tracing::{debug, info, trace, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};
use commands::CommandContext;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if let Err(e) = run(&cli).await {
        eprintln!("Error: {}", describe(&e));
        std::process::exit(1);
    }

    Ok(())
}

/// Join the error chain, skipping causes an outer message already quotes
fn describe(error: &anyhow::Error) -> String {
    let mut message = error.to_string();
    for cause in error.chain().skip(1) {
        let cause = cause.to_string();
        if !message.contains(&cause) {
            message = format!("{}: {}", message, cause);
        }
    }
    message
}

async fn run(cli: &Cli) -> Result<()> {
    let provider_config = resolve_provider_config(cli)?;
    let provider = SevallaProvider::configure(&provider_config)?;

    let handle = CancelHandle::new();
    let ctx = CommandContext {
        provider,
        output: cli.output,
        cancel: handle.token(),
    };
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling in-flight request");
            handle.cancel();
        }
    });

    execute_command(cli, &ctx).await
}

/// Profile from the config file with command-line overrides on top
fn resolve_provider_config(cli: &Cli) -> Result<ProviderConfig> {
    let config = if let Some(config_file) = &cli.config_file {
        let path = std::path::PathBuf::from(config_file);
        debug!("Loading config from explicit path: {:?}", path);
        Config::load_from_path(&path)
    } else {
        debug!("Loading config from default location");
        Config::load()
    }
    .context("Failed to load configuration")?;

    let profile = config.resolve_profile(cli.profile.as_deref())?;
    Ok(profile.merge(ProviderConfig {
        token: cli.token.clone(),
        base_url: cli.base_url.clone(),
        ..Default::default()
    }))
}

fn init_tracing(verbose: u8) {
    // RUST_LOG wins over the verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "sevallactl=warn,sevalla_provider=warn,sevalla_api=warn",
            1 => "sevallactl=info,sevalla_provider=info,sevalla_api=info",
            2 => "sevallactl=debug,sevalla_provider=debug,sevalla_api=debug",
            _ => "sevallactl=trace,sevalla_provider=trace,sevalla_api=trace",
        };
        tracing_subscriber::EnvFilter::new(level)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .compact(),
        )
        .init();

    debug!("Tracing initialized with verbosity level: {}", verbose);
}

async fn execute_command(cli: &Cli, ctx: &CommandContext) -> Result<()> {
    trace!("Executing command: {:?}", cli.command);

    let start = std::time::Instant::now();
    let result = match &cli.command {
        Commands::Types => commands::handle_types(ctx),
        Commands::Resource(command) => {
            commands::resource::handle_resource_command(ctx, command).await
        }
        Commands::Lookup { type_name, data } => {
            commands::lookup::handle_lookup(ctx, type_name, data).await
        }
        Commands::Operation(command) => {
            commands::operation::handle_operation_command(ctx, command).await
        }
    };

    info!("Command finished in {:?}", start.elapsed());
    result
}
