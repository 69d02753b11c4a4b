//! CLI structure and command definitions

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

/// Drive Sevalla resources through the provider lifecycle
#[derive(Parser, Debug)]
#[command(name = "sevallactl")]
#[command(version, about = "Sevalla resource provider CLI")]
#[command(long_about = "
Sevalla resource provider CLI

Runs the same Create/Read/Update/Delete/Import and lookup calls a
declarative host would issue, one at a time, against the Sevalla API.

EXAMPLES:
    # List the resource and lookup types
    sevallactl types

    # Create an application
    sevallactl resource create sevalla_application \\
        --data '{\"company_id\":\"co_1\",\"display_name\":\"svc-a\",\"repo_url\":\"https://github.com/acme/svc-a\"}'

    # Read it back as YAML
    sevallactl resource read sevalla_application app_123 -o yaml

    # Create a site from a file and wait for provisioning
    sevallactl resource create sevalla_site --data @site.json

    # Look up the users of a company
    sevallactl lookup sevalla_company_users --data '{\"company_id\":\"co_1\"}'

For more help on a specific command, run:
    sevallactl <command> --help
")]
pub struct Cli {
    /// Profile to use for this command
    #[arg(long, short, global = true, env = "SEVALLA_PROFILE")]
    pub profile: Option<String>,

    /// Path to alternate configuration file
    #[arg(long, global = true, env = "SEVALLA_CONFIG_FILE")]
    pub config_file: Option<String>,

    /// API token, overriding the profile and SEVALLA_TOKEN
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// API endpoint, overriding the profile and SEVALLA_BASE_URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(long, short = 'o', global = true, value_enum, default_value = "json")]
    pub output: OutputFormat,

    /// Enable verbose logging
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List registered resource and lookup types
    Types,

    /// Run one lifecycle call on a managed resource
    #[command(subcommand)]
    Resource(ResourceCommands),

    /// Run a read-only lookup
    #[command(after_help = "EXAMPLES:
    sevallactl lookup sevalla_database --data '{\"id\":\"db_9\"}'
    sevallactl lookup sevalla_company_users --data @query.json
")]
    Lookup {
        /// Lookup type name (see `sevallactl types`)
        type_name: String,

        /// Query as JSON, or @path to read it from a file
        #[arg(long)]
        data: String,
    },

    /// Asynchronous operations
    #[command(subcommand)]
    Operation(OperationCommands),
}

/// Lifecycle calls
#[derive(Subcommand, Debug)]
pub enum ResourceCommands {
    /// Create a resource from planned attributes
    #[command(after_help = "EXAMPLES:
    sevallactl resource create sevalla_pipeline --data '{\"display_name\":\"release\"}'
    sevallactl resource create sevalla_database --data @database.json
")]
    Create {
        /// Resource type name
        type_name: String,

        /// Planned attributes as JSON, or @path to read them from a file
        #[arg(long)]
        data: String,
    },

    /// Refresh a resource by id
    Read {
        /// Resource type name
        type_name: String,
        /// Platform id
        id: String,
    },

    /// Read the current state, merge the given attributes over it and update
    #[command(after_help = "EXAMPLES:
    sevallactl resource update sevalla_application app_123 --data '{\"display_name\":\"svc-b\"}'
")]
    Update {
        /// Resource type name
        type_name: String,
        /// Platform id
        id: String,

        /// Changed attributes as JSON, or @path to read them from a file
        #[arg(long)]
        data: String,
    },

    /// Delete a resource by id
    Delete {
        /// Resource type name
        type_name: String,
        /// Platform id
        id: String,
    },

    /// Adopt an existing resource by id and print its state
    Import {
        /// Resource type name
        type_name: String,
        /// Platform id
        id: String,
    },
}

/// Operation commands
#[derive(Subcommand, Debug)]
pub enum OperationCommands {
    /// Poll an operation until it completes, fails or times out
    Wait {
        /// Operation id
        id: String,

        /// Seconds between status checks
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,

        /// Seconds before giving up
        #[arg(long)]
        timeout: Option<u64>,
    },
}
