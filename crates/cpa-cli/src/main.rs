mod actions;
mod cmd;
mod output;
mod root;

use anyhow::Context;
use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use cmd::fire::FireArgs;
use cpa_core::Config;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "cpa-logic",
    about = "Control-plane agent logic — validate manifests and run events through the engine",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from cpa.yaml)
    #[arg(long, global = true, env = "CPA_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a manifest and report names that will not resolve
    Validate {
        /// Manifest file (default: configured manifest, else built-in)
        #[arg(long)]
        manifest: Option<PathBuf>,
    },

    /// Print each event rule's action tree
    Show {
        /// Manifest file (default: configured manifest, else built-in)
        #[arg(long)]
        manifest: Option<PathBuf>,
    },

    /// List the events of the standard catalog
    Events,

    /// List the built-in actions
    Actions,

    /// Handle one event and print the resulting context
    Fire {
        /// Event name, e.g. register-connection
        event: String,

        /// Event parameter as key=value (repeatable)
        #[arg(long = "param", short = 'p', value_name = "KEY=VALUE")]
        params: Vec<String>,

        /// Initial context as a JSON object
        #[arg(long)]
        ctx: Option<String>,

        /// Manifest file (default: configured manifest, else built-in)
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// Print every action start, outcome and branch taken
        #[arg(long)]
        trace: bool,
    },

    /// Inspect the cpa.yaml configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let root = root::resolve_root(cli.root.as_deref());
    let config = Config::load(&root).context("failed to load cpa.yaml")?;
    init_logging(&config);

    match cli.command {
        Commands::Validate { manifest } => {
            cmd::validate::run(&root, &config, manifest.as_deref(), cli.json)
        }
        Commands::Show { manifest } => cmd::show::run(&root, &config, manifest.as_deref(), cli.json),
        Commands::Events => cmd::events::run(cli.json),
        Commands::Actions => cmd::actions::run(cli.json),
        Commands::Fire {
            event,
            params,
            ctx,
            manifest,
            trace,
        } => cmd::fire::run(
            &root,
            &config,
            FireArgs {
                event: &event,
                params: &params,
                ctx: ctx.as_deref(),
                manifest: manifest.as_deref(),
                trace,
            },
            cli.json,
        ),
        Commands::Config { subcommand } => cmd::config::run(&root, &config, subcommand, cli.json),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
