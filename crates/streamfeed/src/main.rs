// SPDX-FileCopyrightText: 2026 Streamfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Streamfeed - command-line client for the activity feed API.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Streamfeed - sign tokens and call the activity feed API.
#[derive(Parser, Debug)]
#[command(name = "streamfeed", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the default locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a signed token.
    Token {
        #[command(subcommand)]
        kind: TokenCommand,
    },
    /// Print a signed click-tracking redirect URL.
    RedirectUrl {
        /// Where the user ends up after the click is recorded.
        target: String,
        /// JSON array of analytics events.
        #[arg(long, default_value = "[]")]
        events: String,
    },
    /// Fetch one page of a feed.
    Activities {
        /// Feed id in `slug:user_id` form.
        feed: String,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
        #[arg(long)]
        id_lt: Option<String>,
        #[arg(long)]
        id_gt: Option<String>,
        #[arg(long)]
        ranking: Option<String>,
        /// Mark the returned page as read.
        #[arg(long)]
        mark_read: bool,
    },
    /// Add one activity to a feed.
    Add {
        /// Feed id in `slug:user_id` form.
        feed: String,
        /// Activity as a JSON object with at least actor, verb and object.
        #[arg(long)]
        activity: String,
    },
}

#[derive(Subcommand, Debug)]
enum TokenCommand {
    /// Read-only token for a feed.
    Readonly { feed: String },
    /// Feed token with the given action, optionally limited to one resource.
    Feed {
        feed: String,
        #[arg(long, value_enum, default_value_t = ActionArg::All)]
        action: ActionArg,
        /// e.g. `feed`, `follower` or `feed_targets`.
        #[arg(long)]
        resource: Option<String>,
    },
    /// Token for one resource across the application, e.g. `redirect_and_track`.
    Resource {
        resource: String,
        #[arg(long, value_enum, default_value_t = ActionArg::All)]
        action: ActionArg,
    },
    /// Application-wide token.
    App,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ActionArg {
    Read,
    Write,
    Delete,
    All,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => streamfeed_config::load_and_validate_path(path),
        None => streamfeed_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            streamfeed_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.log.level);

    if let Err(err) = commands::run(cli.command, &config).await {
        eprintln!("streamfeed: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("streamfeed={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
