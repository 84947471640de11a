// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! scout - search an Exchange catalog and extract API specifications.
//!
//! This is the binary entry point. Results are printed to stdout as JSON,
//! logs go to stderr.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod commands;

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use clap::{Args, Parser, Subcommand};
use scout_core::AssetIdentity;
use scout_exchange::ExchangeEngine;
use scout_security::RedactingWriter;
use secrecy::ExposeSecret;
use tracing::error;

/// scout - search an Exchange catalog and extract API specifications.
#[derive(Parser, Debug)]
#[command(name = "scout", version, about, long_about = None)]
struct Cli {
    /// Configuration file to load instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// An asset coordinate on the command line.
#[derive(Args, Debug, Clone)]
struct AssetArgs {
    /// Group (organization) that owns the asset.
    group_id: String,
    /// Asset identifier within the group.
    asset_id: String,
    /// Asset version; resolved from the catalog when omitted.
    #[arg(long)]
    version: Option<String>,
}

impl AssetArgs {
    fn identity(&self) -> AssetIdentity {
        let identity = AssetIdentity::new(&self.group_id, &self.asset_id);
        match &self.version {
            Some(version) => identity.with_version(version.clone()),
            None => identity,
        }
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Full-text search over the catalog.
    Search {
        term: String,
        /// Asset type to include (repeatable). Defaults to `search.default_types`.
        #[arg(long = "type")]
        types: Vec<String>,
    },
    /// API assets mentioning a category keyword.
    Category { category: String },
    /// Details of one asset version.
    Details(AssetArgs),
    /// The interface specification of an asset.
    Spec(AssetArgs),
    /// Files declared on an asset version.
    Files(AssetArgs),
    /// Content of one file of an asset version.
    File {
        #[command(flatten)]
        asset: AssetArgs,
        /// Path of the file below the version's files endpoint.
        path: String,
    },
    /// Endpoint summary of an asset's specification.
    Analyze(AssetArgs),
    /// Every API asset.
    Apis,
    /// Every connector asset.
    Connectors,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => scout_config::load_and_validate_path(path),
        None => scout_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            scout_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let known_secrets = Arc::new(RwLock::new(Vec::new()));
    if let Some(secret) = &config.exchange.client_secret {
        RedactingWriter::<std::io::Stderr>::add_known_value(&known_secrets, secret.clone());
    }
    init_tracing(&config.logging.level, known_secrets.clone());

    let engine = match ExchangeEngine::from_config(&config) {
        Ok(engine) => engine,
        Err(e) => {
            error!(error = %e, "engine setup failed");
            eprintln!("scout: {e}");
            std::process::exit(1);
        }
    };

    match engine.authenticate().await {
        Ok(session) => {
            if let Some(token) = session.token() {
                RedactingWriter::<std::io::Stderr>::add_known_value(
                    &known_secrets,
                    token.expose_secret().to_owned(),
                );
            }
        }
        Err(e) => {
            error!(error = %e, "initial authentication failed");
            eprintln!("scout: {e}");
            std::process::exit(1);
        }
    }

    let code = commands::run(&engine, &config, cli.command).await;
    std::process::exit(code);
}

/// Installs the stderr subscriber. Every line passes through secret redaction.
fn init_tracing(log_level: &str, known_secrets: Arc<RwLock<Vec<String>>>) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("scout={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(move || RedactingWriter::new(std::io::stderr(), known_secrets.clone()))
        .init();
}
