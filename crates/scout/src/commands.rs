// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subcommand dispatch and JSON output.

use scout_config::ScoutConfig;
use scout_exchange::ExchangeEngine;
use serde::Serialize;
use serde_json::json;

use crate::Commands;

/// Exit code when the requested asset, file, or specification was not found.
pub(crate) const EXIT_NOT_FOUND: i32 = 2;

/// Runs one subcommand and returns the process exit code.
pub(crate) async fn run(engine: &ExchangeEngine, config: &ScoutConfig, command: Commands) -> i32 {
    match command {
        Commands::Search { term, types } => {
            let types = if types.is_empty() {
                config.search.default_types.clone()
            } else {
                types
            };
            print_json(&engine.search(&term, &types).await)
        }
        Commands::Category { category } => print_json(&engine.find_by_category(&category).await),
        Commands::Details(asset) => print_found(engine.asset_details(&asset.identity()).await),
        Commands::Spec(asset) => print_found(engine.specification(&asset.identity()).await),
        Commands::Files(asset) => print_found(engine.list_files(&asset.identity()).await),
        Commands::File { asset, path } => {
            let content = engine.file_content(&asset.identity(), &path).await;
            print_found(content.map(|content| json!({ "path": path, "content": content })))
        }
        Commands::Analyze(asset) => print_found(engine.analyze_endpoints(&asset.identity()).await),
        Commands::Apis => print_json(&engine.list_apis().await),
        Commands::Connectors => print_json(&engine.list_connectors().await),
    }
}

fn print_found<T: Serialize>(value: Option<T>) -> i32 {
    match value {
        Some(value) => print_json(&value),
        None => {
            println!("null");
            EXIT_NOT_FOUND
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(rendered) => {
            println!("{rendered}");
            0
        }
        Err(e) => {
            eprintln!("scout: failed to render output: {e}");
            1
        }
    }
}
