//! CLI mode
//!
//! 一次性命令：`lookup`、`config generate`。

use colored::Colorize;
use std::path::Path;

use crate::cli::{Commands, ConfigCommands};
use crate::config::{StaticConfig, get_config};
use crate::errors::{GeolocatorError, Result};
use crate::runtime::lifetime;

/// 执行一条 CLI 命令（`serve` 由 main 处理）
pub async fn run_cli_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Lookup { ip } => lookup(&ip).await,
        Commands::Config {
            action: ConfigCommands::Generate { output, force },
        } => config_generate(output.as_deref(), force),
        Commands::Serve => Err(GeolocatorError::config(
            "serve is handled by the server runtime",
        )),
    }
}

async fn lookup(ip: &str) -> Result<()> {
    let config = get_config();
    let startup = lifetime::startup::prepare_startup(&config)
        .await
        .map_err(|e| GeolocatorError::database_connection(format!("{:#}", e)))?;

    let result = startup.location_service.resolve_or_create(ip).await;
    lifetime::shutdown::close_database(startup.storage.get_db().clone()).await;

    match result {
        Ok(outcome) => {
            let status = if outcome.created {
                "created".green()
            } else {
                "existing".cyan()
            };
            eprintln!("{} {} ({})", status, outcome.record.ip, outcome.record.id);
            println!("{}", serde_json::to_string_pretty(&outcome.record)?);
            Ok(())
        }
        Err(e) => {
            if let Some(detail) = e.provider_detail() {
                println!("{}", serde_json::to_string_pretty(&detail.raw)?);
            }
            Err(e)
        }
    }
}

fn config_generate(output: Option<&str>, force: bool) -> Result<()> {
    let Some(path) = output else {
        print!("{}", StaticConfig::generate_sample_config());
        return Ok(());
    };

    if Path::new(path).exists() && !force {
        return Err(GeolocatorError::file_operation(format!(
            "{} already exists, use --force to overwrite",
            path
        )));
    }

    StaticConfig::default()
        .save_to_file(path)
        .map_err(|e| GeolocatorError::file_operation(format!("Failed to write {}: {}", path, e)))?;
    println!("{} {}", "Sample configuration written to".green(), path);
    Ok(())
}
