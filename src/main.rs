use clap::Parser;
use colored::Colorize;

use geolocator::cli::{Cli, Commands};
use geolocator::config::{get_config, init_config_from};
use geolocator::runtime::modes::{run_cli_command, run_server};
use geolocator::system::logging::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_config_from(cli.config.as_deref());
    let config = get_config();

    match cli.command {
        None | Some(Commands::Serve) => {
            let _guard = init_logging(&config.logging)?;
            run_server().await
        }
        Some(cmd) => {
            // CLI 模式只输出警告以上的日志，避免干扰 JSON 输出
            let mut logging = config.logging.clone();
            if std::env::var_os("RUST_LOG").is_none() {
                logging.level = "warn".to_string();
            }
            let guard = init_logging(&logging)?;

            if let Err(e) = run_cli_command(cmd).await {
                drop(guard);
                eprintln!("{}", e.format_colored());
                eprintln!("{}", "Run with RUST_LOG=debug for details".dimmed());
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
