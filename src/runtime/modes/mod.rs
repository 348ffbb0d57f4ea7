//! Mode routing
//!
//! - Server mode: HTTP server (default)
//! - CLI mode: one-shot commands (`lookup`, `config generate`)

pub mod cli;
pub mod server;

pub use cli::run_cli_command;
pub use server::run_server;
