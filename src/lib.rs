//! Geolocator - IP geolocation lookup and storage service
//!
//! Resolves IP addresses through an ipstack-compatible provider, stores one
//! record per IP and serves them over a small REST API.
//!
//! # Architecture
//! - `storage`: SeaORM-backed location records (SQLite / MySQL / PostgreSQL)
//! - `services`: resolve-or-create logic and the geolocation provider
//! - `api`: HTTP handlers, health checks and middleware
//! - `config`: static configuration (TOML + environment)
//! - `runtime`: application lifecycle and execution modes
//! - `system`: logging setup
//! - `utils`: caller IP derivation

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
