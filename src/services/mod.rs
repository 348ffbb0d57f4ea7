//! Service layer for business logic
//!
//! Shared between the HTTP API and the CLI `lookup` command.

pub mod geoip;
mod location_service;

pub use geoip::{GeolocationPayload, GeolocationProvider, IpstackProvider};
pub use location_service::{LocationService, ResolveOutcome};
