pub mod health;
pub mod locations;

pub use health::{AppStartTime, HealthService, health_routes};
pub use locations::{ErrorCode, TrustedProxies, locations_routes};
