//! Gateway domain: configuration, error mapping and route tiers.

pub mod config;
pub mod error;
pub mod tiers;

pub use config::{
    ConfigError, CorsConfig, GatewayConfig, HttpConfig, LimitsConfig, TimeoutConfig,
    DEFAULT_MAX_REQUEST_SIZE,
};
pub use error::{ApiError, GatewayError, INTERNAL_ERROR_MESSAGE};
pub use tiers::{route_tier, RouteTier};
