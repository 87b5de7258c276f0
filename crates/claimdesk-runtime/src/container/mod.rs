//! # Service Container
//!
//! Configuration and dependency wiring for the runtime.

pub mod config;
pub mod services;

pub use config::{ConfigError, Environment, RuntimeConfig};
pub use services::{ContainerError, ServiceContainer};
