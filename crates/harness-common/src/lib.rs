//! # harness-common
//!
//! Shared utilities for the chat end-to-end harness: configuration,
//! fixture identities and telemetry.

pub mod config;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{
    ConfigError, Endpoints, Environment, HarnessConfig, Identities, TestIdentity, Timeouts,
};
pub use telemetry::{
    init_tracing, init_tracing_with_config, try_init_tracing, try_init_tracing_with_config,
    TracingConfig, TracingError,
};
