//! Configuration structs

mod harness_config;
mod identities;

pub use harness_config::{ConfigError, Endpoints, Environment, HarnessConfig, Timeouts};
pub use identities::{Identities, TestIdentity, MIN_IDENTITIES};
