//! # sealnet-core
//!
//! Configuration and logging conventions shared by every sealnet crate.
//!
//! Nothing here holds process-wide state: binaries build a [`SealnetConfig`]
//! once at startup and hand the pieces they need to the components they
//! construct.

pub mod config;
pub mod logging;

pub use config::{ConfigError, ConfigResult, SealnetConfig};
pub use logging::init_tracing;
