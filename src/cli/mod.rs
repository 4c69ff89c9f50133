//! CLI command handlers for LazyPad.
//!
//! This module provides headless, scriptable access to LazyPad's core
//! functionality for automation, testing, and CI/CD integration.

pub mod common;
pub mod convert;
pub mod device;
pub mod inspect;
pub mod ports;
pub mod pull;
pub mod push;
pub mod validate;

// Re-export types used by main.rs and tests
pub use common::ExitCode;
pub use convert::ConvertArgs;
pub use device::DeviceArgs;
pub use inspect::InspectArgs;
pub use ports::PortsArgs;
pub use pull::PullArgs;
pub use push::PushArgs;
pub use validate::ValidateArgs;
