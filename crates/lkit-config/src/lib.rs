//! Harness configuration for LedgerKit.
//!
//! One parameterized [`HarnessConfig`] replaces per-environment copies of the
//! network file. It is read from an optional TOML file, overridden from the
//! environment once at startup, and then passed by value to whatever needs
//! it. Nothing in the workspace reads the environment after that point.

pub mod error;
pub mod harness;
pub mod network;

pub use error::{ConfigError, ConfigResult};
pub use harness::{HarnessConfig, DEFAULT_GAS_PRICE};
pub use network::{NetworkConfig, NetworkId};
