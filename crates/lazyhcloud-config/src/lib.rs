//! Configuration for lazyhcloud
//!
//! Holds the named project credentials, the default-project marker and a few
//! user defaults. Stored as TOML at `~/.config/lazyhcloud/config.toml`.

mod config;
mod error;

pub use config::*;
pub use error::*;
