//! Parsing and validation of `frost.toml` codec configuration files.
//!
//! The configuration selects how strictly a chipdb is ingested and how
//! bitstreams are rendered. Every key is optional; an absent file means
//! [`CodecConfig::default`].

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
