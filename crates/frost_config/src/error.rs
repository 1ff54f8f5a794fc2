//! Errors raised while reading `frost.toml`.

use std::path::PathBuf;

/// Why a configuration could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// The file that was opened.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The text is not valid TOML or does not match the schema.
    #[error("invalid frost.toml: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is not usable.
    #[error("invalid value for {key}: {reason}")]
    Invalid {
        /// Dotted key, e.g. `device.chipdb`.
        key: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_error_names_the_file() {
        let err = ConfigError::Read {
            path: PathBuf::from("boards/frost.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(err.to_string(), "cannot read boards/frost.toml: no such file");
    }

    #[test]
    fn invalid_value_names_the_key() {
        let err = ConfigError::Invalid {
            key: "device.chipdb",
            reason: "must not be empty".into(),
        };
        assert_eq!(err.to_string(), "invalid value for device.chipdb: must not be empty");
    }
}
