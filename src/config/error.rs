use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced while loading or validating configuration.
pub enum ConfigError {
    /// The port value could not be parsed as a number.
    #[error("invalid port value '{value}': {source}")]
    PortParseError {
        /// Raw environment value.
        value: String,
        /// Parse failure.
        source: std::num::ParseIntError,
    },

    /// The port value was out of range (zero).
    #[error("invalid port: '{value}' (must be 1-65535)")]
    InvalidPort {
        /// Raw environment value.
        value: String,
    },

    /// The bind address could not be parsed.
    #[error("invalid bind address '{value}': {source}")]
    InvalidBindAddr {
        /// Raw environment value.
        value: String,
        /// Parse failure.
        source: std::net::AddrParseError,
    },

    /// A required URL setting was empty.
    #[error("{setting} must not be empty")]
    EmptyUrl {
        /// Name of the offending setting.
        setting: &'static str,
    },

    /// A capacity setting was zero.
    #[error("{setting} must be greater than zero")]
    ZeroCapacity {
        /// Name of the offending setting.
        setting: &'static str,
    },
}
