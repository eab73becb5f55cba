use thiserror::Error;
use miette::Diagnostic;

/// Errors that can occur when loading the session configuration
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The configuration text is not valid TOML or has fields of the wrong type
    #[error("Invalid session configuration: {0}")]
    #[diagnostic(
        code("CONFIG-001"),
        help("Check the configuration syntax and the spelling of every key")
    )]
    ParseError(String),

    /// A field holds a value outside of its accepted range
    #[error("Invalid value for `{key}`: {reason}")]
    #[diagnostic(code("CONFIG-002"))]
    InvalidValue {
        key: String,
        reason: String,
    },
}

// Conversion from toml::de::Error to ConfigError
impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
