//! Unified error types.

use thiserror::Error;

/// The error type returned by verso's fallible operations.
///
/// Request-time failures (401, 404, 406, ...) are expressed as HTTP
/// [`Response`](crate::Response) values, not as `Error`s. This type surfaces
/// failures while assembling an API and infrastructure failures: binding to a
/// port or accepting a connection.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid socket address `{0}`")]
    Addr(String),
}

/// A mistake in the API description, reported by the DSL call that made it.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("version `{inner}` declared inside version `{outer}`; versions cannot be nested")]
    NestedVersion { outer: String, inner: String },

    #[error("invalid version name `{0}`")]
    InvalidVersionName(String),

    #[error("unknown format `{0}`")]
    UnknownFormat(String),

    #[error("a version must respond to at least one format")]
    NoFormats,

    #[error("invalid route `{path}`: {reason}")]
    InvalidRoute { path: String, reason: String },

    #[error("invalid requirement for `{param}`: {reason}")]
    InvalidRequirement { param: String, reason: String },
}
