//! Errors raised while starting or running the server.

use std::io;

use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = std::result::Result<T, ServerError>;

/// Errors raised while starting or running the HTTP server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// `serve` options failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The listening socket could not be opened.
    #[error("Failed to bind to {address}: {source}")]
    BindError {
        address: String,
        #[source]
        source: io::Error,
    },

    /// The server stopped with an I/O error.
    #[error("Runtime error: {0}")]
    Runtime(#[source] io::Error),
}

impl ServerError {
    /// Wraps a validation failure, keeping its whole context chain.
    pub fn invalid_config(err: &anyhow::Error) -> Self {
        Self::InvalidConfig(format!("{err:#}"))
    }

    /// Creates a bind error for `address`.
    pub fn bind_error(address: impl ToString, source: io::Error) -> Self {
        Self::BindError {
            address: address.to_string(),
            source,
        }
    }

    /// Returns a stable code logged next to the error.
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidConfig(_) => "E001",
            Self::BindError { .. } => "E002",
            Self::Runtime(_) => "E003",
        }
    }

    /// Returns a hint for the operator, if one applies.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::InvalidConfig(_) => Some("See `pipecraft serve --help` for accepted values"),
            Self::BindError { source, .. } => match source.kind() {
                io::ErrorKind::AddrInUse => {
                    Some("The port is already in use, pass another one with --port")
                }
                io::ErrorKind::AddrNotAvailable => {
                    Some("The host address is not available on this machine, check --host")
                }
                io::ErrorKind::PermissionDenied => Some("Pick a port above 1024 with --port"),
                _ => None,
            },
            Self::Runtime(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_differ_per_variant() {
        let codes = [
            ServerError::InvalidConfig("test".to_owned()).error_code(),
            ServerError::bind_error("127.0.0.1:8000", io::Error::other("test")).error_code(),
            ServerError::Runtime(io::Error::other("test")).error_code(),
        ];

        assert_ne!(codes[0], codes[1]);
        assert_ne!(codes[1], codes[2]);
        assert_ne!(codes[0], codes[2]);
    }

    #[test]
    fn occupied_port_suggests_another_port() {
        let error = ServerError::bind_error(
            "127.0.0.1:8000",
            io::Error::new(io::ErrorKind::AddrInUse, "address in use"),
        );

        assert!(error.to_string().contains("127.0.0.1:8000"));
        assert!(error.suggestion().is_some_and(|s| s.contains("--port")));
    }

    #[test]
    fn invalid_config_keeps_the_cause() {
        let error = ServerError::invalid_config(&anyhow::anyhow!("port 80 is below 1024"));

        assert!(error.to_string().contains("port 80"));
        assert!(error.suggestion().is_some());
        assert!(ServerError::Runtime(io::Error::other("test")).suggestion().is_none());
    }
}
