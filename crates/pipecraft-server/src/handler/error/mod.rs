//! HTTP error type returned by handlers and extractors.

mod http_error;

pub use http_error::{Error, ErrorKind, Result};
