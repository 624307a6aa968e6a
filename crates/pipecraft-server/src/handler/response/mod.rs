//! Response bodies shared by all handlers.

mod error_response;

pub use error_response::ErrorResponse;
