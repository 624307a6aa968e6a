//! Request extractors with JSON error rejections.

mod json;

pub use json::{Json, MAX_JSON_PAYLOAD_SIZE};
