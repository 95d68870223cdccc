//! Backend Error Types
//!
//! Error taxonomy for the HTTP handlers. Every handler returns
//! `Result<_, ApiError>`; the `IntoResponse` impl in `conversion` turns an
//! error into a JSON body with the matching status code.

pub mod conversion;
pub mod types;

pub use types::ApiError;
