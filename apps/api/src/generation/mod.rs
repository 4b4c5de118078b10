// Document generation: required-field check, single in-flight submission,
// and the HTTP client for the external PDF endpoint.

pub mod client;
pub mod handlers;
pub mod submit;

pub use client::{GenerationError, HttpGenerator};
pub use submit::Submitter;
