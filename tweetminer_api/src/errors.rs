//! Error types for the tier client.

/// Errors that can occur when calling a search tier.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An HTTP request failed (network error, timeout, or undecodable response).
    #[error("request failed")]
    RequestFailed,
    /// The tier returned a non-success status with a body snippet.
    #[error("request failed with status {status}")]
    HttpStatus { status: u16, body: String },
}
