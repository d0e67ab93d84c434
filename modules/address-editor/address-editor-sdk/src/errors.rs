//! Public error types for the `address-editor` module.

use thiserror::Error;

/// Why an address update did not succeed.
///
/// Exactly three kinds, split by how far the request got.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressUpdateError {
    /// The server answered with something other than 200.
    ///
    /// `message` is the server-provided detail when the body carried one,
    /// otherwise the status reason phrase.
    #[error("{message}")]
    ServerRejected { status: u16, message: String },

    /// The request was sent (or attempted) but no response arrived.
    #[error("no response from server: {reason}")]
    NoResponse { reason: String },

    /// The request could not be built; nothing was sent.
    #[error("{message}")]
    RequestConstruction { message: String },
}

impl AddressUpdateError {
    #[must_use]
    pub fn server_rejected(status: u16, message: impl Into<String>) -> Self {
        Self::ServerRejected {
            status,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn no_response(reason: impl Into<String>) -> Self {
        Self::NoResponse {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn request_construction(message: impl Into<String>) -> Self {
        Self::RequestConstruction {
            message: message.into(),
        }
    }
}
