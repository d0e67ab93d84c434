//! Backend wire format: the update payload and the error body schema.

use http::StatusCode;
use serde::{Deserialize, Serialize};

use address_editor_sdk::Address;

/// JSON body of the address-update `PUT`.
#[derive(Debug, Serialize)]
pub struct AddressPayload<'a> {
    pub rua: &'a str,
    pub numero: u32,
    pub bairro: &'a str,
    pub cidade: &'a str,
    pub estado: &'a str,
    pub cep: &'a str,
    pub pais: &'a str,
    pub complemento: &'a str,
}

impl<'a> From<&'a Address> for AddressPayload<'a> {
    fn from(address: &'a Address) -> Self {
        Self {
            rua: &address.street,
            numero: address.number,
            bairro: &address.neighborhood,
            cidade: &address.city,
            estado: &address.state,
            cep: &address.postal_code,
            pais: &address.country,
            complemento: &address.complement,
        }
    }
}

/// Error body returned by the backend on rejection.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub detail: ErrorDetail,
}

/// `detail` is either a plain message or a list of validation items.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Items(Vec<ErrorItem>),
}

#[derive(Debug, Deserialize)]
pub struct ErrorItem {
    pub msg: String,
}

impl ErrorBody {
    /// Human-readable message, or `None` when the detail is blank.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        let message = match &self.detail {
            ErrorDetail::Message(text) => text.trim().to_owned(),
            ErrorDetail::Items(items) => items
                .iter()
                .map(|item| item.msg.trim())
                .filter(|msg| !msg.is_empty())
                .collect::<Vec<_>>()
                .join("; "),
        };
        (!message.is_empty()).then_some(message)
    }
}

/// Message for a rejected update: the body's `detail` when it has one,
/// else the status reason phrase, else the numeric status.
#[must_use]
pub fn rejection_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.message())
        .unwrap_or_else(|| status_text(status))
}

#[must_use]
pub fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map_or_else(|| status.as_str().to_owned(), str::to_owned)
}
