use async_trait::async_trait;
use http::StatusCode;
use storefront_http::{ErrorStage, HttpClient, HttpError};
use tracing::{debug, instrument, warn};
use url::Url;

use address_editor_sdk::{Address, AddressUpdateApi, AddressUpdateError, CustomerId};

use crate::infra::wire::{self, AddressPayload};

/// HTTP adapter implementing `AddressUpdateApi` against the storefront backend.
///
/// Sends one `PUT {endpoint}?{identifier_param}={customer_id}` per call and
/// treats only `200 OK` as success.
///
/// `HttpClient` is `Clone + Send + Sync`, so no external locking is needed.
pub struct HttpAddressClient {
    client: HttpClient,
    endpoint: Url,
    identifier_param: String,
    max_error_body_size: usize,
}

impl HttpAddressClient {
    #[must_use]
    pub fn new(
        client: HttpClient,
        endpoint: Url,
        identifier_param: impl Into<String>,
        max_error_body_size: usize,
    ) -> Self {
        Self {
            client,
            endpoint,
            identifier_param: identifier_param.into(),
            max_error_body_size,
        }
    }

    /// Endpoint with the customer identifier appended as a query parameter.
    #[must_use]
    pub fn endpoint_url(&self, customer_id: &CustomerId) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair(&self.identifier_param, customer_id.as_str());
        url
    }
}

/// Sort a failed `json()`/`send()` by how far the request got. Once a status
/// is in hand the outcome is always `ServerRejected`, so it never comes here.
fn classify(err: HttpError) -> AddressUpdateError {
    match err.stage() {
        ErrorStage::Build => AddressUpdateError::request_construction(err.to_string()),
        ErrorStage::Transport => AddressUpdateError::no_response(err.to_string()),
    }
}

#[async_trait]
impl AddressUpdateApi for HttpAddressClient {
    #[instrument(
        name = "address_editor.http.update_address",
        skip_all,
        fields(endpoint = %self.endpoint)
    )]
    async fn update_address(
        &self,
        customer_id: &CustomerId,
        address: &Address,
    ) -> Result<(), AddressUpdateError> {
        let url = self.endpoint_url(customer_id);

        let response = self
            .client
            .put(url.as_str())
            .json(&AddressPayload::from(address))
            .map_err(classify)?
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "address update request failed");
                classify(e)
            })?;

        let status = response.status();
        if status == StatusCode::OK {
            debug!("address update accepted");
            return Ok(());
        }

        // The server answered; a body we cannot read in time only costs us the detail
        let message = match response.bytes_limited(self.max_error_body_size).await {
            Ok(body) => wire::rejection_message(status, &body),
            Err(e) => {
                debug!(error = %e, "could not read error body");
                wire::status_text(status)
            }
        };
        debug!(status = status.as_u16(), %message, "address update rejected");

        Err(AddressUpdateError::server_rejected(status.as_u16(), message))
    }
}
