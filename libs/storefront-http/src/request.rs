use crate::HttpClient;
use crate::client::{map_buffer_error, try_acquire_buffer_slot};
use crate::config::TransportSecurity;
use crate::error::{HttpError, InvalidUriKind};
use crate::response::{HttpResponse, ResponseBody};
use bytes::Bytes;
use http::{Request, Response};
use http_body_util::Full;
use serde::Serialize;
use tower::Service;

/// HTTP request builder with fluent API
///
/// Created by [`HttpClient::put`](crate::HttpClient::put). Nothing is sent
/// until [`send()`](RequestBuilder::send).
#[must_use = "RequestBuilder does nothing until .send() is called"]
pub struct RequestBuilder {
    client: HttpClient,
    method: http::Method,
    url: String,
    json_body: Option<Bytes>,
}

impl RequestBuilder {
    pub(crate) fn new(client: HttpClient, method: http::Method, url: String) -> Self {
        Self {
            client,
            method,
            url,
            json_body: None,
        }
    }

    /// Set request body as JSON (`Content-Type: application/json`)
    ///
    /// # Errors
    ///
    /// Returns `HttpError::Json` if serialization fails.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, HttpError> {
        self.json_body = Some(Bytes::from(serde_json::to_vec(body)?));
        Ok(self)
    }

    /// Parse the URL and check its scheme against the transport security mode.
    fn validate_url(&self) -> Result<http::Uri, HttpError> {
        let uri: http::Uri =
            self.url
                .parse()
                .map_err(|e: http::uri::InvalidUri| HttpError::InvalidUri {
                    url: self.url.clone(),
                    kind: InvalidUriKind::ParseError,
                    reason: e.to_string(),
                })?;

        if uri.authority().is_none() {
            return Err(HttpError::InvalidUri {
                url: self.url.clone(),
                kind: InvalidUriKind::MissingAuthority,
                reason: "missing host/authority".to_owned(),
            });
        }

        match uri.scheme_str() {
            Some("https") => Ok(uri),
            Some("http") => match self.client.transport_security {
                TransportSecurity::AllowInsecureHttp => Ok(uri),
                TransportSecurity::TlsOnly => Err(HttpError::InvalidScheme {
                    scheme: "http".to_owned(),
                    reason: "HTTPS required (transport security is TlsOnly)".to_owned(),
                }),
            },
            Some(scheme) => Err(HttpError::InvalidScheme {
                scheme: scheme.to_owned(),
                reason: "only http:// and https:// schemes are supported".to_owned(),
            }),
            None => Err(HttpError::InvalidUri {
                url: self.url.clone(),
                kind: InvalidUriKind::MissingScheme,
                reason: "missing scheme".to_owned(),
            }),
        }
    }

    /// Send the request and return the response
    ///
    /// Exactly one attempt is made. Every HTTP status is returned as `Ok`;
    /// errors are always [`ErrorStage::Build`] or [`ErrorStage::Transport`].
    ///
    /// [`ErrorStage::Build`]: crate::ErrorStage::Build
    /// [`ErrorStage::Transport`]: crate::ErrorStage::Transport
    ///
    /// # Errors
    ///
    /// Returns `HttpError` if:
    /// - The URL or scheme is invalid
    /// - Network/transport error or timeout
    /// - The request buffer is full (`Overloaded`)
    pub async fn send(self) -> Result<HttpResponse, HttpError> {
        let uri = self.validate_url()?;
        let mut builder = Request::builder().method(self.method).uri(uri);
        if self.json_body.is_some() {
            builder = builder.header(http::header::CONTENT_TYPE, "application/json");
        }
        let request = builder.body(Full::new(self.json_body.unwrap_or_default()))?;

        let mut service = self.client.service;
        try_acquire_buffer_slot(&mut service).await?;

        let inner: Response<ResponseBody> =
            service.call(request).await.map_err(map_buffer_error)?;

        Ok(HttpResponse {
            inner,
            max_body_size: self.client.max_body_size,
            body_timeout: self.client.body_timeout,
        })
    }
}
