use crate::builder::HttpClientBuilder;
use crate::config::TransportSecurity;
use crate::error::HttpError;
use crate::request::RequestBuilder;
use crate::response::ResponseBody;
use bytes::Bytes;
use http::{Request, Response};
use http_body_util::Full;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tower::Service;
use tower::buffer::Buffer;

/// Type alias for the future type of the inner service
pub type ServiceFuture =
    Pin<Box<dyn Future<Output = Result<Response<ResponseBody>, HttpError>> + Send>>;

/// Type alias for the buffered service
pub type BufferedService = Buffer<Request<Full<Bytes>>, ServiceFuture>;

/// HTTP client over a tower service stack (timeout, user agent, decompression)
///
/// Use [`HttpClientBuilder`] to construct instances with custom configuration.
///
/// # Thread Safety
///
/// `HttpClient` is `Clone + Send + Sync`. Cloning is cheap (internal channel
/// clone), so store it directly; no `Mutex` is needed.
#[derive(Clone)]
pub struct HttpClient {
    pub(crate) service: BufferedService,
    pub(crate) max_body_size: usize,
    pub(crate) body_timeout: Duration,
    pub(crate) transport_security: TransportSecurity,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    ///
    /// # Errors
    /// Returns an error if TLS initialization fails
    pub fn new() -> Result<Self, HttpError> {
        HttpClientBuilder::new().build()
    }

    /// Create a builder for configuring the HTTP client
    #[must_use]
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::new()
    }

    /// Create a PUT request builder
    ///
    /// The URL must be absolute. Encode query parameters into it beforehand
    /// (e.g. with `url::Url::query_pairs_mut`).
    ///
    /// ```ignore
    /// let resp = client
    ///     .put("https://shop.example.com/api/address?id=42")
    ///     .json(&address)?
    ///     .send()
    ///     .await?;
    /// ```
    pub fn put(&self, url: &str) -> RequestBuilder {
        RequestBuilder::new(self.clone(), http::Method::PUT, url.to_owned())
    }
}

/// Map buffer errors to `HttpError`
///
/// Errors from the inner service come back boxed; anything else means the
/// buffer worker is gone.
pub fn map_buffer_error(err: tower::BoxError) -> HttpError {
    match err.downcast::<HttpError>() {
        Ok(http_err) => *http_err,
        Err(err) => {
            tracing::error!(
                error = %err,
                "buffer worker closed unexpectedly; service unavailable"
            );
            HttpError::ServiceClosed
        }
    }
}

/// Try to acquire a buffer slot with fail-fast semantics.
///
/// If the buffer is full, returns `HttpError::Overloaded` immediately instead
/// of waiting.
pub async fn try_acquire_buffer_slot(service: &mut BufferedService) -> Result<(), HttpError> {
    use std::task::Poll;

    let poll_result = std::future::poll_fn(|cx| match service.poll_ready(cx) {
        Poll::Ready(result) => Poll::Ready(Some(result)),
        Poll::Pending => Poll::Ready(None),
    })
    .await;

    match poll_result {
        Some(Ok(())) => Ok(()),
        Some(Err(e)) => Err(map_buffer_error(e)),
        None => Err(HttpError::Overloaded),
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::error::{ErrorStage, InvalidUriKind};
    use httpmock::prelude::*;
    use serde_json::json;

    fn test_client() -> HttpClient {
        HttpClientBuilder::new()
            .transport(TransportSecurity::AllowInsecureHttp)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_http_client_put_json() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(PUT)
                .path("/resource")
                .header("content-type", "application/json")
                .json_body(json!({"street": "Rua A", "number": 10}));
            then.status(200);
        });

        let client = test_client();
        let resp = client
            .put(&server.url("/resource"))
            .json(&json!({"street": "Rua A", "number": 10}))
            .unwrap()
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), http::StatusCode::OK);
        mock.assert();
    }

    #[tokio::test]
    async fn test_non_2xx_is_ok() {
        let server = MockServer::start();
        let _m = server.mock(|when, then| {
            when.method(PUT).path("/reject");
            then.status(422).body(r#"{"detail":"bad"}"#);
        });

        let client = test_client();
        let resp = client.put(&server.url("/reject")).send().await.unwrap();
        assert_eq!(resp.status(), http::StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_user_agent_sent() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(PUT)
                .path("/ua")
                .header("user-agent", "storefront-test/1.0");
            then.status(200);
        });

        let client = HttpClientBuilder::new()
            .transport(TransportSecurity::AllowInsecureHttp)
            .user_agent("storefront-test/1.0")
            .build()
            .unwrap();
        let resp = client.put(&server.url("/ua")).send().await.unwrap();

        assert_eq!(resp.status(), http::StatusCode::OK);
        mock.assert();
    }

    #[tokio::test]
    async fn test_timeout_is_transport_stage() {
        let server = MockServer::start();
        let _m = server.mock(|when, then| {
            when.method(PUT).path("/slow");
            then.status(200).delay(Duration::from_millis(500));
        });

        let client = HttpClientBuilder::new()
            .transport(TransportSecurity::AllowInsecureHttp)
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap();
        let err = client.put(&server.url("/slow")).send().await.unwrap_err();

        assert!(matches!(err, HttpError::Timeout(_)), "got {err:?}");
        assert_eq!(err.stage(), ErrorStage::Transport);
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_stage() {
        let client = test_client();
        // Port 1 is reserved (tcpmux) and closed on any sane test host
        let err = client.put("http://127.0.0.1:1/").send().await.unwrap_err();

        assert!(matches!(err, HttpError::Transport(_)), "got {err:?}");
        assert_eq!(err.stage(), ErrorStage::Transport);
    }

    #[tokio::test]
    async fn test_http_rejected_when_tls_only() {
        let client = HttpClient::new().unwrap();
        let err = client
            .put("http://shop.example.com/")
            .send()
            .await
            .unwrap_err();

        assert!(matches!(err, HttpError::InvalidScheme { ref scheme, .. } if scheme == "http"));
        assert_eq!(err.stage(), ErrorStage::Build);
    }

    #[tokio::test]
    async fn test_relative_url_rejected() {
        let client = test_client();
        let err = client.put("/relative/path").send().await.unwrap_err();

        assert!(matches!(
            err,
            HttpError::InvalidUri {
                kind: InvalidUriKind::MissingAuthority,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_client_is_clone_and_shared() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(PUT).path("/item");
            then.status(200);
        });

        let client = test_client();
        let other = client.clone();
        let url = server.url("/item");
        let (a, b) = tokio::join!(client.put(&url).send(), other.put(&url).send());

        assert_eq!(a.unwrap().status(), http::StatusCode::OK);
        assert_eq!(b.unwrap().status(), http::StatusCode::OK);
        mock.assert_calls(2);
    }
}
