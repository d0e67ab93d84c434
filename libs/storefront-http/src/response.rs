use crate::error::HttpError;
use bytes::Bytes;
use http::{Response, StatusCode};
use http_body_util::BodyExt;
use std::time::Duration;

/// Type alias for the boxed response body that supports decompression.
pub type ResponseBody =
    http_body_util::combinators::BoxBody<Bytes, Box<dyn std::error::Error + Send + Sync>>;

/// HTTP response returned by [`RequestBuilder::send`](crate::RequestBuilder::send)
///
/// Body reads enforce the configured `max_body_size` on decompressed bytes
/// and give up after the request timeout.
#[derive(Debug)]
pub struct HttpResponse {
    pub(crate) inner: Response<ResponseBody>,
    pub(crate) max_body_size: usize,
    pub(crate) body_timeout: Duration,
}

impl HttpResponse {
    /// Get the response status code
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    /// Read at most `limit` bytes of the body without status check
    ///
    /// The effective limit is the smaller of `limit` and `max_body_size`.
    ///
    /// # Errors
    /// Returns `HttpError::BodyTooLarge` if the body exceeds the limit, or
    /// `HttpError::Timeout` if it does not arrive within the request timeout.
    pub async fn bytes_limited(self, limit: usize) -> Result<Bytes, HttpError> {
        let limit = limit.min(self.max_body_size);
        tokio::time::timeout(self.body_timeout, read_body_limited(self.inner, limit))
            .await
            .map_err(|_| HttpError::Timeout(self.body_timeout))?
    }
}

/// Collect the (decompressed) body, failing once more than `limit` bytes arrive.
async fn read_body_limited(
    response: Response<ResponseBody>,
    limit: usize,
) -> Result<Bytes, HttpError> {
    let mut body = std::pin::pin!(response.into_body());
    let mut collected = Vec::new();

    while let Some(frame) = body.frame().await {
        let frame = frame.map_err(HttpError::Transport)?;
        if let Some(chunk) = frame.data_ref() {
            if collected.len() + chunk.len() > limit {
                return Err(HttpError::BodyTooLarge {
                    limit,
                    actual: collected.len() + chunk.len(),
                });
            }
            collected.extend_from_slice(chunk);
        }
    }

    Ok(Bytes::from(collected))
}
