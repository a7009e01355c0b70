//! Production HTTP transport implementation using reqwest.

use super::{HttpError, HttpRequest, HttpResponse, Transport, TransportFuture};

/// Production HTTP transport using reqwest.
///
/// This is a thin wrapper around `reqwest::Client` that implements
/// the [`Transport`] trait. It inherits reqwest's default configuration
/// including connection pooling. A single attempt is made per call; the
/// in-flight request is dropped as soon as the request's context finishes.
///
/// # Example
///
/// ```no_run
/// use callback::transport::{HttpRequest, ReqwestClient, Transport};
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ReqwestClient::new();
/// let url = Url::parse("https://api.example.com/callback")?;
/// let request = HttpRequest::post(url).with_body(b"hello".to_vec());
/// let response = client.perform(request).await?;
/// println!("Status: {}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a new HTTP client with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::new(),
        }
    }

    /// Creates an HTTP client from an existing reqwest client.
    ///
    /// Useful when you need custom configuration (timeouts, TLS, proxies, etc.).
    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self { inner: client }
    }

    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut builder = self.inner.request(req.method, req.url.as_str());

        for (name, value) in &req.headers {
            builder = builder.header(name, value);
        }

        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(map_reqwest_error)?
            .to_vec();

        Ok(HttpResponse::new(status, headers, body))
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for ReqwestClient {
    fn perform(&self, req: HttpRequest) -> TransportFuture<'_> {
        Box::pin(async move {
            let context = req.context.clone();
            context.run(self.send(req)).await?
        })
    }
}

fn map_reqwest_error(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout
    } else if e.is_builder() {
        HttpError::InvalidUrl(e.to_string())
    } else {
        HttpError::connection(e)
    }
}
