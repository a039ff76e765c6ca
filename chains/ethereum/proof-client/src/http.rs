use crate::{
    error::TransportError,
    transport::{HttpResponse, Transport},
};
use core::time::Duration;
use surf::{http::mime, Client, Config, StatusCode, Url};

/// [`Transport`] posting requests to a JSON-RPC HTTP endpoint.
///
/// Expiry of surf's own request timeout (60 seconds unless configured with
/// [`HttpTransport::with_timeout`]) is reported as [`TransportError::Timeout`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    url: Url,
}

impl HttpTransport {
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self { client: Client::new(), url }
    }

    /// # Errors
    /// Fails if `url` is not a valid URL.
    pub fn parse(url: &str) -> Result<Self, surf::http::url::ParseError> {
        Url::parse(url).map(Self::new)
    }

    /// Uses `timeout` as the HTTP client deadline, `None` disables it.
    ///
    /// # Errors
    /// Fails if the HTTP client cannot be built.
    pub fn with_timeout(url: Url, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let client = Client::try_from(Config::new().set_timeout(timeout))
            .map_err(|error| TransportError::Io(error.to_string()))?;
        Ok(Self { client, url })
    }

    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }
}

/// surf reports its own deadline as an error carrying `408 Request Timeout`, a 408 sent by the
/// server is a regular response.
fn transport_error(error: &surf::Error) -> TransportError {
    if error.status() == StatusCode::RequestTimeout {
        TransportError::Timeout
    } else {
        TransportError::Io(error.to_string())
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn send(&self, body: String) -> Result<HttpResponse, TransportError> {
        let mut response = self
            .client
            .post(self.url.clone())
            .body_string(body)
            .content_type(mime::JSON)
            .await
            .map_err(|error| transport_error(&error))?;
        let status = u16::from(response.status());
        let body = response.body_string().await.map_err(|error| transport_error(&error))?;
        Ok(HttpResponse { status, body })
    }
}
