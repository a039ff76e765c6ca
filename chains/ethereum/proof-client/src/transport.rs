use crate::error::TransportError;
use core::{future::Future, time::Duration};
use futures_timer::Delay;
use futures_util::future::{select, Either};

/// Status and raw body of an HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Posts an encoded JSON-RPC request and returns the raw reply.
///
/// Implementations report connection failures as [`TransportError::Io`], any HTTP status is
/// returned as-is and interpreted by the caller.
#[async_trait::async_trait]
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait Transport: Send + Sync {
    async fn send(&self, body: String) -> Result<HttpResponse, TransportError>;
}

/// Resolves `future`, or fails with [`TransportError::Timeout`] once `timeout` elapses.
/// The future is dropped on expiry.
pub(crate) async fn with_deadline<F: Future>(
    future: F,
    timeout: Option<Duration>,
) -> Result<F::Output, TransportError> {
    let Some(timeout) = timeout else {
        return Ok(future.await);
    };
    let future = std::pin::pin!(future);
    match select(future, Delay::new(timeout)).await {
        Either::Left((output, _)) => Ok(output),
        Either::Right(((), _)) => Err(TransportError::Timeout),
    }
}
