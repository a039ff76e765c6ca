use core::time::Duration;

/// Default deadline of a single `eth_getProof` round trip.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Proof client configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientConfig {
    /// Deadline of each request, from dispatch until the response body is read.
    /// `None` disables the deadline. The default value is 30 seconds.
    pub request_timeout: Option<Duration>,

    /// Id of the first JSON-RPC request, incremented for every request sent.
    /// The default value is 1.
    pub first_request_id: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { request_timeout: Some(DEFAULT_REQUEST_TIMEOUT), first_request_id: 1 }
    }
}
