use crate::{
    config::ClientConfig,
    decode,
    error::{Error, LogErrorExt, TransportError},
    jsonrpc::{self, Request, GET_PROOF_METHOD},
    request::{BlockInput, ProofRequest},
    transport::{with_deadline, Transport},
};
use core::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};
use eth_proof_types::AccountProof;

/// `eth_getProof` client over any [`Transport`].
///
/// Each call is a single, self-contained round trip, the client holds no state besides the
/// request id counter and may be shared between tasks.
#[derive(Debug)]
pub struct ProofClient<T> {
    transport: T,
    config: ClientConfig,
    next_id: AtomicU64,
}

impl<T> ProofClient<T>
where
    T: Transport,
{
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ClientConfig::default())
    }

    pub const fn with_config(transport: T, config: ClientConfig) -> Self {
        Self { transport, next_id: AtomicU64::new(config.first_request_id), config }
    }

    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub const fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Fetches the account and storage proofs described by `request`.
    ///
    /// # Errors
    /// See [`Error`], a partial [`AccountProof`] is never returned.
    pub async fn get_proof(&self, request: &ProofRequest) -> Result<AccountProof, Error> {
        self.dispatch(request, self.config.request_timeout).await
    }

    /// Same as [`Self::get_proof`], overriding the configured deadline.
    ///
    /// # Errors
    /// See [`Error`].
    pub async fn get_proof_with_timeout(
        &self,
        request: &ProofRequest,
        timeout: Duration,
    ) -> Result<AccountProof, Error> {
        self.dispatch(request, Some(timeout)).await
    }

    /// Validates the raw parameters and fetches the proof.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] without touching the transport if any parameter is malformed.
    pub async fn fetch<S: AsRef<str> + Sync>(
        &self,
        address: &str,
        storage_keys: &[S],
        block: impl Into<BlockInput> + Send,
    ) -> Result<AccountProof, Error> {
        let request = crate::request::build(address, storage_keys, block)?;
        self.get_proof(&request).await
    }

    async fn dispatch(
        &self,
        request: &ProofRequest,
        timeout: Option<Duration>,
    ) -> Result<AccountProof, Error> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = Request::new(id, GET_PROOF_METHOD, request.params()).to_json();
        tracing::debug!(
            id,
            address = ?request.address(),
            keys = request.storage_keys().len(),
            block = %request.block(),
            "sending eth_getProof"
        );

        let response = match with_deadline(self.transport.send(body), timeout).await {
            Ok(Ok(response)) => response,
            Ok(Err(error)) | Err(error) => {
                tracing::warn!(id, "eth_getProof transport error: {error}");
                return Err(error.into());
            },
        };
        if !response.is_success() {
            tracing::warn!(
                id,
                status = response.status,
                "eth_getProof http error: {}",
                response.body.as_str().truncate()
            );
            return Err(
                TransportError::HttpStatus { status: response.status, body: response.body }.into()
            );
        }

        let result = jsonrpc::decode_response(&response.body, id).map_err(|error| {
            match &error {
                Error::Protocol(protocol_error) => {
                    tracing::warn!(id, "eth_getProof rejected by node: {protocol_error}");
                },
                Error::Decode(decode_error) => tracing::error!(
                    id,
                    "invalid eth_getProof response: {}, body: {}",
                    decode_error.truncate(),
                    response.body.as_str().truncate()
                ),
                _ => {},
            }
            error
        })?;
        let proof = decode::account_proof(&result, request).map_err(|error| {
            tracing::error!(id, "invalid eth_getProof result: {}", error.truncate());
            error
        })?;
        let storage_nodes =
            proof.storage_proof.iter().map(|entry| entry.proof.len()).sum::<usize>();
        tracing::debug!(
            id,
            account_nodes = proof.account_proof.len(),
            storage_nodes,
            "eth_getProof decoded"
        );
        Ok(proof)
    }
}
