mod client;
pub mod config;
mod decode;
pub mod error;
#[cfg(feature = "http")]
mod http;
pub mod jsonrpc;
#[cfg(test)]
mod mock;
mod request;
mod transport;

pub use client::ProofClient;
pub use config::ClientConfig;
pub use error::{
    DecodeError, DecodeReason, Error, ProtocolError, TransportError, ValidationError,
    ValidationField, ValidationReason,
};
#[cfg(feature = "http")]
pub use http::HttpTransport;
pub use request::{build, BlockInput, ProofRequest, ProofRequestBuilder};
pub use transport::{HttpResponse, Transport};

use async_trait::async_trait;
use core::fmt::Display;
use eth_proof_types::AccountProof;

/// Source of account and storage proofs.
#[async_trait]
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait EthereumProof {
    type Error: Display;

    /// Returns the account and storage values, including the Merkle proof, of the requested
    /// account.
    async fn get_proof(&self, request: &ProofRequest) -> Result<AccountProof, Self::Error>;
}

#[async_trait]
impl<T> EthereumProof for ProofClient<T>
where
    T: Transport,
{
    type Error = Error;

    async fn get_proof(&self, request: &ProofRequest) -> Result<AccountProof, Self::Error> {
        Self::get_proof(self, request).await
    }
}
