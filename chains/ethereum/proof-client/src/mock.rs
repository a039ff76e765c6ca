//! Canned transports for unit tests.
use crate::{
    error::TransportError,
    transport::{HttpResponse, Transport},
};
use hex_literal::hex;
use serde_json::{json, Value};
use std::sync::Mutex;

/// Wrapped Ether contract on mainnet.
pub const WETH: &str = "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2";
pub const ZERO_KEY: &str = "0x0000000000000000000000000000000000000000000000000000000000000000";
/// `"Wrapped Ether"` short string, as stored in slot zero.
pub const WETH_SLOT_VALUE: [u8; 32] =
    hex!("577261707065642045746865720000000000000000000000000000000000001a");

/// Replies with a fixed status and body, recording every request received.
#[derive(Debug)]
pub struct MockTransport {
    response: HttpResponse,
    /// When set, replies with this result under the id of each request.
    echo_result: Option<Value>,
    requests: Mutex<Vec<Value>>,
}

impl MockTransport {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            response: HttpResponse::new(status, body),
            echo_result: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn echo(result: Value) -> Self {
        Self { echo_result: Some(result), ..Self::new(200, "") }
    }

    pub fn with_result(id: u64, result: &Value) -> Self {
        let envelope = json!({ "jsonrpc": "2.0", "id": id, "result": result });
        Self::new(200, envelope.to_string())
    }

    pub fn weth() -> Self {
        Self::with_result(1, &Self::weth_result())
    }

    pub fn weth_result() -> Value {
        json!({
            "address": WETH,
            "accountProof": [
                "0xf90211a0b3bb2d1dd4d7e3ec0f5a4e9c1c1f1d7c2f0f6a0e2c1bb7b4a8f1f1e6f0b0a8c3a0",
                "0xf90211a04f5e1ec5ad7f3a9ec48cd3d0a0a9b43e3f59b0c2f7f4b7f2c0f6f0b9d2e6a1c6a0",
                "0xf8669d3802a763f7db875346d03fbf86f137de55814b191c069e721f47474733b846f8440180a0",
            ],
            "balance": "0x2bc3f1dfb7d0b7f5c2a1b4",
            "codeHash": "0xd0a06b12ac47863b5c7be4185c2deaad1c61557033f56c7d4ea74429cbb25e23",
            "nonce": "0x1",
            "storageHash": "0x9c4e3f6d1b1d3b2aafe0f5b6b2e3c8f4f7a3b0e2d1c5b6a7f8e9d0c1b2a3f4e5",
            "storageProof": [{
                "key": ZERO_KEY,
                "value": "0x577261707065642045746865720000000000000000000000000000000000001a",
                "proof": [
                    "0xf90211a0c1d2e3f4a5b6c7d8e9f0a1b2c3d4e5f6a7b8c9d0e1f2a3b4c5d6e7f8a9b0c1d2",
                    "0xf891a0",
                    "0xe2a0200000000000000000000000000000000000000000000000000000000000000000",
                ],
            }],
        })
    }

    /// Request bodies received so far, in order.
    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn send(&self, body: String) -> Result<HttpResponse, TransportError> {
        let request = serde_json::from_str::<Value>(&body).unwrap();
        let response = match &self.echo_result {
            Some(result) => {
                let envelope = json!({ "jsonrpc": "2.0", "id": request["id"], "result": result });
                HttpResponse::new(200, envelope.to_string())
            },
            None => self.response.clone(),
        };
        self.requests.lock().unwrap().push(request);
        Ok(response)
    }
}

/// Never replies.
#[derive(Debug, Clone, Copy)]
pub struct PendingTransport;

#[async_trait::async_trait]
impl Transport for PendingTransport {
    async fn send(&self, _body: String) -> Result<HttpResponse, TransportError> {
        futures_util::future::pending().await
    }
}
