//! JSON-RPC 2.0 envelope encoding and decoding.
use crate::error::{DecodeError, DecodeReason, Error, ProtocolError};
use serde_json::{Map, Value};

pub const JSONRPC_VERSION: &str = "2.0";
pub const GET_PROOF_METHOD: &str = "eth_getProof";

#[derive(Debug, Clone, PartialEq)]
pub struct Request<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: Value,
}

impl<'a> Request<'a> {
    #[must_use]
    pub const fn new(id: u64, method: &'a str, params: Value) -> Self {
        Self { jsonrpc: JSONRPC_VERSION, id, method, params }
    }

    /// Encodes the request body.
    #[must_use]
    pub fn to_json(&self) -> String {
        let mut object = Map::with_capacity(4);
        object.insert("jsonrpc".into(), Value::from(self.jsonrpc));
        object.insert("id".into(), Value::from(self.id));
        object.insert("method".into(), Value::from(self.method));
        object.insert("params".into(), self.params.clone());
        Value::Object(object).to_string()
    }
}

/// Decodes a response envelope, returning its `result` member.
///
/// An `error` member takes precedence over the envelope checks, nodes reply with `"id": null`
/// when they fail to parse the request.
///
/// # Errors
/// [`Error::Protocol`] if the node replied with an error object, [`Error::Decode`] if the
/// envelope is malformed.
pub fn decode_response(body: &str, expected_id: u64) -> Result<Value, Error> {
    let envelope = serde_json::from_str::<Value>(body).map_err(|error| {
        DecodeError::without_field(DecodeReason::InvalidJson(error.to_string()))
    })?;
    let Value::Object(mut envelope) = envelope else {
        return Err(DecodeError::without_field(DecodeReason::ExpectedObject).into());
    };

    if let Some(error) = envelope.remove("error").filter(|error| !error.is_null()) {
        return Err(decode_error_object(error)?.into());
    }

    match envelope.get("jsonrpc") {
        Some(Value::String(version)) if version == JSONRPC_VERSION => {},
        Some(Value::String(_)) => {
            return Err(DecodeError::new("jsonrpc", DecodeReason::UnsupportedVersion).into())
        },
        Some(_) => return Err(DecodeError::new("jsonrpc", DecodeReason::ExpectedString).into()),
        None => return Err(DecodeError::new("jsonrpc", DecodeReason::Missing).into()),
    }

    match envelope.get("id") {
        Some(id) if id.as_u64() == Some(expected_id) => {},
        Some(Value::Number(_)) => {
            return Err(DecodeError::new("id", DecodeReason::IdMismatch).into())
        },
        Some(Value::Null) | None => {
            return Err(DecodeError::new("id", DecodeReason::Missing).into())
        },
        Some(_) => return Err(DecodeError::new("id", DecodeReason::ExpectedInteger).into()),
    }

    match envelope.remove("result") {
        Some(Value::Null) | None => Err(DecodeError::new("result", DecodeReason::Missing).into()),
        Some(result) => Ok(result),
    }
}

fn decode_error_object(error: Value) -> Result<ProtocolError, DecodeError> {
    let Value::Object(mut error) = error else {
        return Err(DecodeError::new("error", DecodeReason::ExpectedObject));
    };
    let code = match error.get("code") {
        Some(Value::Number(code)) => code
            .as_i64()
            .ok_or_else(|| DecodeError::new("error.code", DecodeReason::ExpectedInteger))?,
        Some(Value::Null) | None => {
            return Err(DecodeError::new("error.code", DecodeReason::Missing))
        },
        Some(_) => return Err(DecodeError::new("error.code", DecodeReason::ExpectedInteger)),
    };
    let message = match error.remove("message") {
        Some(Value::String(message)) => message,
        Some(Value::Null) | None => {
            return Err(DecodeError::new("error.message", DecodeReason::Missing))
        },
        Some(_) => return Err(DecodeError::new("error.message", DecodeReason::ExpectedString)),
    };
    let data = error.remove("data").filter(|data| !data.is_null());
    Ok(ProtocolError { code, message, data })
}
