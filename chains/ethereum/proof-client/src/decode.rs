//! Strict decoding of the `eth_getProof` result object.
//!
//! Every member is required and validated, the offending member is reported by its JSON path.
//! Hex input is accepted in either case.
use crate::{
    error::{DecodeError, DecodeReason},
    request::ProofRequest,
};
use eth_proof_types::{AccountProof, Address, Bytes, StorageProofEntry, H256, U256};
use serde_json::{Map, Value};

/// A JSON value together with its path from the envelope root.
#[derive(Debug, Clone)]
struct Node<'a> {
    value: &'a Value,
    path: String,
}

impl<'a> Node<'a> {
    fn new(value: &'a Value, path: impl Into<String>) -> Self {
        Self { value, path: path.into() }
    }

    fn error(&self, reason: DecodeReason) -> DecodeError {
        DecodeError::new(self.path.clone(), reason)
    }

    fn as_object(&self) -> Result<&'a Map<String, Value>, DecodeError> {
        self.value.as_object().ok_or_else(|| self.error(DecodeReason::ExpectedObject))
    }

    /// Required member, `null` counts as missing.
    fn field(&self, name: &str) -> Result<Self, DecodeError> {
        let object = self.as_object()?;
        let path = format!("{}.{name}", self.path);
        match object.get(name) {
            Some(Value::Null) | None => Err(DecodeError::new(path, DecodeReason::Missing)),
            Some(value) => Ok(Self { value, path }),
        }
    }

    fn items(&self) -> Result<Vec<Self>, DecodeError> {
        let array = self.value.as_array().ok_or_else(|| self.error(DecodeReason::ExpectedArray))?;
        Ok(array
            .iter()
            .enumerate()
            .map(|(index, value)| Self { value, path: format!("{}[{index}]", self.path) })
            .collect())
    }

    fn as_str(&self) -> Result<&'a str, DecodeError> {
        self.value.as_str().ok_or_else(|| self.error(DecodeReason::ExpectedString))
    }

    /// Hex digits after the mandatory `0x` prefix.
    fn hex_digits(&self) -> Result<&'a str, DecodeError> {
        let value = self.as_str()?;
        let digits = value
            .strip_prefix("0x")
            .or_else(|| value.strip_prefix("0X"))
            .ok_or_else(|| self.error(DecodeReason::InvalidHex))?;
        if digits.bytes().all(|c| c.is_ascii_hexdigit()) {
            Ok(digits)
        } else {
            Err(self.error(DecodeReason::InvalidHex))
        }
    }

    /// Significant digits of a quantity, leading zeros are tolerated.
    fn quantity_digits(&self, max_bits: usize) -> Result<&'a str, DecodeError> {
        let digits = self.hex_digits()?;
        if digits.is_empty() {
            return Err(self.error(DecodeReason::InvalidHex));
        }
        let significant = digits.trim_start_matches('0');
        if significant.len() * 4 > max_bits {
            return Err(self.error(DecodeReason::Overflow));
        }
        Ok(significant)
    }

    fn u256(&self) -> Result<U256, DecodeError> {
        let digits = self.quantity_digits(256)?;
        if digits.is_empty() {
            return Ok(U256::zero());
        }
        U256::from_str_radix(digits, 16).map_err(|_| self.error(DecodeReason::InvalidHex))
    }

    fn u64(&self) -> Result<u64, DecodeError> {
        let digits = self.quantity_digits(64)?;
        if digits.is_empty() {
            return Ok(0);
        }
        u64::from_str_radix(digits, 16).map_err(|_| self.error(DecodeReason::InvalidHex))
    }

    fn fixed<const N: usize>(&self) -> Result<[u8; N], DecodeError> {
        let digits = self.hex_digits()?;
        if digits.len() != 2 * N {
            return Err(
                self.error(DecodeReason::InvalidLength { expected: N, actual: digits.len() })
            );
        }
        let mut bytes = [0u8; N];
        const_hex::decode_to_slice(digits, &mut bytes)
            .map_err(|_| self.error(DecodeReason::InvalidHex))?;
        Ok(bytes)
    }

    fn address(&self) -> Result<Address, DecodeError> {
        self.fixed::<20>().map(Address::from)
    }

    fn h256(&self) -> Result<H256, DecodeError> {
        self.fixed::<32>().map(H256)
    }

    /// Storage keys may come back without zero padding.
    fn storage_key(&self) -> Result<H256, DecodeError> {
        let digits = self.hex_digits()?;
        if digits.is_empty() {
            return Err(self.error(DecodeReason::InvalidHex));
        }
        if digits.len() > 64 {
            let reason = DecodeReason::InvalidLength { expected: 32, actual: digits.len() };
            return Err(self.error(reason));
        }
        let padded = format!("{digits:0>64}");
        let mut bytes = [0u8; 32];
        const_hex::decode_to_slice(padded, &mut bytes)
            .map_err(|_| self.error(DecodeReason::InvalidHex))?;
        Ok(H256(bytes))
    }

    fn bytes(&self) -> Result<Bytes, DecodeError> {
        self.as_str()?.parse::<Bytes>().map_err(|_| self.error(DecodeReason::InvalidHex))
    }

    fn proof_nodes(&self) -> Result<Vec<Bytes>, DecodeError> {
        self.items()?.iter().map(Self::bytes).collect()
    }
}

/// Decodes the `result` member of an `eth_getProof` response and checks it against the request.
///
/// # Errors
/// Returns [`DecodeError`] for the first missing or malformed member, or
/// [`DecodeReason::StorageProofMismatch`] if the storage proofs don't line up with the requested
/// keys.
pub fn account_proof(result: &Value, request: &ProofRequest) -> Result<AccountProof, DecodeError> {
    let root = Node::new(result, "result");
    root.as_object()?;

    let address_node = root.field("address")?;
    let address = address_node.address()?;
    if &address != request.address() {
        return Err(address_node.error(DecodeReason::AddressMismatch));
    }

    let balance = root.field("balance")?.u256()?;
    let code_hash = root.field("codeHash")?.h256()?;
    let nonce = root.field("nonce")?.u64()?;
    let storage_hash = root.field("storageHash")?.h256()?;
    let account_proof = root.field("accountProof")?.proof_nodes()?;
    let storage_proof = storage_proofs(&root.field("storageProof")?, request.storage_keys())?;

    Ok(AccountProof {
        address,
        balance,
        code_hash,
        nonce,
        storage_hash,
        account_proof,
        storage_proof,
    })
}

/// Entries must match the requested keys one to one and in order, they are never reordered.
fn storage_proofs(node: &Node<'_>, keys: &[H256]) -> Result<Vec<StorageProofEntry>, DecodeError> {
    let entries = node.items()?;
    if entries.len() != keys.len() {
        return Err(node.error(DecodeReason::StorageProofMismatch));
    }
    entries
        .iter()
        .zip(keys)
        .map(|(entry, expected)| {
            let key_node = entry.field("key")?;
            let key = key_node.storage_key()?;
            if &key != expected {
                return Err(key_node.error(DecodeReason::StorageProofMismatch));
            }
            let value = entry.field("value")?.u256()?;
            let proof = entry.field("proof")?.proof_nodes()?;
            Ok(StorageProofEntry { key, value, proof })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::build;
    use hex_literal::hex;
    use serde_json::json;

    const WETH: &str = "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2";
    const ZERO_KEY: &str = "0x0000000000000000000000000000000000000000000000000000000000000000";

    fn fixture() -> Value {
        json!({
            "address": WETH,
            "balance": "0x2a9F3C1F55BA8E4A0E5B4",
            "codeHash": "0xd0a06b12ac47863b5c7be4185c2deaad1c61557033f56c7d4ea74429cbb25e23",
            "nonce": "0x1",
            "storageHash": "0x9b0d9e6c4b4e4b3ef4d4f84a3d65bb1ec1ee5dcf2e1b15b01f6fbd2ba3b2e55a",
            "accountProof": [
                "0xf90211a0e5d9a7c6a6f1c4bfe1b1b7c1b1c3b5e3",
                "0xf90211a08a3b1f",
                "0xf8669d3802a763f7db875346d03fbf86f137de55814b191c069e721f47474733",
            ],
            "storageProof": [{
                "key": ZERO_KEY,
                "value": "0x577261707065642045746865720000000000000000000000000000000000001a",
                "proof": ["0xf90211a0aa", "0xf8718080", "0xe2a0200000"],
            }],
        })
    }

    fn request(keys: &[&str]) -> ProofRequest {
        build(WETH, keys, "latest").unwrap()
    }

    #[test]
    fn decode_weth_fixture() {
        let proof = account_proof(&fixture(), &request(&[ZERO_KEY])).unwrap();
        assert_eq!(proof.address, Address::from(hex!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2")));
        assert_eq!(proof.balance, U256::from_str_radix("2a9f3c1f55ba8e4a0e5b4", 16).unwrap());
        assert_eq!(proof.nonce, 1);
        assert_eq!(proof.account_proof.len(), 3);
        assert_eq!(proof.account_proof[1], hex!("f90211a08a3b1f")[..]);

        assert_eq!(proof.storage_proof.len(), 1);
        let entry = &proof.storage_proof[0];
        assert_eq!(entry.key, H256::zero());
        assert_eq!(
            entry.value,
            U256::from_big_endian(&hex!(
                "577261707065642045746865720000000000000000000000000000000000001a"
            ))
        );
        let nodes = entry.proof.iter().map(ToString::to_string).collect::<Vec<_>>();
        assert_eq!(nodes, vec!["0xf90211a0aa", "0xf8718080", "0xe2a0200000"]);
    }

    #[test]
    fn unpadded_response_key_matches_padded_request_key() {
        let mut result = fixture();
        result["storageProof"][0]["key"] = json!("0x0");
        let proof = account_proof(&result, &request(&["0x0"])).unwrap();
        assert_eq!(proof.storage_proof[0].key, H256::zero());
    }

    #[test]
    fn storage_proof_count_mismatch() {
        let error = account_proof(&fixture(), &request(&[ZERO_KEY, "0x1"])).unwrap_err();
        assert_eq!(error.reason, DecodeReason::StorageProofMismatch);

        let error = account_proof(&fixture(), &request(&[])).unwrap_err();
        assert_eq!(error.reason, DecodeReason::StorageProofMismatch);
    }

    #[test]
    fn storage_proof_key_mismatch() {
        let error = account_proof(&fixture(), &request(&["0x1"])).unwrap_err();
        assert_eq!(
            error,
            DecodeError::new("result.storageProof[0].key", DecodeReason::StorageProofMismatch)
        );
    }

    #[test]
    fn storage_proof_order_mismatch() {
        let mut result = fixture();
        let first = result["storageProof"][0].clone();
        let mut second = first.clone();
        second["key"] = json!("0x1");
        result["storageProof"] = json!([second, first]);
        let error = account_proof(&result, &request(&[ZERO_KEY, "0x1"])).unwrap_err();
        assert_eq!(error.reason, DecodeReason::StorageProofMismatch);
    }

    #[test]
    fn missing_fields_are_never_defaulted() {
        let fields = [
            "address",
            "balance",
            "codeHash",
            "nonce",
            "storageHash",
            "accountProof",
            "storageProof",
        ];
        for field in fields {
            let mut result = fixture();
            result.as_object_mut().unwrap().remove(field);
            let error = account_proof(&result, &request(&[ZERO_KEY])).unwrap_err();
            assert_eq!(error, DecodeError::new(format!("result.{field}"), DecodeReason::Missing));
        }

        let mut result = fixture();
        result["storageProof"][0]["value"] = Value::Null;
        let error = account_proof(&result, &request(&[ZERO_KEY])).unwrap_err();
        assert_eq!(error, DecodeError::new("result.storageProof[0].value", DecodeReason::Missing));
    }

    #[test]
    fn mistyped_fields() {
        let decode = |field: &str, value: Value| {
            let mut result = fixture();
            result[field] = value;
            account_proof(&result, &request(&[ZERO_KEY])).unwrap_err()
        };
        assert_eq!(decode("balance", json!(12)).reason, DecodeReason::ExpectedString);
        assert_eq!(decode("balance", json!("12")).reason, DecodeReason::InvalidHex);
        assert_eq!(decode("balance", json!("0x")).reason, DecodeReason::InvalidHex);
        assert_eq!(decode("nonce", json!("0x1ffffffffffffffff")).reason, DecodeReason::Overflow);
        assert_eq!(
            decode("codeHash", json!("0x1234")).reason,
            DecodeReason::InvalidLength { expected: 32, actual: 4 }
        );
        assert_eq!(decode("accountProof", json!("0xf8")).reason, DecodeReason::ExpectedArray);
        assert_eq!(
            decode("accountProof", json!(["0xf8", "0xabc"])),
            DecodeError::new("result.accountProof[1]", DecodeReason::InvalidHex)
        );
        assert_eq!(
            decode("storageProof", json!([ZERO_KEY])),
            DecodeError::new("result.storageProof[0]", DecodeReason::ExpectedObject)
        );
    }

    #[test]
    fn proof_nodes_require_prefix() {
        let mut result = fixture();
        result["accountProof"] = json!(["deadbeef"]);
        let error = account_proof(&result, &request(&[ZERO_KEY])).unwrap_err();
        assert_eq!(error, DecodeError::new("result.accountProof[0]", DecodeReason::InvalidHex));

        result["accountProof"] = json!(["0x"]);
        let proof = account_proof(&result, &request(&[ZERO_KEY])).unwrap();
        assert_eq!(proof.account_proof, vec![Bytes::new()]);
    }

    #[test]
    fn serialized_proof_decodes_to_itself() {
        let proof = account_proof(&fixture(), &request(&[ZERO_KEY])).unwrap();
        let serialized = serde_json::to_value(&proof).unwrap();
        assert_eq!(account_proof(&serialized, &request(&[ZERO_KEY])).unwrap(), proof);

        let mut result = fixture();
        result["nonce"] = json!("0x0");
        result["storageProof"][0]["value"] = json!("0x0");
        result["storageProof"][0]["proof"] = json!([]);
        let proof = account_proof(&result, &request(&[ZERO_KEY])).unwrap();
        let serialized = serde_json::to_value(&proof).unwrap();
        assert_eq!(serialized["nonce"], "0x0");
        assert_eq!(account_proof(&serialized, &request(&[ZERO_KEY])).unwrap(), proof);
    }

    #[test]
    fn quantities_tolerate_leading_zeros() {
        let mut result = fixture();
        result["nonce"] = json!("0x0000000000000000002a");
        result["balance"] = json!("0x0");
        let proof = account_proof(&result, &request(&[ZERO_KEY])).unwrap();
        assert_eq!(proof.nonce, 42);
        assert_eq!(proof.balance, U256::zero());
    }

    #[test]
    fn response_address_must_match_request() {
        let mut result = fixture();
        result["address"] = json!("0x0000000000000000000000000000000000000001");
        let error = account_proof(&result, &request(&[ZERO_KEY])).unwrap_err();
        assert_eq!(error, DecodeError::new("result.address", DecodeReason::AddressMismatch));

        let mut result = fixture();
        result["address"] = json!(WETH.to_uppercase().replace("0X", "0x"));
        assert!(account_proof(&result, &request(&[ZERO_KEY])).is_ok());
    }
}
