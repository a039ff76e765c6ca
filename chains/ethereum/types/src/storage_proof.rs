use crate::{
    bytes::Bytes,
    constants::{EMPTY_CODE_HASH, EMPTY_ROOT_HASH},
    Address, H256, U256,
};

#[cfg(feature = "serde")]
use crate::serde_utils::uint_to_hex;

/// Proof of a single storage slot against the account's storage root.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StorageProofEntry {
    /// Storage slot, always the full 32 bytes.
    pub key: H256,
    /// Value stored in the slot, zero if unset.
    pub value: U256,
    /// Trie nodes from the storage root down to the slot.
    pub proof: Vec<Bytes>,
}

/// Account state plus the Merkle proofs returned by `eth_getProof`.
///
/// Serializes to the EIP-1186 JSON shape. Responses are decoded by the proof client, which also
/// checks them against the request.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "camelCase")
)]
pub struct AccountProof {
    pub address: Address,
    pub balance: U256,
    pub code_hash: H256,
    #[cfg_attr(feature = "serde", serde(serialize_with = "uint_to_hex::serialize"))]
    pub nonce: u64,
    pub storage_hash: H256,
    /// Trie nodes from the state root down to the account.
    pub account_proof: Vec<Bytes>,
    /// One entry per requested storage key, in request order.
    pub storage_proof: Vec<StorageProofEntry>,
}

impl AccountProof {
    /// Returns the proof entry of `key`, if it was requested.
    #[must_use]
    pub fn storage_entry(&self, key: &H256) -> Option<&StorageProofEntry> {
        self.storage_proof.iter().find(|entry| &entry.key == key)
    }

    /// Returns the value stored at `key`, if it was requested.
    #[must_use]
    pub fn storage_value(&self, key: &H256) -> Option<U256> {
        self.storage_entry(key).map(|entry| entry.value)
    }

    /// Whether the account has no code deployed.
    #[must_use]
    pub fn is_empty_code(&self) -> bool {
        self.code_hash == EMPTY_CODE_HASH
    }

    /// Whether the account storage trie is empty.
    #[must_use]
    pub fn is_empty_storage(&self) -> bool {
        self.storage_hash == EMPTY_ROOT_HASH
    }
}
