mod block;
mod bytes;
pub mod constants;
#[cfg(feature = "serde")]
pub mod serde_utils;
mod storage_proof;

pub use block::{BlockSelector, ParseBlockSelectorError};
pub use bytes::{Bytes, ParseBytesError};
pub use primitive_types::{H160, H256, U256};
pub use storage_proof::{AccountProof, StorageProofEntry};

/// 20-byte account address.
pub type Address = H160;
