use crate::H256;
use hex_literal::hex;

/// Keccak-256 hash of the empty byte string, the `codeHash` of accounts without code.
pub const EMPTY_CODE_HASH: H256 =
    H256(hex!("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"));

/// Root hash of an empty Merkle-Patricia trie, the `storageHash` of accounts without storage.
pub const EMPTY_ROOT_HASH: H256 =
    H256(hex!("56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421"));
