use crate::error::{ValidationError, ValidationField, ValidationReason};
use eth_proof_types::{Address, BlockSelector, ParseBlockSelectorError, H256};
use serde::ser::{Serialize, SerializeTuple, Serializer};
use serde_json::{json, Value};

const ADDRESS_HEX_DIGITS: usize = 40;
const STORAGE_KEY_HEX_DIGITS: usize = 64;

/// Raw block selector as supplied by the caller, either a number or a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockInput {
    Selector(BlockSelector),
    Number(i128),
    Text(String),
}

impl Default for BlockInput {
    fn default() -> Self {
        Self::Selector(BlockSelector::Latest)
    }
}

impl From<BlockSelector> for BlockInput {
    fn from(selector: BlockSelector) -> Self {
        Self::Selector(selector)
    }
}

impl From<u64> for BlockInput {
    fn from(number: u64) -> Self {
        Self::Selector(BlockSelector::Number(number))
    }
}

impl From<u32> for BlockInput {
    fn from(number: u32) -> Self {
        Self::Selector(BlockSelector::Number(u64::from(number)))
    }
}

impl From<i64> for BlockInput {
    fn from(number: i64) -> Self {
        Self::Number(i128::from(number))
    }
}

impl From<i32> for BlockInput {
    fn from(number: i32) -> Self {
        Self::Number(i128::from(number))
    }
}

impl From<&str> for BlockInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for BlockInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// Validated and normalized `eth_getProof` parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProofRequest {
    address: Address,
    storage_keys: Vec<H256>,
    block: BlockSelector,
}

impl ProofRequest {
    /// Creates a request from already typed values, nothing left to validate.
    #[must_use]
    pub const fn new(address: Address, storage_keys: Vec<H256>, block: BlockSelector) -> Self {
        Self { address, storage_keys, block }
    }

    /// Starts a builder for the given raw address.
    pub fn builder(address: impl Into<String>) -> ProofRequestBuilder {
        ProofRequestBuilder::new(address)
    }

    #[must_use]
    pub const fn address(&self) -> &Address {
        &self.address
    }

    #[must_use]
    pub fn storage_keys(&self) -> &[H256] {
        &self.storage_keys
    }

    #[must_use]
    pub const fn block(&self) -> BlockSelector {
        self.block
    }

    /// JSON-RPC params array: `[address, [keys...], block]`.
    #[must_use]
    pub fn params(&self) -> Value {
        let keys = self.storage_keys.iter().map(|key| format!("{key:#x}")).collect::<Vec<_>>();
        json!([format!("{:#x}", self.address), keys, self.block.to_string()])
    }
}

impl Serialize for ProofRequest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut tuple = serializer.serialize_tuple(3)?;
        tuple.serialize_element(&self.address)?;
        tuple.serialize_element(&self.storage_keys)?;
        tuple.serialize_element(&self.block)?;
        tuple.end()
    }
}

/// Collects raw caller input and validates it in one go.
///
/// Fields are checked in the order address, storage keys, block, and the first invalid one is
/// reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProofRequestBuilder {
    address: String,
    storage_keys: Vec<String>,
    block: BlockInput,
}

impl ProofRequestBuilder {
    pub fn new(address: impl Into<String>) -> Self {
        Self { address: address.into(), storage_keys: Vec::new(), block: BlockInput::default() }
    }

    #[must_use]
    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_keys.push(key.into());
        self
    }

    #[must_use]
    pub fn storage_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.storage_keys.extend(keys.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn block(mut self, block: impl Into<BlockInput>) -> Self {
        self.block = block.into();
        self
    }

    /// # Errors
    /// Returns [`ValidationError`] for the first malformed field.
    pub fn build(&self) -> Result<ProofRequest, ValidationError> {
        build(&self.address, &self.storage_keys, self.block.clone())
    }
}

/// Validates and normalizes raw `eth_getProof` parameters, no I/O is performed.
///
/// # Errors
/// Returns [`ValidationError`] for the first malformed field, checked in the order address,
/// storage keys, block.
pub fn build<S: AsRef<str>>(
    address: &str,
    storage_keys: &[S],
    block: impl Into<BlockInput>,
) -> Result<ProofRequest, ValidationError> {
    let address = parse_address(address)
        .map_err(|reason| ValidationError::new(ValidationField::Address, reason))?;
    let storage_keys = storage_keys
        .iter()
        .enumerate()
        .map(|(index, key)| {
            parse_storage_key(key.as_ref())
                .map_err(|reason| ValidationError::new(ValidationField::StorageKey(index), reason))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let block = parse_block(block.into())
        .map_err(|reason| ValidationError::new(ValidationField::Block, reason))?;
    Ok(ProofRequest { address, storage_keys, block })
}

fn strip_hex_prefix(value: &str) -> Result<&str, ValidationReason> {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .ok_or(ValidationReason::MissingPrefix)
}

fn check_hex_digits(digits: &str) -> Result<(), ValidationReason> {
    match digits.chars().find(|c| !c.is_ascii_hexdigit()) {
        Some(invalid) => Err(ValidationReason::InvalidCharacter(invalid)),
        None => Ok(()),
    }
}

fn decode_hex_digits<const N: usize>(digits: &str) -> Result<[u8; N], ValidationReason> {
    let mut bytes = [0u8; N];
    const_hex::decode_to_slice(digits, &mut bytes).map_err(|error| match error {
        const_hex::FromHexError::InvalidHexCharacter { c, .. } => {
            ValidationReason::InvalidCharacter(c)
        },
        _ => ValidationReason::InvalidLength { expected: 2 * N, actual: digits.len() },
    })?;
    Ok(bytes)
}

fn parse_address(value: &str) -> Result<Address, ValidationReason> {
    let digits = strip_hex_prefix(value)?;
    check_hex_digits(digits)?;
    if digits.len() != ADDRESS_HEX_DIGITS {
        return Err(ValidationReason::InvalidLength {
            expected: ADDRESS_HEX_DIGITS,
            actual: digits.len(),
        });
    }
    decode_hex_digits::<20>(digits).map(Address::from)
}

/// Shorter keys are big-endian integers and get left-padded with zeros.
fn parse_storage_key(value: &str) -> Result<H256, ValidationReason> {
    let digits = strip_hex_prefix(value)?;
    if digits.is_empty() {
        return Err(ValidationReason::Empty);
    }
    check_hex_digits(digits)?;
    if digits.len() > STORAGE_KEY_HEX_DIGITS {
        return Err(ValidationReason::TooLong { max: STORAGE_KEY_HEX_DIGITS, actual: digits.len() });
    }
    let padded = format!("{digits:0>64}");
    decode_hex_digits::<32>(&padded).map(H256)
}

fn parse_block(block: BlockInput) -> Result<BlockSelector, ValidationReason> {
    match block {
        BlockInput::Selector(selector) => Ok(selector),
        BlockInput::Number(number) if number < 0 => Err(ValidationReason::Negative),
        BlockInput::Number(number) => u64::try_from(number)
            .map(BlockSelector::Number)
            .map_err(|_| ValidationReason::Overflow),
        BlockInput::Text(text) => text.parse::<BlockSelector>().map_err(|error| match error {
            ParseBlockSelectorError::Empty => ValidationReason::Empty,
            ParseBlockSelectorError::Negative => ValidationReason::Negative,
            ParseBlockSelectorError::UnknownTag(tag) => ValidationReason::UnknownTag(tag),
            ParseBlockSelectorError::InvalidCharacter(c) => ValidationReason::InvalidCharacter(c),
            ParseBlockSelectorError::Overflow => ValidationReason::Overflow,
        }),
    }
}
