use core::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

/// Block at which the proof is requested.
#[derive(Default, Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum BlockSelector {
    /// Latest block
    #[default]
    Latest,
    /// Earliest block (genesis)
    Earliest,
    /// Pending block (not yet part of the blockchain)
    Pending,
    /// Specific block number
    Number(u64),
}

impl BlockSelector {
    /// Returns the block number, `None` for symbolic tags.
    #[must_use]
    pub const fn number(&self) -> Option<u64> {
        match self {
            Self::Number(number) => Some(*number),
            _ => None,
        }
    }
}

impl From<u64> for BlockSelector {
    fn from(block_number: u64) -> Self {
        Self::Number(block_number)
    }
}

impl From<u32> for BlockSelector {
    fn from(block_number: u32) -> Self {
        Self::Number(u64::from(block_number))
    }
}

/// Formats the selector the way it goes on the wire: tags verbatim, numbers as hex quantities.
impl Display for BlockSelector {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Latest => f.write_str("latest"),
            Self::Earliest => f.write_str("earliest"),
            Self::Pending => f.write_str("pending"),
            Self::Number(number) => write!(f, "{number:#x}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseBlockSelectorError {
    #[error("block selector is empty")]
    Empty,
    #[error("block number is negative")]
    Negative,
    #[error("unknown block tag `{0}`")]
    UnknownTag(String),
    #[error("invalid character `{0}` in block number")]
    InvalidCharacter(char),
    #[error("block number does not fit in 64 bits")]
    Overflow,
}

fn parse_number(digits: &str, radix: u32) -> Result<u64, ParseBlockSelectorError> {
    if digits.is_empty() {
        return Err(ParseBlockSelectorError::Empty);
    }
    if let Some(invalid) = digits.chars().find(|c| !c.is_digit(radix)) {
        return Err(ParseBlockSelectorError::InvalidCharacter(invalid));
    }
    u64::from_str_radix(digits, radix).map_err(|_| ParseBlockSelectorError::Overflow)
}

/// Tags are matched case-sensitively. Numbers are accepted as `0x` hex quantities or decimal
/// digits.
impl FromStr for BlockSelector {
    type Err = ParseBlockSelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latest" => return Ok(Self::Latest),
            "earliest" => return Ok(Self::Earliest),
            "pending" => return Ok(Self::Pending),
            "" => return Err(ParseBlockSelectorError::Empty),
            _ => {},
        }

        if s.starts_with('-') {
            return Err(ParseBlockSelectorError::Negative);
        }
        if let Some(hexdecimal) = s.strip_prefix("0x") {
            parse_number(hexdecimal, 16).map(Self::Number)
        } else if s.starts_with(|c: char| c.is_ascii_digit()) {
            parse_number(s, 10).map(Self::Number)
        } else {
            Err(ParseBlockSelectorError::UnknownTag(s.to_string()))
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for BlockSelector {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for BlockSelector {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}
