use impl_serde_macro::serialize::serialize_uint;
use serde::Serializer;

/// serde function for converting primitive uints to hexadecimal quantities
pub mod uint_to_hex {
    use super::SerializableNumber;
    use serde::Serializer;

    #[allow(clippy::trivially_copy_pass_by_ref)]
    /// # Errors
    /// Returns `Err` if the value cannot be encoded as bytes
    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: SerializableNumber,
        S: Serializer,
    {
        T::serialize_eth_uint(value, serializer)
    }
}

/// Serialize a primitive uint as hexadecimal string, must be used with `#[serde(serialize_with =
/// "uint_to_hex::serialize")]` attribute
pub trait SerializableNumber {
    /// Serialize a primitive uint as hexadecimal string
    /// # Errors
    /// should never fails
    fn serialize_eth_uint<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer;
}

macro_rules! impl_serialize_uint {
    ($name: ident) => {
        impl SerializableNumber for $name {
            fn serialize_eth_uint<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                const LEN: usize = $name::BITS as usize / 8;

                let mut slice = [0u8; 2 + 2 * LEN];
                let bytes = self.to_be_bytes();
                serialize_uint(&mut slice, &bytes, serializer)
            }
        }
    };
}

impl_serialize_uint!(u64);
