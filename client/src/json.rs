use rev_types::{EnumCodec, FromWire};

use crate::error::DecodeError;

/// Reads JSON bodies into typed values. Unknown fields are ignored and enum
/// fields go through the shared [`EnumCodec`].
#[derive(Clone, Debug, Default)]
pub struct JsonDecoder {
    codec: EnumCodec,
}

impl JsonDecoder {
    pub fn new(codec: EnumCodec) -> Self {
        Self { codec }
    }

    pub fn read<T: FromWire>(&self, body: &[u8]) -> Result<T, DecodeError> {
        let wire: T::Wire = serde_json::from_slice(body)?;
        Ok(T::from_wire(wire, &self.codec)?)
    }
}
