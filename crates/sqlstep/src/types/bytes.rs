use crate::{SqliteDataType, Value, decode::Decode, encode::Encode, error::DecodeError};

impl Encode for &[u8] {
    fn encode(self) -> Value {
        Value::Blob(self.to_vec(), None)
    }
}

impl Encode for Vec<u8> {
    fn encode(self) -> Value {
        Value::Blob(self, None)
    }
}

impl Decode for Vec<u8> {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        compatible!(value, SqliteDataType::Blob | SqliteDataType::Text);
        Ok(value.blob().to_owned())
    }
}
