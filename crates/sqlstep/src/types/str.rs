use crate::{SqliteDataType, Value, decode::Decode, encode::Encode, error::DecodeError};

impl Encode for &str {
    fn encode(self) -> Value {
        Value::Text(self.as_bytes().to_vec(), None)
    }
}

impl Encode for String {
    fn encode(self) -> Value {
        Value::Text(self.into_bytes(), None)
    }
}

impl Decode for String {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        compatible!(value, SqliteDataType::Text);
        value.text().map(ToOwned::to_owned)
    }
}
