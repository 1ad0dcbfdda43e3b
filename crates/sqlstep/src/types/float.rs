use std::result::Result as StdResult;

use crate::{
    decode::Decode,
    encode::Encode,
    error::DecodeError,
    sqlite::{SqliteDataType, Value},
};

impl Encode for f32 {
    fn encode(self) -> Value {
        Value::Double(self.into(), None)
    }
}

impl Decode for f32 {
    fn decode(value: &Value) -> StdResult<Self, DecodeError> {
        compatible!(value, SqliteDataType::Float | SqliteDataType::Numeric);
        Ok(value.double()? as Self)
    }
}

impl Encode for f64 {
    fn encode(self) -> Value {
        Value::Double(self, None)
    }
}

impl Decode for f64 {
    fn decode(value: &Value) -> StdResult<Self, DecodeError> {
        compatible!(value, SqliteDataType::Float | SqliteDataType::Numeric);
        value.double()
    }
}
