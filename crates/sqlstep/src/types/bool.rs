use crate::{
    decode::Decode,
    encode::Encode,
    error::DecodeError,
    sqlite::{SqliteDataType, Value},
};

impl Encode for bool {
    fn encode(self) -> Value {
        Value::Integer(self.into(), None)
    }
}

impl Decode for bool {
    fn decode(value: &Value) -> std::result::Result<bool, DecodeError> {
        compatible!(
            value,
            SqliteDataType::Bool
                | SqliteDataType::Int
                | SqliteDataType::Int64
                | SqliteDataType::Numeric
        );
        Ok(value.int64()? != 0)
    }
}
