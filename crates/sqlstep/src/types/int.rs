use crate::{
    decode::Decode,
    encode::Encode,
    error::DecodeError,
    sqlite::{SqliteDataType, Value},
};

// Every integer type narrower than i64 widens losslessly on the way in and is range
// checked on the way out.
macro_rules! integer {
    ($($ty:ty),+) => {
        $(
            impl Encode for $ty {
                fn encode(self) -> Value {
                    Value::Integer(i64::from(self), None)
                }
            }

            impl Decode for $ty {
                fn decode(value: &Value) -> std::result::Result<Self, DecodeError> {
                    compatible!(
                        value,
                        SqliteDataType::Int | SqliteDataType::Int64 | SqliteDataType::Numeric
                    );
                    Ok(<$ty>::try_from(value.int64()?)?)
                }
            }
        )+
    };
}

integer!(i8, i16, i32, u8, u16, u32);

impl Encode for i64 {
    fn encode(self) -> Value {
        Value::Integer(self, None)
    }
}

impl Decode for i64 {
    fn decode(value: &Value) -> std::result::Result<Self, DecodeError> {
        compatible!(
            value,
            SqliteDataType::Int | SqliteDataType::Int64 | SqliteDataType::Numeric
        );
        value.int64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_encode_matches_owned() {
        let value = 42i32;
        assert_eq!((&value).encode(), Value::Integer(42, None));
        assert_eq!((&123u32).encode(), Value::Integer(123, None));
    }

    #[test]
    fn narrowing_is_range_checked() {
        let big = Value::Integer(300, None);
        assert!(u8::decode(&big).is_err());
        assert_eq!(i16::decode(&big).unwrap(), 300);
        assert!(u32::decode(&Value::Integer(-1, None)).is_err());
    }

    #[test]
    fn text_is_not_an_integer() {
        let text = Value::Text(b"12".to_vec(), None);
        assert!(matches!(
            i64::decode(&text),
            Err(DecodeError::DataType(SqliteDataType::Text))
        ));
    }
}
