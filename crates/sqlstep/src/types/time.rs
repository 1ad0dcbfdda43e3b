use time::{
    Date, OffsetDateTime, PrimitiveDateTime, Time,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description as fd,
};

use crate::{
    decode::Decode,
    encode::Encode,
    error::DecodeError,
    sqlite::{SqliteDataType, Value},
};

const DATE: &[BorrowedFormatItem<'static>] = fd!("[year]-[month]-[day]");
const TIME: &[BorrowedFormatItem<'static>] = fd!("[hour]:[minute]:[second].[subsecond]");
const DATETIME: &[BorrowedFormatItem<'static>] =
    fd!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]");

// Formats SQLite's own date and time functions produce, tried in order.
const TIME_FORMATS: &[&[BorrowedFormatItem<'static>]] = &[
    TIME,
    fd!("[hour]:[minute]:[second]"),
    fd!("[hour]:[minute]"),
];
const DATETIME_FORMATS: &[&[BorrowedFormatItem<'static>]] = &[
    DATETIME,
    fd!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    fd!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
    fd!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    fd!("[year]-[month]-[day] [hour]:[minute]"),
];

fn text(
    formatted: Result<String, time::error::Format>,
    fallback: impl FnOnce() -> String,
) -> Value {
    Value::Text(formatted.unwrap_or_else(|_| fallback()).into_bytes(), None)
}

impl Encode for Date {
    fn encode(self) -> Value {
        text(self.format(DATE), || self.to_string())
    }
}

impl Encode for Time {
    fn encode(self) -> Value {
        text(self.format(TIME), || self.to_string())
    }
}

impl Encode for PrimitiveDateTime {
    fn encode(self) -> Value {
        text(self.format(DATETIME), || self.to_string())
    }
}

impl Encode for OffsetDateTime {
    fn encode(self) -> Value {
        text(self.format(&Rfc3339), || self.to_string())
    }
}

impl Decode for Date {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        compatible!(value, SqliteDataType::Text | SqliteDataType::Date);
        Date::parse(value.text()?, DATE).map_err(|e| DecodeError::Conversion(e.to_string()))
    }
}

impl Decode for Time {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        compatible!(value, SqliteDataType::Text | SqliteDataType::Time);
        let text = value.text()?;
        TIME_FORMATS
            .iter()
            .find_map(|format| Time::parse(text, format).ok())
            .ok_or_else(|| format!("invalid time: {text}").into())
    }
}

impl Decode for PrimitiveDateTime {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        compatible!(
            value,
            SqliteDataType::Text
                | SqliteDataType::Datetime
                | SqliteDataType::Int
                | SqliteDataType::Int64
        );
        if let Value::Integer(ts, _) = value {
            let dt = from_unix(*ts)?;
            return Ok(PrimitiveDateTime::new(dt.date(), dt.time()));
        }
        let text = value.text()?;
        parse_datetime(text).ok_or_else(|| format!("invalid datetime: {text}").into())
    }
}

impl Decode for OffsetDateTime {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        compatible!(
            value,
            SqliteDataType::Text
                | SqliteDataType::Datetime
                | SqliteDataType::Int
                | SqliteDataType::Int64
        );
        if let Value::Integer(ts, _) = value {
            return from_unix(*ts);
        }
        let text = value.text()?;

        // Text without an offset is taken to be UTC, which is what SQLite's
        // `datetime()` returns.
        OffsetDateTime::parse(text, &Rfc3339)
            .ok()
            .or_else(|| parse_datetime(text).map(PrimitiveDateTime::assume_utc))
            .ok_or_else(|| format!("invalid offset datetime: {text}").into())
    }
}

fn from_unix(ts: i64) -> Result<OffsetDateTime, DecodeError> {
    OffsetDateTime::from_unix_timestamp(ts).map_err(|e| DecodeError::Conversion(e.to_string()))
}

fn parse_datetime(text: &str) -> Option<PrimitiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|format| PrimitiveDateTime::parse(text, format).ok())
}

#[cfg(test)]
mod tests {
    use time::macros::{date, datetime};

    use super::*;

    #[test]
    fn offset_datetime_keeps_its_offset() {
        let dt = datetime!(2023-12-25 15:30:45.123456789 +05:30);
        assert_eq!(OffsetDateTime::decode(&dt.encode()).unwrap(), dt);
    }

    #[test]
    fn sqlite_datetime_text_is_utc() {
        let value = Value::Text(b"2023-12-25 15:30:45".to_vec(), Some(SqliteDataType::Datetime));
        assert_eq!(
            OffsetDateTime::decode(&value).unwrap(),
            datetime!(2023-12-25 15:30:45 UTC)
        );
        assert_eq!(
            PrimitiveDateTime::decode(&value).unwrap(),
            datetime!(2023-12-25 15:30:45)
        );
    }

    #[test]
    fn unix_timestamps_decode() {
        let value = Value::Integer(1_703_516_445, Some(SqliteDataType::Int64));
        assert_eq!(
            OffsetDateTime::decode(&value).unwrap(),
            datetime!(2023-12-25 15:00:45 UTC)
        );
    }

    #[test]
    fn dates_and_times() {
        assert_eq!(date!(2024 - 02 - 29).encode(), Value::Text(b"2024-02-29".to_vec(), None));
        let short = Value::Text(b"08:15".to_vec(), None);
        assert_eq!(Time::decode(&short).unwrap(), time::macros::time!(08:15));
        assert!(Date::decode(&Value::Text(b"yesterday".to_vec(), None)).is_err());
        assert!(Date::decode(&Value::Integer(1, None)).is_err());
    }
}
