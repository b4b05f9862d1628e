//! Serde helpers for the shapes Twitarr sends.

use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;

/// `null`, `""`, `[]` and `{}` carry no information.
pub(super) fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Decodes a value, treating empty values as absent.
pub fn non_empty<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(de)?;
    if is_empty(&value) {
        return Ok(None);
    }
    T::deserialize(value).map(Some).map_err(serde::de::Error::custom)
}

/// Decodes a value, falling back to the default for empty values.
pub fn or_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    non_empty(de).map(Option::unwrap_or_default)
}

/// Dates as epoch milliseconds on the way out; epoch milliseconds or RFC 3339
/// strings on the way in.
pub mod epoch_millis {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_i64(date.timestamp_millis())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<DateTime<Utc>, D::Error> {
        let value = Value::deserialize(de)?;
        parse(&value).map_err(serde::de::Error::custom)
    }

    #[allow(clippy::cast_possible_truncation)]
    pub(super) fn parse(value: &Value) -> Result<DateTime<Utc>, String> {
        let millis = match value {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => match DateTime::parse_from_rfc3339(s) {
                Ok(date) => return Ok(date.with_timezone(&Utc)),
                Err(_) => s.trim().parse::<i64>().ok(),
            },
            _ => None,
        };
        millis
            .and_then(DateTime::from_timestamp_millis)
            .ok_or_else(|| format!("invalid date: {value}"))
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};
        use serde_json::Value;

        #[allow(clippy::ref_option)]
        pub fn serialize<S: Serializer>(
            date: &Option<DateTime<Utc>>,
            ser: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(date) => super::serialize(date, ser),
                None => ser.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            de: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            match Value::deserialize(de)? {
                Value::Null => Ok(None),
                value => super::parse(&value)
                    .map(Some)
                    .map_err(serde::de::Error::custom),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use serde_json::json;

    use super::*;

    #[test]
    fn dates_accept_millis_and_rfc3339() {
        let expected = DateTime::<Utc>::from_timestamp_millis(1_500_000_000_000).unwrap();
        assert_eq!(epoch_millis::parse(&json!(1_500_000_000_000_i64)), Ok(expected));
        assert_eq!(epoch_millis::parse(&json!("1500000000000")), Ok(expected));
        assert_eq!(
            epoch_millis::parse(&json!("2017-07-14T02:40:00Z")),
            Ok(expected)
        );
        assert!(epoch_millis::parse(&json!("yesterday")).is_err());
        assert!(epoch_millis::parse(&json!(true)).is_err());
    }

    #[test]
    fn emptiness() {
        for value in [json!(null), json!(""), json!([]), json!({})] {
            assert!(is_empty(&value), "{value}");
        }
        for value in [json!(0), json!(false), json!("x"), json!([1])] {
            assert!(!is_empty(&value), "{value}");
        }
    }
}
