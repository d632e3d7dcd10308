//! Lenient field deserializers for API payloads.
//!
//! The subscription API is loose about numeric types: counts arrive as numbers,
//! numeric strings, `null`, or are missing entirely, and dates may be sent as
//! `20250101` integers. These helpers never reject a value; anything that can't
//! be read degrades to `None`.

use std::fmt;

use serde::de::{self, IgnoredAny};
use serde::Deserializer;

/// Intermediate representation of a loosely typed number.
enum Lenient {
    Int(i64),
    Float(f64),
    Absent,
}

impl Lenient {
    fn from_str(v: &str) -> Self {
        let cleaned: String = v.trim().chars().filter(|c| *c != ',').collect();
        if cleaned.is_empty() {
            return Lenient::Absent;
        }
        if let Ok(i) = cleaned.parse::<i64>() {
            return Lenient::Int(i);
        }
        match cleaned.parse::<f64>() {
            Ok(f) if f.is_finite() => Lenient::Float(f),
            _ => Lenient::Absent,
        }
    }
}

struct LenientVisitor;

impl<'de> de::Visitor<'de> for LenientVisitor {
    type Value = Lenient;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a number, numeric string, or null")
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Lenient::Int(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
        Ok(i64::try_from(v).map(Lenient::Int).unwrap_or(Lenient::Absent))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E> {
        if v.is_finite() {
            Ok(Lenient::Float(v))
        } else {
            Ok(Lenient::Absent)
        }
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Lenient::from_str(v))
    }

    fn visit_bool<E>(self, _v: bool) -> Result<Self::Value, E> {
        Ok(Lenient::Absent)
    }

    fn visit_none<E>(self) -> Result<Self::Value, E> {
        Ok(Lenient::Absent)
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E> {
        Ok(Lenient::Absent)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(LenientVisitor)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: de::SeqAccess<'de>,
    {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Lenient::Absent)
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: de::MapAccess<'de>,
    {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(Lenient::Absent)
    }
}

/// Deserialize an integer count. Fractions are truncated; anything unreadable is `None`.
pub fn deserialize_count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match deserializer.deserialize_any(LenientVisitor)? {
        Lenient::Int(i) => Some(i),
        Lenient::Float(f) => Some(f.trunc() as i64),
        Lenient::Absent => None,
    })
}

/// Deserialize a floating point value such as a coordinate or a unit price.
pub fn deserialize_decimal<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match deserializer.deserialize_any(LenientVisitor)? {
        Lenient::Int(i) => Some(i as f64),
        Lenient::Float(f) => Some(f),
        Lenient::Absent => None,
    })
}

/// Deserialize a string or number as `Option<String>`. Empty strings are `None`.
pub fn deserialize_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrNumberVisitor;

    impl<'de> de::Visitor<'de> for StringOrNumberVisitor {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or number")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E> {
            if v.trim().is_empty() {
                Ok(None)
            } else {
                Ok(Some(v.to_string()))
            }
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_bool<E>(self, _v: bool) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_any(StringOrNumberVisitor)
        }
    }

    deserializer.deserialize_any(StringOrNumberVisitor)
}
