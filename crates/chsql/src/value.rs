//! Scalar value model for statement arguments and clause candidates.
//!
//! [`SqlValue`] is the single argument type accepted by the formatter and the
//! `value` field carried by clause candidates. Conversions from common Rust
//! types are provided via `From`, including `Option<T>` (maps `None` to
//! `SqlValue::Null`) and `Vec<T>` (maps to `SqlValue::Array`).

use chrono::{DateTime, NaiveDateTime, Utc};
use uuid::Uuid;

/// A SQL scalar (or array) value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// NULL
    Null,
    /// Boolean (rendered as 1/0 in SQL)
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Unsigned integer
    UInt(u64),
    /// Floating point
    Float(f64),
    /// Text
    Text(String),
    /// Date and time, second precision in SQL literals
    DateTime(NaiveDateTime),
    /// UUID
    Uuid(Uuid),
    /// Array of values
    Array(Vec<SqlValue>),
}

impl SqlValue {
    /// Check whether this value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// String coercion of the value, used by the `ifHave` built-in rule.
    ///
    /// An empty result means the value is "absent" for clause-inclusion
    /// purposes: `Null`, the empty string, and the empty array all coerce
    /// to `""`. Every other value (including `0` and `false`) coerces to a
    /// non-empty string.
    pub fn display_string(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::UInt(u) => u.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => s.clone(),
            Self::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            Self::Uuid(u) => u.to_string(),
            Self::Array(items) => items
                .iter()
                .map(SqlValue::display_string)
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// Numeric coercion of the value, used by the `ifNumber` built-in rule.
    ///
    /// Returns `Some` only for values that coerce to a finite number:
    /// integers, finite floats, booleans (0/1), and strings that parse as a
    /// finite number (an empty or whitespace-only string coerces to zero).
    pub fn as_f64(&self) -> Option<f64> {
        let n = match self {
            Self::Null | Self::Uuid(_) | Self::DateTime(_) | Self::Array(_) => return None,
            Self::Bool(b) => f64::from(u8::from(*b)),
            Self::Int(i) => *i as f64,
            Self::UInt(u) => *u as f64,
            Self::Float(f) => *f,
            Self::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse::<f64>().ok()?
                }
            }
        };
        n.is_finite().then_some(n)
    }

    /// Render this value as a ClickHouse SQL literal.
    ///
    /// Text values are single-quoted with `'` and `\` escaped; datetimes use
    /// `'YYYY-MM-DD HH:MM:SS'`; arrays render as `[a, b, ...]`.
    pub fn to_sql_literal(&self) -> String {
        match self {
            Self::Null => "NULL".to_string(),
            Self::Bool(b) => u8::from(*b).to_string(),
            Self::Int(i) => i.to_string(),
            Self::UInt(u) => u.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => format!("'{}'", escape_string(s)),
            Self::DateTime(dt) => format!("'{}'", dt.format("%Y-%m-%d %H:%M:%S")),
            Self::Uuid(u) => format!("'{u}'"),
            Self::Array(items) => {
                let rendered = items
                    .iter()
                    .map(SqlValue::to_sql_literal)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("[{rendered}]")
            }
        }
    }
}

/// Escape a string for inclusion in a single-quoted ClickHouse literal.
fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            _ => out.push(c),
        }
    }
    out
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for SqlValue {
            fn from(v: $t) -> Self {
                Self::Int(i64::from(v))
            }
        })*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<isize> for SqlValue {
    fn from(v: isize) -> Self {
        Self::Int(v as i64)
    }
}

impl From<u64> for SqlValue {
    fn from(v: u64) -> Self {
        Self::UInt(v)
    }
}

impl From<usize> for SqlValue {
    fn from(v: usize) -> Self {
        Self::UInt(v as u64)
    }
}

impl From<f32> for SqlValue {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(v: NaiveDateTime) -> Self {
        Self::DateTime(v)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(v: DateTime<Utc>) -> Self {
        Self::DateTime(v.naive_utc())
    }
}

impl From<Uuid> for SqlValue {
    fn from(v: Uuid) -> Self {
        Self::Uuid(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Self::Null,
        }
    }
}

impl<T: Into<SqlValue>> From<Vec<T>> for SqlValue {
    fn from(v: Vec<T>) -> Self {
        Self::Array(v.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_string_coercions() {
        assert_eq!(SqlValue::Null.display_string(), "");
        assert_eq!(SqlValue::from(0).display_string(), "0");
        assert_eq!(SqlValue::from(false).display_string(), "false");
        assert_eq!(SqlValue::from("").display_string(), "");
        assert_eq!(SqlValue::from(vec![1, 2]).display_string(), "1,2");
        assert_eq!(SqlValue::Array(vec![]).display_string(), "");
    }

    #[test]
    fn numeric_coercions() {
        assert_eq!(SqlValue::from(42).as_f64(), Some(42.0));
        assert_eq!(SqlValue::from("42").as_f64(), Some(42.0));
        assert_eq!(SqlValue::from("1.5e3").as_f64(), Some(1500.0));
        assert_eq!(SqlValue::from(true).as_f64(), Some(1.0));
        assert_eq!(SqlValue::from("").as_f64(), Some(0.0));
        assert_eq!(SqlValue::from("abc").as_f64(), None);
        assert_eq!(SqlValue::Null.as_f64(), None);
        assert_eq!(SqlValue::Float(f64::NAN).as_f64(), None);
        assert_eq!(SqlValue::Float(f64::INFINITY).as_f64(), None);
    }

    #[test]
    fn literal_rendering() {
        assert_eq!(SqlValue::Null.to_sql_literal(), "NULL");
        assert_eq!(SqlValue::from(true).to_sql_literal(), "1");
        assert_eq!(SqlValue::from("it's").to_sql_literal(), r"'it\'s'");
        assert_eq!(SqlValue::from(r"a\b").to_sql_literal(), r"'a\\b'");
        assert_eq!(
            SqlValue::from(vec!["a", "b"]).to_sql_literal(),
            "['a', 'b']"
        );
    }

    #[test]
    fn option_and_vec_conversions() {
        assert_eq!(SqlValue::from(None::<i32>), SqlValue::Null);
        assert_eq!(SqlValue::from(Some(5)), SqlValue::Int(5));
        assert_eq!(
            SqlValue::from(vec![1u64, 2]),
            SqlValue::Array(vec![SqlValue::UInt(1), SqlValue::UInt(2)])
        );
    }
}
