//! Materialized query results.
//!
//! A [`ResultSet`] is the caller-visible snapshot of one server result set:
//! column metadata plus fully fetched row data. Statements that produce no
//! result set (INSERT/UPDATE/DELETE/DDL) are represented as the absence of a
//! `ResultSet`, which is distinct from a SELECT that matched zero rows.

/// One cell value from a result set.
///
/// The text protocol transmits most non-NULL values as raw bytes; the
/// numeric accessors parse on demand.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL.
    Null,
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    UInt(u64),
    /// Floating point number.
    Double(f64),
    /// Raw bytes (strings, blobs, and text-protocol numerics).
    Bytes(Vec<u8>),
}

impl Value {
    /// Returns true for SQL NULL.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow the raw bytes, if this is a byte value.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// View the value as UTF-8 text, if it is byte-backed and valid UTF-8.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Bytes(bytes) => std::str::from_utf8(bytes).ok(),
            _ => None,
        }
    }

    /// Interpret the value as a signed integer.
    ///
    /// Byte-backed values (the text protocol's encoding of numerics) are
    /// parsed; lossless unsigned values are converted.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::UInt(v) => i64::try_from(*v).ok(),
            Self::Bytes(bytes) => std::str::from_utf8(bytes).ok()?.parse().ok(),
            _ => None,
        }
    }

    /// Interpret the value as an unsigned integer.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::UInt(v) => Some(*v),
            Self::Int(v) => u64::try_from(*v).ok(),
            Self::Bytes(bytes) => std::str::from_utf8(bytes).ok()?.parse().ok(),
            _ => None,
        }
    }

    /// Interpret the value as a float.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Double(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            Self::UInt(v) => Some(*v as f64),
            Self::Bytes(bytes) => std::str::from_utf8(bytes).ok()?.parse().ok(),
            Self::Null => None,
        }
    }

    /// Convert a driver value into the crate representation.
    ///
    /// Temporal values are rendered into their text-protocol form, so a
    /// DATETIME surfaces as e.g. `2024-05-01 12:30:00`.
    pub(crate) fn from_driver(value: mysql::Value) -> Self {
        match value {
            mysql::Value::NULL => Self::Null,
            mysql::Value::Int(v) => Self::Int(v),
            mysql::Value::UInt(v) => Self::UInt(v),
            mysql::Value::Float(v) => Self::Double(f64::from(v)),
            mysql::Value::Double(v) => Self::Double(v),
            mysql::Value::Bytes(bytes) => Self::Bytes(bytes),
            mysql::Value::Date(year, month, day, hour, minute, second, micros) => {
                let text = if (hour, minute, second, micros) == (0, 0, 0, 0) {
                    format!("{year:04}-{month:02}-{day:02}")
                } else if micros == 0 {
                    format!("{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}")
                } else {
                    format!(
                        "{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}.{micros:06}"
                    )
                };
                Self::Bytes(text.into_bytes())
            }
            mysql::Value::Time(negative, days, hours, minutes, seconds, micros) => {
                let sign = if negative { "-" } else { "" };
                let total_hours = u32::from(hours) + days * 24;
                let text = if micros == 0 {
                    format!("{sign}{total_hours:02}:{minutes:02}:{seconds:02}")
                } else {
                    format!("{sign}{total_hours:02}:{minutes:02}:{seconds:02}.{micros:06}")
                };
                Self::Bytes(text.into_bytes())
            }
        }
    }
}

/// Metadata for one result-set column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Column name (alias if the query used one).
    pub name: String,
    /// Wire-protocol column type code.
    pub type_code: u8,
    /// Whether the column carries a NOT NULL constraint.
    pub not_null: bool,
}

impl Column {
    pub(crate) fn from_driver(column: &mysql::Column) -> Self {
        Self {
            name: column.name_str().into_owned(),
            type_code: column.column_type() as u8,
            not_null: column
                .flags()
                .contains(mysql::consts::ColumnFlags::NOT_NULL_FLAG),
        }
    }
}

/// A fully materialized result set: column metadata plus row data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultSet {
    columns: Vec<Column>,
    rows: Vec<Vec<Value>>,
}

impl ResultSet {
    pub(crate) const fn new(columns: Vec<Column>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    /// Column metadata, in select order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Row data; each row has exactly `columns().len()` values.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of rows fetched.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// True when the set matched zero rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Consume the set, yielding owned rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<Vec<Value>> {
        self.rows
    }
}
