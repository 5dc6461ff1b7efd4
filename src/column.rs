use serde::{Deserialize, Serialize};

use crate::data_type::DataType;
use crate::error::{DbError, DbResult};
use crate::value::Value;

/// Schema entry for one table column: a name, a declared type, and the
/// constraint flags enforced on insert/update.
///
/// Columns are fixed at `CREATE TABLE` time and never change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// The name of the column.
    pub name: String,
    /// The logical data type of the column.
    pub data_type: DataType,
    /// Whether this column is the table's primary key.
    pub primary_key: bool,
    /// Whether values in this column must be unique across rows.
    pub unique: bool,
    /// Whether the column accepts NULL. A primary key never does.
    pub nullable: bool,
}

impl Column {
    /// Creates a plain column: not a primary key, not unique, nullable.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            primary_key: false,
            unique: false,
            nullable: true,
        }
    }

    /// Marks the column as the primary key. A primary key is never nullable.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    /// Marks the column as unique.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Marks the column as NOT NULL.
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Returns `true` if writes to this column must be checked against a
    /// duplicate-detection index.
    pub fn is_constrained(&self) -> bool {
        self.primary_key || self.unique
    }

    /// Validates a raw value against this column, coercing it to the
    /// column's data type.
    ///
    /// Raw values typically arrive as text literals from a parsed statement,
    /// but already-typed values pass through unchanged, so revalidating a
    /// validated value is a no-op.
    ///
    /// # Errors
    /// Fails with [DbError::Validation] when the value is NULL in a
    /// non-nullable column, when a numeric coercion fails, or when a string
    /// exceeds the column's maximum length.
    ///
    /// # Example
    /// ```
    /// # use reldb::column::Column;
    /// # use reldb::data_type::DataType;
    /// # use reldb::value::Value;
    /// let col = Column::new("age", DataType::Int);
    /// assert_eq!(col.validate(&Value::Text("30".into())).unwrap(), Value::Int(30));
    /// assert_eq!(col.validate(&Value::Null).unwrap(), Value::Null);
    /// ```
    pub fn validate(&self, raw: &Value) -> DbResult<Value> {
        if raw.is_null() {
            if !self.nullable {
                return Err(DbError::Validation(format!(
                    "column {} cannot be NULL",
                    self.name
                )));
            }
            return Ok(Value::Null);
        }

        match self.data_type {
            DataType::Int => self.coerce_int(raw),
            DataType::Float => self.coerce_float(raw),
            DataType::Bool => Ok(Value::Bool(coerce_bool(raw))),
            DataType::Varchar(max_len) => self.coerce_text(raw, max_len),
        }
    }

    fn coerce_int(&self, raw: &Value) -> DbResult<Value> {
        match raw {
            Value::Int(i) => Ok(Value::Int(*i)),
            Value::Bool(b) => Ok(Value::Int(*b as i64)),
            Value::Float(f) if f.is_finite() => Ok(Value::Int(*f as i64)),
            Value::Text(s) => s.trim().parse::<i64>().map(Value::Int).map_err(|_| {
                DbError::Validation(format!("cannot convert {s:?} to INT for column {}", self.name))
            }),
            _ => Err(DbError::Validation(format!(
                "cannot convert {raw:?} to INT for column {}",
                self.name
            ))),
        }
    }

    fn coerce_float(&self, raw: &Value) -> DbResult<Value> {
        match raw {
            Value::Float(f) => Ok(Value::Float(*f)),
            Value::Int(i) => Ok(Value::Float(*i as f64)),
            Value::Bool(b) => Ok(Value::Float(*b as i64 as f64)),
            Value::Text(s) => s.trim().parse::<f64>().map(Value::Float).map_err(|_| {
                DbError::Validation(format!(
                    "cannot convert {s:?} to FLOAT for column {}",
                    self.name
                ))
            }),
            Value::Null => unreachable!("NULL handled before coercion"),
        }
    }

    fn coerce_text(&self, raw: &Value, max_len: usize) -> DbResult<Value> {
        let s = match raw {
            Value::Text(s) => s.clone(),
            other => other.to_string().into(),
        };
        if s.chars().count() > max_len {
            return Err(DbError::Validation(format!(
                "string too long for {} (max {max_len})",
                self.name
            )));
        }
        Ok(Value::Text(s))
    }
}

/// Loose boolean parse: an existing boolean passes through, anything else is
/// stringified and matched case-insensitively against TRUE, 1, or YES.
/// Unrecognized text is `false`, never an error.
pub(crate) fn coerce_bool(raw: &Value) -> bool {
    match raw {
        Value::Bool(b) => *b,
        other => {
            let s = other.to_string().to_uppercase();
            matches!(s.as_str(), "TRUE" | "1" | "YES")
        }
    }
}
