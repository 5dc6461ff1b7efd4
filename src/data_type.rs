use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum string length applied when a `VARCHAR` column omits one.
pub const DEFAULT_VARCHAR_LEN: usize = 255;

/// Represents the supported data types in the database schema.
/// These types define the structure of columns and the expected format of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    /// A 64-bit signed integer.
    Int,
    /// A 64-bit floating-point number.
    Float,
    /// A boolean value (true or false).
    Bool,
    /// A variable-length UTF-8 string, limited to the given number of
    /// characters.
    Varchar(usize),
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => write!(f, "INT"),
            Self::Float => write!(f, "FLOAT"),
            Self::Bool => write!(f, "BOOLEAN"),
            Self::Varchar(max_len) => write!(f, "VARCHAR({max_len})"),
        }
    }
}
