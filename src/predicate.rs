use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::column::{Column, coerce_bool};
use crate::value::Value;

/// Comparison operator of a WHERE clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    Eq,
    NotEq,
    Gt,
    Lt,
    GtEq,
    LtEq,
}

impl CompareOp {
    fn matches(self, ord: Ordering) -> bool {
        match self {
            Self::Eq => ord == Ordering::Equal,
            Self::NotEq => ord != Ordering::Equal,
            Self::Gt => ord == Ordering::Greater,
            Self::Lt => ord == Ordering::Less,
            Self::GtEq => ord != Ordering::Less,
            Self::LtEq => ord != Ordering::Greater,
        }
    }
}

/// A compiled WHERE clause: exactly one `column OP literal` comparison.
///
/// Kept as plain data rather than a closure so predicates stay inspectable
/// and serializable; [row_matches] interprets them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub column: String,
    pub op: CompareOp,
    pub value: Value,
}

/// Evaluates a comparison against one row, given the table's column list and
/// the row's values in schema order.
///
/// The evaluation never fails:
/// - an unknown column name matches nothing;
/// - a NULL stored value fails every operator;
/// - the literal is coerced to the stored value's runtime type first, and a
///   coercion failure means the sides can only differ, so `!=` matches and
///   every other operator does not.
pub fn row_matches(cmp: &Comparison, columns: &[Column], values: &[Value]) -> bool {
    let Some(idx) = columns.iter().position(|c| c.name == cmp.column) else {
        return false;
    };
    let stored = &values[idx];
    if stored.is_null() {
        return false;
    }

    match coerce_literal(&cmp.value, stored) {
        Some(literal) => compare(stored, cmp.op, &literal),
        None => cmp.op == CompareOp::NotEq,
    }
}

/// Coerces a WHERE literal into the runtime type of the stored value it is
/// compared against. Returns `None` when no sensible coercion exists.
fn coerce_literal(literal: &Value, stored: &Value) -> Option<Value> {
    match stored {
        Value::Int(_) => match literal {
            Value::Int(i) => Some(Value::Int(*i)),
            Value::Text(s) => s.trim().parse::<i64>().ok().map(Value::Int),
            _ => None,
        },
        Value::Float(_) => match literal {
            Value::Float(f) => Some(Value::Float(*f)),
            Value::Int(i) => Some(Value::Float(*i as f64)),
            Value::Text(s) => s.trim().parse::<f64>().ok().map(Value::Float),
            _ => None,
        },
        Value::Bool(_) => match literal {
            Value::Null => None,
            other => Some(Value::Bool(coerce_bool(other))),
        },
        // Textual fallback: anything compares against a text column through
        // its rendered form.
        Value::Text(_) => match literal {
            Value::Null => None,
            other => Some(Value::Text(other.to_string().into())),
        },
        Value::Null => None,
    }
}

fn compare(stored: &Value, op: CompareOp, literal: &Value) -> bool {
    let ord = match (stored, literal) {
        (Value::Int(l), Value::Int(r)) => l.partial_cmp(r),
        (Value::Float(l), Value::Float(r)) => l.partial_cmp(r),
        (Value::Text(l), Value::Text(r)) => Some(l.cmp(r)),
        (Value::Bool(l), Value::Bool(r)) => Some(l.cmp(r)),
        _ => None,
    };
    match ord {
        Some(ord) => op.matches(ord),
        // incomparable pair (e.g. NaN) matches nothing
        None => false,
    }
}
