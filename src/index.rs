use std::collections::HashMap;

use crate::table::RowId;
use crate::value::Value;

/// A value → row-id bucket map used to detect duplicate values on
/// primary-key and unique columns.
///
/// This is the only index structure in the engine, and it is consulted only
/// by write operations: reads (SELECT/WHERE/JOIN) always scan. Average-case
/// O(1) lookup through hashing; no ordering, no range queries.
#[derive(Debug, Default, Clone)]
pub struct Index {
    buckets: HashMap<Value, Vec<RowId>>,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `row_id` under `value`.
    pub fn insert(&mut self, value: Value, row_id: RowId) {
        self.buckets.entry(value).or_default().push(row_id);
    }

    /// Returns the row ids stored under `value`, empty if the value is
    /// absent.
    pub fn search(&self, value: &Value) -> &[RowId] {
        self.buckets.get(value).map_or(&[], Vec::as_slice)
    }

    /// Removes one occurrence of `row_id` from the bucket for `value`,
    /// dropping the bucket once it empties. Absent values and absent ids are
    /// ignored.
    pub fn delete(&mut self, value: &Value, row_id: RowId) {
        let now_empty = match self.buckets.get_mut(value) {
            Some(bucket) => {
                if let Some(pos) = bucket.iter().position(|id| *id == row_id) {
                    bucket.remove(pos);
                }
                bucket.is_empty()
            }
            None => false,
        };
        if now_empty {
            self.buckets.remove(value);
        }
    }

    /// Number of distinct values currently indexed.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_search() {
        let mut index = Index::new();

        index.insert(Value::Int(1), 0);
        index.insert(Value::Int(2), 1);

        assert_eq!(index.search(&Value::Int(1)), &[0]);
        assert_eq!(index.search(&Value::Int(2)), &[1]);
        assert_eq!(index.search(&Value::Int(3)), &[] as &[RowId]);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_shared_bucket() {
        let mut index = Index::new();

        index.insert(Value::Text("x".into()), 0);
        index.insert(Value::Text("x".into()), 1);

        assert_eq!(index.search(&Value::Text("x".into())), &[0, 1]);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_delete_drops_empty_bucket() {
        let mut index = Index::new();

        index.insert(Value::Int(1), 0);
        index.insert(Value::Int(1), 1);

        index.delete(&Value::Int(1), 0);
        assert_eq!(index.search(&Value::Int(1)), &[1]);

        index.delete(&Value::Int(1), 1);
        assert_eq!(index.search(&Value::Int(1)), &[] as &[RowId]);
        assert!(index.is_empty());
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let mut index = Index::new();
        index.insert(Value::Int(1), 0);

        index.delete(&Value::Int(2), 0);
        index.delete(&Value::Int(1), 99);

        assert_eq!(index.search(&Value::Int(1)), &[0]);
    }
}
