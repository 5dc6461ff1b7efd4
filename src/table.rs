use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::column::Column;
use crate::error::{DbError, DbResult};
use crate::index::Index;
use crate::predicate::{Comparison, row_matches};
use crate::value::Value;

/// Internal identity of a row. Assigned once at insert, strictly increasing,
/// never reused after delete, and never exposed in query projections.
pub type RowId = u64;

/// One stored row: its identity plus its values aligned with the table's
/// column list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub(crate) id: RowId,
    pub(crate) values: Vec<Value>,
}

/// The result of a `SELECT`: projected column names (qualified after a
/// join) and the matching rows in scan order.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    /// The names of the columns included in the result set.
    pub columns: Vec<String>,
    /// The actual data, returned as a vector of rows, where each row is a
    /// vector of [Value].
    pub rows: Vec<Vec<Value>>,
}

/// A table: an ordered column schema, a row store in insertion order, and
/// one duplicate-detection [Index] per constrained column.
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub(crate) rows: Vec<Row>,
    pub(crate) indexes: HashMap<String, Index>,
    pub(crate) next_row_id: RowId,
}

impl Table {
    pub fn new(name: String, columns: Vec<Column>) -> Self {
        let indexes = columns
            .iter()
            .filter(|col| col.is_constrained())
            .map(|col| (col.name.clone(), Index::new()))
            .collect();
        Self {
            name,
            columns,
            rows: Vec::new(),
            indexes,
            next_row_id: 0,
        }
    }

    /// Rebuilds a table from snapshot parts, reindexing the constrained
    /// columns from the stored rows.
    pub(crate) fn restore(
        name: String,
        columns: Vec<Column>,
        rows: Vec<Row>,
        next_row_id: RowId,
    ) -> Self {
        let mut table = Self::new(name, columns);
        for row in &rows {
            for (idx, col) in table.columns.iter().enumerate() {
                if let Some(index) = table.indexes.get_mut(&col.name) {
                    let value = &row.values[idx];
                    if !value.is_null() {
                        index.insert(value.clone(), row.id);
                    }
                }
            }
        }
        table.rows = rows;
        table.next_row_id = next_row_id;
        table
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of a column in the schema, if it exists.
    pub(crate) fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|col| col.name == name)
    }

    /// Inserts one row from a raw column-name → value map.
    ///
    /// Every schema column is validated in order (absent entries count as
    /// NULL); a non-null validated value for a constrained column must not
    /// already be indexed. Only when all columns pass is anything mutated,
    /// so a failed insert leaves the table untouched. Map entries naming no
    /// schema column are ignored.
    ///
    /// Returns the id assigned to the new row.
    ///
    /// # Errors
    /// [DbError::Validation] from column validation, or
    /// [DbError::ConstraintViolation] on a duplicate primary-key/unique
    /// value.
    pub fn insert(&mut self, values: &HashMap<String, Value>) -> DbResult<RowId> {
        let mut validated = Vec::with_capacity(self.columns.len());
        for col in &self.columns {
            let raw = values.get(&col.name).unwrap_or(&Value::Null);
            let value = col.validate(raw)?;

            if let Some(index) = self.indexes.get(&col.name) {
                if !value.is_null() && !index.search(&value).is_empty() {
                    return Err(DbError::ConstraintViolation(format!(
                        "duplicate value for {}",
                        col.name
                    )));
                }
            }
            validated.push(value);
        }

        let id = self.next_row_id;
        for (col, value) in self.columns.iter().zip(&validated) {
            if let Some(index) = self.indexes.get_mut(&col.name) {
                if !value.is_null() {
                    index.insert(value.clone(), id);
                }
            }
        }
        self.rows.push(Row {
            id,
            values: validated,
        });
        self.next_row_id += 1;
        Ok(id)
    }

    /// Full linear scan in row order. The predicate defaults to match-all;
    /// `columns` projects the requested subset in request order (unknown
    /// names silently dropped) or every column when `None`. Row ids never
    /// appear in the output.
    pub fn select(
        &self,
        columns: Option<&[String]>,
        predicate: Option<&Comparison>,
    ) -> QueryResult {
        let selected: Vec<(String, usize)> = match columns {
            None => self
                .columns
                .iter()
                .enumerate()
                .map(|(idx, col)| (col.name.clone(), idx))
                .collect(),
            Some(names) => names
                .iter()
                .filter_map(|name| self.column_index(name).map(|idx| (name.clone(), idx)))
                .collect(),
        };

        let rows = self
            .rows
            .iter()
            .filter(|row| self.matches(predicate, row))
            .map(|row| {
                selected
                    .iter()
                    .map(|(_, idx)| row.values[*idx].clone())
                    .collect()
            })
            .collect();

        QueryResult {
            columns: selected.into_iter().map(|(name, _)| name).collect(),
            rows,
        }
    }

    /// Applies the assignments to every matching row, in scan order.
    ///
    /// Each assignment is revalidated and applied independently: an unknown
    /// column name is skipped, and for a constrained column the old value
    /// leaves its index before the new value is checked for duplicates and
    /// inserted. Returns the number of matched rows.
    ///
    /// NOT atomic across the matched set: if a later row (or a later
    /// assignment) fails, earlier mutations within the same call remain
    /// applied.
    ///
    /// # Errors
    /// [DbError::Validation] from revalidation, or
    /// [DbError::ConstraintViolation] when a new value duplicates an indexed
    /// one.
    pub fn update(
        &mut self,
        assignments: &[(String, Value)],
        predicate: Option<&Comparison>,
    ) -> DbResult<usize> {
        let mut count = 0;
        for row_idx in 0..self.rows.len() {
            if !self.matches(predicate, &self.rows[row_idx]) {
                continue;
            }
            for (col_name, raw) in assignments {
                let Some(col_idx) = self.column_index(col_name) else {
                    continue;
                };
                let new_value = self.columns[col_idx].validate(raw)?;
                let row_id = self.rows[row_idx].id;

                if let Some(index) = self.indexes.get_mut(col_name) {
                    let old_value = &self.rows[row_idx].values[col_idx];
                    if !old_value.is_null() {
                        index.delete(old_value, row_id);
                    }
                    if !new_value.is_null() {
                        if !index.search(&new_value).is_empty() {
                            return Err(DbError::ConstraintViolation(format!(
                                "duplicate value for {col_name}"
                            )));
                        }
                        index.insert(new_value.clone(), row_id);
                    }
                }
                self.rows[row_idx].values[col_idx] = new_value;
            }
            count += 1;
        }
        Ok(count)
    }

    /// Removes every matching row, cleaning its constrained-index entries.
    /// Returns the number of rows removed.
    pub fn delete(&mut self, predicate: Option<&Comparison>) -> usize {
        let matched: Vec<usize> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| self.matches(predicate, row))
            .map(|(idx, _)| idx)
            .collect();

        for &row_idx in &matched {
            let row = &self.rows[row_idx];
            for (col_idx, col) in self.columns.iter().enumerate() {
                if let Some(index) = self.indexes.get_mut(&col.name) {
                    let value = &row.values[col_idx];
                    if !value.is_null() {
                        index.delete(value, row.id);
                    }
                }
            }
        }

        // remove back to front so earlier positions stay valid
        for &row_idx in matched.iter().rev() {
            self.rows.remove(row_idx);
        }
        matched.len()
    }

    fn matches(&self, predicate: Option<&Comparison>, row: &Row) -> bool {
        predicate.is_none_or(|cmp| row_matches(cmp, &self.columns, &row.values))
    }
}
