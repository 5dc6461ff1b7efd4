use std::collections::HashMap;
use std::path::Path;

use crate::ast::{ColumnsSelect, InsertInto, Join, Select, Statement};
use crate::column::Column;
use crate::error::{DbError, DbResult};
use crate::parser::Parser;
use crate::snapshot;
use crate::table::{QueryResult, Table};
use crate::tokenizer::Tokenizer;
use crate::value::Value;

/// The main entry point for the embedded database engine.
/// It manages a collection of tables and orchestrates statement execution.
pub struct Database {
    /// The database name, carried into snapshots.
    name: String,
    /// A map of table names to their respective [Table] structures.
    tables: HashMap<String, Table>,
}

/// The outcome of one successfully executed statement.
#[derive(Debug, Clone, PartialEq)]
pub enum StatementResult {
    /// Rows returned by a `SELECT`.
    Rows(QueryResult),
    /// Rows affected by `INSERT`/`UPDATE`/`DELETE`, with a printable
    /// message.
    RowCount { count: usize, message: String },
    /// A plain status message from `CREATE TABLE`/`DROP TABLE`.
    Status(String),
}

impl Default for Database {
    fn default() -> Self {
        Self::new("main")
    }
}

impl Database {
    /// Creates a new, empty database instance.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: HashMap::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Creates a new table in the database.
    ///
    /// # Errors
    /// Fails with [DbError::AlreadyExists] if a table with the same name
    /// already exists.
    pub fn create_table(&mut self, name: String, columns: Vec<Column>) -> DbResult<()> {
        if self.tables.contains_key(&name) {
            return Err(DbError::AlreadyExists(name));
        }
        let table = Table::new(name.clone(), columns);
        self.tables.insert(name, table);
        Ok(())
    }

    /// Removes a table from the database by its name, discarding its rows
    /// and indexes. Rows referring to it from other tables are left alone:
    /// the engine enforces no foreign keys.
    ///
    /// # Errors
    /// Fails with [DbError::NotFound] if the table does not exist.
    pub fn drop_table(&mut self, name: &str) -> DbResult<()> {
        match self.tables.remove(name) {
            Some(_) => Ok(()),
            None => Err(DbError::NotFound(name.to_string())),
        }
    }

    /// Retrieves a reference to a table by name.
    ///
    /// # Errors
    /// Fails with [DbError::NotFound] if the table does not exist.
    pub fn table(&self, name: &str) -> DbResult<&Table> {
        self.tables
            .get(name)
            .ok_or_else(|| DbError::NotFound(name.to_string()))
    }

    /// Retrieves a mutable reference to a table by name.
    ///
    /// # Errors
    /// Fails with [DbError::NotFound] if the table does not exist.
    pub fn table_mut(&mut self, name: &str) -> DbResult<&mut Table> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| DbError::NotFound(name.to_string()))
    }

    /// Returns a list of all table names currently stored in the database.
    pub fn list_tables(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }

    pub(crate) fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    pub(crate) fn insert_restored_table(&mut self, table: Table) {
        self.tables.insert(table.name.clone(), table);
    }

    /// Parses and executes one SQL statement.
    ///
    /// Each call is independent and stateless apart from the database it
    /// operates on. The trailing `;` is optional.
    ///
    /// # Errors
    /// [DbError::Syntax] when the text does not match any recognized
    /// grammar, [DbError::Unsupported] on an unrecognized leading keyword,
    /// and whatever the executed operation itself fails with
    /// ([DbError::NotFound], [DbError::Validation],
    /// [DbError::ConstraintViolation], [DbError::AlreadyExists]).
    ///
    /// # Example
    /// ```
    /// use reldb::{Database, StatementResult, Value};
    ///
    /// let mut db = Database::new("demo");
    /// db.execute("CREATE TABLE users (id INT PRIMARY KEY, name VARCHAR(100))")
    ///     .unwrap();
    /// db.execute("INSERT INTO users (id, name) VALUES (1, 'Alice')")
    ///     .unwrap();
    ///
    /// let result = db.execute("SELECT name FROM users WHERE id = 1").unwrap();
    /// match result {
    ///     StatementResult::Rows(rows) => {
    ///         assert_eq!(rows.rows, vec![vec![Value::Text("Alice".into())]]);
    ///     }
    ///     _ => panic!("expected rows"),
    /// }
    /// ```
    pub fn execute(&mut self, sql: &str) -> DbResult<StatementResult> {
        let tokens = Tokenizer::new(sql).tokenize()?;
        let statement = Parser::new(tokens).parse()?;
        tracing::debug!(?statement, "executing statement");

        match statement {
            Statement::CreateTable(create) => {
                let name = create.name.clone();
                self.create_table(create.name, create.columns)?;
                Ok(StatementResult::Status(format!("Table {name} created")))
            }
            Statement::InsertInto(insert) => {
                self.insert(insert)?;
                Ok(StatementResult::RowCount {
                    count: 1,
                    message: "1 row inserted".into(),
                })
            }
            Statement::Select(select) => {
                let result = match &select.join {
                    Some(join) => self.select_join(&select, join)?,
                    None => {
                        let table = self.table(&select.table)?;
                        let columns = match &select.columns {
                            ColumnsSelect::Star => None,
                            ColumnsSelect::ColumnsNames(names) => Some(names.as_slice()),
                        };
                        table.select(columns, select.where_clause.as_ref())
                    }
                };
                Ok(StatementResult::Rows(result))
            }
            Statement::Update(update) => {
                let table = self.table_mut(&update.table)?;
                let count = table.update(&update.assignments, update.where_clause.as_ref())?;
                Ok(StatementResult::RowCount {
                    count,
                    message: format!("{count} row(s) updated"),
                })
            }
            Statement::Delete(delete) => {
                let table = self.table_mut(&delete.table)?;
                let count = table.delete(delete.where_clause.as_ref());
                Ok(StatementResult::RowCount {
                    count,
                    message: format!("{count} row(s) deleted"),
                })
            }
            Statement::DropTable(drop) => {
                self.drop_table(&drop.name)?;
                Ok(StatementResult::Status(format!("Table {} dropped", drop.name)))
            }
        }
    }

    /// Internal helper to handle row insertion logic.
    ///
    /// The explicit column-list form zips names to values (the shorter side
    /// wins, columns left out insert as NULL); the positional form follows
    /// the schema's column order. [Table::insert] performs all type
    /// coercion and constraint checking.
    fn insert(&mut self, insert: InsertInto) -> DbResult<()> {
        let table = self.table_mut(&insert.table)?;

        let raw: HashMap<String, Value> = match insert.columns {
            Some(columns) => columns.into_iter().zip(insert.values).collect(),
            None => table
                .columns
                .iter()
                .map(|col| col.name.clone())
                .zip(insert.values)
                .collect(),
        };

        table.insert(&raw)?;
        Ok(())
    }

    /// Executes the single supported join form: a nested-loop equality join
    /// over every row pair of the two tables.
    ///
    /// Each matching pair produces a merged row keyed `"table.column"` for
    /// every column of both sides; a non-`*` projection then restricts the
    /// merged row to the requested qualified names (unknown names silently
    /// dropped). Join keys compare by [Value] equality on the stored,
    /// already-typed values, so two NULLs match.
    ///
    /// # Errors
    /// [DbError::NotFound] for a missing table, [DbError::Validation] for
    /// an ON column that exists in neither position.
    fn select_join(&self, select: &Select, join: &Join) -> DbResult<QueryResult> {
        let left = self.table(&select.table)?;
        let right = self.table(&join.table)?;

        let left_idx = left.column_index(&join.left_column).ok_or_else(|| {
            DbError::Validation(format!(
                "column {} does not exist in table {}",
                join.left_column, left.name
            ))
        })?;
        let right_idx = right.column_index(&join.right_column).ok_or_else(|| {
            DbError::Validation(format!(
                "column {} does not exist in table {}",
                join.right_column, right.name
            ))
        })?;

        let merged_columns: Vec<String> = left
            .columns
            .iter()
            .map(|col| format!("{}.{}", left.name, col.name))
            .chain(
                right
                    .columns
                    .iter()
                    .map(|col| format!("{}.{}", right.name, col.name)),
            )
            .collect();

        let mut merged_rows = Vec::new();
        for left_row in &left.rows {
            for right_row in &right.rows {
                if left_row.values[left_idx] == right_row.values[right_idx] {
                    merged_rows.push(
                        left_row
                            .values
                            .iter()
                            .chain(right_row.values.iter())
                            .cloned()
                            .collect::<Vec<Value>>(),
                    );
                }
            }
        }

        match &select.columns {
            ColumnsSelect::Star => Ok(QueryResult {
                columns: merged_columns,
                rows: merged_rows,
            }),
            ColumnsSelect::ColumnsNames(names) => {
                let selected: Vec<(String, usize)> = names
                    .iter()
                    .filter_map(|name| {
                        merged_columns
                            .iter()
                            .position(|m| m == name)
                            .map(|idx| (name.clone(), idx))
                    })
                    .collect();
                let rows = merged_rows
                    .into_iter()
                    .map(|row| selected.iter().map(|(_, idx)| row[*idx].clone()).collect())
                    .collect();
                Ok(QueryResult {
                    columns: selected.into_iter().map(|(name, _)| name).collect(),
                    rows,
                })
            }
        }
    }

    /// Persists the whole database (schemas, rows with their ids, and
    /// row-id counters) to one snapshot file. Plain blocking write, no
    /// atomic rename: a crash mid-write can corrupt the file.
    ///
    /// # Errors
    /// [DbError::Io] on filesystem failures, [DbError::Snapshot] on an
    /// encoding failure.
    pub fn save(&self, path: impl AsRef<Path>) -> DbResult<()> {
        snapshot::save(self, path.as_ref())
    }

    /// Reconstructs a database from a snapshot file, rebuilding the
    /// constraint indexes from the stored rows.
    ///
    /// # Errors
    /// [DbError::Io] on filesystem failures, [DbError::Snapshot] when the
    /// file has the wrong magic or format version, or a garbled payload.
    pub fn load(path: impl AsRef<Path>) -> DbResult<Self> {
        snapshot::load(path.as_ref())
    }
}
