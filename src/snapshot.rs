//! Whole-database snapshot persistence.
//!
//! A snapshot file is a fixed 4-byte magic, a little-endian `u32` format
//! version, then a bincode-encoded [DatabaseSnapshot]: explicit records for
//! every table's schema, row-id counter, and rows in storage order.
//! Constraint indexes are not written; they are rebuilt from the rows at
//! load time, which reproduces their contents exactly.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::column::Column;
use crate::database::Database;
use crate::error::{DbError, DbResult};
use crate::table::{Row, RowId, Table};

const MAGIC: [u8; 4] = *b"RDBS";
const FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct DatabaseSnapshot {
    name: String,
    tables: Vec<TableSnapshot>,
}

#[derive(Serialize, Deserialize)]
struct TableSnapshot {
    name: String,
    columns: Vec<Column>,
    next_row_id: RowId,
    rows: Vec<Row>,
}

pub(crate) fn save(db: &Database, path: &Path) -> DbResult<()> {
    let mut tables: Vec<TableSnapshot> = db
        .tables()
        .map(|table| TableSnapshot {
            name: table.name.clone(),
            columns: table.columns.clone(),
            next_row_id: table.next_row_id,
            rows: table.rows.clone(),
        })
        .collect();
    // table iteration order is arbitrary; sort for deterministic bytes
    tables.sort_by(|a, b| a.name.cmp(&b.name));

    let snapshot = DatabaseSnapshot {
        name: db.name().to_string(),
        tables,
    };

    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&MAGIC)?;
    writer.write_all(&FORMAT_VERSION.to_le_bytes())?;
    bincode::serialize_into(&mut writer, &snapshot)
        .map_err(|e| DbError::Snapshot(e.to_string()))?;
    writer.flush()?;

    tracing::info!(path = %path.display(), tables = snapshot.tables.len(), "database saved");
    Ok(())
}

pub(crate) fn load(path: &Path) -> DbResult<Database> {
    let mut reader = BufReader::new(File::open(path)?);

    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(DbError::Snapshot(format!(
            "{} is not a database snapshot",
            path.display()
        )));
    }

    let mut version = [0u8; 4];
    reader.read_exact(&mut version)?;
    let version = u32::from_le_bytes(version);
    if version != FORMAT_VERSION {
        return Err(DbError::Snapshot(format!(
            "unsupported snapshot format version {version} (expected {FORMAT_VERSION})"
        )));
    }

    let snapshot: DatabaseSnapshot =
        bincode::deserialize_from(&mut reader).map_err(|e| DbError::Snapshot(e.to_string()))?;

    let mut db = Database::new(snapshot.name);
    for table in snapshot.tables {
        db.insert_restored_table(Table::restore(
            table.name,
            table.columns,
            table.rows,
            table.next_row_id,
        ));
    }

    tracing::info!(path = %path.display(), "database loaded");
    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::StatementResult;
    use crate::value::Value;
    use std::path::PathBuf;

    /// Temp-file path that cleans itself up when the test ends.
    struct TempSnapshot(PathBuf);

    impl TempSnapshot {
        fn new(name: &str) -> Self {
            Self(std::env::temp_dir().join(format!("reldb_{name}_{}.db", std::process::id())))
        }
    }

    impl Drop for TempSnapshot {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }

    fn populated_db() -> Database {
        let mut db = Database::new("snap_db");
        db.execute(
            "CREATE TABLE users (id INT PRIMARY KEY, name VARCHAR(100) NOT NULL, email VARCHAR(100) UNIQUE)",
        )
        .unwrap();
        db.execute("INSERT INTO users (id, name, email) VALUES (1, 'Alice', 'a@x.com')")
            .unwrap();
        db.execute("INSERT INTO users (id, name, email) VALUES (2, 'Bob', 'b@x.com')")
            .unwrap();
        // delete then insert so the row-id counter is ahead of the row count
        db.execute("DELETE FROM users WHERE id = 2").unwrap();
        db.execute("INSERT INTO users (id, name, email) VALUES (3, 'Carl', 'c@x.com')")
            .unwrap();
        db
    }

    #[test]
    fn test_round_trip_preserves_rows_and_schema() {
        let file = TempSnapshot::new("round_trip");
        let mut original = populated_db();
        original.save(&file.0).unwrap();

        let mut restored = Database::load(&file.0).unwrap();

        assert_eq!(restored.name(), "snap_db");
        let before = original.execute("SELECT * FROM users").unwrap();
        let after = restored.execute("SELECT * FROM users").unwrap();
        assert_eq!(before, after);

        let table = restored.table("users").unwrap();
        assert_eq!(table.columns, original.table("users").unwrap().columns);
    }

    #[test]
    fn test_round_trip_preserves_row_id_counter() {
        let file = TempSnapshot::new("counter");
        let original = populated_db();
        original.save(&file.0).unwrap();

        let mut restored = Database::load(&file.0).unwrap();
        restored
            .execute("INSERT INTO users (id, name) VALUES (4, 'Dana')")
            .unwrap();

        // three inserts and a delete happened before the snapshot, so the
        // next row id must continue from 3
        let table = restored.table("users").unwrap();
        assert_eq!(table.rows.last().unwrap().id, 3);
    }

    #[test]
    fn test_round_trip_rebuilds_indexes() {
        let file = TempSnapshot::new("indexes");
        populated_db().save(&file.0).unwrap();

        let mut restored = Database::load(&file.0).unwrap();

        // restored indexes still reject duplicates...
        let dup = restored.execute("INSERT INTO users (id, name) VALUES (1, 'Imposter')");
        assert!(matches!(dup, Err(DbError::ConstraintViolation(_))));

        // ...and still track exactly the live rows (deleted row 2 is gone)
        match restored
            .execute("INSERT INTO users (id, name, email) VALUES (2, 'Bob2', 'b@x.com')")
            .unwrap()
        {
            StatementResult::RowCount { count, .. } => assert_eq!(count, 1),
            other => panic!("expected a row count, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_magic_is_a_snapshot_error() {
        let file = TempSnapshot::new("magic");
        std::fs::write(&file.0, b"not a snapshot at all").unwrap();

        let result = Database::load(&file.0);

        assert!(matches!(result, Err(DbError::Snapshot(_))));
    }

    #[test]
    fn test_wrong_version_is_a_snapshot_error() {
        let file = TempSnapshot::new("version");
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&MAGIC);
        bytes.extend_from_slice(&99u32.to_le_bytes());
        std::fs::write(&file.0, bytes).unwrap();

        let result = Database::load(&file.0);

        assert!(matches!(result, Err(DbError::Snapshot(_))));
    }

    #[test]
    fn test_truncated_payload_is_a_snapshot_error() {
        let file = TempSnapshot::new("truncated");
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&MAGIC);
        bytes.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
        bytes.extend_from_slice(&[1, 2, 3]);
        std::fs::write(&file.0, bytes).unwrap();

        let result = Database::load(&file.0);

        assert!(matches!(result, Err(DbError::Snapshot(_))));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let result = Database::load("/nonexistent/dir/reldb_missing.db");

        assert!(matches!(result, Err(DbError::Io(_))));
    }

    #[test]
    fn test_snapshot_preserves_all_value_variants() {
        let file = TempSnapshot::new("values");
        let mut db = Database::new("types");
        db.execute("CREATE TABLE t (i INT, f FLOAT, b BOOLEAN, s VARCHAR(50), n INT)")
            .unwrap();
        db.execute("INSERT INTO t (i, f, b, s) VALUES (-7, 2.5, TRUE, 'hello')")
            .unwrap();
        db.save(&file.0).unwrap();

        let mut restored = Database::load(&file.0).unwrap();
        let result = restored.execute("SELECT * FROM t").unwrap();

        match result {
            StatementResult::Rows(rows) => assert_eq!(
                rows.rows[0],
                vec![
                    Value::Int(-7),
                    Value::Float(2.5),
                    Value::Bool(true),
                    Value::Text("hello".into()),
                    Value::Null,
                ]
            ),
            other => panic!("expected rows, got {other:?}"),
        }
    }
}
