use std::io::{self, BufRead, Write};

use reldb::{Database, StatementResult};

/// Interactive shell over the engine: dot-commands for session control,
/// everything else forwarded verbatim to [Database::execute].
fn main() -> io::Result<()> {
    tracing_subscriber::fmt::init();

    let mut db = Database::default();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("reldb - interactive shell");
    println!("Commands: SQL statements, .exit, .save <file>, .load <file>, .tables");
    println!();

    loop {
        print!("rdbms> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        if line == ".exit" {
            println!("Goodbye!");
            break;
        } else if let Some(rest) = line.strip_prefix(".save") {
            let path = parse_path(rest);
            match db.save(path) {
                Ok(()) => println!("Database saved to {path}"),
                Err(e) => println!("Error: {e}"),
            }
        } else if let Some(rest) = line.strip_prefix(".load") {
            let path = parse_path(rest);
            match Database::load(path) {
                Ok(loaded) => {
                    db = loaded;
                    println!("Database loaded from {path}");
                }
                Err(e) => println!("Error: {e}"),
            }
        } else if line == ".tables" {
            let mut tables = db.list_tables();
            if tables.is_empty() {
                println!("No tables");
            } else {
                tables.sort();
                println!("Tables: {}", tables.join(", "));
            }
        } else {
            match db.execute(line) {
                Ok(result) => print_result(&result),
                Err(e) => println!("Error: {e}"),
            }
        }
    }

    Ok(())
}

fn parse_path(rest: &str) -> &str {
    let path = rest.trim();
    if path.is_empty() { "database.db" } else { path }
}

fn print_result(result: &StatementResult) {
    match result {
        StatementResult::Rows(rows) => {
            if rows.rows.is_empty() {
                println!("0 rows returned");
                return;
            }
            println!("{} row(s) returned:", rows.rows.len());
            for row in &rows.rows {
                let fields: Vec<String> = rows
                    .columns
                    .iter()
                    .zip(row)
                    .map(|(name, value)| format!("{name}: {value}"))
                    .collect();
                println!("{{{}}}", fields.join(", "));
            }
        }
        StatementResult::RowCount { message, .. } => println!("{message}"),
        StatementResult::Status(message) => println!("{message}"),
    }
}
