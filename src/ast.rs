use crate::column::Column;
use crate::predicate::Comparison;
use crate::value::Value;

/// One parsed SQL statement, one variant per supported statement kind.
#[derive(Debug, PartialEq)]
pub enum Statement {
    CreateTable(CreateTable),
    InsertInto(InsertInto),
    Select(Select),
    Update(Update),
    Delete(Delete),
    DropTable(DropTable),
}

#[derive(Debug, PartialEq)]
pub struct CreateTable {
    pub name: String,
    pub columns: Vec<Column>,
}

#[derive(Debug, PartialEq)]
pub struct InsertInto {
    pub table: String,
    /// Explicit column list; `None` means positional insertion in schema
    /// order.
    pub columns: Option<Vec<String>>,
    pub values: Vec<Value>,
}

#[derive(Debug, PartialEq)]
pub enum ColumnsSelect {
    Star,
    /// Column names in request order; qualified (`table.column`) after a
    /// join.
    ColumnsNames(Vec<String>),
}

/// The single supported join form: `JOIN <table> ON <left> = <right>`,
/// where the left column belongs to the statement's FROM table and the
/// right column to the joined table.
#[derive(Debug, PartialEq)]
pub struct Join {
    pub table: String,
    pub left_column: String,
    pub right_column: String,
}

#[derive(Debug, PartialEq)]
pub struct Select {
    pub columns: ColumnsSelect,
    pub table: String,
    pub join: Option<Join>,
    pub where_clause: Option<Comparison>,
}

#[derive(Debug, PartialEq)]
pub struct Update {
    pub table: String,
    /// `SET` assignments in statement order, values still raw literals.
    pub assignments: Vec<(String, Value)>,
    pub where_clause: Option<Comparison>,
}

#[derive(Debug, PartialEq)]
pub struct Delete {
    pub table: String,
    pub where_clause: Option<Comparison>,
}

#[derive(Debug, PartialEq)]
pub struct DropTable {
    pub name: String,
}
