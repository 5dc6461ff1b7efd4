use crate::ast::*;
use crate::column::Column;
use crate::data_type::{DEFAULT_VARCHAR_LEN, DataType};
use crate::error::{DbError, DbResult};
use crate::predicate::{CompareOp, Comparison};
use crate::tokenizer::Token;
use crate::value::Value;

/// A recursive-descent parser turning a token stream into one [Statement].
///
/// The leading token picks the statement form; an unrecognized leading
/// keyword is an [DbError::Unsupported], while a malformed body inside a
/// recognized form is a [DbError::Syntax].
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    pub fn parse(&mut self) -> DbResult<Statement> {
        let statement = match self.current_token() {
            Token::Create => self.parse_create_table(),
            Token::Insert => self.parse_insert(),
            Token::Select => self.parse_select(),
            Token::Update => self.parse_update(),
            Token::Delete => self.parse_delete(),
            Token::Drop => self.parse_drop_table(),
            other => {
                return Err(DbError::Unsupported(format!(
                    "statement starting with {other:?}"
                )));
            }
        }?;

        // semicolon is optionnal in SQL so skip it
        if matches!(self.current_token(), Token::Semicolon) {
            self.advance();
        }

        // Check we are at the end of the statement
        if !self.is_at_end() {
            return Err(DbError::Syntax(format!(
                "unexpected token after statement: {:?}",
                self.current_token()
            )));
        }

        Ok(statement)
    }

    //helpers
    fn current_token(&self) -> &Token {
        &self.tokens[self.position]
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        matches!(self.current_token(), Token::Eof)
    }

    fn consume(&mut self, expected: Token) -> DbResult<()> {
        if *self.current_token() == expected {
            self.advance();
            Ok(())
        } else {
            Err(DbError::Syntax(format!(
                "expected {:?}, found {:?}",
                expected,
                self.current_token()
            )))
        }
    }

    fn consume_ident(&mut self) -> DbResult<String> {
        match self.current_token() {
            Token::Ident(string) => {
                let string = string.clone(); // Get the name
                self.advance();
                Ok(string)
            }
            _ => Err(DbError::Syntax(format!(
                "expected identifier, found {:?}",
                self.current_token()
            ))),
        }
    }

    /// Consumes `ident` or `ident.ident`, returning the dotted spelling.
    fn consume_column_ref(&mut self) -> DbResult<String> {
        let first = self.consume_ident()?;
        if matches!(self.current_token(), Token::Dot) {
            self.advance();
            let second = self.consume_ident()?;
            Ok(format!("{first}.{second}"))
        } else {
            Ok(first)
        }
    }

    /// Consumes a literal value: number, string, TRUE/FALSE, NULL, or a
    /// bare identifier (treated as unquoted text).
    fn consume_literal(&mut self) -> DbResult<Value> {
        let value = match self.current_token() {
            Token::Number(n) => Value::Int(*n),
            Token::FloatNumber(f) => Value::Float(*f),
            Token::String(s) => Value::Text(s.as_str().into()),
            Token::True => Value::Bool(true),
            Token::False => Value::Bool(false),
            Token::Null => Value::Null,
            Token::Ident(s) => Value::Text(s.as_str().into()),
            other => {
                return Err(DbError::Syntax(format!(
                    "expected a literal value, found {other:?}"
                )));
            }
        };
        self.advance();
        Ok(value)
    }

    fn consume_data_type(&mut self) -> DbResult<DataType> {
        match self.current_token() {
            Token::Int => {
                self.advance();
                Ok(DataType::Int)
            }
            Token::Float => {
                self.advance();
                Ok(DataType::Float)
            }
            Token::Bool => {
                self.advance();
                Ok(DataType::Bool)
            }
            Token::Text => {
                self.advance();
                Ok(DataType::Varchar(DEFAULT_VARCHAR_LEN))
            }
            Token::Varchar => {
                self.advance();
                if matches!(self.current_token(), Token::LeftParen) {
                    self.advance();
                    let max_len = match self.current_token() {
                        Token::Number(n) if *n > 0 => *n as usize,
                        other => {
                            return Err(DbError::Syntax(format!(
                                "expected a positive length after VARCHAR(, found {other:?}"
                            )));
                        }
                    };
                    self.advance();
                    self.consume(Token::RightParen)?;
                    Ok(DataType::Varchar(max_len))
                } else {
                    Ok(DataType::Varchar(DEFAULT_VARCHAR_LEN))
                }
            }
            _ => Err(DbError::Syntax(format!(
                "current token {:?} is not a column type",
                self.current_token()
            ))),
        }
    }

    fn parse_column_def(&mut self) -> DbResult<Column> {
        let name = self.consume_ident()?;
        let data_type = self.consume_data_type()?;

        let mut column = Column::new(name, data_type);
        // constraint flags may appear in any order after the type
        loop {
            match self.current_token() {
                Token::Primary => {
                    self.advance();
                    self.consume(Token::Key)?;
                    column = column.primary_key();
                }
                Token::Unique => {
                    self.advance();
                    column = column.unique();
                }
                Token::Not => {
                    self.advance();
                    self.consume(Token::Null)?;
                    column = column.not_null();
                }
                _ => break,
            }
        }
        Ok(column)
    }

    fn parse_create_table(&mut self) -> DbResult<Statement> {
        self.consume(Token::Create)?; // advance if CREATE
        self.consume(Token::Table)?; // advance if TABLE
        let name = self.consume_ident()?;
        self.consume(Token::LeftParen)?;
        let mut columns = vec![];
        loop {
            columns.push(self.parse_column_def()?);
            match self.current_token() {
                Token::RightParen => {
                    self.advance();
                    break;
                }
                Token::Comma => {
                    self.advance();
                    continue;
                }
                _ => return Err(DbError::Syntax("expected ',' or ')'".into())),
            }
        }
        Ok(Statement::CreateTable(CreateTable { name, columns }))
    }

    fn parse_insert(&mut self) -> DbResult<Statement> {
        self.consume(Token::Insert)?;
        self.consume(Token::Into)?;
        let table = self.consume_ident()?;

        let columns = if matches!(self.current_token(), Token::LeftParen) {
            self.advance();
            let mut names = vec![];
            loop {
                names.push(self.consume_ident()?);
                match self.current_token() {
                    Token::RightParen => {
                        self.advance();
                        break;
                    }
                    Token::Comma => {
                        self.advance();
                        continue;
                    }
                    _ => return Err(DbError::Syntax("expected ',' or ')'".into())),
                }
            }
            Some(names)
        } else {
            None
        };

        self.consume(Token::Values)?;
        self.consume(Token::LeftParen)?;
        let mut values = vec![];
        loop {
            values.push(self.consume_literal()?);
            match self.current_token() {
                Token::RightParen => {
                    self.advance();
                    break;
                }
                Token::Comma => {
                    self.advance();
                    continue;
                }
                _ => return Err(DbError::Syntax("expected ',' or ')'".into())),
            }
        }

        Ok(Statement::InsertInto(InsertInto {
            table,
            columns,
            values,
        }))
    }

    fn parse_select(&mut self) -> DbResult<Statement> {
        self.consume(Token::Select)?;

        let columns = if matches!(self.current_token(), Token::Star) {
            self.advance();
            ColumnsSelect::Star
        } else {
            let mut names = vec![];
            loop {
                names.push(self.consume_column_ref()?);
                if matches!(self.current_token(), Token::Comma) {
                    self.advance();
                    continue;
                }
                break;
            }
            ColumnsSelect::ColumnsNames(names)
        };

        self.consume(Token::From)?;
        let table = self.consume_ident()?;

        let join = if matches!(self.current_token(), Token::Join) {
            self.advance();
            let join_table = self.consume_ident()?;
            self.consume(Token::On)?;
            // qualifiers are positional: the left side names a column of the
            // FROM table, the right side a column of the joined table
            let left_column = strip_qualifier(self.consume_column_ref()?);
            self.consume(Token::Equal)?;
            let right_column = strip_qualifier(self.consume_column_ref()?);
            Some(Join {
                table: join_table,
                left_column,
                right_column,
            })
        } else {
            None
        };

        // a WHERE clause is only part of the single-table form
        let where_clause = if join.is_none() {
            self.parse_optional_where()?
        } else {
            None
        };

        Ok(Statement::Select(Select {
            columns,
            table,
            join,
            where_clause,
        }))
    }

    fn parse_update(&mut self) -> DbResult<Statement> {
        self.consume(Token::Update)?;
        let table = self.consume_ident()?;
        self.consume(Token::Set)?;

        let mut assignments = vec![];
        loop {
            let column = self.consume_ident()?;
            self.consume(Token::Equal)?;
            let value = self.consume_literal()?;
            assignments.push((column, value));
            if matches!(self.current_token(), Token::Comma) {
                self.advance();
                continue;
            }
            break;
        }

        let where_clause = self.parse_optional_where()?;

        Ok(Statement::Update(Update {
            table,
            assignments,
            where_clause,
        }))
    }

    fn parse_delete(&mut self) -> DbResult<Statement> {
        self.consume(Token::Delete)?;
        self.consume(Token::From)?;
        let table = self.consume_ident()?;
        let where_clause = self.parse_optional_where()?;

        Ok(Statement::Delete(Delete {
            table,
            where_clause,
        }))
    }

    fn parse_drop_table(&mut self) -> DbResult<Statement> {
        self.consume(Token::Drop)?;
        self.consume(Token::Table)?;
        let name = self.consume_ident()?;

        Ok(Statement::DropTable(DropTable { name }))
    }

    /// Parses `WHERE column OP literal` if present. Exactly one comparison:
    /// no AND/OR, no parentheses.
    fn parse_optional_where(&mut self) -> DbResult<Option<Comparison>> {
        if !matches!(self.current_token(), Token::Where) {
            return Ok(None);
        }
        self.advance();

        let column = self.consume_ident()?;
        let op = match self.current_token() {
            Token::Equal => CompareOp::Eq,
            Token::NotEqual => CompareOp::NotEq,
            Token::Greater => CompareOp::Gt,
            Token::Lower => CompareOp::Lt,
            Token::GreaterEqual => CompareOp::GtEq,
            Token::LowerEqual => CompareOp::LtEq,
            other => {
                return Err(DbError::Syntax(format!(
                    "expected a comparison operator, found {other:?}"
                )));
            }
        };
        self.advance();
        let value = self.consume_literal()?;

        Ok(Some(Comparison { column, op, value }))
    }
}

/// Drops an optional `table.` qualifier from a column reference.
fn strip_qualifier(column_ref: String) -> String {
    match column_ref.split_once('.') {
        Some((_, column)) => column.to_string(),
        None => column_ref,
    }
}
