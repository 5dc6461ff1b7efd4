use crate::error::{DbError, DbResult};

/// Represents the smallest meaningful units (atoms) of the SQL language.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // --- SQL Keywords ---
    Create,
    Table,
    Insert,
    Into,
    Values,
    Select,
    From,
    Where,
    Update,
    Set,
    Delete,
    Drop,
    Join,
    On,
    Primary,
    Key,
    Unique,
    Not,
    Null,

    // --- Data Types ---
    Int,
    Float,
    Bool,
    Varchar,
    Text,

    // --- Identifiers & Literals ---
    /// A name representing a table or a column (e.g., `users`, `id`).
    Ident(String),
    /// A 64-bit integer literal (e.g., `42`).
    Number(i64),
    /// A string literal, defined between single quotes (e.g., `'Alice'`).
    String(String),
    /// A 64-bit floating-point literal (e.g., `3.14`).
    FloatNumber(f64),
    /// The boolean literal `TRUE`.
    True,
    /// The boolean literal `FALSE`.
    False,

    // --- Symbols ---
    /// Left parenthesis `(`
    LeftParen,
    /// Right parenthesis `)`
    RightParen,
    /// Comma `,`
    Comma,
    /// Semicolon `;`
    Semicolon,
    /// Multiplication or wildcard symbol `*`
    Star,
    /// Dot `.` separating a table qualifier from a column name
    Dot,
    /// Greater than
    Greater,
    /// Lower than
    Lower,
    /// Equal to
    Equal,
    /// Not equal to (`!=`)
    NotEqual,
    /// Greater than or equal to (`>=`)
    GreaterEqual,
    /// Lower than or equal to (`<=`)
    LowerEqual,

    // --- Special ---
    /// Represents the End Of File/Input.
    Eof,
}

/// A lexical scanner (lexer) that converts a raw SQL string into a sequence
/// of [Token]s.
pub struct Tokenizer {
    /// The input string stored as a vector of characters for easy iteration.
    input: Vec<char>,
    /// The current position in the character vector.
    position: usize,
}

impl Tokenizer {
    /// Creates a new Tokenizer for the given input string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Processes the entire input and returns a vector of tokens.
    ///
    /// # Errors
    /// Fails with [DbError::Syntax] if an invalid character is encountered
    /// or if a literal (like a string) is malformed.
    ///
    /// # Example
    /// ```
    /// # use reldb::tokenizer::{Tokenizer, Token};
    /// let mut t = Tokenizer::new("SELECT *");
    /// let tokens = t.tokenize().unwrap();
    /// assert_eq!(tokens[0], Token::Select);
    /// ```
    pub fn tokenize(&mut self) -> DbResult<Vec<Token>> {
        let mut tokens = Vec::new();

        while !self.is_at_end() {
            self.skip_whitespace();

            if self.is_at_end() {
                break;
            }

            let token = self.next_token()?;
            tokens.push(token);
        }

        tokens.push(Token::Eof);
        Ok(tokens)
    }

    /// Identifies the next token based on the character at the current position.
    fn next_token(&mut self) -> DbResult<Token> {
        let ch = self.current_char();

        match ch {
            '(' => {
                self.advance();
                Ok(Token::LeftParen)
            }
            ')' => {
                self.advance();
                Ok(Token::RightParen)
            }
            ',' => {
                self.advance();
                Ok(Token::Comma)
            }
            ';' => {
                self.advance();
                Ok(Token::Semicolon)
            }
            '*' => {
                self.advance();
                Ok(Token::Star)
            }
            '.' => {
                self.advance();
                Ok(Token::Dot)
            }
            '>' => {
                self.advance();
                if self.matches('=') {
                    Ok(Token::GreaterEqual)
                } else {
                    Ok(Token::Greater)
                }
            }
            '<' => {
                self.advance();
                if self.matches('=') {
                    Ok(Token::LowerEqual)
                } else {
                    Ok(Token::Lower)
                }
            }
            '=' => {
                self.advance();
                Ok(Token::Equal)
            }
            '!' => {
                self.advance();
                if self.matches('=') {
                    Ok(Token::NotEqual)
                } else {
                    Err(DbError::Syntax("expected '=' after '!'".into()))
                }
            }
            '-' => {
                self.advance();
                if !self.is_at_end() && self.current_char().is_numeric() {
                    match self.read_number()? {
                        Token::Number(n) => Ok(Token::Number(-n)),
                        Token::FloatNumber(f) => Ok(Token::FloatNumber(-f)),
                        _ => unreachable!("read_number only returns numbers"),
                    }
                } else {
                    Err(DbError::Syntax("expected a digit after '-'".into()))
                }
            }
            c if c.is_alphabetic() => self.read_identifier(),
            c if c.is_numeric() => self.read_number(),
            '\'' => self.read_string(),
            _ => Err(DbError::Syntax(format!(
                "character {ch:?} is not supported"
            ))),
        }
    }

    // --- Navigation Helpers ---

    /// Returns the character at the current position.
    fn current_char(&self) -> char {
        self.input[self.position]
    }

    /// Moves the cursor forward by one character.
    fn advance(&mut self) {
        self.position += 1;
    }

    /// Consumes the current character if it equals `expected`.
    fn matches(&mut self, expected: char) -> bool {
        if !self.is_at_end() && self.current_char() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Checks if the cursor has reached the end of the input.
    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Consumes any whitespace characters (spaces, tabs, newlines).
    fn skip_whitespace(&mut self) {
        while !self.is_at_end() && self.current_char().is_whitespace() {
            self.advance();
        }
    }

    // --- Extraction Logic ---

    /// Reads a sequence of alphanumeric characters and determines if it's
    /// a reserved SQL keyword or a user-defined identifier.
    ///
    /// Keywords are matched case-insensitively.
    fn read_identifier(&mut self) -> DbResult<Token> {
        let mut ident = String::new();

        while !self.is_at_end()
            && (self.current_char().is_alphanumeric() || self.current_char() == '_')
        {
            ident.push(self.current_char());
            self.advance();
        }

        match ident.to_uppercase().as_str() {
            "CREATE" => Ok(Token::Create),
            "TABLE" => Ok(Token::Table),
            "INSERT" => Ok(Token::Insert),
            "INTO" => Ok(Token::Into),
            "VALUES" => Ok(Token::Values),
            "SELECT" => Ok(Token::Select),
            "FROM" => Ok(Token::From),
            "WHERE" => Ok(Token::Where),
            "UPDATE" => Ok(Token::Update),
            "SET" => Ok(Token::Set),
            "DELETE" => Ok(Token::Delete),
            "DROP" => Ok(Token::Drop),
            "JOIN" => Ok(Token::Join),
            "ON" => Ok(Token::On),
            "PRIMARY" => Ok(Token::Primary),
            "KEY" => Ok(Token::Key),
            "UNIQUE" => Ok(Token::Unique),
            "NOT" => Ok(Token::Not),
            "NULL" => Ok(Token::Null),
            "INT" | "INTEGER" => Ok(Token::Int),
            "FLOAT" => Ok(Token::Float),
            "BOOLEAN" | "BOOL" => Ok(Token::Bool),
            "VARCHAR" => Ok(Token::Varchar),
            "TEXT" => Ok(Token::Text),
            "TRUE" => Ok(Token::True),
            "FALSE" => Ok(Token::False),
            _ => Ok(Token::Ident(ident)),
        }
    }

    /// Reads a numeric literal. If a dot `.` is encountered, it returns a
    /// [Token::FloatNumber], otherwise a [Token::Number].
    fn read_number(&mut self) -> DbResult<Token> {
        let mut number = String::new();
        let mut has_dot = false;

        while !self.is_at_end()
            && (self.current_char().is_numeric() || (self.current_char() == '.' && !has_dot))
        {
            if self.current_char() == '.' {
                has_dot = true;
            }
            number.push(self.current_char());
            self.advance();
        }

        if !self.is_at_end() && self.current_char() == '.' {
            return Err(DbError::Syntax(
                "multiple dots are not allowed for a float".into(),
            ));
        }

        if has_dot {
            return number
                .parse::<f64>()
                .map(Token::FloatNumber)
                .map_err(|e| DbError::Syntax(e.to_string()));
        }

        number
            .parse::<i64>()
            .map(Token::Number)
            .map_err(|e| DbError::Syntax(e.to_string()))
    }

    /// Reads a string literal enclosed in single quotes. No escaping: the
    /// literal ends at the first closing quote.
    fn read_string(&mut self) -> DbResult<Token> {
        self.advance(); // Skip the opening quote

        let mut string = String::new();
        while !self.is_at_end() && self.current_char() != '\'' {
            string.push(self.current_char());
            self.advance();
        }

        if self.is_at_end() {
            return Err(DbError::Syntax("unterminated string".into()));
        }

        // Skip the closing quote
        self.advance();

        Ok(Token::String(string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_simple() {
        let mut tokenizer = Tokenizer::new("CREATE TABLE users");
        let tokens = tokenizer.tokenize().unwrap();

        assert_eq!(
            tokens,
            vec![
                Token::Create,
                Token::Table,
                Token::Ident("users".into()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_create_table_with_constraints() {
        let mut tokenizer =
            Tokenizer::new("CREATE TABLE users (id INT PRIMARY KEY, name VARCHAR(100) NOT NULL)");
        let tokens = tokenizer.tokenize().unwrap();

        assert_eq!(
            tokens,
            vec![
                Token::Create,
                Token::Table,
                Token::Ident("users".into()),
                Token::LeftParen,
                Token::Ident("id".into()),
                Token::Int,
                Token::Primary,
                Token::Key,
                Token::Comma,
                Token::Ident("name".into()),
                Token::Varchar,
                Token::LeftParen,
                Token::Number(100),
                Token::RightParen,
                Token::Not,
                Token::Null,
                Token::RightParen,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_keywords_case_insensitive() {
        let mut tokenizer = Tokenizer::new("select * from users where id = 1");
        let tokens = tokenizer.tokenize().unwrap();

        assert_eq!(tokens[0], Token::Select);
        assert_eq!(tokens[2], Token::From);
        assert_eq!(tokens[4], Token::Where);
    }

    #[test]
    fn test_tokenize_comparison_operators() {
        let mut tokenizer = Tokenizer::new("= != > < >= <=");
        let tokens = tokenizer.tokenize().unwrap();

        assert_eq!(
            tokens,
            vec![
                Token::Equal,
                Token::NotEqual,
                Token::Greater,
                Token::Lower,
                Token::GreaterEqual,
                Token::LowerEqual,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_qualified_name() {
        let mut tokenizer = Tokenizer::new("users.id");
        let tokens = tokenizer.tokenize().unwrap();

        assert_eq!(
            tokens,
            vec![
                Token::Ident("users".into()),
                Token::Dot,
                Token::Ident("id".into()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_numbers() {
        let mut tokenizer = Tokenizer::new("42, -7, 3.14, -0.5");
        let tokens = tokenizer.tokenize().unwrap();

        assert_eq!(
            tokens,
            vec![
                Token::Number(42),
                Token::Comma,
                Token::Number(-7),
                Token::Comma,
                Token::FloatNumber(3.14),
                Token::Comma,
                Token::FloatNumber(-0.5),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_strings() {
        let mut tokenizer = Tokenizer::new("'Alice', '', 'Bob Dylan'");
        let tokens = tokenizer.tokenize().unwrap();

        assert_eq!(
            tokens,
            vec![
                Token::String("Alice".into()),
                Token::Comma,
                Token::String(String::new()),
                Token::Comma,
                Token::String("Bob Dylan".into()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let mut tokenizer = Tokenizer::new("'hello");
        let result = tokenizer.tokenize();

        assert!(matches!(result, Err(DbError::Syntax(_))));
    }

    #[test]
    fn test_bare_bang_is_an_error() {
        let mut tokenizer = Tokenizer::new("WHERE id ! 1");
        let result = tokenizer.tokenize();

        assert!(matches!(result, Err(DbError::Syntax(_))));
    }

    #[test]
    fn test_unsupported_character() {
        let mut tokenizer = Tokenizer::new("SELECT #");
        let result = tokenizer.tokenize();

        assert!(matches!(result, Err(DbError::Syntax(_))));
    }
}
