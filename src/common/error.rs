use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("I/O Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Syntax Error: {0}")]
    Syntax(#[from] SyntaxError),

    #[error("Logging Error: {0}")]
    Logging(String),
}

/// Diagnostic raised by the grammar engine when the input does not match.
/// Line is 1-based, column is 0-based (offset within the line).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}:{column} {message}")]
pub struct SyntaxError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl SyntaxError {
    pub fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self { line, column, message: message.into() }
    }
}
