use std::fmt;

use thiserror::Error;

use crate::token::Token;

/// 1-based line and column of a character in the source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub col: usize,
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}:{}", self.line, self.col)
    }
}

/// A character that does not start any valid token.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexicalError {
    #[error("unrecognized character {ch:?} at {span}")]
    UnexpectedChar { ch: char, span: Span },
    #[error("integer literal {literal} is out of range at {span}")]
    IntegerOutOfRange { literal: String, span: Span },
    #[error("unterminated comment starting at {span}")]
    UnterminatedComment { span: Span },
}

/// The current token does not fit the production being parsed.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid syntax at {span}: expected {expected}, found {found}")]
pub struct SyntaxError {
    pub expected: String,
    pub found: Token,
    pub span: Span,
}

/// A variable was read before it held a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("variable {name} is not defined")]
pub struct NameError {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArithmeticError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer overflow in '{0}'")]
    Overflow(&'static str),
}

/// Everything that can abort a tokenize/parse/evaluate cycle.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("lexical error: {0}")]
    Lexical(#[from] LexicalError),
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),
    #[error("name error: {0}")]
    Name(#[from] NameError),
    #[error("arithmetic error: {0}")]
    Arithmetic(#[from] ArithmeticError),
}

impl Error {
    /// Short classification string used for logging.
    pub fn category(&self) -> &'static str {
        match self {
            Error::Lexical(_) => "lexical",
            Error::Syntax(_) => "syntax",
            Error::Name(_) => "name",
            Error::Arithmetic(_) => "arithmetic",
        }
    }
}
