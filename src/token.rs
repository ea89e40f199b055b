use std::fmt;

#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    // Keywords
    Program,
    Var,
    Begin,
    End,

    // Types
    Integer,
    Real,

    // Literals
    IntegerConst(i64),
    RealConst(f64),

    // Identifier
    Id(String),

    // Operators
    Plus,
    Minus,
    Mul,
    FloatDiv,
    IntegerDiv,
    Assign,

    // Delimiters
    LParen,
    RParen,
    Semi,
    Colon,
    Comma,
    Dot,

    // EOF
    Eof,
}

impl Token {
    /// Upper-case kind name, as used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Token::Program => "PROGRAM",
            Token::Var => "VAR",
            Token::Begin => "BEGIN",
            Token::End => "END",
            Token::Integer => "INTEGER",
            Token::Real => "REAL",
            Token::IntegerConst(_) => "INTEGER_CONST",
            Token::RealConst(_) => "REAL_CONST",
            Token::Id(_) => "ID",
            Token::Plus => "PLUS",
            Token::Minus => "MINUS",
            Token::Mul => "MUL",
            Token::FloatDiv => "FLOAT_DIV",
            Token::IntegerDiv => "INTEGER_DIV",
            Token::Assign => "ASSIGN",
            Token::LParen => "LPAREN",
            Token::RParen => "RPAREN",
            Token::Semi => "SEMI",
            Token::Colon => "COLON",
            Token::Comma => "COMMA",
            Token::Dot => "DOT",
            Token::Eof => "EOF",
        }
    }

    /// Source text the token stands for.
    pub fn literal(&self) -> String {
        match self {
            Token::Program => "PROGRAM".into(),
            Token::Var => "VAR".into(),
            Token::Begin => "BEGIN".into(),
            Token::End => "END".into(),
            Token::Integer => "INTEGER".into(),
            Token::Real => "REAL".into(),
            Token::IntegerConst(value) => value.to_string(),
            Token::RealConst(value) => format!("{value:?}"),
            Token::Id(name) => name.clone(),
            Token::Plus => "+".into(),
            Token::Minus => "-".into(),
            Token::Mul => "*".into(),
            Token::FloatDiv => "/".into(),
            Token::IntegerDiv => "DIV".into(),
            Token::Assign => ":=".into(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),
            Token::Semi => ";".into(),
            Token::Colon => ":".into(),
            Token::Comma => ",".into(),
            Token::Dot => ".".into(),
            Token::Eof => "".into(),
        }
    }

    /// Same kind, ignoring any literal payload.
    pub fn same_kind(&self, other: &Token) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({}, {:?})", self.kind(), self.literal())
    }
}

/// Looks up a reserved word. Matching is case-sensitive.
pub fn lookup_keyword(ident: &str) -> Option<Token> {
    match ident {
        "PROGRAM" => Some(Token::Program),
        "VAR" => Some(Token::Var),
        "BEGIN" => Some(Token::Begin),
        "END" => Some(Token::End),
        "INTEGER" => Some(Token::Integer),
        "REAL" => Some(Token::Real),
        "DIV" => Some(Token::IntegerDiv),
        _ => None,
    }
}
