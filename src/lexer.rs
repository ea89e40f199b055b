use tracing::trace;

use crate::error::{LexicalError, Span};
use crate::token::{Token, lookup_keyword};

/// Pull-based tokenizer: the parser asks for one token at a time.
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    read_position: usize,
    ch: u8,
    line: usize,
    col: usize,
    token_start: Span,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer {
            input,            // Input string
            position: 0,      // Points to current char
            read_position: 0, // Points ahead of current char
            ch: 0,            // Current char
            line: 1,
            col: 0,
            token_start: Span { line: 1, col: 1 },
        };
        lexer.read_char();
        lexer
    }

    /// Position of the first character of the most recently returned token.
    pub fn token_span(&self) -> Span {
        self.token_start
    }

    /// Returns the next token. Once the input is exhausted this keeps
    /// returning `Token::Eof`.
    pub fn next_token(&mut self) -> Result<Token, LexicalError> {
        self.skip_whitespace_and_comments()?;
        self.token_start = self.span();

        if self.at_end() {
            return Ok(Token::Eof);
        }

        let tok = match self.ch {
            b':' => {
                if self.peek_char() == b'=' {
                    self.read_char();
                    Token::Assign
                } else {
                    Token::Colon
                }
            }
            b'+' => Token::Plus,
            b'-' => Token::Minus,
            b'*' => Token::Mul,
            b'/' => Token::FloatDiv,
            b'(' => Token::LParen,
            b')' => Token::RParen,
            b';' => Token::Semi,
            b',' => Token::Comma,
            b'.' => Token::Dot,
            b'0'..=b'9' => {
                let tok = self.read_number()?;
                trace!(token = %tok, "token");
                return Ok(tok);
            }
            b'a'..=b'z' | b'A'..=b'Z' => {
                let ident = self.read_identifier();
                let tok = lookup_keyword(&ident).unwrap_or(Token::Id(ident));
                trace!(token = %tok, "token");
                return Ok(tok);
            }
            _ => {
                let ch = self
                    .input
                    .get(self.position..)
                    .and_then(|rest| rest.chars().next())
                    .unwrap_or(self.ch as char);
                return Err(LexicalError::UnexpectedChar {
                    ch,
                    span: self.token_start,
                });
            }
        };

        self.read_char();
        trace!(token = %tok, "token");
        Ok(tok)
    }

    fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn span(&self) -> Span {
        Span {
            line: self.line,
            col: self.col,
        }
    }

    fn read_char(&mut self) {
        if self.ch == b'\n' {
            self.line += 1;
            self.col = 0;
        }
        if self.read_position >= self.input.len() {
            // 0 stands in for "no more input"; `at_end` tells it apart from a NUL byte
            self.ch = 0;
        } else {
            self.ch = self.input.as_bytes()[self.read_position];
        }
        self.position = self.read_position;
        self.read_position += 1;
        self.col += 1;
    }

    fn peek_char(&self) -> u8 {
        if self.read_position >= self.input.len() {
            0
        } else {
            self.input.as_bytes()[self.read_position]
        }
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexicalError> {
        while !self.at_end() {
            if self.ch.is_ascii_whitespace() {
                self.read_char();
            } else if self.ch == b'{' {
                self.skip_comment()?;
            } else {
                break;
            }
        }
        Ok(())
    }

    fn skip_comment(&mut self) -> Result<(), LexicalError> {
        let start = self.span();
        // Consume {
        self.read_char();
        while !self.at_end() {
            if self.ch == b'}' {
                self.read_char();
                return Ok(());
            }
            self.read_char();
        }
        Err(LexicalError::UnterminatedComment { span: start })
    }

    fn read_identifier(&mut self) -> String {
        let position = self.position;
        while !self.at_end() && (self.ch.is_ascii_alphanumeric() || self.ch == b'_') {
            self.read_char();
        }
        self.input[position..self.position].to_string()
    }

    fn read_number(&mut self) -> Result<Token, LexicalError> {
        let position = self.position;
        while !self.at_end() && self.ch.is_ascii_digit() {
            self.read_char();
        }

        // `5.` followed by anything but a digit stays an integer and a DOT
        if self.ch == b'.' && self.peek_char().is_ascii_digit() {
            self.read_char();
            while !self.at_end() && self.ch.is_ascii_digit() {
                self.read_char();
            }
            let number = &self.input[position..self.position];
            // digits '.' digits always parses as f64
            let value = number.parse::<f64>().unwrap_or(f64::INFINITY);
            return Ok(Token::RealConst(value));
        }

        let number = &self.input[position..self.position];
        number
            .parse::<i64>()
            .map(Token::IntegerConst)
            .map_err(|_| LexicalError::IntegerOutOfRange {
                literal: number.to_string(),
                span: self.token_start,
            })
    }
}

/// Collects every token of `input`, ending with (and including) `Token::Eof`.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexicalError> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let tok = lexer.next_token()?;
        let done = tok == Token::Eof;
        tokens.push(tok);
        if done {
            return Ok(tokens);
        }
    }
}
