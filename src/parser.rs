use tracing::debug;

use crate::ast::{
    BinaryOperator, Block, Compound, Expression, Input, Program, Statement, TypeSpec,
    UnaryOperator, VarDecl,
};
use crate::error::{Error, Span, SyntaxError};
use crate::lexer::Lexer;
use crate::token::Token;

/// Recursive-descent parser, one method per production, one token of lookahead.
///
/// Tokens are pulled from the lexer as they are consumed; nothing is buffered
/// beyond `current_token`. The first mismatch aborts the whole parse.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current_token: Token,
    current_span: Span,
}

impl<'a> Parser<'a> {
    pub fn new(lexer: Lexer<'a>) -> Result<Self, Error> {
        let mut parser = Parser {
            lexer,
            current_token: Token::Eof,
            current_span: Span::default(),
        };

        // Load the lookahead token
        parser.next_token()?;

        Ok(parser)
    }

    fn next_token(&mut self) -> Result<(), Error> {
        self.current_token = self.lexer.next_token()?;
        self.current_span = self.lexer.token_span();
        Ok(())
    }

    fn error(&self, expected: impl Into<String>) -> Error {
        SyntaxError {
            expected: expected.into(),
            found: self.current_token.clone(),
            span: self.current_span,
        }
        .into()
    }

    /// Consumes the current token if it has the same kind as `expected`.
    fn eat(&mut self, expected: Token) -> Result<(), Error> {
        if self.current_token.same_kind(&expected) {
            self.next_token()
        } else {
            Err(self.error(expected.kind()))
        }
    }

    fn expect_eof(&self) -> Result<(), Error> {
        if self.current_token == Token::Eof {
            Ok(())
        } else {
            Err(self.error(Token::Eof.kind()))
        }
    }

    /// Parses a complete program and requires the input to end right after it.
    pub fn parse(&mut self) -> Result<Program, Error> {
        let program = self.program()?;
        self.expect_eof()?;
        Ok(program)
    }

    /// Parses one unit of interactive input: a program, a statement list, or
    /// an expression.
    ///
    /// A leading identifier is consumed before deciding; `:=` after it makes
    /// the line a statement list, anything else continues it as an expression.
    pub fn parse_input(&mut self) -> Result<Input, Error> {
        let input = match self.current_token.clone() {
            Token::Program => Input::Program(self.program()?),
            Token::Begin | Token::Semi | Token::Eof => {
                let children = self.statement_list(&Token::Eof)?;
                Input::Statements(Compound { children })
            }
            Token::Id(_) => {
                let name = self.variable()?;
                if self.current_token == Token::Assign {
                    let first = self.assignment_statement(name)?;
                    let children = self.statement_list_from(first, &Token::Eof)?;
                    Input::Statements(Compound { children })
                } else {
                    let node = self.term_rest(Expression::Var(name))?;
                    Input::Expression(self.expr_rest(node)?)
                }
            }
            _ => Input::Expression(self.expr()?),
        };
        self.expect_eof()?;
        Ok(input)
    }

    // program : PROGRAM variable SEMI block DOT
    fn program(&mut self) -> Result<Program, Error> {
        self.eat(Token::Program)?;
        let name = self.variable()?;
        self.eat(Token::Semi)?;
        let block = self.block()?;
        self.eat(Token::Dot)?;
        debug!(
            program = %name,
            declarations = block.declarations.len(),
            statements = block.body.children.len(),
            "parsed program"
        );
        Ok(Program { name, block })
    }

    // block : declarations compound_statement
    fn block(&mut self) -> Result<Block, Error> {
        let declarations = self.declarations()?;
        let body = self.compound_statement()?;
        Ok(Block { declarations, body })
    }

    // declarations : VAR (variable_declaration SEMI)+ | empty
    fn declarations(&mut self) -> Result<Vec<VarDecl>, Error> {
        let mut declarations = Vec::new();
        if self.current_token == Token::Var {
            self.eat(Token::Var)?;
            loop {
                declarations.extend(self.variable_declaration()?);
                self.eat(Token::Semi)?;
                if !matches!(self.current_token, Token::Id(_)) {
                    break;
                }
            }
        }
        Ok(declarations)
    }

    // variable_declaration : ID (COMMA ID)* COLON type_spec
    fn variable_declaration(&mut self) -> Result<Vec<VarDecl>, Error> {
        let mut names = vec![self.variable()?];

        while self.current_token == Token::Comma {
            self.eat(Token::Comma)?;
            names.push(self.variable()?);
        }

        self.eat(Token::Colon)?;

        let type_spec = self.type_spec()?;
        Ok(names
            .into_iter()
            .map(|name| VarDecl { name, type_spec })
            .collect())
    }

    // type_spec : INTEGER | REAL
    fn type_spec(&mut self) -> Result<TypeSpec, Error> {
        let type_spec = match self.current_token {
            Token::Integer => TypeSpec::Integer,
            Token::Real => TypeSpec::Real,
            _ => return Err(self.error("INTEGER or REAL")),
        };
        self.next_token()?;
        Ok(type_spec)
    }

    // compound_statement : BEGIN statement_list END
    fn compound_statement(&mut self) -> Result<Compound, Error> {
        self.eat(Token::Begin)?;
        let children = self.statement_list(&Token::End)?;
        self.eat(Token::End)?;
        Ok(Compound { children })
    }

    // statement_list : statement (SEMI statement)*
    fn statement_list(&mut self, terminator: &Token) -> Result<Vec<Statement>, Error> {
        let first = self.statement()?;
        self.statement_list_from(first, terminator)
    }

    /// Continues a statement list whose first statement is already parsed.
    /// A `;` directly before `terminator` is tolerated.
    fn statement_list_from(
        &mut self,
        first: Statement,
        terminator: &Token,
    ) -> Result<Vec<Statement>, Error> {
        let mut nodes = vec![first];
        while self.current_token == Token::Semi {
            self.eat(Token::Semi)?;
            if self.current_token == *terminator {
                break;
            }
            nodes.push(self.statement()?);
        }
        Ok(nodes)
    }

    // statement : compound_statement | assignment_statement | empty
    fn statement(&mut self) -> Result<Statement, Error> {
        match self.current_token {
            Token::Begin => Ok(Statement::Compound(self.compound_statement()?)),
            Token::Id(_) => {
                let target = self.variable()?;
                self.assignment_statement(target)
            }
            _ => Ok(Statement::NoOp),
        }
    }

    // assignment_statement : variable ASSIGN expr
    // `target` has already been consumed.
    fn assignment_statement(&mut self, target: String) -> Result<Statement, Error> {
        self.eat(Token::Assign)?;
        let value = self.expr()?;
        Ok(Statement::Assign { target, value })
    }

    // variable : ID
    fn variable(&mut self) -> Result<String, Error> {
        match &self.current_token {
            Token::Id(name) => {
                let name = name.clone();
                self.next_token()?;
                Ok(name)
            }
            _ => Err(self.error("ID")),
        }
    }

    // expr : term ((PLUS | MINUS) term)*
    fn expr(&mut self) -> Result<Expression, Error> {
        let node = self.term()?;
        self.expr_rest(node)
    }

    fn expr_rest(&mut self, mut node: Expression) -> Result<Expression, Error> {
        loop {
            let op = match self.current_token {
                Token::Plus => BinaryOperator::Add,
                Token::Minus => BinaryOperator::Sub,
                _ => return Ok(node),
            };
            self.next_token()?;
            let right = self.term()?;
            node = Expression::binary(node, op, right);
        }
    }

    // term : factor ((MUL | FLOAT_DIV | INTEGER_DIV) factor)*
    fn term(&mut self) -> Result<Expression, Error> {
        let node = self.factor()?;
        self.term_rest(node)
    }

    fn term_rest(&mut self, mut node: Expression) -> Result<Expression, Error> {
        loop {
            let op = match self.current_token {
                Token::Mul => BinaryOperator::Mul,
                Token::FloatDiv => BinaryOperator::FloatDiv,
                Token::IntegerDiv => BinaryOperator::IntegerDiv,
                _ => return Ok(node),
            };
            self.next_token()?;
            let right = self.factor()?;
            node = Expression::binary(node, op, right);
        }
    }

    // factor : (PLUS | MINUS) factor
    //        | INTEGER_CONST
    //        | REAL_CONST
    //        | LPAREN expr RPAREN
    //        | variable
    fn factor(&mut self) -> Result<Expression, Error> {
        match self.current_token.clone() {
            Token::Plus | Token::Minus => {
                let op = if self.current_token == Token::Plus {
                    UnaryOperator::Plus
                } else {
                    UnaryOperator::Minus
                };
                self.next_token()?; // Consume the unary operator
                let operand = self.factor()?;
                Ok(Expression::unary(op, operand))
            }
            Token::IntegerConst(value) => {
                self.next_token()?;
                Ok(Expression::Integer(value))
            }
            Token::RealConst(value) => {
                self.next_token()?;
                Ok(Expression::Real(value))
            }
            Token::LParen => {
                self.eat(Token::LParen)?;
                let node = self.expr()?;
                self.eat(Token::RParen)?;
                Ok(node)
            }
            Token::Id(name) => {
                self.next_token()?;
                Ok(Expression::Var(name))
            }
            _ => Err(self.error("expression")),
        }
    }
}

/// Parses a complete program from source text.
pub fn parse_program(source: &str) -> Result<Program, Error> {
    Parser::new(Lexer::new(source))?.parse()
}

/// Parses one unit of interactive input from source text.
pub fn parse_input(source: &str) -> Result<Input, Error> {
    Parser::new(Lexer::new(source))?.parse_input()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LexicalError;

    fn parse_expr(input: &str) -> Expression {
        match parse_input(input).unwrap() {
            Input::Expression(expr) => expr,
            other => panic!("expected an expression, got {other:?}"),
        }
    }

    fn syntax_error(result: Result<impl std::fmt::Debug, Error>) -> SyntaxError {
        match result {
            Err(Error::Syntax(err)) => err,
            other => panic!("expected a syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_minimal_program() {
        let input = "PROGRAM Test; VAR x : INTEGER; BEGIN x := 2 + 3 * 4; END.";
        let program = parse_program(input).unwrap();

        let expected = Program {
            name: "Test".to_string(),
            block: Block {
                declarations: vec![VarDecl {
                    name: "x".to_string(),
                    type_spec: TypeSpec::Integer,
                }],
                body: Compound {
                    children: vec![Statement::Assign {
                        target: "x".to_string(),
                        value: Expression::binary(
                            Expression::Integer(2),
                            BinaryOperator::Add,
                            Expression::binary(
                                Expression::Integer(3),
                                BinaryOperator::Mul,
                                Expression::Integer(4),
                            ),
                        ),
                    }],
                },
            },
        };
        assert_eq!(program, expected);
    }

    #[test]
    fn test_declarations() {
        let input = "PROGRAM P; VAR a, b : INTEGER; c : REAL; BEGIN END.";
        let program = parse_program(input).unwrap();

        let declared: Vec<(&str, TypeSpec)> = program
            .block
            .declarations
            .iter()
            .map(|decl| (decl.name.as_str(), decl.type_spec))
            .collect();
        assert_eq!(
            declared,
            vec![
                ("a", TypeSpec::Integer),
                ("b", TypeSpec::Integer),
                ("c", TypeSpec::Real),
            ]
        );
        assert_eq!(program.block.body.children, vec![Statement::NoOp]);
    }

    #[test]
    fn test_var_requires_a_declaration() {
        let err = syntax_error(parse_program("PROGRAM P; VAR BEGIN END."));
        assert_eq!(err.found, Token::Begin);
        assert_eq!(err.expected, "ID");
    }

    #[test]
    fn test_nested_compound_and_empty_statements() {
        let input = "PROGRAM P; BEGIN BEGIN a := 1 END; ; b := a END.";
        let program = parse_program(input).unwrap();
        let children = &program.block.body.children;

        assert_eq!(children.len(), 3);
        assert!(matches!(children[0], Statement::Compound(_)));
        assert_eq!(children[1], Statement::NoOp);
        assert_eq!(
            children[2],
            Statement::Assign {
                target: "b".to_string(),
                value: Expression::Var("a".to_string()),
            }
        );
    }

    #[test]
    fn test_precedence() {
        assert_eq!(parse_expr("7 + 3 * 2").to_string(), "(7 + (3 * 2))");
        assert_eq!(parse_expr("(7 + 3) * 2").to_string(), "((7 + 3) * 2)");
        assert_eq!(parse_expr("1 - 2 DIV 3 / 4").to_string(), "(1 - ((2 DIV 3) / 4))");
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(parse_expr("8 - 4 - 2").to_string(), "((8 - 4) - 2)");
        assert_eq!(parse_expr("8 / 4 * 2").to_string(), "((8 / 4) * 2)");
    }

    #[test]
    fn test_unary_chains() {
        assert_eq!(parse_expr("- -5").to_string(), "(-(-5))");
        assert_eq!(parse_expr("-+5").to_string(), "(-(+5))");
        assert_eq!(parse_expr("-2 * 3").to_string(), "((-2) * 3)");
    }

    #[test]
    fn test_expression_starting_with_identifier() {
        assert_eq!(parse_expr("x * 2 + y").to_string(), "((x * 2) + y)");
        assert_eq!(parse_expr("x").to_string(), "x");
    }

    #[test]
    fn test_real_literal_factor() {
        assert_eq!(parse_expr("1.5 * 2").to_string(), "(1.5 * 2)");
    }

    #[test]
    fn test_input_statements() {
        let input = parse_input("x := 5; y := x + 1;").unwrap();
        let Input::Statements(compound) = input else {
            panic!("expected statements");
        };
        assert_eq!(compound.children.len(), 2);

        let input = parse_input("BEGIN x := 1 END").unwrap();
        assert!(matches!(input, Input::Statements(_)));

        let input = parse_input("").unwrap();
        assert_eq!(
            input,
            Input::Statements(Compound {
                children: vec![Statement::NoOp]
            })
        );
    }

    #[test]
    fn test_input_program() {
        let input = parse_input("PROGRAM P; BEGIN END.").unwrap();
        assert!(matches!(input, Input::Program(_)));
    }

    #[test]
    fn test_missing_begin() {
        let err = syntax_error(parse_program("PROGRAM P; x := 1 END."));
        assert_eq!(err.expected, "BEGIN");
        assert_eq!(err.found, Token::Id("x".to_string()));
        assert_eq!(err.span, Span { line: 1, col: 12 });
    }

    #[test]
    fn test_missing_dot() {
        let err = syntax_error(parse_program("PROGRAM P; BEGIN END"));
        assert_eq!(err.expected, "DOT");
        assert_eq!(err.found, Token::Eof);
    }

    #[test]
    fn test_trailing_tokens() {
        let err = syntax_error(parse_program("PROGRAM P; BEGIN END. x"));
        assert_eq!(err.expected, "EOF");
        assert_eq!(err.found, Token::Id("x".to_string()));

        let err = syntax_error(parse_input("1 + 2 )"));
        assert_eq!(err.found, Token::RParen);
    }

    #[test]
    fn test_unbalanced_parenthesis() {
        let err = syntax_error(parse_input("(1 + 2"));
        assert_eq!(err.expected, "RPAREN");
        assert_eq!(err.found, Token::Eof);
    }

    #[test]
    fn test_bad_type_spec() {
        let err = syntax_error(parse_program("PROGRAM P; VAR x : BOOLEAN; BEGIN END."));
        assert_eq!(err.expected, "INTEGER or REAL");
        assert_eq!(err.found, Token::Id("BOOLEAN".to_string()));
    }

    #[test]
    fn test_lexical_error_surfaces_through_parser() {
        let err = parse_program("PROGRAM P; BEGIN x := 1 @ END.").unwrap_err();
        assert!(matches!(
            err,
            Error::Lexical(LexicalError::UnexpectedChar { ch: '@', .. })
        ));
    }
}
