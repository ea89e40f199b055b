use std::fmt;

/// Root node: `PROGRAM name; block.`
#[derive(Debug, PartialEq, Clone)]
pub struct Program {
    pub name: String,
    pub block: Block,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Block {
    pub declarations: Vec<VarDecl>,
    pub body: Compound,
}

/// One declared name; `VAR a, b : REAL` yields two of these.
#[derive(Debug, PartialEq, Clone)]
pub struct VarDecl {
    pub name: String,
    pub type_spec: TypeSpec,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TypeSpec {
    Integer,
    Real,
}

/// `BEGIN ... END`
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Compound {
    pub children: Vec<Statement>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Statement {
    Compound(Compound),
    // <target> := <value>
    Assign { target: String, value: Expression },
    NoOp,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Expression {
    Var(String),
    Integer(i64),
    Real(f64),
    // <left> operator <right>
    Binary(Box<Expression>, BinaryOperator, Box<Expression>),
    Unary(UnaryOperator, Box<Expression>),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    FloatDiv,
    IntegerDiv,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum UnaryOperator {
    Plus,
    Minus,
}

/// What the interactive entry point accepts: a whole program, a bare
/// statement list, or a bare expression.
#[derive(Debug, PartialEq, Clone)]
pub enum Input {
    Program(Program),
    Statements(Compound),
    Expression(Expression),
}

impl Expression {
    pub fn binary(left: Expression, op: BinaryOperator, right: Expression) -> Self {
        Expression::Binary(Box::new(left), op, Box::new(right))
    }

    pub fn unary(op: UnaryOperator, operand: Expression) -> Self {
        Expression::Unary(op, Box::new(operand))
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSpec::Integer => write!(f, "INTEGER"),
            TypeSpec::Real => write!(f, "REAL"),
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::FloatDiv => "/",
            BinaryOperator::IntegerDiv => "DIV",
        };
        write!(f, "{symbol}")
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOperator::Plus => write!(f, "+"),
            UnaryOperator::Minus => write!(f, "-"),
        }
    }
}

/// Fully parenthesised form, handy for checking how an expression grouped.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Var(name) => write!(f, "{name}"),
            Expression::Integer(value) => write!(f, "{value}"),
            Expression::Real(value) => write!(f, "{value:?}"),
            Expression::Binary(left, op, right) => write!(f, "({left} {op} {right})"),
            Expression::Unary(op, operand) => write!(f, "({op}{operand})"),
        }
    }
}
