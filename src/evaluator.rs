use tracing::{debug, trace};

use crate::ast::{
    BinaryOperator, Block, Compound, Expression, Input, Program, Statement, UnaryOperator,
};
use crate::environment::Environment;
use crate::error::Error;
use crate::value::Value;

/// Tree-walking evaluator over a borrowed environment.
///
/// Statements yield `Option<Value>`: assignments produce the stored value,
/// empty statements produce nothing, and a compound yields whatever its last
/// child yielded.
pub struct Evaluator<'env> {
    env: &'env mut Environment,
}

impl<'env> Evaluator<'env> {
    pub fn new(env: &'env mut Environment) -> Self {
        Evaluator { env }
    }

    pub fn evaluate_input(&mut self, input: &Input) -> Result<Option<Value>, Error> {
        match input {
            Input::Program(program) => self.evaluate_program(program),
            Input::Statements(compound) => self.evaluate_compound(compound),
            Input::Expression(expr) => self.evaluate_expression(expr).map(Some),
        }
    }

    pub fn evaluate_program(&mut self, program: &Program) -> Result<Option<Value>, Error> {
        debug!(program = %program.name, "evaluating program");
        self.evaluate_block(&program.block)
    }

    fn evaluate_block(&mut self, block: &Block) -> Result<Option<Value>, Error> {
        for declaration in &block.declarations {
            self.env.declare(&declaration.name, declaration.type_spec);
        }
        self.evaluate_compound(&block.body)
    }

    fn evaluate_compound(&mut self, compound: &Compound) -> Result<Option<Value>, Error> {
        let mut last = None;
        for child in &compound.children {
            last = self.evaluate_statement(child)?;
        }
        Ok(last)
    }

    fn evaluate_statement(&mut self, statement: &Statement) -> Result<Option<Value>, Error> {
        match statement {
            Statement::Compound(compound) => self.evaluate_compound(compound),
            Statement::Assign { target, value } => {
                self.evaluate_assignment(target, value).map(Some)
            }
            Statement::NoOp => Ok(None),
        }
    }

    fn evaluate_assignment(&mut self, target: &str, expr: &Expression) -> Result<Value, Error> {
        // right-hand side first: `x := x + 1` reads the old value
        let value = self.evaluate_expression(expr)?;
        trace!(name = target, %value, "assign");
        self.env.assign(target, value);
        Ok(value)
    }

    pub fn evaluate_expression(&mut self, expr: &Expression) -> Result<Value, Error> {
        match expr {
            Expression::Var(name) => Ok(self.env.lookup(name)?),
            Expression::Integer(value) => Ok(Value::Integer(*value)),
            Expression::Real(value) => Ok(Value::Real(*value)),
            Expression::Binary(left, op, right) => {
                let lhs = self.evaluate_expression(left)?;
                let rhs = self.evaluate_expression(right)?;
                Self::apply_binary(lhs, *op, rhs)
            }
            Expression::Unary(op, operand) => {
                let value = self.evaluate_expression(operand)?;
                match op {
                    UnaryOperator::Plus => Ok(value),
                    UnaryOperator::Minus => Ok(value.checked_neg()?),
                }
            }
        }
    }

    fn apply_binary(lhs: Value, op: BinaryOperator, rhs: Value) -> Result<Value, Error> {
        let result = match op {
            BinaryOperator::Add => lhs.checked_add(rhs),
            BinaryOperator::Sub => lhs.checked_sub(rhs),
            BinaryOperator::Mul => lhs.checked_mul(rhs),
            BinaryOperator::FloatDiv => lhs.float_div(rhs),
            BinaryOperator::IntegerDiv => lhs.floor_div(rhs),
        };
        result.map_err(Error::from)
    }
}

impl Program {
    /// Runs the program against `env` and returns the value of the last
    /// executed statement. Assignments made before a failure stay in `env`.
    pub fn evaluate(&self, env: &mut Environment) -> Result<Option<Value>, Error> {
        Evaluator::new(env).evaluate_program(self)
    }
}

impl Input {
    pub fn evaluate(&self, env: &mut Environment) -> Result<Option<Value>, Error> {
        Evaluator::new(env).evaluate_input(self)
    }
}
