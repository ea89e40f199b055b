use std::fmt;

use crate::error::ArithmeticError;

/// A runtime number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Integer(i64),
    Real(f64),
}

impl Value {
    pub fn as_f64(self) -> f64 {
        match self {
            Value::Integer(v) => v as f64,
            Value::Real(v) => v,
        }
    }

    /// Brings both operands to the same variant; an integer meets a real as a real.
    fn promote_to_common_type(lhs: Value, rhs: Value) -> (Value, Value) {
        match (lhs, rhs) {
            (Value::Integer(l), Value::Real(r)) => (Value::Real(l as f64), Value::Real(r)),
            (Value::Real(l), Value::Integer(r)) => (Value::Real(l), Value::Real(r as f64)),
            same => same,
        }
    }

    pub fn checked_add(self, rhs: Value) -> Result<Value, ArithmeticError> {
        match Self::promote_to_common_type(self, rhs) {
            (Value::Integer(l), Value::Integer(r)) => l
                .checked_add(r)
                .map(Value::Integer)
                .ok_or(ArithmeticError::Overflow("+")),
            (l, r) => Ok(Value::Real(l.as_f64() + r.as_f64())),
        }
    }

    pub fn checked_sub(self, rhs: Value) -> Result<Value, ArithmeticError> {
        match Self::promote_to_common_type(self, rhs) {
            (Value::Integer(l), Value::Integer(r)) => l
                .checked_sub(r)
                .map(Value::Integer)
                .ok_or(ArithmeticError::Overflow("-")),
            (l, r) => Ok(Value::Real(l.as_f64() - r.as_f64())),
        }
    }

    pub fn checked_mul(self, rhs: Value) -> Result<Value, ArithmeticError> {
        match Self::promote_to_common_type(self, rhs) {
            (Value::Integer(l), Value::Integer(r)) => l
                .checked_mul(r)
                .map(Value::Integer)
                .ok_or(ArithmeticError::Overflow("*")),
            (l, r) => Ok(Value::Real(l.as_f64() * r.as_f64())),
        }
    }

    /// `/` always produces a real quotient.
    pub fn float_div(self, rhs: Value) -> Result<Value, ArithmeticError> {
        let divisor = rhs.as_f64();
        if divisor == 0.0 {
            return Err(ArithmeticError::DivisionByZero);
        }
        Ok(Value::Real(self.as_f64() / divisor))
    }

    /// `DIV` rounds the quotient toward negative infinity. Two integers give an
    /// integer; a real operand gives the floored real.
    pub fn floor_div(self, rhs: Value) -> Result<Value, ArithmeticError> {
        match Self::promote_to_common_type(self, rhs) {
            (Value::Integer(_), Value::Integer(0)) => Err(ArithmeticError::DivisionByZero),
            (Value::Integer(l), Value::Integer(r)) => {
                let quotient = l.checked_div(r).ok_or(ArithmeticError::Overflow("DIV"))?;
                if l % r != 0 && ((l < 0) != (r < 0)) {
                    Ok(Value::Integer(quotient - 1))
                } else {
                    Ok(Value::Integer(quotient))
                }
            }
            (l, r) => {
                let divisor = r.as_f64();
                if divisor == 0.0 {
                    return Err(ArithmeticError::DivisionByZero);
                }
                Ok(Value::Real((l.as_f64() / divisor).floor()))
            }
        }
    }

    pub fn checked_neg(self) -> Result<Value, ArithmeticError> {
        match self {
            Value::Integer(v) => v
                .checked_neg()
                .map(Value::Integer)
                .ok_or(ArithmeticError::Overflow("-")),
            Value::Real(v) => Ok(Value::Real(-v)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{v}"),
            // Debug keeps the trailing `.0` on whole reals
            Value::Real(v) => write!(f, "{v:?}"),
        }
    }
}
