//! A tokenizer, recursive-descent parser and tree-walking evaluator for a
//! small Pascal-like language.
//!
//! ```
//! use minipascal::{Environment, Value, evaluate_program};
//!
//! let mut env = Environment::new();
//! evaluate_program("PROGRAM Demo; VAR x : INTEGER; BEGIN x := 2 + 3 * 4 END.", &mut env).unwrap();
//! assert_eq!(env.lookup("x"), Ok(Value::Integer(14)));
//! ```

pub mod ast;
pub mod config;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod session;
pub mod token;
pub mod value;

pub use environment::Environment;
pub use error::Error;
pub use session::{Session, evaluate_program};
pub use value::Value;
