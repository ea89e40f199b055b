use std::io::{self, Write};

use tracing::{debug, warn};

use crate::config::SessionConfig;
use crate::environment::Environment;
use crate::error::Error;
use crate::lexer::tokenize;
use crate::parser::parse_input;
use crate::value::Value;

/// Tokenizes, parses and evaluates `source` against `env`.
///
/// `source` may be a whole program, a statement list or a single expression.
/// Returns the value of the last executed statement, if any.
pub fn evaluate_program(source: &str, env: &mut Environment) -> Result<Option<Value>, Error> {
    let input = parse_input(source)?;
    input.evaluate(env)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// One interpreter session: an environment that outlives individual
/// evaluations, plus the settings that decide what gets printed.
pub struct Session {
    env: Environment,
    config: SessionConfig,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Session {
            env: Environment::new(),
            config,
        }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Evaluates `source` and reports the outcome to `out`. Interpreter
    /// errors are printed, not returned; only write failures propagate.
    pub fn run_source(&mut self, source: &str, out: &mut impl Write) -> io::Result<()> {
        if self.config.dump_tokens {
            match tokenize(source) {
                Ok(tokens) => {
                    for token in tokens {
                        writeln!(out, "{token}")?;
                    }
                }
                Err(e) => writeln!(out, "Error: {}", Error::from(e))?,
            }
        }
        let outcome = match parse_input(source) {
            Ok(input) => {
                if self.config.dump_ast {
                    writeln!(out, "{input:#?}")?;
                }
                input.evaluate(&mut self.env)
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(result) => {
                debug!(bindings = self.env.len(), "evaluation finished");
                if let Some(value) = result {
                    writeln!(out, "{value}")?;
                }
                if self.config.show_environment {
                    writeln!(out, "Environment: {}", self.env)?;
                }
            }
            Err(e) => {
                warn!(category = e.category(), error = %e, "evaluation failed");
                writeln!(out, "Error: {e}")?;
            }
        }
        Ok(())
    }

    /// Handles one line of interactive input, including the quit and
    /// `:reset` / `:env` commands.
    pub fn handle_line(&mut self, line: &str, out: &mut impl Write) -> io::Result<Control> {
        let trimmed = line.trim();
        if trimmed == self.config.quit_command {
            writeln!(out, "Quitting")?;
            return Ok(Control::Quit);
        }
        match trimmed {
            ":reset" => {
                self.env.clear();
                writeln!(out, "Environment cleared")?;
            }
            ":env" => writeln!(out, "Environment: {}", self.env)?,
            _ => self.run_source(line, out)?,
        }
        Ok(Control::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOperator, Expression, Input};

    fn quiet() -> SessionConfig {
        SessionConfig {
            show_environment: false,
            ..SessionConfig::default()
        }
    }

    fn run(session: &mut Session, line: &str) -> (Control, String) {
        let mut out = Vec::new();
        let control = session.handle_line(line, &mut out).unwrap();
        (control, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_prints_result_and_environment() {
        let mut session = Session::new(SessionConfig::default());
        let (control, out) = run(&mut session, "x := 10 / 4");
        assert_eq!(control, Control::Continue);
        assert_eq!(out, "2.5\nEnvironment: {x: 2.5}\n");
    }

    #[test]
    fn test_errors_are_reported_and_session_continues() {
        let mut session = Session::new(quiet());
        let (_, out) = run(&mut session, "x := 1; y := z");
        assert_eq!(out, "Error: name error: variable z is not defined\n");
        let (_, out) = run(&mut session, "x * 3");
        assert_eq!(out, "3\n");
    }

    #[test]
    fn test_quit_and_reset() {
        let mut session = Session::new(quiet());
        run(&mut session, "a := 1");
        let (_, out) = run(&mut session, ":reset");
        assert_eq!(out, "Environment cleared\n");
        assert!(session.env().is_empty());

        let (control, out) = run(&mut session, "q");
        assert_eq!(control, Control::Quit);
        assert_eq!(out, "Quitting\n");
    }

    #[test]
    fn test_env_command_leaves_environment_alone() {
        let mut session = Session::new(quiet());
        run(&mut session, "a := 1; b := a / 2");
        let (control, out) = run(&mut session, ":env");
        assert_eq!(control, Control::Continue);
        assert_eq!(out, "Environment: {a: 1, b: 0.5}\n");
        assert_eq!(session.env().len(), 2);
        assert_eq!(session.env().lookup("a"), Ok(Value::Integer(1)));
    }

    #[test]
    fn test_dump_ast_precedes_result() {
        let mut session = Session::new(SessionConfig {
            dump_ast: true,
            ..quiet()
        });
        let (_, out) = run(&mut session, "1 + 2");

        let expected = Input::Expression(Expression::binary(
            Expression::Integer(1),
            BinaryOperator::Add,
            Expression::Integer(2),
        ));
        assert_eq!(out, format!("{expected:#?}\n3\n"));
    }

    #[test]
    fn test_dump_ast_with_syntax_error_reports_error() {
        let mut session = Session::new(SessionConfig {
            dump_ast: true,
            ..quiet()
        });
        let (_, out) = run(&mut session, "1 +");
        assert!(out.starts_with("Error: syntax error:"), "{out}");
    }

    #[test]
    fn test_dump_tokens() {
        let mut session = Session::new(SessionConfig {
            dump_tokens: true,
            ..quiet()
        });
        let (_, out) = run(&mut session, "1 DIV 2");
        assert_eq!(
            out,
            "Token(INTEGER_CONST, \"1\")\nToken(INTEGER_DIV, \"DIV\")\n\
             Token(INTEGER_CONST, \"2\")\nToken(EOF, \"\")\n0\n"
        );
    }
}
