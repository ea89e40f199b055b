/// Input that ends an interactive session.
pub const DEFAULT_QUIT_COMMAND: &str = "q";

/// Driver settings, filled in from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Print the environment after every successful evaluation.
    pub show_environment: bool,
    pub dump_tokens: bool,
    pub dump_ast: bool,
    pub quit_command: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            show_environment: true,
            dump_tokens: false,
            dump_ast: false,
            quit_command: DEFAULT_QUIT_COMMAND.to_string(),
        }
    }
}
