use std::{fs, io, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use minipascal::config::SessionConfig;
use minipascal::session::{Control, Session};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::Level;

#[derive(Parser)]
#[command(name = "mpas")]
#[command(about = "Interpreter for a small Pascal-like language")]
struct Cli {
    /// Script to run before the interactive prompt starts
    script: Option<PathBuf>,

    /// Exit after the script instead of starting the prompt
    #[arg(long)]
    batch: bool,

    /// Do not print the environment after each evaluation
    #[arg(long)]
    no_env: bool,

    /// Print the token stream before evaluating
    #[arg(long)]
    dump_tokens: bool,

    /// Print the syntax tree before evaluating
    #[arg(long)]
    dump_ast: bool,

    /// Increase logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let config = SessionConfig {
        show_environment: !cli.no_env,
        dump_tokens: cli.dump_tokens,
        dump_ast: cli.dump_ast,
        ..SessionConfig::default()
    };
    let mut session = Session::new(config);

    if let Some(path) = &cli.script {
        let source = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        session.run_source(&source, &mut io::stdout())?;
    }

    if !cli.batch {
        run_prompt(&mut session)?;
    }

    Ok(())
}

fn run_prompt(session: &mut Session) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    let mut stdout = io::stdout();

    loop {
        match rl.readline("> ") {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = rl.add_history_entry(line.as_str());
                }
                if session.handle_line(&line, &mut stdout)? == Control::Quit {
                    break;
                }
            }
            Err(ReadlineError::Eof) => break,
            Err(ReadlineError::Interrupted) => println!("^C"),
            Err(e) => {
                eprintln!("Error: {}", e);
                break;
            }
        }
    }

    Ok(())
}
