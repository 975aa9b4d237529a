use std::{fs, path::PathBuf};

use clap::{Parser, Subcommand};

use amaryllis::{AmaryllisError, InteropContext, Shell};

#[derive(Parser)]
#[command(author, version, about = "Polyglot symbol registry shell")]
struct Args {
    /// Disable polyglot access; interop commands fail with a capability error
    #[arg(long, global = true)]
    no_polyglot: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start an interactive registry shell
    Shell,
    /// Execute registry commands from a script file, one per line
    Run { script: PathBuf },
    /// Evaluate a single registry command
    Eval { line: String },
}

fn main() -> Result<(), AmaryllisError> {
    let args = Args::parse();
    let context = InteropContext::with_polyglot_access(!args.no_polyglot);
    match args.command.unwrap_or(Command::Shell) {
        Command::Shell => Shell::with_context(context).run(),
        Command::Run { script } => run_script(&context, script),
        Command::Eval { line } => {
            let value = context.eval_line(&line)?;
            println!("{value}");
            Ok(())
        }
    }
}

fn run_script(context: &InteropContext, path: PathBuf) -> Result<(), AmaryllisError> {
    let source = fs::read_to_string(&path)?;
    for line in source.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let value = context.eval_line(trimmed)?;
        println!("{value}");
    }
    Ok(())
}
