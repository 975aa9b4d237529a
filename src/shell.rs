use rustyline::{DefaultEditor, error::ReadlineError};

use crate::{
    command::{self, Command},
    diagnostics::{AmaryllisError, Result},
    interop::InteropContext,
};

/// Interactive front end for one registry context.
pub struct Shell {
    context: InteropContext,
}

impl Shell {
    pub fn new() -> Self {
        Self {
            context: InteropContext::new(),
        }
    }

    pub fn with_context(context: InteropContext) -> Self {
        Self { context }
    }

    pub fn run(&mut self) -> Result<()> {
        let mut editor = DefaultEditor::new().map_err(to_io_error)?;
        println!("amaryllis symbol registry (polyglot access {})", self.gate_status());
        println!("type :help for commands, :quit to leave");
        loop {
            match editor.readline(">> ") {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    if let Some(directive) = trimmed.strip_prefix(':') {
                        if self.directive(directive) {
                            break;
                        }
                        continue;
                    }
                    editor.add_history_entry(trimmed).ok();
                    match self.respond(trimmed) {
                        Ok(reply) => println!("{reply}"),
                        Err(AmaryllisError::Diagnostic(diag)) => {
                            eprintln!("{:?}: {}", diag.kind, diag.message);
                            for note in &diag.notes {
                                eprintln!("  note: {note}");
                            }
                        }
                        Err(other) => eprintln!("error: {other}"),
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => return Err(to_io_error(err)),
            }
        }
        Ok(())
    }

    /// Evaluates one command line and renders the reply. A lookup miss is
    /// reported distinctly from an exported unit value.
    pub fn respond(&self, line: &str) -> Result<String> {
        match command::parse_line(line)? {
            Command::Import { name } => match self.context.import(&name)? {
                Some(value) => Ok(value.to_string()),
                None => Ok(format!("unit (`{name}` is not exported)")),
            },
            command => Ok(self.context.execute(&command)?.to_string()),
        }
    }

    fn directive(&self, directive: &str) -> bool {
        match directive {
            "quit" | "exit" => true,
            "help" => {
                println!("export <name> <literal>   bind a value under a name");
                println!("import <name>             retrieve the value bound to a name");
                println!("exports                   snapshot all current bindings");
                println!("polyglot access is {}", self.gate_status());
                false
            }
            other => {
                eprintln!("unknown directive `:{other}`; try :help");
                false
            }
        }
    }

    fn gate_status(&self) -> &'static str {
        if self.context.polyglot_access() {
            "enabled"
        } else {
            "disabled"
        }
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

fn to_io_error(err: ReadlineError) -> AmaryllisError {
    AmaryllisError::from(std::io::Error::new(std::io::ErrorKind::Other, err))
}
