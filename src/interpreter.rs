use crate::builtin::Registry;
use crate::command::{CommandFactory, Control, Stdout};
use crate::external::Launcher;
use crate::lexer::{self, Tokens};
use crate::reader::LineReader;
use anyhow::Result;
use std::io::Write;

/// Prompt shown before every line unless configured otherwise.
pub const DEFAULT_PROMPT: &str = ">> ";

/// A minimal shell interpreter that runs builtin and external commands.
///
/// Each command line is tokenized and its first word looked up among the
/// builtins; anything else is launched as an external program. Commands run
/// one at a time and the interpreter waits for each to finish.
///
/// Example
/// ```
/// use kash::{Control, Interpreter};
/// let sh = Interpreter::default();
/// assert_eq!(sh.eval("help"), Control::Continue);
/// assert_eq!(sh.eval("   "), Control::Continue);
/// assert_eq!(sh.eval("exit now"), Control::Terminate);
/// ```
pub struct Interpreter {
    builtins: Registry,
    launcher: Launcher,
    prompt: String,
}

impl Interpreter {
    /// Create an interpreter with the default builtins and the given prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            builtins: Registry::default(),
            launcher: Launcher,
            prompt: prompt.into(),
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Tokenize and dispatch one line against the process stdout and stderr.
    pub fn eval(&self, line: &str) -> Control {
        self.dispatch(&lexer::split_into_tokens(line))
    }

    /// Dispatch one command against the process stdout and stderr.
    pub fn dispatch(&self, tokens: &Tokens) -> Control {
        self.dispatch_with_output(tokens, &mut std::io::stdout(), &mut std::io::stderr())
    }

    /// Dispatch one command, writing its output and diagnostics to the given streams.
    ///
    /// An empty command line is a no-op. Errors never escape: they are written
    /// to `stderr` and the shell carries on.
    pub fn dispatch_with_output(
        &self,
        tokens: &Tokens,
        stdout: &mut dyn Stdout,
        stderr: &mut dyn Write,
    ) -> Control {
        let Some(name) = tokens.command() else {
            return Control::Continue;
        };

        let command = match self.builtins.try_create(tokens) {
            Some(cmd) => {
                log::debug!("dispatching builtin {name}");
                Some(cmd)
            }
            None => self.launcher.try_create(tokens),
        };
        let Some(command) = command else {
            report(stderr, format_args!("kash: {name}: command not found"));
            return Control::Continue;
        };

        match command.execute(stdout, stderr) {
            Ok(control) => control,
            Err(e) => {
                report(stderr, format_args!("kash: {name}: {e:#}"));
                Control::Continue
            }
        }
    }

    /// The read-eval loop against the process stdout and stderr.
    ///
    /// Returns once `exit` runs or `reader` reaches end of input.
    pub fn repl(&self, reader: &mut dyn LineReader) -> Result<()> {
        self.repl_with_output(reader, &mut std::io::stdout(), &mut std::io::stderr())
    }

    /// The read-eval loop with explicit output streams.
    ///
    /// Only a failure of `reader` itself ends the loop with an error.
    pub fn repl_with_output(
        &self,
        reader: &mut dyn LineReader,
        stdout: &mut dyn Stdout,
        stderr: &mut dyn Write,
    ) -> Result<()> {
        loop {
            let Some(line) = reader.read_line(&self.prompt)? else {
                log::info!("end of input");
                return Ok(());
            };
            let tokens = lexer::split_into_tokens(&line);
            if self.dispatch_with_output(&tokens, stdout, stderr) == Control::Terminate {
                log::info!("exit requested");
                return Ok(());
            }
        }
    }
}

impl Default for Interpreter {
    /// Create an interpreter with the builtins `help`, `cd`, `exit` and the
    /// external command launcher, prompting with [`DEFAULT_PROMPT`].
    fn default() -> Self {
        Self::new(DEFAULT_PROMPT)
    }
}

/// Writes a diagnostic line, falling back to the log if `stderr` itself fails.
fn report(stderr: &mut dyn Write, message: std::fmt::Arguments<'_>) {
    if let Err(e) = writeln!(stderr, "{message}") {
        log::error!("failed to write diagnostic ({message}): {e}");
    }
}
