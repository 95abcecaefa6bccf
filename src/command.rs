use crate::lexer::Tokens;
use anyhow::Result;
use std::io::Write;
use std::process::Stdio;

/// Outcome of dispatching one command line.
///
/// The read-eval loop keeps prompting while commands return [`Control::Continue`]
/// and stops after the first [`Control::Terminate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Terminate,
}

/// Abstraction over a writable output stream that external processes can also
/// write to.
///
/// Streams backed by an OS handle hand out a [`Stdio`] so a child writes to
/// them directly. Purely in-memory streams return `None`, in which case the
/// child's output is piped and copied into the stream once the child is done.
pub trait Stdout: Write {
    /// Handle to give a child process, if this stream has one.
    fn stdio(&mut self) -> Option<Stdio>;
}

impl Stdout for std::io::Stdout {
    fn stdio(&mut self) -> Option<Stdio> {
        Some(Stdio::inherit())
    }
}

/// Object-safe trait for any command that can be executed by the shell.
///
/// This is implemented by builtins via a blanket impl and by external commands.
pub trait ExecutableCommand {
    /// Executes the command.
    ///
    /// User-facing diagnostics go to `stderr`. An `Err` is reserved for
    /// failures the command could not report itself.
    fn execute(self: Box<Self>, stdout: &mut dyn Stdout, stderr: &mut dyn Write)
    -> Result<Control>;
}

/// Factory that tries to create a command from a tokenized command line.
///
/// Returns `None` when the factory doesn't recognize the command name.
pub trait CommandFactory {
    /// Attempt to create a command instance for `tokens`, which always holds at
    /// least the command name.
    fn try_create(&self, tokens: &Tokens) -> Option<Box<dyn ExecutableCommand>>;
}
