use crate::command::{CommandFactory, Control, ExecutableCommand, Stdout};
use crate::lexer::Tokens;
use anyhow::{Context, Result};
use argh::{EarlyExit, FromArgs};
use std::env;
use std::io::Write;
use std::marker::PhantomData;

/// Fixed text printed by `help`.
pub const HELP_TEXT: &str = "Kash - the Kinda Aimless Shell. \
The following commands are available:
   cd\t\tChange the working directory.
   exit\tExit the shell.
   help\tPrint this help text.
";

/// Built-in commands known to the shell at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and executed directly
/// in-process without spawning a child process.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "cd".
    fn name() -> &'static str;

    /// Builds the command from its words, command name included.
    ///
    /// Defaults to `argh` parsing. Builtins whose words must not be read as
    /// flags override this.
    fn parse(words: &[&str]) -> Result<Self, EarlyExit> {
        Self::from_args(&words[..1], &words[1..])
    }

    /// Executes the command using the provided output streams.
    fn execute(self, stdout: &mut dyn Stdout, stderr: &mut dyn Write) -> Result<Control>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Stdout,
        stderr: &mut dyn Write,
    ) -> Result<Control> {
        match <T as BuiltinCommand>::execute(*self, stdout, stderr) {
            Ok(x) => Ok(x),
            Err(e) => {
                writeln!(stderr, "kash: {e:#}")?;
                Ok(Control::Continue)
            }
        }
    }
}

/// Result of a builtin whose arguments `argh` refused (or `--help`).
struct InvalidArgs {
    name: &'static str,
    output: String,
    is_error: bool,
}

impl ExecutableCommand for InvalidArgs {
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Stdout,
        stderr: &mut dyn Write,
    ) -> Result<Control> {
        if self.is_error {
            writeln!(stderr, "kash: {}: {}", self.name, self.output.trim_end())?;
        } else {
            stdout.write_all(self.output.as_bytes())?;
        }
        Ok(Control::Continue)
    }
}

/// One name-to-handler entry of the [`Registry`].
pub(crate) trait BuiltinEntry {
    fn name(&self) -> &'static str;

    /// Creates the handler for a command line whose first word is [`Self::name`].
    fn create(&self, words: &[&str]) -> Box<dyn ExecutableCommand>;
}

/// Builtin entry backed by a [`BuiltinCommand`] type.
pub(crate) struct Factory<T> {
    _phantom: PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<T: BuiltinCommand + 'static> BuiltinEntry for Factory<T> {
    fn name(&self) -> &'static str {
        T::name()
    }

    fn create(&self, words: &[&str]) -> Box<dyn ExecutableCommand> {
        match T::parse(words) {
            Ok(cmd) => Box::new(cmd),
            Err(EarlyExit { output, status }) => Box::new(InvalidArgs {
                name: T::name(),
                output,
                is_error: status.is_err(),
            }),
        }
    }
}

/// The closed set of builtins, looked up by exact, case-sensitive name.
pub struct Registry {
    entries: Vec<Box<dyn BuiltinEntry>>,
}

impl Registry {
    /// Find the entry registered under `name`.
    pub(crate) fn lookup(&self, name: &str) -> Option<&dyn BuiltinEntry> {
        self.entries
            .iter()
            .find(|entry| entry.name() == name)
            .map(|entry| entry.as_ref())
    }

    /// Whether `name` is a builtin.
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name())
    }
}

impl Default for Registry {
    /// The builtins `help`, `cd` and `exit`.
    fn default() -> Self {
        Self {
            entries: vec![
                Box::new(Factory::<Help>::default()),
                Box::new(Factory::<Cd>::default()),
                Box::new(Factory::<Exit>::default()),
            ],
        }
    }
}

impl CommandFactory for Registry {
    fn try_create(&self, tokens: &Tokens) -> Option<Box<dyn ExecutableCommand>> {
        let entry = self.lookup(tokens.command()?)?;
        Some(entry.create(&tokens.as_strs()))
    }
}

#[derive(FromArgs)]
/// Print the list of builtin commands.
pub struct Help {}

impl BuiltinCommand for Help {
    fn name() -> &'static str {
        "help"
    }

    fn parse(_words: &[&str]) -> Result<Self, EarlyExit> {
        Ok(Help {})
    }

    fn execute(self, stdout: &mut dyn Stdout, _stderr: &mut dyn Write) -> Result<Control> {
        stdout.write_all(HELP_TEXT.as_bytes())?;
        stdout.flush()?;
        Ok(Control::Continue)
    }
}

#[derive(FromArgs)]
/// Change the current working directory.
pub struct Cd {
    #[argh(positional)]
    /// directory to switch to; absolute or relative to the current directory.
    pub target: Option<String>,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    /// Takes the target verbatim, so names like `-foo` or `--help` are paths.
    fn parse(words: &[&str]) -> Result<Self, EarlyExit> {
        match words {
            [_] => Ok(Cd { target: None }),
            [_, target] => Ok(Cd {
                target: Some(target.to_string()),
            }),
            _ => Err(EarlyExit {
                output: "too many arguments".to_string(),
                status: Err(()),
            }),
        }
    }

    fn execute(self, _stdout: &mut dyn Stdout, stderr: &mut dyn Write) -> Result<Control> {
        let Some(target) = self.target else {
            writeln!(stderr, "kash: cd: missing argument")?;
            return Ok(Control::Continue);
        };

        env::set_current_dir(&target).with_context(|| format!("cd: {target}"))?;
        log::debug!("cd: working directory is now {target}");
        Ok(Control::Continue)
    }
}

#[derive(FromArgs)]
/// Exit the shell.
pub struct Exit {}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn parse(_words: &[&str]) -> Result<Self, EarlyExit> {
        Ok(Exit {})
    }

    fn execute(self, _stdout: &mut dyn Stdout, _stderr: &mut dyn Write) -> Result<Control> {
        Ok(Control::Terminate)
    }
}
