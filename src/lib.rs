//! Kash, the Kinda Aimless Shell.
//!
//! A minimal interactive command shell: each line is split on blanks into a
//! command name and arguments, then either handled in-process by one of the
//! builtins (`cd`, `help`, `exit`) or launched as an external program. The
//! shell waits for every program to finish before prompting again. There are
//! no pipelines, redirections, quoting, variables or background jobs.
//!
//! The main entry point is [`Interpreter`]; [`reader`] supplies the lines it
//! evaluates.

mod builtin;
pub mod command;
mod external;
mod interpreter;
pub mod io_adapters;
pub mod lexer;
pub mod reader;

pub use builtin::{HELP_TEXT, Registry};
pub use command::Control;
pub use interpreter::{DEFAULT_PROMPT, Interpreter};
