use crate::command::{CommandFactory, Control, ExecutableCommand, Stdout};
use crate::lexer::Tokens;
use anyhow::{Context, Result};
use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};

/// Search path used when `PATH` is unset, as `execvp` does.
const DEFAULT_PATH: &str = "/bin:/usr/bin";

/// Launches commands that are not builtins as child processes.
#[derive(Default)]
pub struct Launcher;

impl CommandFactory for Launcher {
    /// Resolves the command name against `PATH`.
    ///
    /// Returns `None` when no such program exists, so the caller can report
    /// "command not found".
    fn try_create(&self, tokens: &Tokens) -> Option<Box<dyn ExecutableCommand>> {
        let name = tokens.command()?;
        let search_paths = search_paths(std::env::var_os("PATH"));
        let executable = find_command_path(&search_paths, Path::new(name))?;
        log::debug!("resolved {name} to {}", executable.display());
        Some(Box::new(ExternalCommand::new(
            executable.into_owned().into_os_string(),
            tokens.iter().map(OsString::from).collect(),
        )))
    }
}

/// Command that is not a builtin.
pub struct ExternalCommand {
    /// Resolved path of the program to run.
    program: OsString,
    /// Full argument vector; `argv[0]` is the name as typed.
    argv: Vec<OsString>,
}

impl ExternalCommand {
    pub(crate) fn new(program: OsString, argv: Vec<OsString>) -> Self {
        Self { program, argv }
    }

    fn name(&self) -> &OsStr {
        self.argv.first().map_or(&self.program, |arg0| arg0)
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.arg0(self.name());
        }
        cmd.args(self.argv.iter().skip(1));
        cmd
    }
}

impl ExecutableCommand for ExternalCommand {
    /// Spawns the program and blocks until it terminates.
    ///
    /// The child inherits the environment, working directory, stdin and stderr.
    /// Its exit status is observed but never turned into an error: the shell
    /// continues whatever the outcome. Only a failure to start the child is
    /// reported, on `stderr`.
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Stdout,
        stderr: &mut dyn Write,
    ) -> Result<Control> {
        let name = self.name().to_string_lossy().into_owned();
        let status = match stdout.stdio() {
            Some(stdio) => {
                stdout.flush()?;
                spawn(self.command().stdout(stdio))
                    .and_then(|mut child| wait(&mut child))
            }
            None => spawn(self.command().stdout(Stdio::piped())).and_then(|child| {
                let output = child
                    .wait_with_output()
                    .context("failed to wait for child")?;
                stdout.write_all(&output.stdout)?;
                Ok(output.status)
            }),
        };

        match status {
            Ok(status) => log::debug!("{name}: exited with code {}", exit_code(status)),
            Err(e) => writeln!(stderr, "kash: {name}: {e:#}")?,
        }
        Ok(Control::Continue)
    }
}

fn spawn(cmd: &mut Command) -> Result<Child> {
    let child = cmd.spawn()?;
    log::debug!("spawned child {}", child.id());
    Ok(child)
}

/// Waits for `child` to exit or be killed by a signal.
///
/// `Child::wait` does not report stopped children, so a stop/continue cycle
/// never ends the wait early.
fn wait(child: &mut Child) -> Result<ExitStatus> {
    child.wait().context("failed to wait for child")
}

/// Shell-style numeric code for `status`: the exit code, or 128 + signal.
pub(crate) fn exit_code(status: ExitStatus) -> i32 {
    match status.code() {
        Some(x) => x,
        None => terminated_by_signal(status),
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> i32 {
    -1
}

/// Resolve a command path the way `execvp` would.
///
/// Behavior:
/// - Absolute path: returns it if it exists.
/// - Relative with multiple components (e.g., `bin/sh`) or `./`-prefixed: returns it
///   if it exists, relative to the current working directory.
/// - Single path component (no separators): search each directory in `search_paths` (PATH)
///   and return the first executable regular file, skipping anything else.
/// - Empty path: returns `None`.
///
/// Returns either a borrowed reference to the provided `path` or an owned `PathBuf`
/// when the result is discovered via PATH lookup.
pub(crate) fn find_command_path<'a>(search_paths: &OsStr, path: &'a Path) -> Option<Cow<'a, Path>> {
    if path.is_absolute() {
        return find_by_path(path).map(Cow::Borrowed);
    }

    let search_in_current_dir = cfg!(not(unix)) || path.starts_with("./");
    if search_in_current_dir && path.exists() {
        return Some(Cow::Borrowed(path));
    }

    let mut components = path.components();
    let first = components.next();
    let second = components.next();
    match (first, second) {
        (None, None) => None,
        (Some(x), None) => find_in_path(search_paths, x.as_os_str()).map(Cow::Owned),
        _ => find_by_path(path).map(Cow::Borrowed),
    }
}

fn search_paths(path_var: Option<OsString>) -> OsString {
    path_var.unwrap_or_else(|| DEFAULT_PATH.into())
}

fn find_in_path(search_paths: &OsStr, cmd: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_paths)
        .map(|dir| dir.join(cmd))
        .find(|path| is_executable(path))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

fn find_by_path(path: &Path) -> Option<&Path> {
    if path.exists() { Some(path) } else { None }
}
