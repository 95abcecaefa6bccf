use argh::FromArgs;
use kash::reader::{LineReader, PlainReader};
use kash::{DEFAULT_PROMPT, Interpreter};
use rustyline::DefaultEditor;
use std::io::IsTerminal;

#[derive(FromArgs)]
/// Kash, the Kinda Aimless Shell.
struct Options {
    /// text shown before every command line.
    #[argh(option, default = "DEFAULT_PROMPT.to_string()")]
    prompt: String,

    /// read plain lines from standard input, without line editing.
    #[argh(switch)]
    no_editor: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let options: Options = argh::from_env();
    let shell = Interpreter::new(options.prompt);

    let mut reader: Box<dyn LineReader> = if !options.no_editor && std::io::stdin().is_terminal() {
        Box::new(DefaultEditor::new()?)
    } else {
        Box::new(PlainReader::new(std::io::stdin().lock(), std::io::stdout()))
    };

    log::info!("kash started with prompt {:?}", shell.prompt());
    shell.repl(reader.as_mut())?;
    Ok(())
}
