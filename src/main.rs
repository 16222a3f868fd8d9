mod cli;
mod repl;

use clap::Parser as _;
use cli::Cli;
use log::error;
use tupa_lib::error::format_for_user;
use tupa_lib::Session;

fn main() {
    simple_logger::init_with_level(log::Level::Warn).unwrap();
    let args = Cli::parse();

    match args.file {
        Some(path) => run_file(&path),
        None => repl::run(),
    }
}

/// File mode: read once, run once, exit (spec.md §6). A language-level
/// error during execution prints a diagnostic but does not change the
/// exit status; only a host-level failure (file missing/unreadable) does.
fn run_file(path: &std::path::Path) {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            error!("não foi possível ler o arquivo '{}': {e}", path.display());
            std::process::exit(1);
        }
    };

    if let Err(err) = Session::run_source(&source) {
        println!("{}", format_for_user(&err));
    }
}
