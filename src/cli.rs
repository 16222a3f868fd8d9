//! Command-line surface for the `tupa` binary.
//!
//! Mirrors the teacher's `why` binary's derive-based `Cli` struct, but
//! Tupã's driver only ever needs the one optional positional argument
//! spec.md §6 describes: `tupa [file]`.

use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Interpreter for Tupã, a small imperative scripting language with Portuguese keywords.")]
pub struct Cli {
    /// Script to run. Omit to start the REPL.
    #[arg(index = 1)]
    pub file: Option<std::path::PathBuf>,
}
