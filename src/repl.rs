//! The read-eval-print loop.
//!
//! One `Session` persists across lines, so a `criar`/`função`/`classe` on
//! one line stays bound for the next (spec.md §2, §6). Lex/parse/runtime
//! errors print a diagnostic and hand control back to the prompt; they
//! never end the process — only `sair` does.

use std::io::{self, Write};

use log::debug;
use tupa_lib::error::format_for_user;
use tupa_lib::Session;

const PROMPT: &str = ">>> ";
const EXIT_COMMAND: &str = "sair";

pub fn run() {
    println!("Tupã {}", env!("CARGO_PKG_VERSION"));
    println!("Digite '{EXIT_COMMAND}' para sair.");

    let mut session = Session::new();
    let stdin = io::stdin();

    loop {
        print!("{PROMPT}");
        if io::stdout().flush().is_err() {
            break;
        }

        let mut line = String::new();
        let bytes_read = match stdin.read_line(&mut line) {
            Ok(n) => n,
            Err(e) => {
                eprintln!("{}", format_for_user(&tupa_lib::TupaError::value(format!(
                    "falha ao ler da entrada padrão: {e}"
                ))));
                break;
            }
        };

        // EOF (Ctrl-D)
        if bytes_read == 0 {
            println!();
            break;
        }

        let line = line.trim_end_matches(['\n', '\r']);
        if line.trim() == EXIT_COMMAND {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        if let Err(err) = session.eval_in_session(line) {
            debug!("linha do REPL falhou: {err}");
            println!("{}", format_for_user(&err));
        }
    }
}
