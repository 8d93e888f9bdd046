//! Assembler CLI: translates a source file into a flat binary of
//! big-endian instruction words.
//!
//! ```text
//! sparc-asm <input> [<output>]
//! ```
//!
//! Without `<output>` the binary lands next to the input with its
//! extension replaced by `.kbin`. The exit code is non-zero when any
//! error was recorded; all diagnostics are printed first.

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use sparc_asm::{encode_words, Assembler};

const USAGE: &str = "Usage: sparc-asm <input> [<output>]";

fn output_path(input: &Path, explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| input.with_extension("kbin"))
}

fn run(input: &Path, output: &Path) -> Result<bool, std::io::Error> {
    let source = std::fs::read_to_string(input)?;

    let mut assembler = Assembler::new();
    let instructions = assembler.assemble(&source);

    for warning in assembler.warnings() {
        println!("Warning at line {}: {}", warning.line, warning.kind);
    }
    if assembler.has_errors() {
        for error in assembler.errors() {
            println!("Error at line {}: {}", error.line, error.kind);
        }
        println!("Assembly aborted!");
        return Ok(false);
    }

    std::fs::write(output, encode_words(&instructions))?;
    println!("Wrote {} instruction(s) to {}", instructions.len(), output.display());
    Ok(true)
}

fn main() -> ExitCode {
    env_logger::init();

    let mut args = env::args_os().skip(1);
    let Some(input) = args.next().map(PathBuf::from) else {
        eprintln!("{USAGE}");
        return ExitCode::FAILURE;
    };
    let output = output_path(&input, args.next().map(PathBuf::from));

    match run(&input, &output) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}
