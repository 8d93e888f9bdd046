//! Engine stepper: loads a flat binary program and executes it one
//! instruction per line of input.
//!
//! ```text
//! sparc-run <program.kbin>
//! ```
//!
//! An empty line (or `s`) steps, `r` dumps the visible registers, `q`
//! quits. Execution also stops when the engine reaches filler memory or
//! reports a runtime error.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use sparc_core::{disassemble, psr, register_name, Engine, EngineConfig, Step};

const USAGE: &str = "Usage: sparc-run <program-file>";

fn dump_registers(engine: &Engine) {
    for row in 0u32..8 {
        let mut line = String::new();
        for column in 0u32..4 {
            let number = column * 8 + row;
            line.push_str(&format!(
                "{:>4} = 0x{:08X}   ",
                register_name(number),
                engine.registers().read(number)
            ));
        }
        println!("{line}");
    }
    let status = engine.psr();
    println!(
        "PSR = 0x{:08X} (N={} Z={} V={} C={} CWP={})   Y = 0x{:08X}",
        status.read(),
        u32::from(status.flag(psr::ICC_N)),
        u32::from(status.flag(psr::ICC_Z)),
        u32::from(status.flag(psr::ICC_V)),
        u32::from(status.flag(psr::ICC_C)),
        status.field(psr::CWP),
        engine.y().read(),
    );
}

fn step_once(engine: &mut Engine) -> bool {
    let fetch_address = engine.npc();
    let preview = engine
        .memory()
        .read_instruction(fetch_address)
        .map(|inst| disassemble(inst, fetch_address));

    match engine.step() {
        Ok(Step::Executed) => {
            println!(
                "0x{fetch_address:08X}: {}",
                preview.unwrap_or_else(|_| "<unreadable>".into())
            );
            true
        }
        Ok(Step::Filler) => {
            println!("0x{fetch_address:08X}: . (filler, stopping)");
            false
        }
        Err(error) => {
            eprintln!("runtime error at 0x{fetch_address:08X}: {error}");
            false
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let Some(path) = std::env::args_os().nth(1) else {
        eprintln!("{USAGE}");
        return ExitCode::FAILURE;
    };

    let image = match std::fs::read(&path) {
        Ok(image) => image,
        Err(error) => {
            eprintln!("cannot read {}: {error}", path.to_string_lossy());
            return ExitCode::FAILURE;
        }
    };

    let mut engine = Engine::new(&EngineConfig::default());
    if let Err(error) = engine.load_program(0, &image) {
        eprintln!("cannot load program: {error}");
        return ExitCode::FAILURE;
    }

    println!("Loaded {} byte(s). Enter steps, 'r' for registers, 'q' to quit.", image.len());

    let stdin = io::stdin();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(error) => {
                eprintln!("input error: {error}");
                return ExitCode::FAILURE;
            }
        }
        match line.trim() {
            "q" => break,
            "r" => dump_registers(&engine),
            "" | "s" => {
                if !step_once(&mut engine) {
                    break;
                }
            }
            other => println!("unknown command '{other}'"),
        }
    }

    ExitCode::SUCCESS
}
