//! Interactive disassembler: reads hexadecimal instruction words from
//! standard input and prints one disassembled line per word, until `0`.

use std::io::{self, BufRead, Write};

use sparc_core::{disassemble, Instruction};

fn main() {
    env_logger::init();

    println!("==== SPARC disassembler ====");
    println!("Type a hex value to disassemble it, 0 to exit.");

    let stdin = io::stdin();
    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => break,
        }
        let token = line.trim();
        if token.is_empty() {
            continue;
        }

        let digits = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
            .unwrap_or(token);
        match u32::from_str_radix(digits, 16) {
            Ok(0) => break,
            Ok(word) => println!("{}", disassemble(Instruction::new(word), 0)),
            Err(_) => println!("'{token}' is not a hexadecimal word"),
        }
    }
}
