//! Token-level parsing: source lines, registers, numbers and addresses.

use sparc_core::encoding::Operand2;

use crate::errors::AsmErrorKind;

/// A source line split into its syntactic parts. Comments are stripped,
/// arguments have all whitespace removed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceLine {
    /// Leading `label:`, without the colon.
    pub label: Option<String>,
    /// The mnemonic, if the line has one.
    pub opcode: Option<String>,
    /// Comma-separated arguments.
    pub args: Vec<String>,
}

/// Removes a trailing `; comment`.
#[must_use]
pub fn strip_comment(line: &str) -> &str {
    line.find(';').map_or(line, |position| &line[..position])
}

/// Splits one source line into label, opcode and arguments.
#[must_use]
pub fn split_line(line: &str) -> SourceLine {
    let mut rest = strip_comment(line).trim();

    let label = rest.find(':').map(|position| {
        let label = rest[..position].trim().to_string();
        rest = rest[position + 1..].trim();
        label
    });

    let (opcode, args) = rest.split_once(char::is_whitespace).map_or_else(
        || (rest, ""),
        |(opcode, arguments)| (opcode, arguments),
    );

    let args: Vec<String> = if args.trim().is_empty() {
        Vec::new()
    } else {
        args.split(',')
            .map(|argument| {
                argument
                    .chars()
                    .filter(|character| !character.is_whitespace())
                    .collect()
            })
            .collect()
    };

    SourceLine {
        label,
        opcode: (!opcode.is_empty()).then(|| opcode.to_string()),
        args,
    }
}

/// True when the token names a register (`%…`, but not a special
/// register).
#[must_use]
pub fn is_register(token: &str) -> bool {
    token.starts_with('%')
}

/// Parses `%gN`, `%oN`, `%lN`, `%iN` (N in 0..8) or `%rN` (N in 0..32)
/// into the logical register number.
///
/// # Errors
///
/// Reports the specific failure: missing `%`, unknown prefix letter,
/// malformed index or out-of-range index.
pub fn parse_register(token: &str) -> Result<u32, AsmErrorKind> {
    let name = token
        .strip_prefix('%')
        .ok_or_else(|| AsmErrorKind::InvalidRegisterName(token.to_string()))?;
    let mut characters = name.chars();
    let prefix = characters
        .next()
        .ok_or_else(|| AsmErrorKind::InvalidRegisterName(token.to_string()))?;
    let index = parse_number(characters.as_str())?;

    let (base, limit) = match prefix {
        'g' => (0, 8),
        'o' => (8, 8),
        'l' => (16, 8),
        'i' => (24, 8),
        'r' => (0, 32),
        _ => return Err(AsmErrorKind::InvalidRegisterName(token.to_string())),
    };
    if index >= limit {
        return Err(AsmErrorKind::InvalidRegisterNumber {
            prefix,
            number: index,
        });
    }
    Ok(base + index)
}

/// Parses a decimal, hexadecimal (`0x…`) or octal (leading `0`) literal,
/// with an optional leading `-` that two's-complements the result.
///
/// # Errors
///
/// Reports [`AsmErrorKind::WrongNumberFormat`] with the offending token.
pub fn parse_number(token: &str) -> Result<u32, AsmErrorKind> {
    let wrong = || AsmErrorKind::WrongNumberFormat(token.to_string());
    let (negative, digits) = token
        .strip_prefix('-')
        .map_or((false, token), |rest| (true, rest));

    let magnitude = if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X"))
    {
        u32::from_str_radix(hex, 16)
    } else if digits.len() > 1 && digits.starts_with('0') {
        u32::from_str_radix(&digits[1..], 8)
    } else {
        digits.parse::<u32>()
    }
    .map_err(|_| wrong())?;

    Ok(if negative {
        magnitude.wrapping_neg()
    } else {
        magnitude
    })
}

/// Parses a bracketed address operand: `[reg+reg]`, `[reg+imm]` or
/// `[reg-imm]`. Returns the base register and the second operand.
///
/// # Errors
///
/// Reports [`AsmErrorKind::WrongAddressFormat`] when the shape does not
/// match, and register/number errors from the parts.
pub fn parse_address(token: &str) -> Result<(u32, Operand2), AsmErrorKind> {
    let wrong = || AsmErrorKind::WrongAddressFormat(token.to_string());
    let inner = token
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(wrong)?;

    // The separator is the first '+' or '-' after the base register.
    let (separator, sign) = inner
        .char_indices()
        .skip(1)
        .find(|&(_, character)| character == '+' || character == '-')
        .ok_or_else(wrong)?;
    let (base_text, second_text) = (&inner[..separator], &inner[separator + 1..]);

    if !is_register(base_text) {
        return Err(wrong());
    }
    let base = parse_register(base_text)?;

    let operand = if is_register(second_text) {
        if sign == '-' {
            return Err(wrong());
        }
        Operand2::Register(parse_register(second_text)?)
    } else {
        let mut value = parse_number(second_text)?;
        if sign == '-' {
            value = value.wrapping_neg();
        }
        Operand2::Immediate(value & 0x1FFF)
    };

    Ok((base, operand))
}
