use log::warn;

use crate::codegen::translate_error::TranslateError;
use crate::config::Options;
use crate::frontend::parse_error::{ParseError, ParseErrorKind};
use crate::lang::instruction::{BinaryOp, CompareOp, Instruction, PointerSlot, Segment, UnaryOp};
use crate::lang::unit::Unit;

const COMMENT: &str = "//";

/// Number of `temp` cells (addresses 5..=12).
pub const TEMP_SIZE: u16 = 8;

/// Result of parsing one source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Blank or comment-only line.
    Empty,
    Instruction(Instruction),
    /// A lone token that is not a known opcode.
    UnknownOpcode(String),
}

/// Re-check an instruction that did not come through [`parse_line`], such
/// as one decoded from an IR bundle.
pub fn validate(instruction: &Instruction) -> Result<(), ParseErrorKind> {
    match instruction {
        Instruction::PushTemp(i) | Instruction::PopTemp(i) if *i >= TEMP_SIZE => {
            Err(ParseErrorKind::TempIndex(*i))
        }
        Instruction::Label(name)
        | Instruction::Goto(name)
        | Instruction::IfGoto(name)
        | Instruction::Function { name, .. }
        | Instruction::Call { name, .. } => symbol(name).map(|_| ()),
        _ => Ok(()),
    }
}

/// Strip the trailing comment and surrounding whitespace.
pub fn clean(line: &str) -> &str {
    let code = match line.find(COMMENT) {
        Some(idx) => &line[..idx],
        None => line,
    };
    code.trim()
}

/// Parse a single VM source line.
pub fn parse_line(line: &str) -> Result<Line, ParseError> {
    let text = clean(line);
    if text.is_empty() {
        return Ok(Line::Empty);
    }

    let tokens: Vec<&str> = text.split_whitespace().collect();
    let (opcode, operands) = (tokens[0], &tokens[1..]);
    let err = |kind| ParseError::new(kind, text);

    let instruction = match opcode {
        "push" | "pop" => {
            let [segment, index] = operands_of::<2>(opcode, operands).map_err(err)?;
            parse_access(opcode == "push", segment, index).map_err(err)?
        }

        "add" | "sub" | "and" | "or" | "neg" | "not" | "eq" | "gt" | "lt" | "return" => {
            operands_of::<0>(opcode, operands).map_err(err)?;
            match opcode {
                "add" => Instruction::Binary(BinaryOp::Add),
                "sub" => Instruction::Binary(BinaryOp::Sub),
                "and" => Instruction::Binary(BinaryOp::And),
                "or" => Instruction::Binary(BinaryOp::Or),
                "neg" => Instruction::Unary(UnaryOp::Neg),
                "not" => Instruction::Unary(UnaryOp::Not),
                "eq" => Instruction::Compare(CompareOp::Eq),
                "gt" => Instruction::Compare(CompareOp::Gt),
                "lt" => Instruction::Compare(CompareOp::Lt),
                _ => Instruction::Return,
            }
        }

        "label" | "goto" | "if-goto" => {
            let [name] = operands_of::<1>(opcode, operands).map_err(err)?;
            let name = symbol(name).map_err(err)?;
            match opcode {
                "label" => Instruction::Label(name),
                "goto" => Instruction::Goto(name),
                _ => Instruction::IfGoto(name),
            }
        }

        "function" | "call" => {
            let [name, count] = operands_of::<2>(opcode, operands).map_err(err)?;
            let name = symbol(name).map_err(err)?;
            let count = index(count).map_err(err)?;
            if opcode == "function" {
                Instruction::Function {
                    name,
                    locals: count,
                }
            } else {
                Instruction::Call { name, args: count }
            }
        }

        _ if operands.is_empty() => return Ok(Line::UnknownOpcode(opcode.to_string())),
        _ => return Err(err(ParseErrorKind::UnknownCommand(opcode.to_string()))),
    };

    Ok(Line::Instruction(instruction))
}

/// Parse a whole source file into a unit.
///
/// Malformed lines abort with the line number. A lone unknown opcode is
/// skipped with a warning, or rejected when `options.strict` is set.
pub fn parse_unit(name: &str, source: &str, options: &Options) -> Result<Unit, TranslateError> {
    let mut unit = Unit::new(name);

    for (idx, raw) in source.lines().enumerate() {
        let number = idx + 1;
        match parse_line(raw) {
            Ok(Line::Empty) => {}
            Ok(Line::Instruction(instruction)) => unit.push(number, instruction),
            Ok(Line::UnknownOpcode(opcode)) => {
                if options.strict {
                    return Err(TranslateError::UnknownOpcode {
                        unit: name.to_string(),
                        line: number,
                        opcode,
                    });
                }
                warn!("{}:{}: skipping unknown opcode '{}'", name, number, opcode);
            }
            Err(source) => {
                return Err(TranslateError::Parse {
                    unit: name.to_string(),
                    line: number,
                    text: source.text.clone(),
                    source,
                });
            }
        }
    }

    Ok(unit)
}

/// Check that a name can be used for a VM label, function or unit.
///
/// These are target-assembly symbols without `$`, which the translator
/// keeps for the labels it generates.
pub fn is_symbol(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => false,
        Some(c) if is_symbol_char(c) => chars.all(is_symbol_char),
        _ => false,
    }
}

fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ':')
}

fn operands_of<'a, const N: usize>(
    opcode: &str,
    operands: &[&'a str],
) -> Result<[&'a str; N], ParseErrorKind> {
    if operands.len() < N {
        return Err(ParseErrorKind::MissingOperand {
            opcode: opcode.to_string(),
            expected: N,
            found: operands.len(),
        });
    }
    operands
        .try_into()
        .map_err(|_| ParseErrorKind::UnexpectedOperand {
            opcode: opcode.to_string(),
            expected: N,
            found: operands.len(),
        })
}

fn parse_access(push: bool, segment: &str, raw: &str) -> Result<Instruction, ParseErrorKind> {
    let segment = segment.to_ascii_lowercase();

    if segment == "constant" {
        if !push {
            return Err(ParseErrorKind::PushOnlySegment);
        }
        return constant(raw).map(Instruction::PushConstant);
    }

    let i = index(raw)?;
    let instruction = match segment.as_str() {
        "local" | "argument" | "this" | "that" => {
            let seg = match segment.as_str() {
                "local" => Segment::Local,
                "argument" => Segment::Argument,
                "this" => Segment::This,
                _ => Segment::That,
            };
            if push {
                Instruction::PushSegment(seg, i)
            } else {
                Instruction::PopSegment(seg, i)
            }
        }
        "static" if push => Instruction::PushStatic(i),
        "static" => Instruction::PopStatic(i),
        "temp" => {
            if i >= TEMP_SIZE {
                return Err(ParseErrorKind::TempIndex(i));
            }
            if push {
                Instruction::PushTemp(i)
            } else {
                Instruction::PopTemp(i)
            }
        }
        "pointer" => {
            let slot = PointerSlot::from_index(i).ok_or(ParseErrorKind::PointerIndex(i))?;
            if push {
                Instruction::PushPointer(slot)
            } else {
                Instruction::PopPointer(slot)
            }
        }
        _ => return Err(ParseErrorKind::UnknownSegment(segment)),
    };

    Ok(instruction)
}

fn index(raw: &str) -> Result<u16, ParseErrorKind> {
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseErrorKind::InvalidIndex(raw.to_string()));
    }
    raw.parse()
        .map_err(|_| ParseErrorKind::InvalidIndex(raw.to_string()))
}

fn constant(raw: &str) -> Result<i16, ParseErrorKind> {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseErrorKind::InvalidIndex(raw.to_string()));
    }
    raw.parse()
        .map_err(|_| ParseErrorKind::ConstantRange(raw.to_string()))
}

fn symbol(raw: &str) -> Result<String, ParseErrorKind> {
    if is_symbol(raw) {
        Ok(raw.to_string())
    } else {
        Err(ParseErrorKind::InvalidSymbol(raw.to_string()))
    }
}
