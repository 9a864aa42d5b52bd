use thiserror::Error;

/// What was wrong with a malformed line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("'{opcode}' expects {expected} operand(s), found {found}")]
    MissingOperand {
        opcode: String,
        expected: usize,
        found: usize,
    },

    #[error("'{opcode}' expects {expected} operand(s), found {found}")]
    UnexpectedOperand {
        opcode: String,
        expected: usize,
        found: usize,
    },

    #[error("'{0}' is not a non-negative integer")]
    InvalidIndex(String),

    #[error("unknown segment '{0}'")]
    UnknownSegment(String),

    #[error("cannot pop into the constant segment")]
    PushOnlySegment,

    #[error("pointer index must be 0 or 1, found {0}")]
    PointerIndex(u16),

    #[error("temp index must be in 0..=7, found {0}")]
    TempIndex(u16),

    #[error("constant '{0}' does not fit in 16 bits")]
    ConstantRange(String),

    #[error("'{0}' is not a valid symbol")]
    InvalidSymbol(String),

    #[error("unknown command '{0}'")]
    UnknownCommand(String),
}

/// A line that could not be parsed into an instruction.
///
/// `text` is the line after comment stripping and trimming.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} in `{text}`")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub text: String,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}
