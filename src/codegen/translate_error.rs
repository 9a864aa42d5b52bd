use thiserror::Error;

use crate::frontend::parse_error::ParseError;

/// Failure of a translation run. Every variant stops the run.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// A malformed line
    #[error("{unit}:{line}: {source}\n  hint: fix or remove `{text}`; translation stopped here")]
    Parse {
        unit: String,
        line: usize,
        text: String,
        source: ParseError,
    },

    /// A lone unrecognized opcode while running in strict mode
    #[error(
        "{unit}:{line}: unknown opcode '{opcode}'\n  hint: drop --strict to skip unknown opcodes"
    )]
    UnknownOpcode {
        unit: String,
        line: usize,
        opcode: String,
    },

    /// Two units with the same name would share `static` cells
    #[error("unit '{0}' appears twice in one program\n  hint: unit names namespace static variables and must be unique")]
    DuplicateUnit(String),

    #[error("'{0}' cannot be used as a unit name")]
    InvalidUnitName(String),

    #[error("malformed ir bundle: {0}")]
    Ir(postcard::Error),
}

impl TranslateError {
    /// Line the error points at, if it came from a source line.
    pub fn line(&self) -> Option<usize> {
        match self {
            TranslateError::Parse { line, .. } | TranslateError::UnknownOpcode { line, .. } => {
                Some(*line)
            }
            _ => None,
        }
    }
}
