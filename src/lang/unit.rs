use serde::{Deserialize, Serialize};

use crate::codegen::translate_error::TranslateError;
use crate::lang::instruction::Instruction;

/// A parsed instruction together with the 1-based line it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLine {
    pub number: usize,
    pub instruction: Instruction,
}

/// One independently parsed VM source file.
///
/// `name` namespaces the unit's `static` segment, so it must be unique
/// within a linked program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub name: String,
    pub lines: Vec<SourceLine>,
}

impl Unit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lines: Vec::new(),
        }
    }

    pub fn push(&mut self, number: usize, instruction: Instruction) {
        self.lines.push(SourceLine {
            number,
            instruction,
        });
    }
}

/// Parsed units of a whole program, in link order.
///
/// Serialized with postcard so a program can be parsed once and
/// translated later (`--emit-ir` / `.vmir` input).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrBundle {
    pub units: Vec<Unit>,
}

impl IrBundle {
    pub fn new(units: Vec<Unit>) -> Self {
        Self { units }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, TranslateError> {
        postcard::to_allocvec(self).map_err(TranslateError::Ir)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TranslateError> {
        postcard::from_bytes(bytes).map_err(TranslateError::Ir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::instruction::{CompareOp, Segment};

    #[test]
    fn test_bundle_survives_postcard() {
        let mut unit = Unit::new("Main");
        unit.push(1, Instruction::PushConstant(-32768));
        unit.push(3, Instruction::PopSegment(Segment::That, 7));
        unit.push(4, Instruction::Compare(CompareOp::Gt));
        unit.push(
            9,
            Instruction::Function {
                name: "Main.main".to_string(),
                locals: 3,
            },
        );
        let bundle = IrBundle::new(vec![unit, Unit::new("Empty")]);

        let bytes = bundle.to_bytes().unwrap();
        assert_eq!(IrBundle::from_bytes(&bytes).unwrap(), bundle);
    }

    #[test]
    fn test_truncated_bundle_is_rejected() {
        let mut unit = Unit::new("Main");
        unit.push(1, Instruction::Return);
        let bytes = IrBundle::new(vec![unit]).to_bytes().unwrap();

        let err = IrBundle::from_bytes(&bytes[..bytes.len() - 1]).unwrap_err();
        assert!(matches!(err, TranslateError::Ir(_)));
    }
}
