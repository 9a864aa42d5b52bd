use serde::{Deserialize, Serialize};

/// Segment addressed through one of the four frame-pointer cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Segment {
    Local,
    Argument,
    This,
    That,
}

impl Segment {
    pub fn keyword(self) -> &'static str {
        match self {
            Segment::Local => "local",
            Segment::Argument => "argument",
            Segment::This => "this",
            Segment::That => "that",
        }
    }

    /// Name of the cell holding this segment's base address.
    pub fn base_symbol(self) -> &'static str {
        match self {
            Segment::Local => "LCL",
            Segment::Argument => "ARG",
            Segment::This => "THIS",
            Segment::That => "THAT",
        }
    }
}

/// `pointer 0` / `pointer 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerSlot {
    This,
    That,
}

impl PointerSlot {
    pub fn from_index(index: u16) -> Option<Self> {
        match index {
            0 => Some(PointerSlot::This),
            1 => Some(PointerSlot::That),
            _ => None,
        }
    }

    pub fn index(self) -> u16 {
        match self {
            PointerSlot::This => 0,
            PointerSlot::That => 1,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            PointerSlot::This => Segment::This.base_symbol(),
            PointerSlot::That => Segment::That.base_symbol(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    And,
    Or,
}

impl BinaryOp {
    pub fn keyword(self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
        }
    }

    /// Operator symbol used in the target's `D<op>M` computation.
    pub fn symbol(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::And => '&',
            BinaryOp::Or => '|',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub fn keyword(self) -> &'static str {
        match self {
            UnaryOp::Neg => "neg",
            UnaryOp::Not => "not",
        }
    }

    pub fn symbol(self) -> char {
        match self {
            UnaryOp::Neg => '-',
            UnaryOp::Not => '!',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    Eq,
    Gt,
    Lt,
}

impl CompareOp {
    pub fn keyword(self) -> &'static str {
        match self {
            CompareOp::Eq => "eq",
            CompareOp::Gt => "gt",
            CompareOp::Lt => "lt",
        }
    }

    /// Jump mnemonic taken when `left - right` satisfies the comparison.
    pub fn jump(self) -> &'static str {
        match self {
            CompareOp::Eq => "JEQ",
            CompareOp::Gt => "JGT",
            CompareOp::Lt => "JLT",
        }
    }
}

/// One VM instruction.
///
/// Each `Instruction` is produced from a single source line and consumed
/// right away by the translator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    // ───────────────────────────── Memory access ────────────────────────
    /// Push a 16-bit constant.
    ///
    /// Stack effect: `( -- n )`
    PushConstant(i16),

    /// Push `segment[offset]` for a frame-relative segment.
    ///
    /// Stack effect: `( -- x )`
    PushSegment(Segment, u16),

    /// Pop into `segment[offset]` for a frame-relative segment.
    ///
    /// Stack effect: `( x -- )`
    PopSegment(Segment, u16),

    PushStatic(u16),
    PopStatic(u16),
    PushPointer(PointerSlot),
    PopPointer(PointerSlot),
    PushTemp(u16),
    PopTemp(u16),

    // ───────────────────────────── Arithmetic ───────────────────────────
    /// Stack effect: `( a b -- a<op>b )`
    Binary(BinaryOp),

    /// Stack effect: `( x -- <op>x )`
    Unary(UnaryOp),

    /// Stack effect: `( a b -- flag )`, where `flag` is `-1` or `0`.
    Compare(CompareOp),

    // ───────────────────────────── Branching ────────────────────────────
    Label(String),
    Goto(String),

    /// Pop the top value and jump when it is non-zero.
    ///
    /// Stack effect: `( cond -- )`
    IfGoto(String),

    // ───────────────────────────── Functions ────────────────────────────
    /// Declare a function with `locals` zero-initialized local slots.
    Function { name: String, locals: u16 },

    /// Call `name` with the top `args` stack values as arguments.
    ///
    /// Stack effect: `( a1 .. an -- result )`
    Call { name: String, args: u16 },

    /// Return the top stack value to the caller.
    Return,
}

impl Instruction {
    /// The opcode keyword this instruction is written with.
    pub fn opcode(&self) -> &'static str {
        match self {
            Instruction::PushConstant(_)
            | Instruction::PushSegment(..)
            | Instruction::PushStatic(_)
            | Instruction::PushPointer(_)
            | Instruction::PushTemp(_) => "push",
            Instruction::PopSegment(..)
            | Instruction::PopStatic(_)
            | Instruction::PopPointer(_)
            | Instruction::PopTemp(_) => "pop",
            Instruction::Binary(op) => op.keyword(),
            Instruction::Unary(op) => op.keyword(),
            Instruction::Compare(op) => op.keyword(),
            Instruction::Label(_) => "label",
            Instruction::Goto(_) => "goto",
            Instruction::IfGoto(_) => "if-goto",
            Instruction::Function { .. } => "function",
            Instruction::Call { .. } => "call",
            Instruction::Return => "return",
        }
    }
}

impl std::fmt::Display for Instruction {
    /// Format an instruction in canonical VM syntax.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Instruction::PushConstant(n) => write!(f, "push constant {}", n),
            Instruction::PushSegment(seg, i) => write!(f, "push {} {}", seg.keyword(), i),
            Instruction::PopSegment(seg, i) => write!(f, "pop {} {}", seg.keyword(), i),
            Instruction::PushStatic(i) => write!(f, "push static {}", i),
            Instruction::PopStatic(i) => write!(f, "pop static {}", i),
            Instruction::PushPointer(p) => write!(f, "push pointer {}", p.index()),
            Instruction::PopPointer(p) => write!(f, "pop pointer {}", p.index()),
            Instruction::PushTemp(i) => write!(f, "push temp {}", i),
            Instruction::PopTemp(i) => write!(f, "pop temp {}", i),
            Instruction::Binary(_) | Instruction::Unary(_) | Instruction::Compare(_) => {
                write!(f, "{}", self.opcode())
            }
            Instruction::Label(name) | Instruction::Goto(name) | Instruction::IfGoto(name) => {
                write!(f, "{} {}", self.opcode(), name)
            }
            Instruction::Function { name, locals } => write!(f, "function {} {}", name, locals),
            Instruction::Call { name, args } => write!(f, "call {} {}", name, args),
            Instruction::Return => write!(f, "return"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_canonical_vm_text() {
        assert_eq!(Instruction::PushConstant(-1).to_string(), "push constant -1");
        assert_eq!(
            Instruction::PopSegment(Segment::Argument, 2).to_string(),
            "pop argument 2"
        );
        assert_eq!(
            Instruction::PushPointer(PointerSlot::That).to_string(),
            "push pointer 1"
        );
        assert_eq!(Instruction::Compare(CompareOp::Lt).to_string(), "lt");
        assert_eq!(
            Instruction::IfGoto("LOOP".to_string()).to_string(),
            "if-goto LOOP"
        );
        assert_eq!(
            Instruction::Call {
                name: "Math.max".to_string(),
                args: 2
            }
            .to_string(),
            "call Math.max 2"
        );
    }

    #[test]
    fn test_pointer_slot_index() {
        assert_eq!(PointerSlot::from_index(0), Some(PointerSlot::This));
        assert_eq!(PointerSlot::from_index(1), Some(PointerSlot::That));
        assert_eq!(PointerSlot::from_index(2), None);
        assert_eq!(PointerSlot::That.symbol(), "THAT");
    }
}
