use crate::lang::instruction::Instruction;
use crate::lang::unit::{SourceLine, Unit};

/// Listing of parsed instructions, one per line, for `--dump`.
pub struct InstructionDumper {
    pub color: bool,
}

impl Default for InstructionDumper {
    fn default() -> Self {
        Self { color: true }
    }
}

impl InstructionDumper {
    // ANSI colors
    const RESET: &'static str = "\x1b[0m";
    const DIM: &'static str = "\x1b[2m";
    const GRN: &'static str = "\x1b[32m";
    const YEL: &'static str = "\x1b[33m";
    const CYN: &'static str = "\x1b[36m";
    const MAG: &'static str = "\x1b[35m";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn no_color(mut self) -> Self {
        self.color = false;
        self
    }

    pub fn dump(&self, unit: &Unit) {
        for line in self.render(unit) {
            println!("{}", line);
        }
    }

    pub fn render(&self, unit: &Unit) -> Vec<String> {
        let (dim, reset) = if self.color {
            (Self::DIM, Self::RESET)
        } else {
            ("", "")
        };

        let mut out = Vec::with_capacity(unit.lines.len() + 1);
        out.push(format!(
            "{}── {} ({} instructions){}",
            dim,
            unit.name,
            unit.lines.len(),
            reset
        ));
        out.extend(unit.lines.iter().map(|l| self.render_one(l)));
        out
    }

    fn render_one(&self, line: &SourceLine) -> String {
        let kind = Self::kind(&line.instruction);
        let (colr, reset) = if self.color {
            (Self::color(&line.instruction), Self::RESET)
        } else {
            ("", "")
        };
        format!(
            "[{:04}] {}{:<8} {}{}",
            line.number, colr, kind, line.instruction, reset
        )
    }

    fn kind(instruction: &Instruction) -> &'static str {
        use Instruction::*;
        match instruction {
            PushConstant(_) | PushSegment(..) | PushStatic(_) | PushPointer(_) | PushTemp(_) => {
                "PUSH"
            }
            PopSegment(..) | PopStatic(_) | PopPointer(_) | PopTemp(_) => "POP",
            Binary(_) | Unary(_) => "ALU",
            Compare(_) => "CMP",
            Label(_) | Goto(_) | IfGoto(_) => "BRANCH",
            Function { .. } | Call { .. } | Return => "FUNC",
        }
    }

    fn color(instruction: &Instruction) -> &'static str {
        use Instruction::*;
        match instruction {
            PushConstant(_) => Self::CYN,
            Binary(_) | Unary(_) | Compare(_) => Self::MAG,
            Label(_) | Goto(_) | IfGoto(_) => Self::YEL,
            Function { .. } | Call { .. } | Return => Self::GRN,
            _ => Self::RESET,
        }
    }
}
