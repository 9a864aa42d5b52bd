//! Assembly templates for each VM instruction.
//!
//! Memory layout used by the generated code:
//!
//! | address  | use                                        |
//! |----------|--------------------------------------------|
//! | 0        | `SP`, next free stack slot                 |
//! | 1..=4    | `LCL`, `ARG`, `THIS`, `THAT` frame pointers|
//! | 5..=12   | `temp` segment                             |
//! | 13..=15  | translator scratch, never visible to VM code|
//! | 16..     | `static` variables, then the stack         |
//!
//! Every push stores through `SP` and then increments it; every pop
//! decrements `SP` first and then reads.
//!
//! VM names never contain `$`. Labels made up by the translator start with
//! `$`, and VM labels are `<scope>$<label>` with a non-empty scope, so the
//! two can never meet.

use crate::codegen::asm::AsmBlock;
use crate::codegen::labels::LabelAllocator;
use crate::lang::instruction::{BinaryOp, CompareOp, Instruction, Segment, UnaryOp};

pub const TEMP_BASE: u16 = 5;

/// Right operand / popped value.
const SCRATCH_A: &str = "R13";
/// Left operand / computed address.
const SCRATCH_B: &str = "R14";

/// Cells saved by `call`, in push order.
const FRAME: [&str; 4] = ["LCL", "ARG", "THIS", "THAT"];

/// Where the instruction being translated lives.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    /// Unit name; prefixes `static` symbols.
    pub unit: &'a str,
    /// Enclosing function, if a `function` has been seen in this unit.
    pub function: Option<&'a str>,
}

impl Scope<'_> {
    /// Symbol for a VM-level label: `<function>$<label>`.
    pub fn label(&self, name: &str) -> String {
        format!("{}${}", self.function.unwrap_or(self.unit), name)
    }

    pub fn static_symbol(&self, index: u16) -> String {
        format!("{}.{}", self.unit, index)
    }
}

/// Emit the code for one instruction.
pub fn emit(
    asm: &mut AsmBlock,
    instruction: &Instruction,
    scope: &Scope<'_>,
    labels: &mut LabelAllocator,
) {
    let title = instruction.to_string();

    match instruction {
        Instruction::PushConstant(n) => push_constant(asm, *n),
        Instruction::PushSegment(seg, i) => push_segment(asm, &title, *seg, *i),
        Instruction::PopSegment(seg, i) => pop_segment(asm, &title, *seg, *i),
        Instruction::PushStatic(i) => push_cell(asm, &title, &scope.static_symbol(*i)),
        Instruction::PopStatic(i) => pop_cell(asm, &title, &scope.static_symbol(*i)),
        Instruction::PushPointer(slot) => push_cell(asm, &title, slot.symbol()),
        Instruction::PopPointer(slot) => pop_cell(asm, &title, slot.symbol()),
        Instruction::PushTemp(i) => push_cell(asm, &title, &temp_symbol(*i)),
        Instruction::PopTemp(i) => pop_cell(asm, &title, &temp_symbol(*i)),
        Instruction::Binary(op) => binary(asm, *op),
        Instruction::Unary(op) => unary(asm, *op),
        Instruction::Compare(op) => compare(asm, *op, labels),
        Instruction::Label(name) => {
            asm.framed(&title, |a| {
                a.label(&scope.label(name));
            });
        }
        Instruction::Goto(name) => {
            asm.framed(&title, |a| {
                a.emit(format!("@{}", scope.label(name))).emit("0;JMP");
            });
        }
        Instruction::IfGoto(name) => {
            asm.framed(&title, |a| {
                pop_d(a);
                a.emit(format!("@{}", scope.label(name))).emit("D;JNE");
            });
        }
        Instruction::Function { name, locals } => function(asm, name, *locals),
        Instruction::Call { name, args } => call(asm, name, *args, labels),
        Instruction::Return => ret(asm),
    }
}

/// Set `SP` to `stack_base` and call `entry` with no arguments.
pub fn bootstrap(asm: &mut AsmBlock, stack_base: u16, entry: &str, labels: &mut LabelAllocator) {
    asm.framed("bootstrap", |a| {
        a.emit(format!("@{}", stack_base))
            .emit_all(&["D=A", "@SP", "M=D"]);
        call(a, entry, 0, labels);
    });
}

// ───────────────────────────── Stack primitives ─────────────────────────

/// `*SP = D; SP++`
fn push_d(asm: &mut AsmBlock) {
    asm.emit_all(&["@SP", "A=M", "M=D", "@SP", "M=M+1"]);
}

/// `SP--; D = *SP`
fn pop_d(asm: &mut AsmBlock) {
    asm.emit_all(&["@SP", "M=M-1", "A=M", "D=M"]);
}

fn pop_to(asm: &mut AsmBlock, cell: &str) {
    pop_d(asm);
    asm.emit(format!("@{}", cell)).emit("M=D");
}

/// Callers check `index < TEMP_SIZE`; the sum is widened so an
/// unchecked index cannot overflow.
fn temp_symbol(index: u16) -> String {
    format!("R{}", u32::from(TEMP_BASE) + u32::from(index))
}

// ───────────────────────────── Memory access ────────────────────────────

fn push_constant(asm: &mut AsmBlock, n: i16) {
    asm.framed(&format!("push constant {}", n), |a| {
        if n == -1 {
            a.emit_all(&["@SP", "A=M", "M=-1", "@SP", "M=M+1"]);
            return;
        }
        if n >= 0 {
            a.emit(format!("@{}", n)).emit("D=A");
        } else if n == i16::MIN {
            a.emit(format!("@{}", i16::MAX)).emit_all(&["D=-A", "D=D-1"]);
        } else {
            a.emit(format!("@{}", -n)).emit("D=-A");
        }
        push_d(a);
    });
}

fn push_segment(asm: &mut AsmBlock, title: &str, seg: Segment, index: u16) {
    asm.framed(title, |a| {
        a.emit(format!("@{}", index))
            .emit("D=A")
            .emit(format!("@{}", seg.base_symbol()))
            .emit_all(&["A=D+M", "D=M"]);
        push_d(a);
    });
}

fn pop_segment(asm: &mut AsmBlock, title: &str, seg: Segment, index: u16) {
    asm.framed(title, |a| {
        pop_to(a, SCRATCH_A);
        a.emit(format!("@{}", index))
            .emit("D=A")
            .emit(format!("@{}", seg.base_symbol()))
            .emit("D=D+M")
            .emit(format!("@{}", SCRATCH_B))
            .emit("M=D")
            .emit(format!("@{}", SCRATCH_A))
            .emit("D=M")
            .emit(format!("@{}", SCRATCH_B))
            .emit_all(&["A=M", "M=D"]);
    });
}

/// Push from a cell whose address is known at translation time.
fn push_cell(asm: &mut AsmBlock, title: &str, cell: &str) {
    asm.framed(title, |a| {
        a.emit(format!("@{}", cell)).emit("D=M");
        push_d(a);
    });
}

fn pop_cell(asm: &mut AsmBlock, title: &str, cell: &str) {
    asm.framed(title, |a| pop_to(a, cell));
}

// ───────────────────────────── Arithmetic ───────────────────────────────

fn binary(asm: &mut AsmBlock, op: BinaryOp) {
    asm.framed(op.keyword(), |a| {
        pop_to(a, SCRATCH_A);
        pop_to(a, SCRATCH_B);
        a.emit(format!("@{}", SCRATCH_B))
            .emit("D=M")
            .emit(format!("@{}", SCRATCH_A))
            .emit(format!("M=D{}M", op.symbol()))
            .emit("D=M");
        push_d(a);
    });
}

fn unary(asm: &mut AsmBlock, op: UnaryOp) {
    asm.framed(op.keyword(), |a| {
        pop_to(a, SCRATCH_A);
        a.emit(format!("M={}M", op.symbol())).emit("D=M");
        push_d(a);
    });
}

/// Same-sign operands branch on `left - right`. Operands of opposite sign
/// would overflow the subtraction, so the sign of `left` alone stands in
/// for the difference. The result is `-1` or `0`.
fn compare(asm: &mut AsmBlock, op: CompareOp, labels: &mut LabelAllocator) {
    let id = labels.next_compare();
    let kind = op.keyword().to_ascii_uppercase();
    let local = |part: &str| format!("${}_{}.{}", kind, part, id);
    let (left_neg, subtract, test) = (local("LNEG"), local("SUB"), local("TEST"));
    let (when_true, end) = (local("TRUE"), local("END"));

    asm.framed(op.keyword(), |a| {
        pop_to(a, SCRATCH_A);
        pop_to(a, SCRATCH_B);
        a.emit(format!("@{}", SCRATCH_B))
            .emit("D=M")
            .emit(format!("@{}", left_neg))
            .emit("D;JLT");
        // left >= 0
        a.emit(format!("@{}", SCRATCH_A))
            .emit("D=M")
            .emit(format!("@{}", subtract))
            .emit("D;JGE")
            .emit("D=1")
            .emit(format!("@{}", test))
            .emit("0;JMP");
        a.label(&left_neg);
        a.emit(format!("@{}", SCRATCH_A))
            .emit("D=M")
            .emit(format!("@{}", subtract))
            .emit("D;JLT")
            .emit("D=-1")
            .emit(format!("@{}", test))
            .emit("0;JMP");
        a.label(&subtract);
        a.emit(format!("@{}", SCRATCH_B))
            .emit("D=M")
            .emit(format!("@{}", SCRATCH_A))
            .emit("D=D-M");
        a.label(&test);
        a.emit(format!("@{}", when_true))
            .emit(format!("D;{}", op.jump()));
        push_constant(a, 0);
        a.emit(format!("@{}", end)).emit("0;JMP");
        a.label(&when_true);
        push_constant(a, -1);
        a.label(&end);
    });
}

// ───────────────────────────── Functions ────────────────────────────────

fn function(asm: &mut AsmBlock, name: &str, locals: u16) {
    asm.framed(&format!("function {} {}", name, locals), |a| {
        a.label(name);
        for _ in 0..locals {
            push_constant(a, 0);
        }
    });
}

/// Frame layout after the call, growing upwards:
/// `args.. | return address | LCL | ARG | THIS | THAT |` then the callee's locals.
fn call(asm: &mut AsmBlock, name: &str, args: u16, labels: &mut LabelAllocator) {
    let return_site = format!("${}$ret.{}", name, labels.next_call());

    asm.framed(&format!("call {} {}", name, args), |a| {
        a.emit(format!("@{}", return_site)).emit("D=A");
        push_d(a);
        for cell in FRAME {
            a.emit(format!("@{}", cell)).emit("D=M");
            push_d(a);
        }
        // ARG = SP - args - 5
        a.emit_all(&["@SP", "D=M"])
            .emit(format!("@{}", u32::from(args) + FRAME.len() as u32 + 1))
            .emit_all(&["D=D-A", "@ARG", "M=D"]);
        // LCL = SP
        a.emit_all(&["@SP", "D=M", "@LCL", "M=D"]);
        a.emit(format!("@{}", name)).emit("0;JMP");
        a.label(&return_site);
    });
}

/// Everything is addressed relative to the callee's `LCL`, so the callee's
/// local and argument counts are irrelevant here.
fn ret(asm: &mut AsmBlock) {
    asm.framed("return", |a| {
        // R13 = frame
        a.emit_all(&["@LCL", "D=M"])
            .emit(format!("@{}", SCRATCH_A))
            .emit("M=D");
        // R14 = *(frame - 5), read before *ARG can overwrite it
        a.emit(format!("@{}", FRAME.len() + 1))
            .emit_all(&["A=D-A", "D=M"])
            .emit(format!("@{}", SCRATCH_B))
            .emit("M=D");
        // *ARG = pop()
        pop_d(a);
        a.emit_all(&["@ARG", "A=M", "M=D"]);
        // SP = ARG + 1
        a.emit_all(&["@ARG", "D=M+1", "@SP", "M=D"]);
        for cell in FRAME.iter().rev() {
            a.emit(format!("@{}", SCRATCH_A))
                .emit_all(&["AM=M-1", "D=M"])
                .emit(format!("@{}", cell))
                .emit("M=D");
        }
        a.emit(format!("@{}", SCRATCH_B)).emit_all(&["A=M", "0;JMP"]);
    });
}
