//! # VM instruction model
//!
//! This module defines the instructions of the stack-machine language and
//! the compilation units they are grouped into. Instructions are produced
//! by the line parser and consumed by the translator.
//!
//! ## Documentation conventions
//!
//! - Stack effects are written as `( before -- after )`.
//! - Booleans on the VM stack are `-1` (true, all bits set) and `0` (false).

pub mod instruction;
pub mod unit;
