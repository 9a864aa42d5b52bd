//! Translator from the stack-machine VM language to Hack assembly.
//!
//! The pipeline is `frontend` (line parsing) -> `lang` (instruction model)
//! -> `codegen` (templates, label allocation, program driver).

pub mod codegen;
pub mod config;
pub mod frontend;
pub mod lang;

#[cfg(test)]
mod testing;

pub use codegen::{TranslateError, Translator, translate_program};
pub use config::Options;
