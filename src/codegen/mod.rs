pub mod asm;
pub mod labels;
pub mod templates;
pub mod translate;
pub mod translate_error;

pub use translate::{Translator, translate_program};
pub use translate_error::TranslateError;
