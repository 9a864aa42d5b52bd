pub mod dumper;
pub mod parse_error;
pub mod parser;

pub use parse_error::{ParseError, ParseErrorKind};
pub use parser::{Line, parse_line, parse_unit};
