/// Translator settings shared by the parser and the code generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Emit the bootstrap block before the first unit.
    pub bootstrap: bool,

    /// Function the bootstrap block calls.
    pub entry: String,

    /// Initial stack-pointer value set by the bootstrap block.
    pub stack_base: u16,

    /// Reject unknown opcodes instead of skipping them.
    pub strict: bool,

    /// Frame every template block with `// op` / `// ~op` comments.
    pub annotate: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            bootstrap: true,
            entry: "Sys.init".to_string(),
            stack_base: 256,
            strict: false,
            annotate: true,
        }
    }
}
