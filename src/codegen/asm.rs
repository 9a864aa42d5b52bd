/// Accumulates target assembly lines.
///
/// Template blocks are wrapped in `// <title>` / `// ~<title>` comment
/// pairs unless annotation is turned off.
#[derive(Debug)]
pub struct AsmBlock {
    lines: Vec<String>,
    annotate: bool,
}

impl AsmBlock {
    pub fn new(annotate: bool) -> Self {
        Self {
            lines: Vec::new(),
            annotate,
        }
    }

    /// Append one instruction.
    pub fn emit(&mut self, line: impl Into<String>) -> &mut Self {
        self.lines.push(line.into());
        self
    }

    /// Append several instructions.
    pub fn emit_all(&mut self, lines: &[&str]) -> &mut Self {
        self.lines.extend(lines.iter().map(|l| l.to_string()));
        self
    }

    /// Declare a label at the current position.
    pub fn label(&mut self, name: &str) -> &mut Self {
        self.lines.push(format!("({})", name));
        self
    }

    /// Emit `body` between the opening and closing comments for `title`.
    pub fn framed(&mut self, title: &str, body: impl FnOnce(&mut AsmBlock)) -> &mut Self {
        if self.annotate {
            self.lines.push(format!("// {}", title));
        }
        body(self);
        if self.annotate {
            self.lines.push(format!("// ~{}", title));
        }
        self
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framed_block() {
        let mut asm = AsmBlock::new(true);
        asm.framed("push constant 1", |a| {
            a.emit("@1").emit("D=A");
        });
        assert_eq!(
            asm.lines(),
            ["// push constant 1", "@1", "D=A", "// ~push constant 1"]
        );
    }

    #[test]
    fn test_unannotated_block_drops_comments() {
        let mut asm = AsmBlock::new(false);
        asm.framed("label X", |a| {
            a.label("X");
        });
        assert_eq!(asm.into_lines(), vec!["(X)".to_string()]);
    }
}
