use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::Parser;

use vmtrans::Options;
use vmtrans::frontend::parser::parse_unit;
use vmtrans::lang::unit::{IrBundle, Unit};

pub const VM_EXT: &str = "vm";
pub const IR_EXT: &str = "vmir";

/// VM to Hack assembly translator
#[derive(Debug, Parser)]
#[command(name = "vmtrans", version)]
pub struct Cli {
    /// A .vm file, a directory of .vm files, or a .vmir bundle
    pub input: PathBuf,

    /// Output .asm path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Do not emit the bootstrap block
    #[arg(long)]
    pub no_bootstrap: bool,

    /// Function called by the bootstrap block
    #[arg(long, default_value = "Sys.init")]
    pub entry: String,

    /// Treat unknown opcodes as errors
    #[arg(long)]
    pub strict: bool,

    /// Omit the `// op` / `// ~op` comments
    #[arg(long)]
    pub no_annotate: bool,

    /// Print the parsed instructions instead of translating
    #[arg(long)]
    pub dump: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Also write the parsed units as a postcard bundle
    #[arg(long, value_name = "PATH")]
    pub emit_ir: Option<PathBuf>,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn options(&self) -> Options {
        Options {
            bootstrap: !self.no_bootstrap,
            entry: self.entry.clone(),
            strict: self.strict,
            annotate: !self.no_annotate,
            ..Options::default()
        }
    }

    pub fn output_path(&self) -> PathBuf {
        if let Some(out) = &self.output {
            return out.clone();
        }
        if self.input.is_dir() {
            // `.` and `..` have no file name of their own
            let name = self
                .input
                .canonicalize()
                .ok()
                .and_then(|dir| dir.file_name().map(|n| n.to_os_string()))
                .unwrap_or_else(|| "out".into());
            return self.input.join(name).with_extension("asm");
        }
        self.input.with_extension("asm")
    }
}

/// Load every unit of the program named by `input`, in link order.
pub fn load_units(input: &Path, options: &Options) -> anyhow::Result<Vec<Unit>> {
    if input.is_dir() {
        let mut files = Vec::new();
        collect_sources(input, &mut files)
            .with_context(|| format!("scanning {}", input.display()))?;
        files.sort();
        if files.is_empty() {
            bail!("no .{} files in {}", VM_EXT, input.display());
        }
        return files
            .iter()
            .map(|f| load_source(f, &unit_name(input, f), options))
            .collect();
    }

    match input.extension().and_then(|e| e.to_str()) {
        Some(VM_EXT) => {
            let root = input.parent().unwrap_or_else(|| Path::new(""));
            Ok(vec![load_source(input, &unit_name(root, input), options)?])
        }
        Some(IR_EXT) => {
            let bytes =
                fs::read(input).with_context(|| format!("reading {}", input.display()))?;
            let bundle = IrBundle::from_bytes(&bytes)
                .with_context(|| format!("decoding {}", input.display()))?;
            Ok(bundle.units)
        }
        _ => bail!(
            "expected a .{} file, a .{} bundle or a directory, got {}",
            VM_EXT,
            IR_EXT,
            input.display()
        ),
    }
}

fn load_source(path: &Path, name: &str, options: &Options) -> anyhow::Result<Unit> {
    let source =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let unit = parse_unit(name, &source, options)
        .with_context(|| format!("in {}", path.display()))?;
    Ok(unit)
}

fn collect_sources(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('.'));
        if hidden {
            continue;
        }
        if path.is_dir() {
            collect_sources(&path, out)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some(VM_EXT) {
            out.push(path);
        }
    }
    Ok(())
}

/// Unit name for `file`: its path below `root` without the extension,
/// with directory components joined by `:`.
///
/// Letters, digits and `.` are kept. `_` is doubled and every other byte,
/// including a leading digit, becomes `_XX` in hex. Distinct paths
/// therefore always give distinct names.
pub fn unit_name(root: &Path, file: &Path) -> String {
    let relative = file.strip_prefix(root).unwrap_or(file).with_extension("");
    let name = relative
        .components()
        .map(|c| escape_component(&c.as_os_str().to_string_lossy()))
        .collect::<Vec<_>>()
        .join(":");
    if name.is_empty() { "_".to_string() } else { name }
}

fn escape_component(part: &str) -> String {
    let mut out = String::with_capacity(part.len());
    for (i, c) in part.char_indices() {
        if c == '_' {
            out.push_str("__");
        } else if (c.is_ascii_alphanumeric() && !(i == 0 && c.is_ascii_digit())) || c == '.' {
            out.push(c);
        } else {
            let mut buf = [0; 4];
            for b in c.encode_utf8(&mut buf).bytes() {
                out.push_str(&format!("_{:02X}", b));
            }
        }
    }
    out
}
