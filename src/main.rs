mod cli;
mod logger;

use std::fs;

use anyhow::Context;
use clap::Parser;
use log::info;

use vmtrans::frontend::dumper::InstructionDumper;
use vmtrans::lang::unit::IrBundle;
use vmtrans::translate_program;

use crate::cli::{Cli, load_units};
use crate::logger::StderrLogger;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = StderrLogger::init(cli.verbose, cli.quiet, !cli.no_color) {
        eprintln!("cannot install logger: {}", e);
    }

    if let Err(e) = run(&cli) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let options = cli.options();
    let units = load_units(&cli.input, &options)?;

    if cli.dump {
        let mut dumper = InstructionDumper::new();
        if cli.no_color {
            dumper = dumper.no_color();
        }
        for unit in &units {
            dumper.dump(unit);
        }
        return Ok(());
    }

    if let Some(path) = &cli.emit_ir {
        let bundle = IrBundle::new(units.clone());
        let bytes = bundle.to_bytes()?;
        fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
        info!("wrote {} unit(s) to {}", units.len(), path.display());
    }

    let lines = translate_program(&units, &options)?;

    let output = cli.output_path();
    let mut text = lines.join("\n");
    text.push('\n');
    fs::write(&output, text).with_context(|| format!("writing {}", output.display()))?;

    info!(
        "translated {} unit(s) into {} lines: {}",
        units.len(),
        lines.len(),
        output.display()
    );
    Ok(())
}
