use std::collections::HashSet;

use log::{debug, trace};

use crate::codegen::asm::AsmBlock;
use crate::codegen::labels::LabelAllocator;
use crate::codegen::templates::{self, Scope};
use crate::codegen::translate_error::TranslateError;
use crate::config::Options;
use crate::frontend::parse_error::ParseError;
use crate::frontend::parser::{is_symbol, parse_unit, validate};
use crate::lang::instruction::Instruction;
use crate::lang::unit::Unit;

/// Translates the units of one linked program, in order, into a single
/// assembly listing.
///
/// The bootstrap block (if enabled) is emitted once, when the translator
/// is created. Label counters live as long as the translator, so units
/// must be fed to the same instance to get program-wide unique labels.
pub struct Translator {
    options: Options,
    labels: LabelAllocator,
    asm: AsmBlock,
    /// Units already translated (prevents aliased statics)
    units: HashSet<String>,
}

impl Translator {
    pub fn new(options: Options) -> Self {
        let mut labels = LabelAllocator::new();
        let mut asm = AsmBlock::new(options.annotate);

        if options.bootstrap {
            templates::bootstrap(&mut asm, options.stack_base, &options.entry, &mut labels);
        }

        Self {
            options,
            labels,
            asm,
            units: HashSet::new(),
        }
    }

    /// Parse `source` as unit `name` and translate it.
    pub fn translate_source(&mut self, name: &str, source: &str) -> Result<(), TranslateError> {
        let unit = parse_unit(name, source, &self.options)?;
        self.translate_unit(&unit)
    }

    /// Append the code for one unit.
    ///
    /// Units may be built by hand or decoded from a bundle, so every
    /// instruction is checked again before anything is emitted.
    pub fn translate_unit(&mut self, unit: &Unit) -> Result<(), TranslateError> {
        if !is_symbol(&unit.name) {
            return Err(TranslateError::InvalidUnitName(unit.name.clone()));
        }
        for line in &unit.lines {
            validate(&line.instruction).map_err(|kind| {
                let text = line.instruction.to_string();
                TranslateError::Parse {
                    unit: unit.name.clone(),
                    line: line.number,
                    source: ParseError::new(kind, &text),
                    text,
                }
            })?;
        }
        if !self.units.insert(unit.name.clone()) {
            return Err(TranslateError::DuplicateUnit(unit.name.clone()));
        }

        let before = self.asm.len();
        let mut function: Option<&str> = None;

        for line in &unit.lines {
            if let Instruction::Function { name, .. } = &line.instruction {
                function = Some(name.as_str());
            }
            trace!("{}:{}: {}", unit.name, line.number, line.instruction);

            let scope = Scope {
                unit: &unit.name,
                function,
            };
            templates::emit(&mut self.asm, &line.instruction, &scope, &mut self.labels);
        }

        debug!(
            "translated unit '{}': {} instructions, {} assembly lines",
            unit.name,
            unit.lines.len(),
            self.asm.len() - before
        );
        Ok(())
    }

    /// Assembly lines emitted so far.
    pub fn lines(&self) -> &[String] {
        self.asm.lines()
    }

    pub fn finish(self) -> Vec<String> {
        self.asm.into_lines()
    }
}

/// Translate a whole program with a fresh set of label counters.
pub fn translate_program(units: &[Unit], options: &Options) -> Result<Vec<String>, TranslateError> {
    let mut translator = Translator::new(options.clone());
    for unit in units {
        translator.translate_unit(unit)?;
    }
    Ok(translator.finish())
}
