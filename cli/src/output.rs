/// cli/src/output.rs
/// Output utilities for the CLI
/// description: styled status lines and the function summary table printed
/// after a successful build.

use std::io::{self, Write};

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use console::Style;
use fuc_core::ir::ModuleSummary;
use fuc_core::{FucErrorExt, Target};

/// Styles for the different kinds of status line.
pub struct FormatStyle {
    pub title: Style,
    pub info: Style,
    pub error: Style,
    pub success: Style,
}

impl Default for FormatStyle {
    fn default() -> Self {
        FormatStyle {
            title: Style::new().bold().underlined(),
            info: Style::new().cyan(),
            error: Style::new().red().bold(),
            success: Style::new().green().bold(),
        }
    }
}

/// Printer that writes styled lines into any `Write`.
pub struct Printer<T: Write> {
    out: T,
    formatting: FormatStyle,
}

impl<T: Write> Printer<T> {
    pub fn new(out: T) -> Self {
        Printer { out, formatting: FormatStyle::default() }
    }

    fn line(&mut self, text: &str, style: Option<&Style>) -> io::Result<()> {
        match style {
            Some(s) => writeln!(self.out, "{}", s.apply_to(text)),
            None => writeln!(self.out, "{}", text),
        }
    }

    pub fn title(&mut self, text: &str) -> io::Result<()> {
        let style = self.formatting.title.clone();
        self.line(text, Some(&style))
    }

    pub fn info(&mut self, text: &str) -> io::Result<()> {
        let style = self.formatting.info.clone();
        self.line(text, Some(&style))
    }

    pub fn success(&mut self, text: &str) -> io::Result<()> {
        let style = self.formatting.success.clone();
        self.line(text, Some(&style))
    }

    pub fn error(&mut self, text: &str) -> io::Result<()> {
        let style = self.formatting.error.clone();
        self.line(text, Some(&style))
    }

    /// Write a compiler error as `error[issuer]: message` plus its location.
    pub fn report(&mut self, err: &dyn FucErrorExt) -> io::Result<()> {
        self.error(&format!("{}[{}]: {}", err.level(), err.issuer(), err.message()))?;
        if let Some(loc) = err.location() {
            self.line(&format!("  --> {}", loc), None)?;
        }
        Ok(())
    }

    /// Write unstyled text as is.
    pub fn message(&mut self, text: &str) -> io::Result<()> {
        self.line(text, None)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// One row per function: signature, block and instruction counts.
pub fn summary_table(summary: &ModuleSummary) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["function", "signature", "kind", "blocks", "instrs", "slots"]);

    for f in &summary.functions {
        let mut params = f.params.join(", ");
        if f.variadic {
            params.push_str(if f.params.is_empty() { "..." } else { ", ..." });
        }
        let kind = if f.declaration { "extern" } else { "defined" };
        table.add_row(vec![
            Cell::new(&f.name),
            Cell::new(format!("{} ({})", f.return_type, params)),
            Cell::new(kind),
            Cell::new(f.blocks).set_alignment(CellAlignment::Right),
            Cell::new(f.instructions).set_alignment(CellAlignment::Right),
            Cell::new(f.stack_slots).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

pub fn targets_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["target", "triple"]);
    for t in Target::ALL {
        table.add_row(vec![t.name(), t.triple()]);
    }
    table
}
