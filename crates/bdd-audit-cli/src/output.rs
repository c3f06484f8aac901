//! Helpers for rendering reports to a writer.

use std::io::Write;

use bdd_audit::analysis::RepeatedSequence;
use bdd_audit::model::{DataTable, ScenarioOutline};
use eyre::{Context, Result};

/// Write a rendered report table followed by a newline.
///
/// Empty tables produce no output at all, so a clean suite leaves a
/// clean stdout.
pub(crate) fn write_table(
    writer: &mut dyn Write,
    table: &DataTable,
    delimiter: &str,
) -> Result<()> {
    if table.is_empty() {
        return Ok(());
    }
    writeln!(writer, "{}", table.render(delimiter)).wrap_err("failed to write report table")
}

/// Write each repeated sequence as a usage headline plus one indented
/// line per definition, with a blank line between sequences.
pub(crate) fn write_sequences(
    writer: &mut dyn Write,
    sequences: &[RepeatedSequence],
) -> Result<()> {
    for (position, sequence) in sequences.iter().enumerate() {
        if position > 0 {
            writeln!(writer).wrap_err("failed to separate sequence listings")?;
        }
        writeln!(writer, "used {} times:", sequence.usage)
            .wrap_err("failed to write sequence usage")?;
        for def in &sequence.step_defs {
            writeln!(writer, "  {}", def.text).wrap_err("failed to write sequence step")?;
        }
    }
    Ok(())
}

/// Write each outline rewrite as the authored form followed by the
/// slimmed-down form, separated by diff-style markers.
pub(crate) fn write_outline_rewrites(
    writer: &mut dyn Write,
    rewrites: &[(&ScenarioOutline, ScenarioOutline)],
) -> Result<()> {
    for (position, (original, optimised)) in rewrites.iter().enumerate() {
        if position > 0 {
            writeln!(writer).wrap_err("failed to separate outline listings")?;
        }
        writeln!(writer, "--- original").wrap_err("failed to write outline marker")?;
        writeln!(writer, "{original}").wrap_err("failed to write original outline")?;
        writeln!(writer, "+++ optimised").wrap_err("failed to write outline marker")?;
        writeln!(writer, "{optimised}").wrap_err("failed to write optimised outline")?;
    }
    Ok(())
}
