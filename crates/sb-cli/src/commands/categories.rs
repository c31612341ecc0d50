//! Categories command for listing the filter values `list` accepts.

use std::io::Write;

use anyhow::Result;

/// Prints `all` followed by each category offered by the ledger.
pub fn run<W: Write>(writer: &mut W, categories: &[String], json: bool) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *writer, categories)?;
        writeln!(writer)?;
        return Ok(());
    }

    writeln!(writer, "all")?;
    for category in categories {
        writeln!(writer, "{category}")?;
    }
    Ok(())
}
