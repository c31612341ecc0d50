//! Summary command for dashboard totals.

use std::io::Write;

use anyhow::Result;

use sb_core::Summary;

pub fn run<W: Write>(writer: &mut W, summary: &Summary, json: bool) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *writer, summary)?;
        writeln!(writer)?;
        return Ok(());
    }

    writeln!(writer, "STAKING SUMMARY")?;
    writeln!(writer)?;
    writeln!(writer, "Unique stakers:        {}", summary.unique_entities)?;
    writeln!(writer, "Total staked items:    {}", summary.total_records)?;
    writeln!(
        writer,
        "Average stake (days):  {}",
        summary.average_elapsed_days
    )?;
    writeln!(
        writer,
        "Average stake (whole): {}",
        summary.average_elapsed_whole_days
    )?;
    Ok(())
}
