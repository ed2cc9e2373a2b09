use std::collections::BTreeMap;
use std::io::Write;

use anyhow::Result;
use picker_engine::RunReport;

/// One line per item: match target, source URL, destination.
pub fn write_lines(out: &mut impl Write, report: &RunReport) -> Result<()> {
    for item in &report.items {
        let status = match item.bytes {
            Some(bytes) => format!("{} bytes", bytes),
            None => "not pulled".to_string(),
        };
        writeln!(
            out,
            "{}\t{}\t{}\t{}",
            item.name,
            item.source_url,
            item.destination.display(),
            status
        )?;
    }
    Ok(())
}

pub fn write_json(out: &mut impl Write, report: &RunReport) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

/// Reports keyed by section name; failed sections are absent.
pub fn write_sections_json(
    out: &mut impl Write,
    reports: &BTreeMap<String, RunReport>,
) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, reports)?;
    writeln!(out)?;
    Ok(())
}
