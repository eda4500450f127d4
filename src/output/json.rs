use crate::model::ScanSummary;
use anyhow::Result;

pub fn render_json(summary: &ScanSummary) -> Result<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}

pub fn print_json(summary: &ScanSummary) -> Result<()> {
    println!("{}", render_json(summary)?);
    Ok(())
}
