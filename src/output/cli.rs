use crate::model::{Classification, ScanSummary};
use anyhow::Result;
use std::fmt::Write;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct DeadRow {
    #[tabled(rename = "Package")]
    name: String,
    #[tabled(rename = "Days Since Release")]
    days: String,
    #[tabled(rename = "Last Release")]
    last_release: String,
}

#[derive(Tabled)]
struct UnknownRow {
    #[tabled(rename = "Package")]
    name: String,
    #[tabled(rename = "Reason")]
    reason: String,
}

pub fn print_cli_table(summary: &ScanSummary) -> Result<()> {
    print!("{}", render_cli_table(summary));
    Ok(())
}

pub fn render_cli_table(summary: &ScanSummary) -> String {
    let mut out = String::new();

    if summary.is_empty() {
        let _ = writeln!(out, "No dependencies found.");
        return out;
    }

    if summary.has_dead() {
        let _ = writeln!(
            out,
            "Found {} potentially abandoned dependencies:",
            summary.dead_count()
        );
        let _ = writeln!(out);

        let rows: Vec<DeadRow> = summary
            .dead()
            .filter_map(|p| match &p.classification {
                Classification::Dead {
                    days_since_release,
                    last_release,
                } => Some(DeadRow {
                    name: truncate(&p.name, 50),
                    days: days_since_release.to_string(),
                    last_release: last_release.format("%Y-%m-%d").to_string(),
                }),
                _ => None,
            })
            .collect();

        let _ = writeln!(out, "{}", Table::new(rows).with(Style::rounded()));
    }

    if summary.unknown_count() > 0 {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Could not check {} dependencies:",
            summary.unknown_count()
        );
        let _ = writeln!(out);

        let rows: Vec<UnknownRow> = summary
            .unknown()
            .filter_map(|p| match &p.classification {
                Classification::Unknown { reason } => Some(UnknownRow {
                    name: truncate(&p.name, 50),
                    reason: truncate(reason, 60),
                }),
                _ => None,
            })
            .collect();

        let _ = writeln!(out, "{}", Table::new(rows).with(Style::rounded()));
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Summary:");
    let _ = writeln!(
        out,
        "  {} dead, {} unknown, {} alive ({} total)",
        summary.dead_count(),
        summary.unknown_count(),
        summary.alive_count(),
        summary.total()
    );
    let _ = writeln!(out);

    if summary.has_dead() {
        let _ = writeln!(out, "Consider replacing abandoned dependencies to avoid security risks.");
    } else {
        let _ = writeln!(out, "All dependencies look active!");
    }

    out
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
