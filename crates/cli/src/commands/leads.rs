//! Lead table reads: list and CSV export.

use std::io::Write;
use std::path::Path;

use chrono::Utc;
use nextrade_baas::{LeadStore, PostgrestLeadStore};
use nextrade_core::leads::{LeadFilter, export_csv, export_filename};
use nextrade_core::{Lead, LeadStatus};

use super::{CommandError, service_config};

/// Print every lead, newest first.
pub async fn list() -> Result<(), CommandError> {
    let leads = fetch().await?;
    let mut out = std::io::stdout().lock();
    writeln!(out, "{}", render_table(&leads))?;
    tracing::info!("{} leads", leads.len());
    Ok(())
}

/// Write the filtered lead table as CSV to `output`, or stdout.
pub async fn export(
    output: Option<&Path>,
    search: &str,
    status: Option<LeadStatus>,
) -> Result<(), CommandError> {
    let leads = fetch().await?;
    let filter = LeadFilter::new(search, status);
    let rows = filter.apply(&leads);
    let count = rows.len();
    let csv = export_csv(rows);

    match output {
        Some(path) => {
            std::fs::write(path, format!("{csv}\n"))?;
            tracing::info!("Exported {count} leads to {}", path.display());
        }
        None => {
            writeln!(std::io::stdout().lock(), "{csv}")?;
            tracing::info!(
                "Exported {count} leads (suggested filename: {})",
                export_filename(Utc::now().date_naive())
            );
        }
    }
    Ok(())
}

async fn fetch() -> Result<Vec<Lead>, CommandError> {
    let store = PostgrestLeadStore::new(&service_config()?)?;
    Ok(store.list_newest_first().await?)
}

/// Fixed-width table: id, created date, status, name, email.
fn render_table(leads: &[Lead]) -> String {
    let mut lines = vec![format!(
        "{:>6}  {:<10}  {:<9}  {:<24}  {}",
        "ID", "CREATED", "STATUS", "NAME", "EMAIL"
    )];
    lines.extend(leads.iter().map(|lead| {
        format!(
            "{:>6}  {:<10}  {:<9}  {:<24}  {}",
            lead.id.as_i64(),
            lead.created_at.format("%Y-%m-%d"),
            lead.status.as_str(),
            truncate(&lead.name, 24),
            lead.email
        )
    }));
    lines.join("\n")
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_owned()
    } else {
        let mut short: String = value.chars().take(max - 1).collect();
        short.push('…');
        short
    }
}
