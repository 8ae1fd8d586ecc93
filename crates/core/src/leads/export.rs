//! CSV export of the filtered lead list.
//!
//! Fields are joined with bare commas and are not quoted, so a value that
//! contains a comma shifts the columns of its row. Line breaks inside a value
//! are flattened to spaces so the output always has one line per lead.

use chrono::NaiveDate;

use super::Lead;

/// Header row; rows follow in the same column order.
pub const CSV_HEADER: &str = "Name,Email,Phone,Message,Created At";

/// Build the export table: header plus one line per lead, `\n`-separated.
pub fn export_csv<'a, I>(leads: I) -> String
where
    I: IntoIterator<Item = &'a Lead>,
{
    let mut out = String::from(CSV_HEADER);
    for lead in leads {
        let created = lead.created_at.format("%-m/%-d/%Y").to_string();
        let row = [
            lead.name.as_str(),
            lead.email.as_str(),
            lead.phone.as_str(),
            lead.message.as_str(),
            created.as_str(),
        ]
        .map(single_line)
        .join(",");
        out.push('\n');
        out.push_str(&row);
    }
    out
}

/// Download filename for an export taken on `today`.
#[must_use]
pub fn export_filename(today: NaiveDate) -> String {
    format!("nextrade-leads-{}.csv", today.format("%Y-%m-%d"))
}

fn single_line(value: &str) -> String {
    value.replace("\r\n", " ").replace(['\n', '\r'], " ")
}
