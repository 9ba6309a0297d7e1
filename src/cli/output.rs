//! Output formatting utilities

use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::io::Write;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::cli::OutputFormat;
use crate::entities::{Item, ItemId};

/// Determine the effective output format based on context
pub fn effective_format(format: OutputFormat) -> OutputFormat {
    match format {
        OutputFormat::Auto => OutputFormat::Table,
        other => other,
    }
}

/// Flat, display-ready view of an item for tables and CSV
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct ItemRow {
    #[tabled(rename = "ID")]
    pub id: ItemId,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Quantity")]
    pub quantity: u64,
    #[tabled(rename = "Stock")]
    pub level: String,
    #[tabled(rename = "Created")]
    pub created: String,
}

impl ItemRow {
    pub const CSV_HEADERS: [&'static str; 5] = ["id", "name", "quantity", "level", "created"];

    pub fn new(item: &Item, name_width: usize) -> Self {
        Self {
            id: item.id,
            name: super::helpers::truncate_str(&item.name, name_width),
            quantity: item.quantity,
            level: item.level().to_string(),
            created: item.created_display(),
        }
    }
}

pub fn print_table<T: Tabled>(rows: Vec<T>) {
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{}", json);
    Ok(())
}

/// Write rows as CSV to stdout. The header line is always written, even
/// when there are no rows.
pub fn print_csv<T: Serialize>(headers: &[&str], rows: &[T]) -> Result<()> {
    let stdout = std::io::stdout();
    write_csv(stdout.lock(), headers, rows)
}

pub fn write_csv<W: Write, T: Serialize>(out: W, headers: &[&str], rows: &[T]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);
    writer.write_record(headers).into_diagnostic()?;
    for row in rows {
        writer.serialize(row).into_diagnostic()?;
    }
    writer.flush().into_diagnostic()?;
    Ok(())
}

/// Write a string to stdout without a trailing newline check
pub fn print_raw(content: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(content.as_bytes()).into_diagnostic()?;
    stdout.flush().into_diagnostic()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: ItemId, name: &str, quantity: u64) -> ItemRow {
        ItemRow {
            id,
            name: name.to_string(),
            quantity,
            level: "ok".to_string(),
            created: "-".to_string(),
        }
    }

    #[test]
    fn test_csv_header_written_without_rows() {
        let mut out = Vec::new();
        write_csv::<_, ItemRow>(&mut out, &ItemRow::CSV_HEADERS, &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "id,name,quantity,level,created\n");
    }

    #[test]
    fn test_csv_rows_follow_header() {
        let mut out = Vec::new();
        write_csv(&mut out, &ItemRow::CSV_HEADERS, &[row(7, "Nut, hex", 40)]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "id,name,quantity,level,created\n7,\"Nut, hex\",40,ok,-\n"
        );
    }

    #[test]
    fn test_auto_format_is_table() {
        assert_eq!(effective_format(OutputFormat::Auto), OutputFormat::Table);
        assert_eq!(effective_format(OutputFormat::Csv), OutputFormat::Csv);
    }
}
