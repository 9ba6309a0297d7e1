//! `stockpile history` command - View the audit trail for an item

use console::{style, StyledObject};
use miette::Result;
use serde::Serialize;

use crate::cli::context::AppContext;
use crate::cli::helpers::failure;
use crate::cli::output::{effective_format, print_csv, print_json};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::audit::{AuditEntry, AuditTrail, AuditView, NO_EVENTS};
use crate::core::ItemsApi;
use crate::entities::{EventType, ItemId};

#[derive(clap::Args, Debug)]
pub struct HistoryArgs {
    /// Item ID to show history for
    pub id: ItemId,

    /// Limit to the N most recent events
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

/// Flattened entry for CSV output
#[derive(Debug, Serialize)]
struct HistoryRow<'a> {
    event_id: i64,
    event_type: &'a str,
    label: &'a str,
    occurred_at: &'a str,
    details: String,
}

impl HistoryRow<'_> {
    const CSV_HEADERS: [&'static str; 5] =
        ["event_id", "event_type", "label", "occurred_at", "details"];
}

impl<'a> From<&'a AuditEntry> for HistoryRow<'a> {
    fn from(entry: &'a AuditEntry) -> Self {
        Self {
            event_id: entry.event_id,
            event_type: entry.kind.as_str(),
            label: &entry.label,
            occurred_at: &entry.occurred_at,
            details: entry.details.join("; "),
        }
    }
}

pub async fn run(args: HistoryArgs, ctx: &AppContext, global: &GlobalOpts) -> Result<()> {
    let format = effective_format(global.format);
    let item_name = match format {
        OutputFormat::Table | OutputFormat::Auto => item_name(ctx, args.id).await,
        OutputFormat::Json | OutputFormat::Csv => None,
    };

    let mut trail = AuditTrail::new();
    trail.show(&ctx.api, args.id, item_name).await;

    let mut entries = match trail.view() {
        AuditView::Failed(message) => return Err(failure(message, true)),
        AuditView::Events(entries) => entries,
        AuditView::Empty | AuditView::Closed | AuditView::Loading => Vec::new(),
    };
    if let Some(limit) = args.limit {
        entries.truncate(limit);
    }

    match format {
        OutputFormat::Json => print_json(&entries)?,
        OutputFormat::Csv => {
            let rows: Vec<HistoryRow> = entries.iter().map(HistoryRow::from).collect();
            print_csv(&HistoryRow::CSV_HEADERS, &rows)?;
        }
        OutputFormat::Table | OutputFormat::Auto => {
            let heading = match trail.item_name() {
                Some(name) => format!("#{} ({})", args.id, name),
                None => format!("#{}", args.id),
            };
            println!("{} {}\n", style("History for:").bold(), style(heading).cyan());

            if entries.is_empty() {
                println!("{}", style(NO_EVENTS).yellow());
                return Ok(());
            }

            for entry in &entries {
                println!(
                    "{} {}  {}",
                    kind_style("●", &entry.kind),
                    kind_style(&entry.label, &entry.kind).bold(),
                    style(&entry.occurred_at).dim()
                );
                for line in &entry.details {
                    println!("    {}", line);
                }
            }
        }
    }

    Ok(())
}

/// Name for the header. The item may already be deleted, so any failure
/// just leaves the header with the bare id.
async fn item_name(ctx: &AppContext, id: ItemId) -> Option<String> {
    match ctx.api.get_item(id).await {
        Ok(item) => Some(item.name),
        Err(e) => {
            tracing::debug!(id, error = %e, "no item name for history header");
            None
        }
    }
}

fn kind_style<'a>(text: &'a str, kind: &EventType) -> StyledObject<&'a str> {
    match kind {
        EventType::Created => style(text).green(),
        EventType::Updated => style(text).cyan(),
        EventType::Deleted => style(text).red(),
        EventType::Other(_) => style(text).white(),
    }
}
