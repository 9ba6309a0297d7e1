//! `stockpile list` command - Browse and search the inventory

use console::style;
use miette::Result;

use crate::cli::context::AppContext;
use crate::cli::helpers::{failure, NAME_COLUMN_WIDTH};
use crate::cli::output::{effective_format, print_csv, print_json, print_table, ItemRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Inventory;

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by name (case-insensitive substring) or ID
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Show only the number of matching items
    #[arg(long)]
    pub count: bool,
}

pub async fn run(args: ListArgs, ctx: &AppContext, global: &GlobalOpts) -> Result<()> {
    let mut inventory = Inventory::new();
    if let Some(query) = &args.search {
        inventory.set_query(query.as_str());
    }

    inventory.load(&ctx.api).await;
    if let Some(message) = inventory.error() {
        return Err(failure(message, true));
    }

    let total = inventory.items().map_or(0, |items| items.len());
    let items = inventory.filtered().unwrap_or_default();

    if args.count {
        println!("{}", items.len());
        return Ok(());
    }

    let rows: Vec<ItemRow> = items
        .iter()
        .map(|item| ItemRow::new(item, NAME_COLUMN_WIDTH))
        .collect();

    match effective_format(global.format) {
        OutputFormat::Json => print_json(&items)?,
        OutputFormat::Csv => print_csv(&ItemRow::CSV_HEADERS, &rows)?,
        OutputFormat::Table | OutputFormat::Auto => {
            if total == 0 {
                println!("{}", style("No items yet").bold());
                println!(
                    "{}",
                    style("Start by adding your first inventory item with 'stockpile add'").dim()
                );
                return Ok(());
            }

            if let Some(summary) = inventory.summary() {
                println!("{}\n", style(summary).dim());
            }

            if rows.is_empty() {
                println!("{}", style("No items found").bold());
                println!("{}", style("Try a different search term").dim());
            } else {
                print_table(rows);
            }
        }
    }

    Ok(())
}
