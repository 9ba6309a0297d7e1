//! `stockpile report` command - Render a printable inventory report

use chrono::Utc;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::context::AppContext;
use crate::cli::helpers::failure;
use crate::cli::output::print_raw;
use crate::core::Inventory;
use crate::schema::report::{InventoryReport, ReportRenderer};

#[derive(clap::Args, Debug)]
pub struct ReportArgs {
    /// Only include items matching this name or ID
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Write the HTML to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub async fn run(args: ReportArgs, ctx: &AppContext) -> Result<()> {
    let mut inventory = Inventory::new();
    if let Some(query) = &args.search {
        inventory.set_query(query.as_str());
    }

    inventory.load(&ctx.api).await;
    if let Some(message) = inventory.error() {
        return Err(failure(message, true));
    }

    let items = inventory.filtered().unwrap_or_default();
    let report = InventoryReport::new(items.iter().copied(), inventory.query(), Utc::now());
    let html = ReportRenderer::new()
        .and_then(|renderer| renderer.render(&report))
        .into_diagnostic()?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, html).into_diagnostic()?;
            println!(
                "{} Report written to {} ({})",
                style("✓").green(),
                style(path.display()).cyan(),
                report.count_line()
            );
        }
        None => print_raw(&html)?,
    }

    Ok(())
}
