//! `stockpile show` command - Display a single item

use console::style;
use miette::Result;

use crate::cli::context::AppContext;
use crate::cli::helpers::api_failure;
use crate::cli::output::{effective_format, print_csv, print_json, ItemRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::form::{ITEM_NOT_FOUND, LOAD_FAILED};
use crate::core::ItemsApi;
use crate::entities::{ItemId, QuantityLevel};

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Item ID
    pub id: ItemId,
}

pub async fn run(args: ShowArgs, ctx: &AppContext, global: &GlobalOpts) -> Result<()> {
    let item = ctx.api.get_item(args.id).await.map_err(|e| {
        let default = if e.is_not_found() { ITEM_NOT_FOUND } else { LOAD_FAILED };
        api_failure(e.user_message(default), &e)
    })?;

    match effective_format(global.format) {
        OutputFormat::Json => print_json(&item)?,
        OutputFormat::Csv => print_csv(&ItemRow::CSV_HEADERS, &[ItemRow::new(&item, usize::MAX)])?,
        OutputFormat::Table | OutputFormat::Auto => {
            let level = item.level();
            let badge = match level {
                QuantityLevel::Out => style(level.as_str()).red(),
                QuantityLevel::Low => style(level.as_str()).yellow(),
                QuantityLevel::Ok => style(level.as_str()).green(),
            };
            println!("{}", style("─".repeat(60)).dim());
            println!("{}: {}", style("ID").bold(), style(format!("#{}", item.id)).cyan());
            println!("{}: {}", style("Name").bold(), item.name);
            println!("{}: {} [{}]", style("Quantity").bold(), item.quantity, badge);
            println!("{}: {}", style("Created").bold(), item.created_display());
            println!("{}", style("─".repeat(60)).dim());
        }
    }

    Ok(())
}
