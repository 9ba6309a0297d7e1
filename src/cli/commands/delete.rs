//! `stockpile delete` command - Remove an item

use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use miette::{IntoDiagnostic, Result};

use crate::cli::context::AppContext;
use crate::cli::helpers::{api_failure, report_notification};
use crate::core::form::{ITEM_NOT_FOUND, LOAD_FAILED};
use crate::core::{Inventory, ItemsApi};
use crate::entities::ItemId;

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// ID of the item to delete
    pub id: ItemId,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub async fn run(args: DeleteArgs, ctx: &AppContext) -> Result<()> {
    if !args.yes {
        let item = ctx.api.get_item(args.id).await.map_err(|e| {
            let default = if e.is_not_found() { ITEM_NOT_FOUND } else { LOAD_FAILED };
            api_failure(e.user_message(default), &e)
        })?;

        println!(
            "Are you sure you want to delete {}? {}",
            style(&item.name).bold(),
            style("This action cannot be undone.").yellow()
        );
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Delete")
            .default(false)
            .interact()
            .into_diagnostic()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    let mut inventory = Inventory::new();
    let notification = inventory
        .delete(&ctx.api, args.id)
        .await
        .into_diagnostic()?;
    report_notification(notification)
}
