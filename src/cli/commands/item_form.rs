//! `stockpile add` / `stockpile edit` commands - Create and update items

use console::style;
use dialoguer::{theme::ColorfulTheme, Input};
use miette::{IntoDiagnostic, Result};

use crate::cli::context::AppContext;
use crate::cli::helpers::failure;
use crate::cli::output::{effective_format, print_json};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::form::{ItemForm, LoadFailure, SubmitBlocked, SubmitOutcome};
use crate::core::validate::{validate, Field};
use crate::entities::{Item, ItemId};

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Item name (1-255 characters)
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Quantity in stock (whole number, zero or more)
    #[arg(long, short = 'q', allow_hyphen_values = true)]
    pub quantity: Option<String>,

    /// Prompt for each field, validating as you type
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// ID of the item to edit
    pub id: ItemId,

    /// New item name (1-255 characters)
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// New quantity (whole number, zero or more)
    #[arg(long, short = 'q', allow_hyphen_values = true)]
    pub quantity: Option<String>,

    /// Prompt for each field, prefilled with the current values
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

pub async fn run_add(args: AddArgs, ctx: &AppContext, global: &GlobalOpts) -> Result<()> {
    let mut form = ItemForm::create();

    if args.interactive {
        prompt_fields(&mut form)?;
    } else {
        apply(&mut form, Field::Name, Some(args.name.unwrap_or_default()));
        apply(&mut form, Field::Quantity, Some(args.quantity.unwrap_or_default()));
    }

    let outcome = form.submit(&ctx.api).await;
    finish(&form, outcome, global)
}

pub async fn run_edit(args: EditArgs, ctx: &AppContext, global: &GlobalOpts) -> Result<()> {
    if !args.interactive && args.name.is_none() && args.quantity.is_none() {
        return Err(miette::miette!(
            help = "pass --name and/or --quantity, or use -i to edit interactively",
            "Nothing to change"
        ));
    }

    let mut form = ItemForm::load_for_edit(&ctx.api, args.id)
        .await
        .map_err(|e| match e {
            LoadFailure::NotFound(message) => failure(message, false),
            LoadFailure::Failed(message) => failure(message, true),
        })?;

    if args.interactive {
        prompt_fields(&mut form)?;
    } else {
        apply(&mut form, Field::Name, args.name);
        apply(&mut form, Field::Quantity, args.quantity);
    }

    let outcome = form.submit(&ctx.api).await;
    finish(&form, outcome, global)
}

/// Set a field from a flag value; fields left unset keep their draft value
fn apply(form: &mut ItemForm, field: Field, value: Option<String>) {
    if let Some(value) = value {
        form.set(field, value);
        form.blur(field);
    }
}

fn prompt_fields(form: &mut ItemForm) -> Result<()> {
    let theme = ColorfulTheme::default();

    for field in Field::ALL {
        let value: String = Input::with_theme(&theme)
            .with_prompt(field.label())
            .with_initial_text(form.draft().get(field).to_string())
            .allow_empty(true)
            .validate_with(|input: &String| match validate(field, input) {
                Some(message) => Err(message),
                None => Ok(()),
            })
            .interact_text()
            .into_diagnostic()?;

        form.set(field, value);
        form.blur(field);
    }

    Ok(())
}

fn finish(form: &ItemForm, outcome: SubmitOutcome, global: &GlobalOpts) -> Result<()> {
    match outcome {
        SubmitOutcome::Saved { item, message } => {
            if effective_format(global.format) == OutputFormat::Json {
                return print_json(&item);
            }
            println!("{} {}", style("✓").green(), message);
            print_saved(&item);
            Ok(())
        }
        SubmitOutcome::Blocked(SubmitBlocked::Invalid) => {
            let lines: Vec<String> = form
                .errors()
                .into_iter()
                .map(|(field, message)| format!("{}: {}", field.label(), message))
                .collect();
            Err(miette::miette!(
                help = "fix the fields above and try again",
                "{}",
                lines.join("\n")
            ))
        }
        SubmitOutcome::Blocked(SubmitBlocked::InFlight) => {
            Err(miette::miette!("A save is already in progress"))
        }
        SubmitOutcome::Rejected { message } | SubmitOutcome::Gone { message } => {
            Err(failure(message, false))
        }
        SubmitOutcome::Failed { message } => Err(failure(message, true)),
    }
}

fn print_saved(item: &Item) {
    println!(
        "   {} {} {}",
        style(format!("#{}", item.id)).cyan(),
        style(&item.name).bold(),
        style(format!("(quantity {})", item.quantity)).dim()
    );
}
