use clap::Parser;
use miette::Result;
use stockpile::cli::commands;
use stockpile::cli::{AppContext, Cli, Commands, GlobalOpts};
use stockpile::core::{logging, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = &cli.global;

    match cli.command {
        Commands::Completions(args) => commands::completions::run(args),
        Commands::List(args) => commands::list::run(args, &connect(global)?, global).await,
        Commands::Show(args) => commands::show::run(args, &connect(global)?, global).await,
        Commands::Add(args) => {
            commands::item_form::run_add(args, &connect(global)?, global).await
        }
        Commands::Edit(args) => {
            commands::item_form::run_edit(args, &connect(global)?, global).await
        }
        Commands::Delete(args) => commands::delete::run(args, &connect(global)?).await,
        Commands::History(args) => {
            commands::history::run(args, &connect(global)?, global).await
        }
        Commands::Report(args) => commands::report::run(args, &connect(global)?).await,
    }
}

/// Load config, then set up logging and colors from the resolved `color`
fn connect(global: &GlobalOpts) -> Result<AppContext> {
    let config = Config::load(&global.overrides())?;

    logging::init(global.verbose, config.color);
    if !config.color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    AppContext::new(config)
}
