// ttf2utf/src/main.rs
//! `ttf2utf` entry point.

use anyhow::{Context, Result};
use clap::Parser;
use ttf2utf::cli::{Cli, Commands};
use ttf2utf::commands::{self, RunContext, convert, inspect};
use ttf2utf::ui::theme::{ThemeStyle, build_theme_map};
use ttf2utf::utils::map_source::load_converter;
use ttf2utf::{exit, logger};
use ttf2utf_core::converter::log_inventory;

fn run(cli: &Cli) -> Result<()> {
    let theme = build_theme_map(cli.theme.as_deref()).context("Theme error")?;
    let converter = load_converter(cli.map_file.as_deref())?;
    log_inventory(&converter);

    let ctx = RunContext {
        converter: &converter,
        theme: &theme,
        quiet: cli.quiet,
    };
    match &cli.command {
        Commands::String(cmd) => convert::run_string(&ctx, cmd),
        Commands::Plain(cmd) => convert::run_plain(&ctx, cmd),
        Commands::Docx(cmd) => convert::run_docx(&ctx, cmd),
        Commands::Detect(cmd) => inspect::run_detect(&ctx, cmd),
        Commands::Fonts(cmd) => inspect::run_fonts(&ctx, cmd),
    }
}

fn main() {
    let cli = Cli::parse();
    logger::init_logger(logger::level_from_flags(cli.quiet, cli.debug));

    if let Err(err) = run(&cli) {
        log::debug!("Run failed: {:?}", err);
        // A broken theme file must not hide the real error.
        let theme = build_theme_map(cli.theme.as_deref()).unwrap_or_else(|_| ThemeStyle::default_theme_map());
        commands::error_msg(exit::describe(&err), &theme);
        std::process::exit(exit::exit_code(&err));
    }
}
