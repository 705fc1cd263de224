mod cli;
mod config;
mod image_cmd;
mod logging;
mod page_range;
mod pdf_cmd;
mod shared;
mod tables_cmd;

use std::path::PathBuf;

use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use tables_cmd::RunSettings;

fn main() {
    let cli = Cli::parse();
    if let Err(code) = run(cli) {
        std::process::exit(code);
    }
}

fn run(cli: Cli) -> Result<(), i32> {
    let common = cli.command.common();
    let config = Config::load(common.config.as_deref()).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;
    let log_file = common.log_file.clone().or_else(|| config.log_path.clone());
    logging::init(common.verbose, log_file.as_deref()).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;

    match &cli.command {
        Commands::Pdf {
            file,
            pages,
            dpi,
            password,
            pdfium,
            common,
        } => {
            let file = input_path(file.as_ref(), &config)?;
            let settings = RunSettings::merge(&config, common, *dpi);
            tracing::info!(input = %file.display(), "starting table extraction");
            pdf_cmd::run(
                &file,
                pages.as_deref(),
                password.as_deref(),
                pdfium.as_deref(),
                &settings,
            )
        }
        Commands::Image {
            file,
            tokens,
            page_width,
            page_height,
            common,
        } => {
            let file = input_path(file.as_ref(), &config)?;
            let settings = RunSettings::merge(&config, common, None);
            let page_size = page_width.zip(*page_height);
            tracing::info!(input = %file.display(), "starting table extraction");
            image_cmd::run(&file, tokens.as_deref(), page_size, &settings)
        }
    }
}

/// The positional input, else the config file's `input`.
fn input_path(arg: Option<&PathBuf>, config: &Config) -> Result<PathBuf, i32> {
    arg.or(config.input.as_ref()).cloned().ok_or_else(|| {
        eprintln!("Error: no input file given (pass FILE or set `input` in the config)");
        2
    })
}
