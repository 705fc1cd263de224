use std::fs;
use std::path::{Path, PathBuf};

use tablegrid::{
    DEFAULT_DPI, ExtractOptions, GridSettings, PageSource, TableExtractor, TableRecord,
    WordOptions, extract_tables, render_text, to_json, write_csv, write_csv_dir, write_xlsx,
};

use crate::cli::{CommonArgs, OutputFormat};
use crate::config::Config;
use crate::shared::ProgressReporter;

/// Effective settings after merging the config file with command-line flags.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub grid: GridSettings,
    pub words: WordOptions,
    pub dpi: f32,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
}

impl RunSettings {
    pub fn merge(config: &Config, common: &CommonArgs, dpi: Option<f32>) -> Self {
        let mut grid = config.grid.clone();
        if let Some(mode) = common.mode {
            grid.mode = mode.into();
        }
        if common.strict {
            grid.strict = true;
        }
        Self {
            grid,
            words: config.text_extraction.clone(),
            dpi: dpi.or(config.dpi).unwrap_or(DEFAULT_DPI),
            format: common.format,
            output: common.output.clone().or_else(|| config.output.clone()),
        }
    }
}

/// Extract the tables of `pages` (all when `None`) and write them out.
pub fn run<S>(source: &S, pages: Option<Vec<usize>>, settings: &RunSettings) -> Result<(), i32>
where
    S: PageSource + ?Sized,
{
    if settings.format == OutputFormat::Xlsx && settings.output.is_none() {
        eprintln!("Error: xlsx output needs --output FILE (or `output` in the config)");
        return Err(2);
    }
    let extractor = TableExtractor::new(settings.grid.clone());
    let options = ExtractOptions {
        dpi: settings.dpi,
        words: settings.words.clone(),
        pages,
    };

    let progress = ProgressReporter::new();
    let result = extract_tables(source, &extractor, &options, |done, total| {
        progress.report(done, total)
    });
    progress.finish();
    let result = result.map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;

    for warning in &result.warnings {
        eprintln!("Warning: {warning}");
    }
    if result.value.is_empty() {
        tracing::warn!("no tables extracted, output not created");
        eprintln!("No tables found.");
        return Ok(());
    }

    match settings.format {
        OutputFormat::Text => {
            print!("{}", render_text(&result.value));
            Ok(())
        }
        OutputFormat::Json => write_json(&result.value, &result.warnings, settings.output.as_deref()),
        OutputFormat::Csv => write_csv_output(&result.value, settings.output.as_deref()),
        OutputFormat::Xlsx => {
            let Some(path) = settings.output.as_deref() else {
                return Err(2);
            };
            let sheets = write_xlsx(&result.value, path).map_err(|e| {
                eprintln!("Error: {e}");
                1
            })?;
            eprintln!("Wrote {sheets} table(s) to {}", path.display());
            Ok(())
        }
    }
}

fn write_json(
    records: &[TableRecord],
    warnings: &[tablegrid::ExtractWarning],
    output: Option<&Path>,
) -> Result<(), i32> {
    let json = to_json(records, warnings).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;
    match output {
        Some(path) => {
            fs::write(path, json).map_err(|e| {
                eprintln!("Error: cannot write {}: {e}", path.display());
                1
            })?;
            tracing::info!(path = %path.display(), tables = records.len(), "JSON output written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// One file per table into `output`, or every table on stdout separated by
/// blank lines.
fn write_csv_output(records: &[TableRecord], output: Option<&Path>) -> Result<(), i32> {
    let report = |e: tablegrid::SourceError| {
        eprintln!("Error: {e}");
        1
    };
    match output {
        Some(dir) => {
            let written = write_csv_dir(records, dir).map_err(report)?;
            eprintln!("Wrote {} table(s) to {}", written.len(), dir.display());
        }
        None => {
            let stdout = std::io::stdout();
            for (i, record) in records.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                write_csv(&record.grid, stdout.lock()).map_err(report)?;
            }
        }
    }
    Ok(())
}
