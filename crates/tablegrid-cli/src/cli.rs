use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Extract tables from PDF pages and page images into text grids.
#[derive(Debug, Parser)]
#[command(name = "tablegrid", about, version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render PDF pages and extract their tables
    Pdf {
        /// Path to the PDF file (falls back to `input` in the config file)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        /// Rendering resolution in dots per inch (default: 300)
        #[arg(long)]
        dpi: Option<f32>,

        /// Password for encrypted PDFs
        #[arg(long)]
        password: Option<String>,

        /// Directory or file holding the pdfium library
        #[arg(long, value_name = "PATH")]
        pdfium: Option<PathBuf>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Extract tables from one already rendered page image
    Image {
        /// Path to the page image (PNG or JPEG)
        #[arg(value_name = "IMAGE")]
        file: Option<PathBuf>,

        /// JSON file with the page's text tokens
        #[arg(long, value_name = "JSON")]
        tokens: Option<PathBuf>,

        /// Page width in token units. Default: image width
        #[arg(long, requires = "page_height")]
        page_width: Option<f64>,

        /// Page height in token units. Default: image height
        #[arg(long, requires = "page_width")]
        page_height: Option<f64>,

        #[command(flatten)]
        common: CommonArgs,
    },
}

/// Options shared by every subcommand.
#[derive(Debug, Args)]
pub struct CommonArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Output location: a directory for csv, a file for json and xlsx
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Cell discovery mode
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Fail on the first warning instead of skipping the page or table
    #[arg(long)]
    pub strict: bool,

    /// Write log output to this file instead of stderr
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log pipeline details (debug level)
    #[arg(long, short)]
    pub verbose: bool,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
    /// One workbook, one sheet per table (needs --output)
    Xlsx,
}

/// Cell discovery mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Ruling-line cells, clustering text where a table has none
    Auto,
    /// Ruling-line cells only
    Ruled,
    /// Treat each page's text as one borderless table
    Borderless,
}

impl From<ModeArg> for tablegrid::DiscoveryMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Auto => tablegrid::DiscoveryMode::Auto,
            ModeArg::Ruled => tablegrid::DiscoveryMode::Ruled,
            ModeArg::Borderless => tablegrid::DiscoveryMode::Borderless,
        }
    }
}

impl Commands {
    pub fn common(&self) -> &CommonArgs {
        match self {
            Commands::Pdf { common, .. } | Commands::Image { common, .. } => common,
        }
    }
}
