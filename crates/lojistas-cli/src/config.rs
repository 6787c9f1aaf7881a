use clap::{Parser, Subcommand, ValueEnum};
use lojistas_core::SortField;
use std::path::PathBuf;

/// CLI configuration parsed from command line arguments and environment variables
#[derive(Parser, Debug)]
#[command(name = "lojistas")]
#[command(author, version, about = "Find online sellers by product category")]
#[command(after_help = "Examples:
  lojistas search \"ração para cães\"
  lojistas search tênis --sort data --desc --page 2
  lojistas list tênis --platform Netshoes
  lojistas export --format csv > lojistas.csv
  lojistas stats")]
pub struct Config {
    /// PostgreSQL database connection URL
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Base URL of the lojistas-gateway server
    #[arg(long, env = "GATEWAY_URL", default_value = "http://localhost:3000")]
    pub gateway_url: String,

    /// Custom path to the settings file (default: ~/.config/lojistas/config.toml)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search sellers for a category, refreshing from the gateway when needed
    #[command(after_help = "Example: lojistas search \"cafeteira elétrica\" --sort plataforma

Suggested categories: pet, moda fitness, suplementos, eletrônicos, casa e jardim, beleza, esportes, infantil")]
    Search {
        /// Product category to search for
        categoria: String,

        #[command(flatten)]
        view: ViewArgs,
    },
    /// Show stored sellers for a category without calling the gateway
    List {
        /// Product category (matched as a case-insensitive substring)
        categoria: String,

        #[command(flatten)]
        view: ViewArgs,
    },
    /// Export stored sellers
    Export {
        /// Output format for exported data
        #[arg(short, long, default_value = "jsonl")]
        format: ExportFormat,
        /// Filter by category substring
        #[arg(short, long)]
        categoria: Option<String>,
        /// Maximum number of sellers to export
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show database statistics
    Stats,
}

/// Filtering, ordering and paging of rendered results
#[derive(clap::Args, Debug, Clone)]
pub struct ViewArgs {
    /// Only sellers from this platform
    #[arg(short, long)]
    pub platform: Option<String>,

    /// Field to sort by
    #[arg(short, long, default_value = "nome")]
    pub sort: SortArg,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,

    /// Page to show (1-based; out-of-range values are clamped)
    #[arg(long, default_value_t = 1)]
    pub page: usize,
}

/// Sortable fields
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    /// Seller name
    Nome,
    /// Platform
    Plataforma,
    /// Extraction date
    Data,
}

impl From<SortArg> for SortField {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Nome => SortField::NomeLoja,
            SortArg::Plataforma => SortField::Plataforma,
            SortArg::Data => SortField::DataExtracao,
        }
    }
}

/// Supported export formats
#[derive(Debug, Clone, ValueEnum)]
pub enum ExportFormat {
    /// JSON Lines format (one JSON object per line)
    Jsonl,
    /// Standard JSON array format
    Json,
    /// CSV format (comma-separated values)
    Csv,
}
