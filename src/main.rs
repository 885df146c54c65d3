use clap::{Parser, Subcommand};
use divisas_cop::cli::{self, DownloadOptions};
use divisas_cop::provider::{FetchConfig, DEFAULT_PROVIDER_URL, DEFAULT_TIMEOUT_SECS};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "divisas")]
#[command(about = "Download USD/COP and EUR/COP daily closing prices to Excel")]
#[command(long_about = "Divisas COP - exchange rate history to Excel

Downloads daily closing prices for USD/COP and EUR/COP over a date range,
drops days where either pair has no close, rounds to 2 decimals and saves
the result to an .xlsx workbook (sheet 'HistorialTasasDeCambio').

COMMANDS:
  download  - Fetch closes and save them to Excel
  filename  - Print the default output filename for a range
  symbols   - List the exported currency pairs

EXAMPLES:
  divisas download --start 01/01/2024 --end 31/01/2024
  divisas download                       # prompts for both dates
  divisas filename -s 01/01/2024 -e 31/01/2024

Dates are dd/mm/yyyy. The end date is included in the output.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Fetch closing prices and save them to Excel.

Missing dates are asked for interactively; an empty answer takes the
default (one week ago for the start, today for the end). A bad date is
asked again until it parses.

If the start date is after the end date they are swapped with a warning.

OUTPUT:
  --output FILE       Write exactly to FILE
  --output-dir DIR    Write historial_divisas_cop_<start>_a_<end>.xlsx in DIR

EXAMPLE:
  divisas download -s 01/01/2024 -e 31/01/2024 -d reports/")]
    /// Fetch closing prices and save them to Excel
    Download {
        /// Start date (dd/mm/yyyy)
        #[arg(short, long)]
        start: Option<String>,

        /// End date, inclusive (dd/mm/yyyy)
        #[arg(short, long)]
        end: Option<String>,

        /// Output Excel file path (.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory for the default filename
        #[arg(short = 'd', long, default_value = ".", env = "DIVISAS_OUTPUT_DIR")]
        output_dir: PathBuf,

        /// Market data provider base URL
        #[arg(long, default_value = DEFAULT_PROVIDER_URL, env = "DIVISAS_PROVIDER_URL")]
        provider_url: String,

        /// HTTP timeout in seconds
        #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, env = "DIVISAS_TIMEOUT_SECS")]
        timeout_secs: u64,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the default output filename for a date range
    Filename {
        /// Start date (dd/mm/yyyy)
        #[arg(short, long)]
        start: String,

        /// End date (dd/mm/yyyy)
        #[arg(short, long)]
        end: String,
    },

    /// List the exported currency pairs
    Symbols,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "divisas_cop=debug"
    } else {
        "divisas_cop=error"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Download {
            start,
            end,
            output,
            output_dir,
            provider_url,
            timeout_secs,
            verbose,
        } => {
            init_tracing(verbose);
            let options = DownloadOptions {
                start,
                end,
                output,
                output_dir,
                fetch: FetchConfig {
                    base_url: provider_url,
                    timeout_secs,
                    ..FetchConfig::default()
                },
                verbose,
            };
            cli::download(options).await?;
        }

        Commands::Filename { start, end } => {
            init_tracing(false);
            cli::filename(start, end)?;
        }

        Commands::Symbols => cli::symbols()?,
    }

    Ok(())
}
