use crate::core::dates;
use crate::core::pipeline::{Pipeline, RunOutcome};
use crate::error::DivisasResult;
use crate::excel::{default_destination, default_filename, XlsxWriter};
use crate::provider::{FetchConfig, YahooChartSource};
use crate::types::{QuoteSeries, Symbol, DATE_COLUMN, SHEET_NAME};
use chrono::{Local, NaiveDate};
use colored::Colorize;
use std::io::{self, IsTerminal};
use std::path::PathBuf;

use super::prompt::date_from_arg;

/// Rows shown in the console preview.
pub const PREVIEW_ROWS: usize = 5;

/// Options for the download command
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    pub start: Option<String>,
    pub end: Option<String>,
    /// Explicit output file; overrides `output_dir`
    pub output: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub fetch: FetchConfig,
    pub verbose: bool,
}

/// Execute the download command
pub async fn download(options: DownloadOptions) -> DivisasResult<()> {
    println!("{}", "💱 Divisas COP - Exchange rate history".bold().green());
    println!(
        "   Pairs: {}\n",
        Symbol::ALL
            .iter()
            .map(|s| s.pair())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let (start, end) = read_dates(options.start.as_deref(), options.end.as_deref())?;
    let resolution = dates::resolve_dates(start, end);
    if resolution.swapped {
        println!(
            "{}",
            "⚠️  Start date is after end date. The dates have been swapped.".yellow()
        );
    }
    let range = resolution.range;

    let destination = options
        .output
        .unwrap_or_else(|| default_destination(&options.output_dir, &range));

    let source = YahooChartSource::new(&options.fetch)?;
    let pipeline = Pipeline::new(source, XlsxWriter::new());

    let verbose = options.verbose;
    let outcome = pipeline
        .run(
            range,
            move |_default_name: &str| Some(destination),
            move |phase| {
                if verbose {
                    println!("{}", format!("📡 {}", phase).cyan());
                }
            },
        )
        .await?;

    match outcome {
        RunOutcome::Saved { path, series } => {
            println!("\n{}", format_preview(&series, PREVIEW_ROWS));
            println!("{}", "✅ Download Complete!".bold().green());
            println!("   Rows:  {}", series.len());
            println!("   Sheet: {}", SHEET_NAME);
            println!("   Excel file: {}\n", path.display());
        }
        RunOutcome::Cancelled => {
            println!("{}", "Save cancelled.".yellow());
        }
    }

    Ok(())
}

/// Take dates from the arguments, prompting for missing ones. On a terminal
/// a malformed argument is asked for again instead of failing.
fn read_dates(start: Option<&str>, end: Option<&str>) -> DivisasResult<(NaiveDate, NaiveDate)> {
    let today = Local::now().date_naive();
    let (default_start, default_end) = dates::default_entry_dates(today);

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    let start = date_from_arg(
        start,
        interactive,
        &mut input,
        &mut output,
        "Start date",
        &default_start,
    )?;
    let end = date_from_arg(
        end,
        interactive,
        &mut input,
        &mut output,
        "End date",
        &default_end,
    )?;
    Ok((start, end))
}

/// Execute the filename command
pub fn filename(start: String, end: String) -> DivisasResult<()> {
    let resolution = dates::resolve(&start, &end)?;
    if resolution.swapped {
        eprintln!(
            "{}",
            "⚠️  Start date is after end date. The dates have been swapped.".yellow()
        );
    }
    println!("{}", default_filename(&resolution.range));
    Ok(())
}

/// Execute the symbols command
pub fn symbols() -> DivisasResult<()> {
    println!("{}", "💱 Exported currency pairs:".bold().cyan());
    println!("{}", "─".repeat(50));
    println!("{:<10} {:<10} {}", "Pair".bold(), "Ticker".bold(), "Column".bold());
    println!("{}", "─".repeat(50));
    for symbol in Symbol::ALL {
        println!(
            "{:<10} {:<10} {}",
            symbol.pair().bright_blue(),
            symbol.ticker(),
            symbol.column_label()
        );
    }
    println!("{}", "─".repeat(50));
    Ok(())
}

/// Plain-text table of the last `rows` rows.
pub fn format_preview(series: &QuoteSeries, rows: usize) -> String {
    let [usd_label, eur_label] = series.column_labels();
    let mut out = format!("{:<12} {:>22} {:>22}\n", DATE_COLUMN, usd_label, eur_label);
    for row in series.tail(rows) {
        out.push_str(&format!(
            "{:<12} {:>22.2} {:>22.2}\n",
            row.date.format("%Y-%m-%d").to_string(),
            row.usd_cop,
            row.eur_cop
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::QuoteRow;

    fn series(days: u32) -> QuoteSeries {
        QuoteSeries::new(
            (1..=days)
                .map(|day| QuoteRow {
                    date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
                    usd_cop: 3900.0 + day as f64,
                    eur_cop: 4300.5,
                })
                .collect(),
        )
    }

    #[test]
    fn test_format_preview_shows_last_five_rows() {
        let text = format_preview(&series(8), PREVIEW_ROWS);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].contains("Valor Cierre USD/COP"));
        assert!(lines[0].contains("Valor Cierre EUR/COP"));
        assert!(lines[1].starts_with("2024-01-04"));
        assert!(lines[5].starts_with("2024-01-08"));
        assert!(lines[5].contains("3908.00"));
        assert!(lines[5].contains("4300.50"));
    }

    #[test]
    fn test_format_preview_short_series() {
        let text = format_preview(&series(2), PREVIEW_ROWS);
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_filename_command_rejects_bad_date() {
        assert!(filename("31-01-2024".to_string(), "31/01/2024".to_string()).is_err());
    }

    #[test]
    fn test_filename_command_accepts_reversed_dates() {
        assert!(filename("31/01/2024".to_string(), "01/01/2024".to_string()).is_ok());
    }
}
