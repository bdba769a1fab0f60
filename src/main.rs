use std::io;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use xlsx2jsonl::{ConvertOptions, DEFAULT_SHEET, Mode, RowSource, XlsxSource, convert};

/// Convert one worksheet of an xlsx workbook, read from stdin, into
/// line-delimited JSON on stdout.
#[derive(Parser, Debug)]
#[command(
    name = "xlsx2jsonl",
    version,
    about = "Convert a worksheet from an xlsx workbook on stdin to JSON lines on stdout"
)]
struct Args {
    /// Worksheet to convert.
    #[arg(long, default_value = DEFAULT_SHEET)]
    sheet_name: String,

    /// Leading physical rows to ignore before the header row.
    #[arg(long, default_value_t = 0)]
    skip_rows: u32,

    /// Emit every value as a string instead of converting by cell type.
    #[arg(long)]
    raw: bool,

    /// Print the workbook's sheet names and exit.
    #[arg(long)]
    list_sheets: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let source = XlsxSource::from_stream(io::stdin().lock())
        .context("failed to read workbook from stdin")?;

    if args.list_sheets {
        for name in source.sheet_names() {
            println!("{name}");
        }
        return Ok(());
    }

    let options = ConvertOptions {
        sheet_name: args.sheet_name,
        skip_rows: args.skip_rows,
        mode: if args.raw { Mode::Raw } else { Mode::Typed },
    };
    convert(&source, &options, io::stdout().lock())
        .with_context(|| format!("failed to convert sheet '{}'", options.sheet_name))?;
    Ok(())
}
