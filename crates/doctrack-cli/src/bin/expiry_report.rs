use anyhow::Result;
use chrono::Local;
use clap::Parser;
use doctrack_cli::{
    connect, init_tracing, print_json, render_summary, ConnectArgs, OutputFormat, StatusSummary,
};
use doctrack_core::ExpirationStatus;

/// Exit status when `--fail-on-overdue` is set and something is overdue.
const OVERDUE_EXIT_CODE: i32 = 2;

#[derive(Parser, Debug)]
#[command(name = "expiry_report")]
#[command(about = "Summarize document expiration status")]
struct Args {
    #[command(flatten)]
    connect: ConnectArgs,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Exit with status 2 when any document is overdue
    #[arg(long)]
    fail_on_overdue: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();

    let dashboard = connect(&args.connect).await?;
    let rows = dashboard.rows(&Local::now());
    let summary = StatusSummary::from_rows(&rows);

    match args.format {
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Table => print!("{}", render_summary(&summary)),
    }

    let overdue = summary.count(ExpirationStatus::Overdue);
    if args.fail_on_overdue && overdue > 0 {
        tracing::warn!(overdue, "Overdue documents found");
        std::process::exit(OVERDUE_EXIT_CODE);
    }

    Ok(())
}
