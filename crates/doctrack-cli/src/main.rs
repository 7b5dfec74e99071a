//! doctrack CLI: command-line client for the document service.
//!
//! Set DOCTRACK_API_URL, DOCTRACK_USERNAME and DOCTRACK_PASSWORD (or pass the
//! matching flags). Every command that talks to the service logs in first.

use anyhow::Context;
use chrono::{Local, NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use doctrack_cli::{
    client_and_credentials, connect, init_tracing, print_json, render_table, ConnectArgs,
    OutputFormat,
};
use doctrack_api_client::Dashboard;
use doctrack_core::models::DocumentRow;
use doctrack_core::{evaluate, evaluate_now, Expiration};

#[derive(Parser)]
#[command(name = "doctrack", about = "Track documents and their expiration dates")]
struct Cli {
    #[command(flatten)]
    connect: ConnectArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Signup,
    /// List documents with their expiration status
    List {
        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Upload a file as a new document
    Upload {
        /// Path to the file to upload
        file: std::path::PathBuf,
    },
    /// Upload a new version of an existing document
    Replace {
        /// Document ID
        id: String,
        /// Path to the replacement file
        file: std::path::PathBuf,
    },
    /// Rename a document or change its expiration date
    Edit {
        /// Document ID
        id: String,
        /// New document name
        #[arg(long)]
        name: Option<String>,
        /// New expiration date (YYYY-MM-DD)
        #[arg(long, conflicts_with = "no_expiration")]
        expires: Option<String>,
        /// Remove the expiration date
        #[arg(long)]
        no_expiration: bool,
    },
    /// Evaluate a DD-MM-YYYY expiration date without contacting the service
    Status {
        /// Expiration date as stored by the service (DD-MM-YYYY or NOT PRESENT)
        date: String,
        /// Evaluate as of this day (YYYY-MM-DD) instead of today
        #[arg(long)]
        today: Option<NaiveDate>,
        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

fn print_rows(dashboard: &Dashboard, format: OutputFormat) -> anyhow::Result<()> {
    let rows = dashboard.rows(&Local::now());
    match format {
        OutputFormat::Json => print_json(&rows),
        OutputFormat::Table => {
            print!("{}", render_table(&rows));
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Signup => {
            let (client, credentials) = client_and_credentials(&cli.connect)?;
            let username = credentials.username.clone();
            let mut dashboard = Dashboard::new(client);
            dashboard
                .signup(credentials)
                .await
                .context("Failed to sign up")?;
            print_json(&serde_json::json!({ "success": true, "username": username }))?;
        }
        Commands::List { format } => {
            let dashboard = connect(&cli.connect).await?;
            print_rows(&dashboard, format)?;
        }
        Commands::Upload { file } => {
            let mut dashboard = connect(&cli.connect).await?;
            let document = dashboard
                .upload(&file)
                .await
                .with_context(|| format!("Failed to upload {}", file.display()))?;
            print_json(&DocumentRow::evaluate(&document, &Local::now()))?;
        }
        Commands::Replace { id, file } => {
            let mut dashboard = connect(&cli.connect).await?;
            let document = dashboard
                .replace(&id, &file)
                .await
                .with_context(|| format!("Failed to replace document {}", id))?;
            print_json(&DocumentRow::evaluate(&document, &Local::now()))?;
        }
        Commands::Edit {
            id,
            name,
            expires,
            no_expiration,
        } => {
            if name.is_none() && expires.is_none() && !no_expiration {
                anyhow::bail!("Nothing to change. Pass --name, --expires or --no-expiration");
            }

            let mut dashboard = connect(&cli.connect).await?;
            dashboard
                .open_edit(&id)
                .with_context(|| format!("Cannot edit document {}", id))?;
            if let Some(name) = name {
                dashboard.set_edit_name(&name);
            }
            if let Some(expires) = expires {
                dashboard.set_edit_expiration(&expires);
            } else if no_expiration {
                dashboard.set_edit_expiration("");
            }
            dashboard
                .save_edit()
                .await
                .with_context(|| format!("Failed to update document {}", id))?;

            let document = dashboard
                .state()
                .document(&id)
                .context("Document missing after update")?;
            print_json(&DocumentRow::evaluate(document, &Local::now()))?;
        }
        Commands::Status {
            date,
            today,
            format,
        } => {
            let expiration = Expiration::parse(&date);
            let report = match today {
                Some(day) => evaluate(&expiration, &day.and_time(NaiveTime::MIN).and_utc()),
                None => evaluate_now(&expiration),
            };
            match format {
                OutputFormat::Json => print_json(&report)?,
                OutputFormat::Table => {
                    println!("Status: {}", report.status);
                    match report.day_count {
                        Some(count) => println!("Days:   {}", count),
                        None => println!("Days:   N/A"),
                    }
                }
            }
        }
    }

    Ok(())
}
