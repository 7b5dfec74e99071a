//! Shared pieces of the doctrack binaries: tracing setup, connection
//! arguments, and table rendering.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use anyhow::Context;
use clap::{Args, ValueEnum};
use doctrack_api_client::{ApiClient, Credentials, Dashboard};
use doctrack_core::models::DocumentRow;
use doctrack_core::{ClientConfig, Expiration, ExpirationStatus};
use serde::Serialize;

/// Initialize tracing for CLI binaries. Logs go to stderr.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// `--format` values accepted by the binaries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Connection flags shared by every command that talks to the service.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectArgs {
    /// Document service URL (overrides DOCTRACK_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,
    /// Username (overrides DOCTRACK_USERNAME)
    #[arg(long, global = true)]
    pub username: Option<String>,
    /// Password (overrides DOCTRACK_PASSWORD)
    #[arg(long, global = true)]
    pub password: Option<String>,
}

impl ConnectArgs {
    /// Merge flags over the environment configuration.
    pub fn resolve(&self, config: ClientConfig) -> anyhow::Result<(ClientConfig, Credentials)> {
        let config = match &self.api_url {
            Some(url) => config.with_api_url(url)?,
            None => config,
        };

        let username = self
            .username
            .clone()
            .or_else(|| config.username.clone())
            .context("Missing username. Set DOCTRACK_USERNAME or pass --username")?;
        let password = self
            .password
            .clone()
            .or_else(|| config.password.clone())
            .context("Missing password. Set DOCTRACK_PASSWORD or pass --password")?;

        Ok((config, Credentials::new(username, password)))
    }
}

/// Build a client from the environment and flags, without logging in.
pub fn client_and_credentials(args: &ConnectArgs) -> anyhow::Result<(ApiClient, Credentials)> {
    let config = ClientConfig::from_env().context("Failed to load configuration")?;
    let (config, credentials) = args.resolve(config)?;
    tracing::debug!(?config, "Resolved configuration");
    let client = ApiClient::from_config(&config).context("Failed to create API client")?;
    Ok((client, credentials))
}

/// Log in and fetch documents.
pub async fn connect(args: &ConnectArgs) -> anyhow::Result<Dashboard> {
    let (client, credentials) = client_and_credentials(args)?;
    let mut dashboard = Dashboard::new(client);
    dashboard
        .login(credentials)
        .await
        .context("Failed to log in")?;
    Ok(dashboard)
}

pub fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

pub fn format_expiration(expiration: &Expiration) -> String {
    match expiration {
        Expiration::NotPresent => "No Expiration".to_string(),
        Expiration::On(date) => date.format("%d-%m-%Y").to_string(),
        Expiration::Malformed(raw) if raw.is_empty() => "(empty)".to_string(),
        Expiration::Malformed(raw) => raw.clone(),
    }
}

/// Days column: the unsigned count with its direction, or N/A.
pub fn format_days(row: &DocumentRow) -> String {
    match row.report.day_count {
        Some(count) => count.to_string(),
        None => "N/A".to_string(),
    }
}

pub fn render_table(rows: &[DocumentRow]) -> String {
    let mut out = String::new();

    if rows.is_empty() {
        out.push_str("No documents uploaded yet\n");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<24} {:<30} {:<14} {:<14} {:>18}",
        "ID", "Document Name", "Expiration", "Status", "Days Until/Overdue"
    );
    let _ = writeln!(out, "{}", "-".repeat(104));

    for row in rows {
        let _ = writeln!(
            out,
            "{:<24} {:<30} {:<14} {:<14} {:>18}",
            truncate_string(&row.id, 24),
            truncate_string(&row.document_name, 30),
            truncate_string(&format_expiration(&row.expiration_date), 14),
            row.report.status.as_str(),
            format_days(row)
        );
    }

    out
}

/// Per-status counts plus the documents that need attention.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSummary {
    pub total: usize,
    pub counts: BTreeMap<String, usize>,
    pub needs_attention: Vec<DocumentRow>,
}

impl StatusSummary {
    pub fn from_rows(rows: &[DocumentRow]) -> Self {
        let mut counts: BTreeMap<String, usize> = ExpirationStatus::ALL
            .iter()
            .map(|status| (status.to_string(), 0))
            .collect();
        for row in rows {
            *counts.entry(row.report.status.to_string()).or_default() += 1;
        }

        let mut needs_attention: Vec<DocumentRow> = rows
            .iter()
            .filter(|row| row.report.status.needs_attention())
            .cloned()
            .collect();
        // Most overdue first, then soonest to expire.
        needs_attention.sort_by_key(|row| row.report.day_count.map(|c| c.signed()));

        StatusSummary {
            total: rows.len(),
            counts,
            needs_attention,
        }
    }

    pub fn count(&self, status: ExpirationStatus) -> usize {
        self.counts.get(status.as_str()).copied().unwrap_or(0)
    }
}

pub fn render_summary(summary: &StatusSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n=== Expiration Report ===\n");
    let _ = writeln!(out, "Total documents: {}", summary.total);
    for status in ExpirationStatus::ALL {
        let _ = writeln!(out, "  {:<14} {:>5}", status.as_str(), summary.count(status));
    }

    if summary.needs_attention.is_empty() {
        let _ = writeln!(out, "\nNothing overdue or expiring soon.");
    } else {
        let _ = writeln!(out, "\nNeeds attention:\n");
        out.push_str(&render_table(&summary.needs_attention));
    }
    out
}
