use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};

use billgen_billing::BillRequest;
use billgen_client::file::{render_bill_request, write_bill_request};
use billgen_client::{BillApi, ClientSettings, HttpBillClient};
use billgen_generator::{
    BillForm, GenerationOutcome, GenerationPoller, GenerationSession, LogNotifier, PollConfig,
};

/// Headless driver for the bill service.
#[derive(Debug, Parser)]
#[command(name = "billgen", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Submit a bill file and wait for the PDF.
    Generate {
        /// Bill request JSON (the export format).
        file: PathBuf,
        /// Where to save the PDF once ready.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List the bills generated for a user.
    List { user: String },
    /// Write an empty bill request to fill in.
    Template {
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    billgen_observability::init();

    let cli = Cli::parse();
    let settings = ClientSettings::from_env();
    tracing::info!(api = %settings.base_url, "billgen starting");

    match cli.command {
        Command::Generate { file, out } => generate(&settings, file, out).await,
        Command::List { user } => list(&settings, &user).await,
        Command::Template { out } => template(out),
    }
}

async fn generate(
    settings: &ClientSettings,
    file: PathBuf,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let api = Arc::new(HttpBillClient::new(settings)?);
    let poller = GenerationPoller::new(
        Arc::clone(&api),
        Arc::new(LogNotifier),
        GenerationSession::new(),
        PollConfig::from_env(),
    );

    let mut form = BillForm::new(poller);
    form.import_file(&file)
        .with_context(|| format!("failed to import {}", file.display()))?;

    let task = form.start_generation().context("bill request is incomplete")?;
    match task.run().await {
        GenerationOutcome::Ready { bill_id, .. } => {
            println!("bill {bill_id} ready: {}", api.download_url(bill_id));
            if let Some(out) = out {
                let pdf = api.download_bill(bill_id).await?;
                std::fs::write(&out, pdf)
                    .with_context(|| format!("failed to write {}", out.display()))?;
                println!("saved {}", out.display());
            }
            Ok(())
        }
        GenerationOutcome::Failed { reason } => bail!("bill generation failed: {reason}"),
        GenerationOutcome::Superseded => bail!("bill generation was superseded"),
    }
}

async fn list(settings: &ClientSettings, user: &str) -> anyhow::Result<()> {
    let api = HttpBillClient::new(settings)?;
    let bills = api.list_bills(user).await?;

    if bills.is_empty() {
        println!("no bills for {user}");
    }
    for bill in bills {
        println!("{}\t{}\t{}", bill.id, bill.created_at.to_rfc3339(), bill.title);
    }
    Ok(())
}

fn template(out: Option<PathBuf>) -> anyhow::Result<()> {
    let request = BillRequest::default();
    match out {
        Some(path) => write_bill_request(&path, &request)?,
        None => println!("{}", render_bill_request(&request)?),
    }
    Ok(())
}
