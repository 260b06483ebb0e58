use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    config::{load_settings_from, DEFAULT_CONFIG_FILE},
    ClientSettings, DirectoryDownloadSink, FormController, HttpInvoiceApi, SubmissionOutcome,
};
use shared::form::{FormState, CARDS_MIN_COUNT};
use tracing_subscriber::EnvFilter;

/// Requests a card invoice document and saves it to the download directory.
#[derive(Parser, Debug)]
#[command(name = "bup-invoice")]
struct Args {
    /// Payment details, passed to the invoice service as-is.
    #[arg(long, conflicts_with = "requisites_file")]
    requisites: Option<String>,
    /// Read payment details from a file instead.
    #[arg(long)]
    requisites_file: Option<PathBuf>,
    #[arg(long, default_value_t = CARDS_MIN_COUNT, allow_negative_numbers = true)]
    cards_count: i64,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long)]
    api_base_url: Option<String>,
    /// Directory the document is saved into.
    #[arg(long)]
    output_dir: Option<PathBuf>,
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

fn apply_args(mut settings: ClientSettings, args: &Args) -> ClientSettings {
    if let Some(url) = &args.api_base_url {
        settings.api_base_url = url.clone();
    }
    if let Some(dir) = &args.output_dir {
        settings.download_dir = dir.clone();
    }
    settings
}

async fn read_requisites(args: &Args) -> Result<String> {
    match (&args.requisites, &args.requisites_file) {
        (Some(text), _) => Ok(text.clone()),
        (None, Some(path)) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read requisites from '{}'", path.display())),
        (None, None) => Ok(String::new()),
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let settings = apply_args(load_settings_from(&args.config), &args);
    let form = FormState::new(read_requisites(&args).await?, args.cards_count, args.email.clone());

    let controller = FormController::new(
        HttpInvoiceApi::new(&settings)?,
        DirectoryDownloadSink::new(&settings.download_dir),
    );
    controller.set_form(form).await;

    let outcome = controller.submit().await;
    let notification = outcome.notification();
    match outcome {
        SubmissionOutcome::Success(file) => {
            println!("{}", notification.message);
            println!("{}", file.path.display());
            Ok(ExitCode::SUCCESS)
        }
        SubmissionOutcome::Failure(err) => {
            eprintln!("{}", notification.message);
            if let Some(errors) = err.field_errors() {
                for (field, message) in errors.iter() {
                    eprintln!("  {}: {message}", field.label());
                }
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
