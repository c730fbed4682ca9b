use anyhow::{Context, Result};
use clap::Parser;
use console::{style, Emoji};
use dicom_uploader::client::LocalConnector;
use dicom_uploader::config::DEFAULT_URL_PREFIX;
use dicom_uploader::{Uploader, UploaderConfig};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::{error, Level};
use uuid::Uuid;

static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "");
static CLIPBOARD: Emoji<'_, '_> = Emoji("📋 ", "");
static STOPWATCH: Emoji<'_, '_> = Emoji("⏱️ ", "");

#[derive(Parser, Clone)]
#[command(name = "dicom-uploader")]
#[command(about = "Uploads DICOM series to a cloud storage folder by URL reference")]
#[command(version = "0.1")]
struct Args {
    /// SSH private key used to authenticate
    #[arg(long = "ssh-key-file", env = "ENCORD_SSH_KEY_FILE")]
    ssh_key_file: PathBuf,

    /// Title of the cloud integration the files are hosted through
    #[arg(long = "integration-title", env = "CLOUD_INTEGRATION_TITLE")]
    integration_title: String,

    /// Directory holding one subdirectory per series
    #[arg(long = "dicom-dir", env = "DICOM_DIR")]
    dicom_dir: PathBuf,

    /// Prefix of the URLs the files are reachable under
    #[arg(long, env = "DICOM_URL_PREFIX", default_value = DEFAULT_URL_PREFIX)]
    url_prefix: String,

    /// Storage folder name (default: "dicom data folder <unix time>")
    #[arg(long, env = "STORAGE_FOLDER_NAME")]
    folder_name: Option<String>,

    /// Root directory of the local storage backend
    #[arg(long, env = "STORAGE_ROOT", default_value = "storage")]
    storage_root: PathBuf,

    /// JSON list of cloud integrations (default: <storage-root>/integrations.json)
    #[arg(long, env = "CLOUD_INTEGRATIONS_FILE")]
    integrations_file: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let session_id = Uuid::new_v4().to_string();
    std::fs::create_dir_all("logs")?;
    let log_file = format!("logs/dicom_uploader_{}.log", session_id);
    let summary_file = format!("logs/dicom_uploader_summary_{}.json", session_id);

    tracing_subscriber::fmt()
        .with_writer(std::fs::File::create(&log_file)?)
        .with_ansi(false)
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    println!("{} DICOM Uploader v0.1", ROCKET);
    println!("Session ID: {}", style(&session_id).cyan());
    println!("Log file: {}", style(&log_file).yellow());
    println!();

    let mut config = UploaderConfig::new(&args.ssh_key_file, &args.integration_title, &args.dicom_dir)
        .with_url_prefix(&args.url_prefix);
    if let Some(name) = &args.folder_name {
        config = config.with_folder_name(name);
    }

    let integrations_file = args
        .integrations_file
        .clone()
        .unwrap_or_else(|| args.storage_root.join("integrations.json"));
    let connector = LocalConnector::new(&args.storage_root, integrations_file);

    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("  [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    println!("{} Reading {}...", CLIPBOARD, style(args.dicom_dir.display()).dim());
    let uploader = Uploader::new(connector)
        .with_session_id(&session_id)
        .with_progress(progress);

    let mut stdout = std::io::stdout();
    let outcome = match uploader.run(&config, &mut stdout).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Upload failed: {}", e);
            return Err(e).context("dicom upload failed");
        }
    };

    let summary = &outcome.summary;
    std::fs::write(&summary_file, serde_json::to_string_pretty(summary)?)?;

    let duration = summary.end_time.signed_duration_since(summary.start_time);
    println!();
    println!("{} Upload Summary", STOPWATCH);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Status:          {}", style(summary.status).cyan());
    println!("Series:          {}", style(summary.series_count).cyan());
    println!("Files:           {}", style(summary.file_count).cyan());
    println!("Integrated:      {}", style(summary.units_done_count).green());
    println!("Failed:          {}", style(summary.units_error_count).red());
    println!("Storage folder:  {}", summary.storage_folder);
    println!("Total time:      {:.2} seconds", duration.num_milliseconds() as f64 / 1000.0);
    println!();
    println!("📄 Detailed log: {}", style(&log_file).yellow());
    println!("📊 Summary JSON: {}", style(&summary_file).yellow());

    Ok(())
}
