#![forbid(unsafe_code)]

mod catalog;
mod config;
mod constants;
mod document;
mod editor;
mod gui;
mod host;
mod persistence;
mod projector;
mod provisioning;
mod session;
mod store;
mod view;
mod worker;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn, Level as TraceLevel};
use tracing_subscriber::FmtSubscriber;

use config::EditorConfig;
use host::FileHost;
use persistence::MetafieldClient;
use session::Session;
use store::LimitStore;

#[derive(Parser, Debug)]
#[command(name = "product-limits-editor", version, about = "Edit per-variant purchase limits")]
struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Store file simulating the remote validation object
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Product catalog file
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// trace, debug, info, warn or error
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
enum Command {
    /// Open the limits editor (default)
    Gui,
    /// Print every row with its configured limit
    Show,
    /// Set one variant's limit and save
    Set { variant_id: String, value: String },
    /// Re-save the current configuration
    Save,
}

fn init_logging(level: &str) -> Result<()> {
    let log_level = match level.to_lowercase().as_str() {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("Failed to install log subscriber")
}

fn row_lines(session: &Session) -> Vec<String> {
    let rows = session.rows();
    if rows.is_empty() {
        return vec![constants::display::NO_PRODUCTS.to_string()];
    }
    rows.iter()
        .map(|row| {
            let product = if row.is_first_variant { row.product.title.as_str() } else { "" };
            let limit = session
                .document
                .get(row.variant_id)
                .filter(|value| !value.is_unset())
                .map(ToString::to_string)
                .unwrap_or_else(|| "-".to_string());
            format!("{product:<32} {:<24} {:<8} {}", row.variant_title, limit, row.variant_id)
        })
        .collect()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => EditorConfig::load_from(path)?,
        None => EditorConfig::load()?,
    };
    if let Some(store) = cli.store {
        config.store_path = store;
    }
    if let Some(catalog) = cli.catalog {
        config.catalog_path = catalog;
    }

    let level = cli
        .log_level
        .or_else(|| std::env::var("LOG_LEVEL").ok())
        .unwrap_or_else(|| config.log_level.clone());
    init_logging(&level)?;
    info!(store = %config.store_path.display(), catalog = %config.catalog_path.display(), "Loaded config");

    let host = Arc::new(FileHost::new(config.store_path.clone(), config.catalog_path.clone()));
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build async runtime")?;

    let session = runtime.block_on(Session::start(host.as_ref(), &config))?;

    match cli.command.unwrap_or(Command::Gui) {
        Command::Gui => {
            drop(runtime);
            let (persistence, worker_thread) = worker::spawn_worker(MetafieldClient::new(host))?;
            let closed = gui::run_gui(session, persistence, &config);
            info!("Editor closed, waiting for queued saves");
            worker_thread
                .join()
                .map_err(|_| anyhow!("Persistence worker panicked"))?;
            closed
        }
        Command::Show => {
            for line in row_lines(&session) {
                println!("{line}");
            }
            Ok(())
        }
        Command::Set { variant_id, value } => {
            if !session.rows().iter().any(|row| row.variant_id == variant_id) {
                warn!(variant = %variant_id, "Variant is not in the fetched catalog");
            }
            let client = MetafieldClient::new(host);
            let mut store = LimitStore::new(session.document);
            let outcome = runtime.block_on(store.set_limit(&client, &variant_id, &value));
            report(outcome.map(|()| format!("Saved limit for {variant_id}")), &store)
        }
        Command::Save => {
            let client = MetafieldClient::new(host);
            let mut store = LimitStore::new(session.document);
            let outcome = runtime.block_on(store.save(&client));
            report(outcome.map(|()| format!("Saved {} limit(s)", store.document().len())), &store)
        }
    }
}

fn report(outcome: Result<String, persistence::PersistenceError>, store: &LimitStore) -> Result<()> {
    match outcome {
        Ok(message) => {
            println!("{message}");
            Ok(())
        }
        Err(_) => bail!("{}", store.errors().messages().join("; ")),
    }
}
