mod cli;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::Parser;
use cli::{DevCmd, GlobalOpts, Opts, OptsCmd};
use hackwatch::extractor::{Extractor, ExtractorError, ExtractorSelectors};
use hackwatch::fetcher::{FetchError, Fetcher as _, HttpFetcher};
use hackwatch::notifier::HttpNotifier;
use hackwatch::{Bot, LOG_TARGET, build_http_client};
use hackwatch_db::{Database, DbError};
use snafu::{ResultExt as _, Snafu};
use tokio::signal;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

#[derive(Debug, Snafu)]
pub enum BotError {
    #[snafu(display("Database error: {source}"))]
    Database { source: DbError },
    #[snafu(display("HTTP client error: {source}"))]
    HttpClient { source: reqwest::Error },
    #[snafu(display("Extractor error: {source}"))]
    Extractor { source: ExtractorError },
    #[snafu(display("Scraper error: {source}"))]
    Scrape { source: FetchError },
    #[snafu(display("Could not open log file {}: {source}", path.display()))]
    LogFile { source: io::Error, path: PathBuf },
    #[snafu(display("Logging initialization failed"))]
    Logging,
}

pub type BotResult<T> = std::result::Result<T, BotError>;

#[snafu::report]
#[tokio::main]
async fn main() -> BotResult<()> {
    let opts = Opts::parse();

    init_logging(opts.global.log_file.as_deref())?;

    match opts.cmd {
        None => run_bot(&opts.global).await,
        Some(OptsCmd::Dev(cmd)) => handle_dev_cmd(&opts.global, cmd).await,
    }
}

async fn open_db(opts: &GlobalOpts) -> BotResult<Database> {
    let path = Database::mk_db_path(opts.data_dir(), &opts.database_name)
        .await
        .context(DatabaseSnafu)?;
    info!(target: LOG_TARGET, path = %path.display(), "Opening database");
    Database::open(path).await.context(DatabaseSnafu)
}

fn make_extractor(opts: &GlobalOpts) -> BotResult<Extractor> {
    Ok(Extractor::new(&ExtractorSelectors::from(&opts.selectors))
        .context(ExtractorSnafu)?
        .with_base_url(opts.source_url.clone()))
}

fn make_bot(opts: &GlobalOpts, db: Database) -> BotResult<Bot> {
    let client = build_http_client(opts.http_timeout()).context(HttpClientSnafu)?;

    Ok(Bot::builder()
        .fetcher(Box::new(HttpFetcher::new(
            client.clone(),
            opts.source_url.clone(),
        )))
        .extractor(make_extractor(opts)?)
        .store(Box::new(db))
        .notifier(Box::new(HttpNotifier::new(
            client,
            opts.endpoint_url.clone(),
        )))
        .delivery_order(opts.delivery_order)
        .build())
}

async fn run_bot(opts: &GlobalOpts) -> BotResult<()> {
    info!(
        target: LOG_TARGET,
        source_url = %opts.source_url,
        endpoint_url = %opts.endpoint_url,
        interval_secs = opts.interval_secs,
        delivery_order = ?opts.delivery_order,
        "Running..."
    );

    let db = open_db(opts).await?;
    let bot = make_bot(opts, db)?;

    info!(target: LOG_TARGET, "Bot is running. Press Ctrl+C to stop.");
    bot.run(opts.interval(), shutdown_signal()).await;

    Ok(())
}

async fn handle_dev_cmd(opts: &GlobalOpts, cmd: DevCmd) -> BotResult<()> {
    match cmd {
        DevCmd::Scrape => {
            let client = build_http_client(opts.http_timeout()).context(HttpClientSnafu)?;
            let fetcher = HttpFetcher::new(client, opts.source_url.clone());
            let extractor = make_extractor(opts)?;

            let markup = fetcher.fetch().await.context(ScrapeSnafu)?;
            let records = extractor.extract(&markup);

            println!(
                "{}",
                serde_json::to_string_pretty(&records).expect("Can't fail")
            );
        }
        DevCmd::List => {
            let db = open_db(opts).await?;
            let records = db.list_records().await.context(DatabaseSnafu)?;

            println!(
                "{}",
                serde_json::to_string_pretty(&records).expect("Can't fail")
            );
        }
    }

    Ok(())
}

pub fn init_logging(log_file: Option<&Path>) -> BotResult<()> {
    let writer = match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .context(LogFileSnafu { path })?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(io::stderr),
    };

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(log_file.is_none())
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .try_init()
        .map_err(|_| BotError::Logging)?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
