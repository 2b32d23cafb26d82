use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use hackwatch::extractor::{
    DEFAULT_CONTAINER_SELECTOR, DEFAULT_DATE_SELECTOR, DEFAULT_LINK_SELECTOR,
    DEFAULT_MODE_SELECTOR, DEFAULT_TITLE_SELECTOR, ExtractorSelectors,
};
use hackwatch::{
    DEFAULT_DATABASE_NAME, DEFAULT_ENDPOINT_URL, DEFAULT_INTERVAL_SECS, DEFAULT_SOURCE_URL,
    DeliveryOrder,
};
use url::Url;

/// Hackwatch - watches a hackathon listing and forwards new hackathons
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Opts {
    #[command(flatten)]
    pub global: GlobalOpts,

    /// Runs the bot when omitted
    #[command(subcommand)]
    pub cmd: Option<OptsCmd>,
}

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Directory to keep the database in
    #[arg(long, env = "HACKWATCH_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Database file name (without the `.redb` extension)
    #[arg(long, env = "HACKWATCH_DATABASE_NAME", default_value = DEFAULT_DATABASE_NAME)]
    pub database_name: String,

    /// Where new hackathons are POSTed to
    #[arg(long, env = "HACKWATCH_ENDPOINT_URL", default_value = DEFAULT_ENDPOINT_URL)]
    pub endpoint_url: Url,

    /// Listing page to scrape
    #[arg(long, env = "HACKWATCH_SOURCE_URL", default_value = DEFAULT_SOURCE_URL)]
    pub source_url: Url,

    /// Pause between the end of one cycle and the start of the next
    #[arg(long, env = "HACKWATCH_INTERVAL_SECS", default_value_t = DEFAULT_INTERVAL_SECS)]
    pub interval_secs: u64,

    #[arg(
        long,
        env = "HACKWATCH_DELIVERY_ORDER",
        value_enum,
        default_value = "notify-first"
    )]
    pub delivery_order: DeliveryOrder,

    /// Per-request timeout for all HTTP calls; transport default if unset
    #[arg(long, env = "HACKWATCH_HTTP_TIMEOUT_SECS")]
    pub http_timeout_secs: Option<u64>,

    /// Append logs to this file instead of stderr
    #[arg(long, env = "HACKWATCH_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    #[command(flatten)]
    pub selectors: SelectorOpts,
}

static PROJECTS_DIR: LazyLock<directories::ProjectDirs> = LazyLock::new(|| {
    directories::ProjectDirs::from("org", "Hackwatch", "hackwatch")
        .expect("Unable to determine project's dir")
});

impl GlobalOpts {
    pub fn data_dir(&self) -> &Path {
        self.data_dir.as_deref().unwrap_or_else(|| {
            PROJECTS_DIR
                .state_dir()
                .unwrap_or_else(|| PROJECTS_DIR.data_local_dir())
        })
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn http_timeout(&self) -> Option<Duration> {
        self.http_timeout_secs.map(Duration::from_secs)
    }
}

/// CSS selectors used to find hackathons on the listing page
#[derive(Debug, Args)]
pub struct SelectorOpts {
    /// One match per hackathon
    #[arg(long, env = "HACKWATCH_CONTAINER_SELECTOR", default_value = DEFAULT_CONTAINER_SELECTOR)]
    pub container_selector: String,

    #[arg(long, env = "HACKWATCH_TITLE_SELECTOR", default_value = DEFAULT_TITLE_SELECTOR)]
    pub title_selector: String,

    /// Its `href` is used as the link
    #[arg(long, env = "HACKWATCH_LINK_SELECTOR", default_value = DEFAULT_LINK_SELECTOR)]
    pub link_selector: String,

    #[arg(long, env = "HACKWATCH_MODE_SELECTOR", default_value = DEFAULT_MODE_SELECTOR)]
    pub mode_selector: String,

    #[arg(long, env = "HACKWATCH_DATE_SELECTOR", default_value = DEFAULT_DATE_SELECTOR)]
    pub date_selector: String,
}

impl From<&SelectorOpts> for ExtractorSelectors {
    fn from(opts: &SelectorOpts) -> Self {
        Self {
            container: opts.container_selector.clone(),
            title: opts.title_selector.clone(),
            link: opts.link_selector.clone(),
            mode: opts.mode_selector.clone(),
            date: opts.date_selector.clone(),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum OptsCmd {
    /// Development and debugging commands
    #[command(subcommand)]
    Dev(DevCmd),
}

#[derive(Debug, Subcommand)]
pub enum DevCmd {
    /// Scrape the listing once and print what was found
    ///
    /// Touches neither the database nor the endpoint.
    Scrape,
    /// Print every stored hackathon
    List,
}
