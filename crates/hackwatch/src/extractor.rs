use hackwatch_core::{HackathonRecord, normalize_whitespace};
use scraper::{ElementRef, Html, Selector};
use snafu::Snafu;
use tracing::debug;
use url::Url;

use crate::LOG_TARGET;

pub const DEFAULT_CONTAINER_SELECTOR: &str = "div.sc-xyzabc";
pub const DEFAULT_TITLE_SELECTOR: &str = "h3.hackathon-title";
pub const DEFAULT_LINK_SELECTOR: &str = "a.hackathon-link";
pub const DEFAULT_MODE_SELECTOR: &str = "p.hackathon-mode";
pub const DEFAULT_DATE_SELECTOR: &str = "div.hackathon-date";

#[derive(Debug, Snafu)]
pub enum ExtractorError {
    #[snafu(display("Invalid {field} selector `{selector}`: {reason}"))]
    Selector {
        field: &'static str,
        selector: String,
        reason: String,
    },
}

pub type ExtractorResult<T> = std::result::Result<T, ExtractorError>;

/// CSS selectors describing where a listing keeps its hackathons
///
/// `container` matches one element per hackathon, the rest are looked up
/// inside of it. The first match of each wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorSelectors {
    pub container: String,
    pub title: String,
    /// The `href` of the matched element is used
    pub link: String,
    pub mode: String,
    pub date: String,
}

impl Default for ExtractorSelectors {
    fn default() -> Self {
        Self {
            container: DEFAULT_CONTAINER_SELECTOR.to_owned(),
            title: DEFAULT_TITLE_SELECTOR.to_owned(),
            link: DEFAULT_LINK_SELECTOR.to_owned(),
            mode: DEFAULT_MODE_SELECTOR.to_owned(),
            date: DEFAULT_DATE_SELECTOR.to_owned(),
        }
    }
}

/// Turns listing markup into candidate [`HackathonRecord`]s
#[derive(Debug)]
pub struct Extractor {
    container: Selector,
    title: Selector,
    link: Selector,
    mode: Selector,
    date: Selector,
    base_url: Option<Url>,
}

fn parse_selector(field: &'static str, selector: &str) -> ExtractorResult<Selector> {
    Selector::parse(selector).map_err(|err| ExtractorError::Selector {
        field,
        selector: selector.to_owned(),
        reason: err.to_string(),
    })
}

impl Extractor {
    pub fn new(selectors: &ExtractorSelectors) -> ExtractorResult<Self> {
        Ok(Self {
            container: parse_selector("container", &selectors.container)?,
            title: parse_selector("title", &selectors.title)?,
            link: parse_selector("link", &selectors.link)?,
            mode: parse_selector("mode", &selectors.mode)?,
            date: parse_selector("date", &selectors.date)?,
            base_url: None,
        })
    }

    /// Resolve relative links against `base_url` (usually the page URL)
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Extract every complete record, in document order
    ///
    /// Containers with a missing or blank field are skipped.
    pub fn extract(&self, markup: &str) -> Vec<HackathonRecord> {
        let document = Html::parse_document(markup);

        let mut records = Vec::new();
        for (index, container) in document.select(&self.container).enumerate() {
            match self.extract_one(container) {
                Some(record) => records.push(record),
                None => {
                    debug!(target: LOG_TARGET, index, "Incomplete hackathon entry, skipping");
                }
            }
        }

        debug!(target: LOG_TARGET, count = records.len(), "Extracted hackathons");
        records
    }

    fn extract_one(&self, container: ElementRef<'_>) -> Option<HackathonRecord> {
        let title = Self::text_of(container, &self.title)?;
        let link = self.link_of(container)?;
        let mode = Self::text_of(container, &self.mode)?;
        let date = Self::text_of(container, &self.date)?;

        Some(HackathonRecord {
            title,
            link,
            mode,
            date,
        })
    }

    fn text_of(container: ElementRef<'_>, selector: &Selector) -> Option<String> {
        let element = container.select(selector).next()?;
        let text = normalize_whitespace(&element.text().collect::<String>());
        (!text.is_empty()).then_some(text)
    }

    fn link_of(&self, container: ElementRef<'_>) -> Option<String> {
        let href = container
            .select(&self.link)
            .next()?
            .value()
            .attr("href")?
            .trim();
        if href.is_empty() {
            return None;
        }

        Some(match &self.base_url {
            Some(base) => base
                .join(href)
                .map(String::from)
                .unwrap_or_else(|_| href.to_owned()),
            None => href.to_owned(),
        })
    }
}
