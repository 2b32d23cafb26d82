use snafu::{ResultExt as _, Snafu};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Title of the synthetic record sent downstream when a cycle fails
pub const BOT_DOWN_TITLE: &str = "Bot Down";

#[derive(Debug, Snafu)]
#[snafu(display("Failed to format bot-down timestamp"))]
pub struct BotDownNoticeError {
    source: time::error::Format,
}

/// A single hackathon listing
///
/// `title` is the identity key: two records with the same title are the
/// same hackathon as far as deduplication and storage are concerned.
///
/// On the wire the date goes under a capitalized `"Date"` key, which is
/// what downstream consumers of the feed expect.
#[cfg_attr(feature = "bincode", derive(::bincode::Encode, ::bincode::Decode))]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HackathonRecord {
    pub title: String,
    pub link: String,
    pub mode: String,
    #[cfg_attr(feature = "serde", serde(rename = "Date"))]
    pub date: String,
}

impl HackathonRecord {
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        mode: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            mode: mode.into(),
            date: date.into(),
        }
    }

    /// Whether all four fields carry something other than whitespace
    ///
    /// Only complete records are ever forwarded or stored.
    pub fn is_complete(&self) -> bool {
        [&self.title, &self.link, &self.mode, &self.date]
            .iter()
            .all(|field| !field.trim().is_empty())
    }

    /// The "Bot Down" notice
    ///
    /// Same shape as a regular record, with empty `link` and `mode` and the
    /// RFC 3339 time of the failure as `date`. It is never complete, so it
    /// can't end up in the store by accident.
    pub fn bot_down_notice(at: OffsetDateTime) -> Result<Self, BotDownNoticeError> {
        Ok(Self {
            title: BOT_DOWN_TITLE.to_owned(),
            link: String::new(),
            mode: String::new(),
            date: at.format(&Rfc3339).context(BotDownNoticeSnafu)?,
        })
    }
}
