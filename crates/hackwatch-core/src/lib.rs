pub mod record;

pub use self::record::{BOT_DOWN_TITLE, BotDownNoticeError, HackathonRecord};

/// Trim and collapse every inner whitespace run into a single space
///
/// Listing pages tend to spread a title over several indented lines; we
/// want `"Hack   \n  Week"` to be the same title as `"Hack Week"`.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
