use std::sync::OnceLock;

use chrono::{DateTime, Datelike, LocalResult, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use regex::{Captures, Regex};

/// Outcome of scanning store-page text for a "free until" phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhraseMatch {
    /// A date phrase was found and converted to Unix seconds.
    Found(i64),
    /// No date, but the page states the promotion is open-ended.
    OpenEnded,
    /// Nothing usable on the page.
    NoMatch,
}

const FREE_MARKER: &str = "free to keep";
const OPEN_ENDED_MARKER: &str = "limited-time promotion";

static MONTH_DAY: OnceLock<Option<Regex>> = OnceLock::new();
static DAY_MONTH: OnceLock<Option<Regex>> = OnceLock::new();

// A pattern that fails to compile simply never matches.
fn month_day() -> Option<&'static Regex> {
    MONTH_DAY
        .get_or_init(|| {
            Regex::new(
                r"(?i)\b(?P<mon>jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)\.?\s+(?P<day>\d{1,2}),?\s*@\s*(?P<hour>\d{1,2}):(?P<min>\d{2})\s?(?P<mer>am|pm)\b",
            )
            .ok()
        })
        .as_ref()
}

fn day_month() -> Option<&'static Regex> {
    DAY_MONTH
        .get_or_init(|| {
            Regex::new(
                r"(?i)\b(?P<day>\d{1,2})\s+(?P<mon>jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)\.?,?\s*@\s*(?P<hour>\d{1,2}):(?P<min>\d{2})\s?(?P<mer>am|pm)\b",
            )
            .ok()
        })
        .as_ref()
}

/// Find the "Free to keep ... <date> @ <time>" phrase in page text.
///
/// The phrase carries no year, so the year of `now` in `tz` is used. The wall
/// clock time is interpreted in `tz`, which is the storefront's fixed zone and
/// not the caller's. Only lines mentioning "free to keep" are considered.
/// When no date is found but the text calls the offer a limited-time
/// promotion, the promotion is treated as open-ended.
#[must_use]
pub fn parse_free_until(text: &str, now: DateTime<Utc>, tz: Tz) -> PhraseMatch {
    let year = now.with_timezone(&tz).year();

    let found = text
        .lines()
        .filter(|line| line.to_ascii_lowercase().contains(FREE_MARKER))
        .find_map(|line| {
            [month_day(), day_month()]
                .into_iter()
                .flatten()
                .flat_map(|re| re.captures_iter(line))
                .find_map(|caps| phrase_epoch(&caps, year, tz))
        });

    match found {
        Some(epoch) => PhraseMatch::Found(epoch),
        None if text.to_ascii_lowercase().contains(OPEN_ENDED_MARKER) => PhraseMatch::OpenEnded,
        None => PhraseMatch::NoMatch,
    }
}

fn phrase_epoch(caps: &Captures<'_>, year: i32, tz: Tz) -> Option<i64> {
    let month = month_number(&caps["mon"])?;
    let day: u32 = caps["day"].parse().ok()?;
    let hour12: u32 = caps["hour"].parse().ok()?;
    let minute: u32 = caps["min"].parse().ok()?;
    if !(1..=12).contains(&hour12) {
        return None;
    }
    let pm = caps["mer"].eq_ignore_ascii_case("pm");
    let hour = hour12 % 12 + if pm { 12 } else { 0 };

    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, 0)?;
    let local = match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => return None,
    };
    Some(local.timestamp())
}

fn month_number(abbr: &str) -> Option<u32> {
    let m = match abbr.to_ascii_lowercase().as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(m)
}
