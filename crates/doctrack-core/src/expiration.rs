//! Expiration dates and the status evaluator.
//!
//! The remote service stores expiration dates as `DD-MM-YYYY` strings and uses
//! the sentinel `NOT PRESENT` for documents that never expire. A document's
//! status is derived from that string and the current time on every read; it
//! is never stored or sent back to the server.

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::error::{AppError, AppResult};

/// Value the remote service uses for "no expiration date set".
pub const NO_EXPIRATION_SENTINEL: &str = "NOT PRESENT";

/// Documents expiring within this many days (inclusive) are `Expiring Soon`.
pub const EXPIRING_SOON_WINDOW_DAYS: i64 = 30;

const WIRE_FORMAT: &str = "%d-%m-%Y";
const ISO_FORMAT: &str = "%Y-%m-%d";

/// A document's expiration date as received from the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Expiration {
    /// The sentinel, `null`, or a missing field.
    #[default]
    NotPresent,
    /// A valid calendar date.
    On(NaiveDate),
    /// Anything unparsable. The raw text is kept verbatim.
    Malformed(String),
}

impl Expiration {
    /// Parse a `DD-MM-YYYY` wire value. Never fails.
    pub fn parse(raw: &str) -> Self {
        if raw.trim() == NO_EXPIRATION_SENTINEL {
            return Expiration::NotPresent;
        }
        match parse_wire_date(raw) {
            Some(date) => Expiration::On(date),
            None => Expiration::Malformed(raw.to_string()),
        }
    }

    /// Parse form input in `YYYY-MM-DD` form. An empty input clears the date.
    pub fn from_iso(input: &str) -> AppResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(Expiration::NotPresent);
        }
        NaiveDate::parse_from_str(trimmed, ISO_FORMAT)
            .map(Expiration::On)
            .map_err(|_| {
                AppError::InvalidInput(format!(
                    "Invalid date '{}': expected YYYY-MM-DD",
                    trimmed
                ))
            })
    }

    /// `YYYY-MM-DD` form of a valid date, used to pre-fill edit forms.
    pub fn to_iso(&self) -> Option<String> {
        self.date().map(|d| d.format(ISO_FORMAT).to_string())
    }

    /// The string sent to and received from the service.
    pub fn to_wire(&self) -> String {
        match self {
            Expiration::NotPresent => NO_EXPIRATION_SENTINEL.to_string(),
            Expiration::On(date) => date.format(WIRE_FORMAT).to_string(),
            Expiration::Malformed(raw) => raw.clone(),
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Expiration::On(date) => Some(*date),
            _ => None,
        }
    }
}

impl Display for Expiration {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.to_wire())
    }
}

impl Serialize for Expiration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_wire())
    }
}

impl<'de> Deserialize<'de> for Expiration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map_or(Expiration::NotPresent, |s| Expiration::parse(&s)))
    }
}

/// `DD-MM-YYYY` with one or two digit day and month and a four digit year.
fn parse_wire_date(raw: &str) -> Option<NaiveDate> {
    let mut tokens = raw.trim().split('-');
    let (day, month, year) = match (tokens.next(), tokens.next(), tokens.next(), tokens.next()) {
        (Some(d), Some(m), Some(y), None) => (d, m, y),
        _ => return None,
    };

    let day = numeric_token(day, 1, 2)?;
    let month = numeric_token(month, 1, 2)?;
    let year = numeric_token(year, 4, 4)?;

    NaiveDate::from_ymd_opt(year as i32, month, day)
}

fn numeric_token(token: &str, min_len: usize, max_len: usize) -> Option<u32> {
    if token.len() < min_len || token.len() > max_len {
        return None;
    }
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// Lifecycle classification of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpirationStatus {
    #[serde(rename = "Overdue")]
    Overdue,
    #[serde(rename = "Expiring Soon")]
    ExpiringSoon,
    #[serde(rename = "Up-to-date")]
    UpToDate,
    #[serde(rename = "Invalid Date")]
    InvalidDate,
    #[serde(rename = "No Expiration")]
    NoExpiration,
}

impl ExpirationStatus {
    pub const ALL: [ExpirationStatus; 5] = [
        ExpirationStatus::Overdue,
        ExpirationStatus::ExpiringSoon,
        ExpirationStatus::UpToDate,
        ExpirationStatus::InvalidDate,
        ExpirationStatus::NoExpiration,
    ];

    /// Classify a whole-day difference between the expiration date and today.
    pub fn from_days(days: i64) -> Self {
        if days < 0 {
            ExpirationStatus::Overdue
        } else if days <= EXPIRING_SOON_WINDOW_DAYS {
            ExpirationStatus::ExpiringSoon
        } else {
            ExpirationStatus::UpToDate
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpirationStatus::Overdue => "Overdue",
            ExpirationStatus::ExpiringSoon => "Expiring Soon",
            ExpirationStatus::UpToDate => "Up-to-date",
            ExpirationStatus::InvalidDate => "Invalid Date",
            ExpirationStatus::NoExpiration => "No Expiration",
        }
    }

    /// Whether the document needs attention now or within the window.
    pub fn needs_attention(&self) -> bool {
        matches!(
            self,
            ExpirationStatus::Overdue | ExpirationStatus::ExpiringSoon
        )
    }
}

impl Display for ExpirationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayDirection {
    Until,
    Overdue,
}

/// Unsigned day distance to the expiration date plus which side of it we are on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DayCount {
    pub days: u64,
    pub direction: DayDirection,
}

impl DayCount {
    pub fn from_difference(days: i64) -> Self {
        let direction = if days < 0 {
            DayDirection::Overdue
        } else {
            DayDirection::Until
        };
        DayCount {
            days: days.unsigned_abs(),
            direction,
        }
    }

    /// The signed difference this count was built from.
    pub fn signed(&self) -> i64 {
        match self.direction {
            DayDirection::Until => self.days as i64,
            DayDirection::Overdue => -(self.days as i64),
        }
    }

    pub fn label(&self) -> &'static str {
        match self.direction {
            DayDirection::Until => "days until",
            DayDirection::Overdue => "days overdue",
        }
    }
}

impl Display for DayCount {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} {}", self.days, self.label())
    }
}

/// Result of evaluating one expiration against one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusReport {
    pub status: ExpirationStatus,
    /// `None` for `Invalid Date` and `No Expiration`.
    pub day_count: Option<DayCount>,
}

/// Whole days from `now` until local midnight of `date`.
///
/// `now` is truncated to its calendar date in its own time zone first, so
/// every instant within one local day gives the same answer and a date N
/// calendar days ahead is exactly N. DST shifts do not affect the result.
pub fn days_until<Tz: TimeZone>(date: NaiveDate, now: &DateTime<Tz>) -> i64 {
    date.signed_duration_since(now.date_naive()).num_days()
}

/// Evaluate an expiration at `now`.
pub fn evaluate<Tz: TimeZone>(expiration: &Expiration, now: &DateTime<Tz>) -> StatusReport {
    match expiration {
        Expiration::NotPresent => StatusReport {
            status: ExpirationStatus::NoExpiration,
            day_count: None,
        },
        Expiration::Malformed(_) => StatusReport {
            status: ExpirationStatus::InvalidDate,
            day_count: None,
        },
        Expiration::On(date) => {
            let days = days_until(*date, now);
            StatusReport {
                status: ExpirationStatus::from_days(days),
                day_count: Some(DayCount::from_difference(days)),
            }
        }
    }
}

/// Evaluate a raw wire string at `now`.
pub fn evaluate_str<Tz: TimeZone>(raw: &str, now: &DateTime<Tz>) -> StatusReport {
    evaluate(&Expiration::parse(raw), now)
}

/// Evaluate against the local wall clock.
pub fn evaluate_now(expiration: &Expiration) -> StatusReport {
    evaluate(expiration, &Local::now())
}
