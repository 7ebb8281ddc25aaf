//! Partial publication dates with Gregorian-calendar validation

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::MetadataError;

/// A publication date with year, optional month, and optional day.
///
/// Valid dates fall in the proleptic Gregorian range restricted to
/// [1582-10-15, 9999-12-31]: the October 1582 cutover forbids days 1-14
/// of that month, and nothing before the cutover is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PubDate {
    year: u16,
    month: Option<u8>,
    day: Option<u8>,
}

impl PubDate {
    /// Parse `YYYY`, `YYYY-MM`, or `YYYY-MM-DD` and validate it
    pub fn parse(raw: &str) -> Result<Self, MetadataError> {
        let err = |reason: &'static str| MetadataError::InvalidDate {
            value: raw.to_string(),
            reason,
        };

        let pieces: Vec<&str> = raw.trim().split('-').collect();
        if pieces.len() > 3 {
            return Err(err("too many components"));
        }

        let year = number(pieces[0], 4).ok_or_else(|| err("year must be four digits"))?;
        let month = match pieces.get(1) {
            Some(p) => Some(number(p, 2).ok_or_else(|| err("month must be two digits"))? as u8),
            None => None,
        };
        let day = match pieces.get(2) {
            Some(p) => Some(number(p, 2).ok_or_else(|| err("day must be two digits"))? as u8),
            None => None,
        };

        if !(1582..=9999).contains(&year) {
            return Err(err("year out of range"));
        }
        if let Some(m) = month {
            if !(1..=12).contains(&m) {
                return Err(err("month out of range"));
            }
            if year == 1582 && m < 10 {
                return Err(err("before the Gregorian cutover"));
            }
        }
        if let Some(d) = day {
            let m = month.ok_or_else(|| err("day requires a month"))?;
            if d < 1 || d > days_in_month(year, m) {
                return Err(err("day out of range for month"));
            }
            if year == 1582 && m == 10 && d < 15 {
                return Err(err("before the Gregorian cutover"));
            }
        }

        Ok(Self { year, month, day })
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn month(&self) -> Option<u8> {
        self.month
    }

    pub fn day(&self) -> Option<u8> {
        self.day
    }
}

impl fmt::Display for PubDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.year)?;
        if let Some(m) = self.month {
            write!(f, "-{:02}", m)?;
        }
        if let Some(d) = self.day {
            write!(f, "-{:02}", d)?;
        }
        Ok(())
    }
}

impl From<PubDate> for String {
    fn from(date: PubDate) -> String {
        date.to_string()
    }
}

impl TryFrom<String> for PubDate {
    type Error = MetadataError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        PubDate::parse(&value)
    }
}

/// Parse a fixed-width run of ASCII digits
fn number(piece: &str, width: usize) -> Option<u16> {
    if piece.len() != width || !piece.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    piece.parse().ok()
}

fn is_leap_year(year: u16) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        _ => 28,
    }
}
