//! Filename date rule.
//!
//! Source filenames end in the statement's issue date as `YYYYMMDD`. The
//! archive files documents under the *period* they cover, which is one
//! month before the issue date, so the extracted date is always shifted
//! back one calendar month before it names anything.

use chrono::{Datelike, NaiveDate};

/// A calendar year/month pair, the unit the archive is organized by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveMonth {
    pub year: i32,
    pub month: u32,
}

impl ArchiveMonth {
    /// `yyyy-MM` prefix used by generated filenames.
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// The unshifted month of a date, used where no issue-date offset
    /// applies (handler-derived timestamps).
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

/// Extract the trailing `YYYYMMDD` date from a filename stem.
///
/// The stem must be strictly longer than 8 characters; an 8-character stem
/// is never treated as a bare date. All trailing 8 characters must form a
/// valid calendar date or extraction fails.
pub fn extract_date(stem: &str) -> Option<NaiveDate> {
    let chars: Vec<char> = stem.chars().collect();
    if chars.len() <= 8 {
        return None;
    }

    let tail: String = chars[chars.len() - 8..].iter().collect();
    NaiveDate::parse_from_str(&tail, "%Y%m%d").ok()
}

/// Shift a date back exactly one calendar month, dropping the day.
///
/// January rolls over to December of the previous year.
pub fn shift_back_one_month(date: NaiveDate) -> ArchiveMonth {
    if date.month() == 1 {
        ArchiveMonth {
            year: date.year() - 1,
            month: 12,
        }
    } else {
        ArchiveMonth {
            year: date.year(),
            month: date.month() - 1,
        }
    }
}
