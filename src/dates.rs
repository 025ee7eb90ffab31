// src/dates.rs

use regex::Regex;
use std::sync::LazyLock;
use time::{Date, Duration, Month};

static LEADING_INT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\s*([+-]?\d+)").ok());

/// A date cell that had the `d/m/y` shape.
///
/// `Invalid` means three `/`-separated parts were present but at least one
/// is not a number (or the result is outside the representable range). It
/// never matches a year or a date bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetDate {
    Valid(Date),
    Invalid,
}

impl SheetDate {
    pub fn as_date(self) -> Option<Date> {
        match self {
            SheetDate::Valid(d) => Some(d),
            SheetDate::Invalid => None,
        }
    }

    pub fn year(self) -> Option<i32> {
        self.as_date().map(|d| d.year())
    }

    /// Zero-based month index, for bucketing.
    pub fn month_index(self) -> Option<usize> {
        self.as_date().map(|d| usize::from(u8::from(d.month())) - 1)
    }

    pub fn is_on_or_after(self, bound: Date) -> bool {
        self.as_date().is_some_and(|d| d >= bound)
    }

    pub fn is_on_or_before(self, bound: Date) -> bool {
        self.as_date().is_some_and(|d| d <= bound)
    }
}

/// Parse a `DD/MM/YYYY` cell (single digits allowed).
///
/// Returns `None` for blank cells and anything without exactly three
/// `/`-separated parts. Other separators and ISO dates are not supported.
/// Out-of-range numbers carry over: `31/04/2024` is 1 May 2024,
/// `0/1/2024` is 31 December 2023.
pub fn parse_date(text: &str) -> Option<SheetDate> {
    if text.trim().is_empty() {
        return None;
    }

    let parts: Vec<&str> = text.split('/').collect();
    if parts.len() != 3 {
        return None;
    }

    let parsed = (|| {
        let day = leading_int(parts[0])?;
        let month = leading_int(parts[1])?;
        let year = leading_int(parts[2])?;
        calendar_date(year, month, day)
    })();

    Some(parsed.map_or(SheetDate::Invalid, SheetDate::Valid))
}

/// Integer prefix of a cell part: `" 05"` → 5, `"2024 x"` → 2024, `"x"` → none.
fn leading_int(part: &str) -> Option<i64> {
    let re = LEADING_INT.as_ref()?;
    re.captures(part).and_then(|c| c[1].parse::<i64>().ok())
}

/// Month overflow moves into the year, then day overflow moves through the
/// calendar from the first of that month.
fn calendar_date(year: i64, month: i64, day: i64) -> Option<Date> {
    let months = month.checked_sub(1)?;
    let year = i32::try_from(year.checked_add(months.div_euclid(12))?).ok()?;
    let month = Month::try_from(u8::try_from(months.rem_euclid(12) + 1).ok()?).ok()?;
    let first = Date::from_calendar_date(year, month, 1).ok()?;
    let offset = i32::try_from(day.checked_sub(1)?).ok()?;
    first.checked_add(Duration::days(offset.into()))
}
