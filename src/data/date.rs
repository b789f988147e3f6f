use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use simple_error::SimpleError;
use std::fmt;
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A calendar date as stored in `o_orderdate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date(NaiveDate);

impl Date {
    pub fn new(year: u16, month: u8, day: u8) -> Result<Date, SimpleError> {
        NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32)
            .map(Date)
            .ok_or_else(|| {
                SimpleError::new(format!(
                    "no such date {:04}-{:02}-{:02}",
                    year, month, day
                ))
            })
    }

    pub fn year(&self) -> u16 {
        self.0.year() as u16
    }

    pub fn month(&self) -> u8 {
        self.0.month() as u8
    }

    pub fn day(&self) -> u8 {
        self.0.day() as u8
    }
}

impl FromStr for Date {
    type Err = SimpleError;

    /// Parses `YYYY-MM-DD`, zero-padded.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SimpleError::new(format!("invalid date {:?}, expected YYYY-MM-DD", s));
        // chrono accepts unpadded fields, dbgen never writes them.
        if s.len() != 10 || !s.is_ascii() {
            return Err(invalid());
        }
        NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map(Date)
            .map_err(|e| SimpleError::new(format!("invalid date {:?}: {}", s, e)))
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl Serialize for Date {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Half-open interval `[start, end)` of order dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: Date,
    end: Date,
}

impl DateRange {
    /// Fails when the interval is empty.
    pub fn new(start: Date, end: Date) -> Result<DateRange, SimpleError> {
        if start >= end {
            return Err(SimpleError::new(format!(
                "end date {} must be after start date {}",
                end, start
            )));
        }
        Ok(DateRange { start, end })
    }

    pub fn start(&self) -> Date {
        self.start
    }

    pub fn end(&self) -> Date {
        self.end
    }

    pub fn contains(&self, date: &Date) -> bool {
        self.start <= *date && *date < self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
