use bsg_utils::dates::year_end;
use chrono::NaiveDate;

/// First simulated year.
pub const HISTORICAL_START: i32 = 1978;

/// Last year with observed pumping and benchmarks.
pub const HISTORICAL_END: i32 = 2020;

/// A year range iterator that yields December 31st of each year from the
/// first year through the last year (inclusive).
#[derive(Clone, Eq, PartialEq, Copy, Debug)]
pub struct YearEndRange(pub i32, pub i32);

impl YearEndRange {
    /// The canonical comparison grid: 1978-12-31 and the 42 year-ends after it.
    pub fn historical() -> YearEndRange {
        YearEndRange(HISTORICAL_START, HISTORICAL_END)
    }
}

impl Iterator for YearEndRange {
    type Item = NaiveDate;
    fn next(&mut self) -> Option<Self::Item> {
        while self.0 <= self.1 {
            let year = self.0;
            self.0 += 1;
            if let Some(date) = year_end(year) {
                return Some(date);
            }
        }
        None
    }
}
