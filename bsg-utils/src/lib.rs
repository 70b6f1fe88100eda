//! Shared utility functions for BSG crates.

/// Date utility functions
pub mod dates {
    use anyhow::{anyhow, Context};
    use chrono::{Datelike, NaiveDate, NaiveDateTime};

    /// Date formats accepted in leveling sheets and model exports,
    /// tried in order.
    const SHEET_DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%Y%m%d", "%d.%m.%Y"];

    /// Datetime formats accepted when a sheet export carries a time part.
    const SHEET_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%m/%d/%Y %H:%M"];

    /// Parse a date cell exported from a spreadsheet. Accepts plain dates in
    /// several layouts and datetimes whose time part is discarded.
    pub fn parse_sheet_date(s: &str) -> anyhow::Result<NaiveDate> {
        let trimmed = s.trim();
        for format in SHEET_DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
                return Ok(date);
            }
        }
        for format in SHEET_DATETIME_FORMATS {
            if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Ok(datetime.date());
            }
        }
        Err(anyhow!("unrecognized date: {:?}", s))
    }

    /// December 31st of `year`.
    pub fn year_end(year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, 12, 31)
    }

    /// Parse the year of a time window bound ("2020" or "2020-06-30").
    pub fn window_year(s: &str) -> anyhow::Result<i32> {
        let head = s.trim().split('-').next().unwrap_or_default();
        head.parse::<i32>()
            .with_context(|| format!("time window bound {:?} does not start with a year", s))
    }

    /// Parse a time window bound. A bare year resolves to January 1st for
    /// the lower bound and December 31st for the upper bound.
    pub fn parse_window_bound(s: &str, upper: bool) -> anyhow::Result<NaiveDate> {
        let trimmed = s.trim();
        if trimmed.len() == 4 {
            let year = window_year(trimmed)?;
            let (month, day) = if upper { (12, 31) } else { (1, 1) };
            return NaiveDate::from_ymd_opt(year, month, day)
                .ok_or_else(|| anyhow!("year out of range: {}", year));
        }
        parse_sheet_date(trimmed)
    }

    /// Fractional year used as a continuous chart axis,
    /// e.g. 2000-07-02 -> ~2000.5
    pub fn decimal_year(date: &NaiveDate) -> f64 {
        let days_in_year = if date.leap_year() { 366.0 } else { 365.0 };
        date.year() as f64 + date.ordinal0() as f64 / days_in_year
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::NaiveDate;

        #[test]
        fn test_parse_sheet_date_layouts() {
            let expected = NaiveDate::from_ymd_opt(1995, 1, 1).unwrap();
            assert_eq!(parse_sheet_date("1995-01-01").unwrap(), expected);
            assert_eq!(parse_sheet_date("1/1/1995").unwrap(), expected);
            assert_eq!(parse_sheet_date("19950101").unwrap(), expected);
            assert_eq!(parse_sheet_date("1995-01-01 00:00:00").unwrap(), expected);
            assert!(parse_sheet_date("first of january").is_err());
        }

        #[test]
        fn test_window_bounds() {
            assert_eq!(
                parse_window_bound("1978", false).unwrap(),
                NaiveDate::from_ymd_opt(1978, 1, 1).unwrap()
            );
            assert_eq!(
                parse_window_bound("2020", true).unwrap(),
                NaiveDate::from_ymd_opt(2020, 12, 31).unwrap()
            );
            assert_eq!(
                parse_window_bound("2015-06-30", true).unwrap(),
                NaiveDate::from_ymd_opt(2015, 6, 30).unwrap()
            );
            assert_eq!(window_year("2015-06-30").unwrap(), 2015);
            assert!(window_year("soon").is_err());
        }

        #[test]
        fn test_decimal_year() {
            let jan1 = NaiveDate::from_ymd_opt(2001, 1, 1).unwrap();
            assert_eq!(decimal_year(&jan1), 2001.0);
            let mid = NaiveDate::from_ymd_opt(2001, 7, 2).unwrap();
            assert!((decimal_year(&mid) - 2001.4986).abs() < 1e-3);
        }

        #[test]
        fn test_year_end() {
            assert_eq!(year_end(2020), NaiveDate::from_ymd_opt(2020, 12, 31));
            assert_eq!(year_end(i32::MAX), None);
        }
    }
}

/// Descriptive statistics over plain f64 slices.
pub mod stats {
    use itertools::{Itertools, MinMaxResult};

    /// Arithmetic mean, `None` for an empty slice.
    pub fn mean(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }

    /// Median (mean of the two middle values for even lengths).
    pub fn median(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        let sorted: Vec<f64> = values.iter().copied().sorted_by(f64::total_cmp).collect();
        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 0 {
            Some((sorted[mid - 1] + sorted[mid]) / 2.0)
        } else {
            Some(sorted[mid])
        }
    }

    /// Smallest and largest value.
    pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
        match values.iter().copied().minmax_by(f64::total_cmp) {
            MinMaxResult::NoElements => None,
            MinMaxResult::OneElement(v) => Some((v, v)),
            MinMaxResult::MinMax(lo, hi) => Some((lo, hi)),
        }
    }

    /// Root-mean-square of the differences between paired values.
    pub fn rmse<I>(pairs: I) -> Option<f64>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let (count, sum_sq) = pairs
            .into_iter()
            .fold((0usize, 0.0f64), |(n, acc), (a, b)| (n + 1, acc + (a - b).powi(2)));
        if count == 0 {
            return None;
        }
        Some((sum_sq / count as f64).sqrt())
    }

    /// min / mean / max / median of a sample.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct Summary {
        pub min: f64,
        pub mean: f64,
        pub max: f64,
        pub median: f64,
    }

    impl Summary {
        pub fn of(values: &[f64]) -> Option<Summary> {
            let (min, max) = min_max(values)?;
            Some(Summary {
                min,
                mean: mean(values)?,
                max,
                median: median(values)?,
            })
        }
    }

}
