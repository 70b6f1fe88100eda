//! Turning raw leveling rows into one benchmark reading per year.
//!
//! A benchmark surveyed in year `Y` measures the displacement accrued
//! during year `Y - 1`, while a simulated annual rate is stamped with the
//! year it accrues in. Shifting the survey date back by one day moves
//! January readings onto the previous year-end so both line up.

use bsg_core::error::Result;
use bsg_core::leveling::{LevelingSheet, DISPLACEMENT_MARKER};
use chrono::{Datelike, Duration, NaiveDate};
use itertools::Itertools;
use log::debug;

/// A benchmark reading after the date shift, in cm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchmarkPoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl BenchmarkPoint {
    pub fn year(&self) -> i32 {
        self.date.year()
    }
}

/// Observed displacement per calendar year, ordered by date. The first
/// value is always zero.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BenchmarkSeries {
    pub sheet: String,
    pub points: Vec<BenchmarkPoint>,
}

impl BenchmarkSeries {
    /// Prepare a sheet: keep rows of `year <= year_cutoff`, read the marker
    /// column, zero-fill gaps, zero the first reading, shift dates back one
    /// day and keep the last reading of every calendar year.
    pub fn prepare(sheet: &LevelingSheet, year_cutoff: i32) -> Result<BenchmarkSeries> {
        let column = sheet.marker_column(DISPLACEMENT_MARKER)?;
        let mut points: Vec<BenchmarkPoint> = sheet
            .rows
            .iter()
            .filter(|row| row.year <= year_cutoff)
            .map(|row| BenchmarkPoint {
                date: row.date,
                value: row.cells.get(column).copied().flatten().unwrap_or(0.0),
            })
            .collect();
        if let Some(first) = points.first_mut() {
            first.value = 0.0;
        }
        for point in points.iter_mut() {
            point.date -= Duration::days(1);
        }
        let points = last_per_year(&points);
        debug!(
            "benchmark {}: {} yearly readings through {}",
            sheet.name,
            points.len(),
            year_cutoff
        );
        Ok(BenchmarkSeries {
            sheet: sheet.name.clone(),
            points,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn value_for_year(&self, year: i32) -> Option<f64> {
        self.points
            .iter()
            .find(|point| point.year() == year)
            .map(|point| point.value)
    }
}

/// The chronologically last point of every calendar year, in year order.
pub fn last_per_year(points: &[BenchmarkPoint]) -> Vec<BenchmarkPoint> {
    points
        .iter()
        .into_group_map_by(|point| point.year())
        .into_iter()
        .filter_map(|(_, group)| group.into_iter().max_by_key(|point| point.date).copied())
        .sorted_by_key(|point| point.date)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn sheet(csv: &str) -> LevelingSheet {
        LevelingSheet::parse_leveling_csv("LCBKK013_Leveling", csv).unwrap()
    }

    #[test]
    fn test_first_value_is_zeroed_and_dates_shift() {
        let csv = "Year,Date,Land (cm)\n1979,1979-01-01,3.5\n1980,1980-01-01,1.0\n1981,1981-01-01,2.0\n";
        let bench = BenchmarkSeries::prepare(&sheet(csv), 2020).unwrap();
        assert_eq!(bench.points[0].value, 0.0);
        assert_eq!(bench.points[0].date, d(1978, 12, 31));
        assert_eq!(bench.value_for_year(1979), Some(1.0));
        assert_eq!(bench.value_for_year(1980), Some(2.0));
    }

    #[test]
    fn test_cutoff_gaps_and_last_reading_per_year() {
        let csv = "Year,Date,Land (cm)
1979,1979-01-01,0
1980,1980-03-01,
1980,1980-09-01,1.5
2021,2021-06-01,9.0
";
        let bench = BenchmarkSeries::prepare(&sheet(csv), 2020).unwrap();
        assert_eq!(bench.len(), 2);
        assert_eq!(bench.value_for_year(1980), Some(1.5));
        assert_eq!(bench.value_for_year(2021), None);
    }

    #[test]
    fn test_marker_column_is_required() {
        let csv = "Year,Date,Elevation\n1979,1979-01-01,0\n";
        assert!(BenchmarkSeries::prepare(&sheet(csv), 2020).is_err());
    }

    #[test]
    fn test_last_per_year_keeps_yearly_series_unchanged() {
        let points: Vec<BenchmarkPoint> = (1978..1990)
            .map(|year| BenchmarkPoint {
                date: d(year, 12, 31),
                value: year as f64 * 0.1,
            })
            .collect();
        assert_eq!(last_per_year(&points), points);
    }
}
