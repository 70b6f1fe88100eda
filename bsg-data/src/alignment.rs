//! Aligning simulated annual subsidence with surveyed benchmarks and
//! scoring the fit.
//!
//! Both series are joined on the year-end grid 1978..=2020 by calendar
//! year. Cells without a value on one side are zero-filled; a grid row is
//! kept for scoring when at least one side had a value there.

use crate::benchmark::BenchmarkSeries;
use bsg_core::annual::{AnnualSeries, SeriesKind};
use bsg_core::error::Result;
use bsg_core::leveling::LevelingSheet;
use bsg_core::year_range::YearEndRange;
use bsg_utils::stats::{min_max, rmse};
use chrono::{Datelike, NaiveDate};
use log::debug;

/// Model output is in meters, benchmarks in centimeters.
pub const CM_PER_M: f64 = 100.0;

/// One year-end of the comparison grid, in cm/yr.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignedRow {
    pub date: NaiveDate,
    pub simulated: f64,
    pub observed: f64,
    /// The simulated series had a row for this year
    pub sim_real: bool,
    /// The benchmark had a reading for this year
    pub obs_real: bool,
}

impl AlignedRow {
    pub fn is_retained(&self) -> bool {
        self.sim_real || self.obs_real
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlignedSeries {
    pub well_nest: String,
    pub rows: Vec<AlignedRow>,
}

impl AlignedSeries {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows that take part in the metric.
    pub fn retained(&self) -> impl Iterator<Item = &AlignedRow> {
        self.rows.iter().filter(|row| row.is_retained())
    }
}

/// RMSE divided by the observed range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NormalizedRmse {
    Value(f64),
    /// The observed values never vary
    Undefined,
}

impl NormalizedRmse {
    pub fn value(&self) -> Option<f64> {
        match self {
            NormalizedRmse::Value(v) => Some(*v),
            NormalizedRmse::Undefined => None,
        }
    }

    pub fn percent(&self) -> Option<f64> {
        self.value().map(|v| v * 100.0)
    }
}

/// Fit of one well nest, in cm/yr.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metric {
    pub rmse: f64,
    pub normalized: NormalizedRmse,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Alignment {
    pub aligned: AlignedSeries,
    /// `None` when there is nothing to compare against
    pub metric: Option<Metric>,
}

/// Simulated annual rates (cm/yr) on a year-end grid; `None` where the
/// series has no row for the year.
pub fn simulated_on_grid(series: &AnnualSeries, grid: YearEndRange) -> Vec<(NaiveDate, Option<f64>)> {
    grid.map(|date| {
        let value = series
            .record_for_year(date.year())
            .map(|record| record.value(SeriesKind::AnnRate) * CM_PER_M);
        (date, value)
    })
    .collect()
}

/// Join a simulated series and a prepared benchmark on the historical grid.
pub fn align(series: &AnnualSeries, benchmark: &BenchmarkSeries) -> AlignedSeries {
    let rows = simulated_on_grid(series, YearEndRange::historical())
        .into_iter()
        .map(|(date, simulated)| {
            let observed = benchmark.value_for_year(date.year());
            AlignedRow {
                date,
                simulated: simulated.unwrap_or(0.0),
                observed: observed.unwrap_or(0.0),
                sim_real: simulated.is_some(),
                obs_real: observed.is_some(),
            }
        })
        .collect();
    AlignedSeries {
        well_nest: series.well_nest.clone(),
        rows,
    }
}

/// RMSE and normalized RMSE over the retained rows.
pub fn score(aligned: &AlignedSeries) -> Option<Metric> {
    let retained: Vec<&AlignedRow> = aligned.retained().collect();
    let rmse = rmse(retained.iter().map(|row| (row.simulated, row.observed)))?;
    let observed: Vec<f64> = retained.iter().map(|row| row.observed).collect();
    let (lo, hi) = min_max(&observed)?;
    let range = hi - lo;
    let normalized = if range > 0.0 {
        NormalizedRmse::Value(rmse / range)
    } else {
        NormalizedRmse::Undefined
    };
    Some(Metric { rmse, normalized })
}

/// Align one well nest's simulation with its leveling sheet and score it.
///
/// A well nest without a sheet, or whose sheet has no readings up to
/// `year_cutoff`, gets an empty alignment and no metric.
pub fn align_and_score(
    series: &AnnualSeries,
    sheet: Option<&LevelingSheet>,
    year_cutoff: i32,
) -> Result<Alignment> {
    let Some(sheet) = sheet else {
        debug!("{}: no benchmark sheet", series.well_nest);
        return Ok(Alignment::default());
    };
    let benchmark = BenchmarkSeries::prepare(sheet, year_cutoff)?;
    if benchmark.is_empty() {
        debug!("{}: no benchmark readings through {}", series.well_nest, year_cutoff);
        return Ok(Alignment::default());
    }
    let aligned = align(series, &benchmark);
    let metric = score(&aligned);
    Ok(Alignment { aligned, metric })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bsg_core::annual::AnnualRecord;
    use bsg_core::year_range::HISTORICAL_END;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn simulated(rates_m: &[(i32, f64)]) -> AnnualSeries {
        let records = rates_m
            .iter()
            .map(|(year, rate)| AnnualRecord {
                date: d(*year, 12, 31),
                ann_rate: *rate,
                cum_total: 0.0,
            })
            .collect();
        AnnualSeries::new("LCBKK013", records).unwrap()
    }

    /// Sheet whose readings land on `year` after the one-day shift.
    fn sheet(readings_cm: &[(i32, &str)]) -> LevelingSheet {
        let mut csv = String::from("Year,Date,Land (cm)\n");
        for (year, value) in readings_cm {
            csv.push_str(&format!("{},{}-01-01,{}\n", year + 1, year + 1, value));
        }
        LevelingSheet::parse_leveling_csv("LCBKK013_Leveling", &csv).unwrap()
    }

    fn row(year: i32, simulated: f64, observed: f64) -> AlignedRow {
        AlignedRow {
            date: d(year, 12, 31),
            simulated,
            observed,
            sim_real: true,
            obs_real: true,
        }
    }

    #[test]
    fn test_matching_series_score_zero() {
        let series = simulated(&[(1978, 0.0), (1979, 0.01), (1980, 0.01)]);
        let sheet = sheet(&[(1978, "0.0"), (1979, "1.0"), (1980, "1.0")]);
        let alignment = align_and_score(&series, Some(&sheet), HISTORICAL_END).unwrap();
        let metric = alignment.metric.unwrap();
        assert!(metric.rmse.abs() < 1e-12);
        assert_eq!(metric.normalized, NormalizedRmse::Value(metric.rmse));
        assert_eq!(alignment.aligned.rows.len(), 43);
        assert_eq!(alignment.aligned.retained().count(), 3);
    }

    #[test]
    fn test_first_observed_value_is_zero() {
        let series = simulated(&[(1978, 0.02), (1979, 0.03)]);
        let sheet = sheet(&[(1978, "4.5"), (1979, "3.0")]);
        let alignment = align_and_score(&series, Some(&sheet), HISTORICAL_END).unwrap();
        let first = alignment.aligned.retained().next().unwrap();
        assert_eq!(first.observed, 0.0);
        assert!(first.obs_real);
    }

    #[test]
    fn test_all_zero_inputs_have_undefined_normalized_rmse() {
        let series = simulated(&[(1978, 0.0), (1979, 0.0), (1980, 0.0)]);
        let sheet = sheet(&[(1978, "0"), (1979, "0"), (1980, "0")]);
        let metric = align_and_score(&series, Some(&sheet), HISTORICAL_END)
            .unwrap()
            .metric
            .unwrap();
        assert_eq!(metric.rmse, 0.0);
        assert_eq!(metric.normalized, NormalizedRmse::Undefined);
        assert_eq!(metric.normalized.percent(), None);
    }

    #[test]
    fn test_normalized_rmse_uses_observed_range() {
        let aligned = AlignedSeries {
            well_nest: "LCBKK013".to_string(),
            rows: vec![row(1978, 2.0, 0.0), row(1979, 12.0, 10.0), row(1980, 7.0, 5.0)],
        };
        let metric = score(&aligned).unwrap();
        assert_eq!(metric.rmse, 2.0);
        assert_eq!(metric.normalized, NormalizedRmse::Value(0.2));
        assert_eq!(metric.normalized.percent(), Some(20.0));
    }

    #[test]
    fn test_one_sided_rows_are_zero_filled_and_kept() {
        // simulation covers 1978..1980, the benchmark only 1978..1979
        let series = simulated(&[(1978, 0.0), (1979, 0.01), (1980, 0.02)]);
        let sheet = sheet(&[(1978, "0"), (1979, "1.0")]);
        let alignment = align_and_score(&series, Some(&sheet), HISTORICAL_END).unwrap();
        let retained: Vec<&AlignedRow> = alignment.aligned.retained().collect();
        assert_eq!(retained.len(), 3);
        assert!(!retained[2].obs_real);
        assert_eq!(retained[2].observed, 0.0);
        // only 1980 differs, by 2 cm: sqrt(4 / 3)
        let metric = alignment.metric.unwrap();
        assert!((metric.rmse - (4.0f64 / 3.0).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_nan_reading_is_zero_filled() {
        let series = simulated(&[(1978, 0.0), (1979, 0.01), (1980, 0.01)]);
        let sheet = sheet(&[(1978, "0"), (1979, "NaN"), (1980, "1.0")]);
        let alignment = align_and_score(&series, Some(&sheet), HISTORICAL_END).unwrap();
        assert!(alignment.aligned.rows.iter().all(|row| row.observed.is_finite()));
        let metric = alignment.metric.unwrap();
        assert!((metric.rmse - (1.0f64 / 3.0).sqrt()).abs() < 1e-9);
        assert!(matches!(metric.normalized, NormalizedRmse::Value(_)));
    }

    #[test]
    fn test_missing_sheet_yields_no_metric() {
        let series = simulated(&[(1978, 0.01)]);
        let alignment = align_and_score(&series, None, HISTORICAL_END).unwrap();
        assert!(alignment.aligned.is_empty());
        assert!(alignment.metric.is_none());
    }

    #[test]
    fn test_cutoff_before_readings_yields_no_metric() {
        let series = simulated(&[(1990, 0.01)]);
        let sheet = sheet(&[(1995, "0"), (1996, "1.0")]);
        let alignment = align_and_score(&series, Some(&sheet), 1990).unwrap();
        assert!(alignment.metric.is_none());
    }

    #[test]
    fn test_ambiguous_marker_is_an_error() {
        let csv = "Year,Date,Land A,Land B\n1979,1979-01-01,0,0\n";
        let sheet = LevelingSheet::parse_leveling_csv("X_Leveling", csv).unwrap();
        let series = simulated(&[(1978, 0.0)]);
        assert!(align_and_score(&series, Some(&sheet), HISTORICAL_END).is_err());
    }

    #[test]
    fn test_simulated_on_grid_marks_missing_years() {
        let series = simulated(&[(1978, 0.01), (1980, 0.03)]);
        let grid = simulated_on_grid(&series, YearEndRange(1978, 1980));
        assert_eq!(grid[0], (d(1978, 12, 31), Some(1.0)));
        assert_eq!(grid[1], (d(1979, 12, 31), None));
        assert_eq!(grid[2].1, Some(3.0));
    }
}
