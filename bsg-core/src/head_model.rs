//! Accessor contract for calibrated groundwater head models.
//!
//! The time series models are built elsewhere; figures only need the
//! observed heads, the simulated heads, the step response of the pumping
//! stress and the stress itself. `SeriesHeadModel` serves those from CSV
//! exports of a calibrated model.

use crate::error::{Result, SubsidenceError};
use bsg_utils::dates::{parse_sheet_date, parse_window_bound};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use std::path::Path;

/// Warm-up applied before the simulation window (30 years of days).
pub const DEFAULT_WARMUP_DAYS: i64 = 365 * 30;

/// A dated value.
pub type DatedValue = (NaiveDate, f64);

/// Inclusive time window given as `tmin`/`tmax` strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeWindow {
    pub tmin: String,
    pub tmax: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TimeWindow {
    pub fn parse(tmin: &str, tmax: &str) -> anyhow::Result<TimeWindow> {
        let start = parse_window_bound(tmin, false)?;
        let end = parse_window_bound(tmax, true)?;
        if start > end {
            anyhow::bail!("time window {}..{} is reversed", tmin, tmax);
        }
        Ok(TimeWindow {
            tmin: tmin.to_string(),
            tmax: tmax.to_string(),
            start,
            end,
        })
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.start <= *date && *date <= self.end
    }

    /// Smallest window covering both.
    pub fn union(&self, other: &TimeWindow) -> TimeWindow {
        let (tmin, start) = if other.start < self.start {
            (other.tmin.clone(), other.start)
        } else {
            (self.tmin.clone(), self.start)
        };
        let (tmax, end) = if other.end > self.end {
            (other.tmax.clone(), other.end)
        } else {
            (self.tmax.clone(), self.end)
        };
        TimeWindow {
            tmin,
            tmax,
            start,
            end,
        }
    }
}

/// What a figure needs from a calibrated head model of one well.
pub trait HeadModel {
    /// Observations used in calibration within the window.
    fn observations(&self, window: &TimeWindow) -> Vec<DatedValue>;

    /// Every observation of the well, used in calibration or not.
    fn all_observations(&self) -> Vec<DatedValue>;

    /// Simulated heads within the window, after `warmup_days` of warm-up.
    fn simulate(&self, window: &TimeWindow, warmup_days: i64) -> Vec<DatedValue>;

    /// Step response to a unit pumping stress, as (days, head change).
    fn step_response(&self) -> Vec<(f64, f64)>;

    /// Pumping stress within the window.
    fn stress(&self, window: &TimeWindow) -> Vec<DatedValue>;
}

/// A head model replayed from CSV exports:
/// `<well>_obs.csv` (`date,head[,used]`), `<well>_sim.csv` (`date,head`),
/// `<well>_step.csv` (`day,response`), `<well>_stress.csv` (`date,rate`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesHeadModel {
    pub well: String,
    /// (date, head, used in calibration)
    pub observed: Vec<(NaiveDate, f64, bool)>,
    pub simulated: Vec<DatedValue>,
    pub step: Vec<(f64, f64)>,
    pub stress: Vec<DatedValue>,
}

impl SeriesHeadModel {
    pub fn load<P: AsRef<Path>>(dir: P, well: &str) -> Result<SeriesHeadModel> {
        let dir = dir.as_ref();
        let read = |suffix: &str| std::fs::read_to_string(dir.join(format!("{}_{}.csv", well, suffix)));
        let observed = parse_observed_csv(well, &read("obs")?)?;
        let simulated = parse_dated_csv(well, &read("sim")?)?;
        let step = parse_pairs_csv(well, &read("step")?)?;
        let stress = parse_dated_csv(well, &read("stress")?)?;
        Ok(SeriesHeadModel {
            well: well.to_string(),
            observed,
            simulated,
            step,
            stress,
        })
    }
}

fn within(series: &[DatedValue], window: &TimeWindow) -> Vec<DatedValue> {
    series
        .iter()
        .filter(|(date, _)| window.contains(date))
        .copied()
        .collect()
}

impl HeadModel for SeriesHeadModel {
    fn observations(&self, window: &TimeWindow) -> Vec<DatedValue> {
        self.observed
            .iter()
            .filter(|(date, _, used)| *used && window.contains(date))
            .map(|(date, head, _)| (*date, *head))
            .collect()
    }

    fn all_observations(&self) -> Vec<DatedValue> {
        self.observed
            .iter()
            .map(|(date, head, _)| (*date, *head))
            .collect()
    }

    fn simulate(&self, window: &TimeWindow, _warmup_days: i64) -> Vec<DatedValue> {
        // exports are written after the warm-up period
        within(&self.simulated, window)
    }

    fn step_response(&self) -> Vec<(f64, f64)> {
        self.step.clone()
    }

    fn stress(&self, window: &TimeWindow) -> Vec<DatedValue> {
        within(&self.stress, window)
    }
}

fn reader(csv_object: &str) -> csv::Reader<&[u8]> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(csv_object.as_bytes())
}

fn number(well: &str, cell: Option<&str>) -> Result<f64> {
    let text = cell.unwrap_or_default();
    text.parse::<f64>()
        .map_err(|_| SubsidenceError::InvalidFormat(format!("{}: {:?} is not a number", well, text)))
}

fn date(well: &str, cell: Option<&str>) -> Result<NaiveDate> {
    parse_sheet_date(cell.unwrap_or_default())
        .map_err(|e| SubsidenceError::DateParse(format!("{}: {}", well, e)))
}

fn parse_observed_csv(well: &str, csv_object: &str) -> Result<Vec<(NaiveDate, f64, bool)>> {
    let mut rows = Vec::new();
    for row in reader(csv_object).records() {
        let record = row?;
        let used = !matches!(
            record.get(2).map(|s| s.to_ascii_lowercase()).as_deref(),
            Some("false" | "0" | "no")
        );
        rows.push((date(well, record.get(0))?, number(well, record.get(1))?, used));
    }
    rows.sort_by_key(|row| row.0);
    Ok(rows)
}

fn parse_dated_csv(well: &str, csv_object: &str) -> Result<Vec<DatedValue>> {
    let mut rows = Vec::new();
    for row in reader(csv_object).records() {
        let record = row?;
        rows.push((date(well, record.get(0))?, number(well, record.get(1))?));
    }
    rows.sort_by_key(|row| row.0);
    Ok(rows)
}

fn parse_pairs_csv(well: &str, csv_object: &str) -> Result<Vec<(f64, f64)>> {
    let mut rows = Vec::new();
    for row in reader(csv_object).records() {
        let record = row?;
        rows.push((number(well, record.get(0))?, number(well, record.get(1))?));
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_time_window_parse_and_union() {
        let a = TimeWindow::parse("1978", "2015").unwrap();
        let b = TimeWindow::parse("1990", "2020").unwrap();
        assert_eq!(a.start, d(1978, 1, 1));
        assert_eq!(b.end, d(2020, 12, 31));
        let both = a.union(&b);
        assert_eq!((both.tmin.as_str(), both.tmax.as_str()), ("1978", "2020"));
        assert!(TimeWindow::parse("2020", "1978").is_err());
    }

    #[test]
    fn test_observed_csv_used_flag() {
        let csv = "date,head,used\n2001-01-01,-20.5,true\n2000-01-01,-21.0,false\n2002-01-01,-19.0,\n";
        let rows = parse_observed_csv("BK_1", csv).unwrap();
        assert_eq!(rows[0], (d(2000, 1, 1), -21.0, false));
        assert!(rows[1].2);
        assert!(rows[2].2);
    }

    #[test]
    fn test_series_model_filters_by_window() {
        let model = SeriesHeadModel {
            well: "BK_1".to_string(),
            observed: vec![
                (d(1999, 6, 1), -1.0, true),
                (d(2001, 6, 1), -2.0, true),
                (d(2002, 6, 1), -3.0, false),
            ],
            simulated: vec![(d(1999, 6, 1), -1.1), (d(2001, 6, 1), -2.1)],
            step: vec![(0.0, 0.0), (10.0, -0.5)],
            stress: vec![(d(1999, 6, 1), 100.0), (d(2001, 6, 1), 120.0)],
        };
        let window = TimeWindow::parse("2000", "2005").unwrap();
        assert_eq!(model.observations(&window), vec![(d(2001, 6, 1), -2.0)]);
        assert_eq!(model.all_observations().len(), 3);
        assert_eq!(model.simulate(&window, DEFAULT_WARMUP_DAYS).len(), 1);
        assert_eq!(model.stress(&window), vec![(d(2001, 6, 1), 120.0)]);
        assert_eq!(model.step_response().len(), 2);
    }
}
