//! Metrics over pumping scenario and sensitivity runs.

use bsg_core::annual::{AnnualSeries, SeriesKind};
use bsg_core::error::{Result, SubsidenceError};
use bsg_core::scenario::PumpingScenario;
use bsg_utils::stats::Summary;
use chrono::NaiveDate;

/// Rows of a no-pumping run that were driven by observed pumping
/// (1978 through 2021).
pub const OBSERVED_PUMPING_ROWS: usize = 44;

/// Cumulative subsidence in cm, positive downward.
pub fn cumulative_cm(series: &AnnualSeries) -> Vec<(NaiveDate, f64)> {
    series
        .points(SeriesKind::CumulativeSum)
        .into_iter()
        .map(|(date, value)| (date, value * -100.0))
        .collect()
}

/// Subsidence rate of the last simulated year in mm/yr, positive downward.
pub fn terminal_rate_mm(series: &AnnualSeries) -> Result<f64> {
    match series.records.as_slice() {
        [.., before, last] => Ok((last.cum_total - before.cum_total) * -1000.0),
        _ => Err(SubsidenceError::ShortSeries {
            series: series.well_nest.clone(),
            needed: 2,
            found: series.len(),
        }),
    }
}

/// Annual subsidence rate of one year in mm/yr, positive downward.
pub fn annual_rate_mm(series: &AnnualSeries, year: i32) -> Result<f64> {
    Ok(series.value_for_year(year, SeriesKind::AnnRate)? * -1000.0)
}

/// Cumulative subsidence in cm accrued from `tmin` up to the last simulated
/// year before `tmax`.
pub fn cumulative_change_cm(series: &AnnualSeries, tmin: i32, tmax: i32) -> Result<f64> {
    let last_year = series
        .records
        .iter()
        .map(|record| record.year())
        .filter(|year| *year < tmax)
        .max()
        .ok_or_else(|| SubsidenceError::MissingYear {
            series: series.well_nest.clone(),
            year: tmax - 1,
        })?;
    let end = series.value_for_year(last_year, SeriesKind::CumulativeSum)?;
    let start = series.value_for_year(tmin, SeriesKind::CumulativeSum)?;
    Ok((end - start) * -100.0)
}

/// Legend label of the `index`-th sensitivity run: 50%, 60%, ...
pub fn sensitivity_label(index: usize) -> String {
    format!("{}%", 50 + 10 * index)
}

/// Terminal-year rates collected per scenario across well nests.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioRates(Vec<(PumpingScenario, Vec<f64>)>);

impl Default for ScenarioRates {
    fn default() -> Self {
        ScenarioRates(
            PumpingScenario::ALL
                .iter()
                .map(|scenario| (*scenario, Vec::new()))
                .collect(),
        )
    }
}

impl ScenarioRates {
    pub fn push(&mut self, scenario: PumpingScenario, rate: f64) {
        if let Some((_, rates)) = self.0.iter_mut().find(|(s, _)| *s == scenario) {
            rates.push(rate);
        }
    }

    pub fn rates(&self, scenario: PumpingScenario) -> &[f64] {
        self.0
            .iter()
            .find(|(s, _)| *s == scenario)
            .map(|(_, rates)| rates.as_slice())
            .unwrap_or_default()
    }

    /// min / mean / max / median per scenario, in scenario order. Scenarios
    /// without rates are skipped.
    pub fn summaries(&self) -> Vec<(PumpingScenario, Summary)> {
        self.0
            .iter()
            .filter_map(|(scenario, rates)| Summary::of(rates).map(|summary| (*scenario, summary)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bsg_core::annual::AnnualRecord;

    fn series(cum_m: &[(i32, f64)]) -> AnnualSeries {
        let records = cum_m
            .iter()
            .map(|(year, cum)| AnnualRecord {
                date: NaiveDate::from_ymd_opt(*year, 12, 31).unwrap(),
                ann_rate: -0.01,
                cum_total: *cum,
            })
            .collect();
        AnnualSeries::new("LCBKK013", records).unwrap()
    }

    #[test]
    fn test_terminal_rate() {
        let s = series(&[(2058, -0.50), (2059, -0.52), (2060, -0.525)]);
        assert!((terminal_rate_mm(&s).unwrap() - 5.0).abs() < 1e-9);
        let short = series(&[(2060, -0.5)]);
        assert!(matches!(
            terminal_rate_mm(&short),
            Err(SubsidenceError::ShortSeries { found: 1, .. })
        ));
    }

    #[test]
    fn test_cumulative_change_uses_last_year_before_tmax() {
        let s = series(&[(2020, -0.10), (2030, -0.20), (2039, -0.30), (2040, -0.90)]);
        // 2039 is the last year below 2040
        assert!((cumulative_change_cm(&s, 2020, 2040).unwrap() - 20.0).abs() < 1e-9);
        assert!(matches!(
            cumulative_change_cm(&s, 2019, 2040),
            Err(SubsidenceError::MissingYear { year: 2019, .. })
        ));
        assert!(cumulative_change_cm(&s, 2020, 2000).is_err());
    }

    #[test]
    fn test_annual_rate_and_cumulative_cm() {
        let s = series(&[(1990, -0.1), (2000, -0.3)]);
        assert!((annual_rate_mm(&s, 1990).unwrap() - 10.0).abs() < 1e-9);
        assert!(annual_rate_mm(&s, 1995).is_err());
        let cm = cumulative_cm(&s);
        assert!((cm[1].1 - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_scenario_summaries() {
        let mut rates = ScenarioRates::default();
        for rate in [3.0, 1.0, 2.0, 6.0] {
            rates.push(PumpingScenario::Pump250, rate);
        }
        rates.push(PumpingScenario::NoPumping, -0.5);
        let summaries = rates.summaries();
        assert_eq!(summaries.len(), 2);
        let (scenario, summary) = summaries[0];
        assert_eq!(scenario, PumpingScenario::Pump250);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.mean, 3.0);
        assert_eq!(summary.max, 6.0);
        assert_eq!(summary.median, 2.5);
        assert_eq!(rates.rates(PumpingScenario::Pump1000), &[] as &[f64]);
    }

    #[test]
    fn test_sensitivity_labels() {
        assert_eq!(sensitivity_label(0), "50%");
        assert_eq!(sensitivity_label(5), "100%");
    }
}
