//! Head model series prepared for the groundwater panels.

use bsg_core::head_model::{DatedValue, HeadModel, TimeWindow, DEFAULT_WARMUP_DAYS};
use bsg_utils::dates::decimal_year;
use bsg_utils::stats::rmse;
use std::collections::HashMap;

/// Series of one well ready to plot, in decimal years and meters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HeadSeries {
    pub observed: Vec<(f64, f64)>,
    pub unused: Vec<(f64, f64)>,
    pub simulated: Vec<(f64, f64)>,
    /// RMSE of the simulation at the used observation dates
    pub rmse: Option<f64>,
    pub step: Vec<(f64, f64)>,
}

pub fn decimal_points(series: &[DatedValue]) -> Vec<(f64, f64)> {
    series
        .iter()
        .map(|(date, value)| (decimal_year(date), *value))
        .collect()
}

/// RMSE of simulated heads against observations on the same dates.
/// Observations without a simulated value that day are skipped.
pub fn head_rmse(simulated: &[DatedValue], observed: &[DatedValue]) -> Option<f64> {
    let by_date: HashMap<_, _> = simulated.iter().copied().collect();
    rmse(
        observed
            .iter()
            .filter_map(|(date, obs)| by_date.get(date).map(|sim| (*sim, *obs))),
    )
}

/// Collect everything the panel of one well shows. Observations outside
/// calibration, or outside the window, are returned as unused.
pub fn head_series<M: HeadModel>(model: &M, window: &TimeWindow) -> HeadSeries {
    let used = model.observations(window);
    let unused: Vec<DatedValue> = model
        .all_observations()
        .into_iter()
        .filter(|observation| !used.contains(observation))
        .collect();
    let simulated = model.simulate(window, DEFAULT_WARMUP_DAYS);
    HeadSeries {
        rmse: head_rmse(&simulated, &used),
        observed: decimal_points(&used),
        unused: decimal_points(&unused),
        simulated: decimal_points(&simulated),
        step: model.step_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bsg_core::head_model::SeriesHeadModel;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_head_rmse_matches_dates() {
        let simulated = vec![(d(2000, 1, 1), -10.0), (d(2001, 1, 1), -12.0)];
        let observed = vec![
            (d(2000, 1, 1), -11.0),
            (d(2001, 1, 1), -13.0),
            (d(2003, 1, 1), -50.0),
        ];
        assert!((head_rmse(&simulated, &observed).unwrap() - 1.0).abs() < 1e-12);
        assert!(head_rmse(&simulated, &[]).is_none());
    }

    #[test]
    fn test_head_series_splits_observations() {
        let model = SeriesHeadModel {
            well: "BK_13".to_string(),
            observed: vec![
                (d(1999, 1, 1), -1.0, true),
                (d(2001, 1, 1), -2.0, true),
                (d(2002, 1, 1), -3.0, false),
            ],
            simulated: vec![(d(2001, 1, 1), -2.5), (d(2002, 1, 1), -3.5)],
            step: vec![(0.0, 0.0)],
            stress: Vec::new(),
        };
        let window = TimeWindow::parse("2000", "2005").unwrap();
        let series = head_series(&model, &window);
        assert_eq!(series.observed, vec![(2001.0, -2.0)]);
        assert_eq!(series.unused.len(), 2);
        assert_eq!(series.simulated.len(), 2);
        assert!((series.rmse.unwrap() - 0.5).abs() < 1e-12);
    }
}
