//! Subsidence figures: annual bars, RMSE maps, forecasts and sensitivity
//! sweeps.

use crate::layout::{load_series, ResultsDir};
use bsg_core::annual::AnnualSeries;
use bsg_core::head_model::TimeWindow;
use bsg_core::leveling::LevelingBook;
use bsg_core::scenario::{PumpingScenario, SensitivityParameter};
use bsg_core::well_nest::{LocationIndex, WellNestLocation};
use bsg_core::year_range::YearEndRange;
use bsg_data::alignment::{align_and_score, simulated_on_grid, Alignment};
use bsg_data::forecast::{
    annual_rate_mm, cumulative_cm, cumulative_change_cm, sensitivity_label, terminal_rate_mm,
    ScenarioRates, OBSERVED_PUMPING_ROWS,
};
use bsg_render::canvas::DefaultBasemap;
use bsg_render::charts::{
    AnnualBarChart, ForecastChart, MapFigure, RateMarker, ScenarioLine, SensitivityChart, SensitivityRun,
};
use bsg_render::dispatch::{Mode, Payload, SpatialLayer, WedgeGroup};
use bsg_render::figure::emit;
use bsg_render::style::StyleConfig;
use bsg_utils::dates::{decimal_year, window_year};
use bsg_utils::stats::{mean, min_max};
use chrono::{Datelike, NaiveDate};
use log::{info, warn};
use std::path::Path;

/// Years of the no-pumping run marked with their annual rate.
const MARKED_YEARS: [i32; 2] = [1990, 2000];

fn decimal(points: Vec<(NaiveDate, f64)>) -> Vec<(f64, f64)> {
    points
        .into_iter()
        .map(|(date, value)| (decimal_year(&date), value))
        .collect()
}

fn align_nest(results: &ResultsDir, book: &LevelingBook, well_nest: &str, cutoff: i32) -> anyhow::Result<(AnnualSeries, Alignment)> {
    let series = load_series(&results.historical(well_nest), well_nest)?;
    let sheet = book.load(well_nest)?;
    let alignment = align_and_score(&series, sheet.as_ref(), cutoff)?;
    Ok((series, alignment))
}

/// The bar chart of one well nest; surveyed bars only with a benchmark.
pub fn bar_chart(series: &AnnualSeries, alignment: &Alignment) -> AnnualBarChart {
    let simulated = simulated_on_grid(series, YearEndRange::historical())
        .into_iter()
        .filter_map(|(date, rate)| rate.map(|rate| (date.year(), -rate)))
        .collect();
    let observed = (!alignment.aligned.is_empty()).then(|| {
        alignment
            .aligned
            .rows
            .iter()
            .filter(|row| row.obs_real)
            .map(|row| (row.date.year(), -row.observed))
            .collect()
    });
    AnnualBarChart {
        well_nest: series.well_nest.clone(),
        simulated,
        observed,
        rmse: alignment.metric.map(|metric| metric.rmse),
        style: StyleConfig::bar(),
    }
}

pub fn run_sub_bar(
    results: &ResultsDir,
    book: &LevelingBook,
    well_nests: &[String],
    window: &TimeWindow,
    save_dir: Option<&Path>,
) -> anyhow::Result<()> {
    let cutoff = window_year(&window.tmax)?;
    for well_nest in well_nests {
        let outcome = align_nest(results, book, well_nest, cutoff)
            .and_then(|(series, alignment)| emit(&bar_chart(&series, &alignment), save_dir));
        if let Err(e) = outcome {
            warn!("{}: skipped: {:#}", well_nest, e);
        }
    }
    Ok(())
}

/// Fit of every well nest that has one, with its location.
#[derive(Debug, Default)]
struct RmseCollection {
    rmse_points: Vec<(f64, f64)>,
    rmse: Vec<f64>,
    percent_points: Vec<(f64, f64)>,
    percent: Vec<f64>,
}

pub fn run_sub_rmse_map(
    results: &ResultsDir,
    book: &LevelingBook,
    locations: Vec<WellNestLocation>,
    well_nests: &[String],
    basemap: DefaultBasemap,
    window: &TimeWindow,
    save_dir: Option<&Path>,
) -> anyhow::Result<()> {
    let cutoff = window_year(&window.tmax)?;
    let index = LocationIndex::from(locations);
    let mut collected = RmseCollection::default();
    for well_nest in well_nests {
        let fit = index
            .get(well_nest)
            .map_err(anyhow::Error::from)
            .and_then(|location| {
                let (_, alignment) = align_nest(results, book, well_nest, cutoff)?;
                Ok((location, alignment.metric))
            });
        match fit {
            Ok((location, Some(metric))) => {
                let point = (location.longitude, location.latitude);
                collected.rmse_points.push(point);
                collected.rmse.push(metric.rmse);
                match metric.normalized.percent() {
                    Some(percent) => {
                        collected.percent_points.push(point);
                        collected.percent.push(percent);
                    }
                    None => warn!("{}: observed range is zero, normalized RMSE undefined", well_nest),
                }
            }
            Ok((_, None)) => info!("{}: no benchmark, no metric", well_nest),
            Err(e) => warn!("{}: skipped: {:#}", well_nest, e),
        }
    }
    if collected.rmse.is_empty() {
        anyhow::bail!("no well nest has a benchmark to score against");
    }

    if let (Some(avg), Some((_, max))) = (mean(&collected.rmse), min_max(&collected.rmse)) {
        println!("Avg: {:.2} cm/yr", avg);
        println!("Max: {:.2} cm/yr", max);
    }
    if let Some(avg) = mean(&collected.percent) {
        println!("Avg NormRMSE: {:.2}%", avg);
    }

    let style = StyleConfig::forecast();
    let rmse_layer = SpatialLayer::new(Mode::SubRmse, collected.rmse_points, Payload::Scalars(collected.rmse))?;
    let stem = format!("Map_Sub_RMSE_{}_{}_50_2020", window.tmin, window.tmax);
    emit(&MapFigure::new(stem, basemap.clone(), rmse_layer, style), save_dir)?;

    let percent_layer = SpatialLayer::new(
        Mode::SubRmsePercent,
        collected.percent_points,
        Payload::Scalars(collected.percent),
    )?;
    let stem = format!("Map_Sub_RMSEPerc_{}_{}_50_2020", window.tmin, window.tmax);
    emit(&MapFigure::new(stem, basemap, percent_layer, style), save_dir)?;
    Ok(())
}

/// Forecast chart of one well nest and the terminal rate of each scenario.
pub fn forecast_chart(runs: &[(PumpingScenario, AnnualSeries)], well_nest: &str) -> anyhow::Result<ForecastChart> {
    let mut scenarios = Vec::with_capacity(runs.len());
    for (scenario, series) in runs {
        scenarios.push(ScenarioLine {
            scenario: *scenario,
            points: decimal(cumulative_cm(series)),
            terminal_rate: terminal_rate_mm(series)?,
        });
    }
    let (observed, markers) = match runs.iter().find(|(s, _)| *s == PumpingScenario::NoPumping) {
        Some((_, series)) => {
            let cumulative = cumulative_cm(series);
            let observed = decimal(cumulative.iter().take(OBSERVED_PUMPING_ROWS).copied().collect());
            let mut markers = Vec::new();
            for year in MARKED_YEARS {
                let Some((date, value)) = cumulative.iter().find(|(date, _)| date.year() == year) else {
                    continue;
                };
                markers.push(RateMarker {
                    point: (decimal_year(date), *value),
                    rate: annual_rate_mm(series, year)?,
                });
            }
            (observed, markers)
        }
        None => (Vec::new(), Vec::new()),
    };
    Ok(ForecastChart {
        well_nest: well_nest.to_string(),
        scenarios,
        observed,
        markers,
        style: StyleConfig::forecast(),
    })
}

fn load_scenarios(results: &ResultsDir, well_nest: &str) -> anyhow::Result<Vec<(PumpingScenario, AnnualSeries)>> {
    PumpingScenario::ALL
        .iter()
        .map(|scenario| Ok((*scenario, load_series(&results.scenario(*scenario, well_nest), well_nest)?)))
        .collect()
}

pub fn run_sub_forecast(results: &ResultsDir, well_nests: &[String], save_dir: Option<&Path>) -> anyhow::Result<()> {
    let mut rates = ScenarioRates::default();
    for well_nest in well_nests {
        let outcome = load_scenarios(results, well_nest).and_then(|runs| {
            let chart = forecast_chart(&runs, well_nest)?;
            emit(&chart, save_dir)?;
            Ok(chart)
        });
        match outcome {
            Ok(chart) => {
                for line in &chart.scenarios {
                    rates.push(line.scenario, line.terminal_rate);
                }
            }
            Err(e) => warn!("{}: skipped: {:#}", well_nest, e),
        }
    }
    for (scenario, summary) in rates.summaries() {
        println!(
            "{}: min, avg, max, med = {:.4}, {:.4}, {:.4}, {:.4} mm/yr",
            scenario.label(),
            summary.min,
            summary.mean,
            summary.max,
            summary.median
        );
    }
    Ok(())
}

pub fn run_sub_forecast_map(
    results: &ResultsDir,
    locations: Vec<WellNestLocation>,
    well_nests: &[String],
    basemap: DefaultBasemap,
    window: &TimeWindow,
    save_dir: Option<&Path>,
) -> anyhow::Result<()> {
    let tmin = window_year(&window.tmin)?;
    let tmax = window_year(&window.tmax)?;
    let index = LocationIndex::from(locations);
    let mut groups = Vec::with_capacity(PumpingScenario::ALL.len());
    for scenario in PumpingScenario::ALL {
        let mut group = WedgeGroup {
            name: scenario.slug().to_string(),
            points: Vec::new(),
            values: Vec::new(),
        };
        for well_nest in well_nests {
            let change = index.get(well_nest).map_err(anyhow::Error::from).and_then(|location| {
                let series = load_series(&results.scenario(scenario, well_nest), well_nest)?;
                Ok((location, cumulative_change_cm(&series, tmin, tmax)?))
            });
            match change {
                Ok((location, value)) => {
                    group.points.push((location.longitude, location.latitude));
                    group.values.push(value);
                }
                Err(e) => warn!("{} {}: skipped: {:#}", well_nest, scenario.slug(), e),
            }
        }
        if let Some(avg) = mean(&group.values) {
            println!("{}: avg cumulative subsidence {:.2} cm", scenario.label(), avg);
        }
        groups.push(group);
    }
    let layer = SpatialLayer::new(Mode::SubForecastMap, Vec::new(), Payload::Groups(groups))?;
    let stem = format!("Map_CumSub_{}_{}_ALLPump", window.tmin, window.tmax);
    emit(&MapFigure::new(stem, basemap, layer, StyleConfig::forecast()), save_dir)?;
    Ok(())
}

pub fn sensitivity_chart(
    runs: &[AnnualSeries],
    well_nest: &str,
    parameter: SensitivityParameter,
) -> anyhow::Result<SensitivityChart> {
    let mut lines = Vec::with_capacity(runs.len());
    for (i, series) in runs.iter().enumerate() {
        lines.push(SensitivityRun {
            label: sensitivity_label(i),
            points: decimal(cumulative_cm(series)),
            terminal_rate: terminal_rate_mm(series)?,
        });
    }
    Ok(SensitivityChart {
        well_nest: well_nest.to_string(),
        parameter,
        runs: lines,
        style: StyleConfig::bar(),
    })
}

pub fn run_sens_line(
    results: &ResultsDir,
    parameter: SensitivityParameter,
    well_nests: &[String],
    save_dir: Option<&Path>,
) -> anyhow::Result<()> {
    for well_nest in well_nests {
        let outcome = results
            .sensitivity_runs(parameter, well_nest)
            .iter()
            .map(|path| load_series(path, well_nest))
            .collect::<anyhow::Result<Vec<_>>>()
            .and_then(|runs| {
                if runs.is_empty() {
                    anyhow::bail!("no {} sensitivity runs", parameter.slug());
                }
                emit(&sensitivity_chart(&runs, well_nest, parameter)?, save_dir)
            });
        if let Err(e) = outcome {
            warn!("{}: skipped: {:#}", well_nest, e);
        }
    }
    Ok(())
}
