//! Groundwater figures: well nest locations, per-aquifer wedge maps and
//! head model panels.

use crate::layout::discover_wells;
use anyhow::Context;
use bsg_core::head_model::{HeadModel, SeriesHeadModel, TimeWindow};
use bsg_core::well_nest::{unique_locations, LocationIndex, WellNest, WellNestLocation, PAPER_WELL_NESTS};
use bsg_data::groups::{group_by_kind, overall_mean, parse_well_values_csv, KindGroup};
use bsg_data::heads::{decimal_points, head_series};
use bsg_render::canvas::DefaultBasemap;
use bsg_render::charts::{GroundwaterChart, MapFigure, WellPanel};
use bsg_render::dispatch::{Mode, Payload, SpatialLayer, WedgeGroup};
use bsg_render::figure::emit;
use bsg_render::style::StyleConfig;
use log::{info, warn};
use std::path::Path;

pub fn run_gw_locs_map(
    locations: Vec<WellNestLocation>,
    basemap: DefaultBasemap,
    save_dir: Option<&Path>,
) -> anyhow::Result<()> {
    let shown = unique_locations(&locations, &PAPER_WELL_NESTS);
    info!("Mapping {} well nest locations", shown.len());
    let points = shown.iter().map(|l| (l.longitude, l.latitude)).collect();
    let labels = shown.iter().map(|l| l.name.clone()).collect();
    let layer = SpatialLayer::new(Mode::GwWellNests, points, Payload::Labels(labels))?;
    let map = MapFigure::new("Map_GWLocs".to_string(), basemap, layer, StyleConfig::forecast());
    emit(&map, save_dir)?;
    Ok(())
}

/// Wedge groups in aquifer order.
pub fn wedge_groups(groups: Vec<KindGroup>) -> Vec<WedgeGroup> {
    groups
        .into_iter()
        .map(|group| WedgeGroup {
            name: group.kind.code().to_string(),
            points: group.points,
            values: group.values,
        })
        .collect()
}

pub fn run_gw_wedge_map(
    mode: Mode,
    values_csv: &str,
    locations: Vec<WellNestLocation>,
    basemap: DefaultBasemap,
    window: &TimeWindow,
    save_dir: Option<&Path>,
) -> anyhow::Result<()> {
    if !matches!(mode, Mode::RmseFull | Mode::StepFull) {
        anyhow::bail!("{} is not a per-aquifer wedge map", mode);
    }
    let contents = std::fs::read_to_string(values_csv).with_context(|| format!("reading {}", values_csv))?;
    let values = parse_well_values_csv(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse well values {}: {}", values_csv, e))?;
    let index = LocationIndex::from(locations);
    let groups = group_by_kind(&values, &index)?;

    for group in &groups {
        if let Some(avg) = group.mean() {
            println!("{}: avg {:.2}", group.kind, avg);
        }
    }
    if let Some(avg) = overall_mean(&groups) {
        println!("Overall: avg {:.2}", avg);
    }

    let layer = SpatialLayer::new(mode, Vec::new(), Payload::Groups(wedge_groups(groups)))?;
    let stem = format!("ALL_{}_{}_{}_maps", mode.name(), window.tmin, window.tmax);
    emit(&MapFigure::new(stem, basemap, layer, StyleConfig::forecast()), save_dir)?;
    Ok(())
}

/// Panels of every well in a well nest, with the stress of the last one.
pub fn groundwater_chart<M: HeadModel>(
    well_nest: &WellNest,
    models: &[M],
    window: &TimeWindow,
) -> GroundwaterChart {
    let panels = well_nest
        .wells_in_panel_order()
        .into_iter()
        .zip(models)
        .map(|((kind, well), model)| {
            let series = head_series(model, window);
            if let Some(rmse) = series.rmse {
                info!("{}: head RMSE {:.2} m", well, rmse);
            }
            WellPanel {
                kind,
                well: well.to_string(),
                observed: series.observed,
                unused: series.unused,
                simulated: series.simulated,
                rmse: series.rmse,
                step: series.step,
            }
        })
        .collect();
    let stress = models
        .last()
        .map(|model| decimal_points(&model.stress(window)))
        .unwrap_or_default();
    GroundwaterChart {
        well_nest: well_nest.name().to_string(),
        tmin: window.tmin.clone(),
        tmax: window.tmax.clone(),
        panels,
        stress,
        style: StyleConfig::groundwater(),
    }
}

fn gw_for_nest(
    gw_dir: &Path,
    index: &LocationIndex,
    well_nest: &str,
    window: &TimeWindow,
    save_dir: Option<&Path>,
) -> anyhow::Result<()> {
    let dir = gw_dir.join(well_nest);
    let nest = WellNest::new(index.get(well_nest)?.clone(), discover_wells(&dir)?)?;
    let models = nest
        .wells_in_panel_order()
        .into_iter()
        .map(|(_, well)| SeriesHeadModel::load(&dir, well))
        .collect::<Result<Vec<_>, _>>()?;
    emit(&groundwater_chart(&nest, &models, window), save_dir)?;
    Ok(())
}

pub fn run_gw_results(
    gw_dir: &Path,
    locations: Vec<WellNestLocation>,
    well_nests: &[String],
    window: &TimeWindow,
    save_dir: Option<&Path>,
) -> anyhow::Result<()> {
    let index = LocationIndex::from(locations);
    for well_nest in well_nests {
        if let Err(e) = gw_for_nest(gw_dir, &index, well_nest, window, save_dir) {
            warn!("{}: skipped: {:#}", well_nest, e);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bsg_core::well_nest::WellKind;
    use chrono::NaiveDate;

    fn d(y: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, 1, 1).unwrap()
    }

    fn model(well: &str, stress: f64) -> SeriesHeadModel {
        SeriesHeadModel {
            well: well.to_string(),
            observed: vec![(d(2000), -10.0, true)],
            simulated: vec![(d(2000), -11.0)],
            step: vec![(0.0, 0.0), (100.0, -0.1)],
            stress: vec![(d(2000), stress)],
        }
    }

    #[test]
    fn test_wedge_groups_keep_aquifer_order() {
        let groups = WellKind::ALL
            .iter()
            .map(|kind| KindGroup {
                kind: *kind,
                points: vec![(100.5, 13.7)],
                values: vec![1.0],
            })
            .collect();
        let names: Vec<String> = wedge_groups(groups).into_iter().map(|g| g.name).collect();
        assert_eq!(names, vec!["BK", "PD", "NL", "NB"]);
    }

    #[test]
    fn test_groundwater_chart_orders_panels() {
        let location = WellNestLocation {
            name: "LCBKK013".to_string(),
            longitude: 100.5,
            latitude: 13.7,
        };
        let nest = WellNest::new(location, vec!["PD_13".to_string(), "BK_13".to_string()]).unwrap();
        let models = vec![model("BK_13", 1.0e6), model("PD_13", 2.0e6)];
        let window = TimeWindow::parse("1978", "2020").unwrap();
        let chart = groundwater_chart(&nest, &models, &window);
        assert_eq!(chart.panels[0].kind, WellKind::Bk);
        assert_eq!(chart.panels[1].well, "PD_13");
        assert_eq!(chart.panels[0].rmse, Some(1.0));
        assert_eq!(chart.stress, vec![(2000.0, 2.0e6)]);
    }

    #[test]
    fn test_wedge_map_rejects_other_modes() {
        let window = TimeWindow::parse("1978", "2020").unwrap();
        let result = run_gw_wedge_map(
            Mode::SubRmse,
            "unused.csv",
            Vec::new(),
            DefaultBasemap::default(),
            &window,
            None,
        );
        assert!(result.is_err());
    }
}
