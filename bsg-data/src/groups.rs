//! Per-well results grouped by aquifer for the wedge maps.

use bsg_core::error::Result;
use bsg_core::well_nest::{LocationIndex, WellKind};
use bsg_utils::stats::mean;
use csv::ReaderBuilder;
use itertools::Itertools;
use serde::Deserialize;

/// One row of a per-well result table (`WellNest_Name,Well_Name,value`),
/// e.g. a normalized head RMSE or a step response duration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WellValue {
    #[serde(rename = "WellNest_Name")]
    pub well_nest: String,
    #[serde(rename = "Well_Name")]
    pub well: String,
    pub value: f64,
}

pub fn parse_well_values_csv(csv_object: &str) -> Result<Vec<WellValue>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(csv_object.as_bytes());
    let mut values = Vec::new();
    for row in rdr.deserialize() {
        values.push(row?);
    }
    Ok(values)
}

/// Values of one aquifer with the location of their well nests.
#[derive(Debug, Clone, PartialEq)]
pub struct KindGroup {
    pub kind: WellKind,
    /// (longitude, latitude)
    pub points: Vec<(f64, f64)>,
    pub values: Vec<f64>,
}

impl KindGroup {
    pub fn mean(&self) -> Option<f64> {
        mean(&self.values)
    }
}

/// Group per-well values into BK, PD, NL, NB order. Every well must name a
/// known aquifer and every well nest must have a location.
pub fn group_by_kind(values: &[WellValue], locations: &LocationIndex) -> Result<Vec<KindGroup>> {
    let mut keyed = Vec::with_capacity(values.len());
    for value in values {
        let kind = WellKind::from_well_name(&value.well)?;
        let location = locations.get(&value.well_nest)?;
        keyed.push((kind, (location.longitude, location.latitude), value.value));
    }
    let mut by_kind = keyed
        .into_iter()
        .into_group_map_by(|(kind, _, _)| *kind);
    Ok(WellKind::ALL
        .iter()
        .map(|kind| {
            let members = by_kind.remove(kind).unwrap_or_default();
            KindGroup {
                kind: *kind,
                points: members.iter().map(|(_, point, _)| *point).collect(),
                values: members.iter().map(|(_, _, value)| *value).collect(),
            }
        })
        .collect())
}

/// Mean over every value of every group.
pub fn overall_mean(groups: &[KindGroup]) -> Option<f64> {
    let all: Vec<f64> = groups.iter().flat_map(|group| group.values.iter().copied()).collect();
    mean(&all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bsg_core::well_nest::WellNestLocation;

    const LOCATIONS_CSV: &str = "WellNest_Name,Long,Lat
LCBKK003,100.55,13.71
LCBKK005,100.60,13.80
";

    const VALUES_CSV: &str = "WellNest_Name,Well_Name,value
LCBKK003,BK_LCBKK003,0.10
LCBKK003,NB_LCBKK003,0.30
LCBKK005,BK_LCBKK005,0.20
LCBKK005,PD_LCBKK005,0.40
";

    fn locations() -> LocationIndex {
        WellNestLocation::parse_location_csv(LOCATIONS_CSV).unwrap().into()
    }

    #[test]
    fn test_group_by_kind_orders_groups() {
        let values = parse_well_values_csv(VALUES_CSV).unwrap();
        let groups = group_by_kind(&values, &locations()).unwrap();
        let kinds: Vec<WellKind> = groups.iter().map(|g| g.kind).collect();
        assert_eq!(kinds, WellKind::ALL.to_vec());
        assert_eq!(groups[0].values, vec![0.10, 0.20]);
        assert_eq!(groups[0].points[1], (100.60, 13.80));
        assert!(groups[2].values.is_empty());
        assert_eq!(groups[3].mean(), Some(0.30));
        assert!((overall_mean(&groups).unwrap() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_well_or_location_is_an_error() {
        let unknown_kind = vec![WellValue {
            well_nest: "LCBKK003".to_string(),
            well: "LCSPK003_XX".to_string(),
            value: 1.0,
        }];
        assert!(group_by_kind(&unknown_kind, &locations()).is_err());

        let unknown_nest = vec![WellValue {
            well_nest: "LCBKK999".to_string(),
            well: "BK_LCBKK999".to_string(),
            value: 1.0,
        }];
        assert!(group_by_kind(&unknown_nest, &locations()).is_err());
    }
}
