//! Where the batch jobs find their inputs.
//!
//! Model results are CSV exports (`date,AnnRates,CumTotSum`):
//! `<results>/<nest>.csv` for the calibrated run,
//! `<results>/<scenario>/<nest>.csv` per pumping scenario and
//! `<results>/SENS_<param>/<nest>_<i>.csv` per sensitivity run.
//! Head models live in `<gw>/<nest>/<well>_{obs,sim,step,stress}.csv`.

use anyhow::Context;
use bsg_core::annual::AnnualSeries;
use bsg_core::boundary::parse_boundary_csv;
use bsg_core::scenario::{PumpingScenario, SensitivityParameter};
use bsg_core::well_nest::{WellNestLocation, PAPER_WELL_NESTS};
use bsg_render::canvas::DefaultBasemap;
use log::{debug, info};
use std::path::{Path, PathBuf};

const OBSERVATION_SUFFIX: &str = "_obs.csv";

#[derive(Debug, Clone)]
pub struct ResultsDir {
    dir: PathBuf,
}

impl ResultsDir {
    pub fn new<P: AsRef<Path>>(dir: P) -> ResultsDir {
        ResultsDir {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn historical(&self, well_nest: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", well_nest))
    }

    pub fn scenario(&self, scenario: PumpingScenario, well_nest: &str) -> PathBuf {
        self.dir.join(scenario.slug()).join(format!("{}.csv", well_nest))
    }

    /// Runs `0, 1, ...` of a sensitivity sweep, up to the first missing one.
    pub fn sensitivity_runs(&self, parameter: SensitivityParameter, well_nest: &str) -> Vec<PathBuf> {
        let dir = self.dir.join(format!("SENS_{}", parameter.slug()));
        (0..)
            .map(|i| dir.join(format!("{}_{}.csv", well_nest, i)))
            .take_while(|path| path.exists())
            .collect()
    }
}

pub fn load_series(path: &Path, well_nest: &str) -> anyhow::Result<AnnualSeries> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let series = AnnualSeries::parse_annual_csv(well_nest, &contents)
        .with_context(|| format!("parsing {}", path.display()))?;
    debug!("{}: {} annual rows from {}", well_nest, series.len(), path.display());
    Ok(series)
}

pub fn load_locations(path: &str) -> anyhow::Result<Vec<WellNestLocation>> {
    let contents = std::fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
    let locations = WellNestLocation::parse_location_csv(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse well locations {}: {}", path, e))?;
    info!("Loaded {} well nest locations", locations.len());
    Ok(locations)
}

/// The default basemap, with boundary lines when a CSV is given.
pub fn basemap(boundaries_csv: Option<&str>) -> anyhow::Result<DefaultBasemap> {
    let Some(path) = boundaries_csv else {
        return Ok(DefaultBasemap::default());
    };
    let contents = std::fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
    let lines = parse_boundary_csv(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse boundaries {}: {}", path, e))?;
    info!("Loaded {} boundary lines", lines.len());
    Ok(DefaultBasemap::with_boundaries(lines))
}

/// The requested well nests, or every well nest of the published figures.
pub fn well_nests(requested: &[String]) -> Vec<String> {
    if requested.is_empty() {
        PAPER_WELL_NESTS.iter().map(|name| name.to_string()).collect()
    } else {
        requested.to_vec()
    }
}

/// Wells with exported head models in a well nest's directory, sorted.
pub fn discover_wells(dir: &Path) -> anyhow::Result<Vec<String>> {
    let mut wells = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))? {
        let name = entry?.file_name().to_string_lossy().to_string();
        if let Some(well) = name.strip_suffix(OBSERVATION_SUFFIX) {
            wells.push(well.to_string());
        }
    }
    wells.sort();
    Ok(wells)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("bsg-layout-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_result_paths() {
        let results = ResultsDir::new("/data/results");
        assert_eq!(
            results.scenario(PumpingScenario::NoPumping, "LCBKK013"),
            PathBuf::from("/data/results/nopump/LCBKK013.csv")
        );
        assert_eq!(
            results.historical("LCBKK013"),
            PathBuf::from("/data/results/LCBKK013.csv")
        );
    }

    #[test]
    fn test_sensitivity_runs_stop_at_first_gap() {
        let dir = scratch("sens");
        let sens = dir.join("SENS_K");
        std::fs::create_dir_all(&sens).unwrap();
        for i in [0, 1, 3] {
            std::fs::write(sens.join(format!("LCBKK013_{}.csv", i)), "").unwrap();
        }
        let runs = ResultsDir::new(&dir).sensitivity_runs(SensitivityParameter::K, "LCBKK013");
        assert_eq!(runs.len(), 2);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_discover_wells() {
        let dir = scratch("wells");
        for file in ["PD_13_obs.csv", "BK_13_obs.csv", "BK_13_sim.csv"] {
            std::fs::write(dir.join(file), "").unwrap();
        }
        assert_eq!(discover_wells(&dir).unwrap(), vec!["BK_13", "PD_13"]);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_default_well_nests() {
        assert_eq!(well_nests(&[]).len(), 23);
        assert_eq!(well_nests(&["LCBKK013".to_string()]), vec!["LCBKK013"]);
    }
}
