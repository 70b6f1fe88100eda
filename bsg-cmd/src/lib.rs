//! Command implementations for the BSG CLI.
//!
//! Each subcommand is one batch figure job. Failures of a single well nest
//! are logged and skipped; configuration errors abort the job.

use bsg_core::head_model::TimeWindow;
use bsg_core::leveling::LevelingBook;
use bsg_render::dispatch::Mode;
use clap::{Args, Subcommand};
use layout::{basemap, load_locations, well_nests, ResultsDir};
use std::path::{Path, PathBuf};

pub mod groundwater;
pub mod layout;
pub mod subsidence;

/// Where figures go.
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Write PNG and SVG files; otherwise figures are only rendered in memory
    #[arg(long)]
    pub save: bool,

    /// Output directory for saved figures
    #[arg(short = 'o', long, default_value = "figures")]
    pub out_dir: PathBuf,
}

impl OutputArgs {
    pub fn save_dir(&self) -> Option<&Path> {
        self.save.then_some(self.out_dir.as_path())
    }
}

/// Time window as `YYYY` or `YYYY-MM-DD`.
#[derive(Args, Debug, Clone)]
pub struct WindowArgs {
    #[arg(long, default_value = "1978")]
    pub tmin: String,

    #[arg(long, default_value = "2020")]
    pub tmax: String,
}

impl WindowArgs {
    pub fn window(&self) -> anyhow::Result<TimeWindow> {
        TimeWindow::parse(&self.tmin, &self.tmax)
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Annual subsidence bars, simulated against surveyed, per well nest
    SubBar {
        /// Directory of calibrated model results
        #[arg(short = 'r', long)]
        results_dir: PathBuf,

        /// Directory of leveling sheet exports (<nest>_Leveling.csv)
        #[arg(short = 'b', long)]
        leveling_dir: PathBuf,

        /// Well nests to draw (default: all published well nests)
        #[arg(short = 'w', long = "well-nest")]
        well_nests: Vec<String>,

        #[command(flatten)]
        window: WindowArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Maps of subsidence RMSE and normalized RMSE
    SubRmseMap {
        #[arg(short = 'r', long)]
        results_dir: PathBuf,

        #[arg(short = 'b', long)]
        leveling_dir: PathBuf,

        /// Well location CSV (WellNest_Name,Long,Lat)
        #[arg(short = 'l', long)]
        locations_csv: String,

        /// Boundary polylines CSV (id,lon,lat)
        #[arg(long)]
        boundaries_csv: Option<String>,

        #[arg(short = 'w', long = "well-nest")]
        well_nests: Vec<String>,

        #[command(flatten)]
        window: WindowArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Cumulative subsidence under every pumping scenario, per well nest
    SubForecast {
        /// Directory holding one subdirectory per pumping scenario
        #[arg(short = 'r', long)]
        results_dir: PathBuf,

        #[arg(short = 'w', long = "well-nest")]
        well_nests: Vec<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Map of forecast cumulative subsidence, one wedge per scenario
    SubForecastMap {
        #[arg(short = 'r', long)]
        results_dir: PathBuf,

        #[arg(short = 'l', long)]
        locations_csv: String,

        #[arg(long)]
        boundaries_csv: Option<String>,

        #[arg(short = 'w', long = "well-nest")]
        well_nests: Vec<String>,

        #[arg(long, default_value = "2020")]
        tmin: String,

        #[arg(long, default_value = "2060")]
        tmax: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Cumulative subsidence of a sensitivity sweep, per well nest
    SensLine {
        #[arg(short = 'r', long)]
        results_dir: PathBuf,

        /// Parameter swept: Sskv, Sske, K or thick
        #[arg(short = 'p', long)]
        parameter: String,

        #[arg(short = 'w', long = "well-nest")]
        well_nests: Vec<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Map of the well nest locations
    GwLocsMap {
        #[arg(short = 'l', long)]
        locations_csv: String,

        #[arg(long)]
        boundaries_csv: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Map of a per-well result with one wedge per aquifer
    GwWedgeMap {
        /// RMSE_full or step_full
        #[arg(short = 'm', long)]
        mode: String,

        /// Per-well values CSV (WellNest_Name,Well_Name,value)
        #[arg(short = 'v', long)]
        values_csv: String,

        #[arg(short = 'l', long)]
        locations_csv: String,

        #[arg(long)]
        boundaries_csv: Option<String>,

        #[command(flatten)]
        window: WindowArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Head model panels, per well nest
    GwResults {
        /// Directory of head model exports, one subdirectory per well nest
        #[arg(short = 'g', long)]
        gw_dir: PathBuf,

        #[arg(short = 'l', long)]
        locations_csv: String,

        #[arg(short = 'w', long = "well-nest")]
        well_nests: Vec<String>,

        #[command(flatten)]
        window: WindowArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::SubBar {
            results_dir,
            leveling_dir,
            well_nests: nests,
            window,
            output,
        } => subsidence::run_sub_bar(
            &ResultsDir::new(results_dir),
            &LevelingBook::new(leveling_dir),
            &well_nests(&nests),
            &window.window()?,
            output.save_dir(),
        ),
        Command::SubRmseMap {
            results_dir,
            leveling_dir,
            locations_csv,
            boundaries_csv,
            well_nests: nests,
            window,
            output,
        } => subsidence::run_sub_rmse_map(
            &ResultsDir::new(results_dir),
            &LevelingBook::new(leveling_dir),
            load_locations(&locations_csv)?,
            &well_nests(&nests),
            basemap(boundaries_csv.as_deref())?,
            &window.window()?,
            output.save_dir(),
        ),
        Command::SubForecast {
            results_dir,
            well_nests: nests,
            output,
        } => subsidence::run_sub_forecast(&ResultsDir::new(results_dir), &well_nests(&nests), output.save_dir()),
        Command::SubForecastMap {
            results_dir,
            locations_csv,
            boundaries_csv,
            well_nests: nests,
            tmin,
            tmax,
            output,
        } => subsidence::run_sub_forecast_map(
            &ResultsDir::new(results_dir),
            load_locations(&locations_csv)?,
            &well_nests(&nests),
            basemap(boundaries_csv.as_deref())?,
            &TimeWindow::parse(&tmin, &tmax)?,
            output.save_dir(),
        ),
        Command::SensLine {
            results_dir,
            parameter,
            well_nests: nests,
            output,
        } => subsidence::run_sens_line(
            &ResultsDir::new(results_dir),
            parameter.parse()?,
            &well_nests(&nests),
            output.save_dir(),
        ),
        Command::GwLocsMap {
            locations_csv,
            boundaries_csv,
            output,
        } => groundwater::run_gw_locs_map(
            load_locations(&locations_csv)?,
            basemap(boundaries_csv.as_deref())?,
            output.save_dir(),
        ),
        Command::GwWedgeMap {
            mode,
            values_csv,
            locations_csv,
            boundaries_csv,
            window,
            output,
        } => groundwater::run_gw_wedge_map(
            mode.parse::<Mode>()?,
            &values_csv,
            load_locations(&locations_csv)?,
            basemap(boundaries_csv.as_deref())?,
            &window.window()?,
            output.save_dir(),
        ),
        Command::GwResults {
            gw_dir,
            locations_csv,
            well_nests: nests,
            window,
            output,
        } => groundwater::run_gw_results(
            &gw_dir,
            load_locations(&locations_csv)?,
            &well_nests(&nests),
            &window.window()?,
            output.save_dir(),
        ),
    }
}
