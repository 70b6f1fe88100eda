pub mod bar;
pub mod forecast;
pub mod groundwater;
pub mod map;
pub mod sensitivity;

pub use bar::AnnualBarChart;
pub use forecast::{ForecastChart, RateMarker, ScenarioLine};
pub use groundwater::{GroundwaterChart, WellPanel};
pub use map::MapFigure;
pub use sensitivity::{SensitivityChart, SensitivityRun};
