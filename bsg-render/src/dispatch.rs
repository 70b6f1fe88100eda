//! Mode-dispatched drawing of one spatial layer onto a map canvas.
//!
//! A mode names what a layer shows. It fixes the payload shape, the glyph
//! strategy, the default color scale and the legend. Layers are validated
//! when they are built, so nothing is drawn for a misconfigured layer.

use crate::canvas::MapCanvas;
use crate::colormap::named::MEDIUM_ORCHID;
use crate::colormap::{Clim, ColorMap, ColorScale};
use crate::error::RenderError;
use crate::legend::{Colorbar, SwatchLegend};
use crate::wedge::sectors_for;
use bsg_core::scenario::PumpingScenario;
use bsg_core::well_nest::WellKind;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::fmt;
use std::str::FromStr;

/// Wedge radius in map units (degrees).
pub const WEDGE_RADIUS: f64 = 0.018;

/// Well nests whose location label sits closer to the marker.
const LOWER_LABEL_NESTS: [&str; 6] = [
    "LCBKK038", "LCBKK007", "LCBKK003", "LCBKK041", "LCBKK005", "LCBKK021",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Subsidence RMSE per well nest (cm/yr)
    SubRmse,
    /// Subsidence RMSE normalized by the observed range (%)
    SubRmsePercent,
    /// Well nest locations
    GwWellNests,
    /// Normalized head RMSE per well, wedges by aquifer
    RmseFull,
    /// Step response duration per well, wedges by aquifer
    StepFull,
    /// Forecast cumulative subsidence, wedges by pumping scenario
    SubForecastMap,
}

impl Mode {
    pub const ALL: [Mode; 6] = [
        Mode::SubRmse,
        Mode::SubRmsePercent,
        Mode::GwWellNests,
        Mode::RmseFull,
        Mode::StepFull,
        Mode::SubForecastMap,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Mode::SubRmse => "Sub_RMSE",
            Mode::SubRmsePercent => "Sub_RMSE%",
            Mode::GwWellNests => "GW_WellNests",
            Mode::RmseFull => "RMSE_full",
            Mode::StepFull => "step_full",
            Mode::SubForecastMap => "Sub_Forecast_Map",
        }
    }

    pub fn strategy(&self) -> Strategy {
        match self {
            Mode::SubRmse | Mode::SubRmsePercent => Strategy::ScalarMarker(ScalarMarkers),
            Mode::GwWellNests => Strategy::LocationMarker(LocationMarkers),
            Mode::RmseFull | Mode::StepFull | Mode::SubForecastMap => {
                Strategy::Wedges(WedgePartition)
            }
        }
    }

    /// Group names of a wedge mode, in sector order; empty otherwise.
    pub fn group_names(&self) -> Vec<&'static str> {
        match self {
            Mode::RmseFull | Mode::StepFull => WellKind::ALL.iter().map(|kind| kind.code()).collect(),
            Mode::SubForecastMap => PumpingScenario::ALL.iter().map(|s| s.slug()).collect(),
            _ => Vec::new(),
        }
    }

    /// Color scale used unless the caller sets limits.
    pub fn default_scale(&self) -> Option<ColorScale> {
        match self {
            Mode::SubRmse | Mode::SubRmsePercent => Some(ColorScale::new(ColorMap::RdYlBuR, Clim::Auto)),
            Mode::GwWellNests => None,
            Mode::RmseFull => Some(ColorScale::new(ColorMap::Coolwarm, Clim::Auto)),
            Mode::StepFull => Some(ColorScale::new(ColorMap::Plasma, Clim::Auto)),
            Mode::SubForecastMap => Some(ColorScale::new(ColorMap::Coolwarm, Clim::Fixed(-5.0, 35.0))),
        }
    }

    pub fn colorbar_label(&self) -> Option<&'static str> {
        match self {
            Mode::SubRmse => Some("RMSE (cm/year)"),
            Mode::SubRmsePercent | Mode::RmseFull => Some("Normalized RMSE"),
            Mode::StepFull => Some("Years"),
            Mode::SubForecastMap => Some("Cumulative Subsidence (cm)"),
            Mode::GwWellNests => None,
        }
    }

    pub fn annotates_gulf(&self) -> bool {
        !matches!(self, Mode::SubForecastMap)
    }
}

impl FromStr for Mode {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| RenderError::UnknownMode(s.to_string()))
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Points and values of one wedge group.
#[derive(Debug, Clone, PartialEq)]
pub struct WedgeGroup {
    pub name: String,
    /// (longitude, latitude)
    pub points: Vec<(f64, f64)>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// One value per point
    Scalars(Vec<f64>),
    /// One well nest name per point
    Labels(Vec<String>),
    /// Named groups with their own points
    Groups(Vec<WedgeGroup>),
}

/// A validated layer: what to draw where, and how.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialLayer {
    mode: Mode,
    points: Vec<(f64, f64)>,
    payload: Payload,
}

impl SpatialLayer {
    /// Check the payload against the mode. Wedge modes take their points
    /// from the groups and ignore `points`.
    pub fn new(mode: Mode, points: Vec<(f64, f64)>, payload: Payload) -> Result<SpatialLayer, RenderError> {
        let name = mode.name();
        match (mode.strategy(), &payload) {
            (Strategy::ScalarMarker(_), Payload::Scalars(values)) => {
                check_lengths(name, "points", points.len(), values.len())?
            }
            (Strategy::LocationMarker(_), Payload::Labels(labels)) => {
                check_lengths(name, "points", points.len(), labels.len())?
            }
            (Strategy::Wedges(_), Payload::Groups(groups)) => check_groups(mode, groups)?,
            (Strategy::ScalarMarker(_), _) => {
                return Err(RenderError::PayloadShape {
                    mode: name,
                    expected: "one scalar per point",
                })
            }
            (Strategy::LocationMarker(_), _) => {
                return Err(RenderError::PayloadShape {
                    mode: name,
                    expected: "one label per point",
                })
            }
            (Strategy::Wedges(_), _) => {
                return Err(RenderError::PayloadShape {
                    mode: name,
                    expected: "named groups",
                })
            }
        }
        Ok(SpatialLayer {
            mode,
            points,
            payload,
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Every value mapped to a color.
    pub fn values(&self) -> Vec<f64> {
        match &self.payload {
            Payload::Scalars(values) => values.clone(),
            Payload::Labels(_) => Vec::new(),
            Payload::Groups(groups) => groups.iter().flat_map(|g| g.values.iter().copied()).collect(),
        }
    }
}

fn check_lengths(mode: &'static str, group: &str, points: usize, values: usize) -> Result<(), RenderError> {
    if points == values {
        Ok(())
    } else {
        Err(RenderError::LengthMismatch {
            mode,
            group: group.to_string(),
            points,
            values,
        })
    }
}

fn check_groups(mode: Mode, groups: &[WedgeGroup]) -> Result<(), RenderError> {
    let expected = mode.group_names();
    if groups.len() != expected.len() {
        return Err(RenderError::GroupCount {
            mode: mode.name(),
            expected: expected.len(),
            found: groups.len(),
        });
    }
    for (index, (group, name)) in groups.iter().zip(expected).enumerate() {
        if group.name != name {
            return Err(RenderError::GroupOrder {
                mode: mode.name(),
                index,
                expected: name,
                found: group.name.clone(),
            });
        }
        if group.points.is_empty() {
            return Err(RenderError::EmptyGroup {
                mode: mode.name(),
                group: group.name.clone(),
            });
        }
        check_lengths(mode.name(), &group.name, group.points.len(), group.values.len())?;
    }
    Ok(())
}

/// Legend pieces drawn after the layer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LegendSpec {
    pub swatches: Option<SwatchLegend>,
    /// Colorbar label; no colorbar when `None`
    pub colorbar: Option<String>,
}

impl LegendSpec {
    pub fn for_mode(mode: Mode) -> LegendSpec {
        let swatches = match mode {
            Mode::RmseFull | Mode::StepFull => Some(SwatchLegend::well_kinds()),
            Mode::SubForecastMap => Some(SwatchLegend::scenarios()),
            _ => None,
        };
        LegendSpec {
            swatches,
            colorbar: mode.colorbar_label().map(String::from),
        }
    }

    pub fn none() -> LegendSpec {
        LegendSpec::default()
    }
}

/// The uniform drawing capability of every strategy.
pub trait DrawLayer {
    fn draw<DB>(&self, canvas: &MapCanvas<DB>, layer: &SpatialLayer, scale: Option<&ColorScale>) -> anyhow::Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static;
}

/// Filled circle colored by its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalarMarkers;

/// Fixed-color circle with the well nest name beside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationMarkers;

/// One colored wedge per group around each point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WedgePartition;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    ScalarMarker(ScalarMarkers),
    LocationMarker(LocationMarkers),
    Wedges(WedgePartition),
}

impl Strategy {
    pub fn needs_scale(&self) -> bool {
        !matches!(self, Strategy::LocationMarker(_))
    }
}

impl DrawLayer for Strategy {
    fn draw<DB>(&self, canvas: &MapCanvas<DB>, layer: &SpatialLayer, scale: Option<&ColorScale>) -> anyhow::Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        match self {
            Strategy::ScalarMarker(s) => s.draw(canvas, layer, scale),
            Strategy::LocationMarker(s) => s.draw(canvas, layer, scale),
            Strategy::Wedges(s) => s.draw(canvas, layer, scale),
        }
    }
}

fn require_scale<'a>(layer: &SpatialLayer, scale: Option<&'a ColorScale>) -> Result<&'a ColorScale, RenderError> {
    scale.ok_or(RenderError::MissingColorScale(layer.mode.name()))
}

impl DrawLayer for ScalarMarkers {
    fn draw<DB>(&self, canvas: &MapCanvas<DB>, layer: &SpatialLayer, scale: Option<&ColorScale>) -> anyhow::Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let scale = require_scale(layer, scale)?;
        let values = layer.values();
        let limits = scale.limits(&values);
        for (point, value) in layer.points.iter().zip(&values) {
            canvas.marker(*point, 50.0, &scale.color(*value, limits), 0.75)?;
        }
        Ok(())
    }
}

impl DrawLayer for LocationMarkers {
    fn draw<DB>(&self, canvas: &MapCanvas<DB>, layer: &SpatialLayer, _scale: Option<&ColorScale>) -> anyhow::Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let Payload::Labels(labels) = &layer.payload else {
            return Ok(());
        };
        let style = *canvas.style();
        let text = style
            .bold(3.5)
            .color(&WHITE)
            .pos(Pos::new(HPos::Left, VPos::Bottom));
        for (point, name) in layer.points.iter().zip(labels) {
            canvas.marker(*point, 15.0, &MEDIUM_ORCHID, 0.75)?;
            let rise = if LOWER_LABEL_NESTS.contains(&name.as_str()) { 1.5 } else { 3.5 };
            let (x, y) = canvas.project(*point);
            let at = (
                x - style.px(8.0).round() as i32,
                y - style.px(rise).round() as i32,
            );
            let label = name.get(2..).unwrap_or(name);
            canvas.text(label, at, &text)?;
        }
        Ok(())
    }
}

impl DrawLayer for WedgePartition {
    fn draw<DB>(&self, canvas: &MapCanvas<DB>, layer: &SpatialLayer, scale: Option<&ColorScale>) -> anyhow::Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let scale = require_scale(layer, scale)?;
        let Payload::Groups(groups) = &layer.payload else {
            return Ok(());
        };
        let limits = scale.limits(&layer.values());
        for (group, sector) in groups.iter().zip(sectors_for(groups.len())) {
            for (point, value) in group.points.iter().zip(&group.values) {
                canvas.wedge(*point, WEDGE_RADIUS, &sector, &scale.color(*value, limits))?;
            }
        }
        Ok(())
    }
}

/// Draw a layer, then its legend and colorbar.
pub fn render<DB>(
    canvas: &MapCanvas<DB>,
    layer: &SpatialLayer,
    scale: Option<&ColorScale>,
    legend: &LegendSpec,
) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let strategy = layer.mode.strategy();
    if strategy.needs_scale() && scale.is_none() {
        return Err(RenderError::MissingColorScale(layer.mode.name()).into());
    }
    strategy.draw(canvas, layer, scale)?;
    if let Some(swatches) = &legend.swatches {
        swatches.draw(canvas)?;
    }
    if let (Some(label), Some(scale), Some(side)) = (&legend.colorbar, scale, canvas.side()) {
        let colorbar = Colorbar {
            label: label.clone(),
            scale: *scale,
            limits: scale.limits(&layer.values()),
        };
        let (upper_left, lower_right) = canvas.frame();
        colorbar.draw(side, upper_left.1, lower_right.1, canvas.style())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::MapExtent;
    use crate::style::StyleConfig;

    fn group(name: &str, n: usize) -> WedgeGroup {
        WedgeGroup {
            name: name.to_string(),
            points: (0..n).map(|i| (100.4 + 0.1 * i as f64, 13.7)).collect(),
            values: (0..n).map(|i| i as f64).collect(),
        }
    }

    fn kind_groups() -> Vec<WedgeGroup> {
        ["BK", "PD", "NL", "NB"].iter().map(|name| group(name, 2)).collect()
    }

    fn draw_svg(layer: &SpatialLayer, scale: Option<&ColorScale>, legend: &LegendSpec) -> anyhow::Result<String> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (960, 660)).into_drawing_area();
            let canvas = MapCanvas::new(&root, MapExtent::bangkok(), StyleConfig::forecast(), legend.colorbar.is_some())?;
            render(&canvas, layer, scale, legend)?;
            root.present()?;
        }
        Ok(svg)
    }

    #[test]
    fn test_mode_names_round_trip() {
        for mode in Mode::ALL {
            assert_eq!(mode.name().parse::<Mode>().unwrap(), mode);
        }
        assert_eq!(
            "Sub_RMSE_pct".parse::<Mode>(),
            Err(RenderError::UnknownMode("Sub_RMSE_pct".to_string()))
        );
    }

    #[test]
    fn test_wedge_payload_validation() {
        assert!(SpatialLayer::new(Mode::RmseFull, vec![], Payload::Groups(kind_groups())).is_ok());

        let mut missing = kind_groups();
        missing.pop();
        assert!(matches!(
            SpatialLayer::new(Mode::RmseFull, vec![], Payload::Groups(missing)),
            Err(RenderError::GroupCount { expected: 4, found: 3, .. })
        ));

        let mut reordered = kind_groups();
        reordered.swap(2, 3);
        assert!(matches!(
            SpatialLayer::new(Mode::StepFull, vec![], Payload::Groups(reordered)),
            Err(RenderError::GroupOrder { index: 2, .. })
        ));

        let mut empty = kind_groups();
        empty[1] = group("PD", 0);
        assert!(matches!(
            SpatialLayer::new(Mode::RmseFull, vec![], Payload::Groups(empty)),
            Err(RenderError::EmptyGroup { .. })
        ));

        let mut uneven = kind_groups();
        uneven[0].values.pop();
        assert!(matches!(
            SpatialLayer::new(Mode::RmseFull, vec![], Payload::Groups(uneven)),
            Err(RenderError::LengthMismatch { points: 2, values: 1, .. })
        ));

        assert!(matches!(
            SpatialLayer::new(Mode::SubForecastMap, vec![], Payload::Groups(kind_groups())),
            Err(RenderError::GroupCount { expected: 5, .. })
        ));
    }

    #[test]
    fn test_scalar_and_label_payload_validation() {
        let points = vec![(100.5, 13.7), (100.6, 13.8)];
        assert!(SpatialLayer::new(Mode::SubRmse, points.clone(), Payload::Scalars(vec![1.0, 2.0])).is_ok());
        assert!(SpatialLayer::new(Mode::SubRmse, points.clone(), Payload::Scalars(vec![1.0])).is_err());
        assert!(matches!(
            SpatialLayer::new(Mode::GwWellNests, points.clone(), Payload::Scalars(vec![1.0, 2.0])),
            Err(RenderError::PayloadShape { .. })
        ));
        let labels = Payload::Labels(vec!["LCBKK003".to_string(), "LCBKK013".to_string()]);
        assert!(SpatialLayer::new(Mode::GwWellNests, points, labels).is_ok());
    }

    #[test]
    fn test_wedge_layer_draws_one_polygon_per_wedge() {
        let layer = SpatialLayer::new(Mode::RmseFull, vec![], Payload::Groups(kind_groups())).unwrap();
        let scale = Mode::RmseFull.default_scale();
        let svg = draw_svg(&layer, scale.as_ref(), &LegendSpec::none()).unwrap();
        assert_eq!(svg.matches("<polygon").count(), 8);
    }

    #[test]
    fn test_forecast_layer_with_swatches() {
        let groups = PumpingScenario::ALL.iter().map(|s| group(s.slug(), 3)).collect();
        let layer = SpatialLayer::new(Mode::SubForecastMap, vec![], Payload::Groups(groups)).unwrap();
        let scale = Mode::SubForecastMap.default_scale();
        let legend = LegendSpec {
            swatches: Some(SwatchLegend::scenarios()),
            colorbar: None,
        };
        let svg = draw_svg(&layer, scale.as_ref(), &legend).unwrap();
        // 15 map wedges and 5 legend swatches
        assert_eq!(svg.matches("<polygon").count(), 20);
        assert!(svg.contains("No Pumping"));
    }

    #[test]
    fn test_colored_layer_needs_a_scale() {
        let layer = SpatialLayer::new(Mode::SubRmse, vec![(100.5, 13.7)], Payload::Scalars(vec![1.0])).unwrap();
        assert!(draw_svg(&layer, None, &LegendSpec::none()).is_err());
        assert!(draw_svg(&layer, Mode::SubRmse.default_scale().as_ref(), &LegendSpec::none()).is_ok());
    }

    #[test]
    fn test_legend_for_mode() {
        assert!(LegendSpec::for_mode(Mode::GwWellNests).colorbar.is_none());
        assert_eq!(
            LegendSpec::for_mode(Mode::StepFull).colorbar.as_deref(),
            Some("Years")
        );
        assert_eq!(
            LegendSpec::for_mode(Mode::SubForecastMap).swatches.unwrap().swatches.len(),
            5
        );
    }
}
