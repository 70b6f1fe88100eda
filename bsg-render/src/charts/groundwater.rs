//! Head model panels of one well nest: one panel per well, then the
//! pumping stress driving them.

use crate::colormap::named::{GREY, TAB_BLUE, TAB_GREEN, TAB_ORANGE, TAB_PURPLE, TAB_RED};
use crate::figure::Figure;
use crate::style::StyleConfig;
use bsg_core::well_nest::WellKind;
use itertools::Itertools;
use plotters::coord::Shift;
use plotters::prelude::*;

/// Step responses are drawn magnified.
pub const STEP_SCALE: f64 = 50.0;

/// Stress axis in m³/day, labelled in units of 10⁴.
pub const STRESS_RANGE: (f64, f64) = (2.5e5, 3.0e6);
const STRESS_UNIT: f64 = 1.0e4;

pub fn panel_color(kind: WellKind) -> RGBColor {
    match kind {
        WellKind::Bk => TAB_BLUE,
        WellKind::Pd => TAB_ORANGE,
        WellKind::Nl => TAB_GREEN,
        WellKind::Nb => TAB_RED,
    }
}

/// Heads of one well, in decimal years and meters.
#[derive(Debug, Clone, PartialEq)]
pub struct WellPanel {
    pub kind: WellKind,
    pub well: String,
    /// Observations used in calibration
    pub observed: Vec<(f64, f64)>,
    /// Observations left out of calibration
    pub unused: Vec<(f64, f64)>,
    pub simulated: Vec<(f64, f64)>,
    /// m, simulated against used observations
    pub rmse: Option<f64>,
    /// (days, head change)
    pub step: Vec<(f64, f64)>,
}

impl WellPanel {
    pub fn simulated_label(&self) -> String {
        match self.rmse {
            Some(rmse) => format!("Simulated (RMSE: {:.2} m)", rmse),
            None => "Simulated".to_string(),
        }
    }

    pub fn scaled_step(&self) -> Vec<(f64, f64)> {
        self.step.iter().map(|(day, v)| (*day, v * STEP_SCALE)).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroundwaterChart {
    pub well_nest: String,
    pub tmin: String,
    pub tmax: String,
    /// In BK, PD, NL, NB order
    pub panels: Vec<WellPanel>,
    /// (decimal year, m³/day)
    pub stress: Vec<(f64, f64)>,
    pub style: StyleConfig,
}

fn span<'a>(values: impl Iterator<Item = &'a f64>, fallback: (f64, f64)) -> (f64, f64) {
    let (lo, hi) = values.copied().minmax().into_option().unwrap_or(fallback);
    if hi > lo {
        (lo, hi)
    } else {
        (lo - 0.5, hi + 0.5)
    }
}

impl GroundwaterChart {
    /// Common time axis of every panel.
    pub fn time_span(&self) -> (f64, f64) {
        let times = self
            .panels
            .iter()
            .flat_map(|p| p.observed.iter().chain(&p.unused).chain(&p.simulated))
            .chain(&self.stress)
            .map(|(t, _)| t);
        span(times, (1978.0, 2020.0))
    }

    fn draw_panel<DB>(&self, area: &DrawingArea<DB, Shift>, panel: &WellPanel, x: (f64, f64)) -> anyhow::Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let style = &self.style;
        let heads = panel
            .observed
            .iter()
            .chain(&panel.unused)
            .chain(&panel.simulated)
            .map(|(_, h)| h);
        let (y0, y1) = span(heads, (-30.0, 0.0));
        let pad = (y1 - y0) * 0.1;
        let mut chart = ChartBuilder::on(area)
            .caption(&panel.well, style.font(style.label_size))
            .margin(style.px(3.0) as i32)
            .x_label_area_size(style.px(10.0) as u32)
            .y_label_area_size(style.px(22.0) as u32)
            .build_cartesian_2d(x.0..x.1, (y0 - pad)..(y1 + pad))?;
        chart
            .configure_mesh()
            .x_label_formatter(&|x| format!("{:.0}", x))
            .x_label_style(style.tick_font())
            .y_label_style(style.tick_font())
            .y_desc("Head (m)")
            .axis_desc_style(style.font(style.label_size))
            .draw()?;

        let dot = style.px(0.8).max(1.0) as i32;
        chart
            .draw_series(panel.unused.iter().map(|p| Circle::new(*p, dot, GREY.filled())))?
            .label("Unused Observed")
            .legend(move |(x, y)| Circle::new((x + 5, y), dot, GREY.filled()));
        chart
            .draw_series(panel.observed.iter().map(|p| Circle::new(*p, dot, BLACK.filled())))?
            .label("Observed")
            .legend(move |(x, y)| Circle::new((x + 5, y), dot, BLACK.filled()));
        let color = panel_color(panel.kind);
        chart
            .draw_series(LineSeries::new(
                panel.simulated.iter().copied(),
                color.stroke_width(style.stroke(1.0)),
            ))?
            .label(panel.simulated_label())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], color));
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::LowerLeft)
            .label_font(style.font(style.legend_size))
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        if !panel.step.is_empty() {
            let (w, h) = area.dim_in_pixel();
            let inset = area.clone().shrink(
                ((w as f64 * 0.72) as i32, (h as f64 * 0.08) as i32),
                (w * 26 / 100, h * 40 / 100),
            );
            self.draw_step(&inset, panel, color)?;
        }
        Ok(())
    }

    fn draw_step<DB>(&self, area: &DrawingArea<DB, Shift>, panel: &WellPanel, color: RGBColor) -> anyhow::Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let style = &self.style;
        area.fill(&WHITE)?;
        let step = panel.scaled_step();
        let (d0, d1) = span(step.iter().map(|(d, _)| d), (0.0, 1.0));
        let (r0, r1) = span(step.iter().map(|(_, r)| r), (0.0, 1.0));
        let mut chart = ChartBuilder::on(area)
            .margin(style.px(1.0) as i32)
            .x_label_area_size(style.px(8.0) as u32)
            .y_label_area_size(style.px(12.0) as u32)
            .build_cartesian_2d(d0..d1, r0..r1)?;
        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(3)
            .y_labels(3)
            .x_label_style(style.font(style.tick_size - 2.0))
            .y_label_style(style.font(style.tick_size - 2.0))
            .draw()?;
        chart.draw_series(LineSeries::new(step, color.stroke_width(style.stroke(0.8))))?;
        Ok(())
    }

    fn draw_stress<DB>(&self, area: &DrawingArea<DB, Shift>, x: (f64, f64)) -> anyhow::Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let style = &self.style;
        let mut chart = ChartBuilder::on(area)
            .margin(style.px(3.0) as i32)
            .x_label_area_size(style.px(14.0) as u32)
            .y_label_area_size(style.px(22.0) as u32)
            .build_cartesian_2d(x.0..x.1, STRESS_RANGE.0..STRESS_RANGE.1)?;
        chart
            .configure_mesh()
            .x_label_formatter(&|x| format!("{:.0}", x))
            .y_label_formatter(&|y| format!("{:.0}", y / STRESS_UNIT))
            .x_label_style(style.tick_font())
            .y_label_style(style.tick_font())
            .x_desc("Years")
            .y_desc("Pumping Rate * 10⁴ (m³/day)")
            .axis_desc_style(style.font(style.label_size))
            .draw()?;
        chart.draw_series(LineSeries::new(
            self.stress.iter().copied(),
            TAB_PURPLE.stroke_width(style.stroke(1.0)),
        ))?;
        Ok(())
    }
}

impl Figure for GroundwaterChart {
    fn file_stem(&self) -> String {
        format!("{}_GW_{}_{}_PAPER", self.well_nest, self.tmin, self.tmax)
    }

    fn size(&self) -> (u32, u32) {
        let rows = self.panels.len() as f64 + 1.0;
        self.style.canvas_size((6.0, 1.6 * rows))
    }

    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>) -> anyhow::Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        root.fill(&WHITE)?;
        let x = self.time_span();
        let areas = root.split_evenly((self.panels.len() + 1, 1));
        for (area, panel) in areas.iter().zip(&self.panels) {
            self.draw_panel(area, panel, x)?;
        }
        if let Some(area) = areas.last() {
            self.draw_stress(area, x)?;
        }
        Ok(())
    }
}
