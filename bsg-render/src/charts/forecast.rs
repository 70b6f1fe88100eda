//! Cumulative subsidence under each pumping scenario.

use crate::colormap::named::CYAN;
use crate::figure::Figure;
use crate::style::StyleConfig;
use bsg_core::scenario::PumpingScenario;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

/// One scenario run, in decimal years and cm.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioLine {
    pub scenario: PumpingScenario,
    pub points: Vec<(f64, f64)>,
    /// mm/yr of the last simulated year
    pub terminal_rate: f64,
}

/// A marked year of the observed period with its annual rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateMarker {
    pub point: (f64, f64),
    /// mm/yr
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastChart {
    pub well_nest: String,
    pub scenarios: Vec<ScenarioLine>,
    /// The part of the run driven by observed pumping
    pub observed: Vec<(f64, f64)>,
    pub markers: Vec<RateMarker>,
    pub style: StyleConfig,
}

pub fn rate_label(rate: f64) -> String {
    format!("{:.1} mm/yr", rate)
}

impl ForecastChart {
    fn bounds(&self) -> ((f64, f64), (f64, f64)) {
        let all = self
            .scenarios
            .iter()
            .flat_map(|line| line.points.iter())
            .chain(self.observed.iter());
        let (mut x0, mut x1, mut y0, mut y1) = (f64::MAX, f64::MIN, f64::MAX, f64::MIN);
        for (x, y) in all {
            x0 = x0.min(*x);
            x1 = x1.max(*x);
            y0 = y0.min(*y);
            y1 = y1.max(*y);
        }
        if x0 > x1 {
            return ((1978.0, 2060.0), (0.0, 1.0));
        }
        let pad = ((y1 - y0) * 0.1).max(1.0);
        ((x0, x1 + 5.0), (y0.min(0.0) - pad, y1 + pad))
    }
}

impl Figure for ForecastChart {
    fn file_stem(&self) -> String {
        format!("{}_CumSubForecast_ALLPUMP", self.well_nest)
    }

    fn size(&self) -> (u32, u32) {
        self.style.canvas_size((3.5, 2.5))
    }

    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>) -> anyhow::Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let style = &self.style;
        root.fill(&WHITE)?;
        let ((x0, x1), (y0, y1)) = self.bounds();
        let mut chart = ChartBuilder::on(root)
            .caption(&self.well_nest, style.font(style.title_size))
            .margin(style.px(4.0) as i32)
            .x_label_area_size(style.px(18.0) as u32)
            .y_label_area_size(style.px(24.0) as u32)
            .build_cartesian_2d(x0..x1, y0..y1)?;
        chart
            .configure_mesh()
            .bold_line_style(BLACK.mix(0.2))
            .light_line_style(BLACK.mix(0.05))
            .x_label_formatter(&|x| format!("{:.0}", x))
            .x_label_style(style.tick_font())
            .y_label_style(style.tick_font())
            .x_desc("Years")
            .y_desc("Cumulative Subsidence (cm)")
            .axis_desc_style(style.font(style.label_size))
            .draw()?;

        let rate_style = style
            .font(style.font_size)
            .color(&BLACK)
            .pos(Pos::new(HPos::Left, VPos::Center));
        for line in &self.scenarios {
            let (r, g, b) = line.scenario.rgb();
            let color = RGBColor(r, g, b);
            chart
                .draw_series(LineSeries::new(
                    line.points.iter().copied(),
                    color.stroke_width(style.stroke(1.0)),
                ))?
                .label(line.scenario.label())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 12, y)], color));
            if let Some(last) = line.points.last() {
                chart.draw_series(std::iter::once(Text::new(
                    rate_label(line.terminal_rate),
                    (last.0 + 0.5, last.1),
                    rate_style.clone(),
                )))?;
            }
        }
        chart
            .draw_series(LineSeries::new(
                self.observed.iter().copied(),
                BLACK.stroke_width(style.stroke(1.0)),
            ))?
            .label("Observed Pumping")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 12, y)], BLACK));

        let marker_style = style
            .font(style.font_size)
            .color(&BLACK)
            .pos(Pos::new(HPos::Right, VPos::Bottom));
        for marker in &self.markers {
            chart.draw_series(std::iter::once(Circle::new(
                marker.point,
                style.px(1.5) as i32,
                CYAN.filled(),
            )))?;
            chart.draw_series(std::iter::once(Text::new(
                rate_label(marker.rate),
                marker.point,
                marker_style.clone(),
            )))?;
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .label_font(style.font(style.legend_size))
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
        Ok(())
    }
}
