//! Annual subsidence bars, simulated next to surveyed.

use crate::colormap::named::{TAB_BLUE, TAB_ORANGE};
use crate::figure::Figure;
use crate::style::StyleConfig;
use bsg_core::year_range::{HISTORICAL_END, HISTORICAL_START};
use plotters::coord::Shift;
use plotters::prelude::*;

/// Fixed y range in cm/yr.
pub const Y_RANGE: (f64, f64) = (-2.0, 10.0);

/// Width of one bar in years.
const BAR_WIDTH: f64 = 0.35;

#[derive(Debug, Clone, PartialEq)]
pub struct AnnualBarChart {
    pub well_nest: String,
    /// (year, cm/yr), subsidence positive
    pub simulated: Vec<(i32, f64)>,
    /// Surveyed rates; `None` without a leveling sheet
    pub observed: Option<Vec<(i32, f64)>>,
    /// Annotated when present
    pub rmse: Option<f64>,
    pub style: StyleConfig,
}

impl AnnualBarChart {
    /// Bars as (left, right, height); simulated left of the year tick,
    /// observed right of it.
    pub fn bars(values: &[(i32, f64)], simulated: bool) -> Vec<(f64, f64, f64)> {
        let offset = if simulated { -BAR_WIDTH } else { 0.0 };
        values
            .iter()
            .map(|(year, value)| {
                let left = *year as f64 + offset;
                (left, left + BAR_WIDTH, *value)
            })
            .collect()
    }

    pub fn rmse_label(&self) -> Option<String> {
        self.rmse.map(|rmse| format!("RMSE: {:.1} cm/year", rmse))
    }
}

fn draw_bars<DB, X, Y>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<X, Y>>,
    bars: Vec<(f64, f64, f64)>,
    color: RGBColor,
    label: &str,
) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
    X: Ranged<ValueType = f64>,
    Y: Ranged<ValueType = f64>,
{
    chart
        .draw_series(
            bars.into_iter()
                .map(|(left, right, height)| Rectangle::new([(left, 0.0), (right, height)], color.filled())),
        )?
        .label(label)
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    Ok(())
}

impl Figure for AnnualBarChart {
    fn file_stem(&self) -> String {
        format!("{}_BenchvsImplicit_AnnSubTotal", self.well_nest)
    }

    fn size(&self) -> (u32, u32) {
        self.style.canvas_size((6.4, 4.8))
    }

    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>) -> anyhow::Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let style = &self.style;
        root.fill(&WHITE)?;
        let x_range = (HISTORICAL_START as f64 - 1.0)..(HISTORICAL_END as f64 + 1.0);
        let mut chart = ChartBuilder::on(root)
            .caption(&self.well_nest, style.font(style.title_size))
            .margin(style.px(6.0) as i32)
            .x_label_area_size(style.px(24.0) as u32)
            .y_label_area_size(style.px(30.0) as u32)
            .build_cartesian_2d(x_range, Y_RANGE.0..Y_RANGE.1)?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(((HISTORICAL_END - HISTORICAL_START) / 2 + 1) as usize)
            .x_label_formatter(&|x| format!("{:.0}", x))
            .x_label_style(style.tick_font())
            .y_label_style(style.tick_font())
            .x_desc("Years")
            .y_desc("Annual Subsidence Rate (cm/yr)")
            .axis_desc_style(style.font(style.label_size))
            .draw()?;

        draw_bars(&mut chart, Self::bars(&self.simulated, true), TAB_ORANGE, "Simulated")?;
        if let Some(observed) = &self.observed {
            draw_bars(&mut chart, Self::bars(observed, false), TAB_BLUE, "Observed")?;
        }
        chart.draw_series(std::iter::once(PathElement::new(
            vec![
                (HISTORICAL_START as f64 - 1.0, 0.0),
                (HISTORICAL_END as f64 + 1.0, 0.0),
            ],
            BLACK.stroke_width(style.stroke(1.0)),
        )))?;
        if let Some(label) = self.rmse_label() {
            chart.draw_series(std::iter::once(Text::new(
                label,
                (2000.0, 8.5),
                style.font(style.legend_size),
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
