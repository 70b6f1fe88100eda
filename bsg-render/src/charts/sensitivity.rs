use crate::charts::forecast::rate_label;
use crate::colormap::ColorMap;
use crate::figure::Figure;
use crate::style::StyleConfig;
use bsg_core::scenario::SensitivityParameter;
use itertools::Itertools;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

/// One sensitivity run, in decimal years and cm.
#[derive(Debug, Clone, PartialEq)]
pub struct SensitivityRun {
    /// 50%, 60%, ...
    pub label: String,
    pub points: Vec<(f64, f64)>,
    /// mm/yr of the last simulated year
    pub terminal_rate: f64,
}

/// Cumulative subsidence of every run of one parameter sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SensitivityChart {
    pub well_nest: String,
    pub parameter: SensitivityParameter,
    pub runs: Vec<SensitivityRun>,
    pub style: StyleConfig,
}

impl SensitivityChart {
    /// Runs whose terminal rate is written on the chart: the first and the
    /// last.
    pub fn annotated(&self) -> Vec<&SensitivityRun> {
        match self.runs.as_slice() {
            [] => Vec::new(),
            [only] => vec![only],
            [first, .., last] => vec![first, last],
        }
    }

    fn title(&self) -> String {
        format!("{}: {}", self.well_nest, self.parameter.title().replace('\n', " "))
    }
}

impl Figure for SensitivityChart {
    fn file_stem(&self) -> String {
        format!("{}_CumSubTotal_SENS_{}", self.well_nest, self.parameter.slug())
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
        let points = self.runs.iter().flat_map(|run| run.points.iter());
        let x = points.clone().map(|p| p.0).minmax().into_option();
        let y = points.map(|p| p.1).minmax().into_option();
        let ((x0, x1), (y0, y1)) = match (x, y) {
            (Some(x), Some(y)) => (x, y),
            _ => ((1978.0, 2020.0), (0.0, 1.0)),
        };
        let pad = ((y1 - y0) * 0.1).max(1.0);
        let mut chart = ChartBuilder::on(root)
            .caption(self.title(), style.font(style.title_size))
            .margin(style.px(6.0) as i32)
            .x_label_area_size(style.px(24.0) as u32)
            .y_label_area_size(style.px(30.0) as u32)
            .build_cartesian_2d(x0..x1 + 6.0, (y0.min(0.0) - pad)..(y1 + pad))?;
        chart
            .configure_mesh()
            .x_label_formatter(&|x| format!("{:.0}", x))
            .x_label_style(style.tick_font())
            .y_label_style(style.tick_font())
            .x_desc("Years")
            .y_desc("Cumulative Subsidence (cm)")
            .axis_desc_style(style.font(style.label_size))
            .draw()?;

        let colors = ColorMap::Rainbow.sample(self.runs.len());
        for (run, color) in self.runs.iter().zip(colors) {
            chart
                .draw_series(LineSeries::new(
                    run.points.iter().copied(),
                    color.stroke_width(style.stroke(1.0)),
                ))?
                .label(run.label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }
        let rate_style = style
            .font(style.legend_size)
            .color(&BLACK)
            .pos(Pos::new(HPos::Left, VPos::Center));
        for run in self.annotated() {
            if let Some(last) = run.points.last() {
                chart.draw_series(std::iter::once(Text::new(
                    rate_label(run.terminal_rate),
                    (last.0 + 0.5, last.1),
                    rate_style.clone(),
                )))?;
            }
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

#[cfg(test)]
mod tests {
    use super::*;

    fn run(label: &str) -> SensitivityRun {
        SensitivityRun {
            label: label.to_string(),
            points: vec![(1978.0, 0.0), (2020.0, 50.0)],
            terminal_rate: 9.0,
        }
    }

    #[test]
    fn test_first_and_last_runs_are_annotated() {
        let mut chart = SensitivityChart {
            well_nest: "LCBKK013".to_string(),
            parameter: SensitivityParameter::Thickness,
            runs: vec![run("50%"), run("60%"), run("70%")],
            style: StyleConfig::bar(),
        };
        let labels: Vec<&str> = chart.annotated().iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["50%", "70%"]);
        assert_eq!(chart.file_stem(), "LCBKK013_CumSubTotal_SENS_thick");

        chart.runs.truncate(1);
        assert_eq!(chart.annotated().len(), 1);
        chart.runs.clear();
        assert!(chart.annotated().is_empty());
    }
}
