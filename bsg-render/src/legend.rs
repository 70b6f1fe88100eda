//! Proxy legends: a miniature partitioned marker with one labelled
//! swatch per group, and the colorbar beside a map.

use crate::canvas::{draw_wedge, MapCanvas};
use crate::colormap::ColorScale;
use crate::wedge::{sectors_for, Sector};
use bsg_core::scenario::PumpingScenario;
use bsg_core::well_nest::WellKind;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontTransform;

/// Swatch colors of the four aquifers, in BK, PD, NL, NB order.
pub fn well_kind_color(kind: WellKind) -> RGBColor {
    match kind {
        WellKind::Bk => RGBColor(0x42, 0xBC, 0xFF),
        WellKind::Pd => RGBColor(0xFF, 0x83, 0x00),
        WellKind::Nl => RGBColor(0x00, 0x99, 0x14),
        WellKind::Nb => RGBColor(0xD3, 0x08, 0x08),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    UpperLeft,
    LowerLeft,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Swatch {
    pub color: RGBColor,
    pub label: String,
    pub sector: Sector,
}

/// One legend entry: a pie glyph whose sectors carry the group colors,
/// each labelled outside its sector.
#[derive(Debug, Clone, PartialEq)]
pub struct SwatchLegend {
    pub swatches: Vec<Swatch>,
    pub corner: Corner,
    /// Glyph radius in points
    pub radius: f64,
    /// Label size in points
    pub font_size: f64,
}

impl SwatchLegend {
    /// Pair each (color, label) with its sector of an n-way partition.
    pub fn new(entries: Vec<(RGBColor, String)>, corner: Corner, font_size: f64) -> SwatchLegend {
        let sectors = sectors_for(entries.len());
        let swatches = entries
            .into_iter()
            .zip(sectors)
            .map(|((color, label), sector)| Swatch {
                color,
                label,
                sector,
            })
            .collect();
        SwatchLegend {
            swatches,
            corner,
            radius: 5.0,
            font_size,
        }
    }

    pub fn well_kinds() -> SwatchLegend {
        let entries = WellKind::ALL
            .iter()
            .map(|kind| (well_kind_color(*kind), kind.code().to_string()))
            .collect();
        SwatchLegend::new(entries, Corner::UpperLeft, 5.0)
    }

    pub fn scenarios() -> SwatchLegend {
        let entries = PumpingScenario::ALL
            .iter()
            .map(|scenario| {
                let (r, g, b) = scenario.rgb();
                (RGBColor(r, g, b), scenario.short_label().to_string())
            })
            .collect();
        SwatchLegend::new(entries, Corner::LowerLeft, 4.0)
    }

    pub fn draw<DB>(&self, canvas: &MapCanvas<DB>) -> anyhow::Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let style = canvas.style();
        let radius = style.px(self.radius);
        let font_px = style.px(self.font_size);
        // no font metrics here: assume an average glyph is 0.55 em wide
        let widest = self
            .swatches
            .iter()
            .map(|swatch| swatch.label.chars().count())
            .max()
            .unwrap_or(0) as f64
            * 0.55
            * font_px;
        let label_gap = radius * 0.4;
        let half_w = radius + label_gap + widest;
        let half_h = radius + label_gap + font_px;
        let pad = style.px(3.0);
        let (upper_left, lower_right) = canvas.frame();
        let cx = upper_left.0 as f64 + pad + half_w;
        let cy = match self.corner {
            Corner::UpperLeft => upper_left.1 as f64 + pad + half_h,
            Corner::LowerLeft => lower_right.1 as f64 - pad - half_h,
        };
        let area = canvas.area();
        area.draw(&Rectangle::new(
            [
                ((cx - half_w).round() as i32, (cy - half_h).round() as i32),
                ((cx + half_w).round() as i32, (cy + half_h).round() as i32),
            ],
            WHITE.mix(0.8).filled(),
        ))?;
        for swatch in &self.swatches {
            draw_wedge(area, (cx, cy), radius, &swatch.sector, &swatch.color, style.stroke(0.5))?;
            let mid = (swatch.sector.start + swatch.sector.sweep / 2.0).to_radians();
            let (dx, dy) = (mid.cos(), -mid.sin());
            let anchor = Pos::new(
                if dx > 0.3 {
                    HPos::Left
                } else if dx < -0.3 {
                    HPos::Right
                } else {
                    HPos::Center
                },
                if dy > 0.3 {
                    VPos::Top
                } else if dy < -0.3 {
                    VPos::Bottom
                } else {
                    VPos::Center
                },
            );
            let at = (
                (cx + (radius + label_gap) * dx).round() as i32,
                (cy + (radius + label_gap) * dy).round() as i32,
            );
            canvas.text(&swatch.label, at, &style.text(self.font_size, &BLACK).pos(anchor))?;
        }
        Ok(())
    }
}

/// Number of gradient steps in a colorbar.
const COLORBAR_STEPS: usize = 64;

/// Vertical color gradient with ticks and a rotated label.
#[derive(Debug, Clone, PartialEq)]
pub struct Colorbar {
    pub label: String,
    pub scale: ColorScale,
    pub limits: (f64, f64),
}

impl Colorbar {
    pub fn ticks(&self) -> Vec<f64> {
        let (lo, hi) = self.limits;
        (0..5).map(|i| lo + (hi - lo) * i as f64 / 4.0).collect()
    }

    /// Draw into `area`, spanning the vertical extent `top..bottom` of
    /// the map frame.
    pub fn draw<DB>(
        &self,
        area: &DrawingArea<DB, Shift>,
        top: i32,
        bottom: i32,
        canvas_style: &crate::style::StyleConfig,
    ) -> anyhow::Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let (width, _) = area.dim_in_pixel();
        let x0 = (width as f64 * 0.08).round() as i32;
        let x1 = x0 + canvas_style.px(8.0).round() as i32;
        let height = (bottom - top).max(1) as f64;
        let (lo, hi) = self.limits;
        for i in 0..COLORBAR_STEPS {
            let f0 = i as f64 / COLORBAR_STEPS as f64;
            let f1 = (i + 1) as f64 / COLORBAR_STEPS as f64;
            let value = lo + (hi - lo) * (f0 + f1) / 2.0;
            let color = self.scale.color(value, self.limits);
            let y_hi = bottom - (f1 * height).round() as i32;
            let y_lo = bottom - (f0 * height).round() as i32;
            area.draw(&Rectangle::new([(x0, y_hi), (x1, y_lo)], color.filled()))?;
        }
        area.draw(&Rectangle::new(
            [(x0, top), (x1, bottom)],
            BLACK.stroke_width(canvas_style.stroke(0.5)),
        ))?;
        let tick_len = canvas_style.px(2.0).round() as i32;
        let tick_style = canvas_style.tick_font().pos(Pos::new(HPos::Left, VPos::Center));
        for tick in self.ticks() {
            let y = bottom - (((tick - lo) / (hi - lo)) * height).round() as i32;
            area.draw(&PathElement::new(
                vec![(x1, y), (x1 + tick_len, y)],
                BLACK.stroke_width(canvas_style.stroke(0.5)),
            ))?;
            area.draw_text(&format_tick(tick), &tick_style, (x1 + 2 * tick_len, y))?;
        }
        let label_style = canvas_style
            .font(canvas_style.tick_size + 1.0)
            .transform(FontTransform::Rotate270)
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Top));
        let label_x = x1 + canvas_style.px(22.0).round() as i32;
        area.draw_text(&self.label, &label_style, (label_x, (top + bottom) / 2))?;
        Ok(())
    }
}

fn format_tick(value: f64) -> String {
    if value.fract().abs() < 1e-9 {
        format!("{:.0}", value)
    } else if (value * 10.0).fract().abs() < 1e-9 {
        format!("{:.1}", value)
    } else {
        format!("{:.2}", value)
    }
}
