use plotters::style::{FontDesc, FontFamily, FontStyle, RGBColor, TextStyle};

/// Output resolution and font sizes (in points) for one group of figures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleConfig {
    pub dpi: f64,
    /// Default text, annotations
    pub font_size: f64,
    pub title_size: f64,
    /// Axis descriptions
    pub label_size: f64,
    pub tick_size: f64,
    pub legend_size: f64,
}

impl Default for StyleConfig {
    fn default() -> Self {
        StyleConfig {
            dpi: 300.0,
            font_size: 10.0,
            title_size: 10.0,
            label_size: 6.0,
            tick_size: 6.0,
            legend_size: 6.0,
        }
    }
}

impl StyleConfig {
    /// Annual subsidence bars and sensitivity lines.
    pub fn bar() -> StyleConfig {
        StyleConfig {
            font_size: 12.0,
            title_size: 12.0,
            label_size: 6.0,
            tick_size: 6.0,
            legend_size: 8.0,
            ..StyleConfig::default()
        }
    }

    /// Forecast lines and maps.
    pub fn forecast() -> StyleConfig {
        StyleConfig {
            font_size: 5.0,
            title_size: 6.0,
            label_size: 6.0,
            tick_size: 6.0,
            legend_size: 6.0,
            ..StyleConfig::default()
        }
    }

    /// Groundwater model panels.
    pub fn groundwater() -> StyleConfig {
        StyleConfig::default()
    }

    /// Points to pixels at this resolution.
    pub fn px(&self, points: f64) -> f64 {
        points * self.dpi / 72.0
    }

    /// Stroke width in pixels for a line width in points, at least one.
    pub fn stroke(&self, points: f64) -> u32 {
        self.px(points).round().max(1.0) as u32
    }

    /// Canvas size in pixels for a figure size in inches.
    pub fn canvas_size(&self, inches: (f64, f64)) -> (u32, u32) {
        (
            (inches.0 * self.dpi).round() as u32,
            (inches.1 * self.dpi).round() as u32,
        )
    }

    pub fn font(&self, points: f64) -> FontDesc<'static> {
        FontDesc::new(FontFamily::SansSerif, self.px(points), FontStyle::Normal)
    }

    pub fn bold(&self, points: f64) -> FontDesc<'static> {
        FontDesc::new(FontFamily::SansSerif, self.px(points), FontStyle::Bold)
    }

    pub fn text(&self, points: f64, color: &RGBColor) -> TextStyle<'static> {
        self.font(points).color(color)
    }

    pub fn tick_font(&self) -> TextStyle<'static> {
        self.font(self.tick_size).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_to_pixels() {
        let style = StyleConfig::default();
        assert_eq!(style.px(72.0), 300.0);
        assert_eq!(style.canvas_size((3.2, 2.2)), (960, 660));
        assert_eq!(style.stroke(0.1), 1);
    }

    #[test]
    fn test_presets() {
        assert_eq!(StyleConfig::bar().legend_size, 8.0);
        assert_eq!(StyleConfig::forecast().font_size, 5.0);
        assert_eq!(StyleConfig::groundwater().title_size, 10.0);
    }
}
