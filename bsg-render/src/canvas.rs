//! The shared map canvas and the basemap drawn underneath every layer.

use crate::colormap::named::{LAND, OCEAN};
use crate::projection::{BackendCoord, MapExtent, Projection};
use crate::style::StyleConfig;
use crate::wedge::Sector;
use bsg_core::boundary::BoundaryLine;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

/// Margins around the map frame, in points (left, right, top, bottom).
const FRAME_MARGINS: (f64, f64, f64, f64) = (26.0, 6.0, 6.0, 14.0);

/// Share of the canvas width given to the map when a colorbar is drawn.
const MAP_WIDTH_SHARE: f64 = 0.8;

/// A map drawing surface: the map area with its projection and an
/// optional side area for a colorbar. All drawing happens in pixel space
/// of the map area.
pub struct MapCanvas<DB: DrawingBackend> {
    area: DrawingArea<DB, Shift>,
    side: Option<DrawingArea<DB, Shift>>,
    projection: Projection,
    style: StyleConfig,
}

impl<DB> MapCanvas<DB>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    pub fn new(
        root: &DrawingArea<DB, Shift>,
        extent: MapExtent,
        style: StyleConfig,
        with_colorbar: bool,
    ) -> anyhow::Result<MapCanvas<DB>> {
        root.fill(&WHITE)?;
        let (width, _) = root.dim_in_pixel();
        let (area, side) = if with_colorbar {
            let (map, side) = root.split_horizontally((width as f64 * MAP_WIDTH_SHARE) as i32);
            (map, Some(side))
        } else {
            (root.clone(), None)
        };
        let projection = fit_extent(&area, extent, &style);
        Ok(MapCanvas {
            area,
            side,
            projection,
            style,
        })
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn area(&self) -> &DrawingArea<DB, Shift> {
        &self.area
    }

    pub fn side(&self) -> Option<&DrawingArea<DB, Shift>> {
        self.side.as_ref()
    }

    /// Upper-left and lower-right pixel of the map frame.
    pub fn frame(&self) -> (BackendCoord, BackendCoord) {
        (
            (self.projection.x_px.start, self.projection.y_px.start),
            (self.projection.x_px.end, self.projection.y_px.end),
        )
    }

    pub fn project(&self, point: (f64, f64)) -> BackendCoord {
        self.projection.project(point)
    }

    /// Pixel position of a point given in fractions of the map frame,
    /// measured from the lower-left corner.
    pub fn frame_fraction(&self, (fx, fy): (f64, f64)) -> BackendCoord {
        let (x0, y0) = (self.projection.x_px.start as f64, self.projection.y_px.start as f64);
        let (x1, y1) = (self.projection.x_px.end as f64, self.projection.y_px.end as f64);
        (
            (x0 + fx * (x1 - x0)).round() as i32,
            (y1 - fy * (y1 - y0)).round() as i32,
        )
    }

    pub fn fill_frame(&self, color: &RGBColor) -> anyhow::Result<()> {
        let (upper_left, lower_right) = self.frame();
        self.area
            .draw(&Rectangle::new([upper_left, lower_right], color.filled()))?;
        Ok(())
    }

    pub fn outline_frame(&self) -> anyhow::Result<()> {
        let (upper_left, lower_right) = self.frame();
        self.area.draw(&Rectangle::new(
            [upper_left, lower_right],
            BLACK.stroke_width(self.style.stroke(0.8)),
        ))?;
        Ok(())
    }

    /// A filled polygon given in (longitude, latitude).
    pub fn fill_polygon(&self, points: &[(f64, f64)], color: &RGBColor) -> anyhow::Result<()> {
        let pixels: Vec<BackendCoord> = points.iter().map(|p| self.project(*p)).collect();
        self.area.draw(&Polygon::new(pixels, color.filled()))?;
        Ok(())
    }

    /// A line given in (longitude, latitude); `width` in points.
    pub fn polyline(&self, points: &[(f64, f64)], color: RGBAColor, width: f64) -> anyhow::Result<()> {
        let pixels: Vec<BackendCoord> = points.iter().map(|p| self.project(*p)).collect();
        self.area.draw(&PathElement::new(
            pixels,
            color.stroke_width(self.style.stroke(width)),
        ))?;
        Ok(())
    }

    /// A circle marker whose size is given as a marker area in points
    /// squared, with a black edge.
    pub fn marker(&self, point: (f64, f64), area_pt2: f64, fill: &RGBColor, edge_width: f64) -> anyhow::Result<()> {
        let center = self.project(point);
        let radius = self.style.px((area_pt2 / std::f64::consts::PI).sqrt()).round() as i32;
        self.area.draw(&Circle::new(center, radius, fill.filled()))?;
        self.area.draw(&Circle::new(
            center,
            radius,
            BLACK.stroke_width(self.style.stroke(edge_width)),
        ))?;
        Ok(())
    }

    /// One wedge of a partitioned marker; `radius` is in map units.
    pub fn wedge(&self, point: (f64, f64), radius: f64, sector: &Sector, fill: &RGBColor) -> anyhow::Result<()> {
        let center = self.projection.project_f(point);
        let radius = self.projection.length(radius);
        draw_wedge(&self.area, center, radius, sector, fill, self.style.stroke(0.5))
    }

    pub fn text(&self, text: &str, pos: BackendCoord, style: &TextStyle) -> anyhow::Result<()> {
        self.area.draw_text(text, style, pos)?;
        Ok(())
    }

    /// Text anchored at its lower-left corner at a frame fraction.
    pub fn annotate(&self, text: &str, fraction: (f64, f64), size: f64) -> anyhow::Result<()> {
        let style = self
            .style
            .text(size, &BLACK)
            .pos(Pos::new(HPos::Left, VPos::Bottom));
        self.text(text, self.frame_fraction(fraction), &style)
    }
}

/// Filled wedge with a black outline around a pixel center.
pub fn draw_wedge<DB>(
    area: &DrawingArea<DB, Shift>,
    center: (f64, f64),
    radius: f64,
    sector: &Sector,
    fill: &RGBColor,
    edge: u32,
) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let outline = sector.polygon(center, radius);
    area.draw(&Polygon::new(outline.clone(), fill.filled()))?;
    let mut closed = outline;
    if let Some(first) = closed.first().copied() {
        closed.push(first);
    }
    area.draw(&PathElement::new(closed, BLACK.stroke_width(edge)))?;
    Ok(())
}

/// Largest frame with equal scale on both axes that fits inside the
/// margins, centered in the area.
fn fit_extent<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, extent: MapExtent, style: &StyleConfig) -> Projection {
    let (width, height) = area.dim_in_pixel();
    let (left, right, top, bottom) = FRAME_MARGINS;
    let avail_w = (width as f64 - style.px(left) - style.px(right)).max(1.0);
    let avail_h = (height as f64 - style.px(top) - style.px(bottom)).max(1.0);
    let d_lon = extent.lon.end - extent.lon.start;
    let d_lat = extent.lat.end - extent.lat.start;
    let scale = (avail_w / d_lon).min(avail_h / d_lat);
    let (frame_w, frame_h) = (d_lon * scale, d_lat * scale);
    let x0 = style.px(left) + (avail_w - frame_w) / 2.0;
    let y0 = style.px(top) + (avail_h - frame_h) / 2.0;
    Projection::new(
        extent,
        x0.round() as i32..(x0 + frame_w).round() as i32,
        y0.round() as i32..(y0 + frame_h).round() as i32,
    )
}

/// The "draw on projected x/y" capability underneath every map layer.
pub trait Basemap {
    fn draw<DB>(&self, canvas: &MapCanvas<DB>) -> anyhow::Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static;
}

/// Coarse shoreline of the upper Gulf of Thailand, west to east.
pub const COASTLINE: [(f64, f64); 9] = [
    (100.30, 13.47),
    (100.38, 13.49),
    (100.45, 13.52),
    (100.50, 13.50),
    (100.55, 13.53),
    (100.60, 13.55),
    (100.65, 13.54),
    (100.72, 13.51),
    (100.80, 13.47),
];

/// Ocean and land fill, coastline, optional boundary lines and a labelled
/// graticule.
#[derive(Debug, Clone)]
pub struct DefaultBasemap {
    pub coastline: Vec<(f64, f64)>,
    pub boundaries: Vec<BoundaryLine>,
    /// Degrees between parallels
    pub parallel_step: f64,
    /// Degrees between meridians
    pub meridian_step: f64,
}

impl Default for DefaultBasemap {
    fn default() -> Self {
        DefaultBasemap {
            coastline: COASTLINE.to_vec(),
            boundaries: Vec::new(),
            parallel_step: 0.5,
            meridian_step: 0.25,
        }
    }
}

impl DefaultBasemap {
    pub fn with_boundaries(boundaries: Vec<BoundaryLine>) -> DefaultBasemap {
        DefaultBasemap {
            boundaries,
            ..DefaultBasemap::default()
        }
    }
}

impl Basemap for DefaultBasemap {
    fn draw<DB>(&self, canvas: &MapCanvas<DB>) -> anyhow::Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let extent = canvas.projection().extent.clone();
        canvas.fill_frame(&OCEAN)?;
        if self.coastline.len() > 1 {
            let mut land = self.coastline.clone();
            land.push((extent.lon.end, extent.lat.end));
            land.push((extent.lon.start, extent.lat.end));
            canvas.fill_polygon(&land, &LAND)?;
            canvas.polyline(&self.coastline, BLACK.to_rgba(), 1.0)?;
        }
        for boundary in &self.boundaries {
            canvas.polyline(&boundary.points, BLACK.to_rgba(), 0.5)?;
        }

        let style = *canvas.style();
        let grid = BLACK.mix(0.4);
        let ticks = style.tick_font();
        let (upper_left, lower_right) = canvas.frame();
        let gap = style.px(2.0).round() as i32;
        for lat in MapExtent::ticks(&extent.lat, self.parallel_step) {
            canvas.polyline(&[(extent.lon.start, lat), (extent.lon.end, lat)], grid, 0.3)?;
            let (_, y) = canvas.project((extent.lon.start, lat));
            let label = ticks.pos(Pos::new(HPos::Right, VPos::Center));
            canvas.text(&format!("{:.1}°N", lat), (upper_left.0 - gap, y), &label)?;
        }
        for lon in MapExtent::ticks(&extent.lon, self.meridian_step) {
            canvas.polyline(&[(lon, extent.lat.start), (lon, extent.lat.end)], grid, 0.3)?;
            let (x, _) = canvas.project((lon, extent.lat.start));
            let label = ticks.pos(Pos::new(HPos::Center, VPos::Top));
            canvas.text(&format!("{:.2}°E", lon), (x, lower_right.1 + gap), &label)?;
        }
        canvas.outline_frame()
    }
}
