use std::ops::Range;

/// Pixel position on a drawing area.
pub type BackendCoord = (i32, i32);

/// Geographic window of a map, in decimal degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct MapExtent {
    pub lon: Range<f64>,
    pub lat: Range<f64>,
}

impl MapExtent {
    /// Bangkok and the upper Gulf of Thailand.
    pub fn bangkok() -> MapExtent {
        MapExtent {
            lon: 100.3..100.8,
            lat: 13.4..14.0,
        }
    }

    pub fn contains(&self, (lon, lat): (f64, f64)) -> bool {
        self.lon.start <= lon && lon <= self.lon.end && self.lat.start <= lat && lat <= self.lat.end
    }

    /// Multiples of `step` inside `range`, e.g. graticule positions.
    pub fn ticks(range: &Range<f64>, step: f64) -> Vec<f64> {
        let first = (range.start / step).ceil() as i64;
        let last = (range.end / step).floor() as i64;
        (first..=last).map(|i| i as f64 * step).collect()
    }
}

/// Cylindrical projection of a map extent onto a pixel rectangle: degrees
/// map linearly to pixels, north up.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub extent: MapExtent,
    pub x_px: Range<i32>,
    pub y_px: Range<i32>,
}

impl Projection {
    pub fn new(extent: MapExtent, x_px: Range<i32>, y_px: Range<i32>) -> Projection {
        Projection { extent, x_px, y_px }
    }

    /// Pixels per degree of longitude.
    pub fn x_scale(&self) -> f64 {
        (self.x_px.end - self.x_px.start) as f64 / (self.extent.lon.end - self.extent.lon.start)
    }

    /// Pixels per degree of latitude.
    pub fn y_scale(&self) -> f64 {
        (self.y_px.end - self.y_px.start) as f64 / (self.extent.lat.end - self.extent.lat.start)
    }

    pub fn project_f(&self, (lon, lat): (f64, f64)) -> (f64, f64) {
        let x = self.x_px.start as f64 + (lon - self.extent.lon.start) * self.x_scale();
        let y = self.y_px.end as f64 - (lat - self.extent.lat.start) * self.y_scale();
        (x, y)
    }

    pub fn project(&self, point: (f64, f64)) -> BackendCoord {
        let (x, y) = self.project_f(point);
        (x.round() as i32, y.round() as i32)
    }

    /// A length in map units (degrees of longitude) in pixels.
    pub fn length(&self, map_units: f64) -> f64 {
        map_units * self.x_scale()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projection() -> Projection {
        Projection::new(MapExtent::bangkok(), 100..600, 50..650)
    }

    #[test]
    fn test_corners_project_onto_pixel_rectangle() {
        let p = projection();
        assert_eq!(p.project((100.3, 13.4)), (100, 650));
        assert_eq!(p.project((100.8, 14.0)), (600, 50));
        assert_eq!(p.project((100.55, 13.7)), (350, 350));
    }

    #[test]
    fn test_length_in_pixels() {
        let p = projection();
        // 500 px over half a degree
        assert!((p.length(0.018) - 18.0).abs() < 1e-9);
    }

    #[test]
    fn test_graticule_ticks() {
        let extent = MapExtent::bangkok();
        assert_eq!(MapExtent::ticks(&extent.lat, 0.5), vec![13.5, 14.0]);
        assert_eq!(MapExtent::ticks(&extent.lon, 0.25), vec![100.5, 100.75]);
        assert!(extent.contains((100.5, 13.7)));
        assert!(!extent.contains((101.0, 13.7)));
    }
}
