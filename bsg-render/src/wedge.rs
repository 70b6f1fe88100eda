//! Angular partition of a point marker into one wedge per group.
//!
//! Angles are in degrees, counter-clockwise from east (0 at three
//! o'clock, 90 at noon). The first group takes the sector right after
//! noon and each following group sits one sector further clockwise.

use crate::projection::BackendCoord;

const FIRST_SECTOR_START: f64 = 90.0;

/// Largest angular step between two arc vertices.
const ARC_STEP: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sector {
    /// Start angle in [0, 360)
    pub start: f64,
    pub sweep: f64,
}

impl Sector {
    /// End angle; may exceed 360 when the sector crosses east.
    pub fn end(&self) -> f64 {
        self.start + self.sweep
    }

    /// Outline of the wedge around a pixel center, north up: the center
    /// followed by the arc from start to end.
    pub fn polygon(&self, center: (f64, f64), radius: f64) -> Vec<BackendCoord> {
        let steps = (self.sweep / ARC_STEP).ceil().max(1.0) as usize;
        let mut points = Vec::with_capacity(steps + 2);
        points.push((center.0.round() as i32, center.1.round() as i32));
        for i in 0..=steps {
            let theta = (self.start + self.sweep * i as f64 / steps as f64).to_radians();
            let x = center.0 + radius * theta.cos();
            let y = center.1 - radius * theta.sin();
            points.push((x.round() as i32, y.round() as i32));
        }
        points
    }
}

/// Sectors of an `n`-way partition, one per group in group order.
pub fn sectors_for(n: usize) -> Vec<Sector> {
    if n == 0 {
        return Vec::new();
    }
    let sweep = 360.0 / n as f64;
    (0..n)
        .map(|i| Sector {
            start: (FIRST_SECTOR_START - i as f64 * sweep).rem_euclid(360.0),
            sweep,
        })
        .collect()
}
