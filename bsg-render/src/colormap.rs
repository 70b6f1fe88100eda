//! Continuous color maps and the named colors the figures use.

use bsg_utils::stats::min_max;
use plotters::style::RGBColor;
use std::f64::consts::PI;

pub mod named {
    use plotters::style::RGBColor;

    pub const TAB_BLUE: RGBColor = RGBColor(31, 119, 180);
    pub const TAB_ORANGE: RGBColor = RGBColor(255, 127, 14);
    pub const TAB_GREEN: RGBColor = RGBColor(44, 160, 44);
    pub const TAB_RED: RGBColor = RGBColor(214, 39, 40);
    pub const TAB_PURPLE: RGBColor = RGBColor(148, 103, 189);
    pub const MEDIUM_ORCHID: RGBColor = RGBColor(186, 85, 211);
    pub const TEAL: RGBColor = RGBColor(0, 128, 128);
    pub const CYAN: RGBColor = RGBColor(0, 255, 255);
    pub const GREY: RGBColor = RGBColor(128, 128, 128);
    pub const OCEAN: RGBColor = RGBColor(0xc1, 0xd4, 0xec);
    pub const LAND: RGBColor = RGBColor(0x4d, 0x9c, 0x83);
}

const COOLWARM: [(u8, u8, u8); 5] = [
    (58, 76, 192),
    (130, 165, 251),
    (221, 220, 219),
    (244, 154, 123),
    (180, 4, 38),
];

const PLASMA: [(u8, u8, u8); 5] = [
    (13, 8, 135),
    (126, 3, 168),
    (204, 71, 120),
    (248, 149, 64),
    (240, 249, 33),
];

const RD_YL_BU_R: [(u8, u8, u8); 11] = [
    (49, 54, 149),
    (69, 117, 180),
    (116, 173, 209),
    (171, 217, 233),
    (224, 243, 248),
    (255, 255, 191),
    (254, 224, 144),
    (253, 174, 97),
    (244, 109, 67),
    (215, 48, 39),
    (165, 0, 38),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMap {
    /// Diverging blue to red
    Coolwarm,
    /// Sequential purple to yellow
    Plasma,
    /// Diverging blue to red through yellow
    RdYlBuR,
    Rainbow,
}

impl ColorMap {
    /// Color at `x` in [0, 1]; values outside are clamped.
    pub fn at(&self, x: f64) -> RGBColor {
        let x = if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) };
        match self {
            ColorMap::Coolwarm => interpolate(&COOLWARM, x),
            ColorMap::Plasma => interpolate(&PLASMA, x),
            ColorMap::RdYlBuR => interpolate(&RD_YL_BU_R, x),
            ColorMap::Rainbow => {
                let r = (2.0 * x - 0.5).abs();
                let g = (PI * x).sin();
                let b = (PI * x / 2.0).cos();
                RGBColor(channel(r), channel(g), channel(b))
            }
        }
    }

    /// `n` colors evenly spaced from one end of the map to the other.
    pub fn sample(&self, n: usize) -> Vec<RGBColor> {
        match n {
            0 => Vec::new(),
            1 => vec![self.at(0.0)],
            _ => (0..n)
                .map(|i| self.at(i as f64 / (n - 1) as f64))
                .collect(),
        }
    }
}

fn channel(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn interpolate(anchors: &[(u8, u8, u8)], x: f64) -> RGBColor {
    let last = anchors.len() - 1;
    let pos = x * last as f64;
    let i = (pos.floor() as usize).min(last - 1);
    let t = pos - i as f64;
    let (a, b) = (anchors[i], anchors[i + 1]);
    let mix = |p: u8, q: u8| (p as f64 + (q as f64 - p as f64) * t).round() as u8;
    RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

/// Limits of a color scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Clim {
    Fixed(f64, f64),
    /// Span the values drawn
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    pub map: ColorMap,
    pub clim: Clim,
}

impl ColorScale {
    pub fn new(map: ColorMap, clim: Clim) -> ColorScale {
        ColorScale { map, clim }
    }

    /// Concrete limits for a set of values. A degenerate span is widened so
    /// that the scale stays invertible.
    pub fn limits(&self, values: &[f64]) -> (f64, f64) {
        let (lo, hi) = match self.clim {
            Clim::Fixed(lo, hi) => (lo, hi),
            Clim::Auto => min_max(values).unwrap_or((0.0, 1.0)),
        };
        if hi > lo {
            (lo, hi)
        } else {
            (lo - 0.5, lo + 0.5)
        }
    }

    pub fn color(&self, value: f64, limits: (f64, f64)) -> RGBColor {
        let (lo, hi) = limits;
        self.map.at((value - lo) / (hi - lo))
    }
}
