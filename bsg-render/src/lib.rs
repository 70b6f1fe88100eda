//! Figures for subsidence and groundwater results, drawn with plotters.
//!
//! Maps are drawn in the pixel space of a [`canvas::MapCanvas`]: a basemap
//! first, then one [`dispatch::SpatialLayer`] whose mode picks the glyphs,
//! the color scale and the legend. Line and bar charts implement
//! [`figure::Figure`] directly. Every figure can be saved as PNG and SVG or
//! rendered in memory.

pub mod canvas;
pub mod charts;
pub mod colormap;
pub mod dispatch;
pub mod error;
pub mod figure;
pub mod legend;
pub mod projection;
pub mod style;
pub mod wedge;
