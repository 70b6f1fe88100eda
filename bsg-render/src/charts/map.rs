use crate::canvas::{Basemap, MapCanvas};
use crate::colormap::ColorScale;
use crate::dispatch::{render, LegendSpec, SpatialLayer};
use crate::figure::Figure;
use crate::projection::MapExtent;
use crate::style::StyleConfig;
use plotters::coord::Shift;
use plotters::prelude::*;

/// Where the gulf label sits, as a fraction of the map frame.
const GULF_LABEL_AT: (f64, f64) = (0.44, 0.05);

/// One spatial layer over a basemap.
#[derive(Debug, Clone)]
pub struct MapFigure<B: Basemap> {
    pub file_stem: String,
    pub basemap: B,
    pub extent: MapExtent,
    pub layer: SpatialLayer,
    pub scale: Option<ColorScale>,
    pub legend: LegendSpec,
    pub style: StyleConfig,
}

impl<B: Basemap> MapFigure<B> {
    /// A map with the defaults of the layer's mode.
    pub fn new(file_stem: String, basemap: B, layer: SpatialLayer, style: StyleConfig) -> MapFigure<B> {
        let mode = layer.mode();
        MapFigure {
            file_stem,
            basemap,
            extent: MapExtent::bangkok(),
            scale: mode.default_scale(),
            legend: LegendSpec::for_mode(mode),
            layer,
            style,
        }
    }
}

impl<B: Basemap> Figure for MapFigure<B> {
    fn file_stem(&self) -> String {
        self.file_stem.clone()
    }

    fn size(&self) -> (u32, u32) {
        self.style.canvas_size((3.2, 2.2))
    }

    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>) -> anyhow::Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let canvas = MapCanvas::new(root, self.extent.clone(), self.style, self.legend.colorbar.is_some())?;
        self.basemap.draw(&canvas)?;
        render(&canvas, &self.layer, self.scale.as_ref(), &self.legend)?;
        if self.layer.mode().annotates_gulf() {
            canvas.annotate("Gulf of Thailand", GULF_LABEL_AT, self.style.font_size)?;
        }
        Ok(())
    }
}
