//! Figures and how they reach disk.

use anyhow::Context;
use log::{debug, info};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::{Path, PathBuf};

/// Something drawable onto any plotters backend.
pub trait Figure {
    /// Output file name without extension.
    fn file_stem(&self) -> String;

    /// Canvas size in pixels.
    fn size(&self) -> (u32, u32);

    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>) -> anyhow::Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static;
}

/// Write `<stem>.png` and `<stem>.svg` into `dir`.
pub fn save_figure<F: Figure>(figure: &F, dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let stem = figure.file_stem();

    let png = dir.join(format!("{}.png", stem));
    {
        let root = BitMapBackend::new(&png, figure.size()).into_drawing_area();
        figure
            .draw(&root)
            .with_context(|| format!("drawing {}", png.display()))?;
        root.present()
            .with_context(|| format!("writing {}", png.display()))?;
    }

    let svg = dir.join(format!("{}.svg", stem));
    {
        let root = SVGBackend::new(&svg, figure.size()).into_drawing_area();
        figure
            .draw(&root)
            .with_context(|| format!("drawing {}", svg.display()))?;
        root.present()
            .with_context(|| format!("writing {}", svg.display()))?;
    }

    info!("saved {} (png, svg)", dir.join(&stem).display());
    Ok(vec![png, svg])
}

/// Draw into an in-memory SVG document.
pub fn render_svg_string<F: Figure>(figure: &F) -> anyhow::Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, figure.size()).into_drawing_area();
        figure.draw(&root)?;
        root.present()?;
    }
    Ok(svg)
}

/// Save when a directory is given, otherwise render in memory so drawing
/// errors still surface.
pub fn emit<F: Figure>(figure: &F, save_dir: Option<&Path>) -> anyhow::Result<Vec<PathBuf>> {
    match save_dir {
        Some(dir) => save_figure(figure, dir),
        None => {
            let svg = render_svg_string(figure)?;
            debug!("rendered {} ({} bytes, not saved)", figure.file_stem(), svg.len());
            Ok(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Square;

    impl Figure for Square {
        fn file_stem(&self) -> String {
            "square".to_string()
        }

        fn size(&self) -> (u32, u32) {
            (40, 30)
        }

        fn draw<DB>(&self, root: &DrawingArea<DB, Shift>) -> anyhow::Result<()>
        where
            DB: DrawingBackend,
            DB::ErrorType: 'static,
        {
            root.fill(&WHITE)?;
            root.draw(&Rectangle::new([(5, 5), (20, 20)], RED.filled()))?;
            Ok(())
        }
    }

    #[test]
    fn test_render_svg_string() {
        let svg = render_svg_string(&Square).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("<rect"));
    }

    #[test]
    fn test_save_figure_writes_both_formats() {
        let dir = std::env::temp_dir().join(format!("bsg-figure-{}", std::process::id()));
        let written = save_figure(&Square, &dir).unwrap();
        assert_eq!(written.len(), 2);
        assert!(written.iter().all(|path| path.exists()));
        assert_eq!(written[1].extension().and_then(|e| e.to_str()), Some("svg"));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_emit_without_directory_writes_nothing() {
        assert!(emit(&Square, None).unwrap().is_empty());
    }
}
