//! Drawing surfaces, one per output family

use enum_dispatch::enum_dispatch;
use image::RgbaImage;

use crate::errors::OutputError;
use crate::style::Color;
use crate::types::CanvasSize;

use super::OutputKind;
use super::context::{PathSegment, Stroke};
use super::postscript::PostScriptSurface;
use super::raster::RasterSurface;
use super::svg::SvgSurface;

/// Paint operations a surface must support. Paths arrive in device units.
#[enum_dispatch]
pub trait Backend {
    fn fill_path(&mut self, path: &[PathSegment], color: Color);
    fn stroke_path(&mut self, path: &[PathSegment], stroke: &Stroke);
}

#[enum_dispatch(Backend)]
pub enum Surface {
    Svg(SvgSurface),
    PostScript(PostScriptSurface),
    Raster(RasterSurface),
}

/// A finished drawing
#[derive(Debug)]
pub enum Rendered {
    /// Encoded file contents
    Encoded { kind: OutputKind, bytes: Vec<u8> },
    /// Pixels for direct display
    Image(RgbaImage),
}

impl Rendered {
    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            Rendered::Encoded { bytes, .. } => Some(bytes),
            Rendered::Image(_) => None,
        }
    }
}

impl Surface {
    /// Acquire a blank surface for `kind`
    pub fn create(kind: OutputKind, size: CanvasSize) -> Result<Surface, OutputError> {
        Ok(match kind {
            OutputKind::Svg => SvgSurface::new(size).into(),
            OutputKind::Ps => PostScriptSurface::new(size, false).into(),
            OutputKind::Eps => PostScriptSurface::new(size, true).into(),
            OutputKind::Png | OutputKind::Jpg | OutputKind::Display => {
                RasterSurface::new(size, kind)?.into()
            }
        })
    }

    pub fn finish(self) -> Result<Rendered, OutputError> {
        match self {
            Surface::Svg(s) => s.finish(),
            Surface::PostScript(s) => s.finish(),
            Surface::Raster(s) => s.finish(),
        }
    }
}
