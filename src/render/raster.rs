//! Raster output: PNG, JPEG and pixels for direct display

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Rgba, RgbaImage};
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Transform};

use crate::errors::OutputError;
use crate::style::{Color, LineCap};
use crate::types::CanvasSize;

use super::OutputKind;
use super::defaults;
use super::context::{PathSegment, Stroke};
use super::surface::{Backend, Rendered};

/// Anti-aliased pixmap surface. Starts fully transparent.
pub struct RasterSurface {
    pixmap: Pixmap,
    kind: OutputKind,
}

fn skia_path(path: &[PathSegment]) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for seg in path {
        match *seg {
            PathSegment::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathSegment::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathSegment::CubicTo(c1, c2, p) => pb.cubic_to(
                c1.x as f32,
                c1.y as f32,
                c2.x as f32,
                c2.y as f32,
                p.x as f32,
                p.y as f32,
            ),
            PathSegment::Close => pb.close(),
        }
    }
    pb.finish()
}

fn skia_paint(color: Color) -> Paint<'static> {
    let [r, g, b, a] = color.to_rgba8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

fn skia_cap(cap: LineCap) -> tiny_skia::LineCap {
    match cap {
        LineCap::Butt => tiny_skia::LineCap::Butt,
        LineCap::Round => tiny_skia::LineCap::Round,
        LineCap::Square => tiny_skia::LineCap::Square,
    }
}

impl RasterSurface {
    pub fn new(size: CanvasSize, kind: OutputKind) -> Result<Self, OutputError> {
        let (width, height) = size.pixels();
        let pixmap = Pixmap::new(width, height).ok_or(OutputError::Surface { width, height })?;
        Ok(RasterSurface { pixmap, kind })
    }

    /// Straight (non-premultiplied) RGBA pixels
    fn image(&self) -> RgbaImage {
        let mut image = RgbaImage::new(self.pixmap.width(), self.pixmap.height());
        for (dst, src) in image.pixels_mut().zip(self.pixmap.pixels()) {
            let c = src.demultiply();
            *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }
        image
    }

    pub fn finish(self) -> Result<Rendered, OutputError> {
        let kind = self.kind;
        let encode_error = |e: &dyn std::fmt::Display| OutputError::Encode {
            format: kind,
            message: e.to_string(),
        };
        match kind {
            OutputKind::Png => {
                let bytes = self.pixmap.encode_png().map_err(|e| encode_error(&e))?;
                Ok(Rendered::Encoded { kind, bytes })
            }
            OutputKind::Jpg => {
                // JPEG has no alpha channel
                let rgb = DynamicImage::ImageRgba8(self.image()).to_rgb8();
                let mut bytes = Vec::new();
                let encoder = JpegEncoder::new_with_quality(&mut bytes, defaults::JPEG_QUALITY);
                rgb.write_with_encoder(encoder).map_err(|e| encode_error(&e))?;
                Ok(Rendered::Encoded { kind, bytes })
            }
            _ => Ok(Rendered::Image(self.image())),
        }
    }
}

impl Backend for RasterSurface {
    fn fill_path(&mut self, path: &[PathSegment], color: Color) {
        let Some(path) = skia_path(path) else { return };
        self.pixmap.fill_path(
            &path,
            &skia_paint(color),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }

    fn stroke_path(&mut self, path: &[PathSegment], stroke: &Stroke) {
        let Some(path) = skia_path(path) else { return };
        let style = tiny_skia::Stroke {
            width: stroke.width as f32,
            line_cap: skia_cap(stroke.cap),
            ..tiny_skia::Stroke::default()
        };
        self.pixmap.stroke_path(
            &path,
            &skia_paint(stroke.color),
            &style,
            Transform::identity(),
            None,
        );
    }
}
