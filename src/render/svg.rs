//! SVG generation

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, Event};

use crate::errors::OutputError;
use crate::style::Color;
use crate::types::{CanvasSize, fmt_num};

use super::OutputKind;
use super::context::{PathSegment, Stroke};
use super::surface::{Backend, Rendered};

#[derive(Debug, Clone, PartialEq)]
enum PathPaint {
    Fill(Color),
    Stroke(Stroke),
}

/// One `<path>` element
#[derive(Debug, Clone, PartialEq)]
struct SvgPath {
    data: String,
    paint: PathPaint,
}

/// Collects painted paths, serialized as one `<svg>` document on finish.
#[derive(Debug)]
pub struct SvgSurface {
    size: CanvasSize,
    paths: Vec<SvgPath>,
}

/// `M60 300L540 300` style path data
pub fn path_data(path: &[PathSegment]) -> String {
    let mut d = String::new();
    for seg in path {
        match *seg {
            PathSegment::MoveTo(p) => d.push_str(&format!("M{} {}", fmt_num(p.x), fmt_num(p.y))),
            PathSegment::LineTo(p) => d.push_str(&format!("L{} {}", fmt_num(p.x), fmt_num(p.y))),
            PathSegment::CubicTo(c1, c2, p) => d.push_str(&format!(
                "C{} {} {} {} {} {}",
                fmt_num(c1.x),
                fmt_num(c1.y),
                fmt_num(c2.x),
                fmt_num(c2.y),
                fmt_num(p.x),
                fmt_num(p.y)
            )),
            PathSegment::Close => d.push('Z'),
        }
    }
    d
}

fn encode_error(e: impl std::fmt::Display) -> OutputError {
    OutputError::Encode {
        format: OutputKind::Svg,
        message: e.to_string(),
    }
}

impl SvgSurface {
    pub fn new(size: CanvasSize) -> Self {
        SvgSurface {
            size,
            paths: Vec::new(),
        }
    }

    pub fn finish(self) -> Result<Rendered, OutputError> {
        let mut writer = Writer::new(Vec::new());

        let width = fmt_num(self.size.width);
        let height = fmt_num(self.size.height);
        let view_box = format!("0 0 {} {}", width, height);
        let mut svg = BytesStart::new("svg");
        svg.push_attribute(("xmlns", "http://www.w3.org/2000/svg"));
        svg.push_attribute(("width", width.as_str()));
        svg.push_attribute(("height", height.as_str()));
        svg.push_attribute(("viewBox", view_box.as_str()));
        writer.write_event(Event::Start(svg)).map_err(encode_error)?;

        for path in &self.paths {
            let mut el = BytesStart::new("path");
            el.push_attribute(("d", path.data.as_str()));
            for (key, value) in paint_attributes(&path.paint) {
                el.push_attribute((key, value.as_str()));
            }
            writer.write_event(Event::Empty(el)).map_err(encode_error)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new("svg")))
            .map_err(encode_error)?;

        Ok(Rendered::Encoded {
            kind: OutputKind::Svg,
            bytes: writer.into_inner(),
        })
    }

    #[cfg(test)]
    pub(crate) fn commands(&self) -> Vec<String> {
        self.paths
            .iter()
            .map(|p| match &p.paint {
                PathPaint::Fill(color) => format!("fill {} {}", p.data, color),
                PathPaint::Stroke(s) => format!(
                    "stroke {} {} w{} {}",
                    p.data,
                    s.color,
                    fmt_num(s.width),
                    s.cap.as_str()
                ),
            })
            .collect()
    }
}

fn paint_attributes(paint: &PathPaint) -> Vec<(&'static str, String)> {
    let mut attrs = Vec::new();
    match paint {
        PathPaint::Fill(color) => {
            attrs.push(("fill", color.to_string()));
            if color.alpha() < 1.0 {
                attrs.push(("fill-opacity", fmt_num(color.alpha())));
            }
        }
        PathPaint::Stroke(stroke) => {
            attrs.push(("fill", "none".to_string()));
            attrs.push(("stroke", stroke.color.to_string()));
            if stroke.color.alpha() < 1.0 {
                attrs.push(("stroke-opacity", fmt_num(stroke.color.alpha())));
            }
            attrs.push(("stroke-width", fmt_num(stroke.width)));
            attrs.push(("stroke-linecap", stroke.cap.as_str().to_string()));
        }
    }
    attrs
}

impl Backend for SvgSurface {
    fn fill_path(&mut self, path: &[PathSegment], color: Color) {
        self.paths.push(SvgPath {
            data: path_data(path),
            paint: PathPaint::Fill(color),
        });
    }

    fn stroke_path(&mut self, path: &[PathSegment], stroke: &Stroke) {
        self.paths.push(SvgPath {
            data: path_data(path),
            paint: PathPaint::Stroke(*stroke),
        });
    }
}
