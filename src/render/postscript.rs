//! PostScript and Encapsulated PostScript output.
//!
//! PostScript has no transparency; alpha is dropped.

use crate::errors::OutputError;
use crate::style::{Color, LineCap};
use crate::types::{CanvasSize, fmt_num};

use super::OutputKind;
use super::context::{PathSegment, Stroke};
use super::surface::{Backend, Rendered};

#[derive(Debug)]
pub struct PostScriptSurface {
    size: CanvasSize,
    encapsulated: bool,
    body: String,
}

fn set_color(body: &mut String, color: Color) {
    body.push_str(&format!(
        "{} {} {} setrgbcolor\n",
        fmt_num(color.r()),
        fmt_num(color.g()),
        fmt_num(color.b())
    ));
}

fn line_cap_code(cap: LineCap) -> u8 {
    match cap {
        LineCap::Butt => 0,
        LineCap::Round => 1,
        LineCap::Square => 2,
    }
}

fn trace(body: &mut String, path: &[PathSegment]) {
    body.push_str("newpath\n");
    for seg in path {
        let line = match *seg {
            PathSegment::MoveTo(p) => format!("{} {} moveto\n", fmt_num(p.x), fmt_num(p.y)),
            PathSegment::LineTo(p) => format!("{} {} lineto\n", fmt_num(p.x), fmt_num(p.y)),
            PathSegment::CubicTo(c1, c2, p) => format!(
                "{} {} {} {} {} {} curveto\n",
                fmt_num(c1.x),
                fmt_num(c1.y),
                fmt_num(c2.x),
                fmt_num(c2.y),
                fmt_num(p.x),
                fmt_num(p.y)
            ),
            PathSegment::Close => "closepath\n".to_string(),
        };
        body.push_str(&line);
    }
}

impl PostScriptSurface {
    pub fn new(size: CanvasSize, encapsulated: bool) -> Self {
        PostScriptSurface {
            size,
            encapsulated,
            body: String::new(),
        }
    }

    fn kind(&self) -> OutputKind {
        if self.encapsulated {
            OutputKind::Eps
        } else {
            OutputKind::Ps
        }
    }

    pub fn finish(self) -> Result<Rendered, OutputError> {
        let kind = self.kind();
        let width = self.size.width.ceil() as u64;
        let height = self.size.height.ceil() as u64;

        let mut out = String::new();
        if self.encapsulated {
            out.push_str("%!PS-Adobe-3.0 EPSF-3.0\n");
        } else {
            out.push_str("%!PS-Adobe-3.0\n");
        }
        out.push_str("%%Creator: latplot\n");
        out.push_str(&format!("%%BoundingBox: 0 0 {} {}\n", width, height));
        if !self.encapsulated {
            out.push_str("%%Pages: 1\n");
        }
        out.push_str("%%EndComments\n");
        if !self.encapsulated {
            out.push_str("%%Page: 1 1\n");
            out.push_str(&format!("<< /PageSize [{} {}] >> setpagedevice\n", width, height));
        }
        out.push_str("gsave\n");
        // Device space has y pointing down, like the other surfaces
        out.push_str(&format!("0 {} translate 1 -1 scale\n", fmt_num(self.size.height)));
        out.push_str(&self.body);
        out.push_str("grestore\n");
        if !self.encapsulated {
            out.push_str("showpage\n");
        }
        out.push_str("%%EOF\n");

        Ok(Rendered::Encoded {
            kind,
            bytes: out.into_bytes(),
        })
    }
}

impl Backend for PostScriptSurface {
    fn fill_path(&mut self, path: &[PathSegment], color: Color) {
        set_color(&mut self.body, color);
        trace(&mut self.body, path);
        self.body.push_str("fill\n");
    }

    fn stroke_path(&mut self, path: &[PathSegment], stroke: &Stroke) {
        set_color(&mut self.body, stroke.color);
        self.body.push_str(&format!(
            "{} setlinewidth {} setlinecap\n",
            fmt_num(stroke.width),
            line_cap_code(stroke.cap)
        ));
        trace(&mut self.body, path);
        self.body.push_str("stroke\n");
    }
}
