//! Drawing capabilities: paints, connectors (lines) and symbols.
//!
//! The renderer knows nothing about concrete styles. It hands each element a
//! [`Context`] whose transform maps data coordinates to the canvas, the
//! reference length, and an optional [`Fading`] for lead copies. Anything
//! implementing [`Paint`], [`Connector`] or [`Symbol`] can be plugged in.

use std::f64::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use glam::{DVec2, dvec2};

use crate::errors::StyleError;
use crate::render::context::Context;
use crate::render::defaults;
use crate::types::{Length, Ratio};

/// Blend toward a target color by a ratio
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fading {
    pub toward: Color,
    pub ratio: Ratio,
}

/// Sets the current source color of a context.
pub trait Paint: fmt::Debug {
    fn apply(&self, ctx: &mut Context, fading: Option<&Fading>);
}

/// Draws a hopping between two points given in data coordinates.
pub trait Connector: fmt::Debug {
    fn draw(&self, ctx: &mut Context, from: DVec2, to: DVec2, reflen: Length, fading: Option<&Fading>);
}

/// Draws a site marker centered on a point given in data coordinates.
pub trait Symbol: fmt::Debug {
    fn draw(&self, ctx: &mut Context, pos: DVec2, reflen: Length, fading: Option<&Fading>);
}

// ============================================================================
// Color
// ============================================================================

/// RGBA color with components in `[0, 1]`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    r: f64,
    g: f64,
    b: f64,
    alpha: f64,
}

fn component(name: &'static str, value: f64) -> Result<f64, StyleError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(StyleError::ColorOutOfRange {
            component: name,
            value,
        })
    }
}

impl Color {
    pub const BLACK: Color = Color::opaque(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::opaque(1.0, 1.0, 1.0);
    pub const RED: Color = Color::opaque(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::opaque(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::opaque(0.0, 0.0, 1.0);

    const fn opaque(r: f64, g: f64, b: f64) -> Color {
        Color { r, g, b, alpha: 1.0 }
    }

    pub fn rgb(r: f64, g: f64, b: f64) -> Result<Color, StyleError> {
        Self::rgba(r, g, b, 1.0)
    }

    pub fn rgba(r: f64, g: f64, b: f64, alpha: f64) -> Result<Color, StyleError> {
        Ok(Color {
            r: component("r", r)?,
            g: component("g", g)?,
            b: component("b", b)?,
            alpha: component("alpha", alpha)?,
        })
    }

    pub fn r(&self) -> f64 {
        self.r
    }

    pub fn g(&self) -> f64 {
        self.g
    }

    pub fn b(&self) -> f64 {
        self.b
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Move every component, alpha included, toward the fading target
    pub fn faded(self, fading: Option<&Fading>) -> Color {
        let Some(fading) = fading else {
            return self;
        };
        let to = fading.toward;
        Color {
            r: fading.ratio.lerp(self.r, to.r),
            g: fading.ratio.lerp(self.g, to.g),
            b: fading.ratio.lerp(self.b, to.b),
            alpha: fading.ratio.lerp(self.alpha, to.alpha),
        }
    }

    /// 8-bit channels, rounded
    pub fn to_rgba8(&self) -> [u8; 4] {
        let q = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;
        [q(self.r), q(self.g), q(self.b), q(self.alpha)]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, _] = self.to_rgba8();
        write!(f, "rgb({},{},{})", r, g, b)
    }
}

impl FromStr for Color {
    type Err = StyleError;

    /// Accepts a handful of names plus `#rrggbb` and `#rrggbbaa`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || StyleError::UnknownColor { name: s.to_string() };
        let name = s.trim().to_ascii_lowercase();
        let named = match name.as_str() {
            "black" => Some((0, 0, 0)),
            "white" => Some((255, 255, 255)),
            "red" => Some((255, 0, 0)),
            "green" => Some((0, 128, 0)),
            "lime" => Some((0, 255, 0)),
            "blue" => Some((0, 0, 255)),
            "yellow" => Some((255, 255, 0)),
            "cyan" => Some((0, 255, 255)),
            "magenta" => Some((255, 0, 255)),
            "orange" => Some((255, 165, 0)),
            "purple" => Some((128, 0, 128)),
            "gray" | "grey" => Some((128, 128, 128)),
            "lightgray" | "lightgrey" => Some((211, 211, 211)),
            _ => None,
        };
        if let Some((r, g, b)) = named {
            return Ok(from_bytes(r, g, b, 255));
        }

        let hex = name.strip_prefix('#').ok_or_else(unknown)?;
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(unknown());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| unknown());
        let alpha = if hex.len() == 8 { byte(6)? } else { 255 };
        Ok(from_bytes(byte(0)?, byte(2)?, byte(4)?, alpha))
    }
}

fn from_bytes(r: u8, g: u8, b: u8, alpha: u8) -> Color {
    let f = |v: u8| v as f64 / 255.0;
    Color {
        r: f(r),
        g: f(g),
        b: f(b),
        alpha: f(alpha),
    }
}

impl Paint for Color {
    fn apply(&self, ctx: &mut Context, fading: Option<&Fading>) {
        ctx.set_source(self.faded(fading));
    }
}

// ============================================================================
// Line style
// ============================================================================

/// How open path ends are drawn
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

impl LineCap {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineCap::Butt => "butt",
            LineCap::Round => "round",
            LineCap::Square => "square",
        }
    }
}

impl FromStr for LineCap {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "butt" => Ok(LineCap::Butt),
            "round" => Ok(LineCap::Round),
            "square" => Ok(LineCap::Square),
            _ => Err(StyleError::UnknownLineCap { name: s.to_string() }),
        }
    }
}

/// Stroke settings beyond width and color
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct LineStyle {
    pub cap: LineCap,
}

impl LineStyle {
    pub fn new(cap: LineCap) -> Self {
        LineStyle { cap }
    }

    pub fn apply(&self, ctx: &mut Context) {
        ctx.set_line_cap(self.cap);
    }
}

// ============================================================================
// Line
// ============================================================================

/// A straight segment between two sites.
///
/// Width is relative to the reference length. Nothing is drawn when the width
/// is not positive or there is no paint.
#[derive(Clone, Debug)]
pub struct Line {
    pub width: f64,
    pub paint: Option<Arc<dyn Paint>>,
    pub style: LineStyle,
}

impl Line {
    pub fn new(width: f64) -> Self {
        Line {
            width,
            paint: Some(Arc::new(Color::BLACK)),
            style: LineStyle::default(),
        }
    }

    pub fn with_paint(mut self, paint: impl Paint + 'static) -> Self {
        self.paint = Some(Arc::new(paint));
        self
    }

    pub fn without_paint(mut self) -> Self {
        self.paint = None;
        self
    }

    pub fn with_style(mut self, style: LineStyle) -> Self {
        self.style = style;
        self
    }
}

impl Default for Line {
    fn default() -> Self {
        Line::new(defaults::LINE_WIDTH)
    }
}

impl Connector for Line {
    fn draw(&self, ctx: &mut Context, from: DVec2, to: DVec2, reflen: Length, fading: Option<&Fading>) {
        ctx.new_path();
        let Some(paint) = &self.paint else { return };
        if self.width <= 0.0 {
            return;
        }
        ctx.set_line_width(reflen * self.width);
        paint.apply(ctx, fading);
        self.style.apply(ctx);
        ctx.move_to(from);
        ctx.line_to(to);
        ctx.stroke();
    }
}

// ============================================================================
// Symbols
// ============================================================================

/// Fill, then outline, the path traced by `trace`
#[allow(clippy::too_many_arguments)]
fn fill_and_outline(
    ctx: &mut Context,
    fill: Option<&Arc<dyn Paint>>,
    outline: Option<&Arc<dyn Paint>>,
    outline_width: f64,
    style: LineStyle,
    reflen: Length,
    fading: Option<&Fading>,
    trace: impl Fn(&mut Context),
) {
    if let Some(fill) = fill {
        ctx.new_path();
        trace(ctx);
        fill.apply(ctx, fading);
        ctx.fill();
    }
    if let Some(outline) = outline.filter(|_| outline_width > 0.0) {
        ctx.new_path();
        trace(ctx);
        ctx.set_line_width(reflen * outline_width);
        outline.apply(ctx, fading);
        style.apply(ctx);
        ctx.stroke();
    }
}

/// A disc, radius relative to the reference length.
#[derive(Clone, Debug)]
pub struct Circle {
    pub radius: f64,
    pub fill: Option<Arc<dyn Paint>>,
    pub outline: Option<Arc<dyn Paint>>,
    pub outline_width: f64,
    pub style: LineStyle,
}

impl Circle {
    /// A black disc without outline
    pub fn new(radius: f64) -> Self {
        Circle {
            radius,
            fill: Some(Arc::new(Color::BLACK)),
            outline: None,
            outline_width: defaults::OUTLINE_WIDTH,
            style: LineStyle::default(),
        }
    }

    pub fn with_fill(mut self, paint: impl Paint + 'static) -> Self {
        self.fill = Some(Arc::new(paint));
        self
    }

    pub fn without_fill(mut self) -> Self {
        self.fill = None;
        self
    }

    pub fn with_outline(mut self, paint: impl Paint + 'static, width: f64) -> Self {
        self.outline = Some(Arc::new(paint));
        self.outline_width = width;
        self
    }

    pub fn with_style(mut self, style: LineStyle) -> Self {
        self.style = style;
        self
    }
}

impl Default for Circle {
    fn default() -> Self {
        Circle::new(defaults::SYMBOL_RADIUS)
    }
}

impl Symbol for Circle {
    fn draw(&self, ctx: &mut Context, pos: DVec2, reflen: Length, fading: Option<&Fading>) {
        let radius = reflen * self.radius;
        fill_and_outline(
            ctx,
            self.fill.as_ref(),
            self.outline.as_ref(),
            self.outline_width,
            self.style,
            reflen,
            fading,
            |ctx| ctx.arc(pos, radius, 0.0, TAU),
        );
    }
}

/// A regular polygon.
///
/// The circumradius is relative to the reference length; `angle` rotates the
/// polygon, with angle 0 putting the first vertex straight up.
#[derive(Clone, Debug)]
pub struct Polygon {
    sides: u32,
    circumradius: f64,
    pub angle: f64,
    pub fill: Option<Arc<dyn Paint>>,
    pub outline: Option<Arc<dyn Paint>>,
    pub outline_width: f64,
    pub style: LineStyle,
}

fn check_sides(sides: u32) -> Result<(), StyleError> {
    if sides < 3 {
        Err(StyleError::TooFewSides { sides })
    } else {
        Ok(())
    }
}

impl Polygon {
    /// A polygon whose sides have length `side`
    pub fn with_side(sides: u32, side: f64) -> Result<Self, StyleError> {
        check_sides(sides)?;
        let side = Length::try_positive(side)
            .map_err(|reason| StyleError::InvalidPolygonSize { value: side, reason })?;
        let circumradius = side.raw() / (2.0 * (PI / sides as f64).sin());
        Ok(Polygon {
            sides,
            circumradius,
            angle: 0.0,
            fill: Some(Arc::new(Color::BLACK)),
            outline: None,
            outline_width: defaults::OUTLINE_WIDTH,
            style: LineStyle::default(),
        })
    }

    /// A polygon with the same area as a circle of radius `radius`
    pub fn with_area_of_circle(sides: u32, radius: f64) -> Result<Self, StyleError> {
        check_sides(sides)?;
        let radius = Length::try_positive(radius)
            .map_err(|reason| StyleError::InvalidPolygonSize { value: radius, reason })?;
        let n = sides as f64;
        let side = (4.0 * (PI / n).tan() / n * PI).sqrt() * radius.raw();
        Self::with_side(sides, side)
    }

    pub fn sides(&self) -> u32 {
        self.sides
    }

    pub fn circumradius(&self) -> f64 {
        self.circumradius
    }

    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_fill(mut self, paint: impl Paint + 'static) -> Self {
        self.fill = Some(Arc::new(paint));
        self
    }

    pub fn without_fill(mut self) -> Self {
        self.fill = None;
        self
    }

    pub fn with_outline(mut self, paint: impl Paint + 'static, width: f64) -> Self {
        self.outline = Some(Arc::new(paint));
        self.outline_width = width;
        self
    }

    pub fn with_style(mut self, style: LineStyle) -> Self {
        self.style = style;
        self
    }

    /// Vertex positions around `pos`, first one at `angle`
    pub fn vertices(&self, pos: DVec2, reflen: Length) -> Vec<DVec2> {
        let rc = reflen * self.circumradius;
        let step = TAU / self.sides as f64;
        (0..self.sides)
            .map(|k| {
                let phi = self.angle + k as f64 * step;
                pos + rc * dvec2(phi.sin(), phi.cos())
            })
            .collect()
    }
}

impl Symbol for Polygon {
    fn draw(&self, ctx: &mut Context, pos: DVec2, reflen: Length, fading: Option<&Fading>) {
        let vertices = self.vertices(pos, reflen);
        fill_and_outline(
            ctx,
            self.fill.as_ref(),
            self.outline.as_ref(),
            self.outline_width,
            self.style,
            reflen,
            fading,
            |ctx| {
                for (k, v) in vertices.iter().enumerate() {
                    if k == 0 {
                        ctx.move_to(*v);
                    } else {
                        ctx.line_to(*v);
                    }
                }
                ctx.close_path();
            },
        );
    }
}
