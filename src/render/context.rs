//! Drawing context - tracks path and paint state during rendering

use std::f64::consts::{FRAC_PI_2, TAU};

use glam::{DAffine2, DVec2, dvec2};

use crate::errors::OutputError;
use crate::style::{Color, LineCap};

use super::surface::{Backend, Rendered, Surface};

/// One segment of a path, in device coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathSegment {
    MoveTo(DVec2),
    LineTo(DVec2),
    CubicTo(DVec2, DVec2, DVec2),
    Close,
}

/// Stroke parameters resolved to device units
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
    pub cap: LineCap,
}

/// Stateful drawing context in the style of a 2D vector graphics API.
///
/// Coordinates passed in are user coordinates; the current transform maps
/// them to the device when the path is built, so later transform changes do
/// not affect a path already under construction. Line widths are scaled by
/// the square root of the transform's area factor.
pub struct Context {
    surface: Surface,
    transform: DAffine2,
    source: Color,
    line_width: f64,
    line_cap: LineCap,
    path: Vec<PathSegment>,
    /// Current point in user coordinates
    current: Option<DVec2>,
    subpath_start: Option<DVec2>,
}

impl Context {
    pub fn new(surface: Surface) -> Self {
        Context {
            surface,
            transform: DAffine2::IDENTITY,
            source: Color::BLACK,
            line_width: 2.0,
            line_cap: LineCap::Butt,
            path: Vec::new(),
            current: None,
            subpath_start: None,
        }
    }

    pub fn transform(&self) -> DAffine2 {
        self.transform
    }

    pub fn set_transform(&mut self, transform: DAffine2) {
        self.transform = transform;
    }

    pub fn source(&self) -> Color {
        self.source
    }

    pub fn set_source(&mut self, color: Color) {
        self.source = color;
    }

    /// Width in user units
    pub fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
    }

    pub fn set_line_cap(&mut self, cap: LineCap) {
        self.line_cap = cap;
    }

    pub fn new_path(&mut self) {
        self.path.clear();
        self.current = None;
        self.subpath_start = None;
    }

    fn device(&self, p: DVec2) -> DVec2 {
        self.transform.transform_point2(p)
    }

    pub fn move_to(&mut self, p: DVec2) {
        self.path.push(PathSegment::MoveTo(self.device(p)));
        self.current = Some(p);
        self.subpath_start = Some(p);
    }

    /// Starts a new subpath if there is no current point
    pub fn line_to(&mut self, p: DVec2) {
        if self.current.is_none() {
            return self.move_to(p);
        }
        self.path.push(PathSegment::LineTo(self.device(p)));
        self.current = Some(p);
    }

    pub fn curve_to(&mut self, c1: DVec2, c2: DVec2, p: DVec2) {
        if self.current.is_none() {
            self.move_to(c1);
        }
        self.path.push(PathSegment::CubicTo(
            self.device(c1),
            self.device(c2),
            self.device(p),
        ));
        self.current = Some(p);
    }

    pub fn close_path(&mut self) {
        if self.current.is_some() {
            self.path.push(PathSegment::Close);
            self.current = self.subpath_start;
        }
    }

    /// Counter-clockwise arc (in user coordinates) from `angle1` to `angle2`.
    ///
    /// Joined to the current point by a straight line if there is one.
    /// Approximated by cubic Béziers spanning at most a quarter turn each.
    pub fn arc(&mut self, center: DVec2, radius: f64, angle1: f64, angle2: f64) {
        let mut end = angle2;
        while end < angle1 {
            end += TAU;
        }
        let sweep = end - angle1;
        let segments = ((sweep / FRAC_PI_2).ceil() as usize).max(1);
        let step = sweep / segments as f64;
        let k = 4.0 / 3.0 * (step / 4.0).tan();

        let point = |a: f64| center + radius * dvec2(a.cos(), a.sin());
        let tangent = |a: f64| radius * k * dvec2(-a.sin(), a.cos());

        self.line_to(point(angle1));
        for s in 0..segments {
            let a = angle1 + s as f64 * step;
            let b = a + step;
            self.curve_to(point(a) + tangent(a), point(b) - tangent(b), point(b));
        }
    }

    pub fn rectangle(&mut self, origin: DVec2, size: DVec2) {
        self.move_to(origin);
        self.line_to(origin + dvec2(size.x, 0.0));
        self.line_to(origin + size);
        self.line_to(origin + dvec2(0.0, size.y));
        self.close_path();
    }

    /// Fill the current path with the source color, then clear it
    pub fn fill(&mut self) {
        if !self.path.is_empty() {
            self.surface.fill_path(&self.path, self.source);
        }
        self.new_path();
    }

    /// Stroke the current path, then clear it
    pub fn stroke(&mut self) {
        if !self.path.is_empty() {
            let scale = self.transform.matrix2.determinant().abs().sqrt();
            let stroke = Stroke {
                color: self.source,
                width: self.line_width * scale,
                cap: self.line_cap,
            };
            self.surface.stroke_path(&self.path, &stroke);
        }
        self.new_path();
    }

    #[cfg(test)]
    pub(crate) fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn finish(self) -> Result<Rendered, OutputError> {
        self.surface.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::OutputKind;
    use crate::render::surface::test_support::commands;
    use crate::types::CanvasSize;

    fn ctx() -> Context {
        Context::new(Surface::create(OutputKind::Svg, CanvasSize::new(10.0, 10.0)).unwrap())
    }

    #[test]
    fn transform_applies_when_path_is_built() {
        let mut ctx = ctx();
        ctx.set_transform(DAffine2::from_translation(dvec2(5.0, 5.0)));
        ctx.move_to(DVec2::ZERO);
        ctx.set_transform(DAffine2::IDENTITY);
        ctx.line_to(DVec2::ONE);
        ctx.stroke();
        assert_eq!(commands(&ctx), vec!["stroke M5 5L1 1 rgb(0,0,0) w2 butt"]);
    }

    #[test]
    fn stroke_width_follows_area_scale() {
        let mut ctx = ctx();
        ctx.set_transform(DAffine2::from_scale(dvec2(4.0, -9.0)));
        ctx.set_line_width(0.5);
        ctx.move_to(DVec2::ZERO);
        ctx.line_to(DVec2::X);
        ctx.stroke();
        assert_eq!(commands(&ctx), vec!["stroke M0 0L4 0 rgb(0,0,0) w3 butt"]);
    }

    #[test]
    fn full_arc_is_four_curves() {
        let mut ctx = ctx();
        ctx.arc(DVec2::ZERO, 1.0, 0.0, TAU);
        assert_eq!(ctx.path.len(), 5);
        assert!(matches!(ctx.path[0], PathSegment::MoveTo(p) if (p - DVec2::X).length() < 1e-12));
        match ctx.path[4] {
            PathSegment::CubicTo(_, _, end) => assert!((end - DVec2::X).length() < 1e-12),
            other => panic!("unexpected segment {other:?}"),
        }
    }

    #[test]
    fn quarter_arc_midpoint_is_on_the_circle() {
        let mut ctx = ctx();
        ctx.arc(DVec2::ZERO, 2.0, 0.0, FRAC_PI_2);
        let PathSegment::CubicTo(c1, c2, p3) = ctx.path[1] else {
            panic!("expected a curve");
        };
        let p0 = dvec2(2.0, 0.0);
        let mid = 0.125 * p0 + 0.375 * c1 + 0.375 * c2 + 0.125 * p3;
        assert!((mid.length() - 2.0).abs() < 1e-3);
    }

    #[test]
    fn empty_paths_are_not_painted() {
        let mut ctx = ctx();
        ctx.fill();
        ctx.stroke();
        assert!(commands(&ctx).is_empty());
    }

    #[test]
    fn line_to_without_current_point_moves() {
        let mut ctx = ctx();
        ctx.line_to(DVec2::ONE);
        assert_eq!(ctx.path, vec![PathSegment::MoveTo(DVec2::ONE)]);
    }
}
