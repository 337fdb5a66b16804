//! Geometry engine: extent, reference length, canvas fit and the data-to-canvas
//! transform.

use glam::{DAffine2, DVec2, dvec2};

use crate::errors::ConfigError;
use crate::log::warn;
use crate::source::PlotSource;
use crate::system::Site;
use crate::types::{Border, Bounds, CanvasSize, Length};

use super::Advisory;

/// Position accessor as seen by the engine
pub(crate) type PosFn<'a> = &'a dyn Fn(&Site) -> Vec<f64>;

/// Project `site` onto the plane, rejecting anything but 2 coordinates
pub(crate) fn position(pos: PosFn<'_>, site: &Site) -> Result<DVec2, ConfigError> {
    match pos(site).as_slice() {
        &[x, y] => Ok(dvec2(x, y)),
        other => Err(ConfigError::UnsupportedDimension { found: other.len() }),
    }
}

/// Bounding box of every site to be drawn; empty when there are none
pub(crate) fn extent(
    source: &dyn PlotSource,
    copies: usize,
    pos: PosFn<'_>,
) -> Result<Bounds, ConfigError> {
    let mut bounds = Bounds::new();
    for site in source.all_sites(copies) {
        bounds.expand_point(position(pos, &site)?);
    }
    Ok(bounds)
}

/// Typical distance between neighboring sites.
///
/// The shortest positive hopping over the system and one lead copy. Without
/// one, falls back to the closest pair of distinct sites, then to 1.
pub(crate) fn reference_length(
    source: &dyn PlotSource,
    pos: PosFn<'_>,
    advisories: &mut Vec<Advisory>,
) -> Result<Length, ConfigError> {
    let mut shortest: Option<f64> = None;
    for (a, b) in source.all_hoppings(1) {
        let d = (position(pos, &a)? - position(pos, &b)?).length();
        if d > 0.0 && shortest.is_none_or(|s| d < s) {
            shortest = Some(d);
        }
    }
    if let Some(length) = shortest.and_then(|d| Length::try_positive(d).ok()) {
        return Ok(length);
    }

    warn!("no hopping of positive length, scanning all site pairs (quadratic)");
    advisories.push(Advisory::SlowDistanceScan);
    let points = source
        .all_sites(1)
        .map(|site| position(pos, &site))
        .collect::<Result<Vec<_>, _>>()?;
    let mut closest: Option<f64> = None;
    for (i, p) in points.iter().enumerate() {
        for q in &points[i + 1..] {
            let d = (*p - *q).length();
            if d > 0.0 && closest.is_none_or(|c| d < c) {
                closest = Some(d);
            }
        }
    }
    if let Some(length) = closest.and_then(|d| Length::try_positive(d).ok()) {
        return Ok(length);
    }

    warn!("all sites coincide, using a reference length of 1");
    advisories.push(Advisory::CoincidentSites);
    Ok(Length::UNIT)
}

/// Requested canvas dimensions, at least one of them set
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum CanvasRequest {
    Width(f64),
    Height(f64),
    Both { width: f64, height: f64 },
}

/// Data window and canvas size, with the border already included in `range`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    pub min: DVec2,
    pub max: DVec2,
    /// Data extent covered by the whole canvas, per axis
    pub range: DVec2,
    pub size: CanvasSize,
}

impl Frame {
    /// Fit `bounds` onto a canvas.
    ///
    /// When both dimensions are given, the axis with too little data range
    /// for the canvas aspect is widened, keeping data units square. A
    /// dimension derived from the data aspect must come out positive and
    /// finite.
    pub(crate) fn fit(
        bounds: &Bounds,
        reflen: Length,
        border: Border,
        request: CanvasRequest,
        advisories: &mut Vec<Advisory>,
    ) -> Result<Frame, ConfigError> {
        let inner = border.inner();
        let mut range = bounds.size() / inner;
        for (axis, r) in [("x", &mut range.x), ("y", &mut range.y)] {
            if *r == 0.0 {
                warn!(axis, "all sites share one coordinate, widening the axis");
                advisories.push(Advisory::DegenerateAxis { axis });
                *r = reflen.raw() / inner;
            }
        }

        let derived = |axis: &'static str, value: f64| {
            Length::try_positive(value)
                .map(Length::raw)
                .map_err(|reason| ConfigError::InvalidCanvasSize { axis, value, reason })
        };
        let size = match request {
            CanvasRequest::Width(width) => {
                CanvasSize::new(width, derived("height", width * range.y / range.x)?)
            }
            CanvasRequest::Height(height) => {
                CanvasSize::new(derived("width", height * range.x / range.y)?, height)
            }
            CanvasRequest::Both { width, height } => {
                if width / height > range.x / range.y {
                    range.x = range.y * width / height;
                } else {
                    range.y = range.x * height / width;
                }
                CanvasSize::new(width, height)
            }
        };

        Ok(Frame {
            min: bounds.min,
            max: bounds.max,
            range,
            size,
        })
    }

    /// Map data coordinates onto the canvas, y pointing up, content centered
    pub fn transform(&self) -> DAffine2 {
        let size = dvec2(self.size.width, self.size.height);
        let screen_min = size * 0.5 * (self.range - (self.max - self.min)) / self.range;
        DAffine2::from_translation(dvec2(screen_min.x, size.y - screen_min.y))
            * DAffine2::from_scale(dvec2(size.x / self.range.x, -size.y / self.range.y))
            * DAffine2::from_translation(-self.min)
    }
}
