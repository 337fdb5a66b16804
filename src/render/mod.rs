//! Render driver: validation, geometry, drawing passes and output

pub mod context;
pub mod defaults;
pub(crate) mod geometry;
pub mod options;
pub mod output;
mod postscript;
mod raster;
mod resolve;
pub mod surface;
mod svg;

use std::fmt;
use std::path::PathBuf;

use glam::{DVec2, dvec2};

use crate::errors::{ConfigError, PlotError};
use crate::log::{debug, warn};
use crate::source::{LeadHopping, PlotSource, SystemRef};
use crate::style::{Color, Fading};
use crate::system::{Group, Site};
use crate::types::{Border, CanvasSize, Length, Ratio};

use context::Context;
use geometry::{CanvasRequest, Frame, PosFn, position};
use output::Target;
use resolve::Styles;
use surface::{Rendered, Surface};

pub use options::{ConnectorRef, LineSpec, OutputKind, PlotOptions, PositionFn, SymbolRef, SymbolSpec};
pub use output::Viewer;

/// A degenerate-but-valid condition met while plotting.
///
/// Advisories never stop a plot; they are logged and returned in
/// [`PlotOutcome`].
#[derive(Debug, Clone, PartialEq)]
pub enum Advisory {
    /// No sites at all; nothing was drawn or written
    EmptySystem,
    /// No hopping had positive length, so every site pair was compared
    SlowDistanceScan,
    /// All sites share one position; the reference length defaulted to 1
    CoincidentSites,
    /// All sites share one coordinate along `axis`
    DegenerateAxis { axis: &'static str },
    /// A symbol mapping has no entry for this group
    UnstyledGroup { group: Group },
    /// A line mapping has no entry for this pair, in either order
    UnstyledPair { first: Group, second: Group },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::EmptySystem => write!(f, "the system has no sites"),
            Advisory::SlowDistanceScan => {
                write!(f, "reference length found by scanning all site pairs")
            }
            Advisory::CoincidentSites => write!(f, "all sites coincide"),
            Advisory::DegenerateAxis { axis } => write!(f, "zero extent along {}", axis),
            Advisory::UnstyledGroup { group } => write!(f, "no symbol for group {}", group),
            Advisory::UnstyledPair { first, second } => {
                write!(f, "no line for group pair ({}, {})", first, second)
            }
        }
    }
}

/// What a plot produced
#[derive(Debug)]
pub struct PlotOutcome {
    /// `None` when there was nothing to draw
    pub output: Option<Rendered>,
    /// The file written, if any
    pub destination: Option<PathBuf>,
    pub advisories: Vec<Advisory>,
    pub reference_length: Option<f64>,
    pub canvas: Option<CanvasSize>,
}

impl PlotOutcome {
    fn empty(advisories: Vec<Advisory>) -> Self {
        PlotOutcome {
            output: None,
            destination: None,
            advisories,
            reference_length: None,
            canvas: None,
        }
    }

    /// Encoded bytes of file output
    pub fn bytes(&self) -> Option<&[u8]> {
        self.output.as_ref().and_then(Rendered::bytes)
    }
}

/// Validated numeric options
struct Settings {
    reference_length: Option<Length>,
    border: Border,
    canvas: CanvasRequest,
    fading: Vec<Ratio>,
}

impl Settings {
    fn validate(options: &PlotOptions) -> Result<Settings, ConfigError> {
        let dimension = |axis: &'static str, value: f64| {
            Length::try_positive(value)
                .map(Length::raw)
                .map_err(|reason| ConfigError::InvalidCanvasSize { axis, value, reason })
        };
        let canvas = match (options.width, options.height) {
            (None, None) => return Err(ConfigError::MissingCanvasSize),
            (Some(w), None) => CanvasRequest::Width(dimension("width", w)?),
            (None, Some(h)) => CanvasRequest::Height(dimension("height", h)?),
            (Some(w), Some(h)) => CanvasRequest::Both {
                width: dimension("width", w)?,
                height: dimension("height", h)?,
            },
        };

        let reference_length = options
            .reference_length
            .map(|value| {
                Length::try_positive(value)
                    .map_err(|reason| ConfigError::InvalidReferenceLength { value, reason })
            })
            .transpose()?;

        let border = Border::try_new(options.border).map_err(|reason| ConfigError::InvalidBorder {
            value: options.border,
            reason,
        })?;

        let fading = options
            .lead_fading
            .iter()
            .enumerate()
            .map(|(index, &value)| {
                Ratio::try_new(value).map_err(|reason| ConfigError::InvalidFading {
                    index,
                    value,
                    reason,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Settings {
            reference_length,
            border,
            canvas,
            fading,
        })
    }
}

/// Plot a system to the destination configured in `options`.
///
/// Every option is checked before any drawing starts. An empty system is not
/// an error: nothing is written and [`Advisory::EmptySystem`] is returned.
pub fn plot<'a>(system: impl Into<SystemRef<'a>>, options: &PlotOptions) -> Result<PlotOutcome, PlotError> {
    let target = output::resolve_target(options)?;
    let mut outcome = render_to_bytes(system, options, target.kind())?;
    if let Some(rendered) = &outcome.output {
        output::deliver(&target, rendered)?;
        if let Target::File { path, .. } = &target {
            outcome.destination = Some(path.clone());
        }
    }
    Ok(outcome)
}

/// Render in memory as `kind`, ignoring the configured destination.
///
/// File kinds yield encoded bytes; [`OutputKind::Display`] yields pixels.
pub fn render_to_bytes<'a>(
    system: impl Into<SystemRef<'a>>,
    options: &PlotOptions,
    kind: OutputKind,
) -> Result<PlotOutcome, PlotError> {
    let settings = Settings::validate(options)?;
    let source = system.into().source();
    draw(&*source, options, &settings, kind)
}

fn draw(
    source: &dyn PlotSource,
    options: &PlotOptions,
    settings: &Settings,
    kind: OutputKind,
) -> Result<PlotOutcome, PlotError> {
    let intrinsic = |site: &Site| site.pos();
    let pos: PosFn<'_> = match &options.pos {
        Some(f) => f.as_ref(),
        None => &intrinsic,
    };
    let copies = settings.fading.len();
    let mut advisories = Vec::new();

    let bounds = geometry::extent(source, copies, pos)?;
    if bounds.is_empty() {
        warn!("nothing to plot: the system has no sites");
        advisories.push(Advisory::EmptySystem);
        return Ok(PlotOutcome::empty(advisories));
    }

    let reflen = match settings.reference_length {
        Some(reflen) => reflen,
        None => geometry::reference_length(source, pos, &mut advisories)?,
    };
    let frame = Frame::fit(&bounds, reflen, settings.border, settings.canvas, &mut advisories)?;
    debug!(
        reference_length = reflen.raw(),
        width = frame.size.width,
        height = frame.size.height,
        %kind,
        "fitted canvas"
    );

    let styles = Styles::new(
        &options.symbols,
        &options.lines,
        options.lead_symbols.as_ref(),
        options.lead_lines.as_ref(),
    );

    let mut ctx = Context::new(Surface::create(kind, frame.size)?);
    if kind.is_raster() || options.background != Color::WHITE {
        ctx.rectangle(DVec2::ZERO, dvec2(frame.size.width, frame.size.height));
        ctx.set_source(options.background);
        ctx.fill();
    }
    ctx.set_transform(frame.transform());

    let mut painter = Painter {
        ctx,
        styles,
        pos,
        reflen,
        fades: &settings.fading,
        background: options.background,
        advisories,
    };
    for (a, b) in source.system_hoppings() {
        painter.system_hopping(&a, &b)?;
    }
    for hopping in source.lead_hoppings(copies) {
        painter.lead_hopping(&hopping)?;
    }
    for site in source.system_sites() {
        painter.site(&site, None)?;
    }
    for lead_site in source.lead_sites(copies) {
        painter.site(&lead_site.site, Some(lead_site.copy))?;
    }

    let Painter { ctx, advisories, .. } = painter;
    let rendered = ctx.finish()?;
    Ok(PlotOutcome {
        output: Some(rendered),
        destination: None,
        advisories,
        reference_length: Some(reflen.raw()),
        canvas: Some(frame.size),
    })
}

/// Drawing state shared by the four passes
struct Painter<'a> {
    ctx: Context,
    styles: Styles<'a>,
    pos: PosFn<'a>,
    reflen: Length,
    fades: &'a [Ratio],
    background: Color,
    advisories: Vec<Advisory>,
}

impl Painter<'_> {
    /// Fading of lead copy `copy`.
    ///
    /// Sources only yield copies below the number of fade weights.
    fn fading(&self, copy: usize) -> Fading {
        Fading {
            toward: self.background,
            ratio: self.fades[copy],
        }
    }

    /// Draw from `start` toward `end` with the style of (`origin`, `other`).
    ///
    /// `copy` is the lead copy `origin` lives in, `None` for the system.
    fn segment(&mut self, origin: &Site, other: &Site, start: DVec2, end: DVec2, copy: Option<usize>) {
        let line = self
            .styles
            .line(origin.group(), other.group(), copy.is_some(), &mut self.advisories);
        if let Some(line) = line {
            let fading = copy.map(|c| self.fading(c));
            line.draw(&mut self.ctx, start, end, self.reflen, fading.as_ref());
        }
    }

    fn system_hopping(&mut self, a: &Site, b: &Site) -> Result<(), ConfigError> {
        let start = position(self.pos, a)?;
        let end = position(self.pos, b)?;
        self.segment(a, b, start, end, None);
        Ok(())
    }

    /// Hoppings spanning two copies (or a copy and the system) are split in
    /// half, each half taking the look of the copy it starts in
    fn lead_hopping(&mut self, hopping: &LeadHopping) -> Result<(), ConfigError> {
        let start = position(self.pos, &hopping.from)?;
        let end = position(self.pos, &hopping.to)?;
        if hopping.from_copy == hopping.to_copy {
            self.segment(&hopping.from, &hopping.to, start, end, hopping.from_copy);
        } else {
            let mid = (start + end) / 2.0;
            self.segment(&hopping.from, &hopping.to, start, mid, hopping.from_copy);
            self.segment(&hopping.to, &hopping.from, end, mid, hopping.to_copy);
        }
        Ok(())
    }

    fn site(&mut self, site: &Site, copy: Option<usize>) -> Result<(), ConfigError> {
        let symbol = self
            .styles
            .symbol(site.group(), copy.is_some(), &mut self.advisories);
        if let Some(symbol) = symbol {
            let at = position(self.pos, site)?;
            let fading = copy.map(|c| self.fading(c));
            symbol.draw(&mut self.ctx, at, self.reflen, fading.as_ref());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::Builder;

    fn pair() -> Builder {
        let a = Group::square("a", 1.0);
        let mut sys = Builder::new();
        sys.add_hopping(a.site([0, 0]), a.site([1, 0])).unwrap();
        sys
    }

    #[test]
    fn validation_rejects_bad_options() {
        let sys = pair();
        let cases = [
            PlotOptions::default().canvas(None, None),
            PlotOptions::default().width(-1.0),
            PlotOptions::default().height(f64::NAN),
            PlotOptions::default().reference_length(0.0),
            PlotOptions::default().border(0.5),
            PlotOptions::default().lead_fading(vec![0.2, 1.5]),
        ];
        for options in cases {
            let err = render_to_bytes(&sys, &options, OutputKind::Svg).unwrap_err();
            assert!(matches!(err, PlotError::Config(_)), "{err:?}");
        }
    }

    #[test]
    fn fade_index_reports_offending_copy() {
        let options = PlotOptions::default().lead_fading(vec![0.2, -0.1]);
        assert!(matches!(
            Settings::validate(&options),
            Err(ConfigError::InvalidFading { index: 1, .. })
        ));
    }

    #[test]
    fn each_copy_fades_toward_the_background_by_its_weight() {
        let fades = [Ratio::try_new(0.6).unwrap(), Ratio::try_new(0.85).unwrap()];
        let symbols = SymbolSpec::none();
        let lines = LineSpec::none();
        let painter = Painter {
            ctx: Context::new(Surface::create(OutputKind::Svg, CanvasSize::new(1.0, 1.0)).unwrap()),
            styles: Styles::new(&symbols, &lines, None, None),
            pos: &|s: &Site| s.pos(),
            reflen: Length::UNIT,
            fades: &fades,
            background: Color::BLUE,
            advisories: Vec::new(),
        };
        assert_eq!(painter.fading(0).ratio.raw(), 0.6);
        assert_eq!(painter.fading(1).ratio.raw(), 0.85);
        assert_eq!(painter.fading(1).toward, Color::BLUE);
    }

    #[test]
    fn custom_background_is_painted_on_vector_output() {
        let sys = pair();
        let options = PlotOptions::default()
            .symbols(SymbolSpec::none())
            .lines(LineSpec::none())
            .background(Color::BLUE);
        let outcome = render_to_bytes(&sys, &options, OutputKind::Svg).unwrap();
        let svg = std::str::from_utf8(outcome.bytes().unwrap()).unwrap();
        assert!(svg.contains(r#"<path d="M0 0L600 0L600 600L0 600Z" fill="rgb(0,0,255)"/>"#), "{svg}");
    }
}
