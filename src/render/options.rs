//! Plot configuration

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::style::{Circle, Color, Connector, Line, Symbol};
use crate::system::{Group, Site};

use super::defaults;
use super::output::Viewer;

/// Output format
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutputKind {
    Svg,
    Ps,
    Eps,
    Png,
    Jpg,
    /// Hand the pixels to a [`Viewer`] instead of writing a file
    Display,
}

impl OutputKind {
    /// Parse a filename extension, case-insensitively
    pub fn from_extension(ext: &str) -> Option<OutputKind> {
        match ext.to_ascii_lowercase().as_str() {
            "svg" => Some(OutputKind::Svg),
            "ps" => Some(OutputKind::Ps),
            "eps" => Some(OutputKind::Eps),
            "png" => Some(OutputKind::Png),
            "jpg" | "jpeg" => Some(OutputKind::Jpg),
            _ => None,
        }
    }

    /// Raster kinds always get a painted background
    pub fn is_raster(&self) -> bool {
        matches!(self, OutputKind::Png | OutputKind::Jpg | OutputKind::Display)
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputKind::Svg => "svg",
            OutputKind::Ps => "ps",
            OutputKind::Eps => "eps",
            OutputKind::Png => "png",
            OutputKind::Jpg => "jpg",
            OutputKind::Display => "display",
        })
    }
}

pub type SymbolRef = Arc<dyn Symbol>;
pub type ConnectorRef = Arc<dyn Connector>;
pub type PositionFn = Arc<dyn Fn(&Site) -> Vec<f64>>;

/// Which symbol to draw for each site, chosen by the site's group.
///
/// `None` anywhere means "draw nothing".
#[derive(Clone)]
pub enum SymbolSpec {
    Constant(Option<SymbolRef>),
    Function(Arc<dyn Fn(&Group) -> Option<SymbolRef>>),
    /// Groups missing from the map are not drawn, and reported once
    Mapping(HashMap<Group, Option<SymbolRef>>),
}

impl SymbolSpec {
    pub fn none() -> Self {
        SymbolSpec::Constant(None)
    }

    pub fn constant(symbol: impl Symbol + 'static) -> Self {
        SymbolSpec::Constant(Some(Arc::new(symbol)))
    }

    pub fn function(f: impl Fn(&Group) -> Option<SymbolRef> + 'static) -> Self {
        SymbolSpec::Function(Arc::new(f))
    }

    pub fn mapping<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Group, Option<SymbolRef>)>,
    {
        SymbolSpec::Mapping(entries.into_iter().collect())
    }
}

impl Default for SymbolSpec {
    fn default() -> Self {
        SymbolSpec::constant(Circle::default())
    }
}

impl fmt::Debug for SymbolSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolSpec::Constant(s) => f.debug_tuple("Constant").field(s).finish(),
            SymbolSpec::Function(_) => f.write_str("Function(..)"),
            SymbolSpec::Mapping(m) => f.debug_tuple("Mapping").field(m).finish(),
        }
    }
}

/// Which connector to draw for each hopping, chosen by its endpoint groups.
///
/// Mapping keys match the group pair in either order.
#[derive(Clone)]
pub enum LineSpec {
    Constant(Option<ConnectorRef>),
    Function(Arc<dyn Fn(&Group, &Group) -> Option<ConnectorRef>>),
    Mapping(HashMap<(Group, Group), Option<ConnectorRef>>),
}

impl LineSpec {
    pub fn none() -> Self {
        LineSpec::Constant(None)
    }

    pub fn constant(line: impl Connector + 'static) -> Self {
        LineSpec::Constant(Some(Arc::new(line)))
    }

    pub fn function(f: impl Fn(&Group, &Group) -> Option<ConnectorRef> + 'static) -> Self {
        LineSpec::Function(Arc::new(f))
    }

    pub fn mapping<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = ((Group, Group), Option<ConnectorRef>)>,
    {
        LineSpec::Mapping(entries.into_iter().collect())
    }
}

impl Default for LineSpec {
    fn default() -> Self {
        LineSpec::constant(Line::default())
    }
}

impl fmt::Debug for LineSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineSpec::Constant(l) => f.debug_tuple("Constant").field(l).finish(),
            LineSpec::Function(_) => f.write_str("Function(..)"),
            LineSpec::Mapping(m) => f.debug_tuple("Mapping").field(m).finish(),
        }
    }
}

/// Everything that controls a plot besides the system itself.
///
/// Setters chain:
///
/// ```
/// use latplot::{OutputKind, PlotOptions};
///
/// let options = PlotOptions::default()
///     .destination("lattice.png")
///     .canvas(None, Some(300.0));
/// assert_eq!(options.width, None);
/// assert_eq!(options.format, None::<OutputKind>);
/// ```
#[derive(Clone)]
pub struct PlotOptions {
    /// Output path; its extension picks the format unless `format` is set
    pub destination: Option<PathBuf>,
    pub format: Option<OutputKind>,
    /// Unit for relative symbol and line sizes; inferred when unset
    pub reference_length: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    /// Blank margin as a fraction of the canvas, in `[0, 0.5)`
    pub border: f64,
    pub background: Color,
    /// Position override; sites' own positions are used when unset
    pub pos: Option<PositionFn>,
    pub symbols: SymbolSpec,
    pub lines: LineSpec,
    /// Lead styling; `None` reuses the system styling
    pub lead_symbols: Option<SymbolSpec>,
    pub lead_lines: Option<LineSpec>,
    /// Fade weight per lead copy; its length is the number of copies drawn
    pub lead_fading: Vec<f64>,
    pub viewer: Option<Arc<dyn Viewer>>,
}

impl Default for PlotOptions {
    fn default() -> Self {
        PlotOptions {
            destination: None,
            format: None,
            reference_length: None,
            width: Some(defaults::WIDTH),
            height: None,
            border: defaults::BORDER,
            background: Color::WHITE,
            pos: None,
            symbols: SymbolSpec::default(),
            lines: LineSpec::default(),
            lead_symbols: None,
            lead_lines: None,
            lead_fading: defaults::LEAD_FADING.to_vec(),
            viewer: None,
        }
    }
}

impl PlotOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn destination(mut self, path: impl Into<PathBuf>) -> Self {
        self.destination = Some(path.into());
        self
    }

    pub fn format(mut self, kind: OutputKind) -> Self {
        self.format = Some(kind);
        self
    }

    pub fn reference_length(mut self, a: f64) -> Self {
        self.reference_length = Some(a);
        self
    }

    pub fn width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    /// Set both canvas dimensions at once; an unset one follows the data
    /// aspect ratio
    pub fn canvas(mut self, width: Option<f64>, height: Option<f64>) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn border(mut self, border: f64) -> Self {
        self.border = border;
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn pos(mut self, f: impl Fn(&Site) -> Vec<f64> + 'static) -> Self {
        self.pos = Some(Arc::new(f));
        self
    }

    pub fn symbols(mut self, spec: SymbolSpec) -> Self {
        self.symbols = spec;
        self
    }

    pub fn lines(mut self, spec: LineSpec) -> Self {
        self.lines = spec;
        self
    }

    pub fn lead_symbols(mut self, spec: SymbolSpec) -> Self {
        self.lead_symbols = Some(spec);
        self
    }

    pub fn lead_lines(mut self, spec: LineSpec) -> Self {
        self.lead_lines = Some(spec);
        self
    }

    pub fn lead_fading(mut self, fading: impl Into<Vec<f64>>) -> Self {
        self.lead_fading = fading.into();
        self
    }

    pub fn viewer(mut self, viewer: impl Viewer + 'static) -> Self {
        self.viewer = Some(Arc::new(viewer));
        self
    }
}

impl fmt::Debug for PlotOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlotOptions")
            .field("destination", &self.destination)
            .field("format", &self.format)
            .field("reference_length", &self.reference_length)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("border", &self.border)
            .field("background", &self.background)
            .field("pos", &self.pos.as_ref().map(|_| ".."))
            .field("symbols", &self.symbols)
            .field("lines", &self.lines)
            .field("lead_symbols", &self.lead_symbols)
            .field("lead_lines", &self.lead_lines)
            .field("lead_fading", &self.lead_fading)
            .field("viewer", &self.viewer.is_some())
            .finish()
    }
}
