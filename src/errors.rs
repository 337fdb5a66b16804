//! Error types with rich diagnostics using miette
//!
//! Every configuration problem is reported before any surface is acquired,
//! so a failed plot never leaves output behind.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::render::OutputKind;
use crate::types::NumericError;

// ============================================================================
// Configuration Errors
// ============================================================================

/// Errors in the options passed to [`plot`](crate::plot)
#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("width and height are both unset")]
    #[diagnostic(
        code(latplot::config::missing_canvas_size),
        help("set at least one of `width` and `height`; the other follows the data aspect ratio")
    )]
    MissingCanvasSize,

    #[error("invalid {axis}: {value} ({reason})")]
    #[diagnostic(code(latplot::config::invalid_canvas_size))]
    InvalidCanvasSize {
        axis: &'static str,
        value: f64,
        reason: NumericError,
    },

    #[error("invalid reference length: {value} ({reason})")]
    #[diagnostic(
        code(latplot::config::invalid_reference_length),
        help("the reference length must be > 0; leave it unset to infer it from the sites")
    )]
    InvalidReferenceLength { value: f64, reason: NumericError },

    #[error("invalid border: {value} ({reason})")]
    #[diagnostic(
        code(latplot::config::invalid_border),
        help("the border is a fraction of the canvas in [0, 0.5)")
    )]
    InvalidBorder { value: f64, reason: NumericError },

    #[error("invalid lead fading at copy {index}: {value} ({reason})")]
    #[diagnostic(
        code(latplot::config::invalid_fading),
        help("fade weights are blend ratios in [0, 1]")
    )]
    InvalidFading {
        index: usize,
        value: f64,
        reason: NumericError,
    },

    #[error("output format {format} needs a destination")]
    #[diagnostic(code(latplot::config::missing_destination))]
    MissingDestination { format: OutputKind },

    #[error("direct display does not write to {}", destination.display())]
    #[diagnostic(
        code(latplot::config::unexpected_destination),
        help("drop the destination, or pick a file format")
    )]
    UnexpectedDestination { destination: PathBuf },

    #[error("unknown output format: {name}")]
    #[diagnostic(
        code(latplot::config::unknown_format),
        help("supported formats are svg, ps, eps, png and jpg")
    )]
    UnknownFormat { name: String },

    #[error("direct display requested but no viewer is available")]
    #[diagnostic(
        code(latplot::config::display_unavailable),
        help("inject a viewer with `PlotOptions::viewer`, or write to a file")
    )]
    DisplayUnavailable,

    #[error("only 2 dimensions are supported, got a position with {found}")]
    #[diagnostic(
        code(latplot::geometry::unsupported_dimension),
        help("pass a position accessor that projects sites onto a plane")
    )]
    UnsupportedDimension { found: usize },
}

// ============================================================================
// Style Errors
// ============================================================================

/// Errors raised while constructing stock styles
#[derive(Error, Diagnostic, Debug, PartialEq)]
pub enum StyleError {
    #[error("color component {component} out of range: {value}")]
    #[diagnostic(
        code(latplot::style::color_out_of_range),
        help("r, g, b and alpha must be in the range [0, 1]")
    )]
    ColorOutOfRange { component: &'static str, value: f64 },

    #[error("unknown color: {name}")]
    #[diagnostic(
        code(latplot::style::unknown_color),
        help("use a named color or #rrggbb / #rrggbbaa")
    )]
    UnknownColor { name: String },

    #[error("unknown line cap: {name}")]
    #[diagnostic(
        code(latplot::style::unknown_line_cap),
        help("line caps are butt, round or square")
    )]
    UnknownLineCap { name: String },

    #[error("a polygon needs at least 3 sides, got {sides}")]
    #[diagnostic(code(latplot::style::too_few_sides))]
    TooFewSides { sides: u32 },

    #[error("invalid polygon size: {value} ({reason})")]
    #[diagnostic(code(latplot::style::invalid_polygon_size))]
    InvalidPolygonSize { value: f64, reason: NumericError },
}

// ============================================================================
// Model Errors
// ============================================================================

/// Errors raised while editing or finalizing a system
#[derive(Error, Diagnostic, Debug, PartialEq)]
pub enum ModelError {
    #[error("a hopping must connect two different sites")]
    #[diagnostic(code(latplot::model::self_hopping))]
    SelfHopping,

    #[error("site tag has {tag} components but the symmetry period has {period}")]
    #[diagnostic(code(latplot::model::dimension_mismatch))]
    DimensionMismatch { tag: usize, period: usize },

    #[error("a lead must be built with a translational symmetry")]
    #[diagnostic(
        code(latplot::model::missing_symmetry),
        help("create the lead with `Builder::with_symmetry`")
    )]
    MissingSymmetry,

    #[error("interface site {site} is not part of the system")]
    #[diagnostic(
        code(latplot::model::unknown_interface_site),
        help("add the site to the system before attaching the lead")
    )]
    UnknownInterfaceSite { site: String },

    #[error("the symmetry period must not be the zero vector")]
    #[diagnostic(code(latplot::model::zero_period))]
    ZeroPeriod,

    #[error("a finite system cannot carry a translational symmetry")]
    #[diagnostic(
        code(latplot::model::unexpected_symmetry),
        help("attach the symmetric builder as a lead instead")
    )]
    UnexpectedSymmetry,

    #[error("hopping {from} -> {to} spans {cells} periods; only neighboring periods may be connected")]
    #[diagnostic(code(latplot::model::hopping_too_long))]
    HoppingTooLong { from: String, to: String, cells: i64 },
}

// ============================================================================
// Output Errors
// ============================================================================

/// Errors from acquiring, encoding or writing the output
#[derive(Error, Diagnostic, Debug)]
pub enum OutputError {
    #[error("cannot create a {width}x{height} raster surface")]
    #[diagnostic(code(latplot::output::surface))]
    Surface { width: u32, height: u32 },

    #[error("failed to encode {format}: {message}")]
    #[diagnostic(code(latplot::output::encode))]
    Encode { format: OutputKind, message: String },

    #[error("failed to write {}", path.display())]
    #[diagnostic(code(latplot::output::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("viewer failed: {message}")]
    #[diagnostic(code(latplot::output::viewer))]
    Viewer { message: String },
}

// ============================================================================
// Top-level Error
// ============================================================================

/// Everything [`plot`](crate::plot) can fail with
#[derive(Error, Diagnostic, Debug)]
pub enum PlotError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Output(#[from] OutputError),
}
