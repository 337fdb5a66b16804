//! Plot two-dimensional tight-binding systems.
//!
//! A system (a [`Builder`] under construction, or a [`FiniteSystem`]) is
//! drawn as symbols at its sites and lines along its hoppings. Periodic leads
//! are shown as a few repeated unit cells fading into the background.
//!
//! ```no_run
//! use latplot::{Builder, Group, PlotOptions, plot};
//!
//! let a = Group::square("a", 1.0);
//! let mut sys = Builder::new();
//! for x in 0..4 {
//!     sys.add_site(a.site([x, 0]))?;
//!     if x > 0 {
//!         sys.add_hopping(a.site([x - 1, 0]), a.site([x, 0]))?;
//!     }
//! }
//! plot(&sys, &PlotOptions::default().destination("chain.svg"))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod errors;
pub mod log;
pub mod render;
pub mod source;
pub mod style;
pub mod system;
pub mod types;

pub use errors::{ConfigError, ModelError, OutputError, PlotError, StyleError};
pub use render::surface::Rendered;
pub use render::{
    Advisory, ConnectorRef, LineSpec, OutputKind, PlotOptions, PlotOutcome, PositionFn,
    SymbolRef, SymbolSpec, Viewer, plot, render_to_bytes,
};
pub use source::{BuilderSource, FinalizedSource, LeadHopping, LeadSite, PlotSource, SystemRef};
pub use style::{Circle, Color, Connector, Fading, Line, LineCap, LineStyle, Paint, Polygon, Symbol};
pub use system::{Builder, FiniteSystem, Group, Site, TranslationalSymmetry};
pub use types::{CanvasSize, Length, Ratio};
