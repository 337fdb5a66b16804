//! Where a finished plot goes: a file, or an injected viewer

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::RgbaImage;
use tempfile::NamedTempFile;

use crate::errors::{ConfigError, OutputError};
use crate::log::debug;

use super::OutputKind;
use super::defaults;
use super::options::PlotOptions;
use super::surface::Rendered;

/// Receives raster output for direct display.
pub trait Viewer {
    fn show(&self, image: &RgbaImage) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

impl<F> Viewer for F
where
    F: Fn(&RgbaImage) -> Result<(), Box<dyn std::error::Error + Send + Sync>>,
{
    fn show(&self, image: &RgbaImage) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self(image)
    }
}

/// Resolved output destination
#[derive(Clone)]
pub enum Target {
    File { path: PathBuf, kind: OutputKind },
    Display(Arc<dyn Viewer>),
}

impl Target {
    pub fn kind(&self) -> OutputKind {
        match self {
            Target::File { kind, .. } => *kind,
            Target::Display(_) => OutputKind::Display,
        }
    }
}

impl std::fmt::Debug for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::File { path, kind } => f
                .debug_struct("File")
                .field("path", path)
                .field("kind", kind)
                .finish(),
            Target::Display(_) => f.write_str("Display"),
        }
    }
}

/// Pair the destination and format options into a target.
///
/// With neither given, a viewer wins if one is configured; otherwise the
/// plot goes to the default file.
pub fn resolve_target(options: &PlotOptions) -> Result<Target, ConfigError> {
    let display = || {
        options
            .viewer
            .clone()
            .map(Target::Display)
            .ok_or(ConfigError::DisplayUnavailable)
    };
    match (&options.destination, options.format) {
        (None, None) => Ok(display().unwrap_or_else(|_| Target::File {
            path: PathBuf::from(defaults::DESTINATION),
            kind: OutputKind::Svg,
        })),
        (None, Some(OutputKind::Display)) => display(),
        (None, Some(format)) => Err(ConfigError::MissingDestination { format }),
        (Some(path), Some(OutputKind::Display)) => Err(ConfigError::UnexpectedDestination {
            destination: path.clone(),
        }),
        (Some(path), Some(kind)) => Ok(Target::File {
            path: path.clone(),
            kind,
        }),
        (Some(path), None) => {
            let ext = path.extension().and_then(|e| e.to_str());
            let kind = ext
                .and_then(OutputKind::from_extension)
                .ok_or_else(|| ConfigError::UnknownFormat {
                    name: ext
                        .map(str::to_string)
                        .unwrap_or_else(|| path.display().to_string()),
                })?;
            Ok(Target::File {
                path: path.clone(),
                kind,
            })
        }
    }
}

/// Write or show the finished plot
pub fn deliver(target: &Target, rendered: &Rendered) -> Result<(), OutputError> {
    match (target, rendered) {
        (Target::File { path, .. }, Rendered::Encoded { bytes, .. }) => write_atomically(path, bytes),
        (Target::Display(viewer), Rendered::Image(image)) => viewer
            .show(image)
            .map_err(|e| OutputError::Viewer { message: e.to_string() }),
        (Target::File { kind, .. }, Rendered::Image(_)) | (Target::Display(_), Rendered::Encoded { kind, .. }) => {
            Err(OutputError::Encode {
                format: *kind,
                message: "output does not match the requested target".to_string(),
            })
        }
    }
}

/// Replace `path` in one step, so a failed plot never leaves a partial file.
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), OutputError> {
    let io_error = |source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir).map_err(io_error)?;
    file.write_all(bytes).map_err(io_error)?;
    file.flush().map_err(io_error)?;
    file.persist(path).map_err(|e| io_error(e.error))?;
    debug!(path = %path.display(), bytes = bytes.len(), "wrote plot");
    Ok(())
}
