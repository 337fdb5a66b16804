//! Default sizes and settings (relative sizes are in units of the reference length)

/// Canvas width when neither width nor height is given
pub const WIDTH: f64 = 600.0;
pub const BORDER: f64 = 0.1;
pub const SYMBOL_RADIUS: f64 = 0.3;
pub const LINE_WIDTH: f64 = 0.1;
pub const OUTLINE_WIDTH: f64 = 0.1;
/// Fade weights of lead copies 0 and 1 toward the background
pub const LEAD_FADING: [f64; 2] = [0.6, 0.85];
/// Written when no destination and no viewer are available
pub const DESTINATION: &str = "plot.svg";
pub const JPEG_QUALITY: u8 = 90;
