use core::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error type for decoding a display mode reported by the OS
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DisplayModeError {
    #[error("Invalid orientation: {0}")]
    InvalidOrientation(String),
    #[error("Invalid fixed output: {0}")]
    InvalidFixedOutput(String),
}

/// A display output as reported by device enumeration
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DisplayDevice {
    /// Opaque key the OS uses to address the device, e.g. `\\.\DISPLAY1`
    pub name: String,
    pub description: String,
    pub key: String,

    pub attached: bool,
    pub primary: bool,
}

impl DisplayDevice {
    /// Creates a device that is attached to the desktop and not primary
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            key: String::new(),
            attached: true,
            primary: false,
        }
    }
}

impl fmt::Display for DisplayDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Display {{ name: {}, description: {}, attached: {}, primary: {} }}",
            self.name, self.description, self.attached, self.primary
        )
    }
}

/// A full display configuration descriptor.
///
/// Only `refresh_rate` is ever changed by this crate. Every other field is carried
/// through exactly as the OS reported it, because applying a mode needs a fully
/// populated descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct DisplayMode {
    pub device_name: String,
    /// Raw `dmFields` mask: which members of the descriptor are valid
    pub fields: u32,
    pub position: Position,
    pub resolution: Resolution,
    pub bits_per_pixel: u32,
    pub orientation: Orientation,
    pub fixed_output: FixedOutput,
    /// Raw `dmDisplayFlags` (interlaced, grayscale)
    pub display_flags: u32,
    pub refresh_rate: RefreshRate,
}

impl DisplayMode {
    /// Returns a copy of this mode that differs only in its refresh rate
    pub fn with_refresh_rate(&self, refresh_rate: RefreshRate) -> DisplayMode {
        DisplayMode {
            refresh_rate,
            ..self.clone()
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}, {}bpp, {} ({}) at {}",
            self.resolution,
            self.refresh_rate,
            self.bits_per_pixel,
            self.orientation,
            self.fixed_output,
            self.position
        )
    }
}

/// Contains the position of a display on the virtual desktop
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Create a position
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Contains the resolution of a display
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// Creates a new resolution
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Contains the orientation of a display
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub enum Orientation {
    #[default]
    Landscape,        // default
    LandscapeFlipped, // upside-down
    Portrait,         // rotate right
    PortraitFlipped,  // rotate left
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Landscape => write!(f, "Default"),
            Orientation::LandscapeFlipped => write!(f, "UpsideDown"),
            Orientation::Portrait => write!(f, "Right"),
            Orientation::PortraitFlipped => write!(f, "Left"),
        }
    }
}

/// Contains the fixed output of a display
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub enum FixedOutput {
    #[default]
    Default,
    Stretch,
    Center,
}

impl fmt::Display for FixedOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixedOutput::Default => write!(f, "Default"),
            FixedOutput::Stretch => write!(f, "Stretch"),
            FixedOutput::Center => write!(f, "Center"),
        }
    }
}

/// Vertical refresh rate in hertz, as stored in `dmDisplayFrequency`
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct RefreshRate(pub u32);

impl RefreshRate {
    pub fn hz(self) -> f64 {
        f64::from(self.0)
    }
}

impl fmt::Display for RefreshRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Hz", self.0)
    }
}

/// Relative tolerance used when comparing two refresh rates
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, serde::Serialize)]
pub struct Tolerance(f64);

impl Tolerance {
    pub const DEFAULT: Tolerance = Tolerance(0.01);

    /// Creates a tolerance, rejecting values outside of `[0, 1)`
    pub fn new(fraction: f64) -> Result<Self, ParseToleranceError> {
        if fraction.is_finite() && (0.0..1.0).contains(&fraction) {
            Ok(Self(fraction))
        } else {
            Err(ParseToleranceError::OutOfRange(fraction))
        }
    }

    pub fn fraction(self) -> f64 {
        self.0
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Tolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors that occur while parsing a tolerance from a string
#[derive(Error, Debug, PartialEq)]
pub enum ParseToleranceError {
    #[error("Error parsing number")]
    FloatError(#[from] std::num::ParseFloatError),
    #[error("Tolerance {0} out of range. Expected a fraction in [0, 1), e.g. 0.01")]
    OutOfRange(f64),
}

impl FromStr for Tolerance {
    type Err = ParseToleranceError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::new(s.trim().parse()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_mode() -> DisplayMode {
        DisplayMode {
            device_name: "\\\\.\\DISPLAY1".to_string(),
            fields: 0x005C_0000,
            position: Position::new(-1920, 120),
            resolution: Resolution::new(2560, 1440),
            bits_per_pixel: 32,
            orientation: Orientation::Portrait,
            fixed_output: FixedOutput::Center,
            display_flags: 0x2,
            refresh_rate: RefreshRate(60),
        }
    }

    #[test]
    fn with_refresh_rate_only_touches_the_rate() {
        let mode = sample_mode();
        let changed = mode.with_refresh_rate(RefreshRate(144));

        assert_eq!(changed.refresh_rate, RefreshRate(144));
        assert_eq!(changed, DisplayMode { refresh_rate: RefreshRate(144), ..mode.clone() });
        assert_eq!(mode.refresh_rate, RefreshRate(60));
    }

    #[test]
    fn display_mode_formatting() {
        assert_eq!(
            sample_mode().to_string(),
            "2560x1440@60Hz, 32bpp, Right (Center) at (-1920, 120)"
        );
    }

    #[test]
    fn tolerance_parses_fractions() {
        assert_eq!("0.01".parse::<Tolerance>(), Ok(Tolerance::DEFAULT));
        assert_eq!(" 0 ".parse::<Tolerance>().map(Tolerance::fraction), Ok(0.0));
        assert_eq!(Tolerance::default(), Tolerance::DEFAULT);
    }

    #[test]
    fn tolerance_rejects_out_of_range() {
        assert_eq!("1".parse::<Tolerance>(), Err(ParseToleranceError::OutOfRange(1.0)));
        assert_eq!("-0.5".parse::<Tolerance>(), Err(ParseToleranceError::OutOfRange(-0.5)));
        assert!(matches!("NaN".parse::<Tolerance>(), Err(ParseToleranceError::OutOfRange(_))));
        assert!(matches!("abc".parse::<Tolerance>(), Err(ParseToleranceError::FloatError(_))));
    }

    #[test]
    fn refresh_rate_display() {
        assert_eq!(RefreshRate(144).to_string(), "144Hz");
        assert_eq!(RefreshRate::default().hz(), 0.0);
    }
}
