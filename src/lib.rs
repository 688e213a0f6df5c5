//! Sets displays to the highest refresh rate they support.
//!
//! For every display device the mode list is scanned for its maximum refresh rate, and
//! if the active mode is not already within tolerance of it, the active mode is
//! re-applied with only the refresh rate changed. All OS access goes through
//! [`DisplayService`]; on Windows it is implemented on top of the `winuser.h` display
//! settings calls by [`Win32Displays`].

mod display;
pub mod fields;
mod reconcile;
mod report;
mod scan;
mod service;
mod types;
#[cfg(windows)]
mod win32;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use display::*;
pub use reconcile::*;
pub use report::*;
pub use scan::*;
pub use service::*;
pub use types::*;
#[cfg(windows)]
pub use win32::*;
