//! Raw `DEVMODE` bit values shared by every `DisplayService` backend.

pub const DM_POSITION: u32 = 0x0000_0020;
pub const DM_DISPLAYORIENTATION: u32 = 0x0000_0080;
pub const DM_BITSPERPEL: u32 = 0x0004_0000;
pub const DM_PELSWIDTH: u32 = 0x0008_0000;
pub const DM_PELSHEIGHT: u32 = 0x0010_0000;
pub const DM_DISPLAYFLAGS: u32 = 0x0020_0000;
pub const DM_DISPLAYFREQUENCY: u32 = 0x0040_0000;
pub const DM_DISPLAYFIXEDOUTPUT: u32 = 0x2000_0000;

/// `dmDisplayFlags` bits
pub const DM_GRAYSCALE: u32 = 0x0000_0001;
pub const DM_INTERLACED: u32 = 0x0000_0002;

/// The `dmFields` members that `DisplayMode` carries
pub const CARRIED_FIELDS: u32 = DM_POSITION
    | DM_DISPLAYORIENTATION
    | DM_BITSPERPEL
    | DM_PELSWIDTH
    | DM_PELSHEIGHT
    | DM_DISPLAYFLAGS
    | DM_DISPLAYFREQUENCY
    | DM_DISPLAYFIXEDOUTPUT;

/// `dmFields` for an apply request built from a mode read with `fields`.
///
/// Members the OS marked valid stay marked, nothing else is added except the frequency.
pub fn apply_mask(fields: u32) -> u32 {
    (fields & CARRIED_FIELDS) | DM_DISPLAYFREQUENCY
}
