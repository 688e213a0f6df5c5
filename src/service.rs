use core::fmt;

use thiserror::Error;

use crate::{DisplayDevice, DisplayMode, DisplayModeError};

/// Error type for the display service
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Display {0} reported no current settings")]
    NoCurrentSettings(String),
    #[error("Could not decode display mode: {0}")]
    Mode(#[from] DisplayModeError),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// How an apply request is submitted to the OS
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, serde::Serialize)]
pub enum ApplyFlags {
    /// Apply the mode and write it to the registry so it survives a reboot
    Persist,
    /// Only ask the driver whether the mode could be set
    ValidateOnly,
}

/// Status code returned by the OS apply service (`DISP_CHANGE_*`)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ApplyStatus {
    Successful,
    Restart,
    Failed,
    BadMode,
    NotUpdated,
    BadFlags,
    BadParam,
    BadDualView,
    Other(i32),
}

impl ApplyStatus {
    pub fn is_successful(self) -> bool {
        self == ApplyStatus::Successful
    }
}

impl fmt::Display for ApplyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplyStatus::Successful => write!(f, "DISP_CHANGE_SUCCESSFUL"),
            ApplyStatus::Restart => write!(f, "DISP_CHANGE_RESTART"),
            ApplyStatus::Failed => write!(f, "DISP_CHANGE_FAILED"),
            ApplyStatus::BadMode => write!(f, "DISP_CHANGE_BADMODE"),
            ApplyStatus::NotUpdated => write!(f, "DISP_CHANGE_NOTUPDATED"),
            ApplyStatus::BadFlags => write!(f, "DISP_CHANGE_BADFLAGS"),
            ApplyStatus::BadParam => write!(f, "DISP_CHANGE_BADPARAM"),
            ApplyStatus::BadDualView => write!(f, "DISP_CHANGE_BADDUALVIEW"),
            ApplyStatus::Other(code) => write!(f, "DISP_CHANGE {code}"),
        }
    }
}

/// The OS display-configuration subsystem.
///
/// Positional mode enumeration and "current settings" are separate methods, so the
/// native `-1` sentinel never escapes an implementation.
pub trait DisplayService {
    /// Returns the `index`th display device, or `None` once the list is exhausted
    fn device_at(&self, index: u32) -> Option<DisplayDevice>;

    /// Returns the `index`th mode of `device`.
    ///
    /// `Ok(None)` signals that no more modes exist. An `Err` means the mode exists
    /// but could not be read; later indices may still be valid.
    fn mode_at(&self, device: &str, index: u32) -> ServiceResult<Option<DisplayMode>>;

    /// Returns the mode currently active on `device`
    fn current_mode(&self, device: &str) -> ServiceResult<DisplayMode>;

    /// Submits `mode` for `device` and returns the OS status code
    fn apply_mode(&self, device: &str, mode: &DisplayMode, flags: ApplyFlags) -> ApplyStatus;
}
