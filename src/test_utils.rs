//! In-memory display service for tests.
//!
//! Available to the crate's own tests and, with the `test-utils` feature, to
//! integration tests.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::fields::{DM_DISPLAYFLAGS, DM_DISPLAYFREQUENCY, DM_INTERLACED, DM_PELSHEIGHT, DM_PELSWIDTH, DM_POSITION};
use crate::{
    ApplyFlags, ApplyStatus, DisplayDevice, DisplayMode, DisplayModeError, DisplayService,
    FixedOutput, Orientation, Position, RefreshRate, Resolution, ServiceError, ServiceResult,
};

/// An active mode with non-default values in every pass-through field
pub fn mode(device: &str, hz: u32) -> DisplayMode {
    DisplayMode {
        device_name: device.to_string(),
        fields: DM_POSITION | DM_PELSWIDTH | DM_PELSHEIGHT | DM_DISPLAYFLAGS | DM_DISPLAYFREQUENCY,
        position: Position::new(1920, -240),
        resolution: Resolution::new(2560, 1440),
        bits_per_pixel: 32,
        orientation: Orientation::LandscapeFlipped,
        fixed_output: FixedOutput::Stretch,
        display_flags: DM_INTERLACED,
        refresh_rate: RefreshRate(hz),
    }
}

/// An enumerated mode; differs from [`mode`] in resolution and display flags
pub fn listed_mode(device: &str, hz: u32) -> DisplayMode {
    DisplayMode {
        resolution: Resolution::new(1280, 720),
        display_flags: 0,
        ..mode(device, hz)
    }
}

/// Every call that reaches the OS-facing side, in order
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CurrentMode(String),
    Apply(String, DisplayMode, ApplyFlags),
}

/// Scripted display service that records every call
#[derive(Debug, Default)]
pub struct FakeDisplays {
    pub devices: Vec<DisplayDevice>,
    /// `None` entries are modes that exist but fail to decode
    pub modes: HashMap<String, Vec<Option<DisplayMode>>>,
    /// Devices missing here fail current-mode retrieval
    pub current: HashMap<String, DisplayMode>,
    pub status: Option<ApplyStatus>,
    pub calls: RefCell<Vec<Call>>,
}

impl FakeDisplays {
    pub fn with_device(mut self, name: &str, rates: &[u32], current: Option<u32>) -> Self {
        self.devices.push(DisplayDevice::new(name, format!("Fake Adapter {name}")));
        self.modes.insert(
            name.to_string(),
            rates.iter().map(|&hz| Some(listed_mode(name, hz))).collect(),
        );
        if let Some(hz) = current {
            self.current.insert(name.to_string(), mode(name, hz));
        }
        self
    }

    pub fn apply_status(mut self, status: ApplyStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn applied(&self) -> Vec<(String, DisplayMode, ApplyFlags)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Apply(device, mode, flags) => Some((device.clone(), mode.clone(), *flags)),
                Call::CurrentMode(_) => None,
            })
            .collect()
    }
}

impl DisplayService for FakeDisplays {
    fn device_at(&self, index: u32) -> Option<DisplayDevice> {
        self.devices.get(index as usize).cloned()
    }

    fn mode_at(&self, device: &str, index: u32) -> ServiceResult<Option<DisplayMode>> {
        match self.modes.get(device).and_then(|modes| modes.get(index as usize)) {
            None => Ok(None),
            Some(Some(mode)) => Ok(Some(mode.clone())),
            Some(None) => Err(DisplayModeError::InvalidOrientation("DMDO 7".to_string()).into()),
        }
    }

    fn current_mode(&self, device: &str) -> ServiceResult<DisplayMode> {
        self.calls.borrow_mut().push(Call::CurrentMode(device.to_string()));
        self.current
            .get(device)
            .cloned()
            .ok_or_else(|| ServiceError::NoCurrentSettings(device.to_string()))
    }

    fn apply_mode(&self, device: &str, mode: &DisplayMode, flags: ApplyFlags) -> ApplyStatus {
        self.calls
            .borrow_mut()
            .push(Call::Apply(device.to_string(), mode.clone(), flags));
        self.status.unwrap_or(ApplyStatus::Successful)
    }
}
