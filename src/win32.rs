//! `DisplayService` backed by the `winuser.h` display settings API.

use log::{debug, warn};
use winsafe::prelude::*;
use winsafe::{co, DispfNup, GmidxEnum, DEVMODE, DISPLAY_DEVICE, POINT};

use crate::fields::{
    apply_mask, DM_BITSPERPEL, DM_DISPLAYFIXEDOUTPUT, DM_DISPLAYFLAGS, DM_DISPLAYFREQUENCY,
    DM_DISPLAYORIENTATION, DM_GRAYSCALE, DM_INTERLACED, DM_PELSHEIGHT, DM_PELSWIDTH, DM_POSITION,
};
use crate::{
    ApplyFlags, ApplyStatus, DeviceSnapshot, DisplayDevice, DisplayMode, DisplayModeError,
    DisplayService, FixedOutput, Orientation, Position, RefreshRate, Resolution, ServiceError,
    ServiceResult,
};

type DisplayModeResult<T> = std::result::Result<T, DisplayModeError>;

/// The display configuration of the local machine
#[derive(Debug, Default)]
pub struct Win32Displays {
    devices: DeviceSnapshot,
}

impl Win32Displays {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DisplayService for Win32Displays {
    fn device_at(&self, index: u32) -> Option<DisplayDevice> {
        self.devices.device_at(index, enumerate_devices)
    }

    fn mode_at(&self, device: &str, index: u32) -> ServiceResult<Option<DisplayMode>> {
        let mut devmode = DEVMODE::default();
        if winsafe::EnumDisplaySettings(Some(device), GmidxEnum::Gmidx(index), &mut devmode).is_err() {
            return Ok(None);
        }
        Ok(Some(mode_from_winsafe(device, &devmode)?))
    }

    fn current_mode(&self, device: &str) -> ServiceResult<DisplayMode> {
        let mut devmode = DEVMODE::default();
        winsafe::EnumDisplaySettings(
            Some(device),
            GmidxEnum::Enum(co::ENUM_SETTINGS::CURRENT),
            &mut devmode,
        )
        .map_err(|err| {
            debug!("{device}: EnumDisplaySettings(CURRENT) failed: {err}");
            ServiceError::NoCurrentSettings(device.to_string())
        })?;

        Ok(mode_from_winsafe(device, &devmode)?)
    }

    fn apply_mode(&self, device: &str, mode: &DisplayMode, flags: ApplyFlags) -> ApplyStatus {
        let mut devmode = mode_to_winsafe(mode);
        let flags = match flags {
            ApplyFlags::Persist => co::CDS::UPDATEREGISTRY,
            ApplyFlags::ValidateOnly => co::CDS::TEST,
        };

        // Ok carries SUCCESSFUL or RESTART, Err every failure code
        let code = match winsafe::ChangeDisplaySettingsEx(Some(device), Some(&mut devmode), flags) {
            Ok(code) | Err(code) => code,
        };
        status_from_winsafe(code)
    }
}

/// Reads the whole device list in one `EnumDisplayDevices` pass
fn enumerate_devices() -> Vec<DisplayDevice> {
    let mut devices = Vec::new();
    for (index, result) in winsafe::EnumDisplayDevices(None, None).enumerate() {
        match result {
            Ok(device) => devices.push(device_from_winsafe(device)),
            Err(err) => {
                warn!("EnumDisplayDevices failed at index {index}: {err}");
                break;
            }
        }
    }
    devices
}

/// Creates a display device from a winsafe record
fn device_from_winsafe(device: &DISPLAY_DEVICE) -> DisplayDevice {
    DisplayDevice {
        name: device.DeviceName(),
        description: device.DeviceString(),
        key: device.DeviceKey(),
        attached: device.StateFlags.has(co::DISPLAY_DEVICE::ATTACHED_TO_DESKTOP),
        primary: device.StateFlags.has(co::DISPLAY_DEVICE::PRIMARY_DEVICE),
    }
}

/// Builds the `co::DM` mask for a raw `dmFields` value
fn dm_from_bits(bits: u32) -> co::DM {
    let members = [
        (DM_POSITION, co::DM::POSITION),
        (DM_DISPLAYORIENTATION, co::DM::DISPLAYORIENTATION),
        (DM_BITSPERPEL, co::DM::BITSPERPEL),
        (DM_PELSWIDTH, co::DM::PELSWIDTH),
        (DM_PELSHEIGHT, co::DM::PELSHEIGHT),
        (DM_DISPLAYFLAGS, co::DM::DISPLAYFLAGS),
        (DM_DISPLAYFREQUENCY, co::DM::DISPLAYFREQUENCY),
        (DM_DISPLAYFIXEDOUTPUT, co::DM::DISPLAYFIXEDOUTPUT),
    ];

    let mut dm = co::DM::default();
    for (bit, member) in members {
        if bits & bit != 0 {
            dm |= member;
        }
    }
    dm
}

fn display_flags_from_bits(bits: u32) -> co::DMDISPLAYFLAGS {
    let mut flags = co::DMDISPLAYFLAGS::default();
    if bits & DM_GRAYSCALE != 0 {
        flags |= co::DMDISPLAYFLAGS::GRAYSCALE;
    }
    if bits & DM_INTERLACED != 0 {
        flags |= co::DMDISPLAYFLAGS::INTERLACED;
    }
    flags
}

fn mode_from_winsafe(device: &str, devmode: &DEVMODE) -> DisplayModeResult<DisplayMode> {
    let position = devmode.dmPosition();

    Ok(DisplayMode {
        device_name: device.to_string(),
        fields: devmode.dmFields.raw(),
        position: Position::new(position.x, position.y),
        resolution: Resolution::new(devmode.dmPelsWidth, devmode.dmPelsHeight),
        bits_per_pixel: devmode.dmBitsPerPel,
        orientation: orientation_from_winsafe(devmode.dmDisplayOrientation())?,
        fixed_output: fixed_output_from_winsafe(devmode.dmDisplayFixedOutput())?,
        display_flags: devmode.dmDisplayFlags().raw(),
        refresh_rate: RefreshRate(devmode.dmDisplayFrequency),
    })
}

/// Rebuilds a `DEVMODE` from a mode previously read with `mode_from_winsafe`
fn mode_to_winsafe(mode: &DisplayMode) -> DEVMODE {
    let mut devmode = DEVMODE::default();
    devmode.set_dmPosition(POINT {
        x: mode.position.x,
        y: mode.position.y,
    });
    devmode.dmPelsWidth = mode.resolution.width;
    devmode.dmPelsHeight = mode.resolution.height;
    devmode.dmBitsPerPel = mode.bits_per_pixel;
    devmode.set_dmDisplayOrientation(orientation_to_winsafe(mode.orientation));
    devmode.set_dmDisplayFixedOutput(fixed_output_to_winsafe(mode.fixed_output));
    devmode.set_dmDisplayFlags_dmNup(DispfNup::Dispf(display_flags_from_bits(mode.display_flags)));
    devmode.dmDisplayFrequency = mode.refresh_rate.0;
    devmode.dmFields = dm_from_bits(apply_mask(mode.fields));
    devmode
}

fn orientation_from_winsafe(co_dmdo: co::DMDO) -> DisplayModeResult<Orientation> {
    match co_dmdo {
        co::DMDO::DEFAULT => Ok(Orientation::Landscape),
        co::DMDO::D90 => Ok(Orientation::PortraitFlipped),
        co::DMDO::D180 => Ok(Orientation::LandscapeFlipped),
        co::DMDO::D270 => Ok(Orientation::Portrait),
        _ => Err(DisplayModeError::InvalidOrientation(co_dmdo.to_string())),
    }
}

fn orientation_to_winsafe(orientation: Orientation) -> co::DMDO {
    match orientation {
        Orientation::Landscape => co::DMDO::DEFAULT,
        Orientation::PortraitFlipped => co::DMDO::D90,
        Orientation::LandscapeFlipped => co::DMDO::D180,
        Orientation::Portrait => co::DMDO::D270,
    }
}

fn fixed_output_from_winsafe(co_dmdfo: co::DMDFO) -> DisplayModeResult<FixedOutput> {
    match co_dmdfo {
        co::DMDFO::DEFAULT => Ok(FixedOutput::Default),
        co::DMDFO::STRETCH => Ok(FixedOutput::Stretch),
        co::DMDFO::CENTER => Ok(FixedOutput::Center),
        _ => Err(DisplayModeError::InvalidFixedOutput(co_dmdfo.to_string())),
    }
}

fn fixed_output_to_winsafe(fixed_output: FixedOutput) -> co::DMDFO {
    match fixed_output {
        FixedOutput::Default => co::DMDFO::DEFAULT,
        FixedOutput::Stretch => co::DMDFO::STRETCH,
        FixedOutput::Center => co::DMDFO::CENTER,
    }
}

fn status_from_winsafe(code: co::DISP_CHANGE) -> ApplyStatus {
    match code {
        co::DISP_CHANGE::SUCCESSFUL => ApplyStatus::Successful,
        co::DISP_CHANGE::RESTART => ApplyStatus::Restart,
        co::DISP_CHANGE::FAILED => ApplyStatus::Failed,
        co::DISP_CHANGE::BADMODE => ApplyStatus::BadMode,
        co::DISP_CHANGE::NOTUPDATED => ApplyStatus::NotUpdated,
        co::DISP_CHANGE::BADFLAGS => ApplyStatus::BadFlags,
        co::DISP_CHANGE::BADPARAM => ApplyStatus::BadParam,
        co::DISP_CHANGE::BADDUALVIEW => ApplyStatus::BadDualView,
        other => ApplyStatus::Other(other.raw()),
    }
}
