use std::cell::RefCell;

use crate::{DisplayDevice, DisplayService};

/// Device list read once per enumeration pass.
///
/// Index 0 starts a new pass and re-reads the list; later indices are served from
/// that read, so one pass sees a consistent list even if devices change meanwhile.
#[derive(Debug, Default)]
pub struct DeviceSnapshot {
    devices: RefCell<Option<Vec<DisplayDevice>>>,
}

impl DeviceSnapshot {
    pub fn device_at<F>(&self, index: u32, enumerate: F) -> Option<DisplayDevice>
    where
        F: FnOnce() -> Vec<DisplayDevice>,
    {
        let mut devices = self.devices.borrow_mut();
        if index == 0 || devices.is_none() {
            *devices = Some(enumerate());
        }
        devices.as_ref()?.get(index as usize).cloned()
    }
}

/// Iterates over all display devices in enumeration order, paired with their index.
///
/// Enumeration starts at index 0 and stops at the first index the service reports
/// as past the end of the list.
pub fn devices<S>(service: &S) -> impl Iterator<Item = (u32, DisplayDevice)> + '_
where
    S: DisplayService + ?Sized,
{
    (0u32..).map_while(move |index| service.device_at(index).map(|device| (index, device)))
}
