use log::{debug, warn};

use crate::{DisplayService, RefreshRate};

/// Summary of one pass over a device's mode list
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ModeScan {
    /// Highest refresh rate among the readable modes, 0 if there were none
    pub max: RefreshRate,
    /// Number of modes that were read
    pub modes: u32,
    /// Number of modes that exist but could not be read
    pub skipped: u32,
}

/// Walks every mode `device` reports and tracks the highest refresh rate.
///
/// The walk only stops when the service signals the end of the list.
pub fn scan_modes<S>(service: &S, device: &str) -> ModeScan
where
    S: DisplayService + ?Sized,
{
    let mut scan = ModeScan::default();
    let mut index = 0u32;

    loop {
        match service.mode_at(device, index) {
            Ok(Some(mode)) => {
                debug!("{device}: mode {index}: {mode}");
                scan.modes += 1;
                scan.max = scan.max.max(mode.refresh_rate);
            }
            Ok(None) => break,
            Err(err) => {
                warn!("{device}: skipping mode {index}: {err}");
                scan.skipped += 1;
            }
        }
        index += 1;
    }

    if scan.modes == 0 {
        warn!("{device}: no usable display modes reported");
    }
    debug!(
        "{device}: maximum refresh rate {} over {} modes ({} unreadable)",
        scan.max, scan.modes, scan.skipped
    );
    scan
}

/// Returns the maximum refresh rate over all modes of `device`, or 0 Hz if it has none
pub fn max_refresh_rate<S>(service: &S, device: &str) -> RefreshRate
where
    S: DisplayService + ?Sized,
{
    scan_modes(service, device).max
}
