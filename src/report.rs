use std::io::{self, Write};

use log::debug;

use crate::{devices, reconcile, scan_modes, ChangeOutcome, DisplayDevice, DisplayService, RefreshRate, Tolerance};

/// Settings for one pass over all displays
#[derive(Debug, Default, Copy, Clone)]
pub struct RunOptions {
    pub tolerance: Tolerance,
    /// Skip devices that are not attached to the desktop
    pub attached_only: bool,
}

/// What happened to a single device
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DeviceReport {
    /// Position in device enumeration order, starting at 0
    pub index: u32,
    pub device: DisplayDevice,
    pub max_refresh_rate: RefreshRate,
    pub modes: u32,
    #[serde(flatten)]
    pub outcome: ChangeOutcome,
}

/// Scans and reconciles a single device
pub fn process_device<S>(service: &S, index: u32, device: DisplayDevice, options: &RunOptions) -> DeviceReport
where
    S: DisplayService + ?Sized,
{
    debug!("processing {device}");
    let scan = scan_modes(service, &device.name);
    let outcome = reconcile(service, &device.name, scan.max, options.tolerance);

    DeviceReport {
        index,
        device,
        max_refresh_rate: scan.max,
        modes: scan.modes,
        outcome,
    }
}

/// Processes every device in enumeration order, handing each report to `emit` as soon
/// as the device is done.
///
/// Device failures are part of the report and never stop the run; only an error from
/// `emit` does.
pub fn run<S, F, E>(service: &S, options: &RunOptions, mut emit: F) -> Result<(), E>
where
    S: DisplayService + ?Sized,
    F: FnMut(DeviceReport) -> Result<(), E>,
{
    for (index, device) in devices(service) {
        if options.attached_only && !device.attached {
            debug!("{}: not attached to the desktop, skipping", device.name);
            continue;
        }
        emit(process_device(service, index, device, options))?;
    }
    Ok(())
}

/// Writes the header printed before the first text report
pub fn write_text_header(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Available Monitors and their Refresh Rates:")
}

/// Writes a report as human-readable lines
pub fn write_text(out: &mut impl Write, report: &DeviceReport) -> io::Result<()> {
    let DeviceReport {
        index,
        device,
        max_refresh_rate: max,
        ..
    } = report;

    writeln!(out)?;
    writeln!(out, "Monitor {}: {} - {}", index + 1, device.name, device.description)?;
    writeln!(out, "Maximum refresh rate for {} is {max}.", device.name)?;
    writeln!(out)?;

    match &report.outcome {
        ChangeOutcome::AlreadyAtTarget { current } => writeln!(
            out,
            "The monitor is already set to the target refresh rate: {max} (current {current})."
        ),
        ChangeOutcome::Applied { previous } => {
            writeln!(out, "The current refresh rate is {previous}, adjusting to {max}.")?;
            writeln!(out, "Refresh rate successfully changed to {max}.")
        }
        ChangeOutcome::Failed { previous, status } => {
            writeln!(out, "The current refresh rate is {previous}, adjusting to {max}.")?;
            writeln!(out, "Failed to change the refresh rate ({status}).")
        }
        ChangeOutcome::RetrievalFailed { .. } => writeln!(out, "Unable to retrieve display settings."),
    }
}

/// Writes a report as a single line of JSON
pub fn write_json(out: &mut impl Write, report: &DeviceReport) -> io::Result<()> {
    serde_json::to_writer(&mut *out, report)?;
    writeln!(out)
}
