use log::{info, warn};

use crate::{ApplyFlags, ApplyStatus, DisplayService, RefreshRate, Tolerance};

/// Relative equality: `|a - b| <= tolerance * max(|a|, |b|)`.
///
/// Symmetric and reflexive for any finite input.
pub fn close_enough(current: f64, target: f64, tolerance: f64) -> bool {
    (current - target).abs() <= tolerance * current.abs().max(target.abs())
}

/// Terminal state of reconciling one device
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ChangeOutcome {
    /// The active rate already matches the target; nothing was applied
    AlreadyAtTarget { current: RefreshRate },
    /// The target rate was applied and persisted
    Applied { previous: RefreshRate },
    /// The OS rejected the new mode
    Failed {
        previous: RefreshRate,
        status: ApplyStatus,
    },
    /// The active mode could not be read; nothing was applied
    RetrievalFailed { reason: String },
}

/// Brings the active mode of `device` to `target` unless it is already there.
///
/// On mismatch exactly one apply request is made, carrying the active mode with only
/// its refresh rate replaced.
pub fn reconcile<S>(service: &S, device: &str, target: RefreshRate, tolerance: Tolerance) -> ChangeOutcome
where
    S: DisplayService + ?Sized,
{
    let current_mode = match service.current_mode(device) {
        Ok(mode) => mode,
        Err(err) => {
            warn!("{device}: unable to retrieve display settings: {err}");
            return ChangeOutcome::RetrievalFailed {
                reason: err.to_string(),
            };
        }
    };

    let current = current_mode.refresh_rate;
    if close_enough(current.hz(), target.hz(), tolerance.fraction()) {
        info!("{device}: already at {target} (active {current})");
        return ChangeOutcome::AlreadyAtTarget { current };
    }

    info!("{device}: changing refresh rate from {current} to {target}");
    let requested = current_mode.with_refresh_rate(target);
    let status = service.apply_mode(device, &requested, ApplyFlags::Persist);
    if status.is_successful() {
        return ChangeOutcome::Applied { previous: current };
    }

    warn!("{device}: apply to {target} failed with {status}");
    ChangeOutcome::Failed {
        previous: current,
        status,
    }
}
