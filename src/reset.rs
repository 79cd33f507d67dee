//! Port reset of a single device, every non-hub device, or a device selected by [`VidPid`]
use crate::enumerate::{enumerate, locate_device};
use crate::error::{Error, ErrorKind, Result, LIBUSB_ERROR_OTHER};
use crate::host::{UsbDevice, UsbHandle, UsbSession};
use crate::usb::VidPid;
use std::io::{self, Write};

/// Counts from a [`reset_all_devices`] pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResetSummary {
    /// Hubs skipped
    pub skipped: usize,
    /// Devices a reset was attempted on
    pub attempted: usize,
    /// Of `attempted`, those that reset successfully (including re-enumeration)
    pub succeeded: usize,
}

fn open_failure_reason(e: &Error) -> String {
    match e.kind {
        ErrorKind::NoMemory => "memory allocation failed".into(),
        ErrorKind::Access => "no permission".into(),
        ErrorKind::NoDevice => "device not found".into(),
        _ => e.message.to_owned(),
    }
}

/// Open `device`, issue a port reset and close it again
///
/// Returns true if the reset was issued. A reset reporting "not found" is success: the device dropped off the bus to re-enumerate, which is what a reset does. `None` fails without touching the subsystem. Failures are reported on stderr and never panic or propagate.
pub fn reset_device<D: UsbDevice>(device: Option<&D>) -> bool {
    reset_device_to(device, &mut io::stdout().lock(), &mut io::stderr().lock())
}

/// [`reset_device`] reporting progress to `out` and failures to `err`
///
/// Failing to write a report does not change the outcome.
pub fn reset_device_to<D, O, E>(device: Option<&D>, out: &mut O, err: &mut E) -> bool
where
    D: UsbDevice,
    O: Write,
    E: Write,
{
    let device = match device {
        Some(d) => d,
        None => return false,
    };

    let record = match device.record() {
        Ok(r) => r,
        Err(e) => {
            let _ = writeln!(err, "ERR: failed to read device descriptor ({:#})", e);
            return false;
        }
    };
    let _ = writeln!(out, "Reset device {}", record.vidpid());
    let _ = out.flush();

    let mut handle = match device.open() {
        Ok(h) => h,
        Err(e) => {
            log::debug!("Open {} failed: {}", record, e);
            let _ = writeln!(err, "ERR: failed to open device ({})", open_failure_reason(&e));
            return false;
        }
    };

    let ret = handle.reset();
    drop(handle);

    match ret {
        Ok(()) => {
            log::info!("Reset {}", record);
            true
        }
        Err(e) if e.kind == ErrorKind::NotFound => {
            let _ = writeln!(
                err,
                "WARN: Device reset successfully, however device re-enumeration required."
            );
            true
        }
        Err(e) => {
            let _ = writeln!(
                err,
                "ERR: Reset failed with code {} ({:#})",
                e.kind.libusb_code().unwrap_or(LIBUSB_ERROR_OTHER),
                e
            );
            false
        }
    }
}

/// Reset every device in a fresh snapshot of `session` that is not a hub
///
/// Every non-hub device gets exactly one attempt regardless of how earlier devices fared.
pub fn reset_all_devices<S: UsbSession>(session: &S) -> Result<ResetSummary> {
    let mut summary = ResetSummary::default();

    for (device, record) in enumerate(session)? {
        if record.is_hub() {
            log::debug!("Skipping hub {}", record);
            summary.skipped += 1;
            continue;
        }

        summary.attempted += 1;
        if reset_device(Some(&device)) {
            summary.succeeded += 1;
        }
    }

    log::info!(
        "Reset {} of {} devices, skipped {} hubs",
        summary.succeeded,
        summary.attempted,
        summary.skipped
    );

    Ok(summary)
}

/// Locate the first device matching `target` and reset it
///
/// Returns the outcome of [`reset_device`], or a [`ErrorKind::NotFound`] error naming `target` when nothing matches; in that case no reset is attempted.
pub fn reset_matching_device<S: UsbSession>(session: &S, target: &VidPid) -> Result<bool> {
    match locate_device(session, target)? {
        // located device holds the extra reference until dropped at the end of this arm
        Some(device) => Ok(reset_device(Some(&device))),
        None => Err(Error::new(
            ErrorKind::NotFound,
            &format!("Unable to locate device {}.", target),
        )),
    }
}
