//! Enumerate attached devices and locate one by [`VidPid`]
use crate::error::Result;
use crate::host::{UsbDevice, UsbSession};
use crate::usb::{DeviceRecord, VidPid};

/// Snapshot `session` and pair each device with its [`DeviceRecord`], in subsystem order
///
/// Devices whose descriptor cannot be read are skipped with a warning, so the returned length is the number of usable devices.
pub fn enumerate<S: UsbSession>(session: &S) -> Result<Vec<(S::Device, DeviceRecord)>> {
    let devices = session.snapshot()?;
    let total = devices.len();

    let ret: Vec<(S::Device, DeviceRecord)> = devices
        .into_iter()
        .filter_map(|device| match device.record() {
            Ok(record) => Some((device, record)),
            Err(e) => {
                log::warn!("Failed to read device descriptor for {:?}: {}", device, e);
                None
            }
        })
        .collect();

    log::debug!("Enumerated {} of {} devices", ret.len(), total);
    Ok(ret)
}

/// The [`DeviceRecord`] of every attached device; the snapshot is released before returning
pub fn list_devices<S: UsbSession>(session: &S) -> Result<Vec<DeviceRecord>> {
    Ok(enumerate(session)?
        .into_iter()
        .map(|(_, record)| record)
        .collect())
}

/// First device in enumeration order matching `target` exactly, or `None`
///
/// The returned device keeps its own reference after the snapshot is released; it is released when the caller drops it.
pub fn locate_device<S: UsbSession>(session: &S, target: &VidPid) -> Result<Option<S::Device>> {
    let found = enumerate(session)?
        .into_iter()
        .find(|(_, record)| record.matches(target))
        .map(|(device, record)| {
            log::debug!("Located {} as {}", target, record);
            device
        });

    if found.is_none() {
        log::debug!("No device matching {}", target);
    }

    Ok(found)
}
