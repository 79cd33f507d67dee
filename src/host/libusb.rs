//! Uses rusb (upto date libusb fork) to enumerate and reset devices - same lib as lsusb.
use super::*;
use crate::error::Error;
use rusb as libusb;
use rusb::UsbContext;

fn log_level(debug: u8) -> libusb::LogLevel {
    match debug {
        0 => libusb::LogLevel::None,
        1 => libusb::LogLevel::Warning,
        2 => libusb::LogLevel::Info,
        _ => libusb::LogLevel::Debug,
    }
}

/// Classify `error` but describe it with `context`
fn libusb_error(error: libusb::Error, context: &str) -> Error {
    let message = format!("{}: {}", context, error);
    Error {
        kind: Error::from(error).kind,
        message,
    }
}

/// A libusb context; one per top-level operation
pub struct LibUsbSession {
    context: libusb::Context,
}

/// A referenced libusb device; the reference is released on drop
#[derive(Debug)]
pub struct LibUsbDevice {
    device: libusb::Device<libusb::Context>,
}

/// An open libusb device handle; closed on drop
pub struct LibUsbHandle {
    handle: libusb::DeviceHandle<libusb::Context>,
}

impl LibUsbSession {
    /// Initialise a new libusb context logging at `debug` verbosity
    ///
    /// The level is set on this context only; libusb's global default context is never started.
    pub fn new(debug: u8) -> Result<Self> {
        let mut context =
            libusb::Context::new().map_err(|e| libusb_error(e, "Failed to initialise libusb"))?;
        context.set_log_level(log_level(debug));
        log::debug!("Opened libusb session");

        Ok(LibUsbSession { context })
    }
}

impl UsbSession for LibUsbSession {
    type Device = LibUsbDevice;

    fn snapshot(&self) -> Result<Vec<LibUsbDevice>> {
        // libusb_get_device_list; each Device from iter() takes its own ref and the list is freed on drop
        let list = self
            .context
            .devices()
            .map_err(|e| libusb_error(e, "Failed to get device list from libusb"))?;
        log::debug!("libusb reported {} devices", list.len());

        Ok(list.iter().map(|device| LibUsbDevice { device }).collect())
    }
}

impl UsbDevice for LibUsbDevice {
    type Handle = LibUsbHandle;

    fn record(&self) -> Result<DeviceRecord> {
        let device_desc = self.device.device_descriptor()?;

        Ok(DeviceRecord {
            bus: self.device.bus_number(),
            port: self.device.port_number(),
            address: self.device.address(),
            vendor_id: device_desc.vendor_id(),
            product_id: device_desc.product_id(),
            class: device_desc.class_code(),
        })
    }

    fn open(&self) -> Result<LibUsbHandle> {
        let handle = self.device.open()?;
        log::trace!("Opened {:?}", self.device);

        Ok(LibUsbHandle { handle })
    }
}

impl UsbHandle for LibUsbHandle {
    fn reset(&mut self) -> Result<()> {
        self.handle.reset().map_err(Error::from)
    }
}
