//! Access to the USB subsystem: sessions, device snapshots, device handles
//!
//! The traits here are the seam between the command logic and the library that actually talks to the host controller. [`libusb`] is the implementation used by the binary.
//!
//! ```no_run
//! use usbreset::host::{libusb::LibUsbSession, UsbDevice, UsbSession};
//!
//! let session = LibUsbSession::new(0).unwrap();
//! for device in session.snapshot().unwrap() {
//!     println!("{}", device.record().unwrap());
//! }
//! ```
use crate::error::Result;
use crate::usb::DeviceRecord;

pub mod libusb;

/// A session with the USB subsystem
///
/// Each top-level operation opens its own session and drops it when done; sessions are never shared.
pub trait UsbSession {
    /// Device type yielded by this session
    type Device: UsbDevice;

    /// Take a snapshot of currently attached devices in subsystem order
    ///
    /// Every returned device holds its own reference to the underlying subsystem device, so the subsystem list backing the snapshot is already released when this returns. Dropping a device releases its reference.
    fn snapshot(&self) -> Result<Vec<Self::Device>>;
}

/// A referenced, not yet opened, USB device
pub trait UsbDevice: std::fmt::Debug {
    /// Open handle type; closed when dropped
    type Handle: UsbHandle;

    /// Read the descriptor fields of the device
    fn record(&self) -> Result<DeviceRecord>;

    /// Open a handle to the device
    fn open(&self) -> Result<Self::Handle>;
}

/// An open device handle
pub trait UsbHandle {
    /// Issue a bus-level port reset
    fn reset(&mut self) -> Result<()>;
}

/// In-memory [`UsbSession`] recording every subsystem call, for unit tests
#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use crate::error::{Error, ErrorKind};
    use crate::usb::VidPid;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) enum Call {
        Snapshot,
        Open(VidPid),
        Reset(VidPid),
        Close(VidPid),
    }

    pub(crate) type CallLog = Rc<RefCell<Vec<Call>>>;

    #[derive(Debug, Clone)]
    pub(crate) struct MockDevice {
        pub record: DeviceRecord,
        pub open_error: Option<ErrorKind>,
        pub reset_error: Option<ErrorKind>,
        log: CallLog,
    }

    pub(crate) struct MockHandle {
        vidpid: VidPid,
        reset_error: Option<ErrorKind>,
        log: CallLog,
    }

    pub(crate) struct MockSession {
        pub devices: Vec<MockDevice>,
        pub snapshot_error: Option<ErrorKind>,
        pub log: CallLog,
    }

    pub(crate) fn record(vendor_id: u16, product_id: u16, class: u8) -> DeviceRecord {
        DeviceRecord {
            bus: 1,
            port: 1,
            address: 2,
            vendor_id,
            product_id,
            class,
        }
    }

    impl MockSession {
        pub fn new(records: &[DeviceRecord]) -> Self {
            let log = CallLog::default();
            MockSession {
                devices: records
                    .iter()
                    .map(|r| MockDevice {
                        record: *r,
                        open_error: None,
                        reset_error: None,
                        log: log.clone(),
                    })
                    .collect(),
                snapshot_error: None,
                log,
            }
        }

        pub fn calls(&self) -> Vec<Call> {
            self.log.borrow().clone()
        }

        pub fn resets(&self) -> Vec<VidPid> {
            self.calls()
                .into_iter()
                .filter_map(|c| match c {
                    Call::Reset(vp) => Some(vp),
                    _ => None,
                })
                .collect()
        }
    }

    impl MockDevice {
        pub fn detached(record: DeviceRecord) -> (Self, CallLog) {
            let log = CallLog::default();
            (
                MockDevice {
                    record,
                    open_error: None,
                    reset_error: None,
                    log: log.clone(),
                },
                log,
            )
        }
    }

    impl UsbSession for MockSession {
        type Device = MockDevice;

        fn snapshot(&self) -> Result<Vec<MockDevice>> {
            self.log.borrow_mut().push(Call::Snapshot);
            match &self.snapshot_error {
                Some(kind) => Err(Error::new(kind.clone(), "mock snapshot failure")),
                None => Ok(self.devices.clone()),
            }
        }
    }

    impl UsbDevice for MockDevice {
        type Handle = MockHandle;

        fn record(&self) -> Result<DeviceRecord> {
            Ok(self.record)
        }

        fn open(&self) -> Result<MockHandle> {
            self.log.borrow_mut().push(Call::Open(self.record.vidpid()));
            match &self.open_error {
                Some(kind) => Err(Error::new(kind.clone(), "mock open failure")),
                None => Ok(MockHandle {
                    vidpid: self.record.vidpid(),
                    reset_error: self.reset_error.clone(),
                    log: self.log.clone(),
                }),
            }
        }
    }

    impl UsbHandle for MockHandle {
        fn reset(&mut self) -> Result<()> {
            self.log.borrow_mut().push(Call::Reset(self.vidpid));
            match &self.reset_error {
                Some(kind) => Err(Error::new(kind.clone(), "mock reset failure")),
                None => Ok(()),
            }
        }
    }

    impl Drop for MockHandle {
        fn drop(&mut self) {
            self.log.borrow_mut().push(Call::Close(self.vidpid));
        }
    }
}
