//! Defines for USB, mainly those covered at [usb.org](https://www.usb.org), and the device record read from a descriptor
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ErrorKind};

/// Device class from `bDeviceClass`, only those this tool acts on are named [ref](https://www.usb.org/defined-class-codes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassCode {
    /// 0x00: class is given per interface
    UseInterfaceDescriptor,
    /// 0x09: never reset by `-a`
    Hub,
    /// 0xef
    Miscellaneous,
    /// 0xff
    VendorSpecific,
    /// Any other class, raw
    Other(u8),
}

impl From<u8> for ClassCode {
    fn from(b: u8) -> ClassCode {
        match b {
            0x00 => ClassCode::UseInterfaceDescriptor,
            0x09 => ClassCode::Hub,
            0xef => ClassCode::Miscellaneous,
            0xff => ClassCode::VendorSpecific,
            b => ClassCode::Other(b),
        }
    }
}

/// Vendor and product ID pair used to select a device
///
/// Parses from exactly `XXXX:YYYY`, four hex digits either side in either case:
///
/// ```
/// use usbreset::usb::VidPid;
///
/// let vp: VidPid = "1D6B:0002".parse().unwrap();
/// assert_eq!(vp, VidPid { vendor_id: 0x1d6b, product_id: 0x0002 });
/// assert_eq!(vp.to_string(), "1d6b:0002");
/// assert!("1d6b:2".parse::<VidPid>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VidPid {
    /// idVendor
    pub vendor_id: u16,
    /// idProduct
    pub product_id: u16,
}

impl fmt::Display for VidPid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:04x}:{:04x}", self.vendor_id, self.product_id)
    }
}

fn parse_hex_id(s: &str) -> Option<u16> {
    if s.len() != 4 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(s, 16).ok()
}

impl FromStr for VidPid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            log::debug!("'{}' is not of the form XXXX:YYYY", s);
            Error::new(ErrorKind::Parsing, "invalid vendorID:productID pair.")
        };
        let (vendor, product) = s.split_once(':').ok_or_else(invalid)?;

        match (parse_hex_id(vendor), parse_hex_id(product)) {
            (Some(vendor_id), Some(product_id)) => Ok(VidPid {
                vendor_id,
                product_id,
            }),
            _ => Err(invalid()),
        }
    }
}

/// Descriptor fields of one attached device, copied out of the device descriptor during enumeration
///
/// A record is a value: it says nothing about whether the device it was read from is still attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    /// Bus number
    pub bus: u8,
    /// Port number on the parent hub or root port; 0 for root hubs
    pub port: u8,
    /// Device address on the bus
    pub address: u8,
    /// idVendor
    pub vendor_id: u16,
    /// idProduct
    pub product_id: u16,
    /// bDeviceClass raw value
    pub class: u8,
}

impl DeviceRecord {
    /// [`ClassCode`] view of the raw `class`
    pub fn class_code(&self) -> ClassCode {
        ClassCode::from(self.class)
    }

    /// Hubs are excluded from bulk reset
    pub fn is_hub(&self) -> bool {
        self.class_code() == ClassCode::Hub
    }

    /// The [`VidPid`] of this device
    pub fn vidpid(&self) -> VidPid {
        VidPid {
            vendor_id: self.vendor_id,
            product_id: self.product_id,
        }
    }

    /// Whether this device matches `target` exactly
    pub fn matches(&self, target: &VidPid) -> bool {
        self.vidpid() == *target
    }
}

impl fmt::Display for DeviceRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Bus: {} Port: {} Address: {} VID:PID = {} Class: {:x}",
            self.bus,
            self.port,
            self.address,
            self.vidpid(),
            self.class
        )
    }
}
