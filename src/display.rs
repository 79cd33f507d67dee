//! Printing of the device list, as plain text or JSON
use serde::Serialize;
use serde_with::skip_serializing_none;
use std::io::Write;
use usb_ids::{self, FromId};

use crate::error::Result;
use crate::usb::DeviceRecord;

/// Device list with the count leading, as for the text output
#[derive(Debug, Serialize)]
struct DeviceList<'a> {
    count: usize,
    devices: Vec<NamedDevice<'a>>,
}

/// [`DeviceRecord`] with names from the usb-ids database where known
#[skip_serializing_none]
#[derive(Debug, Serialize)]
struct NamedDevice<'a> {
    #[serde(flatten)]
    record: &'a DeviceRecord,
    vendor_name: Option<&'static str>,
    product_name: Option<&'static str>,
}

impl<'a> From<&'a DeviceRecord> for NamedDevice<'a> {
    fn from(record: &'a DeviceRecord) -> Self {
        NamedDevice {
            record,
            vendor_name: usb_ids::Vendor::from_id(record.vendor_id).map(|v| v.name()),
            product_name: usb_ids::Device::from_vid_pid(record.vendor_id, record.product_id)
                .map(|d| d.name()),
        }
    }
}

/// Write the count line then one line per device
pub fn write_devices<W: Write>(w: &mut W, records: &[DeviceRecord]) -> Result<()> {
    writeln!(w, "Number of attached USB devices = {}", records.len())?;
    for record in records {
        writeln!(w, "{}", record)?;
    }

    Ok(())
}

/// Write `records` as a pretty JSON object with `count` and `devices`
pub fn write_devices_json<W: Write>(w: &mut W, records: &[DeviceRecord]) -> Result<()> {
    let list = DeviceList {
        count: records.len(),
        devices: records.iter().map(NamedDevice::from).collect(),
    };
    serde_json::to_writer_pretty(&mut *w, &list)?;
    writeln!(w)?;

    Ok(())
}

/// Print `records` to stdout, as JSON if `json`
pub fn print_devices(records: &[DeviceRecord], json: bool) -> Result<()> {
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    if json {
        write_devices_json(&mut lock, records)
    } else {
        write_devices(&mut lock, records)
    }
}
