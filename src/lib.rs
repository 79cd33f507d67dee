//! List attached USB devices and reset one, selected by vendor and product ID, or every device that is not a hub.
//!
//! Enumeration, open and reset go through libusb via [`host::libusb`]; everything above that is generic over the [`host`] traits.
#![warn(missing_docs)]
use simple_logger::SimpleLogger;

pub mod app;
pub mod display;
pub mod enumerate;
pub mod error;
pub mod host;
pub mod reset;
pub mod usb;

/// Set usbreset module and binary log level
pub fn set_log_level(debug: u8) -> crate::error::Result<()> {
    let level = match debug {
        0 => log::Level::Error,
        1 => log::Level::Info,
        2 => log::Level::Debug,
        _ => log::Level::Trace,
    };

    SimpleLogger::new()
        .with_utc_timestamps()
        .with_level(level.to_level_filter())
        .init()
        .map_err(|e| {
            crate::error::Error::new(
                crate::error::ErrorKind::Other("simple_logger"),
                &format!("Failed to set log level: {}", e),
            )
        })?;

    Ok(())
}

// run any Rust code as doctest
#[doc = include_str!("../README.md")]
#[cfg(doctest)]
pub struct ReadmeDoctests;
