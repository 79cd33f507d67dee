//! Error type used within crate with From for commonly used crate errors
use std::error;
use std::{fmt, io};

/// Result type used within crate
pub type Result<T> = std::result::Result<T, Error>;

/// libusb `LIBUSB_ERROR_OTHER`, used for anything without a dedicated code
pub const LIBUSB_ERROR_OTHER: i32 = -99;

#[derive(Debug, PartialEq, Eq, Clone)]
/// Kind of error produced
pub enum ErrorKind {
    /// Memory allocation failed in the USB subsystem
    NoMemory,
    /// Access denied opening device - check permissions
    Access,
    /// Device is no longer present on the bus
    NoDevice,
    /// Entity not found; for a reset this means the device re-enumerated
    NotFound,
    /// Any other libusb error with the raw libusb error number
    LibUSB(i32),
    /// Error parsing a string into a value
    Parsing,
    /// Invalid arg for method or cli
    InvalidArg,
    /// [`std::io::Error`] writing output
    Io,
    /// Error From other crate without enum variant
    Other(&'static str),
}

impl ErrorKind {
    /// The raw libusb error number this kind corresponds to, if it came from libusb
    pub fn libusb_code(&self) -> Option<i32> {
        match self {
            ErrorKind::NoMemory => Some(-11),
            ErrorKind::Access => Some(-3),
            ErrorKind::NoDevice => Some(-4),
            ErrorKind::NotFound => Some(-5),
            ErrorKind::LibUSB(code) => Some(*code),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq)]
/// usbreset error which impl [`std::error`]
pub struct Error {
    /// The [`ErrorKind`]
    pub kind: ErrorKind,
    /// String description
    pub message: String,
}

impl Error {
    /// New error helper
    pub fn new(kind: ErrorKind, message: &str) -> Error {
        Error {
            kind,
            message: message.to_string(),
        }
    }

    /// The [`ErrorKind`]
    pub fn kind(&self) -> ErrorKind {
        self.kind.to_owned()
    }

    /// The description
    pub fn message(&self) -> &String {
        &self.message
    }
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if f.alternate() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{:?} Error: {}", self.kind, self.message)
        }
    }
}

impl From<rusb::Error> for Error {
    fn from(error: rusb::Error) -> Self {
        let kind = match error {
            rusb::Error::NoMem => ErrorKind::NoMemory,
            rusb::Error::Access => ErrorKind::Access,
            rusb::Error::NoDevice => ErrorKind::NoDevice,
            rusb::Error::NotFound => ErrorKind::NotFound,
            rusb::Error::Io => ErrorKind::LibUSB(-1),
            rusb::Error::InvalidParam => ErrorKind::LibUSB(-2),
            rusb::Error::Busy => ErrorKind::LibUSB(-6),
            rusb::Error::Timeout => ErrorKind::LibUSB(-7),
            rusb::Error::Overflow => ErrorKind::LibUSB(-8),
            rusb::Error::Pipe => ErrorKind::LibUSB(-9),
            rusb::Error::Interrupted => ErrorKind::LibUSB(-10),
            rusb::Error::NotSupported => ErrorKind::LibUSB(-12),
            _ => ErrorKind::LibUSB(LIBUSB_ERROR_OTHER),
        };

        Error {
            kind,
            message: error.to_string(),
        }
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Error {
            kind: ErrorKind::Io,
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error {
            kind: ErrorKind::Other("serde_json"),
            message: error.to_string(),
        }
    }
}

impl From<Error> for io::Error {
    fn from(val: Error) -> Self {
        io::Error::new(io::ErrorKind::Other, val.message)
    }
}
