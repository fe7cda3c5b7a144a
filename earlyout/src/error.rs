//! Numeric error codes carried by a [`Carrier`](crate::Carrier).
//!
//! The error domain is intentionally flat: a single unsigned code with no
//! message or payload. Codes are forwarded between frames byte-for-byte.

use std::fmt;
use std::io;

/// A single unsigned error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ErrorCode(u64);

impl ErrorCode {
    /// Reserved code written by the fault hook under
    /// [`FaultPolicy::ReservedCode`](crate::FaultPolicy::ReservedCode).
    pub const FAULT: ErrorCode = ErrorCode(u64::MAX);

    /// Reserved code for I/O failures that carry no OS error number.
    pub const IO: ErrorCode = ErrorCode(u64::MAX - 1);

    pub const fn new(code: u64) -> Self {
        Self(code)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// Whether this code is one of the reserved codes above.
    pub const fn is_reserved(self) -> bool {
        self.0 >= Self::IO.0
    }
}

impl From<u64> for ErrorCode {
    fn from(code: u64) -> Self {
        Self(code)
    }
}

impl From<ErrorCode> for u64 {
    fn from(code: ErrorCode) -> Self {
        code.0
    }
}

impl From<&io::Error> for ErrorCode {
    fn from(error: &io::Error) -> Self {
        match error.raw_os_error() {
            // errno values are non-negative on every platform we support
            Some(errno) => Self(errno as u64),
            None => Self::IO,
        }
    }
}

impl From<io::Error> for ErrorCode {
    fn from(error: io::Error) -> Self {
        Self::from(&error)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::FAULT => write!(f, "{} (internal fault)", self.0),
            Self::IO => write!(f, "{} (i/o error)", self.0),
            _ => write!(f, "{}", self.0),
        }
    }
}

impl std::error::Error for ErrorCode {}
