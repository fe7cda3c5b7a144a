//! The suspension protocol run at every propagation point.
//!
//! [`Frame::propagate`](crate::Frame::propagate) drives an [`Awaitable`]
//! through three steps, always in this order:
//!
//! 1. [`Awaitable::is_ready`], which is `false` for every built-in awaitable;
//!    one that reports ready skips straight to step 3;
//! 2. [`Awaitable::suspend`], which either lets the awaiting frame resume, or
//!    forwards the error into the awaiting frame and destroys it;
//! 3. [`Awaitable::resume`], reached only when step 2 said so, which hands out
//!    the value.

use crate::carrier::Carrier;
use crate::error::ErrorCode;
use crate::frame::Frame;
use crate::slot::SlotStatus;
use std::io;
use tracing::debug;

/// Outcome of the suspend-decision step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The awaited value is present; the awaiting frame continues.
    Resume,
    /// The awaiting frame was finalized with an error and destroyed.
    Suspend,
}

/// Something a frame body can await at a propagation point.
///
/// Implementations must uphold two rules:
/// - `is_ready` returns `true` only when `resume` yields a value;
/// - `suspend` returns [`Decision::Suspend`] only after calling
///   [`Frame::unwind`] on the awaiting frame.
pub trait Awaitable {
    type Output;

    fn is_ready(&self) -> bool;

    fn suspend<T>(&self, awaiting: &mut Frame<T>) -> Decision;

    fn resume(self) -> Self::Output;
}

/// Shared error path of the decision step.
fn forward<T>(code: Option<ErrorCode>, awaiting: &mut Frame<T>) -> Decision {
    match code {
        Some(code) => {
            debug!(frame = awaiting.name(), %code, "awaited error, destroying frame");
            awaiting.unwind(code);
            Decision::Suspend
        }
        None => Decision::Resume,
    }
}

/// The code a finalized carrier forwards, if any.
fn carrier_code<U>(carrier: &Carrier<U>) -> Option<ErrorCode> {
    match carrier.status() {
        SlotStatus::Unset => panic!("Awaited a carrier before its frame finalized"),
        SlotStatus::Value => None,
        SlotStatus::Error => Some(carrier.error()),
    }
}

/// Awaiting by value moves the result out, so this must be the last handle
/// on the slot whenever it holds a value.
impl<U> Awaitable for Carrier<U> {
    type Output = U;

    fn is_ready(&self) -> bool {
        false
    }

    fn suspend<T>(&self, awaiting: &mut Frame<T>) -> Decision {
        forward(carrier_code(self), awaiting)
    }

    fn resume(self) -> U {
        match self.into_result() {
            Ok(value) => value,
            Err(code) => panic!("Resumed a frame with awaited error {code}"),
        }
    }
}

/// Awaiting a shared carrier copies the value and leaves the other holders alone.
impl<U: Clone> Awaitable for &Carrier<U> {
    type Output = U;

    fn is_ready(&self) -> bool {
        false
    }

    fn suspend<T>(&self, awaiting: &mut Frame<T>) -> Decision {
        forward(carrier_code(*self), awaiting)
    }

    fn resume(self) -> U {
        match self.cloned_result() {
            Ok(value) => value,
            Err(code) => panic!("Resumed a frame with awaited error {code}"),
        }
    }
}

impl<U> Awaitable for Result<U, ErrorCode> {
    type Output = U;

    fn is_ready(&self) -> bool {
        false
    }

    fn suspend<T>(&self, awaiting: &mut Frame<T>) -> Decision {
        forward(self.as_ref().err().copied(), awaiting)
    }

    fn resume(self) -> U {
        match self {
            Ok(value) => value,
            Err(code) => panic!("Resumed a frame with awaited error {code}"),
        }
    }
}

/// Lets a body await plain I/O calls; the OS error number becomes the code.
impl<U> Awaitable for io::Result<U> {
    type Output = U;

    fn is_ready(&self) -> bool {
        false
    }

    fn suspend<T>(&self, awaiting: &mut Frame<T>) -> Decision {
        forward(self.as_ref().err().map(ErrorCode::from), awaiting)
    }

    fn resume(self) -> U {
        match self {
            Ok(value) => value,
            Err(error) => panic!("Resumed a frame with awaited error {error}"),
        }
    }
}
