//! The value-or-error handle returned by every frame invocation.

use crate::error::ErrorCode;
use crate::slot::{Slot, SlotState, SlotStatus};
use std::cell::Ref;
use std::fmt;

/// Boolean-testable view over a [`Slot`].
///
/// Callers test first and then branch:
///
/// ```
/// use earlyout::invoke;
///
/// let carrier = invoke("answer", |frame| frame.finish(42u32));
/// if carrier.is_ok() {
///     assert_eq!(*carrier.value(), 42);
/// } else {
///     panic!("unexpected error {}", carrier.error());
/// }
/// ```
///
/// Cloning a carrier adds another reader of the same slot; every holder sees
/// the state the frame finalized.
///
/// A carrier is deliberately not `#[must_use]`: dropping one that holds an
/// error discards the error without any warning.
pub struct Carrier<T> {
    slot: Slot<T>,
}

impl<T> Carrier<T> {
    /// Wraps a shared slot. No side effects.
    pub fn new(slot: Slot<T>) -> Self {
        Self { slot }
    }

    /// A carrier that already holds `value`, for code outside any frame.
    pub fn from_value(value: T) -> Self {
        let slot = Slot::new();
        slot.finalize(SlotState::Value(value));
        Self::new(slot)
    }

    /// A carrier that already holds `code`.
    pub fn from_error(code: ErrorCode) -> Self {
        let slot = Slot::new();
        slot.finalize(SlotState::Error(code));
        Self::new(slot)
    }

    /// True iff the slot holds a value.
    ///
    /// Before the producing frame finalizes this is `false`, which says
    /// nothing about the eventual outcome.
    pub fn is_ok(&self) -> bool {
        self.slot.status() == SlotStatus::Value
    }

    pub fn status(&self) -> SlotStatus {
        self.slot.status()
    }

    /// Borrows the held value.
    ///
    /// # Panics
    /// If [`Carrier::is_ok`] is false.
    pub fn value(&self) -> Ref<'_, T> {
        Ref::map(self.slot.state(), |state| match state {
            SlotState::Value(value) => value,
            SlotState::Error(code) => panic!("Dereferenced a carrier holding error {code}"),
            SlotState::Unset => panic!("Dereferenced a carrier before its frame finalized"),
        })
    }

    /// The held error code.
    ///
    /// # Panics
    /// If [`Carrier::is_ok`] is true, or the producing frame has not finalized.
    pub fn error(&self) -> ErrorCode {
        match &*self.slot.state() {
            SlotState::Error(code) => *code,
            SlotState::Value(_) => panic!("Requested the error of a carrier holding a value"),
            SlotState::Unset => panic!("Requested the error of a carrier before its frame finalized"),
        }
    }

    /// Number of handles on the slot, the producing frame's included.
    pub fn holders(&self) -> usize {
        self.slot.holders()
    }

    /// Converts into a standard result, for callers that prefer `match` or `?`.
    ///
    /// An error is always handed out. A value is moved out, which needs this
    /// to be the last handle on the slot; with other holders alive use
    /// [`Carrier::cloned_result`].
    ///
    /// # Panics
    /// If the slot is unset, or holds a value that another handle still shares.
    pub fn into_result(self) -> Result<T, ErrorCode> {
        match self.slot.status() {
            SlotStatus::Unset => panic!("Carrier consumed before its frame finalized"),
            SlotStatus::Error => return Err(self.error()),
            SlotStatus::Value => {}
        }
        match self.slot.into_state() {
            Ok(SlotState::Value(value)) => Ok(value),
            Ok(_) => unreachable!("finalized slots never change"),
            Err(_) => panic!("Carrier value moved out while other holders share the slot"),
        }
    }
}

impl<T: Clone> Carrier<T> {
    /// Copies the outcome out, leaving the slot and every holder untouched.
    ///
    /// # Panics
    /// If the producing frame has not finalized.
    pub fn cloned_result(&self) -> Result<T, ErrorCode> {
        match &*self.slot.state() {
            SlotState::Value(value) => Ok(value.clone()),
            SlotState::Error(code) => Err(*code),
            SlotState::Unset => panic!("Carrier read before its frame finalized"),
        }
    }
}

impl<T> Clone for Carrier<T> {
    fn clone(&self) -> Self {
        Self::new(self.slot.share())
    }
}

impl<T> From<Result<T, ErrorCode>> for Carrier<T> {
    fn from(result: Result<T, ErrorCode>) -> Self {
        match result {
            Ok(value) => Self::from_value(value),
            Err(code) => Self::from_error(code),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Carrier<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Carrier").field(&*self.slot.state()).finish()
    }
}
