//! Shared value-or-error cell.
//!
//! A [`Slot`] is shared between the frame that produces it (the only writer)
//! and the [`Carrier`](crate::Carrier) handed to the caller. It starts
//! [`SlotState::Unset`] and is finalized exactly once.

use crate::error::ErrorCode;
use std::cell::{Ref, RefCell};
use std::rc::Rc;

/// Contents of a slot.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotState<T> {
    /// The producing frame has not finalized yet.
    Unset,
    /// Finalized with a value.
    Value(T),
    /// Finalized with an error code.
    Error(ErrorCode),
}

/// Discriminant of a [`SlotState`], without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    Unset,
    Value,
    Error,
}

impl<T> SlotState<T> {
    pub fn status(&self) -> SlotStatus {
        match self {
            SlotState::Unset => SlotStatus::Unset,
            SlotState::Value(_) => SlotStatus::Value,
            SlotState::Error(_) => SlotStatus::Error,
        }
    }
}

/// Reference counted, write-once cell.
///
/// Single threaded by construction (`Rc`), so the writer and the readers
/// never need to lock.
#[derive(Debug)]
pub struct Slot<T>(Rc<RefCell<SlotState<T>>>);

impl<T> Slot<T> {
    /// Allocates a fresh, unset slot.
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(SlotState::Unset)))
    }

    /// Returns another handle to the same cell.
    pub(crate) fn share(&self) -> Self {
        Self(Rc::clone(&self.0))
    }

    /// Writes the final state.
    ///
    /// # Panics
    /// If the slot was already finalized, or if `state` is [`SlotState::Unset`].
    /// Either one is a protocol bug in the frame that owns the slot.
    pub fn finalize(&self, state: SlotState<T>) {
        assert!(
            !matches!(state, SlotState::Unset),
            "A slot cannot be finalized with an unset state"
        );
        let mut current = self.0.borrow_mut();
        // A second write means the owning frame kept running after it was
        // finalized. That breaks every reader, so kaboom.
        assert!(
            matches!(*current, SlotState::Unset),
            "Slot already finalized as {:?}",
            current.status()
        );
        *current = state;
    }

    pub fn status(&self) -> SlotStatus {
        self.0.borrow().status()
    }

    pub fn is_finalized(&self) -> bool {
        self.status() != SlotStatus::Unset
    }

    /// Borrows the current state.
    pub fn state(&self) -> Ref<'_, SlotState<T>> {
        self.0.borrow()
    }

    /// Number of live handles to this cell.
    pub fn holders(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    /// Takes the state out if this is the last handle.
    ///
    /// Returns the slot unchanged when other handles are still alive.
    pub fn into_state(self) -> Result<SlotState<T>, Self> {
        Rc::try_unwrap(self.0)
            .map(RefCell::into_inner)
            .map_err(Self)
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self::new()
    }
}
