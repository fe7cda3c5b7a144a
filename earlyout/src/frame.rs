//! Frames: one invocation of a carrier-returning function.
//!
//! A [`Frame`] is what a body sees while it runs. It owns write access to the
//! slot behind the caller's [`Carrier`](crate::Carrier), tracks which terminal
//! state it reached, and keeps the stack of frame-local resources.
//!
//! Bodies are closures returning [`Exit`]. The two halves of that result can
//! only be produced by the frame itself:
//! - [`Finalized`] comes from [`Frame::finish`] or [`Frame::fail`];
//! - [`Suspended`] comes from a propagation point that destroyed the frame,
//!   so `?` on [`Frame::propagate`] is the early return.

pub mod controller;
pub mod resources;

use crate::error::ErrorCode;
use crate::protocol::{Awaitable, Decision};
use crate::slot::{Slot, SlotState};
use resources::{Held, ResourceStack};
use std::fmt;
use tracing::{debug, trace};

/// Lifecycle of a frame. Creation and the start of the body are a single step,
/// so a frame is observed `Running` from the start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    Running,
    CompletedWithValue,
    CompletedWithError,
    DestroyedOnPropagatedError,
}

impl FrameState {
    pub fn is_terminal(self) -> bool {
        self != FrameState::Running
    }
}

/// Proof that a body finalized its frame.
#[derive(Debug)]
pub struct Finalized {
    _private: (),
}

/// Proof that a propagation point destroyed the frame. Return it with `?`.
#[derive(Debug)]
pub struct Suspended {
    frame: &'static str,
}

impl Suspended {
    /// Name of the frame that was destroyed.
    pub fn frame(&self) -> &'static str {
        self.frame
    }
}

impl fmt::Display for Suspended {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame '{}' suspended on a propagated error", self.frame)
    }
}

/// Value every frame body returns.
pub type Exit = Result<Finalized, Suspended>;

pub struct Frame<T> {
    name: &'static str,
    slot: Slot<T>,
    state: FrameState,
    resources: ResourceStack,
}

impl<T> Frame<T> {
    pub(crate) fn new(name: &'static str, slot: Slot<T>) -> Self {
        Self {
            name,
            slot,
            state: FrameState::Running,
            resources: ResourceStack::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    /// Finalizes the slot with `value`.
    pub fn finish(&mut self, value: T) -> Exit {
        self.complete(SlotState::Value(value), FrameState::CompletedWithValue);
        Ok(Finalized { _private: () })
    }

    /// Finalizes the slot with a leaf error.
    pub fn fail(&mut self, code: ErrorCode) -> Exit {
        self.complete(SlotState::Error(code), FrameState::CompletedWithError);
        Ok(Finalized { _private: () })
    }

    /// Awaits `awaited` at a propagation point.
    ///
    /// On a value the body continues with it. On an error the frame is
    /// finalized with the identical code and `Err(Suspended)` is returned so
    /// that `?` leaves the body. Leaving drops the body's locals; the
    /// controller then releases the frame's resources, last first, before the
    /// caller sees the carrier.
    pub fn propagate<A: Awaitable>(&mut self, awaited: A) -> Result<A::Output, Suspended> {
        self.assert_running();
        if !awaited.is_ready() {
            match awaited.suspend(self) {
                Decision::Resume => {}
                Decision::Suspend => {
                    assert_eq!(
                        self.state,
                        FrameState::DestroyedOnPropagatedError,
                        "Awaitable suspended frame '{}' without unwinding it",
                        self.name
                    );
                    return Err(Suspended { frame: self.name });
                }
            }
        }
        trace!(frame = self.name, "resuming after propagation point");
        Ok(awaited.resume())
    }

    /// Error path of the suspend decision: finalize with `code` and mark the
    /// frame destroyed. Its resources go at teardown, once the body's locals
    /// are gone.
    ///
    /// Called by [`Awaitable::suspend`] implementations.
    pub fn unwind(&mut self, code: ErrorCode) {
        self.assert_running();
        self.slot.finalize(SlotState::Error(code));
        self.state = FrameState::DestroyedOnPropagatedError;
        debug!(frame = self.name, %code, live = self.resources.len(), "frame destroyed");
    }

    /// Hands `resource` to the frame. It is dropped when the frame ends,
    /// in reverse order of adoption.
    pub fn adopt<R: 'static>(&mut self, resource: R) -> Held<R> {
        self.resources.adopt(resource)
    }

    /// Runs `cleanup` when the frame ends.
    pub fn defer<F: FnOnce() + 'static>(&mut self, cleanup: F) {
        self.resources.defer(cleanup)
    }

    /// Access to an adopted resource. `None` once the frame released it.
    pub fn get_mut<R: 'static>(&mut self, held: Held<R>) -> Option<&mut R> {
        self.resources.get_mut(held)
    }

    pub(crate) fn teardown(&mut self) {
        assert!(
            self.state.is_terminal() && self.slot.is_finalized(),
            "Frame '{}' exited without finalizing its slot",
            self.name
        );
        self.resources.release(self.name);
        debug!(frame = self.name, state = ?self.state, "frame torn down");
    }

    fn complete(&mut self, state: SlotState<T>, next: FrameState) {
        self.assert_running();
        self.slot.finalize(state);
        self.state = next;
    }

    fn assert_running(&self) {
        assert_eq!(
            self.state,
            FrameState::Running,
            "Frame '{}' used after it ended",
            self.name
        );
    }
}

impl<T> fmt::Debug for Frame<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("slot", &self.slot.status())
            .field("resources", &self.resources)
            .finish()
    }
}
