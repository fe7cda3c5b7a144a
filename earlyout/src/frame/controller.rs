//! Lifecycle of a single invocation.

use super::{Exit, Frame};
use crate::carrier::Carrier;
use crate::config::{FaultPolicy, FrameConfig};
use crate::error::ErrorCode;
use crate::slot::Slot;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error};

/// Owns one frame from allocation to teardown.
///
/// The body starts as soon as [`FrameController::run`] is called and the frame
/// is torn down as soon as the body returns; neither step waits for a resume
/// from outside.
#[derive(Debug)]
pub struct FrameController<T> {
    frame: Frame<T>,
    fault_policy: FaultPolicy,
}

impl<T> FrameController<T> {
    /// Allocates an unset slot and the carrier bound to it.
    ///
    /// The carrier exists before the body has run; it only becomes meaningful
    /// once [`FrameController::run`] returns.
    pub fn new(name: &'static str, config: &FrameConfig) -> (Self, Carrier<T>) {
        let slot = Slot::new();
        let carrier = Carrier::new(slot.share());
        let controller = Self {
            frame: Frame::new(name, slot),
            fault_policy: config.fault_policy,
        };
        (controller, carrier)
    }

    /// Runs `body` to its end and tears the frame down.
    ///
    /// Under [`FaultPolicy::Propagate`] a panic in the body leaves this
    /// function by unwinding; the frame's resources are released when the
    /// controller is dropped.
    pub fn run<F>(mut self, body: F)
    where
        F: FnOnce(&mut Frame<T>) -> Exit,
    {
        debug!(frame = self.frame.name(), "frame running");
        match self.fault_policy {
            FaultPolicy::Propagate => {
                let _ = body(&mut self.frame);
            }
            policy => {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| body(&mut self.frame)));
                if let Err(payload) = outcome {
                    self.unhandled_fault(policy, payload.as_ref());
                }
            }
        }
        self.frame.teardown();
    }

    fn unhandled_fault(&mut self, policy: FaultPolicy, payload: &(dyn Any + Send)) {
        let message = payload
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
            .unwrap_or("<non-string panic payload>");
        error!(frame = self.frame.name(), message, "unhandled fault in frame body");

        if policy == FaultPolicy::Abort {
            std::process::abort();
        }
        // A body may fault after it already finalized; the first write wins.
        if !self.frame.state().is_terminal() {
            let _ = self.frame.fail(ErrorCode::FAULT);
        }
    }
}
