//! Per-invocation configuration.
//!
//! There is no process-wide configuration: a [`FrameConfig`] is passed to
//! [`invoke_with`](crate::invoke_with) and threaded explicitly into nested
//! calls that want the same behavior.

use clap::ValueEnum;

/// What a frame does when its body panics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum FaultPolicy {
    /// Let the panic unwind through the caller. Frame resources are still
    /// released on the way out.
    #[default]
    Propagate,
    /// Catch the panic at the frame boundary and finalize the slot with
    /// [`ErrorCode::FAULT`](crate::ErrorCode::FAULT).
    ReservedCode,
    /// Log the fault and abort the process.
    Abort,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameConfig {
    pub fault_policy: FaultPolicy,
}

impl FrameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fault_policy(mut self, fault_policy: FaultPolicy) -> Self {
        self.fault_policy = fault_policy;
        self
    }
}
