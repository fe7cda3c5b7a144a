//! Early-return error propagation with scoped frame cleanup.
//!
//! Every carrier-returning function runs its body inside a [`Frame`]. The
//! caller gets a [`Carrier`]: a boolean-testable handle that holds either a
//! value or a numeric [`ErrorCode`].
//!
//! Inside another frame, awaiting a carrier at a propagation point either
//! hands back the value, or writes the identical error into the awaiting
//! frame's own carrier, releases everything the awaiting frame constructed
//! (last first), and leaves the body through `?`.
//!
//! ```
//! use earlyout::{Carrier, ErrorCode, invoke};
//!
//! fn parse(input: &'static str) -> Carrier<u64> {
//!     invoke("parse", move |frame| match input.parse::<u64>() {
//!         Ok(value) => frame.finish(value),
//!         Err(_) => frame.fail(ErrorCode::new(22)),
//!     })
//! }
//!
//! fn double(input: &'static str) -> Carrier<u64> {
//!     invoke("double", move |frame| {
//!         let value = frame.propagate(parse(input))?;
//!         frame.finish(value * 2)
//!     })
//! }
//!
//! assert_eq!(*double("21").value(), 42);
//! assert_eq!(double("x").error(), ErrorCode::new(22));
//! ```

pub mod carrier;
pub mod config;
pub mod error;
pub mod files;
pub mod frame;
pub mod protocol;
pub mod slot;

pub use carrier::Carrier;
pub use config::{FaultPolicy, FrameConfig};
pub use error::ErrorCode;
pub use frame::controller::FrameController;
pub use frame::resources::Held;
pub use frame::{Exit, Finalized, Frame, FrameState, Suspended};
pub use protocol::{Awaitable, Decision};

/// Invokes `body` in a new frame with the default configuration.
///
/// The body runs to its end before this returns.
pub fn invoke<T, F>(name: &'static str, body: F) -> Carrier<T>
where
    F: FnOnce(&mut Frame<T>) -> Exit,
{
    invoke_with(&FrameConfig::default(), name, body)
}

/// Invokes `body` in a new frame configured by `config`.
pub fn invoke_with<T, F>(config: &FrameConfig, name: &'static str, body: F) -> Carrier<T>
where
    F: FnOnce(&mut Frame<T>) -> Exit,
{
    let (controller, carrier) = FrameController::new(name, config);
    controller.run(body);
    carrier
}
