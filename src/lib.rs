//! Keyboard backlight control through embedded controller registers.
//!
//! This crate drives a single-zone keyboard backlight whose level lives in
//! the embedded controller's (EC) RAM. The register address and values
//! differ between board variants; the exposed brightness is a small
//! board-independent step.
//!
//! Brightness can change from two directions:
//!
//! - a caller asks for a new step ([`BacklightControl::set`]), which is mapped
//!   for the running board and written to the EC;
//! - the firmware handles a hotkey and reports the new step
//!   ([`BacklightControl::notify_external_change`]), which only updates the
//!   exposed value and is never written back.
//!
//! # Example
//!
//! ```no_run
//! use ec_kbd_backlight::{
//!     BacklightControl, BacklightController, CachedResolver, DmiResolver, I2ecChannel,
//! };
//!
//! fn main() -> Result<(), ec_kbd_backlight::BacklightError> {
//!     let resolver = CachedResolver::new(DmiResolver::new());
//!     let controller = BacklightController::new(I2ecChannel::open()?, resolver);
//!
//!     // Caller-driven: writes the EC register for this board
//!     controller.set(1)?;
//!
//!     // Firmware-driven: only updates the exposed value
//!     controller.notify_external_change(2);
//!     assert_eq!(controller.brightness().value(), 2);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Testing
//!
//! Use [`MockChannel`] and [`RecordingEndpoint`] to test without hardware:
//!
//! ```
//! use ec_kbd_backlight::{
//!     BacklightControl, BacklightController, MockChannel, RecordingEndpoint, StaticResolver,
//! };
//!
//! let controller = BacklightController::new(MockChannel::new(), StaticResolver::new("IFLX14I01"));
//! let endpoint = RecordingEndpoint::new();
//! controller.register(Box::new(endpoint.clone())).unwrap();
//!
//! controller.set(1).unwrap();
//! assert_eq!(controller.channel().writes(), vec![(0x03e2, 0x5c)]);
//! assert_eq!(endpoint.steps().len(), 1);
//! ```

#![warn(missing_docs)]

mod board;
mod controller;
mod ec;
mod endpoint;
mod error;
pub mod events;
pub mod mapping;
mod mock;
mod state;

// Re-export public API
pub use board::{
    BoardIdentity, BoardResolver, CachedResolver, DmiResolver, KNOWN_SKUS, StaticResolver,
};
pub use controller::{BacklightControl, BacklightController};
pub use ec::{DevPort, EcChannel, I2ecChannel, PortIo};
pub use endpoint::{ControlEndpoint, EndpointInfo, KBD_BACKLIGHT};
pub use error::BacklightError;
pub use events::{FirmwareEvent, dispatch_event};
pub use mapping::RegisterMapping;
pub use mock::{MockBacklight, MockChannel, RecordingEndpoint};
pub use state::{BrightnessStep, ControllerState, DEFAULT_STEP, MAX_STEP};
