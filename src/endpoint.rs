//! The control endpoint that exposes brightness to the outside world.

use crate::state::{BrightnessStep, DEFAULT_STEP, MAX_STEP};

/// Receiver of brightness change notifications.
///
/// The host registers one endpoint with the controller and gets told about
/// every change of the exposed brightness, whichever side caused it.
pub trait ControlEndpoint: Send {
    /// The exposed brightness is now `step`.
    ///
    /// Called with the controller lock held, so the update and its
    /// notification are one atomic step. Implementations must not call back
    /// into the controller (not even [`brightness`](crate::BacklightControl::brightness));
    /// `step` already is the value a read-back would return.
    ///
    /// # Example
    ///
    /// ```
    /// use ec_kbd_backlight::{
    ///     BacklightControl, BacklightController, BrightnessStep, ControlEndpoint, MockChannel,
    ///     StaticResolver,
    /// };
    /// use std::sync::Arc;
    /// use std::sync::atomic::{AtomicU8, Ordering};
    ///
    /// /// Mirrors the exposed value for readers that never touch the controller.
    /// struct Mirror(Arc<AtomicU8>);
    ///
    /// impl ControlEndpoint for Mirror {
    ///     fn notify(&self, step: BrightnessStep) {
    ///         self.0.store(step.value(), Ordering::SeqCst);
    ///     }
    /// }
    ///
    /// let shown = Arc::new(AtomicU8::new(0));
    /// let controller = BacklightController::new(MockChannel::new(), StaticResolver::new("PULSE1403"));
    /// controller.register(Box::new(Mirror(Arc::clone(&shown)))).unwrap();
    ///
    /// controller.notify_external_change(2);
    /// assert_eq!(shown.load(Ordering::SeqCst), 2);
    /// ```
    fn notify(&self, step: BrightnessStep);
}

/// Static description of the exposed control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointInfo {
    /// LED class name.
    pub name: &'static str,
    /// Highest step the endpoint accepts.
    pub max_brightness: u8,
    /// Initial step reported after registration.
    pub default_brightness: u8,
    /// The hardware can change brightness on its own and reports it.
    pub hw_changed: bool,
}

/// The keyboard backlight endpoint.
pub const KBD_BACKLIGHT: EndpointInfo = EndpointInfo {
    name: "white:kbd_backlight",
    max_brightness: MAX_STEP,
    default_brightness: DEFAULT_STEP,
    hw_changed: true,
};
