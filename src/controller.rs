//! Keyboard backlight controller implementation.

use crate::board::BoardResolver;
use crate::ec::EcChannel;
use crate::endpoint::ControlEndpoint;
use crate::error::BacklightError;
use crate::mapping;
use crate::state::{BrightnessStep, ControllerState};

use log::{debug, info, warn};
use std::sync::{Mutex, MutexGuard, PoisonError};

// =============================================================================
// Backlight Control Trait
// =============================================================================

/// Trait for backlight controller implementations.
///
/// This is the surface the endpoint host talks to, and allows for mock
/// implementations in tests.
pub trait BacklightControl: Send + Sync {
    /// The currently exposed brightness step.
    fn brightness(&self) -> BrightnessStep;

    /// Get a snapshot of the current controller state.
    fn get_state(&self) -> ControllerState;

    /// Caller-driven change: write the hardware, then expose the new step.
    ///
    /// # Errors
    ///
    /// - [`BacklightError::OutOfRange`] if `step` is not a valid step
    /// - [`BacklightError::HardwareWriteFailed`] if the EC write failed
    fn set(&self, step: u32) -> Result<(), BacklightError>;

    /// Hardware-driven change: the EC already switched to `step`, only the
    /// exposed value is updated. Invalid steps are dropped.
    fn notify_external_change(&self, step: u32);

    /// Register the endpoint that receives change notifications.
    ///
    /// # Errors
    ///
    /// [`BacklightError::AlreadyRegistered`] if an endpoint is already registered.
    fn register(&self, endpoint: Box<dyn ControlEndpoint>) -> Result<(), BacklightError>;

    /// Drop the registered endpoint. Returns whether one was registered.
    fn unregister(&self) -> bool;
}

// =============================================================================
// BacklightController
// =============================================================================

struct Inner {
    brightness: BrightnessStep,
    endpoint: Option<Box<dyn ControlEndpoint>>,
}

impl Inner {
    fn publish(&self, step: BrightnessStep) {
        if let Some(endpoint) = &self.endpoint {
            endpoint.notify(step);
        }
    }
}

/// The keyboard backlight controller.
///
/// Owns the exposed brightness and the registered endpoint behind one lock.
/// The two entry points have different side effects:
///
/// - [`set`](BacklightControl::set) maps the step for the running board and
///   writes the EC before updating the exposed value.
/// - [`notify_external_change`](BacklightControl::notify_external_change)
///   only updates the exposed value; the EC is never written.
///
/// # Example
///
/// ```
/// use ec_kbd_backlight::{BacklightControl, BacklightController, MockChannel, StaticResolver};
///
/// let controller = BacklightController::new(MockChannel::new(), StaticResolver::new("PULSE1403"));
/// controller.set(2)?;
/// assert_eq!(controller.brightness().value(), 2);
/// assert_eq!(controller.channel().writes(), vec![(0x0409, 0xb8)]);
/// # Ok::<(), ec_kbd_backlight::BacklightError>(())
/// ```
pub struct BacklightController<C, R> {
    channel: C,
    resolver: R,
    inner: Mutex<Inner>,
}

impl<C: EcChannel, R: BoardResolver> BacklightController<C, R> {
    /// Create a controller at the default step.
    ///
    /// The hardware is not touched; it is assumed to be at its own reset
    /// level until the first [`set`](BacklightControl::set).
    ///
    /// `resolver` is consulted on every `set` while the lock is held. Pass
    /// a [`DmiResolver`](crate::DmiResolver) wrapped in
    /// [`CachedResolver`](crate::CachedResolver) so sysfs is read only once.
    pub fn new(channel: C, resolver: R) -> Self {
        Self {
            channel,
            resolver,
            inner: Mutex::new(Inner {
                brightness: BrightnessStep::default(),
                endpoint: None,
            }),
        }
    }

    /// The EC channel this controller writes through.
    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// The resolver used to pick the register mapping.
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Tear the controller down and hand back its EC channel.
    pub fn into_channel(self) -> C {
        self.channel
    }

    // The guarded state is only replaced wholesale, so a poisoned lock still
    // holds a valid value.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C: EcChannel, R: BoardResolver> BacklightControl for BacklightController<C, R> {
    fn brightness(&self) -> BrightnessStep {
        self.lock().brightness
    }

    fn get_state(&self) -> ControllerState {
        let inner = self.lock();
        ControllerState {
            brightness: inner.brightness,
            endpoint_registered: inner.endpoint.is_some(),
        }
    }

    fn set(&self, step: u32) -> Result<(), BacklightError> {
        let step = BrightnessStep::new(step)?;

        // held across the write so concurrent sets serialize
        let mut inner = self.lock();

        let board = self.resolver.resolve();
        let (address, value) = mapping::map(step, &board);

        self.channel
            .write_register(address, value)
            .map_err(|source| BacklightError::HardwareWriteFailed {
                address,
                value,
                source,
            })?;
        debug!(
            "set brightness {} -> {} (board={}, reg={:#06x}, value={:#04x})",
            inner.brightness, step, board, address, value
        );

        inner.brightness = step;
        inner.publish(step);
        Ok(())
    }

    fn notify_external_change(&self, step: u32) {
        let step = match BrightnessStep::new(step) {
            Ok(step) => step,
            Err(e) => {
                warn!("ignoring hardware brightness change: {}", e);
                return;
            }
        };

        let mut inner = self.lock();
        debug!("hardware changed brightness {} -> {}", inner.brightness, step);
        inner.brightness = step;
        inner.publish(step);
    }

    fn register(&self, endpoint: Box<dyn ControlEndpoint>) -> Result<(), BacklightError> {
        let mut inner = self.lock();
        if inner.endpoint.is_some() {
            return Err(BacklightError::AlreadyRegistered);
        }
        inner.endpoint = Some(endpoint);
        info!("control endpoint registered at brightness {}", inner.brightness);
        Ok(())
    }

    fn unregister(&self) -> bool {
        let removed = self.lock().endpoint.take().is_some();
        if removed {
            info!("control endpoint unregistered");
        }
        removed
    }
}
