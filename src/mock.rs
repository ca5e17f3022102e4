//! Mock hardware and endpoints for testing.

use crate::controller::BacklightControl;
use crate::ec::EcChannel;
use crate::endpoint::ControlEndpoint;
use crate::error::BacklightError;
use crate::state::{BrightnessStep, ControllerState};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// An EC channel that records writes instead of touching hardware.
///
/// Writes can be made to fail with [`MockChannel::fail_writes`].
#[derive(Debug, Default)]
pub struct MockChannel {
    writes: Mutex<Vec<(u16, u8)>>,
    fail: AtomicBool,
}

impl MockChannel {
    /// Create a channel with no recorded writes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail (`true`) or succeed (`false`).
    pub fn fail_writes(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Every successful `(address, value)` write, in order.
    pub fn writes(&self) -> Vec<(u16, u8)> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of successful writes.
    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl EcChannel for MockChannel {
    fn write_register(&self, address: u16, value: u8) -> io::Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(io::Error::other("mock EC write failure"));
        }
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((address, value));
        Ok(())
    }
}

/// A control endpoint that records every notification.
///
/// Clones share the same record, so keep one clone and register another.
#[derive(Debug, Clone, Default)]
pub struct RecordingEndpoint {
    steps: Arc<Mutex<Vec<BrightnessStep>>>,
}

impl RecordingEndpoint {
    /// Create an endpoint with an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Notified steps, oldest first.
    pub fn steps(&self) -> Vec<BrightnessStep> {
        self.steps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ControlEndpoint for RecordingEndpoint {
    fn notify(&self, step: BrightnessStep) {
        self.steps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(step);
    }
}

/// A mock backlight controller for testing.
///
/// This allows testing code that depends on [`BacklightControl`] without
/// an embedded controller. Caller-driven sets are counted in
/// [`MockBacklight::hardware_writes`].
///
/// # Example
///
/// ```
/// use ec_kbd_backlight::{BacklightControl, MockBacklight};
///
/// let mock = MockBacklight::new();
/// mock.set(1).unwrap();
/// mock.notify_external_change(2);
/// assert_eq!(mock.get_state().brightness.value(), 2);
/// assert_eq!(mock.hardware_writes(), 1);
/// ```
pub struct MockBacklight {
    state: Mutex<MockState>,
}

struct MockState {
    brightness: BrightnessStep,
    endpoint: Option<Box<dyn ControlEndpoint>>,
    writes: usize,
}

impl MockBacklight {
    /// Create a mock at the default step.
    pub fn new() -> Self {
        Self::with_brightness(BrightnessStep::default())
    }

    /// Create a mock starting at `brightness`.
    pub fn with_brightness(brightness: BrightnessStep) -> Self {
        Self {
            state: Mutex::new(MockState {
                brightness,
                endpoint: None,
                writes: 0,
            }),
        }
    }

    /// Number of successful caller-driven sets.
    pub fn hardware_writes(&self) -> usize {
        self.state.lock().unwrap().writes
    }
}

impl Default for MockBacklight {
    fn default() -> Self {
        Self::new()
    }
}

impl BacklightControl for MockBacklight {
    fn brightness(&self) -> BrightnessStep {
        self.state.lock().unwrap().brightness
    }

    fn get_state(&self) -> ControllerState {
        let state = self.state.lock().unwrap();
        ControllerState {
            brightness: state.brightness,
            endpoint_registered: state.endpoint.is_some(),
        }
    }

    fn set(&self, step: u32) -> Result<(), BacklightError> {
        let step = BrightnessStep::new(step)?;
        let mut state = self.state.lock().unwrap();
        state.writes += 1;
        state.brightness = step;
        if let Some(endpoint) = &state.endpoint {
            endpoint.notify(step);
        }
        Ok(())
    }

    fn notify_external_change(&self, step: u32) {
        let Ok(step) = BrightnessStep::new(step) else {
            return;
        };
        let mut state = self.state.lock().unwrap();
        state.brightness = step;
        if let Some(endpoint) = &state.endpoint {
            endpoint.notify(step);
        }
    }

    fn register(&self, endpoint: Box<dyn ControlEndpoint>) -> Result<(), BacklightError> {
        let mut state = self.state.lock().unwrap();
        if state.endpoint.is_some() {
            return Err(BacklightError::AlreadyRegistered);
        }
        state.endpoint = Some(endpoint);
        Ok(())
    }

    fn unregister(&self) -> bool {
        self.state.lock().unwrap().endpoint.take().is_some()
    }
}
