//! Brightness step and controller state snapshot.

use crate::error::BacklightError;
use std::fmt;

/// Highest logical brightness step.
pub const MAX_STEP: u8 = 2;

/// Step the controller starts at after initialization.
pub const DEFAULT_STEP: u8 = 0;

/// A logical, board-independent brightness level in `0..=MAX_STEP`.
///
/// A `BrightnessStep` can only be built through [`BrightnessStep::new`], so
/// holding one means the range check already happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BrightnessStep(u8);

impl BrightnessStep {
    /// Backlight off.
    pub const OFF: Self = Self(0);
    /// Brightest level.
    pub const MAX: Self = Self(MAX_STEP);

    /// Validate a raw step.
    ///
    /// # Errors
    /// Returns [`BacklightError::OutOfRange`] if `step > MAX_STEP`.
    pub fn new(step: u32) -> Result<Self, BacklightError> {
        match u8::try_from(step) {
            Ok(value) if value <= MAX_STEP => Ok(Self(value)),
            _ => Err(BacklightError::OutOfRange {
                step,
                max: MAX_STEP,
            }),
        }
    }

    /// The raw step value.
    pub fn value(self) -> u8 {
        self.0
    }

    /// Table index for this step.
    pub(crate) fn index(self) -> usize {
        usize::from(self.0)
    }
}

impl Default for BrightnessStep {
    fn default() -> Self {
        Self(DEFAULT_STEP)
    }
}

impl TryFrom<u32> for BrightnessStep {
    type Error = BacklightError;

    fn try_from(step: u32) -> Result<Self, Self::Error> {
        Self::new(step)
    }
}

impl From<BrightnessStep> for u32 {
    fn from(step: BrightnessStep) -> Self {
        u32::from(step.0)
    }
}

impl fmt::Display for BrightnessStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A snapshot of the controller's current state.
///
/// Use [`BacklightControl::get_state`](crate::BacklightControl::get_state) to obtain a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControllerState {
    /// The exposed brightness step.
    pub brightness: BrightnessStep,
    /// Whether a control endpoint currently receives notifications.
    pub endpoint_registered: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_range() {
        for raw in 0..=u32::from(MAX_STEP) {
            assert_eq!(u32::from(BrightnessStep::new(raw).unwrap()), raw);
        }
        assert!(BrightnessStep::new(u32::from(MAX_STEP) + 1).is_err());
        // must not wrap through the u8 conversion
        assert!(BrightnessStep::try_from(257u32).is_err());
    }

    #[test]
    fn test_default_state() {
        let state = ControllerState::default();
        assert_eq!(state.brightness, BrightnessStep::OFF);
        assert!(!state.endpoint_registered);
    }
}
