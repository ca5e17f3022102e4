//! Error types for the keyboard backlight controller.

/// Errors that can occur when driving the keyboard backlight.
#[derive(Debug, thiserror::Error)]
pub enum BacklightError {
    /// A brightness step was outside the valid range.
    #[error("Brightness step {step} out of range (expected 0-{max})")]
    OutOfRange {
        /// The rejected step.
        step: u32,
        /// Highest valid step.
        max: u8,
    },

    /// The embedded controller rejected or failed a register write.
    #[error("EC write of {value:#04x} to register {address:#06x} failed: {source}")]
    HardwareWriteFailed {
        /// Register address that was targeted.
        address: u16,
        /// Value that was being written.
        value: u8,
        /// The underlying channel error.
        #[source]
        source: std::io::Error,
    },

    /// Attempted to register a second control endpoint.
    #[error("Control endpoint already registered - only one endpoint allowed")]
    AlreadyRegistered,

    /// An I/O error occurred outside of a brightness write (e.g. reading DMI data).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_hardware_error_keeps_source() {
        let err = BacklightError::HardwareWriteFailed {
            address: 0x0409,
            value: 0x5c,
            source: std::io::Error::other("bus timeout"),
        };
        assert_eq!(
            err.to_string(),
            "EC write of 0x5c to register 0x0409 failed: bus timeout"
        );
        assert_eq!(err.source().unwrap().to_string(), "bus timeout");
    }

    #[test]
    fn test_out_of_range_message() {
        let err = BacklightError::OutOfRange { step: 7, max: 2 };
        assert_eq!(err.to_string(), "Brightness step 7 out of range (expected 0-2)");
    }
}
