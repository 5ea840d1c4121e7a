//! Error types shared by every firmware layer

use core::fmt;

/// Implement common methods for firmware error enums.
///
/// Generates `as_code()`, `from_code()`, `is_success()`, and `is_error()`
/// for `#[repr(i32)]` enums that follow the firmware's negative-code convention.
macro_rules! impl_firmware_error {
    ($ty:ty, fallback: $fallback:ident, variants: { $($val:literal => $variant:ident),* $(,)? }) => {
        impl $ty {
            /// Numeric code, as printed by the fatal path.
            #[inline]
            pub fn as_code(self) -> i32 {
                self as i32
            }

            #[inline]
            pub fn from_code(val: i32) -> Self {
                match val {
                    $($val => Self::$variant,)*
                    _ => Self::$fallback,
                }
            }

            #[inline]
            pub fn is_success(self) -> bool {
                matches!(self, Self::Success)
            }

            #[inline]
            pub fn is_error(self) -> bool {
                !self.is_success()
            }
        }
    };
}

pub type FirmwareResult<T> = Result<T, FirmwareError>;

/// Errors surfaced by firmware operations
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FirmwareError {
    #[default]
    Success = 0,
    /// Bad call-site input (line out of range, empty buffer, ...)
    InvalidArgument = -1,
    /// A bounded wait expired
    Timeout = -2,
    /// Unexpected opcode or failed HMAC comparison
    ProtocolMismatch = -3,
    /// The crypto service reported an error
    CryptoFailure = -4,
    /// Boot-time marker or hardware-environment mismatch
    IntegrityFailure = -5,
    /// A fixed-capacity table has no room left
    ResourceExhausted = -6,
}

impl_firmware_error!(FirmwareError, fallback: InvalidArgument, variants: {
    0 => Success,
    -1 => InvalidArgument,
    -2 => Timeout,
    -3 => ProtocolMismatch,
    -4 => CryptoFailure,
    -5 => IntegrityFailure,
    -6 => ResourceExhausted,
});

impl FirmwareError {
    /// Recoverable errors are absorbed by the session; the rest halt the board.
    pub fn is_recoverable(self) -> bool {
        matches!(self, Self::Timeout | Self::ProtocolMismatch)
    }
}

impl fmt::Display for FirmwareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Success => "success",
            Self::InvalidArgument => "invalid argument",
            Self::Timeout => "timeout",
            Self::ProtocolMismatch => "protocol mismatch",
            Self::CryptoFailure => "crypto failure",
            Self::IntegrityFailure => "integrity failure",
            Self::ResourceExhausted => "resource exhausted",
        };
        f.write_str(text)
    }
}

/// Subsystem named by an integrity failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    InterruptController,
    Serial,
    Timer,
    HardwareEnvironment,
}

impl Component {
    pub const fn name(self) -> &'static str {
        match self {
            Self::InterruptController => "interrupt controller",
            Self::Serial => "serial",
            Self::Timer => "timer",
            Self::HardwareEnvironment => "hardware environment",
        }
    }
}

/// Which integrity check failed, before it is flattened into `FirmwareError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegrityFault {
    pub component: Component,
}

impl From<IntegrityFault> for FirmwareError {
    fn from(_: IntegrityFault) -> Self {
        FirmwareError::IntegrityFailure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for err in [
            FirmwareError::Success,
            FirmwareError::InvalidArgument,
            FirmwareError::Timeout,
            FirmwareError::ProtocolMismatch,
            FirmwareError::CryptoFailure,
            FirmwareError::IntegrityFailure,
            FirmwareError::ResourceExhausted,
        ] {
            assert_eq!(FirmwareError::from_code(err.as_code()), err);
        }
        assert_eq!(FirmwareError::from_code(42), FirmwareError::InvalidArgument);
    }

    #[test]
    fn only_protocol_errors_are_recoverable() {
        assert!(FirmwareError::Timeout.is_recoverable());
        assert!(FirmwareError::ProtocolMismatch.is_recoverable());
        assert!(!FirmwareError::CryptoFailure.is_recoverable());
        assert!(!FirmwareError::IntegrityFailure.is_recoverable());
        assert!(!FirmwareError::InvalidArgument.is_recoverable());
    }

    #[test]
    fn integrity_fault_flattens() {
        let err: FirmwareError = IntegrityFault { component: Component::Timer }.into();
        assert_eq!(err, FirmwareError::IntegrityFailure);
        assert!(err.is_error());
    }
}
