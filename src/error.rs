//! Error handling for the coral library
//!
//! All fallible container operations report failures through [`CoralError`].
//! Allocation failures are surfaced as errors rather than aborts so callers
//! can decide how fatal they are; the containers themselves never try to
//! recover from them.

use thiserror::Error;

/// Main error type for the coral library
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoralError {
    /// Checked positional access past the end of a sequence
    #[error("out of range: index {index}, size {size}")]
    OutOfRange {
        /// The invalid index
        index: usize,
        /// The valid size/length
        size: usize,
    },

    /// Checked map access for a key that is not present
    #[error("key not present in map")]
    MissingKey,

    /// Requested size or capacity beyond what the container can represent
    #[error("length exceeded: requested {requested}, max {max}")]
    LengthExceeded {
        /// Number of elements requested
        requested: usize,
        /// Maximum number of elements representable
        max: usize,
    },

    /// The underlying allocator could not satisfy a request
    #[error("allocation of {size} bytes failed")]
    AllocationFailed {
        /// Number of bytes requested
        size: usize,
    },
}

impl CoralError {
    /// Create an out of range error
    pub fn out_of_range(index: usize, size: usize) -> Self {
        Self::OutOfRange { index, size }
    }

    /// Create a missing key error
    pub fn missing_key() -> Self {
        Self::MissingKey
    }

    /// Create a length exceeded error
    pub fn length_exceeded(requested: usize, max: usize) -> Self {
        Self::LengthExceeded { requested, max }
    }

    /// Create an allocation failure error
    pub fn allocation_failed(size: usize) -> Self {
        Self::AllocationFailed { size }
    }

    /// Check if this is a recoverable error
    ///
    /// Allocation failure is recoverable from the caller's point of view
    /// (retry with less data); the other variants indicate misuse of the
    /// container and are not.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::OutOfRange { .. } => false,
            Self::MissingKey => false,
            Self::LengthExceeded { .. } => false,
            Self::AllocationFailed { .. } => true,
        }
    }

    /// Get the error category for logging/metrics
    pub fn category(&self) -> &'static str {
        match self {
            Self::OutOfRange { .. } => "range",
            Self::MissingKey => "range",
            Self::LengthExceeded { .. } => "length",
            Self::AllocationFailed { .. } => "memory",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, CoralError>;

/// Assert that an index is within bounds
#[inline]
pub fn check_bounds(index: usize, size: usize) -> Result<()> {
    if index >= size {
        Err(CoralError::out_of_range(index, size))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = CoralError::out_of_range(10, 5);
        assert_eq!(err.category(), "range");
        assert!(!err.is_recoverable());

        let err = CoralError::missing_key();
        assert_eq!(err.category(), "range");

        let err = CoralError::length_exceeded(100, 50);
        assert_eq!(err.category(), "length");
        assert!(!err.is_recoverable());

        let err = CoralError::allocation_failed(1024);
        assert_eq!(err.category(), "memory");
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_error_display() {
        let err = CoralError::out_of_range(10, 5);
        let display = format!("{}", err);
        assert!(display.contains("out of range"));
        assert!(display.contains("10"));
        assert!(display.contains("5"));

        let err = CoralError::length_exceeded(7, 3);
        let display = format!("{}", err);
        assert!(display.contains("length exceeded"));
        assert!(display.contains("7"));
    }

    #[test]
    fn test_bounds_checking() {
        assert!(check_bounds(5, 10).is_ok());
        assert!(check_bounds(10, 10).is_err());
        assert!(check_bounds(15, 10).is_err());
        assert!(check_bounds(0, 0).is_err());
    }
}
