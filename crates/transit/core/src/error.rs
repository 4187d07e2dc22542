//! Common error infrastructure for transit-core.
//!
//! Domain-specific errors (e.g., [`crate::CatalogError`], [`crate::RouteError`])
//! live next to the types they validate. This module provides the shared
//! classification every error enum in the travel stack implements, so callers
//! can decide between retrying, rejecting input, or reporting a bug.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: transient conditions that may succeed on another attempt
/// - **Validation**: invalid input that should be rejected without retry
/// - **Internal**: unexpected state inconsistencies that require investigation
/// - **Fatal**: unrecoverable errors, the component cannot continue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - may succeed if attempted again.
    ///
    /// Examples: dialogue not detected, location read failed
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: unknown trainer, empty destination name
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,

    /// Fatal error - the request cannot continue.
    ///
    /// Examples: retry budget exhausted, deadline exceeded
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all travel-stack errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
/// - Error codes are stable identifiers suitable for logs and metrics
pub trait TransitError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
