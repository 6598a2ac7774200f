use std::backtrace::Backtrace;

use snafu::Snafu;

/// Result type alias for Shorthands operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the Shorthands API
///
/// All variants include backtraces for debugging. Use the constructor methods
/// (e.g., `Error::validation("message")`) to create errors.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Configuration errors
    #[snafu(display("Configuration error: {message}"))]
    Config { message: String, backtrace: Backtrace },

    /// Storage errors
    #[snafu(display("Storage error: {message}"))]
    Storage { message: String, backtrace: Backtrace },

    /// Authentication errors
    #[snafu(display("Authentication error: {message}"))]
    Auth { message: String, backtrace: Backtrace },

    /// Authorization errors
    #[snafu(display("Forbidden: {message}"))]
    Forbidden { message: String, backtrace: Backtrace },

    /// Validation errors
    #[snafu(display("Validation error: {message}"))]
    Validation { message: String, backtrace: Backtrace },

    /// Resource not found
    #[snafu(display("Not found: {message}"))]
    NotFound { message: String, backtrace: Backtrace },

    /// State conflicts (already resolved, duplicate pending, lost race)
    #[snafu(display("Conflict: {message}"))]
    Conflict { message: String, backtrace: Backtrace },

    /// Internal system errors
    #[snafu(display("Internal error: {message}"))]
    Internal { message: String, backtrace: Backtrace },
}

impl Error {
    // =========================================================================
    // Constructors - maintain API compatibility while capturing backtraces
    // =========================================================================

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        ConfigSnafu { message: message.into() }.build()
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        StorageSnafu { message: message.into() }.build()
    }

    /// Create an authentication error
    pub fn auth(message: impl Into<String>) -> Self {
        AuthSnafu { message: message.into() }.build()
    }

    /// Create an authorization error
    pub fn forbidden(message: impl Into<String>) -> Self {
        ForbiddenSnafu { message: message.into() }.build()
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        ValidationSnafu { message: message.into() }.build()
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        NotFoundSnafu { message: message.into() }.build()
    }

    /// Create a conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        ConflictSnafu { message: message.into() }.build()
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        InternalSnafu { message: message.into() }.build()
    }

    // =========================================================================
    // Metadata accessors
    // =========================================================================

    /// Get HTTP status code for this error
    ///
    /// NotFound intentionally maps to 400: the HTTP contract flattens
    /// missing-entity failures into Bad Request and clients depend on it.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Config { .. } => 500,
            Error::Storage { .. } => 500,
            Error::Auth { .. } => 401,
            Error::Forbidden { .. } => 403,
            Error::Validation { .. } => 400,
            Error::NotFound { .. } => 400,
            Error::Conflict { .. } => 409,
            Error::Internal { .. } => 500,
        }
    }

    /// Get the bare message without the variant prefix
    pub fn message(&self) -> &str {
        match self {
            Error::Config { message, .. }
            | Error::Storage { message, .. }
            | Error::Auth { message, .. }
            | Error::Forbidden { message, .. }
            | Error::Validation { message, .. }
            | Error::NotFound { message, .. }
            | Error::Conflict { message, .. }
            | Error::Internal { message, .. } => message,
        }
    }

    /// Get error code for client consumption
    pub fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "CONFIGURATION_ERROR",
            Error::Storage { .. } => "STORAGE_ERROR",
            Error::Auth { .. } => "AUTHENTICATION_ERROR",
            Error::Forbidden { .. } => "FORBIDDEN",
            Error::Validation { .. } => "VALIDATION_ERROR",
            Error::NotFound { .. } => "NOT_FOUND",
            Error::Conflict { .. } => "CONFLICT",
            Error::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::auth("no token").status_code(), 401);
        assert_eq!(Error::forbidden("not yours").status_code(), 403);
        assert_eq!(Error::validation("bad input").status_code(), 400);
        assert_eq!(Error::not_found("missing").status_code(), 400);
        assert_eq!(Error::conflict("already resolved").status_code(), 409);
        assert_eq!(Error::internal("boom").status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::conflict("x").error_code(), "CONFLICT");
        assert_eq!(Error::not_found("x").error_code(), "NOT_FOUND");
        assert_eq!(Error::forbidden("x").error_code(), "FORBIDDEN");
    }

    #[test]
    fn test_display_includes_message() {
        let err = Error::validation("username is required");
        assert!(err.to_string().contains("username is required"));
    }

    #[test]
    fn test_message_strips_variant_prefix() {
        let err = Error::validation("username is required");
        assert_eq!(err.message(), "username is required");
    }
}
