//! Error hierarchy for mysql-sync.
//!
//! Follows the "canonical error struct" pattern from Microsoft Rust Guidelines.
//! Exposes `is_xxx()` methods rather than internal `ErrorKind` for future-proofing.

use thiserror::Error;

/// Root error type for the mysql-sync crate.
///
/// Captures every failure mode of the connection state machine. Server-side
/// failures carry the server's diagnostic text verbatim; local usage errors
/// (wrong state, bad parameters) never involve server contact and carry no
/// server text. Use the `is_xxx()` predicate methods for classification.
///
/// # Example
///
/// ```rust,ignore
/// use mysql_sync::Error;
///
/// fn handle_error(err: &Error) {
///     if err.is_usage() {
///         eprintln!("caller bug: {err}");
///     } else if err.is_query() {
///         eprintln!("server rejected statement: {err}");
///     }
/// }
/// ```
#[derive(Error, Debug)]
#[error("{kind}")]
pub struct Error {
    kind: ErrorKind,
}

/// Internal error classification.
///
/// This enum is `pub(crate)` to allow adding variants without breaking changes.
/// External code should use the `is_xxx()` predicate methods instead.
#[derive(Error, Debug)]
#[non_exhaustive]
pub(crate) enum ErrorKind {
    /// Connect called on an instance that already owns a session.
    #[error("already connected")]
    AlreadyConnected,

    /// Operation requiring a session called while disconnected.
    #[error("not connected")]
    NotConnected,

    /// Session establishment failure (allocation, auth, network, unknown database).
    #[error("connect failed: {message}")]
    Connect { message: String },

    /// Server-reported statement execution failure.
    #[error("query failed: {message}")]
    Query {
        message: String,
        code: Option<u16>,
        state: Option<String>,
    },

    /// Invalid connection parameters or URL.
    #[error("invalid connection parameters: {message}")]
    InvalidParams { message: String },
}

impl Error {
    // ═══════════════════════════════════════════════════════════════════════
    // Constructors
    // ═══════════════════════════════════════════════════════════════════════

    /// Create error for connect on an already-connected instance.
    #[must_use]
    pub const fn already_connected() -> Self {
        Self {
            kind: ErrorKind::AlreadyConnected,
        }
    }

    /// Create error for an operation that requires an active session.
    #[must_use]
    pub const fn not_connected() -> Self {
        Self {
            kind: ErrorKind::NotConnected,
        }
    }

    /// Create error for a failed session establishment.
    #[must_use]
    pub fn connect(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Connect {
                message: message.into(),
            },
        }
    }

    /// Create error for a server-rejected statement.
    #[must_use]
    pub fn query(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Query {
                message: message.into(),
                code: None,
                state: None,
            },
        }
    }

    /// Create error for invalid connection parameters.
    #[must_use]
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::InvalidParams {
                message: message.into(),
            },
        }
    }

    /// Classify a driver error raised during session establishment.
    pub(crate) fn from_driver_connect(err: &mysql::Error) -> Self {
        Self::connect(driver_message(err))
    }

    /// Classify a driver error raised during statement execution.
    pub(crate) fn from_driver_query(err: &mysql::Error) -> Self {
        match err {
            mysql::Error::MySqlError(server) => Self {
                kind: ErrorKind::Query {
                    message: server.message.clone(),
                    code: Some(server.code),
                    state: Some(server.state.clone()),
                },
            },
            // Transport breakage mid-query is indistinguishable from a SQL
            // error at this layer and is surfaced the same way.
            other => Self::query(other.to_string()),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Predicate Methods (is_xxx)
    // ═══════════════════════════════════════════════════════════════════════

    /// Returns true if this is a local precondition violation (no server contact).
    #[must_use]
    pub const fn is_usage(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::AlreadyConnected | ErrorKind::NotConnected | ErrorKind::InvalidParams { .. }
        )
    }

    /// Returns true if this is an already-connected error.
    #[must_use]
    pub const fn is_already_connected(&self) -> bool {
        matches!(self.kind, ErrorKind::AlreadyConnected)
    }

    /// Returns true if this is a not-connected error.
    #[must_use]
    pub const fn is_not_connected(&self) -> bool {
        matches!(self.kind, ErrorKind::NotConnected)
    }

    /// Returns true if this is a session establishment failure.
    #[must_use]
    pub const fn is_connect(&self) -> bool {
        matches!(self.kind, ErrorKind::Connect { .. })
    }

    /// Returns true if this is a server-side statement failure.
    #[must_use]
    pub const fn is_query(&self) -> bool {
        matches!(self.kind, ErrorKind::Query { .. })
    }

    /// Returns true if this is a parameter validation failure.
    #[must_use]
    pub const fn is_invalid_params(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidParams { .. })
    }

    /// MySQL server error code, when the server reported one.
    #[must_use]
    pub const fn server_code(&self) -> Option<u16> {
        match self.kind {
            ErrorKind::Query { code, .. } => code,
            _ => None,
        }
    }

    /// SQLSTATE reported by the server, when available.
    #[must_use]
    pub fn sql_state(&self) -> Option<&str> {
        match &self.kind {
            ErrorKind::Query { state, .. } => state.as_deref(),
            _ => None,
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::invalid_params(format!("invalid URL: {err}"))
    }
}

/// Diagnostic text for a driver error, preferring the server's own message.
pub(crate) fn driver_message(err: &mysql::Error) -> String {
    match err {
        mysql::Error::MySqlError(server) => server.message.clone(),
        other => other.to_string(),
    }
}

/// Result type alias for mysql-sync operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_errors_classified() {
        assert!(Error::already_connected().is_usage());
        assert!(Error::already_connected().is_already_connected());
        assert!(Error::not_connected().is_usage());
        assert!(Error::not_connected().is_not_connected());
        assert!(Error::invalid_params("missing host").is_usage());
        assert!(!Error::query("boom").is_usage());
    }

    #[test]
    fn test_connect_error_display() {
        let err = Error::connect("Access denied for user 'root'@'localhost'");
        assert!(err.is_connect());
        assert!(err.to_string().contains("Access denied"));
    }

    #[test]
    fn test_query_error_carries_server_text() {
        let err = Error::query("Table 'testdb.missing' doesn't exist");
        assert!(err.is_query());
        assert!(err.to_string().contains("doesn't exist"));
        assert_eq!(err.server_code(), None);
    }

    #[test]
    fn test_server_error_preserves_code_and_state() {
        let server = mysql::error::MySqlError {
            state: "42S02".to_string(),
            message: "Table 'testdb.missing' doesn't exist".to_string(),
            code: 1146,
        };
        let err = Error::from_driver_query(&mysql::Error::MySqlError(server));
        assert_eq!(err.server_code(), Some(1146));
        assert_eq!(err.sql_state(), Some("42S02"));
        assert!(err.to_string().contains("doesn't exist"));
    }

    #[test]
    fn test_url_parse_error_maps_to_invalid_params() {
        let parse_err = url::Url::parse("not a url").unwrap_err();
        let err: Error = parse_err.into();
        assert!(err.is_invalid_params());
    }

    #[test]
    fn test_error_debug() {
        let err = Error::not_connected();
        let debug_str = format!("{err:?}");
        assert!(debug_str.contains("NotConnected"));
    }
}
