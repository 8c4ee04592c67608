//! The synchronous connection state machine.
//!
//! A [`Connection`] owns at most one driver session handle and is either
//! *disconnected* (handle absent) or *connected* (handle present). Every
//! operation is synchronous: it blocks the calling thread until the server
//! responds or fails locally. A single instance must not be used from two
//! threads at once; embeddings that need that wrap it in a
//! [`SharedConnection`] and hold the mutex for the duration of each call.

use std::sync::Arc;

use mysql::prelude::Queryable;
use parking_lot::Mutex;

use crate::error::{driver_message, Error, Result};
use crate::escape::escape_bytes;
use crate::info::ConnectionInfo;
use crate::params::ConnectParams;
use crate::result::{Column, ResultSet, Value};

/// Shared connection type for embeddings that serialize access across threads.
///
/// The mutex is held for the duration of each operation, matching the one
/// outstanding request per session that the protocol allows.
pub type SharedConnection = Arc<Mutex<Connection>>;

/// A synchronous MySQL session.
///
/// Created disconnected; transitions to connected only through a successful
/// [`connect`](Self::connect). The session handle is owned exclusively and is
/// released by [`close`](Self::close) or on drop.
///
/// # Example
///
/// ```rust,ignore
/// use mysql_sync::{ConnectParams, Connection};
///
/// let params = ConnectParams::new("localhost", "root", "secret").database("testdb");
/// let mut conn = Connection::open(&params)?;
/// conn.query("SELECT 1")?;
/// let result = conn.fetch_result()?.expect("SELECT produces a result set");
/// assert_eq!(result.rows()[0][0].as_i64(), Some(1));
/// conn.close();
/// ```
#[derive(Default)]
pub struct Connection {
    /// Driver session handle; present iff connected. Never shared or cloned.
    handle: Option<mysql::Conn>,
    /// Result of the most recent successful query, until fetched or superseded.
    pending: Option<ResultSet>,
    /// Most recent server-side diagnostic; empty if none.
    last_error: String,
    /// Transport description composed at connect time.
    host_info: String,
}

impl Connection {
    /// Create a disconnected instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct and immediately connect.
    pub fn open(params: &ConnectParams) -> Result<Self> {
        let mut conn = Self::new();
        conn.connect(params)?;
        Ok(conn)
    }

    /// Whether this instance currently owns a live session handle.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.handle.is_some()
    }

    /// Establish a session with the server described by `params`.
    ///
    /// Fails fast with a usage error if already connected (the existing
    /// session is untouched and remains usable). On any establishment
    /// failure the instance stays disconnected and the server's diagnostic
    /// is retained for [`error_message`](Self::error_message).
    pub fn connect(&mut self, params: &ConnectParams) -> Result<()> {
        if self.handle.is_some() {
            return Err(Error::already_connected());
        }
        params.validate()?;

        tracing::debug!(
            host = %params.host,
            port = params.effective_port(),
            user = %params.user,
            database = params.effective_database().unwrap_or(""),
            "establishing session"
        );

        // Empty optional fields count as absent: empty socket means TCP.
        let socket = params.effective_socket();
        let mut opts = mysql::OptsBuilder::new()
            .ip_or_hostname(Some(params.host.as_str()))
            .tcp_port(params.effective_port())
            .user(Some(params.user.as_str()))
            .pass(Some(params.password.as_str()))
            .prefer_socket(socket.is_some());
        if let Some(database) = params.effective_database() {
            opts = opts.db_name(Some(database));
        }
        if let Some(socket) = socket {
            opts = opts.socket(Some(socket));
        }

        match mysql::Conn::new(opts) {
            Ok(conn) => {
                self.host_info = match socket {
                    Some(_) => "Localhost via UNIX socket".to_string(),
                    None => format!("{} via TCP/IP", params.host),
                };
                self.handle = Some(conn);
                self.pending = None;
                self.last_error.clear();
                tracing::debug!(host_info = %self.host_info, "session established");
                Ok(())
            }
            Err(err) => {
                self.last_error = driver_message(&err);
                tracing::warn!(error = %self.last_error, "connect failed");
                Err(Error::from_driver_connect(&err))
            }
        }
    }

    /// Release the session handle.
    ///
    /// Idempotent and infallible: closing a disconnected instance does
    /// nothing. Any unfetched pending result is discarded.
    pub fn close(&mut self) {
        if let Some(handle) = self.handle.take() {
            drop(handle);
            self.pending = None;
            self.host_info.clear();
            tracing::debug!("session closed");
        }
    }

    /// Execute one statement synchronously.
    ///
    /// On success any produced result set becomes the pending result,
    /// superseding the previous one; statements without a result set
    /// (INSERT/UPDATE/DELETE/DDL) leave no pending result. On server
    /// failure the diagnostic is retained verbatim and the connected state
    /// is NOT revoked: a failed query does not imply a broken session.
    /// Single attempt, no retries.
    pub fn query(&mut self, statement: &str) -> Result<()> {
        let Some(conn) = self.handle.as_mut() else {
            return Err(Error::not_connected());
        };

        match execute_statement(conn, statement) {
            Ok(pending) => {
                tracing::debug!(
                    rows = pending.as_ref().map_or(0, ResultSet::row_count),
                    has_result_set = pending.is_some(),
                    "query executed"
                );
                self.pending = pending;
                self.last_error.clear();
                Ok(())
            }
            Err(err) => {
                // A failed query leaves no pending result; the previous one
                // is superseded regardless of outcome.
                self.pending = None;
                self.last_error = driver_message(&err);
                tracing::warn!(error = %self.last_error, "query failed");
                Err(Error::from_driver_query(&err))
            }
        }
    }

    /// Consume and return the pending result of the most recent query.
    ///
    /// `Ok(None)` means the last statement produced no result set, or the
    /// result was already fetched; absence of a result is a normal outcome,
    /// not an error.
    pub fn fetch_result(&mut self) -> Result<Option<ResultSet>> {
        if self.handle.is_none() {
            return Err(Error::not_connected());
        }
        Ok(self.pending.take())
    }

    /// Escape a byte sequence for safe splicing into a statement literal.
    ///
    /// Requires a session because the escaping rules are tied to the
    /// character set negotiated at connect time. Total and deterministic for
    /// any input; one-directional.
    pub fn escape(&self, input: &[u8]) -> Result<Vec<u8>> {
        if self.handle.is_none() {
            return Err(Error::not_connected());
        }
        Ok(escape_bytes(input))
    }

    /// Most recent server-side diagnostic, empty if none.
    ///
    /// Populated by connect and query failures and cleared by the next
    /// successful connect or query; local usage errors do not overwrite it.
    #[must_use]
    pub fn error_message(&self) -> &str {
        &self.last_error
    }

    /// Metadata snapshot: client fields are always populated, server fields
    /// are zero/empty while disconnected.
    #[must_use]
    pub fn info(&self) -> ConnectionInfo {
        self.handle.as_ref().map_or_else(ConnectionInfo::disconnected, |conn| {
            ConnectionInfo::connected(conn.server_version(), &self.host_info)
        })
    }

    /// Wrap this connection for serialized cross-thread access.
    #[must_use]
    pub fn into_shared(self) -> SharedConnection {
        Arc::new(Mutex::new(self))
    }
}

/// Run one statement and materialize its first result set, if any.
///
/// `Ok(None)` is a statement without a result set (DML/DDL). Additional
/// result sets from multi-statement text are dropped by the driver when the
/// query result goes out of scope; this core models one set per query.
fn execute_statement(
    conn: &mut mysql::Conn,
    statement: &str,
) -> std::result::Result<Option<ResultSet>, mysql::Error> {
    let mut driver_result = conn.query_iter(statement)?;
    let Some(set) = driver_result.iter() else {
        return Ok(None);
    };
    let columns: Vec<Column> = set
        .columns()
        .as_ref()
        .iter()
        .map(Column::from_driver)
        .collect();
    if columns.is_empty() {
        // No result set: a write statement reporting affected rows.
        return Ok(None);
    }
    let mut rows = Vec::new();
    for row in set {
        let row = row?;
        rows.push(
            row.unwrap()
                .into_iter()
                .map(Value::from_driver)
                .collect::<Vec<_>>(),
        );
    }
    Ok(Some(ResultSet::new(columns, rows)))
}

// No session handle may outlive its owning Connection.
impl Drop for Connection {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field(
                "state",
                &if self.handle.is_some() {
                    "connected"
                } else {
                    "disconnected"
                },
            )
            .field("pending", &self.pending.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_instance_is_disconnected() {
        let conn = Connection::new();
        assert!(!conn.is_connected());
        assert_eq!(conn.error_message(), "");
    }

    #[test]
    fn test_close_is_idempotent_in_any_state() {
        let mut conn = Connection::new();
        conn.close();
        conn.close();
        assert!(!conn.is_connected());
    }

    #[test]
    fn test_query_on_disconnected_is_usage_error() {
        let mut conn = Connection::new();
        let err = conn.query("SELECT 1").unwrap_err();
        assert!(err.is_usage());
        assert!(err.is_not_connected());
        // No server was contacted, so no server diagnostic was recorded.
        assert_eq!(conn.error_message(), "");
    }

    #[test]
    fn test_fetch_on_disconnected_is_usage_error() {
        let mut conn = Connection::new();
        let err = conn.fetch_result().unwrap_err();
        assert!(err.is_not_connected());
    }

    #[test]
    fn test_escape_on_disconnected_is_usage_error() {
        let conn = Connection::new();
        let err = conn.escape(b"it's").unwrap_err();
        assert!(err.is_not_connected());
    }

    #[test]
    fn test_connect_validates_params_before_io() {
        let mut conn = Connection::new();
        let err = conn.connect(&ConnectParams::new("", "root", "pw")).unwrap_err();
        assert!(err.is_invalid_params());
        assert!(!conn.is_connected());
    }

    #[test]
    fn test_info_while_disconnected() {
        let conn = Connection::new();
        let info = conn.info();
        assert!(!info.client_info.is_empty());
        assert_eq!(info.server_version, 0);
        assert!(info.server_info.is_empty());
        assert!(info.host_info.is_empty());
    }

    #[test]
    fn test_shared_wrapper_serializes_access() {
        let shared = Connection::new().into_shared();
        let mut guard = shared.lock();
        assert!(!guard.is_connected());
        guard.close();
    }

    #[test]
    fn test_debug_shows_state_not_handle() {
        let conn = Connection::new();
        let debug_str = format!("{conn:?}");
        assert!(debug_str.contains("disconnected"));
    }
}
