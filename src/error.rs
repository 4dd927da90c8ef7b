//! Unified failure model for session and storage operations.
//!
//! Every vendor-reported failure is surfaced immediately with its code and
//! message; mutating failures additionally carry the statement text and the
//! DDL history accumulated up to and including the failing statement, so a
//! caller can report what had already changed. Nothing here retries.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Connection parameters rejected before any network activity.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Could not establish a session. No state is retained.
    #[error("connection failed: {message}")]
    Connection { code: i32, message: String },

    /// A read statement failed.
    #[error("query failed: {message}; statement: {statement}")]
    Query {
        code: i32,
        message: String,
        statement: String,
        params: Vec<(String, String)>,
        ddl_history: Vec<String>,
    },

    /// A structural-change statement failed. The history includes it.
    #[error("ddl failed: {message}; statement: {statement}")]
    Ddl {
        code: i32,
        message: String,
        statement: String,
        ddl_history: Vec<String>,
    },

    /// A plain or procedural statement failed. The history includes it.
    #[error("statement failed: {message}; statement: {statement}")]
    Statement {
        code: i32,
        message: String,
        statement: String,
        ddl_history: Vec<String>,
    },
}

impl Error {
    /// Vendor error code, or 0 when the failure never reached the database.
    pub fn code(&self) -> i32 {
        match self {
            Error::InvalidConfig(_) => 0,
            Error::Connection { code, .. }
            | Error::Query { code, .. }
            | Error::Ddl { code, .. }
            | Error::Statement { code, .. } => *code,
        }
    }

    /// Mutating statements submitted before (and including) the failure.
    pub fn ddl_history(&self) -> &[String] {
        match self {
            Error::Query { ddl_history, .. }
            | Error::Ddl { ddl_history, .. }
            | Error::Statement { ddl_history, .. } => ddl_history,
            _ => &[],
        }
    }

    /// Short operator hint for well-known vendor codes.
    pub fn hint(&self) -> Option<&'static str> {
        match self.code() {
            1017 => Some("Check your username and password."),
            12154 => Some("Verify connection string format: host:port/service_name"),
            12170 => Some("Connection timed out. Check network and firewall."),
            12541 => Some("No listener at specified host:port. Verify the address."),
            12545 => Some("Target host or object does not exist."),
            942 => Some("Table or view does not exist, or you lack permissions."),
            1031 => Some("Insufficient privileges. Contact your DBA."),
            1405 => Some("NULL value encountered where not allowed."),
            _ => None,
        }
    }
}

/// Splits a driver error into the vendor code and the verbatim message.
pub(crate) fn vendor_parts(err: &oracle::Error) -> (i32, String) {
    let code = err.db_error().map(|e| e.code()).unwrap_or(0);
    (code, err.to_string())
}
