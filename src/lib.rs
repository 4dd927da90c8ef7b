//! Session and storage reconciliation core for Oracle configuration
//! management.
//!
//! The crate has two halves:
//!
//! - [`Session`]: a wrapper over one autocommit connection that normalizes
//!   queries, DDL, and procedural statements into one failure model, records
//!   every mutating statement in an append-only history, and supports a
//!   simulate mode that records without executing.
//! - [`storage`]: pure value types for storage administration. [`Size`]
//!   parses and renders the vendor's size literals, [`Datafile`] decides
//!   resize and autoextend changes and renders file clauses, and
//!   [`ReconcilePlan`] turns an existing/target datafile comparison into
//!   ordered DDL.
//!
//! Nothing here retries, pools, or shares connections; callers own policy.

pub mod client;
pub mod config;
pub mod error;
pub mod session;
pub mod storage;

pub use config::ConnectionConfig;
pub use error::{Error, Result};
pub use session::{AuthOutcome, Session, SKIP_MARKER};
pub use storage::{
    ContentType, Datafile, DatafileAction, FileType, PlanSummary, ReconcilePlan, Size,
    SMALLFILE_MAX_BLOCKS,
};

/// Driver row type returned by [`Session::query`] and [`Session::query_one`].
pub use oracle::Row;
