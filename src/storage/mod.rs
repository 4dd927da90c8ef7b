//! Storage value model: sizes, datafiles and tablespace tags.
//!
//! Everything here is a stateless value. Callers query the live state through
//! a session, build the declared state from configuration, compute a plan and
//! hand the rendered statements back to the session.

pub mod datafile;
pub mod reconcile;
pub mod size;
pub mod tablespace;

pub use datafile::{Datafile, SMALLFILE_MAX_BLOCKS};
pub use reconcile::{DatafileAction, PlanSummary, ReconcilePlan};
pub use size::Size;
pub use tablespace::{ContentType, FileType};
