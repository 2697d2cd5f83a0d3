//! Scripted operations against a MySQL server: naive schema branching
//! (`schema$$branch` copies of a schema) and two HeatWave diagnostic reports.
//!
//! Every operation borrows a [`Session`] for the duration of the call. Passing
//! `None` yields [`Error::SessionUnavailable`] before any statement runs.

pub mod branching;
pub mod cli;
pub mod error;
pub mod model;
pub mod naming;
pub mod render;
pub mod reports;
pub mod session;

pub use branching::{
    create_branch, delete_branch, list_branches, Branch, BranchSummary, CreateOutcome,
    DeleteOutcome,
};
pub use error::{Error, Result};
pub use model::{Cell, ResultSet, Row};
pub use reports::{report_query_stats, report_trace_info};
pub use session::{MySqlSession, Session};
