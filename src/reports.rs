//! Diagnostic reports over HeatWave query statistics and the optimizer trace.

use crate::error::Result;
use crate::model::ResultSet;
use crate::session::{resolve_session, Session};
use tracing::debug;

pub const QUERY_STATS_SQL: &str = "SELECT query_id, LEFT(query_text, 40), \
     JSON_EXTRACT(JSON_UNQUOTE(qkrn_text->'$**.sessionId'), '$[0]') AS session_id, \
     JSON_EXTRACT(JSON_UNQUOTE(qkrn_text->'$**.totalBaseDataScanned'), '$[0]') AS data_scanned, \
     JSON_EXTRACT(JSON_UNQUOTE(qexec_text->'$**.error'), '$[0]') AS error_message \
     FROM performance_schema.rpd_query_stats";

pub const TRACE_INFO_SQL: &str =
    "SELECT QUERY, TRACE->'$**.Rapid_Offload_Fails' FROM INFORMATION_SCHEMA.OPTIMIZER_TRACE";

/// Per-query statistics: id, query text prefix, session, data scanned and error.
pub fn report_query_stats<S: Session + ?Sized>(session: Option<&mut S>) -> Result<ResultSet> {
    let rs = resolve_session(session)?.query(QUERY_STATS_SQL, &[])?;
    debug!(rows = rs.len(), "query stats report");
    Ok(rs)
}

/// Offload failure reasons recorded in the optimizer trace.
pub fn report_trace_info<S: Session + ?Sized>(session: Option<&mut S>) -> Result<ResultSet> {
    let rs = resolve_session(session)?.query(TRACE_INFO_SQL, &[])?;
    debug!(rows = rs.len(), "trace info report");
    Ok(rs)
}
