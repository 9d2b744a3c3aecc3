//! Last local gate before SQL reaches the query engine.

use super::{QueryError, Result};

/// Accept only statements that begin with `SELECT` or `WITH` after
/// trimming and case-normalizing. This is a syntactic prefix check, not
/// a parser; the engine's own permissions are the next layer behind it.
pub fn check_read_only(sql: &str) -> Result<()> {
    let normalized = sql.trim().to_uppercase();
    if normalized.starts_with("SELECT") || normalized.starts_with("WITH") {
        Ok(())
    } else {
        Err(QueryError::Rejected)
    }
}
