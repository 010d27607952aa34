//! Interaction log: append-only usage history in SQLite
//!
//! Three tables (queries, views, solution feedback), insert-only from this
//! crate's point of view. Single file, zero network dependencies, works
//! offline. The connection is owned by `InteractionLog` and closed when it
//! drops.
//!
//! Timestamps are RFC 3339 UTC text written by the process, so
//! lexicographic order equals chronological order and sub-second ties are
//! rare; remaining ties fall back to the rowid.

use crate::types::{FeedbackStats, QueryLogEntry, SolutionType, ViewCount};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;

const SCHEMA: &str = r#"
-- User queries, raw text as typed
CREATE TABLE IF NOT EXISTS user_queries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    query TEXT NOT NULL,
    timestamp TEXT NOT NULL
);

-- Failure modes the user explicitly opened
CREATE TABLE IF NOT EXISTS viewed_failure_modes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    failure_mode TEXT NOT NULL,
    timestamp TEXT NOT NULL
);

-- Ratings and comments on individual solutions
CREATE TABLE IF NOT EXISTS solution_feedback (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    failure_mode TEXT NOT NULL,
    solution_type TEXT NOT NULL,
    solution_text TEXT NOT NULL,
    rating INTEGER,
    comment TEXT,
    timestamp TEXT NOT NULL
);
"#;

/// Append-only usage log over a SQLite connection
pub struct InteractionLog {
    conn: Connection,
}

impl InteractionLog {
    /// Open (creating if needed) the log at `path`
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open interaction log at {:?}", path))?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// In-memory log, used by tests
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory log")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Append a user query, returning the new entry id
    pub fn log_query(&self, query: &str) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO user_queries (query, timestamp) VALUES (?1, ?2)",
                params![query, Utc::now().to_rfc3339()],
            )
            .context("Failed to log user query")?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Append a viewed failure mode, returning the new entry id
    ///
    /// The name is not checked against the taxonomy; views of names that
    /// never resolved (or no longer resolve) are recorded as given.
    pub fn log_view(&self, failure_mode: &str) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO viewed_failure_modes (failure_mode, timestamp) VALUES (?1, ?2)",
                params![failure_mode, Utc::now().to_rfc3339()],
            )
            .context("Failed to log viewed failure mode")?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Append feedback on one solution, returning the new entry id
    pub fn log_feedback(
        &self,
        failure_mode: &str,
        solution_type: SolutionType,
        solution_text: &str,
        rating: Option<i64>,
        comment: Option<&str>,
    ) -> Result<i64> {
        self.conn
            .execute(
                r#"
                INSERT INTO solution_feedback
                    (failure_mode, solution_type, solution_text, rating, comment, timestamp)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    failure_mode,
                    solution_type.as_str(),
                    solution_text,
                    rating,
                    comment,
                    Utc::now().to_rfc3339(),
                ],
            )
            .context("Failed to log solution feedback")?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Most-viewed failure modes, highest count first
    ///
    /// Ties break by mode name ascending so the ranking is stable.
    pub fn most_viewed(&self, limit: usize) -> Result<Vec<ViewCount>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT failure_mode, COUNT(*) as view_count
            FROM viewed_failure_modes
            GROUP BY failure_mode
            ORDER BY view_count DESC, failure_mode ASC
            LIMIT ?1
            "#,
        )?;

        let rows = stmt
            .query_map([limit as i64], |row| {
                Ok(ViewCount {
                    failure_mode: row.get(0)?,
                    view_count: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read most-viewed failure modes")?;

        Ok(rows)
    }

    /// Recent queries, newest first; same-timestamp ties by id descending
    pub fn recent_queries(&self, limit: usize) -> Result<Vec<QueryLogEntry>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, query, timestamp
            FROM user_queries
            ORDER BY timestamp DESC, id DESC
            LIMIT ?1
            "#,
        )?;

        let rows = stmt
            .query_map([limit as i64], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read recent queries")?;

        rows.into_iter()
            .map(|(id, query, ts)| {
                Ok(QueryLogEntry {
                    id,
                    query,
                    timestamp: parse_timestamp(&ts)?,
                })
            })
            .collect()
    }

    /// Aggregate feedback statistics
    ///
    /// Average ratings group only over non-null ratings, so a solution
    /// type with unrated feedback alone does not appear in the map.
    pub fn feedback_stats(&self) -> Result<FeedbackStats> {
        let mut stats = FeedbackStats::default();

        let mut stmt = self.conn.prepare(
            r#"
            SELECT solution_type, AVG(rating) as avg_rating
            FROM solution_feedback
            WHERE rating IS NOT NULL
            GROUP BY solution_type
            "#,
        )?;
        let avg_rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read average ratings")?;
        stats.avg_rating_by_type = avg_rows.into_iter().collect();

        let mut stmt = self.conn.prepare(
            r#"
            SELECT failure_mode, COUNT(*) as feedback_count
            FROM solution_feedback
            GROUP BY failure_mode
            "#,
        )?;
        let count_rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read feedback counts")?;
        stats.feedback_count_by_mode = count_rows.into_iter().collect();

        Ok(stats)
    }
}

fn parse_timestamp(ts: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(ts)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("Malformed timestamp in log: {}", ts))
}
