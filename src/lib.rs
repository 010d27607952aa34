//! Multi-Agent Failure Educator
//!
//! An educational browser for the MASFT taxonomy of multi-agent LLM
//! system failure modes: what they are, how they look in practice, why
//! they happen, and what to do about them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                 Caller (CLI, shell)                  │
//! │  logs queries/views ──────────────┐                  │
//! └───────────────┬──────────────────│──────────────────┘
//!                 │ free text        │ writes
//!                 ▼                  ▼
//! ┌──────────────────────┐   ┌──────────────────────────┐
//! │     QueryRouter      │   │      InteractionLog      │
//! │  mode > category >   │   │  queries/views/feedback  │
//! │  listings > help     │   │  + aggregate reads       │
//! └──────────┬───────────┘   └──────────────────────────┘
//!            │ reads
//!            ▼
//! ┌──────────────────────┐
//! │    TaxonomyStore     │
//! │  immutable, derived  │
//! │  category index      │
//! └──────────────────────┘
//! ```
//!
//! The store is built once from `data/failure_modes.json` and is
//! read-only afterwards. The router never writes to the log; logging is
//! caller policy. All operations are synchronous and run to completion.
//!
//! ```rust,ignore
//! use masft_educator::{InteractionLog, QueryRouter, TaxonomyStore};
//!
//! let store = TaxonomyStore::load(Path::new("data/failure_modes.json"));
//! let log = InteractionLog::open(&db_path)?;
//! let mut router = QueryRouter::new(&store);
//!
//! log.log_query(text)?;
//! println!("{}", router.route(text));
//! ```

pub mod db;
pub mod report;
pub mod router;
pub mod taxonomy;
pub mod types;

pub use db::InteractionLog;
pub use router::{help_document, QueryRouter};
pub use taxonomy::TaxonomyStore;
pub use types::{FailureMode, FeedbackStats, QueryLogEntry, SolutionType, ViewCount};
