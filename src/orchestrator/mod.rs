//! Aggregation pipeline: concurrent dispatch, merge, rank, paginate.
//!
//! [`dispatch`] fans a structured query out to the eligible engine adapters
//! under per-engine and total time budgets; [`merge`] deduplicates the
//! collected raw results by canonical URL and produces the full deterministic
//! ranking; [`rank`] holds the scoring policy and pagination.

pub mod dispatch;
pub mod merge;
pub mod rank;
pub mod url_normalize;
