//! Remote job feed library.
//!
//! Visits a fixed registry of remote job boards, extracts listings posted
//! within a recency window, and merges them into one deduplicated,
//! newest-first JSON feed.

// Allow raw string hashes for safety - selectors are full of quotes
#![allow(clippy::needless_raw_string_hashes)]

pub mod adapters;
pub mod aggregate;
pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod listing;
pub mod orchestrator;
pub mod output;
pub mod posted_time;
pub mod session;
pub mod sources;
