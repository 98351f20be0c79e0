//! Read views derived from a project's session log.
//!
//! Everything here is a pure recomputation over the full history; nothing
//! is cached between calls.

pub mod collaboration;
pub mod leaderboard;
pub mod social_graph;
