//! Face-recognition attendance for small groups.
//!
//! Members enroll from a single-face photo; each later group photo is
//! matched against the roster and logged as a session. Analytics derive
//! leaderboards, pairwise collaboration scores and a social graph from
//! that log.

pub mod analytics;
pub mod pipeline;
pub mod recognition;
pub mod roster;
pub mod shared;
