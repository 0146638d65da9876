//! Japanese pronunciation analysis: mora alignment, pitch-accent resolution
//! and contour matching folded into one graded report.

pub mod audio;
pub mod config;
pub mod pronunciation;
