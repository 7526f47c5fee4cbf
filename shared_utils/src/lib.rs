//! Small helpers shared by the review pipeline crates.

pub mod env;
