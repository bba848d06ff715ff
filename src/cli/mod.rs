//! CLI commands for the merge-gate binary

mod check;

pub use check::{CheckOptions, run_check};
