//! gradepath-core — Grade evaluation and degree-eligibility rules.
//!
//! This crate defines the curriculum catalog, the grade model, and the two
//! evaluators (per-year progression and overall degree eligibility) that the
//! rest of gradepath builds on.

pub mod catalog;
pub mod config;
pub mod degree;
pub mod engine;
pub mod error;
pub mod grades;
pub mod parser;
pub mod policy;
pub mod report;
pub mod year;
