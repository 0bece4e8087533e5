//! skillzen-core — Assessment engine, question banks, and scoring.
//!
//! This crate defines the fundamental data model, the timed-assessment state
//! machine, and the scoring logic that the rest of SkillZen builds on.

pub mod error;
pub mod ledger;
pub mod model;
pub mod parser;
pub mod report;
pub mod scoring;
pub mod session;
pub mod timer;
pub mod traits;
