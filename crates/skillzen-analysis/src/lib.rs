//! skillzen-analysis — Simulated analysis services.
//!
//! The original product fakes every "AI" result with fixed timers and canned
//! or randomized output. This crate keeps that contract behind the
//! [`AnalysisService`] and [`CodeJudge`] traits from `skillzen-core`, with
//! deterministic stand-ins suitable for tests and offline use.
//!
//! [`AnalysisService`]: skillzen_core::traits::AnalysisService
//! [`CodeJudge`]: skillzen_core::traits::CodeJudge

pub mod canned;
pub mod config;
pub mod judge;

pub use canned::CannedAnalysis;
pub use config::{create_analysis_service, create_judge, load_config_from, SkillzenConfig};
pub use judge::SimulatedJudge;

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Deterministic stand-in for the original's `Math.random()`: a stable hash
/// of the submission folded into `0..modulus`.
pub(crate) fn pseudo_random(seed: &str, salt: u64, modulus: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    salt.hash(&mut hasher);
    hasher.finish() % modulus.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pseudo_random_is_stable_and_bounded() {
        let a = pseudo_random("same input", 1, 30);
        let b = pseudo_random("same input", 1, 30);
        assert_eq!(a, b);
        assert!(a < 30);
        assert_ne!(
            pseudo_random("same input", 1, u64::MAX),
            pseudo_random("same input", 2, u64::MAX)
        );
    }
}
