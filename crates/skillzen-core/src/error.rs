//! Error types for the assessment engine and analysis services.
//!
//! `AnalysisError` lives in `skillzen-core` so callers of the service traits
//! can classify failures without string matching.

use thiserror::Error;

/// Errors raised by question banks, the answer ledger, and the session
/// state machine.
#[derive(Debug, Error)]
pub enum AssessmentError {
    /// The question set cannot form a valid bank.
    #[error("invalid question bank: {0}")]
    InvalidBank(String),

    /// `start` was called on a session that is not in `NotStarted`.
    #[error("assessment already started")]
    AlreadyStarted,

    /// A mutation was attempted after the session was submitted.
    #[error("assessment session is closed")]
    SessionClosed,

    /// An operation that requires a running session was called before `start`.
    #[error("assessment has not been started")]
    NotStarted,

    /// The answer does not fit the question it was recorded against.
    #[error("invalid answer for question '{question_id}': {reason}")]
    InvalidAnswer { question_id: String, reason: String },
}

/// Errors that can occur when invoking an analysis service or code judge.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The submission is empty or otherwise unusable.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The judge does not handle the submission language.
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// The backing service cannot take requests right now.
    #[error("analysis service unavailable: {0}")]
    Unavailable(String),
}

impl AnalysisError {
    /// Returns `true` if this error is permanent and should not be retried.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            AnalysisError::InvalidInput(_) | AnalysisError::UnsupportedLanguage(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_error_permanence() {
        assert!(AnalysisError::InvalidInput("empty".into()).is_permanent());
        assert!(AnalysisError::UnsupportedLanguage("cobol".into()).is_permanent());
        assert!(!AnalysisError::Unavailable("busy".into()).is_permanent());
    }

    #[test]
    fn assessment_error_display() {
        let err = AssessmentError::InvalidAnswer {
            question_id: "q1".into(),
            reason: "option index 9 out of range".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid answer for question 'q1': option index 9 out of range"
        );
    }
}
