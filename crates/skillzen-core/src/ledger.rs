//! The answer ledger, a plain store of recorded answers.
//!
//! Deliberately dumb: no validation of answer shape against the question it
//! belongs to (that is the session controller's job). The only rule it
//! enforces is that a closed ledger accepts no further writes.

use std::collections::HashMap;

use crate::error::AssessmentError;
use crate::model::Answer;

/// Maps question id to the user's latest recorded answer.
///
/// Unanswered questions have no entry. The owning session closes the ledger
/// on submission; recorded answers survive closing untouched, so partially
/// entered free text is preserved through a forced (timeout) submission.
#[derive(Debug, Clone, Default)]
pub struct AnswerLedger {
    entries: HashMap<String, Answer>,
    closed: bool,
}

impl AnswerLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer, overwriting any prior answer for the same question.
    pub fn record(
        &mut self,
        question_id: impl Into<String>,
        answer: Answer,
    ) -> Result<(), AssessmentError> {
        if self.closed {
            return Err(AssessmentError::SessionClosed);
        }
        self.entries.insert(question_id.into(), answer);
        Ok(())
    }

    pub fn get(&self, question_id: &str) -> Option<&Answer> {
        self.entries.get(question_id)
    }

    /// Number of distinct questions with a recorded answer.
    pub fn answered_count(&self) -> usize {
        self.entries.len()
    }

    /// Drop all entries and reopen the ledger.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.closed = false;
    }

    /// Stop accepting writes. Entries are kept.
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Answer)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}
