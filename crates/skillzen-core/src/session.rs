//! The assessment session state machine.
//!
//! One controller per assessment run: it owns the question bank, the answer
//! ledger, the cursor, and the remaining-time counter, and funnels every
//! mutation, user-driven or tick-driven, through guarded methods so the
//! `NotStarted -> InProgress -> Submitted` lifecycle cannot be corrupted.

use serde::{Deserialize, Serialize};

use crate::error::AssessmentError;
use crate::ledger::AnswerLedger;
use crate::model::{Answer, Question, QuestionBank, QuestionKind};
use crate::scoring::{self, ScoreSummary};

/// How an assessment is run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Mode {
    /// Untimed, with immediate per-question feedback.
    Practice,
    /// Countdown-gated; submission is forced when the clock hits zero.
    Timed { duration_secs: u64 },
}

impl Mode {
    pub fn is_timed(&self) -> bool {
        matches!(self, Mode::Timed { .. })
    }
}

/// Session lifecycle state. `Submitted` is terminal until `reset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    NotStarted,
    InProgress,
    Submitted,
}

/// Immediate feedback returned by `select_answer` in practice mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeFeedback {
    pub correct: bool,
    pub correct_option: usize,
    pub explanation: Option<String>,
}

/// What a clock tick did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Stale epoch, wrong state, or practice mode; nothing happened.
    Ignored,
    /// Clock decremented; seconds left.
    Running(u64),
    /// Clock hit zero and the session auto-submitted.
    Expired,
}

/// Orchestrates navigation, answer recording, submission, and scoring for
/// one run through a question bank.
#[derive(Debug)]
pub struct AssessmentController {
    bank: QuestionBank,
    ledger: AnswerLedger,
    state: SessionState,
    mode: Mode,
    cursor: usize,
    remaining_secs: u64,
    /// Bumped on every start/submit/reset so a tick scheduled against an
    /// earlier lifecycle can never mutate the current one.
    epoch: u64,
}

impl AssessmentController {
    pub fn new(bank: QuestionBank) -> Self {
        Self {
            bank,
            ledger: AnswerLedger::new(),
            state: SessionState::NotStarted,
            mode: Mode::Practice,
            cursor: 0,
            remaining_secs: 0,
            epoch: 0,
        }
    }

    /// Begin an assessment: `NotStarted -> InProgress`.
    ///
    /// A submitted session must be `reset` before it can be started again.
    pub fn start(&mut self, mode: Mode) -> Result<(), AssessmentError> {
        if self.state != SessionState::NotStarted {
            return Err(AssessmentError::AlreadyStarted);
        }
        self.mode = mode;
        self.cursor = 0;
        self.ledger.clear();
        self.remaining_secs = match mode {
            Mode::Timed { duration_secs } => duration_secs,
            Mode::Practice => 0,
        };
        self.epoch += 1;
        self.state = SessionState::InProgress;
        tracing::debug!(
            bank = %self.bank.meta().id,
            timed = mode.is_timed(),
            "assessment started"
        );
        Ok(())
    }

    /// Record an answer. In practice mode, returns immediate feedback for
    /// scorable questions.
    pub fn select_answer(
        &mut self,
        question_id: &str,
        answer: Answer,
    ) -> Result<Option<PracticeFeedback>, AssessmentError> {
        match self.state {
            SessionState::NotStarted => return Err(AssessmentError::NotStarted),
            SessionState::Submitted => return Err(AssessmentError::SessionClosed),
            SessionState::InProgress => {}
        }

        let question = self.bank.by_id(question_id).ok_or_else(|| {
            AssessmentError::InvalidAnswer {
                question_id: question_id.to_string(),
                reason: "no such question in this bank".into(),
            }
        })?;
        Self::check_shape(question, &answer)?;

        let feedback = match (self.mode, &answer, question.correct_option()) {
            (Mode::Practice, Answer::Choice(picked), Some(key)) => Some(PracticeFeedback {
                correct: *picked == key,
                correct_option: key,
                explanation: question.explanation.clone(),
            }),
            _ => None,
        };

        self.ledger.record(question_id, answer)?;
        Ok(feedback)
    }

    fn check_shape(question: &Question, answer: &Answer) -> Result<(), AssessmentError> {
        match (&question.kind, answer) {
            (QuestionKind::SingleChoice { options, .. }, Answer::Choice(picked)) => {
                if *picked >= options.len() {
                    return Err(AssessmentError::InvalidAnswer {
                        question_id: question.id.clone(),
                        reason: format!(
                            "option index {picked} out of range (have {} options)",
                            options.len()
                        ),
                    });
                }
                Ok(())
            }
            (QuestionKind::SingleChoice { .. }, Answer::Text(_)) => {
                Err(AssessmentError::InvalidAnswer {
                    question_id: question.id.clone(),
                    reason: "expected an option choice, got free text".into(),
                })
            }
            (QuestionKind::Code { .. } | QuestionKind::Descriptive { .. }, Answer::Text(_)) => {
                Ok(())
            }
            (QuestionKind::Code { .. } | QuestionKind::Descriptive { .. }, Answer::Choice(_)) => {
                Err(AssessmentError::InvalidAnswer {
                    question_id: question.id.clone(),
                    reason: "expected free text, got an option choice".into(),
                })
            }
        }
    }

    /// Move to the next question; no-op at the last one.
    pub fn go_next(&mut self) {
        if self.cursor + 1 < self.bank.count() {
            self.cursor += 1;
        }
    }

    /// Move to the previous question; no-op at the first one.
    pub fn go_previous(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Finish the assessment: `InProgress -> Submitted`.
    ///
    /// Idempotent once submitted; the same summary comes back. The ledger is
    /// closed but never cleared, so partially entered free text survives a
    /// forced submission.
    pub fn submit(&mut self) -> Result<ScoreSummary, AssessmentError> {
        match self.state {
            SessionState::NotStarted => Err(AssessmentError::NotStarted),
            SessionState::Submitted => Ok(scoring::summarize(&self.bank, &self.ledger)),
            SessionState::InProgress => {
                self.state = SessionState::Submitted;
                self.ledger.close();
                self.epoch += 1;
                let summary = scoring::summarize(&self.bank, &self.ledger);
                tracing::info!(
                    bank = %self.bank.meta().id,
                    correct = summary.correct,
                    scorable = summary.scorable,
                    percentage = summary.percentage,
                    "assessment submitted"
                );
                Ok(summary)
            }
        }
    }

    /// Apply one clock tick from the countdown driver.
    ///
    /// The tick must carry the epoch captured when the countdown was armed;
    /// a tick raced against `submit`/`reset` carries a stale epoch and is
    /// ignored, which is the cancellation guarantee timed sessions rely on.
    pub fn timed_tick(&mut self, epoch: u64) -> TickOutcome {
        if epoch != self.epoch
            || self.state != SessionState::InProgress
            || !self.mode.is_timed()
        {
            return TickOutcome::Ignored;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            tracing::info!(bank = %self.bank.meta().id, "time expired, forcing submission");
            // InProgress is guaranteed here, so submit cannot fail.
            let _ = self.submit();
            TickOutcome::Expired
        } else {
            TickOutcome::Running(self.remaining_secs)
        }
    }

    /// Return to the initial configuration from any state ("try again").
    pub fn reset(&mut self) {
        self.state = SessionState::NotStarted;
        self.ledger.clear();
        self.cursor = 0;
        self.remaining_secs = 0;
        self.epoch += 1;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current_question(&self) -> &Question {
        // The cursor is clamped to a non-empty bank's bounds.
        &self.bank.all()[self.cursor]
    }

    /// Seconds left on the clock; only meaningful for timed sessions.
    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn answered_count(&self) -> usize {
        self.ledger.answered_count()
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn ledger(&self) -> &AnswerLedger {
        &self.ledger
    }

    /// Epoch to hand to a countdown driver armed for the current run.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The score summary, recomputed on demand once submitted.
    pub fn summary(&self) -> Option<ScoreSummary> {
        match self.state {
            SessionState::Submitted => Some(scoring::summarize(&self.bank, &self.ledger)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_support::sample_bank;

    fn started(mode: Mode) -> AssessmentController {
        let mut ctl = AssessmentController::new(sample_bank());
        ctl.start(mode).unwrap();
        ctl
    }

    #[test]
    fn start_twice_fails() {
        let mut ctl = started(Mode::Practice);
        assert!(matches!(
            ctl.start(Mode::Practice),
            Err(AssessmentError::AlreadyStarted)
        ));
    }

    #[test]
    fn start_after_submit_requires_reset() {
        let mut ctl = started(Mode::Practice);
        ctl.submit().unwrap();
        assert!(matches!(
            ctl.start(Mode::Practice),
            Err(AssessmentError::AlreadyStarted)
        ));
        ctl.reset();
        ctl.start(Mode::Practice).unwrap();
    }

    #[test]
    fn submit_before_start_fails() {
        let mut ctl = AssessmentController::new(sample_bank());
        assert!(matches!(ctl.submit(), Err(AssessmentError::NotStarted)));
    }

    #[test]
    fn immediate_submit_scores_zero() {
        let mut ctl = started(Mode::Practice);
        let summary = ctl.submit().unwrap();
        assert_eq!(summary.correct, 0);
        assert_eq!(summary.percentage, 0);
        assert!(summary.scorable > 0);
    }

    #[test]
    fn submit_is_idempotent() {
        let mut ctl = started(Mode::Practice);
        ctl.select_answer("q0", Answer::Choice(1)).unwrap();
        let first = ctl.submit().unwrap();
        let second = ctl.submit().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn practice_mode_gives_immediate_feedback() {
        let mut ctl = started(Mode::Practice);

        let right = ctl.select_answer("q0", Answer::Choice(1)).unwrap().unwrap();
        assert!(right.correct);
        assert_eq!(right.correct_option, 1);
        assert!(right.explanation.is_some());

        let wrong = ctl.select_answer("q0", Answer::Choice(2)).unwrap().unwrap();
        assert!(!wrong.correct);
    }

    #[test]
    fn timed_mode_gives_no_feedback() {
        let mut ctl = started(Mode::Timed { duration_secs: 60 });
        let feedback = ctl.select_answer("q0", Answer::Choice(1)).unwrap();
        assert!(feedback.is_none());
    }

    #[test]
    fn select_answer_after_submit_is_rejected() {
        let mut ctl = started(Mode::Practice);
        ctl.submit().unwrap();
        assert!(matches!(
            ctl.select_answer("q0", Answer::Choice(1)),
            Err(AssessmentError::SessionClosed)
        ));
    }

    #[test]
    fn unknown_question_and_bad_shape_rejected() {
        let mut ctl = started(Mode::Practice);
        assert!(matches!(
            ctl.select_answer("nope", Answer::Choice(0)),
            Err(AssessmentError::InvalidAnswer { .. })
        ));
        assert!(matches!(
            ctl.select_answer("q0", Answer::Choice(9)),
            Err(AssessmentError::InvalidAnswer { .. })
        ));
        assert!(matches!(
            ctl.select_answer("q0", Answer::Text("not a choice".into())),
            Err(AssessmentError::InvalidAnswer { .. })
        ));
    }

    #[test]
    fn navigation_clamps_to_bounds() {
        let mut ctl = started(Mode::Practice);
        ctl.go_previous();
        assert_eq!(ctl.cursor(), 0);

        for _ in 0..20 {
            ctl.go_next();
        }
        assert_eq!(ctl.cursor(), ctl.bank().count() - 1);

        for _ in 0..20 {
            ctl.go_previous();
        }
        assert_eq!(ctl.cursor(), 0);
    }

    #[test]
    fn answered_count_tracks_distinct_ids() {
        let mut ctl = started(Mode::Practice);
        ctl.select_answer("q0", Answer::Choice(0)).unwrap();
        ctl.select_answer("q0", Answer::Choice(1)).unwrap();
        ctl.select_answer("q1", Answer::Choice(1)).unwrap();
        assert_eq!(ctl.answered_count(), 2);
        assert!(ctl.answered_count() <= ctl.bank().count());
    }

    #[test]
    fn five_ticks_force_submission() {
        let mut ctl = started(Mode::Timed { duration_secs: 5 });
        let epoch = ctl.epoch();

        for _ in 0..4 {
            assert!(matches!(ctl.timed_tick(epoch), TickOutcome::Running(_)));
        }
        assert_eq!(ctl.timed_tick(epoch), TickOutcome::Expired);
        assert_eq!(ctl.state(), SessionState::Submitted);
        assert_eq!(ctl.summary().unwrap().correct, 0);
    }

    #[test]
    fn stale_tick_is_ignored_after_reset() {
        let mut ctl = started(Mode::Timed { duration_secs: 30 });
        let epoch = ctl.epoch();
        ctl.reset();

        assert_eq!(ctl.timed_tick(epoch), TickOutcome::Ignored);
        assert_eq!(ctl.state(), SessionState::NotStarted);
        assert_eq!(ctl.remaining_secs(), 0);
    }

    #[test]
    fn ticks_do_nothing_in_practice_mode() {
        let mut ctl = started(Mode::Practice);
        let epoch = ctl.epoch();
        assert_eq!(ctl.timed_tick(epoch), TickOutcome::Ignored);
    }

    #[test]
    fn reset_restores_initial_configuration() {
        let mut ctl = started(Mode::Timed { duration_secs: 60 });
        ctl.select_answer("q0", Answer::Choice(1)).unwrap();
        ctl.go_next();
        ctl.reset();

        assert_eq!(ctl.state(), SessionState::NotStarted);
        assert_eq!(ctl.cursor(), 0);
        assert_eq!(ctl.answered_count(), 0);
    }

    #[test]
    fn timeout_preserves_typed_text() {
        let mut ctl = started(Mode::Timed { duration_secs: 1 });
        // q0..q4 are all single-choice in the sample bank, so record a
        // choice and let the clock run out.
        ctl.select_answer("q2", Answer::Choice(1)).unwrap();
        let epoch = ctl.epoch();
        assert_eq!(ctl.timed_tick(epoch), TickOutcome::Expired);

        // The recorded answer survives the forced submission.
        assert_eq!(ctl.answered_count(), 1);
        assert_eq!(ctl.summary().unwrap().correct, 1);
    }
}
