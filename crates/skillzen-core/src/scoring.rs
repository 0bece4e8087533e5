//! Score computation over a question bank and an answer ledger.
//!
//! Pure functions: a summary is derived on demand and never stored, so
//! calling `summarize` repeatedly on the same inputs is idempotent.

use serde::{Deserialize, Serialize};

use crate::ledger::AnswerLedger;
use crate::model::{Answer, QuestionBank};

/// Grading outcome for one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Correct,
    Incorrect,
    /// No answer recorded for a scorable question.
    Unanswered,
    /// Code / descriptive questions are stored but never auto-graded.
    Ungraded,
}

/// Per-question entry in the result breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub question_id: String,
    pub category: String,
    pub outcome: Outcome,
    /// What the user recorded, if anything.
    pub chosen: Option<Answer>,
    /// The answer key, for scorable questions.
    pub correct_option: Option<usize>,
}

/// Derived score summary for a submitted (or in-flight) assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    /// Correctly answered scorable questions.
    pub correct: u32,
    /// Questions eligible for automatic grading.
    pub scorable: u32,
    /// `round(100 * correct / scorable)`; 0 when nothing is scorable.
    pub percentage: u32,
    /// Marks earned across scorable questions.
    pub points_earned: u32,
    /// Marks available across scorable questions.
    pub points_total: u32,
    pub breakdown: Vec<QuestionOutcome>,
}

/// Grade the ledger against the bank's answer keys.
///
/// Only single-choice questions with a defined key count toward `correct`,
/// `scorable`, and the percentage; open-ended answers appear in the
/// breakdown as `Ungraded`.
pub fn summarize(bank: &QuestionBank, ledger: &AnswerLedger) -> ScoreSummary {
    let mut correct = 0u32;
    let mut scorable = 0u32;
    let mut points_earned = 0u32;
    let mut points_total = 0u32;
    let mut breakdown = Vec::with_capacity(bank.count());

    for question in bank.all() {
        let chosen = ledger.get(&question.id).cloned();
        let outcome = match question.correct_option() {
            Some(key) => {
                scorable += 1;
                points_total += question.points;
                match chosen {
                    Some(Answer::Choice(picked)) if picked == key => {
                        correct += 1;
                        points_earned += question.points;
                        Outcome::Correct
                    }
                    Some(_) => Outcome::Incorrect,
                    None => Outcome::Unanswered,
                }
            }
            None => Outcome::Ungraded,
        };

        breakdown.push(QuestionOutcome {
            question_id: question.id.clone(),
            category: question.category.clone(),
            outcome,
            chosen,
            correct_option: question.correct_option(),
        });
    }

    let percentage = if scorable == 0 {
        0
    } else {
        (100.0 * f64::from(correct) / f64::from(scorable)).round() as u32
    };

    ScoreSummary {
        correct,
        scorable,
        percentage,
        points_earned,
        points_total,
        breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_support::sample_bank;
    use crate::model::{BankCategory, BankMeta, Question, QuestionKind};

    #[test]
    fn empty_ledger_scores_zero() {
        let bank = sample_bank();
        let summary = summarize(&bank, &AnswerLedger::new());
        assert_eq!(summary.correct, 0);
        assert_eq!(summary.scorable, 5);
        assert_eq!(summary.percentage, 0);
        assert!(summary
            .breakdown
            .iter()
            .all(|q| q.outcome == Outcome::Unanswered));
    }

    #[test]
    fn three_of_five_is_sixty_percent() {
        // Keys are [1, 1, 1, 1, 3]; q0 left unanswered, q3 wrong.
        let bank = sample_bank();
        let mut ledger = AnswerLedger::new();
        ledger.record("q1", Answer::Choice(1)).unwrap();
        ledger.record("q2", Answer::Choice(1)).unwrap();
        ledger.record("q3", Answer::Choice(0)).unwrap();
        ledger.record("q4", Answer::Choice(3)).unwrap();

        let summary = summarize(&bank, &ledger);
        assert_eq!(summary.correct, 3);
        assert_eq!(summary.scorable, 5);
        assert_eq!(summary.percentage, 60);
        assert_eq!(summary.breakdown[0].outcome, Outcome::Unanswered);
        assert_eq!(summary.breakdown[3].outcome, Outcome::Incorrect);
        assert_eq!(summary.breakdown[4].outcome, Outcome::Correct);
    }

    #[test]
    fn summarize_is_idempotent() {
        let bank = sample_bank();
        let mut ledger = AnswerLedger::new();
        ledger.record("q0", Answer::Choice(1)).unwrap();

        let first = summarize(&bank, &ledger);
        let second = summarize(&bank, &ledger);
        assert_eq!(first, second);
    }

    #[test]
    fn open_ended_answers_are_ungraded() {
        let meta = BankMeta {
            id: "mixed".into(),
            name: "Mixed".into(),
            description: String::new(),
            category: BankCategory::Coding,
            duration_secs: 1800,
            difficulty: None,
            company: None,
            year: None,
            role: None,
            pass_percentage: None,
        };
        let questions = vec![
            Question {
                id: "mcq".into(),
                category: "General".into(),
                prompt: "pick one".into(),
                kind: QuestionKind::SingleChoice {
                    options: vec!["a".into(), "b".into()],
                    correct_option: Some(0),
                },
                explanation: None,
                difficulty: None,
                points: 2,
            },
            Question {
                id: "essay".into(),
                category: "HR".into(),
                prompt: "tell me about yourself".into(),
                kind: QuestionKind::Descriptive {
                    sample_answer: None,
                    tips: vec![],
                    follow_up: vec![],
                },
                explanation: None,
                difficulty: None,
                points: 5,
            },
        ];
        let bank = QuestionBank::new(meta, questions).unwrap();

        let mut ledger = AnswerLedger::new();
        ledger.record("mcq", Answer::Choice(0)).unwrap();
        ledger.record("essay", Answer::Text("I am...".into())).unwrap();

        let summary = summarize(&bank, &ledger);
        assert_eq!(summary.scorable, 1);
        assert_eq!(summary.correct, 1);
        assert_eq!(summary.percentage, 100);
        // Marks only accumulate over scorable questions.
        assert_eq!(summary.points_earned, 2);
        assert_eq!(summary.points_total, 2);
        assert_eq!(summary.breakdown[1].outcome, Outcome::Ungraded);
    }

    #[test]
    fn no_scorable_questions_means_zero_percent() {
        let meta = BankMeta {
            id: "essays".into(),
            name: "Essays".into(),
            description: String::new(),
            category: BankCategory::Interview,
            duration_secs: 1800,
            difficulty: None,
            company: None,
            year: None,
            role: None,
            pass_percentage: None,
        };
        let questions = vec![Question {
            id: "q1".into(),
            category: "HR".into(),
            prompt: "why us?".into(),
            kind: QuestionKind::Descriptive {
                sample_answer: None,
                tips: vec![],
                follow_up: vec![],
            },
            explanation: None,
            difficulty: None,
            points: 1,
        }];
        let bank = QuestionBank::new(meta, questions).unwrap();

        let summary = summarize(&bank, &AnswerLedger::new());
        assert_eq!(summary.scorable, 0);
        assert_eq!(summary.percentage, 0);
    }
}
