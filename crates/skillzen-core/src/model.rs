//! Core data model types for SkillZen.
//!
//! These are the fundamental types the entire system uses to represent
//! questions, question banks, and recorded answers.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AssessmentError;

/// Question or paper difficulty label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// What kind of practice material a bank holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BankCategory {
    Aptitude,
    Technical,
    Coding,
    Interview,
    Hr,
}

impl fmt::Display for BankCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BankCategory::Aptitude => write!(f, "aptitude"),
            BankCategory::Technical => write!(f, "technical"),
            BankCategory::Coding => write!(f, "coding"),
            BankCategory::Interview => write!(f, "interview"),
            BankCategory::Hr => write!(f, "hr"),
        }
    }
}

impl FromStr for BankCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "aptitude" => Ok(BankCategory::Aptitude),
            "technical" => Ok(BankCategory::Technical),
            "coding" => Ok(BankCategory::Coding),
            "interview" => Ok(BankCategory::Interview),
            "hr" => Ok(BankCategory::Hr),
            other => Err(format!("unknown bank category: {other}")),
        }
    }
}

/// A worked example shown alongside a coding problem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkedExample {
    pub input: String,
    pub output: String,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// One input/expected-output pair the code judge runs a submission against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeCase {
    pub input: String,
    pub expected_output: String,
}

/// Kind-specific question payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuestionKind {
    /// Multiple choice with an ordered option list. Only questions with a
    /// defined `correct_option` are auto-graded.
    SingleChoice {
        options: Vec<String>,
        #[serde(default)]
        correct_option: Option<usize>,
    },
    /// Free-form code, judged (if at all) by an external [`CodeJudge`].
    ///
    /// [`CodeJudge`]: crate::traits::CodeJudge
    Code {
        #[serde(default)]
        constraints: Vec<String>,
        #[serde(default)]
        examples: Vec<WorkedExample>,
        #[serde(default)]
        test_cases: Vec<JudgeCase>,
        #[serde(default)]
        reference_solution: Option<String>,
    },
    /// Free-text answer (interview / HR questions). Stored, never auto-graded.
    Descriptive {
        #[serde(default)]
        sample_answer: Option<String>,
        #[serde(default)]
        tips: Vec<String>,
        #[serde(default)]
        follow_up: Vec<String>,
    },
}

/// A single practice question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier within its bank.
    pub id: String,
    /// Topic label, e.g. "Quantitative" or "Logical Reasoning".
    #[serde(default)]
    pub category: String,
    /// The question text.
    pub prompt: String,
    /// Kind-specific payload.
    #[serde(flatten)]
    pub kind: QuestionKind,
    /// Shown as feedback in practice mode and in the result breakdown.
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    /// Marks awarded for a correct answer.
    #[serde(default = "default_points")]
    pub points: u32,
}

fn default_points() -> u32 {
    1
}

impl Question {
    /// A question is scorable when it is single-choice with a defined key.
    pub fn is_scorable(&self) -> bool {
        matches!(
            self.kind,
            QuestionKind::SingleChoice {
                correct_option: Some(_),
                ..
            }
        )
    }

    /// The correct option index, if this question has one.
    pub fn correct_option(&self) -> Option<usize> {
        match self.kind {
            QuestionKind::SingleChoice { correct_option, .. } => correct_option,
            _ => None,
        }
    }
}

/// An answer a user recorded for a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Answer {
    /// Zero-based option index for a single-choice question.
    Choice(usize),
    /// Free text for code / descriptive questions.
    Text(String),
}

/// Bank-level metadata, including company-paper provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankMeta {
    /// Unique bank identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: BankCategory,
    /// Time limit for timed-test mode, in seconds.
    #[serde(default = "default_duration_secs")]
    pub duration_secs: u64,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    /// Company the paper was drawn from, if this is a company paper.
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub year: Option<u32>,
    #[serde(default)]
    pub role: Option<String>,
    /// Historical cutoff for the paper, in percent.
    #[serde(default)]
    pub pass_percentage: Option<u32>,
}

pub(crate) fn default_duration_secs() -> u64 {
    1800
}

/// An ordered, immutable, validated set of questions.
///
/// Construction is the only fallible step; everything after is read-only.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    meta: BankMeta,
    questions: Vec<Question>,
    by_id: HashMap<String, usize>,
}

impl QuestionBank {
    /// Validate and build a bank from an ordered question list.
    ///
    /// Fails if the list is empty, contains duplicate ids, or a single-choice
    /// key points outside its option list.
    pub fn new(meta: BankMeta, questions: Vec<Question>) -> Result<Self, AssessmentError> {
        if questions.is_empty() {
            return Err(AssessmentError::InvalidBank(format!(
                "bank '{}' has no questions",
                meta.id
            )));
        }

        let mut by_id = HashMap::with_capacity(questions.len());
        for (idx, q) in questions.iter().enumerate() {
            if by_id.insert(q.id.clone(), idx).is_some() {
                return Err(AssessmentError::InvalidBank(format!(
                    "duplicate question id '{}'",
                    q.id
                )));
            }
            if let QuestionKind::SingleChoice {
                ref options,
                correct_option: Some(correct),
            } = q.kind
            {
                if correct >= options.len() {
                    return Err(AssessmentError::InvalidBank(format!(
                        "question '{}': correct option {} out of range (have {} options)",
                        q.id,
                        correct,
                        options.len()
                    )));
                }
            }
        }

        Ok(Self {
            meta,
            questions,
            by_id,
        })
    }

    pub fn meta(&self) -> &BankMeta {
        &self.meta
    }

    pub fn count(&self) -> usize {
        self.questions.len()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn by_id(&self, id: &str) -> Option<&Question> {
        self.by_id.get(id).map(|&idx| &self.questions[idx])
    }

    pub fn all(&self) -> &[Question] {
        &self.questions
    }

    /// Number of questions eligible for automatic grading.
    pub fn scorable_count(&self) -> usize {
        self.questions.iter().filter(|q| q.is_scorable()).count()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn mcq(id: &str, options: usize, correct: Option<usize>) -> Question {
        Question {
            id: id.into(),
            category: "General".into(),
            prompt: format!("prompt for {id}"),
            kind: QuestionKind::SingleChoice {
                options: (0..options).map(|i| format!("opt {i}")).collect(),
                correct_option: correct,
            },
            explanation: None,
            difficulty: None,
            points: 1,
        }
    }

    fn meta() -> BankMeta {
        BankMeta {
            id: "bank".into(),
            name: "Bank".into(),
            description: String::new(),
            category: BankCategory::Aptitude,
            duration_secs: 1800,
            difficulty: None,
            company: None,
            year: None,
            role: None,
            pass_percentage: None,
        }
    }

    #[test]
    fn difficulty_display_and_parse() {
        assert_eq!(Difficulty::Easy.to_string(), "easy");
        assert_eq!("Medium".parse::<Difficulty>().unwrap(), Difficulty::Medium);
        assert_eq!("HARD".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("impossible".parse::<Difficulty>().is_err());
    }

    #[test]
    fn category_display_and_parse() {
        assert_eq!(BankCategory::Interview.to_string(), "interview");
        assert_eq!("hr".parse::<BankCategory>().unwrap(), BankCategory::Hr);
        assert!("trivia".parse::<BankCategory>().is_err());
    }

    #[test]
    fn empty_bank_rejected() {
        let err = QuestionBank::new(meta(), vec![]).unwrap_err();
        assert!(err.to_string().contains("no questions"));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let err =
            QuestionBank::new(meta(), vec![mcq("q1", 4, Some(0)), mcq("q1", 4, Some(1))])
                .unwrap_err();
        assert!(err.to_string().contains("duplicate question id 'q1'"));
    }

    #[test]
    fn out_of_range_key_rejected() {
        let err = QuestionBank::new(meta(), vec![mcq("q1", 2, Some(2))]).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn accessors_and_scorability() {
        let keyless = mcq("q2", 4, None);
        let bank = QuestionBank::new(meta(), vec![mcq("q1", 4, Some(3)), keyless]).unwrap();

        assert_eq!(bank.count(), 2);
        assert_eq!(bank.scorable_count(), 1);
        assert_eq!(bank.get(0).unwrap().id, "q1");
        assert!(bank.get(2).is_none());
        assert_eq!(bank.by_id("q2").unwrap().correct_option(), None);
        assert!(bank.by_id("q1").unwrap().is_scorable());
        assert!(!bank.by_id("q2").unwrap().is_scorable());
    }

    #[test]
    fn question_serde_roundtrip() {
        let q = Question {
            id: "two-sum".into(),
            category: "DSA".into(),
            prompt: "Return indices of two numbers adding to target.".into(),
            kind: QuestionKind::Code {
                constraints: vec!["2 <= nums.length <= 10^4".into()],
                examples: vec![WorkedExample {
                    input: "nums = [2,7,11,15], target = 9".into(),
                    output: "[0,1]".into(),
                    explanation: None,
                }],
                test_cases: vec![JudgeCase {
                    input: "[2,7,11,15], 9".into(),
                    expected_output: "[0,1]".into(),
                }],
                reference_solution: None,
            },
            explanation: None,
            difficulty: Some(Difficulty::Easy),
            points: 10,
        };
        let json = serde_json::to_string(&q).unwrap();
        let back: Question = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, "two-sum");
        assert_eq!(back.points, 10);
        assert!(matches!(back.kind, QuestionKind::Code { .. }));
    }
}
