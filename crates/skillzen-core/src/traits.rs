//! Trait definitions for analysis services and the code judge.
//!
//! Every "AI analysis" flow in the product (interview answer review, resume
//! analysis, salary estimation, communication scoring, and code execution)
//! sits behind these async traits. The `skillzen-analysis` crate ships
//! simulated implementations; a real backend can be swapped in without
//! touching the assessment controller.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::model::JudgeCase;

// ---------------------------------------------------------------------------
// Analysis service
// ---------------------------------------------------------------------------

/// Backend for the career tools and interview feedback.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Human-readable service name (e.g. "canned").
    fn name(&self) -> &str;

    /// Review a spoken/written interview answer.
    async fn review_interview_answer(
        &self,
        request: &InterviewReviewRequest,
    ) -> Result<InterviewFeedback, AnalysisError>;

    /// Analyze a resume document.
    async fn analyze_resume(&self, request: &ResumeRequest)
        -> Result<ResumeAnalysis, AnalysisError>;

    /// Estimate a salary band for a candidate profile.
    async fn estimate_salary(&self, request: &SalaryRequest)
        -> Result<SalaryEstimate, AnalysisError>;

    /// Score a free-text communication sample.
    async fn score_communication(
        &self,
        request: &CommunicationRequest,
    ) -> Result<CommunicationFeedback, AnalysisError>;
}

/// An interview answer to review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewReviewRequest {
    pub question_id: String,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Feedback on an interview answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewFeedback {
    /// Overall score in the 70–100 band.
    pub score: u32,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

/// A resume document to analyze.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeRequest {
    pub file_name: String,
    pub content: String,
}

/// Resume analysis result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    pub score: u32,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    /// Skills detected in the document.
    pub skills: Vec<String>,
    pub experience: String,
    pub education: String,
}

/// A candidate profile for salary estimation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryRequest {
    pub role: String,
    pub experience_years: u32,
    pub location: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// Estimated annual salary band (INR).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryEstimate {
    pub min: u64,
    pub max: u64,
    pub average: u64,
    /// Human-readable factors that shaped the estimate.
    pub factors: Vec<String>,
}

/// A communication sample to score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunicationRequest {
    pub text: String,
}

/// Communication scores on a 0–100 scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunicationFeedback {
    pub grammar: u32,
    pub fluency: u32,
    pub vocabulary: u32,
    pub suggestions: Vec<String>,
}

// ---------------------------------------------------------------------------
// Code judge
// ---------------------------------------------------------------------------

/// Language of a code submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionLanguage {
    JavaScript,
    Python,
    Java,
    Cpp,
    Sql,
}

impl fmt::Display for SubmissionLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionLanguage::JavaScript => write!(f, "javascript"),
            SubmissionLanguage::Python => write!(f, "python"),
            SubmissionLanguage::Java => write!(f, "java"),
            SubmissionLanguage::Cpp => write!(f, "cpp"),
            SubmissionLanguage::Sql => write!(f, "sql"),
        }
    }
}

impl FromStr for SubmissionLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "javascript" | "js" => Ok(SubmissionLanguage::JavaScript),
            "python" | "py" => Ok(SubmissionLanguage::Python),
            "java" => Ok(SubmissionLanguage::Java),
            "cpp" | "c++" => Ok(SubmissionLanguage::Cpp),
            "sql" => Ok(SubmissionLanguage::Sql),
            other => Err(format!("unknown submission language: {other}")),
        }
    }
}

/// Judge that runs a code submission against a problem's test cases.
#[async_trait]
pub trait CodeJudge: Send + Sync {
    /// Human-readable judge name.
    fn name(&self) -> &str;

    /// Run the submission and report per-case verdicts.
    async fn run(&self, request: &CodeRunRequest) -> Result<CodeRunOutcome, AnalysisError>;
}

/// A code submission to judge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeRunRequest {
    pub question_id: String,
    pub language: SubmissionLanguage,
    pub code: String,
    pub test_cases: Vec<JudgeCase>,
    /// Known-good solution, used by simulated judges to short-circuit.
    #[serde(default)]
    pub reference_solution: Option<String>,
}

/// Result of judging a code submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeRunOutcome {
    pub question_id: String,
    pub passed: u32,
    pub total: u32,
    /// Per-test-case verdicts, in test-case order.
    pub verdicts: Vec<bool>,
    pub duration_ms: u64,
}

impl CodeRunOutcome {
    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }
}
