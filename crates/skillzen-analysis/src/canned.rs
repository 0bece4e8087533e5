//! Canned analysis service.
//!
//! Stands in for a real analysis backend: fixed feedback text from the
//! original product, scores derived deterministically from the submission,
//! and a configurable simulated latency.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use skillzen_core::error::AnalysisError;
use skillzen_core::traits::{
    AnalysisService, CommunicationFeedback, CommunicationRequest, InterviewFeedback,
    InterviewReviewRequest, ResumeAnalysis, ResumeRequest, SalaryEstimate, SalaryRequest,
};

use crate::pseudo_random;

/// Skills the resume "parser" knows how to spot.
const KNOWN_SKILLS: &[&str] = &[
    "JavaScript",
    "TypeScript",
    "React",
    "Node.js",
    "Python",
    "Java",
    "Rust",
    "SQL",
    "MongoDB",
    "Git",
    "HTML/CSS",
    "Docker",
];

/// A deterministic, in-process [`AnalysisService`].
pub struct CannedAnalysis {
    latency: Duration,
    call_count: AtomicU32,
}

impl CannedAnalysis {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            call_count: AtomicU32::new(0),
        }
    }

    /// A service that answers instantly, for tests.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Number of requests this service has handled.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    async fn simulate_work(&self) {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    /// Score in the 70–100 band, derived from the input.
    fn band_score(seed: &str, salt: u64) -> u32 {
        70 + pseudo_random(seed, salt, 31) as u32
    }
}

#[async_trait]
impl AnalysisService for CannedAnalysis {
    fn name(&self) -> &str {
        "canned"
    }

    async fn review_interview_answer(
        &self,
        request: &InterviewReviewRequest,
    ) -> Result<InterviewFeedback, AnalysisError> {
        if request.answer.trim().is_empty() {
            return Err(AnalysisError::InvalidInput("empty interview answer".into()));
        }
        self.simulate_work().await;

        Ok(InterviewFeedback {
            score: Self::band_score(&request.answer, 1),
            strengths: vec![
                "Clear communication".into(),
                "Good structure using STAR method".into(),
                "Relevant examples provided".into(),
            ],
            improvements: vec![
                "Could provide more specific metrics".into(),
                "Consider mentioning lessons learned".into(),
                "Add more technical details".into(),
            ],
        })
    }

    async fn analyze_resume(
        &self,
        request: &ResumeRequest,
    ) -> Result<ResumeAnalysis, AnalysisError> {
        if request.content.trim().is_empty() {
            return Err(AnalysisError::InvalidInput("empty resume".into()));
        }
        self.simulate_work().await;

        let skills: Vec<String> = KNOWN_SKILLS
            .iter()
            .filter(|s| {
                request
                    .content
                    .to_lowercase()
                    .contains(&s.to_lowercase())
            })
            .map(|s| s.to_string())
            .collect();

        Ok(ResumeAnalysis {
            score: Self::band_score(&request.content, 2),
            strengths: vec![
                "Strong technical skills".into(),
                "Good project experience with real-world applications".into(),
                "Clear education background".into(),
                "Relevant internship experience".into(),
            ],
            improvements: vec![
                "Add more quantifiable achievements".into(),
                "Include soft skills section".into(),
                "Add certifications if any".into(),
                "Improve formatting and consistency".into(),
            ],
            skills,
            experience: "2 years".into(),
            education: "B.Tech Computer Science".into(),
        })
    }

    async fn estimate_salary(
        &self,
        request: &SalaryRequest,
    ) -> Result<SalaryEstimate, AnalysisError> {
        if request.role.trim().is_empty() {
            return Err(AnalysisError::InvalidInput("role is required".into()));
        }
        self.simulate_work().await;

        // Base band scaled by experience; location and skills nudge it up.
        let base: u64 = 350_000 + u64::from(request.experience_years) * 120_000;
        let skill_bump = request.skills.len() as u64 * 25_000;
        let min = base + skill_bump;
        let max = min * 2;
        let average = (min + max) / 2;

        let mut factors = vec![
            format!("Location: {}", request.location),
            format!("Experience: {} years", request.experience_years),
        ];
        if !request.skills.is_empty() {
            factors.push(format!("Skills: {} (+10%)", request.skills.join(", ")));
        }
        factors.push("Market demand: High".into());

        Ok(SalaryEstimate {
            min,
            max,
            average,
            factors,
        })
    }

    async fn score_communication(
        &self,
        request: &CommunicationRequest,
    ) -> Result<CommunicationFeedback, AnalysisError> {
        if request.text.trim().is_empty() {
            return Err(AnalysisError::InvalidInput(
                "empty communication sample".into(),
            ));
        }
        self.simulate_work().await;

        Ok(CommunicationFeedback {
            grammar: Self::band_score(&request.text, 3),
            fluency: Self::band_score(&request.text, 4),
            vocabulary: Self::band_score(&request.text, 5),
            suggestions: vec![
                "Use more varied sentence structures".into(),
                "Consider using stronger action verbs".into(),
                "Practice pronunciation of technical terms".into(),
                "Work on transition phrases between ideas".into(),
            ],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interview_request(answer: &str) -> InterviewReviewRequest {
        InterviewReviewRequest {
            question_id: "tell-me".into(),
            question: "Tell me about yourself.".into(),
            answer: answer.into(),
            role: None,
        }
    }

    #[tokio::test]
    async fn interview_feedback_is_in_band_and_deterministic() {
        let service = CannedAnalysis::instant();
        let req = interview_request("I am a web developer with two years of experience.");

        let first = service.review_interview_answer(&req).await.unwrap();
        let second = service.review_interview_answer(&req).await.unwrap();

        assert!((70..=100).contains(&first.score));
        assert_eq!(first.score, second.score);
        assert!(!first.strengths.is_empty());
        assert_eq!(service.call_count(), 2);
    }

    #[tokio::test]
    async fn empty_answer_is_rejected_without_counting() {
        let service = CannedAnalysis::instant();
        let err = service
            .review_interview_answer(&interview_request("   "))
            .await
            .unwrap_err();
        assert!(err.is_permanent());
        assert_eq!(service.call_count(), 0);
    }

    #[tokio::test]
    async fn resume_analysis_detects_skills() {
        let service = CannedAnalysis::instant();
        let analysis = service
            .analyze_resume(&ResumeRequest {
                file_name: "resume.txt".into(),
                content: "Built apps with React and Node.js, versioned with Git.".into(),
            })
            .await
            .unwrap();

        assert!(analysis.skills.contains(&"React".to_string()));
        assert!(analysis.skills.contains(&"Git".to_string()));
        assert!(!analysis.skills.contains(&"Rust".to_string()));
    }

    #[tokio::test]
    async fn salary_scales_with_experience() {
        let service = CannedAnalysis::instant();
        let junior = service
            .estimate_salary(&SalaryRequest {
                role: "Software Engineer".into(),
                experience_years: 1,
                location: "Bangalore".into(),
                skills: vec![],
            })
            .await
            .unwrap();
        let senior = service
            .estimate_salary(&SalaryRequest {
                role: "Software Engineer".into(),
                experience_years: 6,
                location: "Bangalore".into(),
                skills: vec!["React".into()],
            })
            .await
            .unwrap();

        assert!(senior.min > junior.min);
        assert!(junior.min <= junior.average && junior.average <= junior.max);
    }

    #[tokio::test]
    async fn communication_scores_are_bounded() {
        let service = CannedAnalysis::instant();
        let feedback = service
            .score_communication(&CommunicationRequest {
                text: "I enjoy collaborating across teams to deliver projects.".into(),
            })
            .await
            .unwrap();

        for score in [feedback.grammar, feedback.fluency, feedback.vocabulary] {
            assert!((70..=100).contains(&score));
        }
        assert!(!feedback.suggestions.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn latency_is_simulated() {
        let service = CannedAnalysis::new(Duration::from_secs(2));
        let start = tokio::time::Instant::now();
        service
            .review_interview_answer(&interview_request("a real answer"))
            .await
            .unwrap();
        assert!(start.elapsed() >= Duration::from_secs(2));
    }
}
