//! Simulated code judge.
//!
//! The original product "runs" code by waiting two seconds and passing each
//! test case with 70% probability. This judge keeps the same observable
//! behavior but derives verdicts from a hash of the submission, so the same
//! code always gets the same verdicts.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use skillzen_core::error::AnalysisError;
use skillzen_core::traits::{CodeJudge, CodeRunRequest, CodeRunOutcome};

use crate::pseudo_random;

/// A deterministic, in-process [`CodeJudge`].
pub struct SimulatedJudge {
    latency: Duration,
    call_count: AtomicU32,
    last_request: Mutex<Option<CodeRunRequest>>,
}

impl SimulatedJudge {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// A judge that answers instantly, for tests.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Number of submissions this judge has run.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// The last submission this judge received.
    pub fn last_request(&self) -> Option<CodeRunRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl CodeJudge for SimulatedJudge {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn run(&self, request: &CodeRunRequest) -> Result<CodeRunOutcome, AnalysisError> {
        if request.code.trim().is_empty() {
            return Err(AnalysisError::InvalidInput("empty submission".into()));
        }
        if request.test_cases.is_empty() {
            return Err(AnalysisError::InvalidInput(
                "question has no test cases".into(),
            ));
        }

        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_request.lock().unwrap() = Some(request.clone());

        let started = Instant::now();
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        // A submission matching the reference solution passes everything;
        // otherwise each case passes at roughly the original's 70% rate.
        let is_reference = request
            .reference_solution
            .as_deref()
            .is_some_and(|solution| request.code.trim() == solution.trim());

        let verdicts: Vec<bool> = request
            .test_cases
            .iter()
            .enumerate()
            .map(|(i, case)| {
                is_reference
                    || pseudo_random(&format!("{}::{}", request.code, case.input), i as u64, 10)
                        >= 3
            })
            .collect();
        let passed = verdicts.iter().filter(|&&v| v).count() as u32;

        tracing::debug!(
            question = %request.question_id,
            language = %request.language,
            passed,
            total = verdicts.len(),
            "judged submission"
        );

        Ok(CodeRunOutcome {
            question_id: request.question_id.clone(),
            passed,
            total: verdicts.len() as u32,
            verdicts,
            duration_ms: started.elapsed().as_millis() as u64,
        })
    }
}
