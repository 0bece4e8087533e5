//! Session report types with JSON persistence and attempt comparison.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{BankCategory, QuestionBank};
use crate::scoring::{Outcome, ScoreSummary};
use crate::session::Mode;
use crate::traits::CodeRunOutcome;

/// A complete record of one assessment run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Summary of the bank that was attempted.
    pub bank: BankSummary,
    /// How the assessment was run.
    pub mode: Mode,
    /// Label for the answer set that was graded (e.g. the file stem).
    #[serde(default)]
    pub candidate: Option<String>,
    /// The derived score.
    pub score: ScoreSummary,
    /// Questions with a recorded answer.
    pub answered: usize,
    /// Wall-clock seconds the run consumed (0 for instant replays).
    pub elapsed_secs: u64,
    /// Judge outcomes for code answers, if the judge was run.
    #[serde(default)]
    pub code_runs: Vec<CodeRunOutcome>,
}

/// Summary of a question bank (without the full question definitions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankSummary {
    pub id: String,
    pub name: String,
    pub category: BankCategory,
    pub question_count: usize,
}

impl BankSummary {
    pub fn of(bank: &QuestionBank) -> Self {
        Self {
            id: bank.meta().id.clone(),
            name: bank.meta().name.clone(),
            category: bank.meta().category,
            question_count: bank.count(),
        }
    }
}

impl SessionReport {
    /// Save the report as pretty JSON, creating parent directories.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: SessionReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Accuracy per question category: (correct, scorable) pairs.
    fn category_accuracy(&self) -> HashMap<String, (u32, u32)> {
        let mut acc: HashMap<String, (u32, u32)> = HashMap::new();
        for q in &self.score.breakdown {
            if q.outcome == Outcome::Ungraded {
                continue;
            }
            let entry = acc.entry(q.category.clone()).or_insert((0, 0));
            entry.1 += 1;
            if q.outcome == Outcome::Correct {
                entry.0 += 1;
            }
        }
        acc
    }

    /// Compare this attempt against an earlier one on the same bank.
    ///
    /// `threshold` is in percentage points; category deltas inside the
    /// threshold count as steady.
    pub fn compare(&self, baseline: &SessionReport, threshold: f64) -> ProgressReport {
        let baseline_acc = baseline.category_accuracy();
        let current_acc = self.category_accuracy();

        let pct = |(correct, scorable): (u32, u32)| -> f64 {
            if scorable == 0 {
                0.0
            } else {
                100.0 * f64::from(correct) / f64::from(scorable)
            }
        };

        let mut improved = Vec::new();
        let mut declined = Vec::new();
        let mut steady = 0usize;
        let mut new_categories = 0usize;

        let mut categories: Vec<&String> = current_acc.keys().collect();
        categories.sort();

        for category in categories {
            let current = pct(current_acc[category]);
            match baseline_acc.get(category) {
                Some(&base) => {
                    let baseline_pct = pct(base);
                    let delta = current - baseline_pct;
                    let entry = CategoryDelta {
                        category: category.clone(),
                        baseline_pct,
                        current_pct: current,
                        delta,
                    };
                    if delta > threshold {
                        improved.push(entry);
                    } else if delta < -threshold {
                        declined.push(entry);
                    } else {
                        steady += 1;
                    }
                }
                None => new_categories += 1,
            }
        }

        ProgressReport {
            improved,
            declined,
            steady,
            new_categories,
            baseline_percentage: baseline.score.percentage,
            current_percentage: self.score.percentage,
        }
    }
}

/// Result of comparing two attempts at the same bank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressReport {
    /// Categories where accuracy went up.
    pub improved: Vec<CategoryDelta>,
    /// Categories where accuracy went down.
    pub declined: Vec<CategoryDelta>,
    /// Categories with no significant change.
    pub steady: usize,
    /// Categories present now but not in the baseline attempt.
    pub new_categories: usize,
    pub baseline_percentage: u32,
    pub current_percentage: u32,
}

/// Accuracy movement in one question category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDelta {
    pub category: String,
    pub baseline_pct: f64,
    pub current_pct: f64,
    pub delta: f64,
}

impl ProgressReport {
    /// Returns true if any category got worse.
    pub fn has_declines(&self) -> bool {
        !self.declined.is_empty()
    }

    /// Format the progress report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Overall:** {}% -> {}%  |  {} improved, {} declined, {} steady\n\n",
            self.baseline_percentage,
            self.current_percentage,
            self.improved.len(),
            self.declined.len(),
            self.steady
        ));

        let section = |md: &mut String, title: &str, rows: &[CategoryDelta]| {
            if rows.is_empty() {
                return;
            }
            md.push_str(&format!("### {title}\n\n"));
            md.push_str("| Category | Baseline | Current | Delta |\n");
            md.push_str("|----------|----------|---------|-------|\n");
            for d in rows {
                md.push_str(&format!(
                    "| {} | {:.1}% | {:.1}% | {:+.1}% |\n",
                    d.category, d.baseline_pct, d.current_pct, d.delta
                ));
            }
            md.push('\n');
        };

        section(&mut md, "Improved", &self.improved);
        section(&mut md, "Declined", &self.declined);

        md
    }
}
