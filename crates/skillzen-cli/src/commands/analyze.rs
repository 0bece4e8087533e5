//! The `skillzen analyze` command family.
//!
//! Career tools: interview answer review, resume analysis, salary
//! estimation, and communication scoring.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use comfy_table::{Cell, Table};

use skillzen_analysis::config::{create_analysis_service, load_config_from};
use skillzen_core::traits::{
    CommunicationRequest, InterviewReviewRequest, ResumeRequest, SalaryRequest,
};

#[derive(Subcommand)]
pub enum AnalyzeCommands {
    /// Review an interview answer
    Interview {
        /// The interview question that was asked
        #[arg(long)]
        question: String,

        /// The answer to review
        #[arg(long)]
        answer: String,

        /// Target role, if known
        #[arg(long)]
        role: Option<String>,
    },

    /// Analyze a resume text file
    Resume {
        /// Path to the resume (plain text)
        #[arg(long)]
        file: PathBuf,
    },

    /// Estimate a salary band for a candidate profile
    Salary {
        /// Target role
        #[arg(long)]
        role: String,

        /// Years of experience
        #[arg(long, default_value = "0")]
        experience_years: u32,

        /// Location
        #[arg(long, default_value = "Bangalore")]
        location: String,

        /// Comma-separated skills
        #[arg(long)]
        skills: Option<String>,
    },

    /// Score a communication sample
    Communication {
        /// The text to score
        #[arg(long)]
        text: String,
    },
}

pub async fn execute(
    command: AnalyzeCommands,
    json: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let service = create_analysis_service(&config)?;

    match command {
        AnalyzeCommands::Interview {
            question,
            answer,
            role,
        } => {
            let feedback = service
                .review_interview_answer(&InterviewReviewRequest {
                    question_id: "ad-hoc".into(),
                    question,
                    answer,
                    role,
                })
                .await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&feedback)?);
                return Ok(());
            }
            println!("Score: {}/100\n", feedback.score);
            println!("Strengths:");
            for s in &feedback.strengths {
                println!("  + {s}");
            }
            println!("\nImprovements:");
            for i in &feedback.improvements {
                println!("  - {i}");
            }
        }

        AnalyzeCommands::Resume { file } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read resume: {}", file.display()))?;
            let file_name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.display().to_string());

            let analysis = service
                .analyze_resume(&ResumeRequest { file_name, content })
                .await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
                return Ok(());
            }
            println!("Score: {}/100", analysis.score);
            println!("Experience: {}", analysis.experience);
            println!("Education: {}", analysis.education);
            if !analysis.skills.is_empty() {
                println!("Skills: {}", analysis.skills.join(", "));
            }
            println!("\nStrengths:");
            for s in &analysis.strengths {
                println!("  + {s}");
            }
            println!("\nImprovements:");
            for i in &analysis.improvements {
                println!("  - {i}");
            }
        }

        AnalyzeCommands::Salary {
            role,
            experience_years,
            location,
            skills,
        } => {
            let skills: Vec<String> = skills
                .map(|s| s.split(',').map(|p| p.trim().to_string()).collect())
                .unwrap_or_default();

            let estimate = service
                .estimate_salary(&SalaryRequest {
                    role: role.clone(),
                    experience_years,
                    location,
                    skills,
                })
                .await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&estimate)?);
                return Ok(());
            }
            let mut table = Table::new();
            table.set_header(vec!["Role", "Min", "Average", "Max"]);
            table.add_row(vec![
                Cell::new(&role),
                Cell::new(format!("INR {}", estimate.min)),
                Cell::new(format!("INR {}", estimate.average)),
                Cell::new(format!("INR {}", estimate.max)),
            ]);
            println!("{table}");

            println!("\nFactors:");
            for f in &estimate.factors {
                println!("  {f}");
            }
        }

        AnalyzeCommands::Communication { text } => {
            let feedback = service
                .score_communication(&CommunicationRequest { text })
                .await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&feedback)?);
                return Ok(());
            }
            println!("Grammar:    {}/100", feedback.grammar);
            println!("Fluency:    {}/100", feedback.fluency);
            println!("Vocabulary: {}/100", feedback.vocabulary);
            println!("\nSuggestions:");
            for s in &feedback.suggestions {
                println!("  - {s}");
            }
        }
    }

    Ok(())
}
