//! The `skillzen init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create skillzen.toml
    if std::path::Path::new("skillzen.toml").exists() {
        println!("skillzen.toml already exists, skipping.");
    } else {
        std::fs::write("skillzen.toml", SAMPLE_CONFIG)?;
        println!("Created skillzen.toml");
    }

    // Create example bank
    std::fs::create_dir_all("banks")?;
    let bank_path = std::path::Path::new("banks/example.toml");
    if bank_path.exists() {
        println!("banks/example.toml already exists, skipping.");
    } else {
        std::fs::write(bank_path, EXAMPLE_BANK)?;
        println!("Created banks/example.toml");
    }

    // Create example answer set
    std::fs::create_dir_all("answers")?;
    let answers_path = std::path::Path::new("answers/example.json");
    if answers_path.exists() {
        println!("answers/example.json already exists, skipping.");
    } else {
        std::fs::write(answers_path, EXAMPLE_ANSWERS)?;
        println!("Created answers/example.json");
    }

    println!("\nNext steps:");
    println!("  1. Run: skillzen validate --bank banks/example.toml");
    println!("  2. Run: skillzen grade --bank banks/example.toml --answers answers/example.json");
    println!("  3. Run: skillzen list");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# skillzen configuration

banks_dir = "./banks"
output_dir = "./skillzen-results"
default_duration_secs = 1800
parallelism = 4

[analysis]
service = "canned"
latency_ms = 1500
"#;

const EXAMPLE_BANK: &str = r#"[bank]
id = "example"
name = "Example Aptitude Bank"
description = "A small bank to get started"
category = "aptitude"
duration_secs = 600

[[questions]]
id = "speed"
category = "Quantitative"
prompt = "If a train travels 120 km in 2 hours, what is its speed in km/h?"
kind = "single_choice"
options = ["50 km/h", "60 km/h", "70 km/h", "80 km/h"]
correct_option = 1
explanation = "Speed = Distance / Time = 120 / 2 = 60 km/h"
difficulty = "easy"

[[questions]]
id = "series"
category = "Logical Reasoning"
prompt = "Complete the series: 2, 6, 12, 20, 30, ?"
kind = "single_choice"
options = ["40", "42", "44", "46"]
correct_option = 1
explanation = "The differences are 4, 6, 8, 10, so the next is 30 + 12 = 42"
difficulty = "medium"

[[questions]]
id = "work"
category = "Quantitative"
prompt = "A can do a job in 10 days, B in 15 days. Working together, how many days do they need?"
kind = "single_choice"
options = ["5 days", "6 days", "7.5 days", "8 days"]
correct_option = 1
explanation = "Combined rate = 1/10 + 1/15 = 1/6, so 6 days"
difficulty = "medium"
"#;

const EXAMPLE_ANSWERS: &str = r#"{
  "candidate": "example",
  "answers": {
    "speed": { "choice": 1 },
    "series": { "choice": 1 },
    "work": { "choice": 0 }
  }
}
"#;
