//! SkillZen configuration and service factories.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use skillzen_core::traits::{AnalysisService, CodeJudge};

use crate::canned::CannedAnalysis;
use crate::judge::SimulatedJudge;

/// Top-level SkillZen configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillzenConfig {
    /// Where question banks live.
    #[serde(default = "default_banks_dir")]
    pub banks_dir: PathBuf,
    /// Where reports are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Default time limit for timed tests, in seconds.
    #[serde(default = "default_duration_secs")]
    pub default_duration_secs: u64,
    /// Max concurrent answer sets in batch grading.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Analysis service settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// Which analysis backend to use and how it behaves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Service name. Only "canned" ships today; the field exists so a real
    /// backend can be selected without code changes at the call sites.
    #[serde(default = "default_service")]
    pub service: String,
    /// Simulated latency for canned results, in milliseconds.
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,
}

fn default_banks_dir() -> PathBuf {
    PathBuf::from("./banks")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./skillzen-results")
}
fn default_duration_secs() -> u64 {
    1800
}
fn default_parallelism() -> usize {
    4
}
fn default_service() -> String {
    "canned".to_string()
}
fn default_latency_ms() -> u64 {
    1500
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            service: default_service(),
            latency_ms: default_latency_ms(),
        }
    }
}

impl Default for SkillzenConfig {
    fn default() -> Self {
        Self {
            banks_dir: default_banks_dir(),
            output_dir: default_output_dir(),
            default_duration_secs: default_duration_secs(),
            parallelism: default_parallelism(),
            analysis: AnalysisConfig::default(),
        }
    }
}

/// Load configuration from an explicit path or well-known locations.
///
/// Search order when no path is given:
/// 1. `skillzen.toml` in the current directory
/// 2. `~/.config/skillzen/config.toml`
/// 3. built-in defaults
pub fn load_config_from(path: Option<&Path>) -> Result<SkillzenConfig> {
    if let Some(path) = path {
        return read_config(path);
    }

    let cwd_config = Path::new("skillzen.toml");
    if cwd_config.exists() {
        return read_config(cwd_config);
    }

    if let Some(home) = std::env::var_os("HOME") {
        let user_config = Path::new(&home).join(".config/skillzen/config.toml");
        if user_config.exists() {
            return read_config(&user_config);
        }
    }

    Ok(SkillzenConfig::default())
}

fn read_config(path: &Path) -> Result<SkillzenConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let config: SkillzenConfig = toml::from_str(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))?;
    Ok(config)
}

/// Build the configured analysis service.
pub fn create_analysis_service(config: &SkillzenConfig) -> Result<Arc<dyn AnalysisService>> {
    match config.analysis.service.as_str() {
        "canned" => {
            tracing::debug!(latency_ms = config.analysis.latency_ms, "using canned analysis");
            Ok(Arc::new(CannedAnalysis::new(Duration::from_millis(
                config.analysis.latency_ms,
            ))))
        }
        other => anyhow::bail!("unknown analysis service '{other}' (available: canned)"),
    }
}

/// Build the configured code judge.
pub fn create_judge(config: &SkillzenConfig) -> Result<Arc<dyn CodeJudge>> {
    match config.analysis.service.as_str() {
        "canned" => Ok(Arc::new(SimulatedJudge::new(Duration::from_millis(
            config.analysis.latency_ms,
        )))),
        other => anyhow::bail!("unknown analysis service '{other}' (available: canned)"),
    }
}
