//! skillzen CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "skillzen", version, about = "Placement and interview preparation toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade recorded answer sets against a question bank
    Grade {
        /// Path to a .toml question bank
        #[arg(long)]
        bank: PathBuf,

        /// Answer set JSON file, or a directory of them
        #[arg(long)]
        answers: PathBuf,

        /// Session mode: timed, practice
        #[arg(long, default_value = "timed")]
        mode: String,

        /// Time limit override in seconds (timed mode only)
        #[arg(long)]
        duration: Option<u64>,

        /// Run code answers through the configured judge
        #[arg(long)]
        judge: bool,

        /// Submission language for judged code answers
        #[arg(long, default_value = "javascript")]
        language: String,

        /// Max concurrent answer sets
        #[arg(long, default_value = "4")]
        parallelism: usize,

        /// Output directory
        #[arg(long, default_value = "./skillzen-results")]
        output: PathBuf,

        /// Output format: json, markdown, html, all
        #[arg(long, default_value = "json")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Compare two attempt reports on the same bank
    Compare {
        /// Baseline report JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current report JSON
        #[arg(long)]
        current: PathBuf,

        /// Per-category threshold in percentage points
        #[arg(long, default_value = "5.0")]
        threshold: f64,

        /// Exit code 1 if any category declined
        #[arg(long)]
        fail_on_decline: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Validate question bank TOML files
    Validate {
        /// Path to a bank file or directory
        #[arg(long)]
        bank: PathBuf,
    },

    /// List available question banks
    List {
        /// Bank directory (defaults to the configured banks_dir)
        #[arg(long)]
        banks: Option<PathBuf>,

        /// Filter by bank category
        #[arg(long)]
        category: Option<String>,

        /// Filter by company name
        #[arg(long)]
        company: Option<String>,

        /// Filter by paper year
        #[arg(long)]
        year: Option<u32>,

        /// Substring match on bank name, company, or role
        #[arg(long)]
        search: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Career tools backed by the analysis service
    Analyze {
        #[command(subcommand)]
        command: commands::analyze::AnalyzeCommands,

        /// Print the raw response as JSON
        #[arg(long)]
        json: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config, an example bank, and an example answer set
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("skillzen=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Grade {
            bank,
            answers,
            mode,
            duration,
            judge,
            language,
            parallelism,
            output,
            format,
            config,
        } => {
            commands::grade::execute(
                bank,
                answers,
                mode,
                duration,
                judge,
                language,
                parallelism,
                output,
                format,
                config,
            )
            .await
        }
        Commands::Compare {
            baseline,
            current,
            threshold,
            fail_on_decline,
            format,
        } => commands::compare::execute(baseline, current, threshold, fail_on_decline, format),
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::List {
            banks,
            category,
            company,
            year,
            search,
            config,
        } => commands::list::execute(banks, category, company, year, search, config),
        Commands::Analyze {
            command,
            json,
            config,
        } => commands::analyze::execute(command, json, config).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
