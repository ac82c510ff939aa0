//! gradepath CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(
    name = "gradepath",
    version,
    about = "GPA progression and degree eligibility checker"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a grade sheet
    Evaluate {
        /// Path to the .toml grade sheet
        #[arg(long)]
        grades: PathBuf,

        /// Only evaluate one year (year1, year2, year3)
        #[arg(long)]
        year: Option<String>,

        /// Output format: text, json, markdown, html
        #[arg(long, default_value = "text")]
        format: String,

        /// Write the output to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Exit code 1 if the student cannot proceed or is not eligible
        #[arg(long)]
        fail_if_blocked: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Set or clear one subject's grade in a grade sheet
    Set {
        /// Path to the .toml grade sheet (created if missing)
        #[arg(long)]
        grades: PathBuf,

        /// Subject code (e.g. IT1106)
        #[arg(long)]
        subject: String,

        /// Grade to store; an empty string clears the subject
        #[arg(long)]
        grade: String,
    },

    /// Validate grade sheet files
    Validate {
        /// Path to a grade sheet or a directory of sheets
        #[arg(long)]
        grades: PathBuf,
    },

    /// List the subjects of the curriculum
    Catalog {
        /// Only list one year (year1, year2, year3)
        #[arg(long)]
        year: Option<String>,
    },

    /// Clear every grade of one year in a grade sheet
    Reset {
        /// Path to the .toml grade sheet
        #[arg(long)]
        grades: PathBuf,

        /// Year to clear (year1, year2, year3)
        #[arg(long)]
        year: String,
    },

    /// Compare two saved JSON progress reports
    Compare {
        /// Baseline report JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current report JSON
        #[arg(long)]
        current: PathBuf,

        /// Exit code 1 if progression or eligibility was lost
        #[arg(long)]
        fail_on_regression: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Create starter config and example grade sheet
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gradepath=info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Evaluate {
            grades,
            year,
            format,
            output,
            fail_if_blocked,
            config,
        } => commands::evaluate::execute(grades, year, format, output, fail_if_blocked, config),
        Commands::Set {
            grades,
            subject,
            grade,
        } => commands::set::execute(grades, subject, grade),
        Commands::Validate { grades } => commands::validate::execute(grades),
        Commands::Catalog { year } => commands::catalog::execute(year),
        Commands::Reset { grades, year } => commands::reset::execute(grades, year),
        Commands::Compare {
            baseline,
            current,
            fail_on_regression,
            format,
        } => commands::compare::execute(baseline, current, fail_on_regression, format),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
