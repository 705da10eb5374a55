//! Command-line parsing for the premium predictor.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the model and report code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{Region, Sex, Smoker};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "premium", version, about = "Medical Insurance Premium Predictor")]
pub struct Cli {
    /// Log debug output to stderr (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Predict the premium for one applicant and optionally write the PDF report.
    Predict(PredictArgs),
    /// Score every applicant in a CSV file.
    Batch(BatchArgs),
    /// Launch the interactive form.
    Tui(TuiArgs),
    /// Describe the project.
    About,
}

/// Where the premium model comes from.
#[derive(Debug, Args, Clone)]
pub struct ModelArgs {
    /// JSON coefficient artifact of the trained model.
    #[arg(
        short = 'm',
        long = "model",
        env = "PREMIUM_MODEL_PATH",
        default_value = "assets/premium_model.json"
    )]
    pub model_path: PathBuf,

    /// Inference endpoint URL; when set, it is used instead of the artifact.
    #[arg(long = "model-url", env = "PREMIUM_MODEL_URL")]
    pub model_url: Option<String>,

    /// Request timeout for the inference endpoint.
    #[arg(long, env = "PREMIUM_MODEL_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,
}

/// One applicant, as flags.
#[derive(Debug, Args, Clone)]
pub struct PredictArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Age in years (0-120).
    #[arg(long, allow_negative_numbers = true)]
    pub age: i64,

    #[arg(long, value_enum)]
    pub sex: Sex,

    /// Body mass index (10.0-50.0).
    #[arg(long)]
    pub bmi: f64,

    /// Number of children (0-10).
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub children: i64,

    #[arg(long, value_enum)]
    pub smoker: Smoker,

    #[arg(long, value_enum)]
    pub region: Region,

    /// Write the PDF report to this exact path.
    #[arg(long, value_name = "PDF", conflicts_with = "report_dir")]
    pub report: Option<PathBuf>,

    /// Write the PDF report under this directory with a unique file name.
    #[arg(long, value_name = "DIR")]
    pub report_dir: Option<PathBuf>,

    /// Also print the report text to stdout.
    #[arg(long)]
    pub show_report: bool,
}

/// Batch scoring options.
#[derive(Debug, Args, Clone)]
pub struct BatchArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Applicants CSV with columns age, sex, bmi, children, smoker, region.
    #[arg(short, long, value_name = "CSV")]
    pub input: PathBuf,

    /// Results CSV (defaults to printing a table).
    #[arg(short, long, value_name = "CSV")]
    pub output: Option<PathBuf>,
}

/// Interactive form options.
#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Directory that saved reports are written to.
    #[arg(long, value_name = "DIR", env = "PREMIUM_REPORT_DIR", default_value = "reports")]
    pub report_dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_predict_flags() {
        let cli = Cli::try_parse_from([
            "premium", "predict", "--age", "30", "--sex", "male", "--bmi", "25.0", "--smoker", "no",
            "--region", "southeast",
        ])
        .unwrap();
        let Command::Predict(args) = cli.command else {
            panic!("expected predict");
        };
        assert_eq!(args.age, 30);
        assert_eq!(args.children, 0);
        assert_eq!(args.sex, Sex::Male);
        assert_eq!(args.region, Region::Southeast);
        assert!(args.report.is_none());
    }

    #[test]
    fn rejects_unknown_region() {
        let res = Cli::try_parse_from([
            "premium", "predict", "--age", "30", "--sex", "male", "--bmi", "25", "--smoker", "no",
            "--region", "midwest",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn report_and_report_dir_conflict() {
        let res = Cli::try_parse_from([
            "premium", "predict", "--age", "30", "--sex", "male", "--bmi", "25", "--smoker", "no",
            "--region", "southeast", "--report", "a.pdf", "--report-dir", "out",
        ]);
        assert!(res.is_err());
    }
}
