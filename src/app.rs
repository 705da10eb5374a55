//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - constructs the premium model once
//! - dispatches to the predict / batch / TUI front-ends
//! - prints results and writes reports

use std::time::Duration;

use clap::Parser;
use tracing::Level;

use crate::cli::{BatchArgs, Command, ModelArgs, PredictArgs};
use crate::domain::{ApplicantRecord, Category};
use crate::error::AppError;
use crate::models::{LinearModel, PremiumModel, RemoteModel};
use crate::report::{format_currency, format_result_text};

pub mod pipeline;

pub const ABOUT_TITLE: &str = "About This Project";
pub const ABOUT_TEXT: &str = "\
This application is designed to predict annual medical insurance premiums based on an individual's demographic and health-related factors.

Project Objective:
The goal is to analyze how various features (age, BMI, number of children, smoking status, gender and region) influence medical costs. These insights are used to train a multiple linear regression model that predicts future medical expenses.

Real-World Use:
This tool helps insurance providers estimate personalized premiums using data-driven predictions, enabling fairer pricing based on individual risk profiles.";

/// Entry point for the `premium` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    // `premium` and `premium -m model.json` behave like `premium tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let is_tui = matches!(cli.command, Command::Tui(_));
    if !is_tui {
        let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
        crate::telemetry::init_tracing(level);
    }

    match cli.command {
        Command::Predict(args) => handle_predict(args),
        Command::Batch(args) => handle_batch(args),
        Command::Tui(args) => {
            let model = load_model(&args.model)?;
            crate::tui::run(model, args.report_dir)
        }
        Command::About => {
            println!("{ABOUT_TITLE}\n\n{ABOUT_TEXT}");
            Ok(())
        }
    }
}

/// Construct the model named by the CLI/env configuration.
pub fn load_model(args: &ModelArgs) -> Result<Box<dyn PremiumModel>, AppError> {
    let model: Box<dyn PremiumModel> = match &args.model_url {
        Some(url) => Box::new(
            RemoteModel::new(url.clone(), Duration::from_secs(args.timeout_secs))
                .map_err(|e| AppError::new(2, format!("Failed to set up model endpoint: {e}")))?,
        ),
        None => Box::new(
            LinearModel::from_path(&args.model_path)
                .map_err(|e| AppError::new(2, format!("Failed to load model: {e}")))?,
        ),
    };
    tracing::info!(model = %model.describe(), "model ready");
    Ok(model)
}

fn handle_predict(args: PredictArgs) -> Result<(), AppError> {
    let record = ApplicantRecord::new(
        args.age,
        args.sex,
        args.bmi,
        args.children,
        args.smoker,
        args.region,
    )?;
    let model = load_model(&args.model)?;

    let submission = pipeline::run_submission(model.as_ref(), &record)?;
    println!("{}", format_result_text(&submission.view));

    if args.show_report {
        println!("{}\n", submission.report.to_plain_text());
    }

    let target = match (&args.report, &args.report_dir) {
        (Some(path), _) => Some(path.clone()),
        (None, Some(dir)) => Some(crate::io::unique_report_path(dir)),
        (None, None) => None,
    };
    if let Some(path) = target {
        let bytes = submission.report_pdf()?;
        crate::io::write_report_pdf(&path, &bytes)?;
        println!("{}", crate::io::report_saved_message(&path));
    }

    Ok(())
}

fn handle_batch(args: BatchArgs) -> Result<(), AppError> {
    let ingest = crate::io::read_applicants_csv(&args.input)?;
    for e in &ingest.row_errors {
        eprintln!("line {}: {}", e.line, e.message);
    }

    let model = load_model(&args.model)?;
    let scored = pipeline::score_batch(model.as_ref(), &ingest.records)?;

    match &args.output {
        Some(path) => {
            crate::io::write_results_csv(path, &scored)?;
            println!(
                "Scored {} applicant(s), skipped {}; results written to {}",
                scored.len(),
                ingest.row_errors.len(),
                path.display()
            );
        }
        None => print!("{}", format_batch_table(&scored)),
    }
    Ok(())
}

/// Fixed-width batch results table.
pub fn format_batch_table(rows: &[pipeline::ScoredRecord]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>4} {:<7} {:>6} {:>8} {:<6} {:<10} {:>14} {:<5}\n",
        "age", "sex", "bmi", "children", "smoker", "region", "premium", "tier"
    ));
    out.push_str(&format!(
        "{:-<4} {:-<7} {:-<6} {:-<8} {:-<6} {:-<10} {:-<14} {:-<5}\n",
        "", "", "", "", "", "", "", ""
    ));
    for r in rows {
        let rec = &r.record;
        out.push_str(&format!(
            "{:>4} {:<7} {:>6.2} {:>8} {:<6} {:<10} {:>14} {:<5}\n",
            rec.age(),
            rec.sex().as_str(),
            rec.bmi(),
            rec.children(),
            rec.smoker().as_str(),
            rec.region().as_str(),
            format_currency(r.estimate.value()),
            r.tier.display_name(),
        ));
    }
    out
}

/// Rewrite argv so `premium` defaults to `premium tui`.
///
/// Rules:
/// - `premium`                      -> `premium tui`
/// - `premium -m model.json ...`    -> `premium tui -m model.json ...`
/// - `premium -v predict ...`       -> unchanged (global flags before a subcommand)
/// - `premium --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    // Leading global flags are valid both before and after the subcommand.
    let first = argv
        .iter()
        .skip(1)
        .position(|a| !matches!(a.as_str(), "-v" | "--verbose"))
        .map(|i| i + 1);

    let Some(first) = first else {
        argv.push("tui".to_string());
        return argv;
    };
    let arg = argv[first].as_str();

    let is_top_level_help_or_version =
        matches!(arg, "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg, "predict" | "batch" | "tui" | "about");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}
