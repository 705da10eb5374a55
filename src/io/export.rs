//! File outputs: batch results CSV and PDF reports.
//!
//! Reports never go to a shared fixed path. Each write either targets a path
//! the user chose or a fresh name from `unique_report_path`.

use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Local;

use crate::app::pipeline::ScoredRecord;
use crate::domain::Category;
use crate::error::AppError;
use crate::report::{REPORT_FILE_NAME, REPORT_MIME, ReportError};

static REPORT_SEQ: AtomicU64 = AtomicU64::new(0);

/// A fresh report path inside `dir`.
///
/// `Insurance_Premium_Report_<YYYYmmdd_HHMMSS>_<pid>_<seq>.pdf`; the process id
/// and in-process sequence keep concurrent writers apart.
pub fn unique_report_path(dir: &Path) -> PathBuf {
    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let seq = REPORT_SEQ.fetch_add(1, Ordering::Relaxed);
    dir.join(format!(
        "Insurance_Premium_Report_{ts}_{}_{seq}.pdf",
        std::process::id()
    ))
}

/// Write PDF bytes to `path`, creating parent directories as needed.
pub fn write_report_pdf(path: &Path, bytes: &[u8]) -> Result<(), ReportError> {
    let io_err = |source| ReportError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent).map_err(io_err)?;
    }
    let mut file = File::create(path).map_err(io_err)?;
    file.write_all(bytes).map_err(io_err)?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "wrote report");
    Ok(())
}

/// Status line shown after a report was saved.
pub fn report_saved_message(path: &Path) -> String {
    format!(
        "Report written to {} ({REPORT_MIME}, suggested name: {REPORT_FILE_NAME})",
        path.display()
    )
}

/// Write batch results to a CSV file.
pub fn write_results_csv(path: &Path, results: &[ScoredRecord]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create results CSV '{}': {e}", path.display())))?;
    write_results(file, results)
        .map_err(|e| AppError::new(2, format!("Failed to write results CSV '{}': {e}", path.display())))
}

fn write_results<W: Write>(writer: W, results: &[ScoredRecord]) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["age", "sex", "bmi", "children", "smoker", "region", "premium", "tier"])?;

    for r in results {
        let rec = &r.record;
        wtr.write_record([
            rec.age().to_string(),
            rec.sex().as_str().to_string(),
            format!("{:?}", rec.bmi()),
            rec.children().to_string(),
            rec.smoker().as_str().to_string(),
            rec.region().as_str().to_string(),
            format!("{:.2}", r.estimate.value()),
            r.tier.display_name().to_lowercase(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ApplicantRecord, PremiumEstimate, Region, RiskTier, Sex, Smoker};

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("premium-test-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn unique_paths_do_not_collide() {
        let dir = Path::new("reports");
        let a = unique_report_path(dir);
        let b = unique_report_path(dir);
        assert_ne!(a, b);
        let name = a.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("Insurance_Premium_Report_"));
        assert!(name.ends_with(".pdf"));
    }

    #[test]
    fn writes_report_into_new_directory() {
        let dir = temp_dir("report");
        let path = unique_report_path(&dir.join("nested"));
        write_report_pdf(&path, b"%PDF-1.3 test").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.3 test");
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn unwritable_path_is_a_report_error() {
        let dir = temp_dir("blocked");
        std::fs::create_dir_all(&dir).unwrap();
        let blocker = dir.join("file");
        std::fs::write(&blocker, b"x").unwrap();
        let err = write_report_pdf(&blocker.join("report.pdf"), b"%PDF").unwrap_err();
        assert!(matches!(err, ReportError::Io { .. }));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn saved_message_names_path_and_type() {
        let msg = report_saved_message(Path::new("reports/a.pdf"));
        assert_eq!(
            msg,
            "Report written to reports/a.pdf (application/pdf, suggested name: Insurance_Premium_Report.pdf)"
        );
    }

    #[test]
    fn results_csv_layout() {
        let rec = ApplicantRecord::new(19, Sex::Female, 27.9, 0, Smoker::Yes, Region::Southwest).unwrap();
        let estimate = PremiumEstimate::from_model_output(25000.456).unwrap();
        let rows = vec![ScoredRecord {
            record: rec,
            estimate,
            tier: RiskTier::High,
        }];

        let mut buf = Vec::new();
        write_results(&mut buf, &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "age,sex,bmi,children,smoker,region,premium,tier\n19,female,27.9,0,yes,southwest,25000.46,high\n"
        );
    }
}
