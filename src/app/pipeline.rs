//! Shared submission pipeline used by the CLI, batch and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! record -> model -> estimate -> tier -> result view -> report layout
//!
//! The front-ends then only decide how to present the output and where (if
//! anywhere) to write the PDF.

use rayon::prelude::*;
use thiserror::Error;

use crate::domain::{ApplicantRecord, PremiumEstimate, RiskTier};
use crate::models::{ModelRow, PredictionError, PremiumModel, predict_one};
use crate::report::{ReportDocument, ReportError, ResultView, build_report};

/// The two failure categories a submission can surface to the user.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Prediction(PredictionError),
    #[error(transparent)]
    Report(ReportError),
}

impl PipelineError {
    /// The single message shown to the user for a failed submission.
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::Prediction(e) => format!("Error during prediction: {e}"),
            PipelineError::Report(e) => format!("Error while writing report: {e}"),
        }
    }
}

/// Output of one successful submission.
#[derive(Debug, Clone)]
pub struct Submission {
    pub record: ApplicantRecord,
    pub estimate: PremiumEstimate,
    pub tier: RiskTier,
    pub view: ResultView,
    pub report: ReportDocument,
}

impl Submission {
    /// Render the report to PDF bytes.
    pub fn report_pdf(&self) -> Result<Vec<u8>, PipelineError> {
        self.report.to_pdf_bytes().map_err(PipelineError::Report)
    }
}

/// Run one record through the model and build its result and report.
///
/// A model failure returns early: no result view, no report.
pub fn run_submission(
    model: &dyn PremiumModel,
    record: &ApplicantRecord,
) -> Result<Submission, PipelineError> {
    let raw = predict_one(model, &ModelRow::from(record)).map_err(|e| {
        tracing::warn!(error = %e, "prediction failed");
        PipelineError::Prediction(e)
    })?;

    let estimate = PremiumEstimate::from_model_output(raw)
        .ok_or(PipelineError::Prediction(PredictionError::NonFinite(raw)))?;
    let view = ResultView::new(estimate);
    tracing::info!(
        premium = estimate.value(),
        tier = view.tier.display_name(),
        "prediction complete"
    );

    Ok(Submission {
        record: record.clone(),
        estimate,
        tier: view.tier,
        view,
        report: build_report(record, estimate),
    })
}

/// One scored row of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRecord {
    pub record: ApplicantRecord,
    pub estimate: PremiumEstimate,
    pub tier: RiskTier,
}

/// Score many records with a single model call.
///
/// The whole batch fails if the model fails; a batch never mixes scored and
/// unscored rows.
pub fn score_batch(
    model: &dyn PremiumModel,
    records: &[ApplicantRecord],
) -> Result<Vec<ScoredRecord>, PipelineError> {
    if records.is_empty() {
        return Ok(Vec::new());
    }

    let rows: Vec<ModelRow> = records.iter().map(ModelRow::from).collect();
    let raw = model.predict(&rows).map_err(PipelineError::Prediction)?;
    if raw.len() != records.len() {
        return Err(PipelineError::Prediction(PredictionError::Shape {
            expected: records.len(),
            got: raw.len(),
        }));
    }

    let scored = records
        .par_iter()
        .zip(raw.par_iter())
        .map(|(record, &value)| {
            let estimate = PremiumEstimate::from_model_output(value)
                .ok_or(PredictionError::NonFinite(value))?;
            Ok(ScoredRecord {
                record: record.clone(),
                estimate,
                tier: RiskTier::for_estimate(estimate),
            })
        })
        .collect::<Result<Vec<_>, PredictionError>>()
        .map_err(PipelineError::Prediction)?;

    tracing::info!(n = scored.len(), "batch scored");
    Ok(scored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Region, Sex, Smoker};

    struct Stub(Result<f64, PredictionError>);

    impl PremiumModel for Stub {
        fn predict(&self, rows: &[ModelRow]) -> Result<Vec<f64>, PredictionError> {
            self.0.clone().map(|v| vec![v; rows.len()])
        }

        fn describe(&self) -> String {
            "stub".to_string()
        }
    }

    /// Returns one estimate too few.
    struct ShortBatch;

    impl PremiumModel for ShortBatch {
        fn predict(&self, rows: &[ModelRow]) -> Result<Vec<f64>, PredictionError> {
            Ok(vec![5000.0; rows.len().saturating_sub(1)])
        }

        fn describe(&self) -> String {
            "short".to_string()
        }
    }

    fn record() -> ApplicantRecord {
        ApplicantRecord::new(30, Sex::Male, 25.0, 0, Smoker::No, Region::Southeast).unwrap()
    }

    #[test]
    fn stubbed_submission_end_to_end() {
        let sub = run_submission(&Stub(Ok(5000.0)), &record()).unwrap();
        assert_eq!(sub.tier, RiskTier::Low);
        assert_eq!(sub.view.amount(), "$ 5,000.00");

        let lines = sub.report.text_lines();
        assert!(lines.contains(&"- Age: 30"));
        assert!(lines.contains(&"- Smoker: No"));

        let pdf = sub.report_pdf().unwrap();
        assert!(pdf.starts_with(b"%PDF-"));
    }

    #[test]
    fn failing_model_yields_one_message_and_no_report() {
        let model = Stub(Err(PredictionError::UnknownCategory {
            column: "region",
            value: "southeast".to_string(),
        }));
        let err = run_submission(&model, &record()).unwrap_err();
        assert!(matches!(err, PipelineError::Prediction(_)));
        assert_eq!(
            err.user_message(),
            "Error during prediction: Found unknown category 'southeast' in column 'region'"
        );
    }

    #[test]
    fn non_finite_output_is_a_prediction_failure() {
        let err = run_submission(&Stub(Ok(f64::NAN)), &record()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Prediction(PredictionError::NonFinite(_))
        ));
    }

    #[test]
    fn batch_scores_every_record() {
        let records = vec![record(), record(), record()];
        let scored = score_batch(&Stub(Ok(16000.0)), &records).unwrap();
        assert_eq!(scored.len(), 3);
        assert!(scored.iter().all(|s| s.tier == RiskTier::High));
        assert!(score_batch(&Stub(Ok(1.0)), &[]).unwrap().is_empty());
    }

    #[test]
    fn batch_with_bundled_model() {
        let model =
            crate::models::LinearModel::from_json(include_str!("../../assets/premium_model.json"))
                .unwrap();
        let smoker =
            ApplicantRecord::new(60, Sex::Female, 35.0, 2, Smoker::Yes, Region::Northeast).unwrap();
        let scored = score_batch(&model, &[record(), smoker]).unwrap();
        assert_eq!(scored[0].tier, RiskTier::Low);
        assert_eq!(scored[1].tier, RiskTier::High);
    }

    #[test]
    fn batch_rejects_wrong_prediction_count() {
        let err = score_batch(&ShortBatch, &[record(), record(), record()]).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Prediction(PredictionError::Shape { expected: 3, got: 2 })
        ));
        assert!(err.user_message().starts_with("Error during prediction: "));
    }

    #[test]
    fn report_failure_message() {
        let err = PipelineError::Report(ReportError::Render("no fonts".to_string()));
        assert_eq!(
            err.user_message(),
            "Error while writing report: failed to render PDF: no fonts"
        );
    }
}
