//! The model seam.
//!
//! Everything downstream of input validation talks to a `PremiumModel`. The
//! pipeline never knows whether the numbers come from a local coefficient
//! artifact or a remote inference endpoint.

use serde::Serialize;
use thiserror::Error;

use crate::domain::{ApplicantRecord, Region, Sex, Smoker};

/// Any failure raised while invoking a model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error("invalid model artifact: {0}")]
    Artifact(String),
    #[error("Found unknown category '{value}' in column '{column}'")]
    UnknownCategory { column: &'static str, value: String },
    #[error("model returned {got} predictions for {expected} rows")]
    Shape { expected: usize, got: usize },
    #[error("model returned a non-finite premium ({0})")]
    NonFinite(f64),
    #[error("inference endpoint failed: {0}")]
    Remote(String),
}

/// One row of the model's input table.
///
/// Field order is the column order the model was trained on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelRow {
    pub age: i64,
    pub sex: Sex,
    pub bmi: f64,
    pub children: i64,
    pub smoker: Smoker,
    pub region: Region,
}

impl From<&ApplicantRecord> for ModelRow {
    fn from(r: &ApplicantRecord) -> Self {
        Self {
            age: r.age(),
            sex: r.sex(),
            bmi: r.bmi(),
            children: r.children(),
            smoker: r.smoker(),
            region: r.region(),
        }
    }
}

/// A trained premium model.
///
/// Implementations return one estimate per input row, in order. `Sync` is
/// required so batch scoring can share one instance across worker threads.
pub trait PremiumModel: Send + Sync {
    fn predict(&self, rows: &[ModelRow]) -> Result<Vec<f64>, PredictionError>;

    /// Short human-readable description (shown in headers and logs).
    fn describe(&self) -> String;
}

/// Predict a single row and take the first estimate.
pub fn predict_one(model: &dyn PremiumModel, row: &ModelRow) -> Result<f64, PredictionError> {
    let out = model.predict(std::slice::from_ref(row))?;
    out.first()
        .copied()
        .ok_or(PredictionError::Shape { expected: 1, got: 0 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Region, Sex, Smoker};

    struct Fixed(Vec<f64>);

    impl PremiumModel for Fixed {
        fn predict(&self, _rows: &[ModelRow]) -> Result<Vec<f64>, PredictionError> {
            Ok(self.0.clone())
        }

        fn describe(&self) -> String {
            "fixed".to_string()
        }
    }

    fn row() -> ModelRow {
        let rec = ApplicantRecord::new(30, Sex::Male, 25.0, 0, Smoker::No, Region::Southeast).unwrap();
        ModelRow::from(&rec)
    }

    #[test]
    fn predict_one_takes_first_element() {
        let model = Fixed(vec![5000.0, 7.0]);
        assert_eq!(predict_one(&model, &row()).unwrap(), 5000.0);
    }

    #[test]
    fn predict_one_rejects_empty_output() {
        let model = Fixed(vec![]);
        assert_eq!(
            predict_one(&model, &row()).unwrap_err(),
            PredictionError::Shape { expected: 1, got: 0 }
        );
    }

    #[test]
    fn row_serializes_in_training_schema() {
        let json = serde_json::to_string(&row()).unwrap();
        assert_eq!(
            json,
            r#"{"age":30,"sex":"male","bmi":25.0,"children":0,"smoker":"no","region":"southeast"}"#
        );
    }
}
