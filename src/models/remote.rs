//! HTTP inference endpoint client.
//!
//! Request:  `POST <url>` with `{"instances": [<row>, ...]}`
//! Response: `{"predictions": [<f64>, ...]}`

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::models::model::{ModelRow, PremiumModel, PredictionError};

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    instances: &'a [ModelRow],
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    predictions: Vec<f64>,
}

pub struct RemoteModel {
    client: Client,
    url: String,
}

impl RemoteModel {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, PredictionError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PredictionError::Remote(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl PremiumModel for RemoteModel {
    fn predict(&self, rows: &[ModelRow]) -> Result<Vec<f64>, PredictionError> {
        tracing::debug!(url = %self.url, n = rows.len(), "posting inference request");
        let resp = self
            .client
            .post(&self.url)
            .json(&PredictRequest { instances: rows })
            .send()
            .map_err(|e| PredictionError::Remote(e.to_string()))?
            .error_for_status()
            .map_err(|e| PredictionError::Remote(e.to_string()))?;

        let body: PredictResponse = resp
            .json()
            .map_err(|e| PredictionError::Remote(format!("invalid response body: {e}")))?;

        if body.predictions.len() != rows.len() {
            return Err(PredictionError::Shape {
                expected: rows.len(),
                got: body.predictions.len(),
            });
        }
        Ok(body.predictions)
    }

    fn describe(&self) -> String {
        format!("remote model at {}", self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ApplicantRecord, Region, Sex, Smoker};

    #[test]
    fn request_body_wraps_rows_as_instances() {
        let rec = ApplicantRecord::new(52, Sex::Female, 31.5, 3, Smoker::Yes, Region::Northwest).unwrap();
        let rows = [ModelRow::from(&rec)];
        let json = serde_json::to_value(PredictRequest { instances: &rows }).unwrap();
        assert_eq!(json["instances"][0]["region"], "northwest");
        assert_eq!(json["instances"][0]["children"], 3);
        assert_eq!(json["instances"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn response_body_parses() {
        let body: PredictResponse = serde_json::from_str(r#"{"predictions": [1234.5]}"#).unwrap();
        assert_eq!(body.predictions, vec![1234.5]);
    }

    #[test]
    fn unreachable_endpoint_is_a_prediction_error() {
        let model = RemoteModel::new("http://127.0.0.1:9/predict", Duration::from_millis(200)).unwrap();
        let rec = ApplicantRecord::new(30, Sex::Male, 25.0, 0, Smoker::No, Region::Southeast).unwrap();
        let err = model.predict(&[ModelRow::from(&rec)]).unwrap_err();
        assert!(matches!(err, PredictionError::Remote(_)));
    }
}
