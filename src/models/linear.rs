//! Linear regression model loaded from a JSON coefficient artifact.
//!
//! The artifact is the export of a one-hot encoded linear regression:
//!
//! ```text
//! premium = intercept
//!         + Σ numeric[c] * row[c]                  (age, bmi, children)
//!         + Σ categorical[c][row[c]]               (sex, smoker, region)
//! ```
//!
//! Reference levels dropped by the encoder appear with a coefficient of `0.0`.
//! A level that is absent from the artifact is an unseen category and fails
//! the prediction, the same way the trained encoder would.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use nalgebra::{DMatrix, DVector};
use serde::Deserialize;

use crate::domain::Category;
use crate::models::model::{ModelRow, PremiumModel, PredictionError};

const NUMERIC_COLUMNS: [&str; 3] = ["age", "bmi", "children"];

/// Categorical feature columns, in coefficient order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CategoricalColumn {
    Sex,
    Smoker,
    Region,
}

impl CategoricalColumn {
    const ALL: [CategoricalColumn; 3] = [Self::Sex, Self::Smoker, Self::Region];

    fn name(self) -> &'static str {
        match self {
            Self::Sex => "sex",
            Self::Smoker => "smoker",
            Self::Region => "region",
        }
    }

    fn value(self, row: &ModelRow) -> &'static str {
        match self {
            Self::Sex => row.sex.as_str(),
            Self::Smoker => row.smoker.as_str(),
            Self::Region => row.region.as_str(),
        }
    }
}

/// On-disk artifact schema.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearArtifact {
    #[serde(default)]
    pub name: Option<String>,
    pub intercept: f64,
    pub numeric: BTreeMap<String, f64>,
    pub categorical: BTreeMap<String, BTreeMap<String, f64>>,
}

/// One-hot block for a categorical column inside the coefficient vector.
#[derive(Debug, Clone)]
struct OneHotBlock {
    column: CategoricalColumn,
    offset: usize,
    levels: Vec<String>,
}

/// An immutable, ready-to-evaluate linear model.
#[derive(Debug, Clone)]
pub struct LinearModel {
    name: String,
    intercept: f64,
    /// `[age, bmi, children, <one-hot blocks...>]`
    coefficients: DVector<f64>,
    blocks: Vec<OneHotBlock>,
}

impl LinearModel {
    /// Load an artifact from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self, PredictionError> {
        let file = File::open(path).map_err(|e| {
            PredictionError::Artifact(format!("failed to open '{}': {e}", path.display()))
        })?;
        let artifact: LinearArtifact = serde_json::from_reader(file)
            .map_err(|e| PredictionError::Artifact(format!("'{}': {e}", path.display())))?;
        Self::from_artifact(artifact)
    }

    /// Parse an artifact from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, PredictionError> {
        let artifact: LinearArtifact =
            serde_json::from_str(json).map_err(|e| PredictionError::Artifact(e.to_string()))?;
        Self::from_artifact(artifact)
    }

    pub fn from_artifact(artifact: LinearArtifact) -> Result<Self, PredictionError> {
        if !artifact.intercept.is_finite() {
            return Err(PredictionError::Artifact("intercept is not finite".to_string()));
        }

        let mut coefs = Vec::new();
        for column in NUMERIC_COLUMNS {
            let c = artifact.numeric.get(column).copied().ok_or_else(|| {
                PredictionError::Artifact(format!("missing numeric column '{column}'"))
            })?;
            coefs.push(c);
        }

        let mut blocks = Vec::with_capacity(CategoricalColumn::ALL.len());
        for column in CategoricalColumn::ALL {
            let name = column.name();
            let table = artifact.categorical.get(name).ok_or_else(|| {
                PredictionError::Artifact(format!("missing categorical column '{name}'"))
            })?;
            if table.is_empty() {
                return Err(PredictionError::Artifact(format!(
                    "categorical column '{name}' has no levels"
                )));
            }
            let offset = coefs.len();
            let mut levels = Vec::with_capacity(table.len());
            for (level, c) in table {
                levels.push(level.to_ascii_lowercase());
                coefs.push(*c);
            }
            blocks.push(OneHotBlock { column, offset, levels });
        }

        if let Some(bad) = coefs.iter().find(|c| !c.is_finite()) {
            return Err(PredictionError::Artifact(format!("non-finite coefficient {bad}")));
        }

        let name = artifact
            .name
            .unwrap_or_else(|| "linear regression".to_string());
        tracing::debug!(%name, n_coefs = coefs.len(), "loaded linear model");

        Ok(Self {
            name,
            intercept: artifact.intercept,
            coefficients: DVector::from_vec(coefs),
            blocks,
        })
    }

    /// Build the design matrix (one row per input, no intercept column).
    fn design_matrix(&self, rows: &[ModelRow]) -> Result<DMatrix<f64>, PredictionError> {
        let mut x = DMatrix::<f64>::zeros(rows.len(), self.coefficients.len());
        for (i, row) in rows.iter().enumerate() {
            x[(i, 0)] = row.age as f64;
            x[(i, 1)] = row.bmi;
            x[(i, 2)] = row.children as f64;

            for block in &self.blocks {
                let value = block.column.value(row);
                let j = block
                    .levels
                    .iter()
                    .position(|l| l == value)
                    .ok_or_else(|| PredictionError::UnknownCategory {
                        column: block.column.name(),
                        value: value.to_string(),
                    })?;
                x[(i, block.offset + j)] = 1.0;
            }
        }
        Ok(x)
    }
}

impl PremiumModel for LinearModel {
    fn predict(&self, rows: &[ModelRow]) -> Result<Vec<f64>, PredictionError> {
        let x = self.design_matrix(rows)?;
        let y = &x * &self.coefficients;
        Ok(y.iter().map(|v| v + self.intercept).collect())
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ApplicantRecord, Region, Sex, Smoker};

    const BUNDLED: &str = include_str!("../../assets/premium_model.json");

    fn row(age: i64, sex: Sex, bmi: f64, children: i64, smoker: Smoker, region: Region) -> ModelRow {
        ModelRow::from(&ApplicantRecord::new(age, sex, bmi, children, smoker, region).unwrap())
    }

    #[test]
    fn bundled_artifact_loads() {
        let model = LinearModel::from_json(BUNDLED).unwrap();
        assert_eq!(model.coefficients.len(), 3 + 2 + 2 + 4);
    }

    #[test]
    fn evaluates_intercept_plus_terms() {
        let json = r#"{
            "intercept": 100.0,
            "numeric": {"age": 10.0, "bmi": 2.0, "children": 5.0},
            "categorical": {
                "sex": {"female": 0.0, "male": -1.0},
                "smoker": {"no": 0.0, "yes": 1000.0},
                "region": {"northeast": 0.0, "northwest": 1.0, "southeast": 2.0, "southwest": 3.0}
            }
        }"#;
        let model = LinearModel::from_json(json).unwrap();
        let rows = [
            row(30, Sex::Male, 25.0, 1, Smoker::Yes, Region::Southwest),
            row(0, Sex::Female, 10.0, 0, Smoker::No, Region::Northeast),
        ];
        let y = model.predict(&rows).unwrap();
        // 100 + 300 + 50 + 5 - 1 + 1000 + 3
        assert!((y[0] - 1457.0).abs() < 1e-9);
        // 100 + 0 + 20
        assert!((y[1] - 120.0).abs() < 1e-9);
    }

    #[test]
    fn smoker_raises_bundled_estimate() {
        let model = LinearModel::from_json(BUNDLED).unwrap();
        let y = model
            .predict(&[
                row(45, Sex::Female, 30.0, 2, Smoker::No, Region::Northwest),
                row(45, Sex::Female, 30.0, 2, Smoker::Yes, Region::Northwest),
            ])
            .unwrap();
        assert!(y[1] - y[0] > 20000.0);
    }

    #[test]
    fn unseen_level_fails_prediction() {
        let json = r#"{
            "intercept": 0.0,
            "numeric": {"age": 1.0, "bmi": 1.0, "children": 1.0},
            "categorical": {
                "sex": {"female": 0.0, "male": 0.0},
                "smoker": {"no": 0.0, "yes": 0.0},
                "region": {"northeast": 0.0, "northwest": 0.0}
            }
        }"#;
        let model = LinearModel::from_json(json).unwrap();
        let err = model
            .predict(&[row(30, Sex::Male, 25.0, 0, Smoker::No, Region::Southeast)])
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Found unknown category 'southeast' in column 'region'"
        );
    }

    #[test]
    fn categorical_columns_read_their_own_feature() {
        let json = r#"{
            "intercept": 0.0,
            "numeric": {"age": 0.0, "bmi": 0.0, "children": 0.0},
            "categorical": {
                "sex": {"female": 0.0, "male": 1.0},
                "smoker": {"no": 0.0, "yes": 10.0},
                "region": {"northeast": 0.0, "northwest": 0.0, "southeast": 0.0, "southwest": 100.0}
            }
        }"#;
        let model = LinearModel::from_json(json).unwrap();
        let y = model
            .predict(&[
                row(30, Sex::Male, 25.0, 0, Smoker::No, Region::Northeast),
                row(30, Sex::Female, 25.0, 0, Smoker::Yes, Region::Northeast),
                row(30, Sex::Female, 25.0, 0, Smoker::No, Region::Southwest),
                row(30, Sex::Male, 25.0, 0, Smoker::Yes, Region::Southwest),
            ])
            .unwrap();
        assert_eq!(y, vec![1.0, 10.0, 100.0, 111.0]);

        let names: Vec<_> = CategoricalColumn::ALL.iter().map(|c| c.name()).collect();
        assert_eq!(names, ["sex", "smoker", "region"]);
    }

    #[test]
    fn missing_column_fails_load() {
        let json = r#"{
            "intercept": 0.0,
            "numeric": {"age": 1.0, "bmi": 1.0},
            "categorical": {}
        }"#;
        let err = LinearModel::from_json(json).unwrap_err();
        assert!(err.to_string().contains("children"));
    }
}
