//! CSV ingest of applicant records for batch scoring.
//!
//! Design goals:
//! - **Strict schema** for the six required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - every row goes through the same `ApplicantForm::submit` as interactive input

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{ApplicantForm, ApplicantRecord};
use crate::error::AppError;

const REQUIRED_COLUMNS: [&str; 6] = ["age", "sex", "bmi", "children", "smoker", "region"];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    /// 1-based line number in the file (header is line 1).
    pub line: usize,
    pub message: String,
}

/// Result of reading an applicants CSV.
#[derive(Debug, Clone)]
pub struct IngestedApplicants {
    pub records: Vec<ApplicantRecord>,
    pub row_errors: Vec<RowError>,
}

/// Read and validate an applicants CSV file.
pub fn read_applicants_csv(path: &Path) -> Result<IngestedApplicants, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open input CSV '{}': {e}", path.display())))?;
    read_applicants(file)
}

/// Read and validate applicants from any CSV reader.
pub fn read_applicants<R: std::io::Read>(reader: R) -> Result<IngestedApplicants, AppError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV header: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !header_map.contains_key(*c))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::new(
            2,
            format!("Input CSV is missing required column(s): {}", missing.join(", ")),
        ));
    }

    let mut records = Vec::new();
    let mut row_errors = Vec::new();

    for (idx, result) in rdr.records().enumerate() {
        let line = idx + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("unreadable row: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &header_map).submit() {
            Ok(r) => records.push(r),
            Err(e) => row_errors.push(RowError {
                line,
                message: e.to_string(),
            }),
        }
    }

    if !row_errors.is_empty() {
        tracing::warn!(skipped = row_errors.len(), "skipped invalid applicant rows");
    }

    Ok(IngestedApplicants { records, row_errors })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_ascii_lowercase(), i))
        .collect()
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> ApplicantForm {
    let get = |name: &str| -> String {
        header_map
            .get(name)
            .and_then(|&i| record.get(i))
            .unwrap_or("")
            .to_string()
    };
    ApplicantForm {
        age: get("age"),
        sex: get("sex"),
        bmi: get("bmi"),
        children: get("children"),
        smoker: get("smoker"),
        region: get("region"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Region, Smoker};

    #[test]
    fn reads_valid_rows_and_reports_bad_ones() {
        let csv = "\
Age, Sex, BMI, Children, Smoker, Region
19,female,27.9,0,yes,southwest
18,male,33.77,1,no,southeast
150,male,30.0,0,no,southeast
28,male,33.0,3,no,midwest
";
        let out = read_applicants(csv.as_bytes()).unwrap();
        assert_eq!(out.records.len(), 2);
        assert_eq!(out.records[0].smoker(), Smoker::Yes);
        assert_eq!(out.records[1].region(), Region::Southeast);

        assert_eq!(out.row_errors.len(), 2);
        assert_eq!(out.row_errors[0].line, 4);
        assert!(out.row_errors[0].message.contains("age"));
        assert_eq!(out.row_errors[1].line, 5);
        assert!(out.row_errors[1].message.contains("midwest"));
    }

    #[test]
    fn missing_column_is_a_schema_error() {
        let csv = "age,sex,bmi,children,smoker\n30,male,25,0,no\n";
        let err = read_applicants(csv.as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("region"));
    }

    #[test]
    fn columns_may_be_reordered() {
        let csv = "region,smoker,children,bmi,sex,age\nnortheast,no,2,22.5,female,40\n";
        let out = read_applicants(csv.as_bytes()).unwrap();
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].age(), 40);
        assert_eq!(out.records[0].children(), 2);
    }
}
