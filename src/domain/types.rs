//! Applicant inputs and the premium estimate.
//!
//! `ApplicantRecord` is the only thing a model ever sees. Its fields are
//! private so a record can only exist once every field has passed range
//! validation; `ApplicantForm` is the raw, text-valued state a user edits
//! before submitting.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const AGE_MIN: i64 = 0;
pub const AGE_MAX: i64 = 120;
pub const BMI_MIN: f64 = 10.0;
pub const BMI_MAX: f64 = 50.0;
pub const CHILDREN_MIN: i64 = 0;
pub const CHILDREN_MAX: i64 = 10;

/// Why a submission was rejected before reaching the model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        value: String,
        min: String,
        max: String,
    },
    #[error("{field} must be a number (got '{value}')")]
    NotANumber { field: &'static str, value: String },
    #[error("{field} must be one of {allowed} (got '{value}')")]
    UnknownValue {
        field: &'static str,
        value: String,
        allowed: &'static str,
    },
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::OutOfRange { field, .. }
            | ValidationError::NotANumber { field, .. }
            | ValidationError::UnknownValue { field, .. } => field,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Smoker {
    Yes,
    No,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Southeast,
    Southwest,
    Northeast,
    Northwest,
}

/// Shared behavior of the three categorical inputs.
///
/// `as_str` is the spelling the model was trained on; `display_name` is the
/// capitalized form used in reports.
pub trait Category: Copy + Eq + 'static {
    const FIELD: &'static str;
    const ALL: &'static [Self];
    const ALLOWED: &'static str;

    fn as_str(self) -> &'static str;

    fn display_name(self) -> &'static str;

    fn parse(raw: &str) -> Result<Self, ValidationError> {
        let needle = raw.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ValidationError::UnknownValue {
                field: Self::FIELD,
                value: raw.to_string(),
                allowed: Self::ALLOWED,
            })
    }

    /// Cycle forward through `ALL` (wraps).
    fn next(self) -> Self {
        let i = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    /// Cycle backward through `ALL` (wraps).
    fn prev(self) -> Self {
        let i = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl Category for Sex {
    const FIELD: &'static str = "sex";
    const ALL: &'static [Self] = &[Sex::Male, Sex::Female];
    const ALLOWED: &'static str = "male, female";

    fn as_str(self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }

    fn display_name(self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
        }
    }
}

impl Category for Smoker {
    const FIELD: &'static str = "smoker";
    const ALL: &'static [Self] = &[Smoker::Yes, Smoker::No];
    const ALLOWED: &'static str = "yes, no";

    fn as_str(self) -> &'static str {
        match self {
            Smoker::Yes => "yes",
            Smoker::No => "no",
        }
    }

    fn display_name(self) -> &'static str {
        match self {
            Smoker::Yes => "Yes",
            Smoker::No => "No",
        }
    }
}

impl Category for Region {
    const FIELD: &'static str = "region";
    const ALL: &'static [Self] = &[
        Region::Southeast,
        Region::Southwest,
        Region::Northeast,
        Region::Northwest,
    ];
    const ALLOWED: &'static str = "southeast, southwest, northeast, northwest";

    fn as_str(self) -> &'static str {
        match self {
            Region::Southeast => "southeast",
            Region::Southwest => "southwest",
            Region::Northeast => "northeast",
            Region::Northwest => "northwest",
        }
    }

    fn display_name(self) -> &'static str {
        match self {
            Region::Southeast => "Southeast",
            Region::Southwest => "Southwest",
            Region::Northeast => "Northeast",
            Region::Northwest => "Northwest",
        }
    }
}

macro_rules! category_str_impls {
    ($($ty:ty),*) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty as Category>::parse(s)
            }
        }
    )*};
}

category_str_impls!(Sex, Smoker, Region);

/// One validated applicant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicantRecord {
    age: i64,
    sex: Sex,
    bmi: f64,
    children: i64,
    smoker: Smoker,
    region: Region,
}

impl ApplicantRecord {
    pub fn new(
        age: i64,
        sex: Sex,
        bmi: f64,
        children: i64,
        smoker: Smoker,
        region: Region,
    ) -> Result<Self, ValidationError> {
        if !(AGE_MIN..=AGE_MAX).contains(&age) {
            return Err(out_of_range("age", age, AGE_MIN, AGE_MAX));
        }
        // NaN fails the range check as well.
        if !(BMI_MIN..=BMI_MAX).contains(&bmi) {
            return Err(ValidationError::OutOfRange {
                field: "bmi",
                value: format!("{bmi}"),
                min: format!("{BMI_MIN:.1}"),
                max: format!("{BMI_MAX:.1}"),
            });
        }
        if !(CHILDREN_MIN..=CHILDREN_MAX).contains(&children) {
            return Err(out_of_range("children", children, CHILDREN_MIN, CHILDREN_MAX));
        }

        Ok(Self {
            age,
            sex,
            bmi,
            children,
            smoker,
            region,
        })
    }

    pub fn age(&self) -> i64 {
        self.age
    }

    pub fn sex(&self) -> Sex {
        self.sex
    }

    pub fn bmi(&self) -> f64 {
        self.bmi
    }

    pub fn children(&self) -> i64 {
        self.children
    }

    pub fn smoker(&self) -> Smoker {
        self.smoker
    }

    pub fn region(&self) -> Region {
        self.region
    }
}

fn out_of_range(field: &'static str, value: i64, min: i64, max: i64) -> ValidationError {
    ValidationError::OutOfRange {
        field,
        value: value.to_string(),
        min: min.to_string(),
        max: max.to_string(),
    }
}

/// Raw form state, as typed by a user or read from a CSV row.
///
/// Nothing here is validated until `submit` is called; a submission either
/// yields a full record or the first field error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicantForm {
    pub age: String,
    pub sex: String,
    pub bmi: String,
    pub children: String,
    pub smoker: String,
    pub region: String,
}

impl Default for ApplicantForm {
    fn default() -> Self {
        Self {
            age: "30".to_string(),
            sex: Sex::Male.as_str().to_string(),
            bmi: "25.0".to_string(),
            children: "0".to_string(),
            smoker: Smoker::Yes.as_str().to_string(),
            region: Region::Southeast.as_str().to_string(),
        }
    }
}

impl ApplicantForm {
    pub fn submit(&self) -> Result<ApplicantRecord, ValidationError> {
        let age = parse_int("age", &self.age)?;
        let sex = Sex::parse(&self.sex)?;
        let bmi = parse_float("bmi", &self.bmi)?;
        let children = parse_int("children", &self.children)?;
        let smoker = Smoker::parse(&self.smoker)?;
        let region = Region::parse(&self.region)?;
        ApplicantRecord::new(age, sex, bmi, children, smoker, region)
    }
}

fn parse_int(field: &'static str, raw: &str) -> Result<i64, ValidationError> {
    raw.trim().parse::<i64>().map_err(|_| ValidationError::NotANumber {
        field,
        value: raw.to_string(),
    })
}

fn parse_float(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    raw.trim().parse::<f64>().map_err(|_| ValidationError::NotANumber {
        field,
        value: raw.to_string(),
    })
}

/// Annual premium predicted for one record, in USD.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct PremiumEstimate(f64);

impl PremiumEstimate {
    /// Accept a raw model output.
    ///
    /// Returns `None` for NaN/infinite values. Negative outputs are clamped to
    /// zero: the estimate is a cost and can't go below it.
    pub fn from_model_output(raw: f64) -> Option<Self> {
        if !raw.is_finite() {
            return None;
        }
        if raw < 0.0 {
            tracing::warn!(raw, "model produced a negative premium; clamping to 0");
            return Some(Self(0.0));
        }
        Some(Self(raw))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}
