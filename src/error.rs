//! Application-level error: a user-facing message plus a process exit code.
//!
//! Exit codes:
//! - 2: bad input, configuration or file IO
//! - 3: the model failed to produce a prediction
//! - 4: runtime failure (terminal, report rendering)

use crate::app::pipeline::PipelineError;
use crate::domain::ValidationError;
use crate::models::PredictionError;
use crate::report::ReportError;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::new(2, format!("Invalid input: {err}"))
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        let code = match err {
            PipelineError::Prediction(_) => 3,
            PipelineError::Report(_) => 4,
        };
        AppError::new(code, err.user_message())
    }
}

impl From<PredictionError> for AppError {
    fn from(err: PredictionError) -> Self {
        PipelineError::Prediction(err).into()
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        PipelineError::Report(err).into()
    }
}
