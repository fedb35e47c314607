use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One question's score and feedback as returned by the grading model.
///
/// Items are only meaningful as an ordered sequence matching the question
/// numbering in the fixed questions document.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GradeItem {
    pub question_number: u32,
    pub grade: f64,
    pub feedback: String,
}

/// Success envelope returned by the grading engine.
///
/// `result` carries the provider's response verbatim; use
/// [`crate::provider::extract_grade_items`] to normalize it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GradeEnvelope {
    pub success: bool,
    pub message: String,
    #[schema(value_type = Object)]
    pub result: serde_json::Value,
    pub file_name: String,
    pub submission_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

/// Outcome of the submission relay. The relay always answers with one of
/// these two shapes, never with a raised error.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum SubmitOutcome {
    Success { success: bool, data: GradeEnvelope },
    Failure { success: bool, error: String },
}

impl SubmitOutcome {
    pub fn success(data: GradeEnvelope) -> Self {
        SubmitOutcome::Success {
            success: true,
            data,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        SubmitOutcome::Failure {
            success: false,
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Success { .. })
    }
}
