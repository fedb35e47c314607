//! Unwrapping of the hosted model's `generateContent` response.
//!
//! The provider nests the grade list as a JSON string three levels deep
//! (`candidates[0].content.parts[0].text`). Everything that knows about that
//! shape lives here; callers only see the ordered [`GradeItem`] list.

use crate::models::GradeItem;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub content: Content,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Part {
    pub text: Option<String>,
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unexpected provider response shape: {0}")]
    Shape(serde_json::Error),
    #[error("provider response contains no candidates")]
    NoCandidates,
    #[error("candidate content contains no text part")]
    NoText,
    #[error("grade list is not valid JSON: {0}")]
    Grades(serde_json::Error),
}

/// Pulls the ordered grade list out of a raw provider response.
pub fn extract_grade_items(result: &serde_json::Value) -> Result<Vec<GradeItem>, ExtractError> {
    let response: GenerateContentResponse =
        serde_json::from_value(result.clone()).map_err(ExtractError::Shape)?;
    let text = response
        .candidates
        .first()
        .ok_or(ExtractError::NoCandidates)?
        .content
        .parts
        .iter()
        .find_map(|part| part.text.as_deref())
        .ok_or(ExtractError::NoText)?;
    serde_json::from_str(text).map_err(ExtractError::Grades)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn well_formed() -> serde_json::Value {
        json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{
                        "text": "[{\"questionNumber\":1,\"grade\":8.0,\"feedback\":\"Good\"},\
                                 {\"questionNumber\":2,\"grade\":5.5,\"feedback\":\"Incomplete\"}]"
                    }]
                }
            }]
        })
    }

    #[test]
    fn extracts_ordered_grade_list() {
        let items = extract_grade_items(&well_formed()).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].question_number, 1);
        assert_eq!(items[1].grade, 5.5);
        assert_eq!(items[1].feedback, "Incomplete");
    }

    #[test]
    fn missing_candidates_is_a_distinct_error() {
        let err = extract_grade_items(&json!({"candidates": []})).unwrap_err();
        assert!(matches!(err, ExtractError::NoCandidates));
    }

    #[test]
    fn text_part_without_grades_fails_parsing() {
        let value = json!({
            "candidates": [{"content": {"parts": [{"text": "Out of domain."}]}}]
        });
        let err = extract_grade_items(&value).unwrap_err();
        assert!(matches!(err, ExtractError::Grades(_)));
    }

    #[test]
    fn non_text_parts_are_skipped() {
        let value = json!({
            "candidates": [{"content": {"parts": [
                {"inlineData": {"mimeType": "application/pdf", "data": "AAAA"}},
                {"text": "[]"}
            ]}}]
        });
        assert!(extract_grade_items(&value).unwrap().is_empty());
    }
}
