use crate::AppState;
use crate::catalog;
use axum::Json;
use axum::extract::multipart::{Multipart, MultipartError};
use axum::extract::State;
use common::models::{GradeEnvelope, SubmitOutcome};
use log::{error, info};
use reqwest::multipart as outbound;
use std::sync::LazyLock;

static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(reqwest::Client::new);

#[derive(Debug, thiserror::Error)]
pub enum SubmissionFailed {
    /// Non-2xx from the grading engine; carries the upstream error message.
    #[error("{0}")]
    Rejected(String),
    #[error("invalid submission payload: {0}")]
    Payload(#[source] MultipartError),
    #[error("failed to submit assignment: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Forwards a submission to the grading engine and normalizes the outcome.
///
/// Whatever goes wrong underneath, the caller always gets the tagged
/// `{success, ...}` result with status 200.
#[utoipa::path(post, path = "/api/v1/submissions", responses((status = OK, body = SubmitOutcome)), description = "Submit an assignment for grading")]
#[axum::debug_handler]
pub async fn submit_assignment(state: State<AppState>, multipart: Multipart) -> Json<SubmitOutcome> {
    match forward(&state, multipart).await {
        Ok((assignment_id, data)) => {
            state.cache.invalidate(catalog::ASSIGNMENT_LIST_VIEW);
            if let Some(id) = &assignment_id {
                state
                    .cache
                    .invalidate(&catalog::assignment_detail_view(id));
            }
            info!(
                "submission {} graded for assignment {}",
                data.file_name,
                assignment_id.as_deref().unwrap_or("<none>")
            );
            Json(SubmitOutcome::success(data))
        }
        Err(e) => {
            error!("error while submitting assignment: {e}");
            Json(SubmitOutcome::failure(e.to_string()))
        }
    }
}

async fn forward(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<(Option<String>, GradeEnvelope), SubmissionFailed> {
    let mut assignment_id = None;
    let mut form = outbound::Form::new();

    // Re-serialize the inbound form unmodified; the grading engine decides
    // what it needs.
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(SubmissionFailed::Payload)?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if name == "file" {
            let file_name = field.file_name().unwrap_or("submission.pdf").to_string();
            let mime = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field.bytes().await.map_err(SubmissionFailed::Payload)?;
            let part = outbound::Part::bytes(bytes.to_vec())
                .file_name(file_name)
                .mime_str(&mime)?;
            form = form.part("file", part);
        } else {
            let value = field.text().await.map_err(SubmissionFailed::Payload)?;
            if name == "assignmentId" {
                assignment_id = Some(value.clone());
            }
            form = form.text(name, value);
        }
    }

    let response = HTTP_CLIENT
        .post(format!("{}/api/v1/grade", state.config.grading_url))
        .multipart(form)
        .send()
        .await?;

    if !response.status().is_success() {
        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| body["error"].as_str().map(str::to_string))
            .unwrap_or_else(|| "Failed to submit assignment".to_string());
        return Err(SubmissionFailed::Rejected(message));
    }

    let data = response.json::<GradeEnvelope>().await?;
    Ok((assignment_id, data))
}
