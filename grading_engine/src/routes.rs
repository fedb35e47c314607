use crate::Config;
use crate::gemini::{GeminiClient, GenerateContentRequest, Part};
use askama::Template;
use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{SecondsFormat, Utc};
use common::models::{ErrorBody, GradeEnvelope};
use log::error;
use std::path::Path;
use std::sync::Arc;

#[derive(Template)]
#[template(path = "prompt.txt")]
struct PromptTemplate<'a> {
    file_name: &'a str,
}

type GradeErrorResponse = (StatusCode, Json<ErrorBody>);

fn processing_failure() -> GradeErrorResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error: "Failed to process file submission".to_string(),
        }),
    )
}

#[utoipa::path(post, path = "/api/v1/grade", responses((status = OK, body = GradeEnvelope), (status = BAD_REQUEST, body = ErrorBody), (status = INTERNAL_SERVER_ERROR, body = ErrorBody)), description = "Grade an uploaded submission against the fixed reference documents")]
#[axum::debug_handler]
pub async fn grade_submission(
    config: State<Arc<Config>>,
    mut multipart: Multipart,
) -> Result<Json<GradeEnvelope>, GradeErrorResponse> {
    let mut file: Option<(String, Vec<u8>)> = None;

    loop {
        let field = multipart.next_field().await.map_err(|e| {
            error!("error while reading multipart payload: {e}");
            processing_failure()
        })?;
        let Some(field) = field else { break };
        // assignmentId and comments arrive in the same form; grading does not
        // read them.
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("submission.pdf").to_string();
        let bytes = field.bytes().await.map_err(|e| {
            error!("error while reading uploaded file: {e}");
            processing_failure()
        })?;
        file = Some((file_name, bytes.to_vec()));
    }

    let Some((file_name, bytes)) = file else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                error: "No file provided".to_string(),
            }),
        ));
    };

    // Reference documents are loaded fresh on every request.
    let questions = load_reference(&config.assets_dir, "doc1.pdf").map_err(|e| {
        error!("error while reading reference document doc1.pdf: {e}");
        processing_failure()
    })?;
    let answers = load_reference(&config.assets_dir, "doc3.pdf").map_err(|e| {
        error!("error while reading reference document doc3.pdf: {e}");
        processing_failure()
    })?;

    let prompt = PromptTemplate {
        file_name: &file_name,
    }
    .render()
    .unwrap();

    let request = GenerateContentRequest::grading(vec![
        Part::inline_pdf(STANDARD.encode(&bytes)),
        Part::inline_pdf(questions),
        Part::inline_pdf(answers),
        Part::Text { text: prompt },
    ]);

    let client = GeminiClient::new(
        &config.gemini_base_url,
        &config.gemini_api_key,
        &config.model,
    );
    let result = client.generate_content(&request).await.map_err(|e| {
        error!("error while calling the grading model: {e}");
        processing_failure()
    })?;

    Ok(Json(GradeEnvelope {
        success: true,
        message: "File submitted successfully".to_string(),
        result,
        file_name,
        submission_date: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}

fn load_reference(assets_dir: &str, name: &str) -> std::io::Result<String> {
    let bytes = std::fs::read(Path::new(assets_dir).join(name))?;
    Ok(STANDARD.encode(bytes))
}
