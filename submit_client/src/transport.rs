use crate::form::SubmissionTransport;
use common::models::SubmitOutcome;
use std::path::Path;

/// Sends submissions to the portal's relay endpoint.
///
/// Every failure on this path is folded into a tagged failure outcome, the
/// same shape the relay itself answers with.
#[derive(Debug)]
pub struct PortalTransport {
    client: reqwest::Client,
    portal_url: String,
}

impl PortalTransport {
    pub fn new(portal_url: String) -> Self {
        PortalTransport {
            client: reqwest::Client::new(),
            portal_url,
        }
    }

    async fn send(
        &self,
        assignment_id: &str,
        file: &Path,
        comments: &str,
    ) -> Result<SubmitOutcome, anyhow::Error> {
        let file_name = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "submission.pdf".to_string());
        let bytes = std::fs::read(file)?;

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(bytes)
                    .file_name(file_name)
                    .mime_str("application/pdf")?,
            )
            .text("assignmentId", assignment_id.to_string())
            .text("comments", comments.to_string());

        Ok(self
            .client
            .post(format!("{}/api/v1/submissions", self.portal_url))
            .multipart(form)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }
}

impl SubmissionTransport for PortalTransport {
    async fn submit(&self, assignment_id: &str, file: &Path, comments: &str) -> SubmitOutcome {
        match self.send(assignment_id, file, comments).await {
            Ok(outcome) => outcome,
            Err(e) => SubmitOutcome::failure(e.to_string()),
        }
    }
}
