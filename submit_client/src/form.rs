use common::models::{GradeItem, SubmitOutcome};
use common::provider;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Lifecycle of one submission attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum FormState {
    Idle,
    Uploading,
    Completed {
        file_name: String,
        submission_date: String,
        grades: Vec<GradeItem>,
    },
    Failed {
        error: String,
    },
}

/// Reasons a submission cannot start. These are raised before any network
/// call is made.
#[derive(Debug, Error, PartialEq)]
pub enum SubmitBlocked {
    #[error("No file selected")]
    NoFileSelected,
    #[error("a submission is already in progress")]
    AlreadyUploading,
}

/// How a submission leaves the machine. The portal transport implements
/// this; tests substitute their own.
pub trait SubmissionTransport {
    async fn submit(&self, assignment_id: &str, file: &Path, comments: &str) -> SubmitOutcome;
}

/// The submission form: one selected file, optional comments, and the
/// current [`FormState`]. At most one submission is in flight at a time.
#[derive(Debug)]
pub struct SubmissionForm {
    state: FormState,
    selected_file: Option<PathBuf>,
    comments: String,
}

impl SubmissionForm {
    pub fn new() -> Self {
        SubmissionForm {
            state: FormState::Idle,
            selected_file: None,
            comments: String::new(),
        }
    }

    pub fn select_file(&mut self, path: PathBuf) {
        self.selected_file = Some(path);
    }

    pub fn set_comments(&mut self, comments: String) {
        self.comments = comments;
    }

    pub fn has_selection(&self) -> bool {
        self.selected_file.is_some()
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// Guards the transition into Uploading. Fails without side effects when
    /// no file is selected or a submission is already running.
    pub fn try_begin(&mut self) -> Result<PathBuf, SubmitBlocked> {
        if matches!(self.state, FormState::Uploading) {
            return Err(SubmitBlocked::AlreadyUploading);
        }
        let Some(file) = self.selected_file.clone() else {
            return Err(SubmitBlocked::NoFileSelected);
        };
        self.state = FormState::Uploading;
        Ok(file)
    }

    /// Applies the relay outcome. The file and comments are cleared only on
    /// success; a failure keeps them so the user can retry.
    pub fn finish(&mut self, outcome: SubmitOutcome) {
        self.state = match outcome {
            SubmitOutcome::Success { data, .. } => {
                match provider::extract_grade_items(&data.result) {
                    Ok(grades) => {
                        self.selected_file = None;
                        self.comments.clear();
                        FormState::Completed {
                            file_name: data.file_name,
                            submission_date: data.submission_date,
                            grades,
                        }
                    }
                    Err(e) => FormState::Failed {
                        error: e.to_string(),
                    },
                }
            }
            SubmitOutcome::Failure { error, .. } => FormState::Failed { error },
        };
    }

    /// Runs one submission through the transport.
    pub async fn submit<T: SubmissionTransport>(
        &mut self,
        assignment_id: &str,
        transport: &T,
    ) -> Result<(), SubmitBlocked> {
        let file = self.try_begin()?;
        let outcome = transport.submit(assignment_id, &file, &self.comments).await;
        self.finish(outcome);
        Ok(())
    }
}

/// Plain-text table of the graded questions, one row per item.
pub fn render_grade_table(grades: &[GradeItem]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<15} {:>5}  Feedback\n", "Question Number", "Grade"));
    for item in grades {
        out.push_str(&format!(
            "{:<15} {:>5}  {}\n",
            item.question_number, item.grade, item.feedback
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::models::GradeEnvelope;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct RecordingTransport {
        outcome: SubmitOutcome,
        calls: AtomicUsize,
    }

    impl RecordingTransport {
        fn new(outcome: SubmitOutcome) -> Self {
            RecordingTransport {
                outcome,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl SubmissionTransport for RecordingTransport {
        async fn submit(&self, _: &str, _: &Path, _: &str) -> SubmitOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    fn graded_envelope() -> GradeEnvelope {
        GradeEnvelope {
            success: true,
            message: "File submitted successfully".to_string(),
            result: json!({
                "candidates": [{
                    "content": {
                        "parts": [{"text": "[{\"questionNumber\":1,\"grade\":9.0,\"feedback\":\"Well done\"}]"}]
                    }
                }]
            }),
            file_name: "essay.pdf".to_string(),
            submission_date: "2025-03-14T12:00:00.000Z".to_string(),
        }
    }

    #[tokio::test]
    async fn no_file_selected_blocks_before_any_network_call() {
        let transport = RecordingTransport::new(SubmitOutcome::failure("unreachable"));
        let mut form = SubmissionForm::new();

        let blocked = form.submit("2", &transport).await.unwrap_err();
        assert_eq!(blocked, SubmitBlocked::NoFileSelected);
        assert_eq!(blocked.to_string(), "No file selected");
        assert_eq!(transport.calls(), 0);
        assert_eq!(form.state(), &FormState::Idle);
    }

    #[tokio::test]
    async fn successful_submission_renders_grades_and_resets_the_form() {
        let transport =
            RecordingTransport::new(SubmitOutcome::success(graded_envelope()));
        let mut form = SubmissionForm::new();
        form.select_file(PathBuf::from("essay.pdf"));
        form.set_comments("please review section 3".to_string());

        form.submit("2", &transport).await.unwrap();

        match form.state() {
            FormState::Completed {
                file_name, grades, ..
            } => {
                assert_eq!(file_name, "essay.pdf");
                assert_eq!(grades.len(), 1);
                assert_eq!(grades[0].grade, 9.0);
            }
            other => panic!("expected completion, got {other:?}"),
        }
        assert!(!form.has_selection());
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn failed_submission_keeps_the_selected_file() {
        let transport =
            RecordingTransport::new(SubmitOutcome::failure("No file provided"));
        let mut form = SubmissionForm::new();
        form.select_file(PathBuf::from("essay.pdf"));

        form.submit("2", &transport).await.unwrap();

        assert_eq!(
            form.state(),
            &FormState::Failed {
                error: "No file provided".to_string()
            }
        );
        assert!(form.has_selection());
    }

    #[tokio::test]
    async fn unparseable_provider_result_fails_without_clearing_the_form() {
        let mut envelope = graded_envelope();
        envelope.result = json!({"candidates": []});
        let transport = RecordingTransport::new(SubmitOutcome::success(envelope));
        let mut form = SubmissionForm::new();
        form.select_file(PathBuf::from("essay.pdf"));

        form.submit("2", &transport).await.unwrap();

        assert!(matches!(form.state(), FormState::Failed { .. }));
        assert!(form.has_selection());
    }

    #[test]
    fn second_submission_is_blocked_while_uploading() {
        let mut form = SubmissionForm::new();
        form.select_file(PathBuf::from("essay.pdf"));

        form.try_begin().unwrap();
        assert_eq!(form.try_begin().unwrap_err(), SubmitBlocked::AlreadyUploading);
    }

    #[test]
    fn grade_table_has_one_row_per_item() {
        let grades = vec![
            GradeItem {
                question_number: 1,
                grade: 8.0,
                feedback: "Good".to_string(),
            },
            GradeItem {
                question_number: 2,
                grade: 5.5,
                feedback: "Incomplete".to_string(),
            },
        ];
        let table = render_grade_table(&grades);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Question Number"));
        assert!(lines[1].contains("Good"));
        assert!(lines[2].contains("Incomplete"));
    }
}
