mod form;
mod transport;

use crate::form::{FormState, SubmissionForm, render_grade_table};
use crate::transport::PortalTransport;
use env_logger::Env;
use log::error;
use serde::Deserialize;
use std::io::Write;
use std::path::PathBuf;
use std::process::exit;
use std::time::Duration;

fn get_default_portal_url() -> String {
    "http://localhost:8080".to_string()
}

#[derive(Deserialize, Debug)]
struct Config {
    #[serde(default = "get_default_portal_url")]
    portal_url: String,
}

/// Indeterminate processing indicator. The portal gives no transfer
/// progress, so this only signals that grading is still running.
fn spawn_processing_ticker() -> tokio::task::JoinHandle<()> {
    tokio::spawn(async {
        let mut interval = tokio::time::interval(Duration::from_millis(500));
        interval.tick().await;
        loop {
            interval.tick().await;
            eprint!(".");
            let _ = std::io::stderr().flush();
        }
    })
}

async fn run() -> Result<(), anyhow::Error> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let config = envy::from_env::<Config>()?;

    let mut args = std::env::args().skip(1);
    let Some(assignment_id) = args.next() else {
        eprintln!("usage: submit_client <assignment-id> <file> [comments]");
        exit(2);
    };
    let file = args.next().map(PathBuf::from);
    let comments = args.next().unwrap_or_default();

    let mut submission_form = SubmissionForm::new();
    if let Some(file) = file {
        submission_form.select_file(file);
    }
    submission_form.set_comments(comments);

    if submission_form.has_selection() {
        println!("Uploading submission for assignment {assignment_id}...");
    }
    let ticker = spawn_processing_ticker();
    let transport = PortalTransport::new(config.portal_url);
    let blocked = submission_form.submit(&assignment_id, &transport).await;
    ticker.abort();
    eprintln!();

    // "No file selected" lands here, before any network call was made.
    if let Err(blocked) = blocked {
        eprintln!("{blocked}");
        exit(1);
    }

    match submission_form.state() {
        FormState::Completed {
            file_name,
            submission_date,
            grades,
        } => {
            println!("Assignment submitted: your assignment has been submitted successfully");
            println!("Submitted {file_name} on {submission_date}");
            println!();
            print!("{}", render_grade_table(grades));
        }
        FormState::Failed { error } => {
            eprintln!("Submission failed: {error}");
            exit(1);
        }
        FormState::Idle | FormState::Uploading => unreachable!("submission has finished"),
    }

    Ok(())
}

fn main() {
    let rt = tokio::runtime::Runtime::new().unwrap();

    if let Err(err) = rt.block_on(run()) {
        error!("{}", err);
        exit(1)
    }
}
