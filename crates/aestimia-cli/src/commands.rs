//! # Subcommand Arguments and Handlers

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use aestimia_client::AestimiaClient;
use aestimia_core::{build_submission, Application, Evaluation, ReviewId, SubmissionId};
use anyhow::Context;
use clap::Args;

use crate::document::load_application;
use crate::handler::LogReviews;

/// Arguments for the submit subcommand.
#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Path to the application JSON document.
    pub file: PathBuf,

    /// Print the assembled submission instead of sending it.
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the status subcommand.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Submission id returned by `submit`.
    pub submission_id: String,
}

/// Arguments for the process subcommand.
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Submission id returned by `submit`.
    pub submission_id: String,

    /// Review to acknowledge.
    pub review_id: String,
}

/// Arguments for the serve subcommand.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind the webhook to.
    #[arg(long, env = "AESTIMIA_WEBHOOK_ADDR", default_value = "0.0.0.0:8080")]
    pub addr: SocketAddr,
}

pub async fn submit(client: &AestimiaClient, args: &SubmitArgs) -> anyhow::Result<()> {
    let application = load_application(&args.file)?;

    if args.dry_run {
        let submission = build_submission(&application, client.policy()).await?;
        println!("{}", serde_json::to_string_pretty(&submission)?);
        return Ok(());
    }

    let id = client.submit(&application).await?;
    println!("{id}");
    Ok(())
}

pub async fn status(client: &AestimiaClient, args: &StatusArgs) -> anyhow::Result<()> {
    let application = Application::from_submission_id(&args.submission_id);
    let evaluation = client.update(&application).await?;
    println!(
        "{}",
        serde_json::to_string_pretty(&status_report(&args.submission_id, &evaluation))?
    );
    Ok(())
}

pub async fn process(client: &AestimiaClient, args: &ProcessArgs) -> anyhow::Result<()> {
    let application = Application::from_submission_id(&args.submission_id);
    client
        .process(&application, &ReviewId::new(&args.review_id))
        .await?;
    Ok(())
}

pub async fn serve(client: AestimiaClient, args: &ServeArgs) -> anyhow::Result<()> {
    let app = aestimia_webhook::endpoint(Arc::new(client), Arc::new(LogReviews));

    tracing::info!("Aestimia webhook listening on {}", args.addr);
    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("binding {}", args.addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// JSON summary printed by `status`.
pub fn status_report(submission_id: &str, evaluation: &Evaluation) -> serde_json::Value {
    serde_json::json!({
        "submissionId": SubmissionId::new(submission_id),
        "accepted": evaluation.accepted,
        "review": evaluation.review,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use aestimia_core::Review;

    #[test]
    fn status_report_includes_review() {
        let evaluation = Evaluation {
            review: Some(Review {
                id: Some(ReviewId::new("r1")),
                author: Some("reviewer@example.org".into()),
                response: None,
                date: None,
                satisfied_rubrics: vec![0],
            }),
            accepted: true,
        };
        let report = status_report("sub-1", &evaluation);
        assert_eq!(report["submissionId"], "sub-1");
        assert_eq!(report["accepted"], true);
        assert_eq!(report["review"]["_id"], "r1");
        assert_eq!(report["review"]["satisfiedRubrics"], serde_json::json!([0]));
    }

    #[test]
    fn status_report_without_review_is_null() {
        let evaluation = Evaluation {
            review: None,
            accepted: false,
        };
        let report = status_report("sub-1", &evaluation);
        assert!(report["review"].is_null());
    }
}
