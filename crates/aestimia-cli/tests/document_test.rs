//! Loading application documents from disk.

use std::io::Write;

use aestimia_cli::document::load_application;
use aestimia_core::{build_submission, MediaType, SubmissionId, SubmissionPolicy};

fn write_document(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn document_loads_into_a_submittable_application() {
    let file = write_document(
        r#"{
            "description": "Taught a workshop on soldering",
            "applicant": {"email": "teacher@example.org"},
            "badge": {
                "name": "Workshop Leader",
                "description": "Led a workshop",
                "image": "https://badges.example.org/workshop.png",
                "categories": ["teaching"]
            },
            "evidence": [{"mediaType": "image/png", "url": "https://x/photo.png"}],
            "criteriaUrl": "https://badges.example.org/workshop",
            "callbackUrl": "https://issuer.example.org/hook",
            "submissionId": "sub-9"
        }"#,
    );

    let application = load_application(file.path()).unwrap();
    assert_eq!(application.submission_id, Some(SubmissionId::new("sub-9")));

    let submission = build_submission(&application, &SubmissionPolicy::default())
        .await
        .unwrap();
    assert_eq!(submission.classifications, vec!["teaching"]);
    assert_eq!(submission.evidence.len(), 2);
    assert_eq!(submission.evidence[1].media_type, MediaType::Image);
}

#[test]
fn invalid_json_reports_the_path() {
    let file = write_document("{ not json");
    let err = load_application(file.path()).unwrap_err();
    assert!(format!("{err:#}").contains("parsing"));
}

#[test]
fn schema_violations_are_reported() {
    let file = write_document(r#"{"badge": {"name": "No description"}}"#);
    let err = load_application(file.path()).unwrap_err();
    let rendered = format!("{err:#}");
    assert!(rendered.contains("not a valid application"), "{rendered}");
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_application(&dir.path().join("absent.json")).unwrap_err();
    assert!(format!("{err:#}").contains("reading"));
}
