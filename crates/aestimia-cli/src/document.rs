//! Application documents on disk.
//!
//! A document is a JSON object with the `Application` properties; nested
//! `applicant`, `badge` (with `rubric`) and `evidence` entries are plain
//! objects:
//!
//! ```json
//! {
//!   "description": "I built a robot",
//!   "applicant": {"email": "learner@example.org"},
//!   "badge": {"name": "Robotics", "description": "...", "image": "https://..."},
//!   "criteriaUrl": "https://...",
//!   "callbackUrl": "https://...",
//!   "submissionId": "optional, set after submit"
//! }
//! ```

use std::path::Path;

use aestimia_core::Application;
use anyhow::Context;

/// Read and construct the application stored at `path`.
pub fn load_application(path: &Path) -> anyhow::Result<Application> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let document: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {} as JSON", path.display()))?;
    Application::from_document(document)
        .with_context(|| format!("{} is not a valid application", path.display()))
}
