#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use passport_declaration_server::generators::{HtmlToPdfEngine, LayoutRenderer, TemplateRenderer};
use passport_declaration_server::storage::FileStore;
use passport_declaration_server::AppState;
use serde_json::{json, Value};

/// 1x1 PNG as a canvas-style data URI.
pub const SIGNATURE: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

pub fn sample_payload() -> Value {
    json!({
        "date": "2024-03-05",
        "designation": "Site Engineer",
        "joiningDate": "2024-01-01",
        "nationality": "Indian",
        "passportNumber": "Z1234567",
        "issueLocation": "Mumbai",
        "issueDate": "2020-06-10",
        "expiryDate": "2030-06-09",
        "employeeName": "Jane Doe",
        "employeeCode": "E123",
        "signature": SIGNATURE
    })
}

/// State backed by the layout renderer and a store rooted at `dir`.
pub fn layout_state(dir: &Path) -> AppState {
    AppState::new(
        FileStore::new(dir).expect("output dir"),
        Arc::new(LayoutRenderer::new()),
    )
}

/// State backed by the template renderer using `engine`.
pub fn template_state(dir: &Path, engine: HtmlToPdfEngine) -> AppState {
    AppState::new(
        FileStore::new(dir).expect("output dir"),
        Arc::new(TemplateRenderer::new(engine)),
    )
}

/// Number of entries currently in `dir`.
pub fn file_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}
