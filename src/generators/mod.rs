//! Generators module - business logic for turning a passport declaration into a PDF.
//!
//! Two interchangeable strategies implement [`Renderer`]:
//! - `LayoutRenderer` - draws the document directly with `printpdf`
//! - `TemplateRenderer` - fills an HTML template and hands it to an external HTML-to-PDF engine

pub mod common;
pub mod engine;
pub mod layout;
pub mod signature;
pub mod template;
pub mod traits;
pub mod validation;

pub use engine::HtmlToPdfEngine;
pub use layout::LayoutRenderer;
pub use template::TemplateRenderer;
pub use traits::{Renderer, Validator};

use thiserror::Error;

/// Errors that can occur during document generation.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("invalid signature: {0}")]
    SignatureDecode(String),
    #[error("PDF rendering failed: {0}")]
    Render(String),
    #[error("failed to create temporary directory: {0}")]
    TempDir(#[source] std::io::Error),
    #[error("failed to write HTML source: {0}")]
    WriteHtml(#[source] std::io::Error),
    #[error("HTML-to-PDF engine could not be started: {0}")]
    EngineIo(#[source] std::io::Error),
    #[error("failed to read generated PDF: {0}")]
    ReadPdf(#[source] std::io::Error),
}
