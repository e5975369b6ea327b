//! HTML-to-PDF rendering engine.
//!
//! Handles the low-level details of writing HTML to a temporary directory,
//! invoking the external converter, and reading back the output PDF.

use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

use super::GeneratorError;

const SOURCE_FILE: &str = "declaration.html";
const OUTPUT_FILE: &str = "declaration.pdf";

/// Wrapper around an external HTML-to-PDF converter such as `wkhtmltopdf`.
///
/// The converter is invoked as `<program> <args...> <input.html> <output.pdf>`.
#[derive(Debug, Clone)]
pub struct HtmlToPdfEngine {
    program: PathBuf,
    args: Vec<String>,
}

impl HtmlToPdfEngine {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Convert a complete HTML document to PDF bytes.
    pub fn convert(&self, html: &str) -> Result<Vec<u8>, GeneratorError> {
        let temp_dir = tempdir().map_err(GeneratorError::TempDir)?;
        let html_path = temp_dir.path().join(SOURCE_FILE);
        let pdf_path = temp_dir.path().join(OUTPUT_FILE);

        fs::write(&html_path, html).map_err(GeneratorError::WriteHtml)?;

        log::debug!(
            "Running {} on {}",
            self.program.display(),
            html_path.display()
        );
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(&html_path)
            .arg(&pdf_path)
            .current_dir(temp_dir.path())
            .output()
            .map_err(GeneratorError::EngineIo)?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr);
            let diagnostic = stderr.trim();
            return Err(GeneratorError::Render(if diagnostic.is_empty() {
                format!("{} exited with status {}", self.program.display(), code)
            } else {
                format!(
                    "{} exited with status {}: {}",
                    self.program.display(),
                    code,
                    diagnostic
                )
            }));
        }

        let pdf = fs::read(&pdf_path).map_err(GeneratorError::ReadPdf)?;
        if !pdf.starts_with(b"%PDF") {
            return Err(GeneratorError::Render(format!(
                "{} did not produce a PDF document",
                self.program.display()
            )));
        }

        Ok(pdf)
    }
}
