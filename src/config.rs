//! Process-wide configuration, resolved once from the environment at startup.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

const DEFAULT_OUTPUT_DIR: &str = "pdf_output";
const DEFAULT_HTML_TO_PDF_BIN: &str = "wkhtmltopdf";
const DEFAULT_HTML_TO_PDF_ARGS: &str = "--quiet --encoding utf-8 --page-size A4";

/// Which renderer backs `POST /api/passport`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderStrategy {
    /// Direct PDF drawing.
    #[default]
    Layout,
    /// HTML template converted by an external engine.
    Template,
}

impl FromStr for RenderStrategy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "layout" => Ok(Self::Layout),
            "template" | "html" => Ok(Self::Template),
            other => Err(format!(
                "unknown render strategy '{}' (expected 'layout' or 'template')",
                other
            )),
        }
    }
}

impl fmt::Display for RenderStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Layout => write!(f, "layout"),
            Self::Template => write!(f, "template"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub output_dir: PathBuf,
    pub strategy: RenderStrategy,
    pub html_to_pdf_bin: PathBuf,
    pub html_to_pdf_args: Vec<String>,
    /// Empty means any origin is allowed.
    pub cors_allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            strategy: RenderStrategy::default(),
            html_to_pdf_bin: PathBuf::from(DEFAULT_HTML_TO_PDF_BIN),
            html_to_pdf_args: split_args(DEFAULT_HTML_TO_PDF_ARGS),
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid port number, got '{}'", value))?,
            None => defaults.port,
        };

        let strategy = match get("RENDER_STRATEGY") {
            Some(value) => value
                .parse::<RenderStrategy>()
                .map_err(anyhow::Error::msg)
                .context("invalid RENDER_STRATEGY")?,
            None => defaults.strategy,
        };

        Ok(Self {
            host: get("HOST").unwrap_or(defaults.host),
            port,
            output_dir: get("PDF_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            strategy,
            html_to_pdf_bin: get("HTML_TO_PDF_BIN")
                .map(PathBuf::from)
                .unwrap_or(defaults.html_to_pdf_bin),
            html_to_pdf_args: lookup("HTML_TO_PDF_ARGS")
                .map(|v| split_args(&v))
                .unwrap_or(defaults.html_to_pdf_args),
            cors_allowed_origins: get("CORS_ALLOWED_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        })
    }
}

fn split_args(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_string).collect()
}
