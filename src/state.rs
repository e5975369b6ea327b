use std::io;
use std::sync::Arc;

use crate::config::{AppConfig, RenderStrategy};
use crate::generators::{HtmlToPdfEngine, LayoutRenderer, Renderer, TemplateRenderer};
use crate::storage::FileStore;

pub type SharedRenderer = Arc<dyn Renderer + Send + Sync>;

/// State shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub store: FileStore,
    pub renderer: SharedRenderer,
}

impl AppState {
    pub fn new(store: FileStore, renderer: SharedRenderer) -> Self {
        Self { store, renderer }
    }

    /// Build state from configuration, creating the output directory.
    pub fn from_config(config: &AppConfig) -> io::Result<Self> {
        let store = FileStore::new(&config.output_dir)?;
        Ok(Self::new(store, build_renderer(config)))
    }
}

pub fn build_renderer(config: &AppConfig) -> SharedRenderer {
    match config.strategy {
        RenderStrategy::Layout => Arc::new(LayoutRenderer::new()),
        RenderStrategy::Template => Arc::new(TemplateRenderer::new(HtmlToPdfEngine::new(
            config.html_to_pdf_bin.clone(),
            config.html_to_pdf_args.clone(),
        ))),
    }
}
