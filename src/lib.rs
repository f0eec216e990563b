pub mod config;
pub mod directory;
pub mod error;
pub mod gallery;
pub mod models;
pub mod panel;
pub mod poll;
pub mod state;
pub mod studio;
pub mod transport;
pub mod view;
pub mod visual;

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::gallery::ArchiveBrowser;
use crate::panel::ConversationPanel;
use crate::studio::ImageStudio;
use crate::transport::{Backend, HttpBackend};

/// The assembled client: one HTTP backend shared by the conversation panel,
/// the image studio and the archive browser.
pub struct CuratorClient {
    pub panel: ConversationPanel,
    pub studio: ImageStudio,
    pub archive: ArchiveBrowser,
}

impl CuratorClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(&cfg.server)?);

        Ok(Self {
            panel: ConversationPanel::new(Arc::clone(&backend), cfg),
            studio: ImageStudio::new(Arc::clone(&backend), cfg.studio_poll_interval()),
            archive: ArchiveBrowser::new(backend),
        })
    }
}
