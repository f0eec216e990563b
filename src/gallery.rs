use std::sync::Arc;

use crate::models::GalleryImage;
use crate::transport::Backend;

/// Sort orders the archive endpoint understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Latest,
    Popular,
    Random,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Latest => "latest",
            SortOrder::Popular => "popular",
            SortOrder::Random => "random",
        }
    }
}

/// Filter state of the archive page: free-text search, style keyword, sort.
#[derive(Debug, Clone, Default)]
pub struct GalleryQuery {
    pub search: Option<String>,
    pub style: Option<String>,
    pub sort: SortOrder,
}

impl GalleryQuery {
    /// Query-string pairs; empty filters are omitted, the sort always sent.
    pub(crate) fn as_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = &self.search {
            if !search.trim().is_empty() {
                pairs.push(("search", search.trim().to_string()));
            }
        }
        if let Some(style) = &self.style {
            if !style.is_empty() {
                pairs.push(("style", style.clone()));
            }
        }
        pairs.push(("sort", self.sort.as_str().to_string()));
        pairs
    }
}

/// Result of an archive query. A fetch failure becomes an inline error view
/// with no images rather than an propagated error.
#[derive(Debug)]
pub struct ArchiveView {
    pub images: Vec<GalleryImage>,
    pub error: Option<String>,
}

/// Map a style-chip label to the keyword the archive endpoint filters on.
/// Unknown labels reset the style filter, as on the archive page.
pub fn style_keyword(label: &str) -> Option<&'static str> {
    match label.trim().to_lowercase().as_str() {
        "cyberpunk" => Some("cyberpunk"),
        "fantasy" => Some("fantasy"),
        "surrealism" | "surreal" => Some("surreal"),
        "classic oil painting" | "classic" => Some("classic"),
        "cartoon/animation" | "cartoon" => Some("cartoon"),
        "abstract" => Some("abstract"),
        "oriental" => Some("oriental"),
        "watercolor" => Some("watercolor"),
        "photorealistic" => Some("photorealistic"),
        "pixel art" | "pixelart" => Some("pixelart"),
        "3d rendering" | "3d" => Some("3d"),
        _ => None,
    }
}

pub struct ArchiveBrowser {
    backend: Arc<dyn Backend>,
}

impl ArchiveBrowser {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    pub async fn search(&self, query: &GalleryQuery) -> ArchiveView {
        match self.backend.gallery_images(query).await {
            Ok(images) => ArchiveView {
                images,
                error: None,
            },
            Err(err) => {
                tracing::warn!("Archive query failed: {err}");
                ArchiveView {
                    images: Vec::new(),
                    error: Some(
                        "Could not load images right now. Please try again shortly.".to_string(),
                    ),
                }
            }
        }
    }
}
