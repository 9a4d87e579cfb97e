//! Rendering context shared by every section.

use shopfront_data::media::image_url;

/// Backend media location used to resolve image references.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    pub media_base: String,
}

impl RenderContext {
    pub fn new(media_base: impl Into<String>) -> Self {
        Self {
            media_base: media_base.into(),
        }
    }

    /// Absolute URL for an image reference.
    pub fn image(&self, reference: Option<&str>) -> Option<String> {
        image_url(&self.media_base, reference)
    }
}
