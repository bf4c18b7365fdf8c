//! Identity and intrinsic size of a map page image.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewError};
use crate::geometry::Size;

/// A page image before it has been fetched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageSource {
    /// URL the image bytes are fetched from
    pub source_url: String,
    /// Human readable description shown in the map label
    pub alt_text: String,
}

impl ImageSource {
    /// Create a new image source.
    pub fn new(source_url: impl Into<String>, alt_text: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            alt_text: alt_text.into(),
        }
    }

    /// Last path segment of the source URL, without query or fragment.
    pub fn file_name(&self) -> &str {
        let path = self
            .source_url
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        path.rsplit('/').next().unwrap_or(path)
    }
}

/// Intrinsic size and identity of the page currently shown.
///
/// Only built once the natural size is known; replaced wholesale when the user
/// moves to another page or map.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageMetadata {
    pub natural_width: u32,
    pub natural_height: u32,
    pub source_url: String,
    pub alt_text: String,
}

impl ImageMetadata {
    /// Attach a decoded natural size to a source.
    ///
    /// Fails when either dimension is zero, which is what an image element
    /// reports before it has loaded.
    pub fn new(source: ImageSource, natural_width: u32, natural_height: u32) -> Result<Self> {
        if natural_width == 0 || natural_height == 0 {
            return Err(ViewError::ImageNotLoaded {
                url: source.source_url,
            });
        }

        Ok(Self {
            natural_width,
            natural_height,
            source_url: source.source_url,
            alt_text: source.alt_text,
        })
    }

    /// Natural size in pixels.
    pub fn natural_size(&self) -> Size {
        Size::new(self.natural_width as f64, self.natural_height as f64)
    }

    /// The source this metadata was built from.
    pub fn source(&self) -> ImageSource {
        ImageSource::new(self.source_url.clone(), self.alt_text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name() {
        let source = ImageSource::new("/map/rs/001/rs001-012.jpg?v=3", "RS 1/12");
        assert_eq!(source.file_name(), "rs001-012.jpg");

        let bare = ImageSource::new("page.png", "");
        assert_eq!(bare.file_name(), "page.png");
    }

    #[test]
    fn test_zero_size_is_not_loaded() {
        let source = ImageSource::new("/map/a.jpg", "A");
        let err = ImageMetadata::new(source, 0, 3000).unwrap_err();
        assert_eq!(
            err,
            ViewError::ImageNotLoaded {
                url: "/map/a.jpg".to_string()
            }
        );
    }

    #[test]
    fn test_metadata_natural_size() {
        let metadata = ImageMetadata::new(ImageSource::new("/a.jpg", "A"), 4000, 3000).unwrap();
        assert_eq!(metadata.natural_size(), Size::new(4000.0, 3000.0));
        assert_eq!(metadata.source().alt_text, "A");
    }
}
