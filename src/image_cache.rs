//! Decoded page image cache.
//!
//! Pages the user already looked at are kept by URL so stepping back and
//! forth between them shows them immediately, without a fetch or loader.
//! The handle type is whatever the platform draws: an `HtmlImageElement` in
//! the browser, an `RgbaImage` natively.

use std::num::NonZeroUsize;

use hummaps_view::ImageMetadata;
use lru::LruCache;

/// Supported image file extensions.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tiff", "tif"];

/// Check if a filename has a supported image extension.
pub fn is_image_file(filename: &str) -> bool {
    let lower = filename.to_lowercase();
    IMAGE_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(&format!(".{ext}")))
}

/// A decoded page and what it is.
#[derive(Debug, Clone)]
pub struct CachedImage<H> {
    pub metadata: ImageMetadata,
    pub handle: H,
}

/// Bounded least-recently-used cache keyed by source URL.
#[derive(Debug)]
pub struct ImageCache<H> {
    /// `None` when caching is disabled
    entries: Option<LruCache<String, CachedImage<H>>>,
}

impl<H: Clone> ImageCache<H> {
    /// Create a new image cache. A capacity of 0 disables caching.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: NonZeroUsize::new(capacity).map(LruCache::new),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, LruCache::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.entries.as_ref().map_or(0, |e| e.cap().get())
    }

    /// Look up a page and mark it as recently used.
    pub fn get(&mut self, url: &str) -> Option<CachedImage<H>> {
        self.entries.as_mut()?.get(url).cloned()
    }

    /// Store a decoded page, evicting the least recently used one when full.
    pub fn insert(&mut self, metadata: ImageMetadata, handle: H) {
        let Some(entries) = self.entries.as_mut() else {
            return;
        };
        let url = metadata.source_url.clone();
        if let Some((evicted, _)) = entries.push(url.clone(), CachedImage { metadata, handle })
            && evicted != url
        {
            log::debug!("Evicting {} from image cache", evicted);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hummaps_view::ImageSource;

    fn page(url: &str) -> ImageMetadata {
        ImageMetadata::new(ImageSource::new(url, url), 100, 80).unwrap()
    }

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file("rs001-001.jpg"));
        assert!(is_image_file("RS001-001.JPG"));
        assert!(is_image_file("path/to/map.tif"));
        assert!(is_image_file("map.png"));

        assert!(!is_image_file("map.pdf"));
        assert!(!is_image_file("png"));
        assert!(!is_image_file(""));
    }

    #[test]
    fn test_get_hit_and_miss() {
        let mut cache = ImageCache::new(2);
        cache.insert(page("/a.jpg"), 1u8);
        assert_eq!(cache.get("/a.jpg").map(|c| c.handle), Some(1));
        assert!(cache.get("/b.jpg").is_none());
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let mut cache = ImageCache::new(2);
        cache.insert(page("/a.jpg"), 1u8);
        cache.insert(page("/b.jpg"), 2);
        // Touch a so b becomes the oldest
        cache.get("/a.jpg");
        cache.insert(page("/c.jpg"), 3);

        assert_eq!(cache.len(), 2);
        assert!(cache.get("/b.jpg").is_none());
        assert!(cache.get("/a.jpg").is_some());
        assert!(cache.get("/c.jpg").is_some());
    }

    #[test]
    fn test_reinsert_replaces() {
        let mut cache = ImageCache::new(2);
        cache.insert(page("/a.jpg"), 1u8);
        cache.insert(page("/a.jpg"), 9);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("/a.jpg").map(|c| c.handle), Some(9));
    }

    #[test]
    fn test_zero_capacity_disables() {
        let mut cache = ImageCache::new(0);
        cache.insert(page("/a.jpg"), 1u8);
        assert!(cache.is_empty());
        assert!(cache.get("/a.jpg").is_none());
    }

    #[test]
    fn test_capacity() {
        assert_eq!(ImageCache::<u8>::new(16).capacity(), 16);
        assert_eq!(ImageCache::<u8>::new(0).capacity(), 0);
    }
}
