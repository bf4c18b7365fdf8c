//! Global constants for the Hummaps viewer

/// Decoded page images kept for instant revisits
pub const DEFAULT_IMAGE_CACHE_SIZE: usize = 16;

/// Viewport size used by the native snapshot binary
pub const SNAPSHOT_WIDTH: u32 = 1024;
pub const SNAPSHOT_HEIGHT: u32 = 768;

/// Background behind the page where it doesn't fill the viewport (RGBA)
pub const BACKGROUND: [u8; 4] = [0x2b, 0x2b, 0x2b, 0xff];

/// Class set on the map frame while a slow page load is in progress
pub const LOADING_CLASS: &str = "loading";
