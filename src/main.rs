//! Native snapshot tool: renders one map page through the viewer the way the
//! browser would and writes the visible frame to a PNG.
//!
//! Usage: `hummaps-native <image> [zoom] [out.png]`

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::{Path, PathBuf};

    use hummaps::constants::{SNAPSHOT_HEIGHT, SNAPSHOT_WIDTH};
    use hummaps::image_cache::is_image_file;
    use hummaps::{AppConfig, AppEffect, ConfigError, MapEntry, MapViewer, Message, RasterSurface};
    use hummaps_view::{Effect, ImageSource, Size};
    use image::RgbaImage;

    #[derive(Debug, thiserror::Error)]
    pub enum NativeError {
        #[error("usage: hummaps-native <image> [zoom] [out.png]")]
        Usage,

        #[error("Not a supported image file: {0}")]
        UnsupportedFile(String),

        #[error("Invalid zoom factor '{0}'")]
        InvalidZoom(String),

        #[error("Failed to load {url}: {message}")]
        Load { url: String, message: String },

        #[error("Nothing was rendered")]
        NothingRendered,

        #[error(transparent)]
        Config(#[from] ConfigError),

        #[error("Image error: {0}")]
        Image(#[from] image::ImageError),
    }

    struct Args {
        input: PathBuf,
        zoom: f64,
        output: PathBuf,
    }

    fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, NativeError> {
        let input = args.next().ok_or(NativeError::Usage)?;
        if !is_image_file(&input) {
            return Err(NativeError::UnsupportedFile(input));
        }
        let zoom = match args.next() {
            Some(z) => z
                .parse::<f64>()
                .ok()
                .filter(|z| z.is_finite() && *z > 0.0)
                .ok_or(NativeError::InvalidZoom(z))?,
            None => 1.0,
        };
        let output = args
            .next()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("snapshot.png"));
        Ok(Args {
            input: PathBuf::from(input),
            zoom,
            output,
        })
    }

    fn decode(url: &str) -> Result<RgbaImage, NativeError> {
        log::info!("Decoding {}", url);
        Ok(image::open(Path::new(url))?.to_rgba8())
    }

    /// Run effects the way the browser shell would, synchronously.
    fn drive(
        viewer: &mut MapViewer<RgbaImage>,
        effects: Vec<AppEffect>,
    ) -> Result<(), NativeError> {
        let mut queue = effects;
        while let Some(effect) = queue.pop() {
            let next = match effect {
                AppEffect::Viewer(Effect::FetchImage { ticket, url }) => match decode(&url) {
                    Ok(page) => {
                        let (width, height) = page.dimensions();
                        viewer.update(Message::ImageLoaded {
                            ticket,
                            handle: page,
                            width,
                            height,
                        })
                    }
                    Err(e) => viewer.update(Message::ImageFailed {
                        ticket,
                        message: e.to_string(),
                    }),
                },
                AppEffect::Viewer(Effect::LoadFailed { url, message }) => {
                    return Err(NativeError::Load { url, message });
                }
                AppEffect::ShowMap(label) => {
                    log::info!("{} ({})", label.text, label.file_name);
                    Vec::new()
                }
                // Loads complete synchronously; no timers or frames to wait for
                other => {
                    log::trace!("Skipping {:?}", other);
                    Vec::new()
                }
            };
            queue.extend(next);
        }
        Ok(())
    }

    pub fn run(config: &AppConfig) -> Result<(), NativeError> {
        let args = parse_args(std::env::args().skip(1))?;

        let url = args.input.to_string_lossy().into_owned();
        let name = args
            .input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| url.clone());
        let maps = vec![MapEntry::new(name.clone(), vec![ImageSource::new(url, name)])];

        let size = Size::new(f64::from(SNAPSHOT_WIDTH), f64::from(SNAPSHOT_HEIGHT));
        let mut viewer = MapViewer::new(config, maps, size)?;

        let effects = viewer.update(Message::SelectMap(0));
        drive(&mut viewer, effects)?;
        let effects = viewer.update(Message::Zoom(args.zoom));
        drive(&mut viewer, effects)?;

        let mut surface = RasterSurface::new(SNAPSHOT_WIDTH, SNAPSHOT_HEIGHT);
        if !viewer.render(&mut surface) {
            return Err(NativeError::NothingRendered);
        }
        if let Some(state) = viewer.viewport_state() {
            log::info!(
                "Rendered at scale {:.3} (fit {:.3}), offset ({}, {})",
                state.scale,
                state.min_scale,
                state.offset.x,
                state.offset.y
            );
        }

        surface.into_image().save(&args.output)?;
        log::info!("Wrote {:?}", args.output);
        Ok(())
    }

    /// `RUST_LOG` overrides the configured level.
    pub fn init_logging(config: &AppConfig) {
        env_logger::Builder::new()
            .filter_level(config.log_level.to_level_filter())
            .parse_default_env()
            .init();
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn args(list: &[&str]) -> impl Iterator<Item = String> {
            list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
        }

        #[test]
        fn test_parse_args() {
            let parsed = parse_args(args(&["map.jpg", "2.5", "out.png"])).unwrap();
            assert_eq!(parsed.input, PathBuf::from("map.jpg"));
            assert_eq!(parsed.zoom, 2.5);
            assert_eq!(parsed.output, PathBuf::from("out.png"));

            let parsed = parse_args(args(&["map.tif"])).unwrap();
            assert_eq!(parsed.zoom, 1.0);
            assert_eq!(parsed.output, PathBuf::from("snapshot.png"));
        }

        #[test]
        fn test_parse_args_errors() {
            assert!(matches!(parse_args(args(&[])), Err(NativeError::Usage)));
            assert!(matches!(
                parse_args(args(&["notes.txt"])),
                Err(NativeError::UnsupportedFile(_))
            ));
            assert!(matches!(
                parse_args(args(&["map.png", "-1"])),
                Err(NativeError::InvalidZoom(_))
            ));
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    let config = hummaps::AppConfig::load_from_default_path().unwrap_or_default();
    native::init_logging(&config);
    match config.to_json() {
        Ok(json) => log::debug!("Configuration: {}", json),
        Err(e) => log::warn!("Could not serialize configuration: {}", e),
    }
    if let Err(e) = native::run(&config) {
        log::error!("{}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

// WASM doesn't use main(), it uses wasm_bindgen's start function
#[cfg(target_arch = "wasm32")]
fn main() {}
