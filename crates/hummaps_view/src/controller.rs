//! Ties viewport, gestures, kinetic pan and loader gate together.
//!
//! The controller never touches the platform. Every operation returns the
//! [`Effect`]s the shell must carry out; the shell reports back through
//! [`ViewerController::image_loaded`], [`ViewerController::loader_timeout`] and
//! [`ViewerController::animation_frame`] with the ticket or token it was given.

use web_time::{Duration, Instant};

use crate::config::ViewerConfig;
use crate::error::{Result, ViewError};
use crate::event::{InputEvent, Intent};
use crate::geometry::Size;
use crate::gesture::GestureAdapter;
use crate::image::{ImageMetadata, ImageSource};
use crate::kinetic::{AnimationToken, KineticAnimator, KineticStep};
use crate::loader::{Completion, IndicatorChange, LoadTicket, LoaderGate};
use crate::render::Surface;
use crate::viewport::{Viewport, ViewportState};

/// Side effect requested from the platform shell.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Start decoding `url`; answer with `image_loaded` or `image_failed`.
    FetchImage { ticket: LoadTicket, url: String },
    /// Call `loader_timeout(ticket)` after `delay`.
    ScheduleLoaderTimeout { ticket: LoadTicket, delay: Duration },
    ShowLoadingIndicator,
    HideLoadingIndicator,
    /// Call `animation_frame(token, now)` on the next display frame.
    RequestAnimationFrame { token: AnimationToken },
    /// Call `render` with the current image.
    Redraw,
    /// An image could not be shown.
    LoadFailed { url: String, message: String },
}

impl From<IndicatorChange> for Effect {
    fn from(change: IndicatorChange) -> Self {
        match change {
            IndicatorChange::Show => Effect::ShowLoadingIndicator,
            IndicatorChange::Hide => Effect::HideLoadingIndicator,
        }
    }
}

/// Viewport controller for one display region.
#[derive(Debug, Clone)]
pub struct ViewerController {
    config: ViewerConfig,
    viewport: Viewport,
    gesture: GestureAdapter,
    kinetic: KineticAnimator,
    loader: LoaderGate,
    pending: Option<ImageSource>,
}

impl ViewerController {
    /// Create a controller for a region of `size`. Fails if `config` does
    /// not validate.
    pub fn new(config: ViewerConfig, size: Size) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            viewport: Viewport::new(size, config.max_scale),
            gesture: GestureAdapter::new(config.clone()),
            kinetic: KineticAnimator::new(&config),
            loader: LoaderGate::new(config.loader_delay()),
            pending: None,
            config,
        })
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn state(&self) -> Option<&ViewportState> {
        self.viewport.state()
    }

    /// Image currently on screen.
    pub fn current_image(&self) -> Option<&ImageMetadata> {
        self.viewport.image()
    }

    /// Image being fetched, if any.
    pub fn pending_image(&self) -> Option<&ImageSource> {
        self.pending.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loader.is_pending()
    }

    /// True if `ticket` belongs to the fetch in flight.
    pub fn is_current_load(&self, ticket: LoadTicket) -> bool {
        self.loader.is_current(ticket)
    }

    pub fn is_indicator_visible(&self) -> bool {
        self.loader.is_visible()
    }

    pub fn is_animating(&self) -> bool {
        self.kinetic.is_active()
    }

    /// Fetch and show `source`. The current page stays on screen until the
    /// new one has decoded.
    pub fn show_image(&mut self, source: ImageSource) -> Vec<Effect> {
        self.interrupt();
        let ticket = self.loader.begin();
        log::info!("Loading {}", source.source_url);

        let url = source.source_url.clone();
        self.pending = Some(source);
        vec![
            Effect::FetchImage { ticket, url },
            Effect::ScheduleLoaderTimeout {
                ticket,
                delay: self.loader.delay(),
            },
        ]
    }

    /// Show an image that is already decoded, bypassing the loader gate.
    pub fn show_loaded(&mut self, metadata: ImageMetadata) -> Vec<Effect> {
        self.interrupt();
        self.pending = None;
        let mut effects: Vec<Effect> = self.loader.cancel().map(Effect::from).into_iter().collect();
        effects.extend(self.display(metadata));
        effects
    }

    /// The fetch for `ticket` decoded to a `width` x `height` image.
    pub fn image_loaded(&mut self, ticket: LoadTicket, width: u32, height: u32) -> Vec<Effect> {
        let Completion::Current(change) = self.loader.complete(ticket) else {
            return Vec::new();
        };
        let mut effects: Vec<Effect> = change.map(Effect::from).into_iter().collect();
        let Some(source) = self.pending.take() else {
            return effects;
        };

        match ImageMetadata::new(source.clone(), width, height) {
            Ok(metadata) => effects.extend(self.display(metadata)),
            Err(err) => {
                log::warn!("Cannot show {}: {}", source.source_url, err);
                effects.push(Effect::LoadFailed {
                    url: source.source_url,
                    message: err.to_string(),
                });
            }
        }
        effects
    }

    /// The fetch for `ticket` failed.
    pub fn image_failed(&mut self, ticket: LoadTicket, message: impl Into<String>) -> Vec<Effect> {
        let Completion::Current(change) = self.loader.complete(ticket) else {
            return Vec::new();
        };
        let mut effects: Vec<Effect> = change.map(Effect::from).into_iter().collect();
        let message = message.into();
        let url = self.pending.take().map(|s| s.source_url).unwrap_or_default();
        log::warn!("Failed to load {}: {}", url, message);
        effects.push(Effect::LoadFailed { url, message });
        effects
    }

    /// The loader delay for `ticket` ran out.
    pub fn loader_timeout(&mut self, ticket: LoadTicket) -> Vec<Effect> {
        self.loader.timer_fired(ticket).map(Effect::from).into_iter().collect()
    }

    /// Advance the kinetic pan started with `token`.
    pub fn animation_frame(&mut self, token: AnimationToken, now: Instant) -> Vec<Effect> {
        match self.kinetic.tick(token, now) {
            KineticStep::Stale => Vec::new(),
            KineticStep::Continue(offset) => {
                let mut effects = Vec::with_capacity(2);
                if self.viewport.pan_to(offset) {
                    effects.push(Effect::Redraw);
                }
                effects.push(Effect::RequestAnimationFrame { token });
                effects
            }
            KineticStep::Finished(offset) => redraw_if(self.viewport.pan_to(offset)),
        }
    }

    /// Feed one input event through the gesture adapter.
    pub fn handle_input(&mut self, event: &InputEvent) -> Vec<Effect> {
        let now = event.time().unwrap_or_else(Instant::now);
        let intents = self.gesture.handle(event, self.viewport.state());
        intents.into_iter().flat_map(|intent| self.apply(intent, now)).collect()
    }

    /// Apply one intent. `now` timestamps a fling.
    pub fn apply(&mut self, intent: Intent, now: Instant) -> Vec<Effect> {
        match intent {
            Intent::PanBy { dx, dy } => redraw_if(self.viewport.pan(dx, dy)),
            Intent::PanTo(offset) => redraw_if(self.viewport.pan_to(offset)),
            Intent::ZoomTo { scale, origin } => {
                self.kinetic.cancel();
                redraw_if(self.viewport.zoom(scale, origin))
            }
            Intent::Reset => {
                self.kinetic.cancel();
                redraw_if(self.viewport.reset())
            }
            Intent::Fling { velocity } => match self.viewport.state() {
                Some(state) if state.is_zoomed() => {
                    let token = self.kinetic.start(state.offset, velocity, now);
                    vec![Effect::RequestAnimationFrame { token }]
                }
                _ => Vec::new(),
            },
            Intent::StopKinetic => {
                self.kinetic.cancel();
                Vec::new()
            }
        }
    }

    /// The display region changed size. The page returns to fit scale.
    pub fn resize(&mut self, size: Size) -> Vec<Effect> {
        self.interrupt();
        log::debug!("Viewport resized to {}x{}", size.width, size.height);
        redraw_if(self.viewport.resize(size))
    }

    /// Drop the current page and any load in flight.
    pub fn clear(&mut self) -> Vec<Effect> {
        self.interrupt();
        self.pending = None;
        self.viewport.clear_image();
        self.loader.cancel().map(Effect::from).into_iter().collect()
    }

    /// Draw the current page onto `surface`. Returns false if nothing is shown.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S, image: &S::Image) -> bool {
        self.viewport.render(surface, image)
    }

    fn interrupt(&mut self) {
        self.kinetic.cancel();
        self.gesture.reset();
    }

    fn display(&mut self, metadata: ImageMetadata) -> Vec<Effect> {
        match self.viewport.set_image(metadata) {
            Ok(()) => vec![Effect::Redraw],
            Err(ViewError::DegenerateViewport { width, height }) => {
                log::debug!("Image kept until the viewport has a size ({}x{})", width, height);
                Vec::new()
            }
            Err(err) => {
                log::warn!("{}", err);
                Vec::new()
            }
        }
    }
}

fn redraw_if(changed: bool) -> Vec<Effect> {
    if changed {
        vec![Effect::Redraw]
    } else {
        Vec::new()
    }
}
