//! Hummaps map viewer application.
//!
//! Owns the map list navigation and the viewport controller for the map
//! frame. The platform shell turns DOM events and callbacks into [`Message`]s
//! and carries out the [`AppEffect`]s that `update` returns.

use hummaps_view::{
    Effect, ImageSource, InputEvent, Intent, Key, Size, Surface, ViewerController, ViewportState,
};
use web_time::Instant;

use crate::config::{AppConfig, ConfigError};
use crate::image_cache::ImageCache;
use crate::keybindings::{KeyAction, KeyBindings};
use crate::message::Message;
use crate::navigation::{MapEntry, NavOutcome, Navigator, ViewMode};

/// Caption shown above the map frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapLabel {
    /// Alt text of the page image
    pub text: String,
    /// File name of the page image, shown as a link to it
    pub file_name: String,
    pub url: String,
}

impl MapLabel {
    pub fn for_source(source: &ImageSource) -> Self {
        Self {
            text: source.alt_text.clone(),
            file_name: source.file_name().to_string(),
            url: source.source_url.clone(),
        }
    }
}

/// Side effects for the platform shell.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEffect {
    /// Viewport side effect
    Viewer(Effect),
    /// Hide the map frame, show the list
    ShowList,
    /// Hide the list, show the map frame with this caption
    ShowMap(MapLabel),
}

impl From<Effect> for AppEffect {
    fn from(effect: Effect) -> Self {
        AppEffect::Viewer(effect)
    }
}

/// The map viewer. `H` is the platform's decoded image handle.
pub struct MapViewer<H> {
    controller: ViewerController,
    navigator: Navigator,
    bindings: KeyBindings,
    cache: ImageCache<H>,
    /// Handle of the page currently in the viewport
    current: Option<H>,
    /// Search UI has focus; resizes come from the on-screen keyboard
    search_active: bool,
}

impl<H: Clone> MapViewer<H> {
    pub fn new(config: &AppConfig, maps: Vec<MapEntry>, size: Size) -> Result<Self, ConfigError> {
        let controller = ViewerController::new(config.viewer.clone(), size)?;
        let cache = ImageCache::new(config.image_cache_size);
        log::info!(
            "Map viewer with {} maps, caching up to {} pages",
            maps.len(),
            cache.capacity()
        );
        Ok(Self {
            controller,
            navigator: Navigator::new(maps),
            bindings: config.keybindings.to_keybindings(),
            cache,
            current: None,
            search_active: false,
        })
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn controller(&self) -> &ViewerController {
        &self.controller
    }

    pub fn viewport_state(&self) -> Option<&ViewportState> {
        self.controller.state()
    }

    pub fn image_cache(&self) -> &ImageCache<H> {
        &self.cache
    }

    /// Handle of the page in the viewport.
    pub fn current_handle(&self) -> Option<&H> {
        self.current.as_ref()
    }

    /// Caption for the page the navigator points at.
    pub fn label(&self) -> Option<MapLabel> {
        self.navigator.current_source().map(MapLabel::for_source)
    }

    /// True if `key` belongs to the viewer in the current view, so the
    /// browser should not scroll the page with it.
    pub fn claims_key(&self, key: Key) -> bool {
        if self.search_active {
            return false;
        }
        let in_map = self.navigator.mode() == ViewMode::Map;
        match self.bindings.action_for_key(key) {
            Some(action) => in_map || !action.requires_map_view(),
            None => in_map && key.is_zoom_key(),
        }
    }

    pub fn update(&mut self, message: Message<H>) -> Vec<AppEffect> {
        match message {
            Message::SelectMap(index) => {
                let outcome = self.navigator.select(index);
                self.navigate(outcome)
            }
            Message::ToggleView => {
                let outcome = self.navigator.toggle_view();
                self.navigate(outcome)
            }
            Message::Next => {
                let outcome = self.navigator.next();
                self.navigate(outcome)
            }
            Message::Prev => {
                let outcome = self.navigator.prev();
                self.navigate(outcome)
            }
            Message::Input(event) => self.handle_input(event),
            Message::Zoom(factor) => match self.controller.state() {
                Some(state) => {
                    let intent = Intent::ZoomTo {
                        scale: state.scale * factor,
                        origin: None,
                    };
                    viewer(self.controller.apply(intent, Instant::now()))
                }
                None => Vec::new(),
            },
            Message::Resized(size) => {
                if self.search_active {
                    log::debug!("Ignoring resize to {}x{} while searching", size.width, size.height);
                    return Vec::new();
                }
                viewer(self.controller.resize(size))
            }
            Message::SearchFocus(active) => {
                self.search_active = active;
                Vec::new()
            }
            Message::ImageLoaded {
                ticket,
                handle,
                width,
                height,
            } => {
                if !self.controller.is_current_load(ticket) {
                    log::debug!("Dropping stale image {:?}", ticket);
                    return Vec::new();
                }
                let url = self.controller.pending_image().map(|s| s.source_url.clone());
                let effects = self.controller.image_loaded(ticket, width, height);
                let shown = self
                    .controller
                    .current_image()
                    .filter(|metadata| Some(&metadata.source_url) == url.as_ref());
                if let Some(metadata) = shown {
                    self.cache.insert(metadata.clone(), handle.clone());
                    self.current = Some(handle);
                }
                viewer(effects)
            }
            Message::ImageFailed { ticket, message } => viewer(self.controller.image_failed(ticket, message)),
            Message::LoaderTimeout(ticket) => viewer(self.controller.loader_timeout(ticket)),
            Message::AnimationFrame { token, now } => viewer(self.controller.animation_frame(token, now)),
        }
    }

    /// Draw the current page. Returns false if there is nothing to draw.
    pub fn render<S: Surface<Image = H>>(&self, surface: &mut S) -> bool {
        match &self.current {
            Some(handle) => self.controller.render(surface, handle),
            None => false,
        }
    }

    fn handle_input(&mut self, event: InputEvent) -> Vec<AppEffect> {
        if let InputEvent::Key(key) = event {
            if self.search_active {
                return Vec::new();
            }
            if let Some(action) = self.bindings.action_for_key(key) {
                return self.key_action(action);
            }
        }
        if self.navigator.mode() != ViewMode::Map {
            return Vec::new();
        }
        viewer(self.controller.handle_input(&event))
    }

    fn key_action(&mut self, action: KeyAction) -> Vec<AppEffect> {
        if action.requires_map_view() && self.navigator.mode() != ViewMode::Map {
            return Vec::new();
        }
        let outcome = match action {
            KeyAction::ShowList => self.navigator.show_list(),
            KeyAction::PrevPage => self.navigator.prev_page(),
            KeyAction::NextPage => self.navigator.next_page(),
            KeyAction::PrevMap => self.navigator.prev_map(),
            KeyAction::NextMap => self.navigator.next_map(),
        };
        self.navigate(outcome)
    }

    fn navigate(&mut self, outcome: NavOutcome) -> Vec<AppEffect> {
        match outcome {
            NavOutcome::Unchanged => Vec::new(),
            NavOutcome::ShowList => {
                let mut effects = vec![AppEffect::ShowList];
                effects.extend(self.controller.clear().into_iter().map(AppEffect::from));
                self.current = None;
                effects
            }
            NavOutcome::ShowPage(source) => {
                let mut effects = vec![AppEffect::ShowMap(MapLabel::for_source(&source))];
                match self.cache.get(&source.source_url) {
                    Some(cached) => {
                        log::debug!("Showing cached {}", source.source_url);
                        self.current = Some(cached.handle);
                        effects.extend(viewer(self.controller.show_loaded(cached.metadata)));
                    }
                    None => effects.extend(viewer(self.controller.show_image(source))),
                }
                effects
            }
        }
    }
}

fn viewer(effects: Vec<Effect>) -> Vec<AppEffect> {
    effects.into_iter().map(AppEffect::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hummaps_view::{LoadTicket, Point};

    /// Stand-in image handle: just the URL it was decoded from.
    type Handle = String;

    fn pages(name: &str, count: usize) -> Vec<ImageSource> {
        (1..=count)
            .map(|p| ImageSource::new(format!("/maps/{name}/{name}-{p:03}.jpg"), format!("{name} page {p}")))
            .collect()
    }

    fn viewer_app() -> MapViewer<Handle> {
        let maps = vec![
            MapEntry::new("rs1", pages("rs1", 2)),
            MapEntry::disabled("cr2"),
            MapEntry::new("pm3", pages("pm3", 1)),
        ];
        MapViewer::new(&AppConfig::default(), maps, Size::new(800.0, 600.0)).unwrap()
    }

    fn fetch(effects: &[AppEffect]) -> Option<(LoadTicket, String)> {
        effects.iter().find_map(|e| match e {
            AppEffect::Viewer(Effect::FetchImage { ticket, url }) => Some((*ticket, url.clone())),
            _ => None,
        })
    }

    /// Simulate the shell decoding whatever was fetched.
    fn complete(app: &mut MapViewer<Handle>, effects: &[AppEffect]) -> Vec<AppEffect> {
        let (ticket, url) = fetch(effects).unwrap();
        app.update(Message::ImageLoaded {
            ticket,
            handle: url,
            width: 4000,
            height: 3000,
        })
    }

    fn key(app: &mut MapViewer<Handle>, key: Key) -> Vec<AppEffect> {
        app.update(Message::Input(InputEvent::Key(key)))
    }

    #[test]
    fn test_select_fetches_first_page() {
        let mut app = viewer_app();
        let effects = app.update(Message::SelectMap(0));

        assert_eq!(
            effects[0],
            AppEffect::ShowMap(MapLabel {
                text: "rs1 page 1".to_string(),
                file_name: "rs1-001.jpg".to_string(),
                url: "/maps/rs1/rs1-001.jpg".to_string(),
            })
        );
        assert_eq!(fetch(&effects).unwrap().1, "/maps/rs1/rs1-001.jpg");

        let loaded = complete(&mut app, &effects);
        assert_eq!(loaded, vec![AppEffect::Viewer(Effect::Redraw)]);
        assert_eq!(app.current_handle().map(String::as_str), Some("/maps/rs1/rs1-001.jpg"));
        assert_eq!(app.viewport_state().unwrap().scale, 0.2);
    }

    #[test]
    fn test_revisit_uses_cache() {
        let mut app = viewer_app();
        let effects = app.update(Message::SelectMap(0));
        complete(&mut app, &effects);

        let effects = key(&mut app, Key::Right);
        complete(&mut app, &effects);
        assert_eq!(app.image_cache().len(), 2);

        // Back to page 1: no fetch, drawn at once
        let effects = key(&mut app, Key::Left);
        assert!(fetch(&effects).is_none());
        assert!(effects.contains(&AppEffect::Viewer(Effect::Redraw)));
        assert_eq!(app.current_handle().map(String::as_str), Some("/maps/rs1/rs1-001.jpg"));
    }

    #[test]
    fn test_stale_load_does_not_replace_page() {
        let mut app = viewer_app();
        let first = app.update(Message::SelectMap(0));
        let second = key(&mut app, Key::Right);

        assert!(complete(&mut app, &first).is_empty());
        assert!(app.current_handle().is_none());
        assert!(app.image_cache().is_empty());

        complete(&mut app, &second);
        assert_eq!(app.current_handle().map(String::as_str), Some("/maps/rs1/rs1-002.jpg"));
    }

    #[test]
    fn test_escape_shows_list_and_cancels_load() {
        let mut app = viewer_app();
        let effects = app.update(Message::SelectMap(0));
        let (ticket, _) = fetch(&effects).unwrap();
        app.update(Message::LoaderTimeout(ticket));

        let effects = key(&mut app, Key::Escape);
        assert_eq!(
            effects,
            vec![
                AppEffect::ShowList,
                AppEffect::Viewer(Effect::HideLoadingIndicator)
            ]
        );
        assert_eq!(app.navigator().mode(), ViewMode::List);
        let late = app.update(Message::ImageLoaded {
            ticket,
            handle: String::new(),
            width: 4000,
            height: 3000,
        });
        assert!(late.is_empty());
    }

    #[test]
    fn test_page_keys_ignored_in_list_view() {
        let mut app = viewer_app();
        assert!(key(&mut app, Key::Right).is_empty());
        // Map keys still step the highlighted map
        assert_eq!(key(&mut app, Key::Down), vec![AppEffect::ShowList]);
        assert_eq!(app.navigator().current_index(), Some(2));
    }

    #[test]
    fn test_zoom_keys_reach_viewport() {
        let mut app = viewer_app();
        let effects = app.update(Message::SelectMap(0));
        complete(&mut app, &effects);

        assert_eq!(key(&mut app, Key::Char('+')), vec![AppEffect::Viewer(Effect::Redraw)]);
        assert!((app.viewport_state().unwrap().scale - 0.27).abs() < 1e-9);
        key(&mut app, Key::Space);
        assert_eq!(app.viewport_state().unwrap().scale, 0.2);
    }

    #[test]
    fn test_claims_keys_for_current_view() {
        let mut app = viewer_app();
        assert!(app.claims_key(Key::Down));
        assert!(!app.claims_key(Key::Right));
        assert!(!app.claims_key(Key::Space));

        let effects = app.update(Message::SelectMap(0));
        complete(&mut app, &effects);
        assert!(app.claims_key(Key::Right));
        assert!(app.claims_key(Key::Up));
        // Zooming out at fit does nothing but must not scroll the page either
        assert!(key(&mut app, Key::Char('-')).is_empty());
        assert!(app.claims_key(Key::Char('-')));
        assert!(!app.claims_key(Key::Char('x')));

        app.update(Message::SearchFocus(true));
        assert!(!app.claims_key(Key::Space));
    }

    #[test]
    fn test_zoom_message() {
        let mut app = viewer_app();
        assert!(app.update(Message::Zoom(2.0)).is_empty());

        let effects = app.update(Message::SelectMap(0));
        complete(&mut app, &effects);
        app.update(Message::Zoom(2.0));
        assert_eq!(app.viewport_state().unwrap().scale, 0.4);
    }

    #[test]
    fn test_resize_locked_while_searching() {
        let mut app = viewer_app();
        let effects = app.update(Message::SelectMap(0));
        complete(&mut app, &effects);

        app.update(Message::SearchFocus(true));
        assert!(app.update(Message::Resized(Size::new(400.0, 300.0))).is_empty());
        assert_eq!(app.viewport_state().unwrap().scale, 0.2);
        // Typing in the query field doesn't navigate
        assert!(key(&mut app, Key::Escape).is_empty());

        app.update(Message::SearchFocus(false));
        app.update(Message::Resized(Size::new(400.0, 300.0)));
        assert_eq!(app.viewport_state().unwrap().scale, 0.1);
    }

    #[test]
    fn test_pointer_input_ignored_in_list_view() {
        let mut app = viewer_app();
        let event = InputEvent::Wheel {
            delta: 1.0,
            position: Point::new(10.0, 10.0),
        };
        assert!(app.update(Message::Input(event)).is_empty());
    }

    #[test]
    fn test_failed_load() {
        let mut app = viewer_app();
        let effects = app.update(Message::SelectMap(2));
        let (ticket, url) = fetch(&effects).unwrap();
        let effects = app.update(Message::ImageFailed {
            ticket,
            message: "404 Not Found".to_string(),
        });
        assert_eq!(
            effects,
            vec![AppEffect::Viewer(Effect::LoadFailed {
                url,
                message: "404 Not Found".to_string()
            })]
        );
        assert!(app.current_handle().is_none());
    }

    #[test]
    fn test_label_follows_navigation() {
        let mut app = viewer_app();
        assert_eq!(app.label().unwrap().file_name, "rs1-001.jpg");
        app.update(Message::Next);
        assert_eq!(app.label().unwrap().text, "pm3 page 1");
    }
}
