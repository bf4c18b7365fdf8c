//! Map and page navigation.
//!
//! A search result is a list of maps, each with one or more scanned pages.
//! Disabled maps (no scans on file) stay in the list but can't be opened or
//! stepped onto.

use hummaps_view::ImageSource;
use serde::{Deserialize, Serialize};

/// One map in the result list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapEntry {
    /// Display name, e.g. "RS 12/34"
    pub name: String,
    /// Page images in order
    #[serde(default)]
    pub pages: Vec<ImageSource>,
    /// Listed but not viewable
    #[serde(default)]
    pub disabled: bool,
}

impl MapEntry {
    pub fn new(name: impl Into<String>, pages: Vec<ImageSource>) -> Self {
        Self {
            name: name.into(),
            pages,
            disabled: false,
        }
    }

    pub fn disabled(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pages: Vec::new(),
            disabled: true,
        }
    }

    /// True if the map can be opened.
    pub fn is_selectable(&self) -> bool {
        !self.disabled && !self.pages.is_empty()
    }
}

/// Which part of the content area is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    List,
    Map,
}

/// What the app must do after a navigation step.
#[derive(Debug, Clone, PartialEq)]
pub enum NavOutcome {
    /// Show this page in the map frame
    ShowPage(ImageSource),
    /// Show the map list
    ShowList,
    /// Nothing to do
    Unchanged,
}

/// Current map, page and view mode.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    maps: Vec<MapEntry>,
    current: Option<usize>,
    /// 1-based page number within the current map
    page: usize,
    mode: ViewMode,
}

impl Navigator {
    /// Start in list view with the first selectable map highlighted.
    pub fn new(maps: Vec<MapEntry>) -> Self {
        let current = maps.iter().position(MapEntry::is_selectable);
        if current.is_none() && !maps.is_empty() {
            log::info!("None of the {} maps has page images", maps.len());
        }
        Self {
            maps,
            current,
            page: 1,
            mode: ViewMode::List,
        }
    }

    pub fn maps(&self) -> &[MapEntry] {
        &self.maps
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_map(&self) -> Option<&MapEntry> {
        self.current.and_then(|i| self.maps.get(i))
    }

    /// 1-based page number.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        self.current_map().map_or(0, |m| m.pages.len())
    }

    /// Image of the current page.
    pub fn current_source(&self) -> Option<&ImageSource> {
        self.current_map()
            .and_then(|m| m.pages.get(self.page.saturating_sub(1)))
    }

    /// Open a map from the list at its first page.
    pub fn select(&mut self, index: usize) -> NavOutcome {
        match self.maps.get(index) {
            Some(map) if map.is_selectable() => {
                log::debug!("Selected map {} ({})", index, map.name);
                self.current = Some(index);
                self.page = 1;
                self.show_map()
            }
            Some(map) => {
                log::debug!("Ignoring disabled map {}", map.name);
                NavOutcome::Unchanged
            }
            None => NavOutcome::Unchanged,
        }
    }

    pub fn show_list(&mut self) -> NavOutcome {
        self.mode = ViewMode::List;
        NavOutcome::ShowList
    }

    /// Show the current page. Stays in list view if no map is selectable.
    pub fn show_map(&mut self) -> NavOutcome {
        match self.current_source().cloned() {
            Some(source) => {
                self.mode = ViewMode::Map;
                NavOutcome::ShowPage(source)
            }
            None => NavOutcome::Unchanged,
        }
    }

    pub fn toggle_view(&mut self) -> NavOutcome {
        match self.mode {
            ViewMode::List => self.show_map(),
            ViewMode::Map => self.show_list(),
        }
    }

    /// Next page in map view, next map in list view.
    pub fn next(&mut self) -> NavOutcome {
        match self.mode {
            ViewMode::List => self.next_map(),
            ViewMode::Map => self.next_page(),
        }
    }

    /// Previous page in map view, previous map in list view.
    pub fn prev(&mut self) -> NavOutcome {
        match self.mode {
            ViewMode::List => self.prev_map(),
            ViewMode::Map => self.prev_page(),
        }
    }

    /// Next page; past the last page moves on to the next map.
    pub fn next_page(&mut self) -> NavOutcome {
        if self.current.is_none() {
            return NavOutcome::Unchanged;
        }
        if self.page >= self.page_count() {
            self.next_map()
        } else {
            self.page += 1;
            self.show_map()
        }
    }

    /// Previous page; before the first page moves to the last page of the
    /// previous map.
    pub fn prev_page(&mut self) -> NavOutcome {
        if self.current.is_none() {
            return NavOutcome::Unchanged;
        }
        if self.page <= 1 {
            self.step_back(true)
        } else {
            self.page -= 1;
            self.show_map()
        }
    }

    pub fn next_map(&mut self) -> NavOutcome {
        let Some(current) = self.current else {
            return NavOutcome::Unchanged;
        };
        let next = self
            .maps
            .iter()
            .enumerate()
            .skip(current + 1)
            .find(|(_, m)| m.is_selectable())
            .map(|(i, _)| i);

        match next {
            Some(index) => {
                self.current = Some(index);
                self.page = 1;
                self.refresh()
            }
            None => NavOutcome::Unchanged,
        }
    }

    /// Previous map, at its first page.
    pub fn prev_map(&mut self) -> NavOutcome {
        self.step_back(false)
    }

    /// Move to the previous selectable map. `last_page` only applies in map
    /// view; the list always highlights a map at its first page.
    fn step_back(&mut self, last_page: bool) -> NavOutcome {
        let Some(current) = self.current else {
            return NavOutcome::Unchanged;
        };
        let prev = self.maps[..current].iter().rposition(MapEntry::is_selectable);

        match prev {
            Some(index) => {
                self.current = Some(index);
                self.page = match self.mode {
                    ViewMode::Map if last_page => self.page_count(),
                    _ => 1,
                };
                self.refresh()
            }
            None => NavOutcome::Unchanged,
        }
    }

    fn refresh(&mut self) -> NavOutcome {
        match self.mode {
            ViewMode::List => NavOutcome::ShowList,
            ViewMode::Map => self.show_map(),
        }
    }
}
