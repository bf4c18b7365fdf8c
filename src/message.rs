//! Application message types.
//!
//! Every DOM event, timer and load callback reaches the app as a message in
//! the Elm architecture style. `H` is the platform's decoded image handle.

use hummaps_view::{AnimationToken, InputEvent, LoadTicket, Size};
use web_time::Instant;

/// Messages that can be sent to update application state.
#[derive(Debug, Clone)]
pub enum Message<H> {
    // Navigation
    /// Map list item clicked
    SelectMap(usize),
    /// "Maps" button: switch between list and map view
    ToggleView,
    /// Next button: next page in map view, next map in list view
    Next,
    /// Previous button
    Prev,

    // Map frame
    /// Pointer, wheel or key input
    Input(InputEvent),
    /// Zoom buttons: multiply the current scale about the viewport center
    Zoom(f64),
    /// The map frame changed size
    Resized(Size),
    /// Search dialog or query field gained (true) or lost (false) focus
    SearchFocus(bool),

    // Platform callbacks
    /// A page image finished decoding
    ImageLoaded {
        ticket: LoadTicket,
        handle: H,
        width: u32,
        height: u32,
    },
    /// A page image failed to load
    ImageFailed { ticket: LoadTicket, message: String },
    /// The loading indicator delay ran out
    LoaderTimeout(LoadTicket),
    /// Display frame for a kinetic pan
    AnimationFrame { token: AnimationToken, now: Instant },
}
