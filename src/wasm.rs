//! Browser shell.
//!
//! Reads the map list the server rendered into the page, draws the current
//! page onto a canvas inside `#map-frame`, and turns DOM events, timers,
//! animation frames and image loads into [`Message`]s.

use std::cell::RefCell;
use std::rc::Rc;

use hummaps_view::{Effect, ImageSource, InputEvent, Key, Point, PointerId, Size, Surface};
use wasm_bindgen::JsCast;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlElement, HtmlImageElement,
    KeyboardEvent, MouseEvent, PointerEvent, WheelEvent, Window,
};
use web_time::Instant;

use crate::app::{AppEffect, MapLabel, MapViewer};
use crate::config::AppConfig;
use crate::constants::LOADING_CLASS;
use crate::message::Message;
use crate::navigation::MapEntry;

/// Draws onto a 2D canvas context.
struct CanvasSurface<'a> {
    ctx: &'a CanvasRenderingContext2d,
}

impl Surface for CanvasSurface<'_> {
    type Image = HtmlImageElement;

    fn clear(&mut self, viewport: Size) {
        self.ctx.clear_rect(0.0, 0.0, viewport.width, viewport.height);
    }

    fn draw_image(&mut self, image: &HtmlImageElement, scale: f64, offset: Point) {
        let width = f64::from(image.natural_width()) * scale;
        let height = f64::from(image.natural_height()) * scale;
        if let Err(e) =
            self.ctx
                .draw_image_with_html_image_element_and_dw_and_dh(image, offset.x, offset.y, width, height)
        {
            log::warn!("drawImage failed: {:?}", e);
        }
    }
}

struct Shell {
    app: MapViewer<HtmlImageElement>,
    window: Window,
    list: HtmlElement,
    frame: HtmlElement,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    label: Option<Element>,
    link: Option<HtmlElement>,
}

type SharedShell = Rc<RefCell<Shell>>;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    let config = AppConfig::load_from_local_storage().unwrap_or_default();
    if let Err(e) = console_log::init_with_level(config.log_level.to_level()) {
        web_sys::console::log_1(&format!("Logger init failed: {}", e).into());
    }

    if let Err(e) = run(config) {
        log::error!("Hummaps viewer failed to start: {:?}", e);
    }
}

fn run(config: AppConfig) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;

    let list = element::<HtmlElement>(&document, "#map-list")?;
    let frame = element::<HtmlElement>(&document, "#map-frame")?;

    let canvas = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()?;
    canvas.style().set_property("display", "block")?;
    canvas.style().set_property("touch-action", "none")?;
    frame.append_child(&canvas)?;

    let ctx = canvas
        .get_context("2d")?
        .ok_or("no 2d context")?
        .dyn_into::<CanvasRenderingContext2d>()?;

    let maps = read_map_list(&document)?;
    let size = measure(&frame);
    let app = MapViewer::new(&config, maps, size).map_err(|e| JsValue::from_str(&e.to_string()))?;

    let shell = Rc::new(RefCell::new(Shell {
        app,
        window: window.clone(),
        list,
        frame,
        canvas,
        ctx,
        label: document.query_selector("#map-label").ok().flatten(),
        link: document
            .query_selector("#map-link")
            .ok()
            .flatten()
            .and_then(|e| e.dyn_into::<HtmlElement>().ok()),
    }));

    show_list(&shell.borrow());
    bind_navigation(&shell, &document)?;
    bind_frame(&shell)?;
    bind_keyboard(&shell, &document)?;
    bind_search_focus(&shell, &document)?;
    bind_resize(&shell, &window)?;

    log::info!("Hummaps viewer ready");
    Ok(())
}

fn element<T: JsCast>(document: &Document, selector: &str) -> Result<T, JsValue> {
    document
        .query_selector(selector)?
        .ok_or_else(|| JsValue::from_str(&format!("missing {selector}")))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("{selector} has the wrong element type")))
}

/// Maps are `a.map-item` entries in `#map-list`; their page images sit in a
/// hidden `div.map-images`.
fn read_map_list(document: &Document) -> Result<Vec<MapEntry>, JsValue> {
    let items = document.query_selector_all("#map-list a.map-item")?;
    let mut maps = Vec::with_capacity(items.length() as usize);

    for i in 0..items.length() {
        let Some(item) = items.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        let disabled = item.class_list().contains("disabled");
        let name = item.get_attribute("data-name").unwrap_or_else(|| {
            item.text_content()
                .unwrap_or_default()
                .trim()
                .to_string()
        });

        let images = item.query_selector_all("div.map-images img")?;
        let mut pages = Vec::with_capacity(images.length() as usize);
        for j in 0..images.length() {
            let Some(img) = images.get(j).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let src = img
                .get_attribute("data-src")
                .or_else(|| img.get_attribute("src"));
            if let Some(src) = src {
                let alt = img.get_attribute("alt").unwrap_or_default();
                pages.push(ImageSource::new(src, alt));
            }
        }

        maps.push(MapEntry { name, pages, disabled });
    }

    log::debug!("Read {} maps from the page", maps.len());
    Ok(maps)
}

fn measure(frame: &HtmlElement) -> Size {
    Size::new(
        f64::from(frame.client_width().max(0)),
        f64::from(frame.client_height().max(0)),
    )
}

/// Tell the app if the frame size changed. A hidden frame measures 0x0, so
/// this also runs whenever the frame is shown.
fn sync_size(shell: &SharedShell) {
    let (measured, current) = {
        let shell = shell.borrow();
        (measure(&shell.frame), shell.app.controller().viewport().size())
    };
    if measured != current {
        dispatch(shell, Message::Resized(measured));
    }
}

fn dispatch(shell: &SharedShell, message: Message<HtmlImageElement>) {
    let effects = shell.borrow_mut().app.update(message);
    for effect in effects {
        perform(shell, effect);
    }
}

fn perform(shell: &SharedShell, effect: AppEffect) {
    match effect {
        AppEffect::ShowList => show_list(&shell.borrow()),
        AppEffect::ShowMap(label) => {
            show_map(&shell.borrow(), &label);
            sync_size(shell);
        }
        AppEffect::Viewer(effect) => {
            if let Err(e) = perform_viewer(shell, effect) {
                log::error!("Effect failed: {:?}", e);
            }
        }
    }
}

fn perform_viewer(shell: &SharedShell, effect: Effect) -> Result<(), JsValue> {
    match effect {
        Effect::FetchImage { ticket, url } => {
            let img = HtmlImageElement::new()?;

            let on_load = {
                let shell = Rc::clone(shell);
                let img = img.clone();
                Closure::once_into_js(move || {
                    let (width, height) = (img.natural_width(), img.natural_height());
                    dispatch(
                        &shell,
                        Message::ImageLoaded {
                            ticket,
                            handle: img,
                            width,
                            height,
                        },
                    );
                })
            };
            let on_error = {
                let shell = Rc::clone(shell);
                let url = url.clone();
                Closure::once_into_js(move || {
                    dispatch(
                        &shell,
                        Message::ImageFailed {
                            ticket,
                            message: format!("could not load {url}"),
                        },
                    );
                })
            };
            img.set_onload(Some(on_load.unchecked_ref()));
            img.set_onerror(Some(on_error.unchecked_ref()));
            img.set_src(&url);
        }
        Effect::ScheduleLoaderTimeout { ticket, delay } => {
            let callback = {
                let shell = Rc::clone(shell);
                Closure::once_into_js(move || dispatch(&shell, Message::LoaderTimeout(ticket)))
            };
            let window = shell.borrow().window.clone();
            window.set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                i32::try_from(delay.as_millis()).unwrap_or(i32::MAX),
            )?;
        }
        Effect::ShowLoadingIndicator => shell.borrow().frame.class_list().add_1(LOADING_CLASS)?,
        Effect::HideLoadingIndicator => shell.borrow().frame.class_list().remove_1(LOADING_CLASS)?,
        Effect::RequestAnimationFrame { token } => {
            let callback = {
                let shell = Rc::clone(shell);
                Closure::once_into_js(move |_timestamp: f64| {
                    dispatch(
                        &shell,
                        Message::AnimationFrame {
                            token,
                            now: Instant::now(),
                        },
                    );
                })
            };
            let window = shell.borrow().window.clone();
            window.request_animation_frame(callback.unchecked_ref())?;
        }
        Effect::Redraw => {
            let shell = shell.borrow();
            // Setting the canvas size clears it, so only when it changed
            let size = shell.app.controller().viewport().size();
            let (width, height) = (size.width.round() as u32, size.height.round() as u32);
            if shell.canvas.width() != width || shell.canvas.height() != height {
                shell.canvas.set_width(width);
                shell.canvas.set_height(height);
            }
            let mut surface = CanvasSurface { ctx: &shell.ctx };
            shell.app.render(&mut surface);
        }
        Effect::LoadFailed { url, message } => {
            log::error!("Failed to show {}: {}", url, message);
        }
    }
    Ok(())
}

fn show_list(shell: &Shell) {
    set_display(&shell.frame, "none");
    set_display(&shell.list, "");
}

fn show_map(shell: &Shell, label: &MapLabel) {
    set_display(&shell.list, "none");
    set_display(&shell.frame, "");
    if let Some(el) = &shell.label {
        el.set_text_content(Some(&label.text));
    }
    if let Some(link) = &shell.link {
        link.set_text_content(Some(&label.file_name));
        if let Err(e) = link.set_attribute("href", &label.url) {
            log::warn!("Could not set map link: {:?}", e);
        }
    }
}

fn set_display(el: &HtmlElement, value: &str) {
    if let Err(e) = el.style().set_property("display", value) {
        log::warn!("Could not set display: {:?}", e);
    }
}

/// Attach a listener that lives as long as the page.
fn listen<E: FromWasmAbi + 'static>(
    target: &web_sys::EventTarget,
    event: &str,
    handler: impl FnMut(E) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(E)>::new(handler);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn bind_navigation(shell: &SharedShell, document: &Document) -> Result<(), JsValue> {
    let list = shell.borrow().list.clone();
    let s = Rc::clone(shell);
    listen(&list, "click", move |e: MouseEvent| {
        let item = e
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|t| t.closest("a.map-item").ok().flatten());
        let Some(item) = item else {
            return;
        };
        e.prevent_default();
        let index = map_item_index(&item);
        if let Some(index) = index {
            dispatch(&s, Message::SelectMap(index));
        }
    })?;

    let buttons: [(&str, fn() -> Message<HtmlImageElement>); 3] = [
        ("#show-maps", || Message::ToggleView),
        ("#next", || Message::Next),
        ("#prev", || Message::Prev),
    ];
    for (selector, message) in buttons {
        let Some(button) = document.query_selector(selector)? else {
            log::debug!("No {} button on this page", selector);
            continue;
        };
        let s = Rc::clone(shell);
        listen(&button, "click", move |e: MouseEvent| {
            e.prevent_default();
            dispatch(&s, message());
        })?;
    }
    Ok(())
}

/// Position of a map item among its siblings in the list.
fn map_item_index(item: &Element) -> Option<usize> {
    let parent = item.parent_element()?;
    let siblings = parent.query_selector_all("a.map-item").ok()?;
    (0..siblings.length()).position(|i| {
        siblings
            .get(i)
            .is_some_and(|n| n.is_same_node(Some(item.as_ref())))
    })
}

fn pointer(e: &MouseEvent) -> Point {
    Point::new(f64::from(e.offset_x()), f64::from(e.offset_y()))
}

fn bind_frame(shell: &SharedShell) -> Result<(), JsValue> {
    let canvas = shell.borrow().canvas.clone();

    let s = Rc::clone(shell);
    listen(&canvas, "wheel", move |e: WheelEvent| {
        e.prevent_default();
        // Scrolling up (negative deltaY) zooms in
        let delta = -e.delta_y();
        if delta != 0.0 {
            dispatch(
                &s,
                Message::Input(InputEvent::Wheel {
                    delta,
                    position: pointer(&e),
                }),
            );
        }
    })?;

    let s = Rc::clone(shell);
    let target = canvas.clone();
    listen(&canvas, "pointerdown", move |e: PointerEvent| {
        e.prevent_default();
        if let Err(err) = target.set_pointer_capture(e.pointer_id()) {
            log::trace!("Pointer capture failed: {:?}", err);
        }
        dispatch(&s, Message::Input(pointer_event(&e, PointerPhase::Down)));
    })?;

    let s = Rc::clone(shell);
    listen(&canvas, "pointermove", move |e: PointerEvent| {
        dispatch(&s, Message::Input(pointer_event(&e, PointerPhase::Move)));
    })?;

    let s = Rc::clone(shell);
    listen(&canvas, "pointerup", move |e: PointerEvent| {
        dispatch(&s, Message::Input(pointer_event(&e, PointerPhase::Up)));
    })?;

    let s = Rc::clone(shell);
    listen(&canvas, "pointercancel", move |e: PointerEvent| {
        dispatch(&s, Message::Input(pointer_event(&e, PointerPhase::Cancel)));
    })?;

    Ok(())
}

enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}

fn pointer_event(e: &PointerEvent, phase: PointerPhase) -> InputEvent {
    let id: PointerId = e.pointer_id();
    let position = pointer(e);
    let time = Instant::now();
    match phase {
        PointerPhase::Down => InputEvent::PointerDown { id, position, time },
        PointerPhase::Move => InputEvent::PointerMove { id, position, time },
        PointerPhase::Up => InputEvent::PointerUp { id, position, time },
        PointerPhase::Cancel => InputEvent::PointerCancel { id, time },
    }
}

fn bind_keyboard(shell: &SharedShell, document: &Document) -> Result<(), JsValue> {
    let s = Rc::clone(shell);
    listen(document, "keydown", move |e: KeyboardEvent| {
        if e.ctrl_key() || e.meta_key() || e.alt_key() {
            return;
        }
        let Some(key) = Key::from_dom(&e.key()) else {
            return;
        };
        if s.borrow().app.claims_key(key) {
            e.prevent_default();
        }
        dispatch(&s, Message::Input(InputEvent::Key(key)));
    })
}

/// Mobile keyboards resize the window while the user types a query.
fn bind_search_focus(shell: &SharedShell, document: &Document) -> Result<(), JsValue> {
    for selector in ["#search-dialog", "#query"] {
        let Some(el) = document.query_selector(selector)? else {
            continue;
        };
        let s = Rc::clone(shell);
        listen(&el, "focusin", move |_: web_sys::Event| dispatch(&s, Message::SearchFocus(true)))?;
        let s = Rc::clone(shell);
        listen(&el, "focusout", move |_: web_sys::Event| dispatch(&s, Message::SearchFocus(false)))?;
    }
    Ok(())
}

fn bind_resize(shell: &SharedShell, window: &Window) -> Result<(), JsValue> {
    let s = Rc::clone(shell);
    listen(window, "resize", move |_: web_sys::Event| sync_size(&s))
}
