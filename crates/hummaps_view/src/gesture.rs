//! Turns raw input events into viewport intents.
//!
//! One contact (mouse or finger) pans, two contacts pinch. Wheel notches and
//! `+`/`-` keys zoom in steps, space and `0` reset to fit.

use std::collections::VecDeque;

use web_time::{Duration, Instant};

use crate::config::ViewerConfig;
use crate::event::{InputEvent, Intent, Key, PointerId};
use crate::geometry::Point;
use crate::viewport::ViewportState;

/// State captured between a gesture's start and end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSession {
    /// Image offset when the gesture started
    pub start_offset: Point,
    /// Scale when the gesture started
    pub start_scale: f64,
    /// Contact position (pan) or centroid (pinch) at start
    pub start_center: Point,
    /// Release velocity in px/ms, filled in when the gesture ends
    pub velocity: Point,
}

impl GestureSession {
    fn begin(state: Option<&ViewportState>, center: Point) -> Self {
        Self {
            start_offset: state.map_or(Point::zero(), |s| s.offset),
            start_scale: state.map_or(0.0, |s| s.scale),
            start_center: center,
            velocity: Point::zero(),
        }
    }
}

/// Estimates release velocity from recent pointer samples.
#[derive(Debug, Clone)]
struct VelocityTracker {
    samples: VecDeque<(Instant, Point)>,
    window: Duration,
}

impl VelocityTracker {
    fn new(window: Duration, time: Instant, position: Point) -> Self {
        let mut tracker = Self {
            samples: VecDeque::new(),
            window,
        };
        tracker.push(time, position);
        tracker
    }

    fn push(&mut self, time: Instant, position: Point) {
        self.samples.push_back((time, position));
        while let Some(&(oldest, _)) = self.samples.front() {
            if time.saturating_duration_since(oldest) > self.window {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    /// Velocity in px/ms over the sample window.
    fn velocity(&self) -> Point {
        let (Some(&(t0, p0)), Some(&(t1, p1))) = (self.samples.front(), self.samples.back()) else {
            return Point::zero();
        };
        let elapsed_ms = t1.saturating_duration_since(t0).as_secs_f64() * 1000.0;
        if elapsed_ms <= 0.0 {
            return Point::zero();
        }
        (p1 - p0) * elapsed_ms.recip()
    }
}

/// How a two-contact gesture was recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PinchMode {
    Undecided,
    Zoom,
    /// Two-finger vertical scroll; never zooms
    Scroll,
}

#[derive(Debug, Clone)]
enum Tracking {
    Idle,
    Pan {
        id: PointerId,
        start: Point,
        session: GestureSession,
        tracker: VelocityTracker,
    },
    Pinch {
        ids: [PointerId; 2],
        start_distance: f64,
        session: GestureSession,
        mode: PinchMode,
    },
}

/// Recognizes pan, pinch, wheel and key gestures.
#[derive(Debug, Clone)]
pub struct GestureAdapter {
    config: ViewerConfig,
    contacts: Vec<(PointerId, Point)>,
    tracking: Tracking,
    last_session: Option<GestureSession>,
}

impl GestureAdapter {
    /// Create an idle adapter using the thresholds in `config`.
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            contacts: Vec::with_capacity(2),
            tracking: Tracking::Idle,
            last_session: None,
        }
    }

    /// True while a pan or pinch is in progress.
    pub fn is_active(&self) -> bool {
        !matches!(self.tracking, Tracking::Idle)
    }

    /// Session of the most recently finished pan, with its release velocity.
    pub fn last_session(&self) -> Option<&GestureSession> {
        self.last_session.as_ref()
    }

    /// Drop all contacts, e.g. when the page is replaced mid-gesture.
    pub fn reset(&mut self) {
        self.contacts.clear();
        self.tracking = Tracking::Idle;
    }

    /// Translate one event. `state` is `None` while no page is on screen; contacts
    /// are still tracked but nothing is requested.
    pub fn handle(&mut self, event: &InputEvent, state: Option<&ViewportState>) -> Vec<Intent> {
        match *event {
            InputEvent::Wheel { delta, position } => self.wheel(delta, position, state),
            InputEvent::Key(key) => self.key(key, state),
            InputEvent::PointerDown { id, position, time } => self.pointer_down(id, position, time, state),
            InputEvent::PointerMove { id, position, time } => self.pointer_move(id, position, time, state),
            InputEvent::PointerUp { id, position, time } => {
                self.pointer_up(id, Some(position), time, state)
            }
            InputEvent::PointerCancel { id, time } => self.pointer_up(id, None, time, state),
        }
    }

    fn wheel(&self, delta: f64, position: Point, state: Option<&ViewportState>) -> Vec<Intent> {
        let Some(state) = state else {
            return Vec::new();
        };
        let scale = if delta > 0.0 {
            state.scale * self.config.zoom_step
        } else if delta < 0.0 {
            state.scale / self.config.zoom_step
        } else {
            return Vec::new();
        };
        vec![Intent::ZoomTo {
            scale,
            origin: Some(position),
        }]
    }

    fn key(&self, key: Key, state: Option<&ViewportState>) -> Vec<Intent> {
        let Some(state) = state else {
            return Vec::new();
        };
        let intent = match key {
            Key::Char('+') | Key::Char('=') => Intent::ZoomTo {
                scale: state.scale * self.config.zoom_step,
                origin: None,
            },
            Key::Char('-') => Intent::ZoomTo {
                scale: state.scale / self.config.zoom_step,
                origin: None,
            },
            Key::Space | Key::Char('0') => Intent::Reset,
            _ => return Vec::new(),
        };
        vec![intent]
    }

    fn contact(&self, id: PointerId) -> Option<Point> {
        self.contacts.iter().find(|(c, _)| *c == id).map(|(_, p)| *p)
    }

    fn pointer_down(
        &mut self,
        id: PointerId,
        position: Point,
        time: Instant,
        state: Option<&ViewportState>,
    ) -> Vec<Intent> {
        if let Some(contact) = self.contacts.iter_mut().find(|(c, _)| *c == id) {
            contact.1 = position;
        } else if self.contacts.len() < 2 {
            self.contacts.push((id, position));
        } else {
            // Third and further contacts are ignored
            return Vec::new();
        }

        match (self.contacts.first().copied(), self.contacts.get(1).copied()) {
            (Some((id, position)), None) => self.begin_pan(id, position, time, state),
            (Some((a, pa)), Some((b, pb))) => {
                let center = pa.midpoint(pb);
                log::debug!("Pinch start at ({:.1}, {:.1})", center.x, center.y);
                self.tracking = Tracking::Pinch {
                    ids: [a, b],
                    start_distance: pa.distance(pb),
                    session: GestureSession::begin(state, center),
                    mode: PinchMode::Undecided,
                };
            }
            _ => {}
        }

        // A new gesture always stops the running kinetic pan first
        vec![Intent::StopKinetic]
    }

    fn begin_pan(&mut self, id: PointerId, position: Point, time: Instant, state: Option<&ViewportState>) {
        self.tracking = Tracking::Pan {
            id,
            start: position,
            session: GestureSession::begin(state, position),
            tracker: VelocityTracker::new(self.config.velocity_window(), time, position),
        };
    }

    fn pointer_move(
        &mut self,
        id: PointerId,
        position: Point,
        time: Instant,
        state: Option<&ViewportState>,
    ) -> Vec<Intent> {
        match self.contacts.iter_mut().find(|(c, _)| *c == id) {
            Some(contact) => contact.1 = position,
            None => return Vec::new(),
        }

        let pinch_points = match &self.tracking {
            Tracking::Pinch { ids: [a, b], .. } => self.contact(*a).zip(self.contact(*b)),
            _ => None,
        };

        match &mut self.tracking {
            Tracking::Pan {
                id: pan_id,
                start,
                session,
                tracker,
            } if *pan_id == id => {
                tracker.push(time, position);
                match state {
                    Some(state) if state.is_zoomed() => {
                        vec![Intent::PanTo(session.start_offset + (position - *start))]
                    }
                    _ => Vec::new(),
                }
            }
            Tracking::Pinch {
                start_distance,
                session,
                mode,
                ..
            } => {
                let Some((pa, pb)) = pinch_points else {
                    return Vec::new();
                };
                if *start_distance <= 0.0 || state.is_none() {
                    return Vec::new();
                }

                let ratio = pa.distance(pb) / *start_distance;
                let center = pa.midpoint(pb);

                if *mode == PinchMode::Undecided {
                    if (1.0 - ratio).abs() > self.config.pinch_zoom_threshold {
                        *mode = PinchMode::Zoom;
                    } else if (center.y - session.start_center.y).abs() > self.config.double_scroll_threshold {
                        log::debug!("Two-finger gesture recognized as scroll");
                        *mode = PinchMode::Scroll;
                    }
                }

                if *mode == PinchMode::Zoom {
                    vec![Intent::ZoomTo {
                        scale: session.start_scale * ratio,
                        origin: Some(center),
                    }]
                } else {
                    Vec::new()
                }
            }
            _ => Vec::new(),
        }
    }

    fn pointer_up(
        &mut self,
        id: PointerId,
        position: Option<Point>,
        time: Instant,
        state: Option<&ViewportState>,
    ) -> Vec<Intent> {
        let Some(index) = self.contacts.iter().position(|(c, _)| *c == id) else {
            return Vec::new();
        };
        self.contacts.remove(index);

        match std::mem::replace(&mut self.tracking, Tracking::Idle) {
            Tracking::Pan {
                id: pan_id,
                mut session,
                mut tracker,
                ..
            } if pan_id == id => {
                if let Some(position) = position {
                    tracker.push(time, position);
                }
                session.velocity = tracker.velocity();
                self.last_session = Some(session);

                let zoomed = state.is_some_and(|s| s.is_zoomed());
                if zoomed && session.velocity.max_abs() > self.config.fling_velocity_threshold {
                    log::debug!(
                        "Fling with velocity ({:.3}, {:.3}) px/ms",
                        session.velocity.x,
                        session.velocity.y
                    );
                    return vec![Intent::Fling {
                        velocity: session.velocity,
                    }];
                }
                Vec::new()
            }
            Tracking::Pinch { ids, .. } if ids.contains(&id) => {
                // The remaining finger continues as a fresh pan
                if let Some(&(rest_id, rest_pos)) = self.contacts.first() {
                    self.begin_pan(rest_id, rest_pos, time, state);
                }
                Vec::new()
            }
            other => {
                self.tracking = other;
                Vec::new()
            }
        }
    }
}
