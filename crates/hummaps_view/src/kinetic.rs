//! Inertial pan after a fling.
//!
//! The offset eases out exponentially towards `start + amplitude * velocity`.

use web_time::{Duration, Instant};

use crate::config::ViewerConfig;
use crate::geometry::Point;

/// Generation id of one kinetic animation. Frames carrying an older token are
/// ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationToken(u64);

/// Result of advancing the animation by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KineticStep {
    /// Token was superseded or cancelled; do nothing.
    Stale,
    /// Move to this offset and request another frame.
    Continue(Point),
    /// Move to this offset; the animation is over.
    Finished(Point),
}

#[derive(Debug, Clone, Copy)]
struct Flight {
    token: AnimationToken,
    start_offset: Point,
    final_delta: Point,
    started: Instant,
}

/// Glides the image after a fling, decaying exponentially toward
/// `velocity * amplitude`. At most one flight runs; starting a new one
/// makes the old token stale.
#[derive(Debug, Clone)]
pub struct KineticAnimator {
    amplitude: f64,
    time_constant: Duration,
    stop_distance: f64,
    generation: u64,
    flight: Option<Flight>,
}

impl KineticAnimator {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            amplitude: config.kinetic_amplitude,
            time_constant: config.kinetic_time_constant(),
            stop_distance: config.kinetic_stop_distance,
            generation: 0,
            flight: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.flight.is_some()
    }

    /// Total distance the running animation will travel.
    pub fn final_delta(&self) -> Option<Point> {
        self.flight.map(|f| f.final_delta)
    }

    /// Start a new animation, superseding any running one.
    pub fn start(&mut self, start_offset: Point, velocity: Point, now: Instant) -> AnimationToken {
        self.generation += 1;
        let token = AnimationToken(self.generation);
        let final_delta = velocity * self.amplitude;
        log::debug!(
            "Kinetic pan {:?} towards delta ({:.1}, {:.1})",
            token,
            final_delta.x,
            final_delta.y
        );
        self.flight = Some(Flight {
            token,
            start_offset,
            final_delta,
            started: now,
        });
        token
    }

    /// Advance to `now`.
    pub fn tick(&mut self, token: AnimationToken, now: Instant) -> KineticStep {
        let Some(flight) = self.flight.filter(|f| f.token == token) else {
            return KineticStep::Stale;
        };

        let elapsed = now.saturating_duration_since(flight.started).as_secs_f64();
        let decay = 1.0 - (-elapsed / self.time_constant.as_secs_f64()).exp();
        let delta = (flight.final_delta * decay).round();
        let offset = flight.start_offset + delta;

        if (flight.final_delta - delta).max_abs() > self.stop_distance {
            KineticStep::Continue(offset)
        } else {
            self.flight = None;
            KineticStep::Finished(offset)
        }
    }

    /// Stop the running animation. Its pending frame will come back `Stale`.
    pub fn cancel(&mut self) {
        if let Some(flight) = self.flight.take() {
            log::trace!("Kinetic pan {:?} cancelled", flight.token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animator() -> KineticAnimator {
        KineticAnimator::new(&ViewerConfig::default())
    }

    #[test]
    fn test_final_delta_scales_velocity() {
        let mut k = animator();
        k.start(Point::zero(), Point::new(0.5, -0.2), Instant::now());
        assert_eq!(k.final_delta(), Some(Point::new(125.0, -50.0)));
    }

    #[test]
    fn test_first_frame_moves_partway() {
        let mut k = animator();
        let t0 = Instant::now();
        let token = k.start(Point::new(-100.0, 0.0), Point::new(0.5, 0.0), t0);

        // One time constant: 1 - 1/e of the way
        match k.tick(token, t0 + Duration::from_millis(125)) {
            KineticStep::Continue(p) => {
                assert_eq!(p.x, -100.0 + 79.0);
                assert_eq!(p.y, 0.0);
            }
            other => panic!("expected continue, got {other:?}"),
        }
    }

    #[test]
    fn test_converges_in_finite_frames() {
        let mut k = animator();
        let t0 = Instant::now();
        let token = k.start(Point::zero(), Point::new(0.5, 0.0), t0);

        let mut frames = 0;
        let end = loop {
            frames += 1;
            assert!(frames < 200, "animation did not stop");
            match k.tick(token, t0 + Duration::from_millis(16 * frames)) {
                KineticStep::Continue(_) => {}
                KineticStep::Finished(p) => break p,
                KineticStep::Stale => panic!("token went stale"),
            }
        };

        assert!((125.0 - end.x).abs() <= 4.0);
        assert!(!k.is_active());
        assert_eq!(k.tick(token, t0 + Duration::from_secs(5)), KineticStep::Stale);
    }

    #[test]
    fn test_new_start_makes_old_token_stale() {
        let mut k = animator();
        let t0 = Instant::now();
        let first = k.start(Point::zero(), Point::new(1.0, 0.0), t0);
        let second = k.start(Point::zero(), Point::new(-1.0, 0.0), t0);

        assert_ne!(first, second);
        assert_eq!(k.tick(first, t0 + Duration::from_millis(16)), KineticStep::Stale);
        assert!(matches!(
            k.tick(second, t0 + Duration::from_millis(16)),
            KineticStep::Continue(_)
        ));
    }

    #[test]
    fn test_cancel() {
        let mut k = animator();
        let t0 = Instant::now();
        let token = k.start(Point::zero(), Point::new(1.0, 1.0), t0);
        k.cancel();
        assert!(!k.is_active());
        assert_eq!(k.tick(token, t0 + Duration::from_millis(16)), KineticStep::Stale);
    }

    #[test]
    fn test_tiny_fling_finishes_at_once() {
        let mut k = animator();
        let t0 = Instant::now();
        let token = k.start(Point::new(5.0, 5.0), Point::new(0.01, 0.0), t0);
        assert!(matches!(
            k.tick(token, t0 + Duration::from_millis(16)),
            KineticStep::Finished(_)
        ));
    }
}
