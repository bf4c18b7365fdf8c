//! Delayed loading indicator.
//!
//! The indicator only appears when a fetch takes longer than the configured
//! delay, so fast loads never flash it.

use web_time::Duration;

/// Generation id of one image fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(u64);

/// What the shell should do with the loading indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorChange {
    Show,
    Hide,
}

/// Outcome of [`LoaderGate::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Ticket was superseded; ignore the result.
    Stale,
    /// Ticket was current; apply the result and the indicator change, if any.
    Current(Option<IndicatorChange>),
}

/// Shows the loading indicator only for loads that outlast the delay.
#[derive(Debug, Clone)]
pub struct LoaderGate {
    delay: Duration,
    generation: u64,
    pending: Option<LoadTicket>,
    visible: bool,
}

impl LoaderGate {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            pending: None,
            visible: false,
        }
    }

    /// How long the shell waits before calling [`LoaderGate::timer_fired`].
    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// True if `ticket` belongs to the load in flight.
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        self.pending == Some(ticket)
    }

    /// Start a load, superseding the previous one.
    ///
    /// An indicator that is already visible stays up until this load ends.
    pub fn begin(&mut self) -> LoadTicket {
        self.generation += 1;
        let ticket = LoadTicket(self.generation);
        if let Some(previous) = self.pending.replace(ticket) {
            log::debug!("Load {:?} superseded by {:?}", previous, ticket);
        }
        ticket
    }

    /// The delay for `ticket` ran out.
    pub fn timer_fired(&mut self, ticket: LoadTicket) -> Option<IndicatorChange> {
        if !self.is_current(ticket) || self.visible {
            return None;
        }
        log::trace!("Load {:?} is slow, showing indicator", ticket);
        self.visible = true;
        Some(IndicatorChange::Show)
    }

    /// The load for `ticket` finished, successfully or not.
    pub fn complete(&mut self, ticket: LoadTicket) -> Completion {
        if !self.is_current(ticket) {
            log::trace!("Dropping stale load {:?}", ticket);
            return Completion::Stale;
        }
        self.pending = None;
        Completion::Current(self.hide())
    }

    /// Abandon the load in flight.
    pub fn cancel(&mut self) -> Option<IndicatorChange> {
        self.pending = None;
        self.hide()
    }

    fn hide(&mut self) -> Option<IndicatorChange> {
        if self.visible {
            self.visible = false;
            Some(IndicatorChange::Hide)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> LoaderGate {
        LoaderGate::new(Duration::from_millis(750))
    }

    #[test]
    fn test_fast_load_never_shows() {
        let mut g = gate();
        let ticket = g.begin();
        assert_eq!(g.complete(ticket), Completion::Current(None));
        // Timer still fires afterwards
        assert_eq!(g.timer_fired(ticket), None);
        assert!(!g.is_visible());
    }

    #[test]
    fn test_slow_load_shows_then_hides() {
        let mut g = gate();
        let ticket = g.begin();
        assert_eq!(g.timer_fired(ticket), Some(IndicatorChange::Show));
        assert!(g.is_visible());
        assert_eq!(g.complete(ticket), Completion::Current(Some(IndicatorChange::Hide)));
        assert!(!g.is_visible());
    }

    #[test]
    fn test_superseded_load_is_dropped() {
        let mut g = gate();
        let first = g.begin();
        let second = g.begin();
        assert!(!g.is_current(first));
        assert_eq!(g.timer_fired(first), None);
        assert_eq!(g.complete(first), Completion::Stale);
        assert!(g.is_pending());
        assert_eq!(g.complete(second), Completion::Current(None));
    }

    #[test]
    fn test_visible_indicator_survives_supersede() {
        let mut g = gate();
        let first = g.begin();
        g.timer_fired(first);
        let second = g.begin();
        assert!(g.is_visible());
        assert_eq!(g.timer_fired(second), None);
        assert_eq!(g.complete(second), Completion::Current(Some(IndicatorChange::Hide)));
    }

    #[test]
    fn test_cancel_hides() {
        let mut g = gate();
        let ticket = g.begin();
        g.timer_fired(ticket);
        assert_eq!(g.cancel(), Some(IndicatorChange::Hide));
        assert_eq!(g.complete(ticket), Completion::Stale);
        assert_eq!(g.cancel(), None);
    }
}
