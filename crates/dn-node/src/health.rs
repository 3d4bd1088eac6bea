//! Process-wide health state.
//!
//! The state starts as [`HealthState::Starting`], may drop to
//! [`HealthState::Outdated`] during bootstrap, and becomes
//! [`HealthState::Healthy`] once the listener is bound. All mutation goes
//! through [`HealthCell::apply`].

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Coarse readiness/compatibility indicator exposed on `/State`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum HealthState {
    /// Bootstrapping; the listener is not bound yet.
    #[default]
    Starting = 0,
    /// The info record is older than the minimum supported version.
    Outdated = 1,
    /// Bound on the operational port and serving.
    Healthy = 2,
}

/// Events that drive health transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthEvent {
    /// Bootstrap found an info record below the minimum version.
    InfoOutdated,
    /// The listener is bound on its operational port.
    Listening,
}

impl HealthState {
    /// Return the state that follows `self` when `event` occurs.
    ///
    /// `Outdated` is sticky: binding the listener does not clear it.
    #[must_use]
    pub const fn next(self, event: HealthEvent) -> Self {
        match (self, event) {
            (Self::Starting, HealthEvent::InfoOutdated) => Self::Outdated,
            (Self::Starting, HealthEvent::Listening) => Self::Healthy,
            (state, _) => state,
        }
    }

    /// Plain-text name of the state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Starting => "Starting",
            Self::Outdated => "Outdated",
            Self::Healthy => "Healthy",
        }
    }

    const fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Outdated,
            2 => Self::Healthy,
            _ => Self::Starting,
        }
    }
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Thread-safe owner of the [`HealthState`].
#[derive(Debug, Default)]
pub struct HealthCell {
    state: AtomicU8,
}

impl HealthCell {
    /// Create a cell in the `Starting` state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(HealthState::Starting as u8),
        }
    }

    /// Current state.
    #[must_use]
    pub fn get(&self) -> HealthState {
        HealthState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Apply `event` and return the resulting state.
    pub fn apply(&self, event: HealthEvent) -> HealthState {
        let previous = self
            .state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |raw| {
                Some(HealthState::from_u8(raw).next(event) as u8)
            })
            .unwrap_or_else(|raw| raw);
        HealthState::from_u8(previous).next(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use test_case::test_case;

    #[test_case(HealthState::Starting, HealthEvent::InfoOutdated, HealthState::Outdated ; "starting to outdated")]
    #[test_case(HealthState::Starting, HealthEvent::Listening, HealthState::Healthy ; "starting to healthy")]
    #[test_case(HealthState::Outdated, HealthEvent::Listening, HealthState::Outdated ; "outdated is sticky")]
    #[test_case(HealthState::Healthy, HealthEvent::InfoOutdated, HealthState::Healthy ; "healthy ignores late outdated")]
    #[test_case(HealthState::Healthy, HealthEvent::Listening, HealthState::Healthy ; "healthy stays healthy")]
    fn test_transition(from: HealthState, event: HealthEvent, expected: HealthState) {
        assert_eq!(from.next(event), expected);
    }

    #[test]
    fn test_display() {
        assert_eq!(HealthState::Starting.to_string(), "Starting");
        assert_eq!(HealthState::Outdated.to_string(), "Outdated");
        assert_eq!(HealthState::Healthy.to_string(), "Healthy");
    }

    #[test]
    fn test_cell_starts_in_starting() {
        let cell = HealthCell::new();
        assert_eq!(cell.get(), HealthState::Starting);
    }

    #[test]
    fn test_cell_apply_returns_new_state() {
        let cell = HealthCell::new();
        assert_eq!(cell.apply(HealthEvent::Listening), HealthState::Healthy);
        assert_eq!(cell.get(), HealthState::Healthy);
    }

    #[test]
    fn test_cell_outdated_then_listening() {
        let cell = HealthCell::new();
        cell.apply(HealthEvent::InfoOutdated);
        assert_eq!(cell.apply(HealthEvent::Listening), HealthState::Outdated);
        assert_eq!(cell.get(), HealthState::Outdated);
    }

    #[test]
    fn test_cell_shared_across_threads() {
        let cell = Arc::new(HealthCell::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cell = Arc::clone(&cell);
                std::thread::spawn(move || cell.apply(HealthEvent::Listening))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), HealthState::Healthy);
        }
        assert_eq!(cell.get(), HealthState::Healthy);
    }
}
