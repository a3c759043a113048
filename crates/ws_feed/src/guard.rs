use std::time::{Duration, Instant};

/// Which guard, if any, is currently holding navigation back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Open,
    /// Too soon after the previous accepted step
    Throttled,
    /// The transition from the previous step is still settling
    Settling,
}

/// Two timing guards that collapse input storms into single steps.
///
/// Both are checked against the same `now` in one call, and only accepted
/// navigations move them. The settle lock is a deadline rather than a flag
/// cleared later, so there is nothing to cancel or race with.
#[derive(Debug, Clone)]
pub struct NavigationGuard {
    throttle: Duration,
    settle: Duration,
    last_accepted: Option<Instant>,
    settle_until: Option<Instant>,
}

impl NavigationGuard {
    pub fn new(throttle: Duration, settle: Duration) -> Self {
        Self {
            throttle,
            settle,
            last_accepted: None,
            settle_until: None,
        }
    }

    pub fn check(&self, now: Instant) -> GuardState {
        if let Some(until) = self.settle_until {
            if now < until {
                return GuardState::Settling;
            }
        }
        if let Some(last) = self.last_accepted {
            if now.saturating_duration_since(last) < self.throttle {
                return GuardState::Throttled;
            }
        }
        GuardState::Open
    }

    /// Record an accepted navigation at `now`.
    pub fn accept(&mut self, now: Instant) {
        self.last_accepted = Some(now);
        self.settle_until = Some(now + self.settle);
    }

    pub fn is_settling(&self, now: Instant) -> bool {
        self.check(now) == GuardState::Settling
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THROTTLE: Duration = Duration::from_millis(500);
    const SETTLE: Duration = Duration::from_millis(600);

    #[test]
    fn test_fresh_guard_is_open() {
        let guard = NavigationGuard::new(THROTTLE, SETTLE);
        assert_eq!(guard.check(Instant::now()), GuardState::Open);
    }

    #[test]
    fn test_settle_outlasts_throttle() {
        let t0 = Instant::now();
        let mut guard = NavigationGuard::new(THROTTLE, SETTLE);
        guard.accept(t0);

        assert_eq!(guard.check(t0), GuardState::Settling);
        assert_eq!(guard.check(t0 + Duration::from_millis(550)), GuardState::Settling);
        assert_eq!(guard.check(t0 + SETTLE), GuardState::Open);
    }

    #[test]
    fn test_throttle_outlasts_short_settle() {
        let t0 = Instant::now();
        let mut guard = NavigationGuard::new(THROTTLE, Duration::from_millis(100));
        guard.accept(t0);

        assert_eq!(guard.check(t0 + Duration::from_millis(50)), GuardState::Settling);
        assert_eq!(guard.check(t0 + Duration::from_millis(300)), GuardState::Throttled);
        assert_eq!(guard.check(t0 + THROTTLE), GuardState::Open);
    }
}
