use foundation::time::Time;

/// Deterministic cooldown gate.
///
/// Callers pass the current time explicitly so behaviour is replayable in
/// tests; nothing here reads a wall clock. The first call always fires.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Cooldown {
    window_s: f64,
    last_fired: Option<Time>,
}

impl Cooldown {
    pub fn new(window_s: f64) -> Self {
        Self {
            window_s: window_s.max(0.0),
            last_fired: None,
        }
    }

    pub fn window_s(&self) -> f64 {
        self.window_s
    }

    pub fn last_fired(&self) -> Option<Time> {
        self.last_fired
    }

    pub fn is_ready(&self, now: Time) -> bool {
        match self.last_fired {
            None => true,
            Some(last) => now.since(last) >= self.window_s,
        }
    }

    /// Fires and restarts the window if ready.
    ///
    /// Returns `true` if the caller may proceed.
    pub fn try_fire(&mut self, now: Time) -> bool {
        if !self.is_ready(now) {
            return false;
        }
        self.last_fired = Some(now);
        true
    }

    pub fn reset(&mut self) {
        self.last_fired = None;
    }
}

#[cfg(test)]
mod tests {
    use super::Cooldown;
    use foundation::time::Time;

    #[test]
    fn fires_once_per_window() {
        let mut c = Cooldown::new(3.0);
        assert!(c.try_fire(Time(10.0)));
        assert!(!c.try_fire(Time(11.0)));
        assert!(!c.try_fire(Time(12.999)));
        assert!(c.try_fire(Time(13.0)));
        assert_eq!(c.last_fired(), Some(Time(13.0)));
    }

    #[test]
    fn rejected_attempts_do_not_extend_window() {
        let mut c = Cooldown::new(3.0);
        assert!(c.try_fire(Time(0.0)));
        assert!(!c.try_fire(Time(2.0)));
        assert!(c.try_fire(Time(3.0)));
    }

    #[test]
    fn reset_makes_ready() {
        let mut c = Cooldown::new(60.0);
        assert!(c.try_fire(Time(0.0)));
        c.reset();
        assert!(c.is_ready(Time(0.5)));
    }
}
