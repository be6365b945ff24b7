// Turns a per-frame "peace sign seen?" flag into discrete duplicate events.
// Visual: holding the sign makes exactly one copy; you have to drop the sign
// and show it again (after the cooldown) to get another.

use std::time::{Duration, Instant};

use crate::config::PEACE_COOLDOWN;

#[derive(Debug, Clone)]
pub struct GestureDebouncer {
    cooldown: Duration,
    last_fire: Option<Instant>, // None = never fired
    previous_active: bool,
}

impl Default for GestureDebouncer {
    fn default() -> Self {
        Self::new(PEACE_COOLDOWN)
    }
}

impl GestureDebouncer {
    pub fn new(cooldown: Duration) -> Self {
        Self { cooldown, last_fire: None, previous_active: false }
    }

    /// Feed this frame's raw signal. True only on a rising edge that is more
    /// than `cooldown` after the previous fire. Call once per frame, even
    /// when the signal is false, so the edge state stays current.
    pub fn should_fire(&mut self, active: bool, now: Instant) -> bool {
        let rising = active && !self.previous_active;
        self.previous_active = active;
        if !rising {
            return false;
        }
        let cooled = match self.last_fire {
            None => true,
            Some(t) => now.saturating_duration_since(t) > self.cooldown,
        };
        if cooled {
            self.last_fire = Some(now);
        }
        cooled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(base: Instant, secs: f32) -> Instant {
        base + Duration::from_secs_f32(secs)
    }

    #[test]
    fn held_signal_fires_once_and_cooldown_blocks_quick_repeat() {
        let base = Instant::now();
        let mut d = GestureDebouncer::new(Duration::from_millis(1500));
        let signal = [false, true, true, false, true];
        let fires: Vec<bool> = signal
            .iter()
            .enumerate()
            .map(|(i, &s)| d.should_fire(s, at(base, i as f32 * 0.1)))
            .collect();
        assert_eq!(fires, vec![false, true, false, false, false]);

        // a separate rising edge well after the cooldown fires again
        assert!(!d.should_fire(false, at(base, 2.0)));
        assert!(d.should_fire(true, at(base, 2.1)));
    }

    #[test]
    fn first_edge_fires_immediately() {
        let mut d = GestureDebouncer::default();
        assert!(d.should_fire(true, Instant::now()));
    }

    #[test]
    fn continuous_signal_never_refires() {
        let base = Instant::now();
        let mut d = GestureDebouncer::new(Duration::from_millis(100));
        assert!(d.should_fire(true, base));
        for i in 1..50 {
            assert!(!d.should_fire(true, at(base, i as f32)));
        }
    }

    #[test]
    fn cooldown_is_strict() {
        let base = Instant::now();
        let mut d = GestureDebouncer::new(Duration::from_secs(1));
        assert!(d.should_fire(true, base));
        d.should_fire(false, at(base, 0.5));
        // exactly one cooldown later is not enough
        assert!(!d.should_fire(true, base + Duration::from_secs(1)));
        d.should_fire(false, at(base, 1.5));
        assert!(d.should_fire(true, at(base, 1.6)));
    }
}
