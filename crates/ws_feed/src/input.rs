use std::time::{Duration, Instant};

use crate::feed::Direction;

#[derive(Debug, Clone)]
pub struct GestureConfig {
    /// Wheel events must move further than this
    pub wheel_threshold: f64,
    /// Swipes must travel further than this
    pub swipe_threshold: f64,
    /// Swipes slower than this are drags, not navigation
    pub swipe_max_duration: Duration,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            wheel_threshold: 50.0,
            swipe_threshold: 50.0,
            swipe_max_duration: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Space,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Positive `delta_y` scrolls toward later articles
    Wheel { delta_y: f64 },
    TouchStart { y: f64, at: Instant },
    TouchEnd { y: f64, at: Instant },
    Key(Key),
}

/// Turns raw wheel, touch and key events into navigation requests.
///
/// Every source ends up as a [`Direction`] handed to the same `navigate`
/// entry point, so the feed's guards apply across all of them. Keys and the
/// wheel are ignored while an overlay is open.
#[derive(Debug, Clone, Default)]
pub struct GestureTranslator {
    config: GestureConfig,
    touch_start: Option<(f64, Instant)>,
    overlay_open: bool,
}

impl GestureTranslator {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            touch_start: None,
            overlay_open: false,
        }
    }

    pub fn set_overlay_open(&mut self, open: bool) {
        self.overlay_open = open;
    }

    pub fn overlay_open(&self) -> bool {
        self.overlay_open
    }

    pub fn translate(&mut self, event: InputEvent) -> Option<Direction> {
        match event {
            InputEvent::Wheel { delta_y } => {
                if self.overlay_open || delta_y.abs() <= self.config.wheel_threshold {
                    return None;
                }
                Some(if delta_y > 0.0 { Direction::Forward } else { Direction::Backward })
            }
            InputEvent::TouchStart { y, at } => {
                self.touch_start = Some((y, at));
                None
            }
            InputEvent::TouchEnd { y, at } => {
                let (start_y, started) = self.touch_start.take()?;
                // finger moving up means content moves on
                let delta = start_y - y;
                let elapsed = at.saturating_duration_since(started);
                if delta.abs() <= self.config.swipe_threshold || elapsed >= self.config.swipe_max_duration {
                    return None;
                }
                Some(if delta > 0.0 { Direction::Forward } else { Direction::Backward })
            }
            InputEvent::Key(key) => {
                if self.overlay_open {
                    return None;
                }
                match key {
                    Key::Down | Key::Space => Some(Direction::Forward),
                    Key::Up => Some(Direction::Backward),
                    Key::Other => None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translator() -> GestureTranslator {
        GestureTranslator::new(GestureConfig::default())
    }

    #[test]
    fn test_wheel_threshold_and_sign() {
        let mut t = translator();
        assert_eq!(t.translate(InputEvent::Wheel { delta_y: 50.0 }), None);
        assert_eq!(t.translate(InputEvent::Wheel { delta_y: -12.0 }), None);
        assert_eq!(t.translate(InputEvent::Wheel { delta_y: 50.5 }), Some(Direction::Forward));
        assert_eq!(t.translate(InputEvent::Wheel { delta_y: -120.0 }), Some(Direction::Backward));
    }

    #[test]
    fn test_swipe_needs_distance_and_speed() {
        let mut t = translator();
        let t0 = Instant::now();

        t.translate(InputEvent::TouchStart { y: 400.0, at: t0 });
        assert_eq!(
            t.translate(InputEvent::TouchEnd { y: 300.0, at: t0 + Duration::from_millis(200) }),
            Some(Direction::Forward)
        );

        t.translate(InputEvent::TouchStart { y: 300.0, at: t0 });
        assert_eq!(
            t.translate(InputEvent::TouchEnd { y: 420.0, at: t0 + Duration::from_millis(499) }),
            Some(Direction::Backward)
        );

        // too short
        t.translate(InputEvent::TouchStart { y: 300.0, at: t0 });
        assert_eq!(t.translate(InputEvent::TouchEnd { y: 260.0, at: t0 + Duration::from_millis(100) }), None);

        // too slow, e.g. selecting text
        t.translate(InputEvent::TouchStart { y: 500.0, at: t0 });
        assert_eq!(t.translate(InputEvent::TouchEnd { y: 100.0, at: t0 + Duration::from_millis(500) }), None);
    }

    #[test]
    fn test_touch_end_without_start_is_ignored() {
        let mut t = translator();
        assert_eq!(t.translate(InputEvent::TouchEnd { y: 0.0, at: Instant::now() }), None);
    }

    #[test]
    fn test_keys() {
        let mut t = translator();
        assert_eq!(t.translate(InputEvent::Key(Key::Down)), Some(Direction::Forward));
        assert_eq!(t.translate(InputEvent::Key(Key::Space)), Some(Direction::Forward));
        assert_eq!(t.translate(InputEvent::Key(Key::Up)), Some(Direction::Backward));
        assert_eq!(t.translate(InputEvent::Key(Key::Other)), None);
    }

    #[test]
    fn test_overlay_suppresses_keys_and_wheel() {
        let mut t = translator();
        t.set_overlay_open(true);
        assert_eq!(t.translate(InputEvent::Key(Key::Down)), None);
        assert_eq!(t.translate(InputEvent::Wheel { delta_y: 200.0 }), None);

        t.set_overlay_open(false);
        assert_eq!(t.translate(InputEvent::Key(Key::Down)), Some(Direction::Forward));
    }
}
