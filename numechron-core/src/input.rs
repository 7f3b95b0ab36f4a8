//! Button debounce edge detection
//!
//! Each button holds a latched pressed state. A press edge fires exactly
//! once; the latch must observe the button released before it can fire
//! again, so a held button never repeats. Contact bounce is suppressed by
//! the caller sleeping a settle interval after every `Pressed` edge -
//! rapid re-triggers inside that window coalesce into the latched state.

/// Result of one debounced poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEdge {
    /// Released -> pressed transition; fire the bound action
    Pressed,
    /// Pressed -> released transition; rearm only
    Released,
    /// No transition
    None,
}

/// Per-button latched debounce state
#[derive(Debug, Default)]
pub struct DebouncedButton {
    latched: bool,
}

impl DebouncedButton {
    pub const fn new() -> Self {
        Self { latched: false }
    }

    pub fn is_pressed(&self) -> bool {
        self.latched
    }

    /// Feed one physical reading; `active` is true while the contact is
    /// closed (after any pull-up inversion).
    pub fn update(&mut self, active: bool) -> ButtonEdge {
        match (active, self.latched) {
            (true, false) => {
                self.latched = true;
                ButtonEdge::Pressed
            }
            (false, true) => {
                self.latched = false;
                ButtonEdge::Released
            }
            _ => ButtonEdge::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_button_fires_once() {
        let mut button = DebouncedButton::new();

        assert_eq!(button.update(true), ButtonEdge::Pressed);
        for _ in 0..50 {
            assert_eq!(button.update(true), ButtonEdge::None);
        }
    }

    #[test]
    fn test_release_rearms() {
        let mut button = DebouncedButton::new();

        assert_eq!(button.update(true), ButtonEdge::Pressed);
        assert_eq!(button.update(false), ButtonEdge::Released);
        assert_eq!(button.update(true), ButtonEdge::Pressed);
    }

    #[test]
    fn test_idle_is_silent() {
        let mut button = DebouncedButton::new();
        for _ in 0..10 {
            assert_eq!(button.update(false), ButtonEdge::None);
        }
        assert!(!button.is_pressed());
    }
}
