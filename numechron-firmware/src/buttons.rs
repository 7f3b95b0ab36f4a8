//! Manual adjustment buttons
//!
//! Three momentary buttons on pull-ups (closed contact reads low): one
//! advances a full minute, two nudge the face a fraction of a minute in
//! either direction. Debounce state lives in the core edge detectors; the
//! control loop sleeps the settle interval after each press edge.

use embassy_rp::gpio::Input;
use heapless::Vec;

use numechron_core::input::{ButtonEdge, DebouncedButton};

/// Action bound to a button press
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum ButtonAction {
    /// Advance one minute
    Tick,
    /// Nudge the face forward a fraction of a minute
    NudgeForward,
    /// Nudge the face backward a fraction of a minute
    NudgeBackward,
}

struct Button<'d> {
    input: Input<'d>,
    debounce: DebouncedButton,
}

impl<'d> Button<'d> {
    fn new(input: Input<'d>) -> Self {
        Self {
            input,
            debounce: DebouncedButton::new(),
        }
    }

    fn poll(&mut self) -> ButtonEdge {
        // Pull-up wiring: pressed reads low
        self.debounce.update(self.input.is_low())
    }
}

/// The three clock buttons
pub struct ButtonPanel<'d> {
    tick: Button<'d>,
    forward: Button<'d>,
    backward: Button<'d>,
}

impl<'d> ButtonPanel<'d> {
    pub fn new(tick: Input<'d>, forward: Input<'d>, backward: Input<'d>) -> Self {
        Self {
            tick: Button::new(tick),
            forward: Button::new(forward),
            backward: Button::new(backward),
        }
    }

    /// Poll all three buttons, collecting every newly fired action
    ///
    /// Each button fires independently, exactly once per press-release
    /// cycle.
    pub fn poll(&mut self) -> Vec<ButtonAction, 3> {
        let mut fired = Vec::new();

        if self.tick.poll() == ButtonEdge::Pressed {
            let _ = fired.push(ButtonAction::Tick);
        }
        if self.forward.poll() == ButtonEdge::Pressed {
            let _ = fired.push(ButtonAction::NudgeForward);
        }
        if self.backward.poll() == ButtonEdge::Pressed {
            let _ = fired.push(ButtonAction::NudgeBackward);
        }

        fired
    }
}
