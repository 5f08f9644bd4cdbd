use crate::state::{AnimationState, Operation, RendererKind};
use crate::template::ShapeKind;

/// Control-panel events, independent of how they were produced.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UiEvent {
    RendererChanged(RendererKind),
    ShapeToggled { kind: ShapeKind, checked: bool },
    OperationToggled { op: Operation, checked: bool },
    /// Raw field value; negatives clamp to zero.
    CountChanged(i64),
    IncrementPressed,
    DecrementPressed,
    /// Any pointer release, anywhere.
    PointerReleased,
}

/// Applies UI events to the animation state.
#[derive(Debug)]
pub struct Controller {
    listening: bool,
}

impl Controller {
    pub fn new() -> Self {
        Self { listening: true }
    }

    /// Stops reacting to global pointer releases.
    pub fn unregister(&mut self) {
        if self.listening {
            log::debug!("release listener unregistered");
        }
        self.listening = false;
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn apply(&self, state: &mut AnimationState, event: UiEvent) {
        log::debug!("ui event {event:?}");
        match event {
            UiEvent::RendererChanged(kind) => state.renderer = kind,
            UiEvent::ShapeToggled { kind, checked } => state.shapes.set(kind, checked),
            UiEvent::OperationToggled { op, checked } => state.operations.set(op, checked),
            UiEvent::CountChanged(value) => {
                state.target_count = value.clamp(0, u32::MAX as i64) as u32;
            }
            UiEvent::IncrementPressed => state.increment.press(),
            UiEvent::DecrementPressed => state.decrement.press(),
            UiEvent::PointerReleased => {
                if self.listening {
                    state.increment.release();
                    state.decrement.release();
                }
            }
        }
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Latch;

    #[test]
    fn toggles_write_through() {
        let ctl = Controller::new();
        let mut st = AnimationState::default();

        ctl.apply(&mut st, UiEvent::ShapeToggled { kind: ShapeKind::Star, checked: true });
        ctl.apply(&mut st, UiEvent::ShapeToggled { kind: ShapeKind::Triangle, checked: false });
        ctl.apply(&mut st, UiEvent::OperationToggled { op: Operation::Rotation, checked: true });
        ctl.apply(&mut st, UiEvent::RendererChanged(RendererKind::Canvas));

        assert_eq!(st.shapes.active(), vec![ShapeKind::Star]);
        assert!(st.operations.rotation);
        assert_eq!(st.renderer, RendererKind::Canvas);
    }

    #[test]
    fn count_clamps_negative_to_zero() {
        let ctl = Controller::new();
        let mut st = AnimationState::default();
        ctl.apply(&mut st, UiEvent::CountChanged(12));
        assert_eq!(st.target_count, 12);
        ctl.apply(&mut st, UiEvent::CountChanged(-4));
        assert_eq!(st.target_count, 0);
    }

    #[test]
    fn release_clears_both_latches() {
        let ctl = Controller::new();
        let mut st = AnimationState::default();
        ctl.apply(&mut st, UiEvent::IncrementPressed);
        ctl.apply(&mut st, UiEvent::DecrementPressed);
        ctl.apply(&mut st, UiEvent::PointerReleased);
        assert_eq!(st.increment, Latch::Idle);
        assert_eq!(st.decrement, Latch::Idle);
    }

    #[test]
    fn unregistered_controller_ignores_release() {
        let mut ctl = Controller::new();
        let mut st = AnimationState::default();
        ctl.apply(&mut st, UiEvent::IncrementPressed);
        ctl.unregister();
        ctl.apply(&mut st, UiEvent::PointerReleased);
        assert!(st.increment.is_held());
        assert!(!ctl.is_listening());
    }
}
