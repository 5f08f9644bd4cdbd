//! Keyboard/mouse stand-in for the control panel.

use kinetic_engine::input::{InputEvent, Key, KeyState, MouseButton, MouseButtonState};

use crate::controller::UiEvent;
use crate::state::{AnimationState, Operation, RendererKind};
use crate::template::ShapeKind;

/// Digits accepted in the count field.
const MAX_COUNT_DIGITS: usize = 9;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ShellAction {
    Ui(UiEvent),
    Exit,
}

/// Maps raw input events to control-panel events.
///
/// Holds the in-progress object-count field.
#[derive(Debug, Default)]
pub struct Shell {
    count_field: String,
}

impl Shell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Digits typed since the last commit, if any.
    pub fn pending_count(&self) -> Option<&str> {
        (!self.count_field.is_empty()).then_some(self.count_field.as_str())
    }

    /// Translates one event. Toggles read `state` to know the current value,
    /// so actions should be applied before the next event is handled.
    pub fn handle(&mut self, event: &InputEvent, state: &AnimationState) -> Option<ShellAction> {
        match *event {
            InputEvent::Key { key, state: KeyState::Pressed, repeat: false } => self.key_pressed(key, state),

            InputEvent::Key { key: Key::ArrowUp | Key::ArrowDown, state: KeyState::Released, .. } => {
                Some(ShellAction::Ui(UiEvent::PointerReleased))
            }

            InputEvent::PointerButton(b) => match (b.state, b.button) {
                (MouseButtonState::Pressed, MouseButton::Left) => Some(ShellAction::Ui(UiEvent::IncrementPressed)),
                (MouseButtonState::Pressed, MouseButton::Right) => Some(ShellAction::Ui(UiEvent::DecrementPressed)),
                (MouseButtonState::Pressed, _) => None,
                (MouseButtonState::Released, _) => Some(ShellAction::Ui(UiEvent::PointerReleased)),
            },

            InputEvent::Focused(false) => Some(ShellAction::Ui(UiEvent::PointerReleased)),

            _ => None,
        }
    }

    fn key_pressed(&mut self, key: Key, state: &AnimationState) -> Option<ShellAction> {
        if let Some(d) = key.digit() {
            if self.count_field.len() < MAX_COUNT_DIGITS {
                self.count_field.push(char::from(b'0' + d as u8));
            }
            return None;
        }

        let ui = match key {
            Key::Enter => {
                let value = self.count_field.parse::<i64>().ok();
                self.count_field.clear();
                UiEvent::CountChanged(value?)
            }
            Key::Backspace => {
                self.count_field.pop();
                return None;
            }
            Key::Escape => {
                if self.count_field.is_empty() {
                    return Some(ShellAction::Exit);
                }
                self.count_field.clear();
                return None;
            }

            Key::F1 => UiEvent::RendererChanged(RendererKind::Svg),
            Key::F2 => UiEvent::RendererChanged(RendererKind::Canvas),
            Key::F3 => UiEvent::RendererChanged(RendererKind::Webgl),

            Key::T => toggle_shape(state, ShapeKind::Triangle),
            Key::C => toggle_shape(state, ShapeKind::Circle),
            Key::S => toggle_shape(state, ShapeKind::Square),
            Key::P => toggle_shape(state, ShapeKind::Pentagon),
            Key::R => toggle_shape(state, ShapeKind::Star),

            Key::F5 => toggle_op(state, Operation::Position),
            Key::F6 => toggle_op(state, Operation::Rotation),
            Key::F7 => toggle_op(state, Operation::Scale),
            Key::F8 => toggle_op(state, Operation::Vertices),

            Key::ArrowUp => UiEvent::IncrementPressed,
            Key::ArrowDown => UiEvent::DecrementPressed,

            _ => return None,
        };
        Some(ShellAction::Ui(ui))
    }
}

fn toggle_shape(state: &AnimationState, kind: ShapeKind) -> UiEvent {
    UiEvent::ShapeToggled { kind, checked: !state.shapes.is_active(kind) }
}

fn toggle_op(state: &AnimationState, op: Operation) -> UiEvent {
    UiEvent::OperationToggled { op, checked: !state.operations.is_enabled(op) }
}
