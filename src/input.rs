use glam::Vec2;
use winit::event::{ElementState, MouseButton, WindowEvent};

use crate::trigger::ActivateOn;

/// Pointer state fed from window events.
///
/// Only the primary button matters: its press and release edges are what
/// scene buttons activate on.
#[derive(Debug, Default)]
pub struct Pointer {
    position: Vec2,
    down: bool,
}

impl Pointer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last cursor position in physical pixels, origin top-left.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Returns true while the primary button is held.
    pub fn is_down(&self) -> bool {
        self.down
    }

    /// Process a window event. Returns the button edge it produced, if any.
    pub fn handle_event(&mut self, event: &WindowEvent) -> Option<ActivateOn> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.move_to(Vec2::new(position.x as f32, position.y as f32));
                None
            }
            WindowEvent::MouseInput { state, button, .. } => self.button(*button, *state),
            _ => None,
        }
    }

    /// Record a cursor move.
    pub fn move_to(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Record a button change. Repeated presses without a release produce no
    /// second edge.
    pub fn button(&mut self, button: MouseButton, state: ElementState) -> Option<ActivateOn> {
        if button != MouseButton::Left {
            return None;
        }
        match state {
            ElementState::Pressed if !self.down => {
                self.down = true;
                Some(ActivateOn::PointerDown)
            }
            ElementState::Released if self.down => {
                self.down = false;
                Some(ActivateOn::PointerUp)
            }
            _ => None,
        }
    }
}
