//! Pointer handler sets derived from the editor state.
//!
//! The active handlers are a pure function of the current snapshot. The
//! controller recomputes them after every transition and swaps the whole set,
//! so no stale binding survives a mode or color change.

use super::mode::{Mode, Swatch};
use super::state::EditorState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HandlerSet {
    /// Pointer movement pans the viewport while the pointer is held
    pub pan_on_move: bool,
    /// Pointer-down places (or closes on) a polygon vertex
    pub place_vertices: bool,
    /// Raw pointer input also reaches the surface's own selection and
    /// freehand handling
    pub forward_to_surface: bool,
    /// Brush color while freehand drawing is active
    pub freehand: Option<Swatch>,
}

impl HandlerSet {
    pub fn for_state(state: &EditorState) -> Self {
        Self {
            pan_on_move: state.mode == Mode::Drag,
            place_vertices: state.accepts_vertices(),
            forward_to_surface: state.mode != Mode::Drag,
            freehand: (state.mode == Mode::Draw).then_some(state.drawing_color),
        }
    }

    /// Whether a pointer move with the current pointer flag should pan.
    pub fn pans(&self, pointer_down: bool) -> bool {
        self.pan_on_move && pointer_down
    }
}
