//! Button and cursor tracking across frames.
//!
//! A single flag flips on every button press or release, whichever button it
//! comes from. Pressing two buttons in sequence therefore reads as a press
//! followed by a release.

use std::fmt;
use std::ops::Range;

use crate::geometry::{triangle_vertices, TRIANGLE_COUNT};
use crate::pick::{CursorPosition, IdentityTriple, ImageCoord, Viewport};

/// Mouse button that produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

/// Whether a button went down or up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonAction {
    Pressed,
    Released,
}

/// Current mode of the interaction state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionMode {
    /// Button flag clear. No overlays.
    Idle,
    /// Button flag set. Axis overlay always, highlight on a hit.
    Dragging,
}

/// Change notifications, each emitted once per change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagnostic {
    /// The cursor moved to a new pixel inside the viewport.
    CursorMoved(CursorPosition),
    /// A different primitive is under the cursor while dragging.
    PrimitiveChanged(IdentityTriple),
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CursorMoved(cursor) => write!(f, "cursor at ({}, {})", cursor.x, cursor.y),
            Self::PrimitiveChanged(triple) => match triple.face() {
                Some(face) => write!(f, "picked {triple} ({} face)", face.name()),
                None => write!(f, "picked {triple}"),
            },
        }
    }
}

/// One triangle of the picking buffer drawn on top of the cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightDraw {
    pub first_vertex: u32,
    pub vertex_count: u32,
}

impl HighlightDraw {
    /// Highlight for `primitive_id`: three vertices from `primitive_id * 3`.
    pub fn for_primitive(primitive_id: u32) -> Self {
        let range = triangle_vertices(primitive_id);
        Self {
            first_vertex: range.start,
            vertex_count: range.end - range.start,
        }
    }

    /// Vertex range passed to the draw call.
    pub fn vertices(&self) -> Range<u32> {
        self.first_vertex..self.first_vertex + self.vertex_count
    }
}

/// Full-viewport axis overlay centered on the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisOverlay {
    /// Cursor in image coordinates, or `[-1, -1]` when outside.
    pub cursor: [i32; 2],
}

/// Secondary draws issued after the textured pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverlayPlan {
    pub highlight: Option<HighlightDraw>,
    pub axis: Option<AxisOverlay>,
}

impl OverlayPlan {
    /// No secondary draws.
    pub const NONE: Self = Self {
        highlight: None,
        axis: None,
    };
}

/// Button flag plus the last reported cursor and primitive.
#[derive(Debug, Clone)]
pub struct InteractionState {
    button_down: bool,
    last_cursor: Option<CursorPosition>,
    last_primitive: Option<u32>,
    expected_object_id: u32,
}

impl InteractionState {
    /// Creates an idle state that highlights hits on `expected_object_id`.
    pub fn new(expected_object_id: u32) -> Self {
        Self {
            button_down: false,
            last_cursor: None,
            last_primitive: None,
            expected_object_id,
        }
    }

    /// Flips the button flag. The button identity only feeds the log.
    pub fn handle_button(&mut self, button: MouseButton, action: ButtonAction) {
        self.button_down = !self.button_down;
        log::trace!("{button:?} {action:?}, mode now {:?}", self.mode());
    }

    pub fn mode(&self) -> InteractionMode {
        if self.button_down {
            InteractionMode::Dragging
        } else {
            InteractionMode::Idle
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.button_down
    }

    /// Last cursor reported through [`Diagnostic::CursorMoved`].
    pub fn last_cursor(&self) -> Option<CursorPosition> {
        self.last_cursor
    }

    /// Last primitive reported through [`Diagnostic::PrimitiveChanged`].
    pub fn last_primitive(&self) -> Option<u32> {
        self.last_primitive
    }

    /// Samples the cursor for this frame.
    ///
    /// Returns the image coordinate to read back, or `None` when the cursor is
    /// outside the viewport. A diagnostic is pushed when an inside cursor
    /// differs from the last reported one.
    pub fn observe_cursor(
        &mut self,
        cursor: CursorPosition,
        viewport: Viewport,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<ImageCoord> {
        let image = viewport.to_image(cursor)?;
        if self.last_cursor != Some(cursor) {
            self.last_cursor = Some(cursor);
            diagnostics.push(Diagnostic::CursorMoved(cursor));
        }
        Some(image)
    }

    /// Decides this frame's overlays from the cursor and the resolved pick.
    pub fn plan_overlays(
        &mut self,
        cursor: Option<ImageCoord>,
        pick: Option<IdentityTriple>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> OverlayPlan {
        if !self.button_down {
            return OverlayPlan::NONE;
        }

        let hit = pick.filter(|triple| {
            triple.object_id == self.expected_object_id && triple.primitive_id < TRIANGLE_COUNT
        });
        if let Some(triple) = hit {
            if self.last_primitive != Some(triple.primitive_id) {
                self.last_primitive = Some(triple.primitive_id);
                diagnostics.push(Diagnostic::PrimitiveChanged(triple));
            }
        }

        OverlayPlan {
            highlight: hit.map(|triple| HighlightDraw::for_primitive(triple.primitive_id)),
            axis: Some(AxisOverlay {
                cursor: cursor.map_or(crate::pick::NO_CURSOR_UNIFORM, ImageCoord::to_uniform),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(800, 600).unwrap()
    }

    #[test]
    fn test_any_button_toggles_one_flag() {
        let mut state = InteractionState::new(1);
        assert_eq!(state.mode(), InteractionMode::Idle);

        state.handle_button(MouseButton::Left, ButtonAction::Pressed);
        assert_eq!(state.mode(), InteractionMode::Dragging);

        // A second, different button press flips the flag back.
        state.handle_button(MouseButton::Right, ButtonAction::Pressed);
        assert_eq!(state.mode(), InteractionMode::Idle);

        state.handle_button(MouseButton::Right, ButtonAction::Released);
        assert_eq!(state.mode(), InteractionMode::Dragging);
    }

    #[test]
    fn test_cursor_diagnostic_once_per_change() {
        let mut state = InteractionState::new(1);
        let mut diagnostics = Vec::new();
        let cursor = CursorPosition::new(10, 20);

        state.observe_cursor(cursor, viewport(), &mut diagnostics);
        assert_eq!(diagnostics, vec![Diagnostic::CursorMoved(cursor)]);

        diagnostics.clear();
        state.observe_cursor(cursor, viewport(), &mut diagnostics);
        assert!(diagnostics.is_empty());

        state.observe_cursor(CursorPosition::new(11, 20), viewport(), &mut diagnostics);
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_outside_cursor_is_silent() {
        let mut state = InteractionState::new(1);
        let mut diagnostics = Vec::new();
        let image = state.observe_cursor(CursorPosition::NONE, viewport(), &mut diagnostics);
        assert_eq!(image, None);
        assert!(diagnostics.is_empty());
        assert_eq!(state.last_cursor(), None);
    }

    #[test]
    fn test_idle_plans_nothing() {
        let mut state = InteractionState::new(1);
        let mut diagnostics = Vec::new();
        let plan = state.plan_overlays(
            Some(ImageCoord { x: 1, y: 1 }),
            Some(IdentityTriple::new(1, 1, 4)),
            &mut diagnostics,
        );
        assert_eq!(plan, OverlayPlan::NONE);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_dragging_over_primitive_four_highlights_vertices_12_to_14() {
        let mut state = InteractionState::new(1);
        state.handle_button(MouseButton::Left, ButtonAction::Pressed);
        let mut diagnostics = Vec::new();

        let plan = state.plan_overlays(
            Some(ImageCoord { x: 400, y: 300 }),
            Some(IdentityTriple::new(1, 1, 4)),
            &mut diagnostics,
        );
        let highlight = plan.highlight.unwrap();
        assert_eq!(highlight.vertices(), 12..15);
        assert_eq!(plan.axis, Some(AxisOverlay { cursor: [400, 300] }));
        assert_eq!(
            diagnostics,
            vec![Diagnostic::PrimitiveChanged(IdentityTriple::new(1, 1, 4))]
        );
    }

    #[test]
    fn test_dragging_over_background_draws_axis_only() {
        let mut state = InteractionState::new(1);
        state.handle_button(MouseButton::Left, ButtonAction::Pressed);
        let mut diagnostics = Vec::new();

        let plan = state.plan_overlays(
            Some(ImageCoord { x: 3, y: 3 }),
            Some(IdentityTriple::BACKGROUND),
            &mut diagnostics,
        );
        assert_eq!(plan.highlight, None);
        assert!(plan.axis.is_some());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_dragging_outside_uses_sentinel_cursor() {
        let mut state = InteractionState::new(1);
        state.handle_button(MouseButton::Middle, ButtonAction::Pressed);
        let plan = state.plan_overlays(None, None, &mut Vec::new());
        assert_eq!(plan.axis, Some(AxisOverlay { cursor: [-1, -1] }));
        assert_eq!(plan.highlight, None);
    }

    #[test]
    fn test_other_object_is_not_highlighted() {
        let mut state = InteractionState::new(1);
        state.handle_button(MouseButton::Left, ButtonAction::Pressed);
        let plan = state.plan_overlays(
            Some(ImageCoord { x: 0, y: 0 }),
            Some(IdentityTriple::new(2, 1, 4)),
            &mut Vec::new(),
        );
        assert_eq!(plan.highlight, None);
    }

    #[test]
    fn test_out_of_range_primitive_is_not_highlighted() {
        let mut state = InteractionState::new(1);
        state.handle_button(MouseButton::Left, ButtonAction::Pressed);
        let plan = state.plan_overlays(
            Some(ImageCoord { x: 0, y: 0 }),
            Some(IdentityTriple::new(1, 1, TRIANGLE_COUNT)),
            &mut Vec::new(),
        );
        assert_eq!(plan.highlight, None);
    }

    #[test]
    fn test_primitive_diagnostic_once_per_change() {
        let mut state = InteractionState::new(1);
        state.handle_button(MouseButton::Left, ButtonAction::Pressed);
        let cursor = Some(ImageCoord { x: 5, y: 5 });
        let mut diagnostics = Vec::new();

        state.plan_overlays(cursor, Some(IdentityTriple::new(1, 1, 7)), &mut diagnostics);
        state.plan_overlays(cursor, Some(IdentityTriple::new(1, 1, 7)), &mut diagnostics);
        assert_eq!(diagnostics.len(), 1);

        state.plan_overlays(cursor, Some(IdentityTriple::new(1, 1, 6)), &mut diagnostics);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(state.last_primitive(), Some(6));
    }

    #[test]
    fn test_diagnostic_display() {
        let moved = Diagnostic::CursorMoved(CursorPosition::new(3, 4));
        assert_eq!(moved.to_string(), "cursor at (3, 4)");
        let picked = Diagnostic::PrimitiveChanged(IdentityTriple::new(1, 1, 2));
        assert_eq!(picked.to_string(), "picked object 1 draw 1 primitive 2 (back face)");
    }
}
