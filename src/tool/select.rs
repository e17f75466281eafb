use egui::{CursorIcon, Key, Pos2};

use crate::editor::Editor;
use crate::input::PointerEvent;
use crate::selection::{GRAB_TOLERANCE, MoveMode, SMALL_DRAG_THRESHOLD};
use crate::settings::SharedSettings;
use crate::tool::{Tool, ToolKind, ToolProperties};

/// Rectangle selection tool. A press on an existing selection grabs an
/// edge, corner, or the middle; a press elsewhere starts a fresh
/// rectangle from that point.
pub struct SelectTool {
    #[allow(dead_code)]
    settings: SharedSettings,
    properties: ToolProperties,
    press_point: Pos2,
    dragging: bool,
    fresh_selection: bool,
}

impl SelectTool {
    pub fn new(settings: SharedSettings) -> Self {
        Self {
            settings,
            properties: ToolProperties::default(),
            press_point: Pos2::ZERO,
            dragging: false,
            fresh_selection: false,
        }
    }
}

impl Tool for SelectTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Select
    }

    fn cursor(&self) -> CursorIcon {
        CursorIcon::Crosshair
    }

    fn properties(&self) -> &ToolProperties {
        &self.properties
    }

    fn load_settings(&mut self) {}

    fn pointer_press(&mut self, editor: &mut Editor, event: &PointerEvent) {
        if !editor.document.is_paintable() {
            return;
        }
        let point = editor.view.map_screen_to_canvas(event.position);
        self.press_point = point;
        self.dragging = true;

        let mode = editor.selection.move_mode_for_point(point, GRAB_TOLERANCE);
        if editor.selection.has_selection() && mode != MoveMode::None {
            self.fresh_selection = false;
            editor.selection.set_move_mode(mode);
            editor.selection.begin_drag(point);
        } else {
            self.fresh_selection = true;
            editor.deselect_all();
            editor.selection.start_new(point);
        }
    }

    fn pointer_move(&mut self, editor: &mut Editor, event: &PointerEvent) {
        if !self.dragging {
            return;
        }
        let point = editor.view.map_screen_to_canvas(event.position);
        if self.fresh_selection {
            editor.selection.grow_from_anchor(self.press_point, point);
        } else {
            let anchor = editor.selection.anchor();
            editor
                .selection
                .adjust_selection(point, point.x - anchor.x, point.y - anchor.y, 0.0, 0.0);
        }
    }

    fn pointer_release(&mut self, editor: &mut Editor, event: &PointerEvent) {
        if !self.dragging {
            return;
        }
        self.dragging = false;
        let point = editor.view.map_screen_to_canvas(event.position);

        if self.fresh_selection && self.press_point.distance(point) < SMALL_DRAG_THRESHOLD {
            // A click, not a drag: drop the accidental sliver.
            editor.deselect_all();
            return;
        }

        editor.selection.commit_working();
        let rect = editor.selection.committed_rect();
        if let Some(vector) = editor.document.current_vector_mut() {
            vector.select_in_rect(rect);
            let indices = vector.selected_indices();
            editor.selection.set_curve_selection(indices);
        }
    }

    fn key_press(&mut self, editor: &mut Editor, key: Key) -> bool {
        match key {
            Key::Escape => {
                editor.deselect_all();
                self.dragging = false;
                true
            }
            _ => false,
        }
    }

    fn is_active(&self) -> bool {
        self.dragging
    }
}
