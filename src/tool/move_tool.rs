use egui::{CursorIcon, Key, Pos2};

use crate::editor::Editor;
use crate::geometry::angle_between;
use crate::input::PointerEvent;
use crate::selection::{GRAB_TOLERANCE, MoveMode, TransformDecision};
use crate::settings::SharedSettings;
use crate::tool::{Tool, ToolKind, ToolProperties};

const DEFAULT_ROTATION_INCREMENT: i64 = 15;

/// Moves, resizes, and rotates the current selection. The transform stays
/// pending across gestures until it is applied (Enter or a press outside
/// the selection) or discarded.
pub struct MoveTool {
    settings: SharedSettings,
    properties: ToolProperties,
    rotation_increment: f32,
    rotation_offset: f32,
    dragging: bool,
}

impl MoveTool {
    pub fn new(settings: SharedSettings) -> Self {
        Self {
            settings,
            properties: ToolProperties::default(),
            rotation_increment: DEFAULT_ROTATION_INCREMENT as f32,
            rotation_offset: 0.0,
            dragging: false,
        }
    }

    pub fn set_rotation_increment(&mut self, increment: i64) {
        self.rotation_increment = increment as f32;
        self.settings.borrow_mut().set_i64("rotationIncrement", increment);
    }

    pub fn rotation_increment(&self) -> f32 {
        self.rotation_increment
    }

    /// Bakes the pending transform into the layer content and rebaselines
    /// the selection around the result.
    fn apply_transform(&mut self, editor: &mut Editor) {
        if !editor.selection.transform_modified() {
            return;
        }
        let region = editor.selection.committed_rect();
        let matrix = editor.selection.apply();
        if let Some(bitmap) = editor.document.current_bitmap_mut() {
            bitmap.apply_transform(region, &matrix);
        } else if let Some(vector) = editor.document.current_vector_mut() {
            vector.transform_selected(&matrix);
        }
    }

    fn grab_point(&self, editor: &Editor, event: &PointerEvent) -> Pos2 {
        editor.view.map_screen_to_canvas(event.position)
    }
}

impl Tool for MoveTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Move
    }

    fn cursor(&self) -> CursorIcon {
        CursorIcon::Move
    }

    fn properties(&self) -> &ToolProperties {
        &self.properties
    }

    fn load_settings(&mut self) {
        let settings = self.settings.borrow();
        self.rotation_increment =
            settings.get_i64("rotationIncrement", DEFAULT_ROTATION_INCREMENT) as f32;
    }

    fn pointer_press(&mut self, editor: &mut Editor, event: &PointerEvent) {
        if !editor.selection.has_selection() {
            return;
        }
        let point = self.grab_point(editor, event);
        let mut mode = editor.selection.move_mode_for_point(point, GRAB_TOLERANCE);

        if mode == MoveMode::None {
            // Clicking off the selection finalizes whatever is pending.
            self.apply_transform(editor);
            editor.deselect_all();
            return;
        }

        if mode == MoveMode::Middle && event.modifiers.ctrl {
            mode = MoveMode::Rotation;
        }
        editor.selection.set_move_mode(mode);
        editor.selection.begin_drag(point);
        if mode == MoveMode::Rotation {
            let center = editor.selection.working_rect().center();
            self.rotation_offset = angle_between(center, point) - editor.selection.rotation();
        }
        self.dragging = true;
    }

    fn pointer_move(&mut self, editor: &mut Editor, event: &PointerEvent) {
        if !self.dragging {
            return;
        }
        let point = self.grab_point(editor, event);
        let anchor = editor.selection.anchor();
        let mut dx = point.x - anchor.x;
        let mut dy = point.y - anchor.y;

        let mode = editor.selection.move_mode();
        if event.modifiers.shift && mode.is_resize() {
            let locked = editor.selection.aspect_ratio_offset(dx, dy);
            dx = locked.x;
            dy = locked.y;
        }
        let snap = if mode == MoveMode::Rotation && event.modifiers.shift {
            self.rotation_increment
        } else {
            0.0
        };
        editor
            .selection
            .adjust_selection(point, dx, dy, self.rotation_offset, snap);
    }

    fn pointer_release(&mut self, _editor: &mut Editor, _event: &PointerEvent) {
        // The transform stays pending; apply happens explicitly.
        self.dragging = false;
    }

    fn key_press(&mut self, editor: &mut Editor, key: Key) -> bool {
        match key {
            Key::Enter => {
                self.apply_transform(editor);
                true
            }
            Key::Escape => {
                editor.selection.cancel();
                self.dragging = false;
                true
            }
            _ => false,
        }
    }

    fn is_active(&self) -> bool {
        self.dragging
    }

    fn has_pending_transform(&self, editor: &Editor) -> bool {
        editor.selection.transform_modified()
    }

    /// Three-way answer to the "apply the pending transform?" prompt the
    /// host raises before a layer or frame switch.
    fn resolve_pending_transform(
        &mut self,
        editor: &mut Editor,
        decision: TransformDecision,
    ) -> bool {
        match decision {
            TransformDecision::Apply => {
                self.apply_transform(editor);
                true
            }
            TransformDecision::Discard => {
                editor.selection.cancel();
                true
            }
            TransformDecision::Cancel => false,
        }
    }
}
