use egui::{Key, Pos2};
use log::debug;

use crate::canvas::AntiAliasing;
use crate::curve::Curve;
use crate::editor::Editor;
use crate::input::PointerEvent;
use crate::settings::SharedSettings;
use crate::stroke::StrokeTarget;
use crate::tool::{Tool, ToolKind, ToolProperties};

const DEFAULT_WIDTH: f64 = 8.0;

/// Segment-by-segment line tool. Each click pins a vertex, the preview
/// follows the cursor, and a double click, Enter, or Escape ends the
/// figure. Vertices live in canvas coordinates.
pub struct PolylineTool {
    settings: SharedSettings,
    properties: ToolProperties,
    points: Vec<Pos2>,
    target: Option<StrokeTarget>,
}

impl PolylineTool {
    pub fn new(settings: SharedSettings) -> Self {
        Self {
            settings,
            properties: ToolProperties::default(),
            points: Vec::new(),
            target: None,
        }
    }

    pub fn set_width(&mut self, width: f32) {
        self.properties.width = width;
        self.settings.borrow_mut().set_f64("polyLineWidth", width as f64);
    }

    pub fn set_anti_aliasing(&mut self, aa: AntiAliasing) {
        self.properties.anti_aliasing = aa;
        self.settings
            .borrow_mut()
            .set_i64("polyLineAntiAliasing", aa.to_setting());
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    fn redraw_preview(&self, editor: &mut Editor, cursor: Option<Pos2>) {
        editor.canvas.clear_buffer();
        let mut preview = self.points.clone();
        if let Some(cursor) = cursor {
            preview.push(cursor);
        }
        editor.canvas.stroke_polyline(
            &preview,
            self.properties.width,
            editor.front_color,
            self.properties.anti_aliasing,
        );
    }

    fn discard(&mut self, editor: &mut Editor) {
        self.points.clear();
        self.target = None;
        editor.canvas.clear_buffer();
    }

    fn commit(&mut self, editor: &mut Editor) {
        if self.points.len() < 2 {
            self.discard(editor);
            return;
        }
        match (self.target, editor.document.stroke_target()) {
            (Some(began), Some(current)) if began == current => {}
            _ => {
                debug!("polyline discarded, layer or frame changed before commit");
                self.discard(editor);
                return;
            }
        }

        if editor.document.current_bitmap().is_some() {
            self.redraw_preview(editor, None);
            if let Some(bitmap) = editor.document.current_bitmap_mut() {
                editor.canvas.composite_into(bitmap);
            }
        } else if let Some(vector) = editor.document.current_vector_mut() {
            let mut curve = Curve::from_points(self.points.clone(), self.properties.width);
            curve.color_number = editor.color_number;
            vector.add_curve(curve);
            vector.select_last();
        }
        editor.canvas.clear_buffer();
        self.points.clear();
        self.target = None;
    }
}

impl Tool for PolylineTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Polyline
    }

    fn properties(&self) -> &ToolProperties {
        &self.properties
    }

    fn load_settings(&mut self) {
        let settings = self.settings.borrow();
        self.properties.width = settings.get_f64("polyLineWidth", DEFAULT_WIDTH) as f32;
        self.properties.anti_aliasing =
            AntiAliasing::from_setting(settings.get_i64("polyLineAntiAliasing", 1));
    }

    fn pointer_press(&mut self, editor: &mut Editor, event: &PointerEvent) {
        let Some(target) = editor.document.stroke_target() else {
            debug!("polyline press ignored, current layer/frame not paintable");
            return;
        };
        if self.points.is_empty() {
            self.target = Some(target);
        }
        let point = editor.view.map_screen_to_canvas(event.position);
        self.points.push(point);
        self.redraw_preview(editor, None);
    }

    fn pointer_move(&mut self, editor: &mut Editor, event: &PointerEvent) {
        if self.points.is_empty() {
            return;
        }
        let cursor = editor.view.map_screen_to_canvas(event.position);
        self.redraw_preview(editor, Some(cursor));
    }

    fn pointer_release(&mut self, _editor: &mut Editor, _event: &PointerEvent) {}

    /// The double click pins its own vertex and then ends the figure.
    fn pointer_double_click(&mut self, editor: &mut Editor, event: &PointerEvent) {
        if editor.document.stroke_target().is_none() {
            return;
        }
        let point = editor.view.map_screen_to_canvas(event.position);
        self.points.push(point);
        self.commit(editor);
    }

    fn key_press(&mut self, editor: &mut Editor, key: Key) -> bool {
        if self.points.is_empty() {
            return false;
        }
        match key {
            Key::Enter => {
                self.commit(editor);
                true
            }
            Key::Escape => {
                self.discard(editor);
                true
            }
            _ => false,
        }
    }

    fn is_active(&self) -> bool {
        !self.points.is_empty()
    }
}
