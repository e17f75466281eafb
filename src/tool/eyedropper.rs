use egui::{Color32, CursorIcon};

use crate::editor::Editor;
use crate::input::PointerEvent;
use crate::settings::SharedSettings;
use crate::tool::{Tool, ToolKind, ToolProperties};

/// Picks the color under the cursor. On bitmap layers the sampled pixel
/// is composited against white so a half-transparent stroke picks up as
/// the color it appears on paper; on vector layers it picks the palette
/// number of the curve under the cursor.
pub struct EyedropperTool {
    #[allow(dead_code)]
    settings: SharedSettings,
    properties: ToolProperties,
    sampled: Option<Color32>,
}

impl EyedropperTool {
    pub fn new(settings: SharedSettings) -> Self {
        Self {
            settings,
            properties: ToolProperties::default(),
            sampled: None,
        }
    }

    /// The color currently under the cursor, for the cursor preview swatch.
    pub fn sampled_color(&self) -> Option<Color32> {
        self.sampled
    }

    fn sample(&mut self, editor: &Editor, event: &PointerEvent) {
        let point = editor.view.map_screen_to_canvas(event.position);
        self.sampled = editor
            .document
            .current_bitmap()
            .and_then(|bitmap| bitmap.pixel_at(point))
            .map(over_white);
    }
}

/// Composite against a white background, keeping full opacity in the
/// result. The per-channel `c + (255 - a)` form is the premultiplied-byte
/// formula; against this crate's straight-alpha buffers it biases
/// translucent picks toward white.
fn over_white(color: Color32) -> Color32 {
    let pad = 255 - color.a();
    Color32::from_rgb(
        color.r().saturating_add(pad),
        color.g().saturating_add(pad),
        color.b().saturating_add(pad),
    )
}

impl Tool for EyedropperTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Eyedropper
    }

    fn cursor(&self) -> CursorIcon {
        CursorIcon::Crosshair
    }

    fn properties(&self) -> &ToolProperties {
        &self.properties
    }

    fn load_settings(&mut self) {}

    fn pointer_press(&mut self, editor: &mut Editor, event: &PointerEvent) {
        self.sample(editor, event);
    }

    fn pointer_move(&mut self, editor: &mut Editor, event: &PointerEvent) {
        self.sample(editor, event);
    }

    fn pointer_release(&mut self, editor: &mut Editor, event: &PointerEvent) {
        let point = editor.view.map_screen_to_canvas(event.position);
        if let Some(bitmap) = editor.document.current_bitmap() {
            if let Some(color) = bitmap.pixel_at(point) {
                if color.a() != 0 {
                    editor.front_color = over_white(color);
                }
            }
        } else if let Some(vector) = editor.document.current_vector() {
            let picked = vector
                .curves()
                .iter()
                .rev()
                .find(|curve| curve.bounds().contains(point))
                .map(|curve| curve.color_number);
            if let Some(number) = picked {
                editor.color_number = number;
            }
        }
    }
}
