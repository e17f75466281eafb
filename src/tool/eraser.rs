use egui::{Color32, CursorIcon, Key};
use log::debug;

use crate::canvas::AntiAliasing;
use crate::dab::DabParams;
use crate::editor::Editor;
use crate::input::PointerEvent;
use crate::settings::SharedSettings;
use crate::stroke::{StrokePoint, StrokeSession};
use crate::tool::{Tool, ToolKind, ToolProperties};

const DEFAULT_WIDTH: f64 = 24.0;
const DEFAULT_FEATHER: f64 = 48.0;

/// Freehand eraser. Stamps coverage into the scratch buffer like the
/// brush, then uses it as a transparency mask on commit instead of
/// painting it. On vector layers it removes the curves it passes over.
pub struct EraserTool {
    settings: SharedSettings,
    properties: ToolProperties,
    session: Option<StrokeSession>,
}

impl EraserTool {
    pub fn new(settings: SharedSettings) -> Self {
        Self {
            settings,
            properties: ToolProperties::default(),
            session: None,
        }
    }

    pub fn set_width(&mut self, width: f32) {
        self.properties.width = width;
        self.settings.borrow_mut().set_f64("eraserWidth", width as f64);
    }

    pub fn set_feather(&mut self, feather: f32) {
        self.properties.feather = feather;
        self.settings.borrow_mut().set_f64("eraserFeather", feather as f64);
    }

    pub fn set_use_feather(&mut self, enabled: bool) {
        self.properties.use_feather = enabled;
        self.settings.borrow_mut().set_bool("eraserUseFeather", enabled);
    }

    pub fn set_pressure(&mut self, enabled: bool) {
        self.properties.pressure = enabled;
        self.settings.borrow_mut().set_bool("eraserPressure", enabled);
    }

    pub fn set_anti_aliasing(&mut self, aa: AntiAliasing) {
        self.properties.anti_aliasing = aa;
        self.settings.borrow_mut().set_i64("eraserAntiAliasing", aa.to_setting());
    }

    fn dab_params(&self, pressure: Option<f32>) -> DabParams {
        let feather = if self.properties.use_feather {
            self.properties.feather
        } else {
            0.0
        };
        DabParams {
            base_width: self.properties.width,
            feather,
            spacing_ratio: 0.5 * (1.0 - feather / 100.0),
            pressure,
            build_up: false,
        }
    }

    fn effective_aa(&self) -> AntiAliasing {
        if self.properties.use_feather {
            AntiAliasing::ForcedOff
        } else {
            self.properties.anti_aliasing
        }
    }

    fn commit_stroke(&mut self, editor: &mut Editor, session: &StrokeSession) {
        if let Some(bitmap) = editor.document.current_bitmap_mut() {
            editor.canvas.erase_into(bitmap);
        } else if let Some(vector) = editor.document.current_vector_mut() {
            let radius = self.properties.width * 0.5;
            for point in session.points() {
                vector.remove_curves_within(point.position, radius);
            }
        }
        editor.canvas.clear_buffer();
    }
}

impl Tool for EraserTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Eraser
    }

    fn cursor(&self) -> CursorIcon {
        CursorIcon::None
    }

    fn properties(&self) -> &ToolProperties {
        &self.properties
    }

    fn load_settings(&mut self) {
        let settings = self.settings.borrow();
        self.properties.width = settings.get_f64("eraserWidth", DEFAULT_WIDTH) as f32;
        self.properties.feather = settings.get_f64("eraserFeather", DEFAULT_FEATHER) as f32;
        self.properties.use_feather = settings.get_bool("eraserUseFeather", true);
        self.properties.pressure = settings.get_bool("eraserPressure", true);
        self.properties.anti_aliasing =
            AntiAliasing::from_setting(settings.get_i64("eraserAntiAliasing", 1));
    }

    fn pointer_press(&mut self, editor: &mut Editor, event: &PointerEvent) {
        let Some(target) = editor.document.stroke_target() else {
            debug!("eraser press ignored, current layer/frame not paintable");
            return;
        };
        let point = editor.view.map_screen_to_canvas(event.position);
        let pressure = event.effective_pressure(self.properties.pressure).unwrap_or(1.0);
        self.session = Some(StrokeSession::begin(point, pressure, 0, target));
    }

    fn pointer_move(&mut self, editor: &mut Editor, event: &PointerEvent) {
        let pressure = event.effective_pressure(self.properties.pressure);
        let params = self.dab_params(pressure);
        let aa = self.effective_aa();
        let use_feather = self.properties.use_feather;
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let point = editor.view.map_screen_to_canvas(event.position);
        session.record(StrokePoint {
            position: point,
            pressure: pressure.unwrap_or(1.0),
        });

        let from = session.last_dab_point;
        let dabs = session.engine.dab_segment(from, point, &params);
        session.last_dab_point = point;
        if dabs.is_empty() {
            return;
        }
        let region = session.engine.dirty_bounds(params.effective_width() * 0.5);
        session.engine.clear_dirty();
        for dab in &dabs {
            editor.canvas.draw_dab(dab, Color32::WHITE, use_feather, aa);
        }
        editor.canvas.invalidate(region, 0.0);
    }

    fn pointer_release(&mut self, editor: &mut Editor, event: &PointerEvent) {
        let Some(mut session) = self.session.take() else {
            return;
        };
        match editor.document.stroke_target() {
            Some(target) if session.targets(target) => {}
            _ => {
                debug!("eraser stroke discarded, layer or frame changed mid-stroke");
                editor.canvas.clear_buffer();
                return;
            }
        }

        let point = editor.view.map_screen_to_canvas(event.position);
        let pressure = event.effective_pressure(self.properties.pressure);
        let params = self.dab_params(pressure);
        let aa = self.effective_aa();

        if session.travel(point) < 1.0 {
            let dab = session.engine.single_dab(session.press_point, &params);
            editor
                .canvas
                .draw_dab(&dab, Color32::WHITE, self.properties.use_feather, aa);
        } else {
            session.record(StrokePoint {
                position: point,
                pressure: pressure.unwrap_or(1.0),
            });
            let from = session.last_dab_point;
            let dabs = session.engine.dab_segment(from, point, &params);
            for dab in &dabs {
                editor
                    .canvas
                    .draw_dab(dab, Color32::WHITE, self.properties.use_feather, aa);
            }
        }
        let region = session.engine.dirty_bounds(params.effective_width() * 0.5);
        session.engine.clear_dirty();
        editor.canvas.invalidate(region, 0.0);

        self.commit_stroke(editor, &session);
    }

    fn key_press(&mut self, editor: &mut Editor, key: Key) -> bool {
        if key == Key::Escape && self.session.is_some() {
            self.session = None;
            editor.canvas.clear_buffer();
            return true;
        }
        false
    }

    fn brush_footprint(&self) -> Option<f32> {
        Some(self.properties.width)
    }

    fn is_active(&self) -> bool {
        self.session.is_some()
    }
}
