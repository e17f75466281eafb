use egui::{CursorIcon, Key};
use log::debug;

use crate::canvas::AntiAliasing;
use crate::curve::Curve;
use crate::dab::DabParams;
use crate::editor::Editor;
use crate::input::PointerEvent;
use crate::settings::SharedSettings;
use crate::stroke::{StrokePoint, StrokeSession};
use crate::tool::{Tool, ToolKind, ToolProperties};

const DEFAULT_WIDTH: f64 = 15.0;
const DEFAULT_FEATHER: f64 = 15.0;

/// Freehand paint brush. On bitmap layers it composites the stroke into
/// the frame raster; on vector layers it fits the sampled points into a
/// curve instead.
pub struct BrushTool {
    settings: SharedSettings,
    properties: ToolProperties,
    session: Option<StrokeSession>,
}

impl BrushTool {
    pub fn new(settings: SharedSettings) -> Self {
        Self {
            settings,
            properties: ToolProperties::default(),
            session: None,
        }
    }

    pub fn set_width(&mut self, width: f32) {
        self.properties.width = width;
        self.settings.borrow_mut().set_f64("brushWidth", width as f64);
    }

    pub fn set_feather(&mut self, feather: f32) {
        self.properties.feather = feather;
        self.settings.borrow_mut().set_f64("brushFeather", feather as f64);
    }

    pub fn set_use_feather(&mut self, enabled: bool) {
        self.properties.use_feather = enabled;
        self.settings.borrow_mut().set_bool("brushUseFeather", enabled);
    }

    pub fn set_pressure(&mut self, enabled: bool) {
        self.properties.pressure = enabled;
        self.settings.borrow_mut().set_bool("brushPressure", enabled);
    }

    pub fn set_invisibility(&mut self, enabled: bool) {
        self.properties.invisibility = enabled;
        self.settings.borrow_mut().set_bool("brushInvisibility", enabled);
    }

    pub fn set_stabilizer_level(&mut self, level: u32) {
        self.properties.stabilizer_level = level;
        self.settings
            .borrow_mut()
            .set_i64("stabilizerLevel", i64::from(level));
        if let Some(session) = self.session.as_mut() {
            session.interpolator.set_level(level);
        }
    }

    pub fn set_anti_aliasing(&mut self, aa: AntiAliasing) {
        self.properties.anti_aliasing = aa;
        self.settings.borrow_mut().set_i64("antiAliasing", aa.to_setting());
    }

    fn effective_aa(&self) -> AntiAliasing {
        if self.properties.use_feather {
            AntiAliasing::ForcedOff
        } else {
            self.properties.anti_aliasing
        }
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
            build_up: true,
        }
    }

    fn cancel_stroke(&mut self, editor: &mut Editor) {
        if self.session.take().is_some() {
            editor.canvas.clear_buffer();
        }
    }

    fn commit_stroke(&mut self, editor: &mut Editor, session: StrokeSession) {
        if let Some(bitmap) = editor.document.current_bitmap_mut() {
            editor.canvas.composite_into(bitmap);
        } else if editor.document.current_vector().is_some() {
            let tolerance = editor.curve_smoothing / editor.view.scaling();
            let mut curve = Curve::fit(
                session.points(),
                tolerance,
                self.properties.width,
                self.properties.pressure,
            );
            curve.feather = self.properties.feather;
            curve.invisible = self.properties.invisibility;
            curve.color_number = editor.color_number;
            if let Some(vector) = editor.document.current_vector_mut() {
                vector.add_curve(curve);
                vector.select_last();
            }
        }
        editor.canvas.clear_buffer();
    }
}

impl Tool for BrushTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Brush
    }

    fn cursor(&self) -> CursorIcon {
        CursorIcon::None
    }

    fn properties(&self) -> &ToolProperties {
        &self.properties
    }

    fn load_settings(&mut self) {
        let settings = self.settings.borrow();
        self.properties.width = settings.get_f64("brushWidth", DEFAULT_WIDTH) as f32;
        self.properties.feather = settings.get_f64("brushFeather", DEFAULT_FEATHER) as f32;
        self.properties.use_feather = settings.get_bool("brushUseFeather", true);
        self.properties.pressure = settings.get_bool("brushPressure", false);
        self.properties.invisibility = settings.get_bool("brushInvisibility", false);
        self.properties.stabilizer_level = settings.get_i64("stabilizerLevel", 1) as u32;
        self.properties.anti_aliasing =
            AntiAliasing::from_setting(settings.get_i64("antiAliasing", 1));
    }

    fn pointer_press(&mut self, editor: &mut Editor, event: &PointerEvent) {
        let Some(target) = editor.document.stroke_target() else {
            debug!("brush press ignored, current layer/frame not paintable");
            return;
        };
        let point = editor.view.map_screen_to_canvas(event.position);
        let pressure = event.effective_pressure(self.properties.pressure).unwrap_or(1.0);
        self.session = Some(StrokeSession::begin(
            point,
            pressure,
            self.properties.stabilizer_level,
            target,
        ));
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
        let smoothed = session
            .interpolator
            .smooth(point, pressure.unwrap_or(1.0));
        session.record(smoothed);

        let from = session.last_dab_point;
        let dabs = session.engine.dab_segment(from, smoothed.position, &params);
        session.last_dab_point = smoothed.position;
        if dabs.is_empty() {
            return;
        }
        let region = session.engine.dirty_bounds(params.effective_width() * 0.5);
        session.engine.clear_dirty();
        for dab in &dabs {
            editor.canvas.draw_dab(dab, editor.front_color, use_feather, aa);
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
                debug!("brush stroke discarded, layer or frame changed mid-stroke");
                editor.canvas.clear_buffer();
                return;
            }
        }

        let point = editor.view.map_screen_to_canvas(event.position);
        let pressure = event.effective_pressure(self.properties.pressure);
        let params = self.dab_params(pressure);
        let aa = self.effective_aa();

        if session.travel(point) < 1.0 {
            // A click without meaningful drag still leaves one dab.
            let dab = session.engine.single_dab(session.press_point, &params);
            editor
                .canvas
                .draw_dab(&dab, editor.front_color, self.properties.use_feather, aa);
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
                    .draw_dab(dab, editor.front_color, self.properties.use_feather, aa);
            }
        }
        let region = session.engine.dirty_bounds(params.effective_width() * 0.5);
        session.engine.clear_dirty();
        editor.canvas.invalidate(region, 0.0);

        self.commit_stroke(editor, session);
    }

    fn key_press(&mut self, editor: &mut Editor, key: Key) -> bool {
        if key == Key::Escape && self.session.is_some() {
            self.cancel_stroke(editor);
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
