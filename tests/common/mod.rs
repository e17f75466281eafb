#![allow(dead_code)]

use std::any::Any;

use celpaint::canvas::{AntiAliasing, CanvasSurface, ScratchBuffer};
use celpaint::dab::Dab;
use celpaint::document::Document;
use celpaint::editor::Editor;
use celpaint::layer::{BitmapImage, Layer};
use celpaint::settings::{self, MemorySettings, SharedSettings};
use egui::{Color32, Pos2, Rect};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn settings() -> SharedSettings {
    settings::shared(MemorySettings::new())
}

pub fn bitmap_editor() -> Editor {
    let mut document = Document::new(64, 64);
    document.add_layer(Layer::new_bitmap("bitmap", 64, 64, 1));
    Editor::new(document)
}

pub fn vector_editor() -> Editor {
    let mut document = Document::new(64, 64);
    document.add_layer(Layer::new_vector("vector", 1));
    Editor::new(document)
}

/// Canvas wrapper that keeps a log of every dab ever stamped, surviving
/// buffer clears, so tests can count dabs after a stroke commits.
pub struct RecordingCanvas {
    inner: ScratchBuffer,
    pub log: Vec<Dab>,
}

impl RecordingCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            inner: ScratchBuffer::new(width, height),
            log: Vec::new(),
        }
    }

    pub fn buffer_is_clear(&self) -> bool {
        self.inner.is_clear()
    }
}

impl CanvasSurface for RecordingCanvas {
    fn draw_dab(&mut self, dab: &Dab, color: Color32, use_feather: bool, aa: AntiAliasing) {
        self.log.push(*dab);
        self.inner.draw_dab(dab, color, use_feather, aa);
    }

    fn stroke_polyline(&mut self, points: &[Pos2], width: f32, color: Color32, aa: AntiAliasing) {
        self.inner.stroke_polyline(points, width, color, aa);
    }

    fn composite_into(&mut self, target: &mut BitmapImage) {
        self.inner.composite_into(target);
    }

    fn erase_into(&mut self, target: &mut BitmapImage) {
        self.inner.erase_into(target);
    }

    fn clear_buffer(&mut self) {
        self.inner.clear_buffer();
    }

    fn invalidate(&mut self, rect: Rect, radius: f32) {
        self.inner.invalidate(rect, radius);
    }

    fn take_damage(&mut self) -> Rect {
        self.inner.take_damage()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub fn with_recording_canvas(editor: &mut Editor) {
    let (w, h) = (editor.document.width, editor.document.height);
    editor.canvas = Box::new(RecordingCanvas::new(w, h));
}

pub fn recorded(editor: &Editor) -> &RecordingCanvas {
    editor
        .canvas
        .as_any()
        .downcast_ref::<RecordingCanvas>()
        .unwrap()
}
