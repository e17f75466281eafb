use crate::curve::VectorImage;
use crate::layer::{BitmapImage, Layer, LayerContent};
use crate::stroke::StrokeTarget;

/// The layer/frame model the tools draw into.
///
/// The tool core treats this as an external collaborator: it looks up the
/// current layer's content and writes into it, but never manages layer or
/// frame lifecycles beyond that.
#[derive(Debug, Default)]
pub struct Document {
    layers: Vec<Layer>,
    pub current_layer: usize,
    pub current_frame: usize,
    pub width: u32,
    pub height: u32,
}

impl Document {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            layers: Vec::new(),
            current_layer: 0,
            current_frame: 0,
            width,
            height,
        }
    }

    pub fn add_layer(&mut self, layer: Layer) -> usize {
        self.layers.push(layer);
        self.layers.len() - 1
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    pub fn current(&self) -> Option<&Layer> {
        self.layers.get(self.current_layer)
    }

    pub fn current_mut(&mut self) -> Option<&mut Layer> {
        self.layers.get_mut(self.current_layer)
    }

    /// Identity of the spot strokes would commit to right now; `None`
    /// when there is nothing paintable under the cursor.
    pub fn stroke_target(&self) -> Option<StrokeTarget> {
        let layer = self.current()?;
        if !layer.is_paintable(self.current_frame) {
            return None;
        }
        Some(StrokeTarget {
            layer: layer.id,
            frame: self.current_frame,
        })
    }

    pub fn is_paintable(&self) -> bool {
        self.stroke_target().is_some()
    }

    pub fn current_content(&self) -> Option<&LayerContent> {
        let frame = self.current_frame;
        self.current()?.content_at(frame)
    }

    pub fn current_content_mut(&mut self) -> Option<&mut LayerContent> {
        let frame = self.current_frame;
        self.current_mut()?.content_at_mut(frame)
    }

    pub fn current_bitmap(&self) -> Option<&BitmapImage> {
        self.current_content()?.as_bitmap()
    }

    pub fn current_bitmap_mut(&mut self) -> Option<&mut BitmapImage> {
        self.current_content_mut()?.as_bitmap_mut()
    }

    pub fn current_vector(&self) -> Option<&VectorImage> {
        self.current_content()?.as_vector()
    }

    pub fn current_vector_mut(&mut self) -> Option<&mut VectorImage> {
        self.current_content_mut()?.as_vector_mut()
    }
}
