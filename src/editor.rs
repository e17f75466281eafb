use egui::Color32;

use crate::canvas::{CanvasSurface, ScratchBuffer};
use crate::document::Document;
use crate::selection::SelectionManager;
use crate::view::ViewTransform;

/// Everything a tool needs to act on: the document, the scratch surface
/// strokes render into, the view mapping, and the selection state.
///
/// Tools receive `&mut Editor` on every pointer event instead of owning
/// any of this themselves.
pub struct Editor {
    pub document: Document,
    pub view: ViewTransform,
    pub canvas: Box<dyn CanvasSurface>,
    pub selection: SelectionManager,
    pub front_color: Color32,
    pub color_number: usize,
    pub curve_smoothing: f32,
}

impl Editor {
    pub fn new(document: Document) -> Self {
        let canvas = ScratchBuffer::new(document.width, document.height);
        Self {
            document,
            view: ViewTransform::default(),
            canvas: Box::new(canvas),
            selection: SelectionManager::new(),
            front_color: Color32::BLACK,
            color_number: 0,
            curve_smoothing: 1.0,
        }
    }

    /// Clears both the rectangle selection and any per-curve selection
    /// flags on the current vector frame.
    pub fn deselect_all(&mut self) {
        self.selection.deselect();
        if let Some(vector) = self.document.current_vector_mut() {
            vector.deselect_all();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_editor_has_no_selection() {
        let editor = Editor::new(Document::new(64, 64));
        assert!(!editor.selection.has_selection());
        assert_eq!(editor.curve_smoothing, 1.0);
    }
}
