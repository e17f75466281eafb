mod brush;
mod eraser;
mod eyedropper;
mod move_tool;
mod polyline;
mod select;

pub use brush::BrushTool;
pub use eraser::EraserTool;
pub use eyedropper::EyedropperTool;
pub use move_tool::MoveTool;
pub use polyline::PolylineTool;
pub use select::SelectTool;

use egui::{CursorIcon, Key};
use serde::{Deserialize, Serialize};

use crate::canvas::AntiAliasing;
use crate::editor::Editor;
use crate::input::PointerEvent;
use crate::selection::TransformDecision;
use crate::settings::SharedSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolKind {
    Brush,
    Eraser,
    Polyline,
    Select,
    Move,
    Eyedropper,
}

/// The adjustable properties a tool exposes. Not every tool uses every
/// field; each tool's `load_settings` fills in the ones it cares about
/// and leaves the rest at defaults.
#[derive(Debug, Clone, Copy)]
pub struct ToolProperties {
    pub width: f32,
    pub feather: f32,
    pub use_feather: bool,
    pub pressure: bool,
    pub invisibility: bool,
    pub stabilizer_level: u32,
    pub anti_aliasing: AntiAliasing,
}

impl Default for ToolProperties {
    fn default() -> Self {
        Self {
            width: 1.0,
            feather: 0.0,
            use_feather: false,
            pressure: false,
            invisibility: false,
            stabilizer_level: 0,
            anti_aliasing: AntiAliasing::On,
        }
    }
}

/// Behavior shared by every tool. Tools are long-lived: one instance per
/// kind, created at startup with a settings handle, switched between by
/// the editor shell.
pub trait Tool {
    fn kind(&self) -> ToolKind;

    fn cursor(&self) -> CursorIcon {
        CursorIcon::Crosshair
    }

    fn properties(&self) -> &ToolProperties;

    /// Reads persisted property values from the settings store. Called
    /// once after construction.
    fn load_settings(&mut self);

    fn pointer_press(&mut self, editor: &mut Editor, event: &PointerEvent);
    fn pointer_move(&mut self, editor: &mut Editor, event: &PointerEvent);
    fn pointer_release(&mut self, editor: &mut Editor, event: &PointerEvent);

    fn pointer_double_click(&mut self, editor: &mut Editor, event: &PointerEvent) {
        self.pointer_press(editor, event);
    }

    /// Returns true when the tool consumed the key.
    fn key_press(&mut self, _editor: &mut Editor, _key: Key) -> bool {
        false
    }

    /// Diameter of the brush outline cursor, when the tool has one.
    fn brush_footprint(&self) -> Option<f32> {
        None
    }

    /// True while a gesture is in progress (stroke, drag, or open
    /// polyline) and tool switches should be refused.
    fn is_active(&self) -> bool {
        false
    }

    fn has_pending_transform(&self, _editor: &Editor) -> bool {
        false
    }

    /// Called when the host is about to switch layer or frame while a
    /// transform is pending. Returns false when the switch must be
    /// blocked (`Cancel`).
    fn resolve_pending_transform(&mut self, _editor: &mut Editor, _decision: TransformDecision) -> bool {
        true
    }
}

/// Concrete dispatch over the tool set, avoiding a boxed trait object for
/// the active tool.
pub enum ToolType {
    Brush(BrushTool),
    Eraser(EraserTool),
    Polyline(PolylineTool),
    Select(SelectTool),
    Move(MoveTool),
    Eyedropper(EyedropperTool),
}

impl ToolType {
    /// Builds a tool of the given kind with its persisted settings
    /// already loaded.
    pub fn new(kind: ToolKind, settings: SharedSettings) -> Self {
        let mut tool = match kind {
            ToolKind::Brush => ToolType::Brush(BrushTool::new(settings)),
            ToolKind::Eraser => ToolType::Eraser(EraserTool::new(settings)),
            ToolKind::Polyline => ToolType::Polyline(PolylineTool::new(settings)),
            ToolKind::Select => ToolType::Select(SelectTool::new(settings)),
            ToolKind::Move => ToolType::Move(MoveTool::new(settings)),
            ToolKind::Eyedropper => ToolType::Eyedropper(EyedropperTool::new(settings)),
        };
        tool.as_tool_mut().load_settings();
        tool
    }

    pub fn as_tool(&self) -> &dyn Tool {
        match self {
            ToolType::Brush(t) => t,
            ToolType::Eraser(t) => t,
            ToolType::Polyline(t) => t,
            ToolType::Select(t) => t,
            ToolType::Move(t) => t,
            ToolType::Eyedropper(t) => t,
        }
    }

    pub fn as_tool_mut(&mut self) -> &mut dyn Tool {
        match self {
            ToolType::Brush(t) => t,
            ToolType::Eraser(t) => t,
            ToolType::Polyline(t) => t,
            ToolType::Select(t) => t,
            ToolType::Move(t) => t,
            ToolType::Eyedropper(t) => t,
        }
    }

    pub fn kind(&self) -> ToolKind {
        self.as_tool().kind()
    }
}

impl Tool for ToolType {
    fn kind(&self) -> ToolKind {
        self.as_tool().kind()
    }

    fn cursor(&self) -> CursorIcon {
        self.as_tool().cursor()
    }

    fn properties(&self) -> &ToolProperties {
        self.as_tool().properties()
    }

    fn load_settings(&mut self) {
        self.as_tool_mut().load_settings();
    }

    fn pointer_press(&mut self, editor: &mut Editor, event: &PointerEvent) {
        self.as_tool_mut().pointer_press(editor, event);
    }

    fn pointer_move(&mut self, editor: &mut Editor, event: &PointerEvent) {
        self.as_tool_mut().pointer_move(editor, event);
    }

    fn pointer_release(&mut self, editor: &mut Editor, event: &PointerEvent) {
        self.as_tool_mut().pointer_release(editor, event);
    }

    fn pointer_double_click(&mut self, editor: &mut Editor, event: &PointerEvent) {
        self.as_tool_mut().pointer_double_click(editor, event);
    }

    fn key_press(&mut self, editor: &mut Editor, key: Key) -> bool {
        self.as_tool_mut().key_press(editor, key)
    }

    fn brush_footprint(&self) -> Option<f32> {
        self.as_tool().brush_footprint()
    }

    fn is_active(&self) -> bool {
        self.as_tool().is_active()
    }

    fn has_pending_transform(&self, editor: &Editor) -> bool {
        self.as_tool().has_pending_transform(editor)
    }

    fn resolve_pending_transform(&mut self, editor: &mut Editor, decision: TransformDecision) -> bool {
        self.as_tool_mut().resolve_pending_transform(editor, decision)
    }
}
