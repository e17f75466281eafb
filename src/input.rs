use egui::{Modifiers, PointerButton, Pos2};

/// A pointer sample delivered to the active tool.
///
/// Positions are in screen coordinates; tools map them to canvas space
/// through the editor's view transform. `pressure` is only meaningful for
/// tablet devices — a mouse reports `from_tablet == false` and downstream
/// pressure math treats it as full pressure.
#[derive(Debug, Clone, Copy)]
pub struct PointerEvent {
    pub position: Pos2,
    pub pressure: Option<f32>,
    pub button: PointerButton,
    pub modifiers: Modifiers,
    pub from_tablet: bool,
}

impl PointerEvent {
    pub fn mouse(position: Pos2) -> Self {
        Self {
            position,
            pressure: None,
            button: PointerButton::Primary,
            modifiers: Modifiers::NONE,
            from_tablet: false,
        }
    }

    pub fn tablet(position: Pos2, pressure: f32) -> Self {
        Self {
            position,
            pressure: Some(pressure),
            button: PointerButton::Primary,
            modifiers: Modifiers::NONE,
            from_tablet: true,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    /// Pressure to feed the dab engine: `None` when the tool has pressure
    /// sensitivity disabled or the device is a mouse.
    pub fn effective_pressure(&self, pressure_enabled: bool) -> Option<f32> {
        if pressure_enabled && self.from_tablet {
            Some(self.pressure.unwrap_or(1.0))
        } else {
            None
        }
    }
}
