use egui::{Pos2, Vec2};

/// Screen <-> canvas mapping. Zoom scale feeds width, dab spacing and
/// curve-fitting tolerance so those stay resolution independent.
#[derive(Debug, Clone, Copy)]
pub struct ViewTransform {
    pub offset: Vec2,
    pub scale: f32,
}

impl ViewTransform {
    pub fn identity() -> Self {
        Self {
            offset: Vec2::ZERO,
            scale: 1.0,
        }
    }

    pub fn map_screen_to_canvas(&self, p: Pos2) -> Pos2 {
        ((p - self.offset).to_vec2() / self.scale).to_pos2()
    }

    pub fn map_canvas_to_screen(&self, p: Pos2) -> Pos2 {
        (p.to_vec2() * self.scale).to_pos2() + self.offset
    }

    pub fn scaling(&self) -> f32 {
        self.scale
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn round_trip() {
        let view = ViewTransform {
            offset: Vec2::new(100.0, 50.0),
            scale: 2.0,
        };
        let p = pos2(130.0, 70.0);
        let canvas = view.map_screen_to_canvas(p);
        assert_eq!(canvas, pos2(15.0, 10.0));
        assert_eq!(view.map_canvas_to_screen(canvas), p);
    }
}
