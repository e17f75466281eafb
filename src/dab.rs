use egui::Pos2;

use crate::geometry::BlitRect;

/// One brush stamp along a stroke. Produced and consumed within a single
/// stroke-draw call, never persisted.
#[derive(Debug, Clone, Copy)]
pub struct Dab {
    pub position: Pos2,
    pub width: f32,
    pub opacity: f32,
    pub feather: f32,
}

/// Per-call brush parameters for the dab engine.
///
/// `pressure == None` means pressure handling is off for this stroke
/// (either the tool has it disabled or the device is a mouse); dabs then
/// get full width and opacity. `build_up` halves the opacity so repeated
/// passes layer up, which is how the paint brush differs from the eraser.
#[derive(Debug, Clone, Copy)]
pub struct DabParams {
    pub base_width: f32,
    pub feather: f32,
    pub spacing_ratio: f32,
    pub pressure: Option<f32>,
    pub build_up: bool,
}

impl DabParams {
    pub fn effective_width(&self) -> f32 {
        match self.pressure {
            Some(p) => (self.base_width + p * self.base_width) * 0.5,
            None => self.base_width,
        }
    }

    pub fn opacity(&self) -> f32 {
        match self.pressure {
            Some(p) if self.build_up => p * 0.5,
            Some(p) => p,
            None => 1.0,
        }
    }

    pub fn spacing(&self) -> f32 {
        (self.spacing_ratio * self.base_width).max(1.0)
    }
}

/// Turns stroke segments into evenly spaced dabs.
///
/// Sub-spacing distance left over at the end of one segment carries into
/// the next call, so a stroke built from many pointer-move segments gets
/// the same dab placement as one long segment.
#[derive(Debug, Default)]
pub struct DabEngine {
    leftover: f32,
    dirty: BlitRect,
}

impl DabEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn leftover(&self) -> f32 {
        self.leftover
    }

    /// Emits the dabs for the segment `a -> b`. A zero-length segment
    /// emits nothing and leaves the leftover distance untouched.
    pub fn dab_segment(&mut self, a: Pos2, b: Pos2, params: &DabParams) -> Vec<Dab> {
        let distance = a.distance(b);
        if distance <= 0.0 {
            return Vec::new();
        }

        let spacing = params.spacing();
        let direction = (b - a) / distance;
        let width = params.effective_width();
        let opacity = params.opacity();

        let mut dabs = Vec::new();
        let mut total = self.leftover + distance;
        let mut travelled = -self.leftover;
        while total >= spacing {
            travelled += spacing;
            let position = a + direction * travelled;
            self.dirty.extend(position);
            dabs.push(Dab {
                position,
                width,
                opacity,
                feather: params.feather,
            });
            total -= spacing;
        }
        self.leftover = total;
        dabs
    }

    /// Single stamp, used for click-without-drag strokes.
    pub fn single_dab(&mut self, position: Pos2, params: &DabParams) -> Dab {
        self.dirty.extend(position);
        Dab {
            position,
            width: params.effective_width(),
            opacity: params.opacity(),
            feather: params.feather,
        }
    }

    /// Region touched since the last [`Self::clear_dirty`], grown by
    /// `radius` so callers can invalidate the full dab footprint.
    pub fn dirty_bounds(&self, radius: f32) -> egui::Rect {
        self.dirty.bounds(radius)
    }

    pub fn clear_dirty(&mut self) {
        self.dirty.reset();
    }

    pub fn reset(&mut self) {
        self.leftover = 0.0;
        self.dirty.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    fn params() -> DabParams {
        DabParams {
            base_width: 16.0,
            feather: 0.0,
            spacing_ratio: 0.5,
            pressure: None,
            build_up: false,
        }
    }

    #[test]
    fn spacing_clamps_to_one() {
        let p = DabParams {
            base_width: 1.0,
            spacing_ratio: 0.1,
            ..params()
        };
        assert_eq!(p.spacing(), 1.0);
    }

    #[test]
    fn dab_count_matches_floor_formula() {
        let mut engine = DabEngine::new();
        // spacing = 8; 20 units of travel -> 2 dabs, 4 left over
        let dabs = engine.dab_segment(pos2(0.0, 0.0), pos2(20.0, 0.0), &params());
        assert_eq!(dabs.len(), 2);
        assert_eq!(engine.leftover(), 4.0);
        assert_eq!(dabs[0].position, pos2(8.0, 0.0));
        assert_eq!(dabs[1].position, pos2(16.0, 0.0));
    }

    #[test]
    fn zero_length_segment_defers_leftover() {
        let mut engine = DabEngine::new();
        engine.dab_segment(pos2(0.0, 0.0), pos2(7.0, 0.0), &params());
        assert_eq!(engine.leftover(), 7.0);
        let dabs = engine.dab_segment(pos2(7.0, 0.0), pos2(7.0, 0.0), &params());
        assert!(dabs.is_empty());
        assert_eq!(engine.leftover(), 7.0);
    }

    #[test]
    fn pressure_blend_endpoints() {
        let full = DabParams {
            pressure: Some(1.0),
            ..params()
        };
        let none = DabParams {
            pressure: Some(0.0),
            ..params()
        };
        assert_eq!(full.effective_width(), 16.0);
        assert_eq!(none.effective_width(), 8.0);
        assert_eq!(full.opacity(), 1.0);
        assert_eq!(none.opacity(), 0.0);
    }

    #[test]
    fn build_up_halves_opacity() {
        let p = DabParams {
            pressure: Some(0.8),
            build_up: true,
            ..params()
        };
        assert!((p.opacity() - 0.4).abs() < 1e-6);
    }
}
