use std::any::Any;

use egui::{Color32, Pos2, Rect, pos2};

use crate::dab::Dab;
use crate::geometry::BlitRect;
use crate::layer::BitmapImage;

/// Anti-aliasing request for stamp edges. `ForcedOff` is what a feathered
/// brush reports: the feather falloff replaces edge smoothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AntiAliasing {
    On,
    Off,
    ForcedOff,
}

impl AntiAliasing {
    /// Tri-state integer as persisted: 1 on, 0 off, -1 forced off while
    /// feathered.
    pub fn from_setting(value: i64) -> Self {
        match value {
            v if v < 0 => AntiAliasing::ForcedOff,
            0 => AntiAliasing::Off,
            _ => AntiAliasing::On,
        }
    }

    pub fn to_setting(self) -> i64 {
        match self {
            AntiAliasing::On => 1,
            AntiAliasing::Off => 0,
            AntiAliasing::ForcedOff => -1,
        }
    }
}

/// The raster surface the tools stamp into. The core never rasterizes
/// directly; it only issues these requests against the scratch buffer and
/// composites the result into a layer on commit.
pub trait CanvasSurface {
    /// Stamps one dab. Damage reporting is the caller's job: the dab
    /// engine tracks the touched region and the tool pushes it through
    /// `invalidate`.
    fn draw_dab(&mut self, dab: &Dab, color: Color32, use_feather: bool, aa: AntiAliasing);

    fn stroke_polyline(&mut self, points: &[Pos2], width: f32, color: Color32, aa: AntiAliasing);

    /// Merges the uncommitted buffer into `target` (the permanent layer
    /// raster). Does not clear; callers pair this with `clear_buffer`.
    fn composite_into(&mut self, target: &mut BitmapImage);

    /// Uses the buffer's coverage as an erase mask on `target` instead of
    /// painting it. Does not clear either.
    fn erase_into(&mut self, target: &mut BitmapImage);

    fn clear_buffer(&mut self);

    /// Records a region needing redraw, grown by `radius`.
    fn invalidate(&mut self, rect: Rect, radius: f32);

    /// Damage accumulated since the last `take_damage`.
    fn take_damage(&mut self) -> Rect;

    fn as_any(&self) -> &dyn Any;
}

/// Transient raster surface holding an uncommitted stroke or transform
/// preview. Exclusively owned by the in-progress gesture; cleared on
/// commit or cancel.
#[derive(Debug)]
pub struct ScratchBuffer {
    image: BitmapImage,
    dabs: Vec<Dab>,
    damage: BlitRect,
}

impl ScratchBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: BitmapImage::new(width, height),
            dabs: Vec::new(),
            damage: BlitRect::new(),
        }
    }

    /// Dabs stamped since the last clear, in order. The host uses this
    /// for live stroke preview.
    pub fn dabs(&self) -> &[Dab] {
        &self.dabs
    }

    pub fn dab_count(&self) -> usize {
        self.dabs.len()
    }

    pub fn image(&self) -> &BitmapImage {
        &self.image
    }

    pub fn is_clear(&self) -> bool {
        self.dabs.is_empty() && self.image.is_blank()
    }

    fn stamp(&mut self, center: Pos2, width: f32, feather: f32, opacity: f32, color: Color32, use_feather: bool, aa: AntiAliasing) {
        let radius = (width * 0.5).max(0.5);
        let solid = if use_feather {
            radius * (1.0 - (feather / 100.0).clamp(0.0, 1.0))
        } else {
            radius
        };
        let min_y = (center.y - radius).floor();
        let max_y = (center.y + radius).ceil();
        let min_x = (center.x - radius).floor();
        let max_x = (center.x + radius).ceil();
        let mut y = min_y;
        while y < max_y {
            let mut x = min_x;
            while x < max_x {
                let here = pos2(x + 0.5, y + 0.5);
                let dist = center.distance(here);
                let cover = if dist <= solid {
                    1.0
                } else if use_feather && dist < radius {
                    (radius - dist) / (radius - solid).max(f32::EPSILON)
                } else if aa == AntiAliasing::On && dist < radius + 1.0 {
                    (radius + 1.0 - dist).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                if cover > 0.0 {
                    self.image.blend_pixel(here, color, opacity * cover);
                }
                x += 1.0;
            }
            y += 1.0;
        }
    }
}

impl CanvasSurface for ScratchBuffer {
    fn draw_dab(&mut self, dab: &Dab, color: Color32, use_feather: bool, aa: AntiAliasing) {
        self.stamp(
            dab.position,
            dab.width,
            dab.feather,
            dab.opacity,
            color,
            use_feather,
            aa,
        );
        self.dabs.push(*dab);
    }

    fn stroke_polyline(&mut self, points: &[Pos2], width: f32, color: Color32, aa: AntiAliasing) {
        let mut touched = BlitRect::new();
        for point in points {
            touched.extend(*point);
        }
        self.damage.extend_rect(touched.bounds(width * 0.5 + 1.0));
        for pair in points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let distance = a.distance(b);
            let steps = distance.ceil() as usize;
            for i in 0..=steps {
                let t = if steps == 0 { 0.0 } else { i as f32 / steps as f32 };
                self.stamp(a + (b - a) * t, width, 0.0, 1.0, color, false, aa);
            }
        }
        if points.len() == 1 {
            self.stamp(points[0], width, 0.0, 1.0, color, false, aa);
        }
    }

    fn composite_into(&mut self, target: &mut BitmapImage) {
        target.paste(&self.image);
    }

    fn erase_into(&mut self, target: &mut BitmapImage) {
        target.erase(&self.image);
    }

    fn clear_buffer(&mut self) {
        self.image.clear();
        self.dabs.clear();
    }

    fn invalidate(&mut self, rect: Rect, radius: f32) {
        if rect.is_finite() {
            self.damage.extend_rect(rect.expand(radius));
        }
    }

    fn take_damage(&mut self) -> Rect {
        let damage = self.damage.bounds(0.0);
        self.damage.reset();
        damage
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dab_at(x: f32, y: f32) -> Dab {
        Dab {
            position: pos2(x, y),
            width: 6.0,
            opacity: 1.0,
            feather: 0.0,
        }
    }

    #[test]
    fn draw_dab_marks_pixels_and_leaves_damage_to_the_caller() {
        let mut buffer = ScratchBuffer::new(32, 32);
        buffer.draw_dab(&dab_at(16.0, 16.0), Color32::BLACK, false, AntiAliasing::Off);
        assert_eq!(buffer.dab_count(), 1);
        assert_eq!(buffer.image().pixel_at(pos2(16.5, 16.5)).unwrap().a(), 255);
        assert!(!buffer.take_damage().is_finite());
        buffer.invalidate(
            Rect::from_center_size(pos2(16.0, 16.0), egui::Vec2::splat(6.0)),
            1.0,
        );
        assert!(buffer.take_damage().contains(pos2(16.0, 16.0)));
    }

    #[test]
    fn polyline_reports_its_own_damage() {
        let mut buffer = ScratchBuffer::new(32, 32);
        buffer.stroke_polyline(
            &[pos2(4.0, 4.0), pos2(20.0, 4.0)],
            4.0,
            Color32::BLACK,
            AntiAliasing::Off,
        );
        let damage = buffer.take_damage();
        assert!(damage.contains(pos2(4.0, 4.0)));
        assert!(damage.contains(pos2(20.0, 4.0)));
    }

    #[test]
    fn clear_buffer_resets_everything() {
        let mut buffer = ScratchBuffer::new(16, 16);
        buffer.draw_dab(&dab_at(8.0, 8.0), Color32::BLACK, false, AntiAliasing::Off);
        buffer.clear_buffer();
        assert!(buffer.is_clear());
    }

    #[test]
    fn composite_moves_pixels_to_target() {
        let mut buffer = ScratchBuffer::new(16, 16);
        let mut target = BitmapImage::new(16, 16);
        buffer.draw_dab(&dab_at(8.0, 8.0), Color32::from_rgb(10, 20, 30), false, AntiAliasing::Off);
        buffer.composite_into(&mut target);
        assert_eq!(target.pixel_at(pos2(8.5, 8.5)).unwrap().b(), 30);
    }
}
