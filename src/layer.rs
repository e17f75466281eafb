use egui::{Color32, Pos2, Rect, Vec2, pos2};
use image::{Rgba, RgbaImage};
use uuid::Uuid;

use crate::curve::VectorImage;
use crate::geometry::{self, BlitRect};

/// Pixel content of one bitmap frame, anchored at the canvas origin.
#[derive(Debug, Clone)]
pub struct BitmapImage {
    image: RgbaImage,
}

impl BitmapImage {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_min_size(
            Pos2::ZERO,
            Vec2::new(self.image.width() as f32, self.image.height() as f32),
        )
    }

    pub fn contains(&self, point: Pos2) -> bool {
        self.bounds().contains(point)
    }

    fn index_of(&self, point: Pos2) -> Option<(u32, u32)> {
        let x = point.x.floor();
        let y = point.y.floor();
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= self.image.width() || y >= self.image.height() {
            return None;
        }
        Some((x, y))
    }

    // Buffer bytes are straight alpha; the premultiplied constructor
    // moves them through Color32 verbatim.
    pub fn pixel_at(&self, point: Pos2) -> Option<Color32> {
        self.index_of(point).map(|(x, y)| {
            let Rgba([r, g, b, a]) = *self.image.get_pixel(x, y);
            Color32::from_rgba_premultiplied(r, g, b, a)
        })
    }

    pub fn set_pixel(&mut self, point: Pos2, color: Color32) {
        if let Some((x, y)) = self.index_of(point) {
            self.image
                .put_pixel(x, y, Rgba([color.r(), color.g(), color.b(), color.a()]));
        }
    }

    /// Blends `color` over the existing pixel with source-over math,
    /// scaled by `opacity`.
    pub fn blend_pixel(&mut self, point: Pos2, color: Color32, opacity: f32) {
        let Some((x, y)) = self.index_of(point) else {
            return;
        };
        let Rgba([dr, dg, db, da]) = *self.image.get_pixel(x, y);
        let sa = (color.a() as f32 / 255.0) * opacity.clamp(0.0, 1.0);
        if sa <= 0.0 {
            return;
        }
        let da_f = da as f32 / 255.0;
        let out_a = sa + da_f * (1.0 - sa);
        let blend = |s: u8, d: u8| -> u8 {
            let s = s as f32 / 255.0;
            let d = d as f32 / 255.0;
            (((s * sa + d * da_f * (1.0 - sa)) / out_a) * 255.0).round() as u8
        };
        self.image.put_pixel(
            x,
            y,
            Rgba([
                blend(color.r(), dr),
                blend(color.g(), dg),
                blend(color.b(), db),
                (out_a * 255.0).round() as u8,
            ]),
        );
    }

    /// Composites `other` over this image, aligning canvas coordinates.
    pub fn paste(&mut self, other: &BitmapImage) {
        for (x, y, pixel) in other.image.enumerate_pixels() {
            let Rgba([r, g, b, a]) = *pixel;
            if a == 0 {
                continue;
            }
            let canvas = pos2(x as f32 + 0.5, y as f32 + 0.5);
            self.blend_pixel(canvas, Color32::from_rgba_premultiplied(r, g, b, a), 1.0);
        }
    }

    /// Removes coverage where `mask` has coverage: every pixel's alpha is
    /// scaled down by the mask pixel's alpha, aligning canvas coordinates.
    pub fn erase(&mut self, mask: &BitmapImage) {
        for (x, y, pixel) in mask.image.enumerate_pixels() {
            let ma = pixel.0[3];
            if ma == 0 {
                continue;
            }
            let canvas = pos2(x as f32 + 0.5, y as f32 + 0.5);
            if let Some((tx, ty)) = self.index_of(canvas) {
                let Rgba([r, g, b, a]) = *self.image.get_pixel(tx, ty);
                let keep = 1.0 - ma as f32 / 255.0;
                let new_a = (a as f32 * keep).round() as u8;
                self.image.put_pixel(tx, ty, Rgba([r, g, b, new_a]));
            }
        }
    }

    pub fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }

    pub fn is_blank(&self) -> bool {
        self.image.pixels().all(|p| p.0[3] == 0)
    }

    /// Applies an affine transform to the pixels inside `region`: the
    /// region is cut out and re-stamped through `matrix` with
    /// nearest-neighbour sampling. Pixels outside the buffer are dropped.
    pub fn apply_transform(&mut self, region: Rect, matrix: &[[f32; 3]; 3]) {
        let region = geometry::normalized(region);
        if region.width() <= 0.0 || region.height() <= 0.0 {
            return;
        }
        let source = self.clone();
        let inverse = geometry::invert_affine(matrix);

        // Clear the source region first so a pure translation does not
        // leave the original behind.
        let min = region.min;
        let max = region.max;
        let mut y = min.y;
        while y < max.y {
            let mut x = min.x;
            while x < max.x {
                self.set_pixel(pos2(x + 0.5, y + 0.5), Color32::TRANSPARENT);
                x += 1.0;
            }
            y += 1.0;
        }

        // Destination bounds: the transformed corners of the region.
        let mut dest = BlitRect::new();
        for corner in [
            region.left_top(),
            region.right_top(),
            region.left_bottom(),
            region.right_bottom(),
        ] {
            dest.extend(geometry::apply_matrix(matrix, corner));
        }
        let dest = dest.bounds(1.0).intersect(self.bounds());
        if dest.width() <= 0.0 || dest.height() <= 0.0 {
            return;
        }

        let mut y = dest.min.y.floor();
        while y < dest.max.y {
            let mut x = dest.min.x.floor();
            while x < dest.max.x {
                let here = pos2(x + 0.5, y + 0.5);
                let src = geometry::apply_matrix(&inverse, here);
                if region.contains(src) {
                    if let Some(color) = source.pixel_at(src) {
                        if color.a() > 0 {
                            self.blend_pixel(here, color, 1.0);
                        }
                    }
                }
                x += 1.0;
            }
            y += 1.0;
        }
    }
}

/// Frame content, tagged by layer kind. The tool core writes into these
/// but never owns them.
#[derive(Debug, Clone)]
pub enum LayerContent {
    Bitmap(BitmapImage),
    Vector(VectorImage),
}

impl LayerContent {
    pub fn as_bitmap(&self) -> Option<&BitmapImage> {
        match self {
            LayerContent::Bitmap(image) => Some(image),
            LayerContent::Vector(_) => None,
        }
    }

    pub fn as_bitmap_mut(&mut self) -> Option<&mut BitmapImage> {
        match self {
            LayerContent::Bitmap(image) => Some(image),
            LayerContent::Vector(_) => None,
        }
    }

    pub fn as_vector(&self) -> Option<&VectorImage> {
        match self {
            LayerContent::Vector(image) => Some(image),
            LayerContent::Bitmap(_) => None,
        }
    }

    pub fn as_vector_mut(&mut self) -> Option<&mut VectorImage> {
        match self {
            LayerContent::Vector(image) => Some(image),
            LayerContent::Bitmap(_) => None,
        }
    }
}

/// One animation layer: a run of frames sharing a content kind.
#[derive(Debug, Clone)]
pub struct Layer {
    pub id: Uuid,
    pub name: String,
    pub visible: bool,
    frames: Vec<LayerContent>,
}

impl Layer {
    pub fn new_bitmap(name: &str, width: u32, height: u32, frame_count: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            visible: true,
            frames: (0..frame_count)
                .map(|_| LayerContent::Bitmap(BitmapImage::new(width, height)))
                .collect(),
        }
    }

    pub fn new_vector(name: &str, frame_count: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            visible: true,
            frames: (0..frame_count)
                .map(|_| LayerContent::Vector(VectorImage::new()))
                .collect(),
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn content_at(&self, frame: usize) -> Option<&LayerContent> {
        self.frames.get(frame)
    }

    pub fn content_at_mut(&mut self, frame: usize) -> Option<&mut LayerContent> {
        self.frames.get_mut(frame)
    }

    /// A layer can be painted on when it is visible and the frame exists.
    pub fn is_paintable(&self, frame: usize) -> bool {
        self.visible && frame < self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_over_transparent_keeps_color() {
        let mut image = BitmapImage::new(4, 4);
        image.blend_pixel(pos2(1.5, 1.5), Color32::from_rgb(200, 10, 10), 1.0);
        let got = image.pixel_at(pos2(1.5, 1.5)).unwrap();
        assert_eq!(got.r(), 200);
        assert_eq!(got.a(), 255);
    }

    #[test]
    fn paste_composites_other_buffer() {
        let mut base = BitmapImage::new(4, 4);
        let mut overlay = BitmapImage::new(4, 4);
        overlay.set_pixel(pos2(2.5, 2.5), Color32::from_rgb(0, 255, 0));
        base.paste(&overlay);
        assert_eq!(base.pixel_at(pos2(2.5, 2.5)).unwrap().g(), 255);
        assert_eq!(base.pixel_at(pos2(0.5, 0.5)).unwrap().a(), 0);
    }

    #[test]
    fn translate_region_moves_pixels() {
        let mut image = BitmapImage::new(8, 8);
        image.set_pixel(pos2(1.5, 1.5), Color32::WHITE);
        let translate = [[1.0, 0.0, 3.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        image.apply_transform(Rect::from_min_max(pos2(0.0, 0.0), pos2(3.0, 3.0)), &translate);
        assert_eq!(image.pixel_at(pos2(1.5, 1.5)).unwrap().a(), 0);
        assert_eq!(image.pixel_at(pos2(4.5, 1.5)).unwrap().a(), 255);
    }
}
