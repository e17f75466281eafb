use egui::{Pos2, Rect, pos2};

/// Accumulates the footprint of drawing operations so callers can
/// invalidate the smallest possible screen region.
#[derive(Debug, Clone, Copy)]
pub struct BlitRect {
    min: Pos2,
    max: Pos2,
    touched: bool,
}

impl BlitRect {
    pub fn new() -> Self {
        Self {
            min: pos2(f32::MAX, f32::MAX),
            max: pos2(f32::MIN, f32::MIN),
            touched: false,
        }
    }

    pub fn extend(&mut self, point: Pos2) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.touched = true;
    }

    pub fn extend_rect(&mut self, rect: Rect) {
        if rect.is_finite() {
            self.extend(rect.min);
            self.extend(rect.max);
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.touched
    }

    /// The covered region, grown by `radius` on every side.
    pub fn bounds(&self, radius: f32) -> Rect {
        if self.is_empty() {
            return Rect::NOTHING;
        }
        Rect::from_min_max(self.min, self.max).expand(radius)
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for BlitRect {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns a rect with `left <= right` and `top <= bottom` regardless of
/// how the input was dragged out.
pub fn normalized(rect: Rect) -> Rect {
    Rect::from_two_pos(rect.min, rect.max)
}

/// Angle of the ray `center -> point` in degrees, screen convention
/// (y grows downward).
pub fn angle_between(center: Pos2, point: Pos2) -> f32 {
    let v = point - center;
    v.y.atan2(v.x).to_degrees()
}

/// Snaps `degrees` to the nearest multiple of `increment`; an increment
/// of zero or less disables snapping.
pub fn snap_angle(degrees: f32, increment: f32) -> f32 {
    if increment <= 0.0 {
        degrees
    } else {
        (degrees / increment).round() * increment
    }
}

pub fn multiply_matrices(a: &[[f32; 3]; 3], b: &[[f32; 3]; 3]) -> [[f32; 3]; 3] {
    let mut result = [[0.0; 3]; 3];
    for (i, row) in result.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            for k in 0..3 {
                *cell += a[i][k] * b[k][j];
            }
        }
    }
    result
}

/// Inverts an affine matrix (last row assumed `0 0 1`). Returns identity
/// for degenerate matrices rather than failing.
pub fn invert_affine(m: &[[f32; 3]; 3]) -> [[f32; 3]; 3] {
    let det = m[0][0] * m[1][1] - m[0][1] * m[1][0];
    if det.abs() < f32::EPSILON {
        return [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
    }
    let inv_det = 1.0 / det;
    let a = m[1][1] * inv_det;
    let b = -m[0][1] * inv_det;
    let c = -m[1][0] * inv_det;
    let d = m[0][0] * inv_det;
    let tx = -(a * m[0][2] + b * m[1][2]);
    let ty = -(c * m[0][2] + d * m[1][2]);
    [[a, b, tx], [c, d, ty], [0.0, 0.0, 1.0]]
}

pub fn apply_matrix(m: &[[f32; 3]; 3], p: Pos2) -> Pos2 {
    pos2(
        m[0][0] * p.x + m[0][1] * p.y + m[0][2],
        m[1][0] * p.x + m[1][1] * p.y + m[1][2],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blit_rect_grows_to_cover_points() {
        let mut rect = BlitRect::new();
        assert!(rect.is_empty());
        rect.extend(pos2(10.0, 5.0));
        rect.extend(pos2(-2.0, 8.0));
        let bounds = rect.bounds(1.0);
        assert_eq!(bounds.min, pos2(-3.0, 4.0));
        assert_eq!(bounds.max, pos2(11.0, 9.0));
    }

    #[test]
    fn snap_rounds_to_nearest_multiple() {
        assert_eq!(snap_angle(42.0, 15.0), 45.0);
        assert_eq!(snap_angle(-42.0, 15.0), -45.0);
        assert_eq!(snap_angle(42.0, 0.0), 42.0);
    }

    #[test]
    fn invert_affine_round_trips() {
        let m = [[2.0, 0.0, 5.0], [0.0, 0.5, -3.0], [0.0, 0.0, 1.0]];
        let inv = invert_affine(&m);
        let p = pos2(7.0, 11.0);
        let back = apply_matrix(&inv, apply_matrix(&m, p));
        assert!((back.x - p.x).abs() < 1e-4);
        assert!((back.y - p.y).abs() < 1e-4);
    }
}
