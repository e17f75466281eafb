use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use crate::geometry::{self, BlitRect};
use crate::stroke::StrokePoint;

/// A committed vector stroke: a simplified polyline with per-vertex
/// widths when the stroke was pressure sensitive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Curve {
    points: Vec<Pos2>,
    widths: Vec<f32>,
    pub width: f32,
    pub feather: f32,
    pub variable_width: bool,
    pub invisible: bool,
    pub color_number: usize,
    pub selected: bool,
}

impl Curve {
    /// Straight polyline with uniform width (polyline tool commit).
    pub fn from_points(points: Vec<Pos2>, width: f32) -> Self {
        let widths = vec![width; points.len()];
        Self {
            points,
            widths,
            width,
            feather: 0.0,
            variable_width: false,
            invisible: false,
            color_number: 0,
            selected: false,
        }
    }

    /// Fits a sampled stroke to a simplified curve.
    ///
    /// `tolerance` is in canvas units (callers divide the configured
    /// smoothing constant by the view scale). Vertex widths come from the
    /// sampled pressure when `variable_width` is on.
    pub fn fit(samples: &[StrokePoint], tolerance: f32, base_width: f32, variable_width: bool) -> Self {
        let kept = simplify(samples, tolerance.max(0.0));
        let points: Vec<Pos2> = kept.iter().map(|p| p.position).collect();
        let widths = kept
            .iter()
            .map(|p| {
                if variable_width {
                    (base_width + p.pressure * base_width) * 0.5
                } else {
                    base_width
                }
            })
            .collect();
        Self {
            points,
            widths,
            width: base_width,
            feather: 0.0,
            variable_width,
            invisible: false,
            color_number: 0,
            selected: false,
        }
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn widths(&self) -> &[f32] {
        &self.widths
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn bounds(&self) -> Rect {
        let mut rect = BlitRect::new();
        for p in &self.points {
            rect.extend(*p);
        }
        rect.bounds(self.width * 0.5)
    }

    pub fn translate(&mut self, delta: Vec2) {
        for p in &mut self.points {
            *p += delta;
        }
    }

    pub fn apply_matrix(&mut self, matrix: &[[f32; 3]; 3]) {
        for p in &mut self.points {
            *p = geometry::apply_matrix(matrix, *p);
        }
    }
}

/// Ramer-Douglas-Peucker simplification; always keeps the endpoints.
fn simplify(samples: &[StrokePoint], tolerance: f32) -> Vec<StrokePoint> {
    if samples.len() <= 2 || tolerance <= 0.0 {
        return samples.to_vec();
    }
    let mut keep = vec![false; samples.len()];
    keep[0] = true;
    keep[samples.len() - 1] = true;
    simplify_span(samples, 0, samples.len() - 1, tolerance, &mut keep);
    samples
        .iter()
        .zip(&keep)
        .filter(|(_, k)| **k)
        .map(|(p, _)| *p)
        .collect()
}

fn simplify_span(samples: &[StrokePoint], first: usize, last: usize, tolerance: f32, keep: &mut [bool]) {
    if last <= first + 1 {
        return;
    }
    let (a, b) = (samples[first].position, samples[last].position);
    let mut max_dist = 0.0;
    let mut max_index = first;
    for i in first + 1..last {
        let d = segment_distance(samples[i].position, a, b);
        if d > max_dist {
            max_dist = d;
            max_index = i;
        }
    }
    if max_dist > tolerance {
        keep[max_index] = true;
        simplify_span(samples, first, max_index, tolerance, keep);
        simplify_span(samples, max_index, last, tolerance, keep);
    }
}

fn segment_distance(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// The vector content of one frame: an ordered set of curves, some of
/// which may be selected.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VectorImage {
    curves: Vec<Curve>,
}

impl VectorImage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_curve(&mut self, curve: Curve) {
        self.curves.push(curve);
    }

    pub fn curves(&self) -> &[Curve] {
        &self.curves
    }

    pub fn curves_mut(&mut self) -> &mut [Curve] {
        &mut self.curves
    }

    pub fn last_curve(&self) -> Option<&Curve> {
        self.curves.last()
    }

    pub fn deselect_all(&mut self) {
        for curve in &mut self.curves {
            curve.selected = false;
        }
    }

    /// Marks the most recently added curve as the only selection, so
    /// follow-up edits target it.
    pub fn select_last(&mut self) {
        self.deselect_all();
        if let Some(curve) = self.curves.last_mut() {
            curve.selected = true;
        }
    }

    /// Selects every curve whose bounds intersect `rect`; returns how
    /// many matched.
    pub fn select_in_rect(&mut self, rect: Rect) -> usize {
        let mut count = 0;
        for curve in &mut self.curves {
            curve.selected = !curve.is_empty() && rect.intersects(curve.bounds());
            if curve.selected {
                count += 1;
            }
        }
        count
    }

    /// Removes every curve whose padded bounds contain `center`. Returns
    /// how many were removed.
    pub fn remove_curves_within(&mut self, center: Pos2, radius: f32) -> usize {
        let before = self.curves.len();
        self.curves
            .retain(|curve| !curve.bounds().expand(radius).contains(center));
        before - self.curves.len()
    }

    pub fn selected_indices(&self) -> Vec<usize> {
        self.curves
            .iter()
            .enumerate()
            .filter(|(_, c)| c.selected)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn any_selected(&self) -> bool {
        self.curves.iter().any(|c| c.selected)
    }

    /// Union of the selected curves' bounds.
    pub fn selection_rect(&self) -> Rect {
        let mut rect = BlitRect::new();
        for curve in self.curves.iter().filter(|c| c.selected) {
            rect.extend_rect(curve.bounds());
        }
        rect.bounds(0.0)
    }

    pub fn translate_selected(&mut self, delta: Vec2) {
        for curve in self.curves.iter_mut().filter(|c| c.selected) {
            curve.translate(delta);
        }
    }

    pub fn transform_selected(&mut self, matrix: &[[f32; 3]; 3]) {
        for curve in self.curves.iter_mut().filter(|c| c.selected) {
            curve.apply_matrix(matrix);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    fn sample(x: f32, y: f32) -> StrokePoint {
        StrokePoint {
            position: pos2(x, y),
            pressure: 1.0,
        }
    }

    #[test]
    fn fit_collapses_collinear_points() {
        let samples: Vec<_> = (0..10).map(|i| sample(i as f32, 0.0)).collect();
        let curve = Curve::fit(&samples, 0.5, 4.0, false);
        assert_eq!(curve.points().len(), 2);
        assert_eq!(curve.points()[0], pos2(0.0, 0.0));
        assert_eq!(curve.points()[1], pos2(9.0, 0.0));
    }

    #[test]
    fn fit_keeps_sharp_corner() {
        let samples = vec![sample(0.0, 0.0), sample(5.0, 0.0), sample(5.0, 5.0)];
        let curve = Curve::fit(&samples, 0.5, 4.0, false);
        assert_eq!(curve.points().len(), 3);
    }

    #[test]
    fn variable_width_blends_pressure() {
        let samples = vec![
            StrokePoint {
                position: pos2(0.0, 0.0),
                pressure: 0.0,
            },
            StrokePoint {
                position: pos2(10.0, 0.0),
                pressure: 1.0,
            },
        ];
        let curve = Curve::fit(&samples, 0.0, 8.0, true);
        assert_eq!(curve.widths()[0], 4.0);
        assert_eq!(curve.widths()[1], 8.0);
    }

    #[test]
    fn select_in_rect_picks_intersecting_curves() {
        let mut image = VectorImage::new();
        image.add_curve(Curve::from_points(vec![pos2(0.0, 0.0), pos2(10.0, 10.0)], 2.0));
        image.add_curve(Curve::from_points(vec![pos2(100.0, 100.0), pos2(110.0, 110.0)], 2.0));
        let hits = image.select_in_rect(Rect::from_min_max(pos2(-5.0, -5.0), pos2(20.0, 20.0)));
        assert_eq!(hits, 1);
        assert_eq!(image.selected_indices(), vec![0]);
    }
}
