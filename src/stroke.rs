use egui::Pos2;
use uuid::Uuid;

use crate::dab::DabEngine;
use crate::interpolator::StrokeInterpolator;

/// One sampled point of an in-progress stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokePoint {
    pub position: Pos2,
    pub pressure: f32,
}

/// The layer/frame a stroke started on. If either changes mid-gesture the
/// stroke is discarded instead of committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrokeTarget {
    pub layer: Uuid,
    pub frame: usize,
}

/// Everything a single press-drag-release cycle accumulates.
///
/// Created on pointer press, dropped on release or cancel; the leftover
/// dab distance and point list never leak across strokes.
#[derive(Debug)]
pub struct StrokeSession {
    pub interpolator: StrokeInterpolator,
    pub engine: DabEngine,
    points: Vec<StrokePoint>,
    pub press_point: Pos2,
    pub last_dab_point: Pos2,
    target: StrokeTarget,
}

impl StrokeSession {
    pub fn begin(press_point: Pos2, pressure: f32, stabilizer_level: u32, target: StrokeTarget) -> Self {
        let mut session = Self {
            interpolator: StrokeInterpolator::new(stabilizer_level),
            engine: DabEngine::new(),
            points: Vec::new(),
            press_point,
            last_dab_point: press_point,
            target,
        };
        session.record(StrokePoint {
            position: press_point,
            pressure,
        });
        session
    }

    pub fn record(&mut self, point: StrokePoint) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[StrokePoint] {
        &self.points
    }

    pub fn average_pressure(&self) -> f32 {
        if self.points.is_empty() {
            return 1.0;
        }
        self.points.iter().map(|p| p.pressure).sum::<f32>() / self.points.len() as f32
    }

    /// Straight-line distance travelled since the press.
    pub fn travel(&self, current: Pos2) -> f32 {
        self.press_point.distance(current)
    }

    /// True while the document still points at the layer/frame the stroke
    /// began on.
    pub fn targets(&self, target: StrokeTarget) -> bool {
        self.target == target
    }
}
