use std::collections::VecDeque;

use egui::{Pos2, pos2};

use crate::stroke::StrokePoint;

/// Smooths raw pointer samples with a trailing moving-average window.
///
/// The window holds `level + 1` samples, so level 0 is identity
/// passthrough. One interpolator lives for exactly one stroke: smoothed
/// points are drained through [`StrokeInterpolator::poll`] as the stroke
/// progresses and are never replayed.
#[derive(Debug)]
pub struct StrokeInterpolator {
    level: u32,
    window: VecDeque<StrokePoint>,
    pending: VecDeque<StrokePoint>,
}

impl StrokeInterpolator {
    pub fn new(level: u32) -> Self {
        Self {
            level,
            window: VecDeque::new(),
            pending: VecDeque::new(),
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Changes the stabilizer level mid-stroke. Only subsequent samples
    /// see the new window; already-smoothed points are left alone.
    pub fn set_level(&mut self, level: u32) {
        self.level = level;
        let capacity = self.capacity();
        while self.window.len() > capacity {
            self.window.pop_front();
        }
    }

    fn capacity(&self) -> usize {
        self.level as usize + 1
    }

    /// Feeds one raw sample; the smoothed counterpart becomes available
    /// from `poll`.
    pub fn sample(&mut self, raw: StrokePoint) {
        self.window.push_back(raw);
        while self.window.len() > self.capacity() {
            self.window.pop_front();
        }

        let n = self.window.len() as f32;
        let mut sum = egui::Vec2::ZERO;
        let mut pressure = 0.0;
        for p in &self.window {
            sum += p.position.to_vec2();
            pressure += p.pressure;
        }
        self.pending.push_back(StrokePoint {
            position: (sum / n).to_pos2(),
            pressure: pressure / n,
        });
    }

    /// Drains the smoothed points produced since the last poll. The
    /// stream is finite and consumed exactly once.
    pub fn poll(&mut self) -> impl Iterator<Item = StrokePoint> + '_ {
        self.pending.drain(..)
    }

    /// Convenience for single-sample feeds: smooth one raw position and
    /// take the result immediately.
    pub fn smooth(&mut self, position: Pos2, pressure: f32) -> StrokePoint {
        self.sample(StrokePoint { position, pressure });
        self.pending
            .pop_back()
            .unwrap_or(StrokePoint { position, pressure })
    }
}
