use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use crate::geometry::{self, angle_between, multiply_matrices, normalized, snap_angle};

/// Which part of the selection the pointer grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveMode {
    #[default]
    None,
    Middle,
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Rotation,
}

impl MoveMode {
    pub fn is_resize(self) -> bool {
        !matches!(self, MoveMode::None | MoveMode::Middle | MoveMode::Rotation)
    }
}

/// Outcome of the "you are about to switch away from an unapplied
/// transform" prompt. Returned to the caller; the engine never decides
/// on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformDecision {
    Apply,
    Discard,
    Cancel,
}

/// Affine transform of a selection relative to its committed baseline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Transform {
    /// Translation of the selection center.
    pub position: Vec2,
    /// Scale factor (1.0 = original size).
    pub scale: Vec2,
    /// Rotation in radians.
    pub rotation: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            scale: Vec2::new(1.0, 1.0),
            rotation: 0.0,
        }
    }
}

impl Transform {
    pub fn identity() -> Self {
        Self::default()
    }

    /// Matrix rotating and scaling around `pivot`, then translating.
    pub fn to_matrix_with_pivot(&self, pivot: Vec2) -> [[f32; 3]; 3] {
        let cos = self.rotation.cos();
        let sin = self.rotation.sin();

        // Translate the pivot to the origin first.
        let mut result = [
            [1.0, 0.0, -pivot.x],
            [0.0, 1.0, -pivot.y],
            [0.0, 0.0, 1.0],
        ];

        result = multiply_matrices(
            &[
                [self.scale.x, 0.0, 0.0],
                [0.0, self.scale.y, 0.0],
                [0.0, 0.0, 1.0],
            ],
            &result,
        );

        // Screen space y points down, hence the sign of sin.
        result = multiply_matrices(
            &[[cos, -sin, 0.0], [sin, cos, 0.0], [0.0, 0.0, 1.0]],
            &result,
        );

        multiply_matrices(
            &[
                [1.0, 0.0, pivot.x + self.position.x],
                [0.0, 1.0, pivot.y + self.position.y],
                [0.0, 0.0, 1.0],
            ],
            &result,
        )
    }
}

/// Tolerance, in canvas units, for grabbing selection edges and corners.
pub const GRAB_TOLERANCE: f32 = 8.0;

/// Pointer travel below this cancels an in-progress fresh selection
/// instead of committing a near-zero rectangle.
pub const SMALL_DRAG_THRESHOLD: f32 = 5.0;

/// The selection rectangle and its pending affine transform.
///
/// `committed` is the baseline the content transform is relative to;
/// `working` is what the user currently sees. They diverge while a
/// translate/resize/rotate is pending and meet again on apply.
#[derive(Debug, Clone)]
pub struct SelectionManager {
    committed: Rect,
    working: Rect,
    drag_rect: Rect,
    rotation: f32,
    committed_rotation: f32,
    anchor: Pos2,
    move_mode: MoveMode,
    curve_selection: Vec<usize>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self {
            committed: Rect::NOTHING,
            working: Rect::NOTHING,
            drag_rect: Rect::NOTHING,
            rotation: 0.0,
            committed_rotation: 0.0,
            anchor: Pos2::ZERO,
            move_mode: MoveMode::None,
            curve_selection: Vec::new(),
        }
    }

    pub fn has_selection(&self) -> bool {
        self.committed.is_finite()
    }

    pub fn committed_rect(&self) -> Rect {
        self.committed
    }

    pub fn working_rect(&self) -> Rect {
        self.working
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn anchor(&self) -> Pos2 {
        self.anchor
    }

    pub fn move_mode(&self) -> MoveMode {
        self.move_mode
    }

    pub fn set_move_mode(&mut self, mode: MoveMode) {
        self.move_mode = mode;
    }

    /// Lazily starts a fresh one-unit selection at `origin`. Any prior
    /// transform state is reset; rotation on an empty rect is
    /// meaningless.
    pub fn start_new(&mut self, origin: Pos2) {
        let rect = Rect::from_min_size(origin, Vec2::splat(1.0));
        self.committed = rect;
        self.working = rect;
        self.drag_rect = rect;
        self.rotation = 0.0;
        self.committed_rotation = 0.0;
        self.anchor = origin;
        self.move_mode = MoveMode::None;
        self.curve_selection.clear();
    }

    /// Replaces the selection outright. The rect is normalized before it
    /// is stored; degenerate inputs become valid empty-ish rects rather
    /// than errors.
    pub fn set_selection(&mut self, rect: Rect) {
        let rect = normalized(rect);
        self.committed = rect;
        self.working = rect;
        self.drag_rect = rect;
        self.committed_rotation = self.rotation;
    }

    pub fn deselect(&mut self) {
        *self = Self::new();
    }

    /// Classifies a pointer position against the working rectangle.
    pub fn move_mode_for_point(&self, point: Pos2, tolerance: f32) -> MoveMode {
        if !self.has_selection() {
            return MoveMode::None;
        }
        let rect = self.working;
        let near = |a: Pos2, b: Pos2| a.distance(b) <= tolerance;

        if near(point, rect.left_top()) {
            return MoveMode::TopLeft;
        }
        if near(point, rect.right_top()) {
            return MoveMode::TopRight;
        }
        if near(point, rect.left_bottom()) {
            return MoveMode::BottomLeft;
        }
        if near(point, rect.right_bottom()) {
            return MoveMode::BottomRight;
        }

        let within_x = point.x >= rect.left() - tolerance && point.x <= rect.right() + tolerance;
        let within_y = point.y >= rect.top() - tolerance && point.y <= rect.bottom() + tolerance;
        if within_x && (point.y - rect.top()).abs() <= tolerance {
            return MoveMode::Top;
        }
        if within_x && (point.y - rect.bottom()).abs() <= tolerance {
            return MoveMode::Bottom;
        }
        if within_y && (point.x - rect.left()).abs() <= tolerance {
            return MoveMode::Left;
        }
        if within_y && (point.x - rect.right()).abs() <= tolerance {
            return MoveMode::Right;
        }
        if rect.contains(point) {
            return MoveMode::Middle;
        }
        MoveMode::None
    }

    /// Captures the drag baseline at pointer press.
    pub fn begin_drag(&mut self, anchor: Pos2) {
        self.drag_rect = self.working;
        self.anchor = anchor;
    }

    /// New-selection drag: the rectangle grows from the anchor toward the
    /// pointer, normalized on both axes.
    pub fn grow_from_anchor(&mut self, origin: Pos2, pointer: Pos2) {
        self.working = Rect::from_two_pos(origin, pointer);
    }

    /// Recomputes the working rect/rotation from the drag baseline plus
    /// the given delta, according to the current move mode.
    ///
    /// `rotation_offset` is the angular offset captured at press so the
    /// selection does not jump to the pointer angle; `snap_increment`
    /// rounds the result to the nearest multiple when positive.
    pub fn adjust_selection(
        &mut self,
        point: Pos2,
        dx: f32,
        dy: f32,
        rotation_offset: f32,
        snap_increment: f32,
    ) {
        let base = self.drag_rect;
        let delta = Vec2::new(dx, dy);
        match self.move_mode {
            MoveMode::None => {}
            MoveMode::Middle => {
                self.working = base.translate(delta);
            }
            MoveMode::Top => {
                self.working = Rect::from_min_max(
                    Pos2::new(base.left(), base.top() + dy),
                    base.max,
                );
            }
            MoveMode::Bottom => {
                self.working = Rect::from_min_max(
                    base.min,
                    Pos2::new(base.right(), base.bottom() + dy),
                );
            }
            MoveMode::Left => {
                self.working = Rect::from_min_max(
                    Pos2::new(base.left() + dx, base.top()),
                    base.max,
                );
            }
            MoveMode::Right => {
                self.working = Rect::from_min_max(
                    base.min,
                    Pos2::new(base.right() + dx, base.bottom()),
                );
            }
            MoveMode::TopLeft => {
                self.working = Rect::from_min_max(base.min + delta, base.max);
            }
            MoveMode::TopRight => {
                self.working = Rect::from_min_max(
                    Pos2::new(base.left(), base.top() + dy),
                    Pos2::new(base.right() + dx, base.bottom()),
                );
            }
            MoveMode::BottomLeft => {
                self.working = Rect::from_min_max(
                    Pos2::new(base.left() + dx, base.top()),
                    Pos2::new(base.right(), base.bottom() + dy),
                );
            }
            MoveMode::BottomRight => {
                self.working = Rect::from_min_max(base.min, base.max + delta);
            }
            MoveMode::Rotation => {
                let raw = angle_between(base.center(), point) - rotation_offset;
                self.rotation = snap_angle(raw, snap_increment);
            }
        }
    }

    /// Derives one axis of a resize offset from the other so the original
    /// width:height ratio survives.
    pub fn aspect_ratio_offset(&self, dx: f32, dy: f32) -> Vec2 {
        let base = self.drag_rect;
        if base.height().abs() < f32::EPSILON {
            return Vec2::new(dx, dy);
        }
        let factor = base.width() / base.height();
        match self.move_mode {
            MoveMode::TopLeft | MoveMode::BottomRight => Vec2::new(dx, dx / factor),
            MoveMode::TopRight | MoveMode::BottomLeft => Vec2::new(dx, -dx / factor),
            MoveMode::Middle => {
                let max = dx.max(dy);
                Vec2::new(max, max)
            }
            _ => Vec2::new(dx, dy),
        }
    }

    pub fn is_outside(&self, point: Pos2) -> bool {
        !self.working.contains(point)
    }

    /// True while the working state differs from the committed baseline.
    pub fn transform_modified(&self) -> bool {
        self.has_selection()
            && (self.working != self.committed || self.rotation != self.committed_rotation)
    }

    /// The pending transform relative to the committed baseline, as a
    /// matrix pivoted on the committed center.
    pub fn transform_matrix(&self) -> [[f32; 3]; 3] {
        let committed = self.committed;
        let working = self.working;
        let scale = if committed.width().abs() < f32::EPSILON
            || committed.height().abs() < f32::EPSILON
        {
            Vec2::new(1.0, 1.0)
        } else {
            Vec2::new(
                working.width() / committed.width(),
                working.height() / committed.height(),
            )
        };
        let transform = Transform {
            position: working.center() - committed.center(),
            scale,
            rotation: (self.rotation - self.committed_rotation).to_radians(),
        };
        transform.to_matrix_with_pivot(committed.center().to_vec2())
    }

    /// Bakes the pending transform: the working rect becomes the new
    /// committed baseline and rotation is folded away. Returns the matrix
    /// the caller applies to the layer content.
    pub fn apply(&mut self) -> [[f32; 3]; 3] {
        let matrix = self.transform_matrix();
        self.committed = normalized(self.working);
        self.working = self.committed;
        self.drag_rect = self.committed;
        self.rotation = 0.0;
        self.committed_rotation = 0.0;
        matrix
    }

    /// Drops the pending transform, returning to the committed baseline.
    pub fn cancel(&mut self) {
        self.working = self.committed;
        self.drag_rect = self.committed;
        self.rotation = self.committed_rotation;
        self.move_mode = MoveMode::None;
    }

    /// Commits the working rect as the selection (no content transform).
    /// Normalization is guaranteed here.
    pub fn commit_working(&mut self) {
        self.set_selection(self.working);
    }

    pub fn set_curve_selection(&mut self, indices: Vec<usize>) {
        self.curve_selection = indices;
    }

    pub fn curve_selection(&self) -> &[usize] {
        &self.curve_selection
    }
}

impl Default for SelectionManager {
    fn default() -> Self {
        Self::new()
    }
}
