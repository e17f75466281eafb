#![warn(clippy::all, rust_2018_idioms)]

//! Tool core for a frame-based drawing editor: pointer-event tools,
//! stroke smoothing, a spaced dab engine, stroke-to-curve fitting, and a
//! rectangle selection with pending affine transforms. The GUI shell,
//! file formats, and undo live elsewhere; this crate is the part that
//! turns input events into layer content.

pub mod canvas;
pub mod curve;
pub mod dab;
pub mod document;
pub mod editor;
pub mod geometry;
pub mod input;
pub mod interpolator;
pub mod layer;
pub mod selection;
pub mod settings;
pub mod stroke;
pub mod tool;
pub mod view;

pub use canvas::{AntiAliasing, CanvasSurface, ScratchBuffer};
pub use curve::{Curve, VectorImage};
pub use dab::{Dab, DabEngine, DabParams};
pub use document::Document;
pub use editor::Editor;
pub use input::PointerEvent;
pub use interpolator::StrokeInterpolator;
pub use layer::{BitmapImage, Layer, LayerContent};
pub use selection::{MoveMode, SelectionManager, Transform, TransformDecision};
pub use settings::{JsonSettings, MemorySettings, SettingsStore, SharedSettings};
pub use stroke::{StrokePoint, StrokeSession, StrokeTarget};
pub use tool::{Tool, ToolKind, ToolProperties, ToolType};
pub use view::ViewTransform;
