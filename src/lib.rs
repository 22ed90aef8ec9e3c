#![warn(clippy::all, rust_2018_idioms)]

pub mod active_path;
pub mod app;
pub mod bitmap;
pub mod canvas;
pub mod compositor;
pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod gesture;
pub mod history;
pub mod input;
pub mod magnifier;
pub mod renderer;
pub mod session;
pub mod state;
pub mod stroke;

pub use active_path::{ActivePath, RedrawCounter, RedrawSignal, SharedActivePath};
pub use app::EditorApp;
pub use bitmap::{Bitmap, SourceImages};
pub use canvas::{Backdrop, CanvasConfig, Viewport};
pub use compositor::{ActivePreview, MaskCompositor};
pub use config::EditorConfig;
pub use document::{Document, StrokeList};
pub use export::{ExportConfig, ExportFormat, Exporter, ImageBody, ImageStore, LocalImageStore, ShareTarget};
pub use gesture::{GestureInterpreter, GestureOutcome};
pub use history::History;
pub use input::{GestureEvent, InputHandler, PointerFrame, TouchSample};
pub use magnifier::{Magnifier, MagnifierConfig};
pub use renderer::Renderer;
pub use session::EditorSession;
pub use state::EditorState;
pub use stroke::{ActiveStroke, Brush, Point, Stroke, StrokeMode, StrokeRef};
