use crate::active_path::{RedrawSignal, SharedActivePath};
use crate::bitmap::SourceImages;
use crate::canvas::CanvasConfig;
use crate::compositor::{ActivePreview, MaskCompositor};
use crate::config::EditorConfig;
use crate::document::{Document, StrokeList};
use crate::error::{ExportError, ExportResult};
use crate::export::{Exporter, ImageStore};
use crate::gesture::{GestureInterpreter, GestureOutcome};
use crate::input::GestureEvent;
use crate::magnifier::Magnifier;
use crate::stroke::{Brush, StrokeMode, sanitize_width};
use egui::pos2;
use log::{debug, error, info};
use std::sync::Arc;
use tiny_skia::Pixmap;

/// Inputs of the last canvas render, to skip identical re-renders
#[derive(Debug, Clone)]
struct FrameKey {
    strokes: StrokeList,
    active_version: u64,
    brush: Brush,
}

impl PartialEq for FrameKey {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.strokes, &other.strokes)
            && self.active_version == other.active_version
            && self.brush == other.brush
    }
}

/// One editing session over a pair of source images.
///
/// This is the surface a host UI talks to: feed it gesture events, drive
/// brush and undo/redo controls, and pull rendered frames.
#[derive(Debug)]
pub struct EditorSession {
    config: EditorConfig,
    document: Document,
    brush: Brush,
    gestures: GestureInterpreter,
    compositor: MaskCompositor,
    magnifier: Magnifier,
    exporter: Exporter,
    sources: SourceImages,
    last_frame: Option<Pixmap>,
    last_key: Option<FrameKey>,
}

impl EditorSession {
    pub fn new(config: EditorConfig, canvas: CanvasConfig, redraw: Arc<dyn RedrawSignal>) -> Self {
        let path = SharedActivePath::new(redraw);
        Self {
            brush: Brush::new(config.brush.width, config.brush.mode),
            gestures: GestureInterpreter::new(path),
            compositor: MaskCompositor::new(canvas, config.canvas_backdrop),
            magnifier: Magnifier::new(config.magnifier),
            exporter: Exporter::new(config.export.clone()),
            document: Document::new(),
            sources: SourceImages::default(),
            last_frame: None,
            last_key: None,
            config,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn canvas(&self) -> &CanvasConfig {
        self.compositor.canvas()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn gestures(&self) -> &GestureInterpreter {
        &self.gestures
    }

    pub fn magnifier(&self) -> &Magnifier {
        &self.magnifier
    }

    pub fn sources(&self) -> &SourceImages {
        &self.sources
    }

    /// Start over with a new image pair. History does not carry across.
    pub fn set_sources(&mut self, sources: SourceImages) {
        if !sources.is_complete() {
            info!("Source images incomplete; canvas stays blank");
        }
        self.sources = sources;
        self.document.clear();
        self.gestures.active_path().clear();
        self.last_frame = None;
        self.last_key = None;
    }

    /// Resize the canvas, e.g. after the viewport changed
    pub fn set_canvas(&mut self, canvas: CanvasConfig) {
        if canvas != *self.compositor.canvas() {
            self.compositor = MaskCompositor::new(canvas, self.compositor.backdrop());
            self.last_frame = None;
            self.last_key = None;
        }
    }

    pub fn handle(&mut self, event: GestureEvent) -> GestureOutcome {
        let outcome = self.gestures.handle(event, &self.brush, &mut self.document);
        let drawing = self.gestures.is_drawing();
        if drawing {
            if let Some(pos) = self.gestures.active_path().pointer() {
                self.magnifier.track(pos);
            }
        }
        self.magnifier.set_drawing(drawing);
        outcome
    }

    pub fn undo(&mut self) -> bool {
        let changed = self.document.undo();
        if !changed {
            debug!("Nothing to undo");
        }
        changed
    }

    pub fn redo(&mut self) -> bool {
        let changed = self.document.redo();
        if !changed {
            debug!("Nothing to redo");
        }
        changed
    }

    pub fn can_undo(&self) -> bool {
        self.document.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.document.can_redo()
    }

    pub fn brush(&self) -> Brush {
        self.brush
    }

    pub fn set_brush_width(&mut self, width: f32) {
        self.brush.width = sanitize_width(width);
    }

    pub fn set_brush_mode(&mut self, mode: StrokeMode) {
        self.brush.mode = mode;
    }

    /// Show the magnifier while the width control is held, so the user can
    /// see the brush size against the image
    pub fn begin_brush_adjust(&mut self) {
        if self.magnifier.focal().is_none() {
            let canvas = self.compositor.canvas();
            self.magnifier.track(pos2(canvas.width / 2.0, canvas.height / 2.0));
        }
        self.magnifier.set_adjusting_brush(true);
    }

    pub fn end_brush_adjust(&mut self) {
        self.magnifier.set_adjusting_brush(false);
    }

    fn frame_key(&self) -> FrameKey {
        FrameKey {
            strokes: self.document.snapshot(),
            active_version: self.gestures.active_path().version(),
            brush: self.brush,
        }
    }

    /// True if the next `render_canvas` would produce a different frame
    pub fn needs_render(&self) -> bool {
        self.last_key.as_ref() != Some(&self.frame_key())
    }

    /// Render the main canvas, including the stroke being drawn
    pub fn render_canvas(&mut self) -> Option<&Pixmap> {
        let key = self.frame_key();
        if self.last_key.as_ref() == Some(&key) && self.last_frame.is_some() {
            return self.last_frame.as_ref();
        }

        let active = self.gestures.active_path().snapshot();
        let preview = active.stroke.as_ref().map(|s| ActivePreview {
            points: s.points(),
            brush: self.brush,
        });
        let frame = self.compositor.render_canvas(&self.sources, &key.strokes, preview);

        self.last_key = frame.as_ref().map(|_| key);
        self.last_frame = frame;
        self.last_frame.as_ref()
    }

    /// Render the loupe around the pointer, or `None` while it is hidden
    pub fn render_magnifier(&self) -> Option<Pixmap> {
        let viewport = self.magnifier.viewport()?;
        let strokes = self.document.snapshot();
        let active = self.gestures.active_path().snapshot();
        let preview = active.stroke.as_ref().map(|s| ActivePreview {
            points: s.points(),
            brush: self.brush,
        });
        self.compositor
            .render(&self.sources, &strokes, preview, &viewport)
    }

    /// Encode the committed strokes. Fails with `NoSnapshot` until the
    /// canvas has rendered at least once.
    pub fn export(&self) -> ExportResult<Vec<u8>> {
        if self.last_frame.is_none() {
            return Err(ExportError::NoSnapshot);
        }
        let strokes = self.document.snapshot();
        let flattened = self
            .compositor
            .with_backdrop(self.config.export_backdrop)
            .render_canvas(&self.sources, &strokes, None);
        self.exporter.export(flattened.as_ref())
    }

    /// Export and save through `store`. Returns the saved uri, or `None` if
    /// the export was skipped or failed.
    pub fn export_to(&self, store: &dyn ImageStore) -> Option<String> {
        let bytes = match self.export() {
            Ok(bytes) => bytes,
            Err(ExportError::NoSnapshot) => {
                info!("Export skipped: nothing rendered yet");
                return None;
            }
            Err(err) => {
                error!("Export failed: {}", err);
                return None;
            }
        };
        self.exporter.save(&bytes, store).ok()
    }
}
