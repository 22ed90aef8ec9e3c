use egui::Pos2;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// A point in canvas space, in device pixels
pub type Point = Pos2;

/// Strokes thinner than this are widened to it
pub const MIN_STROKE_WIDTH: f32 = 1.0;

/// Blend applied by a stroke when it is drawn into the mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StrokeMode {
    /// Reveals the subject through the mask
    #[default]
    Paint,
    /// Clears the mask back to transparent
    Erase,
}

impl StrokeMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Paint => "Paint",
            Self::Erase => "Erase",
        }
    }
}

/// Current tool settings, read by the gesture interpreter on every commit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Brush {
    pub width: f32,
    pub mode: StrokeMode,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            width: 30.0,
            mode: StrokeMode::Paint,
        }
    }
}

impl Brush {
    pub fn new(width: f32, mode: StrokeMode) -> Self {
        Self {
            width: sanitize_width(width),
            mode,
        }
    }
}

pub(crate) fn sanitize_width(width: f32) -> f32 {
    if width.is_finite() && width >= MIN_STROKE_WIDTH {
        width
    } else {
        MIN_STROKE_WIDTH
    }
}

// Immutable stroke for sharing
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    id: String,
    points: Vec<Point>,
    width: f32,
    mode: StrokeMode,
}

// Define a reference-counted type alias for Stroke
pub type StrokeRef = Arc<Stroke>;

impl Stroke {
    /// Create a stroke with a freshly generated id
    pub fn new(points: Vec<Point>, width: f32, mode: StrokeMode) -> Self {
        Self::with_id(Uuid::now_v7().to_string(), points, width, mode)
    }

    pub fn with_id(id: String, points: Vec<Point>, width: f32, mode: StrokeMode) -> Self {
        Self {
            id,
            points,
            width: sanitize_width(width),
            mode,
        }
    }

    // Create a new reference-counted Stroke
    pub fn new_ref(points: Vec<Point>, width: f32, mode: StrokeMode) -> StrokeRef {
        Arc::new(Self::new(points, width, mode))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn mode(&self) -> StrokeMode {
        self.mode
    }

    /// True when the stroke covers no distance and should be drawn as a dot
    pub fn is_dot(&self) -> bool {
        is_dot(&self.points)
    }
}

pub(crate) fn is_dot(points: &[Point]) -> bool {
    match points.first() {
        Some(first) => points.iter().all(|p| p == first),
        None => true,
    }
}

/// A stroke under construction. It has no id until it is committed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveStroke {
    points: Vec<Point>,
}

impl ActiveStroke {
    pub fn begin(point: Point) -> Self {
        Self {
            points: vec![point],
        }
    }

    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Freeze into an immutable stroke using the brush at commit time
    pub fn commit(self, brush: &Brush) -> StrokeRef {
        Arc::new(Stroke::new(self.points, brush.width, brush.mode))
    }
}
