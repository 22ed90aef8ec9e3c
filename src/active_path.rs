//! Live drawing state shared between the gesture interpreter and the views.
//!
//! Pointer samples mutate [`ActivePath`] in place and then ring a
//! [`RedrawSignal`]. Nothing here touches the undo history; that only happens
//! when a gesture ends.

use crate::stroke::{ActiveStroke, Point};
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Cheap "please repaint" notification
pub trait RedrawSignal: Send + Sync {
    fn request_redraw(&self);
}

impl RedrawSignal for egui::Context {
    fn request_redraw(&self) {
        self.request_repaint();
    }
}

/// Counts redraw requests. Useful for headless hosts and tests.
#[derive(Debug, Default)]
pub struct RedrawCounter {
    count: AtomicU64,
}

impl RedrawCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

impl RedrawSignal for RedrawCounter {
    fn request_redraw(&self) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }
}

/// The in-progress stroke and the latest pointer position
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivePath {
    pub stroke: Option<ActiveStroke>,
    pub pointer: Option<Point>,
    /// Bumped on every mutation so views can skip redundant renders
    pub version: u64,
}

/// Handle to the shared drawing buffer
#[derive(Clone)]
pub struct SharedActivePath {
    inner: Arc<RwLock<ActivePath>>,
    redraw: Arc<dyn RedrawSignal>,
}

impl std::fmt::Debug for SharedActivePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedActivePath")
            .field("path", &*self.inner.read())
            .finish_non_exhaustive()
    }
}

impl SharedActivePath {
    pub fn new(redraw: Arc<dyn RedrawSignal>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ActivePath::default())),
            redraw,
        }
    }

    /// Copy of the current state, taken under a short read lock
    pub fn snapshot(&self) -> ActivePath {
        self.inner.read().clone()
    }

    /// Latest pointer sample of the open gesture
    pub fn pointer(&self) -> Option<Point> {
        self.inner.read().pointer
    }

    pub fn version(&self) -> u64 {
        self.inner.read().version
    }

    /// Mutate in place and request a redraw
    pub fn update<R>(&self, f: impl FnOnce(&mut ActivePath) -> R) -> R {
        let result = {
            let mut path = self.inner.write();
            let result = f(&mut path);
            path.version = path.version.wrapping_add(1);
            result
        };
        self.redraw.request_redraw();
        result
    }

    /// Start a fresh stroke at `point`, dropping whatever was left over
    pub fn begin(&self, point: Point) -> bool {
        self.update(|path| {
            let discarded = path.stroke.replace(ActiveStroke::begin(point)).is_some();
            path.pointer = Some(point);
            discarded
        })
    }

    pub fn extend(&self, point: Point) {
        self.update(|path| {
            if let Some(stroke) = &mut path.stroke {
                stroke.add_point(point);
            }
            path.pointer = Some(point);
        });
    }

    /// Take the stroke out, leaving the buffer empty
    pub fn take(&self) -> Option<ActiveStroke> {
        self.update(|path| {
            path.pointer = None;
            path.stroke.take()
        })
    }

    pub fn clear(&self) {
        self.update(|path| {
            path.stroke = None;
            path.pointer = None;
        });
    }
}
