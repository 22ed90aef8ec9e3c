use base64::{Engine as _, engine::general_purpose};
use cutout_editor::{
    Bitmap, CanvasConfig, EditorConfig, EditorSession, ExportConfig, ExportFormat, Exporter,
    GestureEvent, ImageBody, ImageStore, LocalImageStore, RedrawCounter, SourceImages,
};
use cutout_editor::error::{ExportError, StoreResult};
use egui::pos2;
use std::cell::RefCell;
use std::sync::Arc;

fn solid(size: u32, rgba: [u8; 4]) -> Bitmap {
    Bitmap::from_rgba(&image::RgbaImage::from_pixel(size, size, image::Rgba(rgba))).unwrap()
}

fn session() -> EditorSession {
    let mut session = EditorSession::new(
        EditorConfig::default(),
        CanvasConfig::square(60.0),
        Arc::new(RedrawCounter::new()),
    );
    session.set_sources(SourceImages::new(
        Some(solid(60, [0, 255, 0, 255])),
        Some(solid(60, [0, 0, 0, 0])),
    ));
    session
}

/// Records what it was asked to save
#[derive(Default)]
struct RecordingStore {
    saved: RefCell<Vec<ImageBody>>,
}

impl ImageStore for RecordingStore {
    fn save_image_locally(&self, body: &ImageBody) -> StoreResult<String> {
        self.saved.borrow_mut().push(body.clone());
        Ok(format!("memory://{}", body.file_name))
    }
}

#[test]
fn test_export_before_first_render_is_skipped() {
    let session = session();
    assert!(matches!(session.export(), Err(ExportError::NoSnapshot)));

    let store = RecordingStore::default();
    assert_eq!(session.export_to(&store), None);
    assert!(store.saved.borrow().is_empty());
}

#[test]
fn test_export_reflects_committed_strokes_only() {
    let mut session = session();
    session.handle(GestureEvent::Tap { pos: pos2(30.0, 30.0) });
    // An open pan must not leak into the export
    session.handle(GestureEvent::PanBegin { pos: pos2(0.0, 55.0) });
    session.handle(GestureEvent::PanChange { pos: pos2(60.0, 55.0) });
    session.render_canvas();

    let bytes = session.export().unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();

    assert_eq!(decoded.dimensions(), (60, 60));
    assert_eq!(decoded.get_pixel(30, 30).0, [0, 255, 0, 255]);
    // Export backdrop defaults to transparent
    assert_eq!(decoded.get_pixel(2, 2).0[3], 0);
    assert_eq!(decoded.get_pixel(30, 55).0[3], 0);
}

#[test]
fn test_export_to_hands_base64_to_store() {
    let mut session = session();
    session.handle(GestureEvent::Tap { pos: pos2(10.0, 10.0) });
    session.render_canvas();

    let store = RecordingStore::default();
    let uri = session.export_to(&store).unwrap();

    assert_eq!(uri, "memory://cutout-export.png");
    let saved = store.saved.borrow();
    assert_eq!(saved.len(), 1);
    let bytes = general_purpose::STANDARD.decode(&saved[0].base64).unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Png);
}

#[test]
fn test_local_store_creates_directory_and_writes_bytes() {
    let dir = tempfile::tempdir().expect("temp dir");
    let cache = dir.path().join("cache");
    let store = LocalImageStore::new(&cache);
    let payload = b"\x89PNG fake payload".to_vec();

    let uri = store
        .save_image_locally(&ImageBody {
            file_name: "cutout.png".to_owned(),
            base64: general_purpose::STANDARD.encode(&payload),
        })
        .unwrap();

    let path = cache.join("images").join("cutout.png");
    assert_eq!(uri, format!("file://{}", path.display()));
    assert_eq!(std::fs::read(&path).unwrap(), payload);
}

#[test]
fn test_local_store_rejects_bad_base64() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = LocalImageStore::new(dir.path());
    let result = store.save_image_locally(&ImageBody {
        file_name: "x.png".to_owned(),
        base64: "***".to_owned(),
    });
    assert!(result.is_err());
}

#[test]
fn test_exporter_save_uses_configured_name() {
    let exporter = Exporter::new(ExportConfig {
        file_name: "final.jpg".to_owned(),
        format: ExportFormat::Jpeg { quality: 80 },
    });
    let store = RecordingStore::default();

    let uri = exporter.save(b"bytes", &store).unwrap();
    assert_eq!(uri, "memory://final.jpg");
    assert_eq!(store.saved.borrow()[0].base64, general_purpose::STANDARD.encode(b"bytes"));
}
