use crate::bitmap::pixmap_to_rgba;
use crate::error::{ExportError, ExportResult, StoreError, StoreResult};
use base64::{Engine as _, engine::general_purpose};
use image::codecs::jpeg::JpegEncoder;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tiny_skia::Pixmap;

/// Encoding used for exported images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExportFormat {
    #[default]
    Png,
    /// Lossy; alpha is flattened onto white. Quality is 1..=100.
    Jpeg { quality: u8 },
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg { .. } => "jpg",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub file_name: String,
    pub format: ExportFormat,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: "cutout-export.png".to_owned(),
            format: ExportFormat::Png,
        }
    }
}

/// Payload handed to the image store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageBody {
    pub file_name: String,
    pub base64: String,
}

/// Persists encoded images and returns a uri for them
pub trait ImageStore {
    fn save_image_locally(&self, body: &ImageBody) -> StoreResult<String>;
}

/// Hands a saved image to the platform (share sheet, file manager, ...).
/// Fire and forget: the exporter never waits on or inspects the result.
pub trait ShareTarget {
    fn share(&self, uri: &str);
}

/// Flattens the committed composite into encoded bytes
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    config: ExportConfig,
}

impl Exporter {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Encode `snapshot`. No snapshot means the canvas never rendered.
    pub fn export(&self, snapshot: Option<&Pixmap>) -> ExportResult<Vec<u8>> {
        let pixmap = snapshot.ok_or(ExportError::NoSnapshot)?;
        let rgba = pixmap_to_rgba(pixmap);
        let mut bytes = Vec::new();

        match self.config.format {
            ExportFormat::Png => {
                rgba.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
            }
            ExportFormat::Jpeg { quality } => {
                let rgb = flatten_onto_white(&rgba);
                let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100));
                encoder.encode_image(&rgb)?;
            }
        }

        info!(
            "Exported {}x{} image as {} ({} bytes)",
            pixmap.width(),
            pixmap.height(),
            self.config.format.extension(),
            bytes.len()
        );
        Ok(bytes)
    }

    /// Base64-encode `bytes` and hand them to `store` under the configured name
    pub fn save(&self, bytes: &[u8], store: &dyn ImageStore) -> StoreResult<String> {
        let body = ImageBody {
            file_name: self.config.file_name.clone(),
            base64: general_purpose::STANDARD.encode(bytes),
        };
        store.save_image_locally(&body).inspect_err(|err| {
            error!("Failed to save {}: {}", body.file_name, err);
        })
    }
}

fn flatten_onto_white(rgba: &image::RgbaImage) -> image::RgbImage {
    image::RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let blend = |c: u8| -> u8 {
            let a = a as u32;
            ((c as u32 * a + 255 * (255 - a) + 127) / 255) as u8
        };
        image::Rgb([blend(r), blend(g), blend(b)])
    })
}

/// Writes images into `<cache_dir>/images/`
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    dir: PathBuf,
}

impl LocalImageStore {
    pub fn new(cache_dir: impl AsRef<Path>) -> Self {
        Self {
            dir: cache_dir.as_ref().join("images"),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_path(&self, file_name: &str) -> StoreResult<PathBuf> {
        let name = Path::new(file_name);
        // Only bare file names; nothing that could escape the directory
        match name.file_name() {
            Some(base) if base == name.as_os_str() => Ok(self.dir.join(base)),
            _ => Err(StoreError::InvalidFileName(file_name.to_owned())),
        }
    }
}

impl ImageStore for LocalImageStore {
    fn save_image_locally(&self, body: &ImageBody) -> StoreResult<String> {
        let path = self.file_path(&body.file_name)?;
        let bytes = general_purpose::STANDARD.decode(&body.base64)?;

        if !self.dir.exists() {
            std::fs::create_dir_all(&self.dir)?;
        }
        std::fs::write(&path, bytes)?;

        info!("Saved image to {}", path.display());
        Ok(format!("file://{}", path.display()))
    }
}
