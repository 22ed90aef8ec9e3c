use crate::error::{ImageError, ImageResult};
use log::{info, warn};
use std::path::Path;
use std::sync::Arc;
use tiny_skia::{ColorU8, IntSize, Pixmap};

/// A decoded bitmap, premultiplied and ready for compositing
#[derive(Debug, Clone)]
pub struct Bitmap {
    pixmap: Arc<Pixmap>,
}

impl Bitmap {
    /// Decode any format the `image` crate understands
    pub fn decode(bytes: &[u8]) -> ImageResult<Self> {
        let rgba = image::load_from_memory(bytes)?.to_rgba8();
        Self::from_rgba(&rgba)
    }

    pub fn load(path: impl AsRef<Path>) -> ImageResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        info!("Loaded image from {} ({} bytes)", path.display(), bytes.len());
        Self::decode(&bytes)
    }

    pub fn from_rgba(rgba: &image::RgbaImage) -> ImageResult<Self> {
        let (width, height) = rgba.dimensions();
        let size = IntSize::from_wh(width, height)
            .ok_or(ImageError::InvalidDimensions { width, height })?;

        let mut data = Vec::with_capacity(rgba.as_raw().len());
        for px in rgba.pixels() {
            let [r, g, b, a] = px.0;
            let p = ColorU8::from_rgba(r, g, b, a).premultiply();
            data.extend_from_slice(&[p.red(), p.green(), p.blue(), p.alpha()]);
        }

        let pixmap = Pixmap::from_vec(data, size)
            .ok_or(ImageError::InvalidDimensions { width, height })?;
        Ok(Self {
            pixmap: Arc::new(pixmap),
        })
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }
}

/// Convert a rendered pixmap back to straight-alpha RGBA
pub fn pixmap_to_rgba(pixmap: &Pixmap) -> image::RgbaImage {
    let mut data = Vec::with_capacity(pixmap.data().len());
    for px in pixmap.pixels() {
        let c = px.demultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    image::RgbaImage::from_vec(pixmap.width(), pixmap.height(), data)
        .unwrap_or_else(|| image::RgbaImage::new(pixmap.width(), pixmap.height()))
}

/// The two bitmaps the editor composites. Either slot may be missing.
#[derive(Debug, Clone, Default)]
pub struct SourceImages {
    pub original: Option<Bitmap>,
    pub cutout: Option<Bitmap>,
}

impl SourceImages {
    pub fn new(original: Option<Bitmap>, cutout: Option<Bitmap>) -> Self {
        Self { original, cutout }
    }

    /// Decode both byte sources; a failed decode leaves its slot empty
    pub fn decode(original: &[u8], cutout: &[u8]) -> Self {
        Self {
            original: decode_slot("original", Bitmap::decode(original)),
            cutout: decode_slot("cutout", Bitmap::decode(cutout)),
        }
    }

    pub fn load(original: impl AsRef<Path>, cutout: impl AsRef<Path>) -> Self {
        Self {
            original: decode_slot("original", Bitmap::load(original)),
            cutout: decode_slot("cutout", Bitmap::load(cutout)),
        }
    }

    /// Both bitmaps, or `None` while either is unavailable
    pub fn pair(&self) -> Option<(&Bitmap, &Bitmap)> {
        Some((self.original.as_ref()?, self.cutout.as_ref()?))
    }

    pub fn is_complete(&self) -> bool {
        self.pair().is_some()
    }
}

fn decode_slot(name: &str, result: ImageResult<Bitmap>) -> Option<Bitmap> {
    match result {
        Ok(bitmap) => Some(bitmap),
        Err(err) => {
            warn!("Could not use {} image: {}", name, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(img: &image::RgbaImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_premultiplies() {
        let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([200, 100, 50, 128]));
        let bitmap = Bitmap::decode(&png_bytes(&img)).unwrap();

        assert_eq!((bitmap.width(), bitmap.height()), (2, 2));
        let px = bitmap.pixmap().pixels()[0];
        assert_eq!(px.alpha(), 128);
        assert!(px.red() < 200);
    }

    #[test]
    fn test_rgba_round_trip_of_opaque_pixels() {
        let img = image::RgbaImage::from_pixel(3, 1, image::Rgba([10, 20, 30, 255]));
        let bitmap = Bitmap::from_rgba(&img).unwrap();
        assert_eq!(pixmap_to_rgba(bitmap.pixmap()), img);
    }

    #[test]
    fn test_bad_bytes_leave_slot_empty() {
        let img = image::RgbaImage::from_pixel(1, 1, image::Rgba([0, 0, 0, 255]));
        let sources = SourceImages::decode(&png_bytes(&img), b"not an image");

        assert!(sources.original.is_some());
        assert!(sources.cutout.is_none());
        assert!(!sources.is_complete());
    }

    #[test]
    fn test_zero_sized_image_is_rejected() {
        let img = image::RgbaImage::new(0, 0);
        assert!(matches!(
            Bitmap::from_rgba(&img),
            Err(ImageError::InvalidDimensions { .. })
        ));
    }
}
