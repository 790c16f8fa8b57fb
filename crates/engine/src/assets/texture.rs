use std::path::Path;

use image::ImageReader;

use super::types::{AssetError, AssetKind};

/// Decoded RGBA8 pixel data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl Texture {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = ((y * self.width + x) * 4) as usize;
        let bytes = self.rgba.get(offset..offset + 4)?;
        Some([bytes[0], bytes[1], bytes[2], bytes[3]])
    }
}

pub(crate) fn load_texture(path: &Path) -> Result<Texture, AssetError> {
    let reader = ImageReader::open(path)
        .and_then(ImageReader::with_guessed_format)
        .map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let decoded = reader.decode().map_err(|error| AssetError::Decode {
        path: path.to_path_buf(),
        kind: AssetKind::Texture,
        message: error.to_string(),
    })?;
    let image = decoded.to_rgba8();
    Ok(Texture {
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn decodes_png_to_rgba() {
        let temp = TempDir::new().expect("temp");
        let path = temp.path().join("dot.png");
        let mut image = RgbaImage::new(3, 2);
        image.put_pixel(2, 1, Rgba([10, 20, 30, 255]));
        image.save(&path).expect("save png");

        let texture = load_texture(&path).expect("load");
        assert_eq!((texture.width(), texture.height()), (3, 2));
        assert_eq!(texture.rgba().len(), 3 * 2 * 4);
        assert_eq!(texture.pixel(2, 1), Some([10, 20, 30, 255]));
        assert_eq!(texture.pixel(3, 0), None);
    }

    #[test]
    fn missing_file_is_io_error() {
        let temp = TempDir::new().expect("temp");
        let error = load_texture(&temp.path().join("missing.png")).expect_err("missing");
        assert!(matches!(error, AssetError::Io { .. }));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let temp = TempDir::new().expect("temp");
        let path = temp.path().join("broken.png");
        fs::write(&path, b"definitely not a png").expect("write");
        let error = load_texture(&path).expect_err("broken");
        assert!(matches!(
            error,
            AssetError::Decode {
                kind: AssetKind::Texture,
                ..
            }
        ));
    }
}
