//! Building screenshot discovery and perceptual hashing.
//!
//! Every published building has a `front.jpg` and optionally a `back.jpg`
//! in its image directory. The site shows a blurhash placeholder while the
//! real screenshot loads; hashes are cached by image content hash since
//! encoding requires decoding the full JPEG.

use std::path::{Path, PathBuf};

use crate::error::{DecodeError, Result};

/// The expected screenshot pair for one building.
pub struct BuildingImages {
    pub front: PathBuf,
    pub back: PathBuf,
}

pub fn find_building_images(image_dir: &Path) -> BuildingImages {
    BuildingImages {
        front: image_dir.join("front.jpg"),
        back: image_dir.join("back.jpg"),
    }
}

/// Blurhash of an image, 4x4 components over a thumbnail capped at 100px.
pub fn blur_hash(path: &Path) -> Result<String> {
    let image = image::open(path)?;
    let thumbnail = image.thumbnail(100, 100);
    let rgba = thumbnail.to_rgba8();
    let (width, height) = rgba.dimensions();
    blurhash::encode(4, 4, width, height, rgba.as_raw())
        .map_err(|e| DecodeError::BlurHash(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn blur_hash_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("front.jpg");
        let image = RgbImage::from_fn(16, 16, |x, y| {
            image::Rgb([(x * 16) as u8, (y * 16) as u8, 128])
        });
        image.save(&path).unwrap();

        let first = blur_hash(&path).unwrap();
        let second = blur_hash(&path).unwrap();
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn missing_image_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(blur_hash(&dir.path().join("front.jpg")).is_err());
    }
}
