//! Embedded textures
//!
//! Every texture the game needs is compiled into the binary and looked up by
//! its file name. Decoding goes through the `image` crate into RGBA8.

use thiserror::Error;

/// Opaque reference to a loaded visual, issued by the presentation layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct VisualHandle(u32);

impl VisualHandle {
    pub fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Texture loading errors
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

/// Files compiled into the binary
const EMBEDDED: &[(&str, &[u8])] = &[
    ("rocket.png", include_bytes!("../assets/rocket.png")),
    ("platform.png", include_bytes!("../assets/platform.png")),
    ("rock.png", include_bytes!("../assets/rock.png")),
    ("font1.png", include_bytes!("../assets/font1.png")),
];

/// Raw bytes of an embedded asset
pub fn embedded(path: &str) -> Option<&'static [u8]> {
    EMBEDDED
        .iter()
        .find(|(name, _)| *name == path)
        .map(|(_, bytes)| *bytes)
}

/// Decoded image data ready for GPU upload
#[derive(Debug, Clone)]
pub struct ImageData {
    /// RGBA8 pixels, row-major, top row first
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl ImageData {
    /// Decode an embedded asset by file name
    pub fn load(path: &str) -> Result<Self, AssetError> {
        let bytes = embedded(path).ok_or_else(|| AssetError::NotFound(path.to_string()))?;
        let image = Self::from_bytes(path, bytes)?;
        log::debug!("Loaded {} ({}x{})", path, image.width, image.height);
        Ok(image)
    }

    /// Decode image bytes (any format the `image` crate was built with)
    pub fn from_bytes(path: &str, bytes: &[u8]) -> Result<Self, AssetError> {
        let rgba = image::load_from_memory(bytes)
            .map_err(|source| AssetError::Decode {
                path: path.to_string(),
                source,
            })?
            .to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            data: rgba.into_raw(),
            width,
            height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_textures_decode() {
        for (path, expected) in [
            ("rocket.png", (16, 16)),
            ("platform.png", (16, 16)),
            ("rock.png", (16, 16)),
            ("font1.png", (128, 128)),
        ] {
            let image = ImageData::load(path).unwrap();
            assert_eq!((image.width, image.height), expected, "{path}");
            assert_eq!(image.data.len(), (image.width * image.height * 4) as usize);
        }
    }

    #[test]
    fn test_missing_asset() {
        assert!(matches!(
            ImageData::load("missing.png"),
            Err(AssetError::NotFound(path)) if path == "missing.png"
        ));
    }

    #[test]
    fn test_corrupt_bytes() {
        let err = ImageData::from_bytes("junk.png", b"not an image").unwrap_err();
        assert!(matches!(err, AssetError::Decode { .. }));
        assert!(err.to_string().contains("junk.png"));
    }

    #[test]
    fn test_handle_index_round_trip() {
        assert_eq!(VisualHandle::from_index(3).index(), 3);
        assert_eq!(VisualHandle::default().index(), 0);
    }
}
