//! Bitmap sources: local files and `http(s)` URLs.

use std::path::Path;

use image::RgbaImage;

use crate::config::FetchPolicy;
use crate::error::{DrawError, Result};

/// Loads and decodes source images. Every call blocks until the bytes are in.
#[derive(Debug, Clone, Default)]
pub struct BitmapLoader {
    #[cfg_attr(not(feature = "network"), allow(dead_code))]
    policy: FetchPolicy,
}

impl BitmapLoader {
    pub fn new(policy: FetchPolicy) -> Self {
        if policy.accept_invalid_certs {
            log::warn!("TLS certificate validation is disabled for remote images");
        }
        Self { policy }
    }

    /// `source` starting with `http` is fetched; anything else is a local path, which must exist.
    pub fn load(&self, source: &str) -> Result<RgbaImage> {
        let bytes = if source.starts_with("http") {
            self.fetch(source)?
        } else {
            read_local(Path::new(source))?
        };
        decode(&bytes)
    }

    #[cfg(feature = "network")]
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let fail = |e: reqwest::Error| DrawError::Fetch {
            url: url.to_owned(),
            reason: e.to_string(),
        };

        let client = reqwest::blocking::Client::builder()
            .danger_accept_invalid_certs(self.policy.accept_invalid_certs)
            .build()
            .map_err(fail)?;
        let response = client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(fail)?;
        let bytes = response.bytes().map_err(fail)?;
        log::debug!("fetched {} bytes from {url}", bytes.len());
        Ok(bytes.to_vec())
    }

    #[cfg(not(feature = "network"))]
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        Err(DrawError::Fetch {
            url: url.to_owned(),
            reason: "built without the `network` feature".to_owned(),
        })
    }
}

fn read_local(path: &Path) -> Result<Vec<u8>> {
    if !path.is_file() {
        return Err(DrawError::NotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(std::fs::read(path)?)
}

/// Decodes any format the `image` crate was built with, converting to RGBA
pub fn decode(bytes: &[u8]) -> Result<RgbaImage> {
    let image = image::load_from_memory(bytes).map_err(DrawError::Decode)?;
    Ok(image.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};

    #[test]
    fn missing_file_is_not_found() {
        let err = BitmapLoader::default().load("/no/such/image.png").unwrap_err();
        assert!(matches!(err, DrawError::NotFound { .. }));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn garbage_is_a_recoverable_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-an-image.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        let err = BitmapLoader::default()
            .load(path.to_str().unwrap())
            .unwrap_err();
        assert!(matches!(err, DrawError::Decode(_)));
        assert!(err.is_recoverable());
    }

    #[test]
    fn loads_local_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dot.png");
        RgbaImage::from_pixel(3, 5, Rgba([1, 2, 3, 255]))
            .save_with_format(&path, ImageFormat::Png)
            .unwrap();

        let loaded = BitmapLoader::default().load(path.to_str().unwrap()).unwrap();
        assert_eq!(loaded.dimensions(), (3, 5));
        assert_eq!(*loaded.get_pixel(2, 4), Rgba([1, 2, 3, 255]));
    }

    #[cfg(not(feature = "network"))]
    #[test]
    fn urls_need_the_network_feature() {
        let err = BitmapLoader::default()
            .load("https://example.com/a.png")
            .unwrap_err();
        assert!(matches!(err, DrawError::Fetch { .. }));
    }
}
