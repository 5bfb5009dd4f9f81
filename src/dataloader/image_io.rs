use std::path::Path;

use image::{ImageFormat, RgbImage};

use super::error::{DatasetError, Result};

/// Opens an image from disk as 8-bit RGB, whatever its stored colour type.
pub fn load_image(path: impl AsRef<Path>) -> Result<RgbImage> {
    let img = image::open(path.as_ref())?;
    Ok(img.to_rgb8())
}

/// Format named by the extension of the url's last path segment.
pub fn image_format_from_url(url: &str) -> Result<ImageFormat> {
    let path = url
        .split(['?', '#'])
        .next()
        .unwrap_or(url);

    path.rsplit('/')
        .next()
        .and_then(|segment| segment.rsplit_once('.'))
        .and_then(|(_, ext)| ImageFormat::from_extension(ext))
        .ok_or_else(|| DatasetError::UnknownImageFormat(url.to_string()))
}

/// Fetches and decodes an image over HTTP. Blocks until the whole body is read.
pub fn load_image_url(url: &str) -> Result<RgbImage> {
    let format = image_format_from_url(url)?;

    let bytes = reqwest::blocking::get(url)?
        .error_for_status()?
        .bytes()?;
    log::debug!("Fetched {} bytes from {}", bytes.len(), url);

    let img = image::load_from_memory_with_format(&bytes, format)?;
    Ok(img.to_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_plain_url() {
        let format = image_format_from_url("http://example.com/a/b/cat.jpg").unwrap();
        assert_eq!(format, ImageFormat::Jpeg);
    }

    #[test]
    fn format_ignores_query_and_fragment() {
        let format = image_format_from_url("https://example.com/dog.png?size=large#top").unwrap();
        assert_eq!(format, ImageFormat::Png);
    }

    #[test]
    fn format_from_url_without_extension_fails() {
        let err = image_format_from_url("https://example.com/images/dog").unwrap_err();
        assert!(matches!(err, DatasetError::UnknownImageFormat(_)));
    }

    #[test]
    fn format_does_not_read_host_dots() {
        assert!(image_format_from_url("https://example.png/").is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_image("/definitely/not/here.jpg").is_err());
    }
}
