use image::ImageFormat;

/// Image formats the board accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
    Gif,
    WebP,
}

impl ImageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageKind::Png => "png",
            ImageKind::Jpeg => "jpeg",
            ImageKind::Gif => "gif",
            ImageKind::WebP => "webp",
        }
    }

    fn from_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Png => Some(ImageKind::Png),
            ImageFormat::Jpeg => Some(ImageKind::Jpeg),
            ImageFormat::Gif => Some(ImageKind::Gif),
            ImageFormat::WebP => Some(ImageKind::WebP),
            _ => None,
        }
    }

    fn format(&self) -> ImageFormat {
        match self {
            ImageKind::Png => ImageFormat::Png,
            ImageKind::Jpeg => ImageFormat::Jpeg,
            ImageKind::Gif => ImageFormat::Gif,
            ImageKind::WebP => ImageFormat::WebP,
        }
    }
}

impl std::fmt::Display for ImageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides whether an uploaded buffer really is an image.
///
/// Returns the detected kind, or `None` when the bytes are not a decodable
/// image of a supported kind.
pub trait ImageValidator: Send + Sync {
    fn inspect(&self, bytes: &[u8]) -> Option<ImageKind>;
}

/// Sniffs the format from magic bytes, then runs a full decode.
#[derive(Debug, Default, Clone, Copy)]
pub struct DecodingValidator;

impl ImageValidator for DecodingValidator {
    fn inspect(&self, bytes: &[u8]) -> Option<ImageKind> {
        let format = image::guess_format(bytes).ok()?;
        let kind = ImageKind::from_format(format)?;

        match image::load_from_memory_with_format(bytes, kind.format()) {
            Ok(_) => Some(kind),
            Err(e) => {
                tracing::debug!("Image failed to decode as {}: {}", kind, e);
                None
            }
        }
    }
}
