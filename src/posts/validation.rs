use bytes::Bytes;

use crate::media::{ImageKind, ImageValidator};

/// Largest request body accepted on the upload route.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub const ALLOWED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

pub const NAME_MAX_CHARS: usize = 120;
pub const DESCRIPTION_MAX_CHARS: usize = 2000;

/// Why a submission was turned away. The display text is shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("Please enter your name.")]
    NameRequired,

    #[error("Please write a description.")]
    DescriptionRequired,

    #[error("Please choose an image.")]
    ImageRequired,

    #[error("Only PNG, JPG, JPEG, GIF and WEBP images are supported.")]
    UnsupportedFormat,

    #[error("The file does not appear to be a valid image.")]
    InvalidImage,

    #[error("The image is too large. The maximum size is 10 MB.")]
    TooLarge,
}

/// Uploaded file part as received.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub bytes: Bytes,
}

/// Raw form input; every field may be missing.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<ImageUpload>,
}

/// A submission that passed every check, ready to be stored.
#[derive(Debug, Clone)]
pub struct ValidSubmission {
    pub name: String,
    pub description: String,
    /// Lowercased, member of [`ALLOWED_EXTENSIONS`].
    pub extension: String,
    pub kind: ImageKind,
    /// The exact bytes the validator decoded.
    pub bytes: Bytes,
}

impl Submission {
    /// Run the checks in order; the first failure wins.
    pub fn validate(self, validator: &dyn ImageValidator) -> Result<ValidSubmission, Rejection> {
        let name = required_text(self.name).ok_or(Rejection::NameRequired)?;
        let description = required_text(self.description).ok_or(Rejection::DescriptionRequired)?;

        let (file_name, bytes) = match self.image {
            Some(ImageUpload {
                file_name: Some(file_name),
                bytes,
            }) if !file_name.is_empty() => (file_name, bytes),
            _ => return Err(Rejection::ImageRequired),
        };

        let extension = allowed_extension(&file_name).ok_or(Rejection::UnsupportedFormat)?;
        let kind = validator.inspect(&bytes).ok_or(Rejection::InvalidImage)?;

        Ok(ValidSubmission {
            name: truncate_chars(&name, NAME_MAX_CHARS),
            description: truncate_chars(&description, DESCRIPTION_MAX_CHARS),
            extension,
            kind,
            bytes,
        })
    }
}

fn required_text(value: Option<String>) -> Option<String> {
    let trimmed = value?.trim().to_string();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Lowercased text after the last `.`, if it is on the allow-list.
pub fn allowed_extension(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

pub fn truncate_chars(value: &str, max: usize) -> String {
    match value.char_indices().nth(max) {
        Some((idx, _)) => value[..idx].to_string(),
        None => value.to_string(),
    }
}
