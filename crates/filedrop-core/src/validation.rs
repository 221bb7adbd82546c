//! Upload acceptance policy
//!
//! Decides whether an incoming file is acceptable: extension allow-list and
//! per-category size ceilings. Pure decision logic, no side effects.

use std::path::Path;

use thiserror::Error;

/// Extensions classified as images.
const IMAGE_EXTENSIONS: &[&str] = &[
    ".jpeg", ".jpg", ".png", ".gif", ".bmp", ".tiff", ".tif", ".webp", ".svg", ".heic", ".cr2",
    ".crw", ".nef", ".nrw", ".arw", ".srf", ".sr2", ".dng", ".raf", ".orf", ".rw2", ".srw",
];

/// Extensions classified as videos.
const VIDEO_EXTENSIONS: &[&str] = &[
    ".mp4", ".mov", ".avi", ".mkv", ".wmv", ".flv", ".webm", ".mpeg", ".mpg", ".mpe", ".3gp",
    ".ogv", ".ogg",
];

/// Extensions classified as audio. `.ogg` is claimed by the video table first.
const AUDIO_EXTENSIONS: &[&str] = &[
    ".mp3", ".wav", ".aac", ".flac", ".ogg", ".wma", ".m4a", ".alac", ".aiff", ".pcm", ".opus",
];

/// Validation failures reported back to the uploader.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("File type not allowed. Allowed types: {allowed}")]
    ExtensionNotAllowed { extension: String, allowed: String },

    #[error("File too large: {size} bytes exceeds the {category} limit of {max} bytes")]
    FileTooLarge {
        size: u64,
        max: u64,
        category: &'static str,
    },
}

/// File category derived from the extension, used to select a size ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCategory {
    Image,
    Video,
    Audio,
    Other,
}

impl FileCategory {
    /// Classify a lowercase dotted extension (e.g. ".png").
    pub fn from_extension(extension: &str) -> Self {
        if IMAGE_EXTENSIONS.contains(&extension) {
            FileCategory::Image
        } else if VIDEO_EXTENSIONS.contains(&extension) {
            FileCategory::Video
        } else if AUDIO_EXTENSIONS.contains(&extension) {
            FileCategory::Audio
        } else {
            FileCategory::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Image => "image",
            FileCategory::Video => "video",
            FileCategory::Audio => "audio",
            FileCategory::Other => "file",
        }
    }
}

/// Derive the lowercase dotted extension from a filename ("" when there is none).
pub fn file_extension(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}

/// Per-category maximum sizes in bytes. `None` means unbounded.
#[derive(Debug, Clone, Copy, Default)]
pub struct SizeLimits {
    pub image: Option<u64>,
    pub video: Option<u64>,
    pub audio: Option<u64>,
    pub default: Option<u64>,
}

impl SizeLimits {
    fn ceiling_for(&self, category: FileCategory) -> Option<u64> {
        match category {
            FileCategory::Image => self.image,
            FileCategory::Video => self.video,
            FileCategory::Audio => self.audio,
            FileCategory::Other => self.default,
        }
    }
}

/// Upload validation policy: allow-list plus size ceilings.
///
/// An empty allow-list means no extension restriction at all, not "reject
/// everything". Matching is case-insensitive and includes the leading dot.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    allowed_extensions: Vec<String>,
    limits: SizeLimits,
}

impl UploadPolicy {
    pub fn new(allowed_extensions: Vec<String>, limits: SizeLimits) -> Self {
        let allowed_extensions = allowed_extensions
            .into_iter()
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self {
            allowed_extensions,
            limits,
        }
    }

    /// Classify a filename into the category its size ceiling is drawn from.
    pub fn category_of(filename: &str) -> FileCategory {
        FileCategory::from_extension(&file_extension(filename))
    }

    /// Decide whether a file of the given size may be stored.
    pub fn evaluate(&self, filename: &str, size: u64) -> Result<(), ValidationError> {
        let extension = file_extension(filename);

        if !self.allowed_extensions.is_empty() && !self.allowed_extensions.contains(&extension) {
            return Err(ValidationError::ExtensionNotAllowed {
                extension,
                allowed: self.allowed_extensions.join(", "),
            });
        }

        let category = FileCategory::from_extension(&extension);
        if let Some(max) = self.limits.ceiling_for(category) {
            if size > max {
                return Err(ValidationError::FileTooLarge {
                    size,
                    max,
                    category: category.as_str(),
                });
            }
        }

        Ok(())
    }
}
