//! Narrative segments and embedded image kinds

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Supported embedded image container types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Jpeg,
    Png,
    Svg,
}

impl ImageKind {
    /// The declared media type for container image parts
    pub fn media_type(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Png => "image/png",
            ImageKind::Svg => "image/svg+xml",
        }
    }

    /// The canonical file extension for extracted images
    pub fn extension(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "jpg",
            ImageKind::Png => "png",
            ImageKind::Svg => "svg",
        }
    }

    /// Look up a kind by declared media type
    pub fn from_media_type(media_type: &str) -> Option<ImageKind> {
        match media_type.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" => Some(ImageKind::Jpeg),
            "image/png" => Some(ImageKind::Png),
            "image/svg+xml" => Some(ImageKind::Svg),
            _ => None,
        }
    }

    /// Sniff a kind from a file path's extension, case-insensitively
    pub fn from_path(path: &Path) -> Option<ImageKind> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(ImageKind::Jpeg),
            "png" => Some(ImageKind::Png),
            "svg" => Some(ImageKind::Svg),
            _ => None,
        }
    }
}

/// One unit of narrative content.
///
/// Segments form an ordered sequence; order is the sole addressing
/// mechanism. Paragraph text carries the `*`/`**` italic-toggle markup
/// verbatim; resolving it belongs to a presentation layer, not the codec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Segment {
    /// A paragraph of body text
    Paragraph { text: String },

    /// A chapter heading, legal only in chapter format
    Chapter { title: String },

    /// A scene break
    Scene,

    /// An illustration: the resource handle, its container type,
    /// and its caption
    Image {
        path: PathBuf,
        kind: ImageKind,
        caption: String,
    },
}

impl Segment {
    /// Create a paragraph segment
    pub fn paragraph(text: impl Into<String>) -> Self {
        Segment::Paragraph { text: text.into() }
    }

    /// Create a chapter segment
    pub fn chapter(title: impl Into<String>) -> Self {
        Segment::Chapter {
            title: title.into(),
        }
    }

    /// Create an image segment
    pub fn image(path: impl Into<PathBuf>, kind: ImageKind, caption: impl Into<String>) -> Self {
        Segment::Image {
            path: path.into(),
            kind,
            caption: caption.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_round_trip() {
        for kind in [ImageKind::Jpeg, ImageKind::Png, ImageKind::Svg] {
            assert_eq!(ImageKind::from_media_type(kind.media_type()), Some(kind));
        }
    }

    #[test]
    fn test_extension_sniffing() {
        assert_eq!(
            ImageKind::from_path(Path::new("cover.JPEG")),
            Some(ImageKind::Jpeg)
        );
        assert_eq!(
            ImageKind::from_path(Path::new("a/b/map.png")),
            Some(ImageKind::Png)
        );
        assert_eq!(ImageKind::from_path(Path::new("notes.txt")), None);
        assert_eq!(ImageKind::from_path(Path::new("no-extension")), None);
    }

    #[test]
    fn test_unknown_media_type() {
        assert_eq!(ImageKind::from_media_type("image/gif"), None);
        assert_eq!(ImageKind::from_media_type("text/plain"), None);
    }
}
