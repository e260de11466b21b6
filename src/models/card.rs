use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Card (catalog list item)
// ---------------------------------------------------------------------------

/// Summary record returned by the card list endpoint.
///
/// Two cards are equal when their identifiers match; name and image are
/// ignored for equality and hashing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
}

impl Card {
    pub fn new(id: impl Into<String>, name: impl Into<String>, image: Option<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image,
        }
    }

    /// Build an asset URL of the form `{image}/{quality}.{extension}`.
    ///
    /// Returns `None` when the card carries no image base path.
    pub fn image_url(&self, quality: ImageQuality, extension: ImageExtension) -> Option<String> {
        self.image
            .as_deref()
            .map(|base| format!("{}/{}.{}", base, quality, extension))
    }

    pub fn high_quality_image_url(&self) -> Option<String> {
        self.image_url(ImageQuality::High, ImageExtension::Webp)
    }

    pub fn low_quality_image_url(&self) -> Option<String> {
        self.image_url(ImageQuality::Low, ImageExtension::Webp)
    }
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Card {}

impl Hash for Card {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

// ---------------------------------------------------------------------------
// Image asset selectors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageQuality {
    High,
    Low,
}

impl fmt::Display for ImageQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageQuality::High => f.write_str("high"),
            ImageQuality::Low => f.write_str("low"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageExtension {
    Png,
    Jpg,
    Webp,
}

impl fmt::Display for ImageExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageExtension::Png => f.write_str("png"),
            ImageExtension::Jpg => f.write_str("jpg"),
            ImageExtension::Webp => f.write_str("webp"),
        }
    }
}
