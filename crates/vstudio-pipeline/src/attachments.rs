//! Binary attachments submitted with a generation request.

use std::str::FromStr;

use vstudio_genai::ImageInput;

/// Which slot a named upload fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AttachmentKey {
    /// `productImage_N`: image-mode reference images.
    Product(u32),
    /// `anchorImage_N`: video-mode anchor images.
    Anchor(u32),
    /// `lookAndFeel`: image-mode moodboard image.
    LookAndFeel,
}

impl FromStr for AttachmentKey {
    type Err = ();

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        if name == "lookAndFeel" {
            return Ok(AttachmentKey::LookAndFeel);
        }
        if let Some(index) = name.strip_prefix("productImage_") {
            return index.parse().map(AttachmentKey::Product).map_err(|_| ());
        }
        if let Some(index) = name.strip_prefix("anchorImage_") {
            return index.parse().map(AttachmentKey::Anchor).map_err(|_| ());
        }
        Err(())
    }
}

/// Uploaded images, ordered by their numeric suffix.
#[derive(Debug, Clone, Default)]
pub struct Attachments {
    pub product_images: Vec<ImageInput>,
    pub anchor_images: Vec<ImageInput>,
    pub look_and_feel: Option<ImageInput>,
}

impl Attachments {
    /// Build from keyed uploads in any order.
    pub fn from_keyed(uploads: impl IntoIterator<Item = (AttachmentKey, ImageInput)>) -> Self {
        let mut uploads: Vec<_> = uploads.into_iter().collect();
        uploads.sort_by_key(|(key, _)| *key);

        let mut attachments = Attachments::default();
        for (key, image) in uploads {
            match key {
                AttachmentKey::Product(_) => attachments.product_images.push(image),
                AttachmentKey::Anchor(_) => attachments.anchor_images.push(image),
                AttachmentKey::LookAndFeel => attachments.look_and_feel = Some(image),
            }
        }
        attachments
    }

    /// Moodboard images, in the order they are sent after the references.
    pub fn moodboard_images(&self) -> &[ImageInput] {
        self.look_and_feel.as_slice()
    }

    pub fn is_empty(&self) -> bool {
        self.product_images.is_empty()
            && self.anchor_images.is_empty()
            && self.look_and_feel.is_none()
    }
}
