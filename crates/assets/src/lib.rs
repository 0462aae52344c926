//! Asset loading for the scene: typeface fonts and matcap textures.
//!
//! Assets are addressed by path relative to an assets root (see [`AssetPaths`]).
//! Loaded image data carries a content-addressed [`AssetId`].

mod matcap;
mod source;
mod typeface;

pub use matcap::{MatcapImage, MatcapLibrary};
pub use source::{FontData, FontFile, FontSource};
pub use typeface::{FontBounds, Glyph, OutlineCommand, TypefaceFont};

use donutfield_common::MatcapPreset;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Content-addressed asset ID computed from the asset bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(pub u64);

impl AssetId {
    /// First eight bytes of the SHA-256 of `bytes`.
    pub fn of(bytes: &[u8]) -> Self {
        let digest = Sha256::digest(bytes);
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        Self(u64::from_le_bytes(prefix))
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),
    #[error("invalid font: {0}")]
    InvalidFont(String),
    #[error("glyph {glyph:?}: bad outline: {reason}")]
    BadOutline { glyph: char, reason: String },
}

/// Well-known asset locations under an assets root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPaths {
    root: PathBuf,
}

impl AssetPaths {
    pub const FONT: &'static str = "fonts/helvetiker_regular.typeface.json";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The typeface used for the floating text.
    pub fn font(&self) -> PathBuf {
        self.root.join(Self::FONT)
    }

    pub fn matcap(&self, preset: MatcapPreset) -> PathBuf {
        self.root
            .join("textures")
            .join("matcaps")
            .join(format!("{}.png", preset.file_number()))
    }
}

pub fn crate_info() -> &'static str {
    "donutfield-assets v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_id_is_content_addressed() {
        assert_eq!(AssetId::of(b"matcap"), AssetId::of(b"matcap"));
        assert_ne!(AssetId::of(b"matcap"), AssetId::of(b"matcaps"));
        assert_eq!(format!("{}", AssetId(0xab)), "00000000000000ab");
    }

    #[test]
    fn asset_paths_layout() {
        let paths = AssetPaths::new("/srv/static");
        assert_eq!(
            paths.font(),
            PathBuf::from("/srv/static/fonts/helvetiker_regular.typeface.json")
        );
        assert_eq!(
            paths.matcap(MatcapPreset::Slime),
            PathBuf::from("/srv/static/textures/matcaps/7.png")
        );
    }
}
