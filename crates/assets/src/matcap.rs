use crate::{AssetError, AssetId, AssetPaths};
use donutfield_common::MatcapPreset;
use std::path::Path;

/// Edge length of generated fallback matcaps.
const FALLBACK_SIZE: u32 = 64;

/// A decoded matcap texture, RGBA8 with rows top to bottom.
#[derive(Debug, Clone)]
pub struct MatcapImage {
    pub id: AssetId,
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
    /// True when the texture was generated because the file could not be loaded.
    pub fallback: bool,
}

impl MatcapImage {
    /// Decode an encoded image (PNG).
    pub fn decode(bytes: &[u8]) -> Result<Self, AssetError> {
        let image = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = image.dimensions();
        Ok(Self {
            id: AssetId::of(bytes),
            width,
            height,
            rgba: image.into_raw(),
            fallback: false,
        })
    }

    pub fn load(path: &Path) -> Result<Self, AssetError> {
        let bytes = std::fs::read(path).map_err(|source| AssetError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::decode(&bytes)
    }

    /// A generated sphere shading in the preset's base colour.
    pub fn fallback(preset: MatcapPreset) -> Self {
        let [r, g, b] = base_color(preset);
        let half = FALLBACK_SIZE as f32 / 2.0;
        let mut rgba = Vec::with_capacity((FALLBACK_SIZE * FALLBACK_SIZE * 4) as usize);
        for y in 0..FALLBACK_SIZE {
            for x in 0..FALLBACK_SIZE {
                let nx = (x as f32 + 0.5) / half - 1.0;
                let ny = 1.0 - (y as f32 + 0.5) / half;
                let r2 = (nx * nx + ny * ny).min(1.0);
                let nz = (1.0 - r2).sqrt();
                // light from the upper left
                let highlight = ((-0.4 * nx + 0.5 * ny + 0.77 * nz).max(0.0)).powi(24);
                let shade = 0.25 + 0.75 * nz;
                let channel = |c: f32| ((c * shade + highlight).min(1.0) * 255.0).round() as u8;
                rgba.extend_from_slice(&[channel(r), channel(g), channel(b), 255]);
            }
        }
        Self {
            id: AssetId::of(&rgba),
            width: FALLBACK_SIZE,
            height: FALLBACK_SIZE,
            rgba,
            fallback: true,
        }
    }
}

fn base_color(preset: MatcapPreset) -> [f32; 3] {
    match preset {
        MatcapPreset::Clay => [0.72, 0.62, 0.55],
        MatcapPreset::RoughMetal => [0.55, 0.55, 0.58],
        MatcapPreset::ShinyMetal => [0.80, 0.82, 0.85],
        MatcapPreset::RoughCopper => [0.65, 0.40, 0.28],
        MatcapPreset::ShinyCopper => [0.85, 0.50, 0.30],
        MatcapPreset::Taffy => [0.95, 0.55, 0.75],
        MatcapPreset::Slime => [0.45, 0.85, 0.35],
        MatcapPreset::Chromatic => [0.50, 0.60, 0.95],
    }
}

/// One texture per [`MatcapPreset`].
#[derive(Debug, Clone)]
pub struct MatcapLibrary {
    images: Vec<MatcapImage>,
}

impl MatcapLibrary {
    /// Load every preset from `paths`. A preset whose file is missing or
    /// undecodable gets a generated fallback instead.
    pub fn load(paths: &AssetPaths) -> Self {
        let images = MatcapPreset::ALL
            .into_iter()
            .map(|preset| {
                let path = paths.matcap(preset);
                match MatcapImage::load(&path) {
                    Ok(image) => {
                        tracing::debug!(%preset, id = %image.id, "matcap loaded");
                        image
                    }
                    Err(e) => {
                        tracing::warn!(%preset, "using generated matcap: {e}");
                        MatcapImage::fallback(preset)
                    }
                }
            })
            .collect();
        Self { images }
    }

    /// Generated textures only, for hosts without asset files.
    pub fn generated() -> Self {
        Self {
            images: MatcapPreset::ALL
                .into_iter()
                .map(MatcapImage::fallback)
                .collect(),
        }
    }

    pub fn get(&self, preset: MatcapPreset) -> &MatcapImage {
        &self.images[preset.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (MatcapPreset, &MatcapImage)> {
        MatcapPreset::ALL.into_iter().zip(&self.images)
    }

    /// How many presets came from files rather than fallbacks.
    pub fn loaded_count(&self) -> usize {
        self.images.iter().filter(|i| !i.fallback).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(path: &Path, color: [u8; 4]) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let image = image::RgbaImage::from_pixel(4, 2, image::Rgba(color));
        image.save(path).unwrap();
    }

    #[test]
    fn fallback_is_opaque_and_sized() {
        let image = MatcapImage::fallback(MatcapPreset::Slime);
        assert!(image.fallback);
        assert_eq!(image.rgba.len(), (64 * 64 * 4) as usize);
        assert!(image.rgba.chunks(4).all(|px| px[3] == 255));
    }

    #[test]
    fn fallbacks_differ_per_preset() {
        let clay = MatcapImage::fallback(MatcapPreset::Clay);
        let slime = MatcapImage::fallback(MatcapPreset::Slime);
        assert_ne!(clay.id, slime.id);
    }

    #[test]
    fn decodes_png_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.png");
        write_png(&path, [10, 20, 30, 255]);

        let image = MatcapImage::load(&path).unwrap();
        assert_eq!((image.width, image.height), (4, 2));
        assert_eq!(&image.rgba[..4], &[10, 20, 30, 255]);
        assert!(!image.fallback);
    }

    #[test]
    fn garbage_is_an_image_error() {
        assert!(matches!(
            MatcapImage::decode(b"not a png"),
            Err(AssetError::Image(_))
        ));
    }

    #[test]
    fn library_mixes_files_and_fallbacks() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AssetPaths::new(dir.path());
        write_png(&paths.matcap(MatcapPreset::Clay), [200, 100, 50, 255]);
        write_png(&paths.matcap(MatcapPreset::Chromatic), [1, 2, 3, 255]);

        let library = MatcapLibrary::load(&paths);
        assert_eq!(library.loaded_count(), 2);
        assert!(!library.get(MatcapPreset::Clay).fallback);
        assert!(library.get(MatcapPreset::Taffy).fallback);
        assert_eq!(library.iter().count(), 8);
    }

    #[test]
    fn generated_library_has_every_preset() {
        let library = MatcapLibrary::generated();
        assert_eq!(library.loaded_count(), 0);
        for preset in MatcapPreset::ALL {
            assert_eq!(library.get(preset).width, 64);
        }
    }
}
