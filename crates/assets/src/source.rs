use crate::{AssetError, TypefaceFont};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Somewhere a typeface can be loaded from.
///
/// Loading is asynchronous so hosts can run it off the render thread.
pub trait FontSource {
    fn load(&self) -> impl Future<Output = Result<TypefaceFont, AssetError>> + Send;
}

/// A typeface JSON file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFile {
    path: PathBuf,
}

impl FontFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FontSource for FontFile {
    fn load(&self) -> impl Future<Output = Result<TypefaceFont, AssetError>> + Send {
        let path = self.path.clone();
        async move {
            tracing::debug!(path = %path.display(), "loading typeface");
            let json = std::fs::read_to_string(&path)
                .map_err(|source| AssetError::Read { path, source })?;
            TypefaceFont::from_json(&json)
        }
    }
}

/// Typeface JSON already held in memory.
#[derive(Debug, Clone)]
pub struct FontData {
    json: Arc<str>,
}

impl FontData {
    pub fn new(json: impl Into<Arc<str>>) -> Self {
        Self { json: json.into() }
    }
}

impl FontSource for FontData {
    fn load(&self) -> impl Future<Output = Result<TypefaceFont, AssetError>> + Send {
        let json = Arc::clone(&self.json);
        async move { TypefaceFont::from_json(&json) }
    }
}

impl FontSource for TypefaceFont {
    fn load(&self) -> impl Future<Output = Result<TypefaceFont, AssetError>> + Send {
        std::future::ready(Ok(self.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FONT: &str = r#"{
        "resolution": 1000,
        "boundingBox": { "yMin": -200, "yMax": 800 },
        "glyphs": { "I": { "ha": 300, "o": "m 0 0 l 200 0 l 200 700 l 0 700" } }
    }"#;

    #[test]
    fn loads_font_from_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(FONT.as_bytes()).unwrap();

        let font = pollster::block_on(FontFile::new(tmp.path()).load()).unwrap();
        assert_eq!(font.glyph_count(), 1);
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.typeface.json");
        let err = pollster::block_on(FontFile::new(&path).load()).unwrap_err();
        assert!(matches!(err, AssetError::Read { .. }));
        assert!(err.to_string().contains("nope.typeface.json"));
    }

    #[test]
    fn loads_font_from_memory() {
        let source = FontData::new(FONT);
        let font = pollster::block_on(source.load()).unwrap();
        assert!(font.glyph('I').is_some());

        let again = pollster::block_on(font.load()).unwrap();
        assert_eq!(again.glyph_count(), font.glyph_count());
    }
}
