//! Typeface JSON fonts.
//!
//! The format stores, per glyph, an advance width (`ha`) and an outline
//! string (`o`) of whitespace separated commands in font units:
//!
//! - `m x y`: start a contour
//! - `l x y`: line to
//! - `q x y cx cy`: quadratic curve to `(x, y)` with control `(cx, cy)`
//! - `b x y c1x c1y c2x c2y`: cubic curve to `(x, y)` with two controls
//!
//! Curve commands list the end point before the control points.

use crate::AssetError;
use glam::Vec2;
use serde::Deserialize;
use std::collections::HashMap;

/// One drawing command of a glyph outline, in font units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutlineCommand {
    MoveTo(Vec2),
    LineTo(Vec2),
    QuadTo { ctrl: Vec2, to: Vec2 },
    CubicTo { ctrl1: Vec2, ctrl2: Vec2, to: Vec2 },
}

/// A parsed glyph.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    /// Horizontal advance in font units.
    pub advance: f32,
    pub commands: Vec<OutlineCommand>,
}

/// Vertical extent of the font, in font units.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct FontBounds {
    #[serde(rename = "yMin")]
    pub y_min: f32,
    #[serde(rename = "yMax")]
    pub y_max: f32,
}

#[derive(Deserialize)]
struct RawGlyph {
    ha: f32,
    #[serde(default)]
    o: Option<String>,
}

#[derive(Deserialize)]
struct RawTypeface {
    glyphs: HashMap<String, RawGlyph>,
    #[serde(rename = "familyName", default)]
    family_name: String,
    resolution: f32,
    #[serde(rename = "boundingBox")]
    bounding_box: FontBounds,
    #[serde(rename = "underlineThickness", default)]
    underline_thickness: f32,
}

/// A typeface font with all glyph outlines parsed.
#[derive(Debug, Clone)]
pub struct TypefaceFont {
    family_name: String,
    resolution: f32,
    bounds: FontBounds,
    underline_thickness: f32,
    glyphs: HashMap<char, Glyph>,
}

impl TypefaceFont {
    pub fn from_json(json: &str) -> Result<Self, AssetError> {
        let raw: RawTypeface = serde_json::from_str(json)?;
        if raw.resolution.is_nan() || raw.resolution <= 0.0 {
            return Err(AssetError::InvalidFont(format!(
                "resolution must be positive, got {}",
                raw.resolution
            )));
        }

        let mut glyphs = HashMap::with_capacity(raw.glyphs.len());
        for (key, glyph) in raw.glyphs {
            let mut chars = key.chars();
            let (Some(c), None) = (chars.next(), chars.next()) else {
                tracing::warn!(key = %key, "skipping glyph keyed by more than one character");
                continue;
            };
            let commands = match glyph.o.as_deref() {
                Some(o) => parse_outline(c, o)?,
                None => Vec::new(),
            };
            glyphs.insert(
                c,
                Glyph {
                    advance: glyph.ha,
                    commands,
                },
            );
        }

        tracing::debug!(
            family = %raw.family_name,
            glyphs = glyphs.len(),
            "typeface parsed"
        );
        Ok(Self {
            family_name: raw.family_name,
            resolution: raw.resolution,
            bounds: raw.bounding_box,
            underline_thickness: raw.underline_thickness,
            glyphs,
        })
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    /// Font units per em.
    pub fn resolution(&self) -> f32 {
        self.resolution
    }

    pub fn bounds(&self) -> FontBounds {
        self.bounds
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    pub fn glyph(&self, c: char) -> Option<&Glyph> {
        self.glyphs.get(&c)
    }

    /// The glyph for `c`, or the `?` glyph when the font lacks it.
    pub fn glyph_or_fallback(&self, c: char) -> Option<&Glyph> {
        self.glyph(c).or_else(|| self.glyph('?'))
    }

    /// Factor from font units to scene units for a given text size.
    pub fn scale(&self, size: f32) -> f32 {
        size / self.resolution
    }

    /// Distance between baselines for a given text size.
    pub fn line_height(&self, size: f32) -> f32 {
        (self.bounds.y_max - self.bounds.y_min + self.underline_thickness) * self.scale(size)
    }
}

fn parse_outline(glyph: char, outline: &str) -> Result<Vec<OutlineCommand>, AssetError> {
    let bad = |reason: String| AssetError::BadOutline { glyph, reason };
    let mut tokens = outline.split_whitespace();
    let mut commands = Vec::new();

    let point = |tokens: &mut std::str::SplitWhitespace<'_>| -> Result<Vec2, AssetError> {
        let mut coord = || -> Result<f32, AssetError> {
            let token = tokens
                .next()
                .ok_or_else(|| bad("unexpected end of outline".into()))?;
            token
                .parse::<f32>()
                .map_err(|e| bad(format!("bad coordinate {token:?}: {e}")))
        };
        let x = coord()?;
        let y = coord()?;
        Ok(Vec2::new(x, y))
    };

    while let Some(op) = tokens.next() {
        let command = match op {
            "m" => OutlineCommand::MoveTo(point(&mut tokens)?),
            "l" => OutlineCommand::LineTo(point(&mut tokens)?),
            "q" => {
                let to = point(&mut tokens)?;
                let ctrl = point(&mut tokens)?;
                OutlineCommand::QuadTo { ctrl, to }
            }
            "b" => {
                let to = point(&mut tokens)?;
                let ctrl1 = point(&mut tokens)?;
                let ctrl2 = point(&mut tokens)?;
                OutlineCommand::CubicTo { ctrl1, ctrl2, to }
            }
            // contours are closed implicitly
            "z" => continue,
            other => return Err(bad(format!("unknown command {other:?}"))),
        };
        if commands.is_empty() && !matches!(command, OutlineCommand::MoveTo(_)) {
            return Err(bad("outline must start with a move".into()));
        }
        commands.push(command);
    }
    Ok(commands)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FONT: &str = r#"{
        "familyName": "Blocky",
        "resolution": 1000,
        "underlineThickness": 50,
        "boundingBox": { "yMin": -200, "xMin": 0, "yMax": 800, "xMax": 900 },
        "glyphs": {
            "I": { "ha": 300, "x_min": 0, "x_max": 200, "o": "m 0 0 l 200 0 l 200 700 l 0 700" },
            "C": { "ha": 700, "o": "m 600 0 q 0 350 0 0 q 600 700 0 700 b 500 350 600 600 550 450" },
            " ": { "ha": 250 }
        }
    }"#;

    #[test]
    fn parses_metrics_and_glyphs() {
        let font = TypefaceFont::from_json(FONT).unwrap();
        assert_eq!(font.family_name(), "Blocky");
        assert_eq!(font.glyph_count(), 3);
        assert_eq!(font.scale(0.5), 0.0005);
        assert!((font.line_height(0.5) - 0.525).abs() < 1e-6);
    }

    #[test]
    fn curve_commands_put_end_point_first() {
        let font = TypefaceFont::from_json(FONT).unwrap();
        let c = font.glyph('C').unwrap();
        assert_eq!(c.commands.len(), 4);
        assert_eq!(
            c.commands[1],
            OutlineCommand::QuadTo {
                ctrl: Vec2::new(0.0, 0.0),
                to: Vec2::new(0.0, 350.0),
            }
        );
        assert_eq!(
            c.commands[3],
            OutlineCommand::CubicTo {
                ctrl1: Vec2::new(600.0, 600.0),
                ctrl2: Vec2::new(550.0, 450.0),
                to: Vec2::new(500.0, 350.0),
            }
        );
    }

    #[test]
    fn glyph_without_outline_is_blank() {
        let font = TypefaceFont::from_json(FONT).unwrap();
        let space = font.glyph(' ').unwrap();
        assert_eq!(space.advance, 250.0);
        assert!(space.commands.is_empty());
    }

    #[test]
    fn fallback_requires_question_mark() {
        let font = TypefaceFont::from_json(FONT).unwrap();
        assert!(font.glyph_or_fallback('Z').is_none());

        let with_fallback = FONT.replace(
            r#"" ": { "ha": 250 }"#,
            r#""?": { "ha": 400, "o": "m 0 0 l 10 0 l 10 10" }"#,
        );
        let font = TypefaceFont::from_json(&with_fallback).unwrap();
        assert_eq!(font.glyph_or_fallback('Z').unwrap().advance, 400.0);
    }

    #[test]
    fn rejects_malformed_outlines() {
        let truncated = FONT.replace("l 0 700", "l 0");
        assert!(matches!(
            TypefaceFont::from_json(&truncated),
            Err(AssetError::BadOutline { glyph: 'I', .. })
        ));

        let unknown = FONT.replace("m 0 0 l 200 0", "m 0 0 x 200 0");
        assert!(TypefaceFont::from_json(&unknown).is_err());
    }

    #[test]
    fn rejects_zero_resolution() {
        let json = FONT.replace("\"resolution\": 1000", "\"resolution\": 0");
        assert!(matches!(
            TypefaceFont::from_json(&json),
            Err(AssetError::InvalidFont(_))
        ));
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(
            TypefaceFont::from_json("{ not json"),
            Err(AssetError::Json(_))
        ));
    }
}
