//! Extruded, bevelled text geometry from typeface outlines.

use crate::BuildError;
use donutfield_assets::{Glyph, OutlineCommand, TypefaceFont};
use donutfield_scene::Geometry;
use glam::{Vec2, Vec3};
use lyon::math::point;
use lyon::path::{FillRule, Path};
use lyon::tessellation::{BuffersBuilder, FillOptions, FillTessellator, FillVertex, VertexBuffers};
use std::f32::consts::FRAC_PI_2;

/// Contours with less area than this (in scene units squared) are dropped.
const MIN_CONTOUR_AREA: f32 = 1e-9;

/// Squared length limit of a bevel direction at sharp corners.
const MAX_MITER_SQ: f32 = 2.0;

/// Text shape parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextParams {
    /// Em size in scene units.
    pub size: f32,
    /// Extrusion depth along +Z, not counting the bevel.
    pub depth: f32,
    /// Line segments per curve command.
    pub curve_segments: u32,
    /// How far the bevel reaches past each face along Z.
    pub bevel_thickness: f32,
    /// How far the bevel pushes the outline outwards.
    pub bevel_size: f32,
    /// Outline offset at the start of the bevel.
    pub bevel_offset: f32,
    /// Rings per bevel. Zero disables the bevel.
    pub bevel_segments: u32,
}

impl Default for TextParams {
    fn default() -> Self {
        Self {
            size: 0.5,
            depth: 0.2,
            curve_segments: 12,
            bevel_thickness: 0.03,
            bevel_size: 0.02,
            bevel_offset: 0.0,
            bevel_segments: 5,
        }
    }
}

impl TextParams {
    /// The same text without a bevel.
    pub fn flat(self) -> Self {
        Self {
            bevel_thickness: 0.0,
            bevel_size: 0.0,
            bevel_offset: 0.0,
            bevel_segments: 0,
            ..self
        }
    }

    /// `(z, outline offset)` of every ring from the back face to the front.
    fn rings(&self) -> Vec<(f32, f32)> {
        if self.bevel_segments == 0 {
            return vec![(0.0, 0.0), (self.depth, 0.0)];
        }

        let segments = self.bevel_segments;
        let bevel = |b: u32| {
            let t = b as f32 / segments as f32 * FRAC_PI_2;
            (
                self.bevel_thickness * t.cos(),
                self.bevel_size * t.sin() + self.bevel_offset,
            )
        };
        let full = self.bevel_size + self.bevel_offset;

        let mut rings = Vec::with_capacity(2 * segments as usize + 2);
        rings.extend((0..segments).map(bevel).map(|(z, offset)| (-z, offset)));
        rings.push((0.0, full));
        rings.push((self.depth, full));
        rings.extend(
            (0..segments)
                .rev()
                .map(bevel)
                .map(|(z, offset)| (self.depth + z, offset)),
        );
        rings
    }
}

/// Lay out `text` with `font` and extrude it from z = 0 to z = `depth`,
/// with the bevel reaching `bevel_thickness` past both faces.
///
/// Newlines start a new line below the previous one. Characters the font
/// lacks are drawn with its `?` glyph, or skipped if that is missing too.
/// Whitespace-only text yields an empty geometry. Overlapping glyphs are
/// filled as their union.
pub fn text_geometry(
    font: &TypefaceFont,
    text: &str,
    params: TextParams,
) -> Result<Geometry, BuildError> {
    let scale = font.scale(params.size);
    let line_height = font.line_height(params.size);
    let segments = params.curve_segments.max(1);

    let mut contours = Vec::new();
    let mut offset = Vec2::ZERO;
    for c in text.chars() {
        if c == '\n' {
            offset.x = 0.0;
            offset.y -= line_height;
            continue;
        }
        let Some(glyph) = font.glyph_or_fallback(c) else {
            tracing::warn!(?c, family = font.family_name(), "font has no glyph and no fallback");
            continue;
        };
        // holes only ever belong to the glyph that draws them
        let mut shapes = Vec::new();
        glyph_contours(glyph, scale, offset, segments, &mut shapes);
        shapes.retain(|s| s.len() >= 3 && signed_area(s).abs() > MIN_CONTOUR_AREA);
        orient_contours(&mut shapes);
        contours.append(&mut shapes);
        offset.x += glyph.advance * scale;
    }

    extrude(&contours, &params)
}

/// Flatten a glyph outline into closed polylines in scene units.
fn glyph_contours(
    glyph: &Glyph,
    scale: f32,
    offset: Vec2,
    segments: u32,
    out: &mut Vec<Vec<Vec2>>,
) {
    let place = |p: Vec2| p * scale + offset;
    let mut current: Vec<Vec2> = Vec::new();

    for command in &glyph.commands {
        match *command {
            OutlineCommand::MoveTo(p) => {
                finish_contour(&mut current, out);
                current.push(place(p));
            }
            OutlineCommand::LineTo(p) => push_point(&mut current, place(p)),
            OutlineCommand::QuadTo { ctrl, to } => {
                let Some(&start) = current.last() else { continue };
                let (ctrl, to) = (place(ctrl), place(to));
                for k in 1..=segments {
                    let t = k as f32 / segments as f32;
                    let mt = 1.0 - t;
                    let p = start * (mt * mt) + ctrl * (2.0 * mt * t) + to * (t * t);
                    push_point(&mut current, p);
                }
            }
            OutlineCommand::CubicTo { ctrl1, ctrl2, to } => {
                let Some(&start) = current.last() else { continue };
                let (c1, c2, to) = (place(ctrl1), place(ctrl2), place(to));
                for k in 1..=segments {
                    let t = k as f32 / segments as f32;
                    let mt = 1.0 - t;
                    let p = start * (mt * mt * mt)
                        + c1 * (3.0 * mt * mt * t)
                        + c2 * (3.0 * mt * t * t)
                        + to * (t * t * t);
                    push_point(&mut current, p);
                }
            }
        }
    }
    finish_contour(&mut current, out);
}

fn push_point(contour: &mut Vec<Vec2>, p: Vec2) {
    if contour.last() != Some(&p) {
        contour.push(p);
    }
}

fn finish_contour(current: &mut Vec<Vec2>, out: &mut Vec<Vec<Vec2>>) {
    if current.len() > 1 && current.first() == current.last() {
        current.pop();
    }
    if !current.is_empty() {
        out.push(std::mem::take(current));
    }
}

/// Shoelace area; positive for counter-clockwise contours.
fn signed_area(contour: &[Vec2]) -> f32 {
    let n = contour.len();
    (0..n)
        .map(|i| contour[i].perp_dot(contour[(i + 1) % n]))
        .sum::<f32>()
        * 0.5
}

fn contains(contour: &[Vec2], p: Vec2) -> bool {
    let n = contour.len();
    let mut inside = false;
    for i in 0..n {
        let a = contour[i];
        let b = contour[(i + n - 1) % n];
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
    }
    inside
}

/// Make outer contours counter-clockwise and holes clockwise. A contour is a
/// hole when an odd number of the other contours of its glyph enclose it.
fn orient_contours(contours: &mut [Vec<Vec2>]) {
    let holes: Vec<bool> = (0..contours.len())
        .map(|i| {
            let start = contours[i][0];
            let depth = contours
                .iter()
                .enumerate()
                .filter(|(j, other)| *j != i && contains(other, start))
                .count();
            depth % 2 == 1
        })
        .collect();

    for (contour, hole) in contours.iter_mut().zip(holes) {
        let ccw = signed_area(contour) > 0.0;
        if ccw == hole {
            contour.reverse();
        }
    }
}

/// Unit normal on the right of `edge`; outwards for a counter-clockwise
/// outline and into the hole for a clockwise one.
fn outward(edge: Vec2) -> Vec2 {
    Vec2::new(edge.y, -edge.x).normalize_or_zero()
}

/// Per-vertex direction that moves both adjacent edges outwards by one unit.
fn bevel_directions(contour: &[Vec2]) -> Vec<Vec2> {
    let n = contour.len();
    (0..n)
        .map(|i| {
            let prev = outward(contour[i] - contour[(i + n - 1) % n]);
            let next = outward(contour[(i + 1) % n] - contour[i]);
            let denom = 1.0 + prev.dot(next);
            if denom < 1e-6 {
                return prev;
            }
            let miter = (prev + next) / denom;
            let len_sq = miter.length_squared();
            if len_sq > MAX_MITER_SQ {
                miter * (MAX_MITER_SQ / len_sq).sqrt()
            } else {
                miter
            }
        })
        .collect()
}

fn offset_contour(contour: &[Vec2], directions: &[Vec2], distance: f32) -> Vec<Vec2> {
    contour
        .iter()
        .zip(directions)
        .map(|(&p, &d)| p + d * distance)
        .collect()
}

fn extrude(contours: &[Vec<Vec2>], params: &TextParams) -> Result<Geometry, BuildError> {
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();
    if contours.is_empty() {
        return Ok(Geometry::default());
    }

    let rings = params.rings();
    let directions: Vec<Vec<Vec2>> = contours.iter().map(|c| bevel_directions(c)).collect();

    // both caps sit on the first bevel ring, which has no outward push
    let (back_z, cap_offset) = rings[0];
    let front_z = rings[rings.len() - 1].0;
    let cap_contours: Vec<Vec<Vec2>> = contours
        .iter()
        .zip(&directions)
        .map(|(c, d)| offset_contour(c, d, cap_offset))
        .collect();
    let cap = tessellate(&cap_contours)?;

    for (z, normal_z) in [(front_z, 1.0), (back_z, -1.0)] {
        let base = positions.len() as u32;
        for v in &cap.vertices {
            positions.push([v.x, v.y, z]);
            normals.push([0.0, 0.0, normal_z]);
        }
        for tri in cap.indices.chunks_exact(3) {
            let (a, mut b, mut c) = (tri[0], tri[1], tri[2]);
            let (pa, pb, pc) = (
                cap.vertices[a as usize],
                cap.vertices[b as usize],
                cap.vertices[c as usize],
            );
            let ccw = (pb - pa).perp_dot(pc - pa) > 0.0;
            // front faces wind counter-clockwise seen from +Z, back faces the opposite
            if ccw != (normal_z > 0.0) {
                std::mem::swap(&mut b, &mut c);
            }
            indices.extend_from_slice(&[base + a, base + b, base + c]);
        }
    }

    for (contour, dirs) in contours.iter().zip(&directions) {
        let n = contour.len();
        let layers: Vec<(f32, Vec<Vec2>)> = rings
            .iter()
            .map(|&(z, distance)| (z, offset_contour(contour, dirs, distance)))
            .collect();

        for pair in layers.windows(2) {
            let ((z0, lower), (z1, upper)) = (&pair[0], &pair[1]);
            for i in 0..n {
                let j = (i + 1) % n;
                let quad = [
                    lower[i].extend(*z0),
                    lower[j].extend(*z0),
                    upper[j].extend(*z1),
                    upper[i].extend(*z1),
                ];
                let normal = (quad[2] - quad[0])
                    .cross(quad[3] - quad[1])
                    .try_normalize()
                    .unwrap_or_else(|| outward(contour[j] - contour[i]).extend(0.0));
                if normal == Vec3::ZERO {
                    continue;
                }

                let base = positions.len() as u32;
                positions.extend(quad.map(|v| v.to_array()));
                normals.extend_from_slice(&[normal.to_array(); 4]);
                indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
            }
        }
    }

    Ok(Geometry::new(positions, normals, indices))
}

fn tessellate(contours: &[Vec<Vec2>]) -> Result<VertexBuffers<Vec2, u32>, BuildError> {
    let mut builder = Path::builder();
    for contour in contours {
        builder.begin(point(contour[0].x, contour[0].y));
        for p in &contour[1..] {
            builder.line_to(point(p.x, p.y));
        }
        builder.end(true);
    }
    let path = builder.build();

    // outlines wind +1 and holes -1, so overlapping glyphs stay filled
    let mut buffers: VertexBuffers<Vec2, u32> = VertexBuffers::new();
    let options = FillOptions::tolerance(1e-4).with_fill_rule(FillRule::NonZero);
    FillTessellator::new()
        .tessellate_path(
            &path,
            &options,
            &mut BuffersBuilder::new(&mut buffers, |v: FillVertex| {
                let p = v.position();
                Vec2::new(p.x, p.y)
            }),
        )
        .map_err(|e| BuildError::Tessellation(format!("{e:?}")))?;
    Ok(buffers)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Units of 100 so that with size 1 and resolution 100 one font unit
    // is 0.01 scene units.
    const FONT: &str = r#"{
        "familyName": "Blocky",
        "resolution": 100,
        "underlineThickness": 0,
        "boundingBox": { "yMin": 0, "yMax": 100 },
        "glyphs": {
            "I": { "ha": 50, "o": "m 0 0 l 40 0 l 40 100 l 0 100" },
            "O": { "ha": 120, "o": "m 0 0 l 100 0 l 100 100 l 0 100 m 25 25 l 25 75 l 75 75 l 75 25" },
            "D": { "ha": 110, "o": "m 0 0 q 100 50 100 0 q 0 100 100 100 l 0 0" },
            "?": { "ha": 60, "o": "m 0 0 l 50 0 l 50 50 l 0 50" },
            "A": { "ha": 50, "o": "m 0 0 l 100 0 l 100 100 l 0 100" },
            " ": { "ha": 30 }
        }
    }"#;

    fn font() -> TypefaceFont {
        TypefaceFont::from_json(FONT).unwrap()
    }

    fn bevelled() -> TextParams {
        TextParams {
            size: 1.0,
            depth: 0.5,
            curve_segments: 8,
            ..TextParams::default()
        }
    }

    fn params() -> TextParams {
        bevelled().flat()
    }

    /// Area of the front cap.
    fn front_area(g: &Geometry) -> f32 {
        g.indices()
            .chunks_exact(3)
            .filter(|t| g.normals()[t[0] as usize][2] > 0.999)
            .map(|t| {
                let p = |i: u32| Vec3::from_array(g.positions()[i as usize]);
                let (a, b, c) = (p(t[0]), p(t[1]), p(t[2]));
                (b - a).cross(c - a).z * 0.5
            })
            .sum()
    }

    #[test]
    fn single_bar_is_a_closed_box() {
        let g = text_geometry(&font(), "I", params()).unwrap();
        let bounds = g.bounding_box().unwrap();
        assert!(bounds.min.abs_diff_eq(Vec3::ZERO, 1e-6));
        assert!(bounds.max.abs_diff_eq(Vec3::new(0.4, 1.0, 0.5), 1e-6));
        assert!((front_area(&g) - 0.4).abs() < 1e-5);
    }

    #[test]
    fn holes_stay_open() {
        let g = text_geometry(&font(), "O", params()).unwrap();
        // 1.0 outer minus 0.25 hole
        assert!((front_area(&g) - 0.75).abs() < 1e-5);
    }

    #[test]
    fn front_faces_wind_towards_their_normals() {
        for params in [params(), bevelled()] {
            let g = text_geometry(&font(), "OI", params).unwrap();
            for t in g.indices().chunks_exact(3) {
                let p = |i: u32| Vec3::from_array(g.positions()[i as usize]);
                let face = (p(t[1]) - p(t[0])).cross(p(t[2]) - p(t[0]));
                let normal = Vec3::from_array(g.normals()[t[0] as usize]);
                assert!(face.dot(normal) > 0.0, "triangle {t:?} faces inward");
            }
        }
    }

    #[test]
    fn overlapping_glyphs_fill_their_union() {
        // two unit squares half a unit apart
        let g = text_geometry(&font(), "AA", params()).unwrap();
        assert!((front_area(&g) - 1.5).abs() < 1e-5);

        for t in g.indices().chunks_exact(3) {
            let normal = Vec3::from_array(g.normals()[t[0] as usize]);
            if normal.z.abs() > 0.5 {
                continue;
            }
            let centroid = t
                .iter()
                .map(|&i| Vec3::from_array(g.positions()[i as usize]))
                .sum::<Vec3>()
                / 3.0;
            if normal.x.abs() > 0.5 {
                // left walls at x = 0 and 0.5, right walls at x = 1 and 1.5
                assert_eq!(normal.x > 0.0, centroid.x > 0.75, "wall at {centroid:?}");
            } else {
                assert_eq!(normal.y > 0.0, centroid.y > 0.5, "wall at {centroid:?}");
            }
        }
    }

    #[test]
    fn bevel_extends_past_both_faces() {
        let p = bevelled();
        let g = text_geometry(&font(), "I", p).unwrap();
        let bounds = g.bounding_box().unwrap();
        assert!((bounds.size().z - (p.depth + 2.0 * p.bevel_thickness)).abs() < 1e-5);
        assert!((bounds.min.z + p.bevel_thickness).abs() < 1e-5);
        assert!(bounds.min.abs_diff_eq(Vec3::new(-0.02, -0.02, -0.03), 1e-5));
        assert!(bounds.max.abs_diff_eq(Vec3::new(0.42, 1.02, 0.53), 1e-5));
        // caps keep the undisplaced outline
        assert!((front_area(&g) - 0.4).abs() < 1e-5);
    }

    #[test]
    fn bevel_rings_run_back_to_front() {
        let rings = bevelled().rings();
        assert_eq!(rings.len(), 2 * 5 + 2);
        assert!(rings.windows(2).all(|w| w[0].0 <= w[1].0));
        assert_eq!(rings[0], (-0.03, 0.0));
        assert!((rings[5].1 - 0.02).abs() < 1e-6);
        assert_eq!(params().rings(), vec![(0.0, 0.0), (0.5, 0.0)]);
    }

    #[test]
    fn advances_and_newlines_place_glyphs() {
        let g = text_geometry(&font(), "I I\nI", params()).unwrap();
        let bounds = g.bounding_box().unwrap();
        // second bar starts at 0.5 + 0.3 and is 0.4 wide
        assert!((bounds.max.x - 1.2).abs() < 1e-6);
        // third bar sits one line below
        assert!((bounds.min.y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn curves_are_flattened() {
        let g = text_geometry(&font(), "D", params()).unwrap();
        assert!(g.triangle_count() > 8);
        let bounds = g.bounding_box().unwrap();
        assert!(bounds.max.x <= 1.0 + 1e-6);
    }

    #[test]
    fn missing_glyph_uses_question_mark() {
        let g = text_geometry(&font(), "Z", params()).unwrap();
        let bounds = g.bounding_box().unwrap();
        assert!(bounds.max.abs_diff_eq(Vec3::new(0.5, 0.5, 0.5), 1e-6));
    }

    #[test]
    fn whitespace_only_is_empty() {
        let g = text_geometry(&font(), "  \n ", params()).unwrap();
        assert!(g.is_empty());
        assert!(g.bounding_box().is_none());
    }

    #[test]
    fn contour_orientation() {
        let mut contours = vec![
            // outer, clockwise
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(0.0, 1.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(1.0, 0.0),
            ],
            // hole, counter-clockwise
            vec![
                Vec2::new(0.25, 0.25),
                Vec2::new(0.75, 0.25),
                Vec2::new(0.75, 0.75),
                Vec2::new(0.25, 0.75),
            ],
        ];
        orient_contours(&mut contours);
        assert!(signed_area(&contours[0]) > 0.0);
        assert!(signed_area(&contours[1]) < 0.0);
    }
}
