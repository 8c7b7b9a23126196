//! Clustering, mark and justification attributes derived from Unicode
//! properties alone, and the fallback mark positioner used when no layout
//! table positions the glyphs.

use icu_properties::props::GeneralCategory;
use read_fonts::types::GlyphId;

use super::common::{Direction, Fixed, FixedPoint, Script};
use super::error::ShapeError;
use super::font::{FontFuncs, GlyphExtents};
use super::unicode::{combining_class, decode_utf16_at, CharExt, Codepoint};

/// How a glyph takes part in justification.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash)]
pub enum Justification {
    #[default]
    None,
    /// Inter-word space.
    Space,
    /// Inter-character opportunity.
    Character,
}

#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash)]
pub struct GlyphAttributes {
    pub mark: bool,
    pub cluster_start: bool,
    pub combining_class: u8,
    pub justification: Justification,
    pub dont_print: bool,
}

/// One shaped glyph.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct GlyphLayout {
    pub glyph: GlyphId,
    pub attributes: GlyphAttributes,
    pub advance: FixedPoint,
    pub offset: FixedPoint,
}

impl GlyphLayout {
    pub fn new(glyph: GlyphId) -> Self {
        Self {
            glyph,
            ..Self::default()
        }
    }
}

fn is_hidden(u: Codepoint, font_is_symbol: bool) -> bool {
    (u == 0x00AD && !font_is_symbol) || u.is_control_char()
}

// Thai and Lao vowels and tone marks have combining class 0 in Unicode but
// still need to sit on their base.
fn thai_lao_combining_class(u: Codepoint) -> u8 {
    match u {
        0x0E31 | 0x0E34..=0x0E37 | 0x0E47 | 0x0E4C..=0x0E4E => combining_class::AboveRight,
        0x0EB1 | 0x0EB4..=0x0EB7 | 0x0EBB | 0x0ECC | 0x0ECD => combining_class::Above,
        0x0EBC => combining_class::Below,
        _ => combining_class::NotReordered,
    }
}

/// The log-cluster value for the glyph at `index`.
pub(crate) fn log_cluster(index: usize) -> Result<u16, ShapeError> {
    u16::try_from(index).map_err(|_| ShapeError::ClusterOverflow { glyphs: index + 1 })
}

/// Assigns cluster, mark, combining-class and justification attributes and
/// builds the log clusters for glyphs mapped one per scalar value.
///
/// Non-spacing marks fold into the cluster of the preceding glyph, lose
/// their advance and point their code units at the cluster start. Fails if
/// `glyphs` does not hold exactly one glyph per scalar value of `string`.
pub fn heuristic_set_glyph_attributes(
    string: &[u16],
    glyphs: &mut [GlyphLayout],
    log_clusters: &mut [u16],
    font_is_symbol: bool,
) -> Result<(), ShapeError> {
    let length = string.len();
    if length == 0 {
        return Ok(());
    }
    if log_clusters.len() < length {
        return Err(ShapeError::LogClusterCapacity { required: length });
    }

    let mut glyph_pos = 0;
    let mut i = 0;
    while i < length {
        let (_, n) = decode_utf16_at(string, i);
        log_clusters[i..i + n].fill(log_cluster(glyph_pos)?);
        glyph_pos += 1;
        i += n;
    }
    if glyph_pos != glyphs.len() {
        log::debug!(
            "heuristic attributes: {} glyphs for {} scalars",
            glyphs.len(),
            glyph_pos
        );
        return Err(ShapeError::FontBackend);
    }

    let (first, mut i) = decode_utf16_at(string, 0);
    glyphs[0].attributes = GlyphAttributes {
        mark: false,
        cluster_start: true,
        combining_class: 0,
        justification: Justification::None,
        dont_print: is_hidden(first, font_is_symbol),
    };

    let mut pos = 0;
    let mut cluster_start = 0;
    let mut last_cat = first.general_category();
    while i < length {
        let (u, n) = decode_utf16_at(string, i);
        pos += 1;

        let cat = u.general_category();
        let is_mark = cat == GeneralCategory::NonspacingMark;
        let glyph = &mut glyphs[pos];
        glyph.attributes.dont_print = is_hidden(u, font_is_symbol);
        if !is_mark {
            glyph.attributes.mark = false;
            glyph.attributes.cluster_start = true;
            glyph.attributes.combining_class = 0;
            cluster_start = log_clusters[i];
        } else {
            let mut cmb = u.combining_class();
            if cmb == combining_class::NotReordered {
                cmb = thai_lao_combining_class(u);
            }
            glyph.attributes.mark = true;
            glyph.attributes.cluster_start = false;
            glyph.attributes.combining_class = cmb;
            glyph.advance = FixedPoint::ZERO;
            log_clusters[i..i + n].fill(cluster_start);
        }

        glyphs[pos - 1].attributes.justification = if last_cat == GeneralCategory::SpaceSeparator {
            Justification::Space
        } else if !is_mark {
            Justification::Character
        } else {
            Justification::None
        };

        last_cat = cat;
        i += n;
    }

    let last = log_clusters[length - 1] as usize;
    glyphs[last].attributes.justification = if last_cat == GeneralCategory::SpaceSeparator {
        Justification::Space
    } else {
        Justification::Character
    };

    Ok(())
}

// Combining classes below 200 are script specific; fold them into the
// positional families they behave like.
fn positional_class(cmb: u8) -> u8 {
    use combining_class::*;
    match cmb {
        10..=18 | 20 | 22 | 29 | 32 => Below,
        23 | 27 | 28 | 30 | 31 | 33..=36 => Above,
        9 | CCC103 | CCC118 => BelowRight,
        24 | CCC107 | CCC122 => AboveRight,
        25 => AboveLeft,
        _ => cmb,
    }
}

#[inline]
fn to_fixed(px: f32) -> Fixed {
    (px * 64.0) as Fixed
}

// Where a mark of family `cmb` goes relative to the attachment rectangle.
fn mark_displacement(
    cmb: u8,
    offset: Fixed,
    attachment: &GlyphExtents,
    mark: &GlyphExtents,
) -> FixedPoint {
    use combining_class::*;

    let below_left = || FixedPoint::new(attachment.x_min - mark.x_min, attachment.y_min - mark.y_max);
    let below_right =
        || FixedPoint::new(attachment.x_max - mark.x_max, attachment.y_min - mark.y_max);
    let above_left = || FixedPoint::new(attachment.x_min - mark.x_min, attachment.y_max - mark.y_min);
    let above_right =
        || FixedPoint::new(attachment.x_max - mark.x_max, attachment.y_max - mark.y_min);
    let center = (attachment.width() - mark.width()) / 2;
    let shift = |p: FixedPoint, dx: Fixed, dy: Fixed| FixedPoint::new(p.x + dx, p.y + dy);

    match cmb {
        DoubleBelow | BelowLeft => shift(below_left(), 0, -offset),
        AttachedBelowLeft => below_left(),
        Below => shift(below_left(), center, -offset),
        AttachedBelow => shift(below_left(), center, 0),
        BelowRight => shift(below_right(), 0, -offset),
        AttachedBelowRight => below_right(),
        Left => FixedPoint::new(-offset, 0),
        Right => FixedPoint::new(offset, 0),
        AttachedLeft | AttachedRight => FixedPoint::ZERO,
        DoubleAbove | AboveLeft => shift(above_left(), 0, offset),
        AttachedAboveLeft => above_left(),
        Above => shift(above_left(), center, offset),
        AttachedAbove => shift(above_left(), center, 0),
        AboveRight => shift(above_right(), 0, offset),
        AttachedAboveRight => above_right(),
        _ => FixedPoint::ZERO,
    }
}

fn position_cluster(
    font: &dyn FontFuncs,
    script: Script,
    direction: Direction,
    glyphs: &mut [GlyphLayout],
    base: usize,
    end: usize,
) {
    let mut base_rect = font.glyph_extents(glyphs[base].glyph);
    if script == Script::Hebrew {
        // Hebrew marks hang below the baseline even under short letters.
        base_rect.y_min = base_rect.y_min.min(0);
    }
    let base_advance = glyphs[base].advance;

    let size = font.ascent() as f32 / 64.0 / 10.0;
    let offset_base = (size - 4.0) / 4.0 + size.min(4.0) + 1.0;

    let mut attachment = base_rect;
    let mut last_cmb = 0;
    for glyph in &mut glyphs[base + 1..=end] {
        let mut cmb = glyph.attributes.combining_class;
        let mut offset = offset_base;
        if cmb < combining_class::AttachedBelowLeft {
            // Arabic marks need a bit more room at small sizes.
            if (combining_class::CCC27..=combining_class::CCC36).contains(&cmb) && offset < 3.0 {
                offset += 1.0;
            }
            cmb = positional_class(cmb);
        }

        let mark_rect = font.glyph_extents(glyph.glyph);
        if cmb != last_cmb {
            last_cmb = cmb;
            attachment = base_rect;
        }

        let p = mark_displacement(cmb, to_fixed(offset), &attachment, &mark_rect);
        attachment = attachment.union(mark_rect.translate(p.x, p.y));

        glyph.offset = if direction.is_backward() {
            p
        } else {
            FixedPoint::new(p.x - base_advance.x, p.y - base_advance.y)
        };
        glyph.advance = FixedPoint::ZERO;
    }
}

/// Positions runs of mark glyphs against the bounding box of their base.
///
/// Marks of the same positional family stack outwards; a change of family
/// starts again from the base. Marks without a preceding base are left alone.
pub fn heuristic_position(
    font: &dyn FontFuncs,
    script: Script,
    direction: Direction,
    glyphs: &mut [GlyphLayout],
) {
    let mut cluster_end = None;
    for i in (0..glyphs.len()).rev() {
        if glyphs[i].attributes.mark {
            cluster_end.get_or_insert(i);
        } else if let Some(end) = cluster_end.take() {
            position_cluster(font, script, direction, glyphs, i, end);
        }
    }
}
