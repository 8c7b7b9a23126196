use alloc::vec::Vec;

use read_fonts::types::GlyphId;
use smallvec::SmallVec;

use super::error::ShapeError;
use super::heuristics::{log_cluster, GlyphAttributes, GlyphLayout};
use super::ot_shaper::{basic_shape, ShapedRun, HANGUL_FEATURES};
use super::shaper_item::hb_shaper_item_t;
use super::unicode::{
    compose_hangul, decode_utf16_at, is_hangul_syllable, Codepoint, L_BASE, S_BASE, T_BASE,
    T_COUNT, V_BASE,
};

// Hangul is written in syllables. Modern syllables have precomposed code
// points; older ones are spelled with conjoining jamo: leading consonants
// (L), vowels (V) and trailing consonants (T). Precomposed syllables are LV
// or LVT. A syllable never breaks inside
//
// L          L, V or precomposed
// V, LV      V, T
// LVT, T     T
//
// so syllables have the shape L*V*T*.

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum HangulType {
    L,
    V,
    T,
    LV,
    LVT,
    X,
}

fn hangul_type(u: Codepoint) -> HangulType {
    if is_hangul_syllable(u) {
        return if (u - S_BASE) % T_COUNT == 0 {
            HangulType::LV
        } else {
            HangulType::LVT
        };
    }
    if !(L_BASE..=0x11FF).contains(&u) {
        HangulType::X
    } else if u < V_BASE {
        HangulType::L
    } else if u <= T_BASE {
        HangulType::V
    } else {
        HangulType::T
    }
}

/// End of the syllable starting at `start`.
fn next_syllable_boundary(string: &[u16], start: usize, end: usize) -> usize {
    let (first, n) = decode_utf16_at(string, start);
    let mut state = match hangul_type(first) {
        HangulType::X => return start + n,
        HangulType::LV => HangulType::V,
        HangulType::LVT => HangulType::T,
        state => state,
    };

    let mut pos = start + 1;
    while pos < end {
        let new_state = hangul_type(string[pos] as Codepoint);
        match new_state {
            HangulType::X => break,
            HangulType::L | HangulType::V | HangulType::T => {
                if state > new_state {
                    break;
                }
                state = new_state;
            }
            HangulType::LV => {
                if state > HangulType::L {
                    break;
                }
                state = HangulType::V;
            }
            HangulType::LVT => {
                if state > HangulType::L {
                    break;
                }
                state = HangulType::T;
            }
        }
        pos += 1;
    }
    pos
}

/// The precomposed syllable for a modern LV or LVT jamo sequence.
fn compose_syllable(syllable: &[u16]) -> Option<Codepoint> {
    match *syllable {
        [l, v] => compose_hangul(l as Codepoint, v as Codepoint),
        [l, v, t] => compose_hangul(compose_hangul(l as Codepoint, v as Codepoint)?, t as Codepoint),
        _ => None,
    }
}

/// Shapes a Hangul run syllable by syllable.
///
/// Runs made only of precomposed syllables go through the basic engine,
/// still with the Hangul feature list.
pub(crate) fn hangul_shape(item: &mut hb_shaper_item_t) -> Result<ShapedRun, ShapeError> {
    let string = item.run();
    if string
        .iter()
        .all(|&u| is_hangul_syllable(u as Codepoint))
    {
        return basic_shape(item, HANGUL_FEATURES);
    }

    let font = item.font;
    let script = item.script;
    let flags = item.flags;
    let direction = item.direction();
    let mut face = item
        .face
        .as_deref_mut()
        .filter(|face| face.supports_script(script));
    if let Some(face) = face.as_deref_mut() {
        face.select_script(script, flags, Some(HANGUL_FEATURES));
    }

    let mut run = ShapedRun::with_capacity(string.len(), string.len())?;
    run.log_clusters.resize(string.len(), 0);
    let mut positioned = false;

    let mut start = 0;
    while start < string.len() {
        let end = next_syllable_boundary(string, start, string.len());
        let syllable = &string[start..end];
        let first_glyph = run.glyphs.len();

        let mut glyphs = Vec::new();
        if let Some(composed) = compose_syllable(syllable) {
            glyphs.try_reserve(1)?;
            glyphs.push(GlyphLayout::new(
                font.nominal_glyph(composed).unwrap_or(GlyphId::NOTDEF),
            ));
            font.get_metrics(&mut glyphs);
        } else {
            let mut ids = Vec::new();
            font.string_to_glyphs(syllable, direction, &mut ids)?;
            glyphs.try_reserve(ids.len())?;
            glyphs.extend(ids.into_iter().map(GlyphLayout::new));
            font.get_metrics(&mut glyphs);
            if let Some(face) = face.as_deref_mut() {
                let mut clusters: SmallVec<[u16; 8]> = SmallVec::new();
                let mut i = 0;
                while i < syllable.len() {
                    let (_, n) = decode_utf16_at(syllable, i);
                    let glyph = clusters.last().map_or(0, |&g| g + 1);
                    clusters.extend(core::iter::repeat(glyph).take(n));
                    i += n;
                }
                positioned |= face.shape_run(font, &mut glyphs, &mut clusters)?;
            }
        }

        for glyph in &mut glyphs {
            glyph.attributes = GlyphAttributes {
                mark: glyph.attributes.mark,
                ..GlyphAttributes::default()
            };
        }
        if let Some(glyph) = glyphs.first_mut() {
            glyph.attributes.cluster_start = true;
            glyph.attributes.mark = false;
        }

        run.glyphs.try_reserve(glyphs.len())?;
        run.glyphs.extend(glyphs);
        run.log_clusters[start..end].fill(log_cluster(first_glyph)?);
        start = end;
    }

    run.opentype_kerning =
        positioned && face.is_some_and(|face| face.has_opentype_kerning());
    Ok(run)
}
