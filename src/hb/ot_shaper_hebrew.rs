use alloc::vec::Vec;

use read_fonts::types::GlyphId;

use super::error::ShapeError;
use super::heuristics::{heuristic_position, log_cluster, GlyphAttributes, GlyphLayout};
use super::ot_shaper::{basic_shape, ShapedRun, HEBREW_FEATURES};
use super::shaper_item::hb_shaper_item_t;
use super::unicode::{decode_utf16_at, CharExt, Codepoint};

const DAGESH: Codepoint = 0x05BC;
const SHIN_DOT: Codepoint = 0x05C1;
const SIN_DOT: Codepoint = 0x05C2;
const PATAH: Codepoint = 0x05B7;
const QAMATS: Codepoint = 0x05B8;
const HOLAM: Codepoint = 0x05B9;
const RAFE: Codepoint = 0x05BF;

const DOTTED_CIRCLE: Codepoint = 0x25CC;

const S_DAGESH_FORMS: &[Codepoint] = &[
    0xFB30, // ALEF
    0xFB31, // BET
    0xFB32, // GIMEL
    0xFB33, // DALET
    0xFB34, // HE
    0xFB35, // VAV
    0xFB36, // ZAYIN
    0x0000, // HET
    0xFB38, // TET
    0xFB39, // YOD
    0xFB3A, // FINAL KAF
    0xFB3B, // KAF
    0xFB3C, // LAMED
    0x0000, // FINAL MEM
    0xFB3E, // MEM
    0x0000, // FINAL NUN
    0xFB40, // NUN
    0xFB41, // SAMEKH
    0x0000, // AYIN
    0xFB43, // FINAL PE
    0xFB44, // PE
    0x0000, // FINAL TSADI
    0xFB46, // TSADI
    0xFB47, // QOF
    0xFB48, // RESH
    0xFB49, // SHIN
    0xFB4A, // TAV
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Composition {
    /// The base becomes this presentation form.
    Form(Codepoint),
    /// The mark cannot sit on this base.
    Invalid,
    /// The mark stays a separate glyph.
    Separate,
}

fn compose(base: Codepoint, mark: Codepoint) -> Composition {
    use Composition::*;

    match mark {
        DAGESH => match base {
            0x05D0..=0x05EA => match S_DAGESH_FORMS[(base - 0x05D0) as usize] {
                0 => Invalid,
                form => Form(form),
            },
            // Shin with shin or sin dot
            0xFB2A | 0xFB2B => Form(base + 2),
            _ => Invalid,
        },
        SHIN_DOT => match base {
            0x05E9 => Form(0xFB2A),
            0xFB49 => Form(0xFB2C),
            _ => Invalid,
        },
        SIN_DOT => match base {
            0x05E9 => Form(0xFB2B),
            0xFB49 => Form(0xFB2D),
            _ => Invalid,
        },
        PATAH if base == 0x05D0 => Form(0xFB2E),
        QAMATS if base == 0x05D0 => Form(0xFB2F),
        HOLAM if base == 0x05D5 => Form(0xFB4B),
        RAFE => match base {
            0x05D1 => Form(0xFB4C),
            0x05DB => Form(0xFB4D),
            0x05E4 => Form(0xFB4E),
            _ => Separate,
        },
        _ => Separate,
    }
}

fn base_attributes(u: Codepoint) -> GlyphAttributes {
    GlyphAttributes {
        cluster_start: true,
        dont_print: u.is_control_char(),
        ..GlyphAttributes::default()
    }
}

/// Hebrew goes through the layout tables when the face supports it.
/// Otherwise pointed letters fold into their presentation forms where the
/// font has them, and marks that cannot sit on their base get a dotted
/// circle of their own.
pub(crate) fn hebrew_shape(item: &mut hb_shaper_item_t) -> Result<ShapedRun, ShapeError> {
    let script = item.script;
    if item
        .face
        .as_deref()
        .is_some_and(|face| face.supports_script(script))
    {
        return basic_shape(item, HEBREW_FEATURES);
    }

    let font = item.font;
    let string = item.run();
    let mut run = ShapedRun::with_capacity(string.len(), string.len())?;
    if string.is_empty() {
        return Ok(run);
    }
    run.log_clusters.resize(string.len(), 0);

    let mut shaped: Vec<(Codepoint, GlyphAttributes)> = Vec::new();
    shaped.try_reserve(string.len() * 2)?;

    let (first, mut i) = decode_utf16_at(string, 0);
    shaped.push((first, base_attributes(first)));
    let mut cluster_start = 0u16;
    while i < string.len() {
        let (u, n) = decode_utf16_at(string, i);
        let base = shaped.last().map_or(0, |(c, _)| *c);
        let composition = compose(base, u);

        if composition == Composition::Invalid {
            shaped.push((DOTTED_CIRCLE, base_attributes(DOTTED_CIRCLE)));
            cluster_start = log_cluster(shaped.len() - 1)?;
        }
        let composed = match composition {
            Composition::Form(form) if font.can_render(&[form as u16]) => {
                if let Some(last) = shaped.last_mut() {
                    last.0 = form;
                }
                true
            }
            _ => false,
        };
        if !composed {
            if u.is_non_spacing_mark() {
                let attributes = GlyphAttributes {
                    mark: true,
                    combining_class: u.combining_class(),
                    ..GlyphAttributes::default()
                };
                shaped.push((u, attributes));
            } else {
                shaped.push((u, base_attributes(u)));
                cluster_start = log_cluster(shaped.len() - 1)?;
            }
        }
        run.log_clusters[i..i + n].fill(cluster_start);
        i += n;
    }

    run.glyphs.try_reserve(shaped.len())?;
    run.glyphs.extend(shaped.into_iter().map(|(u, attributes)| GlyphLayout {
        attributes,
        ..GlyphLayout::new(font.nominal_glyph(u).unwrap_or(GlyphId::NOTDEF))
    }));
    font.get_metrics(&mut run.glyphs);
    for glyph in &mut run.glyphs {
        if glyph.attributes.mark {
            glyph.advance.x = 0;
        }
    }
    heuristic_position(font, script, item.direction(), &mut run.glyphs);
    Ok(run)
}
