use read_fonts::tables::gsub::Gsub;

use super::lookup::{lookup_flags, resolve_lookup, Subtable};
use super::OtGdef;
use crate::hb::ot_layout::{FeatureProperties, GlyphClass, GlyphClasses, LayoutBuffer};

mod single;

pub(crate) use single::single_substitute;

fn skipped_by(flags: u16, class: GlyphClass) -> bool {
    match class {
        GlyphClass::Base => flags & lookup_flags::IGNORE_BASE_GLYPHS != 0,
        GlyphClass::Ligature => flags & lookup_flags::IGNORE_LIGATURES != 0,
        GlyphClass::Mark => flags & lookup_flags::IGNORE_MARKS != 0,
        _ => false,
    }
}

/// Runs `lookups` in order over the buffer. Each entry carries the union of
/// the properties of the features that pulled the lookup in.
pub(crate) fn apply_lookups(
    gsub: &Gsub,
    gdef: Option<&OtGdef>,
    lookups: &[(u16, FeatureProperties)],
    buffer: &mut LayoutBuffer,
) -> bool {
    let mut changed = false;
    for &(index, properties) in lookups {
        let lookup = match resolve_lookup(gsub, index) {
            Ok(lookup) => lookup,
            Err(e) => {
                log::debug!("skipping unreadable GSUB lookup {index}: {e}");
                continue;
            }
        };
        if let Some(Subtable::Other(kind)) = lookup
            .subtables
            .iter()
            .find(|s| matches!(s, Subtable::Other(_)))
        {
            log::trace!("GSUB lookup {index} of type {kind} is not applied");
            continue;
        }
        for info in buffer.info.iter_mut() {
            if !info.mask.intersects(properties) || skipped_by(lookup.flags, info.glyph_class) {
                continue;
            }
            if let Some(glyph) = single_substitute(&lookup.subtables, info.glyph_id) {
                info.glyph_id = glyph;
                if let Some(gdef) = gdef {
                    info.glyph_class = gdef.glyph_class(glyph);
                }
                changed = true;
            }
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignore_flags_match_classes() {
        let flags = lookup_flags::IGNORE_MARKS;
        assert!(skipped_by(flags, GlyphClass::Mark));
        assert!(!skipped_by(flags, GlyphClass::Base));
        let all = lookup_flags::IGNORE_BASE_GLYPHS
            | lookup_flags::IGNORE_LIGATURES
            | lookup_flags::IGNORE_MARKS;
        assert!(!skipped_by(all, GlyphClass::Unclassified));
        assert!(skipped_by(all, GlyphClass::Ligature));
    }
}
