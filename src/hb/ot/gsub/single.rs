use read_fonts::tables::gsub::{SingleSubstFormat1, SingleSubstFormat2};
use read_fonts::types::GlyphId;

use super::super::lookup::Subtable;

pub(crate) trait SingleSubst {
    fn substitute(&self, glyph: GlyphId) -> Option<GlyphId>;
}

impl SingleSubst for SingleSubstFormat1<'_> {
    fn substitute(&self, glyph: GlyphId) -> Option<GlyphId> {
        self.coverage().ok()?.get(glyph)?;
        let subst = (glyph.to_u32() as i32 + self.delta_glyph_id() as i32) as u16;
        Some(GlyphId::new(subst as u32))
    }
}

impl SingleSubst for SingleSubstFormat2<'_> {
    fn substitute(&self, glyph: GlyphId) -> Option<GlyphId> {
        let index = self.coverage().ok()?.get(glyph)?;
        let subst = self.substitute_glyph_ids().get(index as usize)?.get();
        Some(GlyphId::new(subst.to_u32()))
    }
}

/// Replacement for `glyph` from the first subtable that covers it.
pub(crate) fn single_substitute(subtables: &[Subtable], glyph: GlyphId) -> Option<GlyphId> {
    subtables.iter().find_map(|subtable| match subtable {
        Subtable::SingleSubst1(s) => s.substitute(glyph),
        Subtable::SingleSubst2(s) => s.substitute(glyph),
        Subtable::Other(_) => None,
    })
}
