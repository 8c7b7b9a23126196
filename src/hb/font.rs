use alloc::vec::Vec;

use read_fonts::types::GlyphId;

use super::common::{Direction, Fixed};
use super::error::ShapeError;
use super::heuristics::GlyphLayout;
use super::unicode::{decode_utf16_at, Codepoint};

/// Ink bounds of a glyph relative to its origin, y growing upwards, in 26.6.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash)]
pub struct GlyphExtents {
    pub x_min: Fixed,
    pub y_min: Fixed,
    pub x_max: Fixed,
    pub y_max: Fixed,
}

impl GlyphExtents {
    #[inline]
    pub fn width(&self) -> Fixed {
        self.x_max - self.x_min
    }

    #[inline]
    pub fn translate(self, dx: Fixed, dy: Fixed) -> Self {
        Self {
            x_min: self.x_min + dx,
            y_min: self.y_min + dy,
            x_max: self.x_max + dx,
            y_max: self.y_max + dy,
        }
    }

    pub fn union(self, other: Self) -> Self {
        Self {
            x_min: self.x_min.min(other.x_min),
            y_min: self.y_min.min(other.y_min),
            x_max: self.x_max.max(other.x_max),
            y_max: self.y_max.max(other.y_max),
        }
    }
}

/// The font backend the shaper maps text through.
///
/// Implementors provide the per-glyph queries; the string-level operations
/// have default implementations built on them.
pub trait FontFuncs {
    /// Glyph for a Unicode scalar value, `None` if the font has no mapping.
    fn nominal_glyph(&self, c: Codepoint) -> Option<GlyphId>;

    /// Horizontal advance in 26.6.
    fn advance(&self, glyph: GlyphId) -> Fixed;

    fn glyph_extents(&self, glyph: GlyphId) -> GlyphExtents;

    /// Ascent in 26.6; drives the default mark spacing.
    fn ascent(&self) -> Fixed;

    /// Whether the font uses a symbol encoding. Symbol fonts show U+00AD.
    fn is_symbol(&self) -> bool {
        false
    }

    /// Legacy pair kerning adjustment, used when no GPOS `kern` is active.
    fn kerning(&self, _left: GlyphId, _right: GlyphId) -> Fixed {
        0
    }

    /// Maps `string` to glyphs, one per scalar value; unmapped scalars get
    /// glyph 0. Glyphs are appended to `glyphs`.
    fn string_to_glyphs(
        &self,
        string: &[u16],
        _direction: Direction,
        glyphs: &mut Vec<GlyphId>,
    ) -> Result<(), ShapeError> {
        glyphs.try_reserve(string.len())?;
        let mut i = 0;
        while i < string.len() {
            let (u, n) = decode_utf16_at(string, i);
            glyphs.push(self.nominal_glyph(u).unwrap_or(GlyphId::NOTDEF));
            i += n;
        }
        Ok(())
    }

    /// Fills in the horizontal advance of every glyph.
    fn get_metrics(&self, glyphs: &mut [GlyphLayout]) {
        for glyph in glyphs {
            glyph.advance.x = self.advance(glyph.glyph);
            glyph.advance.y = 0;
        }
    }

    /// Whether every scalar of `string` has a glyph.
    fn can_render(&self, string: &[u16]) -> bool {
        let mut i = 0;
        while i < string.len() {
            let (u, n) = decode_utf16_at(string, i);
            if self.nominal_glyph(u).is_none() {
                return false;
            }
            i += n;
        }
        true
    }
}
