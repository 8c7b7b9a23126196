/*!
Script-aware text shaping in the HarfBuzz tradition.

The crate computes line-break and cursor attributes for UTF-16 text,
maps script runs to glyphs through per-script engines, selects OpenType
GSUB/GPOS features for a face, and falls back to heuristic clustering and
mark positioning when a font carries no layout tables.
*/

#![no_std]
#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::too_many_arguments)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod hb;

pub use read_fonts::{types::GlyphId, types::Tag, FontRef};

pub use hb::common::{
    Direction, Fixed, FixedPoint, Script, ScriptItem, ScriptRequirements, ShaperFlags,
};
pub use hb::error::{ShapeError, TableError};
pub use hb::face::{hb_face_t as Face, FeatureRequest, FeatureSelection};
pub use hb::font::{FontFuncs, GlyphExtents};
pub use hb::heuristics::{
    heuristic_position, heuristic_set_glyph_attributes, GlyphAttributes, GlyphLayout,
    Justification,
};
pub use hb::linebreak::{
    calc_line_breaks, line_break_class, CharAttributes, LineBreakClass, LineBreakType,
};
pub use hb::ot::{OtGdef, OtLayoutTable};
pub use hb::ot_layout::{
    ActiveFeature, FeatureProperties, GlyphClass, GlyphClasses, GlyphInfo, GlyphPosition,
    LayoutBuffer, LayoutTable, TableSource, DEFAULT_LANGUAGE_INDEX,
};
pub use hb::ot_shaper::{
    char_attributes_for_str, engine_for_script, get_char_attributes, shape_item,
    AttributeEngine, ScriptEngine, ShapeEngine, BASIC_FEATURES, HANGUL_FEATURES,
    HEBREW_FEATURES,
};
pub use hb::shaper_item::hb_shaper_item_t as ShaperItem;
pub use hb::tables::OtFont;
