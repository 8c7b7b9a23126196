//! Script engine dispatch and the basic shaper.

use alloc::vec;
use alloc::vec::Vec;
use core::ops::Range;

use super::common::{runs_backwards, Script, ScriptItem, ShaperFlags};
use super::error::ShapeError;
use super::face::FeatureRequest;
use super::font::FontFuncs;
use super::heuristics::{heuristic_position, heuristic_set_glyph_attributes, GlyphLayout};
use super::linebreak::{calc_line_breaks, CharAttributes};
use super::ot_layout::FeatureProperties;
use super::ot_shaper_hangul::hangul_shape;
use super::ot_shaper_hebrew::hebrew_shape;
use super::shaper_item::hb_shaper_item_t;

pub const BASIC_FEATURES: &[FeatureRequest] = &[
    FeatureRequest::new(b"ccmp", FeatureProperties::CCMP),
    FeatureRequest::new(b"liga", FeatureProperties::CCMP),
    FeatureRequest::new(b"clig", FeatureProperties::CCMP),
];

pub const HEBREW_FEATURES: &[FeatureRequest] =
    &[FeatureRequest::new(b"ccmp", FeatureProperties::CCMP)];

pub const HANGUL_FEATURES: &[FeatureRequest] = &[
    FeatureRequest::new(b"ccmp", FeatureProperties::CCMP),
    FeatureRequest::new(b"ljmo", FeatureProperties::CCMP),
    FeatureRequest::new(b"jjmo", FeatureProperties::CCMP),
    FeatureRequest::new(b"tjmo", FeatureProperties::CCMP),
];

/// Output of an engine, committed to the item only if it fits.
#[derive(Default)]
pub(crate) struct ShapedRun {
    pub glyphs: Vec<GlyphLayout>,
    pub log_clusters: Vec<u16>,
    /// GPOS positioned the run with `kern` active, so legacy kerning must
    /// not run.
    pub opentype_kerning: bool,
}

impl ShapedRun {
    pub fn with_capacity(glyphs: usize, length: usize) -> Result<Self, ShapeError> {
        let mut run = Self::default();
        run.glyphs.try_reserve(glyphs)?;
        run.log_clusters.try_reserve(length)?;
        Ok(run)
    }
}

/// How a script run is turned into glyphs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeEngine {
    Basic,
    Hebrew,
    Hangul,
    Arabic,
    Syriac,
    Indic,
    Tibetan,
    Myanmar,
    Khmer,
}

impl ShapeEngine {
    pub fn is_implemented(self) -> bool {
        matches!(self, Self::Basic | Self::Hebrew | Self::Hangul)
    }

    pub(crate) fn shape(self, item: &mut hb_shaper_item_t) -> Result<ShapedRun, ShapeError> {
        match self {
            Self::Basic => basic_shape(item, BASIC_FEATURES),
            Self::Hebrew => hebrew_shape(item),
            Self::Hangul => hangul_shape(item),
            Self::Arabic
            | Self::Syriac
            | Self::Indic
            | Self::Tibetan
            | Self::Myanmar
            | Self::Khmer => Err(ShapeError::Unsupported(item.script)),
        }
    }
}

/// Script-specific refinement of the line-break attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttributeEngine {
    Indic,
    Tibetan,
    Myanmar,
    Khmer,
}

impl AttributeEngine {
    /// Refines `attributes[range]` for a run of `script`.
    pub fn char_attributes(
        self,
        script: Script,
        _string: &[u16],
        _range: Range<usize>,
        _attributes: &mut [CharAttributes],
    ) -> Result<(), ShapeError> {
        match self {
            Self::Indic | Self::Tibetan | Self::Myanmar | Self::Khmer => {
                Err(ShapeError::Unsupported(script))
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScriptEngine {
    pub shape: ShapeEngine,
    /// `None` leaves the line-break pass as the final word.
    pub attributes: Option<AttributeEngine>,
}

const fn engine(shape: ShapeEngine, attributes: Option<AttributeEngine>) -> ScriptEngine {
    ScriptEngine { shape, attributes }
}

const BASIC: ScriptEngine = engine(ShapeEngine::Basic, None);
const INDIC: ScriptEngine = engine(ShapeEngine::Indic, Some(AttributeEngine::Indic));

static SCRIPT_ENGINES: [ScriptEngine; Script::COUNT] = [
    BASIC, // Common
    BASIC, // Greek
    BASIC, // Cyrillic
    BASIC, // Armenian
    engine(ShapeEngine::Hebrew, None),
    engine(ShapeEngine::Arabic, None),
    engine(ShapeEngine::Syriac, None),
    BASIC, // Thaana
    INDIC, // Devanagari
    INDIC, // Bengali
    INDIC, // Gurmukhi
    INDIC, // Gujarati
    INDIC, // Oriya
    INDIC, // Tamil
    INDIC, // Telugu
    INDIC, // Kannada
    INDIC, // Malayalam
    INDIC, // Sinhala
    BASIC, // Thai
    BASIC, // Lao
    engine(ShapeEngine::Tibetan, Some(AttributeEngine::Tibetan)),
    engine(ShapeEngine::Myanmar, Some(AttributeEngine::Myanmar)),
    BASIC, // Georgian
    engine(ShapeEngine::Hangul, None),
    BASIC, // Ogham
    BASIC, // Runic
    engine(ShapeEngine::Khmer, Some(AttributeEngine::Khmer)),
];

/// The engine pair registered for `script`; `None` for [`Script::Inherited`].
pub fn engine_for_script(script: Script) -> Option<&'static ScriptEngine> {
    script.index().map(|i| &SCRIPT_ENGINES[i])
}

/// Computes line-break and cursor attributes for `string`, then lets the
/// attribute engine of each script run refine its span.
///
/// `items` partition the string; each run ends where the next begins.
pub fn get_char_attributes(
    string: &[u16],
    items: &[ScriptItem],
    attributes: &mut [CharAttributes],
) {
    calc_line_breaks(string, attributes);
    for (item, range) in runs_backwards(items, string.len()) {
        let script = item.script.resolve_inherited();
        let Some(engine) = engine_for_script(script).and_then(|e| e.attributes) else {
            continue;
        };
        if let Err(e) = engine.char_attributes(script, string, range.clone(), attributes) {
            log::debug!("attributes for {range:?} left at line-break defaults: {e}");
        }
    }
}

/// [`get_char_attributes`] for a `str`, indexed by UTF-16 code unit.
pub fn char_attributes_for_str(text: &str, items: &[ScriptItem]) -> Vec<CharAttributes> {
    let string: Vec<u16> = text.encode_utf16().collect();
    let mut attributes = vec![CharAttributes::default(); string.len()];
    get_char_attributes(&string, items, &mut attributes);
    attributes
}

/// Shapes one script run into `item.glyphs` and `item.log_clusters`.
///
/// Returns the number of glyphs written. If the output does not fit,
/// nothing is written and the error carries the required glyph count.
pub fn shape_item(item: &mut hb_shaper_item_t) -> Result<usize, ShapeError> {
    let Some(engine) = engine_for_script(item.script) else {
        return Err(ShapeError::Unsupported(item.script));
    };
    if item.capacity() < item.length {
        return Err(ShapeError::Capacity {
            required: item.length,
        });
    }
    if item.log_clusters.len() < item.run().len() {
        return Err(ShapeError::LogClusterCapacity {
            required: item.run().len(),
        });
    }

    let mut run = engine.shape.shape(item)?;

    if !run.opentype_kerning && !item.flags.contains(ShaperFlags::NO_KERNING) {
        apply_legacy_kerning(item.font, &mut run.glyphs);
    }

    let num_glyphs = run.glyphs.len();
    if num_glyphs > item.capacity() {
        log::debug!(
            "{:?} run needs {num_glyphs} glyphs, buffer holds {}",
            item.script,
            item.capacity()
        );
        return Err(ShapeError::Capacity {
            required: num_glyphs,
        });
    }
    item.glyphs[..num_glyphs].copy_from_slice(&run.glyphs);
    item.log_clusters[..run.log_clusters.len()].copy_from_slice(&run.log_clusters);
    item.num_glyphs = num_glyphs;
    Ok(num_glyphs)
}

fn apply_legacy_kerning(font: &dyn FontFuncs, glyphs: &mut [GlyphLayout]) {
    let mut prev: Option<usize> = None;
    for i in 0..glyphs.len() {
        if glyphs[i].attributes.mark {
            continue;
        }
        if let Some(p) = prev {
            glyphs[p].advance.x += font.kerning(glyphs[p].glyph, glyphs[i].glyph);
        }
        prev = Some(i);
    }
}

/// Maps the run to glyphs one per scalar value with metrics and heuristic
/// attributes.
pub(crate) fn map_glyphs(
    font: &dyn FontFuncs,
    item: &hb_shaper_item_t,
    string: &[u16],
) -> Result<ShapedRun, ShapeError> {
    let mut ids = Vec::new();
    font.string_to_glyphs(string, item.direction(), &mut ids)?;

    let mut run = ShapedRun::with_capacity(ids.len(), string.len())?;
    run.glyphs.extend(ids.into_iter().map(GlyphLayout::new));
    run.log_clusters.resize(string.len(), 0);
    font.get_metrics(&mut run.glyphs);
    heuristic_set_glyph_attributes(
        string,
        &mut run.glyphs,
        &mut run.log_clusters,
        font.is_symbol(),
    )?;
    Ok(run)
}

/// Maps the run through the font, then runs the face's layout tables if
/// they support the script; positions marks heuristically when GPOS did not.
pub(crate) fn basic_shape(
    item: &mut hb_shaper_item_t,
    features: &[FeatureRequest],
) -> Result<ShapedRun, ShapeError> {
    let font = item.font;
    let string = item.run();
    let mut run = map_glyphs(font, item, string)?;

    let script = item.script;
    let flags = item.flags;
    let mut positioned = false;
    if let Some(face) = item.face.as_deref_mut() {
        if face.supports_script(script) {
            face.select_script(script, flags, Some(features));
            positioned = face.shape_run(font, &mut run.glyphs, &mut run.log_clusters)?;
            run.opentype_kerning = positioned && face.has_opentype_kerning();
        }
    }
    if !positioned {
        heuristic_position(font, script, item.direction(), &mut run.glyphs);
    }
    Ok(run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hb::linebreak::LineBreakType;

    #[test]
    fn registry_covers_every_script() {
        for script in Script::ALL {
            assert!(engine_for_script(script).is_some());
        }
        assert!(engine_for_script(Script::Inherited).is_none());
        assert_eq!(
            engine_for_script(Script::Hangul).map(|e| e.shape),
            Some(ShapeEngine::Hangul)
        );
        assert_eq!(
            engine_for_script(Script::Sinhala).and_then(|e| e.attributes),
            Some(AttributeEngine::Indic)
        );
        assert_eq!(
            engine_for_script(Script::Thai).and_then(|e| e.attributes),
            None
        );
        assert!(!ShapeEngine::Khmer.is_implemented());
    }

    #[test]
    fn unsupported_attribute_engine_keeps_line_breaks() {
        let text = "\u{0915}\u{094D}\u{0937} \u{0915}";
        let items = [ScriptItem::new(0, Script::Devanagari, 0)];
        let refined = char_attributes_for_str(text, &items);

        let string: Vec<u16> = text.encode_utf16().collect();
        let mut plain = vec![CharAttributes::default(); string.len()];
        calc_line_breaks(&string, &mut plain);
        assert_eq!(refined, plain);
        assert_eq!(
            refined.last().map(|a| a.line_break_type),
            Some(LineBreakType::ForcedBreak)
        );
    }
}
