use core::ops::Range;

use bitflags::bitflags;

use super::hb_tag_t;

/// A signed 26.6 fixed-point value, the unit of all advances and offsets.
pub type Fixed = i32;

/// A two-dimensional 26.6 fixed-point vector.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash)]
pub struct FixedPoint {
    /// Horizontal component.
    pub x: Fixed,
    /// Vertical component, growing upwards.
    pub y: Fixed,
}

impl FixedPoint {
    /// The origin.
    pub const ZERO: Self = Self { x: 0, y: 0 };

    #[inline]
    pub const fn new(x: Fixed, y: Fixed) -> Self {
        Self { x, y }
    }
}

/// Text direction of a run.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Left to right.
    #[default]
    LeftToRight,
    /// Right to left.
    RightToLeft,
}

impl Direction {
    /// Derives the direction from a bidi embedding level: odd levels are right to left.
    #[inline]
    pub const fn from_bidi_level(level: u8) -> Self {
        if level & 1 == 1 {
            Self::RightToLeft
        } else {
            Self::LeftToRight
        }
    }

    #[inline]
    pub const fn is_backward(self) -> bool {
        matches!(self, Self::RightToLeft)
    }
}

/// The closed set of scripts the shaper knows about.
///
/// [`Script::Inherited`] is never dispatched: callers resolve it to the
/// surrounding script, and attribute computation treats it as [`Script::Common`].
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Script {
    #[default]
    Common,
    Greek,
    Cyrillic,
    Armenian,
    Hebrew,
    Arabic,
    Syriac,
    Thaana,
    Devanagari,
    Bengali,
    Gurmukhi,
    Gujarati,
    Oriya,
    Tamil,
    Telugu,
    Kannada,
    Malayalam,
    Sinhala,
    Thai,
    Lao,
    Tibetan,
    Myanmar,
    Georgian,
    Hangul,
    Ogham,
    Runic,
    Khmer,
    Inherited,
}

impl Script {
    /// Number of dispatchable scripts, [`Script::Inherited`] excluded.
    pub const COUNT: usize = 27;

    /// All dispatchable scripts in table order.
    pub const ALL: [Script; Self::COUNT] = [
        Self::Common,
        Self::Greek,
        Self::Cyrillic,
        Self::Armenian,
        Self::Hebrew,
        Self::Arabic,
        Self::Syriac,
        Self::Thaana,
        Self::Devanagari,
        Self::Bengali,
        Self::Gurmukhi,
        Self::Gujarati,
        Self::Oriya,
        Self::Tamil,
        Self::Telugu,
        Self::Kannada,
        Self::Malayalam,
        Self::Sinhala,
        Self::Thai,
        Self::Lao,
        Self::Tibetan,
        Self::Myanmar,
        Self::Georgian,
        Self::Hangul,
        Self::Ogham,
        Self::Runic,
        Self::Khmer,
    ];

    /// Position of the script in the static tables, `None` for [`Script::Inherited`].
    #[inline]
    pub fn index(self) -> Option<usize> {
        match self {
            Self::Inherited => None,
            _ => Some(self as usize),
        }
    }

    /// Maps [`Script::Inherited`] to [`Script::Common`].
    #[inline]
    pub fn resolve_inherited(self) -> Self {
        match self {
            Self::Inherited => Self::Common,
            _ => self,
        }
    }

    /// The OpenType script tag used to look the script up in GSUB/GPOS.
    pub fn ot_tag(self) -> Option<hb_tag_t> {
        self.index().map(|i| OT_SCRIPTS[i].tag)
    }

    /// Which layout tables must support the script for OpenType shaping to be used.
    pub fn requirements(self) -> ScriptRequirements {
        self.index()
            .map(|i| OT_SCRIPTS[i].requirements)
            .unwrap_or_default()
    }
}

bitflags! {
    /// Layout tables a script needs before the face reports it as supported.
    #[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash)]
    pub struct ScriptRequirements: u8 {
        const GSUB = 1 << 0;
        const GPOS = 1 << 1;
    }
}

bitflags! {
    /// Per-call shaping switches. Part of the face's selection cache key.
    #[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash)]
    pub struct ShaperFlags: u32 {
        /// Skip the GPOS `kern` feature and legacy pair kerning.
        const NO_KERNING = 1 << 0;
    }
}

struct OtScript {
    tag: hb_tag_t,
    requirements: ScriptRequirements,
}

const fn ot_script(tag: &[u8; 4], requirements: ScriptRequirements) -> OtScript {
    OtScript {
        tag: hb_tag_t::new(tag),
        requirements,
    }
}

const NONE: ScriptRequirements = ScriptRequirements::empty();
const GSUB: ScriptRequirements = ScriptRequirements::GSUB;

static OT_SCRIPTS: [OtScript; Script::COUNT] = [
    ot_script(b"latn", NONE), // Common
    ot_script(b"grek", NONE),
    ot_script(b"cyrl", NONE),
    ot_script(b"armn", NONE),
    ot_script(b"hebr", GSUB),
    ot_script(b"arab", GSUB),
    ot_script(b"syrc", GSUB),
    ot_script(b"thaa", GSUB),
    ot_script(b"deva", GSUB),
    ot_script(b"beng", GSUB),
    ot_script(b"guru", GSUB),
    ot_script(b"gujr", GSUB),
    ot_script(b"orya", GSUB),
    ot_script(b"taml", GSUB),
    ot_script(b"telu", GSUB),
    ot_script(b"knda", GSUB),
    ot_script(b"mlym", GSUB),
    ot_script(b"sinh", GSUB),
    ot_script(b"thai", GSUB),
    ot_script(b"lao ", GSUB),
    ot_script(b"tibt", GSUB),
    ot_script(b"mymr", GSUB),
    ot_script(b"geor", NONE),
    ot_script(b"hang", GSUB),
    ot_script(b"ogam", NONE),
    ot_script(b"runr", NONE),
    ot_script(b"khmr", GSUB),
];

/// A script run inside a string. The run ends where the next one starts.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct ScriptItem {
    /// Offset of the first code unit of the run.
    pub pos: u32,
    /// Script of the run.
    pub script: Script,
    /// Bidi embedding level of the run.
    pub bidi_level: u8,
}

impl ScriptItem {
    pub fn new(pos: u32, script: Script, bidi_level: u8) -> Self {
        Self {
            pos,
            script,
            bidi_level,
        }
    }
}

/// Yields `(item, range)` pairs for a partition of `len` code units, last run first.
pub(crate) fn runs_backwards(
    items: &[ScriptItem],
    len: usize,
) -> impl Iterator<Item = (&ScriptItem, Range<usize>)> + '_ {
    let mut end = len;
    items.iter().rev().filter_map(move |item| {
        let start = (item.pos as usize).min(end);
        let range = start..end;
        end = start;
        (!range.is_empty()).then_some((item, range))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_table_matches_enum_order() {
        for (i, script) in Script::ALL.iter().enumerate() {
            assert_eq!(script.index(), Some(i));
        }
        assert_eq!(Script::Inherited.index(), None);
        assert_eq!(Script::Common.ot_tag(), Some(hb_tag_t::new(b"latn")));
        assert_eq!(Script::Lao.ot_tag(), Some(hb_tag_t::new(b"lao ")));
        assert_eq!(Script::Khmer.ot_tag(), Some(hb_tag_t::new(b"khmr")));
    }

    #[test]
    fn requirements() {
        assert!(Script::Common.requirements().is_empty());
        assert!(Script::Georgian.requirements().is_empty());
        assert_eq!(Script::Hangul.requirements(), ScriptRequirements::GSUB);
        assert_eq!(Script::Hebrew.requirements(), ScriptRequirements::GSUB);
        assert!(Script::Inherited.requirements().is_empty());
    }

    #[test]
    fn direction_from_level() {
        assert_eq!(Direction::from_bidi_level(0), Direction::LeftToRight);
        assert_eq!(Direction::from_bidi_level(1), Direction::RightToLeft);
        assert_eq!(Direction::from_bidi_level(2), Direction::LeftToRight);
    }

    #[test]
    fn runs_cover_the_string_backwards() {
        let items = [
            ScriptItem::new(0, Script::Common, 0),
            ScriptItem::new(3, Script::Hebrew, 1),
            ScriptItem::new(5, Script::Common, 0),
        ];
        let runs: alloc::vec::Vec<_> = runs_backwards(&items, 8)
            .map(|(item, range)| (item.script, range))
            .collect();
        assert_eq!(
            runs,
            [
                (Script::Common, 5..8),
                (Script::Hebrew, 3..5),
                (Script::Common, 0..3)
            ]
        );
    }
}
