//! The interface between the shaper and an OpenType layout engine.

use alloc::collections::TryReserveError;
use alloc::vec::Vec;

use bitflags::bitflags;
use read_fonts::types::GlyphId;
use smallvec::SmallVec;

use super::common::Fixed;
use super::error::TableError;
use super::hb_tag_t;

/// Language-system index meaning "the script's default language system".
pub const DEFAULT_LANGUAGE_INDEX: u16 = 0xFFFF;

bitflags! {
    /// Property bits attached to an activated feature. A feature only
    /// applies to glyphs whose mask shares a bit with its properties.
    #[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash)]
    pub struct FeatureProperties: u32 {
        const CCMP = 1 << 0;
        const POSITIONING = 1 << 31;
    }
}

/// A feature switched on in a layout table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ActiveFeature {
    /// Index into the table's feature list.
    pub index: u16,
    pub properties: FeatureProperties,
}

/// GDEF glyph class.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash)]
pub enum GlyphClass {
    #[default]
    Unclassified,
    Base,
    Ligature,
    Mark,
    Component,
}

impl GlyphClass {
    pub fn from_gdef(class: u16) -> Self {
        match class {
            1 => Self::Base,
            2 => Self::Ligature,
            3 => Self::Mark,
            4 => Self::Component,
            _ => Self::Unclassified,
        }
    }
}

/// Glyph classification, usually backed by a GDEF table.
pub trait GlyphClasses {
    fn glyph_class(&self, glyph: GlyphId) -> GlyphClass;
}

#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct GlyphInfo {
    pub glyph_id: GlyphId,
    /// Index of the glyph this one was produced from, before substitution.
    pub cluster: u32,
    /// Features allowed to touch this glyph.
    pub mask: FeatureProperties,
    pub glyph_class: GlyphClass,
}

/// Adjustments written by positioning, added to the glyph's metrics. 26.6.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct GlyphPosition {
    pub x_advance: Fixed,
    pub y_advance: Fixed,
    pub x_offset: Fixed,
    pub y_offset: Fixed,
}

/// Glyph run handed to a layout table.
///
/// Substitution may change the number of glyphs; `pos` is resized to match
/// `info` before positioning.
#[derive(Clone, Default, Debug)]
pub struct LayoutBuffer {
    pub info: Vec<GlyphInfo>,
    pub pos: Vec<GlyphPosition>,
}

impl LayoutBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        let mut buffer = Self::new();
        buffer.info.try_reserve(capacity)?;
        buffer.pos.try_reserve(capacity)?;
        Ok(buffer)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.info.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.info.is_empty()
    }

    pub fn clear(&mut self) {
        self.info.clear();
        self.pos.clear();
    }

    pub fn push(
        &mut self,
        glyph_id: GlyphId,
        cluster: u32,
        glyph_class: GlyphClass,
    ) -> Result<(), TryReserveError> {
        self.info.try_reserve(1)?;
        self.info.push(GlyphInfo {
            glyph_id,
            cluster,
            mask: FeatureProperties::all(),
            glyph_class,
        });
        Ok(())
    }

    /// Zeroes every position and sizes `pos` to `info`.
    pub fn clear_positions(&mut self) -> Result<(), TryReserveError> {
        self.pos.clear();
        self.pos.try_reserve(self.info.len())?;
        self.pos.resize(self.info.len(), GlyphPosition::default());
        Ok(())
    }
}

/// A GSUB or GPOS table as seen by the feature-selection protocol.
///
/// Selection calls only read the table. Activation state lives in the table
/// so a face can keep it between shaping calls; [`apply_features`] also takes
/// an explicit feature list for callers that must not touch that state.
///
/// [`apply_features`]: LayoutTable::apply_features
pub trait LayoutTable {
    /// Index of the script with the given tag in the script list.
    fn select_script(&self, tag: hb_tag_t) -> Option<u16>;

    /// Index in the feature list of the feature `tag` of the given language
    /// system; `language_index` may be [`DEFAULT_LANGUAGE_INDEX`].
    fn select_feature(&self, tag: hb_tag_t, script_index: u16, language_index: u16)
        -> Option<u16>;

    /// Tags of every feature the language system offers.
    fn query_features(&self, script_index: u16, language_index: u16) -> SmallVec<[hb_tag_t; 16]>;

    fn clear_features(&mut self);

    fn add_feature(&mut self, feature_index: u16, properties: FeatureProperties);

    fn active_features(&self) -> &[ActiveFeature];

    /// Runs the lookups of `features` over `buffer`. Returns whether the
    /// table did anything; for GPOS, whether the glyphs are positioned.
    fn apply_features(&self, features: &[ActiveFeature], buffer: &mut LayoutBuffer) -> bool;

    fn apply(&self, buffer: &mut LayoutBuffer) -> bool {
        self.apply_features(self.active_features(), buffer)
    }
}

/// Opens the layout tables of a face.
pub trait TableSource {
    type Gdef: GlyphClasses + Clone;
    type Table: LayoutTable;

    fn load_gdef(&self) -> Result<Self::Gdef, TableError>;

    /// GSUB sees GDEF so lookups can skip glyphs by class.
    fn load_gsub(&self, gdef: Option<&Self::Gdef>) -> Result<Self::Table, TableError>;

    fn load_gpos(&self, gdef: Option<&Self::Gdef>) -> Result<Self::Table, TableError>;
}
