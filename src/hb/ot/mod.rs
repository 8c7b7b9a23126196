//! [`LayoutTable`] over the GSUB and GPOS tables of a [`FontRef`].
//!
//! [`FontRef`]: read_fonts::FontRef

use alloc::vec::Vec;

use read_fonts::tables::{
    gdef::Gdef,
    gpos::Gpos,
    gsub::{ClassDef, FeatureList, Gsub, ScriptList},
    layout::{Feature, LangSys, Script},
};
use read_fonts::types::{GlyphId, GlyphId16};
use smallvec::SmallVec;

use super::hb_tag_t;
use super::ot_layout::{
    ActiveFeature, FeatureProperties, GlyphClass, GlyphClasses, LayoutBuffer, LayoutTable,
    DEFAULT_LANGUAGE_INDEX,
};

pub mod gsub;
pub mod lookup;

/// Glyph classes from a GDEF table.
#[derive(Clone, Default)]
pub struct OtGdef<'a> {
    classes: Option<ClassDef<'a>>,
}

impl<'a> OtGdef<'a> {
    pub fn new(gdef: &Gdef<'a>) -> Self {
        Self {
            classes: gdef.glyph_class_def().transpose().ok().flatten(),
        }
    }

    pub fn has_glyph_classes(&self) -> bool {
        self.classes.is_some()
    }
}

impl GlyphClasses for OtGdef<'_> {
    fn glyph_class(&self, glyph: GlyphId) -> GlyphClass {
        let Ok(glyph) = GlyphId16::try_from(glyph) else {
            return GlyphClass::Unclassified;
        };
        self.classes
            .as_ref()
            .map(|class_def| GlyphClass::from_gdef(class_def.get(glyph)))
            .unwrap_or_default()
    }
}

#[derive(Clone)]
enum TableKind<'a> {
    Gsub(Gsub<'a>),
    Gpos(Gpos<'a>),
}

impl<'a> TableKind<'a> {
    fn script_list(&self) -> Option<ScriptList<'a>> {
        match self {
            Self::Gsub(gsub) => gsub.script_list().ok(),
            Self::Gpos(gpos) => gpos.script_list().ok(),
        }
    }

    fn feature_list(&self) -> Option<FeatureList<'a>> {
        match self {
            Self::Gsub(gsub) => gsub.feature_list().ok(),
            Self::Gpos(gpos) => gpos.feature_list().ok(),
        }
    }

    fn script(&self, index: u16) -> Option<Script<'a>> {
        self.script_list()?
            .get(index)
            .ok()
            .map(|script| script.element)
    }

    fn langsys(&self, script_index: u16, language_index: u16) -> Option<LangSys<'a>> {
        let script = self.script(script_index)?;
        if language_index == DEFAULT_LANGUAGE_INDEX {
            script.default_lang_sys().transpose().ok().flatten()
        } else {
            let record = script.lang_sys_records().get(language_index as usize)?;
            record.lang_sys(script.offset_data()).ok()
        }
    }

    fn feature(&self, index: u16) -> Option<Feature<'a>> {
        self.feature_list()?
            .get(index)
            .ok()
            .map(|feature| feature.element)
    }

    fn feature_tag(&self, index: u16) -> Option<hb_tag_t> {
        self.feature_list()?
            .feature_records()
            .get(index as usize)
            .map(|record| record.feature_tag())
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Gsub(_) => "GSUB",
            Self::Gpos(_) => "GPOS",
        }
    }
}

/// A GSUB or GPOS table with its activation state.
///
/// Feature selection covers the whole table. Application runs single
/// substitutions from GSUB; GPOS lookups are left to the heuristic
/// positioner, so applying GPOS reports the run as unpositioned.
#[derive(Clone)]
pub struct OtLayoutTable<'a> {
    table: TableKind<'a>,
    gdef: Option<OtGdef<'a>>,
    active: Vec<ActiveFeature>,
}

impl<'a> OtLayoutTable<'a> {
    pub fn gsub(table: Gsub<'a>, gdef: Option<OtGdef<'a>>) -> Self {
        Self {
            table: TableKind::Gsub(table),
            gdef,
            active: Vec::new(),
        }
    }

    pub fn gpos(table: Gpos<'a>, gdef: Option<OtGdef<'a>>) -> Self {
        Self {
            table: TableKind::Gpos(table),
            gdef,
            active: Vec::new(),
        }
    }

    fn lookups(&self, features: &[ActiveFeature]) -> Vec<(u16, FeatureProperties)> {
        let mut lookups = Vec::new();
        for active in features {
            let Some(feature) = self.table.feature(active.index) else {
                continue;
            };
            lookups.extend(
                feature
                    .lookup_list_indices()
                    .iter()
                    .map(|index| (index.get(), active.properties)),
            );
        }
        merge_lookups(&mut lookups);
        lookups
    }
}

/// Sorts lookups into lookup-list order, merging the properties of
/// duplicates.
fn merge_lookups(lookups: &mut Vec<(u16, FeatureProperties)>) {
    lookups.sort_unstable_by_key(|(index, _)| *index);
    lookups.dedup_by(|next, kept| {
        if next.0 == kept.0 {
            kept.1 |= next.1;
            true
        } else {
            false
        }
    });
}

impl LayoutTable for OtLayoutTable<'_> {
    fn select_script(&self, tag: hb_tag_t) -> Option<u16> {
        self.table
            .script_list()?
            .script_records()
            .iter()
            .position(|record| record.script_tag() == tag)
            .map(|index| index as u16)
    }

    fn select_feature(
        &self,
        tag: hb_tag_t,
        script_index: u16,
        language_index: u16,
    ) -> Option<u16> {
        let langsys = self.table.langsys(script_index, language_index)?;
        langsys
            .feature_indices()
            .iter()
            .map(|index| index.get())
            .find(|&index| self.table.feature_tag(index) == Some(tag))
    }

    fn query_features(&self, script_index: u16, language_index: u16) -> SmallVec<[hb_tag_t; 16]> {
        let Some(langsys) = self.table.langsys(script_index, language_index) else {
            return SmallVec::new();
        };
        langsys
            .feature_indices()
            .iter()
            .filter_map(|index| self.table.feature_tag(index.get()))
            .collect()
    }

    fn clear_features(&mut self) {
        self.active.clear();
    }

    fn add_feature(&mut self, feature_index: u16, properties: FeatureProperties) {
        self.active.push(ActiveFeature {
            index: feature_index,
            properties,
        });
    }

    fn active_features(&self) -> &[ActiveFeature] {
        &self.active
    }

    fn apply_features(&self, features: &[ActiveFeature], buffer: &mut LayoutBuffer) -> bool {
        if features.is_empty() || buffer.is_empty() {
            return false;
        }
        let lookups = self.lookups(features);
        match &self.table {
            TableKind::Gsub(gsub) => gsub::apply_lookups(gsub, self.gdef.as_ref(), &lookups, buffer),
            TableKind::Gpos(_) => {
                log::trace!(
                    "{}: {} lookups left to heuristic positioning",
                    self.table.name(),
                    lookups.len()
                );
                false
            }
        }
    }
}
