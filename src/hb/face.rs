//! Per-face OpenType state: which scripts the layout tables support, and
//! which features are switched on for the script being shaped.

use alloc::boxed::Box;
use alloc::vec::Vec;

use read_fonts::types::GlyphId;
use smallvec::SmallVec;

use super::common::{Script, ScriptRequirements, ShaperFlags};
use super::error::{ShapeError, TableError};
use super::font::FontFuncs;
use super::heuristics::{log_cluster, GlyphLayout};
use super::hb_tag_t;
use super::ot_layout::{
    ActiveFeature, FeatureProperties, GlyphClass, GlyphClasses, LayoutBuffer, LayoutTable,
    TableSource, DEFAULT_LANGUAGE_INDEX,
};

const DFLT_SCRIPT: hb_tag_t = hb_tag_t::new(b"DFLT");
const KERN: hb_tag_t = hb_tag_t::new(b"kern");

/// A GSUB feature an engine asks for, with the properties it is activated with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FeatureRequest {
    pub tag: hb_tag_t,
    pub properties: FeatureProperties,
}

impl FeatureRequest {
    pub const fn new(tag: &[u8; 4], properties: FeatureProperties) -> Self {
        Self {
            tag: hb_tag_t::new(tag),
            properties,
        }
    }
}

/// Features chosen for one script without touching any face state.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct FeatureSelection {
    pub gsub: SmallVec<[ActiveFeature; 8]>,
    pub gpos: SmallVec<[ActiveFeature; 16]>,
    /// Whether GPOS `kern` is among the selected features.
    pub has_kerning: bool,
}

/// The layout tables of a font and the feature state last selected on them.
///
/// [`select_script`] caches the selection keyed by script and flags, so a
/// face must not be shared between threads shaping different scripts. Use
/// [`feature_selection`] and [`apply_selection`] for the cache-free path.
///
/// [`select_script`]: hb_face_t::select_script
/// [`feature_selection`]: hb_face_t::feature_selection
/// [`apply_selection`]: hb_face_t::apply_selection
pub struct hb_face_t<'a> {
    gdef: Option<Box<dyn GlyphClasses + 'a>>,
    gsub: Option<Box<dyn LayoutTable + 'a>>,
    gpos: Option<Box<dyn LayoutTable + 'a>>,
    supported_scripts: [bool; Script::COUNT],
    current: Option<(Script, ShaperFlags)>,
    has_opentype_kerning: bool,
    buffer: LayoutBuffer,
}

fn loaded<T>(table: Result<T, TableError>) -> Option<T> {
    match table {
        Ok(table) => Some(table),
        Err(e) if e.is_missing() => {
            log::debug!("{e}");
            None
        }
        Err(e) => {
            log::warn!("{e}");
            None
        }
    }
}

// Index of `tag` in the table's script list, or of the default script.
fn script_index(table: &dyn LayoutTable, tag: hb_tag_t) -> Option<u16> {
    table
        .select_script(tag)
        .or_else(|| table.select_script(DFLT_SCRIPT))
}

impl<'a> hb_face_t<'a> {
    /// Opens GDEF, GSUB (seeing GDEF) and GPOS from `source`.
    ///
    /// Tables that fail to load are left out; only the scratch buffer
    /// allocation can fail.
    pub fn new<S>(source: &S) -> Result<Self, ShapeError>
    where
        S: TableSource,
        S::Gdef: 'a,
        S::Table: 'a,
    {
        let gdef = loaded(source.load_gdef());
        let gsub = loaded(source.load_gsub(gdef.as_ref()));
        let gpos = loaded(source.load_gpos(gdef.as_ref()));
        Self::from_tables(
            gdef.map(|t| Box::new(t) as Box<dyn GlyphClasses + 'a>),
            gsub.map(|t| Box::new(t) as Box<dyn LayoutTable + 'a>),
            gpos.map(|t| Box::new(t) as Box<dyn LayoutTable + 'a>),
        )
    }

    /// Builds a face over already opened tables.
    pub fn from_tables(
        gdef: Option<Box<dyn GlyphClasses + 'a>>,
        gsub: Option<Box<dyn LayoutTable + 'a>>,
        gpos: Option<Box<dyn LayoutTable + 'a>>,
    ) -> Result<Self, ShapeError> {
        let mut face = Self {
            gdef,
            gsub,
            gpos,
            supported_scripts: [false; Script::COUNT],
            current: None,
            has_opentype_kerning: false,
            buffer: LayoutBuffer::with_capacity(64)?,
        };
        for script in Script::ALL {
            if let Some(i) = script.index() {
                face.supported_scripts[i] = face.check_script(script);
            }
        }
        Ok(face)
    }

    fn check_script(&self, script: Script) -> bool {
        let Some(tag) = script.ot_tag() else {
            return false;
        };
        let requirements = script.requirements();
        let found = |table: &Option<Box<dyn LayoutTable + 'a>>| {
            table
                .as_deref()
                .and_then(|table| script_index(table, tag))
                .is_some()
        };
        if requirements.contains(ScriptRequirements::GSUB) && !found(&self.gsub) {
            return false;
        }
        if requirements.contains(ScriptRequirements::GPOS) && !found(&self.gpos) {
            return false;
        }
        true
    }

    pub fn supports_script(&self, script: Script) -> bool {
        script
            .index()
            .map(|i| self.supported_scripts[i])
            .unwrap_or(false)
    }

    pub fn has_gdef(&self) -> bool {
        self.gdef.is_some()
    }

    pub fn has_gsub(&self) -> bool {
        self.gsub.is_some()
    }

    pub fn has_gpos(&self) -> bool {
        self.gpos.is_some()
    }

    /// Whether the current selection switched on GPOS `kern`.
    pub fn has_opentype_kerning(&self) -> bool {
        self.has_opentype_kerning
    }

    /// Activates `features` in GSUB and every GPOS feature for `script`.
    ///
    /// Does nothing if the same script and flags were selected last time.
    pub fn select_script(
        &mut self,
        script: Script,
        flags: ShaperFlags,
        features: Option<&[FeatureRequest]>,
    ) {
        if self.current == Some((script, flags)) {
            return;
        }
        let selection = self.feature_selection(script, flags, features);
        if let Some(gsub) = self.gsub.as_deref_mut() {
            gsub.clear_features();
            for feature in &selection.gsub {
                gsub.add_feature(feature.index, feature.properties);
            }
        }
        if let Some(gpos) = self.gpos.as_deref_mut() {
            gpos.clear_features();
            for feature in &selection.gpos {
                gpos.add_feature(feature.index, feature.properties);
            }
        }
        self.has_opentype_kerning = selection.has_kerning;
        self.current = Some((script, flags));
    }

    /// Computes what [`select_script`](Self::select_script) would activate,
    /// without reading or writing the cache.
    pub fn feature_selection(
        &self,
        script: Script,
        flags: ShaperFlags,
        features: Option<&[FeatureRequest]>,
    ) -> FeatureSelection {
        let mut selection = FeatureSelection::default();
        let Some(tag) = script.resolve_inherited().ot_tag() else {
            return selection;
        };

        if let (Some(gsub), Some(features)) = (self.gsub.as_deref(), features) {
            if let Some(script_index) = script_index(gsub, tag) {
                for request in features {
                    if let Some(index) =
                        gsub.select_feature(request.tag, script_index, DEFAULT_LANGUAGE_INDEX)
                    {
                        selection.gsub.push(ActiveFeature {
                            index,
                            properties: request.properties,
                        });
                    }
                }
            }
        }

        if let Some(gpos) = self.gpos.as_deref() {
            if let Some(script_index) = script_index(gpos, tag) {
                let no_kerning = flags.contains(ShaperFlags::NO_KERNING);
                for feature in gpos.query_features(script_index, DEFAULT_LANGUAGE_INDEX) {
                    if feature == KERN && no_kerning {
                        continue;
                    }
                    let Some(index) =
                        gpos.select_feature(feature, script_index, DEFAULT_LANGUAGE_INDEX)
                    else {
                        continue;
                    };
                    selection.gpos.push(ActiveFeature {
                        index,
                        properties: FeatureProperties::POSITIONING,
                    });
                    if feature == KERN {
                        selection.has_kerning = true;
                    }
                }
            }
        }

        selection
    }

    /// Runs a cache-free selection over `buffer`. Returns whether GPOS
    /// positioned the glyphs.
    pub fn apply_selection(&self, selection: &FeatureSelection, buffer: &mut LayoutBuffer) -> bool {
        if let Some(gsub) = self.gsub.as_deref() {
            gsub.apply_features(&selection.gsub, buffer);
        }
        if buffer.clear_positions().is_err() {
            return false;
        }
        self.gpos
            .as_deref()
            .is_some_and(|gpos| gpos.apply_features(&selection.gpos, buffer))
    }

    fn glyph_class(&self, glyph: GlyphId) -> GlyphClass {
        self.gdef
            .as_deref()
            .map(|gdef| gdef.glyph_class(glyph))
            .unwrap_or_default()
    }

    /// Runs the selected features over a run that already carries heuristic
    /// attributes and log clusters.
    ///
    /// `glyphs` may grow or shrink. Attributes follow the glyph each output
    /// glyph came from, and log clusters are pointed at the first glyph of
    /// the cluster covering each code unit. Returns whether GPOS positioned
    /// the glyphs; when it did, advances include the GPOS adjustments.
    pub(crate) fn shape_run(
        &mut self,
        font: &dyn FontFuncs,
        glyphs: &mut Vec<GlyphLayout>,
        log_clusters: &mut [u16],
    ) -> Result<bool, ShapeError> {
        if (self.gsub.is_none() && self.gpos.is_none()) || glyphs.is_empty() {
            return Ok(false);
        }

        let mut buffer = core::mem::take(&mut self.buffer);
        buffer.clear();
        for (i, glyph) in glyphs.iter().enumerate() {
            buffer.push(glyph.glyph, i as u32, self.glyph_class(glyph.glyph))?;
        }

        if let Some(gsub) = self.gsub.as_deref() {
            gsub.apply(&mut buffer);
        }
        buffer.clear_positions()?;
        let positioned = self
            .gpos
            .as_deref()
            .is_some_and(|gpos| gpos.apply(&mut buffer));

        let mut shaped = Vec::new();
        shaped.try_reserve(buffer.len())?;
        for (i, info) in buffer.info.iter().enumerate() {
            let source = glyphs
                .get(info.cluster as usize)
                .copied()
                .unwrap_or_default();
            let mut attributes = source.attributes;
            if i > 0 && buffer.info[i - 1].cluster == info.cluster {
                attributes.cluster_start = false;
            }
            if self.glyph_class(info.glyph_id) == GlyphClass::Mark {
                attributes.mark = true;
                attributes.cluster_start = false;
            }
            shaped.push(GlyphLayout {
                glyph: info.glyph_id,
                attributes,
                ..GlyphLayout::default()
            });
        }

        remap_log_clusters(&buffer, &shaped, log_clusters)?;

        font.get_metrics(&mut shaped);
        for (glyph, pos) in shaped.iter_mut().zip(&buffer.pos) {
            if glyph.attributes.mark {
                glyph.advance.x = 0;
            }
            if positioned {
                glyph.advance.x += pos.x_advance;
                glyph.advance.y += pos.y_advance;
                glyph.offset.x = pos.x_offset;
                glyph.offset.y = pos.y_offset;
            }
        }

        *glyphs = shaped;
        self.buffer = buffer;
        Ok(positioned)
    }
}

// Each log cluster pointed at a pre-substitution glyph; point it at the
// cluster start at or before the first output glyph produced from it.
fn remap_log_clusters(
    buffer: &LayoutBuffer,
    shaped: &[GlyphLayout],
    log_clusters: &mut [u16],
) -> Result<(), ShapeError> {
    if shaped.is_empty() {
        log_clusters.fill(0);
        return Ok(());
    }
    for cluster in log_clusters.iter_mut() {
        let source = *cluster as u32;
        let mut i = buffer
            .info
            .iter()
            .position(|info| info.cluster >= source)
            .unwrap_or(shaped.len() - 1);
        while i > 0 && !(shaped[i].attributes.cluster_start && !shaped[i].attributes.mark) {
            i -= 1;
        }
        *cluster = log_cluster(i)?;
    }
    Ok(())
}
