use read_fonts::{
    tables::{
        cmap::{Cmap, CmapSubtable, PlatformId},
        gdef::Gdef,
        glyf::Glyf,
        gpos::Gpos,
        gsub::Gsub,
        hmtx::Hmtx,
        loca::Loca,
    },
    types::{GlyphId, Tag},
    FontRef, ReadError, TableProvider, TopLevelTable,
};

use super::common::Fixed;
use super::error::TableError;
use super::font::{FontFuncs, GlyphExtents};
use super::ot::{OtGdef, OtLayoutTable};
use super::ot_layout::TableSource;
use super::unicode::Codepoint;

// https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#windows-platform-platform-id--3
const WINDOWS_SYMBOL_ENCODING: u16 = 0;
const WINDOWS_UNICODE_BMP_ENCODING: u16 = 1;
const WINDOWS_UNICODE_FULL_ENCODING: u16 = 10;

// https://docs.microsoft.com/en-us/typography/opentype/spec/name#platform-specific-encoding-and-language-ids-unicode-platform-platform-id--0
const UNICODE_1_0_ENCODING: u16 = 0;
const UNICODE_1_1_ENCODING: u16 = 1;
const UNICODE_ISO_ENCODING: u16 = 2;
const UNICODE_2_0_BMP_ENCODING: u16 = 3;
const UNICODE_2_0_FULL_ENCODING: u16 = 4;
const UNICODE_FULL_ENCODING: u16 = 6;

/// [`FontFuncs`] over the tables of an OpenType font, scaled to a pixel size.
#[derive(Clone)]
pub struct OtFont<'a> {
    cmap: Option<CmapSubtable<'a>>,
    is_symbol: bool,
    hmtx: Option<Hmtx<'a>>,
    outlines: Option<(Loca<'a>, Glyf<'a>)>,
    units_per_em: u16,
    ascender: i16,
    /// Pixels per em in 26.6.
    ppem: Fixed,
}

impl<'a> OtFont<'a> {
    /// Reads the mapping and metrics tables of `font` for rendering at
    /// `ppem` pixels per em. Missing tables degrade to empty mappings and
    /// zero metrics.
    pub fn new(font: &FontRef<'a>, ppem: u16) -> Self {
        let cmap = font
            .cmap()
            .ok()
            .and_then(|cmap| find_best_cmap_subtable(&cmap));
        let is_symbol = cmap.as_ref().is_some_and(|(platform, encoding, _)| {
            *platform == PlatformId::Windows && *encoding == WINDOWS_SYMBOL_ENCODING
        });
        let head = font.head().ok();
        let units_per_em = head
            .as_ref()
            .map(|head| head.units_per_em())
            .filter(|&upem| upem != 0)
            .unwrap_or(1000);
        let outlines = head.and_then(|head| {
            let loca = font.loca(head.index_to_loc_format() == 1).ok()?;
            let glyf = font.glyf().ok()?;
            Some((loca, glyf))
        });
        let ascender = font
            .os2()
            .map(|os2| os2.s_typo_ascender())
            .or_else(|_| font.hhea().map(|hhea| hhea.ascender().to_i16()))
            .unwrap_or_default();
        Self {
            cmap: cmap.map(|(_, _, subtable)| subtable),
            is_symbol,
            hmtx: font.hmtx().ok(),
            outlines,
            units_per_em,
            ascender,
            ppem: ppem as Fixed * 64,
        }
    }

    fn scale(&self, units: i32) -> Fixed {
        ((units as i64 * self.ppem as i64) / self.units_per_em as i64) as Fixed
    }

    fn map(&self, c: Codepoint) -> Option<GlyphId> {
        match self.cmap.as_ref()? {
            CmapSubtable::Format4(subtable) => subtable.map_codepoint(c),
            CmapSubtable::Format12(subtable) => subtable.map_codepoint(c),
            _ => None,
        }
        .filter(|glyph| *glyph != GlyphId::NOTDEF)
    }
}

impl FontFuncs for OtFont<'_> {
    fn nominal_glyph(&self, c: Codepoint) -> Option<GlyphId> {
        let glyph = self.map(c);
        if glyph.is_none() && self.is_symbol && c <= 0x00FF {
            // Symbol fonts map the Latin-1 range into the private use area.
            return self.map(0xF000 + c);
        }
        glyph
    }

    fn advance(&self, glyph: GlyphId) -> Fixed {
        let Some(hmtx) = self.hmtx.as_ref() else {
            return 0;
        };
        let metrics = hmtx.h_metrics();
        let index = (glyph.to_u32() as usize).min(metrics.len().saturating_sub(1));
        metrics
            .get(index)
            .map(|metric| self.scale(metric.advance() as i32))
            .unwrap_or_default()
    }

    fn glyph_extents(&self, glyph: GlyphId) -> GlyphExtents {
        let Some((loca, glyf)) = self.outlines.as_ref() else {
            return GlyphExtents::default();
        };
        match loca.get_glyf(glyph, glyf) {
            Ok(Some(outline)) => GlyphExtents {
                x_min: self.scale(outline.x_min() as i32),
                y_min: self.scale(outline.y_min() as i32),
                x_max: self.scale(outline.x_max() as i32),
                y_max: self.scale(outline.y_max() as i32),
            },
            _ => GlyphExtents::default(),
        }
    }

    fn ascent(&self) -> Fixed {
        self.scale(self.ascender as i32)
    }

    fn is_symbol(&self) -> bool {
        self.is_symbol
    }
}

fn find_best_cmap_subtable<'a>(cmap: &Cmap<'a>) -> Option<(PlatformId, u16, CmapSubtable<'a>)> {
    // Symbol subtable.
    // Prefer symbol if available.
    find_cmap_subtable(cmap, PlatformId::Windows, WINDOWS_SYMBOL_ENCODING)
        // 32-bit subtables:
        .or_else(|| find_cmap_subtable(cmap, PlatformId::Windows, WINDOWS_UNICODE_FULL_ENCODING))
        .or_else(|| find_cmap_subtable(cmap, PlatformId::Unicode, UNICODE_FULL_ENCODING))
        .or_else(|| find_cmap_subtable(cmap, PlatformId::Unicode, UNICODE_2_0_FULL_ENCODING))
        // 16-bit subtables:
        .or_else(|| find_cmap_subtable(cmap, PlatformId::Windows, WINDOWS_UNICODE_BMP_ENCODING))
        .or_else(|| find_cmap_subtable(cmap, PlatformId::Unicode, UNICODE_2_0_BMP_ENCODING))
        .or_else(|| find_cmap_subtable(cmap, PlatformId::Unicode, UNICODE_ISO_ENCODING))
        .or_else(|| find_cmap_subtable(cmap, PlatformId::Unicode, UNICODE_1_1_ENCODING))
        .or_else(|| find_cmap_subtable(cmap, PlatformId::Unicode, UNICODE_1_0_ENCODING))
}

fn find_cmap_subtable<'a>(
    cmap: &Cmap<'a>,
    platform_id: PlatformId,
    encoding_id: u16,
) -> Option<(PlatformId, u16, CmapSubtable<'a>)> {
    let offset_data = cmap.offset_data();
    for record in cmap.encoding_records() {
        if record.platform_id() != platform_id || record.encoding_id() != encoding_id {
            continue;
        }
        if let Ok(subtable) = record.subtable(offset_data) {
            if matches!(
                subtable,
                CmapSubtable::Format4(_) | CmapSubtable::Format12(_)
            ) {
                return Some((platform_id, encoding_id, subtable));
            }
        }
    }
    None
}

fn load<T>(tag: Tag, table: Result<T, ReadError>) -> Result<T, TableError> {
    table.map_err(|error| TableError::from_read_error(tag, error))
}

impl<'a> TableSource for FontRef<'a> {
    type Gdef = OtGdef<'a>;
    type Table = OtLayoutTable<'a>;

    fn load_gdef(&self) -> Result<OtGdef<'a>, TableError> {
        load(Gdef::TAG, self.gdef()).map(|gdef| OtGdef::new(&gdef))
    }

    fn load_gsub(&self, gdef: Option<&OtGdef<'a>>) -> Result<OtLayoutTable<'a>, TableError> {
        load(Gsub::TAG, self.gsub()).map(|gsub| OtLayoutTable::gsub(gsub, gdef.cloned()))
    }

    fn load_gpos(&self, gdef: Option<&OtGdef<'a>>) -> Result<OtLayoutTable<'a>, TableError> {
        load(Gpos::TAG, self.gpos()).map(|gpos| OtLayoutTable::gpos(gpos, gdef.cloned()))
    }
}
