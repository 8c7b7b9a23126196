mod fixture;

use fixture::{Fixture, ACUTE, LOWER_A, LOWER_B, NOTDEF, UPPER_A};
use harfshape::{
    shape_item, ActiveFeature, Face, FeatureProperties, FontFuncs, FontRef, GlyphExtents, GlyphId,
    GlyphLayout, OtFont, Script, ShaperFlags, ShaperItem, BASIC_FEATURES,
};

const PPEM: u16 = 10;

fn shape(
    font: &OtFont,
    face: &mut Face,
    text: &str,
    script: Script,
) -> (Vec<u32>, Vec<GlyphLayout>, Vec<u16>) {
    let string: Vec<u16> = text.encode_utf16().collect();
    let mut glyphs = vec![GlyphLayout::default(); string.len() + 4];
    let mut log_clusters = vec![0; string.len()];
    let mut item = ShaperItem::new(&string, script, font, &mut glyphs, &mut log_clusters)
        .with_face(face);
    let n = shape_item(&mut item).unwrap();
    glyphs.truncate(n);
    let ids = glyphs.iter().map(|g| g.glyph.to_u32()).collect();
    (ids, glyphs, log_clusters)
}

#[test]
fn cmap_maps_through_format_4() {
    let data = Fixture::default().build();
    let font = OtFont::new(&FontRef::new(&data).unwrap(), PPEM);
    assert_eq!(font.nominal_glyph('a' as u32), Some(GlyphId::new(LOWER_A)));
    assert_eq!(font.nominal_glyph('b' as u32), Some(GlyphId::new(LOWER_B)));
    assert_eq!(font.nominal_glyph('A' as u32), Some(GlyphId::new(UPPER_A)));
    assert_eq!(font.nominal_glyph(0x301), Some(GlyphId::new(ACUTE)));
    assert_eq!(font.nominal_glyph('z' as u32), None);
    assert!(!font.is_symbol());
}

#[test]
fn symbol_cmap_retries_in_private_use_area() {
    let data = Fixture {
        symbol: true,
        ..Fixture::default()
    }
    .build();
    let font = OtFont::new(&FontRef::new(&data).unwrap(), PPEM);
    assert!(font.is_symbol());
    assert_eq!(font.nominal_glyph('A' as u32), Some(GlyphId::new(UPPER_A)));
    assert_eq!(font.nominal_glyph('B' as u32), None);
}

#[test]
fn metrics_scale_to_ppem() {
    let data = Fixture::default().build();
    let font = OtFont::new(&FontRef::new(&data).unwrap(), PPEM);
    // 500 units at 10px on a 1000 unit em is 5px.
    assert_eq!(font.advance(GlyphId::new(LOWER_A)), 5 * 64);
    assert_eq!(font.advance(GlyphId::new(UPPER_A)), 6 * 64);
    assert_eq!(font.advance(GlyphId::new(ACUTE)), 0);
    // No OS/2, so the hhea ascender of 800 units.
    assert_eq!(font.ascent(), 8 * 64);
    // No glyf.
    assert_eq!(font.glyph_extents(GlyphId::new(LOWER_A)), GlyphExtents::default());
}

#[test]
fn zero_units_per_em_reads_as_1000() {
    let data = Fixture {
        units_per_em: 0,
        ..Fixture::default()
    }
    .build();
    let font = OtFont::new(&FontRef::new(&data).unwrap(), PPEM);
    assert_eq!(font.advance(GlyphId::new(LOWER_B)), 352);
}

#[test]
fn face_loads_all_layout_tables() {
    let data = Fixture::default().build();
    let font = FontRef::new(&data).unwrap();
    let face = Face::new(&font).unwrap();
    assert!(face.has_gdef());
    assert!(face.has_gsub());
    assert!(face.has_gpos());

    // `hebr` and `hang` are not in GSUB, but DFLT is.
    assert!(face.supports_script(Script::Common));
    assert!(face.supports_script(Script::Hebrew));
    assert!(face.supports_script(Script::Hangul));
    assert!(!face.supports_script(Script::Inherited));
}

#[test]
fn features_come_from_the_script_or_dflt() {
    let data = Fixture::default().build();
    let face = Face::new(&FontRef::new(&data).unwrap()).unwrap();

    let latin =
        face.feature_selection(Script::Common, ShaperFlags::empty(), Some(BASIC_FEATURES));
    assert_eq!(
        latin.gsub.as_slice(),
        [ActiveFeature {
            index: 0,
            properties: FeatureProperties::CCMP
        }]
    );
    // GPOS has only DFLT, which carries `kern`.
    assert_eq!(
        latin.gpos.as_slice(),
        [ActiveFeature {
            index: 0,
            properties: FeatureProperties::POSITIONING
        }]
    );
    assert!(latin.has_kerning);

    let greek =
        face.feature_selection(Script::Greek, ShaperFlags::empty(), Some(BASIC_FEATURES));
    assert_eq!(
        greek.gsub.as_slice(),
        [ActiveFeature {
            index: 1,
            properties: FeatureProperties::CCMP
        }]
    );

    let unkerned = face.feature_selection(Script::Common, ShaperFlags::NO_KERNING, None);
    assert!(unkerned.gsub.is_empty());
    assert!(unkerned.gpos.is_empty());
    assert!(!unkerned.has_kerning);
}

#[test]
fn single_substitution_formats_apply() {
    let data = Fixture::default().build();
    let font_ref = FontRef::new(&data).unwrap();
    let font = OtFont::new(&font_ref, PPEM);
    let mut face = Face::new(&font_ref).unwrap();

    // ccmp under latn, format 1.
    let (ids, glyphs, log_clusters) = shape(&font, &mut face, "ab", Script::Common);
    assert_eq!(ids, [UPPER_A, LOWER_B]);
    assert_eq!(log_clusters, [0, 1]);
    assert_eq!(glyphs[0].advance.x, 6 * 64);

    // liga under DFLT, format 2.
    let (ids, _, _) = shape(&font, &mut face, "ab", Script::Greek);
    assert_eq!(ids, [LOWER_A, UPPER_A]);
}

#[test]
fn substitution_skips_gdef_marks() {
    let data = Fixture::default().build();
    let font_ref = FontRef::new(&data).unwrap();
    let font = OtFont::new(&font_ref, PPEM);
    let mut face = Face::new(&font_ref).unwrap();

    // The ccmp lookup covers the acute but ignores marks.
    let (ids, glyphs, log_clusters) = shape(&font, &mut face, "a\u{301}", Script::Common);
    assert_eq!(ids, [UPPER_A, ACUTE]);
    assert_eq!(log_clusters, [0, 0]);
    assert!(glyphs[0].attributes.cluster_start);
    assert!(glyphs[1].attributes.mark);
    assert!(!glyphs[1].attributes.cluster_start);
    assert_eq!(glyphs[1].advance.x, 0);
}

#[test]
fn unmapped_text_is_notdef() {
    let data = Fixture::default().build();
    let font_ref = FontRef::new(&data).unwrap();
    let font = OtFont::new(&font_ref, PPEM);
    let mut face = Face::new(&font_ref).unwrap();
    let (ids, _, _) = shape(&font, &mut face, "z", Script::Common);
    assert_eq!(ids, [NOTDEF]);
}
