//! A five-glyph TrueType font assembled in memory.
//!
//! Glyphs: 0 `.notdef`, 1 `a`, 2 `b`, 3 `A`, 4 U+0301 (a GDEF mark).
//!
//! GSUB:
//! - `latn` enables `ccmp`, which maps `a` to `A` and skips marks (format 1, delta +2).
//! - `DFLT` enables `liga`, which maps `b` to `A` (format 2).
//!
//! GPOS only has `DFLT` with an empty `kern`.

use std::collections::BTreeMap;

pub const NOTDEF: u32 = 0;
pub const LOWER_A: u32 = 1;
pub const LOWER_B: u32 = 2;
pub const UPPER_A: u32 = 3;
pub const ACUTE: u32 = 4;

const IGNORE_MARKS: u16 = 0x0008;

pub struct Fixture {
    pub units_per_em: u16,
    /// Use a Windows symbol cmap with the Latin-1 range at U+F0xx.
    pub symbol: bool,
}

impl Default for Fixture {
    fn default() -> Self {
        Self {
            units_per_em: 1000,
            symbol: false,
        }
    }
}

fn words(values: &[u16]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_be_bytes()).collect()
}

/// A ScriptList or FeatureList: tagged records with offsets from the list start.
fn tagged_list(records: &[(&[u8; 4], Vec<u8>)]) -> Vec<u8> {
    let mut header = words(&[records.len() as u16]);
    let mut body = Vec::new();
    let mut offset = 2 + 6 * records.len();
    for (tag, data) in records {
        header.extend_from_slice(*tag);
        header.extend(words(&[offset as u16]));
        offset += data.len();
        body.extend_from_slice(data);
    }
    header.extend(body);
    header
}

/// A script whose default language system enables `features`.
fn script(features: &[u16]) -> Vec<u8> {
    let mut data = words(&[4, 0, 0, 0xFFFF, features.len() as u16]);
    data.extend(words(features));
    data
}

fn feature(lookups: &[u16]) -> Vec<u8> {
    let mut data = words(&[0, lookups.len() as u16]);
    data.extend(words(lookups));
    data
}

fn coverage(glyphs: &[u16]) -> Vec<u8> {
    let mut data = words(&[1, glyphs.len() as u16]);
    data.extend(words(glyphs));
    data
}

fn single_subst_delta(glyphs: &[u16], delta: i16) -> Vec<u8> {
    let mut data = words(&[1, 6, delta as u16]);
    data.extend(coverage(glyphs));
    data
}

fn single_subst_array(glyph: u16, substitute: u16) -> Vec<u8> {
    let mut data = words(&[2, 8, 1, substitute]);
    data.extend(coverage(&[glyph]));
    data
}

fn lookup(flags: u16, subtable: Vec<u8>) -> Vec<u8> {
    let mut data = words(&[1, flags, 1, 8]);
    data.extend(subtable);
    data
}

fn lookup_list(lookups: &[Vec<u8>]) -> Vec<u8> {
    let mut header = words(&[lookups.len() as u16]);
    let mut offset = 2 + 2 * lookups.len();
    for lookup in lookups {
        header.extend(words(&[offset as u16]));
        offset += lookup.len();
    }
    for lookup in lookups {
        header.extend_from_slice(lookup);
    }
    header
}

fn layout_table(scripts: Vec<u8>, features: Vec<u8>, lookups: Vec<u8>) -> Vec<u8> {
    let feature_offset = 10 + scripts.len();
    let lookup_offset = feature_offset + features.len();
    let mut data = words(&[1, 0, 10, feature_offset as u16, lookup_offset as u16]);
    data.extend(scripts);
    data.extend(features);
    data.extend(lookups);
    data
}

fn gsub() -> Vec<u8> {
    layout_table(
        tagged_list(&[(b"DFLT", script(&[1])), (b"latn", script(&[0]))]),
        tagged_list(&[(b"ccmp", feature(&[0])), (b"liga", feature(&[1]))]),
        lookup_list(&[
            lookup(
                IGNORE_MARKS,
                single_subst_delta(&[LOWER_A as u16, ACUTE as u16], 2),
            ),
            lookup(0, single_subst_array(LOWER_B as u16, UPPER_A as u16)),
        ]),
    )
}

fn gpos() -> Vec<u8> {
    layout_table(
        tagged_list(&[(b"DFLT", script(&[0]))]),
        tagged_list(&[(b"kern", feature(&[]))]),
        lookup_list(&[]),
    )
}

fn gdef() -> Vec<u8> {
    // Header, then a format 2 ClassDef: glyphs 1..=3 base, 4 mark.
    words(&[1, 0, 12, 0, 0, 0, 2, 2, 1, 3, 1, 4, 4, 3])
}

/// A format 4 cmap subtable from `(first, last, first glyph)` segments.
fn cmap(encoding: u16, segments: &[(u16, u16, u16)]) -> Vec<u8> {
    let mut segments = segments.to_vec();
    segments.push((0xFFFF, 0xFFFF, 0));
    let seg_count = segments.len() as u16;
    let entry_selector = 15 - seg_count.leading_zeros() as u16;
    let search_range = 2 << entry_selector;
    let mut subtable = words(&[
        4,
        16 + 8 * seg_count,
        0,
        seg_count * 2,
        search_range,
        entry_selector,
        seg_count * 2 - search_range,
    ]);
    subtable.extend(words(&segments.iter().map(|s| s.1).collect::<Vec<_>>()));
    subtable.extend(words(&[0]));
    subtable.extend(words(&segments.iter().map(|s| s.0).collect::<Vec<_>>()));
    let deltas: Vec<u16> = segments
        .iter()
        .map(|&(first, _, glyph)| {
            if first == 0xFFFF {
                1
            } else {
                glyph.wrapping_sub(first)
            }
        })
        .collect();
    subtable.extend(words(&deltas));
    subtable.extend(words(&vec![0u16; segments.len()]));

    let mut data = words(&[0, 1, 3, encoding, 0, 12]);
    data.extend(subtable);
    data
}

fn head(units_per_em: u16) -> Vec<u8> {
    let mut data = words(&[1, 0, 1, 0, 0, 0, 0x5F0F, 0x3CF5, 0, units_per_em]);
    data.extend([0; 16]);
    data.extend(words(&[0, 0, 0, 0, 0, 8, 2, 0, 0]));
    data
}

fn hhea(num_metrics: u16) -> Vec<u8> {
    let mut data = words(&[1, 0, 800, (-200i16) as u16, 0, 600, 0, 0, 600, 1, 0, 0]);
    data.extend([0; 8]);
    data.extend(words(&[0, num_metrics]));
    data
}

impl Fixture {
    pub fn build(&self) -> Vec<u8> {
        let advances = [500, 500, 550, 600, 0];
        let hmtx: Vec<u8> = advances
            .iter()
            .flat_map(|&advance| words(&[advance, 0]))
            .collect();
        let maxp = words(&[0x0000, 0x5000, advances.len() as u16]);
        let cmap_table = if self.symbol {
            cmap(0, &[(0xF041, 0xF041, UPPER_A as u16)])
        } else {
            cmap(
                1,
                &[
                    (0x41, 0x41, UPPER_A as u16),
                    (0x61, 0x62, LOWER_A as u16),
                    (0x301, 0x301, ACUTE as u16),
                ],
            )
        };

        let mut tables: BTreeMap<[u8; 4], Vec<u8>> = BTreeMap::new();
        tables.insert(*b"GDEF", gdef());
        tables.insert(*b"GPOS", gpos());
        tables.insert(*b"GSUB", gsub());
        tables.insert(*b"cmap", cmap_table);
        tables.insert(*b"head", head(self.units_per_em));
        tables.insert(*b"hhea", hhea(advances.len() as u16));
        tables.insert(*b"hmtx", hmtx);
        tables.insert(*b"maxp", maxp);
        sfnt(&tables)
    }
}

fn sfnt(tables: &BTreeMap<[u8; 4], Vec<u8>>) -> Vec<u8> {
    let num_tables = tables.len() as u16;
    let mut data = words(&[0x0001, 0x0000, num_tables, 0, 0, 0]);
    let mut offset = 12 + 16 * tables.len();
    let mut body = Vec::new();
    for (tag, table) in tables {
        data.extend_from_slice(tag);
        data.extend(0u32.to_be_bytes());
        data.extend((offset as u32).to_be_bytes());
        data.extend((table.len() as u32).to_be_bytes());
        body.extend_from_slice(table);
        while body.len() % 4 != 0 {
            body.push(0);
        }
        offset = 12 + 16 * tables.len() + body.len();
    }
    data.extend(body);
    data
}
