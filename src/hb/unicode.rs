use icu_properties::props::{GeneralCategory, LineBreak};
use icu_properties::CodePointMapData;

pub type Codepoint = u32;

pub mod combining_class {
    pub const NotReordered: u8 = 0;

    /* Arabic */
    pub const CCC27: u8 = 27;
    pub const CCC36: u8 = 36;

    /* Thai */
    pub const CCC103: u8 = 103;
    pub const CCC107: u8 = 107;

    /* Lao */
    pub const CCC118: u8 = 118;
    pub const CCC122: u8 = 122;

    pub const AttachedBelowLeft: u8 = 200;
    pub const AttachedBelow: u8 = 202;
    pub const AttachedBelowRight: u8 = 204;
    pub const AttachedLeft: u8 = 208;
    pub const AttachedRight: u8 = 210;
    pub const AttachedAboveLeft: u8 = 212;
    pub const AttachedAbove: u8 = 214;
    pub const AttachedAboveRight: u8 = 216;
    pub const BelowLeft: u8 = 218;
    pub const Below: u8 = 220;
    pub const BelowRight: u8 = 222;
    pub const Left: u8 = 224;
    pub const Right: u8 = 226;
    pub const AboveLeft: u8 = 228;
    pub const Above: u8 = 230;
    pub const AboveRight: u8 = 232;
    pub const DoubleBelow: u8 = 233;
    pub const DoubleAbove: u8 = 234;
}

pub trait CharExt {
    fn general_category(self) -> GeneralCategory;
    fn line_break(self) -> LineBreak;
    fn combining_class(self) -> u8;
    fn is_control_char(self) -> bool;
    fn is_non_spacing_mark(self) -> bool;
}

impl CharExt for Codepoint {
    fn general_category(self) -> GeneralCategory {
        CodePointMapData::<GeneralCategory>::new().get32(self)
    }

    fn line_break(self) -> LineBreak {
        CodePointMapData::<LineBreak>::new().get32(self)
    }

    fn combining_class(self) -> u8 {
        char::from_u32(self).map_or(combining_class::NotReordered, |c| {
            unicode_normalization::char::canonical_combining_class(c)
        })
    }

    // Zero-width formatting and bidi controls that never get ink.
    fn is_control_char(self) -> bool {
        matches!(self, 0x200B..=0x200F | 0x2028..=0x202F | 0x206A..=0x206F)
    }

    fn is_non_spacing_mark(self) -> bool {
        self.general_category() == GeneralCategory::NonspacingMark
    }
}

#[inline]
pub const fn is_high_surrogate(u: u16) -> bool {
    u & 0xFC00 == 0xD800
}

#[inline]
pub const fn is_low_surrogate(u: u16) -> bool {
    u & 0xFC00 == 0xDC00
}

#[inline]
pub const fn surrogate_to_ucs4(high: u16, low: u16) -> Codepoint {
    ((high as u32) << 10) + low as u32 - 0x035F_DC00
}

/// Decodes the scalar starting at `i`; returns it and the number of code units used.
///
/// Unpaired surrogates decode to themselves.
#[inline]
pub fn decode_utf16_at(string: &[u16], i: usize) -> (Codepoint, usize) {
    let u = string[i];
    if is_high_surrogate(u) {
        if let Some(&low) = string.get(i + 1) {
            if is_low_surrogate(low) {
                return (surrogate_to_ucs4(u, low), 2);
            }
        }
    }
    (u as Codepoint, 1)
}

pub const S_BASE: u32 = 0xAC00;
pub const L_BASE: u32 = 0x1100;
pub const V_BASE: u32 = 0x1161;
pub const T_BASE: u32 = 0x11A7;
pub const L_COUNT: u32 = 19;
pub const V_COUNT: u32 = 21;
pub const T_COUNT: u32 = 28;
pub const N_COUNT: u32 = V_COUNT * T_COUNT;
pub const S_COUNT: u32 = L_COUNT * N_COUNT;

pub fn compose_hangul(a: Codepoint, b: Codepoint) -> Option<Codepoint> {
    let l = a;
    let v = b;
    if L_BASE <= l && l < (L_BASE + L_COUNT) && V_BASE <= v && v < (V_BASE + V_COUNT) {
        let r = S_BASE + (l - L_BASE) * N_COUNT + (v - V_BASE) * T_COUNT;
        Some(r)
    } else if S_BASE <= l
        && l <= (S_BASE + S_COUNT - T_COUNT)
        && T_BASE < v
        && v < (T_BASE + T_COUNT)
        && (l - S_BASE) % T_COUNT == 0
    {
        let r = l + (v - T_BASE);
        Some(r)
    } else {
        None
    }
}

#[inline]
pub fn is_hangul_syllable(u: Codepoint) -> bool {
    (S_BASE..S_BASE + S_COUNT).contains(&u)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surrogates() {
        assert!(is_high_surrogate(0xD87E));
        assert!(is_low_surrogate(0xDC25));
        assert!(!is_high_surrogate(0xDC25));
        assert_eq!(surrogate_to_ucs4(0xD87E, 0xDC25), 0x2F825);
        assert_eq!(decode_utf16_at(&[0xD87E, 0xDC25], 0), (0x2F825, 2));
        assert_eq!(decode_utf16_at(&[0xD87E, 0x0061], 0), (0xD87E, 1));
        assert_eq!(decode_utf16_at(&[0xDC25], 0), (0xDC25, 1));
    }

    #[test]
    fn hangul_composition() {
        // HIEUH + A = HA, HA + NIEUN = HAN
        assert_eq!(compose_hangul(0x1112, 0x1161), Some(0xD558));
        assert_eq!(compose_hangul(0xD558, 0x11AB), Some(0xD55C));
        // T_BASE itself is not a trailing consonant.
        assert_eq!(compose_hangul(0xD558, T_BASE), None);
        // LVT syllables take no further trailing consonant.
        assert_eq!(compose_hangul(0xD55C, 0x11AB), None);
    }

    #[test]
    fn properties() {
        assert_eq!(0x0301u32.general_category(), GeneralCategory::NonspacingMark);
        assert_eq!(0x0020u32.general_category(), GeneralCategory::SpaceSeparator);
        assert_eq!(0x0301u32.combining_class(), combining_class::Above);
        assert_eq!(0x0316u32.combining_class(), combining_class::Below);
        assert_eq!(0x0E31u32.combining_class(), 0);
        assert!(0x200Bu32.is_control_char());
        assert!(0x202Eu32.is_control_char());
        assert!(!0x0041u32.is_control_char());
    }
}
