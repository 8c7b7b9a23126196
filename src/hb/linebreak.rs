//! Line-break opportunities and cursor stops for UTF-16 text.
//!
//! This is a pair-table implementation of the Unicode line-breaking
//! algorithm. The table is tailored: some pairs the standard treats as direct
//! breaks are indirect here, see the comments inside [`BREAK_TABLE`].

use icu_properties::props::LineBreak;

use super::unicode::{is_high_surrogate, is_low_surrogate, surrogate_to_ucs4, CharExt, Codepoint};

/// Line-breaking class of a code point.
///
/// The first 26 classes index [`BREAK_TABLE`]; the rest are resolved before a
/// table lookup. Ordering matters: the algorithm compares classes with `>=`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum LineBreakClass {
    OP,
    CL,
    QU,
    GL,
    NS,
    EX,
    SY,
    IS,
    PR,
    PO,
    NU,
    AL,
    ID,
    IN,
    HY,
    BA,
    BB,
    B2,
    ZW,
    CM,
    WJ,
    H2,
    H3,
    JL,
    JV,
    JT,
    SA,
    SG,
    SP,
    CR,
    LF,
    BK,
}

/// The break decision recorded after a code unit.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash)]
pub enum LineBreakType {
    #[default]
    NoBreak,
    /// A break is allowed after a soft hyphen; a hyphen should be shown.
    SoftHyphen,
    Break,
    ForcedBreak,
}

/// Per-code-unit result of the attribute pass.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash)]
pub struct CharAttributes {
    /// Break opportunity after this code unit.
    pub line_break_type: LineBreakType,
    pub white_space: bool,
    /// Whether the cursor may stop before this code unit.
    pub char_stop: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BreakAction {
    /// Break between the pair.
    Direct,
    /// Break only if spaces separated the pair.
    Indirect,
    /// A combining mark after spaces: the break moves before the spaces.
    CombiningIndirect,
    /// A combining mark that never allows a break.
    CombiningProhibited,
    Prohibited,
}

use BreakAction::{
    CombiningIndirect as CI, CombiningProhibited as CP, Direct as DB, Indirect as IB,
    Prohibited as PB,
};

const TABLE_SIZE: usize = LineBreakClass::SA as usize;

// The following line-break classes are not treated by the table:
//  SA, SG, SP, CR, LF, BK.
//
// Changed from the standard algorithm (DB -> IB):
//   EX->AL, SY->AL, SY->PO, SY->PR, SY->OP, AL->PR, AL->PO, PR->PR,
//   PO->PO, PR->PO, PO->PR, HY->PO, HY->PR, HY->OP, EX->PO
// and (PB -> IB): NU->EX.
#[rustfmt::skip]
static BREAK_TABLE: [[BreakAction; TABLE_SIZE]; TABLE_SIZE] = [
    /*          OP  CL  QU  GL  NS  EX  SY  IS  PR  PO  NU  AL  ID  IN  HY  BA  BB  B2  ZW  CM  WJ  H2  H3  JL  JV  JT */
    /* OP */ [ PB, PB, PB, PB, PB, PB, PB, PB, PB, PB, PB, PB, PB, PB, PB, PB, PB, PB, PB, CP, PB, PB, PB, PB, PB, PB ],
    /* CL */ [ DB, PB, IB, IB, PB, PB, PB, PB, IB, IB, IB, IB, DB, DB, IB, IB, DB, DB, PB, CI, PB, DB, DB, DB, DB, DB ],
    /* QU */ [ PB, PB, IB, IB, IB, PB, PB, PB, IB, IB, IB, IB, IB, IB, IB, IB, IB, IB, PB, CI, PB, IB, IB, IB, IB, IB ],
    /* GL */ [ IB, PB, IB, IB, IB, PB, PB, PB, IB, IB, IB, IB, IB, IB, IB, IB, IB, IB, PB, CI, PB, IB, IB, IB, IB, IB ],
    /* NS */ [ DB, PB, IB, IB, IB, PB, PB, PB, DB, DB, DB, DB, DB, DB, IB, IB, DB, DB, PB, CI, PB, DB, DB, DB, DB, DB ],
    /* EX */ [ DB, PB, IB, IB, IB, PB, PB, PB, DB, IB, DB, IB, DB, DB, IB, IB, DB, DB, PB, CI, PB, DB, DB, DB, DB, DB ],
    /* SY */ [ IB, PB, IB, IB, IB, PB, PB, PB, IB, IB, IB, IB, DB, DB, IB, IB, DB, DB, PB, CI, PB, DB, DB, DB, DB, DB ],
    /* IS */ [ DB, PB, IB, IB, IB, PB, PB, PB, DB, DB, IB, IB, DB, DB, IB, IB, DB, DB, PB, CI, PB, DB, DB, DB, DB, DB ],
    /* PR */ [ IB, PB, IB, IB, IB, PB, PB, PB, IB, IB, IB, IB, IB, DB, IB, IB, DB, DB, PB, CI, PB, IB, IB, IB, IB, IB ],
    /* PO */ [ IB, PB, IB, IB, IB, PB, PB, PB, IB, IB, IB, IB, DB, DB, IB, IB, DB, DB, PB, CI, PB, DB, DB, DB, DB, DB ],
    /* NU */ [ IB, PB, IB, IB, IB, IB, PB, PB, IB, IB, IB, IB, DB, IB, IB, IB, DB, DB, PB, CI, PB, DB, DB, DB, DB, DB ],
    /* AL */ [ IB, PB, IB, IB, IB, PB, PB, PB, IB, IB, IB, IB, DB, IB, IB, IB, DB, DB, PB, CI, PB, DB, DB, DB, DB, DB ],
    /* ID */ [ DB, PB, IB, IB, IB, PB, PB, PB, DB, IB, DB, DB, DB, IB, IB, IB, DB, DB, PB, CI, PB, DB, DB, DB, DB, DB ],
    /* IN */ [ DB, PB, IB, IB, IB, PB, PB, PB, DB, DB, DB, DB, DB, IB, IB, IB, DB, DB, PB, CI, PB, DB, DB, DB, DB, DB ],
    /* HY */ [ IB, PB, IB, IB, IB, PB, PB, PB, IB, IB, IB, DB, DB, DB, IB, IB, DB, DB, PB, CI, PB, DB, DB, DB, DB, DB ],
    /* BA */ [ DB, PB, IB, IB, IB, PB, PB, PB, DB, DB, DB, DB, DB, DB, IB, IB, DB, DB, PB, CI, PB, DB, DB, DB, DB, DB ],
    /* BB */ [ IB, PB, IB, IB, IB, PB, PB, PB, IB, IB, IB, IB, IB, IB, IB, IB, IB, IB, PB, CI, PB, IB, IB, IB, IB, IB ],
    /* B2 */ [ DB, PB, IB, IB, IB, PB, PB, PB, DB, DB, DB, DB, DB, DB, IB, IB, DB, PB, PB, CI, PB, DB, DB, DB, DB, DB ],
    /* ZW */ [ DB, DB, DB, DB, DB, DB, DB, DB, DB, DB, DB, DB, DB, DB, DB, DB, DB, DB, PB, DB, DB, DB, DB, DB, DB, DB ],
    /* CM */ [ DB, PB, IB, IB, IB, PB, PB, PB, DB, DB, IB, IB, DB, IB, IB, IB, DB, DB, PB, CI, PB, DB, DB, DB, DB, DB ],
    /* WJ */ [ IB, PB, IB, IB, IB, PB, PB, PB, IB, IB, IB, IB, IB, IB, IB, IB, IB, IB, PB, CI, PB, IB, IB, IB, IB, IB ],
    /* H2 */ [ DB, PB, IB, IB, IB, PB, PB, PB, DB, IB, DB, DB, DB, IB, IB, IB, DB, DB, PB, CI, PB, DB, DB, DB, IB, IB ],
    /* H3 */ [ DB, PB, IB, IB, IB, PB, PB, PB, DB, IB, DB, DB, DB, IB, IB, IB, DB, DB, PB, CI, PB, DB, DB, DB, DB, IB ],
    /* JL */ [ DB, PB, IB, IB, IB, PB, PB, PB, DB, IB, DB, DB, DB, IB, IB, IB, DB, DB, PB, CI, PB, IB, IB, IB, IB, DB ],
    /* JV */ [ DB, PB, IB, IB, IB, PB, PB, PB, DB, IB, DB, DB, DB, IB, IB, IB, DB, DB, PB, CI, PB, DB, DB, DB, IB, IB ],
    /* JT */ [ DB, PB, IB, IB, IB, PB, PB, PB, DB, IB, DB, DB, DB, IB, IB, IB, DB, DB, PB, CI, PB, DB, DB, DB, DB, IB ],
];

/// Returns the line-break class used by this algorithm for a code point.
///
/// Classes the table does not know about are folded into the closest one it
/// does: NL is a mandatory break, CP closes like CL, ZWJ combines like CM and
/// CJ behaves as NS. Everything unclassified (XX, AI, CB, HL, RI, ...) is AL.
pub fn line_break_class(u: Codepoint) -> LineBreakClass {
    use LineBreakClass::*;
    match u.line_break() {
        LineBreak::OpenPunctuation => OP,
        LineBreak::ClosePunctuation | LineBreak::CloseParenthesis => CL,
        LineBreak::Quotation => QU,
        LineBreak::Glue => GL,
        LineBreak::Nonstarter | LineBreak::ConditionalJapaneseStarter => NS,
        LineBreak::Exclamation => EX,
        LineBreak::BreakSymbols => SY,
        LineBreak::InfixNumeric => IS,
        LineBreak::PrefixNumeric => PR,
        LineBreak::PostfixNumeric => PO,
        LineBreak::Numeric => NU,
        LineBreak::Ideographic | LineBreak::EBase | LineBreak::EModifier => ID,
        LineBreak::Inseparable => IN,
        LineBreak::Hyphen => HY,
        LineBreak::BreakAfter => BA,
        LineBreak::BreakBefore => BB,
        LineBreak::BreakBoth => B2,
        LineBreak::ZWSpace => ZW,
        LineBreak::CombiningMark | LineBreak::ZWJ => CM,
        LineBreak::WordJoiner => WJ,
        LineBreak::H2 => H2,
        LineBreak::H3 => H3,
        LineBreak::JL => JL,
        LineBreak::JV => JV,
        LineBreak::JT => JT,
        LineBreak::ComplexContext => SA,
        LineBreak::Surrogate => SG,
        LineBreak::Space => SP,
        LineBreak::CarriageReturn => CR,
        LineBreak::LineFeed => LF,
        LineBreak::MandatoryBreak | LineBreak::NextLine => BK,
        _ => AL,
    }
}

// Class of the code unit at `i`, resolving a surrogate pair that starts there.
// Unpaired surrogates are treated as AL.
fn class_at(string: &[u16], i: usize) -> LineBreakClass {
    let u = string[i];
    if is_high_surrogate(u) {
        if let Some(&low) = string.get(i + 1) {
            if is_low_surrogate(low) {
                return line_break_class(surrogate_to_ucs4(u, low));
            }
        }
        return LineBreakClass::AL;
    }
    match line_break_class(u as Codepoint) {
        LineBreakClass::SG => LineBreakClass::AL,
        cls => cls,
    }
}

#[inline]
fn is_white_space(cls: LineBreakClass) -> bool {
    cls >= LineBreakClass::SP
}

/// Computes break opportunities, white space and cursor stops for `string`.
///
/// `attributes` receives one entry per code unit; `attributes[i]` describes
/// the break after unit `i`. The last entry is always a forced break.
pub fn calc_line_breaks(string: &[u16], attributes: &mut [CharAttributes]) {
    use LineBreakClass::*;

    debug_assert_eq!(string.len(), attributes.len());
    let len = string.len().min(attributes.len());
    if len == 0 {
        return;
    }

    let mut cls = class_at(string, 0);
    if cls == LF {
        cls = BK;
    }
    attributes[0] = CharAttributes {
        line_break_type: LineBreakType::NoBreak,
        white_space: is_white_space(cls),
        char_stop: true,
    };
    let mut lcls = cls;

    for i in 1..len {
        let u = string[i];

        // The pair was classified at its high half.
        if is_low_surrogate(u) && is_high_surrogate(string[i - 1]) {
            attributes[i] = CharAttributes {
                line_break_type: LineBreakType::NoBreak,
                white_space: false,
                char_stop: false,
            };
            attributes[i - 1].line_break_type = LineBreakType::NoBreak;
            continue;
        }

        let mut ncls = class_at(string, i);
        // The cursor stops before a pair even if it holds a combining mark.
        let starts_pair =
            is_high_surrogate(u) && string.get(i + 1).is_some_and(|&l| is_low_surrogate(l));
        attributes[i].white_space = is_white_space(ncls);
        attributes[i].char_stop = starts_pair || ncls != CM;

        let forced = cls >= LF || (cls == CR && ncls != LF);
        let mut line_break_type = if forced {
            LineBreakType::ForcedBreak
        } else {
            LineBreakType::NoBreak
        };

        let update_class = if ncls == SP {
            false
        } else if forced || ncls >= CR {
            true
        } else if cls == SA && ncls == SA {
            // Complex-context scripts break per character until a script
            // attribute engine refines the result.
            line_break_type = LineBreakType::Break;
            true
        } else {
            if cls >= SA {
                cls = ID;
            }
            if ncls >= SA {
                ncls = ID;
            }

            match BREAK_TABLE[cls as usize][ncls as usize] {
                DB => {
                    line_break_type = if string[i - 1] == 0x00AD {
                        LineBreakType::SoftHyphen
                    } else {
                        LineBreakType::Break
                    };
                    true
                }
                IB => {
                    if lcls == SP {
                        line_break_type = LineBreakType::Break;
                    }
                    true
                }
                CI => {
                    if lcls == SP {
                        if i > 1 {
                            attributes[i - 2].line_break_type = LineBreakType::Break;
                        }
                        true
                    } else {
                        false
                    }
                }
                CP => lcls == SP,
                PB => true,
            }
        };

        if update_class {
            cls = ncls;
        }
        lcls = ncls;
        attributes[i - 1].line_break_type = line_break_type;
    }

    attributes[len - 1].line_break_type = LineBreakType::ForcedBreak;
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    fn breaks(s: &str) -> Vec<LineBreakType> {
        let string: Vec<u16> = s.encode_utf16().collect();
        let mut attributes = vec![CharAttributes::default(); string.len()];
        calc_line_breaks(&string, &mut attributes);
        attributes.iter().map(|a| a.line_break_type).collect()
    }

    #[test]
    fn table_covers_the_table_classes() {
        assert_eq!(TABLE_SIZE, 26);
        assert_eq!(BREAK_TABLE[LineBreakClass::OP as usize][LineBreakClass::CM as usize], CP);
        assert_eq!(BREAK_TABLE[LineBreakClass::ZW as usize][LineBreakClass::ZW as usize], PB);
        assert_eq!(BREAK_TABLE[LineBreakClass::NU as usize][LineBreakClass::EX as usize], IB);
        assert_eq!(BREAK_TABLE[LineBreakClass::EX as usize][LineBreakClass::NU as usize], DB);
    }

    #[test]
    fn classes() {
        assert_eq!(line_break_class(0x0028), LineBreakClass::OP);
        assert_eq!(line_break_class(0x0029), LineBreakClass::CL);
        assert_eq!(line_break_class(0x0020), LineBreakClass::SP);
        assert_eq!(line_break_class(0x000A), LineBreakClass::LF);
        assert_eq!(line_break_class(0x000D), LineBreakClass::CR);
        assert_eq!(line_break_class(0x0085), LineBreakClass::BK);
        assert_eq!(line_break_class(0x2028), LineBreakClass::BK);
        assert_eq!(line_break_class(0x0031), LineBreakClass::NU);
        assert_eq!(line_break_class(0x0061), LineBreakClass::AL);
        assert_eq!(line_break_class(0x0E01), LineBreakClass::SA);
        assert_eq!(line_break_class(0x0301), LineBreakClass::CM);
        assert_eq!(line_break_class(0x200B), LineBreakClass::ZW);
        assert_eq!(line_break_class(0x4E00), LineBreakClass::ID);
    }

    #[test]
    fn empty_input_writes_nothing() {
        let mut attributes: [CharAttributes; 0] = [];
        calc_line_breaks(&[], &mut attributes);
    }

    #[test]
    fn last_is_always_forced() {
        assert_eq!(breaks("a"), [LineBreakType::ForcedBreak]);
        assert_eq!(breaks("(("), [LineBreakType::NoBreak, LineBreakType::ForcedBreak]);
    }

    #[test]
    fn forced_after_newlines() {
        use LineBreakType::*;
        assert_eq!(breaks("a\nb"), [NoBreak, ForcedBreak, ForcedBreak]);
        assert_eq!(breaks("a\r\nb"), [NoBreak, NoBreak, ForcedBreak, ForcedBreak]);
        assert_eq!(breaks("a\rb"), [NoBreak, ForcedBreak, ForcedBreak]);
        assert_eq!(breaks("\nb"), [ForcedBreak, ForcedBreak]);
    }

    #[test]
    fn soft_hyphen() {
        use LineBreakType::*;
        // AL SHY(BA) AL: the break after the soft hyphen is a soft-hyphen break.
        assert_eq!(breaks("a\u{AD}b"), [NoBreak, SoftHyphen, ForcedBreak]);
    }

    #[test]
    fn combining_mark_after_space_moves_break() {
        use LineBreakType::*;
        // AL SP CM AL: the break goes before the space.
        assert_eq!(breaks("a \u{301}b"), [Break, NoBreak, NoBreak, ForcedBreak]);
    }

    #[test]
    fn complex_context_breaks_between_characters() {
        use LineBreakType::*;
        assert_eq!(breaks("\u{E01}\u{E02}"), [Break, ForcedBreak]);
    }

    #[test]
    fn white_space_and_char_stops() {
        let string: Vec<u16> = "a \u{301}\n".encode_utf16().collect();
        let mut attributes = vec![CharAttributes::default(); string.len()];
        calc_line_breaks(&string, &mut attributes);
        let white: Vec<bool> = attributes.iter().map(|a| a.white_space).collect();
        let stops: Vec<bool> = attributes.iter().map(|a| a.char_stop).collect();
        assert_eq!(white, [false, true, false, true]);
        assert_eq!(stops, [true, true, false, true]);
    }

    #[test]
    fn surrogate_pair_is_one_unit() {
        use LineBreakType::*;
        // U+2F825 is ideographic: breaks around it, never inside.
        let string = [0x0061, 0xD87E, 0xDC25, 0x0062];
        let mut attributes = [CharAttributes::default(); 4];
        calc_line_breaks(&string, &mut attributes);
        let types: Vec<_> = attributes.iter().map(|a| a.line_break_type).collect();
        assert_eq!(types, [Break, NoBreak, Break, ForcedBreak]);
        let stops: Vec<_> = attributes.iter().map(|a| a.char_stop).collect();
        assert_eq!(stops, [true, true, false, true]);
    }

    #[test]
    fn unpaired_surrogate_is_alphabetic() {
        use LineBreakType::*;
        let string = [0x0061, 0xDC25, 0x0062];
        let mut attributes = [CharAttributes::default(); 3];
        calc_line_breaks(&string, &mut attributes);
        let types: Vec<_> = attributes.iter().map(|a| a.line_break_type).collect();
        assert_eq!(types, [NoBreak, NoBreak, ForcedBreak]);
        assert!(attributes.iter().all(|a| a.char_stop));
    }
}
