//! Character classes of the OData ABNF
//!
//! Each class is a set of code points built from ranges, with unions
//! mirroring how the grammar composes its classes (`unreserved` is
//! `ALPHA / DIGIT / "-" / "." / "_" / "~"`, and so on). Identifier classes
//! additionally admit Unicode letters and marks by general category.
//!
//! Percent-encoded triplets are not single code points; [`pct_allowed`]
//! decides which encoded octets each pct-encoded variant admits.

use std::sync::OnceLock;
use unicode_general_category::{get_general_category, GeneralCategory};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RangeSet {
    /// Sorted, non-overlapping ranges stored as (start, end) inclusive
    ranges: Vec<(char, char)>,
}

impl Default for RangeSet {
    fn default() -> Self {
        Self::new()
    }
}

impl RangeSet {
    /// Create an empty RangeSet
    pub fn new() -> Self {
        RangeSet { ranges: Vec::new() }
    }

    /// Create a RangeSet from the given characters
    pub fn from_chars(chars: &str) -> Self {
        let mut set = RangeSet::new();
        for ch in chars.chars() {
            set.ranges.push((ch, ch));
        }
        set.normalize();
        set
    }

    /// Create a RangeSet from a range
    pub fn from_range(start: char, end: char) -> Self {
        if start <= end {
            RangeSet {
                ranges: vec![(start, end)],
            }
        } else {
            RangeSet::new()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Add a range to the set
    pub fn add_range(&mut self, start: char, end: char) {
        if start > end {
            return;
        }
        self.ranges.push((start, end));
        self.normalize();
    }

    /// Normalize ranges: sort and merge overlapping/adjacent ranges
    fn normalize(&mut self) {
        if self.ranges.len() <= 1 {
            return;
        }
        self.ranges.sort_by_key(|r| r.0);
        let mut merged = Vec::with_capacity(self.ranges.len());
        let mut current = self.ranges[0];

        for &(start, end) in &self.ranges[1..] {
            if start as u32 <= current.1 as u32 + 1 {
                current.1 = current.1.max(end);
            } else {
                merged.push(current);
                current = (start, end);
            }
        }
        merged.push(current);
        self.ranges = merged;
    }

    /// Union of two RangeSets
    pub fn union(&self, other: &RangeSet) -> RangeSet {
        let mut result = self.clone();
        result.ranges.extend_from_slice(&other.ranges);
        result.normalize();
        result
    }

    /// Subtract other from self (self - other)
    pub fn minus(&self, other: &RangeSet) -> RangeSet {
        let mut result = self.clone();

        for &(sub_start, sub_end) in &other.ranges {
            let mut new_ranges = Vec::new();

            for &(start, end) in &result.ranges {
                if sub_end < start || sub_start > end {
                    new_ranges.push((start, end));
                } else {
                    if start < sub_start {
                        new_ranges
                            .push((start, char::from_u32(sub_start as u32 - 1).unwrap_or(start)));
                    }
                    if end > sub_end {
                        new_ranges.push((char::from_u32(sub_end as u32 + 1).unwrap_or(end), end));
                    }
                }
            }
            result.ranges = new_ranges;
        }
        result.normalize();
        result
    }

    /// Check if the set contains a character
    pub fn contains(&self, ch: char) -> bool {
        self.ranges
            .binary_search_by(|&(start, end)| {
                if end < ch {
                    std::cmp::Ordering::Less
                } else if start > ch {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }

    /// Get the number of ranges in this set
    pub fn num_ranges(&self) -> usize {
        self.ranges.len()
    }
}

/// Named single-code-point classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    Alpha,
    Digit,
    Hexdig,
    Unreserved,
    OtherDelims,
    SubDelims,
    /// pchar without its pct-encoded alternative
    Pchar,
    /// pchar-no-SQUOTE without pct-encoded
    PcharNoSquote,
    /// qchar-no-AMP without pct-encoded
    QcharNoAmp,
    QcharNoAmpEq,
    QcharNoAmpEqAtDollar,
    QcharNoAmpDquote,
    QcharUnescaped,
    QcharJsonSpecial,
    Vchar,
    ObsText,
    Etagc,
    Tchar,
    Qdtext,
    Base64,
    /// RFC 3986 `scheme` continuation characters
    SchemeChar,
}

impl CharClass {
    /// Code points of this class
    pub fn ranges(self) -> &'static RangeSet {
        static TABLE: OnceLock<Vec<RangeSet>> = OnceLock::new();
        let table = TABLE.get_or_init(build_table);
        &table[self as usize]
    }

    pub fn contains(self, ch: char) -> bool {
        self.ranges().contains(ch)
    }
}

fn build_table() -> Vec<RangeSet> {
    let alpha = RangeSet::from_range('A', 'Z').union(&RangeSet::from_range('a', 'z'));
    let digit = RangeSet::from_range('0', '9');
    let hexdig = digit
        .union(&RangeSet::from_range('A', 'F'))
        .union(&RangeSet::from_range('a', 'f'));
    let unreserved = alpha.union(&digit).union(&RangeSet::from_chars("-._~"));
    let other_delims = RangeSet::from_chars("!()*+,;");
    let sub_delims = other_delims.union(&RangeSet::from_chars("$&'="));
    let pchar = unreserved.union(&sub_delims).union(&RangeSet::from_chars(":@"));
    let pchar_no_squote = pchar.minus(&RangeSet::from_chars("'"));
    let qchar_no_amp = unreserved
        .union(&other_delims)
        .union(&RangeSet::from_chars(":@/?$'="));
    let qchar_no_amp_eq = qchar_no_amp.minus(&RangeSet::from_chars("="));
    let qchar_no_amp_eq_at_dollar = qchar_no_amp_eq.minus(&RangeSet::from_chars("@$"));
    // qchar-no-AMP-DQUOTE admits the same literal characters as qchar-no-AMP
    let qchar_no_amp_dquote = qchar_no_amp.clone();
    let qchar_unescaped = qchar_no_amp.clone();
    let qchar_json_special = RangeSet::from_chars(" :{}[]");
    let vchar = RangeSet::from_range('\u{21}', '\u{7E}');
    let obs_text = RangeSet::from_range('\u{80}', char::MAX);
    let etagc = RangeSet::from_range('\u{21}', '\u{21}')
        .union(&RangeSet::from_range('\u{23}', '\u{7E}'))
        .union(&obs_text);
    let tchar = alpha.union(&digit).union(&RangeSet::from_chars("!#$%&'*+-.^_`|~"));
    let qdtext = RangeSet::from_chars("\t !")
        .union(&RangeSet::from_range('\u{23}', '\u{5B}'))
        .union(&RangeSet::from_range('\u{5D}', '\u{7E}'))
        .union(&obs_text);
    let base64 = alpha.union(&digit).union(&RangeSet::from_chars("-_"));
    let scheme_char = alpha.union(&digit).union(&RangeSet::from_chars("+-."));

    // order matches the CharClass discriminants
    vec![
        alpha,
        digit,
        hexdig,
        unreserved,
        other_delims,
        sub_delims,
        pchar,
        pchar_no_squote,
        qchar_no_amp,
        qchar_no_amp_eq,
        qchar_no_amp_eq_at_dollar,
        qchar_no_amp_dquote,
        qchar_unescaped,
        qchar_json_special,
        vchar,
        obs_text,
        etagc,
        tchar,
        qdtext,
        base64,
        scheme_char,
    ]
}

pub fn is_alpha(ch: char) -> bool {
    ch.is_ascii_alphabetic()
}

pub fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

pub fn is_hexdig(ch: char) -> bool {
    ch.is_ascii_hexdigit()
}

/// identifierLeadingCharacter: ALPHA, "_", or a Unicode letter (L, Nl)
pub fn is_identifier_leading(ch: char) -> bool {
    if ch.is_ascii() {
        return ch.is_ascii_alphabetic() || ch == '_';
    }
    matches!(
        get_general_category(ch),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
            | GeneralCategory::LetterNumber
    )
}

/// identifierCharacter: leading characters plus digits, marks, connectors and format chars
pub fn is_identifier_char(ch: char) -> bool {
    if ch.is_ascii() {
        return ch.is_ascii_alphanumeric() || ch == '_';
    }
    is_identifier_leading(ch)
        || matches!(
            get_general_category(ch),
            GeneralCategory::DecimalNumber
                | GeneralCategory::NonspacingMark
                | GeneralCategory::SpacingMark
                | GeneralCategory::ConnectorPunctuation
                | GeneralCategory::Format
        )
}

/// Which pct-encoded octets a pct-encoded variant admits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PctVariant {
    /// pct-encoded
    Any,
    /// pct-encoded-no-SQUOTE: excludes %27
    NoSquote,
    /// pct-encoded-no-DQUOTE: excludes %22
    NoDquote,
    /// pct-encoded-unescaped: excludes %22 and %5C
    Unescaped,
}

pub fn pct_allowed(variant: PctVariant, octet: u8) -> bool {
    match variant {
        PctVariant::Any => true,
        PctVariant::NoSquote => octet != 0x27,
        PctVariant::NoDquote => octet != 0x22,
        PctVariant::Unescaped => octet != 0x22 && octet != 0x5C,
    }
}

/// Decode a HEXDIG pair
pub fn hex_pair(hi: u8, lo: u8) -> Option<u8> {
    let hi = (hi as char).to_digit(16)?;
    let lo = (lo as char).to_digit(16)?;
    Some((hi * 16 + lo) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rangeset_union_merges() {
        let set = RangeSet::from_range('a', 'c').union(&RangeSet::from_range('d', 'f'));
        assert_eq!(set.num_ranges(), 1);
        assert!(set.contains('e'));
        assert!(!set.contains('g'));
    }

    #[test]
    fn test_rangeset_minus() {
        let set = RangeSet::from_range('a', 'z').minus(&RangeSet::from_chars("m"));
        assert_eq!(set.num_ranges(), 2);
        assert!(set.contains('l'));
        assert!(!set.contains('m'));
        assert!(set.contains('n'));
    }

    #[test]
    fn test_core_classes() {
        assert!(CharClass::Alpha.contains('Q'));
        assert!(!CharClass::Alpha.contains('1'));
        assert!(CharClass::Hexdig.contains('f'));
        assert!(!CharClass::Hexdig.contains('g'));
        assert!(CharClass::Unreserved.contains('~'));
        assert!(!CharClass::Unreserved.contains('!'));
        assert!(CharClass::SubDelims.contains('\''));
        assert!(CharClass::OtherDelims.contains(';'));
    }

    #[test]
    fn test_composed_classes() {
        assert!(CharClass::Pchar.contains('@'));
        assert!(CharClass::Pchar.contains('\''));
        assert!(!CharClass::PcharNoSquote.contains('\''));
        assert!(CharClass::QcharNoAmp.contains('/'));
        assert!(!CharClass::QcharNoAmp.contains('&'));
        assert!(!CharClass::QcharNoAmpEq.contains('='));
        assert!(!CharClass::QcharNoAmpEqAtDollar.contains('$'));
        assert!(CharClass::QcharNoAmpEqAtDollar.contains('\''));
        assert!(!CharClass::Etagc.contains('"'));
        assert!(CharClass::Etagc.contains('é'));
    }

    #[test]
    fn test_identifier_classes() {
        assert!(is_identifier_leading('_'));
        assert!(is_identifier_leading('Ä'));
        assert!(!is_identifier_leading('1'));
        assert!(is_identifier_char('1'));
        assert!(!is_identifier_char('-'));
        assert!(!is_identifier_char('.'));
    }

    #[test]
    fn test_pct_variants() {
        assert!(pct_allowed(PctVariant::Any, 0x27));
        assert!(!pct_allowed(PctVariant::NoSquote, 0x27));
        assert!(!pct_allowed(PctVariant::Unescaped, 0x5C));
        assert_eq!(hex_pair(b'2', b'F'), Some(0x2F));
        assert_eq!(hex_pair(b'2', b'G'), None);
    }
}
