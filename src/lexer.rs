//! Scanning helper for terminals that are runs of characters
//!
//! Literal terminals are matched directly against their spellings. Terminals
//! such as identifiers, digit runs or quoted-string bodies are recognized by
//! small scanner functions driving a [`Lexer`]: a byte position over the
//! remaining input with a few `eat_*` primitives that either consume and
//! return `true`, or leave the position alone and return `false`.

use crate::charclass::{self, CharClass, PctVariant};

/// Diagnostic text for `%` not followed by two hex digits
pub const INCOMPLETE_PCT: &str = "incomplete percent-encoding";

/// Scanner for one terminal rule; on success the lexer position is the match length
pub type Scanner = fn(&mut Lexer<'_>) -> bool;

pub struct Lexer<'s> {
    input: &'s str,
    pos: usize,
    malformed: Option<(usize, &'static str)>,
}

impl<'s> Lexer<'s> {
    pub fn new(input: &'s str) -> Self {
        Self {
            input,
            pos: 0,
            malformed: None,
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn reset(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn rest(&self) -> &'s str {
        &self.input[self.pos..]
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// First malformed-input finding, as (offset, reason)
    pub fn malformed(&self) -> Option<(usize, &'static str)> {
        self.malformed
    }

    fn note_malformed(&mut self, offset: usize, reason: &'static str) {
        if self.malformed.is_none() {
            self.malformed = Some((offset, reason));
        }
    }

    /// Consume one char matching `pred`
    pub fn eat(&mut self, pred: impl Fn(char) -> bool) -> bool {
        match self.peek() {
            Some(ch) if pred(ch) => {
                self.pos += ch.len_utf8();
                true
            }
            _ => false,
        }
    }

    pub fn eat_char(&mut self, expected: char) -> bool {
        self.eat(|ch| ch == expected)
    }

    pub fn eat_class(&mut self, class: CharClass) -> bool {
        self.eat(|ch| class.contains(ch))
    }

    /// Consume `s` exactly
    pub fn eat_str(&mut self, s: &str) -> bool {
        if self.rest().starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    /// Consume `s` ignoring ASCII case
    pub fn eat_str_ci(&mut self, s: &str) -> bool {
        match self.rest().get(..s.len()) {
            Some(head) if head.eq_ignore_ascii_case(s) => {
                self.pos += s.len();
                true
            }
            _ => false,
        }
    }

    /// Consume `"%" HEXDIG HEXDIG` whose octet the variant admits.
    ///
    /// A `%` without two hex digits is recorded as malformed input.
    pub fn eat_pct(&mut self, variant: PctVariant) -> bool {
        let bytes = self.rest().as_bytes();
        if bytes.first() != Some(&b'%') {
            return false;
        }
        let octet = match (bytes.get(1), bytes.get(2)) {
            (Some(&hi), Some(&lo)) => charclass::hex_pair(hi, lo),
            _ => None,
        };
        match octet {
            Some(octet) if charclass::pct_allowed(variant, octet) => {
                self.pos += 3;
                true
            }
            Some(_) => false,
            None => {
                self.note_malformed(self.pos, INCOMPLETE_PCT);
                false
            }
        }
    }

    /// Consume a character given either literally or percent-encoded, e.g. `'` or `%27`
    pub fn eat_encoded(&mut self, plain: char, encoded: &str) -> bool {
        self.eat_char(plain) || self.eat_str_ci(encoded)
    }

    /// Run `f` and rewind if it fails
    pub fn attempt(&mut self, f: impl FnOnce(&mut Self) -> bool) -> bool {
        let start = self.pos;
        if f(self) {
            true
        } else {
            self.pos = start;
            false
        }
    }

    /// Apply `f` between `min` and `max` times (greedy); rewinds when fewer than `min` match
    pub fn repeat(&mut self, min: usize, max: Option<usize>, mut f: impl FnMut(&mut Self) -> bool) -> bool {
        let start = self.pos;
        let mut count = 0;
        while max.map_or(true, |max| count < max) {
            let before = self.pos;
            if !f(self) {
                self.pos = before;
                break;
            }
            if self.pos == before {
                break;
            }
            count += 1;
        }
        if count < min {
            self.pos = start;
            false
        } else {
            true
        }
    }

    /// `min*maxDIGIT`
    pub fn digits(&mut self, min: usize, max: Option<usize>) -> bool {
        self.repeat(min, max, |lx| lx.eat(charclass::is_digit))
    }

    /// Exactly `n` digits
    pub fn exact_digits(&mut self, n: usize) -> bool {
        self.attempt(|lx| lx.digits(n, Some(n)))
    }
}

/// `1*DIGIT`
pub fn digits(lx: &mut Lexer<'_>) -> bool {
    lx.digits(1, None)
}

/// `pct-encoded`
pub fn pct_encoded(lx: &mut Lexer<'_>) -> bool {
    lx.eat_pct(PctVariant::Any)
}

/// `identifierLeadingCharacter *127identifierCharacter`
pub fn odata_identifier(lx: &mut Lexer<'_>) -> bool {
    lx.eat(charclass::is_identifier_leading)
        && lx.repeat(0, Some(127), |lx| lx.eat(charclass::is_identifier_char))
}

/// `[ SIGN ]` where SIGN is `"+" / "%2B" / "-"`
pub fn sign(lx: &mut Lexer<'_>) -> bool {
    lx.eat_char('+') || lx.eat_str_ci("%2B") || lx.eat_char('-')
}

/// `pchar = unreserved / pct-encoded / sub-delims / ":" / "@"`
pub fn pchar(lx: &mut Lexer<'_>) -> bool {
    lx.eat_class(CharClass::Pchar) || lx.eat_pct(PctVariant::Any)
}

/// `qchar-no-AMP`
pub fn qchar_no_amp(lx: &mut Lexer<'_>) -> bool {
    lx.eat_class(CharClass::QcharNoAmp) || lx.eat_pct(PctVariant::Any)
}

/// `RWS = 1*( SP / HTAB / "%20" / "%09" )`
pub fn rws(lx: &mut Lexer<'_>) -> bool {
    lx.repeat(1, None, ws_unit)
}

/// `BWS = *( SP / HTAB / "%20" / "%09" )`
pub fn bws(lx: &mut Lexer<'_>) -> bool {
    lx.repeat(0, None, ws_unit)
}

fn ws_unit(lx: &mut Lexer<'_>) -> bool {
    lx.eat_char(' ') || lx.eat_char('\t') || lx.eat_str("%20") || lx.eat_str("%09")
}

/// `OWS = *( SP / HTAB )`, also used for BWS-h in header values
pub fn ows(lx: &mut Lexer<'_>) -> bool {
    lx.repeat(0, None, |lx| lx.eat_char(' ') || lx.eat_char('\t'))
}
