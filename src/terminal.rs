//! Terminal matchers
//!
//! Literal terminals match one of a fixed list of spellings; scanned
//! terminals run a [`Scanner`] over the remaining input. Both return the
//! captured text, its span and the advanced cursor, and record what was
//! expected in the [`ParseContext`] when they fail.

use crate::charclass::{hex_pair, is_identifier_char};
use crate::input_stream::{Cursor, Span};
use crate::lexer::{Lexer, Scanner, INCOMPLETE_PCT};
use crate::parse_context::{Expected, NoMatch, ParseContext};
use smol_str::SmolStr;

/// How a literal compares against input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Case {
    /// `'...'` and `%x..` literals
    Sensitive,
    /// `"..."` literals
    Insensitive,
}

/// Captured text of a terminal
pub type Capture<'a> = (SmolStr, Span, Cursor<'a>);

/// Match the first of `spellings` found at the cursor.
///
/// Percent-encoded spellings compare their hex digits case-insensitively.
/// With `word` set, a match followed by an identifier character is rejected.
pub fn literal<'a>(
    input: Cursor<'a>,
    ctx: &mut ParseContext,
    spellings: &'static [&'static str],
    case: Case,
    word: bool,
) -> Result<Capture<'a>, NoMatch> {
    let rest = input.remaining();
    for spelling in spellings {
        let Some(candidate) = rest.get(..spelling.len()) else {
            continue;
        };
        let hit = candidate == *spelling
            || ((case == Case::Insensitive || spelling.starts_with('%'))
                && candidate.eq_ignore_ascii_case(spelling));
        if !hit {
            continue;
        }
        let next = input.advance(spelling.len());
        if word && next.current().is_some_and(is_identifier_char) {
            continue;
        }
        return Ok((SmolStr::new(candidate), input.span_to(next), next));
    }

    if rest.starts_with('%') && spellings.iter().any(|s| s.starts_with('%')) && !pct_complete(rest) {
        ctx.note_malformed(input.position(), INCOMPLETE_PCT);
    }
    if let Some(first) = spellings.first() {
        ctx.expect(input.position(), Expected::Literal(first));
    }
    Err(NoMatch)
}

fn pct_complete(rest: &str) -> bool {
    let bytes = rest.as_bytes();
    matches!((bytes.get(1), bytes.get(2)), (Some(&hi), Some(&lo)) if hex_pair(hi, lo).is_some())
}

/// Run `scan` at the cursor and capture what it consumed
pub fn scanned<'a>(
    input: Cursor<'a>,
    ctx: &mut ParseContext,
    rule: &'static str,
    scan: Scanner,
) -> Result<Capture<'a>, NoMatch> {
    let mut lx = Lexer::new(input.remaining());
    let matched = scan(&mut lx);
    if let Some((offset, reason)) = lx.malformed() {
        ctx.note_malformed(input.position() + offset, reason);
    }
    if !matched {
        ctx.expect(input.position(), Expected::Token(rule));
        return Err(NoMatch);
    }
    let next = input.advance(lx.pos());
    let text = input.substring(input.position(), next.position());
    Ok((SmolStr::new(text), input.span_to(next), next))
}

/// Succeed without consuming iff the input is exhausted
pub fn end_of_input<'a>(input: Cursor<'a>, ctx: &mut ParseContext) -> Result<Cursor<'a>, NoMatch> {
    if input.is_eof() {
        Ok(input)
    } else {
        ctx.expect(input.position(), Expected::EndOfInput);
        Err(NoMatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer;

    const OPEN: &[&str] = &["(", "%28"];

    #[test]
    fn test_literal_spellings() {
        let mut ctx = ParseContext::new();
        let (text, span, next) = literal(Cursor::new("%28x"), &mut ctx, OPEN, Case::Sensitive, false).unwrap();
        assert_eq!(text, "%28");
        assert_eq!(span, Span::new(0, 3));
        assert_eq!(next.remaining(), "x");
    }

    #[test]
    fn test_literal_case() {
        let mut ctx = ParseContext::new();
        let input = Cursor::new("TRUE");
        assert!(literal(input, &mut ctx, &["true"], Case::Sensitive, false).is_err());
        let (text, _, _) = literal(input, &mut ctx, &["true"], Case::Insensitive, false).unwrap();
        assert_eq!(text, "TRUE");
    }

    #[test]
    fn test_literal_word_boundary() {
        let mut ctx = ParseContext::new();
        assert!(literal(Cursor::new("trueish"), &mut ctx, &["true"], Case::Insensitive, true).is_err());
        assert!(literal(Cursor::new("true)"), &mut ctx, &["true"], Case::Insensitive, true).is_ok());
    }

    #[test]
    fn test_literal_failure_records_expected() {
        let mut ctx = ParseContext::new();
        assert_eq!(
            literal(Cursor::new("x"), &mut ctx, OPEN, Case::Sensitive, false),
            Err(NoMatch)
        );
        assert!(ctx.expected.contains(&Expected::Literal("(")));
    }

    #[test]
    fn test_literal_truncated_pct() {
        let mut ctx = ParseContext::new();
        assert!(literal(Cursor::new("%2"), &mut ctx, OPEN, Case::Sensitive, false).is_err());
        assert_eq!(ctx.malformed, Some((0, INCOMPLETE_PCT)));
    }

    #[test]
    fn test_scanned() {
        let mut ctx = ParseContext::new();
        let input = Cursor::new("ab Name").advance(3);
        let (text, span, next) = scanned(input, &mut ctx, "odataIdentifier", lexer::odata_identifier).unwrap();
        assert_eq!(text, "Name");
        assert_eq!(span, Span::new(3, 7));
        assert!(next.is_eof());
        assert!(end_of_input(next, &mut ctx).is_ok());
    }
}
