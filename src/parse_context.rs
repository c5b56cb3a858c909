//! Parse context and result types
//!
//! Tracks parsing state during recursive descent: nesting depth, the furthest
//! position any terminal failed at together with what was expected there, and
//! malformed-input findings. Grammar mismatch inside the engine is the
//! zero-sized [`NoMatch`] value; only entry points turn it into [`ParseError`].

use crate::input_stream::Cursor;
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;
use tracing::trace;

/// A rule or terminal did not match at the attempted position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoMatch;

/// Matched value plus the cursor just past it, or [`NoMatch`]
pub type ParseResult<'a, T> = Result<(T, Cursor<'a>), NoMatch>;

/// Default limit on rule nesting.
///
/// A parenthesized operand costs three levels, so this admits some eighty
/// nested groups. Parsing at the limit stays well inside a 2 MiB thread
/// stack in unoptimized builds; raise it only together with the stack size.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Diagnostic text when `max_depth` is exceeded
pub const TOO_DEEP: &str = "nesting too deep";

/// Something the parser would have accepted at the furthest failure position
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Expected {
    /// A fixed spelling
    Literal(&'static str),
    /// A scanned terminal, by rule name
    Token(&'static str),
    EndOfInput,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Literal(s) => write!(f, "{:?}", s),
            Expected::Token(name) => f.write_str(name),
            Expected::EndOfInput => f.write_str("end of input"),
        }
    }
}

/// Context maintained during parsing for tracking and error reporting
#[derive(Debug, Clone)]
pub struct ParseContext {
    /// Current rule being parsed (for error messages)
    pub rule_name: &'static str,

    /// Rule nesting depth
    pub depth: usize,

    pub max_depth: usize,

    /// Furthest byte offset at which a terminal failed
    pub furthest: usize,

    /// Terminals expected at `furthest`
    pub expected: BTreeSet<Expected>,

    /// Furthest malformed-input finding, as (offset, reason)
    pub malformed: Option<(usize, &'static str)>,

    /// Emit a `trace` event on every rule entry
    pub trace: bool,
}

impl ParseContext {
    /// Create a new parse context
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        ParseContext {
            rule_name: "",
            depth: 0,
            max_depth,
            furthest: 0,
            expected: BTreeSet::new(),
            malformed: None,
            trace: false,
        }
    }

    /// Run `body` as the rule `name` starting at `input`.
    ///
    /// Tracks depth and refuses to descend past `max_depth`.
    pub fn rule<'a, T>(
        &mut self,
        name: &'static str,
        input: Cursor<'a>,
        body: impl FnOnce(&mut Self) -> ParseResult<'a, T>,
    ) -> ParseResult<'a, T> {
        if self.depth >= self.max_depth {
            self.note_malformed(input.position(), TOO_DEEP);
            return Err(NoMatch);
        }
        if self.trace {
            trace!(rule = name, position = input.position(), depth = self.depth, "enter");
        }
        let parent = self.rule_name;
        self.depth += 1;
        self.rule_name = name;
        let result = body(self);
        self.depth -= 1;
        self.rule_name = parent;
        result
    }

    /// Record that `what` was expected at `position`
    pub fn expect(&mut self, position: usize, what: Expected) {
        if position > self.furthest {
            self.furthest = position;
            self.expected.clear();
        }
        if position == self.furthest {
            self.expected.insert(what);
        }
    }

    /// Record malformed input; the furthest finding wins
    pub fn note_malformed(&mut self, position: usize, reason: &'static str) {
        match self.malformed {
            Some((seen, _)) if seen >= position => {}
            _ => self.malformed = Some((position, reason)),
        }
    }

    /// Caller-facing error for a parse that matched nothing
    pub fn failure(&self) -> ParseError {
        match self.malformed {
            Some((position, reason)) if position >= self.furthest => ParseError::Malformed {
                position,
                reason: reason.to_string(),
            },
            _ => ParseError::Syntax {
                position: self.furthest,
                expected: self.expected.iter().copied().collect(),
            },
        }
    }
}

impl Default for ParseContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Successful parse of a prefix of the input
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    pub node: T,

    /// Number of bytes consumed from input
    pub consumed: usize,
}

impl<T> Parsed<T> {
    pub fn new(node: T, consumed: usize) -> Self {
        Parsed { node, consumed }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Parsed<U> {
        Parsed {
            node: f(self.node),
            consumed: self.consumed,
        }
    }
}

/// Error type for parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No alternative matched; `position` is the furthest point reached
    #[error("syntax error at offset {position}: expected {}", join_expected(.expected))]
    Syntax {
        position: usize,
        expected: Vec<Expected>,
    },

    /// Input that no grammar rule can accept, such as a truncated percent-encoding
    #[error("malformed input at offset {position}: {reason}")]
    Malformed { position: usize, reason: String },

    /// The rule matched a prefix but the whole input was required
    #[error("unexpected trailing input at offset {position}")]
    TrailingInput { position: usize, consumed: usize },

    /// Name-based lookup of a rule that does not exist
    #[error("unknown rule '{name}'")]
    UnknownRule { name: String },
}

fn join_expected(expected: &[Expected]) -> String {
    if expected.is_empty() {
        return "nothing".to_string();
    }
    expected
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl ParseError {
    /// Get the position where the error occurred
    pub fn position(&self) -> usize {
        match self {
            ParseError::Syntax { position, .. } => *position,
            ParseError::Malformed { position, .. } => *position,
            ParseError::TrailingInput { position, .. } => *position,
            ParseError::UnknownRule { .. } => 0,
        }
    }

    /// Format error with line, column and surrounding input
    pub fn format_with_context(&self, input: &str) -> String {
        let cursor = Cursor::new(input);
        let (line, col) = cursor.line_col(self.position());
        let context = cursor.substring(
            floor_boundary(input, self.position().saturating_sub(20)),
            floor_boundary(input, self.position() + 20),
        );

        match self {
            ParseError::Syntax { expected, .. } => {
                format!(
                    "Parse error at line {}, column {}: expected {}\nContext: ...{}...",
                    line,
                    col,
                    join_expected(expected),
                    context
                )
            }
            ParseError::Malformed { reason, .. } => {
                format!(
                    "Parse error at line {}, column {}: {}\nContext: ...{}...",
                    line, col, reason, context
                )
            }
            ParseError::TrailingInput { .. } => {
                format!(
                    "Parse error at line {}, column {}: unexpected trailing input {:?}",
                    line,
                    col,
                    cursor.substring(self.position(), input.len())
                )
            }
            ParseError::UnknownRule { name } => format!("Unknown rule '{}'", name),
        }
    }
}

fn floor_boundary(s: &str, mut pos: usize) -> usize {
    pos = pos.min(s.len());
    while !s.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_new() {
        let ctx = ParseContext::new();
        assert_eq!(ctx.depth, 0);
        assert_eq!(ctx.max_depth, DEFAULT_MAX_DEPTH);
        assert!(ctx.expected.is_empty());
    }

    #[test]
    fn test_rule_tracks_depth() {
        let mut ctx = ParseContext::new();
        let input = Cursor::new("abc");
        let result = ctx.rule("outer", input, |ctx| {
            assert_eq!(ctx.depth, 1);
            assert_eq!(ctx.rule_name, "outer");
            ctx.rule("inner", input, |ctx| {
                assert_eq!(ctx.depth, 2);
                Ok(((), input.advance(1)))
            })
        });
        assert!(result.is_ok());
        assert_eq!(ctx.depth, 0);
        assert_eq!(ctx.rule_name, "");
    }

    #[test]
    fn test_max_depth() {
        let mut ctx = ParseContext::with_max_depth(1);
        let input = Cursor::new("x");
        let result: ParseResult<'_, ()> =
            ctx.rule("a", input, |ctx| ctx.rule("b", input, |_| Ok(((), input))));
        assert_eq!(result, Err(NoMatch));
        assert_eq!(ctx.malformed, Some((0, TOO_DEEP)));
    }

    #[test]
    fn test_furthest_failure() {
        let mut ctx = ParseContext::new();
        ctx.expect(2, Expected::Literal("("));
        ctx.expect(5, Expected::Token("odataIdentifier"));
        ctx.expect(5, Expected::Literal("$"));
        ctx.expect(3, Expected::Literal(")"));

        match ctx.failure() {
            ParseError::Syntax { position, expected } => {
                assert_eq!(position, 5);
                assert_eq!(expected.len(), 2);
                assert!(expected.contains(&Expected::Literal("$")));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_malformed_wins_when_furthest() {
        let mut ctx = ParseContext::new();
        ctx.expect(0, Expected::Literal("%28"));
        ctx.note_malformed(0, "incomplete percent-encoding");
        assert_eq!(
            ctx.failure(),
            ParseError::Malformed {
                position: 0,
                reason: "incomplete percent-encoding".to_string()
            }
        );

        ctx.expect(4, Expected::EndOfInput);
        assert!(matches!(ctx.failure(), ParseError::Syntax { position: 4, .. }));
    }

    #[test]
    fn test_format_with_context() {
        let err = ParseError::Syntax {
            position: 6,
            expected: vec![Expected::Literal(")")],
        };
        let text = err.format_with_context("line1\nab");
        assert!(text.contains("line 2, column 1"));
        assert!(text.contains("\")\""));
        assert_eq!(err.to_string(), "syntax error at offset 6: expected \")\"");
    }

    #[test]
    fn test_parsed_map() {
        let parsed = Parsed::new(3, 7).map(|n| n * 2);
        assert_eq!(parsed, Parsed::new(6, 7));
    }
}
