//! Parser entry points
//!
//! Rules parse through [`Parse`](crate::combinator::Parse) and report a bare
//! `NoMatch`; this module is where that becomes a caller-facing
//! [`ParseError`]. Every entry point parses a prefix of its input and
//! returns the node with the number of bytes consumed, so callers decide
//! whether trailing input is an error. The `*_complete` forms make that
//! decision for them.

use crate::cst;
use crate::grammar;
use crate::input_stream::Cursor;
use crate::node::{Node, Rule};
use crate::parse_context::{
    NoMatch, ParseContext, ParseError, ParseResult, Parsed, DEFAULT_MAX_DEPTH,
};
use tracing::debug;

/// Diagnostic text for byte input that is not UTF-8
pub const INVALID_UTF8: &str = "invalid UTF-8";

/// Parser settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Deepest rule nesting before input is rejected as too deep
    pub max_depth: usize,

    /// Emit a `trace` event on every rule entry
    pub trace: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            max_depth: DEFAULT_MAX_DEPTH,
            trace: false,
        }
    }
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }
}

/// Entry points over a fixed configuration.
///
/// A `Parser` holds no parse state; it can be shared freely and used from
/// several threads at once.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    pub fn new(config: ParserConfig) -> Self {
        Parser { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    fn context(&self) -> ParseContext {
        let mut ctx = ParseContext::with_max_depth(self.config.max_depth);
        ctx.trace = self.config.trace;
        ctx
    }

    /// Parse rule `T` from the start of `input`
    pub fn parse<T: Rule>(&self, input: &str) -> Result<Parsed<T>, ParseError> {
        let mut ctx = self.context();
        let result = T::parse(Cursor::new(input), &mut ctx);
        finish(T::NAME, result, &ctx)
    }

    /// Parse rule `T` from the whole of `input`
    pub fn parse_complete<T: Rule>(&self, input: &str) -> Result<Parsed<T>, ParseError> {
        let mut ctx = self.context();
        let result = T::parse(Cursor::new(input), &mut ctx);
        let parsed = finish(T::NAME, result, &ctx)?;
        require_end(parsed, input, &ctx)
    }

    /// Parse the rule named `rule` from the start of `input`
    pub fn parse_named(&self, rule: &str, input: &str) -> Result<Parsed<Box<dyn Node>>, ParseError> {
        let id = grammar::lookup(rule).ok_or_else(|| ParseError::UnknownRule {
            name: rule.to_string(),
        })?;
        let info = grammar::info(id);
        let mut ctx = self.context();
        let result = (info.parse)(Cursor::new(input), &mut ctx);
        finish(info.name, result, &ctx)
    }

    /// Parse the rule named `rule` from the whole of `input`
    pub fn parse_named_complete(&self, rule: &str, input: &str) -> Result<Parsed<Box<dyn Node>>, ParseError> {
        let id = grammar::lookup(rule).ok_or_else(|| ParseError::UnknownRule {
            name: rule.to_string(),
        })?;
        let info = grammar::info(id);
        let mut ctx = self.context();
        let result = (info.parse)(Cursor::new(input), &mut ctx);
        let parsed = finish(info.name, result, &ctx)?;
        require_end(parsed, input, &ctx)
    }

    /// Parse rule `T` from the whole of a byte buffer.
    ///
    /// Bytes that are not UTF-8 are malformed input at the first bad byte.
    pub fn parse_bytes<T: Rule>(&self, input: &[u8]) -> Result<Parsed<T>, ParseError> {
        match std::str::from_utf8(input) {
            Ok(text) => self.parse_complete::<T>(text),
            Err(err) => {
                debug!(rule = T::NAME, position = err.valid_up_to(), "rejected non-UTF-8 input");
                Err(ParseError::Malformed {
                    position: err.valid_up_to(),
                    reason: INVALID_UTF8.to_string(),
                })
            }
        }
    }

    /// Full service URI: `serviceRoot [ odataRelativeUri ]`
    pub fn parse_odata_uri(&self, input: &str) -> Result<Parsed<cst::OdataUri>, ParseError> {
        self.parse(input)
    }

    /// URI relative to the service root, with query
    pub fn parse_relative_uri(&self, input: &str) -> Result<Parsed<cst::OdataRelativeUri>, ParseError> {
        self.parse(input)
    }

    pub fn parse_resource_path(&self, input: &str) -> Result<Parsed<cst::ResourcePath>, ParseError> {
        self.parse(input)
    }

    /// `queryOption *( "&" queryOption )`
    pub fn parse_query_options(&self, input: &str) -> Result<Parsed<cst::QueryOptions>, ParseError> {
        self.parse(input)
    }

    pub fn parse_query_option(&self, input: &str) -> Result<Parsed<cst::QueryOption>, ParseError> {
        self.parse(input)
    }

    /// A header line, name included, e.g. `OData-Version: 4.0`
    pub fn parse_header(&self, input: &str) -> Result<Parsed<cst::Header>, ParseError> {
        self.parse(input)
    }

    /// Literal outside a URI, as in payloads and header parameters
    pub fn parse_primitive_value(&self, input: &str) -> Result<Parsed<cst::PrimitiveValue>, ParseError> {
        self.parse(input)
    }

    /// Literal in URI form, e.g. `'O''Neil'` or `2024-01-31`
    pub fn parse_primitive_literal(&self, input: &str) -> Result<Parsed<cst::PrimitiveLiteral>, ParseError> {
        self.parse(input)
    }

    /// Context URL fragment including its leading `#`
    pub fn parse_context_url(&self, input: &str) -> Result<Parsed<cst::Context>, ParseError> {
        self.parse(input)
    }

    /// JSON array or object as it appears in a URL
    pub fn parse_json_value(&self, input: &str) -> Result<Parsed<cst::ArrayOrObject>, ParseError> {
        self.parse(input)
    }

    /// Absolute URI per RFC 3986
    pub fn parse_uri(&self, input: &str) -> Result<Parsed<cst::Uri>, ParseError> {
        self.parse(input)
    }

    /// `[ weak ] opaque-tag`
    pub fn parse_entity_tag(&self, input: &str) -> Result<Parsed<cst::EntityTag>, ParseError> {
        self.parse(input)
    }
}

fn finish<'a, T>(
    rule: &'static str,
    result: ParseResult<'a, T>,
    ctx: &ParseContext,
) -> Result<Parsed<T>, ParseError> {
    match result {
        Ok((node, rest)) => {
            debug!(rule, consumed = rest.position(), "parsed");
            Ok(Parsed::new(node, rest.position()))
        }
        Err(NoMatch) => {
            let err = ctx.failure();
            debug!(rule, error = %err, "no match");
            Err(err)
        }
    }
}

/// Reject a prefix match that left input behind.
///
/// Malformed input at or past the stopping point explains the leftover
/// better than the leftover itself, so it is reported instead.
fn require_end<T>(parsed: Parsed<T>, input: &str, ctx: &ParseContext) -> Result<Parsed<T>, ParseError> {
    if parsed.consumed == input.len() {
        return Ok(parsed);
    }
    let err = match ctx.malformed {
        Some((position, reason)) if position >= parsed.consumed => ParseError::Malformed {
            position,
            reason: reason.to_string(),
        },
        _ => ParseError::TrailingInput {
            position: parsed.consumed,
            consumed: parsed.consumed,
        },
    };
    debug!(error = %err, "incomplete parse");
    Err(err)
}

/// [`Parser::parse`] with the default configuration
pub fn parse<T: Rule>(input: &str) -> Result<Parsed<T>, ParseError> {
    Parser::default().parse(input)
}

/// [`Parser::parse_complete`] with the default configuration
pub fn parse_complete<T: Rule>(input: &str) -> Result<Parsed<T>, ParseError> {
    Parser::default().parse_complete(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_context::{Expected, TOO_DEEP};
    use crate::printer::print;

    #[test]
    fn test_prefix_and_complete() {
        let parsed = parse::<cst::OdataIdentifier>("Name eq 1").unwrap();
        assert_eq!(parsed.consumed, 4);
        assert_eq!(
            parse_complete::<cst::OdataIdentifier>("Name eq 1"),
            Err(ParseError::TrailingInput {
                position: 4,
                consumed: 4
            })
        );
    }

    #[test]
    fn test_syntax_error_reports_expected() {
        let err = parse::<cst::BooleanValue>("maybe").unwrap_err();
        let ParseError::Syntax { position, expected } = err else {
            panic!("expected a syntax error, got {err:?}");
        };
        assert_eq!(position, 0);
        assert!(expected.contains(&Expected::Literal("true")));
    }

    #[test]
    fn test_named() {
        let parser = Parser::default();
        let parsed = parser.parse_named("primitiveLiteral", "42").unwrap();
        assert_eq!(parsed.node.rule_name(), "primitiveLiteral");
        assert_eq!(print(&*parsed.node), "42");
        assert_eq!(
            parser.parse_named("nope", "42").unwrap_err(),
            ParseError::UnknownRule {
                name: "nope".to_string()
            }
        );
        assert!(parser.parse_named_complete("primitiveLiteral", "42x").is_err());
    }

    #[test]
    fn test_bytes() {
        let parser = Parser::default();
        assert!(parser.parse_bytes::<cst::StringLiteral>(b"'abc'").is_ok());
        let err = parser.parse_bytes::<cst::StringLiteral>(b"'a\xffc'").unwrap_err();
        assert_eq!(
            err,
            ParseError::Malformed {
                position: 2,
                reason: INVALID_UTF8.to_string()
            }
        );
    }

    #[test]
    fn test_depth_limit() {
        let nested = |n: usize| format!("{}1{}", "(".repeat(n), ")".repeat(n));
        let deep = nested(60);
        let shallow = Parser::new(ParserConfig::new().max_depth(40));
        let err = shallow.parse_complete::<cst::CommonExpr>(&deep).unwrap_err();
        assert!(matches!(&err, ParseError::Malformed { reason, .. } if reason == TOO_DEEP));
        assert!(err.position() <= deep.len());
        assert!(parse_complete::<cst::CommonExpr>(&deep).is_ok());

        // the default limit stops runaway nesting with a diagnostic, not a stack overflow
        let runaway = nested(500);
        let err = parse_complete::<cst::CommonExpr>(&runaway).unwrap_err();
        let ParseError::Malformed { position, reason } = &err else {
            panic!("expected malformed input, got {err:?}");
        };
        assert_eq!(reason, TOO_DEEP);
        assert!(*position > 40 && *position < 100, "stopped at {position}");
    }

    #[test]
    fn test_nesting_to_the_limit_fits_a_small_stack() {
        let outcomes = std::thread::Builder::new()
            .stack_size(2 * 1024 * 1024)
            .spawn(|| {
                let within = format!("{}1{}", "(".repeat(70), ")".repeat(70));
                let beyond = format!("{}1{}", "(".repeat(90), ")".repeat(90));
                (
                    parse_complete::<cst::CommonExpr>(&within).map(|p| p.consumed),
                    parse_complete::<cst::CommonExpr>(&beyond).map(|p| p.consumed),
                )
            })
            .unwrap()
            .join()
            .unwrap();
        assert_eq!(outcomes.0, Ok(141));
        assert!(matches!(outcomes.1, Err(ParseError::Malformed { ref reason, .. }) if reason == TOO_DEEP));
    }

    #[test]
    fn test_entry_points() {
        let parser = Parser::new(ParserConfig::default().trace(true));
        assert!(parser.parse_relative_uri("Orders(1)/Customer").is_ok());
        assert!(parser.parse_query_options("$top=1&$skip=2").is_ok());
        assert!(parser.parse_header("OData-Version: 4.0").is_ok());
        assert!(parser.parse_primitive_value("true").is_ok());
        assert!(parser.parse_context_url("#Orders").is_ok());
        assert!(parser.parse_json_value("[1,2]").is_ok());
        assert!(parser.parse_uri("http://host/").is_ok());
        assert!(parser.parse_entity_tag("\"x\"").is_ok());
    }
}
