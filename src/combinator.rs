//! Grammar combinators
//!
//! [`Parse`] is the typed form used by every generated rule: a rule parses
//! from a cursor and returns its node plus the advanced cursor. Containers
//! give the repetition operators their meaning: `Option<T>` is `[ T ]`,
//! `Vec<T>` is `*T`, [`Many1<T>`] is `1*T`, tuples are sequences, and
//! [`ManyThen`] is a repetition that must leave room for what follows it.
//!
//! The function forms ([`lit`], [`seq`], [`alt`], [`opt`], [`many0`],
//! [`many1`], [`rule`]) build the same operators from closures, for ad hoc
//! parsers that do not warrant a generated type.

use crate::grammar::{self, RuleId};
use crate::input_stream::Cursor;
use crate::node::Node;
use crate::parse_context::{NoMatch, ParseContext, ParseResult};
use crate::printer::{Print, Printer};
use crate::terminal::{self, Case};
use smol_str::SmolStr;
use std::ops::Deref;

/// A value parsed from the front of a cursor
pub trait Parse: Sized {
    fn parse<'a>(input: Cursor<'a>, ctx: &mut ParseContext) -> ParseResult<'a, Self>;
}

impl<T: Parse> Parse for Box<T> {
    fn parse<'a>(input: Cursor<'a>, ctx: &mut ParseContext) -> ParseResult<'a, Self> {
        T::parse(input, ctx).map(|(node, rest)| (Box::new(node), rest))
    }
}

impl<T: Parse> Parse for Option<T> {
    fn parse<'a>(input: Cursor<'a>, ctx: &mut ParseContext) -> ParseResult<'a, Self> {
        match T::parse(input, ctx) {
            Ok((node, rest)) => Ok((Some(node), rest)),
            Err(NoMatch) => Ok((None, input)),
        }
    }
}

impl<T: Parse> Parse for Vec<T> {
    fn parse<'a>(input: Cursor<'a>, ctx: &mut ParseContext) -> ParseResult<'a, Self> {
        let mut items = Vec::new();
        let mut cursor = input;
        while let Ok((node, rest)) = T::parse(cursor, ctx) {
            // a match that consumes nothing would repeat forever
            if rest.position() == cursor.position() {
                break;
            }
            items.push(node);
            cursor = rest;
        }
        Ok((items, cursor))
    }
}

/// One or more repetitions; never empty
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Many1<T>(Vec<T>);

impl<T> Many1<T> {
    pub fn new(first: T) -> Self {
        Many1(vec![first])
    }

    pub fn push(&mut self, item: T) {
        self.0.push(item);
    }

    pub fn first(&self) -> &T {
        &self.0[0]
    }

    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<T> {
        self.0
    }
}

impl<T> Deref for Many1<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.0
    }
}

impl<T> TryFrom<Vec<T>> for Many1<T> {
    type Error = Vec<T>;

    fn try_from(items: Vec<T>) -> Result<Self, Vec<T>> {
        if items.is_empty() {
            Err(items)
        } else {
            Ok(Many1(items))
        }
    }
}

impl<'m, T> IntoIterator for &'m Many1<T> {
    type Item = &'m T;
    type IntoIter = std::slice::Iter<'m, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<T: Parse> Parse for Many1<T> {
    fn parse<'a>(input: Cursor<'a>, ctx: &mut ParseContext) -> ParseResult<'a, Self> {
        let (items, rest) = Vec::<T>::parse(input, ctx)?;
        match Many1::try_from(items) {
            Ok(many) => Ok((many, rest)),
            Err(_) => Err(NoMatch),
        }
    }
}

impl<T: Print> Print for Many1<T> {
    fn print(&self, p: &mut Printer) {
        for item in &self.0 {
            item.print(p);
        }
    }
}

/// `*item tail` where `tail` may also be read as an `item`.
///
/// Plain repetition would swallow what `tail` needs, so items are handed
/// back one at a time, last first, until `tail` matches after them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ManyThen<I, T> {
    pub items: Vec<I>,
    pub tail: T,
}

impl<I: Parse, T: Parse> Parse for ManyThen<I, T> {
    fn parse<'a>(input: Cursor<'a>, ctx: &mut ParseContext) -> ParseResult<'a, Self> {
        let mut items = Vec::new();
        let mut ends = vec![input];
        let mut cursor = input;
        while let Ok((node, rest)) = I::parse(cursor, ctx) {
            if rest.position() == cursor.position() {
                break;
            }
            items.push(node);
            ends.push(rest);
            cursor = rest;
        }
        for (kept, start) in ends.into_iter().enumerate().rev() {
            if let Ok((tail, rest)) = T::parse(start, ctx) {
                items.truncate(kept);
                return Ok((ManyThen { items, tail }, rest));
            }
        }
        Err(NoMatch)
    }
}

impl<I: Print, T: Print> Print for ManyThen<I, T> {
    fn print(&self, p: &mut Printer) {
        self.items.print(p);
        self.tail.print(p);
    }
}

macro_rules! tuple_parse {
    ($($name:ident)+) => {
        impl<$($name: Parse),+> Parse for ($($name,)+) {
            #[allow(non_snake_case)]
            fn parse<'a>(input: Cursor<'a>, ctx: &mut ParseContext) -> ParseResult<'a, Self> {
                let rest = input;
                $(let ($name, rest) = $name::parse(rest, ctx)?;)+
                Ok((($($name,)+), rest))
            }
        }
    };
}

tuple_parse!(A B);
tuple_parse!(A B C);
tuple_parse!(A B C D);
tuple_parse!(A B C D E);
tuple_parse!(A B C D E F);

/// Match one of the given spellings
pub fn lit<'a>(
    spellings: &'static [&'static str],
    case: Case,
) -> impl Fn(Cursor<'a>, &mut ParseContext) -> ParseResult<'a, SmolStr> {
    move |input: Cursor<'a>, ctx: &mut ParseContext| {
        let (text, _, rest) = terminal::literal(input, ctx, spellings, case, false)?;
        Ok((text, rest))
    }
}

/// `first second`: both at consecutive positions, or neither
pub fn seq<'a, A, B>(
    first: impl Fn(Cursor<'a>, &mut ParseContext) -> ParseResult<'a, A>,
    second: impl Fn(Cursor<'a>, &mut ParseContext) -> ParseResult<'a, B>,
) -> impl Fn(Cursor<'a>, &mut ParseContext) -> ParseResult<'a, (A, B)> {
    move |input: Cursor<'a>, ctx: &mut ParseContext| {
        let (a, rest) = first(input, ctx)?;
        let (b, rest) = second(rest, ctx)?;
        Ok(((a, b), rest))
    }
}

/// Ordered choice: the first alternative that matches wins
pub fn alt<'a, 'p, T>(
    alternatives: &'p [&'p dyn Fn(Cursor<'a>, &mut ParseContext) -> ParseResult<'a, T>],
) -> impl Fn(Cursor<'a>, &mut ParseContext) -> ParseResult<'a, T> + 'p {
    move |input: Cursor<'a>, ctx: &mut ParseContext| {
        for alternative in alternatives {
            if let Ok(found) = alternative(input, ctx) {
                return Ok(found);
            }
        }
        Err(NoMatch)
    }
}

/// `[ p ]`
pub fn opt<'a, T>(
    p: impl Fn(Cursor<'a>, &mut ParseContext) -> ParseResult<'a, T>,
) -> impl Fn(Cursor<'a>, &mut ParseContext) -> ParseResult<'a, Option<T>> {
    move |input: Cursor<'a>, ctx: &mut ParseContext| match p(input, ctx) {
        Ok((node, rest)) => Ok((Some(node), rest)),
        Err(NoMatch) => Ok((None, input)),
    }
}

/// `*p`
pub fn many0<'a, T>(
    p: impl Fn(Cursor<'a>, &mut ParseContext) -> ParseResult<'a, T>,
) -> impl Fn(Cursor<'a>, &mut ParseContext) -> ParseResult<'a, Vec<T>> {
    move |input: Cursor<'a>, ctx: &mut ParseContext| {
        let mut items = Vec::new();
        let mut cursor = input;
        while let Ok((node, rest)) = p(cursor, ctx) {
            if rest.position() == cursor.position() {
                break;
            }
            items.push(node);
            cursor = rest;
        }
        Ok((items, cursor))
    }
}

/// `1*p`
pub fn many1<'a, T>(
    p: impl Fn(Cursor<'a>, &mut ParseContext) -> ParseResult<'a, T>,
) -> impl Fn(Cursor<'a>, &mut ParseContext) -> ParseResult<'a, Vec<T>> {
    let many = many0(p);
    move |input: Cursor<'a>, ctx: &mut ParseContext| match many(input, ctx)? {
        (items, _) if items.is_empty() => Err(NoMatch),
        found => Ok(found),
    }
}

/// One arm of a generated alternation: `T`, wrapped as the enum variant.
///
/// Generated alternations try their arms through a table of these, so a
/// variant's parse state lives in this frame and is gone before the next arm
/// runs.
pub fn arm<'a, T: Parse, S>(input: Cursor<'a>, ctx: &mut ParseContext, wrap: fn(T) -> S) -> ParseResult<'a, S> {
    let (node, rest) = T::parse(input, ctx)?;
    Ok((wrap(node), rest))
}

/// Parse whatever rule `id` names, through the rule table
pub fn rule<'a>(id: RuleId) -> impl Fn(Cursor<'a>, &mut ParseContext) -> ParseResult<'a, Box<dyn Node>> {
    let parse = grammar::info(id).parse;
    move |input: Cursor<'a>, ctx: &mut ParseContext| parse(input, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digit<'a>(input: Cursor<'a>, ctx: &mut ParseContext) -> ParseResult<'a, SmolStr> {
        lit(&["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"], Case::Sensitive)(input, ctx)
    }

    #[test]
    fn test_seq_restores_on_failure() {
        let mut ctx = ParseContext::new();
        let input = Cursor::new("(1x");
        let open = lit(&["("], Case::Sensitive);
        let close = lit(&[")"], Case::Sensitive);
        let p = seq(seq(open, digit), close);
        assert_eq!(p(input, &mut ctx), Err(NoMatch));
        // the caller still holds its own cursor
        assert_eq!(input.restore(input.checkpoint()), input);
        assert_eq!(ctx.furthest, 2);
    }

    fn choose<'a>(input: Cursor<'a>, ctx: &mut ParseContext, long_first: bool) -> ParseResult<'a, SmolStr> {
        let short = lit(&["ab"], Case::Sensitive);
        let long = lit(&["abc"], Case::Sensitive);
        let alternatives: [&dyn Fn(Cursor<'a>, &mut ParseContext) -> ParseResult<'a, SmolStr>; 2] =
            if long_first { [&long, &short] } else { [&short, &long] };
        let choice = alt(&alternatives);
        choice(input, ctx)
    }

    /// `"(" digit ")"` or else the bare text `(1`
    fn group_or_prefix<'a>(input: Cursor<'a>, ctx: &mut ParseContext) -> ParseResult<'a, SmolStr> {
        let group = |input: Cursor<'a>, ctx: &mut ParseContext| -> ParseResult<'a, SmolStr> {
            let open = lit(&["("], Case::Sensitive);
            let close = lit(&[")"], Case::Sensitive);
            let (((_, inner), _), rest) = seq(seq(open, digit), close)(input, ctx)?;
            Ok((inner, rest))
        };
        let prefix = lit(&["(1"], Case::Sensitive);
        let alternatives: [&dyn Fn(Cursor<'a>, &mut ParseContext) -> ParseResult<'a, SmolStr>; 2] = [&group, &prefix];
        let choice = alt(&alternatives);
        choice(input, ctx)
    }

    #[test]
    fn test_alt_first_declared_wins() {
        let mut ctx = ParseContext::new();
        let (text, rest) = choose(Cursor::new("abc"), &mut ctx, false).unwrap();
        assert_eq!(text, "ab");
        assert_eq!(rest.remaining(), "c");

        let (text, _) = choose(Cursor::new("abc"), &mut ctx, true).unwrap();
        assert_eq!(text, "abc");
    }

    #[test]
    fn test_failed_branch_resumes_from_its_start() {
        let mut ctx = ParseContext::new();
        let input = Cursor::new("ab(1x").advance(2);

        let pair = seq(lit(&["("], Case::Sensitive), lit(&[")"], Case::Sensitive));
        assert_eq!(pair(input, &mut ctx), Err(NoMatch));
        assert_eq!(input.position(), 2);
        assert_eq!(ctx.furthest, 3);

        // the group fails at `x`; the second arm starts over at offset 2
        let (text, rest) = group_or_prefix(input, &mut ctx).unwrap();
        assert_eq!(text, "(1");
        assert_eq!(rest.position(), 4);
        assert_eq!(rest.remaining(), "x");
        assert_eq!(ctx.furthest, 4);

        let (text, rest) = group_or_prefix(Cursor::new("ab(7)").advance(2), &mut ctx).unwrap();
        assert_eq!(text, "7");
        assert_eq!(rest.position(), 5);
    }

    #[test]
    fn test_opt_and_repetition() {
        let mut ctx = ParseContext::new();
        let (found, rest) = opt(digit)(Cursor::new("x"), &mut ctx).unwrap();
        assert_eq!(found, None);
        assert_eq!(rest.position(), 0);

        let (items, rest) = many0(digit)(Cursor::new("123x"), &mut ctx).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(rest.remaining(), "x");

        let (items, _) = many0(digit)(Cursor::new("x"), &mut ctx).unwrap();
        assert!(items.is_empty());
        assert_eq!(many1(digit)(Cursor::new("x"), &mut ctx), Err(NoMatch));
    }

    #[test]
    fn test_many0_stops_on_empty_match() {
        let mut ctx = ParseContext::new();
        let nothing = opt(digit);
        let (items, rest) = many0(nothing)(Cursor::new("x"), &mut ctx).unwrap();
        assert!(items.is_empty());
        assert_eq!(rest.position(), 0);
    }

    #[test]
    fn test_many1_container() {
        let many = Many1::try_from(vec![1, 2, 3]).unwrap();
        assert_eq!(*many.first(), 1);
        assert_eq!(many.len(), 3);
        assert!(Many1::<u8>::try_from(Vec::new()).is_err());
    }

    #[test]
    fn test_many_then_gives_back_items() {
        #[derive(Debug)]
        struct Digit;
        impl Parse for Digit {
            fn parse<'a>(input: Cursor<'a>, ctx: &mut ParseContext) -> ParseResult<'a, Self> {
                digit(input, ctx).map(|(_, rest)| (Digit, rest))
            }
        }
        #[derive(Debug)]
        struct Nine;
        impl Parse for Nine {
            fn parse<'a>(input: Cursor<'a>, ctx: &mut ParseContext) -> ParseResult<'a, Self> {
                lit(&["9"], Case::Sensitive)(input, ctx).map(|(_, rest)| (Nine, rest))
            }
        }

        let mut ctx = ParseContext::new();
        let (found, rest) = ManyThen::<Digit, Nine>::parse(Cursor::new("1239x"), &mut ctx).unwrap();
        assert_eq!(found.items.len(), 3);
        assert_eq!(rest.remaining(), "x");
        assert!(ManyThen::<Digit, Nine>::parse(Cursor::new("123"), &mut ctx).is_err());
    }

    #[test]
    fn test_rule_by_id() {
        let mut ctx = ParseContext::new();
        let id = grammar::lookup("odataIdentifier").unwrap();
        let (node, rest) = rule(id)(Cursor::new("Name eq 1"), &mut ctx).unwrap();
        assert_eq!(node.rule_name(), "odataIdentifier");
        assert_eq!(node.text(), Some("Name"));
        assert_eq!(rest.position(), 4);
    }
}
