//! URI syntax (RFC 3986) and the IRI forms of RFC 3987 used by OData
//!
//! Only the absolute `URI` form is a rule; relative references are covered by
//! the OData resource path rules. IPv6 literals are validated by
//! [`std::net::Ipv6Addr`], which accepts exactly the RFC 3986 `IPv6address`
//! forms including an embedded IPv4 tail.

use super::punctuation::{Hash, PlainColon, Question};
use crate::charclass::{self, CharClass, PctVariant};
use crate::lexer::{self, Lexer};
use std::net::Ipv6Addr;

literals! {
    DoubleSlash = "\"//\"", Sensitive ["//"];
    /// Separator after `userinfo`
    PlainAt = "\"@\"", Sensitive ["@"];
    IpLiteralOpen = "IP-literal-open", Sensitive ["["];
    IpLiteralClose = "IP-literal-close", Sensitive ["]"];
}

tokens! {
    /// `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`
    UriScheme = "scheme", scheme;
    UserInfo = "userinfo", userinfo;
    /// `*DIGIT`
    Port = "port", port;
    Ipv6Address = "IPv6address", ipv6_address;
    IpvFuture = "IPvFuture", ipv_future;
    Ipv4Address = "IPv4address", ipv4_address;
    RegName = "reg-name", reg_name;
    PathAbempty = "path-abempty", path_abempty;
    PathAbsolute = "path-absolute", path_absolute;
    PathRootless = "path-rootless", path_rootless;
    /// `1*pchar`
    SegmentNz = "segment-nz", segment_nz;
    UriQuery = "query", query_or_fragment;
    UriFragment = "fragment", query_or_fragment;
    /// `1*qchar-no-AMP`
    IriInQuery = "IRI-in-query", iri_in_query;
    /// `1*( VCHAR / obs-text )`
    IriInHeader = "IRI-in-header", iri_in_header;
}

alternations! {
    HierPart = "hier-part" {
        Authority(AuthorityPath),
        Absolute(PathAbsolute),
        Rootless(PathRootless),
    }

    Host = "host" {
        IpLiteral(IpLiteral),
        Ipv4(Ipv4Address),
        RegName(RegName),
    }

    IpLiteralAddress = "IP-literal-address" {
        V6(Ipv6Address),
        Future(IpvFuture),
    }
}

sequences! {
    Uri = "URI" {
        scheme: UriScheme,
        colon: PlainColon,
        hier: HierPart,
        query: Option<(Question, UriQuery)>,
        fragment: Option<(Hash, UriFragment)>,
    }

    /// `"//" authority path-abempty`
    AuthorityPath = "hier-part-authority" {
        slashes: DoubleSlash,
        authority: Authority,
        path: PathAbempty,
    }

    Authority = "authority" {
        userinfo: Option<(UserInfo, PlainAt)>,
        host: Host,
        port: Option<(PlainColon, Port)>,
    }

    IpLiteral = "IP-literal" {
        open: IpLiteralOpen,
        address: IpLiteralAddress,
        close: IpLiteralClose,
    }
}

impl Uri {
    pub fn authority(&self) -> Option<&Authority> {
        match &self.hier {
            HierPart::Authority(part) => Some(&part.authority),
            _ => None,
        }
    }
}

impl Ipv6Address {
    pub fn addr(&self) -> Option<Ipv6Addr> {
        self.as_str().parse().ok()
    }
}

fn scheme(lx: &mut Lexer<'_>) -> bool {
    lx.eat(charclass::is_alpha) && lx.repeat(0, None, |lx| lx.eat_class(CharClass::SchemeChar))
}

fn userinfo(lx: &mut Lexer<'_>) -> bool {
    lx.repeat(0, None, |lx| {
        lx.eat_class(CharClass::Unreserved)
            || lx.eat_pct(PctVariant::Any)
            || lx.eat_class(CharClass::SubDelims)
            || lx.eat_char(':')
    })
}

fn port(lx: &mut Lexer<'_>) -> bool {
    lx.digits(0, None)
}

fn ipv6_address(lx: &mut Lexer<'_>) -> bool {
    let rest = lx.rest();
    let len = rest
        .find(|ch: char| !(ch.is_ascii_hexdigit() || ch == ':' || ch == '.'))
        .unwrap_or(rest.len());
    if len == 0 || rest[..len].parse::<Ipv6Addr>().is_err() {
        return false;
    }
    lx.reset(lx.pos() + len);
    true
}

/// `"v" 1*HEXDIG "." 1*( unreserved / sub-delims / ":" )`
fn ipv_future(lx: &mut Lexer<'_>) -> bool {
    lx.attempt(|lx| {
        lx.eat_str_ci("v")
            && lx.repeat(1, None, |lx| lx.eat(charclass::is_hexdig))
            && lx.eat_char('.')
            && lx.repeat(1, None, |lx| {
                lx.eat_class(CharClass::Unreserved) || lx.eat_class(CharClass::SubDelims) || lx.eat_char(':')
            })
    })
}

/// Four dotted octets, not followed by anything that would continue a `reg-name`
fn ipv4_address(lx: &mut Lexer<'_>) -> bool {
    lx.attempt(|lx| {
        let dotted = dec_octet(lx) && (0..3).all(|_| lx.eat_char('.') && dec_octet(lx));
        dotted && !continues_reg_name(lx)
    })
}

/// Longest of `"25" %x30-35 / "2" %x30-34 DIGIT / "1" 2DIGIT / %x31-39 DIGIT / DIGIT`
fn dec_octet(lx: &mut Lexer<'_>) -> bool {
    let digits: String = lx.rest().chars().take_while(char::is_ascii_digit).take(3).collect();
    let valid = (1..=digits.len()).rev().find(|&n| {
        let head = &digits[..n];
        (n == 1 || !head.starts_with('0')) && head.parse::<u16>().is_ok_and(|v| v <= 255)
    });
    match valid {
        Some(n) => {
            lx.reset(lx.pos() + n);
            true
        }
        None => false,
    }
}

fn continues_reg_name(lx: &Lexer<'_>) -> bool {
    lx.peek().is_some_and(|ch| {
        ch == '%' || CharClass::Unreserved.contains(ch) || CharClass::SubDelims.contains(ch)
    })
}

fn reg_name(lx: &mut Lexer<'_>) -> bool {
    lx.repeat(0, None, |lx| {
        lx.eat_class(CharClass::Unreserved) || lx.eat_pct(PctVariant::Any) || lx.eat_class(CharClass::SubDelims)
    })
}

fn segment(lx: &mut Lexer<'_>) -> bool {
    lx.repeat(0, None, lexer::pchar)
}

fn segment_nz(lx: &mut Lexer<'_>) -> bool {
    lx.repeat(1, None, lexer::pchar)
}

/// `*( "/" segment )`
fn path_abempty(lx: &mut Lexer<'_>) -> bool {
    lx.repeat(0, None, |lx| lx.eat_char('/') && segment(lx))
}

/// `"/" [ segment-nz *( "/" segment ) ]`
fn path_absolute(lx: &mut Lexer<'_>) -> bool {
    lx.eat_char('/') && {
        lx.attempt(path_rootless);
        true
    }
}

fn path_rootless(lx: &mut Lexer<'_>) -> bool {
    segment_nz(lx) && path_abempty(lx)
}

/// `*( pchar / "/" / "?" )`
fn query_or_fragment(lx: &mut Lexer<'_>) -> bool {
    lx.repeat(0, None, |lx| lexer::pchar(lx) || lx.eat_char('/') || lx.eat_char('?'))
}

fn iri_in_query(lx: &mut Lexer<'_>) -> bool {
    lx.repeat(1, None, lexer::qchar_no_amp)
}

fn iri_in_header(lx: &mut Lexer<'_>) -> bool {
    lx.repeat(1, None, |lx| lx.eat_class(CharClass::Vchar) || lx.eat_class(CharClass::ObsText))
}
