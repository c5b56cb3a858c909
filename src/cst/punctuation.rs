//! Punctuation, whitespace and JSON delimiters
//!
//! Terminals with a percent-encoded twin list both spellings; the plain
//! character is canonical.

use crate::lexer;

literals! {
    At = "AT", Insensitive ["@", "%40"];
    Colon = "COLON", Insensitive [":", "%3A"];
    Comma = "COMMA", Insensitive [",", "%2C"];
    Eq = "EQ", Sensitive ["="];
    Plus = "\"+\"", Insensitive ["+", "%2B"];
    Minus = "\"-\"", Sensitive ["-"];
    Semi = "SEMI", Insensitive [";", "%3B"];
    /// Unencoded semicolon of header parameters
    PlainSemi = "\";\"", Sensitive [";"];
    Star = "STAR", Insensitive ["*", "%2A"];
    Squote = "SQUOTE", Insensitive ["'", "%27"];
    Open = "OPEN", Insensitive ["(", "%28"];
    Close = "CLOSE", Insensitive [")", "%29"];
    Dquote = "DQUOTE", Sensitive ["\""];
    QuotationMark = "quotation-mark", Insensitive ["\"", "%22"];
    Escape = "escape", Insensitive ["\\", "%5C"];
    Sp = "SP", Sensitive [" "];
    Slash = "\"/\"", Sensitive ["/"];
    /// Solidus inside JSON strings, literal or encoded
    Solidus = "solidus", Insensitive ["/", "%2F"];
    Dot = "\".\"", Sensitive ["."];
    Amp = "\"&\"", Sensitive ["&"];
    Question = "\"?\"", Sensitive ["?"];
    Hash = "\"#\"", Sensitive ["#"];
    /// Unencoded colon of times, URIs and header names
    PlainColon = "\":\"", Sensitive [":"];
    LeftBrace = "\"{\"", Insensitive ["{", "%7B"];
    RightBrace = "\"}\"", Insensitive ["}", "%7D"];
    LeftBracket = "\"[\"", Insensitive ["[", "%5B"];
    RightBracket = "\"]\"", Insensitive ["]", "%5D"];
}

tokens! {
    /// `1*( SP / HTAB / "%20" / "%09" )`
    Rws = "RWS", lexer::rws;
    /// `*( SP / HTAB / "%20" / "%09" )`
    Bws = "BWS", lexer::bws;
    /// `*( SP / HTAB )`
    Ows = "OWS", lexer::ows;
    BwsH = "BWS-h", lexer::ows;
    Digits = "1*DIGIT", lexer::digits;
    PctEncoded = "pct-encoded", lexer::pct_encoded;
}

alternations! {
    Sign = "SIGN" {
        Plus(Plus),
        Minus(Minus),
    }
}

sequences! {
    EqH = "EQ-h" {
        before: BwsH,
        eq: Eq,
        after: BwsH,
    }

    BeginObject = "begin-object" {
        before: Bws,
        brace: LeftBrace,
        after: Bws,
    }

    EndObject = "end-object" {
        before: Bws,
        brace: RightBrace,
    }

    BeginArray = "begin-array" {
        before: Bws,
        bracket: LeftBracket,
        after: Bws,
    }

    EndArray = "end-array" {
        before: Bws,
        bracket: RightBracket,
    }

    NameSeparator = "name-separator" {
        before: Bws,
        colon: Colon,
        after: Bws,
    }

    ValueSeparator = "value-separator" {
        before: Bws,
        comma: Comma,
        after: Bws,
    }
}
