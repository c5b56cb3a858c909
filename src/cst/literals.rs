//! Literal data values
//!
//! `primitiveLiteral` is the URL form (quoted strings, prefixed binary and
//! geo literals); `primitiveValue` is the bare form used in payloads and
//! header values.

use super::geo::*;
use super::names::{EnumerationMember, QualifiedEnumTypeName};
use super::punctuation::{Comma, Digits, Dot, Minus, PlainColon, Sign, Squote};
use crate::charclass::{self, CharClass, PctVariant};
use crate::lexer::{self, Lexer};

literals! {
    NullValue = "nullValue", Sensitive word ["null"];
    TrueKw = "\"true\"", Insensitive word ["true"];
    FalseKw = "\"false\"", Insensitive word ["false"];
    NanKw = "'NaN'", Sensitive word ["NaN"];
    NegInfKw = "'-INF'", Sensitive word ["-INF"];
    InfKw = "'INF'", Sensitive word ["INF"];
    ExponentMarker = "\"e\"", Insensitive ["e"];
    BinaryKw = "\"binary\"", Insensitive ["binary"];
    DurationKw = "\"duration\"", Insensitive ["duration"];
    TimeSeparator = "\"T\"", Insensitive ["T"];
    UtcKw = "\"Z\"", Insensitive ["Z"];
}

tokens! {
    GuidValue = "guidValue", guid_value;
    Year = "year", year;
    Month = "month", month;
    Day = "day", day;
    Hour = "hour", hour;
    Minute = "minute", zero_to_fifty_nine;
    Second = "second", zero_to_fifty_nine;
    FractionalSeconds = "fractionalSeconds", fractional_seconds;
    OneToNine = "oneToNine", one_to_nine;
    /// `oneToNine *DIGIT`
    PositiveInteger = "positiveInteger", positive_integer;
    Digits3 = "1*3DIGIT", digits3;
    Digits5 = "1*5DIGIT", digits5;
    Digits10 = "1*10DIGIT", digits10;
    Digits19 = "1*19DIGIT", digits19;
    /// Body of a single-quoted string, doubled quotes included
    StringContent = "string-content", string_content;
    DurationValue = "durationValue", duration_value;
    BinaryValue = "binaryValue", binary_value;
}

alternations! {
    /// Declaration order is part of the contract. `dateTimeOffsetValue` is
    /// tried before `dateValue`, which would otherwise match its prefix.
    PrimitiveLiteral = "primitiveLiteral" {
        Null(NullValue),
        Boolean(BooleanValue),
        Guid(GuidValue),
        DateTimeOffset(Box<DateTimeOffsetValue>),
        Date(DateValue),
        TimeOfDay(Box<TimeOfDayValue>),
        Decimal(DecimalValue),
        Double(DoubleValue),
        Single(SingleValue),
        SByte(SByteValue),
        Byte(ByteValue),
        Int16(Int16Value),
        Int32(Int32Value),
        Int64(Int64Value),
        String(StringLiteral),
        Duration(Duration),
        Enum(Box<EnumLiteral>),
        Binary(Binary),
        GeographyCollection(Box<GeographyCollection>),
        GeographyLineString(Box<GeographyLineString>),
        GeographyMultiLineString(Box<GeographyMultiLineString>),
        GeographyMultiPoint(Box<GeographyMultiPoint>),
        GeographyMultiPolygon(Box<GeographyMultiPolygon>),
        GeographyPoint(Box<GeographyPoint>),
        GeographyPolygon(Box<GeographyPolygon>),
        GeometryCollection(Box<GeometryCollection>),
        GeometryLineString(Box<GeometryLineString>),
        GeometryMultiLineString(Box<GeometryMultiLineString>),
        GeometryMultiPoint(Box<GeometryMultiPoint>),
        GeometryMultiPolygon(Box<GeometryMultiPolygon>),
        GeometryPoint(Box<GeometryPoint>),
        GeometryPolygon(Box<GeometryPolygon>),
    }

    /// Unquoted values. Numbers come before `enumValue`, whose
    /// `enumMemberValue` would otherwise claim the integer part of `1.5`.
    PrimitiveValue = "primitiveValue" {
        Boolean(BooleanValue),
        Guid(GuidValue),
        Duration(DurationValue),
        DateTimeOffset(DateTimeOffsetValue),
        Date(DateValue),
        TimeOfDay(TimeOfDayValue),
        Collection(FullCollectionLiteral),
        LineString(FullLineStringLiteral),
        MultiPoint(FullMultiPointLiteral),
        MultiLineString(FullMultiLineStringLiteral),
        MultiPolygon(FullMultiPolygonLiteral),
        Point(FullPointLiteral),
        Polygon(FullPolygonLiteral),
        Decimal(DecimalValue),
        Double(DoubleValue),
        Single(SingleValue),
        SByte(SByteValue),
        Byte(ByteValue),
        Int16(Int16Value),
        Int32(Int32Value),
        Int64(Int64Value),
        Enum(EnumValue),
        Binary(BinaryValue),
    }

    BooleanValue = "booleanValue" {
        True(TrueKw),
        False(FalseKw),
    }

    DecimalValue = "decimalValue" {
        Number(DecimalNumber),
        NanInfinity(NanInfinity),
    }

    NanInfinity = "nanInfinity" {
        NaN(NanKw),
        NegativeInfinity(NegInfKw),
        Infinity(InfKw),
    }

    TimeZone = "dateTimeOffsetValue-zone" {
        Utc(UtcKw),
        Offset(ZoneOffset),
    }

    SingleEnumValue = "singleEnumValue" {
        Member(EnumerationMember),
        Value(EnumMemberValue),
    }
}

sequences! {
    DecimalNumber = "decimalValue-number" {
        sign: Option<Sign>,
        integer: Digits,
        fraction: Option<DecimalFraction>,
        exponent: Option<DecimalExponent>,
    }

    DecimalFraction = "decimalValue-fraction" {
        dot: Dot,
        digits: Digits,
    }

    DecimalExponent = "decimalValue-exponent" {
        marker: ExponentMarker,
        sign: Option<Sign>,
        digits: Digits,
    }

    DoubleValue = "doubleValue" {
        value: DecimalValue,
    }

    SingleValue = "singleValue" {
        value: DecimalValue,
    }

    ByteValue = "byteValue" {
        digits: Digits3,
    }

    SByteValue = "sbyteValue" {
        sign: Option<Sign>,
        digits: Digits3,
    }

    Int16Value = "int16Value" {
        sign: Option<Sign>,
        digits: Digits5,
    }

    Int32Value = "int32Value" {
        sign: Option<Sign>,
        digits: Digits10,
    }

    Int64Value = "int64Value" {
        sign: Option<Sign>,
        digits: Digits19,
    }

    StringLiteral = "string" {
        open: Squote,
        content: StringContent,
        close: Squote,
    }

    DateValue = "dateValue" {
        year: Year,
        year_sep: Minus,
        month: Month,
        month_sep: Minus,
        day: Day,
    }

    DateTimeOffsetValue = "dateTimeOffsetValue" {
        year: Year,
        year_sep: Minus,
        month: Month,
        month_sep: Minus,
        day: Day,
        time_sep: TimeSeparator,
        hour: Hour,
        colon: PlainColon,
        minute: Minute,
        seconds: Option<TimeSeconds>,
        zone: TimeZone,
    }

    TimeSeconds = "time-seconds" {
        colon: PlainColon,
        second: Second,
        fraction: Option<TimeFraction>,
    }

    TimeFraction = "time-fraction" {
        dot: Dot,
        digits: FractionalSeconds,
    }

    ZoneOffset = "dateTimeOffsetValue-offset" {
        sign: Sign,
        hour: Hour,
        colon: PlainColon,
        minute: Minute,
    }

    TimeOfDayValue = "timeOfDayValue" {
        hour: Hour,
        colon: PlainColon,
        minute: Minute,
        seconds: Option<TimeSeconds>,
    }

    Duration = "duration" {
        prefix: Option<DurationKw>,
        open: Squote,
        value: DurationValue,
        close: Squote,
    }

    EnumLiteral = "enum" {
        type_name: Option<QualifiedEnumTypeName>,
        open: Squote,
        value: EnumValue,
        close: Squote,
    }

    EnumValue = "enumValue" {
        first: SingleEnumValue,
        rest: Vec<(Comma, SingleEnumValue)>,
    }

    EnumMemberValue = "enumMemberValue" {
        value: Int64Value,
    }

    Binary = "binary" {
        prefix: BinaryKw,
        open: Squote,
        value: BinaryValue,
        close: Squote,
    }
}

impl StringLiteral {
    /// Content with doubled quotes collapsed; percent-encoding is left alone
    pub fn unquoted(&self) -> String {
        let mut lx = Lexer::new(self.content.as_str());
        let mut out = String::new();
        while !lx.is_eof() {
            let start = lx.pos();
            if lx.attempt(|lx| squote(lx) && squote(lx)) {
                out.push('\'');
            } else if lx.eat(|_| true) {
                out.push_str(&self.content.as_str()[start..lx.pos()]);
            }
        }
        out
    }
}

fn exact_hex(lx: &mut Lexer<'_>, n: usize) -> bool {
    lx.repeat(n, Some(n), |lx| lx.eat(charclass::is_hexdig))
}

/// `8HEXDIG "-" 4HEXDIG "-" 4HEXDIG "-" 4HEXDIG "-" 12HEXDIG`
fn guid_value(lx: &mut Lexer<'_>) -> bool {
    lx.attempt(|lx| {
        exact_hex(lx, 8)
            && lx.eat_char('-')
            && exact_hex(lx, 4)
            && lx.eat_char('-')
            && exact_hex(lx, 4)
            && lx.eat_char('-')
            && exact_hex(lx, 4)
            && lx.eat_char('-')
            && exact_hex(lx, 12)
    })
}

fn one_to_nine(lx: &mut Lexer<'_>) -> bool {
    lx.eat(|ch| ('1'..='9').contains(&ch))
}

fn positive_integer(lx: &mut Lexer<'_>) -> bool {
    one_to_nine(lx) && lx.digits(0, None)
}

/// `[ "-" ] ( "0" 3DIGIT / oneToNine 3*DIGIT )`
fn year(lx: &mut Lexer<'_>) -> bool {
    lx.attempt(|lx| {
        lx.eat_char('-');
        lx.attempt(|lx| lx.eat_char('0') && lx.exact_digits(3))
            || lx.attempt(|lx| one_to_nine(lx) && lx.digits(3, None))
    })
}

fn month(lx: &mut Lexer<'_>) -> bool {
    lx.attempt(|lx| lx.eat_char('0') && one_to_nine(lx))
        || lx.attempt(|lx| lx.eat_char('1') && lx.eat(|ch| ('0'..='2').contains(&ch)))
}

fn day(lx: &mut Lexer<'_>) -> bool {
    lx.attempt(|lx| lx.eat_char('0') && one_to_nine(lx))
        || lx.attempt(|lx| lx.eat(|ch| ch == '1' || ch == '2') && lx.eat(charclass::is_digit))
        || lx.attempt(|lx| lx.eat_char('3') && lx.eat(|ch| ch == '0' || ch == '1'))
}

fn hour(lx: &mut Lexer<'_>) -> bool {
    lx.attempt(|lx| lx.eat(|ch| ch == '0' || ch == '1') && lx.eat(charclass::is_digit))
        || lx.attempt(|lx| lx.eat_char('2') && lx.eat(|ch| ('0'..='3').contains(&ch)))
}

fn zero_to_fifty_nine(lx: &mut Lexer<'_>) -> bool {
    lx.attempt(|lx| lx.eat(|ch| ('0'..='5').contains(&ch)) && lx.eat(charclass::is_digit))
}

fn fractional_seconds(lx: &mut Lexer<'_>) -> bool {
    lx.digits(1, Some(12))
}

fn digits3(lx: &mut Lexer<'_>) -> bool {
    lx.digits(1, Some(3))
}

fn digits5(lx: &mut Lexer<'_>) -> bool {
    lx.digits(1, Some(5))
}

fn digits10(lx: &mut Lexer<'_>) -> bool {
    lx.digits(1, Some(10))
}

fn digits19(lx: &mut Lexer<'_>) -> bool {
    lx.digits(1, Some(19))
}

fn squote(lx: &mut Lexer<'_>) -> bool {
    lx.eat_encoded('\'', "%27")
}

/// `*( SQUOTE-in-string / pchar-no-SQUOTE )`
fn string_content(lx: &mut Lexer<'_>) -> bool {
    lx.repeat(0, None, |lx| {
        lx.attempt(|lx| squote(lx) && squote(lx))
            || lx.eat_class(CharClass::PcharNoSquote)
            || lx.eat_pct(PctVariant::NoSquote)
    })
}

/// `[ SIGN ] "P" [ 1*DIGIT "D" ] [ "T" [ 1*DIGIT "H" ] [ 1*DIGIT "M" ] [ 1*DIGIT [ "." 1*DIGIT ] "S" ] ]`
///
/// At least one component must follow `P` (and `T`), and the value must not
/// run into an identifier, so enum members such as `Pending` are not read as
/// a bare `P`.
fn duration_value(lx: &mut Lexer<'_>) -> bool {
    lx.attempt(|lx| {
        lexer::sign(lx);
        if !lx.eat_str_ci("P") {
            return false;
        }
        let days = component(lx, "D");
        let time = lx.attempt(|lx| {
            if !lx.eat_str_ci("T") {
                return false;
            }
            let hours = component(lx, "H");
            let minutes = component(lx, "M");
            let seconds = lx.attempt(|lx| {
                if !lx.digits(1, None) {
                    return false;
                }
                lx.attempt(|lx| lx.eat_char('.') && lx.digits(1, None));
                lx.eat_str_ci("S")
            });
            hours || minutes || seconds
        });
        (days || time) && !lx.peek().is_some_and(charclass::is_identifier_char)
    })
}

fn component(lx: &mut Lexer<'_>, designator: &str) -> bool {
    lx.attempt(|lx| lx.digits(1, None) && lx.eat_str_ci(designator))
}

fn base64char(lx: &mut Lexer<'_>) -> bool {
    lx.eat_class(CharClass::Base64)
}

/// `*(4base64char) [ base64b16 / base64b8 ]`
fn binary_value(lx: &mut Lexer<'_>) -> bool {
    lx.repeat(0, None, |lx| lx.attempt(|lx| (0..4).all(|_| base64char(lx))));
    let b16 = lx.attempt(|lx| {
        if !(base64char(lx) && base64char(lx) && lx.eat(|ch| "AEIMQUYcgkosw048".contains(ch))) {
            return false;
        }
        lx.eat_char('=');
        true
    });
    if !b16 {
        lx.attempt(|lx| {
            if !(base64char(lx) && lx.eat(|ch| "AQgw".contains(ch))) {
                return false;
            }
            lx.eat_str("==");
            true
        });
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native_parser::parse_complete;
    use crate::printer::{print, print_canonical};

    #[test]
    fn test_boolean_case_insensitive() {
        let lower = parse_complete::<BooleanValue>("true").unwrap().node;
        let upper = parse_complete::<BooleanValue>("TRUE").unwrap().node;
        assert!(matches!(lower, BooleanValue::True(_)));
        assert!(matches!(upper, BooleanValue::True(_)));
        assert_ne!(lower, upper);
        assert_eq!(print(&upper), "TRUE");
        assert_eq!(print_canonical(&upper), "true");
    }

    #[test]
    fn test_keywords_respect_word_boundary() {
        assert!(parse_complete::<PrimitiveLiteral>("nullable").is_err());
        let lit = parse_complete::<PrimitiveLiteral>("null").unwrap().node;
        assert_eq!(lit.variant_name(), "Null");
    }

    #[test]
    fn test_date_time_offset_before_date() {
        let lit = parse_complete::<PrimitiveLiteral>("2012-12-03T07:16:23Z").unwrap().node;
        assert_eq!(lit.variant_name(), "DateTimeOffset");
        let lit = parse_complete::<PrimitiveLiteral>("2012-12-03").unwrap().node;
        assert_eq!(lit.variant_name(), "Date");
        let lit = parse_complete::<PrimitiveLiteral>("2012-12-03T07:16:23.5-08:00").unwrap().node;
        assert_eq!(lit.variant_name(), "DateTimeOffset");
    }

    #[test]
    fn test_numbers() {
        let lit = parse_complete::<PrimitiveLiteral>("-1.5e+10").unwrap().node;
        match lit {
            PrimitiveLiteral::Decimal(DecimalValue::Number(n)) => {
                assert!(n.sign.is_some());
                assert_eq!(n.integer.as_str(), "1");
                assert!(n.exponent.is_some());
            }
            other => panic!("unexpected {other:?}"),
        }
        let lit = parse_complete::<PrimitiveLiteral>("-INF").unwrap().node;
        assert!(matches!(
            lit,
            PrimitiveLiteral::Decimal(DecimalValue::NanInfinity(NanInfinity::NegativeInfinity(_)))
        ));
    }

    #[test]
    fn test_string_escapes() {
        let s = parse_complete::<StringLiteral>("'O''Neil'").unwrap().node;
        assert_eq!(s.unquoted(), "O'Neil");
        let s = parse_complete::<StringLiteral>("%27Bob%27").unwrap().node;
        assert_eq!(print(&s), "%27Bob%27");
        assert_eq!(print_canonical(&s), "'Bob'");
        assert!(parse_complete::<StringLiteral>("'open").is_err());
    }

    #[test]
    fn test_guid_and_duration() {
        let lit = parse_complete::<PrimitiveLiteral>("01234567-89ab-cdef-0123-456789ABCDEF").unwrap().node;
        assert_eq!(lit.variant_name(), "Guid");
        let lit = parse_complete::<PrimitiveLiteral>("duration'P12DT23H59M59.999S'").unwrap().node;
        assert_eq!(lit.variant_name(), "Duration");
        assert!(DurationValue::try_new("P").is_none());
        assert!(DurationValue::try_new("-PT1H").is_some());
    }

    #[test]
    fn test_enum_and_binary() {
        let lit = parse_complete::<PrimitiveLiteral>("Sales.Pattern'Yellow,Red'").unwrap().node;
        match lit {
            PrimitiveLiteral::Enum(e) => {
                assert!(e.type_name.is_some());
                assert_eq!(e.value.rest.len(), 1);
            }
            other => panic!("unexpected {other:?}"),
        }
        let lit = parse_complete::<PrimitiveLiteral>("binary'T0RhdGE'").unwrap().node;
        assert_eq!(lit.variant_name(), "Binary");
    }

    #[test]
    fn test_primitive_value_order() {
        let v = parse_complete::<PrimitiveValue>("1.5").unwrap().node;
        assert_eq!(v.variant_name(), "Decimal");
        let v = parse_complete::<PrimitiveValue>("Pending").unwrap().node;
        assert_eq!(v.variant_name(), "Enum");
        let v = parse_complete::<PrimitiveValue>("P1D").unwrap().node;
        assert_eq!(v.variant_name(), "Duration");
        let v = parse_complete::<PrimitiveValue>("13:20:00").unwrap().node;
        assert_eq!(v.variant_name(), "TimeOfDay");
    }

    #[test]
    fn test_date_ranges() {
        assert!(parse_complete::<DateValue>("2020-13-01").is_err());
        assert!(parse_complete::<DateValue>("2020-02-31").is_ok());
        assert!(parse_complete::<DateValue>("-0001-01-01").is_ok());
        assert!(parse_complete::<TimeOfDayValue>("24:00").is_err());
    }
}
