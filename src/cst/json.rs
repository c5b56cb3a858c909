//! JSON values inside URLs
//!
//! Function parameters and `in` operands may carry JSON arrays and objects.
//! The delimiters accept their percent-encoded forms and optional whitespace,
//! since these values arrive in the query part of a URL.

use super::expressions::RootExpr;
use super::names::{
    ComplexColProperty, ComplexProperty, EntityColNavigationProperty, EntityNavigationProperty,
    Namespace, PrimitiveColProperty, PrimitiveProperty, TermName,
};
use super::punctuation::{
    At, BeginArray, BeginObject, Dot, EndArray, EndObject, NameSeparator, QuotationMark,
    ValueSeparator,
};
use crate::charclass::{self, CharClass, PctVariant};
use crate::lexer::Lexer;

literals! {
    JsonTrue = "'true'", Sensitive word ["true"];
    JsonFalse = "'false'", Sensitive word ["false"];
    JsonNull = "'null'", Sensitive word ["null"];
}

tokens! {
    /// `*charInJSON`
    JsonStringContent = "charInJSON", json_string_content;
    NumberInJson = "numberInJSON", number_in_json;
}

alternations! {
    ArrayOrObject = "arrayOrObject" {
        ComplexCol(Box<ComplexColInUri>),
        Complex(Box<ComplexInUri>),
        RootExprCol(Box<RootExprCol>),
        PrimitiveCol(PrimitiveColInUri),
    }

    /// Members are told apart by their values: property names are plain
    /// identifiers whatever their type.
    ComplexMember = "complexInUri-member" {
        Annotation(Box<AnnotationInUri>),
        Primitive(PrimitivePropertyInUri),
        Complex(ComplexPropertyInUri),
        Collection(Box<CollectionPropertyInUri>),
        Navigation(Box<NavigationPropertyInUri>),
    }

    CollectionPropertyInUri = "collectionPropertyInUri" {
        Primitive(PrimitiveColPropertyInUri),
        Complex(ComplexColPropertyInUri),
    }

    AnnotationValue = "annotationInUri-value" {
        Complex(Box<ComplexInUri>),
        ComplexCol(Box<ComplexColInUri>),
        Primitive(PrimitiveLiteralInJson),
        PrimitiveCol(PrimitiveColInUri),
    }

    NavigationPropertyInUri = "navigationPropertyInUri" {
        Single(SingleNavPropInJson),
        Collection(CollectionNavPropInJson),
    }

    PrimitiveLiteralInJson = "primitiveLiteralInJSON" {
        String(StringInJson),
        Number(NumberInJson),
        True(JsonTrue),
        False(JsonFalse),
        Null(JsonNull),
    }
}

sequences! {
    ComplexColInUri = "complexColInUri" {
        begin: BeginArray,
        items: Option<(ComplexInUri, Vec<(ValueSeparator, ComplexInUri)>)>,
        end: EndArray,
    }

    ComplexInUri = "complexInUri" {
        begin: BeginObject,
        members: Option<(ComplexMember, Vec<(ValueSeparator, ComplexMember)>)>,
        end: EndObject,
    }

    PrimitiveColPropertyInUri = "collectionPropertyInUri-primitive" {
        open: QuotationMark,
        property: PrimitiveColProperty,
        close: QuotationMark,
        sep: NameSeparator,
        value: PrimitiveColInUri,
    }

    ComplexColPropertyInUri = "collectionPropertyInUri-complex" {
        open: QuotationMark,
        property: ComplexColProperty,
        close: QuotationMark,
        sep: NameSeparator,
        value: ComplexColInUri,
    }

    PrimitiveColInUri = "primitiveColInUri" {
        begin: BeginArray,
        items: Option<(PrimitiveLiteralInJson, Vec<(ValueSeparator, PrimitiveLiteralInJson)>)>,
        end: EndArray,
    }

    ComplexPropertyInUri = "complexPropertyInUri" {
        open: QuotationMark,
        property: ComplexProperty,
        close: QuotationMark,
        sep: NameSeparator,
        value: Box<ComplexInUri>,
    }

    AnnotationInUri = "annotationInUri" {
        open: QuotationMark,
        at: At,
        namespace: Namespace,
        dot: Dot,
        term: TermName,
        close: QuotationMark,
        sep: NameSeparator,
        value: AnnotationValue,
    }

    PrimitivePropertyInUri = "primitivePropertyInUri" {
        open: QuotationMark,
        property: PrimitiveProperty,
        close: QuotationMark,
        sep: NameSeparator,
        value: PrimitiveLiteralInJson,
    }

    SingleNavPropInJson = "singleNavPropInJSON" {
        open: QuotationMark,
        property: EntityNavigationProperty,
        close: QuotationMark,
        sep: NameSeparator,
        value: RootExpr,
    }

    CollectionNavPropInJson = "collectionNavPropInJSON" {
        open: QuotationMark,
        property: EntityColNavigationProperty,
        close: QuotationMark,
        sep: NameSeparator,
        value: RootExprCol,
    }

    RootExprCol = "rootExprCol" {
        begin: BeginArray,
        items: Option<(RootExpr, Vec<(ValueSeparator, RootExpr)>)>,
        end: EndArray,
    }

    StringInJson = "stringInJSON" {
        open: QuotationMark,
        content: JsonStringContent,
        close: QuotationMark,
    }
}

impl ComplexInUri {
    /// Members in source order
    pub fn members(&self) -> impl Iterator<Item = &ComplexMember> {
        self.members
            .iter()
            .flat_map(|(first, rest)| std::iter::once(first).chain(rest.iter().map(|(_, m)| m)))
    }
}

impl PrimitiveColInUri {
    pub fn items(&self) -> impl Iterator<Item = &PrimitiveLiteralInJson> {
        self.items
            .iter()
            .flat_map(|(first, rest)| std::iter::once(first).chain(rest.iter().map(|(_, v)| v)))
    }
}

fn escape(lx: &mut Lexer<'_>) -> bool {
    lx.eat_encoded('\\', "%5C")
}

/// `escape ( quotation-mark / escape / solidus / 'b' / 'f' / 'n' / 'r' / 't' / 'u' 4HEXDIG )`
fn escaped_char(lx: &mut Lexer<'_>) -> bool {
    lx.attempt(|lx| {
        escape(lx)
            && (lx.eat_encoded('"', "%22")
                || escape(lx)
                || lx.eat_encoded('/', "%2F")
                || lx.eat(|ch| "bfnrt".contains(ch))
                || lx.attempt(|lx| {
                    lx.eat_char('u') && lx.repeat(4, Some(4), |lx| lx.eat(charclass::is_hexdig))
                }))
    })
}

fn json_string_content(lx: &mut Lexer<'_>) -> bool {
    lx.repeat(0, None, |lx| {
        lx.eat_class(CharClass::QcharUnescaped)
            || lx.eat_pct(PctVariant::Unescaped)
            || lx.eat_class(CharClass::QcharJsonSpecial)
            || escaped_char(lx)
    })
}

/// `[ "-" ] int [ frac ] [ exp ]`
fn number_in_json(lx: &mut Lexer<'_>) -> bool {
    lx.attempt(|lx| {
        lx.eat_char('-');
        let int = lx.eat_char('0')
            || lx.attempt(|lx| lx.eat(|ch| ('1'..='9').contains(&ch)) && lx.digits(0, None));
        if !int {
            return false;
        }
        lx.attempt(|lx| lx.eat_char('.') && lx.digits(1, None));
        lx.attempt(|lx| {
            if !lx.eat_str_ci("e") {
                return false;
            }
            let _ = lx.eat_char('-') || lx.eat_char('+');
            lx.digits(1, None)
        });
        true
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinator::Parse;
    use crate::input_stream::Cursor;
    use crate::native_parser::parse_complete;
    use crate::parse_context::{NoMatch, ParseContext};
    use crate::printer::print;
    use rstest::rstest;

    #[test]
    fn test_object_members_by_value_shape() {
        let input = r#"{"Name":"Bob","Address":{"City":"Oslo"},"Tags":["a","b"]}"#;
        let obj = parse_complete::<ComplexInUri>(input).unwrap().node;
        let kinds: Vec<&str> = obj.members().map(|m| m.variant_name()).collect();
        assert_eq!(kinds, vec!["Primitive", "Complex", "Collection"]);
        assert_eq!(print(&obj), input);
    }

    #[test]
    fn test_encoded_delimiters() {
        let input = "%5B%22a%22%2C 1%5D";
        let value = parse_complete::<ArrayOrObject>(input).unwrap().node;
        let ArrayOrObject::PrimitiveCol(col) = &value else {
            panic!("expected primitive collection, got {}", value.variant_name());
        };
        assert_eq!(col.items().count(), 2);
    }

    #[test]
    fn test_annotation_member() {
        let obj = parse_complete::<ComplexInUri>(r#"{"@Core.Description":"x"}"#).unwrap().node;
        assert!(matches!(obj.members().next(), Some(ComplexMember::Annotation(_))));
    }

    #[test]
    fn test_navigation_member() {
        let obj = parse_complete::<ComplexInUri>(r#"{"Orders":[$root/Orders(1)]}"#).unwrap().node;
        let Some(ComplexMember::Navigation(nav)) = obj.members().next() else {
            panic!("expected navigation member");
        };
        assert_eq!(nav.variant_name(), "Collection");
    }

    #[test]
    fn test_empty_containers() {
        assert!(matches!(parse_complete::<ArrayOrObject>("[]").unwrap().node, ArrayOrObject::ComplexCol(_)));
        assert!(matches!(parse_complete::<ArrayOrObject>("{}").unwrap().node, ArrayOrObject::Complex(_)));
    }

    #[rstest]
    #[case::escapes(r#""a\"b\\c\/d\n""#, true)]
    #[case::unicode(r#""\u00e9""#, true)]
    #[case::non_ascii("\"é\"", false)]
    #[case::bad_unicode(r#""\u00g9""#, false)]
    #[case::special(r#""a:{b}""#, true)]
    #[case::unknown_escape(r#""a\x""#, false)]
    fn test_strings(#[case] input: &str, #[case] ok: bool) {
        assert_eq!(parse_complete::<StringInJson>(input).is_ok(), ok);
    }

    #[rstest]
    #[case("0", true)]
    #[case("-12.5e+3", true)]
    #[case("1E5", true)]
    #[case("01", false)]
    #[case("1.", false)]
    fn test_numbers(#[case] input: &str, #[case] ok: bool) {
        assert_eq!(parse_complete::<NumberInJson>(input).is_ok(), ok);
    }

    #[test]
    fn test_nested_complex_collection() {
        let input = r#"{"Items":[{"A":1},{"B":{"C":[]}}]}"#;
        let obj = parse_complete::<ComplexInUri>(input).unwrap().node;
        let Some(ComplexMember::Collection(items)) = obj.members().next() else {
            panic!("expected a collection member");
        };
        let CollectionPropertyInUri::Complex(col) = &**items else {
            panic!("expected a complex collection, got {}", items.variant_name());
        };
        assert_eq!(col.value.items.as_ref().map(|(_, rest)| rest.len()), Some(1));
        assert_eq!(print(&obj), input);
    }

    #[test]
    fn test_truncated_object_returns_nothing() {
        let mut ctx = ParseContext::new();
        let input = Cursor::new(r#"x={"a":1,"#).advance(2);

        assert!(matches!(ComplexInUri::parse(input, &mut ctx), Err(NoMatch)));
        assert!(matches!(ArrayOrObject::parse(input, &mut ctx), Err(NoMatch)));
        assert_eq!(input.position(), 2);
        assert_eq!(ctx.furthest, input.source().len());

        // a different reading of the same text starts where the object did
        let ((begin, member, sep), rest) =
            <(BeginObject, ComplexMember, ValueSeparator)>::parse(input, &mut ctx).unwrap();
        assert_eq!(begin.span.start, 2);
        assert_eq!(member.variant_name(), "Primitive");
        assert_eq!(print(&member), r#""a":1"#);
        assert_eq!(print(&sep), ",");
        assert!(rest.is_eof());
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        assert!(parse_complete::<PrimitiveLiteralInJson>("true").is_ok());
        assert!(parse_complete::<PrimitiveLiteralInJson>("TRUE").is_err());
    }
}
