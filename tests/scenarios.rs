//! End-to-end parses through the public API

use odata_cst::cst::{
    BooleanValue, Close, CollectionNavPath, CollectionNavigation, ComparisonExpr, Digits, Eq as EqualsSign, Header,
    KeyPredicate, KeyPropertyValue, OdataIdentifier, OdataRelativeUri, Open, PrimitiveLiteral, QueryOption,
    ResourcePath, SimpleKey, SimpleKeyValue, Squote, StringContent, StringLiteral, SystemQueryOption, Top, TopKw,
};
use odata_cst::traversal::descendants;
use odata_cst::{parse_complete, print, print_canonical, Node, ParseError, Parser, Span};
use rstest::rstest;

#[test]
fn test_weak_etag_round_trips() {
    let parser = Parser::default();
    let tag = parser.parse_entity_tag("W/\"etag-value\"").unwrap();
    assert_eq!(tag.consumed, 14);
    assert!(tag.node.is_weak());
    assert_eq!(tag.node.opaque(), "etag-value");
    assert_eq!(print(&tag.node), "W/\"etag-value\"");

    let header = parser.parse_header("ETag: W/\"etag-value\"").unwrap().node;
    let Header::ETag(etag) = &header else {
        panic!("expected an ETag header, got {}", header.variant_name());
    };
    // spans differ: the header's tag starts after `ETag: `
    assert_eq!(print(&etag.tag), print(&tag.node));
    assert_eq!(etag.tag.opaque(), tag.node.opaque());
    assert_eq!(etag.tag.span.start, 6);
    assert_eq!(print(&header), "ETag: W/\"etag-value\"");
}

#[rstest]
#[case::lower("true")]
#[case::upper("TRUE")]
#[case::mixed("True")]
fn test_boolean_keeps_its_casing(#[case] input: &str) {
    let value = parse_complete::<BooleanValue>(input).unwrap().node;
    assert!(matches!(value, BooleanValue::True(_)));
    assert_eq!(print(&value), input);
    assert_eq!(print_canonical(&value), "true");
}

#[test]
fn test_boolean_spellings_are_distinct_nodes() {
    let lower = parse_complete::<BooleanValue>("true").unwrap().node;
    let upper = parse_complete::<BooleanValue>("TRUE").unwrap().node;
    assert_eq!(lower.variant_name(), upper.variant_name());
    assert_ne!(lower, upper);
}

#[test]
fn test_built_trees_print_both_ways() {
    let top = QueryOption::System(Box::new(SystemQueryOption::Top(Top {
        keyword: TopKw {
            text: "TOP".into(),
            span: Span::DETACHED,
        },
        eq: EqualsSign::new(),
        count: Digits::try_new("5").unwrap(),
        span: Span::DETACHED,
    })));
    assert_eq!(print(&top), "TOP=5");
    assert_eq!(print_canonical(&top), "$top=5");
    assert_eq!(top.span(), Span::DETACHED);

    let name = StringLiteral {
        open: Squote::new(),
        content: StringContent::try_new("O''Neil").unwrap(),
        close: Squote {
            text: "%27".into(),
            span: Span::DETACHED,
        },
        span: Span::DETACHED,
    };
    let key = KeyPredicate::Simple(SimpleKey {
        open: Open {
            text: "%28".into(),
            span: Span::DETACHED,
        },
        value: SimpleKeyValue::Value(KeyPropertyValue {
            literal: PrimitiveLiteral::String(name),
            span: Span::DETACHED,
        }),
        close: Close::new(),
        span: Span::DETACHED,
    });
    assert_eq!(print(&key), "%28'O''Neil%27)");
    assert_eq!(print_canonical(&key), "('O''Neil')");

    // the canonical text parses back to a tree of the same shape
    let reparsed = parse_complete::<KeyPredicate>(&print_canonical(&key)).unwrap().node;
    assert_eq!(reparsed.variant_name(), key.variant_name());
    assert_eq!(print(&reparsed), print_canonical(&key));
}

#[test]
fn test_key_then_navigation_is_idempotent() {
    let input = "Orders(1)/Customer";
    let first = Parser::default().parse_relative_uri(input).unwrap();
    assert_eq!(first.consumed, input.len());

    let OdataRelativeUri::Resource(request) = &first.node else {
        panic!("expected a resource request, got {}", first.node.variant_name());
    };
    let ResourcePath::EntitySet((name, Some(CollectionNavigation::Path(nav)))) = &request.path else {
        panic!("expected an entity set with navigation");
    };
    assert_eq!(name.as_str(), "Orders");
    let CollectionNavPath::Key((KeyPredicate::Simple(key), Some(navigation))) = nav else {
        panic!("expected a key predicate followed by navigation");
    };
    assert_eq!(print(key), "(1)");
    assert_eq!(print(&**navigation), "/Customer");

    let printed = print(&first.node);
    assert_eq!(printed, input);
    let second = Parser::default().parse_relative_uri(&printed).unwrap();
    assert_eq!(second, first);
}

#[rstest]
#[case::bare_query_option("queryOption", "%2", 0)]
#[case::string_literal("string", "'%2'", 1)]
#[case::inside_filter("queryOption", "$filter=Name eq '%2'", 17)]
fn test_incomplete_percent_encoding(#[case] rule: &str, #[case] input: &str, #[case] position: usize) {
    let err = Parser::default().parse_named_complete(rule, input).unwrap_err();
    let ParseError::Malformed { position: at, reason } = &err else {
        panic!("expected malformed input, got {err:?}");
    };
    assert_eq!(*at, position);
    assert_eq!(reason, "incomplete percent-encoding");
    assert_eq!(&input[*at..*at + 1], "%");
    assert!(err.format_with_context(input).contains("percent-encoding"));
}

#[test]
fn test_filter_parts_are_separate_nodes() {
    let input = "$filter=Name eq 'Bob'";
    let option = Parser::default().parse_query_option(input).unwrap();
    assert_eq!(option.consumed, input.len());
    assert_eq!(print(&option.node), input);

    let QueryOption::System(system) = &option.node else {
        panic!("expected a system query option");
    };
    let SystemQueryOption::Filter(filter) = &**system else {
        panic!("expected $filter");
    };
    let expr = &filter.expr.expr;

    let ids = descendants::<OdataIdentifier>(&**expr);
    assert_eq!(ids.len(), 1);
    assert_eq!(print(ids[0]), "Name");

    let Some(ComparisonExpr::Eq(eq)) = &expr.comparison else {
        panic!("expected an eq comparison");
    };
    assert_eq!(print(&eq.operator), "eq");

    let strings = descendants::<StringLiteral>(&*eq.operand);
    assert_eq!(strings.len(), 1);
    assert_eq!(print(strings[0]), "'Bob'");
    assert_eq!(strings[0].rule_name(), "string");
}

#[test]
fn test_parsing_is_deterministic() {
    let input = "Orders?$filter=contains(Name,'a') or Price lt 10.5&$orderby=Name desc&$top=5";
    let parser = Parser::default();
    let first = parser.parse_relative_uri(input).unwrap();
    for _ in 0..3 {
        assert_eq!(parser.parse_relative_uri(input).unwrap(), first);
    }
}

#[test]
fn test_parsers_share_across_threads() {
    let parser = Parser::default();
    let inputs = ["Orders(1)", "People('x')/Friends", "Products/$count"];
    std::thread::scope(|scope| {
        for input in inputs {
            let parser = &parser;
            scope.spawn(move || {
                let parsed = parser.parse_relative_uri(input).unwrap();
                assert_eq!(print(&parsed.node), input);
            });
        }
    });
}
