//! OData header values and HTTP entity tags
//!
//! Each `header` alternative carries its header name, so a full
//! `Name: value` line is parsed. Preference lists allow optional whitespace
//! around their commas, as HTTP list syntax does.

use super::literals::{BooleanValue, OneToNine, PositiveInteger};
use super::names::{Namespace, OdataIdentifier, TermName};
use super::punctuation::{Comma, Digits, Dot, Dquote, EqH, Hash, Ows, PlainColon, PlainSemi, Star};
use super::rfc3986::{IriInHeader, Uri};
use crate::charclass::CharClass;
use crate::lexer::Lexer;

literals! {
    ContentIdKw = "\"Content-ID\"", Insensitive ["Content-ID"];
    ODataPrefixKw = "\"OData-\"", Insensitive ["OData-"];
    EntityIdKw = "\"EntityID\"", Insensitive ["EntityID"];
    IsolationKw = "\"Isolation\"", Insensitive ["Isolation"];
    SnapshotKw = "\"snapshot\"", Insensitive word ["snapshot"];
    MaxVersionKw = "\"OData-MaxVersion\"", Insensitive ["OData-MaxVersion"];
    VersionKw = "\"OData-Version\"", Insensitive ["OData-Version"];
    VersionFourKw = "\"4.0\"", Sensitive ["4.0"];
    PreferKw = "\"Prefer\"", Insensitive ["Prefer"];
    IfMatchKw = "\"If-Match\"", Insensitive ["If-Match"];
    IfNoneMatchKw = "\"If-None-Match\"", Insensitive ["If-None-Match"];
    ETagKw = "\"ETag\"", Insensitive ["ETag"];
    OdataDotKw = "\"odata.\"", Insensitive ["odata."];
    AllowEntityReferencesKw = "\"allow-entityreferences\"", Insensitive word ["allow-entityreferences"];
    CallbackKw = "\"callback\"", Insensitive ["callback"];
    UrlKw = "\"url\"", Insensitive ["url"];
    ContinueOnErrorKw = "\"continue-on-error\"", Insensitive word ["continue-on-error"];
    IncludeAnnotationsKw = "\"include-annotations\"", Insensitive ["include-annotations"];
    MaxPageSizeKw = "\"maxpagesize\"", Insensitive ["maxpagesize"];
    RespondAsyncKw = "\"respond-async\"", Insensitive word ["respond-async"];
    ReturnKw = "\"return\"", Insensitive ["return"];
    RepresentationKw = "'representation'", Sensitive word ["representation"];
    MinimalKw = "'minimal'", Sensitive word ["minimal"];
    TrackChangesKw = "\"track-changes\"", Insensitive word ["track-changes"];
    WaitKw = "\"wait\"", Insensitive ["wait"];
    ExcludeOperator = "excludeOperator", Sensitive ["-"];
    WeakKw = "weak", Sensitive ["W/"];
}

tokens! {
    /// `1*unreserved`
    RequestId = "request-id", request_id;
    /// `1*tchar`
    HttpToken = "token", http_token;
    QuotedString = "quoted-string", quoted_string;
    /// `*etagc`
    EtagValue = "etagc", etag_value;
}

alternations! {
    Header = "header" {
        ContentId(ContentIdHeader),
        EntityId(EntityIdHeader),
        Isolation(IsolationHeader),
        MaxVersion(MaxVersionHeader),
        Version(VersionHeader),
        Prefer(PreferHeader),
        IfMatch(IfMatchHeader),
        IfNoneMatch(IfNoneMatchHeader),
        ETag(ETagHeader),
    }

    /// The OData preferences, then any RFC 7240 preference
    Preference = "preference" {
        AllowEntityReferences(AllowEntityReferencesPreference),
        Callback(CallbackPreference),
        ContinueOnError(ContinueOnErrorPreference),
        IncludeAnnotations(IncludeAnnotationsPreference),
        MaxPageSize(MaxPageSizePreference),
        RespondAsync(RespondAsyncPreference),
        Return(ReturnPreference),
        TrackChanges(TrackChangesPreference),
        Wait(WaitPreference),
        Generic(GenericPreference),
    }

    ReturnValue = "returnPreference-value" {
        Representation(RepresentationKw),
        Minimal(MinimalKw),
    }

    AnnotationTarget = "annotationIdentifier-target" {
        Star(Star),
        Term((Namespace, Dot, AnnotationTerm)),
    }

    AnnotationTerm = "annotationIdentifier-term" {
        Term(TermName),
        Star(Star),
    }

    Word = "word" {
        Token(HttpToken),
        Quoted(QuotedString),
    }

    EntityTagList = "entity-tag-list" {
        Any(Star),
        Tags(EntityTags),
    }
}

sequences! {
    ContentIdHeader = "content-id" {
        name: ContentIdKw,
        colon: PlainColon,
        ows: Ows,
        id: RequestId,
    }

    EntityIdHeader = "entityid" {
        prefix: Option<ODataPrefixKw>,
        name: EntityIdKw,
        colon: PlainColon,
        ows: Ows,
        iri: IriInHeader,
    }

    IsolationHeader = "isolation" {
        prefix: Option<ODataPrefixKw>,
        name: IsolationKw,
        colon: PlainColon,
        ows: Ows,
        level: SnapshotKw,
    }

    MaxVersionHeader = "odata-maxversion" {
        name: MaxVersionKw,
        colon: PlainColon,
        ows: Ows,
        major: Digits,
        dot: Dot,
        minor: Digits,
    }

    VersionHeader = "odata-version" {
        name: VersionKw,
        colon: PlainColon,
        ows: Ows,
        version: VersionFourKw,
        revision: Option<OneToNine>,
    }

    PreferHeader = "prefer" {
        name: PreferKw,
        colon: PlainColon,
        ows: Ows,
        first: Preference,
        rest: Vec<(Ows, Comma, Ows, Preference)>,
    }

    AllowEntityReferencesPreference = "allowEntityReferencesPreference" {
        prefix: Option<OdataDotKw>,
        keyword: AllowEntityReferencesKw,
    }

    CallbackPreference = "callbackPreference" {
        prefix: Option<OdataDotKw>,
        keyword: CallbackKw,
        before_semi: Ows,
        semi: PlainSemi,
        after_semi: Ows,
        url: UrlKw,
        eq: EqH,
        open: Dquote,
        uri: Uri,
        close: Dquote,
    }

    ContinueOnErrorPreference = "continueOnErrorPreference" {
        prefix: Option<OdataDotKw>,
        keyword: ContinueOnErrorKw,
        value: Option<(EqH, BooleanValue)>,
    }

    IncludeAnnotationsPreference = "includeAnnotationsPreference" {
        prefix: Option<OdataDotKw>,
        keyword: IncludeAnnotationsKw,
        eq: EqH,
        open: Dquote,
        annotations: AnnotationsList,
        close: Dquote,
    }

    AnnotationsList = "annotationsList" {
        first: AnnotationIdentifier,
        rest: Vec<(Comma, AnnotationIdentifier)>,
    }

    AnnotationIdentifier = "annotationIdentifier" {
        exclude: Option<ExcludeOperator>,
        target: AnnotationTarget,
        qualifier: Option<(Hash, OdataIdentifier)>,
    }

    MaxPageSizePreference = "maxpagesizePreference" {
        prefix: Option<OdataDotKw>,
        keyword: MaxPageSizeKw,
        eq: EqH,
        size: PositiveInteger,
    }

    RespondAsyncPreference = "respondAsyncPreference" {
        keyword: RespondAsyncKw,
    }

    ReturnPreference = "returnPreference" {
        keyword: ReturnKw,
        eq: EqH,
        value: ReturnValue,
    }

    TrackChangesPreference = "trackChangesPreference" {
        prefix: Option<OdataDotKw>,
        keyword: TrackChangesKw,
    }

    WaitPreference = "waitPreference" {
        keyword: WaitKw,
        eq: EqH,
        seconds: Digits,
    }

    /// `token [ EQ-h word ] *( OWS ";" [ OWS parameter ] )`
    GenericPreference = "preference-generic" {
        name: HttpToken,
        value: Option<(EqH, Word)>,
        parameters: Vec<PreferenceParameter>,
    }

    PreferenceParameter = "preference-parameter" {
        ows: Ows,
        semi: PlainSemi,
        parameter: Option<(Ows, Parameter)>,
    }

    Parameter = "parameter" {
        name: HttpToken,
        value: Option<(EqH, Word)>,
    }

    IfMatchHeader = "If-Match" {
        name: IfMatchKw,
        colon: PlainColon,
        ows: Ows,
        tags: EntityTagList,
    }

    IfNoneMatchHeader = "If-None-Match" {
        name: IfNoneMatchKw,
        colon: PlainColon,
        ows: Ows,
        tags: EntityTagList,
    }

    ETagHeader = "ETag" {
        name: ETagKw,
        colon: PlainColon,
        ows: Ows,
        tag: EntityTag,
    }

    EntityTags = "entity-tag-list-tags" {
        first: EntityTag,
        rest: Vec<(Ows, Comma, Ows, EntityTag)>,
    }

    EntityTag = "entity-tag" {
        weak: Option<WeakKw>,
        tag: OpaqueTag,
    }

    OpaqueTag = "opaque-tag" {
        open: Dquote,
        value: EtagValue,
        close: Dquote,
    }
}

impl PreferHeader {
    pub fn preferences(&self) -> impl Iterator<Item = &Preference> {
        std::iter::once(&self.first).chain(self.rest.iter().map(|(_, _, _, p)| p))
    }
}

impl EntityTag {
    pub fn is_weak(&self) -> bool {
        self.weak.is_some()
    }

    /// Tag text between the quotes
    pub fn opaque(&self) -> &str {
        self.tag.value.as_str()
    }
}

fn request_id(lx: &mut Lexer<'_>) -> bool {
    lx.repeat(1, None, |lx| lx.eat_class(CharClass::Unreserved))
}

fn http_token(lx: &mut Lexer<'_>) -> bool {
    lx.repeat(1, None, |lx| lx.eat_class(CharClass::Tchar))
}

/// `DQUOTE *( qdtext / quoted-pair ) DQUOTE`
fn quoted_string(lx: &mut Lexer<'_>) -> bool {
    lx.attempt(|lx| {
        if !lx.eat_char('"') {
            return false;
        }
        lx.repeat(0, None, |lx| {
            lx.eat_class(CharClass::Qdtext)
                || lx.attempt(|lx| {
                    lx.eat_char('\\')
                        && lx.eat(|ch| {
                            ch == '\t' || ch == ' ' || CharClass::Vchar.contains(ch) || CharClass::ObsText.contains(ch)
                        })
                })
        });
        lx.eat_char('"')
    })
}

fn etag_value(lx: &mut Lexer<'_>) -> bool {
    lx.repeat(0, None, |lx| lx.eat_class(CharClass::Etagc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native_parser::parse_complete;
    use crate::printer::print;
    use rstest::rstest;

    #[test]
    fn test_weak_entity_tag() {
        let tag = parse_complete::<EntityTag>("W/\"etag-value\"").unwrap().node;
        assert!(tag.is_weak());
        assert_eq!(tag.opaque(), "etag-value");
        assert_eq!(print(&tag), "W/\"etag-value\"");
    }

    #[test]
    fn test_weak_marker_is_case_sensitive() {
        assert!(parse_complete::<EntityTag>("w/\"x\"").is_err());
        assert!(parse_complete::<EntityTag>("\"\"").is_ok());
    }

    #[rstest]
    #[case::content_id("Content-ID: 1", "ContentId")]
    #[case::entity_id("OData-EntityID: http://host/svc/Orders(1)", "EntityId")]
    #[case::isolation("Isolation: snapshot", "Isolation")]
    #[case::max_version("OData-MaxVersion: 4.01", "MaxVersion")]
    #[case::version("OData-Version: 4.0", "Version")]
    #[case::prefer("Prefer: return=minimal", "Prefer")]
    #[case::if_match("If-Match: W/\"1\", \"2\"", "IfMatch")]
    #[case::if_none_match("If-None-Match: *", "IfNoneMatch")]
    #[case::etag("ETag: \"abc\"", "ETag")]
    fn test_headers(#[case] input: &str, #[case] variant: &str) {
        let header = parse_complete::<Header>(input).unwrap().node;
        assert_eq!(header.variant_name(), variant);
        assert_eq!(print(&header), input);
    }

    #[test]
    fn test_preferences() {
        let input = "Prefer: odata.maxpagesize=50, respond-async,wait=10, \
                     odata.include-annotations=\"-odata.*,NS.Term#q\", \
                     odata.callback; url=\"http://host/cb\", foo=\"bar baz\"; x; y=1";
        let Header::Prefer(prefer) = parse_complete::<Header>(input).unwrap().node else {
            panic!("expected Prefer");
        };
        let kinds: Vec<&str> = prefer.preferences().map(|p| p.variant_name()).collect();
        assert_eq!(
            kinds,
            vec!["MaxPageSize", "RespondAsync", "Wait", "IncludeAnnotations", "Callback", "Generic"]
        );
    }

    #[test]
    fn test_version_revision() {
        assert!(parse_complete::<Header>("OData-Version: 4.01").is_ok());
        assert!(parse_complete::<Header>("OData-Version: 3.0").is_err());
    }
}
