//! Rule table
//!
//! Every CST rule type is listed once here. The table gives name-based
//! access to the grammar: [`lookup`] resolves a rule name to a [`RuleId`],
//! and each [`RuleInfo`] carries the rule's metadata and a parse function
//! returning `Box<dyn Node>`. The table is immutable and shared by every
//! parse.

use crate::ast::RuleKind;
use crate::cst;
use crate::input_stream::Cursor;
use crate::node::{Node, Rule};
use crate::parse_context::{ParseContext, ParseResult};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Parse function of a rule, erased to `dyn Node`
pub type DynParse = for<'a> fn(Cursor<'a>, &mut ParseContext) -> ParseResult<'a, Box<dyn Node>>;

/// Index of a rule in the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleId(usize);

impl RuleId {
    /// Id for a table index; [`info`] panics on an index past the table
    pub const fn new(index: usize) -> Self {
        RuleId(index)
    }

    pub fn index(self) -> usize {
        self.0
    }

    pub fn name(self) -> &'static str {
        info(self).name
    }
}

#[derive(Clone, Copy)]
pub struct RuleInfo {
    pub name: &'static str,
    pub kind: RuleKind,
    pub parse: DynParse,
}

impl fmt::Debug for RuleInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleInfo")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

fn parse_dyn<'a, T: Rule>(input: Cursor<'a>, ctx: &mut ParseContext) -> ParseResult<'a, Box<dyn Node>> {
    T::parse(input, ctx).map(|(node, rest)| (Box::new(node) as Box<dyn Node>, rest))
}

macro_rules! rule_table {
    ($($ty:ident),+ $(,)?) => {
        static RULES: &[RuleInfo] = &[
            $(
                RuleInfo {
                    name: <cst::$ty as Rule>::NAME,
                    kind: <cst::$ty as Rule>::KIND,
                    parse: parse_dyn::<cst::$ty>,
                },
            )+
        ];
    };
}

rule_table! {
    // punctuation
    At, Colon, Comma, Eq, Plus, Minus, Semi, PlainSemi, Star, Squote, Open, Close, Dquote,
    QuotationMark, Escape, Sp, Slash, Solidus, Dot, Amp, Question, Hash, PlainColon,
    LeftBrace, RightBrace, LeftBracket, RightBracket, Rws, Bws, Ows, BwsH, Digits,
    PctEncoded, Sign, EqH, BeginObject, EndObject, BeginArray, EndArray, NameSeparator,
    ValueSeparator,
    // literals
    NullValue, TrueKw, FalseKw, NanKw, NegInfKw, InfKw, ExponentMarker, BinaryKw,
    DurationKw, TimeSeparator, UtcKw, GuidValue, Year, Month, Day, Hour, Minute, Second,
    FractionalSeconds, OneToNine, PositiveInteger, Digits3, Digits5, Digits10, Digits19,
    StringContent, DurationValue, BinaryValue, PrimitiveLiteral, PrimitiveValue,
    BooleanValue, DecimalValue, NanInfinity, TimeZone, SingleEnumValue, DecimalNumber,
    DecimalFraction, DecimalExponent, DoubleValue, SingleValue, ByteValue, SByteValue,
    Int16Value, Int32Value, Int64Value, StringLiteral, DateValue, DateTimeOffsetValue,
    TimeSeconds, TimeFraction, ZoneOffset, TimeOfDayValue, Duration, EnumLiteral, EnumValue,
    EnumMemberValue, Binary,
    // names
    OdataIdentifier, NamespacePart, Namespace, EntitySetName, SingletonEntity,
    EntityTypeName, ComplexTypeName, TypeDefinitionName, EnumerationTypeName,
    EnumerationMember, TermName, PrimitiveKeyProperty, PrimitiveNonKeyProperty,
    PrimitiveColProperty, ComplexProperty, ComplexColProperty, StreamProperty,
    EntityNavigationProperty, EntityColNavigationProperty, Action, ActionImport,
    EntityFunction, EntityColFunction, ComplexFunction, ComplexColFunction,
    PrimitiveFunction, PrimitiveColFunction, EntityFunctionImport, EntityColFunctionImport,
    ComplexFunctionImport, ComplexColFunctionImport, PrimitiveFunctionImport,
    PrimitiveColFunctionImport, ParameterName, KeyPropertyAlias, ComputedProperty,
    AnnotationQualifier, LambdaVariableExpr, EdmPrefix, EdmBinary, EdmBoolean, EdmByte,
    EdmDate, EdmDateTimeOffset, EdmDecimal, EdmDouble, EdmDuration, EdmGuid, EdmInt16,
    EdmInt32, EdmInt64, EdmSByte, EdmSingle, EdmStream, EdmString, EdmTimeOfDay,
    GeographyKind, GeometryKind, CollectionKind, LineStringKind, MultiLineStringKind,
    MultiPointKind, MultiPolygonKind, PointKind, PolygonKind, PrimitiveTypeKind,
    AbstractSpatialTypeName, ConcreteSpatialTypeName, SingleQualifiedTypeName,
    QualifiedTypeName, PrimitiveProperty, NavigationProperty, Function, PrimitiveTypeName,
    SpatialTypeName, CollectionOf, QualifiedEntityTypeName, QualifiedComplexTypeName,
    QualifiedTypeDefinitionName, QualifiedEnumTypeName, EntityCast, ComplexCast,
    // geo
    GeographyPrefix, GeometryPrefix, SridKw, CollectionOpen, LineStringKw,
    MultiLineStringOpen, MultiPointOpen, MultiPolygonOpen, PointKw, PolygonKw, GeoLiteral,
    SridLiteral, PositionLiteral, PointData, PointLiteral, LineStringData,
    LineStringLiteral, RingLiteral, PolygonData, PolygonLiteral, MultiPointLiteral,
    MultiLineStringLiteral, MultiPolygonLiteral, CollectionLiteral, FullCollectionLiteral,
    FullLineStringLiteral, FullMultiLineStringLiteral, FullMultiPointLiteral,
    FullMultiPolygonLiteral, FullPointLiteral, FullPolygonLiteral, GeographyCollection,
    GeographyLineString, GeographyMultiLineString, GeographyMultiPoint,
    GeographyMultiPolygon, GeographyPoint, GeographyPolygon, GeometryCollection,
    GeometryLineString, GeometryMultiLineString, GeometryMultiPoint, GeometryMultiPolygon,
    GeometryPoint, GeometryPolygon,
    // expressions
    AndKw, OrKw, EqKw, NeKw, LtKw, LeKw, GtKw, GeKw, HasKw, InKw, AddKw, SubKw, MulKw,
    DivKw, DivbyKw, ModKw, NotKw, IsofKw, CastKw, AnyKw, AllKw, RootKw, ItKw, ThisKw,
    CommonExprOperand, ArithmeticExpr, ComparisonExpr, LogicalExpr, RootTarget,
    FirstMemberExpr, MemberPath, AnnotationExprPath, InscopeVariableExpr,
    ImplicitVariableExpr, CollectionNavigationExpr, CollectionNavigationExprPath,
    ExprKeyPredicate, CollectionPathExpr, ComplexColPathExpr, ComplexPathExpr,
    ComplexPathExprTail, PrimitivePathExprTail, FunctionExprCall,
    FunctionExprParameterValue, ParameterValue, MethodCallExpr, BoolMethodCallExpr,
    PropertyPathExpr, CommonExpr, BoolCommonExpr, RootExpr, RootEntity, InscopeMemberExpr,
    MemberExpr, EntityColNavigationPathExpr, EntityNavigationPathExpr,
    ComplexColPropertyPathExpr, ComplexPropertyPathExpr, PrimitiveColPropertyPathExpr,
    PrimitivePropertyPathExpr, StreamPropertyPathExpr, AnnotationExpr, Annotation,
    CollectionNavigationExprCast, KeyNavigationExpr, SingleNavigationExpr,
    ComplexColPathExprCast, CountPathExpr, ExpandCountOptions, ComplexPathExprCast,
    PrimitivePathExpr, BoundFunctionExpr, FunctionExpr, EntityColFunctionExpr,
    EntityFunctionExpr, ComplexColFunctionExpr, ComplexFunctionExpr,
    PrimitiveColFunctionExpr, PrimitiveFunctionExpr, FunctionExprParameters,
    FunctionExprParameter, AnyExpr, AllExpr, LambdaExpr, LambdaPredicateExpr, ParenExpr,
    ListExpr, ListItem, NegateExpr, NotExpr, IsofExpr, CastExpr, TypeTestOperand, HasExpr,
    AndExpr, OrExpr, EqExpr, NeExpr, LtExpr, LeExpr, GtExpr, GeExpr, InExpr, AddExpr,
    SubExpr, MulExpr, DivExpr, DivbyExpr, ModExpr, MinDateTimeMethodCallExpr, MinDateTimeKw,
    MaxDateTimeMethodCallExpr, MaxDateTimeKw, NowMethodCallExpr, NowKw,
    LengthMethodCallExpr, LengthKw, ToLowerMethodCallExpr, ToLowerKw, ToUpperMethodCallExpr,
    ToUpperKw, TrimMethodCallExpr, TrimKw, YearMethodCallExpr, YearKw, MonthMethodCallExpr,
    MonthKw, DayMethodCallExpr, DayKw, HourMethodCallExpr, HourKw, MinuteMethodCallExpr,
    MinuteKw, SecondMethodCallExpr, SecondKw, FractionalSecondsMethodCallExpr,
    FractionalSecondsKw, TotalSecondsMethodCallExpr, TotalSecondsKw, DateMethodCallExpr,
    DateKw, TimeMethodCallExpr, TimeKw, TotalOffsetMinutesMethodCallExpr,
    TotalOffsetMinutesKw, RoundMethodCallExpr, RoundKw, FloorMethodCallExpr, FloorKw,
    CeilingMethodCallExpr, CeilingKw, GeoLengthMethodCallExpr, GeoLengthKw,
    ConcatMethodCallExpr, ConcatKw, ContainsMethodCallExpr, ContainsKw,
    EndsWithMethodCallExpr, EndsWithKw, IndexOfMethodCallExpr, IndexOfKw,
    StartsWithMethodCallExpr, StartsWithKw, DistanceMethodCallExpr, DistanceKw,
    IntersectsMethodCallExpr, IntersectsKw, HasSubsetMethodCallExpr, HasSubsetKw,
    HasSubsequenceMethodCallExpr, HasSubsequenceKw, SubstringKw, SubstringMethodCallExpr,
    SubstringLength,
    // json
    JsonTrue, JsonFalse, JsonNull, JsonStringContent, NumberInJson, ArrayOrObject,
    ComplexMember, CollectionPropertyInUri, AnnotationValue, NavigationPropertyInUri,
    PrimitiveLiteralInJson, ComplexColInUri, ComplexInUri, PrimitiveColPropertyInUri,
    ComplexColPropertyInUri, PrimitiveColInUri, ComplexPropertyInUri, AnnotationInUri,
    PrimitivePropertyInUri, SingleNavPropInJson, CollectionNavPropInJson, RootExprCol,
    StringInJson,
    // resource_path
    HttpsScheme, HttpScheme, SchemeSeparator, BatchKw, EntityKw, MetadataKw, CrossjoinKw,
    AllResourcesKw, FilterSegmentKw, EachSegment, CountSegment, RefSegment, ValueSegment,
    KeyPathLiteral, ServiceScheme, OdataRelativeUri, CollectionNavigation,
    CollectionNavPath, KeyPredicate, SimpleKeyValue, KeyValuePairKey, SingleNavigation,
    SingleNavigationTail, PropertyPath, PrimitiveColPath, PrimitivePath, ComplexColPath,
    ComplexColPathTail, ComplexPath, ComplexPathTail, BoundCall, BoundFunctionCallNoParens,
    FunctionImportCallNoParens, FunctionParameterValue, ResourcePath, OdataUri, ServiceRoot,
    BatchRequest, EntityRequest, EntityCastRequest, MetadataRequest, ResourceRequest,
    AllResources, SimpleKey, CompoundKey, KeyValuePair, KeyPropertyValue, KeyPathSegments,
    FilterInPath, OrdinalIndex, BoundOperation, ActionImportCall, BoundActionCall,
    FunctionParameters, FunctionParameter, ParameterAlias, Crossjoin,
    BoundEntityFunctionCall, BoundEntityColFunctionCall, BoundComplexFunctionCall,
    BoundComplexColFunctionCall, BoundPrimitiveFunctionCall, BoundPrimitiveColFunctionCall,
    EntityFunctionImportCall, EntityColFunctionImportCall, ComplexFunctionImportCall,
    ComplexColFunctionImportCall, PrimitiveFunctionImportCall,
    PrimitiveColFunctionImportCall,
    // query
    ComputeKw, DeltatokenKw, ExpandKw, FilterKw, FormatKw, IdKw, InlineCountKw, OrderbyKw,
    SchemaVersionKw, SearchKw, SelectKw, SkipKw, SkiptokenKw, TopKw, IndexKw, LevelsKw,
    ExpandValueKw, AsKw, AscKw, DescKw, MaxKw, AtomKw, JsonKw, XmlKw, SearchOrKw,
    SearchAndKw, SearchNotKw, MediaType, SchemaVersionValue, DeltatokenValue,
    SkiptokenValue, SearchWord, SearchPhraseContent, CustomName, CustomValue, QueryOption,
    BatchOption, MetadataOption, EntityIdOption, EntityCastOption, SystemQueryOption,
    ExpandItem, ExpandStarSuffix, ExpandPathSuffix, ExpandTypeCast, ExpandSegmentProperty,
    ExpandPathTarget, ExpandCountOption, ExpandRefOption, ExpandOption, LevelsValue,
    SortDirection, FormatValue, SchemaVersionSpec, SearchHead, SearchTail, SearchValue,
    SelectItem, SelectTypeCast, SelectTarget, SelectProperty, SelectPathProperty,
    SelectPathTail, SelectOptionPc, SelectOption, QueryOptions, BatchOptions,
    MetadataOptions, EntityOptions, EntityCastOptions, Id, Compute, ComputeItem, Expand,
    ExpandStar, ExpandPathItem, ExpandPath, ExpandPathSegment, ExpandRefOptions,
    ExpandOptions, Levels, Filter, Orderby, OrderbyItem, Skip, Top, Index, Format,
    InlineCount, SchemaVersion, Search, SearchExpr, SearchParen, SearchOrExpr,
    SearchAndExpr, SearchTerm, SearchPhrase, Select, SelectItemPath, SelectPath,
    SelectOptionsPc, SelectOptions, AllOperationsInSchema, QualifiedActionName,
    QualifiedFunctionName, ParameterNames, Deltatoken, Skiptoken, AliasAndValue,
    NameAndValue, CustomQueryOption,
    // context_url
    CollectionRefKw, RefFragmentKw, CollectionEntityTypeKw, CollectionComplexTypeKw,
    DeletedEntityKw, LinkKw, DeletedLinkKw, EntitySuffixKw, DeltaKw, ContextFragment,
    DeletedSuffix, EntitySetSuffix, ContextPropertyPath, SelectListItem, SelectListTarget,
    SelectListProperty, SelectListNavigationSuffix, Context, ContextEntitySet,
    ContainmentNavigation, ContextNavigation, NavigationStep, DeletedContext,
    PropertyContext, PropertyContextTail, TypeNameContext, SingletonContext,
    EntitySetContext, SelectList, SelectListPath,
    // headers
    ContentIdKw, ODataPrefixKw, EntityIdKw, IsolationKw, SnapshotKw, MaxVersionKw,
    VersionKw, VersionFourKw, PreferKw, IfMatchKw, IfNoneMatchKw, ETagKw, OdataDotKw,
    AllowEntityReferencesKw, CallbackKw, UrlKw, ContinueOnErrorKw, IncludeAnnotationsKw,
    MaxPageSizeKw, RespondAsyncKw, ReturnKw, RepresentationKw, MinimalKw, TrackChangesKw,
    WaitKw, ExcludeOperator, WeakKw, RequestId, HttpToken, QuotedString, EtagValue, Header,
    Preference, ReturnValue, AnnotationTarget, AnnotationTerm, Word, EntityTagList,
    ContentIdHeader, EntityIdHeader, IsolationHeader, MaxVersionHeader, VersionHeader,
    PreferHeader, AllowEntityReferencesPreference, CallbackPreference,
    ContinueOnErrorPreference, IncludeAnnotationsPreference, AnnotationsList,
    AnnotationIdentifier, MaxPageSizePreference, RespondAsyncPreference, ReturnPreference,
    TrackChangesPreference, WaitPreference, GenericPreference, PreferenceParameter,
    Parameter, IfMatchHeader, IfNoneMatchHeader, ETagHeader, EntityTags, EntityTag,
    OpaqueTag,
    // rfc3986
    DoubleSlash, PlainAt, IpLiteralOpen, IpLiteralClose, UriScheme, UserInfo, Port,
    Ipv6Address, IpvFuture, Ipv4Address, RegName, PathAbempty, PathAbsolute, PathRootless,
    SegmentNz, UriQuery, UriFragment, IriInQuery, IriInHeader, HierPart, Host,
    IpLiteralAddress, Uri, AuthorityPath, Authority, IpLiteral,
}

/// All rules in declaration order
pub fn rules() -> &'static [RuleInfo] {
    RULES
}

/// Resolve a rule by its grammar name, e.g. `"boolCommonExpr"`
pub fn lookup(name: &str) -> Option<RuleId> {
    static INDEX: OnceLock<HashMap<&'static str, RuleId>> = OnceLock::new();
    INDEX
        .get_or_init(|| {
            RULES
                .iter()
                .enumerate()
                .map(|(index, rule)| (rule.name, RuleId(index)))
                .collect()
        })
        .get(name)
        .copied()
}

/// Table entry for `id`.
///
/// # Panics
///
/// If `id` does not index the table; ids only come from [`lookup`] and
/// [`RuleId::new`], so this is a caller bug rather than bad input.
pub fn info(id: RuleId) -> &'static RuleInfo {
    match RULES.get(id.0) {
        Some(rule) => rule,
        None => panic!("rule id {} out of range (table has {} rules)", id.0, RULES.len()),
    }
}

/// Id of a rule type
pub fn id_of<T: Rule>() -> Option<RuleId> {
    lookup(T::NAME)
}
