//! Service root, relative URIs and resource paths
//!
//! The `[cast] [tail]` rules (`collectionNavigation`, `singleNavigation`,
//! `complexColPath`, `complexPath`) read as `cast tail / tail / cast` and
//! are used under `Option`, which keeps a cast from claiming `/NS.Fn()`.
//!
//! Key predicates are tried after the other collection segments: the
//! key-as-segment form `1*( "/" *pchar )` would otherwise swallow `/$count`
//! and bound operations.

use super::context_url::Context;
use super::literals::PrimitiveLiteral;
use super::names::{
    Action, ActionImport, ComplexCast, ComplexColFunction, ComplexColFunctionImport,
    ComplexColProperty, ComplexFunction, ComplexFunctionImport, ComplexProperty, EntityCast,
    EntityColFunction, EntityColFunctionImport, EntityColNavigationProperty, EntityFunction,
    EntityFunctionImport, EntityNavigationProperty, EntitySetName, KeyPropertyAlias, Namespace,
    OdataIdentifier, ParameterName, PrimitiveColFunction, PrimitiveColFunctionImport,
    PrimitiveColProperty, PrimitiveFunction, PrimitiveFunctionImport, PrimitiveKeyProperty,
    PrimitiveProperty, SingletonEntity, StreamProperty,
};
use super::punctuation::{At, Close, Comma, Digits, Dot, Eq, Open, PlainColon, Question, Slash};
use super::query::{BatchOptions, EntityCastOptions, EntityOptions, MetadataOptions, QueryOptions};
use super::rfc3986::{Host, Port, SegmentNz};
use crate::combinator::{Many1, Parse};
use crate::input_stream::Cursor;
use crate::lexer::{self, Lexer};
use crate::node::Rule;
use crate::parse_context::{NoMatch, ParseContext, ParseResult};

literals! {
    HttpsScheme = "\"https\"", Insensitive ["https"];
    HttpScheme = "\"http\"", Insensitive ["http"];
    SchemeSeparator = "\"://\"", Sensitive ["://"];
    BatchKw = "'$batch'", Sensitive word ["$batch"];
    EntityKw = "'$entity'", Sensitive word ["$entity"];
    MetadataKw = "'$metadata'", Sensitive word ["$metadata"];
    CrossjoinKw = "'$crossjoin'", Sensitive ["$crossjoin"];
    AllResourcesKw = "'$all'", Sensitive word ["$all"];
    FilterSegmentKw = "'/$filter'", Sensitive ["/$filter"];
    EachSegment = "each", Sensitive word ["/$each"];
    CountSegment = "count", Sensitive word ["/$count"];
    RefSegment = "ref", Sensitive word ["/$ref"];
    ValueSegment = "value", Sensitive word ["/$value"];
}

tokens! {
    /// `*pchar`
    KeyPathLiteral = "keyPathLiteral", key_path_literal;
}

alternations! {
    ServiceScheme = "serviceRoot-scheme" {
        Https(HttpsScheme),
        Http(HttpScheme),
    }

    OdataRelativeUri = "odataRelativeUri" {
        Batch(BatchRequest),
        Entity(EntityRequest),
        EntityCast(EntityCastRequest),
        Metadata(MetadataRequest),
        Resource(ResourceRequest),
    }

    CollectionNavigation = "collectionNavigation" {
        CastPath((EntityCast, CollectionNavPath)),
        Path(CollectionNavPath),
        Cast(EntityCast),
    }

    CollectionNavPath = "collectionNavPath" {
        FilterInPath((FilterInPath, Option<Box<CollectionNavigation>>)),
        Each((EachSegment, Option<Box<BoundOperation>>)),
        BoundOperation(Box<BoundOperation>),
        Count(CountSegment),
        Ref(RefSegment),
        Key((KeyPredicate, Option<Box<SingleNavigation>>)),
    }

    KeyPredicate = "keyPredicate" {
        Simple(SimpleKey),
        Compound(CompoundKey),
        Segments(KeyPathSegments),
    }

    SimpleKeyValue = "simpleKey-value" {
        Alias(ParameterAlias),
        Value(KeyPropertyValue),
    }

    KeyValuePairKey = "keyValuePair-key" {
        Property(PrimitiveKeyProperty),
        Alias(KeyPropertyAlias),
    }

    SingleNavigation = "singleNavigation" {
        CastPath((EntityCast, SingleNavigationTail)),
        Path(SingleNavigationTail),
        Cast(EntityCast),
    }

    /// Bound operations first: `/NS.Fn()` also starts like `"/" propertyPath`
    SingleNavigationTail = "singleNavigation-tail" {
        BoundOperation(Box<BoundOperation>),
        Property((Slash, Box<PropertyPath>)),
        Ref(RefSegment),
        Value(ValueSegment),
    }

    PropertyPath = "propertyPath" {
        EntityColNavigation((EntityColNavigationProperty, Option<Box<CollectionNavigation>>)),
        EntityNavigation((EntityNavigationProperty, Option<SingleNavigation>)),
        ComplexCol((ComplexColProperty, Option<ComplexColPath>)),
        Complex((ComplexProperty, Option<ComplexPath>)),
        PrimitiveCol((PrimitiveColProperty, Option<PrimitiveColPath>)),
        Primitive((PrimitiveProperty, Option<PrimitivePath>)),
        Stream((StreamProperty, Option<Box<BoundOperation>>)),
    }

    PrimitiveColPath = "primitiveColPath" {
        Count(CountSegment),
        BoundOperation(Box<BoundOperation>),
        OrdinalIndex(OrdinalIndex),
    }

    PrimitivePath = "primitivePath" {
        Value(ValueSegment),
        BoundOperation(Box<BoundOperation>),
    }

    ComplexColPath = "complexColPath" {
        OrdinalIndex(OrdinalIndex),
        CastPath((ComplexCast, ComplexColPathTail)),
        Path(ComplexColPathTail),
        Cast(ComplexCast),
    }

    ComplexColPathTail = "complexColPath-tail" {
        Count(CountSegment),
        BoundOperation(Box<BoundOperation>),
    }

    ComplexPath = "complexPath" {
        CastPath((ComplexCast, ComplexPathTail)),
        Path(ComplexPathTail),
        Cast(ComplexCast),
    }

    ComplexPathTail = "complexPath-tail" {
        BoundOperation(Box<BoundOperation>),
        Property((Slash, Box<PropertyPath>)),
    }

    /// Calls with parameters come first: `boundActionCall` is a prefix of
    /// every one of them.
    BoundCall = "boundOperation-call" {
        EntityColFunction((BoundEntityColFunctionCall, Option<CollectionNavigation>)),
        EntityFunction((BoundEntityFunctionCall, Option<SingleNavigation>)),
        ComplexColFunction((BoundComplexColFunctionCall, Option<ComplexColPath>)),
        ComplexFunction((BoundComplexFunctionCall, Option<ComplexPath>)),
        PrimitiveColFunction((BoundPrimitiveColFunctionCall, Option<PrimitiveColPath>)),
        PrimitiveFunction((BoundPrimitiveFunctionCall, Option<PrimitivePath>)),
        Action(BoundActionCall),
        NoParens(BoundFunctionCallNoParens),
    }

    BoundFunctionCallNoParens = "boundFunctionCallNoParens" {
        Entity((Namespace, Dot, EntityFunction)),
        EntityCol((Namespace, Dot, EntityColFunction)),
        Complex((Namespace, Dot, ComplexFunction)),
        ComplexCol((Namespace, Dot, ComplexColFunction)),
        Primitive((Namespace, Dot, PrimitiveFunction)),
        PrimitiveCol((Namespace, Dot, PrimitiveColFunction)),
    }

    FunctionImportCallNoParens = "functionImportCallNoParens" {
        Entity(EntityFunctionImport),
        EntityCol(EntityColFunctionImport),
        Complex(ComplexFunctionImport),
        ComplexCol(ComplexColFunctionImport),
        Primitive(PrimitiveFunctionImport),
        PrimitiveCol(PrimitiveColFunctionImport),
    }

    FunctionParameterValue = "functionParameter-value" {
        Alias(ParameterAlias),
        Literal(PrimitiveLiteral),
    }
}

alternation_shape! {
    ResourcePath = "resourcePath" {
        EntitySet((EntitySetName, Option<CollectionNavigation>)),
        Singleton((SingletonEntity, Option<SingleNavigation>)),
        ActionImport(ActionImportCall),
        EntityColFunctionImport((EntityColFunctionImportCall, Option<CollectionNavigation>)),
        EntityFunctionImport((EntityFunctionImportCall, Option<SingleNavigation>)),
        ComplexColFunctionImport((ComplexColFunctionImportCall, Option<ComplexColPath>)),
        ComplexFunctionImport((ComplexFunctionImportCall, Option<ComplexPath>)),
        PrimitiveColFunctionImport((PrimitiveColFunctionImportCall, Option<PrimitiveColPath>)),
        PrimitiveFunctionImport((PrimitiveFunctionImportCall, Option<PrimitivePath>)),
        FunctionImportNoParens(FunctionImportCallNoParens),
        Crossjoin(Crossjoin),
        All(AllResources),
    }
}

sequences! {
    OdataUri = "odataUri" {
        root: ServiceRoot,
        relative: Option<OdataRelativeUri>,
    }

    /// Absorbs every `segment-nz "/"` it can; the relative part starts after the last slash.
    ServiceRoot = "serviceRoot" {
        scheme: ServiceScheme,
        separator: SchemeSeparator,
        host: Host,
        port: Option<(PlainColon, Port)>,
        slash: Slash,
        segments: Vec<(SegmentNz, Slash)>,
    }

    BatchRequest = "odataRelativeUri-batch" {
        keyword: BatchKw,
        options: Option<(Question, BatchOptions)>,
    }

    EntityRequest = "odataRelativeUri-entity" {
        keyword: EntityKw,
        question: Question,
        options: EntityOptions,
    }

    EntityCastRequest = "odataRelativeUri-entityCast" {
        keyword: EntityKw,
        cast: EntityCast,
        question: Question,
        options: EntityCastOptions,
    }

    MetadataRequest = "odataRelativeUri-metadata" {
        keyword: MetadataKw,
        options: Option<(Question, MetadataOptions)>,
        context: Option<Context>,
    }

    ResourceRequest = "odataRelativeUri-resource" {
        path: ResourcePath,
        options: Option<(Question, QueryOptions)>,
    }

    AllResources = "resourcePath-all" {
        keyword: AllResourcesKw,
        cast: Option<EntityCast>,
    }

    SimpleKey = "simpleKey" {
        open: Open,
        value: SimpleKeyValue,
        close: Close,
    }

    CompoundKey = "compoundKey" {
        open: Open,
        first: KeyValuePair,
        rest: Vec<(Comma, KeyValuePair)>,
        close: Close,
    }

    KeyValuePair = "keyValuePair" {
        key: KeyValuePairKey,
        eq: Eq,
        value: SimpleKeyValue,
    }

    KeyPropertyValue = "keyPropertyValue" {
        literal: PrimitiveLiteral,
    }

    KeyPathSegments = "keyPathSegments" {
        segments: Many1<(Slash, KeyPathLiteral)>,
    }

    FilterInPath = "filterInPath" {
        keyword: FilterSegmentKw,
        eq: Eq,
        alias: ParameterAlias,
    }

    OrdinalIndex = "ordinalIndex" {
        slash: Slash,
        index: Digits,
    }

    BoundOperation = "boundOperation" {
        slash: Slash,
        call: Box<BoundCall>,
    }

    ActionImportCall = "actionImportCall" {
        action: ActionImport,
    }

    BoundActionCall = "boundActionCall" {
        namespace: Namespace,
        dot: Dot,
        action: Action,
    }

    FunctionParameters = "functionParameters" {
        open: Open,
        parameters: Option<(FunctionParameter, Vec<(Comma, FunctionParameter)>)>,
        close: Close,
    }

    FunctionParameter = "functionParameter" {
        name: ParameterName,
        eq: Eq,
        value: FunctionParameterValue,
    }

    ParameterAlias = "parameterAlias" {
        at: At,
        name: OdataIdentifier,
    }

    Crossjoin = "crossjoin" {
        keyword: CrossjoinKw,
        open: Open,
        first: EntitySetName,
        rest: Vec<(Comma, EntitySetName)>,
        close: Close,
    }
}

macro_rules! bound_function_calls {
    ($($name:ident = $rule:literal, $function:ident;)*) => {
        sequences! {
            $($name = $rule {
                namespace: Namespace,
                dot: Dot,
                function: $function,
                parameters: FunctionParameters,
            })*
        }
    };
}

bound_function_calls! {
    BoundEntityFunctionCall = "boundEntityFunctionCall", EntityFunction;
    BoundEntityColFunctionCall = "boundEntityColFunctionCall", EntityColFunction;
    BoundComplexFunctionCall = "boundComplexFunctionCall", ComplexFunction;
    BoundComplexColFunctionCall = "boundComplexColFunctionCall", ComplexColFunction;
    BoundPrimitiveFunctionCall = "boundPrimitiveFunctionCall", PrimitiveFunction;
    BoundPrimitiveColFunctionCall = "boundPrimitiveColFunctionCall", PrimitiveColFunction;
}

macro_rules! function_import_calls {
    ($($name:ident = $rule:literal, $import:ident;)*) => {
        sequences! {
            $($name = $rule {
                function: $import,
                parameters: FunctionParameters,
            })*
        }
    };
}

function_import_calls! {
    EntityFunctionImportCall = "entityFunctionImportCall", EntityFunctionImport;
    EntityColFunctionImportCall = "entityColFunctionImportCall", EntityColFunctionImport;
    ComplexFunctionImportCall = "complexFunctionImportCall", ComplexFunctionImport;
    ComplexColFunctionImportCall = "complexColFunctionImportCall", ComplexColFunctionImport;
    PrimitiveFunctionImportCall = "primitiveFunctionImportCall", PrimitiveFunctionImport;
    PrimitiveColFunctionImportCall = "primitiveColFunctionImportCall", PrimitiveColFunctionImport;
}

fn key_path_literal(lx: &mut Lexer<'_>) -> bool {
    lx.repeat(0, None, lexer::pchar)
}

impl FunctionParameters {
    pub fn iter(&self) -> impl Iterator<Item = &FunctionParameter> {
        self.parameters
            .iter()
            .flat_map(|(first, rest)| std::iter::once(first).chain(rest.iter().map(|(_, p)| p)))
    }
}

impl CompoundKey {
    pub fn pairs(&self) -> impl Iterator<Item = &KeyValuePair> {
        std::iter::once(&self.first).chain(self.rest.iter().map(|(_, pair)| pair))
    }
}

type Candidate<'a> = Option<(ResourcePath, Cursor<'a>)>;

fn followed_by_open(rest: Cursor<'_>) -> bool {
    let tail = rest.remaining();
    tail.starts_with('(') || tail.get(..3).is_some_and(|head| head.eq_ignore_ascii_case("%28"))
}

/// Try one alternative; keep it unless a parenthesis follows, which no
/// resource path leaves behind
fn candidate<'a, T: Parse>(
    input: Cursor<'a>,
    ctx: &mut ParseContext,
    wrap: fn(T) -> ResourcePath,
    stalled: &mut Candidate<'a>,
) -> Candidate<'a> {
    let (node, rest) = T::parse(input, ctx).ok()?;
    if !followed_by_open(rest) {
        return Some((wrap(node), rest));
    }
    if stalled.is_none() {
        *stalled = Some((wrap(node), rest));
    }
    None
}

/// Ordered choice, except that an alternative stopping in front of `(` yields
/// to a later one: `Fn()` is a function import rather than entity set `Fn`.
impl Parse for ResourcePath {
    fn parse<'a>(input: Cursor<'a>, ctx: &mut ParseContext) -> ParseResult<'a, Self> {
        ctx.rule(Self::NAME, input, |ctx| {
            let mut stalled = None;
            let found = candidate(input, ctx, Self::EntitySet, &mut stalled)
                .or_else(|| candidate(input, ctx, Self::Singleton, &mut stalled))
                .or_else(|| candidate(input, ctx, Self::ActionImport, &mut stalled))
                .or_else(|| candidate(input, ctx, Self::EntityColFunctionImport, &mut stalled))
                .or_else(|| candidate(input, ctx, Self::EntityFunctionImport, &mut stalled))
                .or_else(|| candidate(input, ctx, Self::ComplexColFunctionImport, &mut stalled))
                .or_else(|| candidate(input, ctx, Self::ComplexFunctionImport, &mut stalled))
                .or_else(|| candidate(input, ctx, Self::PrimitiveColFunctionImport, &mut stalled))
                .or_else(|| candidate(input, ctx, Self::PrimitiveFunctionImport, &mut stalled))
                .or_else(|| candidate(input, ctx, Self::FunctionImportNoParens, &mut stalled))
                .or_else(|| candidate(input, ctx, Self::Crossjoin, &mut stalled))
                .or_else(|| candidate(input, ctx, Self::All, &mut stalled));
            found.or(stalled).ok_or(NoMatch)
        })
    }
}
