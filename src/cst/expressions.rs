//! Filter, orderby and compute expressions
//!
//! `commonExpr` is an operand followed by optional arithmetic, comparison and
//! logical tails. Each tail carries the rest of the expression as a boxed
//! `commonExpr`, so operators nest to the right exactly as the ABNF reads.
//!
//! `propertyPathExpr` cannot be parsed by plain ordered choice: every one of
//! its alternatives starts with an `odataIdentifier`, so the first would always
//! win. It is parsed as the equivalent grammar
//! `A a / B b / ... / A / B / ...`: the first alternative whose continuation
//! consumes input wins, and only then a bare property. The `[cast] [tail]`
//! rules likewise read as `cast tail / tail / cast`, so `/NS.Fn()` is a
//! bound function rather than a cast followed by stray parentheses.

use super::json::ArrayOrObject;
use super::literals::{EnumLiteral, PrimitiveLiteral};
use super::names::{
    AnnotationQualifier, ComplexCast, ComplexColFunction, ComplexColProperty, ComplexFunction,
    ComplexProperty, EntityCast, EntityColFunction, EntityColNavigationProperty, EntityFunction,
    EntityNavigationProperty, EntitySetName, LambdaVariableExpr, Namespace, ParameterName,
    PrimitiveColFunction, PrimitiveColProperty, PrimitiveFunction, PrimitiveProperty,
    QualifiedEntityTypeName, QualifiedTypeName, SingletonEntity, StreamProperty, TermName,
};
use super::punctuation::{At, Bws, Close, Colon, Comma, Dot, Eq, Hash, Minus, Open, Rws, Semi, Slash};
use super::query::ExpandCountOption;
use super::resource_path::{CompoundKey, CountSegment, KeyPredicate, ParameterAlias, SimpleKey};
use crate::combinator::{arm, Parse};
use crate::input_stream::Cursor;
use crate::node::{Rule, Slot};
use crate::parse_context::{NoMatch, ParseContext, ParseResult};

literals! {
    AndKw = "\"and\"", Insensitive ["and"];
    OrKw = "\"or\"", Insensitive ["or"];
    EqKw = "\"eq\"", Insensitive ["eq"];
    NeKw = "\"ne\"", Insensitive ["ne"];
    LtKw = "\"lt\"", Insensitive ["lt"];
    LeKw = "\"le\"", Insensitive ["le"];
    GtKw = "\"gt\"", Insensitive ["gt"];
    GeKw = "\"ge\"", Insensitive ["ge"];
    HasKw = "\"has\"", Insensitive ["has"];
    InKw = "\"in\"", Insensitive ["in"];
    AddKw = "\"add\"", Insensitive ["add"];
    SubKw = "\"sub\"", Insensitive ["sub"];
    MulKw = "\"mul\"", Insensitive ["mul"];
    DivKw = "\"div\"", Insensitive ["div"];
    DivbyKw = "\"divby\"", Insensitive ["divby"];
    ModKw = "\"mod\"", Insensitive ["mod"];
    NotKw = "\"not\"", Insensitive ["not"];
    IsofKw = "\"isof\"", Insensitive ["isof"];
    CastKw = "\"cast\"", Insensitive ["cast"];
    AnyKw = "\"any\"", Insensitive ["any"];
    AllKw = "\"all\"", Insensitive ["all"];
    RootKw = "'$root/'", Sensitive ["$root/"];
    ItKw = "'$it'", Sensitive word ["$it"];
    ThisKw = "'$this'", Sensitive word ["$this"];
}

alternation_shape! {
    /// Leading operand of `commonExpr`, tried in this order
    CommonExprOperand = "commonExpr-operand" {
        PrimitiveLiteral(Box<PrimitiveLiteral>),
        ArrayOrObject(Box<ArrayOrObject>),
        Root(Box<RootExpr>),
        MethodCall(Box<MethodCallExpr>),
        Cast(Box<CastExpr>),
        Isof(Box<IsofExpr>),
        Not(NotExpr),
        Function(Box<FunctionExpr>),
        FirstMember(Box<FirstMemberExpr>),
        Negate(NegateExpr),
        Paren(ParenExpr),
        List(ListExpr),
    }
}

alternations! {

    ArithmeticExpr = "commonExpr-arithmetic" {
        Add(AddExpr),
        Sub(SubExpr),
        Mul(MulExpr),
        Div(DivExpr),
        Divby(DivbyExpr),
        Mod(ModExpr),
    }

    ComparisonExpr = "commonExpr-comparison" {
        Eq(EqExpr),
        Ne(NeExpr),
        Lt(LtExpr),
        Le(LeExpr),
        Gt(GtExpr),
        Ge(GeExpr),
        Has(Box<HasExpr>),
        In(InExpr),
    }

    LogicalExpr = "commonExpr-logical" {
        And(AndExpr),
        Or(OrExpr),
    }

    RootTarget = "rootExpr-target" {
        EntitySet(RootEntity),
        Singleton(SingletonEntity),
    }

    FirstMemberExpr = "firstMemberExpr" {
        Member(MemberExpr),
        Inscope(InscopeMemberExpr),
    }

    /// Bound functions come first so `NS.Fn()` is not read as property `NS`
    MemberPath = "memberExpr-path" {
        BoundFunction(Box<BoundFunctionExpr>),
        Property(PropertyPathExpr),
        Annotation(AnnotationExpr),
    }

    AnnotationExprPath = "annotationExpr-path" {
        CollectionPath(Box<CollectionPathExpr>),
        SingleNavigation(Box<SingleNavigationExpr>),
        ComplexPath(Box<ComplexPathExpr>),
        PrimitivePath(Box<PrimitivePathExpr>),
    }

    InscopeVariableExpr = "inscopeVariableExpr" {
        Implicit(ImplicitVariableExpr),
        Alias(ParameterAlias),
        Lambda(LambdaVariableExpr),
    }

    ImplicitVariableExpr = "implicitVariableExpr" {
        It(ItKw),
        This(ThisKw),
    }

    CollectionNavigationExpr = "collectionNavigationExpr" {
        CastPath(CollectionNavigationExprCast),
        Path(CollectionNavigationExprPath),
        Cast(EntityCast),
    }

    CollectionNavigationExprPath = "collectionNavigationExpr-path" {
        CollectionPath(CollectionPathExpr),
        Key(KeyNavigationExpr),
    }

    /// Key predicates inside expressions; `/segment` there is always navigation
    ExprKeyPredicate = "collectionNavigationExpr-keyPredicate" {
        Simple(SimpleKey),
        Compound(CompoundKey),
    }

    CollectionPathExpr = "collectionPathExpr" {
        Count(CountPathExpr),
        BoundFunction((Slash, Box<BoundFunctionExpr>)),
        Annotation((Slash, AnnotationExpr)),
        Any((Slash, AnyExpr)),
        All((Slash, AllExpr)),
    }

    ComplexColPathExpr = "complexColPathExpr" {
        CastPath(ComplexColPathExprCast),
        Path(CollectionPathExpr),
        Cast(ComplexCast),
    }

    ComplexPathExpr = "complexPathExpr" {
        CastPath(ComplexPathExprCast),
        Path(ComplexPathExprTail),
        Cast(ComplexCast),
    }

    ComplexPathExprTail = "complexPathExpr-path" {
        BoundFunction((Slash, Box<BoundFunctionExpr>)),
        Property((Slash, Box<PropertyPathExpr>)),
        Annotation((Slash, AnnotationExpr)),
    }

    PrimitivePathExprTail = "primitivePathExpr-path" {
        Annotation(AnnotationExpr),
        BoundFunction(Box<BoundFunctionExpr>),
    }

    FunctionExprCall = "functionExpr-call" {
        EntityCol(EntityColFunctionExpr),
        Entity(EntityFunctionExpr),
        ComplexCol(ComplexColFunctionExpr),
        Complex(ComplexFunctionExpr),
        PrimitiveCol(PrimitiveColFunctionExpr),
        Primitive(PrimitiveFunctionExpr),
    }

    FunctionExprParameterValue = "functionExprParameter-value" {
        Alias(ParameterAlias),
        Value(ParameterValue),
    }

    ParameterValue = "parameterValue" {
        ArrayOrObject(Box<ArrayOrObject>),
        CommonExpr(Box<CommonExpr>),
    }

    MethodCallExpr = "methodCallExpr" {
        IndexOf(IndexOfMethodCallExpr),
        ToLower(ToLowerMethodCallExpr),
        ToUpper(ToUpperMethodCallExpr),
        Trim(TrimMethodCallExpr),
        Substring(SubstringMethodCallExpr),
        Concat(ConcatMethodCallExpr),
        Length(LengthMethodCallExpr),
        Year(YearMethodCallExpr),
        Month(MonthMethodCallExpr),
        Day(DayMethodCallExpr),
        Hour(HourMethodCallExpr),
        Minute(MinuteMethodCallExpr),
        Second(SecondMethodCallExpr),
        FractionalSeconds(FractionalSecondsMethodCallExpr),
        TotalSeconds(TotalSecondsMethodCallExpr),
        Date(DateMethodCallExpr),
        Time(TimeMethodCallExpr),
        Round(RoundMethodCallExpr),
        Floor(FloorMethodCallExpr),
        Ceiling(CeilingMethodCallExpr),
        Distance(DistanceMethodCallExpr),
        GeoLength(GeoLengthMethodCallExpr),
        TotalOffsetMinutes(TotalOffsetMinutesMethodCallExpr),
        MinDateTime(MinDateTimeMethodCallExpr),
        MaxDateTime(MaxDateTimeMethodCallExpr),
        Now(NowMethodCallExpr),
        Bool(BoolMethodCallExpr),
    }

    BoolMethodCallExpr = "boolMethodCallExpr" {
        EndsWith(EndsWithMethodCallExpr),
        StartsWith(StartsWithMethodCallExpr),
        Contains(ContainsMethodCallExpr),
        Intersects(IntersectsMethodCallExpr),
        HasSubset(HasSubsetMethodCallExpr),
        HasSubsequence(HasSubsequenceMethodCallExpr),
    }
}

alternation_shape! {
    PropertyPathExpr = "propertyPathExpr" {
        EntityColNavigation(EntityColNavigationPathExpr),
        EntityNavigation(EntityNavigationPathExpr),
        ComplexCol(ComplexColPropertyPathExpr),
        Complex(ComplexPropertyPathExpr),
        PrimitiveCol(PrimitiveColPropertyPathExpr),
        Primitive(PrimitivePropertyPathExpr),
        Stream(StreamPropertyPathExpr),
    }
}

sequences! {
    CommonExpr = "commonExpr" {
        operand: CommonExprOperand,
        arithmetic: Option<ArithmeticExpr>,
        comparison: Option<ComparisonExpr>,
        logical: Option<LogicalExpr>,
    }

    BoolCommonExpr = "boolCommonExpr" {
        expr: Box<CommonExpr>,
    }

    RootExpr = "rootExpr" {
        keyword: RootKw,
        target: RootTarget,
        navigation: Option<Box<SingleNavigationExpr>>,
    }

    RootEntity = "rootExpr-entity" {
        entity_set: EntitySetName,
        key: KeyPredicate,
    }

    InscopeMemberExpr = "firstMemberExpr-inscope" {
        variable: InscopeVariableExpr,
        member: Option<(Slash, MemberExpr)>,
    }

    MemberExpr = "memberExpr" {
        cast: Option<(QualifiedEntityTypeName, Slash)>,
        path: MemberPath,
    }

    EntityColNavigationPathExpr = "propertyPathExpr-entityColNavigation" {
        property: EntityColNavigationProperty,
        continuation: Option<Box<CollectionNavigationExpr>>,
    }

    EntityNavigationPathExpr = "propertyPathExpr-entityNavigation" {
        property: EntityNavigationProperty,
        continuation: Option<Box<SingleNavigationExpr>>,
    }

    ComplexColPropertyPathExpr = "propertyPathExpr-complexCol" {
        property: ComplexColProperty,
        continuation: Option<Box<ComplexColPathExpr>>,
    }

    ComplexPropertyPathExpr = "propertyPathExpr-complex" {
        property: ComplexProperty,
        continuation: Option<Box<ComplexPathExpr>>,
    }

    PrimitiveColPropertyPathExpr = "propertyPathExpr-primitiveCol" {
        property: PrimitiveColProperty,
        continuation: Option<Box<CollectionPathExpr>>,
    }

    PrimitivePropertyPathExpr = "propertyPathExpr-primitive" {
        property: PrimitiveProperty,
        continuation: Option<Box<PrimitivePathExpr>>,
    }

    StreamPropertyPathExpr = "propertyPathExpr-stream" {
        property: StreamProperty,
        continuation: Option<Box<PrimitivePathExpr>>,
    }

    AnnotationExpr = "annotationExpr" {
        annotation: Annotation,
        path: Option<AnnotationExprPath>,
    }

    /// `@[namespace.]termName[#qualifier]`
    Annotation = "annotation" {
        at: At,
        namespace: Option<(Namespace, Dot)>,
        term: TermName,
        qualifier: Option<(Hash, AnnotationQualifier)>,
    }

    CollectionNavigationExprCast = "collectionNavigationExpr-castPath" {
        cast: EntityCast,
        path: CollectionNavigationExprPath,
    }

    KeyNavigationExpr = "collectionNavigationExpr-key" {
        key: ExprKeyPredicate,
        navigation: Option<Box<SingleNavigationExpr>>,
    }

    SingleNavigationExpr = "singleNavigationExpr" {
        slash: Slash,
        member: Box<MemberExpr>,
    }

    ComplexColPathExprCast = "complexColPathExpr-castPath" {
        cast: ComplexCast,
        path: CollectionPathExpr,
    }

    CountPathExpr = "collectionPathExpr-count" {
        count: CountSegment,
        options: Option<ExpandCountOptions>,
    }

    ExpandCountOptions = "expandCountOptions" {
        open: Open,
        first: ExpandCountOption,
        rest: Vec<(Semi, ExpandCountOption)>,
        close: Close,
    }

    ComplexPathExprCast = "complexPathExpr-castPath" {
        cast: ComplexCast,
        path: ComplexPathExprTail,
    }

    PrimitivePathExpr = "primitivePathExpr" {
        slash: Slash,
        path: Option<PrimitivePathExprTail>,
    }

    BoundFunctionExpr = "boundFunctionExpr" {
        function: FunctionExpr,
    }

    FunctionExpr = "functionExpr" {
        namespace: Namespace,
        dot: Dot,
        call: FunctionExprCall,
    }

    EntityColFunctionExpr = "functionExpr-entityCol" {
        function: EntityColFunction,
        parameters: FunctionExprParameters,
        continuation: Option<Box<CollectionNavigationExpr>>,
    }

    EntityFunctionExpr = "functionExpr-entity" {
        function: EntityFunction,
        parameters: FunctionExprParameters,
        continuation: Option<Box<SingleNavigationExpr>>,
    }

    ComplexColFunctionExpr = "functionExpr-complexCol" {
        function: ComplexColFunction,
        parameters: FunctionExprParameters,
        continuation: Option<Box<ComplexColPathExpr>>,
    }

    ComplexFunctionExpr = "functionExpr-complex" {
        function: ComplexFunction,
        parameters: FunctionExprParameters,
        continuation: Option<Box<ComplexPathExpr>>,
    }

    PrimitiveColFunctionExpr = "functionExpr-primitiveCol" {
        function: PrimitiveColFunction,
        parameters: FunctionExprParameters,
        continuation: Option<Box<CollectionPathExpr>>,
    }

    PrimitiveFunctionExpr = "functionExpr-primitive" {
        function: PrimitiveFunction,
        parameters: FunctionExprParameters,
        continuation: Option<Box<PrimitivePathExpr>>,
    }

    FunctionExprParameters = "functionExprParameters" {
        open: Open,
        parameters: Option<(FunctionExprParameter, Vec<(Comma, FunctionExprParameter)>)>,
        close: Close,
    }

    FunctionExprParameter = "functionExprParameter" {
        name: ParameterName,
        eq: Eq,
        value: FunctionExprParameterValue,
    }

    AnyExpr = "anyExpr" {
        keyword: AnyKw,
        open: Open,
        leading: Bws,
        lambda: Option<LambdaExpr>,
        trailing: Bws,
        close: Close,
    }

    AllExpr = "allExpr" {
        keyword: AllKw,
        open: Open,
        leading: Bws,
        lambda: LambdaExpr,
        trailing: Bws,
        close: Close,
    }

    /// `lambdaVariableExpr BWS COLON BWS lambdaPredicateExpr`
    LambdaExpr = "lambdaExpr" {
        variable: LambdaVariableExpr,
        before: Bws,
        colon: Colon,
        after: Bws,
        predicate: LambdaPredicateExpr,
    }

    LambdaPredicateExpr = "lambdaPredicateExpr" {
        expr: BoolCommonExpr,
    }

    ParenExpr = "parenExpr" {
        open: Open,
        leading: Bws,
        expr: Box<CommonExpr>,
        trailing: Bws,
        close: Close,
    }

    ListExpr = "listExpr" {
        open: Open,
        leading: Bws,
        first: Box<CommonExpr>,
        trailing: Bws,
        rest: Vec<ListItem>,
        close: Close,
    }

    ListItem = "listExpr-item" {
        comma: Comma,
        leading: Bws,
        expr: Box<CommonExpr>,
        trailing: Bws,
    }

    NegateExpr = "negateExpr" {
        minus: Minus,
        ws: Bws,
        expr: Box<CommonExpr>,
    }

    NotExpr = "notExpr" {
        keyword: NotKw,
        ws: Rws,
        expr: BoolCommonExpr,
    }

    IsofExpr = "isofExpr" {
        keyword: IsofKw,
        open: Open,
        leading: Bws,
        operand: Option<TypeTestOperand>,
        type_name: QualifiedTypeName,
        trailing: Bws,
        close: Close,
    }

    CastExpr = "castExpr" {
        keyword: CastKw,
        open: Open,
        leading: Bws,
        operand: Option<TypeTestOperand>,
        type_name: QualifiedTypeName,
        trailing: Bws,
        close: Close,
    }

    /// `commonExpr BWS COMMA BWS` before the type name of `isof` and `cast`
    TypeTestOperand = "isofExpr-operand" {
        expr: Box<CommonExpr>,
        before: Bws,
        comma: Comma,
        after: Bws,
    }

    HasExpr = "hasExpr" {
        before: Rws,
        operator: HasKw,
        after: Rws,
        operand: EnumLiteral,
    }

    AndExpr = "andExpr" {
        before: Rws,
        operator: AndKw,
        after: Rws,
        operand: BoolCommonExpr,
    }

    OrExpr = "orExpr" {
        before: Rws,
        operator: OrKw,
        after: Rws,
        operand: BoolCommonExpr,
    }
}

macro_rules! binary_operators {
    ($($name:ident = $rule:literal, $kw:ident;)*) => {
        sequences! {
            $($name = $rule {
                before: Rws,
                operator: $kw,
                after: Rws,
                operand: Box<CommonExpr>,
            })*
        }
    };
}

binary_operators! {
    EqExpr = "eqExpr", EqKw;
    NeExpr = "neExpr", NeKw;
    LtExpr = "ltExpr", LtKw;
    LeExpr = "leExpr", LeKw;
    GtExpr = "gtExpr", GtKw;
    GeExpr = "geExpr", GeKw;
    InExpr = "inExpr", InKw;
    AddExpr = "addExpr", AddKw;
    SubExpr = "subExpr", SubKw;
    MulExpr = "mulExpr", MulKw;
    DivExpr = "divExpr", DivKw;
    DivbyExpr = "divbyExpr", DivbyKw;
    ModExpr = "modExpr", ModKw;
}

/// `"name" OPEN BWS CLOSE`
macro_rules! nullary_methods {
    ($($name:ident = $rule:literal, $kw:ident = $kwrule:literal [$spelling:literal];)*) => {
        literals! { $($kw = $kwrule, Insensitive [$spelling];)* }

        sequences! {
            $($name = $rule {
                keyword: $kw,
                open: Open,
                ws: Bws,
                close: Close,
            })*
        }
    };
}

/// `"name" OPEN BWS commonExpr BWS CLOSE`
macro_rules! unary_methods {
    ($($name:ident = $rule:literal, $kw:ident = $kwrule:literal [$spelling:literal];)*) => {
        literals! { $($kw = $kwrule, Insensitive [$spelling];)* }

        sequences! {
            $($name = $rule {
                keyword: $kw,
                open: Open,
                leading: Bws,
                arg: Box<CommonExpr>,
                trailing: Bws,
                close: Close,
            })*
        }
    };
}

/// `"name" OPEN BWS commonExpr BWS COMMA BWS commonExpr BWS CLOSE`
macro_rules! binary_methods {
    ($($name:ident = $rule:literal, $kw:ident = $kwrule:literal [$spelling:literal];)*) => {
        literals! { $($kw = $kwrule, Insensitive [$spelling];)* }

        sequences! {
            $($name = $rule {
                keyword: $kw,
                open: Open,
                leading: Bws,
                first: Box<CommonExpr>,
                before_comma: Bws,
                comma: Comma,
                after_comma: Bws,
                second: Box<CommonExpr>,
                trailing: Bws,
                close: Close,
            })*
        }
    };
}

nullary_methods! {
    MinDateTimeMethodCallExpr = "minDateTimeMethodCallExpr", MinDateTimeKw = "\"mindatetime\"" ["mindatetime"];
    MaxDateTimeMethodCallExpr = "maxDateTimeMethodCallExpr", MaxDateTimeKw = "\"maxdatetime\"" ["maxdatetime"];
    NowMethodCallExpr = "nowMethodCallExpr", NowKw = "\"now\"" ["now"];
}

unary_methods! {
    LengthMethodCallExpr = "lengthMethodCallExpr", LengthKw = "\"length\"" ["length"];
    ToLowerMethodCallExpr = "toLowerMethodCallExpr", ToLowerKw = "\"tolower\"" ["tolower"];
    ToUpperMethodCallExpr = "toUpperMethodCallExpr", ToUpperKw = "\"toupper\"" ["toupper"];
    TrimMethodCallExpr = "trimMethodCallExpr", TrimKw = "\"trim\"" ["trim"];
    YearMethodCallExpr = "yearMethodCallExpr", YearKw = "\"year\"" ["year"];
    MonthMethodCallExpr = "monthMethodCallExpr", MonthKw = "\"month\"" ["month"];
    DayMethodCallExpr = "dayMethodCallExpr", DayKw = "\"day\"" ["day"];
    HourMethodCallExpr = "hourMethodCallExpr", HourKw = "\"hour\"" ["hour"];
    MinuteMethodCallExpr = "minuteMethodCallExpr", MinuteKw = "\"minute\"" ["minute"];
    SecondMethodCallExpr = "secondMethodCallExpr", SecondKw = "\"second\"" ["second"];
    FractionalSecondsMethodCallExpr = "fractionalsecondsMethodCallExpr", FractionalSecondsKw = "\"fractionalseconds\"" ["fractionalseconds"];
    TotalSecondsMethodCallExpr = "totalsecondsMethodCallExpr", TotalSecondsKw = "\"totalseconds\"" ["totalseconds"];
    DateMethodCallExpr = "dateMethodCallExpr", DateKw = "\"date\"" ["date"];
    TimeMethodCallExpr = "timeMethodCallExpr", TimeKw = "\"time\"" ["time"];
    TotalOffsetMinutesMethodCallExpr = "totalOffsetMinutesMethodCallExpr", TotalOffsetMinutesKw = "\"totaloffsetminutes\"" ["totaloffsetminutes"];
    RoundMethodCallExpr = "roundMethodCallExpr", RoundKw = "\"round\"" ["round"];
    FloorMethodCallExpr = "floorMethodCallExpr", FloorKw = "\"floor\"" ["floor"];
    CeilingMethodCallExpr = "ceilingMethodCallExpr", CeilingKw = "\"ceiling\"" ["ceiling"];
    GeoLengthMethodCallExpr = "geoLengthMethodCallExpr", GeoLengthKw = "\"geo.length\"" ["geo.length"];
}

binary_methods! {
    ConcatMethodCallExpr = "concatMethodCallExpr", ConcatKw = "\"concat\"" ["concat"];
    ContainsMethodCallExpr = "containsMethodCallExpr", ContainsKw = "\"contains\"" ["contains"];
    EndsWithMethodCallExpr = "endsWithMethodCallExpr", EndsWithKw = "\"endswith\"" ["endswith"];
    IndexOfMethodCallExpr = "indexOfMethodCallExpr", IndexOfKw = "\"indexof\"" ["indexof"];
    StartsWithMethodCallExpr = "startsWithMethodCallExpr", StartsWithKw = "\"startswith\"" ["startswith"];
    DistanceMethodCallExpr = "distanceMethodCallExpr", DistanceKw = "\"geo.distance\"" ["geo.distance"];
    IntersectsMethodCallExpr = "intersectsMethodCallExpr", IntersectsKw = "\"geo.intersects\"" ["geo.intersects"];
    HasSubsetMethodCallExpr = "hasSubsetMethodCallExpr", HasSubsetKw = "\"hassubset\"" ["hassubset"];
    HasSubsequenceMethodCallExpr = "hasSubsequenceMethodCallExpr", HasSubsequenceKw = "\"hassubsequence\"" ["hassubsequence"];
}

literals! {
    SubstringKw = "\"substring\"", Insensitive ["substring"];
}

sequences! {
    SubstringMethodCallExpr = "substringMethodCallExpr" {
        keyword: SubstringKw,
        open: Open,
        leading: Bws,
        first: Box<CommonExpr>,
        before_comma: Bws,
        comma: Comma,
        after_comma: Bws,
        second: Box<CommonExpr>,
        trailing: Bws,
        length: Option<SubstringLength>,
        close: Close,
    }

    SubstringLength = "substringMethodCallExpr-length" {
        comma: Comma,
        leading: Bws,
        arg: Box<CommonExpr>,
        trailing: Bws,
    }
}

impl CommonExpr {
    /// Comparison operator keyword, if the expression has one at this level
    pub fn comparison_operator(&self) -> Option<&str> {
        let comparison = self.comparison.as_ref()?;
        let text = match comparison {
            ComparisonExpr::Eq(e) => &e.operator.text,
            ComparisonExpr::Ne(e) => &e.operator.text,
            ComparisonExpr::Lt(e) => &e.operator.text,
            ComparisonExpr::Le(e) => &e.operator.text,
            ComparisonExpr::Gt(e) => &e.operator.text,
            ComparisonExpr::Ge(e) => &e.operator.text,
            ComparisonExpr::Has(e) => &e.operator.text,
            ComparisonExpr::In(e) => &e.operator.text,
        };
        Some(text)
    }
}

impl PropertyPathExpr {
    /// Whether the property is followed by a non-empty path continuation
    pub fn is_continued(&self) -> bool {
        let extent = match self {
            Self::EntityColNavigation(p) => p.continuation.extent(),
            Self::EntityNavigation(p) => p.continuation.extent(),
            Self::ComplexCol(p) => p.continuation.extent(),
            Self::Complex(p) => p.continuation.extent(),
            Self::PrimitiveCol(p) => p.continuation.extent(),
            Self::Primitive(p) => p.continuation.extent(),
            Self::Stream(p) => p.continuation.extent(),
        };
        extent.is_some_and(|span| !span.is_empty())
    }
}

/// `parenExpr / listExpr` with their shared `( BWS commonExpr BWS` parsed once.
///
/// Trying the two in turn would parse the inner expression twice at every
/// nesting level.
fn group<'a>(input: Cursor<'a>, ctx: &mut ParseContext) -> ParseResult<'a, CommonExprOperand> {
    ctx.rule(ParenExpr::NAME, input, |ctx| {
        let ((open, leading, first, trailing), after) = <(Open, Bws, Box<CommonExpr>, Bws)>::parse(input, ctx)?;
        if let Ok((close, rest)) = Close::parse(after, ctx) {
            let paren = ParenExpr {
                open,
                leading,
                expr: first,
                trailing,
                close,
                span: input.span_to(rest),
            };
            return Ok((CommonExprOperand::Paren(paren), rest));
        }
        let (items, after) = Vec::<ListItem>::parse(after, ctx)?;
        let (close, rest) = Close::parse(after, ctx)?;
        let list = ListExpr {
            open,
            leading,
            first,
            trailing,
            rest: items,
            close,
            span: input.span_to(rest),
        };
        Ok((CommonExprOperand::List(list), rest))
    })
}

impl Parse for CommonExprOperand {
    fn parse<'a>(input: Cursor<'a>, ctx: &mut ParseContext) -> ParseResult<'a, Self> {
        let arms: &[fn(Cursor<'a>, &mut ParseContext) -> ParseResult<'a, Self>] = &[
            |input, ctx| arm(input, ctx, Self::PrimitiveLiteral),
            |input, ctx| arm(input, ctx, Self::ArrayOrObject),
            |input, ctx| arm(input, ctx, Self::Root),
            |input, ctx| arm(input, ctx, Self::MethodCall),
            |input, ctx| arm(input, ctx, Self::Cast),
            |input, ctx| arm(input, ctx, Self::Isof),
            |input, ctx| arm(input, ctx, Self::Not),
            |input, ctx| arm(input, ctx, Self::Function),
            |input, ctx| arm(input, ctx, Self::FirstMember),
            |input, ctx| arm(input, ctx, Self::Negate),
            |input, ctx| group(input, ctx),
        ];
        ctx.rule(Self::NAME, input, |ctx| {
            for parse_arm in arms {
                if let Ok(found) = parse_arm(input, ctx) {
                    return Ok(found);
                }
            }
            Err(NoMatch)
        })
    }
}

type Attempt<'a> = Option<(PropertyPathExpr, Cursor<'a>)>;

/// Try one alternative; hand it back if it continues, remember it if it is the first bare match
fn attempt<'a, T: Parse>(
    input: Cursor<'a>,
    ctx: &mut ParseContext,
    wrap: fn(T) -> PropertyPathExpr,
    bare: &mut Attempt<'a>,
) -> Attempt<'a> {
    let (node, rest) = T::parse(input, ctx).ok()?;
    let node = wrap(node);
    if node.is_continued() {
        return Some((node, rest));
    }
    if bare.is_none() {
        *bare = Some((node, rest));
    }
    None
}

impl Parse for PropertyPathExpr {
    fn parse<'a>(input: Cursor<'a>, ctx: &mut ParseContext) -> ParseResult<'a, Self> {
        ctx.rule(Self::NAME, input, |ctx| {
            let mut bare = None;
            let continued = attempt(input, ctx, Self::EntityColNavigation, &mut bare)
                .or_else(|| attempt(input, ctx, Self::EntityNavigation, &mut bare))
                .or_else(|| attempt(input, ctx, Self::ComplexCol, &mut bare))
                .or_else(|| attempt(input, ctx, Self::Complex, &mut bare))
                .or_else(|| attempt(input, ctx, Self::PrimitiveCol, &mut bare))
                .or_else(|| attempt(input, ctx, Self::Primitive, &mut bare))
                .or_else(|| attempt(input, ctx, Self::Stream, &mut bare));
            continued.or(bare).ok_or(NoMatch)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::OdataIdentifier;
    use crate::native_parser::parse_complete;
    use crate::parse_context::{ParseError, TOO_DEEP};
    use crate::printer::print;
    use crate::traversal::descendants;

    fn expr(input: &str) -> CommonExpr {
        parse_complete::<CommonExpr>(input).unwrap().node
    }

    #[test]
    fn test_comparison_nodes() {
        let e = expr("Name eq 'Bob'");
        assert_eq!(e.comparison_operator(), Some("eq"));
        let ids: Vec<&str> = descendants::<OdataIdentifier>(&e).iter().map(|i| i.as_str()).collect();
        assert_eq!(ids, vec!["Name"]);
        let Some(ComparisonExpr::Eq(eq)) = &e.comparison else {
            panic!("expected eq");
        };
        assert_eq!(print(&*eq.operand), "'Bob'");
        assert_eq!(print(&e.operand), "Name");
    }

    #[test]
    fn test_navigation_path() {
        let e = expr("Address/City eq 'Oslo'");
        let CommonExprOperand::FirstMember(first) = &e.operand else {
            panic!("expected member expression");
        };
        let FirstMemberExpr::Member(member) = &**first else {
            panic!("expected member expression");
        };
        let MemberPath::Property(path) = &member.path else {
            panic!("expected property path");
        };
        assert_eq!(path.variant_name(), "EntityNavigation");
        assert!(path.is_continued());
    }

    #[test]
    fn test_lambda() {
        let e = expr("Items/any(d:d/Price gt 5)");
        assert_eq!(descendants::<AnyExpr>(&e).len(), 1);
        assert_eq!(descendants::<LambdaExpr>(&e)[0].variable.as_str(), "d");
        assert!(parse_complete::<CommonExpr>("Tags/all(t:contains(t,'x'))").is_ok());
    }

    #[test]
    fn test_method_calls() {
        for input in [
            "contains(Name,'Bob')",
            "substring(Name,1,2) eq 'ob'",
            "now() gt 2020-01-01T00:00:00Z",
            "geo.distance(Location,geography'SRID=0;Point(1 2)') lt 10",
            "toupper(trim( Name )) eq 'X'",
        ] {
            let e = expr(input);
            assert_eq!(print(&e), input);
            assert!(!descendants::<MethodCallExpr>(&e).is_empty(), "{input}");
        }
    }

    #[test]
    fn test_operators_nest_right() {
        let e = expr("A eq 1 and B eq 2");
        let Some(ComparisonExpr::Eq(eq)) = &e.comparison else {
            panic!("expected eq");
        };
        assert!(eq.operand.logical.is_some());
        assert!(e.logical.is_none());
    }

    #[test]
    fn test_divby_backtracks_from_div() {
        let e = expr("Price divby 2");
        assert!(matches!(e.arithmetic, Some(ArithmeticExpr::Divby(_))));
    }

    #[test]
    fn test_bound_function_before_property() {
        let e = expr("NS.Discount(rate=0.1) gt 2");
        assert!(matches!(e.operand, CommonExprOperand::Function(_)));
        let m = parse_complete::<MemberExpr>("Orders/NS.Total()").unwrap().node;
        assert_eq!(descendants::<BoundFunctionExpr>(&m).len(), 1);
    }

    #[test]
    fn test_cast_and_isof() {
        let e = expr("isof(Edm.String)");
        let CommonExprOperand::Isof(isof) = &e.operand else {
            panic!("expected isof");
        };
        assert!(isof.operand.is_none());
        let e = expr("cast(Price, Edm.Int32) eq 3");
        assert!(matches!(e.operand, CommonExprOperand::Cast(_)));
    }

    #[test]
    fn test_list_and_in() {
        let e = expr("Name in ('a','b')");
        let Some(ComparisonExpr::In(inner)) = &e.comparison else {
            panic!("expected in");
        };
        assert!(matches!(inner.operand.operand, CommonExprOperand::List(_)));
        assert!(matches!(expr("(1)").operand, CommonExprOperand::Paren(_)));
        assert_eq!(print(&expr("( 1 , 2 )")), "( 1 , 2 )");
    }

    #[test]
    fn test_unclosed_groups_fail_fast() {
        let input = format!("{}1", "(".repeat(200));
        let err = parse_complete::<CommonExpr>(&input).unwrap_err();
        assert!(matches!(err, ParseError::Malformed { ref reason, .. } if reason == TOO_DEEP), "{err:?}");
    }

    #[test]
    fn test_has_enum() {
        let e = expr("Style has Sales.Pattern'Yellow'");
        assert!(matches!(e.comparison, Some(ComparisonExpr::Has(_))));
    }

    #[test]
    fn test_root_and_implicit_variables() {
        assert!(parse_complete::<CommonExpr>("$root/People('x')/Name eq $it/Name").is_ok());
        let e = expr("$this");
        assert!(matches!(
            e.operand,
            CommonExprOperand::FirstMember(ref m) if matches!(**m, FirstMemberExpr::Inscope(_))
        ));
    }

    #[test]
    fn test_annotation_qualifier() {
        let a = parse_complete::<Annotation>("@Core.Description#short").unwrap().node;
        assert_eq!(a.term.as_str(), "Description");
        assert!(a.qualifier.is_some());
    }

    #[test]
    fn test_not_and_negate() {
        assert!(matches!(expr("not Active").operand, CommonExprOperand::Not(_)));
        assert!(matches!(expr("-Price lt 0").operand, CommonExprOperand::Negate(_)));
        assert!(matches!(expr("-5").operand, CommonExprOperand::PrimitiveLiteral(_)));
    }
}
