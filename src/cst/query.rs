//! Query options
//!
//! System option names accept both the `$`-prefixed and the bare spelling;
//! the `$` form is canonical.

use super::expressions::{BoolCommonExpr, CommonExpr, ExpandCountOptions, ParameterValue};
use super::literals::{BooleanValue, PositiveInteger};
use super::names::{
    Action, ComplexCast, ComplexColProperty, ComplexProperty, ComputedProperty, EntityCast,
    Function, Namespace, NavigationProperty, ParameterName, PrimitiveColProperty,
    PrimitiveProperty, QualifiedComplexTypeName, QualifiedEntityTypeName, StreamProperty,
};
use super::punctuation::{
    Amp, Bws, Close, Comma, Digits, Dot, Eq, Open, QuotationMark, Rws, Semi, Slash, Star,
};
use super::resource_path::{CountSegment, ParameterAlias, RefSegment};
use super::rfc3986::IriInQuery;
use crate::charclass::{CharClass, PctVariant};
use crate::combinator::ManyThen;
use crate::lexer::{self, Lexer};

literals! {
    ComputeKw = "\"$compute\"", Insensitive ["$compute", "compute"];
    DeltatokenKw = "\"$deltatoken\"", Insensitive ["$deltatoken"];
    ExpandKw = "\"$expand\"", Insensitive ["$expand", "expand"];
    FilterKw = "\"$filter\"", Insensitive ["$filter", "filter"];
    FormatKw = "\"$format\"", Insensitive ["$format", "format"];
    IdKw = "\"$id\"", Insensitive ["$id", "id"];
    InlineCountKw = "\"$count\"", Insensitive ["$count", "count"];
    OrderbyKw = "\"$orderby\"", Insensitive ["$orderby", "orderby"];
    SchemaVersionKw = "\"$schemaversion\"", Insensitive ["$schemaversion", "schemaversion"];
    SearchKw = "\"$search\"", Insensitive ["$search", "search"];
    SelectKw = "\"$select\"", Insensitive ["$select", "select"];
    SkipKw = "\"$skip\"", Insensitive ["$skip", "skip"];
    SkiptokenKw = "\"$skiptoken\"", Insensitive ["$skiptoken"];
    TopKw = "\"$top\"", Insensitive ["$top", "top"];
    IndexKw = "\"$index\"", Insensitive ["$index", "index"];
    LevelsKw = "\"$levels\"", Insensitive ["$levels", "levels"];
    ExpandValueKw = "\"$value\"", Insensitive word ["$value"];
    AsKw = "\"as\"", Insensitive word ["as"];
    AscKw = "\"asc\"", Insensitive word ["asc"];
    DescKw = "\"desc\"", Insensitive word ["desc"];
    MaxKw = "\"max\"", Insensitive word ["max"];
    AtomKw = "\"atom\"", Insensitive word ["atom"];
    JsonKw = "\"json\"", Insensitive word ["json"];
    XmlKw = "\"xml\"", Insensitive word ["xml"];
    SearchOrKw = "'OR'", Sensitive ["OR"];
    SearchAndKw = "'AND'", Sensitive ["AND"];
    SearchNotKw = "'NOT'", Sensitive ["NOT"];
}

tokens! {
    /// `1*pchar "/" 1*pchar` without `&`, which separates query options
    MediaType = "format-mediaType", media_type;
    /// `1*unreserved`
    SchemaVersionValue = "schemaversion-value", schema_version;
    /// `1*qchar-no-AMP`
    DeltatokenValue = "deltatoken-value", qchar_run;
    SkiptokenValue = "skiptoken-value", qchar_run;
    SearchWord = "searchWord", search_word;
    /// `1*qchar-no-AMP-DQUOTE`
    SearchPhraseContent = "searchPhrase-content", search_phrase_content;
    CustomName = "customName", custom_name;
    CustomValue = "customValue", custom_value;
}

alternations! {
    QueryOption = "queryOption" {
        System(Box<SystemQueryOption>),
        AliasAndValue(AliasAndValue),
        NameAndValue(NameAndValue),
        Custom(CustomQueryOption),
    }

    BatchOption = "batchOption" {
        Format(Format),
        Custom(CustomQueryOption),
    }

    MetadataOption = "metadataOption" {
        Format(Format),
        Custom(CustomQueryOption),
    }

    EntityIdOption = "entityIdOption" {
        Format(Format),
        Custom(CustomQueryOption),
    }

    EntityCastOption = "entityCastOption" {
        IdOption(EntityIdOption),
        Expand(Expand),
        Select(Select),
    }

    SystemQueryOption = "systemQueryOption" {
        Compute(Compute),
        Deltatoken(Deltatoken),
        Expand(Expand),
        Filter(Filter),
        Format(Format),
        Id(Id),
        InlineCount(InlineCount),
        Orderby(Orderby),
        SchemaVersion(SchemaVersion),
        Search(Search),
        Select(Select),
        Skip(Skip),
        Skiptoken(Skiptoken),
        Top(Top),
        Index(Index),
    }

    ExpandItem = "expandItem" {
        Star(ExpandStar),
        Value(ExpandValueKw),
        Path(Box<ExpandPathItem>),
    }

    ExpandStarSuffix = "expandItem-starSuffix" {
        Ref(RefSegment),
        Levels((Open, Levels, Close)),
    }

    ExpandPathSuffix = "expandItem-pathSuffix" {
        Ref((RefSegment, Option<ExpandRefOptions>)),
        Count((CountSegment, Option<ExpandCountOptions>)),
        Options(ExpandOptions),
    }

    ExpandTypeCast = "expandPath-cast" {
        Entity(QualifiedEntityTypeName),
        Complex(QualifiedComplexTypeName),
    }

    ExpandSegmentProperty = "expandPath-segmentProperty" {
        Complex(ComplexProperty),
        ComplexCol(ComplexColProperty),
    }

    ExpandPathTarget = "expandPath-target" {
        Star(Star),
        Stream(StreamProperty),
        Navigation((NavigationProperty, Option<EntityCast>)),
    }

    ExpandCountOption = "expandCountOption" {
        Filter(Filter),
        Search(Search),
    }

    ExpandRefOption = "expandRefOption" {
        Count(ExpandCountOption),
        Orderby(Orderby),
        Skip(Skip),
        Top(Top),
        InlineCount(InlineCount),
    }

    ExpandOption = "expandOption" {
        Ref(Box<ExpandRefOption>),
        Select(Box<Select>),
        Expand(Box<Expand>),
        Compute(Box<Compute>),
        Levels(Levels),
        AliasAndValue(AliasAndValue),
    }

    LevelsValue = "levels-value" {
        Count(PositiveInteger),
        Max(MaxKw),
    }

    SortDirection = "orderbyItem-direction" {
        Asc(AscKw),
        Desc(DescKw),
    }

    FormatValue = "format-value" {
        Atom(AtomKw),
        Json(JsonKw),
        Xml(XmlKw),
        MediaType(MediaType),
    }

    SchemaVersionSpec = "schemaversion-spec" {
        Any(Star),
        Version(SchemaVersionValue),
    }

    SearchHead = "searchExpr-head" {
        Paren(SearchParen),
        Term(SearchTerm),
    }

    SearchTail = "searchExpr-tail" {
        Or(SearchOrExpr),
        And(SearchAndExpr),
    }

    SearchValue = "searchTerm-value" {
        Phrase(SearchPhrase),
        Word(SearchWord),
    }

    SelectItem = "selectItem" {
        Star(Star),
        AllOperations(AllOperationsInSchema),
        Path(Box<SelectItemPath>),
    }

    SelectTypeCast = "selectItem-cast" {
        Entity(QualifiedEntityTypeName),
        Complex(QualifiedComplexTypeName),
    }

    /// Qualified names first: a bare property would claim their namespace.
    SelectTarget = "selectItem-target" {
        Function(QualifiedFunctionName),
        Action(QualifiedActionName),
        Property(SelectProperty),
    }

    /// Forms with a mandatory suffix are tried before the bare property,
    /// which matches any identifier.
    SelectProperty = "selectProperty" {
        PrimitiveCol((PrimitiveColProperty, SelectOptionsPc)),
        Path((SelectPath, SelectPathTail)),
        Cast((SelectPathProperty, ComplexCast)),
        Primitive(PrimitiveProperty),
        Navigation(NavigationProperty),
    }

    SelectPathProperty = "selectPath-property" {
        Complex(ComplexProperty),
        ComplexCol(ComplexColProperty),
    }

    SelectPathTail = "selectProperty-tail" {
        Options(SelectOptions),
        Property((Slash, Box<SelectProperty>)),
    }

    SelectOptionPc = "selectOptionPC" {
        Filter(Filter),
        Search(Search),
        InlineCount(InlineCount),
        Orderby(Orderby),
        Skip(Skip),
        Top(Top),
    }

    SelectOption = "selectOption" {
        Pc(Box<SelectOptionPc>),
        Compute(Box<Compute>),
        Select(Box<Select>),
        Expand(Box<Expand>),
        AliasAndValue(AliasAndValue),
    }
}

sequences! {
    QueryOptions = "queryOptions" {
        first: QueryOption,
        rest: Vec<(Amp, QueryOption)>,
    }

    BatchOptions = "batchOptions" {
        first: BatchOption,
        rest: Vec<(Amp, BatchOption)>,
    }

    MetadataOptions = "metadataOptions" {
        first: MetadataOption,
        rest: Vec<(Amp, MetadataOption)>,
    }

    EntityOptions = "entityOptions" {
        leading: ManyThen<(EntityIdOption, Amp), Id>,
        trailing: Vec<(Amp, EntityIdOption)>,
    }

    EntityCastOptions = "entityCastOptions" {
        leading: ManyThen<(EntityCastOption, Amp), Id>,
        trailing: Vec<(Amp, EntityCastOption)>,
    }

    Id = "id" {
        keyword: IdKw,
        eq: Eq,
        value: IriInQuery,
    }

    Compute = "compute" {
        keyword: ComputeKw,
        eq: Eq,
        first: ComputeItem,
        rest: Vec<(Comma, ComputeItem)>,
    }

    ComputeItem = "computeItem" {
        expr: CommonExpr,
        before: Rws,
        keyword: AsKw,
        after: Rws,
        name: ComputedProperty,
    }

    Expand = "expand" {
        keyword: ExpandKw,
        eq: Eq,
        first: ExpandItem,
        rest: Vec<(Comma, ExpandItem)>,
    }

    ExpandStar = "expandItem-star" {
        star: Star,
        suffix: Option<ExpandStarSuffix>,
    }

    ExpandPathItem = "expandItem-path" {
        path: ExpandPath,
        suffix: Option<Box<ExpandPathSuffix>>,
    }

    /// Leading segments give way when the target would otherwise be left
    /// without a property, so `Customer/$ref` keeps `Customer` as its target.
    ExpandPath = "expandPath" {
        cast: Option<(ExpandTypeCast, Slash)>,
        segments: ManyThen<ExpandPathSegment, ExpandPathTarget>,
    }

    ExpandPathSegment = "expandPath-segment" {
        property: ExpandSegmentProperty,
        slash: Slash,
        cast: Option<(QualifiedComplexTypeName, Slash)>,
    }

    ExpandRefOptions = "expandRefOptions" {
        open: Open,
        first: ExpandRefOption,
        rest: Vec<(Semi, ExpandRefOption)>,
        close: Close,
    }

    ExpandOptions = "expandOptions" {
        open: Open,
        first: ExpandOption,
        rest: Vec<(Semi, ExpandOption)>,
        close: Close,
    }

    Levels = "levels" {
        keyword: LevelsKw,
        eq: Eq,
        value: LevelsValue,
    }

    Filter = "filter" {
        keyword: FilterKw,
        eq: Eq,
        expr: BoolCommonExpr,
    }

    Orderby = "orderby" {
        keyword: OrderbyKw,
        eq: Eq,
        first: OrderbyItem,
        rest: Vec<(Comma, OrderbyItem)>,
    }

    OrderbyItem = "orderbyItem" {
        expr: CommonExpr,
        direction: Option<(Rws, SortDirection)>,
    }

    Skip = "skip" {
        keyword: SkipKw,
        eq: Eq,
        count: Digits,
    }

    Top = "top" {
        keyword: TopKw,
        eq: Eq,
        count: Digits,
    }

    Index = "index" {
        keyword: IndexKw,
        eq: Eq,
        position: Digits,
    }

    Format = "format" {
        keyword: FormatKw,
        eq: Eq,
        value: FormatValue,
    }

    InlineCount = "inlinecount" {
        keyword: InlineCountKw,
        eq: Eq,
        value: BooleanValue,
    }

    SchemaVersion = "schemaversion" {
        keyword: SchemaVersionKw,
        eq: Eq,
        value: SchemaVersionSpec,
    }

    Search = "search" {
        keyword: SearchKw,
        eq: Eq,
        leading: Bws,
        expr: SearchExpr,
    }

    SearchExpr = "searchExpr" {
        head: SearchHead,
        tail: Option<SearchTail>,
    }

    SearchParen = "searchExpr-paren" {
        open: Open,
        leading: Bws,
        expr: Box<SearchExpr>,
        trailing: Bws,
        close: Close,
    }

    SearchOrExpr = "searchOrExpr" {
        before: Rws,
        keyword: SearchOrKw,
        after: Rws,
        expr: Box<SearchExpr>,
    }

    SearchAndExpr = "searchAndExpr" {
        before: Rws,
        keyword: Option<(SearchAndKw, Rws)>,
        expr: Box<SearchExpr>,
    }

    SearchTerm = "searchTerm" {
        not: Option<(SearchNotKw, Rws)>,
        value: SearchValue,
    }

    SearchPhrase = "searchPhrase" {
        open: QuotationMark,
        content: SearchPhraseContent,
        close: QuotationMark,
    }

    Select = "select" {
        keyword: SelectKw,
        eq: Eq,
        first: SelectItem,
        rest: Vec<(Comma, SelectItem)>,
    }

    SelectItemPath = "selectItem-path" {
        cast: Option<(SelectTypeCast, Slash)>,
        target: SelectTarget,
    }

    SelectPath = "selectPath" {
        property: SelectPathProperty,
        cast: Option<ComplexCast>,
    }

    SelectOptionsPc = "selectProperty-optionsPC" {
        open: Open,
        first: SelectOptionPc,
        rest: Vec<(Semi, SelectOptionPc)>,
        close: Close,
    }

    SelectOptions = "selectProperty-options" {
        open: Open,
        first: SelectOption,
        rest: Vec<(Semi, SelectOption)>,
        close: Close,
    }

    AllOperationsInSchema = "allOperationsInSchema" {
        namespace: Namespace,
        dot: Dot,
        star: Star,
    }

    QualifiedActionName = "qualifiedActionName" {
        namespace: Namespace,
        dot: Dot,
        action: Action,
    }

    QualifiedFunctionName = "qualifiedFunctionName" {
        namespace: Namespace,
        dot: Dot,
        function: Function,
        parameters: Option<(Open, ParameterNames, Close)>,
    }

    ParameterNames = "parameterNames" {
        first: ParameterName,
        rest: Vec<(Comma, ParameterName)>,
    }

    Deltatoken = "deltatoken" {
        keyword: DeltatokenKw,
        eq: Eq,
        value: DeltatokenValue,
    }

    Skiptoken = "skiptoken" {
        keyword: SkiptokenKw,
        eq: Eq,
        value: SkiptokenValue,
    }

    AliasAndValue = "aliasAndValue" {
        alias: ParameterAlias,
        eq: Eq,
        value: ParameterValue,
    }

    NameAndValue = "nameAndValue" {
        name: ParameterName,
        eq: Eq,
        value: ParameterValue,
    }

    CustomQueryOption = "customQueryOption" {
        name: CustomName,
        value: Option<(Eq, CustomValue)>,
    }
}

impl QueryOptions {
    /// Options in source order
    pub fn iter(&self) -> impl Iterator<Item = &QueryOption> {
        std::iter::once(&self.first).chain(self.rest.iter().map(|(_, option)| option))
    }
}

impl Select {
    pub fn items(&self) -> impl Iterator<Item = &SelectItem> {
        std::iter::once(&self.first).chain(self.rest.iter().map(|(_, item)| item))
    }
}

impl Expand {
    pub fn items(&self) -> impl Iterator<Item = &ExpandItem> {
        std::iter::once(&self.first).chain(self.rest.iter().map(|(_, item)| item))
    }
}

fn pchar_no_amp(lx: &mut Lexer<'_>) -> bool {
    lx.peek() != Some('&') && lexer::pchar(lx)
}

fn media_type(lx: &mut Lexer<'_>) -> bool {
    lx.attempt(|lx| {
        lx.repeat(1, None, pchar_no_amp) && lx.eat_char('/') && lx.repeat(1, None, pchar_no_amp)
    })
}

fn schema_version(lx: &mut Lexer<'_>) -> bool {
    lx.repeat(1, None, |lx| lx.eat_class(CharClass::Unreserved))
}

fn qchar_run(lx: &mut Lexer<'_>) -> bool {
    lx.repeat(1, None, lexer::qchar_no_amp)
}

/// `1*( ALPHA / DIGIT / COMMA / "." / pct-encoded )`, letters and digits
/// taken in the Unicode sense
fn search_word(lx: &mut Lexer<'_>) -> bool {
    lx.repeat(1, None, |lx| {
        lx.eat(|ch| ch.is_alphanumeric() || ch == ',' || ch == '.') || lx.eat_pct(PctVariant::Any)
    })
}

fn search_phrase_content(lx: &mut Lexer<'_>) -> bool {
    lx.repeat(1, None, |lx| {
        lx.eat_class(CharClass::QcharNoAmpDquote) || lx.eat_pct(PctVariant::NoDquote)
    })
}

/// `qchar-no-AMP-EQ-AT-DOLLAR *( qchar-no-AMP-EQ )`
fn custom_name(lx: &mut Lexer<'_>) -> bool {
    let first = lx.eat_class(CharClass::QcharNoAmpEqAtDollar) || lx.eat_pct(PctVariant::Any);
    first
        && lx.repeat(0, None, |lx| {
            lx.eat_class(CharClass::QcharNoAmpEq) || lx.eat_pct(PctVariant::Any)
        })
}

fn custom_value(lx: &mut Lexer<'_>) -> bool {
    lx.repeat(0, None, lexer::qchar_no_amp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::{ComparisonExpr, OdataIdentifier, StringLiteral};
    use crate::native_parser::parse_complete;
    use crate::printer::{print, print_canonical};
    use crate::traversal::descendants;
    use rstest::rstest;

    fn option(input: &str) -> QueryOption {
        parse_complete::<QueryOption>(input).unwrap().node
    }

    fn system(input: &str) -> SystemQueryOption {
        match option(input) {
            QueryOption::System(system) => *system,
            other => panic!("expected a system query option, got {}", other.variant_name()),
        }
    }

    #[test]
    fn test_filter_distinguishes_parts() {
        let SystemQueryOption::Filter(filter) = system("$filter=Name eq 'Bob'") else {
            panic!("expected $filter");
        };
        let expr = &filter.expr.expr;
        let ids = descendants::<OdataIdentifier>(&**expr);
        assert_eq!(ids.len(), 1);
        assert_eq!(ids[0].as_str(), "Name");
        let Some(ComparisonExpr::Eq(eq)) = &expr.comparison else {
            panic!("expected eq");
        };
        assert_eq!(print(&eq.operator), "eq");
        let strings = descendants::<StringLiteral>(&*eq.operand);
        assert_eq!(strings.len(), 1);
        assert_eq!(print(strings[0]), "'Bob'");
    }

    #[test]
    fn test_bare_option_names() {
        let top = system("TOP=5");
        assert_eq!(top.variant_name(), "Top");
        assert_eq!(print(&top), "TOP=5");
        assert_eq!(print_canonical(&top), "$top=5");
    }

    #[rstest]
    #[case::compute("$compute=Price mul Qty as Total", "Compute")]
    #[case::deltatoken("$deltatoken=abc123", "Deltatoken")]
    #[case::expand("$expand=Orders($filter=Amount gt 100;$top=5),Customer/$ref", "Expand")]
    #[case::format_keyword("$format=json", "Format")]
    #[case::format_media_type("$format=application/json;odata.metadata=minimal", "Format")]
    #[case::id("$id=Orders(1)", "Id")]
    #[case::count("$count=true", "InlineCount")]
    #[case::orderby("$orderby=Name desc,Age", "Orderby")]
    #[case::schema_version("$schemaversion=*", "SchemaVersion")]
    #[case::search("$search=blue OR green", "Search")]
    #[case::select("$select=Name,Address/City,NS.*", "Select")]
    #[case::skip("$skip=10", "Skip")]
    #[case::skiptoken("$skiptoken=Xyz", "Skiptoken")]
    #[case::top("$top=2", "Top")]
    #[case::index("$index=3", "Index")]
    fn test_system_options(#[case] input: &str, #[case] variant: &str) {
        let parsed = system(input);
        assert_eq!(parsed.variant_name(), variant);
        assert_eq!(print(&parsed), input);
    }

    #[test]
    fn test_option_kinds() {
        assert_eq!(option("@p=1").variant_name(), "AliasAndValue");
        assert_eq!(option("rate=0.5").variant_name(), "NameAndValue");
        assert_eq!(option("debug").variant_name(), "Custom");
        assert!(parse_complete::<QueryOption>("$filter=Name eq").is_err());
    }

    #[test]
    fn test_query_options_sequence() {
        let options = parse_complete::<QueryOptions>("$top=2&$skip=3&x-trace").unwrap().node;
        let kinds: Vec<&str> = options.iter().map(|o| o.variant_name()).collect();
        assert_eq!(kinds, vec!["System", "System", "Custom"]);
    }

    #[test]
    fn test_expand_path_gives_back_segment() {
        let SystemQueryOption::Expand(expand) = system("$expand=Customer/$ref,Address/Country") else {
            panic!("expected $expand");
        };
        let paths: Vec<usize> = expand
            .items()
            .map(|item| match item {
                ExpandItem::Path(path) => path.path.segments.items.len(),
                _ => usize::MAX,
            })
            .collect();
        assert_eq!(paths, vec![0, 1]);
    }

    #[test]
    fn test_expand_levels() {
        assert!(parse_complete::<Expand>("$expand=*($levels=max)").is_ok());
        assert!(parse_complete::<Expand>("$expand=Children($levels=2;$select=Name)").is_ok());
        assert!(parse_complete::<Expand>("$expand=Children($levels=0)").is_err());
    }

    #[test]
    fn test_search_structure() {
        let input = "$search=NOT red AND (\"dark%20blue\" OR green)";
        let search = parse_complete::<Search>(input).unwrap().node;
        let SearchHead::Term(term) = &search.expr.head else {
            panic!("expected leading term");
        };
        assert!(term.not.is_some());
        let Some(SearchTail::And(and)) = &search.expr.tail else {
            panic!("expected AND");
        };
        assert!(and.keyword.is_some());
        assert!(matches!(and.expr.head, SearchHead::Paren(_)));
        assert_eq!(print(&search), input);
    }

    #[test]
    fn test_select_targets() {
        let select = parse_complete::<Select>("$select=NS.Fn(a,b),Tags($top=2),Address/NS.Home").unwrap().node;
        let kinds: Vec<&str> = select
            .items()
            .map(|item| match item {
                SelectItem::Path(path) => match &path.target {
                    SelectTarget::Property(property) => property.variant_name(),
                    other => other.variant_name(),
                },
                other => other.variant_name(),
            })
            .collect();
        assert_eq!(kinds, vec!["Function", "PrimitiveCol", "Cast"]);
    }
}
