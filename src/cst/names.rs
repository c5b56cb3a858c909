//! Names and identifiers
//!
//! Most named things in the grammar are an `odataIdentifier` under another
//! rule name. Each alias is its own type so the tree says which role the
//! identifier played.

use super::punctuation::{Close, Dot, Open, Slash};
use crate::ast::{RuleKind, SlotInfo};
use crate::combinator::Parse;
use crate::input_stream::{Cursor, Span};
use crate::lexer;
use crate::node::{Node, Rule, Slot};
use crate::parse_context::{ParseContext, ParseResult};
use crate::printer::{Print, Printer};
use std::any::Any;

tokens! {
    OdataIdentifier = "odataIdentifier", lexer::odata_identifier;
}

macro_rules! identifier_rules {
    ($($(#[$meta:meta])* $name:ident = $rule:literal;)*) => {
        sequences! {
            $($(#[$meta])* $name = $rule { identifier: OdataIdentifier })*
        }

        $(
            impl $name {
                pub fn as_str(&self) -> &str {
                    self.identifier.as_str()
                }
            }
        )*
    };
}

identifier_rules! {
    NamespacePart = "namespacePart";
    EntitySetName = "entitySetName";
    SingletonEntity = "singletonEntity";
    EntityTypeName = "entityTypeName";
    ComplexTypeName = "complexTypeName";
    TypeDefinitionName = "typeDefinitionName";
    EnumerationTypeName = "enumerationTypeName";
    EnumerationMember = "enumerationMember";
    TermName = "termName";
    PrimitiveKeyProperty = "primitiveKeyProperty";
    PrimitiveNonKeyProperty = "primitiveNonKeyProperty";
    PrimitiveColProperty = "primitiveColProperty";
    ComplexProperty = "complexProperty";
    ComplexColProperty = "complexColProperty";
    StreamProperty = "streamProperty";
    EntityNavigationProperty = "entityNavigationProperty";
    EntityColNavigationProperty = "entityColNavigationProperty";
    Action = "action";
    ActionImport = "actionImport";
    EntityFunction = "entityFunction";
    EntityColFunction = "entityColFunction";
    ComplexFunction = "complexFunction";
    ComplexColFunction = "complexColFunction";
    PrimitiveFunction = "primitiveFunction";
    PrimitiveColFunction = "primitiveColFunction";
    EntityFunctionImport = "entityFunctionImport";
    EntityColFunctionImport = "entityColFunctionImport";
    ComplexFunctionImport = "complexFunctionImport";
    ComplexColFunctionImport = "complexColFunctionImport";
    PrimitiveFunctionImport = "primitiveFunctionImport";
    PrimitiveColFunctionImport = "primitiveColFunctionImport";
    ParameterName = "parameterName";
    KeyPropertyAlias = "keyPropertyAlias";
    ComputedProperty = "computedProperty";
    AnnotationQualifier = "annotationQualifier";
    LambdaVariableExpr = "lambdaVariableExpr";
}

/// `namespace = namespacePart *( "." namespacePart )`
///
/// Every use of a namespace is followed by `"." name`, so a part only joins
/// the namespace when another dot follows it. `A.B.C` as a qualified name
/// splits into namespace `A.B` and name `C`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace {
    pub first: NamespacePart,
    pub rest: Vec<(Dot, NamespacePart)>,
    pub span: Span,
}

impl Namespace {
    /// Dotted form, e.g. `Org.OData.Core`
    pub fn dotted(&self) -> String {
        let mut out = self.first.as_str().to_string();
        for (_, part) in &self.rest {
            out.push('.');
            out.push_str(part.as_str());
        }
        out
    }
}

impl Parse for Namespace {
    fn parse<'a>(input: Cursor<'a>, ctx: &mut ParseContext) -> ParseResult<'a, Self> {
        ctx.rule("namespace", input, |ctx| {
            let (first, mut rest) = NamespacePart::parse(input, ctx)?;
            let mut parts = Vec::new();
            loop {
                let Ok(((dot, part), after)) = <(Dot, NamespacePart)>::parse(rest, ctx) else {
                    break;
                };
                if !after.starts_with(".") {
                    break;
                }
                parts.push((dot, part));
                rest = after;
            }
            Ok((
                Namespace {
                    first,
                    rest: parts,
                    span: input.span_to(rest),
                },
                rest,
            ))
        })
    }
}

impl Print for Namespace {
    fn print(&self, p: &mut Printer) {
        self.first.print(p);
        self.rest.print(p);
    }
}

impl Node for Namespace {
    fn rule_name(&self) -> &'static str {
        Self::NAME
    }

    fn kind(&self) -> RuleKind {
        Self::KIND
    }

    fn span(&self) -> Span {
        self.span
    }

    fn children<'n>(&'n self, out: &mut Vec<&'n dyn Node>) {
        self.first.collect(out);
        self.rest.collect(out);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn print_to(&self, p: &mut Printer) {
        self.print(p)
    }
}

impl Rule for Namespace {
    const NAME: &'static str = "namespace";
    const KIND: RuleKind = RuleKind::Sequence {
        slots: &[
            SlotInfo {
                name: "first",
                ty: "NamespacePart",
            },
            SlotInfo {
                name: "rest",
                ty: "Vec<(Dot, NamespacePart)>",
            },
        ],
    };
}

impl Slot for Namespace {
    fn collect<'n>(&'n self, out: &mut Vec<&'n dyn Node>) {
        out.push(self);
    }

    fn extent(&self) -> Option<Span> {
        Some(self.span)
    }
}

literals! {
    EdmPrefix = "'Edm.'", Sensitive ["Edm."];
    EdmBinary = "'Binary'", Sensitive ["Binary"];
    EdmBoolean = "'Boolean'", Sensitive ["Boolean"];
    EdmByte = "'Byte'", Sensitive ["Byte"];
    EdmDate = "'Date'", Sensitive ["Date"];
    EdmDateTimeOffset = "'DateTimeOffset'", Sensitive ["DateTimeOffset"];
    EdmDecimal = "'Decimal'", Sensitive ["Decimal"];
    EdmDouble = "'Double'", Sensitive ["Double"];
    EdmDuration = "'Duration'", Sensitive ["Duration"];
    EdmGuid = "'Guid'", Sensitive ["Guid"];
    EdmInt16 = "'Int16'", Sensitive ["Int16"];
    EdmInt32 = "'Int32'", Sensitive ["Int32"];
    EdmInt64 = "'Int64'", Sensitive ["Int64"];
    EdmSByte = "'SByte'", Sensitive ["SByte"];
    EdmSingle = "'Single'", Sensitive ["Single"];
    EdmStream = "'Stream'", Sensitive ["Stream"];
    EdmString = "'String'", Sensitive ["String"];
    EdmTimeOfDay = "'TimeOfDay'", Sensitive ["TimeOfDay"];
    GeographyKind = "'Geography'", Sensitive ["Geography"];
    GeometryKind = "'Geometry'", Sensitive ["Geometry"];
    CollectionKind = "'Collection'", Sensitive ["Collection"];
    LineStringKind = "'LineString'", Sensitive ["LineString"];
    MultiLineStringKind = "'MultiLineString'", Sensitive ["MultiLineString"];
    MultiPointKind = "'MultiPoint'", Sensitive ["MultiPoint"];
    MultiPolygonKind = "'MultiPolygon'", Sensitive ["MultiPolygon"];
    PointKind = "'Point'", Sensitive ["Point"];
    PolygonKind = "'Polygon'", Sensitive ["Polygon"];
}

alternations! {
    /// Tried most-specific first where one name prefixes another
    PrimitiveTypeKind = "primitiveTypeName-kind" {
        Binary(EdmBinary),
        Boolean(EdmBoolean),
        Byte(EdmByte),
        DateTimeOffset(EdmDateTimeOffset),
        Date(EdmDate),
        Decimal(EdmDecimal),
        Double(EdmDouble),
        Duration(EdmDuration),
        Guid(EdmGuid),
        Int16(EdmInt16),
        Int32(EdmInt32),
        Int64(EdmInt64),
        SByte(EdmSByte),
        Single(EdmSingle),
        Stream(EdmStream),
        String(EdmString),
        TimeOfDay(EdmTimeOfDay),
        Spatial(SpatialTypeName),
    }

    AbstractSpatialTypeName = "abstractSpatialTypeName" {
        Geography(GeographyKind),
        Geometry(GeometryKind),
    }

    ConcreteSpatialTypeName = "concreteSpatialTypeName" {
        Collection(CollectionKind),
        LineString(LineStringKind),
        MultiLineString(MultiLineStringKind),
        MultiPoint(MultiPointKind),
        MultiPolygon(MultiPolygonKind),
        Point(PointKind),
        Polygon(PolygonKind),
    }

    /// `primitiveTypeName` comes first: `Edm.String` also reads as a qualified name
    SingleQualifiedTypeName = "singleQualifiedTypeName" {
        Primitive(PrimitiveTypeName),
        Entity(QualifiedEntityTypeName),
        Complex(QualifiedComplexTypeName),
        TypeDefinition(QualifiedTypeDefinitionName),
        Enum(QualifiedEnumTypeName),
    }

    QualifiedTypeName = "qualifiedTypeName" {
        Single(SingleQualifiedTypeName),
        Collection(CollectionOf),
    }

    PrimitiveProperty = "primitiveProperty" {
        Key(PrimitiveKeyProperty),
        NonKey(PrimitiveNonKeyProperty),
    }

    NavigationProperty = "navigationProperty" {
        Entity(EntityNavigationProperty),
        Collection(EntityColNavigationProperty),
    }

    Function = "function" {
        Entity(EntityFunction),
        EntityCol(EntityColFunction),
        Complex(ComplexFunction),
        ComplexCol(ComplexColFunction),
        Primitive(PrimitiveFunction),
        PrimitiveCol(PrimitiveColFunction),
    }
}

sequences! {
    PrimitiveTypeName = "primitiveTypeName" {
        prefix: EdmPrefix,
        kind: PrimitiveTypeKind,
    }

    SpatialTypeName = "primitiveTypeName-spatial" {
        family: AbstractSpatialTypeName,
        concrete: Option<ConcreteSpatialTypeName>,
    }

    CollectionOf = "qualifiedTypeName-collection" {
        keyword: CollectionKind,
        open: Open,
        item: SingleQualifiedTypeName,
        close: Close,
    }

    QualifiedEntityTypeName = "qualifiedEntityTypeName" {
        namespace: Namespace,
        dot: Dot,
        name: EntityTypeName,
    }

    QualifiedComplexTypeName = "qualifiedComplexTypeName" {
        namespace: Namespace,
        dot: Dot,
        name: ComplexTypeName,
    }

    QualifiedTypeDefinitionName = "qualifiedTypeDefinitionName" {
        namespace: Namespace,
        dot: Dot,
        name: TypeDefinitionName,
    }

    QualifiedEnumTypeName = "qualifiedEnumTypeName" {
        namespace: Namespace,
        dot: Dot,
        name: EnumerationTypeName,
    }

    /// `"/" qualifiedEntityTypeName` type-cast segment
    EntityCast = "qualifiedEntityTypeName-cast" {
        slash: Slash,
        type_name: QualifiedEntityTypeName,
    }

    /// `"/" qualifiedComplexTypeName` type-cast segment
    ComplexCast = "qualifiedComplexTypeName-cast" {
        slash: Slash,
        type_name: QualifiedComplexTypeName,
    }
}
