//! Context URL fragments (`#...` after `$metadata`)
//!
//! Most fragment forms start with a bare identifier, so plain ordered choice
//! would read everything as a singleton. Forms are tried from the most
//! constrained to the least: fixed literals, entity set suffixes, property
//! paths under a key, type names, singleton navigation, then a plain entity
//! set. A bare singleton therefore reads as an entity set.

use super::names::{
    ComplexCast, ComplexColProperty, ComplexProperty, EntityCast, EntitySetName,
    NavigationProperty, PrimitiveColProperty, PrimitiveProperty, QualifiedEntityTypeName,
    QualifiedTypeName, SingletonEntity,
};
use super::punctuation::{Close, Comma, Hash, Open, Plus, Slash, Star};
use super::query::{AllOperationsInSchema, QualifiedActionName, QualifiedFunctionName, SelectPath};
use super::resource_path::KeyPredicate;
use crate::combinator::ManyThen;

literals! {
    CollectionRefKw = "'Collection($ref)'", Sensitive ["Collection($ref)"];
    RefFragmentKw = "'$ref'", Sensitive word ["$ref"];
    CollectionEntityTypeKw = "'Collection(Edm.EntityType)'", Sensitive ["Collection(Edm.EntityType)"];
    CollectionComplexTypeKw = "'Collection(Edm.ComplexType)'", Sensitive ["Collection(Edm.ComplexType)"];
    DeletedEntityKw = "'/$deletedEntity'", Sensitive word ["/$deletedEntity"];
    LinkKw = "'/$link'", Sensitive word ["/$link"];
    DeletedLinkKw = "'/$deletedLink'", Sensitive word ["/$deletedLink"];
    EntitySuffixKw = "'/$entity'", Sensitive word ["/$entity"];
    DeltaKw = "'/$delta'", Sensitive word ["/$delta"];
}

alternations! {
    ContextFragment = "contextFragment" {
        CollectionRef(CollectionRefKw),
        Ref(RefFragmentKw),
        CollectionEntityType(CollectionEntityTypeKw),
        CollectionComplexType(CollectionComplexTypeKw),
        Deleted(DeletedContext),
        Property(PropertyContext),
        TypeName(TypeNameContext),
        SingletonNavigation(SingletonContext),
        EntitySet(EntitySetContext),
    }

    DeletedSuffix = "contextFragment-deletedSuffix" {
        DeletedEntity(DeletedEntityKw),
        Link(LinkKw),
        DeletedLink(DeletedLinkKw),
    }

    EntitySetSuffix = "contextFragment-entitySetSuffix" {
        Entity(EntitySuffixKw),
        Delta(DeltaKw),
    }

    /// A complex property followed by more path wins over a bare one
    ContextPropertyPath = "contextPropertyPath" {
        ComplexPath((ComplexProperty, Option<ComplexCast>, Slash, Box<ContextPropertyPath>)),
        Primitive(PrimitiveProperty),
        PrimitiveCol(PrimitiveColProperty),
        ComplexCol(ComplexColProperty),
        Complex(ComplexProperty),
    }

    SelectListItem = "selectListItem" {
        Star(Star),
        AllOperations(AllOperationsInSchema),
        Path(SelectListPath),
    }

    SelectListTarget = "selectListItem-target" {
        Function(QualifiedFunctionName),
        Action(QualifiedActionName),
        Property(SelectListProperty),
    }

    /// Suffixed forms first; among the bare identifiers the first wins.
    SelectListProperty = "selectListProperty" {
        Path((SelectPath, Slash, Box<SelectListProperty>)),
        ExpandedNavigation((NavigationProperty, SelectListNavigationSuffix)),
        Primitive(PrimitiveProperty),
        PrimitiveCol(PrimitiveColProperty),
        Navigation(NavigationProperty),
        Cast(SelectPath),
    }

    SelectListNavigationSuffix = "selectListProperty-navigationSuffix" {
        Plus((Plus, Option<Box<SelectList>>)),
        Select(Box<SelectList>),
    }
}

sequences! {
    Context = "context" {
        hash: Hash,
        fragment: ContextFragment,
    }

    /// `entitySetName *( containmentNavigation ) [ "/" qualifiedEntityTypeName ]`
    ContextEntitySet = "entitySet" {
        name: EntitySetName,
        containment: Vec<ContainmentNavigation>,
        cast: Option<EntityCast>,
    }

    ContainmentNavigation = "containmentNavigation" {
        key: KeyPredicate,
        cast: Option<EntityCast>,
        navigation: ContextNavigation,
    }

    /// `*( "/" complexProperty [ "/" qualifiedComplexTypeName ] ) "/" navigationProperty`
    ContextNavigation = "navigation" {
        path: ManyThen<NavigationStep, (Slash, NavigationProperty)>,
    }

    NavigationStep = "navigation-step" {
        slash: Slash,
        property: ComplexProperty,
        cast: Option<ComplexCast>,
    }

    DeletedContext = "contextFragment-deleted" {
        entity_set: ContextEntitySet,
        suffix: DeletedSuffix,
    }

    /// The key and property path are the tail of the entity set: containment
    /// steps are handed back until they match.
    PropertyContext = "contextFragment-property" {
        name: EntitySetName,
        path: ManyThen<ContainmentNavigation, PropertyContextTail>,
    }

    PropertyContextTail = "contextFragment-propertyTail" {
        cast: Option<EntityCast>,
        key: KeyPredicate,
        slash: Slash,
        property: ContextPropertyPath,
        select: Option<SelectList>,
    }

    TypeNameContext = "contextFragment-typeName" {
        type_name: QualifiedTypeName,
        select: Option<SelectList>,
    }

    SingletonContext = "contextFragment-singleton" {
        singleton: SingletonEntity,
        navigation: ContextNavigation,
        containment: Vec<ContainmentNavigation>,
        cast: Option<EntityCast>,
        select: Option<SelectList>,
    }

    EntitySetContext = "contextFragment-entitySet" {
        entity_set: ContextEntitySet,
        select: Option<SelectList>,
        suffix: Option<EntitySetSuffix>,
    }

    SelectList = "selectList" {
        open: Open,
        first: SelectListItem,
        rest: Vec<(Comma, SelectListItem)>,
        close: Close,
    }

    SelectListPath = "selectListItem-path" {
        cast: Option<(QualifiedEntityTypeName, Slash)>,
        target: SelectListTarget,
    }
}

impl SelectList {
    pub fn items(&self) -> impl Iterator<Item = &SelectListItem> {
        std::iter::once(&self.first).chain(self.rest.iter().map(|(_, item)| item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native_parser::parse_complete;
    use crate::printer::print;
    use rstest::rstest;

    fn fragment(input: &str) -> ContextFragment {
        parse_complete::<ContextFragment>(input).unwrap().node
    }

    #[rstest]
    #[case::collection_ref("Collection($ref)", "CollectionRef")]
    #[case::reference("$ref", "Ref")]
    #[case::entity_types("Collection(Edm.EntityType)", "CollectionEntityType")]
    #[case::deleted("Orders/$deletedEntity", "Deleted")]
    #[case::link("Orders/$link", "Deleted")]
    #[case::property("Orders(1)/Address/City", "Property")]
    #[case::type_name("Edm.String", "TypeName")]
    #[case::collection_type("Collection(NS.Address)", "TypeName")]
    #[case::singleton_navigation("Me/Orders(Amount)", "SingletonNavigation")]
    #[case::entity_set("Orders", "EntitySet")]
    #[case::entity("Orders/$entity", "EntitySet")]
    #[case::delta("Orders(ID,Name)/$delta", "EntitySet")]
    fn test_fragment_forms(#[case] input: &str, #[case] variant: &str) {
        let parsed = fragment(input);
        assert_eq!(parsed.variant_name(), variant);
        assert_eq!(print(&parsed), input);
    }

    #[test]
    fn test_containment_hands_back_to_property() {
        let ContextFragment::Property(property) = fragment("Orders(1)/Items(2)/Note") else {
            panic!("expected property fragment");
        };
        assert_eq!(property.path.items.len(), 1);
        assert_eq!(print(&property.path.tail.property), "Note");
    }

    #[test]
    fn test_select_list_items() {
        let ContextFragment::EntitySet(set) = fragment("Customers(Name,Orders+(Amount),NS.Rate,Address/City)") else {
            panic!("expected entity set");
        };
        let select = set.select.as_ref().unwrap();
        let kinds: Vec<&str> = select
            .items()
            .map(|item| match item {
                SelectListItem::Path(path) => match &path.target {
                    SelectListTarget::Property(property) => property.variant_name(),
                    other => other.variant_name(),
                },
                other => other.variant_name(),
            })
            .collect();
        assert_eq!(kinds, vec!["Primitive", "ExpandedNavigation", "Function", "Path"]);
    }

    #[test]
    fn test_context_needs_hash() {
        assert!(parse_complete::<Context>("#Orders").is_ok());
        assert!(parse_complete::<Context>("Orders").is_err());
    }
}
