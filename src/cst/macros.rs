//! Declarative rule DSL
//!
//! Four macros turn grammar productions into CST types:
//!
//! - `literals!`: fixed-spelling terminals, e.g. `Open = "OPEN", Sensitive ["(", "%28"];`
//! - `tokens!`: scanned terminals, e.g. `OdataIdentifier = "odataIdentifier", lexer::odata_identifier;`
//! - `sequences!`: structs whose fields are parsed in order
//! - `alternations!`: enums whose variants are tried in declaration order
//!
//! Each generated type implements `Parse`, `Print`, `Node`, `Slot` and `Rule`.

macro_rules! word_boundary {
    () => {
        false
    };
    (word) => {
        true
    };
}

macro_rules! rule_impls {
    ($name:ident, $rule:expr, $kind:expr) => {
        impl $crate::node::Rule for $name {
            const NAME: &'static str = $rule;
            const KIND: $crate::ast::RuleKind = $kind;
        }

        impl $crate::node::Slot for $name {
            fn collect<'n>(&'n self, out: &mut Vec<&'n dyn $crate::node::Node>) {
                out.push(self);
            }

            fn extent(&self) -> Option<$crate::input_stream::Span> {
                Some($crate::node::Node::span(self))
            }
        }
    };
}

macro_rules! literals {
    ($(
        $(#[$meta:meta])*
        $name:ident = $rule:literal, $case:ident $($word:ident)? [$($spelling:literal),+ $(,)?];
    )*) => {$(
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            pub text: ::smol_str::SmolStr,
            pub span: $crate::input_stream::Span,
        }

        impl $name {
            pub const SPELLINGS: &'static [&'static str] = &[$($spelling),+];

            /// Detached node in the canonical spelling
            pub fn new() -> Self {
                Self {
                    text: ::smol_str::SmolStr::new(Self::SPELLINGS[0]),
                    span: $crate::input_stream::Span::DETACHED,
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl $crate::combinator::Parse for $name {
            fn parse<'a>(
                input: $crate::input_stream::Cursor<'a>,
                ctx: &mut $crate::parse_context::ParseContext,
            ) -> $crate::parse_context::ParseResult<'a, Self> {
                let (text, span, rest) = $crate::terminal::literal(
                    input,
                    ctx,
                    Self::SPELLINGS,
                    $crate::terminal::Case::$case,
                    word_boundary!($($word)?),
                )?;
                Ok((Self { text, span }, rest))
            }
        }

        impl $crate::printer::Print for $name {
            fn print(&self, p: &mut $crate::printer::Printer) {
                p.token(&self.text, Some(Self::SPELLINGS[0]));
            }
        }

        impl $crate::node::Node for $name {
            fn rule_name(&self) -> &'static str {
                $rule
            }

            fn kind(&self) -> $crate::ast::RuleKind {
                <Self as $crate::node::Rule>::KIND
            }

            fn span(&self) -> $crate::input_stream::Span {
                self.span
            }

            fn children<'n>(&'n self, _out: &mut Vec<&'n dyn $crate::node::Node>) {}

            fn text(&self) -> Option<&str> {
                Some(&self.text)
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn print_to(&self, p: &mut $crate::printer::Printer) {
                $crate::printer::Print::print(self, p)
            }
        }

        rule_impls!(
            $name,
            $rule,
            $crate::ast::RuleKind::Literal {
                spellings: &[$($spelling),+],
                case: $crate::terminal::Case::$case,
            }
        );
    )*};
}

macro_rules! tokens {
    ($(
        $(#[$meta:meta])*
        $name:ident = $rule:literal, $scan:path;
    )*) => {$(
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            pub text: ::smol_str::SmolStr,
            pub span: $crate::input_stream::Span,
        }

        impl $name {
            /// Detached node holding `text` when the whole of it is a valid token
            pub fn try_new(text: &str) -> Option<Self> {
                let mut lx = $crate::lexer::Lexer::new(text);
                ($scan(&mut lx) && lx.is_eof()).then(|| Self {
                    text: ::smol_str::SmolStr::new(text),
                    span: $crate::input_stream::Span::DETACHED,
                })
            }

            pub fn as_str(&self) -> &str {
                &self.text
            }
        }

        impl $crate::combinator::Parse for $name {
            fn parse<'a>(
                input: $crate::input_stream::Cursor<'a>,
                ctx: &mut $crate::parse_context::ParseContext,
            ) -> $crate::parse_context::ParseResult<'a, Self> {
                let (text, span, rest) = $crate::terminal::scanned(input, ctx, $rule, $scan)?;
                Ok((Self { text, span }, rest))
            }
        }

        impl $crate::printer::Print for $name {
            fn print(&self, p: &mut $crate::printer::Printer) {
                p.token(&self.text, None);
            }
        }

        impl $crate::node::Node for $name {
            fn rule_name(&self) -> &'static str {
                $rule
            }

            fn kind(&self) -> $crate::ast::RuleKind {
                $crate::ast::RuleKind::Token
            }

            fn span(&self) -> $crate::input_stream::Span {
                self.span
            }

            fn children<'n>(&'n self, _out: &mut Vec<&'n dyn $crate::node::Node>) {}

            fn text(&self) -> Option<&str> {
                Some(&self.text)
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn print_to(&self, p: &mut $crate::printer::Printer) {
                $crate::printer::Print::print(self, p)
            }
        }

        rule_impls!($name, $rule, $crate::ast::RuleKind::Token);
    )*};
}

macro_rules! sequences {
    ($(
        $(#[$meta:meta])*
        $name:ident = $rule:literal {
            $( $(#[$fmeta:meta])* $field:ident : $ty:ty ),+ $(,)?
        }
    )*) => {$(
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            $( $(#[$fmeta])* pub $field: $ty, )+
            pub span: $crate::input_stream::Span,
        }

        impl $crate::combinator::Parse for $name {
            fn parse<'a>(
                input: $crate::input_stream::Cursor<'a>,
                ctx: &mut $crate::parse_context::ParseContext,
            ) -> $crate::parse_context::ParseResult<'a, Self> {
                ctx.rule($rule, input, |ctx| {
                    let rest = input;
                    $( let ($field, rest) = <$ty as $crate::combinator::Parse>::parse(rest, ctx)?; )+
                    Ok((Self { $($field,)+ span: input.span_to(rest) }, rest))
                })
            }
        }

        impl $crate::printer::Print for $name {
            fn print(&self, p: &mut $crate::printer::Printer) {
                $( $crate::printer::Print::print(&self.$field, p); )+
            }
        }

        impl $crate::node::Node for $name {
            fn rule_name(&self) -> &'static str {
                $rule
            }

            fn kind(&self) -> $crate::ast::RuleKind {
                <Self as $crate::node::Rule>::KIND
            }

            fn span(&self) -> $crate::input_stream::Span {
                self.span
            }

            fn children<'n>(&'n self, out: &mut Vec<&'n dyn $crate::node::Node>) {
                $( $crate::node::Slot::collect(&self.$field, out); )+
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn print_to(&self, p: &mut $crate::printer::Printer) {
                $crate::printer::Print::print(self, p)
            }
        }

        rule_impls!(
            $name,
            $rule,
            $crate::ast::RuleKind::Sequence {
                slots: &[$( $crate::ast::SlotInfo { name: stringify!($field), ty: stringify!($ty) } ),+],
            }
        );
    )*};
}

macro_rules! alternations {
    ($(
        $(#[$meta:meta])*
        $name:ident = $rule:literal {
            $( $(#[$vmeta:meta])* $variant:ident ( $ty:ty ) ),+ $(,)?
        }
    )*) => {$(
        alternation_shape! {
            $(#[$meta])*
            $name = $rule {
                $( $(#[$vmeta])* $variant($ty), )+
            }
        }

        impl $crate::combinator::Parse for $name {
            fn parse<'a>(
                input: $crate::input_stream::Cursor<'a>,
                ctx: &mut $crate::parse_context::ParseContext,
            ) -> $crate::parse_context::ParseResult<'a, Self> {
                type Arm<'a, S> = fn(
                    $crate::input_stream::Cursor<'a>,
                    &mut $crate::parse_context::ParseContext,
                ) -> $crate::parse_context::ParseResult<'a, S>;

                let arms: &[Arm<'a, Self>] = &[
                    $( |input, ctx| $crate::combinator::arm::<$ty, Self>(input, ctx, Self::$variant), )+
                ];
                ctx.rule($rule, input, |ctx| {
                    for attempt in arms {
                        if let Ok(found) = attempt(input, ctx) {
                            return Ok(found);
                        }
                    }
                    Err($crate::parse_context::NoMatch)
                })
            }
        }
    )*};
}

/// An alternation without its `Parse` impl, for the rare rule that needs a
/// hand-written choice
macro_rules! alternation_shape {
    (
        $(#[$meta:meta])*
        $name:ident = $rule:literal {
            $( $(#[$vmeta:meta])* $variant:ident ( $ty:ty ) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant($ty), )+
        }

        impl $name {
            /// Name of the variant that matched
            pub fn variant_name(&self) -> &'static str {
                match self {
                    $( Self::$variant(_) => stringify!($variant), )+
                }
            }
        }

        impl $crate::printer::Print for $name {
            fn print(&self, p: &mut $crate::printer::Printer) {
                match self {
                    $( Self::$variant(inner) => $crate::printer::Print::print(inner, p), )+
                }
            }
        }

        impl $crate::node::Node for $name {
            fn rule_name(&self) -> &'static str {
                $rule
            }

            fn kind(&self) -> $crate::ast::RuleKind {
                <Self as $crate::node::Rule>::KIND
            }

            fn span(&self) -> $crate::input_stream::Span {
                let extent = match self {
                    $( Self::$variant(inner) => $crate::node::Slot::extent(inner), )+
                };
                extent.unwrap_or($crate::input_stream::Span::DETACHED)
            }

            fn children<'n>(&'n self, out: &mut Vec<&'n dyn $crate::node::Node>) {
                match self {
                    $( Self::$variant(inner) => $crate::node::Slot::collect(inner, out), )+
                }
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn print_to(&self, p: &mut $crate::printer::Printer) {
                $crate::printer::Print::print(self, p)
            }
        }

        rule_impls!(
            $name,
            $rule,
            $crate::ast::RuleKind::Alternation {
                variants: &[$( stringify!($variant) ),+],
            }
        );
    };
}
