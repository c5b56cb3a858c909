//! Common interface of CST nodes
//!
//! Every grammar rule type implements [`Rule`] (static metadata and parsing)
//! and the object-safe [`Node`] (span, children, printing, downcasting), so a
//! tree can be handled generically as `&dyn Node` or matched exhaustively
//! through its concrete enum types.

use crate::ast::RuleKind;
use crate::combinator::{Many1, ManyThen, Parse};
use crate::input_stream::Span;
use crate::printer::{Print, Printer};
use std::any::Any;
use std::fmt;

/// Object-safe view of a parsed or constructed CST node
pub trait Node: Any + fmt::Debug {
    /// Grammar rule this node was produced by
    fn rule_name(&self) -> &'static str;

    fn kind(&self) -> RuleKind;

    /// Source bytes the node was parsed from; [`Span::DETACHED`] for constructed nodes
    fn span(&self) -> Span;

    /// Direct child nodes in source order
    fn children<'n>(&'n self, out: &mut Vec<&'n dyn Node>);

    /// Captured text of terminal nodes
    fn text(&self) -> Option<&str> {
        None
    }

    fn as_any(&self) -> &dyn Any;

    fn print_to(&self, p: &mut Printer);
}

impl<'n> dyn Node + 'n {
    pub fn downcast_ref<T: Node>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn is<T: Node>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn child_nodes(&self) -> Vec<&dyn Node> {
        let mut out = Vec::new();
        self.children(&mut out);
        out
    }

    pub fn is_terminal(&self) -> bool {
        self.kind().is_terminal()
    }
}

impl<'n> Print for dyn Node + 'n {
    fn print(&self, p: &mut Printer) {
        self.print_to(p)
    }
}

/// A grammar rule type
pub trait Rule: Node + Parse + Print + Clone + PartialEq + Sized {
    const NAME: &'static str;
    const KIND: RuleKind;
}

/// A field of a CST node: a rule type or a container of them.
///
/// Generated code uses this to enumerate children and to compute the span
/// of alternations from whatever their variant holds.
pub trait Slot {
    fn collect<'n>(&'n self, out: &mut Vec<&'n dyn Node>);

    /// Span covered by the slot; `None` when it holds nothing
    fn extent(&self) -> Option<Span>;
}

fn join(a: Option<Span>, b: Option<Span>) -> Option<Span> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.join(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

impl<T: Slot> Slot for Box<T> {
    fn collect<'n>(&'n self, out: &mut Vec<&'n dyn Node>) {
        (**self).collect(out)
    }

    fn extent(&self) -> Option<Span> {
        (**self).extent()
    }
}

impl<T: Slot> Slot for Option<T> {
    fn collect<'n>(&'n self, out: &mut Vec<&'n dyn Node>) {
        if let Some(inner) = self {
            inner.collect(out);
        }
    }

    fn extent(&self) -> Option<Span> {
        self.as_ref().and_then(Slot::extent)
    }
}

impl<T: Slot> Slot for Vec<T> {
    fn collect<'n>(&'n self, out: &mut Vec<&'n dyn Node>) {
        for item in self {
            item.collect(out);
        }
    }

    fn extent(&self) -> Option<Span> {
        self.iter().fold(None, |acc, item| join(acc, item.extent()))
    }
}

impl<T: Slot> Slot for Many1<T> {
    fn collect<'n>(&'n self, out: &mut Vec<&'n dyn Node>) {
        for item in self.iter() {
            item.collect(out);
        }
    }

    fn extent(&self) -> Option<Span> {
        self.iter().fold(None, |acc, item| join(acc, item.extent()))
    }
}

impl<I: Slot, T: Slot> Slot for ManyThen<I, T> {
    fn collect<'n>(&'n self, out: &mut Vec<&'n dyn Node>) {
        self.items.collect(out);
        self.tail.collect(out);
    }

    fn extent(&self) -> Option<Span> {
        join(self.items.extent(), self.tail.extent())
    }
}

macro_rules! tuple_slot {
    ($($name:ident)+) => {
        impl<$($name: Slot),+> Slot for ($($name,)+) {
            #[allow(non_snake_case)]
            fn collect<'n>(&'n self, out: &mut Vec<&'n dyn Node>) {
                let ($($name,)+) = self;
                $($name.collect(out);)+
            }

            #[allow(non_snake_case)]
            fn extent(&self) -> Option<Span> {
                let ($($name,)+) = self;
                let mut span = None;
                $(span = join(span, $name.extent());)+
                span
            }
        }
    };
}

tuple_slot!(A B);
tuple_slot!(A B C);
tuple_slot!(A B C D);
tuple_slot!(A B C D E);
tuple_slot!(A B C D E F);
