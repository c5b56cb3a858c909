//! Generic traversal over CST nodes
//!
//! Code that knows which rule it holds matches on the generated enums
//! directly; the functions here are for code that does not, such as
//! collecting every identifier under a filter or counting nodes by rule.
//! All of them run over `&dyn Node` using [`Node::children`].

use crate::node::Node;

/// Visit `node` and everything below it, parents before children
pub fn walk<'n>(node: &'n dyn Node, f: &mut impl FnMut(&'n dyn Node)) {
    f(node);
    for child in node.child_nodes() {
        walk(child, f);
    }
}

/// Aggregate over the tree bottom-up: children are folded before their parent
pub fn fold<'n, A>(node: &'n dyn Node, init: A, f: &mut impl FnMut(A, &'n dyn Node) -> A) -> A {
    let acc = node
        .child_nodes()
        .into_iter()
        .fold(init, |acc, child| fold(child, acc, f));
    f(acc, node)
}

/// Every node of type `T` at or below `node`, in source order
pub fn descendants<'n, T: Node>(node: &'n dyn Node) -> Vec<&'n T> {
    let mut found = Vec::new();
    walk(node, &mut |n: &'n dyn Node| {
        if let Some(hit) = n.downcast_ref::<T>() {
            found.push(hit);
        }
    });
    found
}

/// First node of type `T` at or below `node`
pub fn first<'n, T: Node>(node: &'n dyn Node) -> Option<&'n T> {
    if let Some(hit) = node.downcast_ref::<T>() {
        return Some(hit);
    }
    node.child_nodes().into_iter().find_map(first::<T>)
}

/// Terminal nodes in source order; their texts concatenate to the printed tree
pub fn terminals(node: &dyn Node) -> Vec<&dyn Node> {
    let mut out = Vec::new();
    walk(node, &mut |n| {
        if n.is_terminal() {
            out.push(n);
        }
    });
    out
}

/// Callbacks for [`visit`]
pub trait Visitor<'n> {
    /// Called before the children; returning `false` skips them
    fn enter(&mut self, node: &'n dyn Node) -> bool {
        let _ = node;
        true
    }

    /// Called after the children, or right after `enter` when they were skipped
    fn leave(&mut self, node: &'n dyn Node) {
        let _ = node;
    }
}

pub fn visit<'n, V: Visitor<'n> + ?Sized>(node: &'n dyn Node, visitor: &mut V) {
    if visitor.enter(node) {
        for child in node.child_nodes() {
            visit(child, visitor);
        }
    }
    visitor.leave(node);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::{CommonExpr, MethodCallExpr, OdataIdentifier, PrimitiveLiteral};
    use crate::native_parser::parse_complete;

    fn expr(input: &str) -> CommonExpr {
        parse_complete::<CommonExpr>(input).unwrap().node
    }

    #[test]
    fn test_walk_pre_order() {
        let e = expr("A eq 1");
        let mut names = Vec::new();
        walk(&e, &mut |n| names.push(n.rule_name()));
        assert_eq!(names[0], "commonExpr");
        assert!(names.contains(&"odataIdentifier"));
    }

    #[test]
    fn test_fold_text_length() {
        let e = expr("Price add 2 gt 10");
        let total = fold(&e, 0, &mut |acc, n| acc + n.text().map_or(0, str::len));
        assert_eq!(total, "Price add 2 gt 10".len());
    }

    #[test]
    fn test_descendants_and_first() {
        let e = expr("A eq 1 and contains(B,'x')");
        let ids: Vec<&str> = descendants::<OdataIdentifier>(&e).iter().map(|i| i.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
        assert!(first::<MethodCallExpr>(&e).is_some());
        assert_eq!(descendants::<PrimitiveLiteral>(&e).len(), 2);
    }

    #[test]
    fn test_terminals_rebuild_text() {
        let input = "(A add 1) mul 2 ne 0";
        let e = expr(input);
        let text: String = terminals(&e).iter().filter_map(|t| t.text()).collect();
        assert_eq!(text, input);
    }

    #[derive(Default)]
    struct Depth {
        current: usize,
        max: usize,
        skipped: usize,
    }

    impl<'n> Visitor<'n> for Depth {
        fn enter(&mut self, node: &'n dyn Node) -> bool {
            if node.rule_name() == "methodCallExpr" {
                self.skipped += 1;
                return false;
            }
            self.current += 1;
            self.max = self.max.max(self.current);
            true
        }

        fn leave(&mut self, node: &'n dyn Node) {
            if node.rule_name() != "methodCallExpr" {
                self.current -= 1;
            }
        }
    }

    #[test]
    fn test_visitor_skips_subtrees() {
        let e = expr("tolower(Name) eq 'a'");
        let mut depth = Depth::default();
        visit(&e, &mut depth);
        assert_eq!(depth.current, 0);
        assert_eq!(depth.skipped, 1);
        assert!(depth.max > 2);
    }
}
