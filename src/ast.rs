//! Grammar description metadata
//!
//! Each generated rule type carries a [`RuleKind`] describing its production:
//! the variant names of an alternation, the slots of a sequence, or the
//! spellings of a literal terminal. The rule table exposes these so tools can
//! list and describe the grammar without parsing anything.

use crate::terminal::Case;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Ordered choice; variants are tried in this order
    Alternation { variants: &'static [&'static str] },
    Sequence { slots: &'static [SlotInfo] },
    /// Fixed spellings, the first being canonical
    Literal {
        spellings: &'static [&'static str],
        case: Case,
    },
    /// Terminal recognized by a scanner function
    Token,
}

impl RuleKind {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RuleKind::Literal { .. } | RuleKind::Token)
    }

    pub fn label(&self) -> &'static str {
        match self {
            RuleKind::Alternation { .. } => "alternation",
            RuleKind::Sequence { .. } => "sequence",
            RuleKind::Literal { .. } => "literal",
            RuleKind::Token => "token",
        }
    }
}

/// One slot of a sequence rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotInfo {
    pub name: &'static str,
    /// Slot type as written in the rule declaration
    pub ty: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Copy)]
pub enum Repetition {
    None,       // exactly one
    ZeroOrMore, // *
    OneOrMore,  // +
    Optional,   // ?
}

impl SlotInfo {
    pub fn repetition(&self) -> Repetition {
        let ty: String = self.ty.chars().filter(|c| !c.is_whitespace()).collect();
        if ty.starts_with("Option<") {
            Repetition::Optional
        } else if ty.starts_with("Vec<") {
            Repetition::ZeroOrMore
        } else if ty.starts_with("Many1<") {
            Repetition::OneOrMore
        } else {
            Repetition::None
        }
    }
}

impl fmt::Display for SlotInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ty: String = self.ty.chars().filter(|c| !c.is_whitespace()).collect();
        write!(f, "{}: {}", self.name, ty)
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::Alternation { variants } => write!(f, "{}", variants.join(" / ")),
            RuleKind::Sequence { slots } => {
                let parts: Vec<String> = slots.iter().map(|s| s.to_string()).collect();
                write!(f, "{}", parts.join(", "))
            }
            RuleKind::Literal { spellings, case } => {
                let quoted: Vec<String> = spellings.iter().map(|s| format!("{:?}", s)).collect();
                let mode = match case {
                    Case::Sensitive => "",
                    Case::Insensitive => " (case-insensitive)",
                };
                write!(f, "{}{}", quoted.join(" / "), mode)
            }
            RuleKind::Token => write!(f, "<scanned>"),
        }
    }
}
