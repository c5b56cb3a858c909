//! odata-cst - OData ABNF concrete syntax trees
//!
//! Parses OData URLs, query options, header values and literals into
//! lossless concrete syntax trees: every rule of the grammar is a Rust type,
//! every terminal keeps the text it matched, and printing a tree reproduces
//! its input byte for byte. Works natively in Rust and compiles to
//! WebAssembly for browser use.
//!
//! # Quick Start
//!
//! ```rust
//! use odata_cst::{cst, parse_complete, print, print_canonical};
//!
//! let parsed = parse_complete::<cst::QueryOption>("$filter=Name eq 'Bob'").unwrap();
//! assert_eq!(parsed.consumed, 21);
//! assert_eq!(print(&parsed.node), "$filter=Name eq 'Bob'");
//!
//! let upper = parse_complete::<cst::BooleanValue>("TRUE").unwrap().node;
//! assert_eq!(print_canonical(&upper), "true");
//! ```
//!
//! Rules can also be parsed by grammar name, which is what the CLI and the
//! WebAssembly bindings do:
//!
//! ```rust
//! use odata_cst::Parser;
//!
//! let parsed = Parser::default().parse_named("keyPredicate", "(1)").unwrap();
//! assert_eq!(parsed.node.rule_name(), "keyPredicate");
//! ```

pub mod ast;
pub mod charclass;
pub mod combinator;
pub mod cst;
pub mod grammar;
pub mod input_stream;
pub mod lexer;
pub mod native_parser;
pub mod node;
pub mod parse_context;
pub mod printer;
pub mod terminal;
pub mod traversal;
pub mod xml_node;

// WASM bindings (only when compiling for wasm32)
#[cfg(target_arch = "wasm32")]
pub mod wasm;

// Re-export main API
pub use combinator::Parse;
pub use grammar::{lookup, rules, RuleId, RuleInfo};
pub use input_stream::{Cursor, Span};
pub use native_parser::{parse, parse_complete, Parser, ParserConfig};
pub use node::{Node, Rule};
pub use parse_context::{ParseError, Parsed};
pub use printer::{print, print_canonical, Print, PrintMode, Printer};
pub use traversal::{descendants, fold, visit, walk, Visitor};
pub use xml_node::XmlNode;

// Re-export WASM API for convenience
#[cfg(target_arch = "wasm32")]
pub use wasm::*;
