//! WebAssembly bindings
//!
//! JavaScript-friendly wrappers over the name-based parser API. Only
//! compiled when targeting wasm32.

#![cfg(target_arch = "wasm32")]

use crate::grammar;
use crate::native_parser::{Parser, ParserConfig};
use crate::printer::{print_with, PrintMode};
use crate::xml_node::XmlNode;
use wasm_bindgen::prelude::*;

// Set panic hook for better error messages in browser
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

// Use smaller allocator for WASM
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Result of a parse for JavaScript interop
#[wasm_bindgen]
#[derive(Debug)]
pub struct ParseOutcome {
    success: bool,
    output: String,
    error: Option<String>,
    consumed: usize,
}

#[wasm_bindgen]
impl ParseOutcome {
    #[wasm_bindgen(getter)]
    pub fn success(&self) -> bool {
        self.success
    }

    /// XML outline on success
    #[wasm_bindgen(getter)]
    pub fn output(&self) -> String {
        self.output.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn error(&self) -> Option<String> {
        self.error.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

impl ParseOutcome {
    fn failed(error: String) -> Self {
        ParseOutcome {
            success: false,
            output: String::new(),
            error: Some(error),
            consumed: 0,
        }
    }
}

/// OData parser for JavaScript callers
#[wasm_bindgen]
pub struct OdataParser {
    parser: Parser,
}

#[wasm_bindgen]
impl OdataParser {
    #[wasm_bindgen(constructor)]
    pub fn new(max_depth: Option<usize>) -> OdataParser {
        #[cfg(feature = "console_error_panic_hook")]
        set_panic_hook();

        let mut config = ParserConfig::default();
        if let Some(depth) = max_depth {
            config = config.max_depth(depth);
        }
        OdataParser {
            parser: Parser::new(config),
        }
    }

    /// Parse the whole of `input` as `rule` and return its XML outline
    pub fn parse(&self, rule: &str, input: &str) -> ParseOutcome {
        match self.parser.parse_named_complete(rule, input) {
            Ok(parsed) => ParseOutcome {
                success: true,
                output: XmlNode::from_node(&*parsed.node, false).to_xml(),
                error: None,
                consumed: parsed.consumed,
            },
            Err(e) => ParseOutcome::failed(e.format_with_context(input)),
        }
    }

    /// Parse the whole of `input` as `rule` and print it back canonically
    pub fn print_canonical(&self, rule: &str, input: &str) -> ParseOutcome {
        match self.parser.parse_named_complete(rule, input) {
            Ok(parsed) => ParseOutcome {
                success: true,
                output: print_with(&*parsed.node, PrintMode::Canonical),
                error: None,
                consumed: parsed.consumed,
            },
            Err(e) => ParseOutcome::failed(e.format_with_context(input)),
        }
    }

    /// Names of all grammar rules
    pub fn rules(&self) -> Vec<String> {
        grammar::rules().iter().map(|rule| rule.name.to_string()).collect()
    }
}

/// Parse and return the outline as a JavaScript object
#[wasm_bindgen]
pub fn parse_tree(rule: &str, input: &str) -> Result<JsValue, JsValue> {
    let parsed = Parser::default()
        .parse_named_complete(rule, input)
        .map_err(|e| JsValue::from_str(&e.format_with_context(input)))?;
    let outline = XmlNode::from_node(&*parsed.node, true);
    serde_wasm_bindgen::to_value(&outline).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_parse_outcome() {
        let parser = OdataParser::new(None);
        let outcome = parser.parse("booleanValue", "TRUE");
        assert!(outcome.success());
        assert_eq!(outcome.consumed(), 4);

        let canonical = parser.print_canonical("booleanValue", "TRUE");
        assert_eq!(canonical.output(), "true");

        let failed = parser.parse("noSuchRule", "x");
        assert!(!failed.success());
        assert!(failed.error().is_some());
    }
}
