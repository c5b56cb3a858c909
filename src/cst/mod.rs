//! Concrete syntax tree types, one per grammar rule
//!
//! Modules follow the sections of the OData ABNF. Every type is re-exported
//! here, so rule types are addressed as `cst::CommonExpr`, `cst::Filter` and
//! so on regardless of the section that declares them.

#[macro_use]
mod macros;

pub mod context_url;
pub mod expressions;
pub mod geo;
pub mod headers;
pub mod json;
pub mod literals;
pub mod names;
pub mod punctuation;
pub mod query;
pub mod resource_path;
pub mod rfc3986;

pub use context_url::*;
pub use expressions::*;
pub use geo::*;
pub use headers::*;
pub use json::*;
pub use literals::*;
pub use names::*;
pub use punctuation::*;
pub use query::*;
pub use resource_path::*;
pub use rfc3986::*;
