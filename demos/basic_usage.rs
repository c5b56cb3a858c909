//! Basic usage example of odata-cst

use odata_cst::cst::{self, Header, OdataIdentifier, QueryOption, StringLiteral};
use odata_cst::traversal::descendants;
use odata_cst::{print, print_canonical, ParseError, Parser, ParserConfig, XmlNode};

fn main() -> Result<(), ParseError> {
    println!("=== odata-cst Basic Usage Example ===\n");

    let parser = Parser::new(ParserConfig::default());

    // Example 1: Round trip of a relative URL
    println!("Example 1: Relative URL");
    let uri = parser.parse_relative_uri("Orders(1)/Customer?$select=Name")?;
    println!("Input:  'Orders(1)/Customer?$select=Name'");
    println!("Output: {}", print(&uri.node));
    println!("Rule:   {} ({} bytes)\n", uri.node.variant_name(), uri.consumed);

    // Example 2: Pulling parts out of a filter
    println!("Example 2: Filter expression");
    let option = parser.parse_query_option("$filter=Name eq 'Bob' and Age gt 30")?;
    if let QueryOption::System(system) = &option.node {
        let names: Vec<&str> = descendants::<OdataIdentifier>(&**system)
            .iter()
            .map(|id| id.as_str())
            .collect();
        let strings: Vec<String> = descendants::<StringLiteral>(&**system).iter().map(|s| print(*s)).collect();
        println!("Identifiers: {:?}", names);
        println!("Strings:     {:?}\n", strings);
    }

    // Example 3: Canonical printing
    println!("Example 3: Canonical spellings");
    for input in ["TRUE", "filter=A%20eq%201", "%27O''Neil%27"] {
        let parsed = parser.parse_named_complete("queryOption", input).or_else(|_| {
            parser.parse_named_complete("primitiveLiteral", input)
        })?;
        println!("{:<22} -> {}", input, print_canonical(&*parsed.node));
    }
    println!();

    // Example 4: Header values
    println!("Example 4: Headers");
    for input in ["OData-Version: 4.0", "Prefer: return=minimal, odata.maxpagesize=50", "ETag: W/\"etag-value\""] {
        let header = parser.parse_header(input)?;
        match &header.node {
            Header::Prefer(prefer) => {
                let names: Vec<String> = prefer.preferences().map(|p| p.variant_name().to_string()).collect();
                println!("{} -> preferences {:?}", input, names);
            }
            Header::ETag(etag) => println!("{} -> {}", input, print(&etag.tag)),
            other => println!("{} -> {}", input, other.variant_name()),
        }
    }
    println!();

    // Example 5: XML outline
    println!("Example 5: XML outline");
    let key = parser.parse_complete::<cst::KeyPredicate>("(OrderID=1,Line=2)")?;
    println!("{}\n", XmlNode::from_node(&key.node, false).to_xml());

    // Example 6: Errors
    println!("Example 6: Errors");
    let input = "$top=%2";
    match parser.parse_complete::<QueryOption>(input) {
        Ok(_) => println!("unexpectedly parsed {}", input),
        Err(e) => println!("{}", e.format_with_context(input)),
    }

    Ok(())
}
