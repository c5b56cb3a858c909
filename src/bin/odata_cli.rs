//! odata-cst CLI tool - parse OData text against a named grammar rule
//!
//! Usage:
//!   odata-cst parse --rule <RULE> [--canonical] [--format FORMAT] [--prefix] <INPUT>
//!   odata-cst rules [--filter <TEXT>] [--describe]
//!   odata-cst check <FILE>

use clap::{Parser, Subcommand, ValueEnum};
use odata_cst::grammar;
use odata_cst::native_parser::Parser as OdataParser;
use odata_cst::printer::{print_with, PrintMode};
use odata_cst::{Node, XmlNode};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Printed text
    #[default]
    Text,
    /// Indented rule outline
    Tree,
    Xml,
    Json,
}

#[derive(Parser)]
#[command(name = "odata-cst", bin_name = "odata-cst", version)]
#[command(about = "Parse OData URLs, query options and header values into lossless syntax trees")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse input against a grammar rule
    #[command(after_help = r#"EXAMPLES:
  odata-cst parse --rule queryOption '$filter=Name eq '\''Bob'\'''
  odata-cst parse --rule booleanValue --canonical TRUE
  odata-cst parse --rule odataRelativeUri --format tree 'Orders(1)/Customer'
  echo -n 'W/"abc"' | odata-cst parse --rule entity-tag --format json -"#)]
    Parse {
        /// Grammar rule name, as listed by `odata-cst rules`
        #[arg(long, short = 'r', value_name = "RULE")]
        rule: String,

        /// Print canonical spellings instead of the captured text
        #[arg(long)]
        canonical: bool,

        #[arg(long, short = 'f', value_enum, default_value_t)]
        format: OutputFormat,

        /// Accept a match that stops before the end of input
        #[arg(long)]
        prefix: bool,

        /// Print timing information to stderr
        #[arg(long)]
        timing: bool,

        /// Input text; "-" reads standard input
        input: String,
    },

    /// List grammar rules
    Rules {
        /// Only rules whose name contains this text
        #[arg(long, value_name = "TEXT")]
        filter: Option<String>,

        /// Also print each rule's production
        #[arg(long, short = 'd')]
        describe: bool,
    },

    /// Run a case file with one `rule<TAB>input` per line
    #[command(after_help = r#"Lines that are empty or start with '#' are skipped.
A rule prefixed with '!' expects the input to be rejected."#)]
    Check {
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let code = match cli.command {
        Command::Parse {
            rule,
            canonical,
            format,
            prefix,
            timing,
            input,
        } => run_parse(&rule, canonical, format, prefix, timing, &read_input(&input)),
        Command::Rules { filter, describe } => run_rules(filter.as_deref(), describe),
        Command::Check { file } => run_check(&file),
    };
    process::exit(code);
}

fn read_input(arg: &str) -> String {
    if arg != "-" {
        return arg.to_string();
    }
    let mut text = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut text) {
        eprintln!("Error reading standard input: {}", e);
        process::exit(2);
    }
    text
}

fn run_parse(rule: &str, canonical: bool, format: OutputFormat, prefix: bool, timing: bool, input: &str) -> i32 {
    let parser = OdataParser::default();
    let start = std::time::Instant::now();
    let result = if prefix {
        parser.parse_named(rule, input)
    } else {
        parser.parse_named_complete(rule, input)
    };
    if timing {
        eprintln!("Parsed in {:?}", start.elapsed());
    }

    let parsed = match result {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Parse error: {}", e.format_with_context(input));
            return 1;
        }
    };
    let node: &dyn Node = &*parsed.node;
    let mode = if canonical {
        PrintMode::Canonical
    } else {
        PrintMode::Verbatim
    };

    match format {
        OutputFormat::Text => println!("{}", print_with(node, mode)),
        OutputFormat::Tree => print!("{}", outline(node)),
        OutputFormat::Xml => {
            println!("<?xml version=\"1.0\" encoding=\"utf-8\"?>{}", XmlNode::from_node(node, false).to_xml())
        }
        OutputFormat::Json => match serde_json::to_string_pretty(&XmlNode::from_node(node, true)) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error writing JSON: {}", e);
                return 2;
            }
        },
    }
    if parsed.consumed < input.len() {
        eprintln!("Stopped at offset {} of {}", parsed.consumed, input.len());
    }
    0
}

/// One line per node: rule name, span, and text for terminals
fn outline(node: &dyn Node) -> String {
    fn write(node: &dyn Node, depth: usize, out: &mut String) {
        let span = node.span();
        out.push_str(&"  ".repeat(depth));
        out.push_str(&format!("{} {}..{}", node.rule_name(), span.start, span.end));
        if let Some(text) = node.text() {
            out.push_str(&format!(" {:?}", text));
        }
        out.push('\n');
        for child in node.child_nodes() {
            write(child, depth + 1, out);
        }
    }

    let mut out = String::new();
    write(node, 0, &mut out);
    out
}

fn run_rules(filter: Option<&str>, describe: bool) -> i32 {
    for info in grammar::rules() {
        if filter.is_some_and(|text| !info.name.contains(text)) {
            continue;
        }
        if describe {
            println!("{} ({}): {}", info.name, info.kind.label(), info.kind);
        } else {
            println!("{}", info.name);
        }
    }
    0
}

fn run_check(file: &Path) -> i32 {
    let text = match fs::read_to_string(file) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error reading {}: {}", file.display(), e);
            return 2;
        }
    };

    let parser = OdataParser::default();
    let mut passed = 0;
    let mut failed = 0;
    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((rule, input)) = line.split_once('\t') else {
            eprintln!("{}:{}: expected rule<TAB>input", file.display(), index + 1);
            failed += 1;
            continue;
        };
        let (rule, expect_ok) = match rule.strip_prefix('!') {
            Some(rule) => (rule, false),
            None => (rule, true),
        };

        let outcome = parser.parse_named_complete(rule, input);
        if outcome.is_ok() == expect_ok {
            passed += 1;
            continue;
        }
        failed += 1;
        match outcome {
            Ok(_) => println!("FAIL {}:{} {} accepted {:?}", file.display(), index + 1, rule, input),
            Err(e) => println!("FAIL {}:{} {} {:?}: {}", file.display(), index + 1, rule, input, e),
        }
    }

    println!("{} passed, {} failed", passed, failed);
    if failed == 0 {
        0
    } else {
        1
    }
}
