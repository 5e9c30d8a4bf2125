//! Declaration-file parser and AST types for tsbind.
//!
//! This crate provides:
//! - `NodeArena` / `Node` / `NodeData` - arena-allocated syntax tree
//! - `ParserState` - recursive descent parser for interface and type-alias declarations
//! - `JsDocParser` - `/** */` comment parser
//! - `syntax_kind_ext` - node kinds that extend the scanner's `SyntaxKind`

pub mod parser;

pub use parser::{
    JsDocParseResult, JsDocParser, Node, NodeArena, NodeData, NodeIndex, NodeList, ParserState,
    look_ahead_is_declaration_start, node_flags, parse_isolated_jsdoc_comment,
    parse_jsdoc_type_expression_for_tests, syntax_kind_ext,
};
