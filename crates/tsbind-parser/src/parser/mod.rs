//! Parser module: syntax tree storage, declaration parser and JSDoc parser.

pub mod base;
pub use base::{NodeIndex, NodeList, TextRange};

pub mod syntax_kind_ext;

pub mod node;
pub use node::{HasJsDoc, HasName, HasParameters, HasTypeAnnotation, HasTypeParameters, Node, NodeData, node_flags};

mod node_arena;
pub use node_arena::NodeArena;

mod node_access;

mod parse_rules;
pub use parse_rules::look_ahead_is_declaration_start;

mod state;
pub use state::ParserState;

mod state_statements;
mod state_types;

mod jsdoc;
pub use jsdoc::{
    JsDocParseResult, JsDocParser, JsDocState, parse_isolated_jsdoc_comment,
    parse_jsdoc_type_expression_for_tests,
};

#[cfg(test)]
#[path = "../../tests/parser_tests.rs"]
mod parser_tests;

#[cfg(test)]
#[path = "../../tests/jsdoc_tests.rs"]
mod jsdoc_tests;
