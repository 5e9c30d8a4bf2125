//! tsbind: read TypeScript `.d.ts` declarations and reduce a named type into
//! a target-agnostic object model.
//!
//! The pipeline lives in the workspace crates; this crate re-exports them
//! under short names and owns the binary's tracing setup.
//!
//! ```no_run
//! use tsbind::graph::TypeDeclarationReader;
//! use tsbind::model::TypeDeclarationParser;
//!
//! let reader = TypeDeclarationReader::from_source("lib.dom.d.ts", "interface Foo { a: string; }");
//! let result = TypeDeclarationParser::new(reader).parse_target_type("Foo");
//! assert!(result.is_success());
//! ```

// Shared diagnostics, spans and limits
pub use tsbind_common as common;
pub use tsbind_common::{Diagnostic, DiagnosticCategory};

// Token definitions and the scanner
pub use tsbind_scanner as scanner;
pub use tsbind_scanner::SyntaxKind;

// Declaration-subset parser with the JSDoc sub-parser
pub use tsbind_parser as parser;
pub use tsbind_parser::{NodeArena, NodeIndex, ParserState};

// Corpus reader and memoized dependency graph
pub use tsbind_graph as graph;
pub use tsbind_graph::{
    BuilderOptions, Dependency, DependencyCache, DependencyMapBuilder, TypeDeclarationReader,
};

// Object model and reducer
pub use tsbind_model as model;
pub use tsbind_model::{
    ObjectModel, ParserResult, ParserResultStatus, TopLevelObject, TypeDeclarationParser,
};

// Opt-in tracing subscriber (TSBIND_LOG / TSBIND_LOG_FORMAT)
pub mod tracing_config;
