//! Declaration lookup and dependency graph building for tsbind.
//!
//! This crate provides:
//! - `DeclarationSource` - lookup of interface / type-alias declarations by name
//! - `TypeDeclarationReader` - in-memory `.d.ts` corpus with lazy, cached parsing
//! - `Primitives` - classifier for names that never resolve to a declaration
//! - `DependencyCache` - concurrent memoization of completed builds
//! - `DependencyMapBuilder` - cycle-safe transitive dependency discovery

pub mod primitives;
pub use primitives::{Primitives, ScalarKind};

pub mod source;
pub use source::{Declaration, DeclarationKind, DeclarationPart, DeclarationSource};

pub mod reader;
pub use reader::TypeDeclarationReader;

pub mod cache;
pub use cache::DependencyCache;

pub mod builder;
pub use builder::{BuilderOptions, Dependency, DependencyMapBuilder, normalize_type_name};

#[cfg(test)]
#[path = "../tests/reader_tests.rs"]
mod reader_tests;

#[cfg(test)]
#[path = "../tests/builder_tests.rs"]
mod builder_tests;
